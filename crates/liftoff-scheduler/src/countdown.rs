//! The countdown: `from + 1` deferred actions spaced `step` apart, printing
//! `from` down to 1 and then a marker in place of 0.
//!
//! The scheduling loop always runs to completion before the first action
//! fires, so what each action prints depends on how it captured the counter:
//!
//! * [`Capture::Snapshot`]: each action holds the value it was scheduled
//!   with: `5, 4, 3, 2, 1, GO!`.
//! * [`Capture::Shared`]: every action reads the one [`CountdownState`],
//!   which the loop left at `-1`: `-1` six times, never the marker.

use std::{cell::Cell, rc::Rc, time::Duration};

use liftoff_core::config::{Capture, CountdownConfig, DEFAULT_MARKER};
use tracing::debug;

use crate::{
    engine::LoopHandle,
    error::{Result, SchedulerError},
    output::Output,
    types::TimerId,
};

/// Parameters of one countdown run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownPlan {
    from: u32,
    step: Duration,
    marker: String,
    capture: Capture,
}

impl CountdownPlan {
    /// Rejects plans whose last action (`from * step`) overflows `Duration`.
    pub fn new(
        from: u32,
        step: Duration,
        marker: impl Into<String>,
        capture: Capture,
    ) -> Result<Self> {
        if step.checked_mul(from).is_none() {
            return Err(SchedulerError::DelayOverflow {
                from,
                step_ms: step.as_millis(),
            });
        }
        Ok(Self {
            from,
            step,
            marker: marker.into(),
            capture,
        })
    }

    pub fn from_config(config: &CountdownConfig) -> Result<Self> {
        Self::new(
            config.from,
            Duration::from_millis(config.step_ms),
            config.marker.clone(),
            config.capture,
        )
    }

    pub fn from(&self) -> u32 {
        self.from
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }

    /// Number of actions one run schedules.
    pub fn actions(&self) -> usize {
        self.from as usize + 1
    }

    /// Delay of the action scheduled while the counter holds `counter`:
    /// `(from - counter) * step`.
    pub fn delay_for(&self, counter: i64) -> Duration {
        let from = i64::from(self.from);
        let steps = (from - counter).clamp(0, from) as u32;
        self.step * steps
    }
}

impl Default for CountdownPlan {
    fn default() -> Self {
        Self {
            from: 5,
            step: Duration::from_secs(1),
            marker: DEFAULT_MARKER.to_string(),
            capture: Capture::Snapshot,
        }
    }
}

/// What a fired action observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Count(i64),
    Marker,
}

impl Tick {
    pub fn observe(value: i64) -> Self {
        if value == 0 {
            Tick::Marker
        } else {
            Tick::Count(value)
        }
    }

    pub fn render(&self, marker: &str) -> String {
        match self {
            Tick::Count(n) => n.to_string(),
            Tick::Marker => marker.to_string(),
        }
    }
}

/// The loop counter shared by reference between the scheduling loop and
/// every action of a [`Capture::Shared`] run.
#[derive(Debug, Clone)]
pub struct CountdownState(Rc<Cell<i64>>);

impl CountdownState {
    pub fn new(start: i64) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn get(&self) -> i64 {
        self.0.get()
    }

    pub fn decrement(&self) {
        self.0.set(self.0.get() - 1);
    }
}

/// Schedule every action of `plan` on `handle` and return their ids in
/// scheduling order. Nothing is written until the loop runs.
pub fn countdown(handle: &LoopHandle, plan: &CountdownPlan, out: Rc<dyn Output>) -> Vec<TimerId> {
    let marker: Rc<str> = Rc::from(plan.marker.as_str());
    let ids = match plan.capture {
        Capture::Snapshot => schedule_snapshots(handle, plan, out, marker),
        Capture::Shared => schedule_shared(handle, plan, out, marker),
    };
    debug!(
        capture = %plan.capture,
        actions = ids.len(),
        "countdown scheduled"
    );
    ids
}

fn schedule_snapshots(
    handle: &LoopHandle,
    plan: &CountdownPlan,
    out: Rc<dyn Output>,
    marker: Rc<str>,
) -> Vec<TimerId> {
    (0..=i64::from(plan.from))
        .rev()
        .map(|value| {
            let out = Rc::clone(&out);
            let marker = Rc::clone(&marker);
            handle.set_timeout(plan.delay_for(value), move |_| {
                out.line(&Tick::observe(value).render(&marker))
            })
        })
        .collect()
}

fn schedule_shared(
    handle: &LoopHandle,
    plan: &CountdownPlan,
    out: Rc<dyn Output>,
    marker: Rc<str>,
) -> Vec<TimerId> {
    let state = CountdownState::new(i64::from(plan.from));
    let mut ids = Vec::with_capacity(plan.actions());

    while state.get() >= 0 {
        let shared = state.clone();
        let out = Rc::clone(&out);
        let marker = Rc::clone(&marker);
        ids.push(handle.set_timeout(plan.delay_for(state.get()), move |_| {
            out.line(&Tick::observe(shared.get()).render(&marker))
        }));
        state.decrement();
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_five_seconds_of_countdown() {
        let plan = CountdownPlan::default();
        assert_eq!(plan.actions(), 6);
        assert_eq!(plan.delay_for(5), Duration::ZERO);
        assert_eq!(plan.delay_for(0), Duration::from_secs(5));
        assert_eq!(plan.marker(), "GO!");
        assert_eq!(plan.capture(), Capture::Snapshot);
    }

    #[test]
    fn delays_strictly_increase_as_counter_drops() {
        let plan = CountdownPlan::default();
        let delays: Vec<_> = (0..=5).rev().map(|c| plan.delay_for(c)).collect();
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn overflowing_plan_is_rejected() {
        let err =
            CountdownPlan::new(u32::MAX, Duration::MAX, "GO!", Capture::Snapshot).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::DelayOverflow { from: u32::MAX, .. }
        ));
    }

    #[test]
    fn plan_from_config_copies_every_field() {
        let config = CountdownConfig {
            from: 3,
            step_ms: 250,
            marker: "Liftoff".into(),
            capture: Capture::Shared,
        };
        let plan = CountdownPlan::from_config(&config).unwrap();
        assert_eq!(plan.from(), 3);
        assert_eq!(plan.step(), Duration::from_millis(250));
        assert_eq!(plan.marker(), "Liftoff");
        assert_eq!(plan.capture(), Capture::Shared);
    }

    #[test]
    fn tick_renders_marker_only_for_zero() {
        assert_eq!(Tick::observe(0), Tick::Marker);
        assert_eq!(Tick::observe(-1), Tick::Count(-1));
        assert_eq!(Tick::observe(3).render("GO!"), "3");
        assert_eq!(Tick::Marker.render("GO!"), "GO!");
    }

    #[test]
    fn shared_state_ends_below_zero() {
        let state = CountdownState::new(5);
        let reader = state.clone();
        while state.get() >= 0 {
            state.decrement();
        }
        assert_eq!(reader.get(), -1);
    }
}
