use std::{cell::RefCell, collections::BTreeMap, rc::Rc, time::Duration};

use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::{
    error::Result,
    types::{RunStats, TimerId},
};

/// Intervals shorter than this are clamped so a zero period cannot starve the loop.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Deadline used when `now + delay` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

type OnceCallback = Box<dyn FnOnce(&LoopHandle) -> Result<()>>;
type RepeatCallback = Box<dyn FnMut(&LoopHandle, TimerId) -> Result<()>>;

enum Callback {
    Once(OnceCallback),
    Repeat {
        period: Duration,
        callback: RepeatCallback,
    },
}

struct Timer {
    id: TimerId,
    callback: Callback,
}

/// Pending timers keyed by `(deadline, seq)`: equal deadlines fire in
/// registration order.
#[derive(Default)]
struct TimerQueue {
    queue: BTreeMap<(Instant, u64), Timer>,
    next_seq: u64,
    /// Timer whose callback is executing right now (it is not in `queue`).
    running: Option<TimerId>,
    /// Only a running interval has a future run left to cancel.
    running_repeats: bool,
    running_cleared: bool,
}

impl TimerQueue {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, deadline: Instant, timer: Timer) {
        let seq = self.next_seq();
        self.queue.insert((deadline, seq), timer);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    fn pop_due(&mut self, now: Instant) -> Option<(Instant, Timer)> {
        let (deadline, _) = *self.queue.keys().next()?;
        if deadline > now {
            return None;
        }
        let ((deadline, _), timer) = self.queue.pop_first()?;
        self.running = Some(timer.id);
        self.running_repeats = matches!(timer.callback, Callback::Repeat { .. });
        self.running_cleared = false;
        Some((deadline, timer))
    }

    fn clear(&mut self, id: TimerId) -> bool {
        if self.running == Some(id) {
            if !self.running_repeats {
                return false;
            }
            let already = self.running_cleared;
            self.running_cleared = true;
            return !already;
        }
        let key = self
            .queue
            .iter()
            .find(|(_, timer)| timer.id == id)
            .map(|(key, _)| *key);
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }
}

/// Cheap, cloneable access to the loop's timer queue.
///
/// Callbacks receive a `&LoopHandle` so they can register or cancel timers
/// while the loop is running.
#[derive(Clone, Default)]
pub struct LoopHandle {
    timers: Rc<RefCell<TimerQueue>>,
}

impl LoopHandle {
    /// Run `callback` once, no earlier than `delay` from now.
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce(&LoopHandle) -> Result<()> + 'static,
    {
        self.register(delay, Callback::Once(Box::new(callback)))
    }

    /// Run `callback` every `period` until cleared. The callback is handed its
    /// own id so it can cancel itself.
    pub fn set_interval<F>(&self, period: Duration, callback: F) -> TimerId
    where
        F: FnMut(&LoopHandle, TimerId) -> Result<()> + 'static,
    {
        let period = period.max(MIN_INTERVAL);
        self.register(
            period,
            Callback::Repeat {
                period,
                callback: Box::new(callback),
            },
        )
    }

    /// Cancel a pending timeout or interval. Returns `false` when `id` has
    /// already fired or is firing right now as a one-shot timeout, was already
    /// cleared, or never existed.
    pub fn clear(&self, id: TimerId) -> bool {
        let cleared = self.timers.borrow_mut().clear(id);
        if cleared {
            debug!(timer = %id, "timer cleared");
        }
        cleared
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.borrow().queue.len()
    }

    fn register(&self, delay: Duration, callback: Callback) -> TimerId {
        let mut timers = self.timers.borrow_mut();
        let id = TimerId(timers.next_seq());
        let now = Instant::now();
        let deadline = now.checked_add(delay).unwrap_or(now + FAR_FUTURE);
        timers.insert(deadline, Timer { id, callback });
        debug!(timer = %id, delay_ms = delay.as_millis() as u64, "timer registered");
        id
    }
}

/// Single-threaded timer loop.
///
/// Everything registered before [`EventLoop::run`] is awaited is queued
/// before the first callback fires. Callbacks fire in non-decreasing deadline
/// order; ties keep registration order.
#[derive(Default)]
pub struct EventLoop {
    handle: LoopHandle,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Drive timers until none remain.
    ///
    /// A failing callback is logged and counted; it never stops the loop.
    pub async fn run(&self) -> RunStats {
        info!(pending = self.handle.pending(), "event loop started");
        let mut stats = RunStats::default();

        loop {
            let next = self.handle.timers.borrow().next_deadline();
            let Some(deadline) = next else { break };
            tokio::time::sleep_until(deadline).await;
            self.fire_due(&mut stats);
        }

        info!(fired = stats.fired, failed = stats.failed, "event loop idle");
        stats
    }

    fn fire_due(&self, stats: &mut RunStats) {
        let now = Instant::now();
        loop {
            // The borrow must end before the callback runs: callbacks re-enter
            // the queue through their `LoopHandle`.
            let due = self.handle.timers.borrow_mut().pop_due(now);
            let Some((deadline, timer)) = due else { break };
            let id = timer.id;

            let outcome = match timer.callback {
                Callback::Once(callback) => callback(&self.handle),
                Callback::Repeat {
                    period,
                    mut callback,
                } => {
                    let outcome = callback(&self.handle, id);
                    let mut timers = self.handle.timers.borrow_mut();
                    if !timers.running_cleared {
                        timers.insert(deadline + period, Timer {
                            id,
                            callback: Callback::Repeat { period, callback },
                        });
                    }
                    outcome
                }
            };

            {
                let mut timers = self.handle.timers.borrow_mut();
                timers.running = None;
                timers.running_repeats = false;
                timers.running_cleared = false;
            }

            stats.fired += 1;
            if let Err(e) = outcome {
                stats.failed += 1;
                error!(timer = %id, "timer callback error: {e}");
            } else {
                debug!(timer = %id, "timer fired");
            }
        }
    }
}
