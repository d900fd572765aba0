//! The two smaller timer walkthroughs: a one-shot timeout that lands after
//! the synchronous lines written around it, and an interval that cancels
//! itself.
//!
//! Wall-clock times are derived from the loop clock (`started_at` plus time
//! elapsed since scheduling) so they advance with paused test time as well.

use std::{rc::Rc, time::Duration};

use chrono::{DateTime, Local, Timelike};
use tokio::time::Instant;
use tracing::debug;

use crate::{engine::LoopHandle, error::Result, output::Output, types::TimerId};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn wall_clock(started_at: DateTime<Local>, origin: Instant) -> DateTime<Local> {
    let elapsed =
        chrono::Duration::from_std(origin.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
    started_at + elapsed
}

/// Write the "before" line, schedule the "after" line `delay` out, then write
/// two more lines synchronously. The deferred line is always the last one.
pub fn timeout_demo(
    handle: &LoopHandle,
    out: Rc<dyn Output>,
    delay: Duration,
    started_at: DateTime<Local>,
) -> Result<TimerId> {
    let origin = Instant::now();
    out.line(&format!("Before timeout:{}", started_at.format(TIME_FORMAT)))?;

    let deferred = Rc::clone(&out);
    let id = handle.set_timeout(delay, move |_| {
        let now = wall_clock(started_at, origin);
        deferred.line(&format!("After timeout:{}", now.format(TIME_FORMAT)))
    });

    out.line("I happen after setTimeout!")?;
    out.line("Me too!")?;
    Ok(id)
}

/// Print `<i> : <time>` every `period` until the wall-clock minute changes or
/// the tick counter would pass `max_ticks`; the interval then clears itself
/// without printing.
pub fn interval_demo(
    handle: &LoopHandle,
    out: Rc<dyn Output>,
    period: Duration,
    max_ticks: u32,
    started_at: DateTime<Local>,
) -> TimerId {
    let origin = Instant::now();
    let mut ticks: u32 = 0;

    handle.set_interval(period, move |h, id| {
        let now = wall_clock(started_at, origin);
        if now.minute() != started_at.minute() {
            debug!(timer = %id, ticks, "minute rolled over, stopping interval");
            h.clear(id);
            return Ok(());
        }
        ticks += 1;
        if ticks > max_ticks {
            debug!(timer = %id, ticks = max_ticks, "tick limit reached, stopping interval");
            h.clear(id);
            return Ok(());
        }
        out.line(&format!("{ticks} : {}", now.format(TIME_FORMAT)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::EventLoop, output::MemoryOutput};
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 15, h, m, s).single().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_line_lands_after_synchronous_lines() {
        let event_loop = EventLoop::new();
        let out = Rc::new(MemoryOutput::new());

        timeout_demo(
            &event_loop.handle(),
            out.clone(),
            Duration::from_secs(60),
            at(12, 0, 0),
        )
        .unwrap();
        assert_eq!(out.lines().len(), 3);

        let stats = event_loop.run().await;
        assert_eq!(stats.fired, 1);
        assert_eq!(
            out.lines(),
            vec![
                "Before timeout:2026-01-15 12:00:00",
                "I happen after setTimeout!",
                "Me too!",
                "After timeout:2026-01-15 12:01:00",
            ]
        );
        assert!(out.entries()[3].0 >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_stops_after_max_ticks() {
        let event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let out = Rc::new(MemoryOutput::new());

        interval_demo(&handle, out.clone(), Duration::from_secs(5), 10, at(9, 30, 0));
        let stats = event_loop.run().await;

        let lines = out.lines();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "1 : 2026-01-15 09:30:05");
        assert_eq!(lines[9], "10 : 2026-01-15 09:30:50");
        // the eleventh tick clears the interval instead of printing
        assert_eq!(stats.fired, 11);
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_stops_when_minute_changes() {
        let event_loop = EventLoop::new();
        let out = Rc::new(MemoryOutput::new());

        interval_demo(
            &event_loop.handle(),
            out.clone(),
            Duration::from_secs(5),
            10,
            at(9, 30, 45),
        );
        event_loop.run().await;

        assert_eq!(
            out.lines(),
            vec!["1 : 2026-01-15 09:30:50", "2 : 2026-01-15 09:30:55"]
        );
    }
}
