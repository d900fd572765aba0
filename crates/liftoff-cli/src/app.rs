use std::{rc::Rc, time::Duration};

use chrono::Local;
use liftoff_core::LiftoffConfig;
use liftoff_scheduler::{
    countdown,
    demo::{interval_demo, timeout_demo},
    CountdownPlan, EventLoop, Output, RunStats,
};
use tracing::{info, warn};

use crate::cli::Command;

/// Apply CLI overrides to `config`, schedule the chosen program and drive the
/// loop until it goes idle or the process is interrupted.
pub async fn run(
    command: Command,
    mut config: LiftoffConfig,
    out: Rc<dyn Output>,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    match command {
        Command::Countdown(args) => {
            args.apply(&mut config.countdown);
            let plan = CountdownPlan::from_config(&config.countdown)?;
            info!(
                from = plan.from(),
                step_ms = config.countdown.step_ms,
                capture = %plan.capture(),
                "starting countdown"
            );
            out.line("Countdown:")?;
            countdown(&handle, &plan, out);
        }
        Command::Timeout(args) => {
            args.apply(&mut config.timeout);
            timeout_demo(
                &handle,
                out,
                Duration::from_millis(config.timeout.delay_ms),
                Local::now(),
            )?;
        }
        Command::Interval(args) => {
            args.apply(&mut config.interval);
            interval_demo(
                &handle,
                out,
                Duration::from_millis(config.interval.period_ms),
                config.interval.max_ticks,
                Local::now(),
            );
        }
        Command::Config => {
            out.line(&serde_json::to_string_pretty(&config)?)?;
            return Ok(());
        }
    }

    if let Some(stats) = drive(&event_loop).await {
        if stats.failed > 0 {
            anyhow::bail!("{} of {} timer callbacks failed", stats.failed, stats.fired);
        }
    }
    Ok(())
}

/// `None` when Ctrl-C arrived before the loop went idle.
async fn drive(event_loop: &EventLoop) -> Option<RunStats> {
    tokio::select! {
        stats = event_loop.run() => {
            info!(fired = stats.fired, failed = stats.failed, "all timers done");
            Some(stats)
        }
        _ = tokio::signal::ctrl_c() => {
            warn!(pending = event_loop.handle().pending(), "interrupted, dropping pending timers");
            None
        }
    }
}
