use clap::{Args, Parser, Subcommand};
use liftoff_core::config::{Capture, CountdownConfig, IntervalConfig, TimeoutConfig};

/// Timer-loop walkthroughs: a countdown, a one-shot timeout and a
/// self-cancelling interval.
#[derive(Debug, Parser)]
#[command(name = "liftoff", version)]
pub struct Cli {
    /// TOML config file (default: $LIFTOFF_CONFIG, then ./liftoff.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Runs `countdown` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count down one step at a time and finish with the marker.
    Countdown(CountdownArgs),
    /// Print one line now and another after a delay.
    Timeout(TimeoutArgs),
    /// Print a numbered line every period until the minute changes or the tick cap is hit.
    Interval(IntervalArgs),
    /// Print the effective configuration as JSON.
    Config,
}

impl Default for Command {
    fn default() -> Self {
        Command::Countdown(CountdownArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct CountdownArgs {
    /// `snapshot` prints 5..1 then the marker; `shared` reproduces the
    /// shared-counter closure bug.
    #[arg(long)]
    pub capture: Option<Capture>,
    #[arg(long)]
    pub from: Option<u32>,
    #[arg(long)]
    pub step_ms: Option<u64>,
    #[arg(long)]
    pub marker: Option<String>,
}

impl CountdownArgs {
    pub fn apply(&self, config: &mut CountdownConfig) {
        if let Some(capture) = self.capture {
            config.capture = capture;
        }
        if let Some(from) = self.from {
            config.from = from;
        }
        if let Some(step_ms) = self.step_ms {
            config.step_ms = step_ms;
        }
        if let Some(ref marker) = self.marker {
            config.marker = marker.clone();
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct TimeoutArgs {
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl TimeoutArgs {
    pub fn apply(&self, config: &mut TimeoutConfig) {
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct IntervalArgs {
    #[arg(long)]
    pub period_ms: Option<u64>,
    #[arg(long)]
    pub max_ticks: Option<u32>,
}

impl IntervalArgs {
    pub fn apply(&self, config: &mut IntervalConfig) {
        if let Some(period_ms) = self.period_ms {
            config.period_ms = period_ms;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_countdown() {
        let cli = Cli::try_parse_from(["liftoff"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Command::Countdown(_)));
    }

    #[test]
    fn countdown_flags_override_config() {
        let cli = Cli::try_parse_from([
            "liftoff",
            "countdown",
            "--capture",
            "shared",
            "--from",
            "3",
            "--step-ms",
            "250",
            "--marker",
            "Liftoff",
        ])
        .unwrap();
        let Some(Command::Countdown(args)) = cli.command else {
            panic!("expected countdown");
        };

        let mut config = CountdownConfig::default();
        args.apply(&mut config);
        assert_eq!(config.capture, Capture::Shared);
        assert_eq!(config.from, 3);
        assert_eq!(config.step_ms, 250);
        assert_eq!(config.marker, "Liftoff");
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let mut config = IntervalConfig::default();
        IntervalArgs::default().apply(&mut config);
        assert_eq!(config, IntervalConfig::default());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["liftoff", "timeout", "--delay-ms", "10", "--config", "x.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        let Some(Command::Timeout(args)) = cli.command else {
            panic!("expected timeout");
        };
        let mut config = TimeoutConfig::default();
        args.apply(&mut config);
        assert_eq!(config.delay_ms, 10);
    }

    #[test]
    fn unknown_capture_is_rejected() {
        assert!(Cli::try_parse_from(["liftoff", "countdown", "--capture", "both"]).is_err());
    }
}
