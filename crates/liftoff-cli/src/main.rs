use clap::Parser;
use tracing::warn;

mod app;
mod cli;

/// Used when `RUST_LOG` is unset; matches every `liftoff_*` crate target.
const DEFAULT_LOG_FILTER: &str = "liftoff=warn";

// Timers share loop state through `Rc`, so everything stays on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // logs go to stderr; stdout carries only program output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    // load config: --config > LIFTOFF_CONFIG env > ./liftoff.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("LIFTOFF_CONFIG").ok());
    let config = liftoff_core::LiftoffConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!(code = e.code(), "Config load failed ({e}), using defaults");
        liftoff_core::LiftoffConfig::default()
    });

    let command = cli.command.unwrap_or_default();
    app::run(command, config, std::rc::Rc::new(liftoff_scheduler::StdoutOutput)).await
}
