use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNTDOWN_FROM: u32 = 5;
pub const DEFAULT_STEP_MS: u64 = 1_000;
pub const DEFAULT_MARKER: &str = "GO!";
pub const DEFAULT_TIMEOUT_DELAY_MS: u64 = 60 * 1_000; // one minute
pub const DEFAULT_INTERVAL_PERIOD_MS: u64 = 5 * 1_000;
pub const DEFAULT_INTERVAL_MAX_TICKS: u32 = 10;
pub const DEFAULT_CONFIG_FILE: &str = "liftoff.toml";
pub const ENV_PREFIX: &str = "LIFTOFF_";

/// Top-level config (liftoff.toml + LIFTOFF_* env overrides).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiftoffConfig {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub timeout: TimeoutConfig,
    #[serde(default)]
    pub interval: IntervalConfig,
}

/// How each deferred countdown action sees the loop counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capture {
    /// Every action owns a copy of the counter taken when it was scheduled.
    #[default]
    Snapshot,
    /// Every action reads the one counter the scheduling loop decremented.
    Shared,
}

impl std::fmt::Display for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Capture::Snapshot => "snapshot",
            Capture::Shared => "shared",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Capture {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "snapshot" => Ok(Capture::Snapshot),
            "shared" => Ok(Capture::Shared),
            other => Err(format!("unknown capture mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// First value printed; the run schedules `from + 1` actions.
    #[serde(default = "default_from")]
    pub from: u32,
    /// Spacing between consecutive actions.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    /// Printed in place of zero.
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub capture: Capture,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            from: DEFAULT_COUNTDOWN_FROM,
            step_ms: DEFAULT_STEP_MS,
            marker: DEFAULT_MARKER.to_string(),
            capture: Capture::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_timeout_delay_ms")]
    pub delay_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_TIMEOUT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default = "default_interval_period_ms")]
    pub period_ms: u64,
    /// The interval clears itself once its tick counter would exceed this.
    #[serde(default = "default_interval_max_ticks")]
    pub max_ticks: u32,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_INTERVAL_PERIOD_MS,
            max_ticks: DEFAULT_INTERVAL_MAX_TICKS,
        }
    }
}

fn default_from() -> u32 {
    DEFAULT_COUNTDOWN_FROM
}
fn default_step_ms() -> u64 {
    DEFAULT_STEP_MS
}
fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}
fn default_timeout_delay_ms() -> u64 {
    DEFAULT_TIMEOUT_DELAY_MS
}
fn default_interval_period_ms() -> u64 {
    DEFAULT_INTERVAL_PERIOD_MS
}
fn default_interval_max_ticks() -> u32 {
    DEFAULT_INTERVAL_MAX_TICKS
}

impl LiftoffConfig {
    /// Load config from a TOML file with LIFTOFF_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g. `LIFTOFF_COUNTDOWN__STEP_MS=250`.
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        let config: LiftoffConfig = Figment::from(Serialized::defaults(LiftoffConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| crate::error::LiftoffError::Config(e.to_string()))?;

        tracing::debug!(%path, "configuration loaded");
        Ok(config)
    }
}
