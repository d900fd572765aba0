use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Writing a line to the output sink failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// The last countdown action would be scheduled further out than `Duration` can hold.
    #[error("Countdown delay overflows: from {from} with step {step_ms}ms")]
    DelayOverflow { from: u32, step_ms: u128 },

    /// A timer callback reported a failure of its own.
    #[error("Callback failed: {0}")]
    Callback(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
