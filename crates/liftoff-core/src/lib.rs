//! `liftoff-core` — configuration and error types shared by the scheduler
//! and the `liftoff` binary.

pub mod config;
pub mod error;

pub use config::LiftoffConfig;
pub use error::{LiftoffError, Result};
