//! `liftoff-scheduler` — single-threaded timer loop and the countdown built on it.
//!
//! # Overview
//!
//! [`EventLoop`] owns a queue of deferred callbacks ordered by deadline and
//! drives them with `tokio::time` on the current thread. Code registers work
//! through a [`LoopHandle`] (`set_timeout`, `set_interval`, `clear`), then
//! awaits [`EventLoop::run`], which returns once nothing is left to fire.
//!
//! # Programs
//!
//! | Function                  | Behaviour                                              |
//! |---------------------------|--------------------------------------------------------|
//! | [`countdown()`]           | `from + 1` actions, one per `step`, ending in a marker |
//! | [`demo::timeout_demo`]    | one deferred line after three synchronous ones         |
//! | [`demo::interval_demo`]   | numbered lines until the minute changes or a tick cap  |

pub mod countdown;
pub mod demo;
pub mod engine;
pub mod error;
pub mod output;
pub mod types;

pub use countdown::{countdown, CountdownPlan, CountdownState, Tick};
pub use engine::{EventLoop, LoopHandle};
pub use error::{Result, SchedulerError};
pub use liftoff_core::config::Capture;
pub use output::{MemoryOutput, Output, StdoutOutput};
pub use types::{RunStats, TimerId};
