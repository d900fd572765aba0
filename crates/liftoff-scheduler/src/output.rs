//! Line sinks that fired actions write to.

use std::{cell::RefCell, io::Write, time::Duration};

use tokio::time::Instant;

use crate::error::Result;

/// Destination for the one line each fired action produces.
pub trait Output {
    fn line(&self, text: &str) -> Result<()>;
}

/// Writes each line to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn line(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps every line in memory together with the loop time it was written at,
/// measured from when the sink was created.
#[derive(Debug)]
pub struct MemoryOutput {
    created: Instant,
    entries: RefCell<Vec<(Duration, String)>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self {
            created: Instant::now(),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Recorded text in write order.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Recorded `(elapsed, text)` pairs in write order.
    pub fn entries(&self) -> Vec<(Duration, String)> {
        self.entries.borrow().clone()
    }
}

impl Default for MemoryOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for MemoryOutput {
    fn line(&self, text: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .push((self.created.elapsed(), text.to_string()));
        Ok(())
    }
}
