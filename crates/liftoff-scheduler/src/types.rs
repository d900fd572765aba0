/// Handle to a pending timeout or interval, returned on registration and
/// accepted by [`crate::LoopHandle::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Counters reported by [`crate::EventLoop::run`] once the loop goes idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Callback invocations, counting every tick of an interval.
    pub fired: usize,
    /// Invocations that returned an error.
    pub failed: usize,
}
