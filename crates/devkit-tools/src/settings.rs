//! Tunables shared by the authority and its mirrors

use std::time::Duration;

/// Default time a mirror waits for a `SET_AI_TOOL` response.
pub const DEFAULT_SWITCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of `AI_TOOL_CHANGED` events buffered per subscriber.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// An unanswered switch is reverted after this long
    pub switch_timeout: Duration,
    pub broadcast_capacity: usize,
}

impl SyncSettings {
    pub fn with_switch_timeout(mut self, timeout: Duration) -> Self {
        self.switch_timeout = timeout;
        self
    }

    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            switch_timeout: DEFAULT_SWITCH_TIMEOUT,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}
