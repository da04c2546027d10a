//! Database open options.

use std::time::Duration;

/// Default time to wait for another handle to release the database file
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Default pause between attempts to acquire the database file
const DEFAULT_LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Options used when opening a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Options {
    /// How long `open` keeps retrying while the file is held by another
    /// handle. `Duration::ZERO` makes a single attempt.
    pub lock_timeout: Duration,
    /// Pause between open attempts while waiting for the file
    pub lock_retry_interval: Duration,
    /// Engine page cache size in bytes; `None` keeps the engine default
    pub cache_size: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            lock_retry_interval: DEFAULT_LOCK_RETRY_INTERVAL,
            cache_size: None,
        }
    }
}

impl Options {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lock wait timeout
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the pause between lock attempts
    pub fn lock_retry_interval(mut self, interval: Duration) -> Self {
        self.lock_retry_interval = interval;
        self
    }

    /// Set the engine cache size
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }
}
