use std::time::Duration;

/// Page-size limits shared by every list operation.
///
/// A requested limit is always clamped to `max_page_size`; when no limit is
/// requested the effective limit is `min(default_page_size, max_page_size)`.
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// Page size used when the caller does not request one
    pub default_page_size: usize,
    /// Hard ceiling on any requested page size
    pub max_page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: 1000,
        }
    }
}

impl PagingConfig {
    pub fn new(default_page_size: usize, max_page_size: usize) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }
}

/// Configuration for the liveness reaper.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// A bound job whose heartbeat is older than this is considered stalled
    pub heartbeat_timeout: Duration,
    /// Once `retry_count` reaches this, a stalled job goes to `error`
    /// instead of back to the queue
    pub max_retries: u32,
    /// How often the reaper scans for stalled jobs
    pub scan_interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(120),
            max_retries: 3,
            scan_interval: Duration::from_secs(15),
        }
    }
}

impl ReaperConfig {
    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }
}
