// Time Provider Port (for testability)

/// Time provider interface (allows fixing the clock in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in seconds since epoch
    fn now_seconds(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed time provider (tests)
pub struct FixedTimeProvider(pub i64);

impl TimeProvider for FixedTimeProvider {
    fn now_seconds(&self) -> i64 {
        self.0
    }
}
