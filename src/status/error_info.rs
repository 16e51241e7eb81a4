//! The most-recent-failure notification.
//!
//! At most one failure is highlighted process-wide. It is overwritten by
//! every new failure, cleared when the same endpoint recovers, and expires
//! on its own after [`ERROR_INFO_TTL`].

use std::time::{Duration, Instant};

/// How long a failure stays highlighted before reverting to ambient signaling.
pub const ERROR_INFO_TTL: Duration = Duration::from_secs(10);

/// Details of the most recent probe failure.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Id of the endpoint that failed.
    pub endpoint_id: String,
    /// URL that was probed.
    pub url: String,
    /// Failure reason, passed through from the probe.
    pub message: String,
    /// When the failure was recorded.
    pub at: Instant,
}

impl ErrorInfo {
    /// Whether this failure is still fresh enough to display.
    pub fn is_fresh(&self) -> bool {
        self.at.elapsed() < ERROR_INFO_TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_until_ttl() {
        let info = ErrorInfo {
            endpoint_id: "e1".to_string(),
            url: "http://example.com".to_string(),
            message: "Connection refused".to_string(),
            at: Instant::now(),
        };
        assert!(info.is_fresh());

        let stale = ErrorInfo {
            at: Instant::now() - (ERROR_INFO_TTL + Duration::from_millis(10)),
            ..info
        };
        assert!(!stale.is_fresh());
    }
}
