//! The platform adapter contract (§4.1). Each adapter crate implements
//! this trait for one platform; the worker calls `fetch_from_sources` for
//! every active source grouped by platform. Ported from
//! `adapters/base_adapter.py`.

use crate::error::AdapterError;
use crate::video::{Platform, Video};
use async_trait::async_trait;

/// Retry/backoff policy shared by every adapter. A data-driven value,
/// passed by reference rather than baked into each adapter, so the worker
/// can override it from configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub attempts: u32,
    /// Base delay; attempt `n` (1-indexed) sleeps `base_delay * n`.
    pub base_delay: std::time::Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, base_delay: std::time::Duration::from_secs(2) }
    }
}

/// Per-adapter resource limits (§4.1, §6).
#[derive(Debug, Clone, Copy)]
pub struct AdapterLimits {
    /// Maximum videos a single `fetch_from_sources` call returns.
    pub max_results: usize,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl Default for AdapterLimits {
    fn default() -> Self {
        Self {
            max_results: 20,
            timeout: std::time::Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// A platform-specific video source. The worker only calls
/// `fetch_from_sources`; `fetch_trending` and `fetch_by_keywords` are
/// optional entry points (§9 open question) kept for callers outside this
/// core (e.g. the out-of-scope HTTP layer), defaulting to an empty result.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Which platform this adapter serves.
    fn platform(&self) -> Platform;

    /// Fetches recent uploads for each identifier in `channel_list`
    /// (usernames, channel ids, or handles — platform-specific format, see
    /// [`crate::source_url`]). Always returns a (possibly empty) list;
    /// single-item failures are logged and dropped, never raised. The only
    /// exception this may raise is [`AdapterError::CreditsExhausted`],
    /// which aborts this platform for the remainder of the cycle.
    async fn fetch_from_sources(&self, channel_list: &[String]) -> Result<Vec<Video>, AdapterError>;

    /// Optional: fetch currently-trending videos for this platform.
    /// Unused by the worker loop; defaults to empty.
    async fn fetch_trending(&self) -> Result<Vec<Video>, AdapterError> {
        Ok(Vec::new())
    }

    /// Optional: fetch videos matching the given keywords. Unused by the
    /// worker loop; defaults to empty.
    async fn fetch_by_keywords(&self, _keywords: &[String]) -> Result<Vec<Video>, AdapterError> {
        Ok(Vec::new())
    }
}

/// Truncates a title to 500 characters, as every adapter must (§4.1).
/// Operates on chars, not bytes, so multi-byte UTF-8 titles truncate
/// cleanly.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(500).collect()
}

/// Normalizes a raw duration value per §4.1: if it exceeds 1000, assume
/// milliseconds and divide by 1000.
pub fn normalize_duration(raw: u64) -> u64 {
    if raw > 1000 {
        raw / 1000
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_title_caps_at_500_chars() {
        let long = "a".repeat(600);
        assert_eq!(truncate_title(&long).chars().count(), 500);
        let short = "short title";
        assert_eq!(truncate_title(short), short);
    }

    #[test]
    fn normalize_duration_assumes_milliseconds_above_1000() {
        assert_eq!(normalize_duration(1500), 1);
        assert_eq!(normalize_duration(45), 45);
        assert_eq!(normalize_duration(1000), 1000);
    }
}
