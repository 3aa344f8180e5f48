//! Error types for the trend detector core.
//!
//! The pipeline core itself never throws (§7 of the spec): filters, the
//! scorer, the dedicated quality gate and the orchestrator all return plain
//! values. Errors only exist at the two real boundaries this crate defines —
//! configuration loading and the adapter/store contracts other crates
//! implement.

use thiserror::Error;

/// Top-level error for configuration and wiring failures.
#[derive(Debug, Error)]
pub enum TrendError {
    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A store implementation reported a failure that isn't a uniqueness
    /// conflict (those are handled as `skipped`, not errors).
    #[error("store error: {0}")]
    Store(String),

    /// An adapter failed in a way the worker could not isolate (should be
    /// rare — adapters are expected to swallow their own per-item errors).
    #[error("adapter error: {0}")]
    Adapter(String),

    /// A call exceeded its configured timeout.
    #[error("timeout: {0}")]
    Timeout(String),
}

/// Error crossing the platform-adapter boundary.
///
/// Per §4.1 / §7, `CreditsExhausted` is the *only* variant that is allowed
/// to abort a platform's fetch for the remainder of a cycle; anything else
/// (transient network failures after retries are exhausted, malformed
/// payloads) is represented by `Other` and is still non-fatal — callers
/// treat it the same as an empty result for that call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The platform's upstream quota/credits are depleted. Surfaced to the
    /// user via the worker's `error_message`.
    #[error("credits exhausted for platform {platform}")]
    CreditsExhausted {
        /// The platform that ran out of credits.
        platform: String,
    },

    /// Any other adapter-level failure (network, parse, auth). Adapters
    /// should prefer to log-and-drop per-item failures rather than raise
    /// this; it exists for failures that prevent a whole call from
    /// producing a result.
    #[error("adapter error: {0}")]
    Other(String),
}

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, TrendError>;
