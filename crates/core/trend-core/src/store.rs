//! The store contract (§6): four operations the worker needs, regardless
//! of what's behind them (REST/SQL/KV — see `trend-store-supabase` for the
//! Supabase PostgREST implementation this core was grounded against).

use crate::domain::{Source, StoredVideo, Topic};
use async_trait::async_trait;
use std::fmt;

/// Outcome of an insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// A row with this `external_id` already existed; no-op.
    Conflict(String),
}

/// A store-level failure that isn't a uniqueness conflict (those are
/// [`InsertOutcome::Conflict`], not an `Err`).
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// CRUD contract over sources, topics, and persisted videos. The core
/// treats every operation as independently consistent; idempotency across
/// cycles comes from the store's unique key on `external_id`, not from any
/// transaction the core coordinates.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All registered topics.
    async fn list_topics(&self) -> Result<Vec<Topic>, StoreError>;

    /// All registered sources; callers filter by `status` themselves.
    async fn list_sources(&self) -> Result<Vec<Source>, StoreError>;

    /// Inserts a video outcome. Returns `Conflict` rather than erroring
    /// when `external_id` already exists.
    async fn insert_video(&self, record: StoredVideo) -> Result<InsertOutcome, StoreError>;

    /// Whether a row with this external id already exists.
    async fn exists_by_external_id(&self, external_id: &str) -> Result<bool, StoreError>;
}
