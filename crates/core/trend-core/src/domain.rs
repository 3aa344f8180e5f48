//! Store-facing domain records: sources, topics, and persisted outcomes.

use crate::video::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a [`Source`]. Only `Active` sources are consulted
/// by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Consulted by the worker.
    Active,
    /// Skipped by the worker.
    Inactive,
}

/// A creator account the worker monitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Which platform this source lives on.
    pub platform: Platform,
    /// The user-entered source URL, parsed by [`crate::source_url`].
    pub url: String,
    /// Whether the worker should consult this source.
    pub status: SourceStatus,
    /// When the source was registered.
    pub created_at: DateTime<Utc>,
}

/// A keyword of interest, driving the per-video keyword-match signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// The keyword itself, matched case-insensitively as a substring.
    pub keyword: String,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the topic was registered.
    pub created_at: DateTime<Utc>,
}

/// The outcome persisted for a video that survived the full pipeline and
/// the quality gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVideo {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// The source this video was discovered through.
    pub source_id: Uuid,
    /// `"{platform}:{video_id}"` — unique; duplicate inserts are idempotent.
    pub external_id: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// The viral scorer's own explanation string, truncated to 2000 chars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    /// Integer score in `[1, 10]`.
    pub virality_score: u8,
    /// Pure function of `virality_score` against the viral-score threshold.
    pub is_viral: bool,
    /// The video's canonical URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// Which quality-gate reason accepted this row.
    pub quality_decision_reason: String,
    /// When this row was inserted.
    pub created_at: DateTime<Utc>,
}
