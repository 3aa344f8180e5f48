//! The unified cross-platform video record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three supported short-video platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// TikTok.
    TikTok,
    /// Instagram Reels.
    Reels,
    /// YouTube Shorts.
    YouTube,
}

impl Platform {
    /// The lowercase wire/string form used in external ids and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Reels => "reels",
            Platform::YouTube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified internal video record every platform adapter normalizes
/// into. Identity is `(platform, video_id)` — see [`Video::eq`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Source platform.
    pub platform: Platform,
    /// Platform-native identifier. Never empty for a constructed `Video`.
    pub video_id: String,
    /// Canonical web link.
    pub url: String,
    /// Platform-native author identifier.
    pub author_id: String,
    /// Author display name.
    pub author_name: String,
    /// Non-negative; 0 if unknown.
    pub author_followers: u64,
    /// View count.
    pub views: u64,
    /// Like count.
    pub likes: u64,
    /// Comment count.
    pub comments: u64,
    /// Share count.
    pub shares: u64,
    /// Absolute UTC publish timestamp, if known.
    pub publish_time: Option<DateTime<Utc>>,
    /// Duration in seconds.
    pub duration: u64,
    /// Truncated to 500 characters by adapters.
    pub title: String,
    /// Full, untruncated description.
    pub description: String,
    /// Ordered list of hashtags as they appeared in the source payload.
    pub hashtags: Vec<String>,
    /// Sound/audio track identifier (TikTok sound-reuse detection).
    pub sound_id: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Whether comments are disabled on this video.
    pub comments_disabled: bool,
    /// Opaque original payload, retained for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
}

impl Video {
    /// Builds a `Video` with every counter defaulted to zero and all
    /// optional strings empty, for adapters to fill in.
    pub fn new(platform: Platform, video_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform,
            video_id: video_id.into(),
            url: url.into(),
            author_id: String::new(),
            author_name: String::new(),
            author_followers: 0,
            views: 0,
            likes: 0,
            comments: 0,
            shares: 0,
            publish_time: None,
            duration: 0,
            title: String::new(),
            description: String::new(),
            hashtags: Vec::new(),
            sound_id: String::new(),
            thumbnail_url: String::new(),
            comments_disabled: false,
            raw_payload: None,
        }
    }

    /// `"{platform}:{video_id}"` — the persisted uniqueness key.
    pub fn external_id(&self) -> String {
        format!("{}:{}", self.platform, self.video_id)
    }
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.platform == other.platform && self.video_id == other.video_id
    }
}

impl Eq for Video {}

impl std::hash::Hash for Video {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.platform.hash(state);
        self.video_id.hash(state);
    }
}
