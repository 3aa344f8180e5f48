//! YouTube Shorts adapter: fetches recent uploads for a channel via the
//! YouTube Data API v3 (`search.list` + `videos.list`). Ported from
//! `adapters/youtube_adapter.py`.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::OnceLock;
use trend_core::{adapter::truncate_title, AdapterError, AdapterLimits, Platform, PlatformAdapter, Video};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Configuration for the YouTube Data API v3-backed adapter.
#[derive(Debug, Clone)]
pub struct YouTubeAdapterConfig {
    /// YouTube Data API v3 key.
    pub api_key: String,
    /// Shared request timeout/retry/result-cap policy.
    pub limits: AdapterLimits,
}

impl Default for YouTubeAdapterConfig {
    fn default() -> Self {
        Self { api_key: String::new(), limits: AdapterLimits::default() }
    }
}

/// YouTube Shorts [`PlatformAdapter`] backed by the YouTube Data API v3.
pub struct YouTubeAdapter {
    config: YouTubeAdapterConfig,
    client: reqwest::Client,
}

impl YouTubeAdapter {
    /// Builds the adapter with the given configuration.
    pub fn new(config: YouTubeAdapterConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    /// Issues one `GET` against `path` with `query`, retrying transient
    /// failures per `self.config.limits.retry`. A quota/credits response is
    /// never retried; every other failure surfaces as `AdapterError::Other`
    /// once retries are exhausted.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, AdapterError> {
        let url = format!("{API_BASE}/{path}");
        let retries = self.config.limits.retry.attempts.saturating_sub(1);
        let mut last_err = None;

        for attempt in 0..=retries {
            match self.client.get(&url).timeout(self.config.limits.timeout).query(query).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json().await.map_err(|e| AdapterError::Other(format!("parse failed: {e}")));
                }
                Ok(resp) => {
                    let err = status_to_error(resp).await;
                    if matches!(err, AdapterError::CreditsExhausted { .. }) {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
                Err(e) => last_err = Some(AdapterError::Other(format!("request failed: {e}"))),
            }
            if attempt < retries {
                tokio::time::sleep(self.config.limits.retry.base_delay * (attempt + 1)).await;
            }
        }
        Err(last_err.unwrap_or_else(|| AdapterError::Other("request failed".to_string())))
    }

    async fn resolve_channel_id(&self, identifier: &str) -> Result<Option<String>, AdapterError> {
        if identifier.starts_with("UC") && identifier.len() >= 24 {
            return Ok(Some(identifier.to_string()));
        }
        let query = identifier.trim_start_matches('@');
        let body = self
            .get_json("search", &[("part", "snippet"), ("q", query), ("type", "channel"), ("key", &self.config.api_key)])
            .await?;
        let channel_id = body
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(|item| item.get("snippet"))
            .and_then(|s| s.get("channelId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(channel_id)
    }

    async fn list_recent_short_ids(&self, channel_id: &str) -> Result<Vec<String>, AdapterError> {
        let max_results = self.config.limits.max_results.min(25).to_string();
        let body = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("type", "video"),
                    ("videoDuration", "short"),
                    ("order", "date"),
                    ("maxResults", max_results.as_str()),
                    ("key", &self.config.api_key),
                ],
            )
            .await?;
        let ids = body
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.get("id").and_then(|id| id.get("videoId")).and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn fetch_video_details(&self, ids: &[String]) -> Result<Vec<Video>, AdapterError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let body = self
            .get_json(
                "videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", &joined), ("key", &self.config.api_key)],
            )
            .await?;
        let videos = body
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(normalize).collect())
            .unwrap_or_default();
        Ok(videos)
    }
}

async fn status_to_error(resp: reqwest::Response) -> AdapterError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.as_u16() == 403 && body.to_lowercase().contains("quota") {
        AdapterError::CreditsExhausted { platform: "youtube".into() }
    } else {
        AdapterError::Other(format!("youtube API error ({status}): {body}"))
    }
}

fn iso8601_duration_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap())
}

fn parse_iso8601_duration(s: &str) -> u64 {
    let caps = match iso8601_duration_re().captures(s) {
        Some(c) => c,
        None => return 0,
    };
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok()).unwrap_or(0);
    part(1) * 3600 + part(2) * 60 + part(3)
}

fn normalize(raw: &Value) -> Option<Video> {
    let video_id = raw.get("id").and_then(Value::as_str)?.to_string();
    if video_id.is_empty() {
        return None;
    }
    let snippet = raw.get("snippet").cloned().unwrap_or(Value::Null);
    let stats = raw.get("statistics").cloned().unwrap_or(Value::Null);
    let content = raw.get("contentDetails").cloned().unwrap_or(Value::Null);

    let publish_time = snippet
        .get("publishedAt")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc));

    let duration = content.get("duration").and_then(Value::as_str).map(parse_iso8601_duration).unwrap_or(0);

    let comments_disabled = stats.get("commentCount").is_none();

    let title = snippet.get("title").and_then(Value::as_str).unwrap_or_default();
    let description = snippet.get("description").and_then(Value::as_str).unwrap_or_default();

    let mut video = Video::new(
        Platform::YouTube,
        video_id.clone(),
        format!("https://www.youtube.com/shorts/{video_id}"),
    );
    video.author_id = snippet.get("channelId").and_then(Value::as_str).unwrap_or_default().to_string();
    video.author_name = snippet.get("channelTitle").and_then(Value::as_str).unwrap_or_default().to_string();
    video.views = stats.get("viewCount").and_then(Value::as_str).and_then(|s| s.parse().ok()).unwrap_or(0);
    video.likes = stats.get("likeCount").and_then(Value::as_str).and_then(|s| s.parse().ok()).unwrap_or(0);
    video.comments = stats.get("commentCount").and_then(Value::as_str).and_then(|s| s.parse().ok()).unwrap_or(0);
    video.publish_time = publish_time;
    video.duration = duration;
    video.title = truncate_title(title);
    video.description = description.to_string();
    video.comments_disabled = comments_disabled;
    video.thumbnail_url = snippet
        .get("thumbnails")
        .and_then(|t| t.get("high"))
        .and_then(|h| h.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    video.raw_payload = Some(raw.clone());

    Some(video)
}

#[async_trait]
impl PlatformAdapter for YouTubeAdapter {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn fetch_from_sources(&self, channel_list: &[String]) -> Result<Vec<Video>, AdapterError> {
        if self.config.api_key.is_empty() || channel_list.is_empty() {
            return Ok(Vec::new());
        }
        let mut videos = Vec::new();
        for identifier in channel_list.iter().take(10) {
            let channel_id = match self.resolve_channel_id(identifier.trim()).await {
                Ok(Some(id)) => id,
                Ok(None) => continue,
                Err(AdapterError::CreditsExhausted { platform }) => {
                    return Err(AdapterError::CreditsExhausted { platform })
                }
                Err(e) => {
                    tracing::warn!(identifier, error = %e, "channel resolution failed");
                    continue;
                }
            };
            let ids = match self.list_recent_short_ids(&channel_id).await {
                Ok(ids) => ids,
                Err(AdapterError::CreditsExhausted { platform }) => {
                    return Err(AdapterError::CreditsExhausted { platform })
                }
                Err(e) => {
                    tracing::warn!(channel_id, error = %e, "video search failed");
                    continue;
                }
            };
            match self.fetch_video_details(&ids).await {
                Ok(v) => videos.extend(v),
                Err(AdapterError::CreditsExhausted { platform }) => {
                    return Err(AdapterError::CreditsExhausted { platform })
                }
                Err(e) => tracing::warn!(channel_id, error = %e, "video details failed"),
            }
        }
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_basic_item() {
        let raw = serde_json::json!({
            "id": "abc123",
            "snippet": {
                "publishedAt": "2026-07-01T00:00:00Z",
                "channelId": "UCxyz",
                "channelTitle": "Some Channel",
                "title": "a short",
                "description": "desc",
                "thumbnails": {"high": {"url": "https://example.com/thumb.jpg"}},
            },
            "statistics": {"viewCount": "1000", "likeCount": "50", "commentCount": "10"},
            "contentDetails": {"duration": "PT45S"},
        });
        let v = normalize(&raw).expect("normalizes");
        assert_eq!(v.video_id, "abc123");
        assert_eq!(v.duration, 45);
        assert_eq!(v.views, 1000);
        assert!(!v.comments_disabled);
    }

    #[test]
    fn normalize_missing_comment_count_means_disabled() {
        let raw = serde_json::json!({
            "id": "abc123",
            "snippet": {"channelId": "UCxyz", "title": "t", "description": "d"},
            "statistics": {"viewCount": "1000", "likeCount": "50"},
            "contentDetails": {"duration": "PT1M30S"},
        });
        let v = normalize(&raw).expect("normalizes");
        assert!(v.comments_disabled);
        assert_eq!(v.duration, 90);
    }

    #[test]
    fn parse_iso8601_duration_handles_hours_minutes_seconds() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT0S"), 0);
        assert_eq!(parse_iso8601_duration("garbage"), 0);
    }

    #[tokio::test]
    async fn fetch_from_sources_empty_key_yields_empty() {
        let a = YouTubeAdapter::new(YouTubeAdapterConfig::default());
        let result = a.fetch_from_sources(&["@someone".to_string()]).await.unwrap();
        assert!(result.is_empty());
    }
}
