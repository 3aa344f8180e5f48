//! TikTok adapter: fetches recent uploads from a list of usernames via an
//! Apify scraper actor (`clockworks/tiktok-scraper`-shaped output). Ported
//! from `adapters/apify/apify_tiktok_adapter.py`.

mod apify;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use trend_core::{
    adapter::normalize_duration, adapter::truncate_title, AdapterError, AdapterLimits, Platform, PlatformAdapter,
    Video,
};

/// Configuration for the Apify-backed TikTok adapter.
#[derive(Debug, Clone)]
pub struct TikTokAdapterConfig {
    /// Apify API token.
    pub apify_token: String,
    /// Apify actor id to run (e.g. `clockworks/tiktok-scraper`).
    pub actor_id: String,
    /// Shared request timeout/retry/result-cap policy.
    pub limits: AdapterLimits,
}

impl Default for TikTokAdapterConfig {
    fn default() -> Self {
        Self {
            apify_token: String::new(),
            actor_id: "clockworks/tiktok-scraper".to_string(),
            limits: AdapterLimits::default(),
        }
    }
}

/// TikTok [`PlatformAdapter`] backed by an Apify scraper actor.
pub struct TikTokAdapter {
    config: TikTokAdapterConfig,
    client: reqwest::Client,
}

impl TikTokAdapter {
    /// Builds the adapter with the given configuration.
    pub fn new(config: TikTokAdapterConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn normalize(&self, raw: &Value) -> Option<Video> {
        let video_id = raw
            .get("id")
            .or_else(|| raw.get("videoId"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| raw.get("id").and_then(Value::as_u64).map(|n| n.to_string()))?;
        if video_id.is_empty() {
            return None;
        }

        let author_meta = raw.get("authorMeta").cloned().unwrap_or(Value::Null);
        let channel = if raw.get("channel").is_some() { raw.get("channel").unwrap() } else { &author_meta };
        let video_meta = raw.get("videoMeta").or_else(|| raw.get("video")).cloned().unwrap_or(Value::Null);

        let publish_time = parse_publish_time(raw);

        let duration = normalize_duration(video_meta.get("duration").and_then(Value::as_u64).unwrap_or(0));

        let text = raw
            .get("text")
            .or_else(|| raw.get("title"))
            .or_else(|| raw.get("desc"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let hashtags: Vec<String> = raw
            .get("hashtags")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|h| {
                        h.as_str().map(str::to_string).or_else(|| {
                            h.get("name").or_else(|| h.get("title")).and_then(Value::as_str).map(str::to_string)
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let author_id = channel.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let author_user = channel
            .get("name")
            .or_else(|| channel.get("username"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let author_name = channel
            .get("nickName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| author_user.clone());

        let url = raw
            .get("webVideoUrl")
            .or_else(|| raw.get("postPage"))
            .or_else(|| raw.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://www.tiktok.com/@{author_user}/video/{video_id}"));

        let cover = video_meta
            .get("coverUrl")
            .or_else(|| video_meta.get("originalCoverUrl"))
            .or_else(|| video_meta.get("cover"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut video = Video::new(Platform::TikTok, video_id, url);
        video.author_id = author_id;
        video.author_name = author_name;
        video.author_followers = channel.get("fans").or_else(|| channel.get("followers")).and_then(Value::as_u64).unwrap_or(0);
        video.views = raw.get("playCount").or_else(|| raw.get("views")).and_then(Value::as_u64).unwrap_or(0);
        video.likes = raw.get("diggCount").or_else(|| raw.get("likes")).and_then(Value::as_u64).unwrap_or(0);
        video.comments = raw.get("commentCount").or_else(|| raw.get("comments")).and_then(Value::as_u64).unwrap_or(0);
        video.shares = raw.get("shareCount").or_else(|| raw.get("shares")).and_then(Value::as_u64).unwrap_or(0);
        video.publish_time = publish_time;
        video.duration = duration;
        video.title = truncate_title(text);
        video.description = text.to_string();
        video.hashtags = hashtags;
        video.thumbnail_url = cover;
        video.raw_payload = Some(raw.clone());

        Some(video)
    }
}

fn parse_publish_time(raw: &Value) -> Option<DateTime<Utc>> {
    if let Some(iso) = raw.get("createTimeISO").and_then(Value::as_str) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    let epoch = raw.get("createTime").or_else(|| raw.get("uploadedAt")).and_then(Value::as_i64)?;
    Utc.timestamp_opt(epoch, 0).single()
}

#[async_trait]
impl PlatformAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn fetch_from_sources(&self, channel_list: &[String]) -> Result<Vec<Video>, AdapterError> {
        if self.config.apify_token.is_empty() || channel_list.is_empty() {
            return Ok(Vec::new());
        }
        let profiles: Vec<String> = channel_list
            .iter()
            .take(10)
            .map(|u| u.trim().trim_start_matches('@').to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if profiles.is_empty() {
            return Ok(Vec::new());
        }

        let run_input = serde_json::json!({
            "profiles": profiles,
            "resultsPerPage": self.config.limits.max_results.min(20),
            "profileScrapeSections": ["videos"],
        });

        let items = apify::run_actor(
            &self.client,
            &self.config.actor_id,
            &run_input,
            &self.config.apify_token,
            &self.config.limits,
        )
        .await?;

        let mut videos: Vec<Video> = items.iter().filter_map(|item| self.normalize(item)).collect();
        videos.truncate(self.config.limits.max_results * 5);
        Ok(videos)
    }

    async fn fetch_trending(&self) -> Result<Vec<Video>, AdapterError> {
        if self.config.apify_token.is_empty() {
            return Ok(Vec::new());
        }
        let run_input = serde_json::json!({
            "hashtags": ["viral", "fyp"],
            "resultsPerPage": self.config.limits.max_results.min(15),
        });
        let items = apify::run_actor(
            &self.client,
            &self.config.actor_id,
            &run_input,
            &self.config.apify_token,
            &self.config.limits,
        )
        .await?;
        let mut videos: Vec<Video> = items.iter().filter_map(|item| self.normalize(item)).collect();
        videos.truncate(self.config.limits.max_results);
        Ok(videos)
    }

    async fn fetch_by_keywords(&self, keywords: &[String]) -> Result<Vec<Video>, AdapterError> {
        if self.config.apify_token.is_empty() || keywords.is_empty() {
            return Ok(Vec::new());
        }
        let run_input = serde_json::json!({
            "search": keywords[0].trim(),
            "resultsPerPage": (self.config.limits.max_results * 2).min(30),
        });
        let items = apify::run_actor(
            &self.client,
            &self.config.actor_id,
            &run_input,
            &self.config.apify_token,
            &self.config.limits,
        )
        .await?;
        let mut videos: Vec<Video> = items.iter().filter_map(|item| self.normalize(item)).collect();
        videos.truncate(self.config.limits.max_results * 2);
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> TikTokAdapter {
        TikTokAdapter::new(TikTokAdapterConfig::default())
    }

    #[test]
    fn normalize_clockworks_shape() {
        let raw = serde_json::json!({
            "id": "12345",
            "text": "a cool video #trend",
            "authorMeta": {"id": "author1", "nickName": "Cool Author", "name": "coolauthor", "fans": 52_000},
            "webVideoUrl": "https://www.tiktok.com/@coolauthor/video/12345",
            "videoMeta": {"duration": 15, "coverUrl": "https://example.com/cover.jpg"},
            "diggCount": 900,
            "playCount": 10_000,
            "commentCount": 40,
            "shareCount": 12,
            "createTimeISO": "2026-07-01T00:00:00Z",
            "hashtags": [{"name": "trend"}],
        });
        let v = adapter().normalize(&raw).expect("normalizes");
        assert_eq!(v.video_id, "12345");
        assert_eq!(v.author_followers, 52_000);
        assert_eq!(v.duration, 15);
        assert_eq!(v.hashtags, vec!["trend".to_string()]);
        assert!(v.publish_time.is_some());
    }

    #[test]
    fn normalize_rejects_missing_id() {
        let raw = serde_json::json!({"text": "no id here"});
        assert!(adapter().normalize(&raw).is_none());
    }

    #[tokio::test]
    async fn fetch_from_sources_empty_token_yields_empty() {
        let a = adapter();
        let result = a.fetch_from_sources(&["someuser".to_string()]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_from_sources_empty_channel_list_yields_empty() {
        let mut cfg = TikTokAdapterConfig::default();
        cfg.apify_token = "fake-token".to_string();
        let a = TikTokAdapter::new(cfg);
        let result = a.fetch_from_sources(&[]).await.unwrap();
        assert!(result.is_empty());
    }
}
