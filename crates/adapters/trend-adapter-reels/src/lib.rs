//! Instagram Reels adapter: fetches recent uploads from a list of
//! usernames via an Apify scraper actor (`apify/instagram-scraper`-shaped
//! output, filtered to video posts). Ported from
//! `adapters/apify/apify_reels_adapter.py`.

mod apify;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use trend_core::{adapter::truncate_title, AdapterError, AdapterLimits, Platform, PlatformAdapter, Video};

/// Configuration for the Apify-backed Reels adapter.
#[derive(Debug, Clone)]
pub struct ReelsAdapterConfig {
    /// Apify API token.
    pub apify_token: String,
    /// Apify actor id to run (e.g. `apify/instagram-scraper`).
    pub actor_id: String,
    /// Shared request timeout/retry/result-cap policy.
    pub limits: AdapterLimits,
}

impl Default for ReelsAdapterConfig {
    fn default() -> Self {
        Self {
            apify_token: String::new(),
            actor_id: "apify/instagram-scraper".to_string(),
            limits: AdapterLimits::default(),
        }
    }
}

/// Instagram Reels [`PlatformAdapter`] backed by an Apify scraper actor.
pub struct ReelsAdapter {
    config: ReelsAdapterConfig,
    client: reqwest::Client,
}

impl ReelsAdapter {
    /// Builds the adapter with the given configuration.
    pub fn new(config: ReelsAdapterConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn normalize(&self, raw: &Value) -> Option<Video> {
        if let Some(item_type) = raw.get("type").and_then(Value::as_str) {
            let lower = item_type.to_lowercase();
            if !lower.is_empty() && !matches!(lower.as_str(), "video" | "reel" | "clips") {
                return None;
            }
        }

        let short_code = raw.get("shortCode").and_then(Value::as_str).unwrap_or_default();
        let video_id = if !short_code.is_empty() {
            short_code.to_string()
        } else {
            raw.get("id").and_then(Value::as_str).unwrap_or_default().to_string()
        };
        if video_id.is_empty() {
            return None;
        }

        let caption = raw.get("caption").and_then(Value::as_str).unwrap_or_default();
        let hashtags: Vec<String> = raw
            .get("hashtags")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(|h| h.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let owner_user = raw.get("ownerUsername").and_then(Value::as_str).unwrap_or_default().to_string();
        let owner_name = raw
            .get("ownerFullName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| owner_user.clone());
        let owner_id = raw.get("ownerId").and_then(Value::as_str).unwrap_or_default().to_string();

        let views = ["videoViewCount", "playCount", "viewCount"]
            .iter()
            .find_map(|k| raw.get(*k).and_then(Value::as_u64))
            .unwrap_or(0);
        let likes = raw.get("likesCount").or_else(|| raw.get("likeCount")).and_then(Value::as_u64).unwrap_or(0);
        let comments = raw.get("commentsCount").or_else(|| raw.get("commentCount")).and_then(Value::as_u64).unwrap_or(0);
        let shares = raw.get("sharesCount").or_else(|| raw.get("shareCount")).and_then(Value::as_u64).unwrap_or(0);
        let duration = raw
            .get("videoDuration")
            .or_else(|| raw.get("duration"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as u64;

        let publish_time = parse_timestamp(raw.get("timestamp").or_else(|| raw.get("takenAt")));

        let mut url = raw.get("url").and_then(Value::as_str).unwrap_or_default().to_string();
        if url.is_empty() && !short_code.is_empty() {
            url = format!("https://www.instagram.com/reel/{short_code}/");
        }
        let thumbnail_url = raw
            .get("images")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| raw.get("displayUrl").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();

        let mut video = Video::new(Platform::Reels, video_id, url);
        video.author_id = owner_id;
        video.author_name = owner_name;
        video.views = views;
        video.likes = likes;
        video.comments = comments;
        video.shares = shares;
        video.publish_time = publish_time;
        video.duration = duration;
        video.title = truncate_title(caption);
        video.description = caption.to_string();
        video.hashtags = hashtags;
        video.thumbnail_url = thumbnail_url;
        video.comments_disabled = raw.get("commentsDisabled").and_then(Value::as_bool).unwrap_or(false);
        video.raw_payload = Some(raw.clone());

        Some(video)
    }
}

fn parse_timestamp(ts: Option<&Value>) -> Option<DateTime<Utc>> {
    let ts = ts?;
    if let Some(n) = ts.as_i64() {
        return Utc.timestamp_opt(n, 0).single();
    }
    if let Some(s) = ts.as_str() {
        if let Ok(n) = s.parse::<i64>() {
            return Utc.timestamp_opt(n, 0).single();
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    None
}

#[async_trait]
impl PlatformAdapter for ReelsAdapter {
    fn platform(&self) -> Platform {
        Platform::Reels
    }

    async fn fetch_from_sources(&self, channel_list: &[String]) -> Result<Vec<Video>, AdapterError> {
        if self.config.apify_token.is_empty() || channel_list.is_empty() {
            return Ok(Vec::new());
        }
        let urls: Vec<String> = channel_list
            .iter()
            .take(10)
            .map(|u| u.trim().trim_start_matches('@').to_string())
            .filter(|u| !u.is_empty())
            .map(|u| format!("https://www.instagram.com/{u}/"))
            .collect();
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let run_input = serde_json::json!({
            "directUrls": urls,
            "resultsType": "posts",
            "resultsLimit": (self.config.limits.max_results * 5).min(100),
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

    async fn fetch_by_keywords(&self, keywords: &[String]) -> Result<Vec<Video>, AdapterError> {
        if self.config.apify_token.is_empty() || keywords.is_empty() {
            return Ok(Vec::new());
        }
        let tag = keywords[0].trim().trim_start_matches('#');
        let tag = if tag.is_empty() { "viral" } else { tag };
        let run_input = serde_json::json!({
            "search": tag,
            "searchType": "hashtag",
            "searchLimit": 3,
            "resultsType": "posts",
            "resultsLimit": (self.config.limits.max_results * 2).min(50),
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

    // Reels has no global trending surface; default empty from the trait.
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ReelsAdapter {
        ReelsAdapter::new(ReelsAdapterConfig::default())
    }

    #[test]
    fn normalize_video_post() {
        let raw = serde_json::json!({
            "type": "Video",
            "shortCode": "abc123",
            "caption": "a cool reel",
            "ownerUsername": "someuser",
            "ownerFullName": "Some User",
            "videoViewCount": 50_000,
            "likesCount": 3_000,
            "commentsCount": 120,
            "videoDuration": 18.5,
            "timestamp": "2026-07-01T00:00:00Z",
        });
        let v = adapter().normalize(&raw).expect("normalizes");
        assert_eq!(v.video_id, "abc123");
        assert_eq!(v.views, 50_000);
        assert_eq!(v.duration, 18);
        assert!(v.publish_time.is_some());
    }

    #[test]
    fn normalize_rejects_image_posts() {
        let raw = serde_json::json!({"type": "Image", "shortCode": "xyz"});
        assert!(adapter().normalize(&raw).is_none());
    }

    #[tokio::test]
    async fn fetch_from_sources_empty_token_yields_empty() {
        let a = adapter();
        let result = a.fetch_from_sources(&["someuser".to_string()]).await.unwrap();
        assert!(result.is_empty());
    }
}
