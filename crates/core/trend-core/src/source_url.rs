//! Turns a user-entered [`Source`](crate::domain::Source) URL into the
//! identifier format each platform adapter expects (§6). Ported from
//! `services/ingestion_helpers.py::parse_source_identifier`.

use crate::video::Platform;
use regex::Regex;
use std::sync::OnceLock;

fn tiktok_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)tiktok\.com/@([^/?]+)").unwrap())
}

fn reels_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)instagram\.com/([^/?]+)").unwrap())
}

fn youtube_channel_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)youtube\.com/channel/(UC[\w-]+)").unwrap())
}

fn youtube_handle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)youtube\.com/@([^/?]+)").unwrap())
}

fn youtube_custom_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)youtube\.com/c/([^/?]+)").unwrap())
}

fn last_path_segment(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?.trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Extracts the channel/username identifier an adapter expects from a
/// source URL, per §6's per-platform rules. Returns `None` only when the
/// URL is empty.
pub fn parse_source_identifier(platform: Platform, url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    match platform {
        Platform::TikTok => tiktok_re()
            .captures(url)
            .map(|c| c[1].to_string())
            .or_else(|| last_path_segment(url)),
        Platform::Reels => reels_re()
            .captures(url)
            .map(|c| c[1].to_string())
            .or_else(|| last_path_segment(url)),
        Platform::YouTube => {
            if let Some(c) = youtube_channel_re().captures(url) {
                return Some(c[1].to_string());
            }
            if let Some(c) = youtube_handle_re().captures(url) {
                return Some(format!("@{}", &c[1]));
            }
            if let Some(c) = youtube_custom_re().captures(url) {
                return Some(c[1].to_string());
            }
            if url.starts_with("UC") && url.len() >= 24 {
                return Some(url.to_string());
            }
            Some(url.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiktok_extracts_username() {
        assert_eq!(
            parse_source_identifier(Platform::TikTok, "https://www.tiktok.com/@someuser"),
            Some("someuser".to_string())
        );
    }

    #[test]
    fn tiktok_falls_back_to_last_segment() {
        assert_eq!(
            parse_source_identifier(Platform::TikTok, "https://vm.tiktok.com/ZMabc123"),
            Some("ZMabc123".to_string())
        );
    }

    #[test]
    fn reels_extracts_username() {
        assert_eq!(
            parse_source_identifier(Platform::Reels, "https://instagram.com/someuser"),
            Some("someuser".to_string())
        );
    }

    #[test]
    fn youtube_channel_url() {
        assert_eq!(
            parse_source_identifier(Platform::YouTube, "https://youtube.com/channel/UCabcdefghijklmnopqrstu"),
            Some("UCabcdefghijklmnopqrstu".to_string())
        );
    }

    #[test]
    fn youtube_handle_url() {
        assert_eq!(
            parse_source_identifier(Platform::YouTube, "https://youtube.com/@somehandle"),
            Some("@somehandle".to_string())
        );
    }

    #[test]
    fn youtube_custom_url() {
        assert_eq!(
            parse_source_identifier(Platform::YouTube, "https://youtube.com/c/SomeName"),
            Some("SomeName".to_string())
        );
    }

    #[test]
    fn youtube_literal_channel_id_passthrough() {
        let id = "UC1234567890123456789012";
        assert!(id.len() >= 24);
        assert_eq!(parse_source_identifier(Platform::YouTube, id), Some(id.to_string()));
    }

    #[test]
    fn youtube_unrecognized_passes_through() {
        assert_eq!(
            parse_source_identifier(Platform::YouTube, "somehandle"),
            Some("somehandle".to_string())
        );
    }

    #[test]
    fn empty_url_is_none() {
        assert_eq!(parse_source_identifier(Platform::TikTok, ""), None);
    }
}
