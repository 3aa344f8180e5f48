//! Cross-platform deduplication (§4.2). Order-preserving: first occurrence
//! wins. Ported from `services/deduplicator.py`.

use crate::video::{Platform, Video};
use std::collections::HashSet;

/// Lowercase whitespace-split word-set cosine similarity.
/// `|A∩B| / sqrt(|A|·|B|)`. Empty inputs produce `0.0`.
fn cosine_similarity(a: &str, b: &str) -> f64 {
    let wa: HashSet<&str> = a.split_whitespace().collect();
    let wb: HashSet<&str> = b.split_whitespace().collect();
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    let intersection = wa.intersection(&wb).count() as f64;
    intersection / ((wa.len() as f64) * (wb.len() as f64)).sqrt()
}

fn title_cosine(a: &Video, b: &Video) -> f64 {
    let la = a.title.to_lowercase();
    let lb = b.title.to_lowercase();
    cosine_similarity(&la, &lb)
}

/// Returns true if `candidate` should be treated as a repost/duplicate of
/// `existing`, per rule 3 of §4.2.
fn is_repost(candidate: &Video, existing: &Video) -> bool {
    if candidate.platform == existing.platform && candidate.video_id == existing.video_id {
        return true;
    }
    if candidate.platform == Platform::TikTok
        && existing.platform == Platform::TikTok
        && !candidate.sound_id.is_empty()
        && candidate.sound_id == existing.sound_id
    {
        return true;
    }
    if title_cosine(candidate, existing) >= 0.80 {
        return true;
    }
    let duration_close = (candidate.duration as i64 - existing.duration as i64).unsigned_abs() <= 2;
    if duration_close && title_cosine(candidate, existing) >= 0.50 {
        return true;
    }
    false
}

/// Removes duplicate videos across platforms, order-preserving.
///
/// Applies, in order: (1) exact `(platform, video_id)` dedup, (2) TikTok
/// sound-reuse dedup, (3) the full repost check (video id, sound, or title
/// similarity) against every video already emitted. Idempotent:
/// `deduplicate(deduplicate(xs)) == deduplicate(xs)`.
pub fn deduplicate(videos: &[Video]) -> Vec<Video> {
    let mut seen_ids: HashSet<(Platform, String)> = HashSet::new();
    let mut seen_sounds: HashSet<(Platform, String)> = HashSet::new();
    let mut result: Vec<Video> = Vec::new();

    for v in videos {
        let id_key = (v.platform, v.video_id.clone());
        if seen_ids.contains(&id_key) {
            continue;
        }
        seen_ids.insert(id_key);

        if v.platform == Platform::TikTok && !v.sound_id.is_empty() {
            let sound_key = (v.platform, v.sound_id.clone());
            if seen_sounds.contains(&sound_key) {
                continue;
            }
            seen_sounds.insert(sound_key);
        }

        if result.iter().any(|existing| is_repost(v, existing)) {
            continue;
        }

        result.push(v.clone());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Platform;

    fn video(platform: Platform, id: &str, title: &str) -> Video {
        let mut v = Video::new(platform, id, format!("https://example.com/{id}"));
        v.title = title.to_string();
        v
    }

    #[test]
    fn exact_id_dedup() {
        let videos = vec![
            video(Platform::TikTok, "1", "hello world"),
            video(Platform::TikTok, "1", "hello world"),
        ];
        assert_eq!(deduplicate(&videos).len(), 1);
    }

    #[test]
    fn tiktok_sound_reuse_dedup() {
        let mut a = video(Platform::TikTok, "1", "one");
        a.sound_id = "sound-x".into();
        let mut b = video(Platform::TikTok, "2", "two");
        b.sound_id = "sound-x".into();
        let videos = vec![a, b];
        let result = deduplicate(&videos);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].video_id, "1");
    }

    #[test]
    fn sound_reuse_only_applies_to_tiktok() {
        let mut a = video(Platform::Reels, "1", "one");
        a.sound_id = "sound-x".into();
        let mut b = video(Platform::Reels, "2", "two");
        b.sound_id = "sound-x".into();
        let videos = vec![a, b];
        assert_eq!(deduplicate(&videos).len(), 2);
    }

    #[test]
    fn similar_titles_collapse() {
        let videos = vec![
            video(Platform::YouTube, "1", "funny cat video compilation"),
            video(Platform::YouTube, "2", "funny cat video compilation extra"),
        ];
        assert_eq!(deduplicate(&videos).len(), 1);
    }

    #[test]
    fn dedup_is_idempotent() {
        let videos = vec![
            video(Platform::TikTok, "1", "a b c"),
            video(Platform::TikTok, "2", "totally different content here"),
            video(Platform::YouTube, "3", "a b c"),
        ];
        let once = deduplicate(&videos);
        let twice = deduplicate(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.external_id(), b.external_id());
        }
    }

    #[test]
    fn cross_platform_same_video_id_is_distinct() {
        let videos = vec![
            video(Platform::TikTok, "1", "unrelated text alpha"),
            video(Platform::YouTube, "1", "unrelated text beta gamma"),
        ];
        assert_eq!(deduplicate(&videos).len(), 2);
    }
}
