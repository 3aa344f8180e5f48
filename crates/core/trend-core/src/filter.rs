//! The age-aware soft filter (§4.4). A ranking-style filter: it computes a
//! multiplicative penalty per video and rejects only when that penalty
//! drops below `min_penalty_to_keep`. Never has a hard global minimum that
//! would empty the output. Ported from `services/viral_filters.py`.

use crate::metrics::{engagement_rate, hours_since_publish, views_per_hour};
use crate::tuning::AgeAwareFilterConfig;
use crate::video::Video;

/// Outcome of running the age-aware filter over one video.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    /// Whether the video should proceed to scoring.
    pub passed: bool,
    /// Multiplicative penalty in `(0, 1]`, to be applied to the viral score.
    pub penalty: f64,
    /// Human-readable reason(s), joined with `"; "`.
    pub reason: String,
}

fn bucket_for(cfg: &AgeAwareFilterConfig, hours: f64) -> &crate::tuning::AgeBucket {
    cfg.buckets
        .iter()
        .find(|b| hours <= b.max_hours)
        .unwrap_or_else(|| cfg.buckets.last().expect("non-empty bucket table"))
}

/// Applies the age-aware soft filter to a single video.
pub fn age_aware_filter(video: &Video, cfg: &AgeAwareFilterConfig) -> FilterResult {
    let hours = hours_since_publish(video);
    let eng = engagement_rate(video);
    let vph = views_per_hour(video);

    if hours < cfg.early_age_hours {
        if video.views >= cfg.early_age_min_views {
            return FilterResult { passed: true, penalty: 1.0, reason: "early-age protection".into() };
        }
        return FilterResult {
            passed: true,
            penalty: cfg.penalty_views,
            reason: "low views (early age)".into(),
        };
    }

    let bucket = bucket_for(cfg, hours);
    let mut penalty = 1.0;
    let mut reasons: Vec<String> = Vec::new();

    if video.views < bucket.min_views {
        penalty *= cfg.penalty_views;
        reasons.push(format!("views {} < {} (age {:.0}h)", video.views, bucket.min_views, hours));
    }
    if video.likes < bucket.min_likes {
        penalty *= cfg.penalty_likes;
        reasons.push(format!("likes {} < {} (age {:.0}h)", video.likes, bucket.min_likes, hours));
    }
    if vph < bucket.min_vph {
        penalty *= cfg.penalty_vph;
        reasons.push(format!("vph {:.1} < {} (age {:.0}h)", vph, bucket.min_vph, hours));
    }
    if eng < bucket.min_engagement {
        penalty *= cfg.penalty_engagement;
        reasons.push(format!("engagement {:.4} < {} (age {:.0}h)", eng, bucket.min_engagement, hours));
    }

    if video.duration > cfg.max_duration_seconds {
        penalty *= cfg.penalty_duration;
        reasons.push("long duration".into());
    }
    if video.comments_disabled {
        penalty *= cfg.penalty_comments_disabled;
        reasons.push("comments disabled".into());
    }

    let passed = penalty >= cfg.min_penalty_to_keep;
    let reason = if reasons.is_empty() { "ok".to_string() } else { reasons.join("; ") };

    if tracing::enabled!(tracing::Level::DEBUG) {
        if passed {
            tracing::debug!(video_id = %video.video_id, penalty, reason = %reason, "age filter passed");
        } else {
            tracing::debug!(video_id = %video.video_id, penalty, reason = %reason, "age filter rejected");
        }
    }

    FilterResult { passed, penalty, reason }
}

/// Applies the age-aware filter to a batch, then enforces the batch safety
/// floor: if fewer than `min_keep` passed and the input is at least
/// `min_keep` large, promotes the highest-penalty rejects until reaching
/// `min_keep`.
///
/// Returns `(video, penalty)` pairs for every video that ends up a
/// candidate, plus the count of videos that were *originally* rejected
/// before any promotion.
pub fn age_aware_filter_batch<'a>(
    videos: &'a [Video],
    cfg: &AgeAwareFilterConfig,
) -> (Vec<(&'a Video, f64)>, usize) {
    let min_keep = cfg.min_candidates;

    let mut passed: Vec<(&Video, f64)> = Vec::new();
    let mut rejected: Vec<(&Video, f64)> = Vec::new();

    for v in videos {
        let r = age_aware_filter(v, cfg);
        if r.passed {
            passed.push((v, r.penalty));
        } else {
            rejected.push((v, r.penalty));
        }
    }

    let originally_rejected = rejected.len();

    if passed.len() < min_keep && videos.len() >= min_keep {
        rejected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let needed = (min_keep - passed.len()).min(rejected.len());
        passed.extend(rejected.into_iter().take(needed));
    }

    (passed, originally_rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Platform;
    use chrono::{Duration, Utc};

    fn video() -> Video {
        let mut v = Video::new(Platform::TikTok, "1", "https://tiktok.com/@a/video/1");
        v.publish_time = Some(Utc::now() - Duration::hours(1));
        v
    }

    #[test]
    fn early_age_with_enough_views_passes_at_full_strength() {
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::minutes(30));
        v.views = 45;
        v.likes = 2;
        let cfg = AgeAwareFilterConfig::default();
        let r = age_aware_filter(&v, &cfg);
        assert!(r.passed);
        assert_eq!(r.penalty, 1.0);
    }

    #[test]
    fn early_age_with_low_views_still_passes_but_penalized() {
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::minutes(30));
        v.views = 5;
        let cfg = AgeAwareFilterConfig::default();
        let r = age_aware_filter(&v, &cfg);
        assert!(r.passed);
        assert_eq!(r.penalty, cfg.penalty_views);
    }

    #[test]
    fn dead_viral_gets_heavily_penalized() {
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::hours(96));
        v.views = 500_000;
        v.likes = 1_000;
        v.comments = 10;
        v.shares = 5;
        let cfg = AgeAwareFilterConfig::default();
        let r = age_aware_filter(&v, &cfg);
        // views pass (500k > 10k), but engagement ~0.00205 < 0.035 -> penalized
        assert!((r.penalty - cfg.penalty_engagement).abs() < 1e-9);
    }

    #[test]
    fn small_creator_breakout_passes_at_full_strength() {
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::hours(1));
        v.views = 8_000;
        v.likes = 900;
        v.comments = 80;
        v.shares = 40;
        let cfg = AgeAwareFilterConfig::default();
        let r = age_aware_filter(&v, &cfg);
        assert!(r.passed);
        assert_eq!(r.penalty, 1.0);
    }

    #[test]
    fn batch_safety_floor_promotes_rejects() {
        let cfg = AgeAwareFilterConfig::default();
        let mut videos = Vec::new();
        for i in 0..50 {
            let mut v = video();
            v.video_id = i.to_string();
            v.publish_time = Some(Utc::now() - Duration::hours(200));
            v.views = i; // almost all fail every bucket threshold
            videos.push(v);
        }
        let (passed, rejected) = age_aware_filter_batch(&videos, &cfg);
        assert!(passed.len() >= cfg.min_candidates);
        assert!(rejected >= passed.len() - cfg.min_candidates || rejected > 0);
    }

    #[test]
    fn small_batch_is_not_padded_past_its_own_size() {
        let cfg = AgeAwareFilterConfig::default();
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::hours(200));
        v.views = 0;
        let videos = vec![v];
        let (passed, _rejected) = age_aware_filter_batch(&videos, &cfg);
        assert!(passed.len() <= videos.len());
    }
}
