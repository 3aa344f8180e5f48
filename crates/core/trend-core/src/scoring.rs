//! The five-stage viral scorer (§4.5). Ported from `services/viral_scoring.py`.

use crate::metrics::{discussion_score, engagement_rate, hours_since_publish, views_per_hour};
use crate::tuning::{CreatorMultiplierConfig, FreshnessConfig, ViralScoreWeights};
use crate::video::Video;

/// Every intermediate value computed while scoring a video, plus the final
/// `viral_score` and a short human-readable explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViralScoreBreakdown {
    /// The final weighted, multiplied score.
    pub viral_score: f64,
    /// `ln(views_per_hour + 1)`.
    pub velocity_norm: f64,
    /// `ln(100 * engagement_rate + 1)`.
    pub interaction_norm: f64,
    /// `ln(10 * discussion_score + 1)`.
    pub discussion_norm: f64,
    /// `1.0` if any topic keyword matched, else `0.0`.
    pub keyword_match: f64,
    /// The small-creator boost / large-creator penalty applied.
    pub creator_multiplier: f64,
    /// The freshness weight applied.
    pub freshness: f64,
    /// Human-readable summary of which reasons fired.
    pub explanation: String,
}

fn keyword_match(video: &Video, topic_keywords: &[String]) -> f64 {
    if topic_keywords.is_empty() {
        return 0.0;
    }
    let haystack = format!(
        "{} {} {}",
        video.title.to_lowercase(),
        video.description.to_lowercase(),
        video.hashtags.join(" ").to_lowercase()
    );
    if topic_keywords.iter().any(|kw| haystack.contains(&kw.to_lowercase())) {
        1.0
    } else {
        0.0
    }
}

fn creator_multiplier(followers: u64, cfg: &CreatorMultiplierConfig) -> f64 {
    if followers < cfg.threshold_50k {
        cfg.boost_50k
    } else if followers < cfg.threshold_150k {
        cfg.boost_150k
    } else if followers < cfg.threshold_500k {
        cfg.boost_500k
    } else if followers > cfg.threshold_2m {
        cfg.penalty_2m
    } else {
        1.0
    }
}

fn freshness_weight(hours: f64, cfg: &FreshnessConfig) -> f64 {
    if hours <= cfg.hours_2 {
        cfg.w_2h
    } else if hours <= cfg.hours_6 {
        cfg.w_6h
    } else if hours <= cfg.hours_18 {
        cfg.w_18h
    } else if hours <= cfg.hours_48 {
        cfg.w_48h
    } else {
        cfg.w_older
    }
}

fn build_explanation(
    velocity_raw: f64,
    interaction_raw: f64,
    freshness: f64,
    followers: u64,
    kw_match: f64,
) -> String {
    let mut parts = Vec::new();
    if velocity_raw > 50.0 {
        parts.push("high velocity");
    }
    if interaction_raw > 0.05 {
        parts.push("strong engagement");
    }
    if freshness >= 1.2 {
        parts.push("fresh");
    }
    if followers < 150_000 {
        parts.push("small creator");
    }
    if kw_match > 0.0 {
        parts.push("keyword match");
    }
    if parts.is_empty() {
        "moderate metrics".to_string()
    } else {
        parts.join(" + ")
    }
}

/// Computes the unpenalized viral score for one video against a set of
/// topic keywords. The caller (the pipeline orchestrator) multiplies
/// `viral_score` by the age-aware filter's penalty.
pub fn compute_viral_score(
    video: &Video,
    topic_keywords: &[String],
    weights: &ViralScoreWeights,
    creator_cfg: &CreatorMultiplierConfig,
    freshness_cfg: &FreshnessConfig,
) -> ViralScoreBreakdown {
    let hours = hours_since_publish(video);

    let velocity_raw = views_per_hour(video);
    let interaction_raw = engagement_rate(video);
    let discussion_raw = discussion_score(video);

    let velocity_norm = (velocity_raw + 1.0).ln();
    let interaction_norm = (interaction_raw * 100.0 + 1.0).ln();
    let discussion_norm = (discussion_raw * 10.0 + 1.0).ln();

    let creator_mult = creator_multiplier(video.author_followers, creator_cfg);
    let freshness = freshness_weight(hours, freshness_cfg);
    let kw_match = keyword_match(video, topic_keywords);

    let base = velocity_norm * weights.velocity
        + interaction_norm * weights.interaction
        + discussion_norm * weights.discussion
        + kw_match * weights.keyword_match;
    let viral_score = base * creator_mult * freshness;

    let explanation = build_explanation(velocity_raw, interaction_raw, freshness, video.author_followers, kw_match);

    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(
            video_id = %video.video_id,
            viral_score,
            velocity_norm,
            interaction_norm,
            discussion_norm,
            creator_mult,
            freshness,
            "computed viral score"
        );
    }

    ViralScoreBreakdown {
        viral_score,
        velocity_norm,
        interaction_norm,
        discussion_norm,
        keyword_match: kw_match,
        creator_multiplier: creator_mult,
        freshness,
        explanation,
    }
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
    fn small_creator_breakout_scores_high() {
        let mut v = video();
        v.views = 8_000;
        v.likes = 900;
        v.comments = 80;
        v.shares = 40;
        v.author_followers = 12_000;
        v.duration = 22;

        let breakdown = compute_viral_score(
            &v,
            &[],
            &ViralScoreWeights::default(),
            &CreatorMultiplierConfig::default(),
            &FreshnessConfig::default(),
        );

        assert_eq!(breakdown.creator_multiplier, 1.35);
        assert_eq!(breakdown.freshness, 1.4);
        assert!(breakdown.viral_score > 1.0);
        assert!(breakdown.explanation.contains("small creator"));
    }

    #[test]
    fn dead_viral_has_low_interaction_norm() {
        let mut v = video();
        v.publish_time = Some(Utc::now() - Duration::hours(96));
        v.views = 500_000;
        v.likes = 1_000;
        v.comments = 10;
        v.shares = 5;
        v.author_followers = 5_000_000;

        let breakdown = compute_viral_score(
            &v,
            &[],
            &ViralScoreWeights::default(),
            &CreatorMultiplierConfig::default(),
            &FreshnessConfig::default(),
        );
        assert_eq!(breakdown.creator_multiplier, 0.85);
        assert_eq!(breakdown.freshness, 0.7);
        assert!(breakdown.interaction_norm < 0.3);
    }

    #[test]
    fn keyword_match_checks_title_description_and_hashtags() {
        let mut v = video();
        v.title = "nothing relevant".into();
        v.description = "also nothing".into();
        v.hashtags = vec!["CoolTrend".into()];
        let breakdown = compute_viral_score(
            &v,
            &["cooltrend".to_string()],
            &ViralScoreWeights::default(),
            &CreatorMultiplierConfig::default(),
            &FreshnessConfig::default(),
        );
        assert_eq!(breakdown.keyword_match, 1.0);
    }

    #[test]
    fn no_keywords_means_no_match() {
        let v = video();
        let breakdown = compute_viral_score(
            &v,
            &[],
            &ViralScoreWeights::default(),
            &CreatorMultiplierConfig::default(),
            &FreshnessConfig::default(),
        );
        assert_eq!(breakdown.keyword_match, 0.0);
    }
}
