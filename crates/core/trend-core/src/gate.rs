//! The quality gate (§4.8): the accept/reject policy applied to the
//! orchestrator's output before persistence. Ported from
//! `services/quality_gate.py`.

use crate::metrics::engagement_rate;
use crate::scoring::ViralScoreBreakdown;
use crate::tuning::QualityGateConfig;
use crate::video::Video;

/// Which reason a video was accepted (or, if absent, it was rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// `quality_score >= quality_threshold`.
    AcceptedHighQuality,
    /// Borderline, but in the top fraction of the batch by raw viral score.
    AcceptedBorderlineHighViral,
    /// Borderline, with engagement rate above the borderline threshold.
    AcceptedBorderlineEngagement,
    /// Borderline but otherwise unremarkable; only accepted to satisfy the
    /// minimum-results fallback.
    FallbackFill,
}

impl DecisionReason {
    /// The string persisted as `StoredVideo::quality_decision_reason`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::AcceptedHighQuality => "accepted_high_quality",
            DecisionReason::AcceptedBorderlineHighViral => "accepted_borderline_high_viral",
            DecisionReason::AcceptedBorderlineEngagement => "accepted_borderline_engagement",
            DecisionReason::FallbackFill => "fallback_fill",
        }
    }
}

/// One video that survived the quality gate, carrying its decision reason.
#[derive(Debug, Clone)]
pub struct GateResult<'a> {
    /// The accepted video.
    pub video: &'a Video,
    /// Its (penalized) score breakdown.
    pub breakdown: ViralScoreBreakdown,
    /// Why it was accepted.
    pub reason: DecisionReason,
}

fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

enum Zone {
    High,
    Borderline,
    Low,
}

fn classify(quality_score: f64, cfg: &QualityGateConfig) -> Zone {
    if quality_score >= cfg.quality_threshold {
        Zone::High
    } else if quality_score >= cfg.borderline_threshold {
        Zone::Borderline
    } else {
        Zone::Low
    }
}

/// Applies the quality gate to the orchestrator's scored, sorted output.
///
/// `items` must already be sorted descending by (penalized) `viral_score`
/// — the orchestrator guarantees this, and the gate relies on it to find
/// the top fraction of the batch by position rather than re-sorting.
/// `virality_scale` maps `viral_score` onto the `[0, 10]` quality scale
/// (§6, §4.9: `quality_score = clamp(viral_score * scale, 0, 10)`).
///
/// Never returns empty unless `items` is empty.
pub fn apply_quality_gate<'a>(
    items: &'a [(Video, ViralScoreBreakdown)],
    cfg: &QualityGateConfig,
    virality_scale: f64,
) -> Vec<GateResult<'a>> {
    let n_total = items.len();
    if n_total == 0 {
        return Vec::new();
    }
    let top_count = ((n_total as f64) * cfg.top_fraction_borderline).floor().max(1.0) as usize;

    let mut accepted: Vec<GateResult<'a>> = Vec::new();
    let mut borderline_pool: Vec<(&'a Video, ViralScoreBreakdown)> = Vec::new();

    for (i, (video, breakdown)) in items.iter().enumerate() {
        let quality_score = clamp(breakdown.viral_score * virality_scale, 0.0, 10.0);
        match classify(quality_score, cfg) {
            Zone::High => accepted.push(GateResult {
                video,
                breakdown: breakdown.clone(),
                reason: DecisionReason::AcceptedHighQuality,
            }),
            Zone::Borderline => {
                if i < top_count {
                    accepted.push(GateResult {
                        video,
                        breakdown: breakdown.clone(),
                        reason: DecisionReason::AcceptedBorderlineHighViral,
                    });
                } else if engagement_rate(video) > cfg.engagement_threshold {
                    accepted.push(GateResult {
                        video,
                        breakdown: breakdown.clone(),
                        reason: DecisionReason::AcceptedBorderlineEngagement,
                    });
                } else {
                    borderline_pool.push((video, breakdown.clone()));
                }
            }
            Zone::Low => {}
        }
    }

    borderline_pool.sort_by(|a, b| {
        b.1.viral_score.partial_cmp(&a.1.viral_score).unwrap_or(std::cmp::Ordering::Equal)
    });

    if accepted.len() < cfg.min_results {
        let needed = cfg.min_results - accepted.len();
        for (video, breakdown) in borderline_pool.into_iter().take(needed) {
            accepted.push(GateResult { video, breakdown, reason: DecisionReason::FallbackFill });
        }
    }

    tracing::info!(
        accepted = accepted.len(),
        high = accepted.iter().filter(|r| r.reason == DecisionReason::AcceptedHighQuality).count(),
        borderline = accepted
            .iter()
            .filter(|r| matches!(
                r.reason,
                DecisionReason::AcceptedBorderlineHighViral | DecisionReason::AcceptedBorderlineEngagement
            ))
            .count(),
        fallback = accepted.iter().filter(|r| r.reason == DecisionReason::FallbackFill).count(),
        "quality gate decision"
    );

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Platform;

    const SCALE: f64 = 2.5;

    fn item(score: f64, views: u64, likes: u64) -> (Video, ViralScoreBreakdown) {
        let mut v = Video::new(Platform::TikTok, views.to_string(), "https://x");
        v.views = views;
        v.likes = likes;
        let breakdown = ViralScoreBreakdown {
            viral_score: score,
            velocity_norm: 0.0,
            interaction_norm: 0.0,
            discussion_norm: 0.0,
            keyword_match: 0.0,
            creator_multiplier: 1.0,
            freshness: 1.0,
            explanation: String::new(),
        };
        (v, breakdown)
    }

    #[test]
    fn high_quality_is_accepted() {
        let items = vec![item(3.0, 1000, 100)]; // quality_score = 7.5
        let cfg = QualityGateConfig::default();
        let result = apply_quality_gate(&items, &cfg, SCALE);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].reason, DecisionReason::AcceptedHighQuality);
    }

    #[test]
    fn low_quality_is_rejected_unless_fallback_needed() {
        let items: Vec<_> = (0..20).map(|i| item(0.01 * i as f64, 10, 1)).collect();
        let cfg = QualityGateConfig::default();
        let result = apply_quality_gate(&items, &cfg, SCALE);
        // none reach borderline/high, fallback pool is empty -> empty result
        assert!(result.is_empty());
    }

    #[test]
    fn fallback_fill_tops_up_to_min_results() {
        let cfg = QualityGateConfig::default();
        // one clearly high-quality item, plus borderline items with low
        // engagement that won't qualify via the high-viral or
        // high-engagement paths and so land in the fallback pool.
        let mut mixed = vec![item(3.0, 1000, 100)];
        for _ in 0..19 {
            mixed.push(item(2.6, 10_000, 10)); // quality_score = 6.5
        }
        let result = apply_quality_gate(&mixed, &cfg, SCALE);
        assert!(result.len() >= cfg.min_results.min(mixed.len()));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let items: Vec<(Video, ViralScoreBreakdown)> = Vec::new();
        let cfg = QualityGateConfig::default();
        assert!(apply_quality_gate(&items, &cfg, SCALE).is_empty());
    }
}
