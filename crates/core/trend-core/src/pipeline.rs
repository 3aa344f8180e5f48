//! The pipeline orchestrator (§4.6): composes the age-aware filter, the
//! viral scorer, the pluggable quality classifier, and the quality gate
//! into a single pass over a batch of videos. Ported from
//! `services/viral_pipeline.py`.

use crate::classifier::QualityClassifier;
use crate::filter::age_aware_filter_batch;
use crate::gate::{apply_quality_gate, GateResult};
use crate::scoring::{compute_viral_score, ViralScoreBreakdown};
use crate::tuning::TuningConfig;
use crate::video::Video;

/// Summary counters from one pipeline pass, independent of the final
/// quality-gate decision (the worker layers the gate on top separately —
/// see [`run_pipeline`], which already includes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Videos given to the pipeline.
    pub total_input: usize,
    /// Videos that survived the age-aware filter (including any promoted
    /// by the batch safety floor).
    pub after_filter: usize,
    /// Videos originally rejected by the age-aware filter, before the
    /// safety-floor promotion.
    pub rejected_by_filter: usize,
    /// Videos kept by the quality classifier out of the slice it was run
    /// on.
    pub after_classifier: usize,
}

/// Runs the age-aware filter, scorer, and (optionally) classifier, and
/// returns every surviving `(video, penalized_breakdown)` pair sorted
/// descending by penalized `viral_score`, plus the quality gate's
/// decisions over that output.
///
/// Never returns an empty `ranked` list when `videos` is non-empty — the
/// tail (everything past the classifier's top slice) always passes
/// through untouched.
pub struct PipelineOutput<'a> {
    /// Every surviving video, sorted descending by penalized viral score.
    pub ranked: Vec<(&'a Video, ViralScoreBreakdown)>,
    /// The quality gate's accept decisions over `ranked`.
    pub gated: Vec<GateResult<'a>>,
    /// Run statistics for logging/counters.
    pub stats: PipelineStats,
}

/// Runs the full pipeline over one batch: age-aware filter (with safety
/// floor) → score → apply penalty → sort → classify top slice → gate.
pub async fn run_pipeline<'a>(
    videos: &'a [Video],
    topic_keywords: &[String],
    classifier: &dyn QualityClassifier,
    cfg: &TuningConfig,
) -> PipelineOutput<'a> {
    let total_input = videos.len();

    if videos.is_empty() {
        return PipelineOutput {
            ranked: Vec::new(),
            gated: Vec::new(),
            stats: PipelineStats { total_input: 0, after_filter: 0, rejected_by_filter: 0, after_classifier: 0 },
        };
    }

    let (candidates, rejected_by_filter) = age_aware_filter_batch(videos, &cfg.age_filter);
    let after_filter = candidates.len();

    tracing::info!(total_input, after_filter, rejected_by_filter, "age-aware filter applied");

    let mut scored: Vec<(&'a Video, ViralScoreBreakdown)> = candidates
        .into_iter()
        .map(|(video, penalty)| {
            let breakdown = compute_viral_score(
                video,
                topic_keywords,
                &cfg.score_weights,
                &cfg.creator_multiplier,
                &cfg.freshness,
            );
            let penalized = ViralScoreBreakdown { viral_score: breakdown.viral_score * penalty, ..breakdown };
            (video, penalized)
        })
        .collect();

    scored.sort_by(|a, b| b.1.viral_score.partial_cmp(&a.1.viral_score).unwrap_or(std::cmp::Ordering::Equal));

    let n_for_classifier = ((scored.len() as f64) * cfg.classifier_slice.top_fraction)
        .floor()
        .max(cfg.classifier_slice.min_for_classifier as f64) as usize;
    let n_for_classifier = n_for_classifier.min(scored.len());

    let (top_slice, tail) = scored.split_at(n_for_classifier);
    let tail: Vec<(&'a Video, ViralScoreBreakdown)> = tail.to_vec();

    let top_videos: Vec<&Video> = top_slice.iter().map(|(v, _)| *v).collect();
    let kept = classifier.classify(&top_videos).await;
    let after_classifier = kept.len();

    tracing::info!(classified = top_slice.len(), kept = after_classifier, "quality classifier applied");

    let kept_external_ids: std::collections::HashSet<String> =
        kept.iter().map(|v| v.external_id()).collect();
    let kept_from_top: Vec<(&'a Video, ViralScoreBreakdown)> = top_slice
        .iter()
        .filter(|(v, _)| kept_external_ids.contains(&v.external_id()))
        .cloned()
        .collect();

    let mut ranked: Vec<(&'a Video, ViralScoreBreakdown)> = kept_from_top;
    ranked.extend(tail);
    ranked.sort_by(|a, b| b.1.viral_score.partial_cmp(&a.1.viral_score).unwrap_or(std::cmp::Ordering::Equal));

    let items: Vec<(Video, ViralScoreBreakdown)> =
        ranked.iter().map(|(v, b)| ((*v).clone(), b.clone())).collect();
    let gated_owned = apply_quality_gate(&items, &cfg.quality_gate, cfg.output.virality_scale);

    // `apply_quality_gate` borrows from `items` (a local clone), so we
    // re-resolve its results against `ranked`'s original references to
    // hand callers `&'a Video` instead of references into a temporary.
    let gated: Vec<GateResult<'a>> = gated_owned
        .iter()
        .map(|g| {
            let external_id = g.video.external_id();
            let (video, _) = ranked
                .iter()
                .find(|(v, _)| v.external_id() == external_id)
                .expect("gate result must come from `ranked`");
            GateResult { video, breakdown: g.breakdown.clone(), reason: g.reason }
        })
        .collect();

    PipelineOutput {
        ranked,
        gated,
        stats: PipelineStats { total_input, after_filter, rejected_by_filter, after_classifier },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PassThroughClassifier;
    use crate::video::Platform;
    use chrono::{Duration, Utc};

    fn make_video(id: &str, views: u64, likes: u64, hours_old: i64) -> Video {
        let mut v = Video::new(Platform::TikTok, id, format!("https://x/{id}"));
        v.views = views;
        v.likes = likes;
        v.comments = likes / 10;
        v.shares = likes / 20;
        v.publish_time = Some(Utc::now() - Duration::hours(hours_old));
        v
    }

    #[tokio::test]
    async fn never_returns_empty_for_nonempty_input() {
        let videos = vec![make_video("1", 10, 1, 500)]; // weak, old video
        let cfg = TuningConfig::default();
        let out = run_pipeline(&videos, &[], &PassThroughClassifier, &cfg).await;
        assert!(!out.ranked.is_empty());
    }

    #[tokio::test]
    async fn output_sorted_descending_by_penalized_score() {
        let videos = vec![
            make_video("weak", 100, 5, 100),
            make_video("strong", 50_000, 6_000, 1),
        ];
        let cfg = TuningConfig::default();
        let out = run_pipeline(&videos, &[], &PassThroughClassifier, &cfg).await;
        for w in out.ranked.windows(2) {
            assert!(w[0].1.viral_score >= w[1].1.viral_score);
        }
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let videos: Vec<Video> = Vec::new();
        let cfg = TuningConfig::default();
        let out = run_pipeline(&videos, &[], &PassThroughClassifier, &cfg).await;
        assert!(out.ranked.is_empty());
        assert!(out.gated.is_empty());
        assert_eq!(out.stats.total_input, 0);
    }
}
