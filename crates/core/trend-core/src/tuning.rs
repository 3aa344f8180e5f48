//! Threshold and weight tables for the age-aware filter, viral scorer, and
//! quality gate. Ported from the original `viral_config.py` dataclasses —
//! every magic number used by [`crate::filter`], [`crate::scoring`], and
//! [`crate::gate`] lives here, not inline.

/// One age bucket's dynamic minimums: `(max_hours, min_views, min_likes,
/// min_views_per_hour, min_engagement)`.
#[derive(Debug, Clone, Copy)]
pub struct AgeBucket {
    /// Upper bound of this bucket, in hours since publish.
    pub max_hours: f64,
    /// Minimum view count to avoid the views penalty.
    pub min_views: u64,
    /// Minimum like count to avoid the likes penalty.
    pub min_likes: u64,
    /// Minimum views-per-hour to avoid the velocity penalty.
    pub min_vph: f64,
    /// Minimum engagement rate to avoid the engagement penalty.
    pub min_engagement: f64,
}

/// Age-aware soft filter configuration (§4.4).
#[derive(Debug, Clone, Copy)]
pub struct AgeAwareFilterConfig {
    /// Reject only when the computed penalty drops below this.
    pub min_penalty_to_keep: f64,
    /// Videos younger than this many hours get early-age protection.
    pub early_age_hours: f64,
    /// Minimum views for unconditional early-age pass.
    pub early_age_min_views: u64,
    /// Age buckets, checked in order; the last one has no upper bound.
    pub buckets: [AgeBucket; 5],
    /// Multiplier applied when views are below the bucket minimum.
    pub penalty_views: f64,
    /// Multiplier applied when likes are below the bucket minimum.
    pub penalty_likes: f64,
    /// Multiplier applied when views-per-hour is below the bucket minimum.
    pub penalty_vph: f64,
    /// Multiplier applied when engagement rate is below the bucket minimum.
    pub penalty_engagement: f64,
    /// Duration (seconds) above which the optional duration penalty applies.
    pub max_duration_seconds: u64,
    /// Optional penalty for videos longer than `max_duration_seconds`.
    pub penalty_duration: f64,
    /// Optional penalty for videos with comments disabled.
    pub penalty_comments_disabled: f64,
    /// Batch safety floor: promote rejected items until at least this many
    /// have passed, provided the input batch is at least this large.
    pub min_candidates: usize,
}

impl Default for AgeAwareFilterConfig {
    fn default() -> Self {
        Self {
            min_penalty_to_keep: 0.25,
            early_age_hours: 2.0,
            early_age_min_views: 30,
            buckets: [
                AgeBucket { max_hours: 1.0, min_views: 50, min_likes: 5, min_vph: 10.0, min_engagement: 0.010 },
                AgeBucket { max_hours: 6.0, min_views: 300, min_likes: 20, min_vph: 25.0, min_engagement: 0.020 },
                AgeBucket { max_hours: 24.0, min_views: 1_000, min_likes: 60, min_vph: 40.0, min_engagement: 0.025 },
                AgeBucket { max_hours: 72.0, min_views: 4_000, min_likes: 200, min_vph: 60.0, min_engagement: 0.030 },
                AgeBucket { max_hours: f64::INFINITY, min_views: 10_000, min_likes: 400, min_vph: 80.0, min_engagement: 0.035 },
            ],
            penalty_views: 0.7,
            penalty_likes: 0.7,
            penalty_vph: 0.6,
            penalty_engagement: 0.6,
            max_duration_seconds: 120,
            penalty_duration: 0.5,
            penalty_comments_disabled: 0.5,
            min_candidates: 40,
        }
    }
}

/// Stage-5 component weights in the final viral score (§4.5).
#[derive(Debug, Clone, Copy)]
pub struct ViralScoreWeights {
    /// Weight on the log-normalized velocity signal.
    pub velocity: f64,
    /// Weight on the log-normalized interaction (engagement) signal.
    pub interaction: f64,
    /// Weight on the log-normalized discussion signal.
    pub discussion: f64,
    /// Weight on the binary keyword-match signal.
    pub keyword_match: f64,
}

impl Default for ViralScoreWeights {
    fn default() -> Self {
        Self { velocity: 0.45, interaction: 0.30, discussion: 0.15, keyword_match: 0.10 }
    }
}

/// Stage-3 small-creator boost thresholds, by follower count (§4.5).
#[derive(Debug, Clone, Copy)]
pub struct CreatorMultiplierConfig {
    /// Multiplier for creators with fewer than `threshold_50k` followers.
    pub boost_50k: f64,
    /// Multiplier for creators with fewer than `threshold_150k` followers.
    pub boost_150k: f64,
    /// Multiplier for creators with fewer than `threshold_500k` followers.
    pub boost_500k: f64,
    /// Multiplier for creators with more than `threshold_2m` followers.
    pub penalty_2m: f64,
    /// Follower threshold for `boost_50k`.
    pub threshold_50k: u64,
    /// Follower threshold for `boost_150k`.
    pub threshold_150k: u64,
    /// Follower threshold for `boost_500k`.
    pub threshold_500k: u64,
    /// Follower threshold for `penalty_2m`.
    pub threshold_2m: u64,
}

impl Default for CreatorMultiplierConfig {
    fn default() -> Self {
        Self {
            boost_50k: 1.35,
            boost_150k: 1.20,
            boost_500k: 1.05,
            penalty_2m: 0.85,
            threshold_50k: 50_000,
            threshold_150k: 150_000,
            threshold_500k: 500_000,
            threshold_2m: 2_000_000,
        }
    }
}

/// Stage-4 freshness weight table, by hours since publish (§4.3/§4.5).
#[derive(Debug, Clone, Copy)]
pub struct FreshnessConfig {
    /// Weight for videos at most `hours_2` hours old.
    pub w_2h: f64,
    /// Weight for videos at most `hours_6` hours old.
    pub w_6h: f64,
    /// Weight for videos at most `hours_18` hours old.
    pub w_18h: f64,
    /// Weight for videos at most `hours_48` hours old.
    pub w_48h: f64,
    /// Weight for videos older than `hours_48`.
    pub w_older: f64,
    /// Upper bound, in hours, for the `w_2h` weight.
    pub hours_2: f64,
    /// Upper bound, in hours, for the `w_6h` weight.
    pub hours_6: f64,
    /// Upper bound, in hours, for the `w_18h` weight.
    pub hours_18: f64,
    /// Upper bound, in hours, for the `w_48h` weight.
    pub hours_48: f64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            w_2h: 1.6,
            w_6h: 1.4,
            w_18h: 1.2,
            w_48h: 1.0,
            w_older: 0.7,
            hours_2: 2.0,
            hours_6: 6.0,
            hours_18: 18.0,
            hours_48: 48.0,
        }
    }
}

/// Stage-6 quality-classifier slicing configuration (§4.6).
#[derive(Debug, Clone, Copy)]
pub struct ClassifierSliceConfig {
    /// Run the classifier on at least this fraction of the (sorted) batch.
    pub top_fraction: f64,
    /// Run the classifier on at least this many videos, regardless of
    /// `top_fraction`.
    pub min_for_classifier: usize,
}

impl Default for ClassifierSliceConfig {
    fn default() -> Self {
        Self { top_fraction: 0.30, min_for_classifier: 5 }
    }
}

/// Output-mapping configuration (§4.9, §6).
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// `is_viral` is true when `viral_score` is at least this.
    pub viral_score_threshold: f64,
    /// Multiplier mapping `viral_score` onto a `[0, 10]` scale.
    pub virality_scale: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { viral_score_threshold: 1.5, virality_scale: 2.5 }
    }
}

/// Quality-gate accept/reject/fallback configuration (§4.8).
#[derive(Debug, Clone, Copy)]
pub struct QualityGateConfig {
    /// `quality_score >= this` is accepted outright (`HIGH_QUALITY`).
    pub quality_threshold: f64,
    /// `quality_score` in `[borderline_threshold, quality_threshold)` is
    /// `BORDERLINE`; below this is rejected outright.
    pub borderline_threshold: f64,
    /// Minimum accepted count; the borderline pool fills the gap.
    pub min_results: usize,
    /// A borderline video in the top fraction of the batch by raw
    /// `viral_score` is accepted unconditionally.
    pub top_fraction_borderline: f64,
    /// A borderline video with `engagement_rate` above this is accepted.
    pub engagement_threshold: f64,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 7.0,
            borderline_threshold: 6.2,
            min_results: 15,
            top_fraction_borderline: 0.30,
            engagement_threshold: 0.08,
        }
    }
}

/// All tuning tables bundled together, so the pipeline orchestrator can
/// carry a single value instead of threading five configs through its
/// call graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct TuningConfig {
    /// See [`AgeAwareFilterConfig`].
    pub age_filter: AgeAwareFilterConfig,
    /// See [`ViralScoreWeights`].
    pub score_weights: ViralScoreWeights,
    /// See [`CreatorMultiplierConfig`].
    pub creator_multiplier: CreatorMultiplierConfig,
    /// See [`FreshnessConfig`].
    pub freshness: FreshnessConfig,
    /// See [`ClassifierSliceConfig`].
    pub classifier_slice: ClassifierSliceConfig,
    /// See [`OutputConfig`].
    pub output: OutputConfig,
    /// See [`QualityGateConfig`].
    pub quality_gate: QualityGateConfig,
}
