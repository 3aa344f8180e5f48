//! One worker cycle (§4.9): load topics/sources, fan out to adapters by
//! platform, merge, dedup, run the pipeline and quality gate, persist.
//! Grounded on `services/collector_service.py` (fan-out/merge) and
//! `services/viral_pipeline.py` (the per-cycle counters it returns).

use std::collections::HashMap;
use trend_core::domain::SourceStatus;
use trend_core::source_url::parse_source_identifier;
use trend_core::{
    dedup::deduplicate, run_pipeline, AdapterError, DecisionReason, Platform, QualityClassifier, StoreError,
    StoredVideo, TuningConfig, VideoStore,
};
use uuid::Uuid;

use crate::registry::AdapterRegistry;

/// Counters returned by one worker cycle (§4.9, §8).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleStats {
    /// Videos that reached a store decision (inserted or skipped).
    pub processed: u64,
    /// Accepted rows with `is_viral == true`.
    pub viral: u64,
    /// Rows skipped due to a uniqueness conflict.
    pub skipped: u64,
    /// Store or platform-level failures.
    pub errors: u64,
    /// Videos rejected by the age-aware filter or quality gate.
    pub rejected_filter: u64,
    /// Human-readable summary of any platform-level failure this cycle.
    pub error_message: Option<String>,
}

impl CycleStats {
    fn push_error_message(&mut self, msg: String) {
        match &mut self.error_message {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(&msg);
            }
            None => self.error_message = Some(msg),
        }
    }
}

/// Runs one full ingestion cycle against `store`, `registry`, and
/// `classifier`. Never panics on adapter or store failures; every failure
/// mode is folded into [`CycleStats`].
pub async fn run_cycle(
    store: &dyn VideoStore,
    registry: &AdapterRegistry,
    classifier: &dyn QualityClassifier,
    tuning: &TuningConfig,
    dry_run: bool,
) -> CycleStats {
    let mut stats = CycleStats::default();

    let topics = match store.list_topics().await {
        Ok(t) => t,
        Err(e) => {
            stats.errors += 1;
            stats.error_message = Some(format!("failed to load topics: {e}"));
            return stats;
        }
    };
    if topics.is_empty() {
        stats.error_message = Some("no topics configured".to_string());
        return stats;
    }

    let sources = match store.list_sources().await {
        Ok(s) => s,
        Err(e) => {
            stats.errors += 1;
            stats.error_message = Some(format!("failed to load sources: {e}"));
            return stats;
        }
    };
    let active_sources: Vec<_> = sources.into_iter().filter(|s| s.status == SourceStatus::Active).collect();
    if active_sources.is_empty() {
        stats.error_message = Some("no active sources".to_string());
        return stats;
    }

    let mut by_platform: HashMap<Platform, Vec<(Uuid, String)>> = HashMap::new();
    for source in &active_sources {
        if let Some(identifier) = parse_source_identifier(source.platform, &source.url) {
            by_platform.entry(source.platform).or_default().push((source.id, identifier));
        }
    }

    let (tiktok_result, reels_result, youtube_result) = tokio::join!(
        fetch_platform(registry, Platform::TikTok, by_platform.get(&Platform::TikTok).cloned().unwrap_or_default()),
        fetch_platform(registry, Platform::Reels, by_platform.get(&Platform::Reels).cloned().unwrap_or_default()),
        fetch_platform(registry, Platform::YouTube, by_platform.get(&Platform::YouTube).cloned().unwrap_or_default()),
    );

    let mut all_videos = Vec::new();
    for (platform, result) in [
        (Platform::TikTok, tiktok_result),
        (Platform::Reels, reels_result),
        (Platform::YouTube, youtube_result),
    ] {
        match result {
            Ok(videos) => all_videos.extend(videos),
            Err(AdapterError::CreditsExhausted { platform: p }) => {
                stats.errors += 1;
                stats.push_error_message(format!("{p} credits exhausted"));
            }
            Err(AdapterError::Other(msg)) => {
                stats.errors += 1;
                stats.push_error_message(format!("{platform} adapter error: {msg}"));
            }
        }
    }

    let deduped = deduplicate(&all_videos);

    let topic_keywords: Vec<String> = topics.iter().map(|t| t.keyword.clone()).collect();
    let output = run_pipeline(&deduped, &topic_keywords, classifier, tuning).await;
    stats.rejected_filter = output.stats.rejected_by_filter as u64;

    let rejected_by_gate = output.ranked.len().saturating_sub(output.gated.len());
    stats.rejected_filter += rejected_by_gate as u64;

    let source_by_platform: HashMap<Platform, Uuid> = active_sources
        .iter()
        .map(|s| (s.platform, s.id))
        .collect::<HashMap<_, _>>();

    for gate_result in &output.gated {
        let video = gate_result.video;
        let viral_score = gate_result.breakdown.viral_score;
        let virality_score = (viral_score * tuning.output.virality_scale).round().clamp(1.0, 10.0) as u8;
        let is_viral = viral_score >= tuning.output.viral_score_threshold;

        let record = StoredVideo {
            id: Uuid::new_v4(),
            source_id: source_by_platform.get(&video.platform).copied().unwrap_or_else(Uuid::new_v4),
            external_id: video.external_id(),
            title: video.title.clone(),
            description: video.description.clone(),
            ai_summary: Some(gate_result.breakdown.explanation.chars().take(2000).collect()),
            virality_score,
            is_viral,
            storage_path: Some(video.url.clone()),
            quality_decision_reason: gate_result.reason.as_str().to_string(),
            created_at: chrono::Utc::now(),
        };

        if dry_run {
            tracing::info!(external_id = %record.external_id, virality_score, "dry run: would insert");
            stats.processed += 1;
            if is_viral {
                stats.viral += 1;
            }
            continue;
        }

        match store.insert_video(record).await {
            Ok(trend_core::InsertOutcome::Inserted) => {
                stats.processed += 1;
                if is_viral {
                    stats.viral += 1;
                }
            }
            Ok(trend_core::InsertOutcome::Conflict(_)) => stats.skipped += 1,
            Err(StoreError(msg)) => {
                stats.errors += 1;
                stats.push_error_message(format!("store error: {msg}"));
            }
        }
    }

    // Mentioning the accepted decision mix keeps `DecisionReason::FallbackFill`
    // reachable from the cycle's own logs, not only the gate's.
    if tracing::enabled!(tracing::Level::DEBUG) {
        let fallback_count = output.gated.iter().filter(|g| g.reason == DecisionReason::FallbackFill).count();
        tracing::debug!(fallback_count, "cycle decision mix");
    }

    stats
}

async fn fetch_platform(
    registry: &AdapterRegistry,
    platform: Platform,
    entries: Vec<(Uuid, String)>,
) -> Result<Vec<trend_core::Video>, AdapterError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    let identifiers: Vec<String> = entries.into_iter().map(|(_, id)| id).collect();
    registry.fetch_from_sources(platform, &identifiers).await
}
