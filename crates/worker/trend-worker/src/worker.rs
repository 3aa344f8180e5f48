//! The scheduling wrapper around [`crate::cycle::run_cycle`] (§4.9, §5). A
//! simple atomic flag is sufficient for the concurrency model the spec
//! asks for: only the worker ever writes it, and readers only care whether
//! a cycle is currently running. Grounded on the `AtomicBool` guard pattern
//! in `zoey-core::infrastructure::batch::BatchProcessor`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use trend_core::{QualityClassifier, TuningConfig, VideoStore};

use crate::cycle::{run_cycle, CycleStats};
use crate::registry::AdapterRegistry;

/// Owns everything one ingestion cycle needs and schedules cycles on an
/// interval.
pub struct TrendWorker {
    registry: AdapterRegistry,
    store: Box<dyn VideoStore>,
    classifier: Box<dyn QualityClassifier>,
    tuning: TuningConfig,
    dry_run: bool,
    running: Arc<AtomicBool>,
}

impl TrendWorker {
    /// Builds a worker from its fully-wired dependencies.
    pub fn new(
        registry: AdapterRegistry,
        store: Box<dyn VideoStore>,
        classifier: Box<dyn QualityClassifier>,
        tuning: TuningConfig,
        dry_run: bool,
    ) -> Self {
        Self { registry, store, classifier, tuning, dry_run, running: Arc::new(AtomicBool::new(false)) }
    }

    /// Whether a cycle is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs a single cycle, short-circuiting to a zero-stats result if one
    /// is already in flight rather than queuing a second one.
    pub async fn run_cycle(&self) -> CycleStats {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("cycle already running; skipping this trigger");
            return CycleStats { error_message: Some("cycle already in progress".to_string()), ..Default::default() };
        }

        let result = run_cycle(
            self.store.as_ref(),
            &self.registry,
            self.classifier.as_ref(),
            &self.tuning,
            self.dry_run,
        )
        .await;

        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Runs cycles forever on a fixed interval, logging each cycle's
    /// counters. Never returns under normal operation.
    pub async fn run_forever(&self, interval: Duration) -> ! {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let stats = self.run_cycle().await;
            tracing::info!(
                processed = stats.processed,
                viral = stats.viral,
                skipped = stats.skipped,
                errors = stats.errors,
                rejected_filter = stats.rejected_filter,
                error_message = ?stats.error_message,
                "cycle complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use trend_core::domain::{Source, StoredVideo, Topic};
    use trend_core::store::{InsertOutcome, StoreError};
    use trend_core::PassThroughClassifier;

    struct EmptyStore;

    #[async_trait]
    impl VideoStore for EmptyStore {
        async fn list_topics(&self) -> Result<Vec<Topic>, StoreError> {
            Ok(Vec::new())
        }
        async fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
            Ok(Vec::new())
        }
        async fn insert_video(&self, _record: StoredVideo) -> Result<InsertOutcome, StoreError> {
            Ok(InsertOutcome::Inserted)
        }
        async fn exists_by_external_id(&self, _external_id: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    fn worker() -> TrendWorker {
        TrendWorker::new(
            AdapterRegistry::new(),
            Box::new(EmptyStore),
            Box::new(PassThroughClassifier),
            TuningConfig::default(),
            false,
        )
    }

    #[tokio::test]
    async fn flag_is_clear_before_and_after_a_cycle() {
        let w = worker();
        assert!(!w.is_running());
        let stats = w.run_cycle().await;
        assert!(!w.is_running());
        assert_eq!(stats.error_message.as_deref(), Some("no topics configured"));
    }

    #[tokio::test]
    async fn second_call_while_running_would_short_circuit() {
        // EmptyStore resolves the first call instantly, so we can't
        // observe true overlap here; this instead locks in that the guard
        // clears on every exit path including the "no topics" early return.
        let w = worker();
        w.running.store(true, Ordering::SeqCst);
        let stats = w.run_cycle().await;
        assert_eq!(stats.error_message.as_deref(), Some("cycle already in progress"));
        assert!(w.is_running(), "short-circuit path must not clear a flag it didn't set");
    }
}
