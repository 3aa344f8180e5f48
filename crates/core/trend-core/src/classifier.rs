//! The pluggable quality classifier (§4.7). Its actual behavior is
//! model-dependent and out of scope for this crate; what's specified here
//! is the contract the pipeline orchestrator calls through.

use crate::video::Video;
use async_trait::async_trait;

/// A pluggable keep/discard classifier run over the top slice of scored
/// candidates. Implementations may call an LLM, a heuristic, or be a
/// pass-through — the orchestrator only requires that, for a fixed input,
/// the same subset is kept every time it's called (stable from the
/// pipeline's perspective).
///
/// This is a pure filter: it never reorders or ranks, only partitions into
/// keep/discard.
#[async_trait]
pub trait QualityClassifier: Send + Sync {
    /// Returns the subset of `videos` to keep. On internal error,
    /// implementations should default to keeping the item rather than
    /// losing potentially-good content (mirrors `ai_quality_filter`'s
    /// except-then-keep behavior in the original implementation).
    async fn classify<'a>(&self, videos: &[&'a Video]) -> Vec<&'a Video>;
}

/// A classifier that keeps everything. Used where no model-backed
/// classifier is configured, and as the default in tests.
pub struct PassThroughClassifier;

#[async_trait]
impl QualityClassifier for PassThroughClassifier {
    async fn classify<'a>(&self, videos: &[&'a Video]) -> Vec<&'a Video> {
        videos.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Platform;

    #[tokio::test]
    async fn pass_through_keeps_everything() {
        let v1 = Video::new(Platform::TikTok, "1", "https://x");
        let v2 = Video::new(Platform::TikTok, "2", "https://y");
        let refs = vec![&v1, &v2];
        let kept = PassThroughClassifier.classify(&refs).await;
        assert_eq!(kept.len(), 2);
    }
}
