//! Per-platform adapter registries (§9 "pluggable scrapers"): each platform
//! may be served by more than one adapter instance (e.g. a native scraper
//! alongside a hosted one); their results are merged before deduplication.
//! Grounded on `services/collector_service.py::_get_adapters`, which keeps
//! one list of adapter instances per platform and concatenates their
//! output before the dedup stage runs.

use trend_core::{AdapterError, Platform, PlatformAdapter, Video};

/// Holds every configured [`PlatformAdapter`] for one [`Platform`], in the
/// order their results should be merged.
pub struct AdapterRegistry {
    adapters: Vec<(Platform, Vec<Box<dyn PlatformAdapter>>)>,
}

impl AdapterRegistry {
    /// Builds an empty registry.
    pub fn new() -> Self {
        Self { adapters: Vec::new() }
    }

    /// Registers an adapter under its own [`PlatformAdapter::platform`].
    pub fn register(&mut self, adapter: Box<dyn PlatformAdapter>) {
        let platform = adapter.platform();
        if let Some((_, list)) = self.adapters.iter_mut().find(|(p, _)| *p == platform) {
            list.push(adapter);
        } else {
            self.adapters.push((platform, vec![adapter]));
        }
    }

    /// Fetches from every adapter registered for `platform`, concatenating
    /// their results. Returns [`AdapterError::CreditsExhausted`] as soon as
    /// any adapter for this platform raises it — the caller isolates this
    /// per platform, so one platform's exhaustion does not affect others.
    pub async fn fetch_from_sources(
        &self,
        platform: Platform,
        channel_list: &[String],
    ) -> Result<Vec<Video>, AdapterError> {
        let mut merged = Vec::new();
        if let Some((_, list)) = self.adapters.iter().find(|(p, _)| *p == platform) {
            for adapter in list {
                let videos = adapter.fetch_from_sources(channel_list).await?;
                merged.extend(videos);
            }
        }
        Ok(merged)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubAdapter {
        platform: Platform,
        videos: Vec<Video>,
    }

    #[async_trait]
    impl PlatformAdapter for StubAdapter {
        fn platform(&self) -> Platform {
            self.platform
        }
        async fn fetch_from_sources(&self, _channel_list: &[String]) -> Result<Vec<Video>, AdapterError> {
            Ok(self.videos.clone())
        }
    }

    fn video(id: &str) -> Video {
        Video::new(Platform::TikTok, id, format!("https://x/{id}"))
    }

    #[tokio::test]
    async fn merges_results_from_multiple_adapters_for_same_platform() {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(StubAdapter { platform: Platform::TikTok, videos: vec![video("1")] }));
        registry.register(Box::new(StubAdapter { platform: Platform::TikTok, videos: vec![video("2")] }));

        let result = registry.fetch_from_sources(Platform::TikTok, &[]).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn unregistered_platform_yields_empty() {
        let registry = AdapterRegistry::new();
        let result = registry.fetch_from_sources(Platform::YouTube, &[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn credits_exhausted_propagates() {
        struct FailingAdapter;
        #[async_trait]
        impl PlatformAdapter for FailingAdapter {
            fn platform(&self) -> Platform {
                Platform::TikTok
            }
            async fn fetch_from_sources(&self, _channel_list: &[String]) -> Result<Vec<Video>, AdapterError> {
                Err(AdapterError::CreditsExhausted { platform: "tiktok".into() })
            }
        }
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(FailingAdapter));
        let result = registry.fetch_from_sources(Platform::TikTok, &[]).await;
        assert!(matches!(result, Err(AdapterError::CreditsExhausted { .. })));
    }
}
