//! [`VideoStore`] implementation against Supabase's PostgREST API. Ported
//! from `zoey-storage-supabase::SupabaseAdapter`, generalized to this
//! crate's four-operation contract, and from `database.py`'s `TableClient`
//! for which operations the worker actually needs.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use trend_core::domain::{Source, StoredVideo, Topic};
use trend_core::store::{InsertOutcome, StoreError, VideoStore};

/// Supabase project connection details.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xxxx.supabase.co`.
    pub url: String,
    /// Service role key (required for writes past row-level security).
    pub service_key: String,
}

impl SupabaseConfig {
    /// Builds a config from a project URL and service key.
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self { url: url.into(), service_key: service_key.into() }
    }
}

/// [`VideoStore`] backed by Supabase's auto-generated PostgREST API.
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseStore {
    /// Connects to Supabase, building a client with `apikey`/`Authorization`
    /// headers set once, and verifies reachability with a lightweight GET.
    pub async fn new(config: SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "apikey",
            header::HeaderValue::from_str(&config.service_key)
                .map_err(|e| StoreError(format!("invalid service key: {e}")))?,
        );
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.service_key))
                .map_err(|e| StoreError(format!("invalid service key: {e}")))?,
        );
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        headers.insert("Prefer", header::HeaderValue::from_static("return=representation"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError(format!("failed to build HTTP client: {e}")))?;

        let health_url = format!("{}/rest/v1/", config.url);
        client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| StoreError(format!("failed to connect to Supabase: {e}")))?;

        tracing::info!(url = %config.url, "connected to Supabase");

        Ok(Self { config, client })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    async fn select<T: for<'de> serde::Deserialize<'de>>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}?{}", self.table_url(table), query);
        let response = self.client.get(&url).send().await.map_err(|e| StoreError(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError(format!("Supabase query failed ({status}): {body}")));
        }

        response.json().await.map_err(|e| StoreError(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl VideoStore for SupabaseStore {
    async fn list_topics(&self) -> Result<Vec<Topic>, StoreError> {
        self.select("topics", "select=*").await
    }

    async fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
        self.select("sources", "select=*").await
    }

    async fn insert_video(&self, record: StoredVideo) -> Result<InsertOutcome, StoreError> {
        let url = self.table_url("videos");
        let external_id = record.external_id.clone();

        let response = self
            .client
            .post(&url)
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError(format!("insert failed: {e}")))?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(InsertOutcome::Conflict(external_id));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError(format!("Supabase insert failed ({status}): {body}")));
        }

        Ok(InsertOutcome::Inserted)
    }

    async fn exists_by_external_id(&self, external_id: &str) -> Result<bool, StoreError> {
        let query = format!("external_id=eq.{external_id}&select=id&limit=1");
        let rows: Vec<serde_json::Value> = self.select("videos", &query).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_joins_project_url_and_table() {
        let store = SupabaseStore {
            config: SupabaseConfig::new("https://example.supabase.co", "key"),
            client: Client::new(),
        };
        assert_eq!(store.table_url("videos"), "https://example.supabase.co/rest/v1/videos");
    }
}
