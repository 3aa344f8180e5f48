//! Minimal Apify REST client, identical in shape to the TikTok adapter's —
//! each adapter crate owns its own copy since neither depends on the
//! other. Ported from `adapters/apify/apify_client.py::run_actor`.

use serde_json::Value;
use trend_core::{AdapterError, AdapterLimits};

const CREDITS_KEYWORDS: &[&str] =
    &["credit", "usage limit", "quota", "exceeded", "plan limit", "insufficient"];

fn is_credits_error(body: &str) -> bool {
    let lower = body.to_lowercase();
    CREDITS_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Runs `actor_id` with `run_input`, retrying transient failures per
/// `limits.retry`. Only raises [`AdapterError::CreditsExhausted`]; everything
/// else yields an empty list after retries are exhausted.
pub async fn run_actor(
    client: &reqwest::Client,
    actor_id: &str,
    run_input: &Value,
    token: &str,
    limits: &AdapterLimits,
) -> Result<Vec<Value>, AdapterError> {
    if token.is_empty() {
        tracing::warn!("apify token not set, skipping run");
        return Ok(Vec::new());
    }

    let url = format!(
        "https://api.apify.com/v2/acts/{actor_id}/run-sync-get-dataset-items?token={token}"
    );
    let retries = limits.retry.attempts.saturating_sub(1);

    for attempt in 0..=retries {
        let resp = client.post(&url).timeout(limits.timeout).json(run_input).send().await;
        match resp {
            Ok(response) if response.status().is_success() => {
                return response
                    .json::<Vec<Value>>()
                    .await
                    .map_err(|e| AdapterError::Other(format!("apify response parse failed: {e}")));
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(actor_id, %status, "apify run failed");
                if is_credits_error(&body) {
                    return Err(AdapterError::CreditsExhausted { platform: "reels".into() });
                }
            }
            Err(e) => {
                tracing::warn!(actor_id, error = %e, "apify request failed");
            }
        }
        if attempt < retries {
            tokio::time::sleep(limits.retry.base_delay * (attempt + 1)).await;
        }
    }
    Ok(Vec::new())
}
