//! Environment-driven configuration (§6). Ported from
//! `config/ingestion.py::IngestionSettings`, in the style of
//! `zoey-core::config`'s `dotenvy`-backed env loading.

use crate::error::TrendError;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Loads `.env` from the current or a parent directory. Safe to call more
/// than once; a missing file is not an error, only a missing/unparseable
/// one is.
pub fn load_env() -> crate::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!(path = %path.display(), "loaded environment file");
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(TrendError::Config(format!(
            "failed to parse .env at line {line}, position {pos}"
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("no .env file found, using system environment only");
            Ok(())
        }
        Err(e) => Err(TrendError::Config(format!("failed to load .env: {e}"))),
    }
}

/// Loads environment variables from a specific file.
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> crate::Result<()> {
    dotenvy::from_path(path.as_ref())
        .map_err(|e| TrendError::Config(format!("failed to load {}: {e}", path.as_ref().display())))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Per-platform toggle, derived from `{PLATFORM}_ENABLED` /
/// `{PLATFORM}_TOKEN` / `{PLATFORM}_ACTOR` env vars (§6).
#[derive(Debug, Clone)]
pub struct PlatformCredential {
    /// Whether this platform's adapter should run at all.
    pub enabled: bool,
    /// API token/key, if the adapter needs one.
    pub token: Option<String>,
    /// Apify actor id or similar scraper identity, if applicable.
    pub actor: Option<String>,
}

impl PlatformCredential {
    fn from_env(prefix: &str) -> Self {
        Self {
            enabled: env_bool(&format!("{prefix}_ENABLED"), true),
            token: env::var(format!("{prefix}_TOKEN")).ok(),
            actor: env::var(format!("{prefix}_ACTOR")).ok(),
        }
    }
}

/// Ingestion-wide configuration, loaded once at worker startup (§6).
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Cap on results returned by a single `fetch_from_sources` call.
    pub max_results_per_platform: usize,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Adapter retry attempts on transient failure.
    pub retry_count: u32,
    /// Base delay between adapter retries.
    pub retry_delay: Duration,
    /// Raises the tracing filter to `debug` when set.
    pub debug: bool,
    /// When set, the worker runs the full pipeline but skips persistence.
    pub dry_run: bool,
    /// Minutes between scheduled worker cycles.
    pub worker_interval_minutes: u64,
    /// TikTok credentials/toggle.
    pub tiktok: PlatformCredential,
    /// Instagram Reels credentials/toggle.
    pub reels: PlatformCredential,
    /// YouTube credentials/toggle.
    pub youtube: PlatformCredential,
    /// Supabase project URL.
    pub supabase_url: Option<String>,
    /// Supabase service role key.
    pub supabase_service_key: Option<String>,
}

impl TrendConfig {
    /// Builds configuration from the current process environment. Call
    /// [`load_env`] first if a `.env` file should be consulted.
    pub fn from_env() -> Self {
        Self {
            max_results_per_platform: env_parsed("MAX_RESULTS_PER_PLATFORM", 20),
            request_timeout: Duration::from_secs(env_parsed("REQUEST_TIMEOUT", 30)),
            retry_count: env_parsed("RETRY_COUNT", 3),
            retry_delay: Duration::from_secs_f64(env_parsed("RETRY_DELAY_SECONDS", 2.0)),
            debug: env_bool("DEBUG", false),
            dry_run: env_bool("DRY_RUN", false),
            worker_interval_minutes: env_parsed("WORKER_INTERVAL_MINUTES", 60),
            tiktok: PlatformCredential::from_env("TIKTOK"),
            reels: PlatformCredential::from_env("REELS"),
            youtube: PlatformCredential::from_env("YOUTUBE"),
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY").ok(),
        }
    }

    /// Returns the Supabase URL and key together, or a config error naming
    /// whichever is missing.
    pub fn supabase_credentials(&self) -> crate::Result<(&str, &str)> {
        let url = self
            .supabase_url
            .as_deref()
            .ok_or_else(|| TrendError::Config("SUPABASE_URL is not set".into()))?;
        let key = self
            .supabase_service_key
            .as_deref()
            .ok_or_else(|| TrendError::Config("SUPABASE_SERVICE_KEY is not set".into()))?;
        Ok((url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_spec() {
        let _guard = ENV_LOCK.lock().unwrap();
        for key in ["MAX_RESULTS_PER_PLATFORM", "REQUEST_TIMEOUT", "RETRY_COUNT", "RETRY_DELAY_SECONDS", "DEBUG", "DRY_RUN"] {
            env::remove_var(key);
        }
        let cfg = TrendConfig::from_env();
        assert_eq!(cfg.max_results_per_platform, 20);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.retry_count, 3);
        assert_eq!(cfg.retry_delay, Duration::from_secs_f64(2.0));
        assert!(!cfg.debug);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn platform_enabled_defaults_true_unless_overridden() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("TIKTOK_ENABLED");
        assert!(PlatformCredential::from_env("TIKTOK").enabled);
        env::set_var("TIKTOK_ENABLED", "false");
        assert!(!PlatformCredential::from_env("TIKTOK").enabled);
        env::remove_var("TIKTOK_ENABLED");
    }

    #[test]
    fn missing_supabase_credentials_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("SUPABASE_URL");
        env::remove_var("SUPABASE_SERVICE_KEY");
        let cfg = TrendConfig::from_env();
        assert!(cfg.supabase_credentials().is_err());
    }
}
