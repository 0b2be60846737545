use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default soft session expiry: 24 hours.
const DEFAULT_SESSION_MAX_AGE_HOURS: u64 = 24;
/// Default session heartbeat period: 5 minutes.
const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 300;

/// The client's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the resident-facing API.
    pub resident_api_url: String,
    /// Base URL of the owner-facing API.
    pub owner_api_url: String,
    /// Path of the local storage file (the browser localStorage analogue).
    pub storage_path: PathBuf,
    /// How long an idle session survives before it is discarded on read.
    pub session_max_age: Duration,
    /// Period of the session keep-alive heartbeat.
    pub heartbeat_interval: Duration,
}

impl Config {
    /// Creates a new `Config` from environment variables, loading a
    /// `.env` file first when one is present.
    ///
    /// `WELQO_API_URL` is required; `WELQO_OWNER_API_URL` falls back to it
    /// (both interfaces share one deployment by default).
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let resident_api_url = env::var("WELQO_API_URL")
            .context("WELQO_API_URL must be set (e.g. https://welqo-api.example.com/api/v1)")?;

        let owner_api_url =
            env::var("WELQO_OWNER_API_URL").unwrap_or_else(|_| resident_api_url.clone());

        let storage_path = env::var("WELQO_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("welqo-storage.json"));

        let session_max_age_hours: u64 = env::var("SESSION_MAX_AGE_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_MAX_AGE_HOURS.to_string())
            .parse()
            .context("Invalid SESSION_MAX_AGE_HOURS")?;

        let heartbeat_interval_secs: u64 = env::var("HEARTBEAT_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_HEARTBEAT_INTERVAL_SECS.to_string())
            .parse()
            .context("Invalid HEARTBEAT_INTERVAL_SECS")?;

        Ok(Self {
            resident_api_url,
            owner_api_url,
            storage_path,
            session_max_age: Duration::from_secs(session_max_age_hours * 3600),
            heartbeat_interval: Duration::from_secs(heartbeat_interval_secs),
        })
    }

    /// Creates a `Config` pointing both interfaces at the given base URL,
    /// with default timings. Mostly useful for tests and tools.
    pub fn with_base_url(base_url: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        let base_url = base_url.into();
        Self {
            resident_api_url: base_url.clone(),
            owner_api_url: base_url,
            storage_path: storage_path.into(),
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_HOURS * 3600),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_urls_and_timing_overrides() {
        // set_var is unsafe in edition 2024; this test is the only one
        // touching these variables.
        unsafe {
            env::set_var("WELQO_API_URL", "http://resident.test/api/v1");
            env::set_var("WELQO_OWNER_API_URL", "http://owner.test/api/v1");
            env::set_var("WELQO_STORAGE_PATH", "/tmp/welqo-test.json");
            env::set_var("SESSION_MAX_AGE_HOURS", "12");
            env::set_var("HEARTBEAT_INTERVAL_SECS", "60");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.resident_api_url, "http://resident.test/api/v1");
        assert_eq!(config.owner_api_url, "http://owner.test/api/v1");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/welqo-test.json"));
        assert_eq!(config.session_max_age, Duration::from_secs(12 * 3600));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
    }

    #[test]
    fn with_base_url_uses_default_timings() {
        let config = Config::with_base_url("http://127.0.0.1:9", "store.json");
        assert_eq!(config.resident_api_url, "http://127.0.0.1:9");
        assert_eq!(config.owner_api_url, "http://127.0.0.1:9");
        assert_eq!(config.session_max_age, Duration::from_secs(24 * 3600));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(300));
    }
}
