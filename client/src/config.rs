use std::{num::NonZeroU64, path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::controller::DEFAULT_LOAD_ALL_LIMIT;

fn limit(n: u64) -> NonZeroU64 {
    NonZeroU64::new(n).unwrap_or(NonZeroU64::MIN)
}

/// Client settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the dashboard backend.
    pub api_url: String,

    /// Bearer token sent with every request.
    pub api_token: Option<String>,

    pub request_timeout_secs: u64,

    /// Page size used to fetch a whole list in one request. The backend
    /// must not truncate a page below this many rows without saying so.
    pub load_all_limit: NonZeroU64,

    pub limits: ListLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            api_token: None,
            request_timeout_secs: 30,
            load_all_limit: DEFAULT_LOAD_ALL_LIMIT,
            limits: ListLimits::default(),
        }
    }
}

/// Page size of each dashboard list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListLimits {
    pub status_summaries: NonZeroU64,
    pub community_members: NonZeroU64,
    pub interactions: NonZeroU64,
    pub health_reports: NonZeroU64,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            status_summaries: limit(200),
            community_members: limit(300),
            interactions: limit(15),
            health_reports: limit(15),
        }
    }
}

impl ClientConfig {
    /// Load settings from an optional TOML file, overridden by `SENTINEL_*`
    /// environment variables (`SENTINEL_API_URL`,
    /// `SENTINEL_LIMITS__INTERACTIONS`, ...).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml));
        }

        builder
            .add_source(env)
            .build()
            .context("Failed to read client configuration")?
            .try_deserialize()
            .context("Invalid client configuration")
    }

    /// Parse settings from TOML text alone.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("Failed to parse client configuration")?
            .try_deserialize()
            .context("Invalid client configuration")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `SENTINEL_` prefix, `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix("SENTINEL")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_uses_dashboard_defaults() {
        let config = ClientConfig::from_toml("").unwrap();

        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.load_all_limit.get(), 10_000);
        assert_eq!(config.limits, ListLimits::default());
        assert_eq!(config.limits.status_summaries.get(), 200);
        assert_eq!(config.limits.community_members.get(), 300);
    }

    #[test]
    fn partial_limits_keep_other_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            api_url = "https://dash.example.edu"
            api_token = "secret"
            load_all_limit = 50000

            [limits]
            interactions = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url, "https://dash.example.edu");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.load_all_limit.get(), 50_000);
        assert_eq!(config.limits.interactions.get(), 25);
        assert_eq!(config.limits.health_reports.get(), 15);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = ClientConfig::from_toml("[limits]\nstatus_summaries = 0\n");
        assert!(err.is_err());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("sentinel-config-{}.toml", std::process::id()));
        std::fs::write(&path, "request_timeout_secs = 5\n").unwrap();

        let config = ClientConfig::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.unwrap().request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn environment_overrides_file() {
        let path =
            std::env::temp_dir().join(format!("sentinel-config-env-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "api_url = \"http://from-file\"\n[limits]\ninteractions = 20\nhealth_reports = 30\n",
        )
        .unwrap();

        let vars = [
            ("SENTINEL_API_URL", "http://from-env"),
            ("SENTINEL_LIMITS__INTERACTIONS", "25"),
            ("SENTINEL_CONFIG_PATH", "/ignored.toml"),
            ("OTHER_API_URL", "http://unrelated"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = ClientConfig::load_with(Some(&path), environment().source(Some(vars)));
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.api_url, "http://from-env");
        assert_eq!(config.limits.interactions.get(), 25);
        assert_eq!(config.limits.health_reports.get(), 30);
        assert_eq!(config.limits.status_summaries.get(), 200);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("sentinel-config-does-not-exist.toml");
        assert!(ClientConfig::load(Some(&path)).is_err());
    }
}
