//! Client configuration.
//!
//! A [`ClientConfig`] carries the API endpoint, organization id, credential
//! and the knobs the SDK uses for timeouts, retries, polling and caching.
//! Most callers build it with [`ClientConfig::from_env`].

use std::time::Duration;

use crate::credential::ApiCredential;
use crate::error::ClientError;

/// Environment variable for the API base URL.
pub const API_URL_ENV: &str = "MARTIAN_API_URL";
/// Environment variable for the organization id.
pub const ORG_ID_ENV: &str = "MARTIAN_ORG_ID";
/// Environment variable for the API key.
pub const API_KEY_ENV: &str = "MARTIAN_API_KEY";
/// Environment variable overriding the OpenAI-compatible gateway URL.
pub const GATEWAY_URL_ENV: &str = "MARTIAN_GATEWAY_URL";
/// Environment variable overriding the evaluation timeout (humantime format,
/// e.g. "100s" or "2m").
pub const EVALUATION_TIMEOUT_ENV: &str = "MARTIAN_EVALUATION_TIMEOUT";

/// Configuration for a [`MartianClient`](crate::MartianClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. "https://api.withmartian.com".
    pub api_url: String,

    /// Organization id; every resource path is scoped under it.
    pub org_id: String,

    /// OpenAI-compatible gateway URL used for router runs. When unset,
    /// derived as `{api_url}/openai/v1`.
    pub gateway_url: Option<String>,

    /// Timeout for judge evaluations and router runs, which block on
    /// server-side LLM calls and run much longer than plain CRUD.
    pub evaluation_timeout: Duration,

    /// Timeout for everything else.
    pub request_timeout: Duration,

    /// Delay between training-job polls.
    pub poll_interval: Duration,

    /// Total budget for waiting on a training job.
    pub poll_timeout: Duration,

    /// Retry attempts for retryable failures of idempotent requests.
    pub max_retries: u32,

    /// Capacity of the pinned-version resource cache.
    pub cache_capacity: u64,

    /// Time-to-live of cached resources.
    pub cache_ttl: Duration,

    credential: ApiCredential,
}

impl ClientConfig {
    /// Create a configuration with default knobs.
    pub fn new(
        api_url: impl Into<String>,
        org_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_credential(api_url, org_id, ApiCredential::new(api_key))
    }

    /// Create a configuration from an already-loaded credential.
    pub fn with_credential(
        api_url: impl Into<String>,
        org_id: impl Into<String>,
        credential: ApiCredential,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            org_id: org_id.into(),
            gateway_url: None,
            evaluation_timeout: Duration::from_secs(100),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(20 * 60),
            max_retries: 3,
            cache_capacity: 1024,
            cache_ttl: Duration::from_secs(3600),
            credential,
        }
    }

    /// Load configuration from `MARTIAN_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = require_env(API_URL_ENV)?;
        let org_id = require_env(ORG_ID_ENV)?;
        let credential = ApiCredential::from_env(API_KEY_ENV)?;

        let mut config = Self::with_credential(api_url, org_id, credential);

        if let Ok(gateway) = std::env::var(GATEWAY_URL_ENV) {
            config.gateway_url = Some(gateway);
        }
        if let Ok(raw) = std::env::var(EVALUATION_TIMEOUT_ENV) {
            config.evaluation_timeout = humantime::parse_duration(&raw).map_err(|e| {
                ClientError::NotConfigured(format!(
                    "{EVALUATION_TIMEOUT_ENV} is not a valid duration ({raw:?}): {e}"
                ))
            })?;
        }

        Ok(config)
    }

    /// Override the gateway URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    /// Override the evaluation timeout.
    pub fn with_evaluation_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout = timeout;
        self
    }

    /// Override the training-job poll cadence.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// Override the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the resource-cache sizing.
    pub fn with_cache(mut self, capacity: u64, ttl: Duration) -> Self {
        self.cache_capacity = capacity;
        self.cache_ttl = ttl;
        self
    }

    /// The org-scoped base URL all resource paths hang off.
    pub(crate) fn base_url(&self) -> String {
        format!(
            "{}/v1/organizations/{}",
            self.api_url.trim_end_matches('/'),
            self.org_id
        )
    }

    /// The gateway URL router runs go through.
    pub(crate) fn resolved_gateway_url(&self) -> String {
        match &self.gateway_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/openai/v1", self.api_url.trim_end_matches('/')),
        }
    }

    pub(crate) fn credential(&self) -> &ApiCredential {
        &self.credential
    }
}

fn require_env(var: &str) -> Result<String, ClientError> {
    std::env::var(var)
        .map_err(|_| ClientError::NotConfigured(format!("{var} environment variable not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_scopes_organization() {
        let config = ClientConfig::new("https://api.withmartian.com/", "org-1", "key");
        assert_eq!(
            config.base_url(),
            "https://api.withmartian.com/v1/organizations/org-1"
        );
    }

    #[test]
    fn test_gateway_url_derived_from_api_url() {
        let config = ClientConfig::new("https://api.withmartian.com", "org-1", "key");
        assert_eq!(
            config.resolved_gateway_url(),
            "https://api.withmartian.com/openai/v1"
        );
    }

    #[test]
    fn test_gateway_url_override_wins() {
        let config = ClientConfig::new("https://api.withmartian.com", "org-1", "key")
            .with_gateway_url("https://gateway.example.com/v1/");
        assert_eq!(
            config.resolved_gateway_url(),
            "https://gateway.example.com/v1"
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("u", "o", "k");
        assert_eq!(config.evaluation_timeout, Duration::from_secs(100));
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.poll_timeout, Duration::from_secs(1200));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let config = ClientConfig::new("u", "o", "mk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("mk-very-secret"));
    }

    #[test]
    fn test_from_env_round_trip() {
        std::env::set_var(API_URL_ENV, "https://api.test");
        std::env::set_var(ORG_ID_ENV, "org-env");
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(EVALUATION_TIMEOUT_ENV, "2m");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.org_id, "org-env");
        assert_eq!(config.evaluation_timeout, Duration::from_secs(120));

        std::env::remove_var(API_URL_ENV);
        std::env::remove_var(ORG_ID_ENV);
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(EVALUATION_TIMEOUT_ENV);
    }
}
