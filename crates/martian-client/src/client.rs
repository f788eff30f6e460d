//! The client facade.

use std::sync::Arc;

use crate::cache::ResourceCache;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::Transport;
use crate::judges::JudgesClient;
use crate::organization::OrganizationClient;
use crate::routers::RoutersClient;
use crate::usage::{UsageReport, UsageTracker};

/// The entry point to the SDK.
///
/// Owns the shared HTTP transport, resource cache and usage tracker; the
/// sub-clients returned by [`judges`](Self::judges), [`routers`](Self::routers)
/// and [`organization`](Self::organization) are cheap handles over that
/// shared state and can be cloned freely.
///
/// ```rust,no_run
/// use martian_client::{ClientConfig, MartianClient};
///
/// # async fn demo() -> martian_client::Result<()> {
/// let client = MartianClient::new(ClientConfig::from_env()?)?;
/// let judges = client.judges().list().await?;
/// println!("found {} judges", judges.len());
/// # Ok(())
/// # }
/// ```
pub struct MartianClient {
    config: ClientConfig,
    transport: Arc<Transport>,
    cache: Arc<ResourceCache>,
    usage: Arc<UsageTracker>,
}

impl MartianClient {
    /// Build a client from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(Transport::new(&config)?);
        let cache = Arc::new(ResourceCache::new(config.cache_capacity, config.cache_ttl));
        let usage = Arc::new(UsageTracker::new());

        Ok(Self {
            config,
            transport,
            cache,
            usage,
        })
    }

    /// Build a client from `MARTIAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The judges sub-client.
    pub fn judges(&self) -> JudgesClient {
        JudgesClient::new(
            self.transport.clone(),
            self.cache.clone(),
            self.usage.clone(),
        )
    }

    /// The routers sub-client.
    pub fn routers(&self) -> RoutersClient {
        RoutersClient::new(
            self.transport.clone(),
            self.cache.clone(),
            self.usage.clone(),
            self.config.poll_interval,
            self.config.poll_timeout,
        )
    }

    /// The organization sub-client.
    pub fn organization(&self) -> OrganizationClient {
        OrganizationClient::new(self.transport.clone())
    }

    /// What this client has spent so far.
    pub fn usage(&self) -> UsageReport {
        self.usage.report()
    }

    /// Reset the usage report.
    pub fn reset_usage(&self) {
        self.usage.reset();
    }

    /// Drop all cached resources, forcing the next pinned-version gets to
    /// refetch.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client =
            MartianClient::new(ClientConfig::new("https://api.test", "org-1", "key")).unwrap();
        assert_eq!(client.usage(), UsageReport::default());
        assert_eq!(client.config().org_id, "org-1");
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = MartianClient::new(ClientConfig::new("https://api.test", "org-1", ""));
        assert!(result.is_err());
    }
}
