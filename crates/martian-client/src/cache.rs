//! Client-side cache of pinned-version resources.
//!
//! Resource versions are immutable server-side (updates bump the version), so
//! a `get` pinned to a version can be served from cache. Latest-version
//! lookups always go to the network.

use std::time::Duration;

use martian_core::{Judge, Router};
use moka::future::Cache;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
enum ResourceKey {
    Judge { id: String, version: u32 },
    Router { id: String, version: u32 },
}

#[derive(Clone, Debug)]
enum CachedResource {
    Judge(Judge),
    Router(Router),
}

pub(crate) struct ResourceCache {
    cache: Cache<ResourceKey, CachedResource>,
}

impl ResourceCache {
    pub(crate) fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub(crate) async fn get_judge(&self, id: &str, version: u32) -> Option<Judge> {
        match self
            .cache
            .get(&ResourceKey::Judge {
                id: id.to_string(),
                version,
            })
            .await
        {
            Some(CachedResource::Judge(judge)) => Some(judge),
            _ => None,
        }
    }

    pub(crate) async fn insert_judge(&self, judge: Judge) {
        let key = ResourceKey::Judge {
            id: judge.id().to_string(),
            version: judge.version,
        };
        self.cache.insert(key, CachedResource::Judge(judge)).await;
    }

    pub(crate) async fn get_router(&self, id: &str, version: u32) -> Option<Router> {
        match self
            .cache
            .get(&ResourceKey::Router {
                id: id.to_string(),
                version,
            })
            .await
        {
            Some(CachedResource::Router(router)) => Some(router),
            _ => None,
        }
    }

    pub(crate) async fn insert_router(&self, router: Router) {
        let key = ResourceKey::Router {
            id: router.id().to_string(),
            version: router.version,
        };
        self.cache.insert(key, CachedResource::Router(router)).await;
    }

    /// Drop every cached resource.
    pub(crate) fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
