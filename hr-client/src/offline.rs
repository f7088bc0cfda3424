//! Offline asset cache
//!
//! Pages are network first with a cached fallback, static assets are cache
//! first with a background refresh. Only same-origin GETs are handled;
//! anything else is left to the caller.

use dashmap::DashMap;
use std::sync::Arc;

use crate::ClientResult;
use crate::client::{Fetched, HttpClient};

/// Current cache generation; activation drops every other one
pub const CACHE_NAME: &str = "qs-hrcache-v1";

/// Served when a page is neither reachable nor cached
pub const OFFLINE_PAGE: &str = "/static/offline.html";

/// Pre-cached on install
pub const CORE_ASSETS: &[&str] = &[
    "/",
    "/static/css/style.css",
    "/static/js/toasts.js",
    "/static/js/main.js",
    OFFLINE_PAGE,
];

/// Where a served response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache,
    OfflinePage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub source: Source,
    pub body: Fetched,
}

/// Asset cache in front of an [`HttpClient`]
pub struct AssetCache<C> {
    http: Arc<C>,
    origin: String,
    caches: Arc<DashMap<String, DashMap<String, Fetched>>>,
}

impl<C> Clone for AssetCache<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            origin: self.origin.clone(),
            caches: Arc::clone(&self.caches),
        }
    }
}

impl<C: HttpClient + 'static> AssetCache<C> {
    /// `origin` is the scheme and host assets are served from
    /// (`http://localhost:5000`); relative paths are always same-origin.
    pub fn new(http: Arc<C>, origin: &str) -> Self {
        Self {
            http,
            origin: origin.trim_end_matches('/').to_string(),
            caches: Arc::new(DashMap::new()),
        }
    }

    /// Pre-cache the core assets. Fails if any of them cannot be fetched.
    pub async fn install(&self) -> ClientResult<()> {
        for path in CORE_ASSETS {
            let body = self.http.get_bytes(path).await.inspect_err(|e| {
                tracing::error!(path, error = %e, "Failed to pre-cache asset");
            })?;
            self.put(CACHE_NAME, path, body);
        }
        tracing::info!(cache = CACHE_NAME, assets = CORE_ASSETS.len(), "Asset cache installed");
        Ok(())
    }

    /// Drop every cache but the current one; returns how many were dropped
    pub fn activate(&self) -> usize {
        let before = self.caches.len();
        self.caches.retain(|name, _| name == CACHE_NAME);
        let dropped = before - self.caches.len();
        if dropped > 0 {
            tracing::info!(dropped, "Old asset caches removed");
        }
        dropped
    }

    pub fn put(&self, cache: &str, path: &str, body: Fetched) {
        self.caches
            .entry(cache.to_string())
            .or_default()
            .insert(path.to_string(), body);
    }

    /// Cached entry of the current generation
    pub fn cached(&self, path: &str) -> Option<Fetched> {
        self.caches
            .get(CACHE_NAME)
            .and_then(|cache| cache.get(path).map(|entry| entry.value().clone()))
    }

    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Path of a same-origin URL, `None` for other origins
    pub fn same_origin_path(&self, url: &str) -> Option<String> {
        if url.starts_with('/') && !url.starts_with("//") {
            return Some(url.to_string());
        }
        let rest = url.strip_prefix(&self.origin)?;
        match rest {
            "" => Some("/".to_string()),
            _ if rest.starts_with('/') || rest.starts_with('?') => {
                Some(if rest.starts_with('?') { format!("/{rest}") } else { rest.to_string() })
            }
            _ => None,
        }
    }

    /// Serve a request. `Ok(None)` means the cache does not handle it
    /// (not a GET, or another origin).
    pub async fn fetch(&self, method: &str, url: &str, accept: Option<&str>) -> ClientResult<Option<Served>> {
        if !method.eq_ignore_ascii_case("GET") {
            return Ok(None);
        }
        let Some(path) = self.same_origin_path(url) else {
            return Ok(None);
        };
        let wants_html = accept.is_some_and(|a| a.contains("text/html"));
        let served = if wants_html {
            self.network_first(&path).await?
        } else {
            self.cache_first(&path).await?
        };
        Ok(Some(served))
    }

    async fn network_first(&self, path: &str) -> ClientResult<Served> {
        match self.http.get_bytes(path).await {
            Ok(body) => {
                self.put(CACHE_NAME, path, body.clone());
                Ok(Served {
                    source: Source::Network,
                    body,
                })
            }
            Err(err) => {
                tracing::debug!(path, error = %err, "Page fetch failed, trying cache");
                if let Some(body) = self.cached(path) {
                    return Ok(Served {
                        source: Source::Cache,
                        body,
                    });
                }
                match self.cached(OFFLINE_PAGE) {
                    Some(body) => Ok(Served {
                        source: Source::OfflinePage,
                        body,
                    }),
                    None => Err(err),
                }
            }
        }
    }

    async fn cache_first(&self, path: &str) -> ClientResult<Served> {
        if let Some(body) = self.cached(path) {
            let this = self.clone();
            let path = path.to_string();
            tokio::spawn(async move {
                match this.http.get_bytes(&path).await {
                    Ok(fresh) => this.put(CACHE_NAME, &path, fresh),
                    Err(e) => tracing::debug!(path = %path, error = %e, "Background refresh failed"),
                }
            });
            return Ok(Served {
                source: Source::Cache,
                body,
            });
        }

        let body = self.http.get_bytes(path).await?;
        self.put(CACHE_NAME, path, body.clone());
        Ok(Served {
            source: Source::Network,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NetworkHttpClient;

    fn cache() -> AssetCache<NetworkHttpClient> {
        let http = NetworkHttpClient::new("http://hr.local").unwrap();
        AssetCache::new(Arc::new(http), "http://hr.local/")
    }

    #[test]
    fn test_same_origin_path() {
        let cache = cache();
        assert_eq!(cache.same_origin_path("/static/a.css").as_deref(), Some("/static/a.css"));
        assert_eq!(cache.same_origin_path("http://hr.local").as_deref(), Some("/"));
        assert_eq!(cache.same_origin_path("http://hr.local/x?y=1").as_deref(), Some("/x?y=1"));
        assert_eq!(cache.same_origin_path("http://hr.local.evil/x"), None);
        assert_eq!(cache.same_origin_path("https://cdn.example/x.js"), None);
        assert_eq!(cache.same_origin_path("//cdn.example/x.js"), None);
    }

    #[test]
    fn test_activate_keeps_current_generation() {
        let cache = cache();
        let body = Fetched {
            content_type: None,
            bytes: b"x".to_vec(),
        };
        cache.put("qs-hrcache-v0", "/", body.clone());
        cache.put(CACHE_NAME, "/", body);
        assert_eq!(cache.activate(), 1);
        assert_eq!(cache.cache_names(), vec![CACHE_NAME.to_string()]);
        assert!(cache.cached("/").is_some());
    }

    #[tokio::test]
    async fn test_non_get_is_not_handled() {
        let cache = cache();
        assert!(cache.fetch("POST", "/api/roles", None).await.unwrap().is_none());
    }
}
