//! Offline shell asset cache
//!
//! Serves the fixed application shell (markup, styles, scripts) from a
//! local cache so the UI keeps loading without a network. Only paths in
//! the configured manifest are cached; everything else passes straight
//! through to the source. Data is never cached here, the live feed owns
//! that.

use std::sync::Arc;

use async_trait::async_trait;
use inventaire_domain::{InventaireError, Result, ShellConfig};
use moka::sync::Cache;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// A cached (or fetched) static asset
#[derive(Debug, Clone)]
pub struct ShellAsset {
    pub path: String,
    pub content_type: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl ShellAsset {
    /// Placeholder response when an asset is neither cached nor reachable
    pub fn unavailable(path: &str) -> Self {
        Self {
            path: path.to_string(),
            content_type: "text/plain; charset=utf-8".to_string(),
            status: 503,
            body: b"Hors ligne".to_vec(),
        }
    }
}

/// Upstream provider of shell assets
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<ShellAsset>;
}

/// HTTP-backed asset source
pub struct HttpAssetSource {
    client: Client,
    base: Url,
}

impl HttpAssetSource {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| InventaireError::Config(format!("invalid shell base url: {e}")))?;
        Ok(Self { client: Client::new(), base })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, path: &str) -> Result<ShellAsset> {
        let url = self
            .base
            .join(path)
            .map_err(|e| InventaireError::Config(format!("invalid asset path: {e}")))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InventaireError::Feed(format!("asset fetch failed: {e}")))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| InventaireError::Feed(format!("asset body read failed: {e}")))?
            .to_vec();

        Ok(ShellAsset { path: path.to_string(), content_type, status, body })
    }
}

/// Cache-first shell asset service
pub struct ShellCache {
    manifest: Vec<String>,
    cache: Cache<String, Arc<ShellAsset>>,
    source: Arc<dyn AssetSource>,
}

impl ShellCache {
    pub fn new(config: &ShellConfig, source: Arc<dyn AssetSource>) -> Self {
        Self {
            manifest: config.manifest.clone(),
            cache: Cache::new(config.max_assets),
            source,
        }
    }

    fn in_manifest(&self, path: &str) -> bool {
        self.manifest.iter().any(|p| p == path)
    }

    /// Serve an asset, cache-first for manifest paths.
    ///
    /// A manifest path that cannot be fetched and is not yet cached comes
    /// back as the 503 placeholder rather than an error: the shell must
    /// always answer.
    pub async fn get(&self, path: &str) -> Result<Arc<ShellAsset>> {
        if !self.in_manifest(path) {
            // Non-shell requests bypass the cache entirely
            return self.source.fetch(path).await.map(Arc::new);
        }

        if let Some(asset) = self.cache.get(path) {
            debug!(path, "shell asset served from cache");
            return Ok(asset);
        }

        match self.source.fetch(path).await {
            Ok(asset) => {
                let asset = Arc::new(asset);
                self.cache.insert(path.to_string(), Arc::clone(&asset));
                Ok(asset)
            }
            Err(err) => {
                warn!(path, error = %err, "shell asset unreachable, serving placeholder");
                Ok(Arc::new(ShellAsset::unavailable(path)))
            }
        }
    }

    /// Prefetch every manifest asset into the cache.
    ///
    /// Failures are logged per asset; warming is best effort.
    pub async fn warm(&self) {
        for path in self.manifest.clone() {
            match self.source.fetch(&path).await {
                Ok(asset) => {
                    self.cache.insert(path.clone(), Arc::new(asset));
                    debug!(path, "shell asset warmed");
                }
                Err(err) => warn!(path, error = %err, "shell asset warm failed"),
            }
        }
    }
}
