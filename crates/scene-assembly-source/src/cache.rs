//! In-process caching layer
//!
//! This module provides a [`CachedAssetSource`] decorator that memoizes the
//! immutable artifacts of a model: mapping manifests, model settings, element
//! trees of explicit revisions and metadata records. Concurrent misses on the
//! same key are coalesced into one fetch of the inner source.

use async_trait::async_trait;
use moka::future::Cache;
use scene_assembly_core::routes;
use scene_assembly_core::{
    AssetDescriptorSet, MappingManifest, MetadataSearchResult, ModelSettings, Package, Properties,
    TreeNode, VersionInfo,
};
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{SourceError, SourceResult};
use crate::source::AssetSource;

/// Default TTL for cached items (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

/// Default maximum number of entries per cached artifact kind
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_024;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries per artifact kind
    pub max_capacity: u64,

    /// Time-to-live for cached items
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_CACHE_CAPACITY,
            time_to_live: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl CacheConfig {
    /// Create new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum capacity
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set TTL
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = ttl;
        self
    }

    fn build<K, V>(&self) -> Cache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        Cache::builder()
            .max_capacity(self.max_capacity)
            .time_to_live(self.time_to_live)
            .build()
    }
}

/// Caching decorator around another asset source
///
/// Descriptor sets, packages, searches, the version document and trees of the
/// latest revision always go to the inner source.
pub struct CachedAssetSource {
    inner: Arc<dyn AssetSource>,
    manifests: Cache<String, MappingManifest>,
    settings: Cache<String, ModelSettings>,
    trees: Cache<String, TreeNode>,
    metadata: Cache<String, Option<Properties>>,
    requests: AtomicU64,
    misses: AtomicU64,
}

impl CachedAssetSource {
    /// Wrap a source
    pub fn new(inner: Arc<dyn AssetSource>, config: CacheConfig) -> Self {
        info!(
            max_capacity = config.max_capacity,
            ttl_secs = config.time_to_live.as_secs(),
            "Enabling asset source cache"
        );

        Self {
            inner,
            manifests: config.build(),
            settings: config.build(),
            trees: config.build(),
            metadata: config.build(),
            requests: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.manifests.invalidate_all();
        self.settings.invalidate_all();
        self.trees.invalidate_all();
        self.metadata.invalidate_all();
    }

    /// Current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.manifests.run_pending_tasks().await;
        self.settings.run_pending_tasks().await;
        self.trees.run_pending_tasks().await;
        self.metadata.run_pending_tasks().await;

        let requests = self.requests.load(Ordering::SeqCst);
        let misses = self.misses.load(Ordering::SeqCst);
        CacheStats {
            total_entries: self.manifests.entry_count()
                + self.settings.entry_count()
                + self.trees.entry_count()
                + self.metadata.entry_count(),
            hits: requests.saturating_sub(misses),
            misses,
        }
    }

    async fn get_or_fetch<V, F>(
        &self,
        cache: &Cache<String, V>,
        key: String,
        fetch: F,
    ) -> SourceResult<V>
    where
        V: Clone + Send + Sync + 'static,
        F: Future<Output = SourceResult<V>> + Send,
    {
        self.requests.fetch_add(1, Ordering::SeqCst);
        cache
            .try_get_with(key.clone(), async {
                debug!(key = %key, "Cache miss");
                self.misses.fetch_add(1, Ordering::SeqCst);
                fetch.await
            })
            .await
            .map_err(|err: Arc<SourceError>| (*err).clone())
    }
}

#[async_trait]
impl AssetSource for CachedAssetSource {
    async fn fetch_asset_descriptors(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<Option<AssetDescriptorSet>> {
        self.inner
            .fetch_asset_descriptors(namespace, model_id, revision)
            .await
    }

    async fn fetch_mapping_manifest(&self, uri: &str) -> SourceResult<MappingManifest> {
        self.get_or_fetch(
            &self.manifests,
            uri.to_string(),
            self.inner.fetch_mapping_manifest(uri),
        )
        .await
    }

    async fn fetch_package(&self, uri: &str) -> SourceResult<Package> {
        self.inner.fetch_package(uri).await
    }

    async fn fetch_model_settings(
        &self,
        namespace: &str,
        model_id: &str,
    ) -> SourceResult<ModelSettings> {
        self.get_or_fetch(
            &self.settings,
            routes::model_settings_path(namespace, model_id),
            self.inner.fetch_model_settings(namespace, model_id),
        )
        .await
    }

    async fn fetch_element_tree(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<TreeNode> {
        match revision {
            Some(rev) if !rev.is_empty() => {
                self.get_or_fetch(
                    &self.trees,
                    routes::element_tree_path(namespace, model_id, revision),
                    self.inner.fetch_element_tree(namespace, model_id, Some(rev)),
                )
                .await
            }
            _ => {
                self.inner
                    .fetch_element_tree(namespace, model_id, revision)
                    .await
            }
        }
    }

    async fn fetch_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        metadata_id: &str,
    ) -> SourceResult<Option<Properties>> {
        self.get_or_fetch(
            &self.metadata,
            routes::metadata_path(namespace, model_id, metadata_id),
            self.inner.fetch_metadata(namespace, model_id, metadata_id),
        )
        .await
    }

    async fn search_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        field: &str,
    ) -> SourceResult<Vec<MetadataSearchResult>> {
        self.inner
            .search_metadata(namespace, model_id, revision, field)
            .await
    }

    async fn fetch_version_info(&self) -> SourceResult<VersionInfo> {
        self.inner.fetch_version_info().await
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Total entries over every artifact kind
    pub total_entries: u64,

    /// Requests answered from the cache
    pub hits: u64,

    /// Requests that reached the inner source
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
