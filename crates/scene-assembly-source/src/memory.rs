//! In-memory asset source
//!
//! Serves pre-decoded artifacts keyed by the same resource paths the remote
//! service uses. Intended for offline use and tests: every fetch is counted,
//! individual locators can be made to fail, and an artificial latency can be
//! injected to exercise concurrent callers.

use async_trait::async_trait;
use scene_assembly_core::routes;
use scene_assembly_core::{
    AssetDescriptorSet, MappingManifest, MetadataSearchResult, ModelSettings, Package, Properties,
    TreeNode, VersionInfo,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::source::AssetSource;

/// Number of fetches served per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    pub descriptors: usize,
    pub manifests: usize,
    pub packages: usize,
    pub settings: usize,
    pub trees: usize,
    pub metadata: usize,
    pub searches: usize,
    pub version: usize,
}

#[derive(Debug, Default)]
struct Counters {
    descriptors: AtomicUsize,
    manifests: AtomicUsize,
    packages: AtomicUsize,
    settings: AtomicUsize,
    trees: AtomicUsize,
    metadata: AtomicUsize,
    searches: AtomicUsize,
    version: AtomicUsize,
}

#[derive(Debug, Default)]
struct Store {
    descriptors: HashMap<String, AssetDescriptorSet>,
    manifests: HashMap<String, MappingManifest>,
    packages: HashMap<String, Package>,
    settings: HashMap<String, ModelSettings>,
    trees: HashMap<String, TreeNode>,
    metadata: HashMap<String, Properties>,
    searches: HashMap<String, Vec<MetadataSearchResult>>,
    version: Option<VersionInfo>,
    failing: HashSet<String>,
}

/// Asset source backed by in-memory maps
#[derive(Debug, Default)]
pub struct InMemoryAssetSource {
    store: RwLock<Store>,
    counters: Counters,
    latency: Option<Duration>,
}

impl InMemoryAssetSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serve a descriptor set for a model at a revision
    pub fn with_asset_descriptors(
        mut self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        set: AssetDescriptorSet,
    ) -> Self {
        let path = routes::asset_descriptors_path(namespace, model_id, revision);
        self.store.get_mut().descriptors.insert(path, set);
        self
    }

    /// Serve a mapping manifest at a locator
    pub fn with_mapping_manifest(mut self, uri: impl Into<String>, manifest: MappingManifest) -> Self {
        self.store.get_mut().manifests.insert(uri.into(), manifest);
        self
    }

    /// Serve a package at a locator
    pub fn with_package(mut self, uri: impl Into<String>, package: Package) -> Self {
        self.store.get_mut().packages.insert(uri.into(), package);
        self
    }

    /// Serve settings for a model
    pub fn with_model_settings(
        mut self,
        namespace: &str,
        model_id: &str,
        settings: ModelSettings,
    ) -> Self {
        let path = routes::model_settings_path(namespace, model_id);
        self.store.get_mut().settings.insert(path, settings);
        self
    }

    /// Serve an element tree for a model at a revision
    pub fn with_element_tree(
        mut self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        root: TreeNode,
    ) -> Self {
        let path = routes::element_tree_path(namespace, model_id, revision);
        self.store.get_mut().trees.insert(path, root);
        self
    }

    /// Serve a metadata record
    pub fn with_metadata(
        mut self,
        namespace: &str,
        model_id: &str,
        metadata_id: &str,
        properties: Properties,
    ) -> Self {
        let path = routes::metadata_path(namespace, model_id, metadata_id);
        self.store.get_mut().metadata.insert(path, properties);
        self
    }

    /// Serve the results of a field search
    pub fn with_search_results(
        mut self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        field: &str,
        results: Vec<MetadataSearchResult>,
    ) -> Self {
        let path = routes::metadata_search_path(namespace, model_id, revision, field);
        self.store.get_mut().searches.insert(path, results);
        self
    }

    /// Serve a version document
    pub fn with_version_info(mut self, info: VersionInfo) -> Self {
        self.store.get_mut().version = Some(info);
        self
    }

    /// Make every fetch of a locator or resource path fail with a transport error
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.store.get_mut().failing.insert(path.into());
        self
    }

    /// Make fetches of a locator or resource path fail from now on
    pub async fn fail(&self, path: impl Into<String>) {
        self.store.write().await.failing.insert(path.into());
    }

    /// Let fetches of a previously failing locator succeed again
    pub async fn recover(&self, path: &str) {
        self.store.write().await.failing.remove(path);
    }

    /// Snapshot of the per-operation fetch counters
    pub fn fetch_counts(&self) -> FetchCounts {
        let c = &self.counters;
        FetchCounts {
            descriptors: c.descriptors.load(Ordering::SeqCst),
            manifests: c.manifests.load(Ordering::SeqCst),
            packages: c.packages.load(Ordering::SeqCst),
            settings: c.settings.load(Ordering::SeqCst),
            trees: c.trees.load(Ordering::SeqCst),
            metadata: c.metadata.load(Ordering::SeqCst),
            searches: c.searches.load(Ordering::SeqCst),
            version: c.version.load(Ordering::SeqCst),
        }
    }

    async fn begin(&self, counter: &AtomicUsize, path: &str) -> SourceResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path, "In-memory fetch");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.store.read().await.failing.contains(path) {
            return Err(SourceError::Transport(format!("Injected failure for {}", path)));
        }
        Ok(())
    }
}

#[async_trait]
impl AssetSource for InMemoryAssetSource {
    async fn fetch_asset_descriptors(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<Option<AssetDescriptorSet>> {
        let path = routes::asset_descriptors_path(namespace, model_id, revision);
        self.begin(&self.counters.descriptors, &path).await?;
        Ok(self.store.read().await.descriptors.get(&path).cloned())
    }

    async fn fetch_mapping_manifest(&self, uri: &str) -> SourceResult<MappingManifest> {
        self.begin(&self.counters.manifests, uri).await?;
        self.store
            .read()
            .await
            .manifests
            .get(uri)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(uri.to_string()))
    }

    async fn fetch_package(&self, uri: &str) -> SourceResult<Package> {
        self.begin(&self.counters.packages, uri).await?;
        self.store
            .read()
            .await
            .packages
            .get(uri)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(uri.to_string()))
    }

    async fn fetch_model_settings(
        &self,
        namespace: &str,
        model_id: &str,
    ) -> SourceResult<ModelSettings> {
        let path = routes::model_settings_path(namespace, model_id);
        self.begin(&self.counters.settings, &path).await?;
        self.store
            .read()
            .await
            .settings
            .get(&path)
            .cloned()
            .ok_or(SourceError::NotFound(path))
    }

    async fn fetch_element_tree(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<TreeNode> {
        let path = routes::element_tree_path(namespace, model_id, revision);
        self.begin(&self.counters.trees, &path).await?;
        self.store
            .read()
            .await
            .trees
            .get(&path)
            .cloned()
            .ok_or(SourceError::NotFound(path))
    }

    async fn fetch_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        metadata_id: &str,
    ) -> SourceResult<Option<Properties>> {
        let path = routes::metadata_path(namespace, model_id, metadata_id);
        self.begin(&self.counters.metadata, &path).await?;
        Ok(self.store.read().await.metadata.get(&path).cloned())
    }

    async fn search_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        field: &str,
    ) -> SourceResult<Vec<MetadataSearchResult>> {
        let path = routes::metadata_search_path(namespace, model_id, revision, field);
        self.begin(&self.counters.searches, &path).await?;
        Ok(self
            .store
            .read()
            .await
            .searches
            .get(&path)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_version_info(&self) -> SourceResult<VersionInfo> {
        let path = routes::version_path();
        self.begin(&self.counters.version, path).await?;
        self.store
            .read()
            .await
            .version
            .clone()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}
