//! The fetch collaborator seam
//!
//! Network transport, retries, authentication and binary decoding all live
//! behind [`AssetSource`]. The loader only ever sees decoded domain values.

use async_trait::async_trait;
use scene_assembly_core::{
    AssetDescriptorSet, MappingManifest, MetadataSearchResult, ModelSettings, Package, Properties,
    TreeNode, VersionInfo,
};

use crate::error::SourceResult;

/// Fetch primitives for every artifact of a model
///
/// Implementations must be thread-safe (Send + Sync): the loader issues
/// fetches for packages, manifests and settings concurrently.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the asset descriptor set of a model
    ///
    /// # Returns
    /// * `Ok(Some(set))` - One descriptor per sub-model
    /// * `Ok(None)` - If the service has nothing for this model
    /// * `Err(SourceError)` - For transport or decode failures
    async fn fetch_asset_descriptors(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<Option<AssetDescriptorSet>>;

    /// Fetch and decode one submesh mapping manifest
    async fn fetch_mapping_manifest(&self, uri: &str) -> SourceResult<MappingManifest>;

    /// Fetch and decode one binary package
    ///
    /// Every call returns an independently owned package.
    async fn fetch_package(&self, uri: &str) -> SourceResult<Package>;

    /// Fetch the settings of a model
    async fn fetch_model_settings(&self, namespace: &str, model_id: &str)
        -> SourceResult<ModelSettings>;

    /// Fetch the root of the full element tree
    async fn fetch_element_tree(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> SourceResult<TreeNode>;

    /// Fetch one metadata record
    ///
    /// # Returns
    /// * `Ok(None)` - If the record does not exist
    async fn fetch_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        metadata_id: &str,
    ) -> SourceResult<Option<Properties>>;

    /// Find every metadata record carrying a field
    async fn search_metadata(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
        field: &str,
    ) -> SourceResult<Vec<MetadataSearchResult>>;

    /// Fetch the service version document
    async fn fetch_version_info(&self) -> SourceResult<VersionInfo>;
}
