//! Assembled models and their queries

use glam::DVec3;
use scene_assembly_core::{
    BoundingBox, ElementId, ElementTree, GeometryBuffer, MeshLocation, MetadataSearchResult,
    Package, PackageQuality, Properties, SurveyPoint, TreeNode,
};
use scene_assembly_source::AssetSource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{LoaderError, LoaderResult};
use crate::extractor::{self, LocationIndex};
use crate::metadata::{MetadataCache, MetadataResolver};
use crate::registry::LoadedFragment;
use crate::tree_cache::TreeCache;

/// One assembled sub-model
///
/// Fragment data is fixed at assembly time. The element tree, metadata records
/// and the mesh location index are built on first query and kept for the
/// model's lifetime.
pub struct Model {
    pub(crate) namespace: String,
    pub(crate) model_id: String,
    pub(crate) revision: Option<String>,
    pub(crate) name: String,
    pub(crate) unit: Option<String>,
    pub(crate) angle_from_north: f64,
    pub(crate) survey_point: Option<SurveyPoint>,
    pub(crate) source_offset: DVec3,
    pub(crate) placement: DVec3,
    pub(crate) package_quality: PackageQuality,
    pub(crate) fragments: HashMap<String, LoadedFragment>,
    pub(crate) unmapped_packages: Vec<Package>,
    pub(crate) tree: TreeCache,
    pub(crate) metadata: MetadataCache,
    pub(crate) locations: LocationIndex,
    pub(crate) source: Arc<dyn AssetSource>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("namespace", &self.namespace)
            .field("model_id", &self.model_id)
            .field("revision", &self.revision)
            .field("name", &self.name)
            .field("fragments", &self.fragments.len())
            .field("unmapped_packages", &self.unmapped_packages.len())
            .field("tree_built", &self.tree.is_built())
            .finish()
    }
}

impl Model {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Revision id; `None` means the latest revision
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Display name from the model settings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measurement unit from the model settings
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Rotation from north in degrees, clockwise
    pub fn angle_from_north(&self) -> f64 {
        self.angle_from_north
    }

    pub fn survey_point(&self) -> Option<&SurveyPoint> {
        self.survey_point.as_ref()
    }

    /// Absolute offset the model was authored at
    pub fn source_offset(&self) -> DVec3 {
        self.source_offset
    }

    /// Offset applied to every package relative to the load's baseline
    pub fn placement(&self) -> DVec3 {
        self.placement
    }

    /// Which package set was loaded
    pub fn package_quality(&self) -> PackageQuality {
        self.package_quality
    }

    /// Bound fragments by name
    pub fn fragments(&self) -> &HashMap<String, LoadedFragment> {
        &self.fragments
    }

    pub fn fragment(&self, name: &str) -> Option<&LoadedFragment> {
        self.fragments.get(name)
    }

    /// Packages without a mapping manifest
    pub fn unmapped_packages(&self) -> &[Package] {
        &self.unmapped_packages
    }

    /// Every renderable package, bound or not
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.fragments
            .values()
            .map(|fragment| &fragment.package)
            .chain(self.unmapped_packages.iter())
    }

    /// Element id drawn at a local index of a fragment
    pub fn sub_mesh_element_id(&self, fragment: &str, local_index: u32) -> Option<&ElementId> {
        self.fragments
            .get(fragment)?
            .index
            .element_at(local_index as usize)
    }

    /// The indexed element tree, fetched on first use
    pub async fn tree(&self) -> LoaderResult<&ElementTree> {
        self.tree
            .get_or_build(
                self.source.as_ref(),
                &self.namespace,
                &self.model_id,
                self.revision.as_deref(),
            )
            .await
    }

    /// Tree node with the given unique id
    pub async fn node(&self, element_id: &str) -> LoaderResult<Option<Arc<TreeNode>>> {
        Ok(self.tree().await?.node(element_id).cloned())
    }

    /// Unique id of the element carrying a shared id
    pub async fn unique_id_for(&self, shared_id: &str) -> LoaderResult<Option<ElementId>> {
        Ok(self.tree().await?.unique_id_for(shared_id).cloned())
    }

    /// Metadata records referenced by an element, in reference order
    ///
    /// Unknown ids and elements without references yield an empty list.
    #[instrument(skip(self), fields(model = %self.model_id))]
    pub async fn metadata_for(&self, element_id: &str) -> LoaderResult<Vec<Properties>> {
        let tree = self.tree().await?;
        self.metadata_resolver()
            .resolve(tree.metadata_refs(element_id))
            .await
    }

    /// Every metadata record of this model carrying `field`
    pub async fn metadata_with_field(&self, field: &str) -> LoaderResult<Vec<MetadataSearchResult>> {
        self.metadata_resolver()
            .search(self.revision.as_deref(), field)
            .await
    }

    /// Every `(fragment, local index)` holding an element's geometry
    pub fn mesh_locations(&self, element_id: &str) -> &[MeshLocation] {
        self.locations.locations(&self.fragments, element_id)
    }

    /// Union of the element's mapping bounding boxes
    pub fn mesh_bounds(&self, element_id: &str) -> Option<BoundingBox> {
        extractor::bounds(&self.fragments, self.mesh_locations(element_id))
    }

    /// Rebuild an element's geometry from every fragment holding it
    #[instrument(skip(self), fields(model = %self.model_id))]
    pub fn extract_geometry(&self, element_id: &str) -> LoaderResult<GeometryBuffer> {
        let locations = self.mesh_locations(element_id);
        if locations.is_empty() {
            return Err(LoaderError::NoValue(format!(
                "no geometry for element {} in {}.{}",
                element_id, self.namespace, self.model_id
            )));
        }
        Ok(extractor::extract(&self.fragments, locations))
    }

    fn metadata_resolver(&self) -> MetadataResolver<'_> {
        MetadataResolver::new(self.source.as_ref(), &self.namespace, &self.model_id)
            .with_cache(&self.metadata)
    }
}
