//! Submesh mapping manifests and per-fragment indexing
//!
//! Every fragment (a batched "supermesh") ships with a manifest listing the
//! elements merged into it. The position of an entry in that list is the
//! element's local index: the same number the renderer later reads back from
//! the secondary per-vertex index channel.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::types::{ElementId, SharedId};

/// One submesh entry of a mapping manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    /// Global element id of the submesh
    pub name: ElementId,

    /// Shared id of the submesh, if the producer emitted one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<SharedId>,

    /// Minimum corner of the submesh bounding box
    #[serde(default)]
    pub min: Vec3,

    /// Maximum corner of the submesh bounding box
    #[serde(default)]
    pub max: Vec3,

    /// Usage tags; the first one encodes `<fragmentId>_<ordinal>`
    #[serde(default)]
    pub usage: Vec<String>,
}

impl MappingEntry {
    /// Create an entry with an empty bounding box
    pub fn new(name: impl Into<ElementId>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared_id: None,
            min: Vec3::ZERO,
            max: Vec3::ZERO,
            usage: vec![usage.into()],
        }
    }

    /// Set the bounding box
    pub fn with_bounds(mut self, min: Vec3, max: Vec3) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Bounding box of the submesh
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }
}

/// Decoded submesh mapping manifest of one fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingManifest {
    /// Number of distinct ids reported by the producer
    #[serde(default)]
    pub number_of_ids: u32,

    /// Largest geometry count reported by the producer
    #[serde(default)]
    pub max_geo_count: u32,

    /// Entries in local-index order
    #[serde(default)]
    pub mapping: Vec<MappingEntry>,
}

impl MappingManifest {
    /// Create a manifest from entries in local-index order
    pub fn new(mapping: Vec<MappingEntry>) -> Self {
        Self {
            number_of_ids: mapping.len() as u32,
            max_geo_count: 0,
            mapping,
        }
    }
}

/// Derive a fragment name from a usage tag by removing the last `_<suffix>`
///
/// A tag without an underscore is returned unchanged.
pub fn fragment_name_from_usage(tag: &str) -> &str {
    match tag.rfind('_') {
        Some(pos) => &tag[..pos],
        None => tag,
    }
}

/// Per-fragment index from local submesh ordinal to global element id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentIndex {
    name: Option<String>,
    local_index_to_element_id: Vec<ElementId>,
    bounds: Vec<BoundingBox>,
}

impl FragmentIndex {
    /// Process a mapping manifest into a fragment index
    ///
    /// An empty manifest, or one whose first entry has no usage tag, yields an
    /// unnamed index that [`is_usable`](Self::is_usable) reports as unusable.
    pub fn from_manifest(manifest: &MappingManifest) -> Self {
        let name = manifest
            .mapping
            .first()
            .and_then(|entry| entry.usage.first())
            .map(|tag| fragment_name_from_usage(tag).to_string());

        let (local_index_to_element_id, bounds) = manifest
            .mapping
            .iter()
            .map(|entry| (entry.name.clone(), entry.bounds()))
            .unzip();

        Self {
            name,
            local_index_to_element_id,
            bounds,
        }
    }

    /// Fragment name, absent for a degenerate manifest
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the index can be registered and queried
    pub fn is_usable(&self) -> bool {
        self.name.is_some() && !self.local_index_to_element_id.is_empty()
    }

    /// Number of submeshes in the fragment
    pub fn len(&self) -> usize {
        self.local_index_to_element_id.len()
    }

    /// Whether the fragment has no submeshes
    pub fn is_empty(&self) -> bool {
        self.local_index_to_element_id.is_empty()
    }

    /// Element ids in local-index order
    pub fn element_ids(&self) -> &[ElementId] {
        &self.local_index_to_element_id
    }

    /// Element id stored at a local index
    pub fn element_at(&self, local_index: usize) -> Option<&ElementId> {
        self.local_index_to_element_id.get(local_index)
    }

    /// Bounding box of the submesh stored at a local index
    pub fn bounds_at(&self, local_index: usize) -> Option<&BoundingBox> {
        self.bounds.get(local_index)
    }

    /// Iterate `(local_index, element_id)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (u32, &ElementId)> {
        self.local_index_to_element_id
            .iter()
            .enumerate()
            .map(|(i, id)| (i as u32, id))
    }

    /// Side lengths of the smallest near-square grid holding one texel per submesh
    ///
    /// Returns `(width, height)` with `width = round(sqrt(n))` and
    /// `height = ceil(sqrt(n))`.
    pub fn texture_dimensions(&self) -> (u32, u32) {
        let root = (self.len() as f64).sqrt();
        (root.round() as u32, root.ceil() as u32)
    }
}
