//! Cross-fragment geometry extraction
//!
//! An element's vertices may be spread over several batched fragments. The
//! location index maps each element id to every `(fragment, local index)`
//! pair it occupies; extraction walks those locations and copies the matching
//! vertices out of each fragment's package.

use scene_assembly_core::{extract_submesh, BoundingBox, ElementId, GeometryBuffer, MeshLocation};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::registry::LoadedFragment;

/// Element id to every location holding its geometry
pub type LocationMap = HashMap<ElementId, Vec<MeshLocation>>;

/// Location index built on first use
#[derive(Debug, Default)]
pub struct LocationIndex {
    cell: OnceLock<LocationMap>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the index, scanning every fragment on first use
    pub fn get_or_build(&self, fragments: &HashMap<String, LoadedFragment>) -> &LocationMap {
        self.cell.get_or_init(|| build_locations(fragments))
    }

    /// Locations of one element; empty when the element has no geometry
    pub fn locations<'a>(
        &'a self,
        fragments: &HashMap<String, LoadedFragment>,
        element_id: &str,
    ) -> &'a [MeshLocation] {
        self.get_or_build(fragments)
            .get(element_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn build_locations(fragments: &HashMap<String, LoadedFragment>) -> LocationMap {
    let mut names: Vec<&String> = fragments.keys().collect();
    names.sort();

    let mut locations = LocationMap::new();
    for name in names {
        for (local_index, element_id) in fragments[name].index.entries() {
            locations
                .entry(element_id.clone())
                .or_default()
                .push(MeshLocation::new(name.as_str(), local_index));
        }
    }

    debug!(
        elements = locations.len(),
        fragments = fragments.len(),
        "Built mesh location index"
    );
    locations
}

/// Copy the geometry at every location into one buffer
///
/// Every sub-object of a fragment's package is scanned. Locations naming an
/// unknown fragment contribute nothing.
pub fn extract(fragments: &HashMap<String, LoadedFragment>, locations: &[MeshLocation]) -> GeometryBuffer {
    let mut buffer = GeometryBuffer::new();
    for location in locations {
        let Some(fragment) = fragments.get(&location.fragment) else {
            continue;
        };
        for mesh in fragment.package.meshes() {
            extract_submesh(mesh, location.local_index, &mut buffer);
        }
    }
    buffer
}

/// Union of the mapping bounding boxes at every location
pub fn bounds(fragments: &HashMap<String, LoadedFragment>, locations: &[MeshLocation]) -> Option<BoundingBox> {
    locations
        .iter()
        .filter_map(|location| {
            fragments
                .get(&location.fragment)?
                .index
                .bounds_at(location.local_index as usize)
                .copied()
        })
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use scene_assembly_core::{
        FragmentIndex, MappingEntry, MappingManifest, Package, SourceMesh, SubObject,
    };

    /// One quad per element; `ids[i]` is drawn with local index `i`
    fn fragment(name: &str, ids: &[&str], x_offset: f32) -> LoadedFragment {
        let entries = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let x = x_offset + i as f32 * 2.0;
                MappingEntry::new(*id, format!("{}_{}", name, i))
                    .with_bounds(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 0.0))
            })
            .collect();
        let index = FragmentIndex::from_manifest(&MappingManifest::new(entries));

        let mut mesh = SourceMesh::default();
        for i in 0..ids.len() {
            let x = x_offset + i as f32 * 2.0;
            let base = mesh.positions.len() as u32;
            mesh.positions.extend([
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(x + 1.0, 0.0, 0.0),
                Vec3::new(x + 1.0, 1.0, 0.0),
                Vec3::new(x, 1.0, 0.0),
            ]);
            mesh.normals.extend([Vec3::Z; 4]);
            mesh.uv2.extend([Vec2::new(0.0, i as f32); 4]);
            mesh.triangles
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        LoadedFragment {
            index,
            package: Package::new(name).with_sub_object(SubObject::new("mesh", mesh)),
        }
    }

    fn fragments() -> HashMap<String, LoadedFragment> {
        [
            ("A".to_string(), fragment("A", &["E1", "E2"], 0.0)),
            ("B".to_string(), fragment("B", &["E3", "E1"], 100.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_locations_span_fragments() {
        let fragments = fragments();
        let index = LocationIndex::new();
        assert!(!index.is_built());

        let locations = index.locations(&fragments, "E1");
        assert_eq!(
            locations,
            &[MeshLocation::new("A", 0), MeshLocation::new("B", 1)]
        );
        assert!(index.is_built());
        assert!(index.locations(&fragments, "nope").is_empty());
    }

    #[test]
    fn test_extract_concatenates_fragments() {
        let fragments = fragments();
        let index = LocationIndex::new();
        let geometry = extract(&fragments, index.locations(&fragments, "E1"));

        assert_eq!(geometry.triangle_count(), 4);
        assert_eq!(geometry.vertex_count(), 8);
        assert_eq!(geometry.vertices[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(geometry.vertices[4], Vec3::new(102.0, 0.0, 0.0));
        assert_eq!(geometry.triangles[6..], [4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_extract_is_an_independent_copy() {
        let mut fragments = fragments();
        let index = LocationIndex::new();
        let geometry = extract(&fragments, index.locations(&fragments, "E2"));

        fragments.get_mut("A").unwrap().package.sub_objects[0]
            .mesh
            .positions
            .clear();
        assert_eq!(geometry.vertex_count(), 4);
    }

    #[test]
    fn test_bounds_union() {
        let fragments = fragments();
        let index = LocationIndex::new();
        let bounds = bounds(&fragments, index.locations(&fragments, "E1")).unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(103.0, 1.0, 0.0));

        assert!(super::bounds(&fragments, &[]).is_none());
    }
}
