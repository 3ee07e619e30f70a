//! Decoded visual-asset packages

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::SourceMesh;

/// One renderable object inside a package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubObject {
    pub name: String,
    pub mesh: SourceMesh,
}

impl SubObject {
    pub fn new(name: impl Into<String>, mesh: SourceMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }
}

/// A decoded binary package holding one fragment's batched geometry
///
/// The embedded name equals the fragment name derived from the matching
/// mapping manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Embedded name
    pub name: String,

    /// World placement
    #[serde(default)]
    pub position: DVec3,

    /// Renderable sub-objects
    #[serde(default)]
    pub sub_objects: Vec<SubObject>,

    /// Shader texture grid assigned after binding, `(width, height)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_dimensions: Option<(u32, u32)>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sub_object(mut self, sub_object: SubObject) -> Self {
        self.sub_objects.push(sub_object);
        self
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Move the package by a relative offset
    pub fn translate(&mut self, offset: DVec3) {
        self.position += offset;
    }

    /// Meshes of every sub-object
    pub fn meshes(&self) -> impl Iterator<Item = &SourceMesh> {
        self.sub_objects.iter().map(|sub| &sub.mesh)
    }

    /// Total triangle count over all sub-objects
    pub fn triangle_count(&self) -> usize {
        self.meshes().map(SourceMesh::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_accumulates() {
        let mut package = Package::new("F").with_position(DVec3::new(1.0, 1.0, 1.0));
        package.translate(DVec3::new(3.0, 0.0, -7.0));
        assert_eq!(package.position, DVec3::new(4.0, 1.0, -6.0));
    }

    #[test]
    fn test_triangle_count_sums_sub_objects() {
        let mesh = SourceMesh {
            triangles: vec![0, 1, 2],
            ..Default::default()
        };
        let package = Package::new("F")
            .with_sub_object(SubObject::new("a", mesh.clone()))
            .with_sub_object(SubObject::new("b", mesh));
        assert_eq!(package.triangle_count(), 2);
        assert_eq!(package.meshes().count(), 2);
    }
}
