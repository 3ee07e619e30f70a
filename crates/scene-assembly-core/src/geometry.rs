//! Geometry buffers and per-fragment submesh extraction

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Mesh data of one renderable sub-object inside a package
///
/// `uv2` is the secondary index channel: its second component carries the
/// local submesh ordinal of each vertex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMesh {
    pub positions: Vec<Vec3>,
    #[serde(default)]
    pub normals: Vec<Vec3>,
    #[serde(default)]
    pub uv2: Vec<Vec2>,
    pub triangles: Vec<u32>,
}

impl SourceMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Local submesh ordinal encoded on a vertex
    ///
    /// Negative or non-finite channel values tag no submesh.
    pub fn local_index_of(&self, vertex: usize) -> Option<u32> {
        let y = self.uv2.get(vertex)?.y.round();
        (y.is_finite() && y >= 0.0).then(|| y as u32)
    }
}

/// Reconstructed geometry of one element
///
/// Always an independent copy; never aliases package buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffer {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<u32>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append another buffer, rebasing its triangle indices
    pub fn append(&mut self, other: GeometryBuffer) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.triangles
            .extend(other.triangles.into_iter().map(|i| i + base));
    }
}

/// Copy the vertices and triangles of one submesh out of a batched mesh
///
/// Vertices whose secondary channel (rounded) equals `local_index` are selected
/// and renumbered contiguously in their original order. A triangle is kept only
/// when all three of its corners are selected. The result is appended to `out`
/// and the number of triangles added is returned.
pub fn extract_submesh(mesh: &SourceMesh, local_index: u32, out: &mut GeometryBuffer) -> usize {
    let base = out.vertices.len() as u32;
    let mut remap: HashMap<u32, u32> = HashMap::new();

    for (vertex, position) in mesh.positions.iter().enumerate() {
        if mesh.local_index_of(vertex) != Some(local_index) {
            continue;
        }
        remap.insert(vertex as u32, base + remap.len() as u32);
        out.vertices.push(*position);
        out.normals
            .push(mesh.normals.get(vertex).copied().unwrap_or(Vec3::ZERO));
    }

    if remap.is_empty() {
        return 0;
    }

    let mut added = 0;
    for corners in mesh.triangles.chunks_exact(3) {
        let mapped = (
            remap.get(&corners[0]),
            remap.get(&corners[1]),
            remap.get(&corners[2]),
        );
        if let (Some(a), Some(b), Some(c)) = mapped {
            out.triangles.extend_from_slice(&[*a, *b, *c]);
            added += 1;
        }
    }
    added
}
