//! Core domain models for scene assembly
//!
//! This crate contains the data structures and pure logic used to assemble a
//! queryable 3D model out of independently delivered fragments: descriptors,
//! mapping manifests and fragment indices, offset normalization, the element
//! tree and its indices, metadata records and per-fragment geometry
//! extraction. Nothing in here performs I/O.

pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod metadata;
pub mod offset;
pub mod package;
pub mod revision;
pub mod routes;
pub mod settings;
pub mod tree;
pub mod types;
pub mod version;

// Re-exports for convenience
pub use descriptor::{AssetDescriptor, AssetDescriptorSet, PackageQuality, PackageSet};
pub use error::{Result, SceneError};
pub use geometry::{extract_submesh, BoundingBox, GeometryBuffer, SourceMesh};
pub use mapping::{fragment_name_from_usage, FragmentIndex, MappingEntry, MappingManifest};
pub use metadata::{MetadataSearchResult, SearchValue};
pub use offset::{normalize, OffsetNormalizer};
pub use package::{Package, SubObject};
pub use revision::{revision_from_uri, LATEST_REVISION};
pub use settings::{ModelProperties, ModelSettings, SurveyPoint};
pub use tree::{ElementTree, TreeNode};
pub use types::{ElementId, MeshLocation, MetadataId, Properties, SharedId};
pub use version::{check_compatibility, ClientVersionInfo, VersionInfo};
