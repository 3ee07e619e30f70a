//! Test fixtures
//!
//! A two-model federation published at revision `r42`:
//!
//! - `structure`: fragments `S` and `T`; `wall-1` is split across both
//! - `mep`: fragment `P`

use glam::{DVec3, Vec2, Vec3};
use scene_assembly_core::{
    AssetDescriptor, AssetDescriptorSet, MappingEntry, MappingManifest, MetadataSearchResult,
    ModelSettings, Package, Properties, SourceMesh, SubObject, TreeNode, VersionInfo,
};
use scene_assembly_loader::CLIENT_VERSION;
use scene_assembly_source::InMemoryAssetSource;
use serde_json::json;

pub const NAMESPACE: &str = "acme";
pub const FEDERATION: &str = "site";
pub const REVISION: &str = "r42";

pub const STRUCTURE_OFFSET: DVec3 = DVec3::new(1000.0, 0.0, 500.0);
pub const MEP_OFFSET: DVec3 = DVec3::new(1010.0, 2.0, 480.0);

pub fn manifest_uri(model_id: &str, fragment: &str) -> String {
    format!("{}/{}/revision/{}/{}.json.mpc", NAMESPACE, model_id, REVISION, fragment)
}

pub fn package_uri(model_id: &str, fragment: &str) -> String {
    format!("{}/{}/revision/{}/{}.unity3d", NAMESPACE, model_id, REVISION, fragment)
}

/// One unit quad per element, laid out along x; `ids[i]` is drawn with local index `i`
pub fn quad_fragment(name: &str, ids: &[&str], x_offset: f32) -> (MappingManifest, Package) {
    let mut entries = Vec::new();
    let mut mesh = SourceMesh::default();

    for (i, id) in ids.iter().enumerate() {
        let x = x_offset + i as f32 * 2.0;
        entries.push(
            MappingEntry::new(*id, format!("{}_{}", name, i))
                .with_bounds(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 0.0)),
        );

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

    (
        MappingManifest::new(entries),
        Package::new(name).with_sub_object(SubObject::new("batch", mesh)),
    )
}

fn properties(value: serde_json::Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

fn add_fragments(
    mut source: InMemoryAssetSource,
    model_id: &str,
    offset: DVec3,
    fragments: Vec<(&str, Vec<&str>, f32)>,
) -> (InMemoryAssetSource, AssetDescriptor) {
    let mut manifests = Vec::new();
    let mut packages = Vec::new();
    for (name, ids, x_offset) in fragments {
        let (manifest, package) = quad_fragment(name, &ids, x_offset);
        source = source
            .with_mapping_manifest(manifest_uri(model_id, name), manifest)
            .with_package(package_uri(model_id, name), package);
        manifests.push(manifest_uri(model_id, name));
        packages.push(package_uri(model_id, name));
    }

    let descriptor = AssetDescriptor::new(NAMESPACE, model_id)
        .with_packages(packages)
        .with_mapping_manifests(manifests)
        .with_offset(offset);
    (source, descriptor)
}

fn structure(source: InMemoryAssetSource) -> (InMemoryAssetSource, AssetDescriptor) {
    let (source, descriptor) = add_fragments(
        source,
        "structure",
        STRUCTURE_OFFSET,
        vec![
            ("S", vec!["wall-1", "wall-2", "slab-1"], 0.0),
            ("T", vec!["wall-1"], 50.0),
        ],
    );

    let tree = TreeNode::new("structure-root", "Structure")
        .with_shared_id("s-structure")
        .with_type("Model")
        .with_child(
            TreeNode::new("level-1", "Level 1")
                .with_type("Level")
                .with_child(
                    TreeNode::new("wall-1", "Basic Wall")
                        .with_shared_id("sw-1")
                        .with_type("Wall")
                        .with_meta("m-wall-1")
                        .with_meta("m-fire-1"),
                )
                .with_child(
                    TreeNode::new("wall-2", "Basic Wall")
                        .with_shared_id("sw-2")
                        .with_type("Wall"),
                )
                .with_child(
                    TreeNode::new("slab-1", "Floor")
                        .with_shared_id("ss-1")
                        .with_type("Floor")
                        .with_meta("m-slab-1"),
                ),
        );

    let source = source
        .with_model_settings(NAMESPACE, "structure", ModelSettings::new("Structure", "mm"))
        .with_element_tree(NAMESPACE, "structure", Some(REVISION), tree)
        .with_metadata(
            NAMESPACE,
            "structure",
            "m-wall-1",
            properties(json!({ "Material": "Concrete", "Width": 300 })),
        )
        .with_metadata(
            NAMESPACE,
            "structure",
            "m-fire-1",
            properties(json!({ "FireRating": "2h" })),
        )
        .with_metadata(
            NAMESPACE,
            "structure",
            "m-slab-1",
            properties(json!({ "Material": "Concrete", "Thickness": 200 })),
        )
        .with_search_results(
            NAMESPACE,
            "structure",
            Some(REVISION),
            "Material",
            vec![
                MetadataSearchResult::new("m-wall-1", json!("Concrete")).with_parent("wall-1"),
                MetadataSearchResult::new("m-slab-1", json!("Concrete")).with_parent("slab-1"),
            ],
        );
    (source, descriptor)
}

fn mep(source: InMemoryAssetSource) -> (InMemoryAssetSource, AssetDescriptor) {
    let (source, descriptor) = add_fragments(
        source,
        "mep",
        MEP_OFFSET,
        vec![("P", vec!["duct-1", "duct-2"], 0.0)],
    );

    let tree = TreeNode::new("mep-root", "MEP")
        .with_shared_id("s-mep")
        .with_child(TreeNode::new("duct-1", "Duct").with_shared_id("sd-1"))
        .with_child(TreeNode::new("duct-2", "Duct").with_shared_id("sd-2"));

    let source = source
        .with_model_settings(NAMESPACE, "mep", ModelSettings::new("MEP", "mm"))
        .with_element_tree(NAMESPACE, "mep", Some(REVISION), tree);
    (source, descriptor)
}

/// The federation source with a compatible version document
pub fn federation_source() -> InMemoryAssetSource {
    let (source, structure) = structure(InMemoryAssetSource::new());
    let (source, mep) = mep(source);

    source
        .with_asset_descriptors(
            NAMESPACE,
            FEDERATION,
            None,
            AssetDescriptorSet {
                models: vec![structure, mep],
            },
        )
        .with_version_info(VersionInfo::new(CLIENT_VERSION, Vec::new()))
}
