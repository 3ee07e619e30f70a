//! Resource paths of the remote model service
//!
//! Paths are relative to the service root. A missing revision resolves to the
//! `master/head` segment, which the service serves as the latest revision.

use crate::revision::LATEST_REVISION;

fn revision_segment(revision: Option<&str>) -> String {
    match revision {
        Some(rev) if !rev.is_empty() => rev.to_string(),
        _ => format!("{}/head", LATEST_REVISION),
    }
}

/// Path of the asset descriptor set of a model
pub fn asset_descriptors_path(namespace: &str, model_id: &str, revision: Option<&str>) -> String {
    format!(
        "{}/{}/revision/{}/unityAssets.json",
        namespace,
        model_id,
        revision_segment(revision)
    )
}

/// Path of the full element tree of a model
pub fn element_tree_path(namespace: &str, model_id: &str, revision: Option<&str>) -> String {
    format!(
        "{}/{}/revision/{}/fullTree.json",
        namespace,
        model_id,
        revision_segment(revision)
    )
}

/// Path of one metadata record
pub fn metadata_path(namespace: &str, model_id: &str, metadata_id: &str) -> String {
    format!("{}/{}/meta/{}.json", namespace, model_id, metadata_id)
}

/// Path of the metadata field search
pub fn metadata_search_path(
    namespace: &str,
    model_id: &str,
    revision: Option<&str>,
    field: &str,
) -> String {
    format!(
        "{}/{}/revision/{}/meta/findObjsWith/{}.json",
        namespace,
        model_id,
        revision_segment(revision),
        field
    )
}

/// Path of the model settings
pub fn model_settings_path(namespace: &str, model_id: &str) -> String {
    format!("{}/{}.json", namespace, model_id)
}

/// Path of the service version document
pub fn version_path() -> &'static str {
    "version"
}
