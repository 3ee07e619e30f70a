//! Federation Integration Tests
//!
//! Tests for connecting to a service, loading a multi-model federation and
//! placing its sub-models against one baseline.

mod common;

use common::fixtures::{
    federation_source, package_uri, FEDERATION, MEP_OFFSET, NAMESPACE, REVISION, STRUCTURE_OFFSET,
};
use common::{take_model, TestScene};
use glam::DVec3;
use scene_assembly_core::{Package, PackageQuality, VersionInfo};
use scene_assembly_loader::{LoaderConfig, LoaderError, SceneClient};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_loads_every_sub_model() {
    let scene = TestScene::new().await;
    let outcome = scene.load().await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.models.len(), 2);

    let structure = outcome.model("structure").unwrap();
    assert_eq!(structure.name(), "Structure");
    assert_eq!(structure.revision(), Some(REVISION));
    assert_eq!(structure.package_quality(), PackageQuality::Primary);
    assert_eq!(structure.fragments().len(), 2);
    assert!(structure.unmapped_packages().is_empty());

    let mep = outcome.model("mep").unwrap();
    assert_eq!(mep.name(), "MEP");
    assert_eq!(mep.fragments().len(), 1);
}

#[tokio::test]
async fn test_sub_models_share_one_baseline() {
    let scene = TestScene::new().await;
    let outcome = scene.load().await;

    let structure = outcome.model("structure").unwrap();
    assert_eq!(structure.source_offset(), STRUCTURE_OFFSET);
    assert_eq!(structure.placement(), DVec3::ZERO);

    let mep = outcome.model("mep").unwrap();
    let delta = MEP_OFFSET - STRUCTURE_OFFSET;
    let expected = DVec3::new(delta.x, delta.y, -delta.z);
    assert_eq!(mep.placement(), expected);
    assert_eq!(expected, DVec3::new(10.0, 2.0, 20.0));
    assert!(mep.packages().all(|package| package.position == expected));
}

#[tokio::test]
async fn test_repeat_load_reuses_cached_artifacts() {
    let scene = TestScene::new().await;
    scene.load().await;
    scene.load().await;

    let counts = scene.source.fetch_counts();
    assert_eq!(counts.descriptors, 2);
    assert_eq!(counts.manifests, 3);
    assert_eq!(counts.settings, 2);
    assert_eq!(counts.packages, 6);
}

#[tokio::test]
async fn test_repeat_load_without_cache_refetches() {
    let scene = TestScene::with_config(LoaderConfig::default().with_cache_enabled(false)).await;
    scene.load().await;
    scene.load().await;

    let counts = scene.source.fetch_counts();
    assert_eq!(counts.manifests, 6);
    assert_eq!(counts.settings, 4);
}

#[tokio::test]
async fn test_failed_sub_model_does_not_abort_siblings() {
    let scene = TestScene::new().await;
    scene.source.fail(package_uri("mep", "P")).await;

    let mut outcome = scene.load().await;
    assert!(!outcome.is_complete());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].model, "acme.mep");
    assert!(outcome.failures[0].error.is_model_loading());

    let structure = take_model(&mut outcome, "structure");
    assert_eq!(structure.placement(), DVec3::ZERO);
    assert_eq!(structure.fragments().len(), 2);
}

#[tokio::test]
async fn test_unknown_model_fails_to_load() {
    let scene = TestScene::new().await;
    let result = scene.client.load_model(NAMESPACE, "nowhere", None).await;
    assert!(result.unwrap_err().is_model_loading());
}

#[tokio::test]
async fn test_package_hook_sees_every_bound_fragment() {
    let seen: Arc<Mutex<Vec<(String, (u32, u32))>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();

    let source = Arc::new(federation_source());
    let client = SceneClient::connect(source, LoaderConfig::default())
        .await
        .unwrap()
        .with_package_hook(move |fragment: &str, package: &mut Package, dims: (u32, u32)| {
            assert_eq!(package.texture_dimensions, Some(dims));
            recorded.lock().unwrap().push((fragment.to_string(), dims));
        });

    let outcome = client.load_model(NAMESPACE, FEDERATION, None).await.unwrap();
    assert!(outcome.is_complete());

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("P".to_string(), (1, 2)),
            ("S".to_string(), (2, 2)),
            ("T".to_string(), (1, 1)),
        ]
    );
}

#[tokio::test]
async fn test_incompatible_service_is_rejected() {
    let source = federation_source()
        .with_version_info(VersionInfo::new("0.0.1", vec!["0.0.2".to_string()]));
    let result = SceneClient::connect(Arc::new(source), LoaderConfig::default()).await;
    assert!(matches!(result, Err(LoaderError::IncompatibleVersion(_))));
}
