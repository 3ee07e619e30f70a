//! Common test utilities and helpers
//!
//! This module provides shared setup for integration tests: an in-memory
//! federation and a connected client over it.

use scene_assembly_loader::{LoadOutcome, LoaderConfig, Model, SceneClient};
use scene_assembly_source::InMemoryAssetSource;
use std::sync::Arc;

pub mod fixtures;

use fixtures::{federation_source, FEDERATION, NAMESPACE};

/// A client connected to the fixture federation
pub struct TestScene {
    pub source: Arc<InMemoryAssetSource>,
    pub client: SceneClient,
}

impl TestScene {
    /// Connect with the default configuration
    pub async fn new() -> Self {
        Self::with_config(LoaderConfig::default()).await
    }

    pub async fn with_config(config: LoaderConfig) -> Self {
        Self::with_source(federation_source(), config).await
    }

    pub async fn with_source(source: InMemoryAssetSource, config: LoaderConfig) -> Self {
        let source = Arc::new(source);
        let client = SceneClient::connect(source.clone(), config)
            .await
            .expect("Failed to connect test client");
        Self { source, client }
    }

    /// Load the whole federation
    pub async fn load(&self) -> LoadOutcome {
        self.client
            .load_model(NAMESPACE, FEDERATION, None)
            .await
            .expect("Failed to load federation")
    }
}

/// Take a sub-model out of an outcome
pub fn take_model(outcome: &mut LoadOutcome, model_id: &str) -> Model {
    let position = outcome
        .models
        .iter()
        .position(|model| model.model_id() == model_id)
        .unwrap_or_else(|| panic!("Sub-model {} was not loaded", model_id));
    outcome.models.remove(position)
}
