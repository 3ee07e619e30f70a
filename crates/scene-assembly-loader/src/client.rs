//! Entry point for loading models from a remote service

use scene_assembly_core::check_compatibility;
use scene_assembly_source::{AssetSource, CachedAssetSource};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::assembler::{LoadOutcome, ModelAssembler};
use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::hook::PackageHook;

/// Version of this client checked against the service
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A checked connection to a model service
///
/// # Example
///
/// ```rust,no_run
/// use scene_assembly_loader::{LoaderConfig, SceneClient};
/// use scene_assembly_source::InMemoryAssetSource;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SceneClient::connect(Arc::new(InMemoryAssetSource::new()), LoaderConfig::default()).await?;
/// let outcome = client.load_model("acme", "tower", None).await?;
/// for model in &outcome.models {
///     println!("{} ({} fragments)", model.name(), model.fragments().len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct SceneClient {
    assembler: ModelAssembler,
}

impl SceneClient {
    /// Validate the configuration, wrap the source in a cache when enabled and
    /// check that the service accepts this client
    #[instrument(skip(source, config))]
    pub async fn connect(source: Arc<dyn AssetSource>, config: LoaderConfig) -> LoaderResult<Self> {
        config.validate()?;

        let source: Arc<dyn AssetSource> = if config.cache.enabled {
            Arc::new(CachedAssetSource::new(source, config.cache.cache_config()))
        } else {
            source
        };

        match source.fetch_version_info().await {
            Ok(info) => {
                check_compatibility(&info, CLIENT_VERSION)
                    .map_err(|e| LoaderError::IncompatibleVersion(e.to_string()))?;
            }
            Err(err) if err.is_not_found() => {
                warn!("Service does not publish a version document, skipping compatibility check");
            }
            Err(err) => return Err(err.into()),
        }

        info!(client_version = CLIENT_VERSION, "Connected to model service");
        Ok(Self {
            assembler: ModelAssembler::new(source, config),
        })
    }

    /// Call `hook` once for every package bound to a fragment
    pub fn with_package_hook(mut self, hook: impl PackageHook + 'static) -> Self {
        self.assembler = self.assembler.with_package_hook(hook);
        self
    }

    /// Load a model or federation
    pub async fn load_model(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> LoaderResult<LoadOutcome> {
        self.assembler.load_model(namespace, model_id, revision).await
    }

    pub fn assembler(&self) -> &ModelAssembler {
        &self.assembler
    }

    pub fn config(&self) -> &LoaderConfig {
        self.assembler.config()
    }
}
