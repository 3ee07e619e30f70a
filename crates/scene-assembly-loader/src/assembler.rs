//! Model assembly
//!
//! Turns asset descriptors into [`Model`]s: resolves the package set, fetches
//! settings, mapping manifests and packages concurrently, pairs them in a
//! [`PackageRegistry`] and places every package in the load's shared frame.

use futures::future::join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use glam::DVec3;
use scene_assembly_core::{
    revision_from_uri, AssetDescriptor, FragmentIndex, OffsetNormalizer, Package,
};
use scene_assembly_source::AssetSource;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::extractor::LocationIndex;
use crate::hook::PackageHook;
use crate::metadata::MetadataCache;
use crate::model::Model;
use crate::registry::PackageRegistry;
use crate::tree_cache::TreeCache;

/// A sub-model that could not be assembled
#[derive(Debug)]
pub struct SubModelFailure {
    /// `namespace.model` of the failed sub-model
    pub model: String,
    pub error: LoaderError,
}

/// Result of one load call
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Assembled sub-models in descriptor order
    pub models: Vec<Model>,

    /// Sub-models that failed; siblings are unaffected
    pub failures: Vec<SubModelFailure>,
}

impl LoadOutcome {
    /// Whether every sub-model was assembled
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Assembled sub-model with the given id
    pub fn model(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.model_id() == model_id)
    }
}

/// State scoped to a single load call
///
/// Holds the offset baseline so concurrent loads never share one.
#[derive(Debug)]
pub struct LoadSession {
    normalizer: OffsetNormalizer,
    allow_fallback: bool,
}

impl LoadSession {
    pub fn new(allow_fallback: bool) -> Self {
        Self {
            normalizer: OffsetNormalizer::new(),
            allow_fallback,
        }
    }

    /// Compute the placement offset of the next sub-model
    ///
    /// Sub-models without a usable package set fail here and leave the
    /// baseline untouched.
    pub fn place(&mut self, descriptor: &AssetDescriptor) -> LoaderResult<DVec3> {
        descriptor.package_set(self.allow_fallback)?;
        Ok(self.normalizer.place(descriptor.offset))
    }

    /// Baseline fixed by the first placed sub-model
    pub fn baseline(&self) -> Option<DVec3> {
        self.normalizer.baseline()
    }
}

/// Assembles models from an asset source
pub struct ModelAssembler {
    source: Arc<dyn AssetSource>,
    config: LoaderConfig,
    hook: Option<Arc<dyn PackageHook>>,
}

impl ModelAssembler {
    pub fn new(source: Arc<dyn AssetSource>, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            hook: None,
        }
    }

    /// Call `hook` once for every package bound to a fragment
    pub fn with_package_hook(mut self, hook: impl PackageHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a model or federation
    ///
    /// Fails as a whole only when the service has no descriptors for the
    /// model. Sub-model failures are reported in [`LoadOutcome::failures`].
    #[instrument(skip(self))]
    pub async fn load_model(
        &self,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> LoaderResult<LoadOutcome> {
        let label = format!("{}.{}", namespace, model_id);
        let set = self
            .source
            .fetch_asset_descriptors(namespace, model_id, revision)
            .await
            .map_err(|e| LoaderError::model_loading(&label, e))?
            .filter(|set| !set.models.is_empty())
            .ok_or_else(|| LoaderError::model_loading(&label, "no asset descriptors"))?;

        info!(
            sub_models = set.models.len(),
            federation = set.is_federation(),
            "Loading model"
        );

        let mut session = LoadSession::new(self.config.allow_fallback_packages);
        let mut outcome = LoadOutcome::default();
        let mut planned = Vec::with_capacity(set.models.len());
        for descriptor in &set.models {
            match session.place(descriptor) {
                Ok(placement) => planned.push((descriptor, placement)),
                Err(error) => {
                    warn!(model = %descriptor.qualified_name(), error = %error, "Skipping sub-model");
                    outcome.failures.push(SubModelFailure {
                        model: descriptor.qualified_name(),
                        error,
                    });
                }
            }
        }

        let results = join_all(
            planned
                .iter()
                .map(|(descriptor, placement)| self.assemble(descriptor, *placement)),
        )
        .await;

        for ((descriptor, _), result) in planned.iter().zip(results) {
            match result {
                Ok(model) => outcome.models.push(model),
                Err(error) => {
                    warn!(model = %descriptor.qualified_name(), error = %error, "Sub-model failed to load");
                    outcome.failures.push(SubModelFailure {
                        model: descriptor.qualified_name(),
                        error,
                    });
                }
            }
        }

        info!(
            loaded = outcome.models.len(),
            failed = outcome.failures.len(),
            "Model load finished"
        );
        Ok(outcome)
    }

    /// Assemble one sub-model at a placement offset
    #[instrument(skip(self, descriptor), fields(model = %descriptor.qualified_name()))]
    pub async fn assemble(&self, descriptor: &AssetDescriptor, placement: DVec3) -> LoaderResult<Model> {
        let label = descriptor.qualified_name();
        let label = label.as_str();

        let package_set = descriptor.package_set(self.config.allow_fallback_packages)?;
        if package_set.is_degraded() {
            warn!("No primary packages, loading fallback packages at reduced quality");
        }
        let revision = package_set.first().and_then(revision_from_uri);
        let concurrency = self.config.fetch_concurrency.max(1);

        let settings = async {
            self.source
                .fetch_model_settings(&descriptor.namespace, &descriptor.model_id)
                .await
                .map_err(|e| LoaderError::model_loading(label, format!("settings: {}", e)))
        };

        let indices = stream::iter(descriptor.mapping_manifests.iter())
            .map(|uri| async move {
                let manifest = self
                    .source
                    .fetch_mapping_manifest(uri)
                    .await
                    .map_err(|e| LoaderError::model_loading(label, format!("manifest {}: {}", uri, e)))?;
                Ok::<_, LoaderError>(FragmentIndex::from_manifest(&manifest))
            })
            .buffered(concurrency)
            .try_collect::<Vec<_>>();

        let packages = stream::iter(package_set.uris.iter())
            .map(|uri| async move {
                let mut package = self
                    .source
                    .fetch_package(uri)
                    .await
                    .map_err(|e| LoaderError::model_loading(label, format!("package {}: {}", uri, e)))?;
                package.translate(placement);
                Ok::<_, LoaderError>(package)
            })
            .buffered(concurrency)
            .try_collect::<Vec<Package>>();

        let (settings, indices, packages) = tokio::try_join!(settings, indices, packages)?;

        let mut registry = PackageRegistry::new();
        for index in indices {
            registry.register_index(index);
        }
        for package in packages {
            registry.bind(package);
        }
        let mut contents = registry.finish();

        for (name, fragment) in contents.fragments.iter_mut() {
            let dimensions = fragment.index.texture_dimensions();
            fragment.package.texture_dimensions = Some(dimensions);
            if let Some(hook) = &self.hook {
                hook.on_package_bound(name, &mut fragment.package, dimensions);
            }
            debug!(fragment = %name, submeshes = fragment.index.len(), "Fragment ready");
        }

        info!(
            fragments = contents.fragments.len(),
            unmapped = contents.unmapped_packages.len(),
            quality = %package_set.quality,
            "Assembled sub-model"
        );

        Ok(Model {
            namespace: descriptor.namespace.clone(),
            model_id: descriptor.model_id.clone(),
            revision,
            unit: settings.unit().map(str::to_string),
            angle_from_north: settings.angle_from_north,
            survey_point: settings.survey_point().copied(),
            name: settings.name,
            source_offset: descriptor.offset,
            placement,
            package_quality: package_set.quality,
            fragments: contents.fragments,
            unmapped_packages: contents.unmapped_packages,
            tree: TreeCache::new(),
            metadata: MetadataCache::new(),
            locations: LocationIndex::new(),
            source: self.source.clone(),
        })
    }
}
