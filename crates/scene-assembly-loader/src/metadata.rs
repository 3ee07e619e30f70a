//! Metadata resolution for tree elements

use futures::future::try_join_all;
use scene_assembly_core::{MetadataId, MetadataSearchResult, Properties};
use scene_assembly_source::AssetSource;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument};

use crate::error::LoaderResult;

/// Resolved metadata records of one model, kept for the model's lifetime
///
/// Each record is fetched at most once. Concurrent first requests for the
/// same id share one fetch; a failed fetch is not remembered.
#[derive(Debug, Default)]
pub struct MetadataCache {
    records: Mutex<HashMap<MetadataId, Arc<OnceCell<Properties>>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records resolved so far
    pub async fn len(&self) -> usize {
        self.records
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn cell(&self, metadata_id: &str) -> Arc<OnceCell<Properties>> {
        self.records
            .lock()
            .await
            .entry(metadata_id.to_string())
            .or_default()
            .clone()
    }
}

/// Resolves metadata references of one model
pub struct MetadataResolver<'a> {
    source: &'a dyn AssetSource,
    namespace: &'a str,
    model_id: &'a str,
    cache: Option<&'a MetadataCache>,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(source: &'a dyn AssetSource, namespace: &'a str, model_id: &'a str) -> Self {
        Self {
            source,
            namespace,
            model_id,
            cache: None,
        }
    }

    /// Remember resolved records in `cache`
    pub fn with_cache(mut self, cache: &'a MetadataCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch every referenced record, in reference order
    ///
    /// A record the service does not have resolves to an empty property map
    /// so positions stay aligned with `refs`.
    #[instrument(skip(self), fields(namespace = %self.namespace, model = %self.model_id))]
    pub async fn resolve(&self, refs: &[MetadataId]) -> LoaderResult<Vec<Properties>> {
        if refs.is_empty() {
            return Ok(Vec::new());
        }

        let fetches = refs.iter().map(|id| async move {
            match self.cache {
                Some(cache) => {
                    let cell = cache.cell(id).await;
                    let record = cell.get_or_try_init(|| self.fetch(id)).await.cloned();
                    record
                }
                None => self.fetch(id).await,
            }
        });

        try_join_all(fetches).await
    }

    /// Find every metadata record carrying `field`
    #[instrument(skip(self), fields(namespace = %self.namespace, model = %self.model_id))]
    pub async fn search(
        &self,
        revision: Option<&str>,
        field: &str,
    ) -> LoaderResult<Vec<MetadataSearchResult>> {
        let results = self
            .source
            .search_metadata(self.namespace, self.model_id, revision, field)
            .await?;
        debug!(hits = results.len(), "Metadata search complete");
        Ok(results)
    }

    async fn fetch(&self, metadata_id: &str) -> LoaderResult<Properties> {
        let record = self
            .source
            .fetch_metadata(self.namespace, self.model_id, metadata_id)
            .await?;
        if record.is_none() {
            debug!(metadata_id = %metadata_id, "Metadata record not found");
        }
        Ok(record.unwrap_or_default())
    }
}
