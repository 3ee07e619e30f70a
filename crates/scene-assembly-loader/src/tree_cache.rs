//! Lazily built element tree
//!
//! The tree of a model is fetched on first query and indexed once. Concurrent
//! first queries share a single fetch; a failed fetch leaves the cache empty
//! so a later query may retry.

use scene_assembly_core::ElementTree;
use scene_assembly_source::AssetSource;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::error::{LoaderError, LoaderResult};

/// Single-flight cache of one model's element tree
#[derive(Debug, Default)]
pub struct TreeCache {
    cell: OnceCell<ElementTree>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree has been fetched and indexed
    pub fn is_built(&self) -> bool {
        self.cell.initialized()
    }

    /// The indexed tree, if already built
    pub fn get(&self) -> Option<&ElementTree> {
        self.cell.get()
    }

    /// Return the indexed tree, fetching it on first use
    #[instrument(skip(self, source))]
    pub async fn get_or_build(
        &self,
        source: &dyn AssetSource,
        namespace: &str,
        model_id: &str,
        revision: Option<&str>,
    ) -> LoaderResult<&ElementTree> {
        self.cell
            .get_or_try_init(|| async {
                debug!("Fetching element tree");
                let root = source
                    .fetch_element_tree(namespace, model_id, revision)
                    .await?;
                let tree = ElementTree::build(root);
                info!(
                    nodes = tree.len(),
                    shared_ids = tree.shared_id_count(),
                    "Indexed element tree"
                );
                Ok::<_, LoaderError>(tree)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_assembly_core::TreeNode;
    use scene_assembly_source::InMemoryAssetSource;
    use std::time::Duration;

    fn tree() -> TreeNode {
        TreeNode::new("root", "Site")
            .with_shared_id("s-root")
            .with_child(TreeNode::new("e1", "Wall").with_shared_id("s-e1"))
            .with_child(TreeNode::new("e2", "Door"))
    }

    #[tokio::test]
    async fn test_builds_once() {
        let source = InMemoryAssetSource::new().with_element_tree("acme", "tower", None, tree());
        let cache = TreeCache::new();
        assert!(!cache.is_built());

        let first = cache.get_or_build(&source, "acme", "tower", None).await.unwrap();
        assert_eq!(first.len(), 3);
        let second = cache.get_or_build(&source, "acme", "tower", None).await.unwrap();
        assert_eq!(second.len(), 3);

        assert!(cache.is_built());
        assert_eq!(source.fetch_counts().trees, 1);
    }

    #[tokio::test]
    async fn test_shared_id_index_is_populated() {
        let source = InMemoryAssetSource::new().with_element_tree("acme", "tower", None, tree());
        let cache = TreeCache::new();
        let tree = cache.get_or_build(&source, "acme", "tower", None).await.unwrap();

        assert_eq!(tree.unique_id_for("s-e1").unwrap().as_str(), "e1");
        assert_eq!(tree.unique_id_for("s-root").unwrap().as_str(), "root");
        assert_eq!(tree.shared_id_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_fetches_once() {
        let source = InMemoryAssetSource::new()
            .with_latency(Duration::from_millis(20))
            .with_element_tree("acme", "tower", None, tree());
        let cache = TreeCache::new();

        let (a, b, c) = tokio::join!(
            cache.get_or_build(&source, "acme", "tower", None),
            cache.get_or_build(&source, "acme", "tower", None),
            cache.get_or_build(&source, "acme", "tower", None),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.fetch_counts().trees, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_can_retry() {
        let path = scene_assembly_core::routes::element_tree_path("acme", "tower", None);
        let source = InMemoryAssetSource::new()
            .with_element_tree("acme", "tower", None, tree())
            .with_failure(path.clone());
        let cache = TreeCache::new();

        assert!(cache.get_or_build(&source, "acme", "tower", None).await.is_err());
        assert!(!cache.is_built());

        source.recover(&path).await;
        assert!(cache.get_or_build(&source, "acme", "tower", None).await.is_ok());
        assert_eq!(source.fetch_counts().trees, 2);
    }
}
