//! Fetch layer for scene assembly
//!
//! This crate defines the boundary between the assembly pipeline and the
//! remote model service:
//! - The [`AssetSource`] trait, one async primitive per artifact kind
//! - [`InMemoryAssetSource`] for offline use and tests
//! - [`CachedAssetSource`], a moka-backed decorator memoizing immutable artifacts
//!
//! # Example
//!
//! ```rust,no_run
//! use scene_assembly_source::{AssetSource, CacheConfig, CachedAssetSource, InMemoryAssetSource};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(InMemoryAssetSource::new());
//! let cached = CachedAssetSource::new(source, CacheConfig::default());
//!
//! let settings = cached.fetch_model_settings("acme", "tower").await?;
//! println!("{}", settings.name);
//! # Ok(())
//! # }
//! ```

// Re-export core domain types for convenience
pub use scene_assembly_core;

// Public modules
pub mod cache;
pub mod error;
pub mod memory;
pub mod source;

// Re-exports for convenience
pub use cache::{CacheConfig, CacheStats, CachedAssetSource};
pub use error::{SourceError, SourceResult};
pub use memory::{FetchCounts, InMemoryAssetSource};
pub use source::AssetSource;

/// Source layer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
