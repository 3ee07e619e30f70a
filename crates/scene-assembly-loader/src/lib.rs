//! Model assembly for fragmented 3D models
//!
//! This crate turns the artifacts published by a model service into
//! queryable, placed models. It sits on top of an [`AssetSource`] and
//! orchestrates loading, indexing and extraction.
//!
//! # Architecture
//!
//! - **SceneClient**: checks service compatibility and owns the assembler
//! - **ModelAssembler**: loads every sub-model of a federation and places it
//!   against a shared baseline
//! - **PackageRegistry**: pairs fragment indices with their packages
//! - **Model**: per sub-model queries over the element tree, metadata and
//!   geometry
//!
//! # Example
//!
//! ```rust,no_run
//! use scene_assembly_loader::config::{get_config_dir, get_environment};
//! use scene_assembly_loader::{LoaderConfig, SceneClient};
//! use scene_assembly_source::InMemoryAssetSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoaderConfig::load_or_default(get_config_dir(), &get_environment());
//! let client = SceneClient::connect(Arc::new(InMemoryAssetSource::new()), config).await?;
//!
//! let outcome = client.load_model("acme", "site", None).await?;
//! for failure in &outcome.failures {
//!     eprintln!("{} failed: {}", failure.model, failure.error);
//! }
//! if let Some(model) = outcome.models.first() {
//!     let geometry = model.extract_geometry("wall-17")?;
//!     println!("{} triangles", geometry.triangle_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod hook;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod tracing_setup;
pub mod tree_cache;

pub use assembler::{LoadOutcome, LoadSession, ModelAssembler, SubModelFailure};
pub use client::{SceneClient, CLIENT_VERSION};
pub use config::{CacheSettings, LoaderConfig, LoggingConfig};
pub use error::{LoaderError, LoaderResult};
pub use extractor::{LocationIndex, LocationMap};
pub use hook::PackageHook;
pub use metadata::{MetadataCache, MetadataResolver};
pub use model::Model;
pub use registry::{LoadedFragment, Lookup, PackageRegistry, RegistryContents};
pub use tracing_setup::init_tracing;
pub use tree_cache::TreeCache;

pub use scene_assembly_core;
pub use scene_assembly_source;
pub use scene_assembly_source::AssetSource;
