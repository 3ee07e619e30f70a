//! Delivery descriptors for sub-models
//!
//! A descriptor tells the assembler where every artifact of one sub-model lives:
//! the mapping manifests, the binary packages (in a primary and a fallback
//! flavour) and the world offset the sub-model was authored at.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SceneError};

/// Delivery manifest of one sub-model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Primary (richer) binary package locators
    #[serde(rename = "vrAssets", default)]
    pub packages: Vec<String>,

    /// Fallback binary package locators, used when no primary set exists
    #[serde(rename = "assets", default)]
    pub fallback_packages: Vec<String>,

    /// Mapping manifest locators, one per fragment
    #[serde(rename = "jsonFiles", default)]
    pub mapping_manifests: Vec<String>,

    /// World offset the sub-model was authored at
    #[serde(default)]
    pub offset: DVec3,

    /// Owning namespace
    #[serde(rename = "database")]
    pub namespace: String,

    /// Model identifier
    #[serde(rename = "model")]
    pub model_id: String,
}

/// Which of the two package sets was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageQuality {
    /// The primary set
    Primary,
    /// The fallback set, rendered at reduced quality
    Fallback,
}

impl fmt::Display for PackageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The package locators an assembler should fetch for one sub-model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSet<'a> {
    /// Locators in descriptor order
    pub uris: &'a [String],
    /// Quality of the selected set
    pub quality: PackageQuality,
}

impl PackageSet<'_> {
    /// First locator of the set, used to derive the revision id
    pub fn first(&self) -> Option<&str> {
        self.uris.first().map(String::as_str)
    }

    /// Whether the degraded set was selected
    pub fn is_degraded(&self) -> bool {
        self.quality == PackageQuality::Fallback
    }
}

impl AssetDescriptor {
    /// Create a descriptor with no artifacts
    pub fn new(namespace: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            packages: Vec::new(),
            fallback_packages: Vec::new(),
            mapping_manifests: Vec::new(),
            offset: DVec3::ZERO,
            namespace: namespace.into(),
            model_id: model_id.into(),
        }
    }

    /// Set the primary package locators
    pub fn with_packages(mut self, uris: Vec<String>) -> Self {
        self.packages = uris;
        self
    }

    /// Set the fallback package locators
    pub fn with_fallback_packages(mut self, uris: Vec<String>) -> Self {
        self.fallback_packages = uris;
        self
    }

    /// Set the mapping manifest locators
    pub fn with_mapping_manifests(mut self, uris: Vec<String>) -> Self {
        self.mapping_manifests = uris;
        self
    }

    /// Set the authored world offset
    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }

    /// `namespace.model` label used in logs and errors
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.model_id)
    }

    /// Select the package set to load
    ///
    /// Prefers the primary set. When it is empty the fallback set is returned
    /// with [`PackageQuality::Fallback`], unless `allow_fallback` is false.
    pub fn package_set(&self, allow_fallback: bool) -> Result<PackageSet<'_>> {
        if !self.packages.is_empty() {
            return Ok(PackageSet {
                uris: &self.packages,
                quality: PackageQuality::Primary,
            });
        }

        if self.fallback_packages.is_empty() {
            return Err(SceneError::NoPackages(self.qualified_name()));
        }

        if !allow_fallback {
            return Err(SceneError::FallbackRejected(self.qualified_name()));
        }

        Ok(PackageSet {
            uris: &self.fallback_packages,
            quality: PackageQuality::Fallback,
        })
    }
}

/// Every sub-model delivered for one load request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptorSet {
    /// One descriptor per sub-model; a federation has many
    #[serde(default)]
    pub models: Vec<AssetDescriptor>,
}

impl AssetDescriptorSet {
    /// Whether this set describes a federation
    pub fn is_federation(&self) -> bool {
        self.models.len() > 1
    }
}
