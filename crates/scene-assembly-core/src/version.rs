//! Client/service version compatibility

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// Versions of this client the service accepts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientVersionInfo {
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub supported: Vec<String>,
}

/// Version document published by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Service version
    #[serde(rename = "VERSION", default)]
    pub service: Option<String>,

    /// Client section; older services do not publish it
    #[serde(rename = "unitydll", default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientVersionInfo>,
}

impl VersionInfo {
    pub fn new(current: impl Into<String>, supported: Vec<String>) -> Self {
        Self {
            service: None,
            client: Some(ClientVersionInfo {
                current: current.into(),
                supported,
            }),
        }
    }
}

fn same_version(published: &str, client: &Version) -> bool {
    Version::parse(published.trim_start_matches('v'))
        .map(|v| &v == client)
        .unwrap_or(false)
}

/// Check whether `client_version` is accepted by the service
///
/// A service without a client section accepts every client.
pub fn check_compatibility(info: &VersionInfo, client_version: &str) -> Result<()> {
    let Some(section) = &info.client else {
        return Ok(());
    };
    let client = Version::parse(client_version)?;

    let accepted = same_version(&section.current, &client)
        || section.supported.iter().any(|v| same_version(v, &client));

    if accepted {
        Ok(())
    } else {
        Err(SceneError::IncompatibleVersion {
            client: client_version.to_string(),
            current: section.current.clone(),
        })
    }
}
