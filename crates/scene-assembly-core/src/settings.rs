//! Model settings: naming, units and geographic reference

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Survey point tying a world position to a geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPoint {
    /// Position in model coordinates
    pub position: DVec3,

    /// Latitude and longitude in degrees
    pub lat_long: DVec2,
}

/// Unit and other model-wide properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelProperties {
    /// Measurement unit (e.g. "mm", "m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Settings of one model as published by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSettings {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Model-wide properties
    #[serde(default)]
    pub properties: ModelProperties,

    /// Survey points; only the first one is used
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub survey_points: Vec<SurveyPoint>,

    /// Angle from north in degrees, clockwise
    #[serde(default)]
    pub angle_from_north: f64,
}

impl ModelSettings {
    /// Create settings with a name and unit
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: ModelProperties {
                unit: Some(unit.into()),
            },
            survey_points: Vec::new(),
            angle_from_north: 0.0,
        }
    }

    /// Measurement unit, if published
    pub fn unit(&self) -> Option<&str> {
        self.properties.unit.as_deref()
    }

    /// The survey point used for geographic reference
    pub fn survey_point(&self) -> Option<&SurveyPoint> {
        self.survey_points.first()
    }
}
