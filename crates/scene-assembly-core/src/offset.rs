//! World offset normalization across a federation
//!
//! Sub-models of a federation are authored at arbitrary, often very large,
//! world offsets. The first sub-model placed becomes the baseline and every
//! sibling is positioned relative to it. The target frame has the opposite
//! handedness to the source frame, so the depth axis is negated.

use glam::DVec3;

/// Compute a relative placement offset against an optional baseline
///
/// Returns the baseline to keep for the next call and the relative offset for
/// `candidate`. Without a baseline the candidate becomes the baseline and the
/// relative offset is zero.
pub fn normalize(candidate: DVec3, baseline: Option<DVec3>) -> (Option<DVec3>, DVec3) {
    match baseline {
        None => (Some(candidate), DVec3::ZERO),
        Some(base) => {
            let delta = candidate - base;
            (Some(base), DVec3::new(delta.x, delta.y, -delta.z))
        }
    }
}

/// Offset baseline scoped to a single load operation
#[derive(Debug, Clone, Default)]
pub struct OffsetNormalizer {
    baseline: Option<DVec3>,
}

impl OffsetNormalizer {
    /// Create a normalizer with no baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline fixed by the first placed sub-model, if any
    pub fn baseline(&self) -> Option<DVec3> {
        self.baseline
    }

    /// Relative placement offset for the next sub-model
    pub fn place(&mut self, candidate: DVec3) -> DVec3 {
        let (baseline, relative) = normalize(candidate, self.baseline);
        self.baseline = baseline;
        relative
    }
}
