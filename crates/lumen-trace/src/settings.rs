//! Render settings.

use lumen_math::Tolerance;
use serde::{Deserialize, Serialize};

/// Knobs that affect shading but not scene content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Recursion budget for reflection and refraction rays.
    pub max_depth: u32,
    /// Intersection tolerance and secondary-ray bias.
    pub tolerance: Tolerance,
}

impl RenderSettings {
    /// Default recursion budget.
    pub const DEFAULT_MAX_DEPTH: u32 = 5;
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            tolerance: Tolerance::DEFAULT,
        }
    }
}
