//! Light sources.

use lumen_math::{Color, Point3};
use serde::{Deserialize, Serialize};

/// A point light with no size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// World-space position.
    pub position: Point3,
    /// Emitted color and brightness.
    pub intensity: Color,
}

impl PointLight {
    /// Create a point light.
    pub fn new(position: Point3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
