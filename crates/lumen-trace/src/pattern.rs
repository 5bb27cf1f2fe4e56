//! Color sources a material can draw its base color from.
//!
//! Concrete patterns and image textures live outside this crate; the core
//! only needs "color at a pattern-space point" and "color at a surface
//! coordinate".

use std::fmt;
use std::sync::Arc;

use lumen_math::{Color, Point3, Transform};

use crate::{Scene, ShapeId, TraceError};

/// A procedural color field evaluated in its own space.
pub trait Pattern: Send + Sync + fmt::Debug {
    /// Color at a point in pattern space.
    fn color_at(&self, point: &Point3) -> Color;
}

/// A 2D color source addressed by surface coordinates.
pub trait Texture: Send + Sync + fmt::Debug {
    /// Color at surface coordinates `(u, v)`.
    fn sample_color(&self, u: f64, v: f64) -> Color;
}

/// A [`Pattern`] placed in object space by its own transform.
#[derive(Debug, Clone)]
pub struct TransformedPattern {
    pattern: Arc<dyn Pattern>,
    transform: Transform,
    inverse: Transform,
}

impl TransformedPattern {
    /// Wrap a pattern with the identity transform.
    pub fn new(pattern: Arc<dyn Pattern>) -> Self {
        Self {
            pattern,
            transform: Transform::identity(),
            inverse: Transform::identity(),
        }
    }

    /// Place the pattern with `transform` (object space from pattern space).
    pub fn with_transform(mut self, transform: Transform) -> Result<Self, TraceError> {
        self.inverse = transform.inverse().ok_or(TraceError::SingularTransform)?;
        self.transform = transform;
        Ok(self)
    }

    /// Object-from-pattern transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Color at an object-space point.
    pub fn color_at(&self, object_point: &Point3) -> Color {
        self.pattern.color_at(&self.inverse.apply_point(object_point))
    }

    /// Color at a world-space point on `shape`, following the shape's
    /// ancestors down to object space and then into pattern space.
    pub fn color_at_shape(&self, scene: &Scene, shape: ShapeId, world_point: &Point3) -> Color {
        self.color_at(&scene.world_to_object(shape, world_point))
    }
}
