//! Surface appearance.

use std::sync::Arc;

use lumen_math::{Color, Point3};

use crate::{Pattern, Scene, ShapeId, Texture, TransformedPattern};

/// Phong coefficients plus reflection and refraction parameters.
#[derive(Debug, Clone)]
pub struct Material {
    /// Flat surface color, used when there is no pattern or texture.
    pub color: Color,
    /// Optional procedural pattern overriding `color`.
    pub pattern: Option<TransformedPattern>,
    /// Optional texture sampled at the hit's surface coordinates.
    pub texture: Option<Arc<dyn Texture>>,
    /// Ambient reflection coefficient.
    pub ambient: f64,
    /// Diffuse reflection coefficient.
    pub diffuse: f64,
    /// Specular reflection coefficient.
    pub specular: f64,
    /// Specular exponent; larger is a smaller, tighter highlight.
    pub shininess: f64,
    /// Mirror reflectance in `[0, 1]`.
    pub reflective: f64,
    /// Transmittance in `[0, 1]`.
    pub transparency: f64,
    /// Index of refraction; 1.0 is vacuum.
    pub refractive_index: f64,
}

impl Material {
    /// Refractive index of vacuum.
    pub const VACUUM: f64 = 1.0;
    /// Refractive index of common glass.
    pub const GLASS: f64 = 1.5;

    /// Fully transparent glass.
    pub fn glass() -> Self {
        Self {
            transparency: 1.0,
            refractive_index: Self::GLASS,
            ..Self::default()
        }
    }

    /// Builder: flat color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: procedural pattern.
    pub fn with_pattern(mut self, pattern: Arc<dyn Pattern>) -> Self {
        self.pattern = Some(TransformedPattern::new(pattern));
        self
    }

    /// Builder: texture.
    pub fn with_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Base color at a world-space point on `shape`.
    ///
    /// A pattern wins over a texture, which wins over the flat color.
    /// Textures need surface coordinates; without them the flat color is
    /// used.
    pub fn color_at(
        &self,
        scene: &Scene,
        shape: ShapeId,
        world_point: &Point3,
        uv: Option<(f64, f64)>,
    ) -> Color {
        if let Some(pattern) = &self.pattern {
            return pattern.color_at_shape(scene, shape, world_point);
        }
        match (&self.texture, uv) {
            (Some(texture), Some((u, v))) => texture.sample_color(u, v),
            _ => self.color,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            pattern: None,
            texture: None,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflective: 0.0,
            transparency: 0.0,
            refractive_index: Self::VACUUM,
        }
    }
}
