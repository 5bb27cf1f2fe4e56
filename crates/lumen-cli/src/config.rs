//! Render configuration file.

use std::f64::consts::FRAC_PI_3;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lumen_math::{Color, Point3, Transform, Vec3, EPSILON};
use lumen_trace::{PinholeCamera, PointLight, RenderSettings};
use serde::{Deserialize, Serialize};

/// Everything the driver needs besides the scene itself.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Field of view across the longer image side, in radians.
    pub field_of_view: f64,
    /// Eye position.
    pub from: Point3,
    /// Point the camera looks at.
    pub to: Point3,
    /// Approximate up direction.
    pub up: Vec3,
    /// Output file; the extension picks the format.
    pub output: PathBuf,
    /// Lights replacing the scene's own, when non-empty.
    pub lights: Vec<PointLight>,
    /// Shading settings.
    pub settings: RenderSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            field_of_view: FRAC_PI_3,
            from: Point3::new(0.0, 1.5, -5.0),
            to: Point3::new(0.0, 1.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            output: PathBuf::from("lumen.png"),
            lights: Vec::new(),
            settings: RenderSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Read a configuration file, or return the defaults for `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "image size must be positive, got {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Camera described by this configuration.
    pub fn camera(&self) -> Result<PinholeCamera> {
        let forward = self.to - self.from;
        anyhow::ensure!(
            forward.cross(&self.up).norm() > EPSILON,
            "camera `up` must not be parallel to the view direction"
        );
        let view = Transform::view(&self.from, &self.to, &self.up);
        PinholeCamera::new(self.width, self.height, self.field_of_view)
            .with_transform(view)
            .context("camera `from`, `to` and `up` do not define a view")
    }

    /// Lights from the file, or `fallback` when the file lists none.
    pub fn lights_or(&self, fallback: PointLight) -> Vec<PointLight> {
        if self.lights.is_empty() {
            vec![fallback]
        } else {
            self.lights.clone()
        }
    }
}

/// Light used by the built-in scenes when the configuration has none.
pub fn default_light() -> PointLight {
    PointLight::new(Point3::new(-10.0, 10.0, -10.0), Color::WHITE)
}
