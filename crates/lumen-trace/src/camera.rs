//! Pixel ray generation.

use lumen_math::{Point3, Transform};

use crate::{Ray, TraceError};

/// Source of one primary ray per output pixel.
pub trait Camera: Sync {
    /// Output width in pixels.
    fn hsize(&self) -> usize;

    /// Output height in pixels.
    fn vsize(&self) -> usize;

    /// World-space ray through the center of pixel `(x, y)`.
    fn ray_for_pixel(&self, x: usize, y: usize) -> Ray;
}

/// Pinhole camera looking down -z in its own space, with the image plane
/// one unit in front of the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeCamera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,
    transform: Transform,
    inverse: Transform,
    half_width: f64,
    half_height: f64,
    pixel_size: f64,
}

impl PinholeCamera {
    /// Camera at the origin with horizontal or vertical field of view
    /// `field_of_view` (radians) across the longer image side.
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Self {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as f64 / vsize.max(1) as f64;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };
        Self {
            hsize,
            vsize,
            field_of_view,
            transform: Transform::identity(),
            inverse: Transform::identity(),
            half_width,
            half_height,
            pixel_size: half_width * 2.0 / hsize.max(1) as f64,
        }
    }

    /// Builder: place the camera with a view transform (world to eye).
    pub fn with_transform(mut self, transform: Transform) -> Result<Self, TraceError> {
        self.inverse = transform.inverse().ok_or(TraceError::SingularTransform)?;
        self.transform = transform;
        Ok(self)
    }

    /// Field of view in radians.
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    /// View transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World-space size of one pixel on the image plane.
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }
}

impl Camera for PinholeCamera {
    fn hsize(&self) -> usize {
        self.hsize
    }

    fn vsize(&self) -> usize {
        self.vsize
    }

    fn ray_for_pixel(&self, x: usize, y: usize) -> Ray {
        let world_x = self.half_width - (x as f64 + 0.5) * self.pixel_size;
        let world_y = self.half_height - (y as f64 + 0.5) * self.pixel_size;

        let pixel = self.inverse.apply_point(&Point3::new(world_x, world_y, -1.0));
        let origin = self.inverse.apply_point(&Point3::origin());
        Ray::new(origin, (pixel - origin).normalize())
    }
}
