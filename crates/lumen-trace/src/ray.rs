//! Ray representation.

use lumen_math::{Point3, Transform, Vec3};

/// A ray in 3D space defined by origin and direction.
///
/// The direction is not normalized: rays carried into a shape's local space
/// keep the scale of the transform so that `t` stays comparable across
/// spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    direction: Vec3,
    /// Precomputed reciprocal of direction components for fast slab tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let (inv_direction, sign) = reciprocal(&direction);
        Self {
            origin,
            direction,
            inv_direction,
            sign,
        }
    }

    /// Direction of the ray.
    #[inline]
    pub fn direction(&self) -> &Vec3 {
        &self.direction
    }

    /// Replace the direction, refreshing the reciprocal and sign triple.
    pub fn set_direction(&mut self, direction: Vec3) {
        let (inv_direction, sign) = reciprocal(&direction);
        self.direction = direction;
        self.inv_direction = inv_direction;
        self.sign = sign;
    }

    /// Component-wise reciprocal of the direction.
    ///
    /// A zero component yields `±inf`, which the slab test relies on.
    #[inline]
    pub fn inv_direction(&self) -> &Vec3 {
        &self.inv_direction
    }

    /// Per-axis sign bits of the reciprocal direction (1 when negative).
    #[inline]
    pub fn sign(&self) -> [usize; 3] {
        self.sign
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Carry the ray through `transform`.
    pub fn transform(&self, transform: &Transform) -> Ray {
        Ray::new(
            transform.apply_point(&self.origin),
            transform.apply_vec(&self.direction),
        )
    }
}

fn reciprocal(direction: &Vec3) -> (Vec3, [usize; 3]) {
    let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
    let sign = [
        usize::from(inv.x < 0.0),
        usize::from(inv.y < 0.0),
        usize::from(inv.z < 0.0),
    ];
    (inv, sign)
}
