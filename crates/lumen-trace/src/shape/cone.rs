//! Ray-cone intersection (quadratic, plus end caps).

use lumen_math::{Point3, Tolerance, Vec3};

use super::cylinder::within_radius;
use super::SurfaceHit;
use crate::{Bounds, Ray};

/// Double-napped cone `x² + z² = y²` with its apex at the origin.
///
/// Truncation and capping work as for [`Cylinder`](super::Cylinder); the cap
/// radius at height `y` is `|y|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    /// Lower truncation height.
    pub minimum: f64,
    /// Upper truncation height.
    pub maximum: f64,
    /// Whether the ends are capped.
    pub closed: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cone {
    /// Truncated cone between `minimum` and `maximum`.
    pub fn new(minimum: f64, maximum: f64, closed: bool) -> Self {
        Self {
            minimum,
            maximum,
            closed,
        }
    }

    pub(crate) fn local_bounds(&self) -> Bounds {
        let limit = self.minimum.abs().max(self.maximum.abs());
        Bounds::new(
            Point3::new(-limit, self.minimum, -limit),
            Point3::new(limit, self.maximum, limit),
        )
    }

    /// Intersect a local-space ray with the cone wall and caps.
    ///
    /// When the leading coefficient vanishes (the ray is parallel to one of
    /// the cone's generators) the whole cone, caps included, is treated as
    /// missed. This is an approximation: such a ray can still cross the
    /// opposite nappe once.
    pub(crate) fn intersect(&self, ray: &Ray, tol: &Tolerance) -> Vec<SurfaceHit> {
        let o = ray.origin;
        let d = ray.direction();

        let a = d.x * d.x - d.y * d.y + d.z * d.z;
        if tol.is_zero(a) {
            return Vec::new();
        }

        let b = 2.0 * o.x * d.x - 2.0 * o.y * d.y + 2.0 * o.z * d.z;
        let c = o.x * o.x - o.y * o.y + o.z * o.z;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Vec::new();
        }

        let sqrt_disc = discriminant.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);

        let mut hits = Vec::new();
        for t in [t0.min(t1), t0.max(t1)] {
            let y = o.y + t * d.y;
            if self.minimum < y && y < self.maximum {
                hits.push(SurfaceHit::at(t));
            }
        }

        self.intersect_caps(ray, tol, &mut hits);
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    fn intersect_caps(&self, ray: &Ray, tol: &Tolerance, hits: &mut Vec<SurfaceHit>) {
        let d = ray.direction();
        if !self.closed || tol.is_zero(d.y) {
            return;
        }
        for cap in [self.minimum, self.maximum] {
            let t = (cap - ray.origin.y) / d.y;
            if within_radius(ray, t, cap.abs()) {
                hits.push(SurfaceHit::at(t));
            }
        }
    }

    pub(crate) fn normal_at(&self, point: &Point3, tol: &Tolerance) -> Vec3 {
        let dist = point.x * point.x + point.z * point.z;
        let radius2 = point.y * point.y;

        if dist < radius2 && point.y >= self.maximum - tol.epsilon {
            Vec3::new(0.0, 1.0, 0.0)
        } else if dist < radius2 && point.y <= self.minimum + tol.epsilon {
            Vec3::new(0.0, -1.0, 0.0)
        } else {
            let mut y = dist.sqrt();
            if point.y > 0.0 {
                y = -y;
            }
            Vec3::new(point.x, y, point.z)
        }
    }
}
