//! Thin segment along the local y axis, used for debug geometry.

use lumen_math::{Point3, Tolerance, Vec3};

use super::SurfaceHit;
use crate::{Bounds, Ray};

/// A segment from `(0, min_y, 0)` to `(0, max_y, 0)` with a hit radius.
///
/// The surface is a capsule-like tube: a ray hits when its closest approach
/// to the axis is within `fatness` and the closest axis point lies inside
/// the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Lower endpoint height.
    pub min_y: f64,
    /// Upper endpoint height.
    pub max_y: f64,
    /// Hit radius around the axis.
    pub fatness: f64,
}

impl LineSegment {
    /// Default hit radius for debug segments.
    pub const DEFAULT_FATNESS: f64 = 0.01;

    /// Segment between two heights on the y axis.
    pub fn new(min_y: f64, max_y: f64, fatness: f64) -> Self {
        Self {
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
            fatness,
        }
    }

    pub(crate) fn local_bounds(&self) -> Bounds {
        let f = self.fatness;
        Bounds::new(
            Point3::new(-f, self.min_y, -f),
            Point3::new(f, self.max_y, f),
        )
    }

    /// Closest approach between the ray line and the segment's axis.
    pub(crate) fn intersect(&self, ray: &Ray, tol: &Tolerance) -> Option<SurfaceHit> {
        let d = ray.direction();
        let o = ray.origin.coords;

        // Axis line is s * (0, 1, 0); w0 = origin - axis origin.
        let a = d.dot(d);
        let b = d.y;
        let dw = d.dot(&o);
        let ew = o.y;

        let denom = a - b * b;
        if tol.is_zero(denom) {
            return None;
        }

        let t = (b * ew - dw) / denom;
        let s = (a * ew - b * dw) / denom;
        if s < self.min_y || s > self.max_y {
            return None;
        }

        let closest = ray.at(t);
        let dist = (closest - Point3::new(0.0, s, 0.0)).norm();
        (dist <= self.fatness).then_some(SurfaceHit::at(t))
    }

    /// Radial direction from the axis to `point`.
    pub(crate) fn normal_at(&self, point: &Point3) -> Vec3 {
        let radial = Vec3::new(point.x, 0.0, point.z);
        if radial.norm_squared() < f64::EPSILON {
            Vec3::x()
        } else {
            radial
        }
    }
}
