//! Ray-cylinder intersection (quadratic in x and z, plus end caps).

use lumen_math::{Point3, Tolerance, Vec3};

use super::SurfaceHit;
use crate::{Bounds, Ray};

/// Unit-radius cylinder around the y axis.
///
/// Optionally truncated to `minimum < y < maximum` (both bounds exclusive)
/// and optionally closed with cap discs at the truncation planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Lower truncation height.
    pub minimum: f64,
    /// Upper truncation height.
    pub maximum: f64,
    /// Whether the ends are capped.
    pub closed: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cylinder {
    /// Truncated cylinder between `minimum` and `maximum`.
    pub fn new(minimum: f64, maximum: f64, closed: bool) -> Self {
        Self {
            minimum,
            maximum,
            closed,
        }
    }

    pub(crate) fn local_bounds(&self) -> Bounds {
        Bounds::new(
            Point3::new(-1.0, self.minimum, -1.0),
            Point3::new(1.0, self.maximum, 1.0),
        )
    }

    /// Intersect a local-space ray with the wall and, if closed, the caps.
    ///
    /// A ray parallel to the axis skips the wall entirely; when it starts
    /// inside radius 1 on a closed cylinder it still reports both caps.
    pub(crate) fn intersect(&self, ray: &Ray, tol: &Tolerance) -> Vec<SurfaceHit> {
        let o = ray.origin;
        let d = ray.direction();
        let mut hits = Vec::new();

        let a = d.x * d.x + d.z * d.z;
        if !tol.is_zero(a) {
            let b = 2.0 * o.x * d.x + 2.0 * o.z * d.z;
            let c = o.x * o.x + o.z * o.z - 1.0;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return hits;
            }

            let sqrt_disc = discriminant.sqrt();
            let t0 = (-b - sqrt_disc) / (2.0 * a);
            let t1 = (-b + sqrt_disc) / (2.0 * a);

            for t in [t0.min(t1), t0.max(t1)] {
                let y = o.y + t * d.y;
                if self.minimum < y && y < self.maximum {
                    hits.push(SurfaceHit::at(t));
                }
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
            if within_radius(ray, t, 1.0) {
                hits.push(SurfaceHit::at(t));
            }
        }
    }

    pub(crate) fn normal_at(&self, point: &Point3, tol: &Tolerance) -> Vec3 {
        let dist = point.x * point.x + point.z * point.z;

        if dist < 1.0 && point.y >= self.maximum - tol.epsilon {
            Vec3::new(0.0, 1.0, 0.0)
        } else if dist < 1.0 && point.y <= self.minimum + tol.epsilon {
            Vec3::new(0.0, -1.0, 0.0)
        } else {
            Vec3::new(point.x, 0.0, point.z)
        }
    }
}

/// Whether the ray at `t` lies within `radius` of the y axis.
pub(super) fn within_radius(ray: &Ray, t: f64, radius: f64) -> bool {
    let x = ray.origin.x + t * ray.direction().x;
    let z = ray.origin.z + t * ray.direction().z;
    x * x + z * z <= radius * radius
}
