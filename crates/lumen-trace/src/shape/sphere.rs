//! Ray-sphere intersection (quadratic equation).

use lumen_math::{Point3, Vec3};

use super::SurfaceHit;
use crate::Ray;

/// Intersect a ray with the unit sphere at the origin.
///
/// Returns 0 or 2 intersections sorted by t; a tangent ray yields two
/// coincident hits. Negative t values are kept.
pub(crate) fn intersect(ray: &Ray) -> Vec<SurfaceHit> {
    let oc = ray.origin.coords;
    let d = ray.direction();

    // |oc + t*d|^2 = 1
    let a = d.dot(d);
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    vec![SurfaceHit::at(t1.min(t2)), SurfaceHit::at(t1.max(t2))]
}

pub(crate) fn normal_at(point: &Point3) -> Vec3 {
    point.coords
}
