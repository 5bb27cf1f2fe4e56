//! Ray-plane intersection (closed-form).

use lumen_math::Tolerance;

use super::SurfaceHit;
use crate::Ray;

/// Intersect a ray with the x-z plane.
///
/// A ray whose direction is parallel to the plane (including one lying in
/// it) never hits.
pub(crate) fn intersect(ray: &Ray, tol: &Tolerance) -> Vec<SurfaceHit> {
    let dy = ray.direction().y;
    if tol.is_zero(dy) {
        return Vec::new();
    }
    vec![SurfaceHit::at(-ray.origin.y / dy)]
}
