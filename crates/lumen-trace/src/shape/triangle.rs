//! Ray-triangle intersection (Möller–Trumbore).

use lumen_math::{Point3, Tolerance, Vec3};

use super::SurfaceHit;
use crate::{Bounds, Ray};

/// A flat triangle with precomputed edges and face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
    /// Edge `v1 - v0`.
    pub e0: Vec3,
    /// Edge `v2 - v0`.
    pub e1: Vec3,
    /// Face normal, `normalize(e1 × e0)`. Zero for a degenerate triangle.
    pub normal: Vec3,
}

impl Triangle {
    /// Build a triangle and precompute its edges and normal.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let e0 = v1 - v0;
        let e1 = v2 - v0;
        let normal = match e1.cross(&e0).try_normalize(f64::EPSILON) {
            Some(n) => n,
            None => {
                log::warn!("degenerate triangle {:?} {:?} {:?}", v0, v1, v2);
                Vec3::zeros()
            }
        };
        Self {
            v0,
            v1,
            v2,
            e0,
            e1,
            normal,
        }
    }

    pub(crate) fn local_bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        b.include_point(&self.v0);
        b.include_point(&self.v1);
        b.include_point(&self.v2);
        b
    }

    /// Intersect a ray with the triangle.
    ///
    /// Returns at most one hit carrying `(t, u, v)`, where the hit point is
    /// `v0 + u * e0 + v * e1`. Rays parallel to the triangle's plane miss.
    pub(crate) fn intersect(&self, ray: &Ray, tol: &Tolerance) -> Option<SurfaceHit> {
        let d = ray.direction();
        let dir_cross_e1 = d.cross(&self.e1);
        let det = self.e0.dot(&dir_cross_e1);
        if tol.is_zero(det) {
            return None;
        }

        let f = 1.0 / det;
        let v0_to_origin = ray.origin - self.v0;
        let u = f * v0_to_origin.dot(&dir_cross_e1);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let origin_cross_e0 = v0_to_origin.cross(&self.e0);
        let v = f * d.dot(&origin_cross_e0);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.e1.dot(&origin_cross_e0);
        Some(SurfaceHit { t, uv: Some((u, v)) })
    }
}

/// A triangle whose normal is interpolated from per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothTriangle {
    /// Underlying geometry.
    pub triangle: Triangle,
    /// Normal at `v0`.
    pub n0: Vec3,
    /// Normal at `v1`.
    pub n1: Vec3,
    /// Normal at `v2`.
    pub n2: Vec3,
}

impl SmoothTriangle {
    /// Build a smooth triangle from vertices and their normals.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, n0: Vec3, n1: Vec3, n2: Vec3) -> Self {
        Self {
            triangle: Triangle::new(v0, v1, v2),
            n0,
            n1,
            n2,
        }
    }

    /// Barycentric blend `n1·u + n2·v + n0·(1−u−v)`.
    ///
    /// Falls back to the face normal when no hit coordinates are supplied.
    pub(crate) fn normal_at(&self, uv: Option<(f64, f64)>) -> Vec3 {
        match uv {
            Some((u, v)) => self.n1 * u + self.n2 * v + self.n0 * (1.0 - u - v),
            None => self.triangle.normal,
        }
    }
}
