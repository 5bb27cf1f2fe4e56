//! Axis-aligned bounding boxes and ray/box slab tests.
//!
//! Every shape carries a [`Bounds`] used as a broadphase filter: a ray that
//! provably misses the box is never handed to the exact intersection math.

use lumen_math::{Point3, Transform, EPSILON};

use crate::shape::Shape;
use crate::Ray;

/// Axis-aligned bounding box in 3D.
///
/// Unbounded shapes (planes, open cylinders) use infinite coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bounds {
    /// Create bounds from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Derive a shape's bounds in its parent's space: the local box carried
    /// through the shape's own transform.
    pub fn recompute(shape: &Shape) -> Self {
        shape.local_bounds().transform(shape.transform())
    }

    /// True when no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True when two or more axes have collapsed to zero thickness.
    ///
    /// A slab test against such a box is not meaningful.
    pub fn is_degenerate(&self) -> bool {
        let extent = self.max - self.min;
        let flat = [extent.x, extent.y, extent.z]
            .iter()
            .filter(|e| e.abs() < EPSILON)
            .count();
        flat >= 2
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let mut out = *self;
        out.include_point(&other.min);
        out.include_point(&other.max);
        out
    }

    /// True for a non-empty box with no infinite extent.
    pub fn is_finite(&self) -> bool {
        !self.is_empty() && self.min.iter().chain(self.max.iter()).all(|c| c.is_finite())
    }

    /// The eight corners of a finite box.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box enclosing this box after `transform`.
    ///
    /// Equivalent to taking the min/max over the eight transformed corners,
    /// but accumulated per matrix entry so that infinite extents do not
    /// produce `0 * inf = NaN`.
    pub fn transform(&self, transform: &Transform) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        let m = &transform.matrix;
        let lo = [self.min.x, self.min.y, self.min.z];
        let hi = [self.max.x, self.max.y, self.max.z];
        let mut out_min = [m[(0, 3)], m[(1, 3)], m[(2, 3)]];
        let mut out_max = out_min;

        for i in 0..3 {
            for j in 0..3 {
                let a = m[(i, j)];
                if a == 0.0 {
                    continue;
                }
                let e = a * lo[j];
                let f = a * hi[j];
                out_min[i] += e.min(f);
                out_max[i] += e.max(f);
            }
        }

        Bounds::new(
            Point3::new(out_min[0], out_min[1], out_min[2]),
            Point3::new(out_max[0], out_max[1], out_max[2]),
        )
    }

    /// Test whether `ray` may hit the box.
    ///
    /// Returns true unless the ray can be proven to miss. Degenerate boxes
    /// always report a hit.
    pub fn intersects(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_degenerate() {
            return true;
        }
        self.slab_interval(ray).is_some()
    }

    /// Sign-indexed slab test.
    ///
    /// Returns the `(t_min, t_max)` parameter interval inside the box, or
    /// `None` if the ray misses or the box lies entirely behind the origin.
    /// Zero direction components are handled through the `±inf` reciprocal.
    #[inline]
    pub fn slab_interval(&self, ray: &Ray) -> Option<(f64, f64)> {
        let bounds = [self.min, self.max];
        let sign = ray.sign();
        let inv = ray.inv_direction();
        let o = ray.origin;

        let mut t_min = (bounds[sign[0]].x - o.x) * inv.x;
        let mut t_max = (bounds[1 - sign[0]].x - o.x) * inv.x;

        let ty_min = (bounds[sign[1]].y - o.y) * inv.y;
        let ty_max = (bounds[1 - sign[1]].y - o.y) * inv.y;

        if t_min > ty_max || ty_min > t_max {
            return None;
        }
        t_min = t_min.max(ty_min);
        t_max = t_max.min(ty_max);

        let tz_min = (bounds[sign[2]].z - o.z) * inv.z;
        let tz_max = (bounds[1 - sign[2]].z - o.z) * inv.z;

        if t_min > tz_max || tz_min > t_max {
            return None;
        }
        t_min = t_min.max(tz_min);
        t_max = t_max.min(tz_max);

        if t_max < 0.0 {
            return None;
        }
        Some((t_min, t_max))
    }

    /// Straightforward per-axis slab test using division.
    ///
    /// Slower than [`Bounds::intersects`]; a near-zero direction component
    /// only checks that the origin lies between that axis' slabs.
    pub fn intersects_simple(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_degenerate() {
            return true;
        }
        let d = ray.direction();
        let o = ray.origin;
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for (o, d, lo, hi) in [
            (o.x, d.x, self.min.x, self.max.x),
            (o.y, d.y, self.min.y, self.max.y),
            (o.z, d.z, self.min.z, self.max.z),
        ] {
            if d.abs() < EPSILON {
                if o < lo || o > hi {
                    return false;
                }
                continue;
            }
            let (a, b) = ((lo - o) / d, (hi - o) / d);
            t_min = t_min.max(a.min(b));
            t_max = t_max.min(a.max(b));
        }

        t_min <= t_max && t_max >= 0.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}
