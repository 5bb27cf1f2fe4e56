//! Shape variants and their local-space geometry.
//!
//! A [`Shape`] is one node of the scene tree. Leaf variants know how to
//! intersect a ray and evaluate a normal in their canonical local space;
//! composites ([`Group`], [`Csg`]) only hold child ids and are resolved by
//! the owning [`Scene`](crate::Scene).
//!
//! Dispatch is a closed `match` over [`ShapeKind`], so adding a variant is
//! an exhaustive, compiler-checked change.

mod cone;
mod csg;
mod cube;
mod cylinder;
mod group;
mod line_segment;
mod plane;
mod sphere;
mod triangle;

pub use cone::Cone;
pub use csg::{Csg, CsgOp};
pub use cylinder::Cylinder;
pub use group::Group;
pub use line_segment::LineSegment;
pub use triangle::{SmoothTriangle, Triangle};

use std::f64::consts::PI;

use lumen_math::{Point3, Tolerance, Transform, Vec3};
use nalgebra::Rotation3;

use crate::{Bounds, Material, Ray, TraceError};

/// Result of a local-space ray/surface intersection, before it is tagged
/// with the id of the shape that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Parameter along the ray.
    pub t: f64,
    /// Barycentric coordinates, for the triangle family.
    pub uv: Option<(f64, f64)>,
}

impl SurfaceHit {
    /// Hit without surface coordinates.
    pub fn at(t: f64) -> Self {
        Self { t, uv: None }
    }
}

/// The variant of a shape.
#[derive(Debug)]
pub enum ShapeKind {
    /// Unit sphere centered at the origin.
    Sphere,
    /// The x-z plane.
    Plane,
    /// Axis-aligned cube spanning `[-1, 1]` on every axis.
    Cube,
    /// Unit-radius cylinder around the y axis.
    Cylinder(Cylinder),
    /// Double-napped cone `x² + z² = y²`.
    Cone(Cone),
    /// Flat triangle.
    Triangle(Triangle),
    /// Triangle with interpolated vertex normals.
    SmoothTriangle(SmoothTriangle),
    /// Thin capsule along the y axis, for debug geometry.
    LineSegment(LineSegment),
    /// Aggregate of child shapes.
    Group(Group),
    /// Boolean combination of two shapes.
    Csg(Csg),
}

impl ShapeKind {
    /// True for [`ShapeKind::Group`] and [`ShapeKind::Csg`].
    pub fn is_composite(&self) -> bool {
        matches!(self, ShapeKind::Group(_) | ShapeKind::Csg(_))
    }

    /// Copy of a leaf variant; `None` for composites.
    pub(crate) fn leaf_copy(&self) -> Option<ShapeKind> {
        let kind = match self {
            ShapeKind::Sphere => ShapeKind::Sphere,
            ShapeKind::Plane => ShapeKind::Plane,
            ShapeKind::Cube => ShapeKind::Cube,
            ShapeKind::Cylinder(c) => ShapeKind::Cylinder(*c),
            ShapeKind::Cone(c) => ShapeKind::Cone(*c),
            ShapeKind::Triangle(t) => ShapeKind::Triangle(*t),
            ShapeKind::SmoothTriangle(t) => ShapeKind::SmoothTriangle(*t),
            ShapeKind::LineSegment(l) => ShapeKind::LineSegment(*l),
            ShapeKind::Group(_) | ShapeKind::Csg(_) => return None,
        };
        Some(kind)
    }

    /// Untransformed bounding box of a leaf variant.
    ///
    /// Composites derive theirs from their children and report empty here.
    pub fn leaf_bounds(&self) -> Bounds {
        match self {
            ShapeKind::Sphere | ShapeKind::Cube => {
                Bounds::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            }
            ShapeKind::Plane => Bounds::new(
                Point3::new(f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY),
                Point3::new(f64::INFINITY, 0.0, f64::INFINITY),
            ),
            ShapeKind::Cylinder(c) => c.local_bounds(),
            ShapeKind::Cone(c) => c.local_bounds(),
            ShapeKind::Triangle(t) => t.local_bounds(),
            ShapeKind::SmoothTriangle(t) => t.triangle.local_bounds(),
            ShapeKind::LineSegment(l) => l.local_bounds(),
            ShapeKind::Group(_) | ShapeKind::Csg(_) => Bounds::empty(),
        }
    }

    /// Intersect a local-space ray with a leaf variant.
    ///
    /// Hits behind the origin are kept: CSG filtering and refraction both
    /// need the full crossing sequence.
    pub fn local_intersect(&self, ray: &Ray, tol: &Tolerance) -> Vec<SurfaceHit> {
        match self {
            ShapeKind::Sphere => sphere::intersect(ray),
            ShapeKind::Plane => plane::intersect(ray, tol),
            ShapeKind::Cube => cube::intersect(ray, tol),
            ShapeKind::Cylinder(c) => c.intersect(ray, tol),
            ShapeKind::Cone(c) => c.intersect(ray, tol),
            ShapeKind::Triangle(t) => t.intersect(ray, tol).into_iter().collect(),
            ShapeKind::SmoothTriangle(t) => t.triangle.intersect(ray, tol).into_iter().collect(),
            ShapeKind::LineSegment(l) => l.intersect(ray, tol).into_iter().collect(),
            ShapeKind::Group(_) | ShapeKind::Csg(_) => Vec::new(),
        }
    }

    /// Local-space normal of a leaf variant at `point`.
    ///
    /// `uv` carries the barycentric coordinates of the hit for smooth
    /// triangles. Returns `None` for composites, which have no surface.
    pub fn local_normal_at(
        &self,
        point: &Point3,
        uv: Option<(f64, f64)>,
        tol: &Tolerance,
    ) -> Option<Vec3> {
        let n = match self {
            ShapeKind::Sphere => sphere::normal_at(point),
            ShapeKind::Plane => Vec3::y(),
            ShapeKind::Cube => cube::normal_at(point),
            ShapeKind::Cylinder(c) => c.normal_at(point, tol),
            ShapeKind::Cone(c) => c.normal_at(point, tol),
            ShapeKind::Triangle(t) => t.normal,
            ShapeKind::SmoothTriangle(t) => t.normal_at(uv),
            ShapeKind::LineSegment(l) => l.normal_at(point),
            ShapeKind::Group(_) | ShapeKind::Csg(_) => return None,
        };
        Some(n)
    }
}

/// A node of the scene tree: geometry, placement and appearance.
///
/// Shapes start with the identity transform and the default material.
/// The cached inverse transform and bounds are kept in sync by
/// [`Shape::set_transform`].
///
/// Shapes are not `Clone`: a composite refers to children by id, so copies
/// go through [`Scene::duplicate`](crate::Scene::duplicate).
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    transform: Transform,
    inverse: Transform,
    material: Material,
    local_bounds: Bounds,
    bounds: Bounds,
}

impl Shape {
    /// Create a shape of the given kind with identity transform.
    pub fn new(kind: ShapeKind) -> Self {
        let local_bounds = kind.leaf_bounds();
        Self {
            kind,
            transform: Transform::identity(),
            inverse: Transform::identity(),
            material: Material::default(),
            local_bounds,
            bounds: local_bounds,
        }
    }

    /// Unit sphere.
    pub fn sphere() -> Self {
        Self::new(ShapeKind::Sphere)
    }

    /// Unit sphere made of glass (transparent, refractive index 1.5).
    pub fn glass_sphere() -> Self {
        Self::sphere().with_material(Material::glass())
    }

    /// The x-z plane.
    pub fn plane() -> Self {
        Self::new(ShapeKind::Plane)
    }

    /// Cube spanning `[-1, 1]³`.
    pub fn cube() -> Self {
        Self::new(ShapeKind::Cube)
    }

    /// Infinite, open unit cylinder.
    pub fn cylinder() -> Self {
        Self::new(ShapeKind::Cylinder(Cylinder::default()))
    }

    /// Infinite, open double cone.
    pub fn cone() -> Self {
        Self::new(ShapeKind::Cone(Cone::default()))
    }

    /// Flat triangle through three points.
    pub fn triangle(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self::new(ShapeKind::Triangle(Triangle::new(v0, v1, v2)))
    }

    /// Triangle with per-vertex normals.
    pub fn smooth_triangle(
        v0: Point3,
        v1: Point3,
        v2: Point3,
        n0: Vec3,
        n1: Vec3,
        n2: Vec3,
    ) -> Self {
        Self::new(ShapeKind::SmoothTriangle(SmoothTriangle::new(
            v0, v1, v2, n0, n1, n2,
        )))
    }

    /// Line segment along local y from `min_y` to `max_y`.
    pub fn line_segment(min_y: f64, max_y: f64, fatness: f64) -> Self {
        Self::new(ShapeKind::LineSegment(LineSegment::new(min_y, max_y, fatness)))
    }

    /// Line segment between two arbitrary points.
    ///
    /// Builds a local y-axis segment of the right length and orients it with
    /// a rotation and translation.
    pub fn line_segment_between(a: &Point3, b: &Point3, fatness: f64) -> Result<Self, TraceError> {
        let span = b - a;
        let length = span.norm();
        if length < f64::EPSILON {
            log::warn!("zero-length line segment at {:?}", a);
            return Self::line_segment(0.0, 0.0, fatness)
                .with_transform(Transform::translation(a.x, a.y, a.z));
        }
        let orient = match Rotation3::rotation_between(&Vec3::y(), &span) {
            Some(rot) => Transform::from_matrix(rot.to_homogeneous()),
            None => Transform::rotation_x(PI),
        };
        Self::line_segment(0.0, length, fatness)
            .with_transform(Transform::translation(a.x, a.y, a.z).then(&orient))
    }

    /// Empty group.
    pub fn group() -> Self {
        Self::new(ShapeKind::Group(Group::default()))
    }

    pub(crate) fn csg(csg: Csg) -> Self {
        Self::new(ShapeKind::Csg(csg))
    }

    /// Builder form of [`Shape::set_transform`].
    pub fn with_transform(mut self, transform: Transform) -> Result<Self, TraceError> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Builder form of [`Shape::set_material`].
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// The variant of this shape.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    /// Object-to-parent transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Parent-to-object transform.
    pub fn inverse(&self) -> &Transform {
        &self.inverse
    }

    /// Replace the transform and recompute this shape's bounds.
    ///
    /// Ancestors are not refreshed; see [`Scene::set_transform`](crate::Scene::set_transform).
    pub fn set_transform(&mut self, transform: Transform) -> Result<(), TraceError> {
        let inverse = transform.inverse().ok_or(TraceError::SingularTransform)?;
        self.transform = transform;
        self.inverse = inverse;
        self.bounds = Bounds::recompute(self);
        Ok(())
    }

    /// Surface material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Mutable access to the material.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Replace the material.
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Bounding box in this shape's own (untransformed) space.
    pub fn local_bounds(&self) -> &Bounds {
        &self.local_bounds
    }

    /// Bounding box in the parent's space.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub(crate) fn set_local_bounds(&mut self, local_bounds: Bounds) {
        self.local_bounds = local_bounds;
        self.bounds = Bounds::recompute(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_shape_state() {
        let s = Shape::sphere();
        assert_eq!(*s.transform(), Transform::identity());
        assert_eq!(s.material().ambient, Material::default().ambient);
    }

    #[test]
    fn test_singular_transform_is_rejected() {
        let err = Shape::sphere()
            .with_transform(Transform::scale(1.0, 0.0, 1.0))
            .unwrap_err();
        assert_eq!(err, TraceError::SingularTransform);
    }

    #[test]
    fn test_bounds_follow_transform() {
        let s = Shape::sphere()
            .with_transform(Transform::translation(1.0, -3.0, 5.0).then(&Transform::scale(0.5, 2.0, 4.0)))
            .unwrap();
        assert_relative_eq!(s.bounds().min, Point3::new(0.5, -5.0, 1.0));
        assert_relative_eq!(s.bounds().max, Point3::new(1.5, -1.0, 9.0));
        assert_relative_eq!(s.local_bounds().min, Point3::new(-1.0, -1.0, -1.0));
    }

    #[test]
    fn test_line_segment_between_endpoints() {
        let s = Shape::line_segment_between(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 4.0),
            0.05,
        )
        .unwrap();
        let b = s.bounds();
        assert_relative_eq!(b.min.z, 0.0, epsilon = 0.06);
        assert_relative_eq!(b.max.z, 4.0, epsilon = 0.06);
        assert_relative_eq!((b.min.x + b.max.x) / 2.0, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_line_segment_between_pointing_down() {
        let s = Shape::line_segment_between(
            &Point3::new(0.0, 2.0, 0.0),
            &Point3::new(0.0, -1.0, 0.0),
            0.01,
        )
        .unwrap();
        assert_relative_eq!(s.bounds().min.y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(s.bounds().max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_composites_have_no_normal() {
        let tol = Tolerance::DEFAULT;
        assert!(Shape::group()
            .kind()
            .local_normal_at(&Point3::origin(), None, &tol)
            .is_none());
    }
}
