//! Ray hits and the state derived from them for shading.

use lumen_math::{Point3, Vec3};

use crate::{Ray, Scene, ShapeId};

/// A ray crossing a leaf shape at parameter `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Signed distance along the ray, in units of the ray's direction.
    pub t: f64,
    /// The leaf shape that was hit.
    pub shape: ShapeId,
    /// Barycentric coordinates for triangle hits.
    pub uv: Option<(f64, f64)>,
}

/// Everything shading needs about one hit, computed once by
/// [`Intersection::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedHit {
    /// Distance along the ray.
    pub t: f64,
    /// The leaf shape that was hit.
    pub shape: ShapeId,
    /// Barycentric coordinates for triangle hits.
    pub uv: Option<(f64, f64)>,
    /// World-space hit point.
    pub point: Point3,
    /// Hit point pushed out along the normal, for shadow and reflection rays.
    pub over_point: Point3,
    /// Hit point pushed in along the normal, for refraction rays.
    pub under_point: Point3,
    /// Unit vector from the hit back toward the ray origin.
    pub eyev: Vec3,
    /// Unit surface normal, flipped to face the eye.
    pub normalv: Vec3,
    /// Incoming direction mirrored about the normal.
    pub reflectv: Vec3,
    /// True when the ray hit the surface from inside.
    pub inside: bool,
    /// Refractive index of the medium being left.
    pub n1: f64,
    /// Refractive index of the medium being entered.
    pub n2: f64,
}

impl Intersection {
    /// Hit without surface coordinates.
    pub fn new(t: f64, shape: ShapeId) -> Self {
        Self { t, shape, uv: None }
    }

    /// Hit with optional barycentric coordinates.
    pub fn with_uv(t: f64, shape: ShapeId, uv: Option<(f64, f64)>) -> Self {
        Self { t, shape, uv }
    }

    /// Compute the shading state for this hit.
    ///
    /// `xs` is the full sorted list of intersections along `ray` that this
    /// hit was chosen from; it is walked to find which transparent shapes
    /// the ray is inside of on either side of the hit.
    ///
    /// # Panics
    ///
    /// Panics if `self.shape` is not a leaf of `scene`.
    pub fn prepare(&self, ray: &Ray, xs: &[Intersection], scene: &Scene) -> PreparedHit {
        let point = ray.at(self.t);
        let direction = ray.direction().normalize();
        let eyev = -direction;

        let mut normalv = scene.normal_at(self.shape, &point, self.uv);
        let inside = normalv.dot(&eyev) < 0.0;
        if inside {
            normalv = -normalv;
        }

        let bias = scene.tolerance().bias;
        let (n1, n2) = self.refractive_indices(xs, scene);

        PreparedHit {
            t: self.t,
            shape: self.shape,
            uv: self.uv,
            point,
            over_point: point + normalv * bias,
            under_point: point - normalv * bias,
            eyev,
            normalv,
            reflectv: reflect(&direction, &normalv),
            inside,
            n1,
            n2,
        }
    }

    /// Indices on the near and far side of this hit.
    ///
    /// Shapes are entered and left in `t` order; the innermost open shape
    /// defines the current medium.
    fn refractive_indices(&self, xs: &[Intersection], scene: &Scene) -> (f64, f64) {
        let index_of = |containers: &[ShapeId]| {
            containers
                .last()
                .and_then(|&id| scene.get(id))
                .map_or(1.0, |s| s.material().refractive_index)
        };

        let mut containers: Vec<ShapeId> = Vec::new();
        let mut n1 = 1.0;
        for x in xs {
            let is_hit = x == self;
            if is_hit {
                n1 = index_of(&containers);
            }
            match containers.iter().position(|&c| c == x.shape) {
                Some(pos) => {
                    containers.remove(pos);
                }
                None => containers.push(x.shape),
            }
            if is_hit {
                return (n1, index_of(&containers));
            }
        }
        (n1, 1.0)
    }
}

/// The visible hit: the one with the smallest non-negative `t`.
pub fn hit(xs: &[Intersection]) -> Option<&Intersection> {
    xs.iter()
        .filter(|x| x.t >= 0.0)
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

/// Mirror `v` about `normal`.
pub(crate) fn reflect(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * 2.0 * v.dot(normal)
}

/// Stable ascending sort by `t`.
pub(crate) fn sort_by_t(xs: &mut [Intersection]) {
    xs.sort_by(|a, b| a.t.total_cmp(&b.t));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Shape};
    use approx::assert_relative_eq;
    use lumen_math::{Transform, SHADOW_BIAS};
    use std::f64::consts::SQRT_2;

    fn one_shape(shape: Shape) -> (Scene, ShapeId) {
        let mut scene = Scene::new();
        let id = scene.add_object(shape);
        (scene, id)
    }

    #[test]
    fn test_hit_picks_lowest_non_negative() {
        let (_, s) = one_shape(Shape::sphere());
        let xs = [
            Intersection::new(5.0, s),
            Intersection::new(7.0, s),
            Intersection::new(-3.0, s),
            Intersection::new(2.0, s),
        ];
        assert_eq!(hit(&xs), Some(&xs[3]));

        let xs = [Intersection::new(-1.0, s), Intersection::new(1.0, s)];
        assert_eq!(hit(&xs), Some(&xs[1]));

        let xs = [Intersection::new(-2.0, s), Intersection::new(-1.0, s)];
        assert_eq!(hit(&xs), None);
        assert_eq!(hit(&[]), None);
    }

    #[test]
    fn test_prepare_outside_hit() {
        let (scene, s) = one_shape(Shape::sphere());
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let i = Intersection::new(4.0, s);
        let comps = i.prepare(&ray, &[i], &scene);

        assert_relative_eq!(comps.point, Point3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(comps.eyev, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(comps.normalv, Vec3::new(0.0, 0.0, -1.0));
        assert!(!comps.inside);
    }

    #[test]
    fn test_prepare_inside_hit_flips_normal() {
        let (scene, s) = one_shape(Shape::sphere());
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        let i = Intersection::new(1.0, s);
        let comps = i.prepare(&ray, &[i], &scene);

        assert_relative_eq!(comps.point, Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(comps.eyev, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(comps.normalv, Vec3::new(0.0, 0.0, -1.0));
        assert!(comps.inside);
    }

    #[test]
    fn test_over_point_and_under_point() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let (scene, s) = one_shape(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, 0.0, 1.0))
                .unwrap(),
        );
        let i = Intersection::new(5.0, s);
        let comps = i.prepare(&ray, &[i], &scene);
        assert!(comps.over_point.z < -SHADOW_BIAS / 2.0);
        assert!(comps.point.z > comps.over_point.z);

        let (scene, s) = one_shape(
            Shape::glass_sphere()
                .with_transform(Transform::translation(0.0, 0.0, 1.0))
                .unwrap(),
        );
        let i = Intersection::new(5.0, s);
        let comps = i.prepare(&ray, &[i], &scene);
        assert!(comps.under_point.z > SHADOW_BIAS / 2.0);
        assert!(comps.point.z < comps.under_point.z);
    }

    #[test]
    fn test_reflect_vector() {
        let (scene, s) = one_shape(Shape::plane());
        let k = SQRT_2 / 2.0;
        let ray = Ray::new(Point3::new(0.0, 1.0, -1.0), Vec3::new(0.0, -k, k));
        let i = Intersection::new(SQRT_2, s);
        let comps = i.prepare(&ray, &[i], &scene);
        assert_relative_eq!(comps.reflectv, Vec3::new(0.0, k, k), epsilon = 1e-12);
    }

    #[test]
    fn test_reflect_helper() {
        let r = reflect(&Vec3::new(1.0, -1.0, 0.0), &Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(r, Vec3::new(1.0, 1.0, 0.0));
        let k = SQRT_2 / 2.0;
        let r = reflect(&Vec3::new(0.0, -1.0, 0.0), &Vec3::new(k, k, 0.0));
        assert_relative_eq!(r, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_refractive_indices_through_nested_glass() {
        let mut scene = Scene::new();
        let glass = |index: f64, t: Transform| {
            Shape::glass_sphere()
                .with_transform(t)
                .unwrap()
                .with_material(Material {
                    refractive_index: index,
                    ..Material::glass()
                })
        };
        let a = scene.add_object(glass(1.5, Transform::scale(2.0, 2.0, 2.0)));
        let b = scene.add_object(glass(2.0, Transform::translation(0.0, 0.0, -0.25)));
        let c = scene.add_object(glass(2.5, Transform::translation(0.0, 0.0, 0.25)));

        let ray = Ray::new(Point3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 0.0, 1.0));
        let xs = [
            Intersection::new(2.0, a),
            Intersection::new(2.75, b),
            Intersection::new(3.25, c),
            Intersection::new(4.75, b),
            Intersection::new(5.25, c),
            Intersection::new(6.0, a),
        ];
        let expected = [
            (1.0, 1.5),
            (1.5, 2.0),
            (2.0, 2.5),
            (2.5, 2.5),
            (2.5, 1.5),
            (1.5, 1.0),
        ];
        for (x, (n1, n2)) in xs.iter().zip(expected) {
            let comps = x.prepare(&ray, &xs, &scene);
            assert_eq!((comps.n1, comps.n2), (n1, n2), "at t = {}", x.t);
        }
    }

    #[test]
    fn test_smooth_triangle_uses_uv() {
        let (scene, s) = one_shape(Shape::smooth_triangle(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ));
        let ray = Ray::new(Point3::new(-0.2, 0.3, -2.0), Vec3::new(0.0, 0.0, 1.0));
        let i = Intersection::with_uv(1.0, s, Some((0.45, 0.25)));
        let comps = i.prepare(&ray, &[i], &scene);
        assert_relative_eq!(comps.normalv, Vec3::new(-0.5547, 0.83205, 0.0), epsilon = 1e-4);
    }
}
