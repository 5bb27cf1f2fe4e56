//! Ray-cube intersection (slab method on the canonical `[-1, 1]³` cube).

use lumen_math::{Point3, Tolerance, Vec3};

use super::SurfaceHit;
use crate::Ray;

/// Intersect a ray with the unit cube.
///
/// Takes the largest entry and smallest exit over the three slabs. An axis
/// with a near-zero direction component contributes an infinite interval
/// instead of dividing.
pub(crate) fn intersect(ray: &Ray, tol: &Tolerance) -> Vec<SurfaceHit> {
    let o = ray.origin;
    let d = ray.direction();

    let (x_min, x_max) = check_axis(o.x, d.x, tol);
    let (y_min, y_max) = check_axis(o.y, d.y, tol);
    let (z_min, z_max) = check_axis(o.z, d.z, tol);

    let t_min = x_min.max(y_min).max(z_min);
    let t_max = x_max.min(y_max).min(z_max);

    if t_min > t_max {
        return Vec::new();
    }
    vec![SurfaceHit::at(t_min), SurfaceHit::at(t_max)]
}

fn check_axis(origin: f64, direction: f64, tol: &Tolerance) -> (f64, f64) {
    let t_min_numerator = -1.0 - origin;
    let t_max_numerator = 1.0 - origin;

    let (t_min, t_max) = if tol.is_zero(direction) {
        (
            t_min_numerator * f64::INFINITY,
            t_max_numerator * f64::INFINITY,
        )
    } else {
        (t_min_numerator / direction, t_max_numerator / direction)
    };

    if t_min > t_max {
        (t_max, t_min)
    } else {
        (t_min, t_max)
    }
}

/// Normal of the face whose axis has the largest absolute coordinate.
pub(crate) fn normal_at(point: &Point3) -> Vec3 {
    let (ax, ay, az) = (point.x.abs(), point.y.abs(), point.z.abs());
    let max_c = ax.max(ay).max(az);

    if max_c == ax {
        Vec3::new(point.x, 0.0, 0.0)
    } else if max_c == ay {
        Vec3::new(0.0, point.y, 0.0)
    } else {
        Vec3::new(0.0, 0.0, point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_each_face() {
        let cases = [
            (Point3::new(5.0, 0.5, 0.0), Vec3::new(-1.0, 0.0, 0.0), 4.0, 6.0),
            (Point3::new(-5.0, 0.5, 0.0), Vec3::new(1.0, 0.0, 0.0), 4.0, 6.0),
            (Point3::new(0.5, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 4.0, 6.0),
            (Point3::new(0.5, -5.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 4.0, 6.0),
            (Point3::new(0.5, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 4.0, 6.0),
            (Point3::new(0.5, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 4.0, 6.0),
            (Point3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0), -1.0, 1.0),
        ];
        for (origin, direction, t1, t2) in cases {
            let hits = intersect(&Ray::new(origin, direction), &Tolerance::DEFAULT);
            assert_eq!(hits.len(), 2, "origin {:?}", origin);
            assert_eq!(hits[0].t, t1);
            assert_eq!(hits[1].t, t2);
        }
    }

    #[test]
    fn test_ray_misses_cube() {
        let cases = [
            (Point3::new(-2.0, 0.0, 0.0), Vec3::new(0.2673, 0.5345, 0.8018)),
            (Point3::new(0.0, -2.0, 0.0), Vec3::new(0.8018, 0.2673, 0.5345)),
            (Point3::new(0.0, 0.0, -2.0), Vec3::new(0.5345, 0.8018, 0.2673)),
            (Point3::new(2.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0)),
            (Point3::new(0.0, 2.0, 2.0), Vec3::new(0.0, -1.0, 0.0)),
            (Point3::new(2.0, 2.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];
        for (origin, direction) in cases {
            assert!(
                intersect(&Ray::new(origin, direction), &Tolerance::DEFAULT).is_empty(),
                "origin {:?}",
                origin
            );
        }
    }

    #[test]
    fn test_normal_on_faces_and_corners() {
        let cases = [
            (Point3::new(1.0, 0.5, -0.8), Vec3::new(1.0, 0.0, 0.0)),
            (Point3::new(-1.0, -0.2, 0.9), Vec3::new(-1.0, 0.0, 0.0)),
            (Point3::new(-0.4, 1.0, -0.1), Vec3::new(0.0, 1.0, 0.0)),
            (Point3::new(0.3, -1.0, -0.7), Vec3::new(0.0, -1.0, 0.0)),
            (Point3::new(-0.6, 0.3, 1.0), Vec3::new(0.0, 0.0, 1.0)),
            (Point3::new(0.4, 0.4, -1.0), Vec3::new(0.0, 0.0, -1.0)),
            (Point3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
            (Point3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];
        for (point, expected) in cases {
            assert_eq!(normal_at(&point), expected);
        }
    }
}
