//! Local illumination and the recursive color equation.

use lumen_math::{Color, Point3, Vec3};

use crate::{Material, PointLight, PreparedHit, Ray, World};

/// Phong illumination of one point by one light.
///
/// `base` is the material's resolved base color at the point. A shadowed
/// point only receives the ambient term.
pub fn lighting(
    material: &Material,
    base: Color,
    light: &PointLight,
    point: &Point3,
    eyev: &Vec3,
    normalv: &Vec3,
    shadowed: bool,
) -> Color {
    let effective = base * light.intensity;
    let ambient = effective * material.ambient;
    if shadowed {
        return ambient;
    }

    let lightv = (light.position - point).normalize();
    let light_dot_normal = lightv.dot(normalv);
    if light_dot_normal < 0.0 {
        return ambient;
    }

    let diffuse = effective * material.diffuse * light_dot_normal;
    let reflectv = crate::intersection::reflect(&-lightv, normalv);
    let reflect_dot_eye = reflectv.dot(eyev);
    let specular = if reflect_dot_eye <= 0.0 {
        Color::BLACK
    } else {
        light.intensity * material.specular * reflect_dot_eye.powf(material.shininess)
    };

    ambient + diffuse + specular
}

impl PreparedHit {
    /// Color leaving the hit toward the eye.
    ///
    /// Sums the local term for every light with the reflected and refracted
    /// contributions. When the material both reflects and transmits, the two
    /// are weighted by [`PreparedHit::schlick`] instead of summed. A world
    /// without lights yields the ambient term plus reflection.
    pub fn shade(&self, world: &World, remaining: u32) -> Color {
        let scene = world.scene();
        let material = scene[self.shape].material();
        let base = material.color_at(scene, self.shape, &self.over_point, self.uv);
        let reflected = self.reflected_color(world, remaining);

        if world.lights().is_empty() {
            return base * material.ambient + reflected;
        }

        let surface: Color = world
            .lights()
            .iter()
            .map(|light| {
                let shadowed = world.is_shadowed(&light.position, &self.over_point);
                lighting(
                    material,
                    base,
                    light,
                    &self.over_point,
                    &self.eyev,
                    &self.normalv,
                    shadowed,
                )
            })
            .sum();
        let refracted = self.refracted_color(world, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = self.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    /// Contribution of the mirror-reflected ray.
    ///
    /// Black when the material does not reflect or the budget is spent.
    pub fn reflected_color(&self, world: &World, remaining: u32) -> Color {
        let reflective = world.scene()[self.shape].material().reflective;
        if reflective == 0.0 {
            return Color::BLACK;
        }
        if remaining == 0 {
            log::trace!("reflection truncated at {:?}", self.point);
            return Color::BLACK;
        }
        let ray = Ray::new(self.over_point, self.reflectv);
        world.color_at(&ray, remaining - 1) * reflective
    }

    /// Contribution of the transmitted ray, bent by Snell's law.
    ///
    /// Black when the material is opaque, the budget is spent, or the ray is
    /// totally internally reflected.
    pub fn refracted_color(&self, world: &World, remaining: u32) -> Color {
        let transparency = world.scene()[self.shape].material().transparency;
        if transparency == 0.0 {
            return Color::BLACK;
        }
        if remaining == 0 {
            log::trace!("refraction truncated at {:?}", self.point);
            return Color::BLACK;
        }

        let n_ratio = self.n1 / self.n2;
        let cos_i = self.eyev.dot(&self.normalv);
        let sin2_t = n_ratio * n_ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return Color::BLACK;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = self.normalv * (n_ratio * cos_i - cos_t) - self.eyev * n_ratio;
        let ray = Ray::new(self.under_point, direction);
        world.color_at(&ray, remaining - 1) * transparency
    }

    /// Schlick's approximation of the Fresnel reflectance at this hit.
    ///
    /// Returns exactly 1.0 under total internal reflection.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n * n * (1.0 - cos * cos);
            if sin2_t > 1.0 {
                return 1.0;
            }
            cos = (1.0 - sin2_t).sqrt();
        }
        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}
