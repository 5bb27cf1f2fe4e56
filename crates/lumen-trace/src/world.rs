//! Scene plus lights: the entry point for shading rays.

use lumen_math::{Color, Point3, Transform};
use rayon::prelude::*;

use crate::intersection::sort_by_t;
use crate::{
    hit, Camera, Canvas, Intersection, Material, PointLight, Ray, RenderSettings, Scene, Shape,
    TraceError,
};

/// Everything a render reads: shapes, lights and settings.
///
/// The world is only read while rendering, so one instance is shared by all
/// worker threads.
#[derive(Debug, Default)]
pub struct World {
    scene: Scene,
    lights: Vec<PointLight>,
    settings: RenderSettings,
}

impl World {
    /// Empty world with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty world using `settings`.
    pub fn with_settings(settings: RenderSettings) -> Self {
        let mut world = Self::default();
        world.set_settings(settings);
        world
    }

    /// The reference scene: one white light at (-10, 10, -10) and two
    /// concentric spheres, the inner one scaled by 0.5.
    pub fn default_world() -> Result<Self, TraceError> {
        let mut world = Self::new();
        world.add_light(PointLight::new(
            Point3::new(-10.0, 10.0, -10.0),
            Color::WHITE,
        ));
        world.scene.add_object(Shape::sphere().with_material(Material {
            color: Color::new(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Material::default()
        }));
        world
            .scene
            .add_object(Shape::sphere().with_transform(Transform::scale(0.5, 0.5, 0.5))?);
        Ok(world)
    }

    /// The shapes.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the shapes.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Light sources.
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Add a light source.
    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Replace all light sources.
    pub fn set_lights(&mut self, lights: Vec<PointLight>) {
        self.lights = lights;
    }

    /// Render settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Replace the render settings; the tolerance is forwarded to the scene.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.scene.set_tolerance(settings.tolerance);
        self.settings = settings;
    }

    /// Every crossing of `ray` with a top-level shape, sorted by `t`.
    pub fn intersect(&self, ray: &Ray) -> Vec<Intersection> {
        let mut xs = Vec::new();
        for &id in self.scene.objects() {
            self.scene.collect_hits(id, ray, &mut xs);
        }
        sort_by_t(&mut xs);
        xs
    }

    /// Color seen along `ray`, recursing at most `remaining` more times for
    /// reflection and refraction.
    pub fn color_at(&self, ray: &Ray, remaining: u32) -> Color {
        let xs = self.intersect(ray);
        match hit(&xs) {
            Some(h) => h.prepare(ray, &xs, &self.scene).shade(self, remaining),
            None => Color::BLACK,
        }
    }

    /// True when something lies between `point` and `light_position`.
    pub fn is_shadowed(&self, light_position: &Point3, point: &Point3) -> bool {
        let v = light_position - point;
        let distance = v.norm();
        let ray = Ray::new(*point, v / distance);
        self.intersect(&ray)
            .iter()
            .any(|x| x.t >= 0.0 && x.t < distance)
    }

    /// Render every pixel of `camera` with the configured recursion budget.
    ///
    /// Rows are shaded in parallel; each worker writes only its own row.
    pub fn render(&self, camera: &dyn Camera) -> Canvas {
        let (width, height) = (camera.hsize(), camera.vsize());
        let depth = self.settings.max_depth;
        log::debug!(
            "rendering {}x{} with {} shapes, {} lights, depth {}",
            width,
            height,
            self.scene.len(),
            self.lights.len(),
            depth
        );

        let mut canvas = Canvas::new(width, height);
        if width == 0 {
            return canvas;
        }
        canvas
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = self.color_at(&camera.ray_for_pixel(x, y), depth);
                }
            });

        log::debug!("render finished");
        canvas
    }
}
