//! Built-in scenes.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_6};
use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use lumen_math::{Color, Point3, Transform, Vec3};
use lumen_trace::shape::{Cone, Cylinder, LineSegment};
use lumen_trace::{CsgOp, Material, Pattern, Scene, Shape, ShapeKind, World};

use crate::config::{default_light, RenderConfig};

/// Scenes the driver knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Two concentric spheres under one light.
    Reference,
    /// Checkered floor with glass, CSG and grouped primitives.
    Showcase,
}

/// Alternating two-color 3D checkerboard with unit cells.
#[derive(Debug)]
pub struct Checker {
    /// Color of cells whose coordinate sum is even.
    pub a: Color,
    /// Color of the other cells.
    pub b: Color,
}

impl Pattern for Checker {
    fn color_at(&self, p: &Point3) -> Color {
        let sum = p.x.floor() + p.y.floor() + p.z.floor();
        if sum.rem_euclid(2.0) == 0.0 {
            self.a
        } else {
            self.b
        }
    }
}

/// Build the world for `scene`, applying the configuration's lights and
/// settings.
pub fn build(scene: DemoScene, config: &RenderConfig) -> Result<World> {
    let mut world = match scene {
        DemoScene::Reference => World::default_world()?,
        DemoScene::Showcase => showcase()?,
    };
    world.set_settings(config.settings);
    world.set_lights(config.lights_or(default_light()));
    log::debug!(
        "built {:?}: {} shapes, {} top-level",
        scene,
        world.scene().len(),
        world.scene().objects().len()
    );
    Ok(world)
}

fn showcase() -> Result<World> {
    let mut world = World::new();
    let scene = world.scene_mut();

    let floor_pattern: Arc<dyn Pattern> = Arc::new(Checker {
        a: Color::new(0.9, 0.9, 0.9),
        b: Color::new(0.2, 0.25, 0.3),
    });
    scene.add_object(Shape::plane().with_material(Material {
        specular: 0.0,
        reflective: 0.15,
        ..Material::default().with_pattern(floor_pattern)
    }));

    scene.add_object(
        Shape::glass_sphere()
            .with_transform(Transform::translation(-1.5, 1.0, 0.5))?
            .with_material(Material {
                color: Color::new(0.1, 0.1, 0.1),
                ambient: 0.0,
                diffuse: 0.1,
                specular: 1.0,
                shininess: 300.0,
                reflective: 0.9,
                ..Material::glass()
            }),
    );

    // Cube with a spherical bite taken out of it.
    let red = Material {
        color: Color::new(0.8, 0.2, 0.15),
        ..Material::default()
    };
    let cube = scene.insert(Shape::cube().with_material(red.clone()));
    let bite = scene.insert(
        Shape::sphere()
            .with_transform(Transform::scale(1.3, 1.3, 1.3))?
            .with_material(red),
    );
    let carved = scene.csg(CsgOp::Difference, cube, bite)?;
    scene.set_transform(
        carved,
        Transform::translation(1.5, 0.8, 1.0)
            .then(&Transform::rotation_y(FRAC_PI_6))
            .then(&Transform::scale(0.8, 0.8, 0.8)),
    )?;
    scene.attach_object(carved)?;

    // Capped post with a conical roof, built bottom-up so group bounds are
    // current.
    let tower = scene.insert(Shape::group());
    let green = Material {
        color: Color::new(0.3, 0.7, 0.35),
        ..Material::default()
    };
    let post = scene.insert(
        Shape::new(ShapeKind::Cylinder(Cylinder::new(0.0, 1.5, true)))
            .with_transform(Transform::scale(0.4, 1.0, 0.4))?
            .with_material(green.clone()),
    );
    let roof = scene.insert(
        Shape::new(ShapeKind::Cone(Cone::new(-1.0, 0.0, true)))
            .with_transform(
                Transform::translation(0.0, 2.2, 0.0).then(&Transform::scale(0.6, 0.7, 0.6)),
            )?
            .with_material(green),
    );
    scene.add_child(tower, post)?;
    scene.add_child(tower, roof)?;
    scene.set_transform(tower, Transform::translation(0.2, 0.0, 3.0))?;
    scene.attach_object(tower)?;

    scene.add_object(
        Shape::smooth_triangle(
            Point3::new(-3.5, 0.0, 3.5),
            Point3::new(-1.0, 0.0, 4.5),
            Point3::new(-2.5, 2.5, 4.0),
            Vec3::new(-0.5, 0.2, -1.0),
            Vec3::new(0.5, 0.2, -1.0),
            Vec3::new(0.0, 1.0, -0.5),
        )
        .with_material(Material {
            color: Color::new(0.95, 0.8, 0.2),
            ..Material::default()
        }),
    );

    Ok(world)
}

/// Outline every finite top-level shape and add an axis gizmo.
pub fn add_debug_geometry(scene: &mut Scene) -> Result<()> {
    let boxes: Vec<_> = scene
        .objects()
        .iter()
        .map(|&id| *scene[id].bounds())
        .filter(|b| b.is_finite())
        .collect();
    for bounds in &boxes {
        scene.add_bounds_wireframe(
            bounds,
            Color::new(1.0, 0.0, 1.0),
            LineSegment::DEFAULT_FATNESS,
        )?;
    }
    let gizmo = scene.add_axis_gizmo(1.0, LineSegment::DEFAULT_FATNESS * 2.0)?;
    scene.set_transform(gizmo, Transform::rotation_y(FRAC_PI_4))?;
    log::debug!("added {} wireframes and an axis gizmo", boxes.len());
    Ok(())
}
