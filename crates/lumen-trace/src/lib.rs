#![warn(missing_docs)]

//! Shape tree, ray intersection and recursive shading for the lumen ray
//! tracer.
//!
//! A [`World`] owns a [`Scene`] of shapes plus a list of point lights. The
//! renderer asks the world for the color seen along a ray; the world finds
//! the nearest forward hit, prepares it, and shades it, recursing for
//! reflection and refraction until the depth budget runs out.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with cached reciprocal direction for slab tests
//! - [`Bounds`] - Axis-aligned boxes used to reject rays early
//! - [`Shape`] / [`ShapeKind`] - Primitives and composites in local space
//! - [`Scene`] - Shape arena with parent links, groups and CSG
//! - [`Intersection`] / [`PreparedHit`] - Hits and their shading state
//! - [`World`] - Lights, settings and the `color_at` entry point
//! - [`Camera`] / [`Canvas`] - Pixel rays in, colors out
//!
//! # Example
//!
//! ```ignore
//! use lumen_trace::{World, PinholeCamera, Ray};
//!
//! let world = World::default_world().unwrap();
//! let camera = PinholeCamera::new(160, 120, std::f64::consts::FRAC_PI_3);
//! let canvas = world.render(&camera);
//! ```

mod bounds;
mod camera;
mod canvas;
mod debug;
mod error;
mod intersection;
mod light;
mod material;
mod pattern;
mod ray;
mod scene;
mod settings;
mod shading;
pub mod shape;
mod world;

pub use bounds::Bounds;
pub use camera::{Camera, PinholeCamera};
pub use canvas::Canvas;
pub use error::TraceError;
pub use intersection::{hit, Intersection, PreparedHit};
pub use light::PointLight;
pub use material::Material;
pub use pattern::{Pattern, Texture, TransformedPattern};
pub use ray::Ray;
pub use scene::Scene;
pub use settings::RenderSettings;
pub use shading::lighting;
pub use shape::{CsgOp, Shape, ShapeKind};
pub use world::World;

slotmap::new_key_type! {
    /// Stable handle to a shape stored in a [`Scene`].
    pub struct ShapeId;
}
