//! Debug geometry built from line segments.

use lumen_math::{Color, Point3};

use crate::{Bounds, Material, Scene, Shape, ShapeId, TraceError};

/// Corner index pairs of the twelve box edges, as laid out by
/// [`Bounds::corners`].
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Flat, unlit-looking material for debug lines.
fn line_material(color: Color) -> Material {
    Material {
        color,
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Material::default()
    }
}

impl Scene {
    /// Add a top-level group of twelve segments outlining `bounds`.
    ///
    /// Infinite or empty boxes cannot be drawn and produce an empty group.
    pub fn add_bounds_wireframe(
        &mut self,
        bounds: &Bounds,
        color: Color,
        fatness: f64,
    ) -> Result<ShapeId, TraceError> {
        let group = self.insert(Shape::group());
        if !bounds.is_finite() {
            log::warn!("skipping wireframe for unbounded box {:?}", bounds);
        } else {
            let corners = bounds.corners();
            for (a, b) in BOX_EDGES {
                let edge = Shape::line_segment_between(&corners[a], &corners[b], fatness)?
                    .with_material(line_material(color));
                let edge = self.insert(edge);
                self.add_child(group, edge)?;
            }
        }
        self.attach_object(group)?;
        Ok(group)
    }

    /// Add a top-level group with red, green and blue segments along the
    /// positive x, y and z axes.
    pub fn add_axis_gizmo(&mut self, length: f64, fatness: f64) -> Result<ShapeId, TraceError> {
        let group = self.insert(Shape::group());
        let origin = Point3::origin();
        for (tip, color) in [
            (Point3::new(length, 0.0, 0.0), Color::new(1.0, 0.0, 0.0)),
            (Point3::new(0.0, length, 0.0), Color::new(0.0, 1.0, 0.0)),
            (Point3::new(0.0, 0.0, length), Color::new(0.0, 0.0, 1.0)),
        ] {
            let axis = Shape::line_segment_between(&origin, &tip, fatness)?
                .with_material(line_material(color));
            let axis = self.insert(axis);
            self.add_child(group, axis)?;
        }
        self.attach_object(group)?;
        Ok(group)
    }
}
