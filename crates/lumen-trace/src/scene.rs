//! Shape arena and scene tree.
//!
//! Shapes live in a [`SlotMap`] keyed by [`ShapeId`]. Composites hold the
//! ids of their children, and the parent of each attached shape is kept in a
//! side table, so the tree never owns a back-pointer and identity is key
//! equality.
//!
//! Bounds are refreshed shallowly: changing a shape's transform updates that
//! shape's own bounds, and changing a composite's membership updates that
//! composite's local bounds. Ancestors further up keep their previous boxes
//! until [`Scene::refresh_ancestors`] is called. Build trees bottom-up, or
//! refresh afterwards.

use std::ops::Index;

use lumen_math::{Point3, Tolerance, Transform, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use crate::intersection::sort_by_t;
use crate::shape::{Csg, CsgOp, Shape, ShapeKind};
use crate::{Bounds, Intersection, Material, Ray, ShapeId, TraceError};

/// All shapes of a world, with their tree structure.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: SlotMap<ShapeId, Shape>,
    parents: SecondaryMap<ShapeId, ShapeId>,
    objects: Vec<ShapeId>,
    tolerance: Tolerance,
}

impl Scene {
    /// Empty scene with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty scene using `tolerance` for intersection tests.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Tolerances used by intersection tests.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Replace the tolerances used by intersection tests.
    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.tolerance = tolerance;
    }

    /// Number of shapes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True when the arena holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Add a shape without attaching it anywhere.
    ///
    /// Detached shapes are not rendered until they are attached to a group,
    /// used as a CSG operand, or made top-level with [`Scene::attach_object`].
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert(shape)
    }

    /// Add a shape as a top-level object.
    pub fn add_object(&mut self, shape: Shape) -> ShapeId {
        let id = self.insert(shape);
        self.objects.push(id);
        id
    }

    /// Make an existing shape top-level, detaching it from its parent.
    pub fn attach_object(&mut self, id: ShapeId) -> Result<(), TraceError> {
        self.shape(id)?;
        self.detach(id)?;
        self.objects.push(id);
        log::debug!("attached {:?} at top level", id);
        Ok(())
    }

    /// Top-level shapes in insertion order.
    pub fn objects(&self) -> &[ShapeId] {
        &self.objects
    }

    /// Look up a shape.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Look up a shape for in-place edits of its material.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    fn shape(&self, id: ShapeId) -> Result<&Shape, TraceError> {
        self.shapes.get(id).ok_or(TraceError::UnknownShape(id))
    }

    /// The composite directly containing `id`, if any.
    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.parents.get(id).copied()
    }

    /// Direct children of a composite; empty for leaves and unknown ids.
    ///
    /// For a CSG node this is `[left, right]`.
    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        match self.shapes.get(id).map(Shape::kind) {
            Some(ShapeKind::Group(g)) => g.children(),
            Some(ShapeKind::Csg(c)) => c.operands(),
            _ => &[],
        }
    }

    /// True when `needle` is `root` or one of its descendants.
    pub fn includes(&self, root: ShapeId, needle: ShapeId) -> bool {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if id == needle {
                return true;
            }
            stack.extend_from_slice(self.children(id));
        }
        false
    }

    /// Attach `child` to `group`, detaching it from wherever it was.
    ///
    /// Only `group`'s bounds are recomputed.
    pub fn add_child(&mut self, group: ShapeId, child: ShapeId) -> Result<(), TraceError> {
        self.shape(child)?;
        if !matches!(self.shape(group)?.kind(), ShapeKind::Group(_)) {
            return Err(TraceError::NotAGroup(group));
        }
        if self.includes(child, group) {
            return Err(TraceError::Cycle {
                parent: group,
                child,
            });
        }

        self.detach(child)?;
        if let ShapeKind::Group(g) = self.shapes[group].kind_mut() {
            g.push(child);
        }
        self.parents.insert(child, group);
        self.refresh_bounds(group);
        log::debug!("attached {:?} under {:?}", child, group);
        Ok(())
    }

    /// Detach `child` from `group`. The child stays in the arena, detached.
    pub fn remove_child(&mut self, group: ShapeId, child: ShapeId) -> Result<(), TraceError> {
        self.shape(group)?;
        self.shape(child)?;
        if self.parent(child) != Some(group) {
            return Err(TraceError::NotAChild { group, child });
        }
        self.detach(child)?;
        log::debug!("detached {:?} from {:?}", child, group);
        Ok(())
    }

    /// Delete a shape and its whole subtree.
    pub fn remove(&mut self, id: ShapeId) -> Result<(), TraceError> {
        self.shape(id)?;
        self.detach(id)?;
        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(next) = stack.pop() {
            stack.extend_from_slice(self.children(next));
            self.parents.remove(next);
            self.shapes.remove(next);
            removed += 1;
        }
        log::debug!("removed {:?} ({} shapes)", id, removed);
        Ok(())
    }

    /// Combine two shapes into a new, detached CSG node.
    ///
    /// Both operands are detached from their previous parents first.
    pub fn csg(&mut self, op: CsgOp, left: ShapeId, right: ShapeId) -> Result<ShapeId, TraceError> {
        self.shape(left)?;
        self.shape(right)?;
        if left == right {
            return Err(TraceError::DuplicateOperand(left));
        }
        for operand in [left, right] {
            if self.is_csg_operand(operand) {
                return Err(TraceError::CsgOperand(operand));
            }
        }

        self.detach(left)?;
        self.detach(right)?;
        let id = self.shapes.insert(Shape::csg(Csg::new(op, left, right)));
        self.parents.insert(left, id);
        self.parents.insert(right, id);
        self.refresh_bounds(id);
        log::debug!("built {:?} csg {:?} from {:?} and {:?}", op, id, left, right);
        Ok(id)
    }

    /// Replace a shape's transform. Only that shape's bounds are recomputed.
    pub fn set_transform(&mut self, id: ShapeId, transform: Transform) -> Result<(), TraceError> {
        self.shapes
            .get_mut(id)
            .ok_or(TraceError::UnknownShape(id))?
            .set_transform(transform)
    }

    /// Replace a shape's material.
    pub fn set_material(&mut self, id: ShapeId, material: Material) -> Result<(), TraceError> {
        self.shapes
            .get_mut(id)
            .ok_or(TraceError::UnknownShape(id))?
            .set_material(material);
        Ok(())
    }

    /// Recompute the bounds of every composite above `id`, innermost first.
    pub fn refresh_ancestors(&mut self, id: ShapeId) {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            self.refresh_bounds(parent);
            current = self.parent(parent);
        }
    }

    /// Deep copy of a shape and its subtree, returned detached.
    pub fn duplicate(&mut self, id: ShapeId) -> Result<ShapeId, TraceError> {
        let source = self.shape(id)?;
        let transform = *source.transform();
        let material = source.material().clone();
        let leaf = source.kind().leaf_copy();
        let csg = match source.kind() {
            ShapeKind::Csg(c) => Some((c.op(), c.left(), c.right())),
            _ => None,
        };

        let copy = if let Some(kind) = leaf {
            self.insert(Shape::new(kind))
        } else if let Some((op, left, right)) = csg {
            let left = self.duplicate(left)?;
            let right = self.duplicate(right)?;
            self.csg(op, left, right)?
        } else {
            let children = self.children(id).to_vec();
            let group = self.insert(Shape::group());
            for child in children {
                let child = self.duplicate(child)?;
                self.add_child(group, child)?;
            }
            group
        };

        let shape = &mut self.shapes[copy];
        shape.set_transform(transform)?;
        shape.set_material(material);
        Ok(copy)
    }

    /// Intersect a ray, given in the parent space of `id`, with that shape.
    ///
    /// The ray is carried into local space and checked against the local
    /// bounds first. Results are sorted by `t` and keep hits behind the
    /// origin. Unknown ids produce no hits.
    pub fn intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        let mut xs = Vec::new();
        self.collect_hits(id, ray, &mut xs);
        sort_by_t(&mut xs);
        xs
    }

    pub(crate) fn collect_hits(&self, id: ShapeId, ray: &Ray, out: &mut Vec<Intersection>) {
        let Some(shape) = self.shapes.get(id) else {
            return;
        };
        let local = ray.transform(shape.inverse());
        if !shape.local_bounds().intersects(&local) {
            return;
        }

        match shape.kind() {
            ShapeKind::Group(g) => {
                for &child in g.children() {
                    self.collect_hits(child, &local, out);
                }
            }
            ShapeKind::Csg(c) => {
                let mut xs = Vec::new();
                self.collect_hits(c.left(), &local, &mut xs);
                self.collect_hits(c.right(), &local, &mut xs);
                sort_by_t(&mut xs);
                out.extend(c.filter(self, xs));
            }
            leaf => out.extend(
                leaf.local_intersect(&local, &self.tolerance)
                    .into_iter()
                    .map(|hit| Intersection::with_uv(hit.t, id, hit.uv)),
            ),
        }
    }

    /// Carry a world-space point into the local space of `id`, through
    /// every ancestor's transform.
    pub fn world_to_object(&self, id: ShapeId, point: &Point3) -> Point3 {
        let point = match self.parent(id) {
            Some(parent) => self.world_to_object(parent, point),
            None => *point,
        };
        match self.shapes.get(id) {
            Some(shape) => shape.inverse().apply_point(&point),
            None => point,
        }
    }

    /// Carry a local-space normal of `id` out to world space.
    ///
    /// Uses the inverse transpose of each transform on the way up and
    /// renormalizes at every level.
    pub fn normal_to_world(&self, id: ShapeId, normal: &Vec3) -> Vec3 {
        let normal = match self.shapes.get(id) {
            Some(shape) => {
                let n = shape.inverse().transpose().apply_vec(normal);
                n.try_normalize(f64::EPSILON).unwrap_or(n)
            }
            None => *normal,
        };
        match self.parent(id) {
            Some(parent) => self.normal_to_world(parent, &normal),
            None => normal,
        }
    }

    /// World-space surface normal of leaf `id` at `point`.
    ///
    /// `uv` is the barycentric coordinate pair of the hit, used by smooth
    /// triangles.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown or names a group or CSG node; intersections
    /// only ever reference leaves.
    pub fn normal_at(&self, id: ShapeId, point: &Point3, uv: Option<(f64, f64)>) -> Vec3 {
        let local_point = self.world_to_object(id, point);
        let local_normal = match self[id]
            .kind()
            .local_normal_at(&local_point, uv, &self.tolerance)
        {
            Some(n) => n,
            None => panic!("normal requested for composite shape {id:?}"),
        };
        self.normal_to_world(id, &local_normal)
    }

    fn is_csg_operand(&self, id: ShapeId) -> bool {
        self.parent(id)
            .and_then(|p| self.shapes.get(p))
            .is_some_and(|p| matches!(p.kind(), ShapeKind::Csg(_)))
    }

    /// Unlink `child` from its parent or from the top-level list.
    fn detach(&mut self, child: ShapeId) -> Result<(), TraceError> {
        if self.is_csg_operand(child) {
            return Err(TraceError::CsgOperand(child));
        }
        match self.parents.remove(child) {
            Some(parent) => {
                if let Some(ShapeKind::Group(g)) = self.shapes.get_mut(parent).map(Shape::kind_mut) {
                    g.detach(child);
                }
                self.refresh_bounds(parent);
            }
            None => self.objects.retain(|&o| o != child),
        }
        Ok(())
    }

    /// Recompute a composite's local bounds from its children's bounds.
    fn refresh_bounds(&mut self, id: ShapeId) {
        if !self.shapes.get(id).is_some_and(|s| s.kind().is_composite()) {
            return;
        }
        let local = self
            .children(id)
            .iter()
            .filter_map(|&c| self.shapes.get(c))
            .fold(Bounds::empty(), |acc, s| acc.union(s.bounds()));
        self.shapes[id].set_local_bounds(local);
    }
}

impl Index<ShapeId> for Scene {
    type Output = Shape;

    fn index(&self, id: ShapeId) -> &Shape {
        &self.shapes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn z_ray(x: f64, y: f64) -> Ray {
        Ray::new(Point3::new(x, y, -5.0), Vec3::new(0.0, 0.0, 1.0))
    }

    fn ts(xs: &[Intersection]) -> Vec<f64> {
        xs.iter().map(|x| x.t).collect()
    }

    #[test]
    fn test_add_child_sets_parent_and_bounds() {
        let mut scene = Scene::new();
        let g = scene.add_object(Shape::group());
        let s = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(2.0, 0.0, 0.0))
                .unwrap(),
        );
        scene.add_child(g, s).unwrap();

        assert_eq!(scene.parent(s), Some(g));
        assert_eq!(scene.children(g), &[s]);
        assert_relative_eq!(scene[g].bounds().min, Point3::new(1.0, -1.0, -1.0));
        assert_relative_eq!(scene[g].bounds().max, Point3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_reparenting_detaches_from_previous_group() {
        let mut scene = Scene::new();
        let g1 = scene.add_object(Shape::group());
        let g2 = scene.add_object(Shape::group());
        let s = scene.insert(Shape::sphere());

        scene.add_child(g1, s).unwrap();
        scene.add_child(g2, s).unwrap();

        assert!(scene.children(g1).is_empty());
        assert!(scene[g1].bounds().is_empty());
        assert_eq!(scene.children(g2), &[s]);
        assert_eq!(scene.parent(s), Some(g2));
    }

    #[test]
    fn test_add_child_removes_from_top_level() {
        let mut scene = Scene::new();
        let s = scene.add_object(Shape::sphere());
        let g = scene.add_object(Shape::group());
        scene.add_child(g, s).unwrap();
        assert_eq!(scene.objects(), &[g]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut scene = Scene::new();
        let outer = scene.add_object(Shape::group());
        let inner = scene.insert(Shape::group());
        scene.add_child(outer, inner).unwrap();

        assert_eq!(
            scene.add_child(inner, outer),
            Err(TraceError::Cycle {
                parent: inner,
                child: outer
            })
        );
        assert!(matches!(
            scene.add_child(outer, outer),
            Err(TraceError::Cycle { .. })
        ));
        assert_eq!(scene.parent(inner), Some(outer));
        assert_eq!(scene.objects(), &[outer]);
    }

    #[test]
    fn test_add_child_to_leaf_is_rejected() {
        let mut scene = Scene::new();
        let a = scene.add_object(Shape::sphere());
        let b = scene.add_object(Shape::cube());
        assert_eq!(scene.add_child(a, b), Err(TraceError::NotAGroup(a)));
    }

    #[test]
    fn test_remove_child_requires_membership() {
        let mut scene = Scene::new();
        let g = scene.add_object(Shape::group());
        let s = scene.insert(Shape::sphere());
        assert_eq!(
            scene.remove_child(g, s),
            Err(TraceError::NotAChild { group: g, child: s })
        );

        scene.add_child(g, s).unwrap();
        scene.remove_child(g, s).unwrap();
        assert_eq!(scene.parent(s), None);
        assert!(scene.get(s).is_some());
        assert!(scene[g].bounds().is_empty());
    }

    #[test]
    fn test_remove_deletes_subtree() {
        let mut scene = Scene::new();
        let g = scene.add_object(Shape::group());
        let inner = scene.insert(Shape::group());
        let s = scene.insert(Shape::sphere());
        scene.add_child(inner, s).unwrap();
        scene.add_child(g, inner).unwrap();

        scene.remove(g).unwrap();
        assert!(scene.is_empty());
        assert!(scene.objects().is_empty());
        assert_eq!(scene.remove(g), Err(TraceError::UnknownShape(g)));
    }

    #[test]
    fn test_bounds_refresh_is_shallow() {
        let mut scene = Scene::new();
        let outer = scene.add_object(Shape::group());
        let inner = scene.insert(Shape::group());
        scene.add_child(outer, inner).unwrap();

        // Filling the inner group after attaching it leaves outer stale.
        let s = scene.insert(Shape::sphere());
        scene.add_child(inner, s).unwrap();
        assert!(!scene[inner].bounds().is_empty());
        assert!(scene[outer].bounds().is_empty());
        assert!(scene.intersect(outer, &z_ray(0.0, 0.0)).is_empty());

        scene.refresh_ancestors(s);
        assert_eq!(ts(&scene.intersect(outer, &z_ray(0.0, 0.0))), vec![4.0, 6.0]);

        // Moving the leaf only updates the leaf's own box.
        scene
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(scene[s].bounds().min.x, 4.0);
        assert_relative_eq!(scene[inner].bounds().max.x, 1.0);
        assert!(scene.intersect(outer, &z_ray(5.0, 0.0)).is_empty());
    }

    #[test]
    fn test_group_intersections_are_sorted() {
        let mut scene = Scene::new();
        let g = scene.insert(Shape::group());
        let s1 = scene.insert(Shape::sphere());
        let s2 = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, 0.0, -3.0))
                .unwrap(),
        );
        let s3 = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(5.0, 0.0, 0.0))
                .unwrap(),
        );
        for s in [s1, s2, s3] {
            scene.add_child(g, s).unwrap();
        }

        let xs = scene.intersect(g, &z_ray(0.0, 0.0));
        assert_eq!(ts(&xs), vec![1.0, 3.0, 4.0, 6.0]);
        let shapes: Vec<_> = xs.iter().map(|x| x.shape).collect();
        assert_eq!(shapes, vec![s2, s2, s1, s1]);
    }

    #[test]
    fn test_empty_group_has_no_hits() {
        let mut scene = Scene::new();
        let g = scene.add_object(Shape::group());
        assert!(scene.intersect(g, &z_ray(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_transformed_group() {
        let mut scene = Scene::new();
        let g = scene.insert(
            Shape::group()
                .with_transform(Transform::scale(2.0, 2.0, 2.0))
                .unwrap(),
        );
        let s = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(5.0, 0.0, 0.0))
                .unwrap(),
        );
        scene.add_child(g, s).unwrap();
        let ray = Ray::new(Point3::new(10.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(scene.intersect(g, &ray).len(), 2);
    }

    fn overlapping_spheres(scene: &mut Scene, op: CsgOp) -> (ShapeId, ShapeId, ShapeId) {
        let left = scene.insert(Shape::sphere());
        let right = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, 0.0, 0.5))
                .unwrap(),
        );
        let c = scene.csg(op, left, right).unwrap();
        (c, left, right)
    }

    #[test]
    fn test_csg_union_drops_interior_crossings() {
        let mut scene = Scene::new();
        let (c, left, right) = overlapping_spheres(&mut scene, CsgOp::Union);
        let xs = scene.intersect(c, &z_ray(0.0, 0.0));
        assert_eq!(ts(&xs), vec![4.0, 6.5]);
        assert_eq!(xs[0].shape, left);
        assert_eq!(xs[1].shape, right);
    }

    #[test]
    fn test_csg_intersection_keeps_overlap() {
        let mut scene = Scene::new();
        let (c, left, right) = overlapping_spheres(&mut scene, CsgOp::Intersection);
        let xs = scene.intersect(c, &z_ray(0.0, 0.0));
        assert_eq!(ts(&xs), vec![4.5, 6.0]);
        assert_eq!(xs[0].shape, right);
        assert_eq!(xs[1].shape, left);
    }

    #[test]
    fn test_csg_difference_carves_right_operand() {
        let mut scene = Scene::new();
        let (c, left, right) = overlapping_spheres(&mut scene, CsgOp::Difference);
        let xs = scene.intersect(c, &z_ray(0.0, 0.0));
        assert_eq!(ts(&xs), vec![4.0, 4.5]);
        assert_eq!(xs[0].shape, left);
        assert_eq!(xs[1].shape, right);
    }

    #[test]
    fn test_csg_difference_outside_left_is_empty() {
        let mut scene = Scene::new();
        let left = scene.insert(Shape::sphere());
        let right = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, 3.0, 0.0))
                .unwrap(),
        );
        let c = scene.csg(CsgOp::Difference, left, right).unwrap();

        assert_eq!(scene.intersect(right, &z_ray(0.0, 3.0)).len(), 2);
        assert!(scene.intersect(c, &z_ray(0.0, 3.0)).is_empty());
    }

    #[test]
    fn test_csg_with_group_operand_uses_subtree_membership() {
        let mut scene = Scene::new();
        let g = scene.insert(Shape::group());
        let inner = scene.insert(Shape::sphere());
        scene.add_child(g, inner).unwrap();
        let right = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(0.0, 0.0, 0.5))
                .unwrap(),
        );
        let c = scene.csg(CsgOp::Union, g, right).unwrap();

        assert!(scene.includes(g, inner));
        assert!(scene.includes(c, inner));
        assert!(!scene.includes(right, inner));
        assert_eq!(ts(&scene.intersect(c, &z_ray(0.0, 0.0))), vec![4.0, 6.5]);
    }

    #[test]
    fn test_csg_miss() {
        let mut scene = Scene::new();
        let (c, _, _) = overlapping_spheres(&mut scene, CsgOp::Union);
        assert!(scene.intersect(c, &z_ray(0.0, 2.0)).is_empty());
    }

    #[test]
    fn test_csg_operands_are_pinned() {
        let mut scene = Scene::new();
        let (c, left, right) = overlapping_spheres(&mut scene, CsgOp::Union);
        let g = scene.add_object(Shape::group());

        assert_eq!(scene.parent(left), Some(c));
        assert_eq!(scene.children(c), &[left, right]);
        assert_eq!(scene.add_child(g, left), Err(TraceError::CsgOperand(left)));
        assert_eq!(scene.remove(right), Err(TraceError::CsgOperand(right)));
        assert_eq!(
            scene.csg(CsgOp::Union, left, g),
            Err(TraceError::CsgOperand(left))
        );
        assert_eq!(
            scene.csg(CsgOp::Union, g, g),
            Err(TraceError::DuplicateOperand(g))
        );
    }

    #[test]
    fn test_world_to_object_through_groups() {
        let mut scene = Scene::new();
        let g1 = scene.add_object(
            Shape::group()
                .with_transform(Transform::rotation_y(PI / 2.0))
                .unwrap(),
        );
        let g2 = scene.insert(
            Shape::group()
                .with_transform(Transform::scale(2.0, 2.0, 2.0))
                .unwrap(),
        );
        let s = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(5.0, 0.0, 0.0))
                .unwrap(),
        );
        scene.add_child(g2, s).unwrap();
        scene.add_child(g1, g2).unwrap();

        let p = scene.world_to_object(s, &Point3::new(-2.0, 0.0, -10.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-9);
    }

    fn nested_book_scene() -> (Scene, ShapeId) {
        let mut scene = Scene::new();
        let g1 = scene.add_object(
            Shape::group()
                .with_transform(Transform::rotation_y(PI / 2.0))
                .unwrap(),
        );
        let g2 = scene.insert(
            Shape::group()
                .with_transform(Transform::scale(1.0, 2.0, 3.0))
                .unwrap(),
        );
        let s = scene.insert(
            Shape::sphere()
                .with_transform(Transform::translation(5.0, 0.0, 0.0))
                .unwrap(),
        );
        scene.add_child(g2, s).unwrap();
        scene.add_child(g1, g2).unwrap();
        (scene, s)
    }

    #[test]
    fn test_normal_to_world_through_groups() {
        let (scene, s) = nested_book_scene();
        let k = 3f64.sqrt() / 3.0;
        let n = scene.normal_to_world(s, &Vec3::new(k, k, k));
        assert_relative_eq!(n, Vec3::new(0.2857, 0.4286, -0.8571), epsilon = 1e-4);
    }

    #[test]
    fn test_normal_at_on_grouped_child() {
        let (scene, s) = nested_book_scene();
        let n = scene.normal_at(s, &Point3::new(1.7321, 1.1547, -5.5774), None);
        assert_relative_eq!(n, Vec3::new(0.2857, 0.4286, -0.8571), epsilon = 1e-4);
    }

    #[test]
    fn test_three_deep_normal_matches_composed_transform() {
        let t1 = Transform::rotation_z(0.3).then(&Transform::translation(1.0, -2.0, 0.5));
        let t2 = Transform::scale(1.0, 2.0, 0.5);
        let t3 = Transform::rotation_x(-0.7).then(&Transform::shearing(0.2, 0.0, 0.0, 0.1, 0.0, 0.0));
        let t4 = Transform::translation(0.0, 3.0, -1.0).then(&Transform::scale(1.5, 1.0, 1.0));

        let mut scene = Scene::new();
        let g1 = scene.add_object(Shape::group().with_transform(t1).unwrap());
        let g2 = scene.insert(Shape::group().with_transform(t2).unwrap());
        let g3 = scene.insert(Shape::group().with_transform(t3).unwrap());
        let s = scene.insert(Shape::sphere().with_transform(t4).unwrap());
        scene.add_child(g3, s).unwrap();
        scene.add_child(g2, g3).unwrap();
        scene.add_child(g1, g2).unwrap();

        let composed = t1.then(&t2).then(&t3).then(&t4);
        let local = Vec3::new(1.0, 2.0, 3.0).normalize();
        let world_point = composed.apply_point(&Point3::from(local));

        let back = scene.world_to_object(s, &world_point);
        assert_relative_eq!(back, Point3::from(local), epsilon = 1e-9);

        let expected = composed
            .inverse()
            .unwrap()
            .transpose()
            .apply_vec(&local)
            .normalize();
        let n = scene.normal_at(s, &world_point, None);
        assert_relative_eq!(n, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_copies_subtree() {
        let mut scene = Scene::new();
        let g = scene.add_object(
            Shape::group()
                .with_transform(Transform::translation(0.0, 1.0, 0.0))
                .unwrap(),
        );
        let a = scene.insert(Shape::sphere());
        let b = scene.insert(Shape::cube());
        scene.add_child(g, a).unwrap();
        scene.add_child(g, b).unwrap();

        let copy = scene.duplicate(g).unwrap();
        assert_ne!(copy, g);
        assert_eq!(scene.parent(copy), None);
        assert_eq!(*scene[copy].transform(), *scene[g].transform());
        let kids = scene.children(copy).to_vec();
        assert_eq!(kids.len(), 2);
        assert!(kids.iter().all(|k| *k != a && *k != b));
        assert!(kids.iter().all(|&k| scene.parent(k) == Some(copy)));
        assert_eq!(scene.len(), 6);
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let mut scene = Scene::new();
        let s = scene.add_object(Shape::sphere());
        scene.remove(s).unwrap();
        assert_eq!(
            scene.set_transform(s, Transform::identity()),
            Err(TraceError::UnknownShape(s))
        );
        assert!(scene.intersect(s, &z_ray(0.0, 0.0)).is_empty());
    }
}
