use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::geometry::{BoundingSphere, GeometryDescriptor};
use crate::material::{Color, Material};
use crate::mesh::Transform;

/// An omnidirectional light attached to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Distance at which the light's contribution reaches zero.
    pub range: f32,
}

/// A node in the scene tree.
///
/// A node owns its children outright. Its [`Transform`] is relative to its
/// parent; the world matrix is cached once the node is placed in a
/// [`Scene`](super::Scene), which is also where it becomes static.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Part name, used for lookups and debugging.
    pub label: &'static str,
    pub transform: Transform,
    pub geometry: Option<GeometryDescriptor>,
    pub material: Option<Rc<Material>>,
    pub light: Option<PointLight>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Draw priority; higher values draw later within the same pass.
    pub render_order: i32,
    pub visible: bool,
    children: Vec<SceneNode>,
    is_static: bool,
    world: Mat4,
}

impl SceneNode {
    /// An empty grouping node.
    pub fn group(label: &'static str) -> Self {
        Self {
            label,
            transform: Transform::new(),
            geometry: None,
            material: None,
            light: None,
            cast_shadow: false,
            receive_shadow: false,
            render_order: 0,
            visible: true,
            children: Vec::new(),
            is_static: false,
            world: Mat4::IDENTITY,
        }
    }

    /// A drawable node. Fails if the geometry has degenerate dimensions.
    pub fn mesh(
        label: &'static str,
        geometry: GeometryDescriptor,
        material: &Rc<Material>,
    ) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry: Some(geometry),
            material: Some(Rc::clone(material)),
            ..Self::group(label)
        })
    }

    /// A node carrying only a point light.
    pub fn point_light(label: &'static str, light: PointLight) -> Self {
        Self {
            light: Some(light),
            ..Self::group(label)
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    /// Rotation in radians, XYZ order.
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.euler(x, y, z);
        self
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vec3::new(x, y, z);
        self
    }

    pub fn shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// True once the node has been frozen into a scene's static pool.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Cached world matrix. Identity until the node is added to a scene.
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Depth-first, parent before children.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut SceneNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// First node in this subtree with the given label.
    pub fn find(&self, label: &str) -> Option<&SceneNode> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(label))
    }

    /// Every node in this subtree with the given label.
    pub fn find_all(&self, label: &str) -> Vec<&SceneNode> {
        let mut found = Vec::new();
        self.visit(&mut |node| {
            if node.label == label {
                found.push(node);
            }
        });
        found
    }

    /// Recomputes cached world matrices for this subtree.
    pub(crate) fn update_world(&mut self, parent: &Mat4) {
        self.world = *parent * self.transform.matrix();
        let world = self.world;
        for child in &mut self.children {
            child.update_world(&world);
        }
    }

    /// Caches world matrices and marks the whole subtree static.
    ///
    /// Takes the node by value: once frozen, the only way to reach it again
    /// is through the scene's shared references.
    pub(crate) fn freeze(mut self) -> Self {
        self.update_world(&Mat4::IDENTITY);
        self.visit_mut(&mut |node| node.is_static = true);
        self
    }

    /// World-space sphere enclosing every mesh in this subtree.
    ///
    /// Uses the cached world matrices, so it is only meaningful after the
    /// node has been placed in a scene.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let mut bounds: Option<BoundingSphere> = None;
        self.visit(&mut |node| {
            if let Some(geometry) = &node.geometry {
                let local = geometry.tessellate().bounding_sphere();
                let world = local.transformed(&node.world);
                bounds = Some(match bounds {
                    Some(acc) => acc.merge(&world),
                    None => world,
                });
            }
        });
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Rc<Material> {
        Material::standard(Color::hex(0x808080)).shared()
    }

    #[test]
    fn mesh_rejects_degenerate_geometry() {
        let result = SceneNode::mesh("slab", GeometryDescriptor::cuboid(1.0, 0.0, 1.0), &grey());
        assert!(result.is_err());
    }

    #[test]
    fn world_is_product_of_ancestors() {
        let material = grey();
        let leaf = SceneNode::mesh("leaf", GeometryDescriptor::sphere(1.0, 8, 8), &material)
            .unwrap()
            .at(0.0, 1.0, 0.0);
        let mid = SceneNode::group("mid").at(2.0, 0.0, 0.0).with_child(leaf);
        let root = SceneNode::group("root")
            .at(0.0, 0.0, -5.0)
            .with_child(mid)
            .freeze();

        let leaf = root.find("leaf").unwrap();
        assert!(
            leaf.world_position()
                .abs_diff_eq(Vec3::new(2.0, 1.0, -5.0), 1e-6)
        );
    }

    #[test]
    fn freeze_marks_every_descendant() {
        let root = SceneNode::group("root")
            .with_child(SceneNode::group("a").with_child(SceneNode::group("b")))
            .freeze();
        let mut all_static = true;
        root.visit(&mut |node| all_static &= node.is_static());
        assert!(all_static);
        assert_eq!(root.node_count(), 3);
    }

    #[test]
    fn bounding_sphere_follows_scale() {
        let material = grey();
        let ball = SceneNode::mesh("ball", GeometryDescriptor::sphere(1.0, 8, 8), &material)
            .unwrap()
            .scaled(1.0, 1.0, 3.0)
            .at(10.0, 0.0, 0.0);
        let root = SceneNode::group("root").with_child(ball).freeze();
        let sphere = root.bounding_sphere().unwrap();
        assert!(sphere.center.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
        assert!((sphere.radius - 3.0).abs() < 1e-4);
    }

    #[test]
    fn groups_without_meshes_have_no_bounds() {
        let root = SceneNode::group("empty").freeze();
        assert!(root.bounding_sphere().is_none());
    }
}
