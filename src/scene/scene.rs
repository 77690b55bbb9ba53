use std::cell::OnceCell;

use glam::{Mat4, Vec3};

use super::environment::Environment;
use super::node::{PointLight, SceneNode};
use crate::frustum::Frustum;
use crate::geometry::BoundingSphere;

/// What a top-level subtree represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Ground,
    Pattern,
    Monument,
    Cathedral,
    BuildingRow,
    Courtyard,
    StreetLamp,
    Tree,
}

impl StructureKind {
    /// Structures whose shadows survive reduced-quality pruning.
    pub fn keeps_shadows(self) -> bool {
        matches!(self, StructureKind::Monument)
    }
}

/// A frozen top-level subtree in the static pool.
#[derive(Debug)]
pub struct Structure {
    kind: StructureKind,
    node: SceneNode,
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn node(&self) -> &SceneNode {
        &self.node
    }
}

/// A top-level subtree whose visibility is re-evaluated every rendered frame.
#[derive(Debug)]
pub struct DynamicEntry {
    kind: StructureKind,
    node: SceneNode,
    bounds: OnceCell<Option<BoundingSphere>>,
}

impl DynamicEntry {
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn node(&self) -> &SceneNode {
        &self.node
    }

    pub fn is_visible(&self) -> bool {
        self.node.visible
    }

    /// World-space bounds, computed on first use and then reused.
    pub fn bounds(&self) -> Option<BoundingSphere> {
        *self.bounds.get_or_init(|| self.node.bounding_sphere())
    }

    pub fn bounds_computed(&self) -> bool {
        self.bounds.get().is_some()
    }
}

/// The assembled square: a static pool, a dynamic pool, and its lighting.
///
/// Static structures are frozen on insertion and only ever handed out by
/// shared reference, so their cached world matrices stay valid for the
/// lifetime of the scene. Dynamic entries keep their transforms too; only
/// their visibility changes, during [`Scene::cull`].
#[derive(Debug, Default)]
pub struct Scene {
    statics: Vec<Structure>,
    dynamics: Vec<DynamicEntry>,
    environment: Environment,
}

impl Scene {
    pub fn new(environment: Environment) -> Self {
        Self {
            statics: Vec::new(),
            dynamics: Vec::new(),
            environment,
        }
    }

    /// Freezes a fully built subtree into the static pool.
    pub fn add_static(&mut self, kind: StructureKind, node: SceneNode) {
        self.statics.push(Structure {
            kind,
            node: node.freeze(),
        });
    }

    /// Adds a subtree that is culled against the camera every rendered frame.
    pub fn add_dynamic(&mut self, kind: StructureKind, mut node: SceneNode) {
        node.update_world(&Mat4::IDENTITY);
        self.dynamics.push(DynamicEntry {
            kind,
            node,
            bounds: OnceCell::new(),
        });
    }

    pub fn statics(&self) -> &[Structure] {
        &self.statics
    }

    pub fn dynamics(&self) -> &[DynamicEntry] {
        &self.dynamics
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Every top-level structure in both pools.
    pub fn structures(&self) -> impl Iterator<Item = (StructureKind, &SceneNode)> {
        self.statics
            .iter()
            .map(|s| (s.kind, &s.node))
            .chain(self.dynamics.iter().map(|d| (d.kind, &d.node)))
    }

    pub fn node_count(&self) -> usize {
        self.structures().map(|(_, node)| node.node_count()).sum()
    }

    /// Sets the visibility of each dynamic entry from the frustum.
    ///
    /// Returns how many entries are visible. Entries without any mesh are
    /// always kept.
    pub fn cull(&mut self, frustum: &Frustum) -> usize {
        let mut visible = 0;
        for entry in &mut self.dynamics {
            let inside = entry
                .bounds()
                .is_none_or(|sphere| frustum.intersects_sphere(&sphere));
            entry.node.visible = inside;
            if inside {
                visible += 1;
            }
        }
        visible
    }

    /// Calls `f` for every drawable node whose ancestors are all visible.
    pub fn for_each_drawable<'a>(&'a self, mut f: impl FnMut(&'a SceneNode)) {
        fn walk<'a>(node: &'a SceneNode, f: &mut impl FnMut(&'a SceneNode)) {
            if !node.visible {
                return;
            }
            if node.geometry.is_some() {
                f(node);
            }
            for child in node.children() {
                walk(child, f);
            }
        }

        for (_, node) in self.structures() {
            walk(node, &mut f);
        }
    }

    /// World-space point lights of every visible subtree.
    pub fn point_lights(&self) -> Vec<(Vec3, PointLight)> {
        let mut lights = Vec::new();
        for (_, root) in self.structures() {
            if !root.visible {
                continue;
            }
            root.visit(&mut |node| {
                if let Some(light) = node.light {
                    lights.push((node.world_position(), light));
                }
            });
        }
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryDescriptor;
    use crate::material::{Color, Material};

    fn ball_at(x: f32, z: f32) -> SceneNode {
        let material = Material::standard(Color::WHITE).shared();
        SceneNode::group("ball").at(x, 0.0, z).with_child(
            SceneNode::mesh("ball_mesh", GeometryDescriptor::sphere(1.0, 8, 8), &material)
                .unwrap(),
        )
    }

    fn frustum_down_negative_z() -> Frustum {
        let proj = Mat4::perspective_rh(75f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn cull_hides_only_dynamic_entries_outside() {
        let mut scene = Scene::default();
        scene.add_static(StructureKind::Monument, ball_at(0.0, 50.0));
        scene.add_dynamic(StructureKind::Tree, ball_at(0.0, -10.0));
        scene.add_dynamic(StructureKind::Tree, ball_at(0.0, 10.0));

        let visible = scene.cull(&frustum_down_negative_z());

        assert_eq!(visible, 1);
        assert!(scene.dynamics()[0].is_visible());
        assert!(!scene.dynamics()[1].is_visible());
        // Static structures are never culled.
        assert!(scene.statics()[0].node().visible);
    }

    #[test]
    fn bounds_are_memoized_on_first_cull() {
        let mut scene = Scene::default();
        scene.add_dynamic(StructureKind::Tree, ball_at(3.0, -10.0));
        assert!(!scene.dynamics()[0].bounds_computed());

        scene.cull(&frustum_down_negative_z());
        assert!(scene.dynamics()[0].bounds_computed());
        let bounds = scene.dynamics()[0].bounds().unwrap();
        assert!(bounds.center.abs_diff_eq(Vec3::new(3.0, 0.0, -10.0), 1e-4));
    }

    #[test]
    fn drawables_skip_hidden_subtrees() {
        let mut scene = Scene::default();
        scene.add_dynamic(StructureKind::Tree, ball_at(0.0, -10.0));
        scene.add_dynamic(StructureKind::Tree, ball_at(0.0, 10.0));
        scene.cull(&frustum_down_negative_z());

        let mut drawn = 0;
        scene.for_each_drawable(|_| drawn += 1);
        assert_eq!(drawn, 1);
    }

    #[test]
    fn static_insertion_freezes_subtree() {
        let mut scene = Scene::default();
        scene.add_static(StructureKind::Cathedral, ball_at(0.0, -40.0));
        let root = scene.statics()[0].node();
        assert!(root.is_static());
        assert!(root.children()[0].is_static());
        assert!(
            root.children()[0]
                .world_position()
                .abs_diff_eq(Vec3::new(0.0, 0.0, -40.0), 1e-6)
        );
    }
}
