//! The scene graph: nodes, the two node pools, and global lighting.
//!
//! # Overview
//!
//! A [`SceneNode`] is a tree of parts. Each node has a local [`Transform`],
//! an optional [`GeometryDescriptor`] and shared [`Material`], and an optional
//! [`PointLight`]. Generators return whole subtrees; the assembler hands each
//! subtree to a [`Scene`] as one top-level structure.
//!
//! The scene keeps two pools:
//!
//! - **Static** structures (ground, monument, cathedral, building rows,
//!   courtyards) are frozen on insertion. Their world matrices are computed
//!   once, they are never culled, and they cannot be reached mutably again.
//! - **Dynamic** structures (street lamps and trees) are culled against the
//!   camera frustum on every rendered frame, using a bounding sphere that is
//!   computed lazily the first time it is needed.
//!
//! # Example
//!
//! ```
//! use piazza::{Color, GeometryDescriptor, Material, Scene, SceneNode, StructureKind};
//!
//! let stone = Material::standard(Color::hex(0xd5d0c8)).roughness(0.6).shared();
//! let step = SceneNode::mesh("step", GeometryDescriptor::cuboid(35.0, 0.8, 1.5), &stone)?
//!     .at(0.0, 0.4, 11.0);
//!
//! let mut scene = Scene::default();
//! scene.add_static(StructureKind::Cathedral, SceneNode::group("stairs").with_child(step));
//! assert!(scene.statics()[0].node().is_static());
//! # Ok::<(), piazza::SceneError>(())
//! ```
//!
//! [`Transform`]: crate::Transform
//! [`GeometryDescriptor`]: crate::GeometryDescriptor
//! [`Material`]: crate::Material

mod environment;
mod node;
#[allow(clippy::module_inception)]
mod scene;

pub use environment::{DirectionalLight, Environment, HemisphereLight, ShadowCamera};
pub use node::{PointLight, SceneNode};
pub use scene::{DynamicEntry, Scene, Structure, StructureKind};
