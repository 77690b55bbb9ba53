//! # Piazza
//!
//! **A procedurally assembled city square you can walk around in.**
//!
//! Parametric generators compose primitive shapes into a cathedral, an
//! elephant-and-obelisk monument, palazzi, arcades, street lamps and trees.
//! [`SceneAssembler`] places them on a paved disc, [`RenderScheduler`] draws
//! only when something changed, and [`Locomotion`](locomotion::Locomotion)
//! turns held keys into damped first-person movement.
//!
//! ## Quick Start
//!
//! ```no_run
//! use piazza::{PiazzaConfig, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = PiazzaConfig::discover(None)?;
//!     run(config)
//! }
//! ```
//!
//! ## Headless use
//!
//! Everything above the GPU is plain data, so a scene can be assembled and
//! inspected without a window:
//!
//! ```
//! use piazza::generators::RandomSkips;
//! use piazza::quality::{CapabilityTier, QualitySettings};
//! use piazza::{SceneAssembler, SceneSettings, StructureKind};
//!
//! let quality = QualitySettings::for_tier(CapabilityTier::Standard, 1.0);
//! let scene = SceneAssembler::new(SceneSettings::default())
//!     .build(&quality, &mut RandomSkips::seeded(1))?;
//!
//! assert_eq!(scene.dynamics().len(), 14);
//! assert!(scene.structures().any(|(kind, _)| kind == StructureKind::Cathedral));
//! # Ok::<(), piazza::SceneError>(())
//! ```

mod app;
pub mod assembler;
pub mod camera;
pub mod config;
pub mod error;
pub mod frustum;
pub mod generators;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod locomotion;
pub mod material;
pub mod mesh;
pub mod quality;
pub mod runtime;
pub mod scene;
pub mod scene_pass;
pub mod scheduler;

pub use app::run;
pub use assembler::{SceneAssembler, SceneSettings};
pub use camera::Camera;
pub use config::PiazzaConfig;
pub use error::{ConfigError, GpuError, Result, SceneError};
pub use geometry::{BoundingSphere, GeometryDescriptor, GeometryKey, RawGeometry};
pub use gpu::GpuContext;
pub use input::{Input, MovementIntent};
pub use locomotion::{Locomotion, LocomotionConfig};
pub use material::{Color, DepthOffset, Material};
pub use mesh::{Mesh, Transform, Vertex3d};
pub use quality::{CapabilityTier, QualitySettings};
pub use runtime::Runtime;
pub use scene::{PointLight, Scene, SceneNode, StructureKind};
pub use scene_pass::ScenePass;
pub use scheduler::{RenderScheduler, RenderState, Renderer};
