//! Render-on-demand scheduling.
//!
//! The square never animates by itself, so a frame is only worth drawing
//! after something moved the camera or changed the surface. Anything that
//! does calls [`RenderScheduler::mark_dirty`]; the per-tick
//! [`poll`](RenderScheduler::poll) then culls the dynamic pool, draws once,
//! and goes back to idle.

use crate::camera::Camera;
use crate::frustum::Frustum;
use crate::scene::Scene;

/// Draws a scene. Implemented by the GPU pass and by test fakes.
pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &Camera);

    /// New framebuffer size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Dirty,
}

#[derive(Debug)]
pub struct RenderScheduler {
    state: RenderState,
    frames_rendered: u64,
    last_visible: usize,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScheduler {
    /// Starts dirty so the first tick draws.
    pub fn new() -> Self {
        Self {
            state: RenderState::Dirty,
            frames_rendered: 0,
            last_visible: 0,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.state = RenderState::Dirty;
    }

    pub fn is_dirty(&self) -> bool {
        self.state == RenderState::Dirty
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Dynamic entries that passed the last culling pass.
    pub fn last_visible(&self) -> usize {
        self.last_visible
    }

    /// Draws once if dirty. Returns whether a frame was rendered.
    pub fn poll(&mut self, scene: &mut Scene, camera: &Camera, renderer: &mut dyn Renderer) -> bool {
        if self.state == RenderState::Idle {
            return false;
        }

        let frustum = Frustum::from_view_projection(&camera.view_projection());
        self.last_visible = scene.cull(&frustum);
        renderer.render(scene, camera);

        self.frames_rendered += 1;
        self.state = RenderState::Idle;
        log::trace!(
            "frame {} drawn with {}/{} dynamic structures visible",
            self.frames_rendered,
            self.last_visible,
            scene.dynamics().len()
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tree;
    use crate::scene::{Environment, StructureKind};

    #[derive(Default)]
    struct Counting {
        renders: usize,
    }

    impl Renderer for Counting {
        fn render(&mut self, _scene: &Scene, _camera: &Camera) {
            self.renders += 1;
        }

        fn resize(&mut self, _width: u32, _height: u32) {}
    }

    fn scene_with_trees() -> Scene {
        let mut scene = Scene::new(Environment::default());
        scene.add_dynamic(StructureKind::Tree, tree(0.0, -20.0).unwrap());
        scene.add_dynamic(StructureKind::Tree, tree(0.0, 40.0).unwrap());
        scene
    }

    #[test]
    fn first_poll_draws_then_idles() {
        let mut scheduler = RenderScheduler::new();
        let mut scene = scene_with_trees();
        let mut renderer = Counting::default();
        let camera = Camera::new().at(0.0, 2.0, 0.0).with_aspect(1.0);

        assert!(scheduler.poll(&mut scene, &camera, &mut renderer));
        for _ in 0..10 {
            assert!(!scheduler.poll(&mut scene, &camera, &mut renderer));
        }
        assert_eq!(renderer.renders, 1);
        assert_eq!(scheduler.state(), RenderState::Idle);
    }

    #[test]
    fn culling_hides_structures_behind_the_camera() {
        let mut scheduler = RenderScheduler::new();
        let mut scene = scene_with_trees();
        let camera = Camera::new().at(0.0, 2.0, 0.0).with_aspect(1.0);

        scheduler.poll(&mut scene, &camera, &mut Counting::default());

        let visible: Vec<bool> = scene.dynamics().iter().map(|d| d.is_visible()).collect();
        assert_eq!(visible, [true, false]);
        assert_eq!(scheduler.last_visible(), 1);
        assert!(scene.dynamics().iter().all(|d| d.bounds_computed()));
    }
}
