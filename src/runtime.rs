//! The per-frame driver that ties the scene, camera, locomotion and
//! scheduler together. It owns every piece of mutable state; the window
//! host only forwards events and lends a [`Renderer`].

use crate::assembler::SceneAssembler;
use crate::camera::Camera;
use crate::config::PiazzaConfig;
use crate::error::Result;
use crate::generators::SkipSource;
use crate::input::{Input, MovementIntent};
use crate::locomotion::{InputLock, Locomotion, Overlay};
use crate::quality::{DeviceCapabilities, QualitySettings};
use crate::scene::Scene;
use crate::scheduler::{RenderScheduler, Renderer};

pub struct Runtime {
    scene: Scene,
    camera: Camera,
    locomotion: Locomotion,
    scheduler: RenderScheduler,
    quality: QualitySettings,
    lock: InputLock,
    overlay: Option<Box<dyn Overlay>>,
    input: Input,
}

impl Runtime {
    /// Picks the quality tier, assembles the square and places the camera.
    pub fn new(
        config: &PiazzaConfig,
        caps: &DeviceCapabilities,
        skips: &mut dyn SkipSource,
    ) -> Result<Self> {
        let quality = config.quality.resolve(caps);
        log::info!(
            "quality tier {:?}: pixel ratio {}, {}px {:?} shadows",
            quality.tier,
            quality.pixel_ratio,
            quality.shadow_map_size,
            quality.shadow_filter,
        );

        let scene = SceneAssembler::new(config.scene.settings()).build(&quality, skips)?;
        let aspect = config.window.width as f32 / config.window.height as f32;

        Ok(Self {
            scene,
            camera: Camera::piazza_start(aspect),
            locomotion: Locomotion::new(config.locomotion),
            scheduler: RenderScheduler::new(),
            quality,
            lock: InputLock::default(),
            overlay: None,
            input: Input::new(),
        })
    }

    /// Attaches the instructions overlay, shown while the pointer is free.
    pub fn with_overlay(mut self, mut overlay: Box<dyn Overlay>) -> Self {
        overlay.set_visible(!self.lock.is_locked());
        self.overlay = Some(overlay);
        self
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Raw pointer motion; only turns the camera while locked.
    pub fn pointer_motion(&mut self, dx: f64, dy: f64) {
        if self.lock.is_locked() {
            self.input.add_mouse_motion(dx, dy);
        }
    }

    pub fn lock_acquired(&mut self) {
        if self.lock.acquire() {
            log::debug!("pointer locked");
            if let Some(overlay) = &mut self.overlay {
                overlay.set_visible(false);
            }
        }
    }

    /// Stops sampling movement; the frame loop keeps running.
    pub fn lock_released(&mut self) {
        if self.lock.release() {
            log::debug!("pointer released");
            self.input.release_all();
            self.locomotion.set_intent(MovementIntent::NONE);
            if let Some(overlay) = &mut self.overlay {
                overlay.set_visible(true);
            }
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Updates the aspect ratio and schedules a redraw. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32, renderer: &mut dyn Renderer) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32 / height as f32);
        renderer.resize(width, height);
        self.scheduler.mark_dirty();
    }

    /// Runs one display-refresh tick. Returns whether a frame was drawn.
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> bool {
        if self.lock.is_locked() {
            let delta = self.input.take_mouse_delta();
            if self.locomotion.look(&mut self.camera, delta.x, delta.y) {
                self.scheduler.mark_dirty();
            }

            self.locomotion.set_intent(self.input.intent());
            if self.locomotion.tick(&mut self.camera, dt) {
                self.scheduler.mark_dirty();
            }
        }

        self.scheduler.poll(&mut self.scene, &self.camera, renderer)
    }

    /// Forces a redraw on the next tick, e.g. after the surface was lost.
    pub fn request_redraw(&mut self) {
        self.scheduler.mark_dirty();
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn quality(&self) -> &QualitySettings {
        &self.quality
    }
}
