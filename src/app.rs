//! Window host: owns the winit event loop and forwards events to a
//! [`Runtime`], lending it the [`ScenePass`] as its renderer.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use crate::config::PiazzaConfig;
use crate::gpu::GpuContext;
use crate::locomotion::Overlay;
use crate::quality::DeviceCapabilities;
use crate::runtime::Runtime;
use crate::scene_pass::ScenePass;

const INSTRUCTIONS: &str = "click to explore, WASD or arrows to walk, Esc to release";

/// Shows the instructions in the window title while the pointer is free.
struct TitleOverlay {
    window: Arc<Window>,
    title: String,
}

impl Overlay for TitleOverlay {
    fn set_visible(&mut self, visible: bool) {
        if visible {
            self.window
                .set_title(&format!("{} | {INSTRUCTIONS}", self.title));
        } else {
            self.window.set_title(&self.title);
        }
    }
}

/// Opens the window and runs until it is closed.
///
/// ```no_run
/// use piazza::{PiazzaConfig, run};
///
/// fn main() -> anyhow::Result<()> {
///     run(PiazzaConfig::default())
/// }
/// ```
pub fn run(config: PiazzaConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = PiazzaApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        PiazzaApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum PiazzaApp {
    Pending {
        config: PiazzaConfig,
    },
    Running {
        window: Arc<Window>,
        pass: ScenePass,
        runtime: Runtime,
        last_frame: Instant,
    },
    Failed(anyhow::Error),
}

impl PiazzaApp {
    fn start(event_loop: &ActiveEventLoop, config: &PiazzaConfig) -> anyhow::Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let gpu = GpuContext::new(window.clone()).context("failed to initialise the GPU")?;
        let scale_factor = window.scale_factor() as f32;
        let caps = DeviceCapabilities::from_adapter_info(gpu.adapter_info(), scale_factor);

        let mut skips = config.scene.skip_source();
        let overlay = TitleOverlay {
            window: window.clone(),
            title: config.window.title.clone(),
        };
        let mut runtime = Runtime::new(config, &caps, &mut skips)
            .context("failed to assemble the square")?
            .with_overlay(Box::new(overlay));
        log::info!("square assembled with {} nodes", runtime.scene().node_count());

        let mut pass = ScenePass::new(gpu, runtime.quality());
        pass.gpu_mut()
            .set_render_scale(runtime.quality().pixel_ratio / scale_factor);
        let size = window.inner_size();
        runtime.resize(size.width, size.height, &mut pass);
        window.request_redraw();

        Ok(PiazzaApp::Running {
            window,
            pass,
            runtime,
            last_frame: Instant::now(),
        })
    }
}

fn grab_pointer(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(err) => {
            log::warn!("pointer lock refused: {err}");
            false
        }
    }
}

fn release_pointer(window: &Window) {
    if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("failed to release pointer: {err}");
    }
    window.set_cursor_visible(true);
}

impl ApplicationHandler for PiazzaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let PiazzaApp::Pending { config } = self else {
            return;
        };
        match Self::start(event_loop, config) {
            Ok(running) => *self = running,
            Err(err) => {
                log::error!("{err:#}");
                *self = PiazzaApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let PiazzaApp::Running {
            window,
            pass,
            runtime,
            last_frame,
        } = self
        else {
            return;
        };

        if runtime.is_locked() {
            runtime.input_mut().handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                runtime.resize(size.width, size.height, pass);
                window.request_redraw();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !runtime.is_locked() => {
                if grab_pointer(window) {
                    runtime.lock_acquired();
                    *last_frame = Instant::now();
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed
                    && key.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                if runtime.is_locked() {
                    release_pointer(window);
                    runtime.lock_released();
                }
            }
            WindowEvent::Focused(false) => {
                if runtime.is_locked() {
                    release_pointer(window);
                    runtime.lock_released();
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                runtime.frame(dt, pass);
                if pass.take_frame_lost() {
                    runtime.request_redraw();
                }

                // Idle and unlocked: sleep until the next window event.
                if runtime.is_locked() || runtime.scheduler().is_dirty() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        let PiazzaApp::Running { runtime, .. } = self else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            runtime.pointer_motion(delta.0, delta.1);
        }
    }
}
