//! Window and event-loop plumbing.
//!
//! Owns the winit event loop, translates window events into engine input,
//! and drives the scene once per redraw with a wall-clock delta. Physical
//! pointer coordinates are converted into virtual canvas space before any
//! dispatch sees them.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorIcon, Window, WindowId},
};

use crate::backend::WgpuBackend;
use crate::batch::BatchRenderer;
use crate::bus::{EventBus, Notification};
use crate::input::{physical_to_virtual, InputState};
use crate::layout::CanvasSize;
use crate::scene::Scene;
use crate::scroll::WHEEL_STEP;
use crate::text::FontLibrary;
use crate::utils::Position;
use crate::widget::CursorKind;

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Virtual canvas height the projection holds constant across resizes.
    pub virtual_height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "iridium".to_string(),
            width: 800,
            height: 600,
            virtual_height: 600,
        }
    }
}

/// What the per-frame callback sees.
pub struct FrameContext {
    pub pressed_keys: Vec<String>,
    pub pointer: Option<Position>,
    pub delta_time: f32,
}

type FrameCallback = Box<dyn FnMut(&mut Scene, &FrameContext)>;

pub struct UiApp {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    renderer: Option<BatchRenderer<WgpuBackend<'static>>>,
    scene: Scene,
    fonts: FontLibrary,
    bus: EventBus,
    input: InputState,
    // staged between redraws
    staged_keys: Vec<String>,
    staged_pointer: Option<Position>,
    staged_lmb: bool,
    staged_wheel: f32,
    last_frame: Instant,
    frame_callback: FrameCallback,
}

impl UiApp {
    pub fn new<F>(config: WindowConfig, frame_callback: F) -> Self
    where
        F: FnMut(&mut Scene, &FrameContext) + 'static,
    {
        let canvas = CanvasSize::new(
            (config.virtual_height as f32 * config.width as f32 / config.height as f32) as i32,
            config.virtual_height,
        );
        Self {
            config,
            window: None,
            renderer: None,
            scene: Scene::new(canvas),
            fonts: FontLibrary::new(),
            bus: EventBus::new(),
            input: InputState::default(),
            staged_keys: Vec::new(),
            staged_pointer: None,
            staged_lmb: false,
            staged_wheel: 0.0,
            last_frame: Instant::now(),
            frame_callback: Box::new(frame_callback),
        }
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn renderer_mut(&mut self) -> Option<&mut BatchRenderer<WgpuBackend<'static>>> {
        self.renderer.as_mut()
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn scale_factor(&self) -> f32 {
        self.renderer
            .as_ref()
            .map(|r| r.scale_factor())
            .unwrap_or(1.0)
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let keys = std::mem::take(&mut self.staged_keys);
        self.input.update_from_keys(keys.clone());
        self.input.update_pointer(self.staged_pointer, self.staged_lmb);
        self.input.set_wheel(std::mem::take(&mut self.staged_wheel));

        self.scene.apply_input(&self.input);

        let ctx = FrameContext {
            pressed_keys: keys,
            pointer: self.input.pointer,
            delta_time,
        };
        (self.frame_callback)(&mut self.scene, &ctx);

        if let Some(renderer) = self.renderer.as_mut() {
            self.scene.frame(delta_time, renderer, &self.fonts);
        }
        if let (Some(kind), Some(window)) = (self.scene.cursor_update(), self.window.as_ref()) {
            window.set_cursor(cursor_icon(kind));
        }
        self.input.end_frame();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn cursor_icon(kind: CursorKind) -> CursorIcon {
    match kind {
        CursorKind::Arrow => CursorIcon::Default,
        CursorKind::Hand => CursorIcon::Pointer,
        CursorKind::Text => CursorIcon::Text,
        CursorKind::Move => CursorIcon::Move,
    }
}

impl ApplicationHandler<()> for UiApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));

        if let Ok(window) = event_loop.create_window(window_attributes) {
            let window = Arc::new(window);
            let size = window.inner_size();
            let surface = instance
                .create_surface(window.clone())
                .expect("failed to create surface");
            let backend = WgpuBackend::new(surface, &instance, size)
                .expect("failed to initialize graphics backend");
            let renderer = BatchRenderer::new(backend, self.config.virtual_height, size);
            self.scene.set_canvas(renderer.canvas_size());
            self.renderer = Some(renderer);
            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    self.staged_keys.push(format!("{:?}", event.logical_key));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.staged_pointer = Some(physical_to_virtual(
                    position.x,
                    position.y,
                    self.scale_factor(),
                ));
            }
            WindowEvent::CursorLeft { .. } => {
                self.staged_pointer = None;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.staged_lmb = state == ElementState::Pressed;
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.staged_wheel += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / WHEEL_STEP,
                };
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                    self.scene.set_canvas(renderer.canvas_size());
                }
                self.bus.publish(&Notification::Resized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            _ => (),
        }
    }
}

/// Convenience entry point matching the common case: build the app, hand
/// the scene to a per-frame callback, run until the window closes.
pub fn run_app<F>(config: WindowConfig, frame_callback: F) -> Result<()>
where
    F: FnMut(&mut Scene, &FrameContext) + 'static,
{
    UiApp::new(config, frame_callback).run()
}
