use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Mat4, Vec2, Vec3};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::camera::NO_POINTER;
use crate::config::WindowConfig;
use crate::core::input::{translate_key_event, Key, KeyState};
use crate::core::{ActiveKeys, Clock, GpuContext, Overlay, VirtualPointer};
use crate::math::projection::SurfaceTransform;
use crate::traits::{Application, FrameInput, RenderTarget};

/// Where keyboard and pointer input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Cursor grabbed, movement keys and raw pointer motion drive the application
    Game,
    /// Cursor free for the GUI overlay
    Ui,
}

/// Window and GPU state shared with the application
pub struct EngineContext {
    window: Arc<Window>,
    gpu: GpuContext,
    vsync: bool,
    input_mode: InputMode,
    applied_mode: Option<InputMode>,
    quit_requested: bool,
    surface_transform: SurfaceTransform,
}

impl EngineContext {
    fn new(window: Arc<Window>, gpu: GpuContext) -> Self {
        let vsync = gpu.vsync();
        Self {
            window,
            gpu,
            vsync,
            input_mode: InputMode::Game,
            applied_mode: None,
            quit_requested: false,
            surface_transform: SurfaceTransform::Identity,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.gpu.aspect_ratio()
    }

    pub fn backend(&self) -> wgpu::Backend {
        self.gpu.backend()
    }

    pub fn adapter_name(&self) -> &str {
        self.gpu.adapter_name()
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Requested vsync state; applied to the swap chain after the frame
    pub fn vsync_mut(&mut self) -> &mut bool {
        &mut self.vsync
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Takes effect after the current frame
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Rotation the compositor expects the application to apply. wgpu
    /// surfaces always present in the window's orientation.
    pub fn surface_transform(&self) -> SurfaceTransform {
        self.surface_transform
    }

    pub fn surface_pretransform_matrix(&self, view_axis: Vec3) -> Mat4 {
        self.surface_transform.pretransform_matrix(view_axis)
    }

    pub fn uses_gl_depth_range(&self) -> bool {
        self.gpu.uses_gl_depth_range()
    }

    /// Apply requested vsync and input mode. Returns true if the input mode
    /// changed.
    fn sync(&mut self) -> bool {
        self.gpu.set_vsync(self.vsync);

        if self.applied_mode == Some(self.input_mode) {
            return false;
        }
        match self.input_mode {
            InputMode::Game => {
                let grabbed = self
                    .window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grabbed {
                    log::warn!("Could not grab cursor: {}", e);
                }
                self.window.set_cursor_visible(false);
            }
            InputMode::Ui => {
                if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                    log::warn!("Could not release cursor: {}", e);
                }
                self.window.set_cursor_visible(true);
            }
        }
        log::debug!("Input mode {:?}", self.input_mode);
        self.applied_mode = Some(self.input_mode);
        true
    }
}

struct EngineState {
    ctx: EngineContext,
    overlay: Overlay,
    clock: Clock,
    keys: ActiveKeys,
    pointer: VirtualPointer,
    focused: bool,
}

impl EngineState {
    fn redraw<A: Application>(&mut self, app: &mut A, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        let time = self.clock.elapsed();
        let held_keys: &[(Key, KeyState)] = match self.ctx.input_mode {
            InputMode::Game => self.keys.held(),
            InputMode::Ui => &[],
        };
        let frame = FrameInput {
            delta,
            time,
            held_keys,
        };

        app.update(&mut self.ctx, &frame);

        let output = match self.ctx.gpu.acquire() {
            Ok(output) => Some(output),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.ctx.gpu.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {:?}", e);
                None
            }
        };

        if let Some(output) = output {
            let view = output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let mut encoder =
                self.ctx
                    .device()
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Frame Encoder"),
                    });

            let target = RenderTarget {
                color: &view,
                depth: self.ctx.gpu.depth_view(),
            };
            app.draw(&self.ctx, &mut encoder, &target);

            let window = self.ctx.window.clone();
            let ui_output = self
                .overlay
                .run(&window, |ui| app.overlay(ui, &mut self.ctx, &frame));
            self.overlay
                .paint(&self.ctx.gpu, &mut encoder, &view, ui_output);

            self.ctx.queue().submit(std::iter::once(encoder.finish()));
            window.pre_present_notify();
            output.present();
        }

        self.keys.end_frame();
        if self.ctx.sync() {
            self.pointer = VirtualPointer::new();
            app.mouse_event(NO_POINTER);
        }
        if self.ctx.quit_requested {
            event_loop.exit();
        }
    }
}

/// Window, swap chain and event loop around an [`Application`]
pub struct Engine<A> {
    app: A,
    window_config: WindowConfig,
    backends: wgpu::Backends,
    state: Option<EngineState>,
    init_error: Option<anyhow::Error>,
}

impl<A: Application> Engine<A> {
    pub fn new(app: A, window_config: WindowConfig, backends: wgpu::Backends) -> Self {
        Self {
            app,
            window_config,
            backends,
            state: None,
            init_error: None,
        }
    }

    /// Run until the window closes or the application quits
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self)
            .context("Event loop exited with an error")?;

        match self.init_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn create_state(&mut self, event_loop: &ActiveEventLoop) -> Result<EngineState> {
        let attributes = Window::default_attributes()
            .with_title(self.window_config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let gpu = pollster::block_on(GpuContext::new(
            window.clone(),
            self.backends,
            self.window_config.vsync,
        ))?;
        let overlay = Overlay::new(&window, &gpu, gpu.backend());

        let mut clock = Clock::new();
        let mut ctx = EngineContext::new(window, gpu);
        self.app
            .initialize(&mut ctx)
            .context("Application failed to initialize")?;
        let (width, height) = ctx.gpu.size();
        self.app.resize_event(&mut ctx, width, height);
        ctx.sync();
        clock.reset();

        Ok(EngineState {
            ctx,
            overlay,
            clock,
            keys: ActiveKeys::new(),
            pointer: VirtualPointer::new(),
            focused: true,
        })
    }
}

impl<A: Application> ApplicationHandler for Engine<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("{:#}", err);
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Self { app, state, .. } = self;
        let Some(state) = state.as_mut() else {
            return;
        };

        // egui sees every event; it only keeps them from the application in UI mode
        let consumed = state.overlay.handle_event(&state.ctx.window, &event)
            && state.ctx.input_mode == InputMode::Ui;

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state.ctx.gpu.resize(size.width, size.height);
                app.resize_event(&mut state.ctx, size.width, size.height);
            }
            WindowEvent::Focused(focused) => {
                state.focused = focused;
                if !focused {
                    state.keys.clear();
                    app.mouse_event(NO_POINTER);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if let Some((key, key_state)) = translate_key_event(&event) {
                    state.keys.record(key, key_state);
                    app.key_event(&mut state.ctx, key, key_state);
                }
            }
            WindowEvent::RedrawRequested => state.redraw(app, event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Self { app, state, .. } = self;
        let Some(state) = state.as_mut() else {
            return;
        };
        if !state.focused || state.ctx.input_mode != InputMode::Game {
            return;
        }

        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            let (pos, wrapped) = state.pointer.advance(Vec2::new(dx as f32, dy as f32));
            if wrapped {
                app.mouse_event(NO_POINTER);
            }
            app.mouse_event(pos);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }
}
