pub mod cube;
pub mod texture;

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::FirstPersonCamera;
use crate::config::{AppConfig, CameraConfig};
use crate::core::input::{Key, KeyState};
use crate::core::DEPTH_FORMAT;
use crate::engine::{EngineContext, InputMode};
use crate::traits::{Application, FrameInput, RenderTarget};

use cube::{Vertex, INDICES, VERTICES};
use texture::Texture;

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 10.0);

/// Frames per second averaged over [`FPS_UPDATE_INTERVAL`]
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn tick(&mut self, delta: f32) {
        self.frames += 1;
        self.timer += delta;

        if self.timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frames as f32 / self.timer;
            self.frames = 0;
            self.timer = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// What a key event asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleDebug,
}

/// Escape quits while held; F3 toggles the debug panel once per press
pub fn key_action(key: Key, state: KeyState) -> Option<KeyAction> {
    match (key, state) {
        (Key::Escape, KeyState::Press | KeyState::Repeat) => Some(KeyAction::Quit),
        (Key::F3, KeyState::Press) => Some(KeyAction::ToggleDebug),
        _ => None,
    }
}

/// Backend and adapter as shown in the debug panel
pub fn backend_label(backend: wgpu::Backend, adapter_name: &str) -> String {
    if adapter_name.is_empty() {
        format!("{:?}", backend)
    } else {
        format!("{:?} ({})", backend, adapter_name)
    }
}

/// Camera placed in front of the cube, right-handed world with +Y up
pub fn setup_camera(config: &CameraConfig) -> FirstPersonCamera {
    let mut camera = FirstPersonCamera::new();
    camera.set_reference_axes(Vec3::X, Vec3::Y, false);
    camera.set_pos(CAMERA_START);
    camera.set_look_at(Vec3::ZERO);
    camera.set_rotation_speed(config.rotation_speed);
    camera.set_move_speed(config.move_speed);
    camera.set_speed_up_scales(config.speed_up_scale, config.super_speed_up_scale);
    camera.update_mat();
    camera
}

/// Model matrix of the cube after spinning `angle` radians about +Y
pub fn cube_model(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

struct GpuResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _texture: Texture,
}

impl GpuResources {
    fn new(ctx: &EngineContext, config: &AppConfig) -> Self {
        let device = ctx.device();

        let texture = Texture::load_or_checkerboard(device, ctx.queue(), &config.scene.texture);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Constants"),
            contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cube Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("cube.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.gpu().surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
            _texture: texture,
        }
    }
}

/// Textured cube viewed through a first-person camera
pub struct Game {
    config: AppConfig,
    camera: FirstPersonCamera,
    resources: Option<GpuResources>,
    fps: FpsCounter,
    show_debug: bool,
    no_clear: bool,
    rotate_cube: bool,
    cube_angle: f32,
    delta: f32,
    time: f32,
    wvp: Mat4,
}

impl Game {
    pub fn new(config: AppConfig, show_debug: bool) -> Self {
        let camera = setup_camera(&config.camera);
        let rotate_cube = config.scene.rotate_cube;

        Self {
            config,
            camera,
            resources: None,
            fps: FpsCounter::default(),
            show_debug,
            no_clear: false,
            rotate_cube,
            cube_angle: 0.0,
            delta: 0.0,
            time: 0.0,
            wvp: Mat4::IDENTITY,
        }
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    fn input_mode(&self) -> InputMode {
        if self.show_debug {
            InputMode::Ui
        } else {
            InputMode::Game
        }
    }

    fn project(&mut self, ctx: &EngineContext) {
        let camera = &self.config.camera;
        self.camera.set_proj_attribs(
            camera.near,
            camera.far,
            ctx.aspect_ratio(),
            camera.fov_degrees.to_radians(),
            ctx.surface_transform(),
            ctx.uses_gl_depth_range(),
        );
    }

    fn debug_panel(&mut self, ui: &egui::Context, ctx: &mut EngineContext) {
        let rotation = self.camera.rotation();
        let pos = self.camera.pos();
        let speed = self.camera.current_speed();
        let backend = backend_label(ctx.backend(), ctx.adapter_name());

        egui::Window::new("Debug panel")
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .default_width(250.0)
            .show(ui, |ui| {
                ui.heading(
                    egui::RichText::new(format!("{:.0} FPS", self.fps.fps()))
                        .color(egui::Color32::from_rgb(74, 158, 255)),
                );
                ui.monospace(format!("Delta: {:.2} ms", self.delta * 1000.0));
                ui.monospace(format!("Time: {:.2}s", self.time));

                ui.separator();
                ui.monospace(format!(
                    "Rot: ({:.1}°, {:.1}°)",
                    rotation.x.to_degrees(),
                    rotation.y.to_degrees()
                ));
                ui.monospace(format!("Pos: ({:.2}, {:.2}, {:.2})", pos.x, pos.y, pos.z));
                ui.monospace(format!("Speed: {:.2}", speed));

                ui.separator();
                ui.monospace(format!("Backend: {}", backend));
                ui.checkbox(ctx.vsync_mut(), "Vsync");
                ui.checkbox(&mut self.no_clear, "Disable Buffer Clearing");
                ui.checkbox(&mut self.rotate_cube, "Rotate cube");
            });
    }
}

impl Application for Game {
    fn initialize(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.resources = Some(GpuResources::new(ctx, &self.config));
        self.project(ctx);
        ctx.set_input_mode(self.input_mode());
        log::info!("Cube sample ready on {:?}", ctx.backend());
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, frame: &FrameInput) {
        self.delta = frame.delta;
        self.time = frame.time;
        self.fps.tick(frame.delta);

        self.camera.update_keys(frame.held_keys, frame.delta);
        self.camera.update_mat();

        if self.rotate_cube {
            self.cube_angle = (self.cube_angle
                + frame.delta * self.config.scene.cube_rotation_speed)
                % std::f32::consts::TAU;
        }

        let pretransform = ctx.surface_pretransform_matrix(Vec3::Z);
        self.wvp = self.camera.proj_matrix()
            * pretransform
            * self.camera.view_matrix()
            * cube_model(self.cube_angle);
    }

    fn draw(&mut self, ctx: &EngineContext, encoder: &mut wgpu::CommandEncoder, target: &RenderTarget) {
        let Some(resources) = &self.resources else {
            return;
        };

        ctx.queue().write_buffer(
            &resources.uniform_buffer,
            0,
            bytemuck::cast_slice(&self.wvp.to_cols_array()),
        );

        let [r, g, b, a] = self.config.scene.clear_color;
        let load = if self.no_clear {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a })
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cube Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&resources.pipeline);
        render_pass.set_bind_group(0, &resources.bind_group, &[]);
        render_pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        render_pass.set_index_buffer(resources.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
    }

    fn overlay(&mut self, ui: &egui::Context, ctx: &mut EngineContext, _frame: &FrameInput) {
        if self.show_debug {
            self.debug_panel(ui, ctx);
        }
    }

    fn key_event(&mut self, ctx: &mut EngineContext, key: Key, state: KeyState) {
        match key_action(key, state) {
            Some(KeyAction::Quit) => ctx.quit(),
            Some(KeyAction::ToggleDebug) => {
                self.show_debug = !self.show_debug;
                ctx.set_input_mode(self.input_mode());
            }
            None => {}
        }
    }

    fn mouse_event(&mut self, pos: glam::Vec2) {
        self.camera.update_mouse(pos);
    }

    fn resize_event(&mut self, ctx: &mut EngineContext, _width: u32, _height: u32) {
        self.project(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quits_on_press_and_repeat() {
        assert_eq!(key_action(Key::Escape, KeyState::Press), Some(KeyAction::Quit));
        assert_eq!(key_action(Key::Escape, KeyState::Repeat), Some(KeyAction::Quit));
        assert_eq!(key_action(Key::Escape, KeyState::Release), None);
    }

    #[test]
    fn test_f3_toggles_only_on_press() {
        assert_eq!(key_action(Key::F3, KeyState::Press), Some(KeyAction::ToggleDebug));
        assert_eq!(key_action(Key::F3, KeyState::Repeat), None);
        assert_eq!(key_action(Key::W, KeyState::Press), None);
    }

    #[test]
    fn test_backend_label_includes_adapter() {
        assert_eq!(
            backend_label(wgpu::Backend::Vulkan, "Test GPU"),
            "Vulkan (Test GPU)"
        );
        assert_eq!(backend_label(wgpu::Backend::Gl, ""), "Gl");
    }

    #[test]
    fn test_camera_starts_looking_at_cube() {
        let camera = setup_camera(&CameraConfig::default());
        let center = camera.view_matrix().transform_point3(Vec3::ZERO);

        assert!(center.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));
        assert_eq!(camera.pos(), CAMERA_START);
    }

    #[test]
    fn test_camera_uses_configured_speeds() {
        let config = CameraConfig {
            move_speed: 7.0,
            rotation_speed: 0.02,
            ..Default::default()
        };
        let camera = setup_camera(&config);

        assert_eq!(camera.move_speed(), 7.0);
        assert_eq!(camera.rotation_speed(), 0.02);
        assert_eq!(
            camera.speed_up_scales(),
            (config.speed_up_scale, config.super_speed_up_scale)
        );
    }

    #[test]
    fn test_world_is_right_handed_on_screen() {
        let camera = setup_camera(&CameraConfig::default());
        let view = camera.view_matrix();

        // +X appears to the right, +Y up, as seen from +Z
        let right = view.transform_point3(Vec3::X) - view.transform_point3(Vec3::ZERO);
        let up = view.transform_point3(Vec3::Y) - view.transform_point3(Vec3::ZERO);
        assert!(right.x > 0.99);
        assert!(up.y > 0.99);
    }

    #[test]
    fn test_cube_model_spins_about_y() {
        let model = cube_model(std::f32::consts::FRAC_PI_2);
        assert!(model.transform_point3(Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));
        assert!(model
            .transform_point3(Vec3::X)
            .abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_fps_counter_averages_over_interval() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            fps.tick(1.0 / 60.0);
        }
        assert_eq!(fps.fps(), 0.0);

        fps.tick(1.0 / 60.0 + 1e-3);
        assert!((fps.fps() - 60.0).abs() < 0.1);
    }
}
