use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::{
    Adapter, Backends, Device, DeviceDescriptor, Instance, Queue, Surface, SurfaceConfiguration,
    SurfaceTexture, TextureFormat, TextureView,
};
use winit::window::Window;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Device, queue and swap chain for one window
///
/// Owns the depth buffer alongside the surface so both are resized together.
pub struct GpuContext {
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    depth_view: TextureView,
    backend: wgpu::Backend,
    adapter_name: String,
}

impl GpuContext {
    /// Create a context presenting to `window` using one of `backends`
    pub async fn new(window: Arc<Window>, backends: Backends, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = Self::request_device(&adapter).await?;

        let config = Self::create_surface_config(&surface, &adapter, size.width, size.height, vsync)?;
        surface.configure(&device, &config);
        let depth_view = Self::create_depth_view(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth_view,
            backend: info.backend,
            adapter_name: info.name,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    /// Surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn depth_view(&self) -> &TextureView {
        &self.depth_view
    }

    /// Backend the adapter actually runs on
    pub fn backend(&self) -> wgpu::Backend {
        self.backend
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// wgpu normalizes clip space to a zero-to-one depth range on every
    /// backend, including GL.
    pub fn uses_gl_depth_range(&self) -> bool {
        false
    }

    pub fn vsync(&self) -> bool {
        self.config.present_mode == wgpu::PresentMode::AutoVsync
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        if self.vsync() == vsync {
            return;
        }
        self.config.present_mode = present_mode(vsync);
        self.surface.configure(&self.device, &self.config);
        log::debug!("Vsync {}", if vsync { "on" } else { "off" });
    }

    /// Resize the swap chain and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Reapply the current configuration, e.g. after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, &self.config);
    }

    pub fn acquire(&self) -> std::result::Result<SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find an appropriate adapter")
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let required_limits = if adapter.get_info().backend == wgpu::Backend::Gl {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default().using_resolution(adapter.limits())
        };

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Cube Sample Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &Surface,
        adapter: &Adapter,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
