// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Graphics backend to request from wgpu
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Let wgpu pick among the primary backends
    #[default]
    Auto,
    #[value(alias = "vk")]
    Vulkan,
    Metal,
    #[value(alias = "d3d12")]
    Dx12,
    #[value(alias = "opengl")]
    Gl,
}

impl Backend {
    pub fn to_wgpu(self) -> wgpu::Backends {
        match self {
            Backend::Auto => wgpu::Backends::PRIMARY,
            Backend::Vulkan => wgpu::Backends::VULKAN,
            Backend::Metal => wgpu::Backends::METAL,
            Backend::Dx12 => wgpu::Backends::DX12,
            Backend::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "cube-sample")]
#[command(about = "Textured cube with a first-person camera", long_about = None)]
pub struct Cli {
    /// Rendering backend
    #[arg(short, long, value_enum, default_value_t = Backend::Auto)]
    pub mode: Backend,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Start with vsync disabled
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Start with the debug panel open
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
