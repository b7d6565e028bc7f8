use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cube Sample".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per second
    pub move_speed: f32,
    /// Radians per pixel of pointer motion
    pub rotation_speed: f32,
    pub speed_up_scale: f32,
    pub super_speed_up_scale: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 0.005,
            speed_up_scale: 5.0,
            super_speed_up_scale: 10.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub texture: PathBuf,
    /// Linear RGBA
    pub clear_color: [f64; 4],
    pub rotate_cube: bool,
    /// Radians per second about +Y
    pub cube_rotation_speed: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("assets/base_txt.png"),
            clear_color: [0.001, 0.001, 0.001, 1.0],
            rotate_cube: true,
            cube_rotation_speed: 0.5,
        }
    }
}

/// Everything the sample reads at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid configuration JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Config file named on the command line (defaults otherwise), with
    /// command-line flags applied on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(width) = cli.width {
            config.window.width = width;
        }
        if let Some(height) = cli.height {
            config.window.height = height;
        }
        if cli.no_vsync {
            config.window.vsync = false;
        }

        Ok(config)
    }
}
