pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod game;
pub mod math;
pub mod traits;

pub use camera::{FirstPersonCamera, ProjAttribs, NO_POINTER};
pub use engine::{Engine, EngineContext, InputMode};
pub use game::Game;
