pub mod projection;

pub use projection::{perspective, SurfaceTransform};
