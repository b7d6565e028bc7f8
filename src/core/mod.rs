pub mod clock;
pub mod gpu_context;
pub mod input;
pub mod overlay;

pub use clock::Clock;
pub use gpu_context::{GpuContext, DEPTH_FORMAT};
pub use input::{ActiveKeys, Key, KeyState, VirtualPointer};
pub use overlay::Overlay;
