use glam::Vec2;

use crate::core::input::{Key, KeyState};
use crate::engine::EngineContext;

/// Per-frame input handed to [`Application::update`]
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the application started
    pub time: f32,
    /// Movement keys held this frame
    pub held_keys: &'a [(Key, KeyState)],
}

/// Attachments the application draws into
pub struct RenderTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// Application driven by the engine loop
///
/// Each frame the engine calls `update`, then `draw`, then `overlay`, then
/// presents. Input callbacks arrive between frames.
pub trait Application {
    /// Create GPU resources; called once the device exists
    fn initialize(&mut self, ctx: &mut EngineContext) -> anyhow::Result<()>;

    fn update(&mut self, ctx: &mut EngineContext, frame: &FrameInput);

    /// Record the scene into `encoder`
    fn draw(&mut self, ctx: &EngineContext, encoder: &mut wgpu::CommandEncoder, target: &RenderTarget);

    /// Build GUI widgets for this frame
    fn overlay(&mut self, _ui: &egui::Context, _ctx: &mut EngineContext, _frame: &FrameInput) {}

    fn key_event(&mut self, _ctx: &mut EngineContext, _key: Key, _state: KeyState) {}

    /// Pointer position, or [`NO_POINTER`](crate::camera::NO_POINTER) when
    /// the previous sample must be discarded
    fn mouse_event(&mut self, _pos: Vec2) {}

    /// Swap chain was resized to `width` x `height` physical pixels
    fn resize_event(&mut self, _ctx: &mut EngineContext, _width: u32, _height: u32) {}
}
