use glam::Vec2;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys the application reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F3,
    W,
    A,
    S,
    D,
    Space,
    LeftShift,
    RightShift,
}

impl Key {
    /// Map a winit key code; keys outside the table are ignored
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::F3 => Some(Key::F3),
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::Space => Some(Key::Space),
            KeyCode::ShiftLeft => Some(Key::LeftShift),
            KeyCode::ShiftRight => Some(Key::RightShift),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Release,
    Press,
    Repeat,
}

impl KeyState {
    pub fn from_element_state(state: ElementState, repeat: bool) -> Self {
        match (state, repeat) {
            (ElementState::Released, _) => KeyState::Release,
            (ElementState::Pressed, false) => KeyState::Press,
            (ElementState::Pressed, true) => KeyState::Repeat,
        }
    }

    /// Press or Repeat
    pub fn is_down(self) -> bool {
        matches!(self, KeyState::Press | KeyState::Repeat)
    }
}

/// Translate a winit keyboard event into the application's vocabulary
pub fn translate_key_event(event: &KeyEvent) -> Option<(Key, KeyState)> {
    match event.physical_key {
        PhysicalKey::Code(code) => Key::from_key_code(code)
            .map(|key| (key, KeyState::from_element_state(event.state, event.repeat))),
        PhysicalKey::Unidentified(_) => None,
    }
}

/// Keys currently held down, in the order they were pressed
#[derive(Debug, Clone, Default)]
pub struct ActiveKeys {
    keys: Vec<(Key, KeyState)>,
}

impl ActiveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key event
    pub fn record(&mut self, key: Key, state: KeyState) {
        if state.is_down() {
            match self.keys.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = state,
                None => self.keys.push((key, state)),
            }
        } else {
            self.keys.retain(|(k, _)| *k != key);
        }
    }

    /// Held keys with their state for this frame
    pub fn held(&self) -> &[(Key, KeyState)] {
        &self.keys
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.iter().any(|(k, _)| *k == key)
    }

    /// Call once the frame has consumed the held keys: fresh presses become
    /// repeats for the following frames.
    pub fn end_frame(&mut self) {
        for (_, state) in &mut self.keys {
            *state = KeyState::Repeat;
        }
    }

    /// Forget every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

const POINTER_EXTENT: f32 = 1_000_000.0;

/// Cursor position synthesized from raw mouse motion while the real cursor
/// is grabbed. Stays inside `[0, POINTER_EXTENT)` so it is never mistaken
/// for the "no previous sample" marker.
#[derive(Debug, Clone, Copy)]
pub struct VirtualPointer {
    pos: Vec2,
}

impl VirtualPointer {
    pub fn new() -> Self {
        Self {
            pos: Vec2::splat(POINTER_EXTENT / 2.0),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Move by a raw motion delta. Returns the new position and whether it
    /// had to jump back to the center, in which case the motion is lost and
    /// consumers must restart their delta tracking.
    pub fn advance(&mut self, delta: Vec2) -> (Vec2, bool) {
        let next = self.pos + delta;
        let inside = next.cmpge(Vec2::ZERO).all() && next.cmplt(Vec2::splat(POINTER_EXTENT)).all();
        if inside {
            self.pos = next;
            (next, false)
        } else {
            *self = Self::new();
            (self.pos, true)
        }
    }
}

impl Default for VirtualPointer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key_code(KeyCode::KeyW), Some(Key::W));
        assert_eq!(Key::from_key_code(KeyCode::ShiftLeft), Some(Key::LeftShift));
        assert_eq!(Key::from_key_code(KeyCode::ShiftRight), Some(Key::RightShift));
        assert_eq!(Key::from_key_code(KeyCode::F3), Some(Key::F3));
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_element_state_translation() {
        assert_eq!(
            KeyState::from_element_state(ElementState::Pressed, false),
            KeyState::Press
        );
        assert_eq!(
            KeyState::from_element_state(ElementState::Pressed, true),
            KeyState::Repeat
        );
        assert_eq!(
            KeyState::from_element_state(ElementState::Released, true),
            KeyState::Release
        );
    }

    #[test]
    fn test_press_is_recorded_once() {
        let mut keys = ActiveKeys::new();
        keys.record(Key::W, KeyState::Press);
        keys.record(Key::W, KeyState::Repeat);

        assert_eq!(keys.held(), &[(Key::W, KeyState::Repeat)]);
        assert!(keys.is_down(Key::W));
    }

    #[test]
    fn test_release_removes_key() {
        let mut keys = ActiveKeys::new();
        keys.record(Key::W, KeyState::Press);
        keys.record(Key::D, KeyState::Press);
        keys.record(Key::W, KeyState::Release);

        assert_eq!(keys.held(), &[(Key::D, KeyState::Press)]);
        assert!(!keys.is_down(Key::W));
    }

    #[test]
    fn test_end_frame_demotes_press_to_repeat() {
        let mut keys = ActiveKeys::new();
        keys.record(Key::A, KeyState::Press);
        keys.record(Key::Space, KeyState::Press);
        keys.end_frame();

        assert!(keys.held().iter().all(|(_, s)| *s == KeyState::Repeat));
        assert_eq!(keys.held().len(), 2);
    }

    #[test]
    fn test_release_of_unknown_key_is_ignored() {
        let mut keys = ActiveKeys::new();
        keys.record(Key::S, KeyState::Release);
        assert!(keys.held().is_empty());
    }

    #[test]
    fn test_virtual_pointer_accumulates_motion() {
        let mut pointer = VirtualPointer::new();
        let start = pointer.position();
        let (pos, wrapped) = pointer.advance(Vec2::new(3.0, -2.0));

        assert!(!wrapped);
        assert_eq!(pos, start + Vec2::new(3.0, -2.0));
        assert_eq!(pointer.position(), pos);
    }

    #[test]
    fn test_virtual_pointer_recenters_instead_of_going_negative() {
        let mut pointer = VirtualPointer::new();
        let start = pointer.position();
        let (pos, wrapped) = pointer.advance(Vec2::new(-POINTER_EXTENT, 0.0));

        assert!(wrapped);
        assert_eq!(pos, start);
        assert!(pos.x >= 0.0 && pos.y >= 0.0);
    }

    #[test]
    fn test_clear() {
        let mut keys = ActiveKeys::new();
        keys.record(Key::S, KeyState::Press);
        keys.clear();
        assert!(!keys.is_down(Key::S));
    }
}
