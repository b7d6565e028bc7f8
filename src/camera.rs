use glam::{Mat3, Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::core::input::{Key, KeyState};
use crate::math::projection::{perspective, SurfaceTransform};

const AXIS_EPSILON: f32 = 1e-5;

/// Pointer position meaning "no previous sample".
pub const NO_POINTER: Vec2 = Vec2::new(-1.0, -1.0);

/// Projection parameters as last passed to [`FirstPersonCamera::set_proj_attribs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjAttribs {
    pub near_clip_plane: f32,
    pub far_clip_plane: f32,
    pub aspect_ratio: f32,
    /// Field of view of the visually vertical axis, in radians.
    pub fov: f32,
    pub pre_transform: SurfaceTransform,
    /// Clip-space depth in `[-1, 1]` instead of `[0, 1]`.
    pub is_gl: bool,
}

impl Default for ProjAttribs {
    fn default() -> Self {
        Self {
            near_clip_plane: 0.1,
            far_clip_plane: 100.0,
            aspect_ratio: 1.0,
            fov: std::f32::consts::FRAC_PI_4,
            pre_transform: SurfaceTransform::Identity,
            is_gl: false,
        }
    }
}

/// Unit direction, in camera-local space, a movement key pushes toward.
fn key_direction(key: Key) -> Vec3 {
    match key {
        Key::W => Vec3::Z,
        Key::S => Vec3::NEG_Z,
        Key::D => Vec3::X,
        Key::A => Vec3::NEG_X,
        Key::Space => Vec3::Y,
        Key::LeftShift | Key::RightShift => Vec3::NEG_Y,
        _ => Vec3::ZERO,
    }
}

/// Fly camera driven by movement keys and pointer motion.
///
/// Input is accumulated as it arrives and integrated by
/// [`update_mat`](Self::update_mat), which is expected once per frame.
/// Camera-local space is x = right, y = up, z = ahead.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    reference_right: Vec3,
    reference_up: Vec3,
    reference_ahead: Vec3,
    handedness: f32,

    yaw: f32,
    pitch: f32,
    pos: Vec3,
    pending_delta: Vec3,
    last_pointer: Vec2,

    move_speed: f32,
    rotation_speed: f32,
    current_speed: f32,
    speed_up_scale: f32,
    super_speed_up_scale: f32,

    proj_attribs: ProjAttribs,
    view: Mat4,
    world: Mat4,
    proj: Mat4,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        let mut camera = Self {
            reference_right: Vec3::X,
            reference_up: Vec3::Y,
            reference_ahead: Vec3::Z,
            handedness: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            pos: Vec3::ZERO,
            pending_delta: Vec3::ZERO,
            last_pointer: NO_POINTER,
            move_speed: 1.0,
            rotation_speed: 0.01,
            current_speed: 0.0,
            speed_up_scale: 1.0,
            super_speed_up_scale: 1.0,
            proj_attribs: ProjAttribs::default(),
            view: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        let attribs = camera.proj_attribs;
        camera.set_proj_attribs(
            attribs.near_clip_plane,
            attribs.far_clip_plane,
            attribs.aspect_ratio,
            attribs.fov,
            attribs.pre_transform,
            attribs.is_gl,
        );
        camera
    }

    /// Set the frame camera-relative input is expressed in.
    ///
    /// `right` is normalized and `up` is orthogonalized against it. Collinear
    /// or degenerate axes are tolerated: the length is clamped to a small
    /// epsilon and a warning is logged.
    pub fn set_reference_axes(&mut self, right: Vec3, up: Vec3, is_right_handed: bool) {
        self.reference_right = right.normalize_or_zero();

        let up = up - up.dot(self.reference_right) * self.reference_right;
        let mut up_len = up.length();
        if up_len < AXIS_EPSILON {
            up_len = AXIS_EPSILON;
            log::warn!("Right and Up axes are collinear");
        }
        self.reference_up = up / up_len;

        self.handedness = if is_right_handed { 1.0 } else { -1.0 };
        let ahead = self.handedness * self.reference_right.cross(self.reference_up);
        let mut ahead_len = ahead.length();
        if ahead_len < AXIS_EPSILON {
            ahead_len = AXIS_EPSILON;
            log::warn!("Ahead axis is not well defined");
        }
        self.reference_ahead = ahead / ahead_len;
    }

    /// Accumulate movement for a single key event.
    pub fn update(&mut self, key: Key, state: KeyState, elapsed: f32) {
        self.update_keys(&[(key, state)], elapsed);
    }

    /// Accumulate movement for every key held this frame.
    ///
    /// The combined direction is normalized before speed scaling, so moving
    /// along two axes is no faster than along one.
    pub fn update_keys(&mut self, keys: &[(Key, KeyState)], elapsed: f32) {
        let direction: Vec3 = keys
            .iter()
            .filter(|(_, state)| state.is_down())
            .map(|&(key, _)| key_direction(key))
            .sum();

        let velocity = direction.normalize_or_zero() * self.move_speed;
        self.current_speed = velocity.length();
        self.pending_delta += velocity * elapsed;
    }

    /// Feed a pointer position. Rotation is driven by the delta to the
    /// previous sample; a sample with a negative coordinate marks the stream
    /// as interrupted and never rotates the camera.
    pub fn update_mouse(&mut self, pos: Vec2) {
        let previous = self.last_pointer;
        self.last_pointer = pos;

        let valid = |p: Vec2| p.x >= 0.0 && p.y >= 0.0;
        if !valid(previous) || !valid(pos) {
            return;
        }

        let delta = pos - previous;
        self.yaw += delta.x * self.rotation_speed * -self.handedness;
        self.pitch += delta.y * self.rotation_speed * -self.handedness;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Integrate pending movement and rebuild the view and world matrices.
    pub fn update_mat(&mut self) {
        let camera_rotation = self.camera_rotation();
        let world_rotation = camera_rotation.transpose();

        // Movement uses this frame's orientation
        self.pos += world_rotation * self.pending_delta;
        self.pending_delta = Vec3::ZERO;

        self.view = Mat4::from_mat3(camera_rotation) * Mat4::from_translation(-self.pos);
        self.world = Mat4::from_translation(self.pos) * Mat4::from_mat3(world_rotation);
    }

    /// World-to-reference-frame rotation.
    pub fn reference_rotation(&self) -> Mat3 {
        Mat3::from_cols(self.reference_right, self.reference_up, self.reference_ahead).transpose()
    }

    // Yaw and pitch are measured in the reference frame, so they rotate about
    // its canonical up and right axes after the world has been mapped into it.
    fn camera_rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(-self.pitch)
            * Mat3::from_rotation_y(-self.yaw)
            * self.reference_rotation()
    }

    pub fn set_proj_attribs(
        &mut self,
        near_clip_plane: f32,
        far_clip_plane: f32,
        aspect_ratio: f32,
        fov: f32,
        pre_transform: SurfaceTransform,
        is_gl: bool,
    ) {
        self.proj_attribs = ProjAttribs {
            near_clip_plane,
            far_clip_plane,
            aspect_ratio,
            fov,
            pre_transform,
            is_gl,
        };

        let focal = 1.0 / (fov / 2.0).tan();
        let (x_scale, y_scale) = if pre_transform.swaps_axes() {
            // The surface is turned sideways: its x axis is vertical on screen
            (focal, focal / aspect_ratio)
        } else {
            (focal / aspect_ratio, focal)
        };

        self.proj = perspective(x_scale, y_scale, near_clip_plane, far_clip_plane, is_gl);
    }

    /// Point the camera at `target` from its current position.
    pub fn set_look_at(&mut self, target: Vec3) {
        let view_dir = self.reference_rotation() * (target - self.pos);

        self.yaw = view_dir.x.atan2(view_dir.z);
        let xz_len = (view_dir.x * view_dir.x + view_dir.z * view_dir.z).sqrt();
        self.pitch = -view_dir.y.atan2(xz_len);
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
    }

    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed;
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed;
    }

    /// Stored for callers; no input currently applies them.
    pub fn set_speed_up_scales(&mut self, speed_up_scale: f32, super_speed_up_scale: f32) {
        self.speed_up_scale = speed_up_scale;
        self.super_speed_up_scale = super_speed_up_scale;
    }

    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /// `(yaw, pitch)` in radians.
    pub fn rotation(&self) -> Vec2 {
        Vec2::new(self.yaw, self.pitch)
    }

    pub fn pending_delta(&self) -> Vec3 {
        self.pending_delta
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn speed_up_scales(&self) -> (f32, f32) {
        (self.speed_up_scale, self.super_speed_up_scale)
    }

    pub fn reference_axes(&self) -> (Vec3, Vec3, Vec3) {
        (self.reference_right, self.reference_up, self.reference_ahead)
    }

    pub fn handedness(&self) -> f32 {
        self.handedness
    }

    pub fn proj_attribs(&self) -> &ProjAttribs {
        &self.proj_attribs
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    pub fn proj_matrix(&self) -> Mat4 {
        self.proj
    }
}
