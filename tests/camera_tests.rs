use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use approx::assert_abs_diff_eq;
use cube_sample::camera::{FirstPersonCamera, NO_POINTER};
use cube_sample::core::input::{Key, KeyState};
use cube_sample::math::projection::SurfaceTransform;
use glam::{Mat4, Vec2, Vec3};

#[cfg(test)]
mod reference_axes_tests {
    use super::*;

    fn assert_orthonormal(right: Vec3, up: Vec3, ahead: Vec3) {
        assert_abs_diff_eq!(right.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(up.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ahead.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(right.dot(up), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(right.dot(ahead), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(up.dot(ahead), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_right_handed_ahead_is_cross_product() {
        let right = Vec3::new(1.0, 1.0, 0.0).normalize();
        let up = Vec3::new(-1.0, 1.0, 0.0).normalize();

        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(right, up, true);
        let (r, u, a) = camera.reference_axes();

        assert!(a.abs_diff_eq(right.cross(up), 1e-5));
        assert_orthonormal(r, u, a);
        assert_eq!(camera.handedness(), 1.0);
    }

    #[test]
    fn test_flipping_handedness_negates_ahead() {
        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(Vec3::X, Vec3::Y, true);
        let (_, _, right_handed) = camera.reference_axes();

        camera.set_reference_axes(Vec3::X, Vec3::Y, false);
        let (_, _, left_handed) = camera.reference_axes();

        assert!(left_handed.abs_diff_eq(-right_handed, 1e-6));
        assert_eq!(camera.handedness(), -1.0);
    }

    #[test]
    fn test_up_is_orthogonalized_against_right() {
        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.5, 3.0, 0.0), true);
        let (r, u, a) = camera.reference_axes();

        assert!(r.abs_diff_eq(Vec3::X, 1e-6));
        assert!(u.abs_diff_eq(Vec3::Y, 1e-6));
        assert_orthonormal(r, u, a);
    }

    #[test]
    fn test_collinear_axes_do_not_panic() {
        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(Vec3::X, Vec3::X * 2.0, true);
        let (r, u, a) = camera.reference_axes();

        assert!(r.is_finite() && u.is_finite() && a.is_finite());

        camera.update_mat();
        assert!(camera.view_matrix().is_finite());
    }
}

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut camera = FirstPersonCamera::new();
        camera.set_move_speed(5.0);
        camera.update_keys(&[(Key::W, KeyState::Press), (Key::D, KeyState::Press)], 1.0);

        let per_axis = camera.pending_delta() / 5.0;
        assert_abs_diff_eq!(per_axis.x, FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_abs_diff_eq!(per_axis.y, 0.0);
        assert_abs_diff_eq!(per_axis.z, FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.pending_delta().length(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_single_key_accumulates_until_update_mat() {
        let mut camera = FirstPersonCamera::new();
        camera.set_move_speed(2.0);
        camera.update(Key::W, KeyState::Press, 0.5);
        camera.update(Key::W, KeyState::Repeat, 0.5);

        assert!(camera.pending_delta().abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-6));
        assert_eq!(camera.pos(), Vec3::ZERO);

        camera.update_mat();
        assert!(camera.pos().abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-6));
        assert_eq!(camera.pending_delta(), Vec3::ZERO);
    }

    #[test]
    fn test_released_and_unmapped_keys_do_not_move() {
        let mut camera = FirstPersonCamera::new();
        camera.update(Key::W, KeyState::Release, 1.0);
        camera.update(Key::Escape, KeyState::Press, 1.0);
        camera.update(Key::F3, KeyState::Repeat, 1.0);

        assert_eq!(camera.pending_delta(), Vec3::ZERO);
        assert_eq!(camera.current_speed(), 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = FirstPersonCamera::new();
        camera.update_keys(&[(Key::Space, KeyState::Press), (Key::LeftShift, KeyState::Press)], 1.0);

        assert_eq!(camera.pending_delta(), Vec3::ZERO);
    }

    #[test]
    fn test_movement_uses_current_orientation() {
        let mut camera = FirstPersonCamera::new();
        camera.set_rotation(FRAC_PI_2, 0.0);
        camera.update(Key::W, KeyState::Press, 1.0);
        camera.update_mat();

        assert!(camera.pos().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_speed_up_scales_are_stored() {
        let mut camera = FirstPersonCamera::new();
        camera.set_speed_up_scales(5.0, 10.0);
        camera.set_move_speed(1.0);
        camera.update(Key::W, KeyState::Press, 1.0);

        assert_eq!(camera.speed_up_scales(), (5.0, 10.0));
        assert_abs_diff_eq!(camera.pending_delta().length(), 1.0, epsilon = 1e-6);
    }
}

#[cfg(test)]
mod mouse_tests {
    use super::*;

    #[test]
    fn test_first_sample_after_sentinel_does_not_rotate() {
        let mut camera = FirstPersonCamera::new();
        camera.update_mouse(Vec2::new(100.0, 100.0));
        assert_eq!(camera.rotation(), Vec2::ZERO);

        camera.update_mouse(Vec2::new(110.0, 100.0));
        assert_abs_diff_eq!(camera.rotation().x, -0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.rotation().y, 0.0);
    }

    #[test]
    fn test_sentinel_interrupts_the_stream() {
        let mut camera = FirstPersonCamera::new();
        camera.update_mouse(Vec2::new(10.0, 10.0));
        camera.update_mouse(NO_POINTER);
        camera.update_mouse(Vec2::new(500.0, 500.0));

        assert_eq!(camera.rotation(), Vec2::ZERO);
    }

    #[test]
    fn test_left_handed_frame_flips_rotation_direction() {
        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(Vec3::X, Vec3::Y, false);
        camera.update_mouse(Vec2::new(0.0, 0.0));
        camera.update_mouse(Vec2::new(10.0, 20.0));

        assert_abs_diff_eq!(camera.rotation().x, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.rotation().y, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut camera = FirstPersonCamera::new();
        let samples = [0.0, 5_000.0, -20_000.0, 300.0, 90_000.0, 0.0];
        for (i, y) in samples.iter().enumerate() {
            camera.update_mouse(Vec2::new(i as f32, y + 100_000.0));
            let pitch = camera.rotation().y;
            assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&pitch), "pitch {} out of range", pitch);
        }
    }

    #[test]
    fn test_yaw_is_not_clamped() {
        let mut camera = FirstPersonCamera::new();
        camera.update_mouse(Vec2::new(0.0, 0.0));
        camera.update_mouse(Vec2::new(10_000.0, 0.0));

        assert_abs_diff_eq!(camera.rotation().x, -100.0, epsilon = 1e-3);
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::*;

    #[test]
    fn test_update_mat_without_movement_keeps_position() {
        let mut camera = FirstPersonCamera::new();
        camera.set_pos(Vec3::new(1.0, 2.0, 3.0));
        camera.update_mat();
        let before = camera.view_matrix();

        camera.set_rotation(0.3, -0.2);
        camera.update_mat();

        assert_eq!(camera.pos(), Vec3::new(1.0, 2.0, 3.0));
        assert!(!camera.view_matrix().abs_diff_eq(before, 1e-4));
    }

    #[test]
    fn test_look_at_points_view_forward_at_target() {
        let mut camera = FirstPersonCamera::new();
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(4.0, -1.0, 7.0);
        camera.set_pos(pos);
        camera.set_look_at(target);
        camera.update_mat();

        let in_view = camera.view_matrix().transform_point3(target);
        let distance = (target - pos).length();
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, distance), 1e-4));

        let forward = camera.world_matrix().transform_vector3(Vec3::Z);
        assert!(forward.abs_diff_eq((target - pos).normalize(), 1e-5));
    }

    #[test]
    fn test_look_at_in_left_handed_frame() {
        let mut camera = FirstPersonCamera::new();
        camera.set_reference_axes(Vec3::X, Vec3::Y, false);
        camera.set_pos(Vec3::new(-3.0, 1.0, 2.0));
        camera.set_look_at(Vec3::new(5.0, 0.0, -4.0));
        camera.update_mat();

        let in_view = camera.view_matrix().transform_point3(Vec3::new(5.0, 0.0, -4.0));
        assert_abs_diff_eq!(in_view.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(in_view.y, 0.0, epsilon = 1e-4);
        assert!(in_view.z > 0.0);
    }

    #[test]
    fn test_world_is_inverse_of_view() {
        let mut camera = FirstPersonCamera::new();
        camera.set_pos(Vec3::new(-2.0, 0.5, 4.0));
        camera.set_rotation(1.1, 0.4);
        camera.update_mat();

        let product = camera.world_matrix() * camera.view_matrix();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}

#[cfg(test)]
mod projection_tests {
    use super::*;

    #[test]
    fn test_default_projection() {
        let camera = FirstPersonCamera::new();
        let attribs = camera.proj_attribs();

        assert_eq!(attribs.near_clip_plane, 0.1);
        assert_eq!(attribs.far_clip_plane, 100.0);
        assert_eq!(attribs.pre_transform, SurfaceTransform::Identity);
        assert!(!attribs.is_gl);
    }

    #[test]
    fn test_rotated_surface_swaps_scales() {
        let mut camera = FirstPersonCamera::new();
        camera.set_proj_attribs(0.1, 100.0, 2.0, FRAC_PI_2, SurfaceTransform::Identity, false);
        let upright = camera.proj_matrix();
        assert_abs_diff_eq!(upright.x_axis.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(upright.y_axis.y, 1.0, epsilon = 1e-6);

        camera.set_proj_attribs(0.1, 100.0, 2.0, FRAC_PI_2, SurfaceTransform::Rotate90, false);
        let rotated = camera.proj_matrix();
        assert_abs_diff_eq!(rotated.x_axis.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotated.y_axis.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_depth_conventions() {
        let mut camera = FirstPersonCamera::new();

        camera.set_proj_attribs(1.0, 10.0, 1.0, FRAC_PI_2, SurfaceTransform::Identity, false);
        let proj = camera.proj_matrix();
        assert_abs_diff_eq!(proj.project_point3(Vec3::new(0.0, 0.0, 1.0)).z, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(proj.project_point3(Vec3::new(0.0, 0.0, 10.0)).z, 1.0, epsilon = 1e-5);

        camera.set_proj_attribs(1.0, 10.0, 1.0, FRAC_PI_2, SurfaceTransform::Identity, true);
        let proj = camera.proj_matrix();
        assert_abs_diff_eq!(proj.project_point3(Vec3::new(0.0, 0.0, 1.0)).z, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(proj.project_point3(Vec3::new(0.0, 0.0, 10.0)).z, 1.0, epsilon = 1e-5);
    }
}
