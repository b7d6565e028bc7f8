use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, PI};

/// Rotation/mirroring the presentation engine applies to the surface
/// before it reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceTransform {
    #[default]
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    HorizontalMirror,
    HorizontalMirrorRotate90,
    HorizontalMirrorRotate180,
    HorizontalMirrorRotate270,
}

impl SurfaceTransform {
    /// True when the output is turned sideways, so the visually vertical
    /// axis of the screen is the horizontal axis of the surface.
    pub const fn swaps_axes(self) -> bool {
        matches!(
            self,
            Self::Rotate90
                | Self::Rotate270
                | Self::HorizontalMirrorRotate90
                | Self::HorizontalMirrorRotate270
        )
    }

    fn rotation_angle(self) -> f32 {
        match self {
            Self::Identity | Self::HorizontalMirror => 0.0,
            Self::Rotate90 | Self::HorizontalMirrorRotate90 => FRAC_PI_2,
            Self::Rotate180 | Self::HorizontalMirrorRotate180 => PI,
            Self::Rotate270 | Self::HorizontalMirrorRotate270 => 3.0 * FRAC_PI_2,
        }
    }

    const fn is_mirrored(self) -> bool {
        matches!(
            self,
            Self::HorizontalMirror
                | Self::HorizontalMirrorRotate90
                | Self::HorizontalMirrorRotate180
                | Self::HorizontalMirrorRotate270
        )
    }

    /// Matrix applied in view space that undoes the surface transform: a
    /// clockwise turn by the surface rotation about `view_axis`, the axis the
    /// camera looks along in view space, then the mirror if any.
    pub fn pretransform_matrix(self, view_axis: Vec3) -> Mat4 {
        if self == Self::Identity {
            return Mat4::IDENTITY;
        }

        let rotation = Mat4::from_axis_angle(view_axis.normalize(), -self.rotation_angle());
        if self.is_mirrored() {
            Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)) * rotation
        } else {
            rotation
        }
    }
}

/// Left-handed perspective projection (view space looks down +z) built
/// from explicit x/y scale factors.
///
/// `is_gl` selects the OpenGL clip-space depth range `[-1, 1]`; otherwise
/// depth maps to `[0, 1]`.
pub fn perspective(x_scale: f32, y_scale: f32, near: f32, far: f32, is_gl: bool) -> Mat4 {
    let (z_scale, z_offset) = if is_gl {
        ((far + near) / (far - near), -2.0 * near * far / (far - near))
    } else {
        (far / (far - near), -near * far / (far - near))
    };

    Mat4::from_cols(
        Vec4::new(x_scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y_scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z_scale, 1.0),
        Vec4::new(0.0, 0.0, z_offset, 0.0),
    )
}
