//! Viewer projection.

use glam::{Mat4, Vec4};

/// Perspective frustum of the virtual viewer camera.
///
/// The viewer uses the computer-vision convention: it looks down +z, x points
/// right and y points down the image. The horizontal half-extent at the near
/// plane equals the near distance (90 degree horizontal field of view) and the
/// vertical half-extent is `vertical_ratio` times that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrustum {
    /// Near clipping distance.
    pub near: f32,
    /// Far clipping distance.
    pub far: f32,
    /// Vertical over horizontal extent (0.75 for 4:3).
    pub vertical_ratio: f32,
}

impl Default for ViewFrustum {
    fn default() -> Self {
        Self {
            near: 0.03,
            far: 50.0,
            vertical_ratio: 0.75,
        }
    }
}

impl ViewFrustum {
    /// Creates a 4:3 frustum with the given clipping distances.
    #[must_use]
    pub fn new(near: f32, far: f32) -> Self {
        Self {
            near,
            far,
            ..Self::default()
        }
    }

    /// Returns a copy whose aspect ratio matches a `width` x `height` viewport.
    #[must_use]
    pub fn with_aspect(mut self, width: u32, height: u32) -> Self {
        if width > 0 && height > 0 {
            self.vertical_ratio = height as f32 / width as f32;
        }
        self
    }

    /// Returns the clip-from-viewer matrix, with depth mapped to `[0, 1]`.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        let depth_scale = self.far / (self.far - self.near);
        Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -1.0 / self.vertical_ratio, 0.0, 0.0),
            Vec4::new(0.0, 0.0, depth_scale, 1.0),
            Vec4::new(0.0, 0.0, -self.near * depth_scale, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn ndc(frustum: &ViewFrustum, p: Vec3) -> Vec3 {
        frustum.projection_matrix().project_point3(p)
    }

    #[test]
    fn test_depth_range() {
        let f = ViewFrustum::default();
        assert!(ndc(&f, Vec3::new(0.0, 0.0, f.near)).z.abs() < 1e-5);
        assert!((ndc(&f, Vec3::new(0.0, 0.0, f.far)).z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_field_of_view_is_ninety_degrees() {
        let f = ViewFrustum::default();
        // x == z sits on the right edge
        assert!((ndc(&f, Vec3::new(2.0, 0.0, 2.0)).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_image_down_is_screen_down() {
        let f = ViewFrustum::default();
        // y == 0.75 z sits on the bottom edge
        let p = ndc(&f, Vec3::new(0.0, 1.5, 2.0));
        assert!((p.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_with_aspect() {
        let f = ViewFrustum::default().with_aspect(1600, 900);
        assert!((f.vertical_ratio - 0.5625).abs() < 1e-6);
        let unchanged = ViewFrustum::default().with_aspect(0, 900);
        assert_eq!(unchanged.vertical_ratio, 0.75);
    }

    proptest! {
        #[test]
        fn prop_points_inside_frustum_land_in_clip_volume(
            u in -1.0f32..1.0,
            v in -1.0f32..1.0,
            z in 0.05f32..49.0,
        ) {
            let f = ViewFrustum::default();
            let p = Vec3::new(u * z, v * 0.75 * z, z);
            let q = ndc(&f, p);
            prop_assert!(q.x.abs() <= 1.0 + 1e-4);
            prop_assert!(q.y.abs() <= 1.0 + 1e-4);
            prop_assert!((0.0..=1.0).contains(&q.z));
        }
    }
}
