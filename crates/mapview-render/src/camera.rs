//! The orbiting viewer camera.

use glam::{Mat4, Vec3};
use mapview_core::{MousePoseUpdate, Se3, Twist};

use crate::frustum::ViewFrustum;

/// Rotation about the viewer x axis of the starting pose, in units of pi.
const INITIAL_TILT: f32 = 0.8;

/// Distance from the viewer to the world origin in the starting pose.
const INITIAL_DISTANCE: f32 = 2.0;

/// The virtual camera looking at the map.
#[derive(Debug, Clone)]
pub struct ViewerCamera {
    /// World-to-viewer transform.
    pub viewer_from_world: Se3,
    /// Projection parameters.
    pub frustum: ViewFrustum,
}

impl ViewerCamera {
    /// Creates a camera in the starting pose.
    #[must_use]
    pub fn new(frustum: ViewFrustum) -> Self {
        Self {
            viewer_from_world: Self::initial_pose(),
            frustum,
        }
    }

    /// The starting pose: the world origin two units in front of the viewer,
    /// seen from above at a steep angle.
    #[must_use]
    pub fn initial_pose() -> Se3 {
        Se3::exp(Twist::from_array([0.0, 0.0, INITIAL_DISTANCE, 0.0, 0.0, 0.0]))
            * Se3::exp(Twist::from_array([
                0.0,
                0.0,
                0.0,
                INITIAL_TILT * std::f32::consts::PI,
                0.0,
                0.0,
            ]))
    }

    /// Returns to the starting pose.
    pub fn reset(&mut self) {
        self.viewer_from_world = Self::initial_pose();
    }

    /// Applies a mouse update.
    ///
    /// `update.viewer` acts in the viewer frame. `update.orbit` acts about
    /// `pivot` (a world point): the viewer frame is shifted to the pivot, the
    /// orbit motion applied there, and the shift undone, so a pure orbit
    /// rotation leaves the pivot where it appears on screen.
    pub fn apply_pose_update(&mut self, update: &MousePoseUpdate, pivot: Vec3) {
        if update.is_zero() {
            return;
        }
        let viewer_from_pivot = Se3::from_translation(self.viewer_from_world * pivot);
        self.viewer_from_world = Se3::exp(update.viewer)
            * viewer_from_pivot
            * Se3::exp(update.orbit)
            * viewer_from_pivot.inverse()
            * self.viewer_from_world;
    }

    /// Viewer-from-local matrix for geometry expressed in a local frame.
    #[must_use]
    pub fn model_view(&self, world_from_local: &Se3) -> Mat4 {
        (self.viewer_from_world * *world_from_local).to_mat4()
    }

    /// Viewer-from-world matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.viewer_from_world.to_mat4()
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.frustum.projection_matrix()
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Viewer position in world coordinates.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.viewer_from_world.inverse().translation
    }

    /// Sets the near clipping plane.
    pub fn set_near(&mut self, near: f32) {
        self.frustum.near = near.max(0.001);
    }

    /// Sets the far clipping plane.
    pub fn set_far(&mut self, far: f32) {
        self.frustum.far = far.max(self.frustum.near + 0.1);
    }

    /// Matches the frustum aspect to the viewport.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.frustum = self.frustum.with_aspect(width, height);
    }
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self::new(ViewFrustum::default())
    }
}
