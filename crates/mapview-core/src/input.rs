//! Mouse input accumulated between frames.
//!
//! Window events arrive faster than frames are drawn, so drags are summed into
//! a [`MousePoseUpdate`] and drained once per frame with
//! [`MouseAccumulator::take`].

use crate::pose::Twist;

/// Default radians (or world units) per pixel of mouse motion.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.01;

/// Default dolly distance per scroll-wheel line.
pub const DEFAULT_SCROLL_STEP: f32 = 0.1;

/// Which mouse buttons are held during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl DragButtons {
    /// Returns true if no button is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.middle)
    }
}

/// Camera motion requested by the mouse since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MousePoseUpdate {
    /// Motion applied in the viewer frame (roll, pan-rotate, dolly).
    pub viewer: Twist,
    /// Motion applied about the map's mass center (orbit).
    pub orbit: Twist,
}

impl MousePoseUpdate {
    /// No motion.
    pub const NONE: Self = Self {
        viewer: Twist::ZERO,
        orbit: Twist::ZERO,
    };

    /// Returns true if applying the update would not move the camera.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.viewer.is_zero() && self.orbit.is_zero()
    }
}

/// Sums mouse drags and wheel steps into a pending [`MousePoseUpdate`].
#[derive(Debug, Clone)]
pub struct MouseAccumulator {
    sensitivity: f32,
    scroll_step: f32,
    pending: MousePoseUpdate,
}

impl Default for MouseAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_MOUSE_SENSITIVITY, DEFAULT_SCROLL_STEP)
    }
}

impl MouseAccumulator {
    /// Creates an accumulator.
    #[must_use]
    pub fn new(sensitivity: f32, scroll_step: f32) -> Self {
        Self {
            sensitivity,
            scroll_step,
            pending: MousePoseUpdate::NONE,
        }
    }

    /// Records a pointer motion of `(dx, dy)` pixels with `buttons` held.
    ///
    /// - left without right: orbit about the mass center
    /// - right without left: rotate the viewer in place
    /// - left and right together, or middle alone: roll and dolly
    ///
    /// The middle button only counts when neither of the others decides, so
    /// left+middle still orbits and right+middle still rotates.
    pub fn drag(&mut self, buttons: DragButtons, dx: f32, dy: f32) {
        let s = self.sensitivity;
        let update = &mut self.pending;
        if buttons.left && !buttons.right {
            update.orbit.rotation.x -= dy * s;
            update.orbit.rotation.y += dx * s;
        } else if buttons.right && !buttons.left {
            update.viewer.rotation.y -= dx * s;
            update.viewer.rotation.x += dy * s;
        } else if buttons.middle || (buttons.left && buttons.right) {
            update.viewer.rotation.z -= dx * s;
            update.viewer.translation.z += dy * s;
        }
    }

    /// Records `lines` scroll-wheel lines; positive values move the viewer
    /// toward the scene.
    pub fn scroll(&mut self, lines: f32) {
        self.pending.viewer.translation.z -= lines * self.scroll_step;
    }

    /// Returns the pending update without draining it.
    #[must_use]
    pub fn pending(&self) -> &MousePoseUpdate {
        &self.pending
    }

    /// Drains the pending update.
    pub fn take(&mut self) -> MousePoseUpdate {
        std::mem::take(&mut self.pending)
    }

    /// Changes the drag sensitivity.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Changes the scroll step.
    pub fn set_scroll_step(&mut self, scroll_step: f32) {
        self.scroll_step = scroll_step;
    }
}
