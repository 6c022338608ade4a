//! Rigid-body transforms.
//!
//! Poses follow the SLAM naming convention `a_from_b`: the transform that maps
//! coordinates expressed in frame `b` into frame `a`. A keyframe therefore
//! stores `camera_from_world`, and the viewer keeps `viewer_from_world`.

use std::ops::{Add, AddAssign, Mul};

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Below this squared angle the exponential map uses its Taylor expansion.
const SMALL_ANGLE_SQ: f32 = 1e-4;

/// Shortest quaternion accepted when reading a pose.
const MIN_ROTATION_NORM: f32 = 1e-6;

/// A tangent vector of SE(3): translational and rotational velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist {
    /// Translational part.
    pub translation: Vec3,
    /// Rotational part (axis scaled by angle, radians).
    pub rotation: Vec3,
}

impl Twist {
    /// The zero twist.
    pub const ZERO: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    /// Creates a twist from its two halves.
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Vec3) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Creates a twist from a 6-vector laid out as `[tx, ty, tz, rx, ry, rz]`.
    #[must_use]
    pub fn from_array(v: [f32; 6]) -> Self {
        Self {
            translation: Vec3::new(v[0], v[1], v[2]),
            rotation: Vec3::new(v[3], v[4], v[5]),
        }
    }

    /// Returns the 6-vector `[tx, ty, tz, rx, ry, rz]`.
    #[must_use]
    pub fn to_array(self) -> [f32; 6] {
        [
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ]
    }

    /// Returns true if both halves are exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.translation == Vec3::ZERO && self.rotation == Vec3::ZERO
    }
}

impl Add for Twist {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            translation: self.translation + rhs.translation,
            rotation: self.rotation + rhs.rotation,
        }
    }
}

impl AddAssign for Twist {
    fn add_assign(&mut self, rhs: Self) {
        self.translation += rhs.translation;
        self.rotation += rhs.rotation;
    }
}

/// A rigid transform: rotation followed by translation.
///
/// Deserialized rotations are normalized; a zero or non-finite quaternion is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Se3Repr")]
pub struct Se3 {
    /// Rotation part (unit quaternion).
    pub rotation: Quat,
    /// Translation part.
    pub translation: Vec3,
}

/// Serialized form of [`Se3`], checked before it becomes a transform.
#[derive(Deserialize)]
struct Se3Repr {
    rotation: Quat,
    translation: Vec3,
}

impl TryFrom<Se3Repr> for Se3 {
    type Error = String;

    fn try_from(repr: Se3Repr) -> Result<Self, Self::Error> {
        let norm = repr.rotation.length();
        if !norm.is_finite() || norm < MIN_ROTATION_NORM {
            return Err(format!(
                "rotation {:?} is not a valid quaternion",
                repr.rotation.to_array()
            ));
        }
        Ok(Self::new(repr.rotation, repr.translation))
    }
}

impl Default for Se3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Se3 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Creates a transform from a rotation and a translation.
    #[must_use]
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            translation,
        }
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    /// A pure rotation.
    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(rotation, Vec3::ZERO)
    }

    /// Exponential map from the tangent space.
    ///
    /// The rotation is `exp(ω)` and the translation is `V·v` where
    /// `V = I + (1 - cos θ)/θ² [ω]× + (θ - sin θ)/θ³ [ω]×²`.
    #[must_use]
    pub fn exp(twist: Twist) -> Self {
        let omega = twist.rotation;
        let v = twist.translation;
        let theta_sq = omega.length_squared();

        let (a, b) = if theta_sq < SMALL_ANGLE_SQ {
            (
                0.5 - theta_sq / 24.0 + theta_sq * theta_sq / 720.0,
                1.0 / 6.0 - theta_sq / 120.0 + theta_sq * theta_sq / 5040.0,
            )
        } else {
            let theta = theta_sq.sqrt();
            (
                (1.0 - theta.cos()) / theta_sq,
                (theta - theta.sin()) / (theta_sq * theta),
            )
        };

        let omega_cross_v = omega.cross(v);
        let translation = v + a * omega_cross_v + b * omega.cross(omega_cross_v);

        Self {
            rotation: Quat::from_scaled_axis(omega),
            translation,
        }
    }

    /// Returns the inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.conjugate();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Applies only the rotation to a direction.
    #[must_use]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Returns the equivalent homogeneous matrix.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// Compares two transforms component-wise within `max_abs_diff`.
    ///
    /// `q` and `-q` describe the same rotation, so both signs are accepted.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        let same_rotation = self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
            || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff);
        same_rotation
            && self
                .translation
                .abs_diff_eq(other.translation, max_abs_diff)
    }
}

impl Mul for Se3 {
    type Output = Se3;

    fn mul(self, rhs: Se3) -> Se3 {
        Se3 {
            // Re-normalized so that per-frame accumulation does not drift.
            rotation: (self.rotation * rhs.rotation).normalize(),
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

impl Mul<Vec3> for Se3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point(rhs)
    }
}
