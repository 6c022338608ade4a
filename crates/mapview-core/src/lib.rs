//! Core abstractions for mapview.
//!
//! This crate holds everything the viewer needs that does not touch the GPU:
//! - [`Se3`] and [`Twist`] for rigid-body poses
//! - [`Map`] and friends, the read-only view of SLAM state
//! - [`MouseAccumulator`] turning drags into pose updates
//! - [`ViewerOptions`] and the error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
// Point counts are displayed and averaged as f32
#![allow(clippy::cast_precision_loss)]

pub mod colors;
pub mod error;
pub mod format;
pub mod input;
pub mod map;
pub mod options;
pub mod pose;

pub use colors::{keyframe_tag_color, level_color, update_state_color, LEVEL_COLORS};
pub use error::{MapViewError, Result};
pub use format::{format_significant, format_vec3};
pub use input::{DragButtons, MouseAccumulator, MousePoseUpdate};
pub use map::{
    mass_center, CameraPose, DenseCloud, DenseMap, DensePoint, KeyFrame, Map, MapPoint, SharedMap,
};
pub use options::{PointColoring, ViewerOptions};
pub use pose::{Se3, Twist};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
