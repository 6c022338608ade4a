//! Rendering backend for mapview.
//!
//! This crate turns viewer state into pixels:
//! - [`ViewerCamera`] and [`ViewFrustum`], the orbiting virtual camera
//! - [`DrawList`], an immediate-mode record of point and line batches
//! - [`RenderEngine`], the wgpu backend that executes a draw list
//! - screenshot encoding

// Pixel sizes and buffer offsets move between u32, u64 and f32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod buffer;
pub mod camera;
pub mod draw_list;
pub mod engine;
pub mod error;
pub mod frustum;
pub mod screenshot;

pub use camera::ViewerCamera;
pub use draw_list::{DrawBatch, DrawList, Primitive, Vertex};
pub use engine::{BatchUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use frustum::ViewFrustum;
pub use screenshot::{encode_png, save_image, ScreenshotError};
