//! mapview: a live 3-D viewer for SLAM maps.
//!
//! The viewer reads a [`Map`] owned by a SLAM system (map points, keyframe
//! poses and an optional dense overlay) and draws it through an orbiting
//! virtual camera driven by the mouse.
//!
//! # Quick Start
//!
//! ```no_run
//! use mapview::*;
//!
//! let map = Map::from_json_file("map.json").unwrap().into_shared();
//! let camera_pose: CameraPose = std::sync::Arc::new(std::sync::RwLock::new(Se3::IDENTITY));
//!
//! // The tracker keeps writing `map` and `camera_pose` from its own threads.
//! show(map, camera_pose, ViewerOptions::default()).unwrap();
//! ```
//!
//! # Controls
//!
//! - Left drag: orbit around the map's mass center
//! - Right drag: turn the viewer in place
//! - Middle drag or left+right drag: roll and move forward/back
//! - Wheel: move forward/back
//! - `G` grid, `D` dense overlay, `U` update coloring, `R` reset view,
//!   `F12` screenshot, `Esc` quit

// Window sizes and mouse deltas move between f64, f32 and u32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
mod headless;
pub mod viewer;

pub use app::{run_app, App};
pub use headless::{render_to_file, render_to_image, render_viewer_to_image};
pub use viewer::MapViewer;

pub use mapview_core::{
    format_significant, format_vec3, keyframe_tag_color, level_color, mass_center,
    update_state_color, CameraPose, DenseCloud, DenseMap, DensePoint, DragButtons, KeyFrame, Map,
    MapPoint, MapViewError, MouseAccumulator, MousePoseUpdate, PointColoring, Result, Se3,
    SharedMap, Twist, ViewerOptions, LEVEL_COLORS,
};
pub use mapview_render::{
    DrawBatch, DrawList, Primitive, RenderEngine, Vertex, ViewFrustum, ViewerCamera,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Opens the viewer window and runs it until closed.
///
/// Validates `options`, initializes logging (controlled by `RUST_LOG`) and
/// blocks on the event loop. Each frame read-locks `map` and `camera_pose`,
/// so producers can keep updating them from other threads.
pub fn show(map: SharedMap, camera_pose: CameraPose, options: ViewerOptions) -> Result<()> {
    let _ = env_logger::try_init();
    options.validate()?;
    log::info!("starting map viewer");
    app::run_app(map, camera_pose, options)
}
