//! Headless rendering API for mapview.
//!
//! Renders a map snapshot to an image buffer or file without opening a
//! window. Useful for integration tests, offline inspection of recorded maps,
//! and automated screenshots.

use std::path::Path;

use pollster::FutureExt;

use mapview_core::{Map, MapViewError, MousePoseUpdate, Result, Se3, ViewerOptions};
use mapview_render::RenderEngine;

use crate::viewer::MapViewer;

/// Renders one frame of `map` to a raw RGBA pixel buffer.
///
/// The frame is what a fresh viewer shows in its starting pose: dense
/// overlay, map points, the live camera at `camera_from_world` and every
/// keyframe. The buffer holds `width * height * 4` bytes, row by row from
/// the top-left corner.
///
/// # Example
/// ```no_run
/// use mapview::*;
///
/// let mut map = Map::new();
/// map.points.push(MapPoint::new(Vec3::new(0.1, 0.2, 0.0), 0));
/// let pixels = render_to_image(&map, &Se3::IDENTITY, &ViewerOptions::default(), 640, 480).unwrap();
/// assert_eq!(pixels.len(), 640 * 480 * 4);
/// ```
pub fn render_to_image(
    map: &Map,
    camera_from_world: &Se3,
    options: &ViewerOptions,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    options.validate()?;
    let mut viewer = MapViewer::new(options.clone());
    render_viewer_to_image(&mut viewer, map, camera_from_world, width, height)
}

/// Like [`render_to_image`] but draws through an existing viewer, keeping
/// its camera pose and options.
pub fn render_viewer_to_image(
    viewer: &mut MapViewer,
    map: &Map,
    camera_from_world: &Se3,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(MapViewError::InvalidOption {
            name: "size",
            reason: format!("image size must be non-zero, got {width}x{height}"),
        });
    }

    let mut engine = RenderEngine::new_headless(width, height)
        .block_on()
        .map_err(|e| MapViewError::RenderError(format!("Failed to create headless engine: {e}")))?;

    viewer.set_viewport(width, height);
    let list = viewer.draw_map(map, camera_from_world, &MousePoseUpdate::NONE, true);
    log::debug!(
        "headless frame: {} points, {} lines",
        list.num_points(),
        list.num_lines()
    );
    engine
        .capture(list)
        .map_err(|e| MapViewError::RenderError(format!("Failed to capture frame: {e}")))
}

/// Renders one frame of `map` to a PNG or JPEG file.
///
/// # Example
/// ```no_run
/// use mapview::*;
///
/// let map = Map::from_json_file("map.json").unwrap();
/// render_to_file("map.png", &map, &Se3::IDENTITY, &ViewerOptions::default(), 800, 600).unwrap();
/// ```
pub fn render_to_file(
    path: impl AsRef<Path>,
    map: &Map,
    camera_from_world: &Se3,
    options: &ViewerOptions,
    width: u32,
    height: u32,
) -> Result<()> {
    let data = render_to_image(map, camera_from_world, options, width, height)?;
    mapview_render::save_image(path, &data, width, height)
        .map_err(|e| MapViewError::RenderError(format!("Failed to save image: {e}")))
}
