//! Configuration options for the map viewer.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MapViewError, Result};
use crate::input::{DEFAULT_MOUSE_SENSITIVITY, DEFAULT_SCROLL_STEP};
use crate::map::DEFAULT_MASS_CENTER_RADIUS_SQ;

/// How map points are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointColoring {
    /// By the pyramid level the point was first observed at.
    #[default]
    ByLevel,
    /// Green if refined by the last map update, red otherwise.
    ByUpdateState,
}

/// Viewer options.
///
/// Every field has a default, so a JSON file only needs to list what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerOptions {
    /// Window title.
    pub window_title: String,

    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),

    /// Framebuffer clear color.
    pub background_color: Vec3,

    /// Map point diameter in pixels.
    pub point_size: f32,

    /// Line width of the live camera marker in pixels.
    pub camera_line_width: f32,

    /// Line width of keyframe markers in pixels.
    pub keyframe_line_width: f32,

    /// Near clipping distance of the viewer frustum.
    pub near: f32,

    /// Far clipping distance of the viewer frustum.
    pub far: f32,

    /// Follow the window aspect ratio instead of the fixed 4:3 frustum.
    pub fit_window_aspect: bool,

    /// Radians per pixel of mouse drag.
    pub mouse_sensitivity: f32,

    /// Dolly distance per scroll-wheel line.
    pub scroll_step: f32,

    /// Squared radius around the origin of points counted in the mass center.
    pub mass_center_radius_sq: f32,

    /// Draw the reference grid in the z = 0 plane.
    pub show_grid: bool,

    /// Draw dense reconstructions when the map provides them.
    pub show_dense: bool,

    /// Draw a small cube in the tag color on each keyframe marker.
    pub keyframe_tag_markers: bool,

    /// Point coloring mode.
    pub point_coloring: PointColoring,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            window_title: "Map Viewer".to_string(),
            window_size: (640, 480),
            background_color: Vec3::ZERO,
            point_size: 3.0,
            camera_line_width: 3.0,
            keyframe_line_width: 1.0,
            near: 0.03,
            far: 50.0,
            fit_window_aspect: false,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            scroll_step: DEFAULT_SCROLL_STEP,
            mass_center_radius_sq: DEFAULT_MASS_CENTER_RADIUS_SQ,
            show_grid: false,
            show_dense: true,
            keyframe_tag_markers: false,
            point_coloring: PointColoring::ByLevel,
        }
    }
}

impl ViewerOptions {
    /// Parses options from a JSON string and validates them.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&text)?;
        log::info!("loaded viewer options from {}", path.display());
        Ok(options)
    }

    /// Writes options to a JSON file.
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Checks value ranges.
    ///
    /// Comparisons are negated so that NaN fails them.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(invalid("window_size", "both dimensions must be non-zero"));
        }
        if !(self.near > 0.0) {
            return Err(invalid("near", format!("{} must be positive", self.near)));
        }
        if !(self.far > self.near) {
            return Err(invalid(
                "far",
                format!("{} must exceed near ({})", self.far, self.near),
            ));
        }
        for (name, value) in [
            ("point_size", self.point_size),
            ("camera_line_width", self.camera_line_width),
            ("keyframe_line_width", self.keyframe_line_width),
        ] {
            if !(value > 0.0) {
                return Err(invalid(name, format!("{value} must be positive")));
            }
        }
        if !(self.mass_center_radius_sq > 0.0) {
            return Err(invalid("mass_center_radius_sq", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> MapViewError {
    MapViewError::InvalidOption {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = ViewerOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.point_size, 3.0);
        assert_eq!(options.near, 0.03);
        assert_eq!(options.far, 50.0);
        assert_eq!(options.point_coloring, PointColoring::ByLevel);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = ViewerOptions::from_json_str(r#"{ "show_grid": true, "point_size": 5.0 }"#)
            .expect("valid options");
        assert!(options.show_grid);
        assert_eq!(options.point_size, 5.0);
        assert_eq!(options.keyframe_line_width, 1.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ViewerOptions::from_json_str(r#"{ "show_gird": true }"#).unwrap_err();
        assert!(matches!(err, MapViewError::JsonError(_)));
    }

    #[test]
    fn test_invalid_frustum_rejected() {
        let err = ViewerOptions::from_json_str(r#"{ "near": 1.0, "far": 0.5 }"#).unwrap_err();
        assert!(matches!(err, MapViewError::InvalidOption { name: "far", .. }));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let path = std::env::temp_dir().join("mapview_options_test.json");
        let options = ViewerOptions {
            point_coloring: PointColoring::ByUpdateState,
            ..ViewerOptions::default()
        };
        options.save_json_file(&path).expect("write options");
        let loaded = ViewerOptions::from_json_file(&path).expect("read options");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, options);
    }
}
