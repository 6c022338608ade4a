//! Read-only view of the SLAM map.
//!
//! The map is produced and mutated by the tracking and mapping threads. The
//! viewer only ever takes a read lock on a [`SharedMap`] for the duration of a
//! frame, so these types are plain data with no behavior of their own beyond
//! lookups.

use std::path::Path;
use std::sync::{Arc, RwLock};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pose::Se3;

/// Points farther than this (squared distance from the origin) are left out of
/// the mass center so that a few diverged points cannot drag the orbit pivot.
pub const DEFAULT_MASS_CENTER_RADIUS_SQ: f32 = 10_000.0;

/// A map shared between the SLAM threads and the viewer.
pub type SharedMap = Arc<RwLock<Map>>;

/// The live tracker pose (`camera_from_world`), shared like the map.
pub type CameraPose = Arc<RwLock<Se3>>;

/// A triangulated landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Position in world coordinates.
    pub position: Vec3,
    /// Image pyramid level the point was first observed at.
    #[serde(default)]
    pub source_level: usize,
    /// Whether the point was refined by the last map update.
    #[serde(default)]
    pub updated: bool,
}

impl MapPoint {
    /// Creates a point observed at the given pyramid level.
    pub fn new(position: Vec3, source_level: usize) -> Self {
        Self {
            position,
            source_level,
            updated: false,
        }
    }
}

/// A keyframe pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    /// World-to-camera transform.
    pub camera_from_world: Se3,
    /// Producer-assigned tag, used to tint keyframe markers.
    #[serde(default)]
    pub color_tag: i32,
}

impl KeyFrame {
    /// Creates a keyframe with no tag.
    pub fn new(camera_from_world: Se3) -> Self {
        Self {
            camera_from_world,
            color_tag: 0,
        }
    }

    /// Camera center in world coordinates.
    pub fn position(&self) -> Vec3 {
        self.camera_from_world.inverse().translation
    }
}

/// One colored sample of a dense reconstruction, in keyframe coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DensePoint {
    pub position: Vec3,
    pub color: Vec3,
}

/// A dense reconstruction attached to one keyframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseCloud {
    /// Index into [`Map::keyframes`].
    pub keyframe_index: usize,
    pub points: Vec<DensePoint>,
}

/// All dense reconstructions known to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMap {
    /// Whether the dense producer is running.
    pub enabled: bool,
    /// Uniform scale applied to every dense cloud when drawn.
    pub scale: f32,
    pub clouds: Vec<DenseCloud>,
}

impl Default for DenseMap {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: 1.0,
            clouds: Vec::new(),
        }
    }
}

impl DenseMap {
    /// Returns the cloud registered for a keyframe.
    ///
    /// When a keyframe was reconstructed more than once the most recently
    /// registered cloud wins.
    pub fn cloud_for_keyframe(&self, keyframe_index: usize) -> Option<&DenseCloud> {
        self.clouds
            .iter()
            .rev()
            .find(|cloud| cloud.keyframe_index == keyframe_index)
    }

    /// Total number of dense samples.
    pub fn num_points(&self) -> usize {
        self.clouds.iter().map(|c| c.points.len()).sum()
    }
}

/// A snapshot of the SLAM map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub points: Vec<MapPoint>,
    pub keyframes: Vec<KeyFrame>,
    #[serde(default)]
    pub dense: DenseMap,
}

impl Map {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the map for sharing with the viewer.
    pub fn into_shared(self) -> SharedMap {
        Arc::new(RwLock::new(self))
    }

    /// Loads a recorded map snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let map: Map = serde_json::from_str(&text)?;
        log::info!(
            "loaded map from {}: {} points, {} keyframes",
            path.as_ref().display(),
            map.points.len(),
            map.keyframes.len()
        );
        Ok(map)
    }

    /// Writes the map snapshot to a JSON file.
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Mean of the point positions within `radius_sq` of the origin.
///
/// The divisor is biased by 0.1 so an empty selection yields the origin
/// instead of dividing by zero; with many points the bias is negligible.
pub fn mass_center<'a>(positions: impl IntoIterator<Item = &'a Vec3>, radius_sq: f32) -> Vec3 {
    let (sum, count) = positions
        .into_iter()
        .filter(|p| p.length_squared() < radius_sq)
        .fold((Vec3::ZERO, 0usize), |(sum, count), p| (sum + *p, count + 1));
    sum / (0.1 + count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_mass_center_empty_is_origin() {
        let points: Vec<Vec3> = Vec::new();
        assert_eq!(mass_center(&points, DEFAULT_MASS_CENTER_RADIUS_SQ), Vec3::ZERO);
    }

    #[test]
    fn test_mass_center_biased_mean() {
        let points = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)];
        let c = mass_center(&points, DEFAULT_MASS_CENTER_RADIUS_SQ);
        assert!((c.x - 4.0 / 2.1).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn test_mass_center_ignores_outliers() {
        let points = vec![Vec3::new(2.0, 2.0, 2.0), Vec3::new(100.0, 0.0, 0.0)];
        // |(100,0,0)|^2 == 10000 is not strictly below the radius
        let c = mass_center(&points, DEFAULT_MASS_CENTER_RADIUS_SQ);
        assert!(c.abs_diff_eq(Vec3::splat(2.0 / 1.1), 1e-6));
    }

    #[test]
    fn test_cloud_for_keyframe_prefers_latest() {
        let dense = DenseMap {
            enabled: true,
            scale: 1.0,
            clouds: vec![
                DenseCloud {
                    keyframe_index: 2,
                    points: vec![],
                },
                DenseCloud {
                    keyframe_index: 2,
                    points: vec![DensePoint {
                        position: Vec3::ONE,
                        color: Vec3::X,
                    }],
                },
            ],
        };
        let cloud = dense.cloud_for_keyframe(2).expect("cloud registered");
        assert_eq!(cloud.points.len(), 1);
        assert!(dense.cloud_for_keyframe(1).is_none());
        assert_eq!(dense.num_points(), 1);
    }

    #[test]
    fn test_keyframe_position_is_camera_center() {
        let kf = KeyFrame::new(Se3::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        assert!(kf.position().abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_map_json_defaults() {
        let json = r#"{
            "points": [{"position": [0.0, 1.0, 2.0]}],
            "keyframes": []
        }"#;
        let map: Map = serde_json::from_str(json).expect("valid map json");
        assert_eq!(map.points[0].source_level, 0);
        assert!(!map.points[0].updated);
        assert!(!map.dense.enabled);
        assert_eq!(map.dense.scale, 1.0);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let path = std::env::temp_dir().join("mapview_map_test.json");
        let mut map = Map::new();
        map.points.push(MapPoint::new(Vec3::new(0.5, -1.0, 2.0), 2));
        map.points[0].updated = true;
        let mut keyframe = KeyFrame::new(Se3::new(
            Quat::from_rotation_y(0.3),
            Vec3::new(0.0, 0.1, -1.0),
        ));
        keyframe.color_tag = 4;
        map.keyframes.push(keyframe);
        map.dense.enabled = true;
        map.dense.clouds.push(DenseCloud {
            keyframe_index: 0,
            points: vec![DensePoint {
                position: Vec3::Z,
                color: Vec3::new(0.2, 0.4, 0.6),
            }],
        });

        map.save_json_file(&path).expect("write map");
        let loaded = Map::from_json_file(&path).expect("read map");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.points, map.points);
        assert_eq!(loaded.dense, map.dense);
        assert_eq!(loaded.keyframes.len(), 1);
        assert_eq!(loaded.keyframes[0].color_tag, 4);
        assert!(loaded.keyframes[0]
            .camera_from_world
            .abs_diff_eq(&keyframe.camera_from_world, 1e-6));
    }

    #[test]
    fn test_loaded_keyframe_rotation_is_normalized() {
        let json = r#"{
            "points": [],
            "keyframes": [{"camera_from_world": {"rotation": [0.0, 0.0, 0.0, 2.0], "translation": [1.0, 0.0, 0.0]}}]
        }"#;
        let path = std::env::temp_dir().join("mapview_map_scaled_rotation.json");
        std::fs::write(&path, json).expect("write map");
        let map = Map::from_json_file(&path).expect("read map");
        let _ = std::fs::remove_file(&path);

        let kf = &map.keyframes[0];
        assert!(kf.position().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
        let p = Vec3::new(0.1, 0.0, 0.0);
        let back = kf.camera_from_world.inverse() * (kf.camera_from_world * p);
        assert!(back.abs_diff_eq(p, 1e-6));
    }

    #[test]
    fn test_degenerate_keyframe_rotation_is_rejected() {
        let json = r#"{
            "points": [],
            "keyframes": [{"camera_from_world": {"rotation": [0.0, 0.0, 0.0, 0.0], "translation": [1.0, 0.0, 0.0]}}]
        }"#;
        let err = serde_json::from_str::<Map>(json).unwrap_err();
        assert!(err.to_string().contains("not a valid quaternion"));
    }
}
