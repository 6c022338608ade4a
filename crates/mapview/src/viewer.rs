//! The map viewer: turns a map snapshot into a frame of draw commands.

use glam::{Mat4, Vec3, Vec4};
use mapview_core::{
    format_vec3, keyframe_tag_color, level_color, mass_center, update_state_color, CameraPose,
    Map, MapViewError, MousePoseUpdate, PointColoring, Result, Se3, SharedMap, ViewerOptions,
};
use mapview_render::{DrawList, Primitive, ViewFrustum, ViewerCamera};

/// Length of the axes of a camera marker.
const AXIS_LENGTH: f32 = 0.1;

/// Half the extent of the ground cross under the live camera.
const CROSS_HALF_EXTENT: f32 = 0.04;

/// Edge length of the keyframe tag cube.
const TAG_CUBE_SIZE: f32 = 0.07;

/// Fine grid spacing; the coarse grid is ten times wider.
const GRID_INTERVAL: f32 = 0.1;

/// Grid lines on each side of the center line.
const GRID_HALF_LINES: i32 = 10;

const CROSS_LINE_WIDTH: f32 = 1.0;
const GRID_LINE_WIDTH: f32 = 1.0;

const WHITE: Vec3 = Vec3::ONE;
const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

fn opaque(color: Vec3) -> Vec4 {
    color.extend(1.0)
}

/// Draws a SLAM map through an orbiting virtual camera.
///
/// Each `draw_*` frame call consumes one mouse update, rebuilds the draw list
/// from scratch and rewrites the status message. The mass center used as the
/// orbit pivot is the one computed while drawing the previous frame's points.
pub struct MapViewer {
    options: ViewerOptions,
    camera: ViewerCamera,
    mass_center: Vec3,
    message: String,
    draw_list: DrawList,
}

impl MapViewer {
    /// Creates a viewer in the starting pose.
    #[must_use]
    pub fn new(options: ViewerOptions) -> Self {
        let camera = ViewerCamera::new(ViewFrustum::new(options.near, options.far));
        Self {
            options,
            camera,
            mass_center: Vec3::ZERO,
            message: String::new(),
            draw_list: DrawList::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Mutable options. Frustum distances are picked up by [`Self::apply_options`].
    pub fn options_mut(&mut self) -> &mut ViewerOptions {
        &mut self.options
    }

    /// Re-applies the frustum options to the camera.
    pub fn apply_options(&mut self) {
        self.camera.set_near(self.options.near);
        self.camera.set_far(self.options.far);
    }

    /// Tells the viewer the framebuffer size. Only affects the projection
    /// when `fit_window_aspect` is set.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if self.options.fit_window_aspect {
            self.camera.set_viewport(width, height);
        }
    }

    #[must_use]
    pub fn camera(&self) -> &ViewerCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ViewerCamera {
        &mut self.camera
    }

    /// Returns the camera to its starting pose.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        log::debug!("viewer camera reset");
    }

    /// Orbit pivot: mean of the map points near the origin.
    #[must_use]
    pub fn mass_center(&self) -> Vec3 {
        self.mass_center
    }

    /// The status line composed by the last frame.
    #[must_use]
    pub fn message_for_user(&self) -> &str {
        &self.message
    }

    /// The draw list built by the last frame.
    #[must_use]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Builds a frame: dense overlay, map points, the live camera and every
    /// keyframe, tinted by tag when tag markers are enabled.
    pub fn draw_map(
        &mut self,
        map: &Map,
        camera_from_world: &Se3,
        update: &MousePoseUpdate,
        draw_dense: bool,
    ) -> &DrawList {
        self.begin_frame(update);

        if draw_dense && self.options.show_dense && map.dense.enabled {
            self.draw_dense(map);
        }
        if self.options.show_grid {
            self.draw_grid();
        }
        self.draw_map_dots(map);
        self.draw_camera(camera_from_world, false);
        for keyframe in &map.keyframes {
            self.draw_camera_color(&keyframe.camera_from_world, true, keyframe.color_tag);
        }

        self.compose_message(map, camera_from_world);
        &self.draw_list
    }

    /// Builds a frame for watching map refinement: points colored by update
    /// state and plain keyframe markers, no dense overlay.
    pub fn draw_map_updater(
        &mut self,
        map: &Map,
        camera_from_world: &Se3,
        update: &MousePoseUpdate,
    ) -> &DrawList {
        self.begin_frame(update);

        if self.options.show_grid {
            self.draw_grid();
        }
        self.draw_points(map, PointColoring::ByUpdateState);
        self.draw_camera(camera_from_world, false);
        for keyframe in &map.keyframes {
            self.draw_camera(&keyframe.camera_from_world, true);
        }

        self.compose_message(map, camera_from_world);
        &self.draw_list
    }

    /// Read-locks the shared map and live pose, then builds a frame with
    /// [`Self::draw_map`] or [`Self::draw_map_updater`].
    pub fn draw_shared(
        &mut self,
        map: &SharedMap,
        camera_pose: &CameraPose,
        update: &MousePoseUpdate,
        draw_dense: bool,
        updater: bool,
    ) -> Result<&DrawList> {
        let camera_from_world = *camera_pose
            .read()
            .map_err(|_| MapViewError::LockPoisoned("camera pose"))?;
        let map = map.read().map_err(|_| MapViewError::LockPoisoned("map"))?;
        Ok(if updater {
            self.draw_map_updater(&map, &camera_from_world, update)
        } else {
            self.draw_map(&map, &camera_from_world, update, draw_dense)
        })
    }

    fn begin_frame(&mut self, update: &MousePoseUpdate) {
        self.message.clear();
        self.camera.apply_pose_update(update, self.mass_center);
        self.draw_list.clear(self.options.background_color);
    }

    fn compose_message(&mut self, map: &Map, camera_from_world: &Se3) {
        self.message = format!(
            " Map: {}P, {}KF   Camera Pos: {} ",
            map.points.len(),
            map.keyframes.len(),
            format_vec3(camera_from_world.inverse().translation, 4)
        );
    }

    /// Draws the map points in the configured coloring and recomputes the
    /// mass center.
    pub fn draw_map_dots(&mut self, map: &Map) {
        self.draw_points(map, self.options.point_coloring);
    }

    fn draw_points(&mut self, map: &Map, coloring: PointColoring) {
        let projection = self.camera.projection_matrix();
        let model_view = self.camera.view_matrix();
        let batch = self.draw_list.batch(
            Primitive::Points,
            projection,
            model_view,
            self.options.point_size,
        );
        batch.vertices.reserve(map.points.len());
        for point in &map.points {
            let color = match coloring {
                PointColoring::ByLevel => level_color(point.source_level),
                PointColoring::ByUpdateState => update_state_color(point.updated),
            };
            batch.point(point.position, opaque(color));
        }

        self.mass_center = mass_center(
            map.points.iter().map(|p| &p.position),
            self.options.mass_center_radius_sq,
        );
    }

    /// Draws each keyframe's dense cloud in that keyframe's frame, scaled by
    /// the dense map scale. The first keyframe never carries one.
    fn draw_dense(&mut self, map: &Map) {
        let projection = self.camera.projection_matrix();
        let scale = Mat4::from_scale(Vec3::splat(map.dense.scale));
        for (index, keyframe) in map.keyframes.iter().enumerate().skip(1) {
            let Some(cloud) = map.dense.cloud_for_keyframe(index) else {
                continue;
            };
            let model_view =
                self.camera.model_view(&keyframe.camera_from_world.inverse()) * scale;
            let batch = self.draw_list.batch(
                Primitive::Points,
                projection,
                model_view,
                self.options.point_size,
            );
            batch.vertices.reserve(cloud.points.len());
            for sample in &cloud.points {
                batch.point(sample.position, opaque(sample.color));
            }
        }
    }

    /// Draws a camera marker: red, green and white axes along the camera's
    /// x, y and z. A full-size marker also gets a cross on the ground plane
    /// under the camera.
    pub fn draw_camera(&mut self, camera_from_world: &Se3, small: bool) {
        let width = if small {
            self.options.keyframe_line_width
        } else {
            self.options.camera_line_width
        };
        let projection = self.camera.projection_matrix();
        let world_from_camera = camera_from_world.inverse();

        let axes = self.draw_list.batch(
            Primitive::Lines,
            projection,
            self.camera.model_view(&world_from_camera),
            width,
        );
        axes.line(Vec3::ZERO, Vec3::X * AXIS_LENGTH, opaque(RED));
        axes.line(Vec3::ZERO, Vec3::Y * AXIS_LENGTH, opaque(GREEN));
        axes.line(Vec3::ZERO, Vec3::Z * AXIS_LENGTH, opaque(WHITE));

        if !small {
            let (x, y) = (world_from_camera.translation.x, world_from_camera.translation.y);
            let h = CROSS_HALF_EXTENT;
            let cross = self.draw_list.batch(
                Primitive::Lines,
                projection,
                self.camera.view_matrix(),
                CROSS_LINE_WIDTH,
            );
            cross.line(
                Vec3::new(x - h, y + h, 0.0),
                Vec3::new(x + h, y - h, 0.0),
                opaque(WHITE),
            );
            cross.line(
                Vec3::new(x - h, y - h, 0.0),
                Vec3::new(x + h, y + h, 0.0),
                opaque(WHITE),
            );
        }
    }

    /// Draws a camera marker plus, with tag markers enabled, a wireframe cube
    /// in the tag's color.
    pub fn draw_camera_color(&mut self, camera_from_world: &Se3, small: bool, tag: i32) {
        self.draw_camera(camera_from_world, small);
        if !self.options.keyframe_tag_markers {
            return;
        }

        let width = if small {
            self.options.keyframe_line_width
        } else {
            self.options.camera_line_width
        };
        let projection = self.camera.projection_matrix();
        let model_view = self.camera.model_view(&camera_from_world.inverse());
        let color = opaque(keyframe_tag_color(tag));
        let cube = self
            .draw_list
            .batch(Primitive::Lines, projection, model_view, width);

        let h = TAG_CUBE_SIZE / 2.0;
        let corner = |i: u8| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        };
        // Edges join corners that differ in exactly one bit.
        for i in 0u8..8 {
            for bit in [1u8, 2, 4] {
                if i & bit == 0 {
                    cube.line(corner(i), corner(i | bit), color);
                }
            }
        }
    }

    /// Draws a reference grid in the world z = 0 plane: a coarse grid with
    /// 1.0 spacing, a fine grid with 0.1 spacing, center lines in white and
    /// the world axes.
    pub fn draw_grid(&mut self) {
        let grey_coarse = opaque(Vec3::splat(0.3));
        let grey_fine = opaque(Vec3::splat(0.5));
        let grid = self.draw_list.batch(
            Primitive::Lines,
            self.camera.projection_matrix(),
            self.camera.view_matrix(),
            GRID_LINE_WIDTH,
        );

        for (spacing, grey) in [
            (GRID_INTERVAL * 10.0, grey_coarse),
            (GRID_INTERVAL, grey_fine),
        ] {
            let extent = spacing * GRID_HALF_LINES as f32;
            for i in -GRID_HALF_LINES..=GRID_HALF_LINES {
                let color = if i == 0 { opaque(WHITE) } else { grey };
                let offset = i as f32 * spacing;
                grid.line(
                    Vec3::new(offset, -extent, 0.0),
                    Vec3::new(offset, extent, 0.0),
                    color,
                );
                grid.line(
                    Vec3::new(-extent, offset, 0.0),
                    Vec3::new(extent, offset, 0.0),
                    color,
                );
            }
        }

        grid.line(Vec3::ZERO, Vec3::X, opaque(RED));
        grid.line(Vec3::ZERO, Vec3::Y, opaque(GREEN));
        grid.line(Vec3::ZERO, Vec3::Z, opaque(WHITE));
    }
}

impl Default for MapViewer {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_cube_has_twelve_edges() {
        let options = ViewerOptions {
            keyframe_tag_markers: true,
            ..ViewerOptions::default()
        };
        let mut viewer = MapViewer::new(options);
        viewer.draw_list.clear(Vec3::ZERO);
        viewer.draw_camera_color(&Se3::IDENTITY, true, 3);
        // axes then cube
        assert_eq!(viewer.draw_list.batches.len(), 2);
        let cube = &viewer.draw_list.batches[1];
        assert_eq!(cube.element_count(), 12);
        assert_eq!(cube.vertices[0].color, [0.0, 0.0, 1.0, 1.0]);
        for v in &cube.vertices {
            for c in v.position {
                assert!((c.abs() - TAG_CUBE_SIZE / 2.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_large_camera_marker_adds_ground_cross() {
        let mut viewer = MapViewer::default();
        let camera_from_world = Se3::from_translation(Vec3::new(-1.0, -2.0, -3.0));
        viewer.draw_camera(&camera_from_world, false);
        assert_eq!(viewer.draw_list.batches.len(), 2);
        assert_eq!(viewer.draw_list.batches[0].size, 3.0);
        let cross = &viewer.draw_list.batches[1];
        assert_eq!(cross.element_count(), 2);
        // centered under the camera at (1, 2) in the z = 0 plane
        let mid = (Vec3::from(cross.vertices[0].position) + Vec3::from(cross.vertices[1].position))
            / 2.0;
        assert!(mid.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));
    }
}
