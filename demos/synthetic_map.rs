#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Demo showing a live map fed by a simulated tracker.
//!
//! A background thread plays the role of a SLAM system: it walks a camera
//! around a ring of landmarks, inserts a keyframe every few steps together
//! with a small dense patch, and marks the points it refines. The viewer
//! reads the same shared state every frame.
//!
//! Run with `cargo run --example synthetic_map`. Press `U` to watch the
//! refinement coloring and `D` to hide the dense patches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use mapview::{
    CameraPose, DenseCloud, DensePoint, KeyFrame, Map, MapPoint, Quat, Se3, SharedMap, Vec3,
    ViewerOptions,
};

const RING_RADIUS: f32 = 1.5;
const LANDMARKS: usize = 600;
const STEPS_PER_KEYFRAME: u32 = 20;

/// Simple deterministic pseudo-random number generator (xorshift32).
struct Rng(u32);

impl Rng {
    fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    /// Uniform in [-1, 1).
    fn next_signed(&mut self) -> f32 {
        (self.next_u32() as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Landmarks scattered on a noisy cylinder around the origin.
fn landmark(rng: &mut Rng, index: usize) -> MapPoint {
    let angle = index as f32 / LANDMARKS as f32 * std::f32::consts::TAU;
    let radius = RING_RADIUS + 0.4 + 0.1 * rng.next_signed();
    let position = Vec3::new(
        radius * angle.cos(),
        radius * angle.sin(),
        0.3 * rng.next_signed(),
    );
    MapPoint::new(position, (rng.next_u32() % 4) as usize)
}

/// Pose of a camera on the ring at `angle`, looking outward.
fn camera_from_world(angle: f32) -> Se3 {
    let center = Vec3::new(RING_RADIUS * angle.cos(), RING_RADIUS * angle.sin(), 0.0);
    // Camera z (forward) points away from the origin, camera y points down.
    let forward = center.normalize();
    let down = Vec3::new(0.0, 0.0, -1.0);
    let right = down.cross(forward);
    let world_from_camera_rot = Quat::from_mat3(&glam::Mat3::from_cols(right, down, forward));
    Se3::new(world_from_camera_rot, center).inverse()
}

/// A small colored patch in front of the keyframe, in keyframe coordinates.
fn dense_patch(rng: &mut Rng) -> Vec<DensePoint> {
    (0..200)
        .map(|_| {
            let x = 0.15 * rng.next_signed();
            let y = 0.1 * rng.next_signed();
            DensePoint {
                position: Vec3::new(x, y, 0.4 + 0.02 * rng.next_signed()),
                color: Vec3::new(0.5 + x * 3.0, 0.5 + y * 3.0, 0.8),
            }
        })
        .collect()
}

fn run_tracker(map: &SharedMap, camera_pose: &CameraPose, stop: &AtomicBool) {
    let mut rng = Rng(0x9e37_79b9);
    let mut step: u32 = 0;
    let mut next_landmark = 0;

    while !stop.load(Ordering::Relaxed) {
        let angle = step as f32 * 0.01;
        let pose = camera_from_world(angle);
        *camera_pose.write().expect("camera pose lock poisoned") = pose;

        {
            let mut map = map.write().expect("map lock poisoned");
            for point in &mut map.points {
                point.updated = false;
            }
            // reveal a few landmarks per step until the ring is complete
            for _ in 0..3 {
                if next_landmark < LANDMARKS {
                    map.points.push(landmark(&mut rng, next_landmark));
                    next_landmark += 1;
                }
            }
            // refine a handful of random points
            let count = map.points.len();
            for _ in 0..count.min(20) {
                let i = rng.next_u32() as usize % count;
                map.points[i].position += Vec3::splat(0.002 * rng.next_signed());
                map.points[i].updated = true;
            }

            if step % STEPS_PER_KEYFRAME == 0 {
                let mut keyframe = KeyFrame::new(pose);
                keyframe.color_tag = (map.keyframes.len() % 7) as i32;
                map.keyframes.push(keyframe);
                let keyframe_index = map.keyframes.len() - 1;
                let points = dense_patch(&mut rng);
                map.dense.clouds.push(DenseCloud {
                    keyframe_index,
                    points,
                });
                log::debug!("inserted keyframe {keyframe_index}");
            }
        }

        step += 1;
        thread::sleep(Duration::from_millis(30));
    }
}

fn main() {
    let mut map = Map::new();
    map.dense.enabled = true;
    let map = map.into_shared();
    let camera_pose: CameraPose = Arc::new(RwLock::new(Se3::IDENTITY));
    let stop = Arc::new(AtomicBool::new(false));

    let tracker = {
        let map = Arc::clone(&map);
        let camera_pose = Arc::clone(&camera_pose);
        let stop = Arc::clone(&stop);
        thread::spawn(move || run_tracker(&map, &camera_pose, &stop))
    };

    let options = ViewerOptions {
        window_title: "Synthetic SLAM map".to_string(),
        window_size: (1024, 768),
        show_grid: true,
        keyframe_tag_markers: true,
        fit_window_aspect: true,
        ..ViewerOptions::default()
    };
    let result = mapview::show(map, camera_pose, options);

    stop.store(true, Ordering::Relaxed);
    let _ = tracker.join();
    result.expect("viewer failed");
}
