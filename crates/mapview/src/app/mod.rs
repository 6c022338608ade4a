//! Application window and event loop management.

mod input;
mod render;

use std::sync::Arc;

use winit::{
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use mapview_core::{
    CameraPose, DragButtons, MapViewError, MouseAccumulator, Result, SharedMap, ViewerOptions,
};
use mapview_render::RenderEngine;
use mapview_ui::{EguiIntegration, ViewToggles};

use crate::viewer::MapViewer;

/// The map viewer application state.
pub struct App {
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    egui: Option<EguiIntegration>,
    viewer: MapViewer,
    map: SharedMap,
    camera_pose: CameraPose,
    // Mouse state, tracked even while egui has the pointer
    mouse: MouseAccumulator,
    buttons: DragButtons,
    mouse_pos: Option<(f64, f64)>,
    toggles: ViewToggles,
    // Screenshot state
    screenshot_pending: Option<String>,
    screenshot_counter: u32,
    close_requested: bool,
    /// First unrecoverable error, reported by [`run_app`] after the loop exits.
    fatal_error: Option<MapViewError>,
}

impl App {
    /// Creates a new application viewing `map` from the tracker pose in `camera_pose`.
    pub fn new(map: SharedMap, camera_pose: CameraPose, options: ViewerOptions) -> Self {
        let mouse = MouseAccumulator::new(options.mouse_sensitivity, options.scroll_step);
        let toggles = ViewToggles {
            grid: options.show_grid,
            dense: options.show_dense,
            updater: false,
        };
        Self {
            window: None,
            engine: None,
            egui: None,
            viewer: MapViewer::new(options),
            map,
            camera_pose,
            mouse,
            buttons: DragButtons::default(),
            mouse_pos: None,
            toggles,
            screenshot_pending: None,
            screenshot_counter: 0,
            close_requested: false,
            fatal_error: None,
        }
    }

    /// Requests a screenshot with an auto-generated filename.
    pub fn request_auto_screenshot(&mut self) {
        let filename = format!("screenshot_{:04}.png", self.screenshot_counter);
        self.screenshot_counter += 1;
        self.screenshot_pending = Some(filename);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: MapViewError) {
        log::error!("{error}");
        self.fatal_error.get_or_insert(error);
        event_loop.exit();
    }
}

/// Runs the viewer until its window is closed.
pub fn run_app(map: SharedMap, camera_pose: CameraPose, options: ViewerOptions) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| MapViewError::RenderError(format!("failed to create event loop: {e}")))?;
    let mut app = App::new(map, camera_pose, options);

    event_loop
        .run_app(&mut app)
        .map_err(|e| MapViewError::RenderError(format!("event loop error: {e}")))?;

    match app.fatal_error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
