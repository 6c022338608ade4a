//! Per-frame rendering: map, status overlay and screenshots.

use mapview_render::{save_image, RenderError};
use mapview_ui::status_panel;

use super::App;

impl App {
    /// Renders a single frame.
    pub(super) fn render(&mut self) {
        let (Some(engine), Some(egui), Some(window)) =
            (&mut self.engine, &mut self.egui, &self.window)
        else {
            return;
        };

        let update = self.mouse.take();
        let list = match self.viewer.draw_shared(
            &self.map,
            &self.camera_pose,
            &update,
            true,
            self.toggles.updater,
        ) {
            Ok(list) => list,
            Err(e) => {
                log::error!("skipping frame: {e}");
                return;
            }
        };

        let output = match engine.acquire_frame() {
            Ok(output) => output,
            Err(RenderError::SurfaceLost | RenderError::SurfaceOutdated) => {
                // Surface was reconfigured, try again next frame
                return;
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("Out of memory");
                self.close_requested = true;
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render encoder"),
            });

        engine.encode_draw_list(&mut encoder, &view, list);

        let message = self.viewer.message_for_user();
        let toggles = self.toggles;
        let egui_output = egui.run(window, |ctx| status_panel(ctx, message, toggles));

        egui.paint(
            &engine.device,
            &engine.queue,
            &mut encoder,
            &view,
            [engine.width, engine.height],
            window.scale_factor() as f32,
            egui_output,
        );

        engine.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(filename) = self.screenshot_pending.take() {
            self.capture_screenshot(&filename);
        }
    }

    /// Re-renders the last frame offscreen and writes it to `filename`.
    fn capture_screenshot(&mut self, filename: &str) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let (width, height) = (engine.width, engine.height);
        match engine.capture(self.viewer.draw_list()) {
            Ok(pixels) => {
                if let Err(e) = save_image(filename, &pixels, width, height) {
                    log::error!("Failed to save screenshot: {e}");
                }
            }
            Err(e) => log::error!("Failed to capture screenshot: {e}"),
        }
    }
}
