//! Window events: mouse navigation and key bindings.

use std::sync::Arc;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use mapview_core::MapViewError;
use mapview_render::RenderEngine;
use mapview_ui::EguiIntegration;

use super::App;

/// Wheel distance in pixels that counts as one line on touchpads.
const PIXELS_PER_LINE: f64 = 40.0;

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let options = self.viewer.options();
        let (width, height) = options.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(options.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(
                    event_loop,
                    MapViewError::RenderError(format!("failed to create window: {e}")),
                );
                return;
            }
        };

        let engine = match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(
                    event_loop,
                    MapViewError::RenderError(format!("failed to create render engine: {e}")),
                );
                return;
            }
        };

        let egui = EguiIntegration::new(&engine.device, engine.color_format(), &window);
        self.viewer.set_viewport(engine.width, engine.height);
        log::info!("viewer window open at {}x{}", engine.width, engine.height);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.egui = Some(egui);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Button state is tracked even when egui consumes the event, so a
        // release over the status panel does not leave a drag stuck.
        if let WindowEvent::MouseInput { state, button, .. } = &event {
            let pressed = *state == ElementState::Pressed;
            match button {
                MouseButton::Left => self.buttons.left = pressed,
                MouseButton::Right => self.buttons.right = pressed,
                MouseButton::Middle => self.buttons.middle = pressed,
                _ => {}
            }
        }

        let egui_consumed = if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            egui.handle_event(window, &event)
        } else {
            false
        };
        let egui_wants_pointer = self.egui.as_ref().is_some_and(EguiIntegration::wants_pointer);

        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
                self.viewer.set_viewport(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.mouse_pos {
                    if !self.buttons.is_empty() && !egui_wants_pointer {
                        self.mouse.drag(
                            self.buttons,
                            (position.x - last_x) as f32,
                            (position.y - last_y) as f32,
                        );
                    }
                }
                self.mouse_pos = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_pos = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !egui_consumed {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                    };
                    self.mouse.scroll(lines);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if egui_consumed || event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(code);
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

impl App {
    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Escape => self.close_requested = true,
            KeyCode::KeyG => {
                self.toggles.grid = !self.toggles.grid;
                self.viewer.options_mut().show_grid = self.toggles.grid;
            }
            KeyCode::KeyD => {
                self.toggles.dense = !self.toggles.dense;
                self.viewer.options_mut().show_dense = self.toggles.dense;
            }
            KeyCode::KeyU => self.toggles.updater = !self.toggles.updater,
            KeyCode::KeyR => {
                self.viewer.reset_view();
                let _ = self.mouse.take();
            }
            KeyCode::F12 => self.request_auto_screenshot(),
            _ => return,
        }
        log::debug!("key {code:?}, toggles now {:?}", self.toggles);
    }
}
