//! UI layer for mapview using egui.

pub mod integration;
pub mod status;

pub use integration::EguiIntegration;
pub use status::{help_text, status_panel, ViewToggles};
