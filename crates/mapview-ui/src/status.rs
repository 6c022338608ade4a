//! Status bar shown under the map.

use egui::{Context, RichText, TopBottomPanel};

/// Display toggles reported in the help line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewToggles {
    pub grid: bool,
    pub dense: bool,
    pub updater: bool,
}

/// The key help line, with the current toggle states.
#[must_use]
pub fn help_text(toggles: ViewToggles) -> String {
    let on_off = |b: bool| if b { "on" } else { "off" };
    format!(
        "[G] grid: {}  [D] dense: {}  [U] updates: {}  [R] reset view  [F12] screenshot  [Esc] quit",
        on_off(toggles.grid),
        on_off(toggles.dense),
        on_off(toggles.updater),
    )
}

/// Draws the status message and the help line in a bottom panel.
pub fn status_panel(ctx: &Context, message: &str, toggles: ViewToggles) {
    TopBottomPanel::bottom("mapview_status").show(ctx, |ui| {
        ui.label(RichText::new(message).monospace());
        ui.label(RichText::new(help_text(toggles)).small().weak());
    });
}
