//! Light blue palette and visuals.

use eframe::egui::{self, Color32};

pub const PAGE_BACKGROUND: Color32 = Color32::from_rgb(230, 239, 252);
pub const CARD_FILL: Color32 = Color32::WHITE;
pub const CARD_BORDER: Color32 = Color32::from_rgb(226, 232, 240);
pub const ACCENT: Color32 = Color32::from_rgb(30, 64, 175);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(37, 99, 235);
pub const TEXT_STRONG: Color32 = Color32::from_rgb(15, 23, 42);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);
pub const CELL_FILL: Color32 = Color32::from_rgb(248, 250, 252);
pub const CELL_BORDER: Color32 = Color32::from_rgb(209, 213, 219);
pub const RESULT_FILL: Color32 = Color32::from_rgb(239, 246, 255);
pub const NOT_FOUND_FILL: Color32 = Color32::from_rgb(254, 242, 242);
pub const NOT_FOUND_BORDER: Color32 = Color32::from_rgb(254, 202, 202);
pub const NOT_FOUND_TEXT: Color32 = Color32::from_rgb(185, 28, 28);
pub const SUCCESS_FILL: Color32 = Color32::from_rgb(220, 252, 231);
pub const SUCCESS_TEXT: Color32 = Color32::from_rgb(22, 101, 52);
pub const TOOLTIP_FILL: Color32 = Color32::from_rgba_premultiplied(241, 245, 249, 240);

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = PAGE_BACKGROUND;
    visuals.selection.bg_fill = ACCENT_SOFT;
    visuals.hyperlink_color = ACCENT_SOFT;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT_SOFT);
    ctx.set_visuals(visuals);
}
