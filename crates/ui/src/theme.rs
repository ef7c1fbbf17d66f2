use bevy::prelude::Color;
use bevy_egui::{egui, EguiContexts};

/// Converts a Bevy color to the egui color space for panel swatches.
pub fn egui_color(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
    )
}

pub fn apply_forest_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    // Dark green-slate background with an emerald accent
    let panel = egui::Color32::from_rgb(24, 34, 30);
    let inactive = egui::Color32::from_rgb(38, 52, 46);
    let hover = egui::Color32::from_rgb(54, 76, 66);
    let active = egui::Color32::from_rgb(16, 185, 129);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = active;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = active;

    style.visuals.window_fill = panel;
    style.visuals.panel_fill = panel;
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(18, 26, 23);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(30, 42, 37);

    // Selection highlight
    style.visuals.selection.bg_fill = active;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, active);

    // Rounded corners (egui 0.31+ uses CornerRadius with u8 values)
    let window_rounding = egui::CornerRadius::same(8);
    let widget_rounding = egui::CornerRadius::same(6);

    style.visuals.window_corner_radius = window_rounding;
    style.visuals.widgets.noninteractive.corner_radius = widget_rounding;
    style.visuals.widgets.inactive.corner_radius = widget_rounding;
    style.visuals.widgets.hovered.corner_radius = widget_rounding;
    style.visuals.widgets.active.corner_radius = widget_rounding;

    ctx.set_style(style);
}
