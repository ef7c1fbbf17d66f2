//! Small rendering helpers shared across panels.

use bevy_egui::egui;

/// Renders a label/value row with the value right-aligned.
pub(crate) fn stat_line(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(format!("  {label}:"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value);
        });
    });
}

/// Renders a label/value row with a colored right-aligned value.
pub(crate) fn colored_stat_line(
    ui: &mut egui::Ui,
    label: &str,
    value: &str,
    color: egui::Color32,
) {
    ui.horizontal(|ui| {
        ui.label(format!("  {label}:"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.colored_label(color, value);
        });
    });
}

/// Renders a thin horizontal gauge filled to `fraction` (0..1).
pub(crate) fn gauge(ui: &mut egui::Ui, label: &str, fraction: f32, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(format!("  {label}:"));
        let desired = egui::vec2(150.0, 14.0);
        let (rect, _) = ui.allocate_exact_size(desired, egui::Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, 2.0, egui::Color32::from_gray(40));
        let mut fill_rect = rect;
        fill_rect.set_right(rect.left() + rect.width() * fraction.clamp(0.0, 1.0));
        painter.rect_filled(fill_rect, 2.0, color);
    });
}
