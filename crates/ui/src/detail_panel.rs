//! Floating detail window for the current map selection.
//!
//! Shows:
//! - Alert picks: severity, confidence, explanation, recommended action,
//!   and the evidence trail resolved against the live dataset
//! - Background picks: the raw satellite tile, sensor reading, or report
//!
//! Closing the window clears the selection.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use session::analysis::AnalysisSessions;
use session::forest::{
    Alert, ChangeType, ForestDataInput, Report, ReportCategory, SensorReading,
};
use session::selection::{BackgroundRef, Selection};

use crate::alerts_panel::{severity_color, threat_name};
use crate::widgets::{colored_stat_line, stat_line};

// =============================================================================
// Helpers
// =============================================================================

fn change_type_label(change: ChangeType) -> &'static str {
    match change {
        ChangeType::Fire => "Fire",
        ChangeType::Logging => "Logging",
        ChangeType::VegetationLoss => "Vegetation Loss",
        ChangeType::Unknown => "Unclassified",
    }
}

fn category_label(category: ReportCategory) -> &'static str {
    match category {
        ReportCategory::Logging => "Logging",
        ReportCategory::Fire => "Fire",
        ReportCategory::Encroachment => "Encroachment",
        ReportCategory::Wildlife => "Wildlife",
        ReportCategory::Other => "Other",
    }
}

/// Red when the value crosses its warning threshold, neutral otherwise.
fn metric_color(value: f64, warn_above: f64) -> egui::Color32 {
    if value > warn_above {
        egui::Color32::from_rgb(255, 60, 60)
    } else {
        egui::Color32::from_gray(220)
    }
}

/// Resolves an alert's cited input ids into one display line each.
fn evidence_lines(alert: &Alert, input: &ForestDataInput) -> Vec<String> {
    let mut lines = Vec::new();
    for id in &alert.supporting_evidence.satellite_ids {
        let line = input
            .satellite_tiles
            .iter()
            .find(|tile| &tile.id == id)
            .map(|tile| {
                format!(
                    "{id} · {} · risk {:.2}",
                    change_type_label(tile.change_type),
                    tile.risk_score
                )
            })
            .unwrap_or_else(|| format!("{id} · not in current dataset"));
        lines.push(line);
    }
    for id in &alert.supporting_evidence.sensor_ids {
        let line = input
            .sensor_readings
            .iter()
            .find(|sensor| &sensor.sensor_id == id)
            .map(|sensor| {
                format!(
                    "{id} · {:.1} °C · smoke {:.2}",
                    sensor.temperature, sensor.smoke_level
                )
            })
            .unwrap_or_else(|| format!("{id} · not in current dataset"));
        lines.push(line);
    }
    for id in &alert.supporting_evidence.report_ids {
        let line = input
            .reports
            .iter()
            .find(|report| &report.report_id == id)
            .map(|report| format!("{id} · {}", category_label(report.category)))
            .unwrap_or_else(|| format!("{id} · not in current dataset"));
        lines.push(line);
    }
    lines
}

// =============================================================================
// Panel system
// =============================================================================

/// Renders the detail window for the selected alert or background entity.
pub fn detail_panel_ui(
    mut contexts: EguiContexts,
    mut selection: ResMut<Selection>,
    sessions: Res<AnalysisSessions>,
    forest_input: Res<ForestDataInput>,
) {
    let picked = selection.clone();
    let mut open = true;

    // Window identity stays fixed while the title tracks the selection.
    let window_id = egui::Id::new("detail_panel");

    match picked {
        Selection::Alert(id) => {
            let Some(analysis) = sessions.forest.latest.as_ref() else {
                return;
            };
            let Some(alert) = analysis.alerts.iter().find(|alert| alert.id == id) else {
                return;
            };
            egui::Window::new(format!("{} Alert", threat_name(alert.kind)))
                .id(window_id)
                .open(&mut open)
                .resizable(false)
                .default_width(280.0)
                .show(contexts.ctx_mut(), |ui| {
                    render_alert(ui, alert, &forest_input);
                });
        }
        Selection::Background(BackgroundRef::Tile(id)) => {
            let Some(tile) = forest_input.satellite_tiles.iter().find(|t| t.id == id) else {
                return;
            };
            egui::Window::new("Satellite Tile")
                .id(window_id)
                .open(&mut open)
                .resizable(false)
                .default_width(280.0)
                .show(contexts.ctx_mut(), |ui| {
                    stat_line(ui, "Tile", &tile.id);
                    stat_line(ui, "Change Type", change_type_label(tile.change_type));
                    stat_line(ui, "Risk Score", &format!("{:.2}", tile.risk_score));
                    stat_line(ui, "Footprint", &format!("{} corners", tile.coordinates.len()));
                });
        }
        Selection::Background(BackgroundRef::Sensor(id)) => {
            let Some(sensor) = forest_input
                .sensor_readings
                .iter()
                .find(|s| s.sensor_id == id)
            else {
                return;
            };
            egui::Window::new("IoT Sensor Node")
                .id(window_id)
                .open(&mut open)
                .resizable(false)
                .default_width(280.0)
                .show(contexts.ctx_mut(), |ui| {
                    render_sensor(ui, sensor);
                });
        }
        Selection::Background(BackgroundRef::Report(id)) => {
            let Some(report) = forest_input.reports.iter().find(|r| r.report_id == id) else {
                return;
            };
            egui::Window::new("Community Report")
                .id(window_id)
                .open(&mut open)
                .resizable(false)
                .default_width(280.0)
                .show(contexts.ctx_mut(), |ui| {
                    render_report(ui, report);
                });
        }
        Selection::None | Selection::Incentive(_) => return,
    }

    if !open {
        *selection = Selection::None;
    }
}

// =============================================================================
// Rendering helpers
// =============================================================================

fn render_alert(ui: &mut egui::Ui, alert: &Alert, input: &ForestDataInput) {
    colored_stat_line(
        ui,
        "Severity",
        alert.severity.label(),
        severity_color(alert.severity),
    );
    stat_line(
        ui,
        "Confidence",
        &format!("{:.0}%", alert.confidence * 100.0),
    );
    stat_line(ui, "TWS", &format!("{:.3}", alert.threat_weight_score));
    stat_line(
        ui,
        "Location",
        &format!("({:.4}, {:.4})", alert.location.lat, alert.location.lng),
    );

    ui.separator();
    ui.label(
        egui::RichText::new(&alert.explanation)
            .size(11.0)
            .color(egui::Color32::from_gray(200)),
    );

    ui.strong("Recommended Action");
    ui.label(egui::RichText::new(&alert.recommended_action).size(11.0));

    let evidence = evidence_lines(alert, input);
    if !evidence.is_empty() {
        ui.separator();
        ui.label("Supporting Evidence:");
        for line in evidence {
            ui.label(
                egui::RichText::new(format!("  {line}"))
                    .size(10.0)
                    .monospace(),
            );
        }
    }
}

fn render_sensor(ui: &mut egui::Ui, sensor: &SensorReading) {
    stat_line(ui, "Sensor", &sensor.sensor_id);
    colored_stat_line(
        ui,
        "Temperature",
        &format!("{:.1} °C", sensor.temperature),
        metric_color(sensor.temperature, 40.0),
    );
    colored_stat_line(
        ui,
        "Smoke Level",
        &format!("{:.2}", sensor.smoke_level),
        metric_color(sensor.smoke_level, 0.5),
    );
    colored_stat_line(
        ui,
        "Noise",
        &format!("{:.0} dB", sensor.noise_level),
        metric_color(sensor.noise_level, 70.0),
    );
    stat_line(
        ui,
        "Location",
        &format!("({:.5}, {:.5})", sensor.location.lat, sensor.location.lng),
    );
    ui.small(&sensor.timestamp);
}

fn render_report(ui: &mut egui::Ui, report: &Report) {
    stat_line(ui, "Report", &report.report_id);
    stat_line(ui, "Category", category_label(report.category));
    ui.label(egui::RichText::new(format!("\"{}\"", report.description)).italics());
    if let Some(tags) = &report.image_tags {
        if !tags.is_empty() {
            ui.small(format!("Tags: {}", tags.join(", ")));
        }
    }
    ui.small(&report.timestamp);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use session::forest::{AlertKind, Severity, SupportingEvidence};
    use session::geo::GeoPoint;

    #[test]
    fn test_evidence_resolves_against_current_dataset() {
        let input = ForestDataInput::default();
        let alert = Alert {
            id: "a-1".to_string(),
            kind: AlertKind::Logging,
            severity: Severity::High,
            location: GeoPoint::new(-1.27, 36.81),
            confidence: 0.9,
            threat_weight_score: 0.6,
            explanation: String::new(),
            recommended_action: String::new(),
            supporting_evidence: SupportingEvidence {
                satellite_ids: vec!["ST-KRG-001".to_string()],
                sensor_ids: vec!["SN-KRG-A-01".to_string()],
                report_ids: vec!["REP-USR-XYZ".to_string(), "REP-GONE".to_string()],
            },
        };

        let lines = evidence_lines(&alert, &input);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Vegetation Loss"));
        assert!(lines[1].contains("32.1"));
        assert!(lines[2].contains("Logging"));
        assert!(lines[3].contains("not in current dataset"));
    }

    #[test]
    fn test_change_type_labels() {
        assert_eq!(change_type_label(ChangeType::VegetationLoss), "Vegetation Loss");
        assert_eq!(change_type_label(ChangeType::Unknown), "Unclassified");
    }

    #[test]
    fn test_metric_color_flags_threshold_breaches() {
        assert_eq!(metric_color(45.0, 40.0), egui::Color32::from_rgb(255, 60, 60));
        assert_eq!(metric_color(32.1, 40.0), egui::Color32::from_gray(220));
    }
}
