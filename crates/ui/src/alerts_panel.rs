//! Right-hand results sidebar.
//!
//! Displays:
//! - Detected threats, ordered most urgent first, with click-to-focus
//! - The AI risk summary for the latest forest analysis
//! - The circular economy hub: waste flow analysis and market prices

use std::cmp::Ordering;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use session::analysis::{AnalysisRequest, AnalysisSessions};
use session::forest::{Alert, AlertKind, Severity};
use session::selection::Selection;
use session::waste::{FraudRiskLevel, PriceTrend, WasteDataInput};

use crate::widgets::{colored_stat_line, gauge, stat_line};

// =============================================================================
// Helpers
// =============================================================================

/// Short threat name used in list rows and window titles.
pub fn threat_name(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Fire => "Fire",
        AlertKind::Logging => "Illegal Logging",
        AlertKind::Encroachment => "Encroachment",
        AlertKind::Charcoal => "Charcoal Burning",
        AlertKind::Drought => "Drought Stress",
        AlertKind::Unknown => "Unknown Anomaly",
    }
}

/// Badge color for a severity grade.
pub fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Critical => egui::Color32::from_rgb(255, 60, 60),
        Severity::High => egui::Color32::from_rgb(240, 140, 40),
        Severity::Moderate => egui::Color32::from_rgb(220, 200, 50),
        Severity::Low => egui::Color32::from_rgb(80, 200, 80),
    }
}

fn fraud_color(level: FraudRiskLevel) -> egui::Color32 {
    match level {
        FraudRiskLevel::Low => egui::Color32::from_rgb(80, 200, 80),
        FraudRiskLevel::Medium => egui::Color32::from_rgb(220, 200, 50),
        FraudRiskLevel::High => egui::Color32::from_rgb(255, 60, 60),
    }
}

fn efficiency_color(score: f64) -> egui::Color32 {
    if score >= 80.0 {
        egui::Color32::from_rgb(80, 200, 80)
    } else if score >= 50.0 {
        egui::Color32::from_rgb(220, 200, 50)
    } else {
        egui::Color32::from_rgb(255, 60, 60)
    }
}

fn trend_glyph(trend: PriceTrend) -> &'static str {
    match trend {
        PriceTrend::Up => "▲",
        PriceTrend::Down => "▼",
        PriceTrend::Stable => "→",
    }
}

fn trend_color(trend: PriceTrend) -> egui::Color32 {
    match trend {
        PriceTrend::Up => egui::Color32::from_rgb(80, 200, 80),
        PriceTrend::Down => egui::Color32::from_rgb(255, 60, 60),
        PriceTrend::Stable => egui::Color32::from_gray(160),
    }
}

/// Orders alerts most urgent first: severity grade, then threat weight.
pub fn sorted_by_priority(alerts: &[Alert]) -> Vec<&Alert> {
    let mut rows: Vec<&Alert> = alerts.iter().collect();
    rows.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then(
            b.threat_weight_score
                .partial_cmp(&a.threat_weight_score)
                .unwrap_or(Ordering::Equal),
        )
    });
    rows
}

// =============================================================================
// Panel system
// =============================================================================

/// Renders the threats list, risk summary, and circular economy hub.
pub fn alerts_panel_ui(
    mut contexts: EguiContexts,
    sessions: Res<AnalysisSessions>,
    waste_input: Res<WasteDataInput>,
    mut selection: ResMut<Selection>,
    mut requests: EventWriter<AnalysisRequest>,
) {
    egui::SidePanel::right("alerts_panel")
        .default_width(320.0)
        .show(contexts.ctx_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 6.0;

                // Assign only on a click so the selection is not flagged as
                // changed every frame.
                if let Some(id) = render_threats(ui, &sessions, &selection) {
                    *selection = Selection::Alert(id);
                }
                ui.separator();
                render_summary(ui, &sessions);
                ui.separator();
                render_waste_hub(ui, &sessions, &waste_input, &mut requests);
            });
        });
}

// =============================================================================
// Rendering helpers
// =============================================================================

/// Renders the threat list. Returns the id of a newly clicked alert.
fn render_threats(
    ui: &mut egui::Ui,
    sessions: &AnalysisSessions,
    selection: &Selection,
) -> Option<String> {
    let alert_count = sessions
        .forest
        .latest
        .as_ref()
        .map_or(0, |analysis| analysis.alerts.len());
    ui.heading(format!("Detected Threats ({alert_count})"));

    if sessions.forest.is_pending() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Analyzing forest data...");
        });
        return None;
    }

    let Some(analysis) = sessions.forest.latest.as_ref() else {
        ui.small("Run a threat analysis to populate this list.");
        return None;
    };

    if analysis.alerts.is_empty() {
        ui.small("No threats detected.");
        return None;
    }

    let mut clicked = None;
    for alert in sorted_by_priority(&analysis.alerts) {
        let selected = selection.selected_alert_id() == Some(alert.id.as_str());
        let title = format!("{} · {}", alert.severity.label(), threat_name(alert.kind));
        let response = ui.selectable_label(
            selected,
            egui::RichText::new(title)
                .strong()
                .color(severity_color(alert.severity)),
        );
        ui.label(
            egui::RichText::new(format!(
                "({:.4}, {:.4})   TWS: {:.3}",
                alert.location.lat, alert.location.lng, alert.threat_weight_score
            ))
            .size(11.0)
            .color(egui::Color32::from_gray(170)),
        );
        if response.clicked() && !selected {
            clicked = Some(alert.id.clone());
        }
        ui.add_space(2.0);
    }
    clicked
}

fn render_summary(ui: &mut egui::Ui, sessions: &AnalysisSessions) {
    let Some(analysis) = sessions.forest.latest.as_ref() else {
        return;
    };
    let summary = &analysis.summary;

    ui.heading("Analysis Summary");
    colored_stat_line(
        ui,
        "Overall Risk",
        summary.overall_forest_risk.label(),
        severity_color(summary.overall_forest_risk),
    );

    if !summary.key_hotspots.is_empty() {
        ui.label("  Key Hotspots:");
        for hotspot in &summary.key_hotspots {
            ui.label(egui::RichText::new(format!("   • {hotspot}")).size(11.0));
        }
    }
    if !summary.notable_patterns.is_empty() {
        ui.label("  Notable Patterns:");
        ui.label(
            egui::RichText::new(format!("   {}", summary.notable_patterns))
                .size(11.0)
                .color(egui::Color32::from_gray(190)),
        );
    }
    if !summary.recommended_priority_zones.is_empty() {
        ui.label("  Priority Zones:");
        for zone in &summary.recommended_priority_zones {
            ui.label(egui::RichText::new(format!("   • {zone}")).size(11.0));
        }
    }
    if !analysis.timestamp.is_empty() {
        ui.small(format!("Updated {}", analysis.timestamp));
    }
}

fn render_waste_hub(
    ui: &mut egui::Ui,
    sessions: &AnalysisSessions,
    waste_input: &WasteDataInput,
    requests: &mut EventWriter<AnalysisRequest>,
) {
    ui.heading("Circular Economy Hub");

    let pending = sessions.waste.is_pending();
    let label = if pending {
        "Analyzing..."
    } else {
        "Analyze Waste Flow"
    };
    if ui.add_enabled(!pending, egui::Button::new(label)).clicked() {
        requests.send(AnalysisRequest::Waste);
    }

    if let Some(response) = sessions.waste.latest.as_ref() {
        let summary = &response.summary;
        gauge(
            ui,
            "Efficiency",
            (summary.efficiency_score / 100.0) as f32,
            efficiency_color(summary.efficiency_score),
        );
        stat_line(
            ui,
            "Efficiency Score",
            &format!("{:.0} / 100", summary.efficiency_score),
        );
        colored_stat_line(
            ui,
            "Fraud Risk",
            summary.fraud_risk_level.label(),
            fraud_color(summary.fraud_risk_level),
        );
        stat_line(
            ui,
            "Economic Value",
            &format!("KES {:.0}", summary.economic_value_generated),
        );
        stat_line(
            ui,
            "Carbon Offset",
            &format!("{:.2} t CO2e", summary.carbon_offset_tonnes),
        );
        if !summary.suggested_route_optimization.is_empty() {
            ui.label("  Route Optimization:");
            ui.label(
                egui::RichText::new(format!("   {}", summary.suggested_route_optimization))
                    .size(11.0)
                    .color(egui::Color32::from_gray(190)),
            );
        }
        if !response.actionable_insights.is_empty() {
            ui.label("  Actionable Insights:");
            for insight in &response.actionable_insights {
                ui.label(egui::RichText::new(format!("   • {insight}")).size(11.0));
            }
        }
    }

    // --- Market prices (live input, not analysis output) ---
    if !waste_input.market_prices.is_empty() {
        ui.add_space(4.0);
        ui.label("Market Prices:");
        for price in &waste_input.market_prices {
            ui.horizontal(|ui| {
                ui.label(format!("  {}", price.material.label()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(trend_color(price.trend), trend_glyph(price.trend));
                    ui.label(format!("{} {:.0}/kg", price.currency, price.price_per_kg));
                });
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use session::forest::SupportingEvidence;
    use session::geo::GeoPoint;

    fn alert(id: &str, severity: Severity, tws: f64) -> Alert {
        Alert {
            id: id.to_string(),
            kind: AlertKind::Fire,
            severity,
            location: GeoPoint::new(-1.0, 37.0),
            confidence: 0.9,
            threat_weight_score: tws,
            explanation: String::new(),
            recommended_action: String::new(),
            supporting_evidence: SupportingEvidence::default(),
        }
    }

    #[test]
    fn test_sort_puts_critical_before_high() {
        let alerts = vec![
            alert("a", Severity::High, 0.9),
            alert("b", Severity::Critical, 0.7),
        ];
        let rows = sorted_by_priority(&alerts);
        assert_eq!(rows[0].id, "b");
        assert_eq!(rows[1].id, "a");
    }

    #[test]
    fn test_sort_breaks_severity_ties_by_weight() {
        let alerts = vec![
            alert("light", Severity::High, 0.50),
            alert("heavy", Severity::High, 0.65),
        ];
        let rows = sorted_by_priority(&alerts);
        assert_eq!(rows[0].id, "heavy");
    }

    #[test]
    fn test_threat_names_cover_every_kind() {
        assert_eq!(threat_name(AlertKind::Logging), "Illegal Logging");
        assert_eq!(threat_name(AlertKind::Unknown), "Unknown Anomaly");
    }

    #[test]
    fn test_severity_badge_colors_escalate() {
        assert_ne!(
            severity_color(Severity::Low),
            severity_color(Severity::Critical)
        );
    }

    #[test]
    fn test_trend_glyphs() {
        assert_eq!(trend_glyph(PriceTrend::Up), "▲");
        assert_eq!(trend_glyph(PriceTrend::Down), "▼");
        assert_eq!(trend_glyph(PriceTrend::Stable), "→");
    }
}
