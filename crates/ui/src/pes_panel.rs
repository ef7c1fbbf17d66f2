//! PES & incentives layer window.
//!
//! Shows:
//! - Portfolio stats across all registered programs
//! - AI opportunity generation with a narrative banner
//! - One expandable card per program: readiness, payments, benefit sharing
//! - A marker popover that lives only while a program is selected on the map

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use session::analysis::{AnalysisRequest, AnalysisSessions};
use session::incentives::{normalize_benefit_sharing, PesProgram, PesProgramType, PesPrograms};
use session::restoration::{Partners, RestorationProjects};
use session::selection::Selection;

use crate::widgets::{gauge, stat_line};

// =============================================================================
// Resources
// =============================================================================

/// Whether the PES window is visible. Open on launch.
#[derive(Resource)]
pub struct PesPanelVisible(pub bool);

impl Default for PesPanelVisible {
    fn default() -> Self {
        Self(true)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn kind_label(kind: PesProgramType) -> &'static str {
    match kind {
        PesProgramType::Forest => "Forest Protection",
        PesProgramType::Waste => "Circular Economy",
    }
}

/// Gauge color for a 0..1 readiness score.
fn readiness_color(score: f64) -> egui::Color32 {
    if score >= 0.8 {
        egui::Color32::from_rgb(80, 200, 80)
    } else if score >= 0.5 {
        egui::Color32::from_rgb(220, 200, 50)
    } else {
        egui::Color32::from_rgb(255, 60, 60)
    }
}

/// Formats a KES amount for display.
fn fmt_kes(amount: f64) -> String {
    if amount.abs() >= 1_000_000.0 {
        format!("KES {:.1}M", amount / 1_000_000.0)
    } else if amount.abs() >= 1_000.0 {
        format!("KES {:.1}K", amount / 1_000.0)
    } else {
        format!("KES {:.0}", amount)
    }
}

/// Mean readiness across programs, 0.0 when none are registered.
fn average_readiness(programs: &[PesProgram]) -> f64 {
    if programs.is_empty() {
        return 0.0;
    }
    programs.iter().map(|p| p.readiness_score).sum::<f64>() / programs.len() as f64
}

// =============================================================================
// Panel system
// =============================================================================

/// Renders the PES window and the selected-marker popover.
#[allow(clippy::too_many_arguments)]
pub fn pes_panel_ui(
    mut contexts: EguiContexts,
    mut visible: ResMut<PesPanelVisible>,
    programs: Res<PesPrograms>,
    partners: Res<Partners>,
    projects: Res<RestorationProjects>,
    sessions: Res<AnalysisSessions>,
    selection: Res<Selection>,
    mut requests: EventWriter<AnalysisRequest>,
) {
    // Marker popover, alive only while an incentive stays selected.
    if let Some(id) = selection.selected_incentive_id() {
        if let Some(program) = programs.0.iter().find(|p| p.id == id) {
            egui::Window::new(&program.name)
                .id(egui::Id::new("pes_popover"))
                .resizable(false)
                .default_width(260.0)
                .anchor(egui::Align2::LEFT_BOTTOM, [250.0, -20.0])
                .show(contexts.ctx_mut(), |ui| {
                    render_program(ui, program, false);
                });
        }
    }

    if !visible.0 {
        return;
    }
    let mut open = true;

    egui::Window::new("PES & Incentives Layer")
        .open(&mut open)
        .default_width(340.0)
        .show(contexts.ctx_mut(), |ui| {
            egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 6.0;

                // --- Portfolio stats ---
                stat_line(ui, "Active Programs", &programs.0.len().to_string());
                stat_line(
                    ui,
                    "Avg Readiness",
                    &format!("{:.1}%", average_readiness(&programs.0) * 100.0),
                );
                let total_payout: f64 = programs
                    .0
                    .iter()
                    .map(|p| p.indicative_payment_per_period_kes)
                    .sum();
                stat_line(ui, "Indicative Payout", &fmt_kes(total_payout));

                // --- AI opportunity generation ---
                let pending = sessions.incentives.is_pending();
                let label = if pending {
                    "Generating..."
                } else {
                    "Generate AI Opportunities"
                };
                if ui.add_enabled(!pending, egui::Button::new(label)).clicked() {
                    requests.send(AnalysisRequest::Incentives);
                }

                let ai_ids: HashSet<&str> = sessions
                    .incentives
                    .latest
                    .as_ref()
                    .map(|insights| {
                        insights
                            .suggested_programs
                            .iter()
                            .map(|p| p.id.as_str())
                            .collect()
                    })
                    .unwrap_or_default();

                if let Some(insights) = sessions.incentives.latest.as_ref() {
                    if !insights.narrative_summary.is_empty() {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&insights.narrative_summary)
                                    .size(11.0)
                                    .italics(),
                            );
                        });
                    }
                }

                ui.separator();

                // --- Program cards ---
                for program in &programs.0 {
                    let selected =
                        selection.selected_incentive_id() == Some(program.id.as_str());
                    egui::CollapsingHeader::new(&program.name)
                        .id_salt(&program.id)
                        .default_open(selected)
                        .show(ui, |ui| {
                            render_program(ui, program, ai_ids.contains(program.id.as_str()));
                        });
                }

                ui.separator();

                // --- Ecosystem footer ---
                stat_line(ui, "Partners", &partners.0.len().to_string());
                stat_line(
                    ui,
                    "Restoration Projects",
                    &projects.0.len().to_string(),
                );
                let funded = projects
                    .0
                    .iter()
                    .filter(|p| p.incentives.pes_program_id.is_some())
                    .count();
                stat_line(ui, "PES-funded Projects", &funded.to_string());
            });
        });

    if !open {
        visible.0 = false;
    }
}

// =============================================================================
// Rendering helpers
// =============================================================================

fn render_program(ui: &mut egui::Ui, program: &PesProgram, ai_suggested: bool) {
    if ai_suggested {
        ui.label(
            egui::RichText::new("AI-suggested opportunity")
                .size(10.0)
                .color(egui::Color32::from_rgb(251, 191, 36)),
        );
    }
    stat_line(ui, "Type", kind_label(program.kind));
    stat_line(ui, "Location", &program.location_label);
    gauge(
        ui,
        "Readiness",
        program.readiness_score as f32,
        readiness_color(program.readiness_score),
    );
    stat_line(
        ui,
        "Readiness Score",
        &format!("{:.0}%", program.readiness_score * 100.0),
    );
    stat_line(
        ui,
        "Indicative Payment",
        &format!("{}/period", fmt_kes(program.indicative_payment_per_period_kes)),
    );

    if let Some(ha) = program.metrics.ha_monitored {
        stat_line(ui, "Hectares Monitored", &format!("{ha:.0}"));
    }
    if let Some(avoided) = program.metrics.forest_alerts_avoided {
        stat_line(ui, "Alerts Avoided", &format!("{avoided:.0}"));
    }
    if let Some(kg) = program.metrics.waste_diversion_kg {
        stat_line(ui, "Waste Diverted", &format!("{kg:.0} kg"));
    }
    if let Some(tons) = program.metrics.co2e_avoided_tons {
        stat_line(ui, "CO2e Avoided", &format!("{tons:.1} t"));
    }

    if !program.benefit_sharing.is_empty() {
        ui.label("  Benefit Sharing:");
        for share in normalize_benefit_sharing(&program.benefit_sharing) {
            ui.label(
                egui::RichText::new(format!(
                    "   {} · {:.0}%",
                    share.stakeholder, share.percentage
                ))
                .size(11.0),
            );
        }
    }

    let forest_links = program.linked_forest_area_ids.as_deref().unwrap_or_default();
    let waste_links = program.linked_waste_zone_ids.as_deref().unwrap_or_default();
    if forest_links.is_empty() && waste_links.is_empty() {
        ui.small("No direct asset links.");
    } else {
        let mut ids: Vec<&str> = forest_links.iter().map(String::as_str).collect();
        ids.extend(waste_links.iter().map(String::as_str));
        ui.small(format!("Linked assets: {}", ids.join(", ")));
    }

    if let Some(notes) = &program.notes {
        ui.small(egui::RichText::new(notes).italics());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_color_bands() {
        assert_eq!(readiness_color(0.85), egui::Color32::from_rgb(80, 200, 80));
        assert_eq!(readiness_color(0.6), egui::Color32::from_rgb(220, 200, 50));
        assert_eq!(readiness_color(0.3), egui::Color32::from_rgb(255, 60, 60));
    }

    #[test]
    fn test_fmt_kes_scales_units() {
        assert_eq!(fmt_kes(500.0), "KES 500");
        assert_eq!(fmt_kes(28_125.0), "KES 28.1K");
        assert_eq!(fmt_kes(600_000.0), "KES 600.0K");
        assert_eq!(fmt_kes(1_500_000.0), "KES 1.5M");
    }

    #[test]
    fn test_average_readiness_on_seed_portfolio() {
        let programs = PesPrograms::default();
        let avg = average_readiness(&programs.0);
        assert!((avg - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_average_readiness_empty_is_zero() {
        assert_eq!(average_readiness(&[]), 0.0);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(kind_label(PesProgramType::Forest), "Forest Protection");
        assert_eq!(kind_label(PesProgramType::Waste), "Circular Economy");
    }
}
