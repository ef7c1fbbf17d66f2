//! Left-hand mission control sidebar.
//!
//! Provides:
//! - Demo scenario picker (regenerates the forest dataset)
//! - Threat analysis trigger and real-time feed toggle
//! - Map view mode, overlay toggles, and zoom reset
//! - Legend for the threat marker palette

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use map::layers::{self, LayerToggles, ViewMode};
use map::viewport::ResetViewRequest;
use session::analysis::{AnalysisRequest, AnalysisSessions};
use session::forest::{AlertKind, ForestDataInput};
use session::live_feed::LiveFeed;
use session::scenario::{self, ActiveScenario, Scenario};

use crate::knowledge_panel::KnowledgePanelVisible;
use crate::pes_panel::PesPanelVisible;
use crate::theme::egui_color;

// =============================================================================
// Systems
// =============================================================================

/// Renders the mission control sidebar.
#[allow(clippy::too_many_arguments)]
pub fn control_panel_ui(
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveScenario>,
    mut forest_input: ResMut<ForestDataInput>,
    sessions: Res<AnalysisSessions>,
    mut feed: ResMut<LiveFeed>,
    mut view_mode: ResMut<ViewMode>,
    mut toggles: ResMut<LayerToggles>,
    mut pes_visible: ResMut<PesPanelVisible>,
    mut knowledge_visible: ResMut<KnowledgePanelVisible>,
    mut requests: EventWriter<AnalysisRequest>,
    mut reset: EventWriter<ResetViewRequest>,
) {
    egui::SidePanel::left("control_panel")
        .default_width(230.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 8.0;

            ui.heading("ForestWatch Kenya");
            ui.label(
                egui::RichText::new("Environmental Intelligence Dashboard")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(140, 160, 150)),
            );

            ui.separator();

            // --- Scenario picker ---
            ui.label("Demo Scenario:");
            let mut choice = active.0;
            egui::ComboBox::from_id_salt("scenario_picker")
                .selected_text(choice.label())
                .width(180.0)
                .show_ui(ui, |ui| {
                    for &scenario in &Scenario::ALL {
                        ui.selectable_value(&mut choice, scenario, scenario.label());
                    }
                });
            if choice != active.0 {
                active.0 = choice;
                *forest_input = scenario::generate(choice);
            }

            // --- Threat analysis ---
            let pending = sessions.forest.is_pending();
            let run_label = if pending {
                "Analyzing..."
            } else {
                "Run Threat Analysis"
            };
            if ui
                .add_enabled(!pending, egui::Button::new(run_label))
                .clicked()
            {
                requests.send(AnalysisRequest::Forest);
            }

            // --- Real-time feed ---
            if feed.active {
                if ui.button("Stop Real-Time Feed").clicked() {
                    feed.stop();
                }
                ui.small("Streaming sensor updates every 3 s");
            } else if ui.button("Start Real-Time Feed").clicked() {
                feed.start();
            }

            ui.separator();

            // --- Map view ---
            ui.label("Map View:");
            ui.horizontal(|ui| {
                let all = *view_mode == ViewMode::All;
                if ui.selectable_label(all, "All Data").clicked() && !all {
                    *view_mode = ViewMode::All;
                }
                let alerts_only = *view_mode == ViewMode::AlertsOnly;
                if ui.selectable_label(alerts_only, "Alerts Only").clicked() && !alerts_only {
                    *view_mode = ViewMode::AlertsOnly;
                }
            });

            // Write back only on a real toggle; the label sync listens for changes.
            let mut heatmap = toggles.heatmap;
            if ui.checkbox(&mut heatmap, "Threat Heatmap").changed() {
                toggles.heatmap = heatmap;
            }
            let mut restoration = toggles.restoration;
            if ui.checkbox(&mut restoration, "Restoration Sites").changed() {
                toggles.restoration = restoration;
            }

            if ui.button("Reset Zoom").clicked() {
                reset.send(ResetViewRequest);
            }

            ui.separator();

            // --- Auxiliary panels ---
            ui.label("Panels:");
            ui.horizontal(|ui| {
                if ui.selectable_label(pes_visible.0, "PES Layer").clicked() {
                    pes_visible.0 = !pes_visible.0;
                }
                if ui.selectable_label(knowledge_visible.0, "Knowledge").clicked() {
                    knowledge_visible.0 = !knowledge_visible.0;
                }
            });

            ui.separator();

            // --- Legend ---
            egui::CollapsingHeader::new("Map Legend")
                .default_open(true)
                .show(ui, |ui| {
                    for kind in [
                        AlertKind::Fire,
                        AlertKind::Logging,
                        AlertKind::Encroachment,
                        AlertKind::Charcoal,
                        AlertKind::Drought,
                    ] {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new("●")
                                    .color(egui_color(layers::situation_color(kind))),
                            );
                            ui.label(
                                egui::RichText::new(layers::situation_label(kind)).size(11.0),
                            );
                        });
                    }
                });
        });
}
