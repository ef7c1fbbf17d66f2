//! Bio-knowledge core window.
//!
//! Provides:
//! - Freeform ecosystem questions answered by the analysis backend
//! - Plant identification from a field photo on disk
//! - A static spotlight on flagship coastal species

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use session::analysis::{AnalysisRequest, AnalysisSessions};
use session::knowledge::PlantStatus;

use crate::widgets::colored_stat_line;

// =============================================================================
// Resources
// =============================================================================

/// Whether the knowledge window is visible.
#[derive(Resource, Default)]
pub struct KnowledgePanelVisible(pub bool);

// =============================================================================
// Helpers
// =============================================================================

const SPECIES_SPOTLIGHT: [(&str, &str); 3] = [
    (
        "Dugong",
        "Fewer than 250 remain in Kenyan waters, grazing the seagrass beds off Lamu.",
    ),
    (
        "Mkoko (Rhizophora mucronata)",
        "The backbone of Kenya's mangrove belts, anchoring shorelines and nursing fish.",
    ),
    (
        "Sokoke Scops Owl",
        "Africa's smallest owl, found almost nowhere outside Arabuko-Sokoke forest.",
    ),
];

fn status_color(status: PlantStatus) -> egui::Color32 {
    match status {
        PlantStatus::Invasive => egui::Color32::from_rgb(255, 60, 60),
        PlantStatus::Endangered => egui::Color32::from_rgb(240, 140, 40),
        PlantStatus::Native => egui::Color32::from_rgb(80, 200, 80),
        PlantStatus::Common => egui::Color32::from_gray(160),
    }
}

// =============================================================================
// Panel system
// =============================================================================

/// Renders the knowledge window: expert Q&A and plant identification.
pub fn knowledge_panel_ui(
    mut contexts: EguiContexts,
    mut visible: ResMut<KnowledgePanelVisible>,
    sessions: Res<AnalysisSessions>,
    mut requests: EventWriter<AnalysisRequest>,
    mut question: Local<String>,
    mut image_path: Local<String>,
) {
    if !visible.0 {
        return;
    }
    let mut open = true;

    egui::Window::new("Bio-Knowledge Core")
        .open(&mut open)
        .default_width(320.0)
        .show(contexts.ctx_mut(), |ui| {
            egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 6.0;

                // --- Ask the expert ---
                ui.label("Ask about Kenyan ecosystems:");
                ui.text_edit_multiline(&mut *question);
                let pending = sessions.knowledge.is_pending();
                let ask_label = if pending {
                    "Consulting..."
                } else {
                    "Ask the Expert"
                };
                let can_ask = !pending && !question.trim().is_empty();
                if ui
                    .add_enabled(can_ask, egui::Button::new(ask_label))
                    .clicked()
                {
                    requests.send(AnalysisRequest::Knowledge {
                        question: question.trim().to_string(),
                    });
                }

                if let Some(result) = sessions.knowledge.latest.as_ref() {
                    ui.label(egui::RichText::new(&result.answer).size(11.0));
                    if !result.related_species.is_empty() {
                        ui.label("Related Species:");
                        for species in &result.related_species {
                            ui.label(
                                egui::RichText::new(format!("  • {species}"))
                                    .size(11.0)
                                    .italics(),
                            );
                        }
                    }
                    if !result.suggested_actions.is_empty() {
                        ui.label("Suggested Actions:");
                        for action in &result.suggested_actions {
                            ui.label(egui::RichText::new(format!("  • {action}")).size(11.0));
                        }
                    }
                }

                ui.separator();

                // --- Plant identification ---
                ui.label("Identify a plant from a field photo:");
                ui.text_edit_singleline(&mut *image_path);
                ui.small("Path to a JPEG or PNG on disk");
                let plant_pending = sessions.plant.is_pending();
                let id_label = if plant_pending {
                    "Identifying..."
                } else {
                    "Identify Plant"
                };
                let can_identify = !plant_pending && !image_path.trim().is_empty();
                if ui
                    .add_enabled(can_identify, egui::Button::new(id_label))
                    .clicked()
                {
                    requests.send(AnalysisRequest::IdentifyPlant {
                        image_path: PathBuf::from(image_path.trim()),
                    });
                }

                if let Some(profile) = sessions.plant.latest.as_ref() {
                    ui.strong(&profile.common_name);
                    ui.label(
                        egui::RichText::new(&profile.scientific_name)
                            .size(11.0)
                            .italics(),
                    );
                    colored_stat_line(
                        ui,
                        "Status",
                        profile.status.label(),
                        status_color(profile.status),
                    );
                    ui.label(egui::RichText::new(&profile.health_assessment).size(11.0));
                    if !profile.preservation_actions.is_empty() {
                        ui.label("Preservation:");
                        for action in &profile.preservation_actions {
                            ui.label(egui::RichText::new(format!("  • {action}")).size(11.0));
                        }
                    }
                    if !profile.fun_fact.is_empty() {
                        ui.small(egui::RichText::new(&profile.fun_fact).italics());
                    }
                }

                ui.separator();

                // --- Species spotlight ---
                ui.label(egui::RichText::new("Species Spotlight").strong());
                for (name, blurb) in SPECIES_SPOTLIGHT {
                    ui.strong(name);
                    ui.label(
                        egui::RichText::new(blurb)
                            .size(11.0)
                            .color(egui::Color32::from_gray(190)),
                    );
                }
            });
        });

    if !open {
        visible.0 = false;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors_separate_invasive_from_native() {
        assert_eq!(
            status_color(PlantStatus::Invasive),
            egui::Color32::from_rgb(255, 60, 60)
        );
        assert_eq!(
            status_color(PlantStatus::Native),
            egui::Color32::from_rgb(80, 200, 80)
        );
        assert_ne!(
            status_color(PlantStatus::Endangered),
            status_color(PlantStatus::Common)
        );
    }
}
