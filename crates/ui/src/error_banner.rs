//! Thin top strip surfacing analysis failures.
//!
//! Failures never clear results: the strip lists each failed operation's
//! message until a retry dispatches or succeeds.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use session::analysis::AnalysisSessions;

/// Collects one (operation, message) row per failed analysis.
pub fn failure_rows(sessions: &AnalysisSessions) -> Vec<(&'static str, &str)> {
    let mut rows = Vec::new();
    if let Some(message) = sessions.forest.error_message() {
        rows.push(("Forest threat analysis", message));
    }
    if let Some(message) = sessions.waste.error_message() {
        rows.push(("Waste flow analysis", message));
    }
    if let Some(message) = sessions.incentives.error_message() {
        rows.push(("PES opportunity generation", message));
    }
    if let Some(message) = sessions.knowledge.error_message() {
        rows.push(("Knowledge query", message));
    }
    if let Some(message) = sessions.plant.error_message() {
        rows.push(("Plant identification", message));
    }
    rows
}

/// Renders the failure strip across the top of the viewport.
pub fn error_banner_ui(mut contexts: EguiContexts, sessions: Res<AnalysisSessions>) {
    let rows = failure_rows(&sessions);
    if rows.is_empty() {
        return;
    }
    egui::TopBottomPanel::top("error_banner").show(contexts.ctx_mut(), |ui| {
        for (operation, message) in rows {
            ui.colored_label(
                egui::Color32::from_rgb(255, 60, 60),
                format!("{operation} failed: {message}"),
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rows_collects_only_failed_ops() {
        let mut sessions = AnalysisSessions::default();
        assert!(failure_rows(&sessions).is_empty());

        sessions.waste.fail_now("backend unreachable".to_string());
        let rows = failure_rows(&sessions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "Waste flow analysis");
        assert_eq!(rows[0].1, "backend unreachable");
    }

    #[test]
    fn test_failure_rows_orders_forest_first() {
        let mut sessions = AnalysisSessions::default();
        sessions.plant.fail_now("unreadable image".to_string());
        sessions.forest.fail_now("quota exceeded".to_string());

        let rows = failure_rows(&sessions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "Forest threat analysis");
        assert_eq!(rows[1].0, "Plant identification");
    }
}
