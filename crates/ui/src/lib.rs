use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod alerts_panel;
pub mod control_panel;
pub mod detail_panel;
pub mod error_banner;
pub mod knowledge_panel;
pub mod pes_panel;
pub mod theme;
mod widgets;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<pes_panel::PesPanelVisible>()
            .init_resource::<knowledge_panel::KnowledgePanelVisible>()
            .add_systems(Startup, theme::apply_forest_theme)
            .add_systems(
                Update,
                (
                    error_banner::error_banner_ui,
                    control_panel::control_panel_ui,
                    alerts_panel::alerts_panel_ui,
                ),
            )
            .add_systems(
                Update,
                (
                    detail_panel::detail_panel_ui,
                    pes_panel::pes_panel_ui,
                    knowledge_panel::knowledge_panel_ui,
                ),
            );
    }
}
