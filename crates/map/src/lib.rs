use bevy::prelude::*;

pub mod draw;
pub mod interaction;
pub mod labels;
pub mod layers;
pub mod project;
pub mod viewport;

#[cfg(test)]
mod integration_tests;

use layers::{LayerSet, LayerToggles, ViewMode};
use viewport::{ResetViewRequest, Viewport};

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .init_resource::<ViewMode>()
            .init_resource::<LayerToggles>()
            .init_resource::<LayerSet>()
            .add_event::<ResetViewRequest>()
            .add_systems(Startup, viewport::spawn_map_camera)
            .add_systems(
                Update,
                (
                    layers::clear_hidden_selection_on_mode_switch,
                    layers::rebuild_layer_set,
                    interaction::handle_map_clicks,
                    viewport::retarget_viewport,
                    viewport::animate_viewport,
                    viewport::apply_viewport_to_camera,
                )
                    .chain(),
            )
            // Gizmo submission order doubles as draw order, back to front.
            .add_systems(
                Update,
                (
                    draw::draw_boundary,
                    draw::draw_user_location,
                    draw::draw_heatmap,
                    draw::draw_program_markers,
                    draw::draw_restoration,
                    draw::draw_tiles,
                    draw::draw_reports,
                    draw::draw_sensors,
                    draw::draw_alerts,
                )
                    .chain()
                    .after(viewport::apply_viewport_to_camera),
            )
            .add_systems(
                Update,
                (labels::sync_labels, labels::scale_labels)
                    .chain()
                    .after(viewport::apply_viewport_to_camera),
            );
    }
}
