//! Click picking on the map. The cursor is unprojected through the camera
//! into map space, then tested against marker layers front-to-back.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use session::analysis::AnalysisSessions;
use session::forest::{Alert, ForestDataInput};
use session::incentives::PesPrograms;
use session::selection::{BackgroundRef, Selection};

use crate::layers::ViewMode;
use crate::project::{self, point_in_polygon, project_point};
use crate::viewport::{MapCamera, Viewport};

/// Hit radii in screen pixels, matched to the drawn marker sizes.
const ALERT_PICK_PX: f32 = 12.0;
const SENSOR_PICK_PX: f32 = 8.0;
const REPORT_PICK_PX: f32 = 10.0;
const PROGRAM_PICK_PX: f32 = 12.0;

/// Returns `true` when egui wants the pointer, i.e. the cursor is over a
/// panel or egui is mid-drag. Map picking skips those clicks.
fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
}

/// Left-click picking. Resolves the cursor into map space and replaces the
/// current selection with whatever sits under it.
#[allow(clippy::too_many_arguments)]
pub fn handle_map_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    mut contexts: EguiContexts,
    viewport: Res<Viewport>,
    view_mode: Res<ViewMode>,
    forest_input: Res<ForestDataInput>,
    sessions: Res<AnalysisSessions>,
    programs: Res<PesPrograms>,
    mut selection: ResMut<Selection>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, cam_transform)) = camera_q.get_single() else {
        return;
    };
    // Prevent click-through: skip picking when egui is handling the pointer.
    if egui_wants_pointer(&mut contexts) {
        return;
    }
    let Some(screen_pos) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(cam_transform, screen_pos) else {
        return;
    };

    let click = project::world_to_map(world_pos);
    let picked = pick(
        click,
        viewport.current.scale,
        *view_mode,
        &forest_input,
        &sessions,
        &programs,
    );
    if *selection != picked {
        let geo = project::unproject(click);
        debug!(lat = geo.lat, lng = geo.lng, "map click selected {picked:?}");
        *selection = picked;
    }
}

/// What a click at `click` (map space) selects at the given zoom. Layers are
/// tested in front-to-back draw order: alerts, then sensors, reports, and
/// program markers, then tile polygons. A miss clears the selection. In
/// alerts-only view nothing but alerts is pickable.
pub fn pick(
    click: Vec2,
    scale: f32,
    view_mode: ViewMode,
    forest_input: &ForestDataInput,
    sessions: &AnalysisSessions,
    programs: &PesPrograms,
) -> Selection {
    let alert_markers = alerts(sessions).map(|a| (a.id.as_str(), project_point(a.location)));
    if let Some(id) = nearest_within(alert_markers, click, scale, ALERT_PICK_PX) {
        return Selection::Alert(id.to_string());
    }
    if view_mode == ViewMode::AlertsOnly {
        return Selection::None;
    }

    let sensors = forest_input
        .sensor_readings
        .iter()
        .map(|s| (s.sensor_id.as_str(), project_point(s.location)));
    if let Some(id) = nearest_within(sensors, click, scale, SENSOR_PICK_PX) {
        return Selection::Background(BackgroundRef::Sensor(id.to_string()));
    }

    let reports = forest_input
        .reports
        .iter()
        .map(|r| (r.report_id.as_str(), project_point(r.location)));
    if let Some(id) = nearest_within(reports, click, scale, REPORT_PICK_PX) {
        return Selection::Background(BackgroundRef::Report(id.to_string()));
    }

    let markers = programs
        .0
        .iter()
        .filter_map(|p| p.location.map(|loc| (p.id.as_str(), project_point(loc))));
    if let Some(id) = nearest_within(markers, click, scale, PROGRAM_PICK_PX) {
        return Selection::Incentive(id.to_string());
    }

    for tile in &forest_input.satellite_tiles {
        let polygon: Vec<Vec2> = tile
            .coordinates
            .iter()
            .map(|c| project::project(c[0], c[1]))
            .collect();
        if point_in_polygon(click, &polygon) {
            return Selection::Background(BackgroundRef::Tile(tile.id.clone()));
        }
    }

    Selection::None
}

fn alerts(sessions: &AnalysisSessions) -> impl Iterator<Item = &Alert> + '_ {
    sessions
        .forest
        .latest
        .iter()
        .flat_map(|analysis| analysis.alerts.iter())
}

/// Nearest candidate whose screen distance is inside `threshold_px`. The
/// click and candidates are in map space; distances scale up to screen
/// pixels so hit areas track the drawn marker sizes at any zoom.
fn nearest_within<'a>(
    candidates: impl Iterator<Item = (&'a str, Vec2)>,
    click: Vec2,
    scale: f32,
    threshold_px: f32,
) -> Option<&'a str> {
    let mut best_dist = threshold_px;
    let mut best: Option<&str> = None;
    for (id, pos) in candidates {
        let dist = (pos - click).length() * scale;
        if dist < best_dist {
            best_dist = dist;
            best = Some(id);
        }
    }
    best
}
