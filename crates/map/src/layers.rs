//! Layer classification: which entities the map renders in the active view
//! mode, with cross-reference flags resolved and the heat overlay derived.
//! `build_layers` is the pure core; a change-guarded system caches its
//! output in the `LayerSet` resource for the draw and caption systems.

use bevy::prelude::*;

use session::analysis::AnalysisSessions;
use session::forest::{AlertKind, ChangeType, ForestDataInput, Severity};
use session::geo::GeoPoint;
use session::incentives::PesPrograms;
use session::restoration::{Ecosystem, RestorationProjects};
use session::selection::Selection;

use crate::project;

pub const EMERALD: Color = Color::srgb(0.063, 0.725, 0.506);
pub const BLUE: Color = Color::srgb(0.231, 0.510, 0.965);
pub const GOLD: Color = Color::srgb(0.984, 0.749, 0.141);
pub const TEAL: Color = Color::srgb(0.176, 0.831, 0.749);
pub const YELLOW: Color = Color::srgb(0.918, 0.702, 0.031);
pub const RED: Color = Color::srgb(0.937, 0.267, 0.267);

/// Which marker layers the map shows.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Every layer: tiles, sensors, reports, programs, and alerts.
    #[default]
    All,
    /// Alert markers only.
    AlertsOnly,
}

/// Optional overlays, both on by default.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerToggles {
    pub heatmap: bool,
    pub restoration: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            heatmap: true,
            restoration: true,
        }
    }
}

pub fn situation_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Fire => Color::srgb_u8(239, 68, 68), // red
        AlertKind::Logging => Color::srgb_u8(217, 119, 6), // amber
        AlertKind::Encroachment => Color::srgb_u8(59, 130, 246), // blue
        AlertKind::Charcoal => Color::srgb_u8(113, 113, 122), // smoke grey
        AlertKind::Drought => Color::srgb_u8(249, 115, 22), // orange
        AlertKind::Unknown => Color::srgb_u8(168, 85, 247), // purple
    }
}

/// Legend name for a threat class.
pub fn situation_label(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Fire => "Wildfire Heatzone",
        AlertKind::Logging => "Illegal Logging Activity",
        AlertKind::Encroachment => "Encroachment Area",
        AlertKind::Charcoal => "Charcoal Burning Smoke",
        AlertKind::Drought => "Drought / Dry Zone",
        AlertKind::Unknown => "Anomaly",
    }
}

// ---------------------------------------------------------------------------
// Layer records
// ---------------------------------------------------------------------------

/// One blob in the heat overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatPoint {
    pub location: GeoPoint,
    /// Blob radius in map pixels.
    pub radius: f32,
    pub color: Color,
}

/// Satellite tile ready to draw: a closed outline in map pixels plus the
/// styling inputs the renderer reads.
#[derive(Clone, Debug, PartialEq)]
pub struct TileShape {
    pub id: String,
    pub outline: Vec<Vec2>,
    pub change_type: ChangeType,
    /// Covered by a PES program's linked assets.
    pub funded: bool,
}

/// Point marker in a background layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: String,
    pub location: GeoPoint,
    pub funded: bool,
}

/// Restoration site marker with its caption inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteMarker {
    pub id: String,
    pub location: GeoPoint,
    pub ecosystem: Ecosystem,
    pub funded: bool,
}

/// Marker for a PES program that carries a map position.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramMarker {
    pub id: String,
    pub location: GeoPoint,
}

/// Alert marker.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertMarker {
    pub id: String,
    pub location: GeoPoint,
    pub kind: AlertKind,
    pub severity: Severity,
}

/// Everything the map renders this frame, classified per layer and already
/// filtered by view mode and overlay toggles.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct LayerSet {
    pub tiles: Vec<TileShape>,
    pub sensors: Vec<Marker>,
    pub reports: Vec<Marker>,
    pub restoration: Vec<SiteMarker>,
    pub programs: Vec<ProgramMarker>,
    pub alerts: Vec<AlertMarker>,
    pub heat: Vec<HeatPoint>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn heat_radius(severity: Severity) -> f32 {
    match severity {
        Severity::Critical => 80.0,
        Severity::High => 60.0,
        _ => 40.0,
    }
}

/// Sensors hotter than this contribute their own heat blob.
const SENSOR_HEAT_TEMP_C: f64 = 35.0;
const SENSOR_HEAT_RADIUS: f32 = 40.0;

/// Build the heat overlay: one blob per alert, sized by severity band, plus
/// one per overheated sensor. Overlaps are intended and not merged.
pub fn heat_points(sessions: &AnalysisSessions, forest_input: &ForestDataInput) -> Vec<HeatPoint> {
    let mut points = Vec::new();
    if let Some(analysis) = sessions.forest.latest.as_ref() {
        for alert in &analysis.alerts {
            points.push(HeatPoint {
                location: alert.location,
                radius: heat_radius(alert.severity),
                color: situation_color(alert.kind),
            });
        }
    }
    for sensor in &forest_input.sensor_readings {
        if sensor.temperature > SENSOR_HEAT_TEMP_C {
            points.push(HeatPoint {
                location: sensor.location,
                radius: SENSOR_HEAT_RADIUS,
                color: Color::srgb_u8(249, 115, 22), // orange
            });
        }
    }
    points
}

/// Whether a map item is funded by a PES program, either through a direct
/// program reference or by appearing in a program's linked asset lists.
pub fn pes_linked(item_id: &str, direct_program_id: Option<&str>, programs: &PesPrograms) -> bool {
    direct_program_id.is_some() || programs.links_asset(item_id)
}

/// Classify the current state into the renderable layer set for the active
/// view mode. Alerts-only keeps just alert markers and the heat overlay.
pub fn build_layers(
    view_mode: ViewMode,
    toggles: LayerToggles,
    forest_input: &ForestDataInput,
    sessions: &AnalysisSessions,
    programs: &PesPrograms,
    projects: &RestorationProjects,
) -> LayerSet {
    let mut set = LayerSet::default();

    if let Some(analysis) = sessions.forest.latest.as_ref() {
        for alert in &analysis.alerts {
            set.alerts.push(AlertMarker {
                id: alert.id.clone(),
                location: alert.location,
                kind: alert.kind,
                severity: alert.severity,
            });
        }
    }
    if toggles.heatmap {
        set.heat = heat_points(sessions, forest_input);
    }
    if view_mode == ViewMode::AlertsOnly {
        return set;
    }

    for tile in &forest_input.satellite_tiles {
        let mut outline: Vec<Vec2> = tile
            .coordinates
            .iter()
            .map(|c| project::project(c[0], c[1]))
            .collect();
        if outline.len() < 3 {
            continue;
        }
        if outline.first() != outline.last() {
            outline.push(outline[0]);
        }
        set.tiles.push(TileShape {
            id: tile.id.clone(),
            outline,
            change_type: tile.change_type,
            funded: pes_linked(&tile.id, None, programs),
        });
    }
    for sensor in &forest_input.sensor_readings {
        set.sensors.push(Marker {
            id: sensor.sensor_id.clone(),
            location: sensor.location,
            funded: pes_linked(&sensor.sensor_id, None, programs),
        });
    }
    for report in &forest_input.reports {
        set.reports.push(Marker {
            id: report.report_id.clone(),
            location: report.location,
            funded: pes_linked(&report.report_id, None, programs),
        });
    }
    if toggles.restoration {
        for site in &projects.0 {
            set.restoration.push(SiteMarker {
                id: site.id.clone(),
                location: GeoPoint::new(site.location.lat, site.location.lng),
                ecosystem: site.ecosystem,
                funded: pes_linked(&site.id, site.incentives.pes_program_id.as_deref(), programs),
            });
        }
    }
    for program in &programs.0 {
        let Some(location) = program.location else {
            continue;
        };
        set.programs.push(ProgramMarker {
            id: program.id.clone(),
            location,
        });
    }
    set
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Rebuild the cached layer set whenever one of its inputs moves.
pub fn rebuild_layer_set(
    view_mode: Res<ViewMode>,
    toggles: Res<LayerToggles>,
    forest_input: Res<ForestDataInput>,
    sessions: Res<AnalysisSessions>,
    programs: Res<PesPrograms>,
    projects: Res<RestorationProjects>,
    mut layer_set: ResMut<LayerSet>,
) {
    let dirty = view_mode.is_changed()
        || toggles.is_changed()
        || forest_input.is_changed()
        || sessions.is_changed()
        || programs.is_changed()
        || projects.is_changed();
    if !dirty {
        return;
    }
    *layer_set = build_layers(
        *view_mode,
        *toggles,
        &forest_input,
        &sessions,
        &programs,
        &projects,
    );
}

/// Switching to alerts-only hides the background layers; anything selected
/// on them is no longer visible, so the selection drops too.
pub fn clear_hidden_selection_on_mode_switch(
    view_mode: Res<ViewMode>,
    mut selection: ResMut<Selection>,
) {
    if !view_mode.is_changed() {
        return;
    }
    if *view_mode == ViewMode::AlertsOnly
        && matches!(*selection, Selection::Background(_) | Selection::Incentive(_))
    {
        selection.clear_non_alert();
    }
}
