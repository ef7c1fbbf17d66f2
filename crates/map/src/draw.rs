//! Immediate-mode marker rendering. One system per layer, run back to front:
//! national boundary, operator position, heat overlay, program markers,
//! restoration sites, satellite tiles, community reports, sensors, alerts.
//! Layer membership comes pre-classified in the `LayerSet` resource; these
//! systems only stroke what it contains.
//!
//! Everything draws in world space. Marker sizes are given in screen pixels
//! and multiplied by the inverse viewport scale, so they hold steady while
//! the camera zooms.

use std::f32::consts::TAU;

use bevy::prelude::*;

use session::forest::ChangeType;
use session::geo::{GeoPoint, UserLocation};
use session::selection::{BackgroundRef, Selection};

use crate::layers::{self, LayerSet, BLUE, EMERALD, GOLD, RED, TEAL, YELLOW};
use crate::project;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Shared stroke helpers
// ---------------------------------------------------------------------------

fn world_of(point: GeoPoint) -> Vec2 {
    project::map_to_world(project::project_point(point))
}

/// Gizmos draw strokes only, so a disc look comes from concentric rings.
fn disc(gizmos: &mut Gizmos, center: Vec2, radius: f32, color: Color) {
    let rings = 4;
    for i in 1..=rings {
        gizmos.circle_2d(center, radius * i as f32 / rings as f32, color);
    }
}

/// Rising, fading ring. `phase` runs 0..1 over the pulse period.
fn pulse_ring(gizmos: &mut Gizmos, center: Vec2, from_r: f32, to_r: f32, phase: f32, color: Color) {
    let radius = from_r + (to_r - from_r) * phase;
    gizmos.circle_2d(center, radius, color.with_alpha((1.0 - phase) * 0.8));
}

fn dashed_circle(gizmos: &mut Gizmos, center: Vec2, radius: f32, color: Color) {
    let segments = 12;
    for i in 0..segments {
        let start = i as f32 / segments as f32 * TAU;
        gizmos.arc_2d(
            Isometry2d::new(center, Rot2::radians(start)),
            TAU / (segments as f32 * 2.0),
            radius,
            color,
        );
    }
}

// ---------------------------------------------------------------------------
// Backdrop
// ---------------------------------------------------------------------------

pub fn draw_boundary(mut gizmos: Gizmos) {
    let outline = project::KENYA_BOUNDARY_POINTS
        .iter()
        .map(|(lat, lng)| project::map_to_world(project::project(*lat as f64, *lng as f64)));
    gizmos.linestrip_2d(outline, EMERALD);
}

pub fn draw_user_location(
    user_location: Res<UserLocation>,
    viewport: Res<Viewport>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let Some(fix) = user_location.0 else {
        return;
    };
    let ssw = 1.0 / viewport.current.scale;
    let center = world_of(fix);
    disc(&mut gizmos, center, 6.0 * ssw, BLUE);
    gizmos.circle_2d(center, 6.0 * ssw, Color::WHITE);
    let phase = (time.elapsed_secs() / 2.0) % 1.0;
    pulse_ring(&mut gizmos, center, 12.0 * ssw, 20.0 * ssw, phase, BLUE);
}

// ---------------------------------------------------------------------------
// Heat overlay
// ---------------------------------------------------------------------------

pub fn draw_heatmap(layer_set: Res<LayerSet>, viewport: Res<Viewport>, mut gizmos: Gizmos) {
    let ssw = 1.0 / viewport.current.scale;
    for blob in &layer_set.heat {
        let center = world_of(blob.location);
        // Soft blob: rings fade toward the rim.
        let rings = 5;
        for i in 1..=rings {
            let f = i as f32 / rings as f32;
            gizmos.circle_2d(
                center,
                blob.radius * ssw * f,
                blob.color.with_alpha(0.6 * (1.0 - f * 0.7)),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Incentive and restoration markers
// ---------------------------------------------------------------------------

pub fn draw_program_markers(layer_set: Res<LayerSet>, viewport: Res<Viewport>, mut gizmos: Gizmos) {
    let ssw = 1.0 / viewport.current.scale;
    for marker in &layer_set.programs {
        let center = world_of(marker.location);
        disc(&mut gizmos, center, 12.0 * ssw, GOLD);
        gizmos.circle_2d(center, 12.0 * ssw, Color::WHITE);
    }
}

pub fn draw_restoration(layer_set: Res<LayerSet>, viewport: Res<Viewport>, mut gizmos: Gizmos) {
    let ssw = 1.0 / viewport.current.scale;
    for site in &layer_set.restoration {
        let center = world_of(site.location);
        // Faint interior rings stand in for the area fill.
        for i in 1..4 {
            gizmos.circle_2d(center, 20.0 * ssw * i as f32 / 4.0, TEAL.with_alpha(0.2));
        }
        gizmos.circle_2d(center, 20.0 * ssw, if site.funded { GOLD } else { TEAL });
        if site.funded {
            dashed_circle(&mut gizmos, center, 24.0 * ssw, GOLD.with_alpha(0.6));
            let badge = center + Vec2::new(15.0, 15.0) * ssw;
            disc(&mut gizmos, badge, 6.0 * ssw, GOLD);
        }
    }
}

// ---------------------------------------------------------------------------
// Raw data layers
// ---------------------------------------------------------------------------

pub fn draw_tiles(layer_set: Res<LayerSet>, selection: Res<Selection>, mut gizmos: Gizmos) {
    for tile in &layer_set.tiles {
        let outline = tile.outline.iter().map(|v| project::map_to_world(*v));
        let selected = matches!(
            &*selection,
            Selection::Background(BackgroundRef::Tile(id)) if id == &tile.id
        );
        let stroke = if selected {
            Color::WHITE
        } else if tile.funded {
            GOLD
        } else if tile.change_type == ChangeType::Fire {
            RED
        } else {
            YELLOW
        };
        gizmos.linestrip_2d(outline, stroke);
    }
}

pub fn draw_reports(
    layer_set: Res<LayerSet>,
    selection: Res<Selection>,
    viewport: Res<Viewport>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let ssw = 1.0 / viewport.current.scale;
    for report in &layer_set.reports {
        let center = world_of(report.location);
        let selected = matches!(
            &*selection,
            Selection::Background(BackgroundRef::Report(id)) if id == &report.id
        );
        // Triangle marker, apex up.
        let triangle = [
            center + Vec2::new(0.0, 8.0) * ssw,
            center + Vec2::new(6.0, -6.0) * ssw,
            center + Vec2::new(-6.0, -6.0) * ssw,
            center + Vec2::new(0.0, 8.0) * ssw,
        ];
        let base = if report.funded { GOLD } else { BLUE };
        gizmos.linestrip_2d(triangle, if selected { Color::WHITE } else { base });
        if selected {
            let phase = (time.elapsed_secs() / 1.5) % 1.0;
            pulse_ring(&mut gizmos, center, 15.0 * ssw, 25.0 * ssw, phase, Color::WHITE);
        }
    }
}

pub fn draw_sensors(
    layer_set: Res<LayerSet>,
    selection: Res<Selection>,
    viewport: Res<Viewport>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let ssw = 1.0 / viewport.current.scale;
    let phase = (time.elapsed_secs() / 2.0) % 1.0;
    for sensor in &layer_set.sensors {
        let center = world_of(sensor.location);
        let selected = matches!(
            &*selection,
            Selection::Background(BackgroundRef::Sensor(id)) if id == &sensor.id
        );
        let radius = (if selected { 6.0 } else { 3.0 }) * ssw;
        disc(&mut gizmos, center, radius, EMERALD);
        gizmos.circle_2d(center, radius, if sensor.funded { GOLD } else { Color::WHITE });
        if sensor.funded {
            gizmos.circle_2d(center, 8.0 * ssw, GOLD.with_alpha(0.8));
        }
        pulse_ring(&mut gizmos, center, 6.0 * ssw, 10.0 * ssw, phase, EMERALD);
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

pub fn draw_alerts(
    layer_set: Res<LayerSet>,
    selection: Res<Selection>,
    viewport: Res<Viewport>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let ssw = 1.0 / viewport.current.scale;
    let phase = (time.elapsed_secs() / 1.5) % 1.0;
    for alert in &layer_set.alerts {
        let center = world_of(alert.location);
        let color = layers::situation_color(alert.kind);
        let selected = selection.selected_alert_id() == Some(alert.id.as_str());
        let core = (if selected { 12.0 } else { 8.0 }) * ssw;
        pulse_ring(&mut gizmos, center, core, core * 2.0, phase, color);
        disc(&mut gizmos, center, core, color);
        gizmos.circle_2d(center, core, Color::WHITE);
    }
}
