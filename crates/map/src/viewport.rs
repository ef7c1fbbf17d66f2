//! Logical viewport model: the camera glides between fit targets over the
//! map plane, and a separate system applies the interpolated transform to
//! the actual 2d camera each frame.

use bevy::prelude::*;

use session::analysis::AnalysisSessions;
use session::forest::ForestDataInput;
use session::geo::{GeoPoint, UserLocation};
use session::incentives::PesPrograms;
use session::restoration::RestorationProjects;
use session::selection::Selection;

use crate::layers::ViewMode;
use crate::project::{self, MapTransform};

const ANIMATION_SECS: f32 = 0.75;
/// Zoom headroom when fitting a point set.
const FIT_ZOOM: f32 = 0.9;
/// Zoom applied when focusing a single alert.
const ALERT_FOCUS_ZOOM: f32 = 8.0;
/// Zoom applied when centering on the operator's own position.
const USER_FOCUS_ZOOM: f32 = 2.5;

/// Marker for the camera the viewport drives.
#[derive(Component)]
pub struct MapCamera;

/// Request to re-fit the view to the currently relevant point set. Sent by
/// the control panel's reset button.
#[derive(Event, Debug, Default)]
pub struct ResetViewRequest;

/// Camera model for the map: where the view is, where it is headed, and how
/// far along the glide it is.
#[derive(Resource, Clone, Debug)]
pub struct Viewport {
    from: MapTransform,
    target: MapTransform,
    pub current: MapTransform,
    elapsed: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            from: MapTransform::IDENTITY,
            target: MapTransform::IDENTITY,
            current: MapTransform::IDENTITY,
            elapsed: ANIMATION_SECS,
        }
    }
}

impl Viewport {
    /// Begin gliding toward `target` from wherever the view currently is.
    /// Retargeting the transform already in flight is a no-op.
    pub fn retarget(&mut self, target: MapTransform) {
        if target == self.target {
            return;
        }
        self.from = self.current;
        self.target = target;
        self.elapsed = 0.0;
    }

    /// Jump without animating.
    pub fn snap_to(&mut self, target: MapTransform) {
        self.from = target;
        self.target = target;
        self.current = target;
        self.elapsed = ANIMATION_SECS;
    }

    pub fn target(&self) -> MapTransform {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= ANIMATION_SECS
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(ANIMATION_SECS);
        let t = self.elapsed / ANIMATION_SECS;
        self.current = self.from.lerp(&self.target, ease(t));
    }
}

/// Smoothstep, easing in and out like the stock CSS timing curve.
fn ease(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

pub fn spawn_map_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MapCamera));
}

pub fn animate_viewport(time: Res<Time>, mut viewport: ResMut<Viewport>) {
    if viewport.is_settled() {
        return;
    }
    viewport.advance(time.delta_secs());
}

/// Apply the logical viewport to the camera transform. The viewport scale is
/// map pixels per screen pixel, so the orthographic scale is its inverse.
pub fn apply_viewport_to_camera(
    viewport: Res<Viewport>,
    mut cameras: Query<(&mut Transform, &mut OrthographicProjection), With<MapCamera>>,
) {
    if !viewport.is_changed() {
        return;
    }
    let Ok((mut transform, mut projection)) = cameras.get_single_mut() else {
        return;
    };
    let center = project::map_to_world(viewport.current.center());
    transform.translation.x = center.x;
    transform.translation.y = center.y;
    projection.scale = 1.0 / viewport.current.scale;
}

/// Decide where the viewport should glide. Priority: an explicit reset
/// request, then selection and view-mode focus, then a refit when the point
/// population changes (initial load, scenario switch).
#[allow(clippy::too_many_arguments)]
pub fn retarget_viewport(
    mut reset_requests: EventReader<ResetViewRequest>,
    selection: Res<Selection>,
    view_mode: Res<ViewMode>,
    sessions: Res<AnalysisSessions>,
    forest_input: Res<ForestDataInput>,
    programs: Res<PesPrograms>,
    projects: Res<RestorationProjects>,
    user_location: Res<UserLocation>,
    mut last_point_count: Local<Option<usize>>,
    mut viewport: ResMut<Viewport>,
) {
    let reset_requested = reset_requests.read().last().is_some();
    let points = all_map_points(&forest_input, &sessions, &programs, &projects);

    if reset_requested {
        let target = match *view_mode {
            ViewMode::AlertsOnly => project::fit_geo_points(&alert_locations(&sessions), FIT_ZOOM),
            ViewMode::All => project::fit_geo_points(&points, FIT_ZOOM),
        };
        *last_point_count = Some(points.len());
        viewport.retarget(target);
        return;
    }

    // Focus follows selection: picking an alert zooms in on it.
    if selection.is_changed() {
        if let Some(alert) = selected_alert_location(&selection, &sessions) {
            viewport.retarget(project::fit_geo_points(&[alert], ALERT_FOCUS_ZOOM));
            return;
        }
    }

    // The alerts-only view keeps the alert set framed whenever the set, the
    // mode, or the selection moves underneath it.
    let alerts_view_dirty =
        view_mode.is_changed() || sessions.is_changed() || selection.is_changed();
    if *view_mode == ViewMode::AlertsOnly
        && selection.selected_alert_id().is_none()
        && alerts_view_dirty
    {
        let alerts = alert_locations(&sessions);
        if !alerts.is_empty() {
            viewport.retarget(project::fit_geo_points(&alerts, FIT_ZOOM));
            return;
        }
    }

    // Refit when the point population changes, unless the operator is zoomed
    // in on an alert.
    if *last_point_count != Some(points.len()) {
        *last_point_count = Some(points.len());
        if selection.selected_alert_id().is_some() {
            return;
        }
        let target = if let Some(user) = user_location.0 {
            project::fit_geo_points(&[user], USER_FOCUS_ZOOM)
        } else if points.is_empty() {
            project::fit_kenya(FIT_ZOOM)
        } else {
            project::fit_geo_points(&points, FIT_ZOOM)
        };
        viewport.retarget(target);
    }
}

/// Every geographic point currently on the map. Drives whole-map fits.
fn all_map_points(
    forest_input: &ForestDataInput,
    sessions: &AnalysisSessions,
    programs: &PesPrograms,
    projects: &RestorationProjects,
) -> Vec<GeoPoint> {
    let mut points = Vec::new();
    for tile in &forest_input.satellite_tiles {
        points.extend(tile.coordinates.iter().map(|c| GeoPoint::new(c[0], c[1])));
    }
    points.extend(forest_input.sensor_readings.iter().map(|s| s.location));
    points.extend(forest_input.reports.iter().map(|r| r.location));
    points.extend(alert_locations(sessions));
    points.extend(
        projects
            .0
            .iter()
            .map(|p| GeoPoint::new(p.location.lat, p.location.lng)),
    );
    points.extend(programs.0.iter().filter_map(|p| p.location));
    points
}

fn alert_locations(sessions: &AnalysisSessions) -> Vec<GeoPoint> {
    sessions
        .forest
        .latest
        .as_ref()
        .map(|analysis| analysis.alerts.iter().map(|a| a.location).collect())
        .unwrap_or_default()
}

fn selected_alert_location(selection: &Selection, sessions: &AnalysisSessions) -> Option<GeoPoint> {
    let id = selection.selected_alert_id()?;
    let analysis = sessions.forest.latest.as_ref()?;
    analysis
        .alerts
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.location)
}
