//! Headless flows through the map's focus logic: session state moves, the
//! viewport retargets. Draw systems need a renderer, so only the logic
//! systems run here; all assertions are on `Viewport::target`, which the
//! retarget system settles synchronously.

use bevy::app::App;
use bevy::prelude::*;

use session::analysis::AnalysisSessions;
use session::forest::{AlertKind, ForestDataInput, SensorReading};
use session::geo::{GeoPoint, UserLocation};
use session::incentives::PesPrograms;
use session::restoration::RestorationProjects;
use session::selection::{BackgroundRef, Selection};
use session::test_support;
use session::SessionPlugin;

use crate::layers::{self, ViewMode};
use crate::project;
use crate::viewport::{self, MapCamera, ResetViewRequest, Viewport};

fn harness() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(SessionPlugin);
    app.init_resource::<Viewport>();
    app.init_resource::<ViewMode>();
    app.add_event::<ResetViewRequest>();
    app.add_systems(
        Update,
        (
            layers::clear_hidden_selection_on_mode_switch,
            viewport::retarget_viewport,
            viewport::animate_viewport,
            viewport::apply_viewport_to_camera,
        )
            .chain(),
    );
    app
}

/// Land a completed forest analysis carrying one alert at `location`.
fn apply_forest_analysis(app: &mut App, alert_id: &str, location: GeoPoint) {
    let mut analysis = test_support::forest_analysis_with_alert(AlertKind::Fire, 0.9);
    analysis.alerts[0].id = alert_id.to_string();
    analysis.alerts[0].location = location;
    let mut sessions = app.world_mut().resource_mut::<AnalysisSessions>();
    let seq = sessions.forest.begin();
    assert!(sessions.forest.complete_success(seq, analysis));
}

/// Independent recount of every point the map shows, for checking full fits.
fn every_point(world: &World) -> Vec<GeoPoint> {
    let forest_input = world.resource::<ForestDataInput>();
    let sessions = world.resource::<AnalysisSessions>();
    let programs = world.resource::<PesPrograms>();
    let projects = world.resource::<RestorationProjects>();

    let mut points = Vec::new();
    for tile in &forest_input.satellite_tiles {
        points.extend(tile.coordinates.iter().map(|c| GeoPoint::new(c[0], c[1])));
    }
    points.extend(forest_input.sensor_readings.iter().map(|s| s.location));
    points.extend(forest_input.reports.iter().map(|r| r.location));
    if let Some(analysis) = sessions.forest.latest.as_ref() {
        points.extend(analysis.alerts.iter().map(|a| a.location));
    }
    points.extend(
        projects
            .0
            .iter()
            .map(|p| GeoPoint::new(p.location.lat, p.location.lng)),
    );
    points.extend(programs.0.iter().filter_map(|p| p.location));
    points
}

#[test]
fn test_first_update_frames_the_default_scenario() {
    let mut app = harness();
    app.update();

    let expected = project::fit_geo_points(&every_point(app.world()), 0.9);
    assert_eq!(app.world().resource::<Viewport>().target(), expected);
}

#[test]
fn test_operator_position_takes_first_focus() {
    let mut app = harness();
    let nairobi = GeoPoint::new(-1.2921, 36.8219);
    app.world_mut().resource_mut::<UserLocation>().0 = Some(nairobi);
    app.update();

    let expected = project::fit_geo_points(&[nairobi], 2.5);
    assert_eq!(app.world().resource::<Viewport>().target(), expected);
}

#[test]
fn test_empty_dataset_falls_back_to_kenya_frame() {
    let mut app = harness();
    *app.world_mut().resource_mut::<ForestDataInput>() = ForestDataInput {
        satellite_tiles: Vec::new(),
        sensor_readings: Vec::new(),
        reports: Vec::new(),
    };
    app.world_mut().resource_mut::<PesPrograms>().0.clear();
    app.world_mut().resource_mut::<RestorationProjects>().0.clear();
    app.update();

    assert_eq!(
        app.world().resource::<Viewport>().target(),
        project::fit_kenya(0.9)
    );
}

#[test]
fn test_selecting_alert_replaces_sensor_focus_and_glides_to_it() {
    let mut app = harness();
    let hotspot = GeoPoint::new(0.5, 35.3);
    apply_forest_analysis(&mut app, "ALERT-1", hotspot);
    app.update();

    *app.world_mut().resource_mut::<Selection>() =
        Selection::Background(BackgroundRef::Sensor("SN-KRG-A-01".to_string()));
    app.update();

    *app.world_mut().resource_mut::<Selection>() = Selection::Alert("ALERT-1".to_string());
    app.update();

    assert!(matches!(
        *app.world().resource::<Selection>(),
        Selection::Alert(_)
    ));
    let expected = project::fit_geo_points(&[hotspot], 8.0);
    assert_eq!(app.world().resource::<Viewport>().target(), expected);
}

#[test]
fn test_alerts_only_clears_background_selection_and_frames_alerts() {
    let mut app = harness();
    let hotspot = GeoPoint::new(0.5, 35.3);
    apply_forest_analysis(&mut app, "ALERT-1", hotspot);
    app.update();

    *app.world_mut().resource_mut::<Selection>() =
        Selection::Background(BackgroundRef::Sensor("SN-KRG-A-01".to_string()));
    app.update();

    *app.world_mut().resource_mut::<ViewMode>() = ViewMode::AlertsOnly;
    app.update();

    assert!(matches!(
        *app.world().resource::<Selection>(),
        Selection::None
    ));
    let expected = project::fit_geo_points(&[hotspot], 0.9);
    assert_eq!(app.world().resource::<Viewport>().target(), expected);
}

#[test]
fn test_reset_request_refits_even_while_alert_selected() {
    let mut app = harness();
    apply_forest_analysis(&mut app, "ALERT-1", GeoPoint::new(0.5, 35.3));
    app.update();
    *app.world_mut().resource_mut::<Selection>() = Selection::Alert("ALERT-1".to_string());
    app.update();

    app.world_mut().send_event(ResetViewRequest);
    app.update();

    let expected = project::fit_geo_points(&every_point(app.world()), 0.9);
    assert_eq!(app.world().resource::<Viewport>().target(), expected);
}

#[test]
fn test_population_change_keeps_alert_focus() {
    let mut app = harness();
    let hotspot = GeoPoint::new(0.5, 35.3);
    apply_forest_analysis(&mut app, "ALERT-1", hotspot);
    app.update();
    *app.world_mut().resource_mut::<Selection>() = Selection::Alert("ALERT-1".to_string());
    app.update();
    let focused = app.world().resource::<Viewport>().target();

    app.world_mut()
        .resource_mut::<ForestDataInput>()
        .sensor_readings
        .push(SensorReading {
            sensor_id: "SN-TEST-99".to_string(),
            location: GeoPoint::new(-0.9, 36.4),
            temperature: 24.0,
            smoke_level: 0.05,
            noise_level: 38.0,
            timestamp: "2023-10-27T10:05:00Z".to_string(),
        });
    app.update();

    assert_eq!(app.world().resource::<Viewport>().target(), focused);
}

#[test]
fn test_camera_follows_viewport() {
    let mut app = harness();
    let camera = app
        .world_mut()
        .spawn((
            Transform::default(),
            OrthographicProjection::default_2d(),
            MapCamera,
        ))
        .id();
    app.update();

    let current = app.world().resource::<Viewport>().current;
    let center = project::map_to_world(current.center());
    let transform = app.world().get::<Transform>(camera).unwrap();
    assert!((transform.translation.x - center.x).abs() < 1e-3);
    assert!((transform.translation.y - center.y).abs() < 1e-3);
    let projection = app.world().get::<OrthographicProjection>(camera).unwrap();
    assert!((projection.scale - 1.0 / current.scale).abs() < 1e-6);
}
