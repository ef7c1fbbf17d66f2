use std::sync::Arc;

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use session::analysis::{AnalysisBackend, GeminiService, API_KEY_ENV};
use session::geo::{GeoPoint, UserLocation};

/// Environment variables pinning the operator's position on the map.
const LAT_ENV: &str = "FORESTWATCH_LAT";
const LNG_ENV: &str = "FORESTWATCH_LNG";

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "ForestWatch Kenya".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .add_plugins((session::SessionPlugin, map::MapPlugin, ui::UiPlugin));

    configure_backend(&mut app);
    configure_operator_location(&mut app);

    app.run();
}

/// Installs the Gemini backend when an API key is configured. Without one the
/// dashboard still runs; analysis requests fail with a configuration message.
fn configure_backend(app: &mut App) {
    match GeminiService::from_env() {
        Ok(service) => {
            info!("Gemini backend ready (model {})", service.model());
            app.insert_resource(AnalysisBackend(Some(Arc::new(service))));
        }
        Err(err) => {
            warn!("{err}; AI analysis disabled until {API_KEY_ENV} is set");
        }
    }
}

/// Pins the operator marker when both coordinate variables parse.
fn configure_operator_location(app: &mut App) {
    let lat = std::env::var(LAT_ENV).ok().and_then(|v| v.parse::<f64>().ok());
    let lng = std::env::var(LNG_ENV).ok().and_then(|v| v.parse::<f64>().ok());
    if let (Some(lat), Some(lng)) = (lat, lng) {
        info!("operator location pinned at ({lat}, {lng})");
        app.insert_resource(UserLocation(Some(GeoPoint::new(lat, lng))));
    }
}
