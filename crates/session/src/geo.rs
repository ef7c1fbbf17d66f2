//! Geographic primitives shared across the data model.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair. Longitude grows east, latitude grows north.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Where the operator is standing, if a fix was provided at startup.
/// Populated from the `FORESTWATCH_LAT` / `FORESTWATCH_LNG` environment
/// variables; `None` when no fix is available.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct UserLocation(pub Option<GeoPoint>);
