//! Scenario data generator: builds the canned monitoring situations the
//! operator can load, and nudges an active scenario's readings so the live
//! feed has something to stream.

use bevy::prelude::*;
use rand::Rng;

use crate::clock;
use crate::forest::{
    ChangeType, ForestDataInput, Report, ReportCategory, SatelliteTile, SensorReading,
};
use crate::geo::GeoPoint;

/// Anchor for generated situations: the forest fringe north-east of Nairobi.
const BASE_LAT: f64 = -1.25;
const BASE_LNG: f64 = 36.85;

/// Half-width of a generated satellite tile in degrees.
const TILE_HALF_SIZE: f64 = 0.05;

/// Canned monitoring situations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scenario {
    HealthyForest,
    #[default]
    ImminentWildfire,
    IllegalLogging,
    DroughtStress,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::HealthyForest,
        Scenario::ImminentWildfire,
        Scenario::IllegalLogging,
        Scenario::DroughtStress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::HealthyForest => "Healthy Forest",
            Scenario::ImminentWildfire => "Imminent Wildfire",
            Scenario::IllegalLogging => "Illegal Logging",
            Scenario::DroughtStress => "Drought Stress",
        }
    }
}

/// Which scenario the loaded input data came from. Drives how the live feed
/// mutates readings.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct ActiveScenario(pub Scenario);

fn tile(id: &str, center_lat: f64, center_lng: f64, risk: f64, change: ChangeType) -> SatelliteTile {
    SatelliteTile {
        id: id.to_string(),
        coordinates: vec![
            [center_lat - TILE_HALF_SIZE, center_lng - TILE_HALF_SIZE],
            [center_lat - TILE_HALF_SIZE, center_lng + TILE_HALF_SIZE],
            [center_lat + TILE_HALF_SIZE, center_lng + TILE_HALF_SIZE],
            [center_lat + TILE_HALF_SIZE, center_lng - TILE_HALF_SIZE],
        ],
        risk_score: risk,
        change_type: change,
    }
}

fn sensor(id: &str, lat: f64, lng: f64, temp: f64, smoke: f64, noise: f64) -> SensorReading {
    SensorReading {
        sensor_id: id.to_string(),
        location: GeoPoint::new(lat, lng),
        temperature: temp,
        smoke_level: smoke,
        noise_level: noise,
        timestamp: clock::now_stamp(),
    }
}

fn report(id: &str, lat: f64, lng: f64, category: ReportCategory, description: &str) -> Report {
    Report {
        report_id: id.to_string(),
        location: GeoPoint::new(lat, lng),
        category,
        description: description.to_string(),
        image_tags: None,
        timestamp: clock::now_stamp(),
    }
}

/// Build the input bundle for a scenario. Deterministic apart from the
/// reading timestamps.
pub fn generate(scenario: Scenario) -> ForestDataInput {
    match scenario {
        Scenario::ImminentWildfire => ForestDataInput {
            satellite_tiles: vec![tile("tile-fire-A", BASE_LAT, BASE_LNG, 0.95, ChangeType::Fire)],
            sensor_readings: vec![
                sensor(
                    "sensor-fire-1",
                    BASE_LAT + 0.01,
                    BASE_LNG + 0.01,
                    85.5,
                    0.9,
                    30.2,
                ),
                sensor(
                    "sensor-fire-2",
                    BASE_LAT - 0.02,
                    BASE_LNG - 0.01,
                    70.1,
                    0.75,
                    25.0,
                ),
            ],
            reports: vec![report(
                "report-fire-1",
                BASE_LAT,
                BASE_LNG,
                ReportCategory::Fire,
                "Visible smoke plume reported near the old trail.",
            )],
        },
        Scenario::IllegalLogging => ForestDataInput {
            satellite_tiles: vec![tile(
                "tile-log-A",
                BASE_LAT + 0.3,
                BASE_LNG + 0.3,
                0.8,
                ChangeType::VegetationLoss,
            )],
            sensor_readings: vec![
                sensor(
                    "sensor-log-1",
                    BASE_LAT + 0.31,
                    BASE_LNG + 0.29,
                    35.1,
                    0.1,
                    95.8,
                ),
                sensor(
                    "sensor-log-2",
                    BASE_LAT + 0.28,
                    BASE_LNG + 0.32,
                    33.0,
                    0.15,
                    88.1,
                ),
            ],
            reports: vec![
                report(
                    "report-log-1",
                    BASE_LAT + 0.3,
                    BASE_LNG + 0.3,
                    ReportCategory::Logging,
                    "Heard chainsaws and saw trucks leaving the area.",
                ),
                report(
                    "report-log-2",
                    BASE_LAT + 0.305,
                    BASE_LNG + 0.305,
                    ReportCategory::Logging,
                    "Second report confirming logging activity.",
                ),
            ],
        },
        Scenario::HealthyForest => ForestDataInput {
            satellite_tiles: Vec::new(),
            sensor_readings: vec![
                sensor("sensor-healthy-1", BASE_LAT, BASE_LNG, 28.5, 0.05, 25.1),
                sensor(
                    "sensor-healthy-2",
                    BASE_LAT + 0.3,
                    BASE_LNG + 0.3,
                    29.1,
                    0.04,
                    22.8,
                ),
            ],
            reports: Vec::new(),
        },
        Scenario::DroughtStress => ForestDataInput {
            satellite_tiles: vec![
                tile(
                    "tile-drought-A",
                    BASE_LAT,
                    BASE_LNG,
                    0.6,
                    ChangeType::VegetationLoss,
                ),
                tile(
                    "tile-drought-B",
                    BASE_LAT + 0.1,
                    BASE_LNG - 0.1,
                    0.65,
                    ChangeType::VegetationLoss,
                ),
            ],
            sensor_readings: vec![sensor(
                "sensor-drought-1",
                BASE_LAT,
                BASE_LNG,
                46.0,
                0.1,
                30.0,
            )],
            reports: Vec::new(),
        },
    }
}

/// Nudge an active scenario's readings one feed tick forward. Wildfire heats
/// and smokes sensors toward their caps, logging keeps noisy sensors loud
/// and occasionally files another report, everything else drifts gently.
pub fn advance(data: &mut ForestDataInput, scenario: Scenario, rng: &mut impl Rng) {
    match scenario {
        Scenario::ImminentWildfire => {
            for sensor in &mut data.sensor_readings {
                sensor.temperature = (sensor.temperature + rng.gen::<f64>() * 5.0).min(100.0);
                sensor.smoke_level = (sensor.smoke_level + rng.gen::<f64>() * 0.1).min(1.0);
            }
        }
        Scenario::IllegalLogging => {
            for sensor in &mut data.sensor_readings {
                if sensor.noise_level > 50.0 {
                    sensor.noise_level =
                        (sensor.noise_level + (rng.gen::<f64>() - 0.3) * 10.0).max(50.0);
                }
            }
            if rng.gen::<f64>() > 0.8 && data.reports.len() < 4 {
                let next = data.reports.len() + 1;
                data.reports.push(report(
                    &format!("report-log-{next}"),
                    BASE_LAT + 0.3 + (rng.gen::<f64>() - 0.5) * 0.02,
                    BASE_LNG + 0.3 + (rng.gen::<f64>() - 0.5) * 0.02,
                    ReportCategory::Logging,
                    "More chainsaw sounds detected.",
                ));
            }
        }
        Scenario::HealthyForest | Scenario::DroughtStress => {
            for sensor in &mut data.sensor_readings {
                sensor.temperature += (rng.gen::<f64>() - 0.5) * 2.0;
                sensor.smoke_level =
                    (sensor.smoke_level + (rng.gen::<f64>() - 0.5) * 0.02).clamp(0.0, 1.0);
                sensor.noise_level += (rng.gen::<f64>() - 0.5) * 5.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strip_timestamps(mut input: ForestDataInput) -> ForestDataInput {
        for s in &mut input.sensor_readings {
            s.timestamp.clear();
        }
        for r in &mut input.reports {
            r.timestamp.clear();
        }
        input
    }

    #[test]
    fn test_generation_is_deterministic() {
        for scenario in Scenario::ALL {
            let a = strip_timestamps(generate(scenario));
            let b = strip_timestamps(generate(scenario));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_wildfire_shape() {
        let input = generate(Scenario::ImminentWildfire);
        assert_eq!(input.satellite_tiles.len(), 1);
        assert_eq!(input.satellite_tiles[0].change_type, ChangeType::Fire);
        assert!((input.satellite_tiles[0].risk_score - 0.95).abs() < f64::EPSILON);
        assert_eq!(input.sensor_readings.len(), 2);
        assert_eq!(input.reports.len(), 1);
        assert_eq!(input.reports[0].category, ReportCategory::Fire);
    }

    #[test]
    fn test_healthy_has_no_tiles_or_reports() {
        let input = generate(Scenario::HealthyForest);
        assert!(input.satellite_tiles.is_empty());
        assert_eq!(input.sensor_readings.len(), 2);
        assert!(input.reports.is_empty());
    }

    #[test]
    fn test_drought_has_two_tiles_and_hot_sensor() {
        let input = generate(Scenario::DroughtStress);
        assert_eq!(input.satellite_tiles.len(), 2);
        assert!(input.sensor_readings[0].temperature > 45.0);
    }

    #[test]
    fn test_tile_corners_are_square_around_center() {
        let input = generate(Scenario::ImminentWildfire);
        let corners = &input.satellite_tiles[0].coordinates;
        assert_eq!(corners.len(), 4);
        assert!((corners[0][0] - (BASE_LAT - TILE_HALF_SIZE)).abs() < f64::EPSILON);
        assert!((corners[2][1] - (BASE_LNG + TILE_HALF_SIZE)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_wildfire_respects_caps() {
        let mut input = generate(Scenario::ImminentWildfire);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            advance(&mut input, Scenario::ImminentWildfire, &mut rng);
        }
        for sensor in &input.sensor_readings {
            assert!(sensor.temperature <= 100.0);
            assert!(sensor.smoke_level <= 1.0);
        }
        // Long enough runs pin both sensors at the caps.
        assert!((input.sensor_readings[0].temperature - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_logging_keeps_noise_floor_and_bounds_reports() {
        let mut input = generate(Scenario::IllegalLogging);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            advance(&mut input, Scenario::IllegalLogging, &mut rng);
        }
        for sensor in &input.sensor_readings {
            assert!(sensor.noise_level >= 50.0);
        }
        assert!(input.reports.len() <= 4);
        // 500 ticks at a ~20% spawn chance fill the remaining two slots.
        assert_eq!(input.reports.len(), 4);
        assert_eq!(input.reports[3].report_id, "report-log-4");
    }

    #[test]
    fn test_advance_healthy_drifts_within_clamps() {
        let mut input = generate(Scenario::HealthyForest);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            advance(&mut input, Scenario::HealthyForest, &mut rng);
        }
        for sensor in &input.sensor_readings {
            assert!(sensor.smoke_level >= 0.0 && sensor.smoke_level <= 1.0);
        }
    }

    #[test]
    fn test_advance_is_deterministic_for_a_seed() {
        let mut a = strip_timestamps(generate(Scenario::ImminentWildfire));
        let mut b = strip_timestamps(generate(Scenario::ImminentWildfire));
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            advance(&mut a, Scenario::ImminentWildfire, &mut rng_a);
            advance(&mut b, Scenario::ImminentWildfire, &mut rng_b);
        }
        assert_eq!(a, b);
    }
}
