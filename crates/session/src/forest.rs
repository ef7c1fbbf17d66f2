//! Forest monitoring data model: raw satellite / sensor / report inputs and
//! the structured threat analysis that comes back from the analysis service.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Threat severity band, ordered so that `Critical > High > Moderate > Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Band a threat weight score. The partition is closed at the top:
    /// 0.70 and above is `Critical`.
    pub fn from_threat_weight(score: f64) -> Self {
        if score >= 0.70 {
            Severity::Critical
        } else if score >= 0.45 {
            Severity::High
        } else if score >= 0.20 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// Change classification attached to a satellite imagery tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Fire,
    Logging,
    VegetationLoss,
    #[default]
    Unknown,
}

/// One analyzed satellite imagery tile. `coordinates` traces the tile
/// polygon as `[lat, lng]` pairs, matching the upstream imagery feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SatelliteTile {
    pub id: String,
    pub coordinates: Vec<[f64; 2]>,
    /// Normalized 0..1 vegetation change risk.
    pub risk_score: f64,
    pub change_type: ChangeType,
}

/// A single reading from an IoT field node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: String,
    pub location: GeoPoint,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Normalized 0..1 particulate density.
    pub smoke_level: f64,
    /// Decibels.
    pub noise_level: f64,
    pub timestamp: String,
}

/// Category a community member filed their report under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Logging,
    Fire,
    Encroachment,
    Wildlife,
    Other,
}

/// A ground-truth observation submitted by a community member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: String,
    pub location: GeoPoint,
    pub category: ReportCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tags: Option<Vec<String>>,
    pub timestamp: String,
}

/// The full input bundle handed to forest analysis. Serialized verbatim into
/// the analysis prompt, so field names are part of the wire format.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestDataInput {
    pub satellite_tiles: Vec<SatelliteTile>,
    pub sensor_readings: Vec<SensorReading>,
    pub reports: Vec<Report>,
}

impl Default for ForestDataInput {
    fn default() -> Self {
        karura_threat_sample()
    }
}

/// Seed input shown before the operator picks a scenario: a vegetation-loss
/// tile over the Karura fringe with one noisy sensor and a chainsaw report
/// inside it.
pub fn karura_threat_sample() -> ForestDataInput {
    ForestDataInput {
        satellite_tiles: vec![SatelliteTile {
            id: "ST-KRG-001".to_string(),
            coordinates: vec![
                [-1.28, 36.80],
                [-1.28, 36.82],
                [-1.26, 36.82],
                [-1.26, 36.80],
            ],
            risk_score: 0.75,
            change_type: ChangeType::VegetationLoss,
        }],
        sensor_readings: vec![SensorReading {
            sensor_id: "SN-KRG-A-01".to_string(),
            location: GeoPoint::new(-1.27, 36.81),
            temperature: 32.1,
            smoke_level: 0.1,
            noise_level: 78.5,
            timestamp: "2023-10-27T09:45:12Z".to_string(),
        }],
        reports: vec![Report {
            report_id: "REP-USR-XYZ".to_string(),
            location: GeoPoint::new(-1.272, 36.815),
            category: ReportCategory::Logging,
            description: "Heard distinct chainsaw sounds for over 20 minutes from the western ridge."
                .to_string(),
            image_tags: None,
            timestamp: "2023-10-27T09:50:00Z".to_string(),
        }],
    }
}

/// Threat class assigned by the analysis. Unrecognized classes collapse to
/// `Unknown` rather than failing the parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AlertKind {
    Fire,
    Logging,
    Encroachment,
    Charcoal,
    Drought,
    #[default]
    Unknown,
}

impl From<String> for AlertKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "fire" => AlertKind::Fire,
            "logging" => AlertKind::Logging,
            "encroachment" => AlertKind::Encroachment,
            "charcoal" => AlertKind::Charcoal,
            "drought" => AlertKind::Drought,
            _ => AlertKind::Unknown,
        }
    }
}

/// Evidence trail for one alert: the input ids the analysis cited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportingEvidence {
    pub satellite_ids: Vec<String>,
    pub sensor_ids: Vec<String>,
    pub report_ids: Vec<String>,
}

/// One detected threat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Assigned after parsing; the analysis service does not supply ids.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub location: GeoPoint,
    /// Model self-assessment, 0..1.
    pub confidence: f64,
    /// Weighted evidence score, 0..1. Drives the severity band.
    pub threat_weight_score: f64,
    pub explanation: String,
    pub recommended_action: String,
    pub supporting_evidence: SupportingEvidence,
}

/// Region-level roll-up across all alerts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub overall_forest_risk: Severity,
    pub key_hotspots: Vec<String>,
    pub notable_patterns: String,
    pub recommended_priority_zones: Vec<String>,
}

/// A complete forest analysis payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestAnalysis {
    pub alerts: Vec<Alert>,
    pub summary: RiskSummary,
    /// Stamped when the result is applied, not by the analysis service.
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_threat_weight(0.0), Severity::Low);
        assert_eq!(Severity::from_threat_weight(0.19), Severity::Low);
        assert_eq!(Severity::from_threat_weight(0.20), Severity::Moderate);
        assert_eq!(Severity::from_threat_weight(0.44), Severity::Moderate);
        assert_eq!(Severity::from_threat_weight(0.45), Severity::High);
        assert_eq!(Severity::from_threat_weight(0.69), Severity::High);
        assert_eq!(Severity::from_threat_weight(0.70), Severity::Critical);
        assert_eq!(Severity::from_threat_weight(1.0), Severity::Critical);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Low);
    }

    #[test]
    fn test_change_type_wire_names() {
        let json = serde_json::to_string(&ChangeType::VegetationLoss).unwrap();
        assert_eq!(json, "\"vegetation_loss\"");
        let parsed: ChangeType = serde_json::from_str("\"fire\"").unwrap();
        assert_eq!(parsed, ChangeType::Fire);
    }

    #[test]
    fn test_alert_kind_unknown_fallback() {
        let parsed: AlertKind = serde_json::from_str("\"poaching\"").unwrap();
        assert_eq!(parsed, AlertKind::Unknown);
        let parsed: AlertKind = serde_json::from_str("\"charcoal\"").unwrap();
        assert_eq!(parsed, AlertKind::Charcoal);
    }

    #[test]
    fn test_alert_parses_without_id_or_timestamp() {
        let json = r#"{
            "type": "logging",
            "severity": "High",
            "location": {"lat": -1.27, "lng": 36.81},
            "confidence": 0.65,
            "threat_weight_score": 0.65,
            "explanation": "Sensor SN-KRG-A-01 noise at 78.5 dB with report REP-USR-XYZ.",
            "recommended_action": "Dispatch rangers.",
            "supporting_evidence": {
                "satellite_ids": ["ST-KRG-001"],
                "sensor_ids": ["SN-KRG-A-01"],
                "report_ids": ["REP-USR-XYZ"]
            }
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert!(alert.id.is_empty());
        assert_eq!(alert.kind, AlertKind::Logging);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.supporting_evidence.sensor_ids.len(), 1);
    }

    #[test]
    fn test_threat_sample_shape() {
        let input = ForestDataInput::default();
        assert_eq!(input.satellite_tiles.len(), 1);
        assert_eq!(input.sensor_readings.len(), 1);
        assert_eq!(input.reports.len(), 1);
        assert_eq!(input.satellite_tiles[0].coordinates.len(), 4);
        assert_eq!(input.reports[0].category, ReportCategory::Logging);
    }

    #[test]
    fn test_input_wire_field_names() {
        let json = serde_json::to_value(ForestDataInput::default()).unwrap();
        assert!(json.get("satellite_tiles").is_some());
        assert!(json.get("sensor_readings").is_some());
        assert!(json.get("reports").is_some());
        // Optional image tags stay off the wire when absent.
        assert!(json["reports"][0].get("image_tags").is_none());
    }
}
