//! Circular economy data model: smart bin fleet, material market prices,
//! collection transactions, and the waste flow analysis built from them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Material stream a bin or transaction belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Plastic,
    Organic,
    Glass,
    Metal,
    Ewaste,
}

impl WasteType {
    pub fn label(&self) -> &'static str {
        match self {
            WasteType::Plastic => "Plastic",
            WasteType::Organic => "Organic",
            WasteType::Glass => "Glass",
            WasteType::Metal => "Metal",
            WasteType::Ewaste => "E-Waste",
        }
    }
}

/// Connectivity state reported by a bin's telemetry unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinStatus {
    Online,
    Offline,
    Maintenance,
}

/// One IoT-instrumented collection bin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmartBin {
    pub id: String,
    pub location: GeoPoint,
    /// Percent full, 0..100.
    pub fill_level: f64,
    /// Percent charge, 0..100.
    pub battery_level: f64,
    #[serde(rename = "type")]
    pub kind: WasteType,
    pub last_collection: String,
    pub status: BinStatus,
}

/// Direction a material price moved since the last quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

/// Current market quote for one material stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub material: WasteType,
    pub price_per_kg: f64,
    pub trend: PriceTrend,
    pub currency: String,
}

/// One weighed-and-paid collection event at a hub.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WasteTransaction {
    pub id: String,
    pub collector_id: String,
    pub hub_id: String,
    pub waste_type: WasteType,
    pub weight_kg: f64,
    pub payout_amount: f64,
    pub timestamp: String,
}

/// The full input bundle handed to waste flow analysis. Serialized verbatim
/// into the analysis prompt, so field names are part of the wire format.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WasteDataInput {
    pub smart_bins: Vec<SmartBin>,
    pub market_prices: Vec<MarketPrice>,
    pub recent_transactions: Vec<WasteTransaction>,
}

impl Default for WasteDataInput {
    fn default() -> Self {
        nairobi_waste_sample()
    }
}

/// Seed input: three bins around the Nairobi east collection zone, current
/// material quotes, and the morning's two hub transactions.
pub fn nairobi_waste_sample() -> WasteDataInput {
    WasteDataInput {
        smart_bins: vec![
            SmartBin {
                id: "BIN-01".to_string(),
                location: GeoPoint::new(-1.28, 36.82),
                fill_level: 85.0,
                battery_level: 40.0,
                kind: WasteType::Plastic,
                last_collection: "2 days ago".to_string(),
                status: BinStatus::Online,
            },
            SmartBin {
                id: "BIN-02".to_string(),
                location: GeoPoint::new(-1.29, 36.81),
                fill_level: 20.0,
                battery_level: 92.0,
                kind: WasteType::Organic,
                last_collection: "4 hours ago".to_string(),
                status: BinStatus::Online,
            },
            SmartBin {
                id: "BIN-03".to_string(),
                location: GeoPoint::new(-1.30, 36.83),
                fill_level: 98.0,
                battery_level: 15.0,
                kind: WasteType::Metal,
                last_collection: "5 days ago".to_string(),
                status: BinStatus::Maintenance,
            },
        ],
        market_prices: vec![
            MarketPrice {
                material: WasteType::Plastic,
                price_per_kg: 15.0,
                trend: PriceTrend::Up,
                currency: "KES".to_string(),
            },
            MarketPrice {
                material: WasteType::Metal,
                price_per_kg: 45.0,
                trend: PriceTrend::Stable,
                currency: "KES".to_string(),
            },
            MarketPrice {
                material: WasteType::Organic,
                price_per_kg: 5.0,
                trend: PriceTrend::Down,
                currency: "KES".to_string(),
            },
        ],
        recent_transactions: vec![
            WasteTransaction {
                id: "TX-101".to_string(),
                collector_id: "COL-88".to_string(),
                hub_id: "HUB-A".to_string(),
                waste_type: WasteType::Plastic,
                weight_kg: 12.5,
                payout_amount: 187.5,
                timestamp: "2023-10-27T08:30:00Z".to_string(),
            },
            WasteTransaction {
                id: "TX-102".to_string(),
                collector_id: "COL-42".to_string(),
                hub_id: "HUB-A".to_string(),
                waste_type: WasteType::Metal,
                weight_kg: 5.0,
                payout_amount: 225.0,
                timestamp: "2023-10-27T09:15:00Z".to_string(),
            },
        ],
    }
}

/// Fraud exposure band assigned by the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FraudRiskLevel {
    Low,
    Medium,
    High,
}

impl FraudRiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            FraudRiskLevel::Low => "Low",
            FraudRiskLevel::Medium => "Medium",
            FraudRiskLevel::High => "High",
        }
    }
}

/// Roll-up of the waste flow analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WasteAnalysisSummary {
    /// Operational efficiency, 0..100.
    pub efficiency_score: f64,
    pub fraud_risk_level: FraudRiskLevel,
    pub suggested_route_optimization: String,
    /// KES recovered across the analyzed window.
    pub economic_value_generated: f64,
    pub carbon_offset_tonnes: f64,
}

/// A complete waste flow analysis payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircularEconomyResponse {
    pub summary: WasteAnalysisSummary,
    pub actionable_insights: Vec<String>,
    /// Stamped by the service after a successful parse.
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waste_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&WasteType::Ewaste).unwrap(),
            "\"ewaste\""
        );
        let parsed: WasteType = serde_json::from_str("\"plastic\"").unwrap();
        assert_eq!(parsed, WasteType::Plastic);
    }

    #[test]
    fn test_bin_kind_serializes_as_type() {
        let json = serde_json::to_value(&nairobi_waste_sample().smart_bins[0]).unwrap();
        assert_eq!(json["type"], "plastic");
        assert_eq!(json["status"], "online");
    }

    #[test]
    fn test_sample_shape() {
        let input = WasteDataInput::default();
        assert_eq!(input.smart_bins.len(), 3);
        assert_eq!(input.market_prices.len(), 3);
        assert_eq!(input.recent_transactions.len(), 2);
        assert_eq!(input.smart_bins[2].status, BinStatus::Maintenance);
    }

    #[test]
    fn test_response_parses_without_timestamp() {
        let json = r#"{
            "summary": {
                "efficiency_score": 72.0,
                "fraud_risk_level": "Medium",
                "suggested_route_optimization": "Collect BIN-03 before BIN-01.",
                "economic_value_generated": 412.5,
                "carbon_offset_tonnes": 0.04
            },
            "actionable_insights": ["Replace BIN-03 battery."]
        }"#;
        let resp: CircularEconomyResponse = serde_json::from_str(json).unwrap();
        assert!(resp.timestamp.is_empty());
        assert_eq!(resp.summary.fraud_risk_level, FraudRiskLevel::Medium);
    }
}
