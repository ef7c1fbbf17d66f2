//! Payment-for-ecosystem-services programs: the active program register,
//! readiness and payment estimation, and benefit share bookkeeping.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// KES per hectare protected per month.
const RATE_PER_HA_PROTECTED: f64 = 1200.0;
/// KES premium per kg recycled.
const RATE_PER_KG_DIVERTED: f64 = 10.0;
/// KES per ton CO2 offset.
const RATE_PER_TON_CO2: f64 = 500.0;

/// Which module a program pays out against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PesProgramType {
    Forest,
    Waste,
}

/// One stakeholder's slice of a program's payouts. Percentages are meant to
/// sum to 100 across a program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenefitShare {
    pub stakeholder: String,
    pub percentage: f64,
}

/// Performance metrics a program is assessed on. Forest programs fill the
/// first pair, waste programs the second.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PesMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forest_alerts_avoided: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ha_monitored: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_diversion_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_avoided_tons: Option<f64>,
}

/// A payment-for-ecosystem-services program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PesProgram {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PesProgramType,
    /// Map marker coordinate, when the program has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub location_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_forest_area_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_waste_zone_ids: Option<Vec<String>>,
    pub metrics: PesMetrics,
    /// 0..1, from data quality and governance indicators.
    pub readiness_score: f64,
    pub indicative_payment_per_period_kes: f64,
    pub benefit_sharing: Vec<BenefitShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// What the analysis service proposes when asked for new opportunities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPesInsights {
    pub suggested_programs: Vec<PesProgram>,
    pub narrative_summary: String,
}

/// The active program register. Suggested programs are merged in by id and
/// never replace an existing entry.
#[derive(Resource, Clone, Debug)]
pub struct PesPrograms(pub Vec<PesProgram>);

impl Default for PesPrograms {
    fn default() -> Self {
        Self(initial_programs())
    }
}

impl PesPrograms {
    /// Whether any program claims the given forest area or waste zone id.
    pub fn links_asset(&self, asset_id: &str) -> bool {
        self.0.iter().any(|p| {
            p.linked_forest_area_ids
                .as_deref()
                .is_some_and(|ids| ids.iter().any(|id| id == asset_id))
                || p.linked_waste_zone_ids
                    .as_deref()
                    .is_some_and(|ids| ids.iter().any(|id| id == asset_id))
        })
    }

    /// Insert-only merge: suggestions whose id is already registered are
    /// dropped, everything else is appended in order.
    pub fn merge_suggestions(&mut self, suggestions: &[PesProgram]) -> usize {
        let mut added = 0;
        for suggestion in suggestions {
            if self.0.iter().any(|p| p.id == suggestion.id) {
                continue;
            }
            self.0.push(suggestion.clone());
            added += 1;
        }
        added
    }
}

fn initial_programs() -> Vec<PesProgram> {
    vec![
        PesProgram {
            id: "PES-FOREST-001".to_string(),
            name: "Mau Forest Block A Conservation".to_string(),
            kind: PesProgramType::Forest,
            location: Some(GeoPoint::new(-0.55, 35.7)),
            location_label: "Mau Complex, Rift Valley".to_string(),
            linked_forest_area_ids: Some(vec!["AREA-MAU-A".to_string()]),
            linked_waste_zone_ids: None,
            metrics: PesMetrics {
                ha_monitored: Some(500.0),
                forest_alerts_avoided: Some(12.0),
                ..Default::default()
            },
            readiness_score: 0.85,
            indicative_payment_per_period_kes: 600_000.0,
            benefit_sharing: vec![
                BenefitShare {
                    stakeholder: "Community Forest Association".to_string(),
                    percentage: 60.0,
                },
                BenefitShare {
                    stakeholder: "KWS Ranger Support".to_string(),
                    percentage: 25.0,
                },
                BenefitShare {
                    stakeholder: "Platform Admin Fee".to_string(),
                    percentage: 15.0,
                },
            ],
            notes: Some("High readiness due to dense sensor network.".to_string()),
        },
        PesProgram {
            id: "PES-WASTE-002".to_string(),
            name: "Nairobi East Circular Pilot".to_string(),
            kind: PesProgramType::Waste,
            location: Some(GeoPoint::new(-1.285, 36.89)),
            location_label: "Embakasi / Dandora".to_string(),
            linked_forest_area_ids: None,
            linked_waste_zone_ids: Some(vec!["ZONE-NBO-E".to_string()]),
            metrics: PesMetrics {
                waste_diversion_kg: Some(2500.0),
                co2e_avoided_tons: Some(6.25),
                ..Default::default()
            },
            readiness_score: 0.65,
            indicative_payment_per_period_kes: 28_125.0,
            benefit_sharing: vec![
                BenefitShare {
                    stakeholder: "Waste Picker Cooperative".to_string(),
                    percentage: 70.0,
                },
                BenefitShare {
                    stakeholder: "Aggregator Hub".to_string(),
                    percentage: 20.0,
                },
                BenefitShare {
                    stakeholder: "Platform Admin Fee".to_string(),
                    percentage: 10.0,
                },
            ],
            notes: Some("Data gaps in manual weighing logs affect score.".to_string()),
        },
    ]
}

/// Readiness from metric availability and governance signals. Starts at 0.5,
/// earns bonuses for strong metrics and linked assets, loses 0.2 when no
/// benefit sharing is defined. Clamped to 0..1.
pub fn compute_readiness_score(program: &PesProgram) -> f64 {
    let mut score: f64 = 0.5;

    match program.kind {
        PesProgramType::Forest => {
            if program.metrics.ha_monitored.unwrap_or(0.0) > 100.0 {
                score += 0.2;
            }
            if program
                .linked_forest_area_ids
                .as_deref()
                .is_some_and(|ids| !ids.is_empty())
            {
                score += 0.1;
            }
        }
        PesProgramType::Waste => {
            if program.metrics.waste_diversion_kg.unwrap_or(0.0) > 500.0 {
                score += 0.2;
            }
            if program
                .linked_waste_zone_ids
                .as_deref()
                .is_some_and(|ids| !ids.is_empty())
            {
                score += 0.1;
            }
        }
    }

    if program.benefit_sharing.is_empty() {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Indicative monthly payment from performance metrics. Forest programs pay
/// per hectare monitored; waste programs pay a diversion premium plus carbon
/// credit value.
pub fn estimate_indicative_payment_kes(program: &PesProgram) -> f64 {
    match program.kind {
        PesProgramType::Forest => {
            program.metrics.ha_monitored.unwrap_or(0.0) * RATE_PER_HA_PROTECTED
        }
        PesProgramType::Waste => {
            program.metrics.waste_diversion_kg.unwrap_or(0.0) * RATE_PER_KG_DIVERTED
                + program.metrics.co2e_avoided_tons.unwrap_or(0.0) * RATE_PER_TON_CO2
        }
    }
}

/// Rescale percentages to sum to 100, rounding each share. A zero total is
/// returned unchanged to avoid dividing by zero.
pub fn normalize_benefit_sharing(shares: &[BenefitShare]) -> Vec<BenefitShare> {
    if shares.is_empty() {
        return Vec::new();
    }

    let total: f64 = shares.iter().map(|s| s.percentage).sum();
    if total == 0.0 {
        return shares.to_vec();
    }

    shares
        .iter()
        .map(|s| BenefitShare {
            stakeholder: s.stakeholder.clone(),
            percentage: (s.percentage / total * 100.0).round(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest_program(ha: f64, linked: bool, shares: usize) -> PesProgram {
        PesProgram {
            id: "PES-TEST".to_string(),
            name: "Test Program".to_string(),
            kind: PesProgramType::Forest,
            location: None,
            location_label: "Test".to_string(),
            linked_forest_area_ids: linked.then(|| vec!["AREA-1".to_string()]),
            linked_waste_zone_ids: None,
            metrics: PesMetrics {
                ha_monitored: Some(ha),
                ..Default::default()
            },
            readiness_score: 0.0,
            indicative_payment_per_period_kes: 0.0,
            benefit_sharing: (0..shares)
                .map(|i| BenefitShare {
                    stakeholder: format!("S{i}"),
                    percentage: 50.0,
                })
                .collect(),
            notes: None,
        }
    }

    #[test]
    fn test_readiness_forest_full_marks() {
        let program = forest_program(500.0, true, 2);
        assert!((compute_readiness_score(&program) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readiness_penalizes_missing_shares() {
        let program = forest_program(500.0, true, 0);
        assert!((compute_readiness_score(&program) - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readiness_small_area_no_links() {
        let program = forest_program(50.0, false, 2);
        assert!((compute_readiness_score(&program) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readiness_clamped_low() {
        let mut program = forest_program(0.0, false, 0);
        program.benefit_sharing.clear();
        let score = compute_readiness_score(&program);
        assert!(score >= 0.0);
    }

    #[test]
    fn test_payment_forest_rate() {
        let program = forest_program(500.0, false, 1);
        assert!((estimate_indicative_payment_kes(&program) - 600_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payment_waste_combines_diversion_and_carbon() {
        let mut program = forest_program(0.0, false, 1);
        program.kind = PesProgramType::Waste;
        program.metrics = PesMetrics {
            waste_diversion_kg: Some(2500.0),
            co2e_avoided_tons: Some(6.25),
            ..Default::default()
        };
        assert!((estimate_indicative_payment_kes(&program) - 28_125.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_rescales_to_100() {
        let shares = vec![
            BenefitShare {
                stakeholder: "A".to_string(),
                percentage: 30.0,
            },
            BenefitShare {
                stakeholder: "B".to_string(),
                percentage: 30.0,
            },
        ];
        let normalized = normalize_benefit_sharing(&shares);
        assert!((normalized[0].percentage - 50.0).abs() < f64::EPSILON);
        assert!((normalized[1].percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_keeps_sets_already_at_100() {
        let shares = vec![
            BenefitShare {
                stakeholder: "Community Forest Association".to_string(),
                percentage: 60.0,
            },
            BenefitShare {
                stakeholder: "KWS Ranger Support".to_string(),
                percentage: 25.0,
            },
            BenefitShare {
                stakeholder: "Platform Admin Fee".to_string(),
                percentage: 15.0,
            },
        ];
        assert_eq!(normalize_benefit_sharing(&shares), shares);
    }

    #[test]
    fn test_readiness_always_within_unit_interval() {
        for metric in [0.0, 50.0, 101.0, 5000.0] {
            for linked in [false, true] {
                for shares in [0, 3] {
                    let program = forest_program(metric, linked, shares);
                    let score = compute_readiness_score(&program);
                    assert!((0.0..=1.0).contains(&score), "score {score} out of range");
                }
            }
        }
    }

    #[test]
    fn test_normalize_empty_and_zero_total() {
        assert!(normalize_benefit_sharing(&[]).is_empty());
        let zeros = vec![BenefitShare {
            stakeholder: "A".to_string(),
            percentage: 0.0,
        }];
        let normalized = normalize_benefit_sharing(&zeros);
        assert!((normalized[0].percentage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_skips_existing_ids() {
        let mut register = PesPrograms::default();
        let existing_id = register.0[0].id.clone();
        let mut replacement = register.0[0].clone();
        replacement.name = "Overwritten".to_string();
        let mut fresh = register.0[1].clone();
        fresh.id = "PES-NEW-003".to_string();

        let added = register.merge_suggestions(&[replacement, fresh]);
        assert_eq!(added, 1);
        assert_eq!(register.0.len(), 3);
        let kept = register.0.iter().find(|p| p.id == existing_id).unwrap();
        assert_eq!(kept.name, "Mau Forest Block A Conservation");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut register = PesPrograms::default();
        let mut fresh = register.0[0].clone();
        fresh.id = "PES-NEW-003".to_string();
        register.merge_suggestions(&[fresh.clone()]);
        let added = register.merge_suggestions(&[fresh]);
        assert_eq!(added, 0);
        assert_eq!(register.0.len(), 3);
    }

    #[test]
    fn test_links_asset() {
        let register = PesPrograms::default();
        assert!(register.links_asset("AREA-MAU-A"));
        assert!(register.links_asset("ZONE-NBO-E"));
        assert!(!register.links_asset("AREA-UNKNOWN"));
    }

    #[test]
    fn test_program_wire_casing() {
        let register = PesPrograms::default();
        let json = serde_json::to_value(&register.0[0]).unwrap();
        assert_eq!(json["type"], "forest");
        assert!(json.get("locationLabel").is_some());
        assert!(json.get("readinessScore").is_some());
        assert!(json.get("indicativePaymentPerPeriodKes").is_some());
        assert!(json["metrics"].get("haMonitored").is_some());
        assert!(json.get("linkedWasteZoneIds").is_none());
    }

    #[test]
    fn test_suggestion_parses_without_location() {
        let json = r#"{
            "id": "PES-KILIFI-003",
            "name": "Kilifi Creek Mangrove PES",
            "type": "forest",
            "locationLabel": "Kilifi Creek",
            "metrics": {"haMonitored": 120},
            "readinessScore": 0.7,
            "indicativePaymentPerPeriodKes": 144000,
            "benefitSharing": [{"stakeholder": "CFA", "percentage": 100}]
        }"#;
        let program: PesProgram = serde_json::from_str(json).unwrap();
        assert!(program.location.is_none());
        assert!(program.linked_forest_area_ids.is_none());
        assert_eq!(program.kind, PesProgramType::Forest);
    }
}
