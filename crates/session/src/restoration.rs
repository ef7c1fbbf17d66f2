//! Restoration projects and the partner organizations behind them. Both are
//! static registers for now; projects surface on the map and partners roll
//! into the incentive panel counts.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Intervention class a restoration project runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorationType {
    MangrovePlanting,
    ForestReplanting,
    BeachCleanup,
    WetlandRestoration,
}

/// Ecosystem a project operates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Mangrove,
    Forest,
    Wetland,
    Other,
}

impl Ecosystem {
    pub fn label(&self) -> &'static str {
        match self {
            Ecosystem::Mangrove => "Mangrove",
            Ecosystem::Forest => "Forest",
            Ecosystem::Wetland => "Wetland",
            Ecosystem::Other => "Other",
        }
    }
}

/// Lifecycle state of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planned,
    Active,
    Completed,
}

/// A named site coordinate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

/// Outcome metrics, filled in as a project reports them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorationMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_ha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mangroves_planted: Option<f64>,
    /// 0..1 survival across planted stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mangrove_survival_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trees_planted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash_removed_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e_sequestered_tons: Option<f64>,
}

/// Who is doing the work on the ground.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParticipants {
    pub community_group_ids: Vec<String>,
    pub individual_ids: Vec<String>,
    pub partner_ids: Vec<String>,
}

/// Funding attached to a project, including an optional PES program link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIncentives {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pes_program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_budget_kes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursed_kes: Option<f64>,
}

/// One restoration project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorationProject {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RestorationType,
    pub location: SiteLocation,
    pub ecosystem: Ecosystem,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_alerts_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub metrics: RestorationMetrics,
    pub participants: ProjectParticipants,
    pub incentives: ProjectIncentives,
}

/// Kind of organization a partner is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerType {
    Community,
    Ngo,
    Cbo,
    TourOperator,
    KnowledgePartner,
    Donor,
}

/// What a partner has put in so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerContributions {
    #[serde(default)]
    pub documents_uploaded: f64,
    #[serde(default)]
    pub training_events: f64,
    #[serde(default)]
    pub volunteer_hours: f64,
    #[serde(default)]
    pub funds_contributed_kes: f64,
}

/// An organization participating in restoration work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PartnerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    pub roles: Vec<String>,
    pub linked_projects_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub contributions: PartnerContributions,
}

/// Register of restoration projects.
#[derive(Resource, Clone, Debug)]
pub struct RestorationProjects(pub Vec<RestorationProject>);

impl Default for RestorationProjects {
    fn default() -> Self {
        Self(coastal_projects())
    }
}

/// Register of partner organizations.
#[derive(Resource, Clone, Debug)]
pub struct Partners(pub Vec<Partner>);

impl Default for Partners {
    fn default() -> Self {
        Self(coastal_partners())
    }
}

fn coastal_projects() -> Vec<RestorationProject> {
    vec![
        RestorationProject {
            id: "REST-MANG-001".to_string(),
            name: "Gazi Bay Mangrove Restoration".to_string(),
            kind: RestorationType::MangrovePlanting,
            location: SiteLocation {
                lat: -4.42,
                lng: 39.50,
                label: "Gazi Bay, Kwale".to_string(),
            },
            ecosystem: Ecosystem::Mangrove,
            status: ProjectStatus::Active,
            degradation_source: Some("Historical illegal logging".to_string()),
            linked_alerts_ids: None,
            start_date: Some("2023-01-15".to_string()),
            end_date: None,
            metrics: RestorationMetrics {
                area_ha: Some(15.0),
                mangroves_planted: Some(12_000.0),
                mangrove_survival_rate: Some(0.82),
                co2e_sequestered_tons: Some(450.0),
                ..Default::default()
            },
            participants: ProjectParticipants {
                community_group_ids: vec!["CFA-GAZI".to_string()],
                individual_ids: Vec::new(),
                partner_ids: vec!["PART-KMFRI".to_string()],
            },
            incentives: ProjectIncentives {
                pes_program_id: Some("PES-MIKOKO-PAMOJA".to_string()),
                total_budget_kes: Some(1_500_000.0),
                disbursed_kes: Some(850_000.0),
            },
        },
        RestorationProject {
            id: "REST-FOR-002".to_string(),
            name: "Arabuko-Sokoke Seedling Initiative".to_string(),
            kind: RestorationType::ForestReplanting,
            location: SiteLocation {
                lat: -3.30,
                lng: 39.90,
                label: "Arabuko-Sokoke Forest".to_string(),
            },
            ecosystem: Ecosystem::Forest,
            status: ProjectStatus::Planned,
            degradation_source: Some("Charcoal burning encroachment".to_string()),
            linked_alerts_ids: None,
            start_date: None,
            end_date: None,
            metrics: RestorationMetrics {
                area_ha: Some(5.0),
                trees_planted: Some(0.0),
                co2e_sequestered_tons: Some(0.0),
                ..Default::default()
            },
            participants: ProjectParticipants {
                community_group_ids: vec!["CFA-SOKOKE".to_string()],
                individual_ids: Vec::new(),
                partner_ids: Vec::new(),
            },
            incentives: ProjectIncentives {
                pes_program_id: None,
                total_budget_kes: Some(500_000.0),
                disbursed_kes: Some(0.0),
            },
        },
    ]
}

fn coastal_partners() -> Vec<Partner> {
    vec![
        Partner {
            id: "PART-KMFRI".to_string(),
            name: "Kenya Marine and Fisheries Research Institute".to_string(),
            kind: PartnerType::KnowledgePartner,
            location_label: Some("Mombasa".to_string()),
            roles: vec![
                "Scientific Advisor".to_string(),
                "Monitoring & Evaluation".to_string(),
            ],
            linked_projects_ids: vec!["REST-MANG-001".to_string()],
            description: Some(
                "Leading marine research body providing scientific data and monitoring \
                 protocols for mangrove restoration."
                    .to_string(),
            ),
            contributions: PartnerContributions {
                documents_uploaded: 15.0,
                training_events: 4.0,
                volunteer_hours: 0.0,
                funds_contributed_kes: 0.0,
            },
        },
        Partner {
            id: "PART-ECO-TOURS".to_string(),
            name: "Blue Belt Eco-Adventures".to_string(),
            kind: PartnerType::TourOperator,
            location_label: Some("Diani".to_string()),
            roles: vec!["Eco-Tourism Provider".to_string(), "Donor".to_string()],
            linked_projects_ids: vec!["REST-MANG-001".to_string()],
            description: Some(
                "Local tour operator channeling eco-fees directly to community restoration \
                 groups."
                    .to_string(),
            ),
            contributions: PartnerContributions {
                documents_uploaded: 0.0,
                training_events: 0.0,
                volunteer_hours: 0.0,
                funds_contributed_kes: 450_000.0,
            },
        },
        Partner {
            id: "PART-CFA-GAZI".to_string(),
            name: "Gazi Bay Community Forest Association".to_string(),
            kind: PartnerType::Community,
            location_label: Some("Gazi Bay".to_string()),
            roles: vec![
                "Restoration Implementer".to_string(),
                "Community Mobilizer".to_string(),
            ],
            linked_projects_ids: vec!["REST-MANG-001".to_string()],
            description: Some(
                "Community group dedicated to planting and protecting mangrove forests via \
                 local nurseries."
                    .to_string(),
            ),
            contributions: PartnerContributions {
                documents_uploaded: 2.0,
                training_events: 12.0,
                volunteer_hours: 3500.0,
                funds_contributed_kes: 0.0,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_registers() {
        let projects = RestorationProjects::default();
        let partners = Partners::default();
        assert_eq!(projects.0.len(), 2);
        assert_eq!(partners.0.len(), 3);
        assert_eq!(projects.0[0].status, ProjectStatus::Active);
        assert!(projects.0[0].incentives.pes_program_id.is_some());
        assert!(projects.0[1].incentives.pes_program_id.is_none());
    }

    #[test]
    fn test_project_wire_casing() {
        let projects = RestorationProjects::default();
        let json = serde_json::to_value(&projects.0[0]).unwrap();
        assert_eq!(json["type"], "mangrove_planting");
        assert_eq!(json["ecosystem"], "mangrove");
        assert!(json["metrics"].get("mangroveSurvivalRate").is_some());
        assert!(json["incentives"].get("pesProgramId").is_some());
        assert!(json["participants"].get("communityGroupIds").is_some());
    }

    #[test]
    fn test_partner_wire_casing() {
        let partners = Partners::default();
        let json = serde_json::to_value(&partners.0[0]).unwrap();
        assert_eq!(json["type"], "knowledge_partner");
        assert!(json["contributions"].get("documentsUploaded").is_some());
        assert!(json.get("linkedProjectsIds").is_some());
    }
}
