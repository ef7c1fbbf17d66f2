//! Bio-knowledge query results: freeform ecosystem questions and plant
//! identification from field photos.

use serde::{Deserialize, Serialize};

/// Answer to a freeform ecosystem question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeQueryResult {
    pub answer: String,
    pub related_species: Vec<String>,
    pub suggested_actions: Vec<String>,
}

/// Conservation status assigned to an identified plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantStatus {
    Invasive,
    Native,
    Endangered,
    Common,
}

impl PlantStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PlantStatus::Invasive => "Invasive",
            PlantStatus::Native => "Native",
            PlantStatus::Endangered => "Endangered",
            PlantStatus::Common => "Common",
        }
    }
}

/// Profile returned for a photographed plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantAnalysisResult {
    pub common_name: String,
    pub scientific_name: String,
    pub status: PlantStatus,
    pub health_assessment: String,
    pub preservation_actions: Vec<String>,
    pub fun_fact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_profile_wire_casing() {
        let json = r#"{
            "commonName": "Mathenge",
            "scientificName": "Prosopis juliflora",
            "status": "Invasive",
            "healthAssessment": "Thriving, dense thicket formation.",
            "preservationActions": ["Mechanical removal", "Charcoal conversion"],
            "funFact": "Introduced in the 1970s for dryland reforestation."
        }"#;
        let profile: PlantAnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(profile.status, PlantStatus::Invasive);
        assert_eq!(profile.preservation_actions.len(), 2);
    }

    #[test]
    fn test_knowledge_result_wire_casing() {
        let json = r#"{
            "answer": "Mangroves buffer storm surge and nurse juvenile fish.",
            "relatedSpecies": ["Rhizophora mucronata"],
            "suggestedActions": ["Join a community planting day"]
        }"#;
        let result: KnowledgeQueryResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.related_species.len(), 1);
    }
}
