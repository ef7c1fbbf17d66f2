//! Google Gemini backend for the analysis service. Talks to the
//! `generateContent` REST endpoint with a structured response schema per
//! operation, so every reply parses straight into the session types.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::clock;
use crate::forest::{ForestAnalysis, ForestDataInput};
use crate::geo::GeoPoint;
use crate::incentives::GeneratedPesInsights;
use crate::knowledge::{KnowledgeQueryResult, PlantAnalysisResult};
use crate::waste::{CircularEconomyResponse, WasteDataInput};

use super::prompts;
use super::service::{AnalysisError, AnalysisService, IncentiveContext};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model id.
pub const MODEL_ENV: &str = "FORESTWATCH_MODEL";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Forest analysis over a dense sensor bundle can take tens of seconds.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub struct GeminiService {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiService {
    /// Build from `GEMINI_API_KEY` (required) and `FORESTWATCH_MODEL`
    /// (optional, defaults to `gemini-2.5-flash`).
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AnalysisError::Config(format!("{API_KEY_ENV} is not set")))?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    pub fn new(api_key: String, model: String) -> Result<Self, AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one `generateContent` call and return the text of the first
    /// candidate part, trimmed.
    fn generate(
        &self,
        system_prompt: &str,
        content: Value,
        schema: Value,
        temperature: f64,
    ) -> Result<String, AnalysisError> {
        let url = format!("{ENDPOINT_BASE}/{}:generateContent", self.model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [content],
            "generationConfig": {
                "temperature": temperature,
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let payload: Value = response.json()?;
        if !status.is_success() {
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("request rejected")
                .to_string();
            return Err(AnalysisError::Service(message));
        }

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AnalysisError::Service("response contained no text part".to_string()))
    }
}

impl AnalysisService for GeminiService {
    fn analyze_forest(&self, input: &ForestDataInput) -> Result<ForestAnalysis, AnalysisError> {
        let data_json = serde_json::to_string(input)?;
        let content = text_content(&prompts::forest_user_prompt(&data_json));
        let text = self.generate(prompts::FOREST_SYSTEM_PROMPT, content, forest_schema(), 0.1)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn analyze_waste(
        &self,
        input: &WasteDataInput,
    ) -> Result<CircularEconomyResponse, AnalysisError> {
        let data_json = serde_json::to_string(input)?;
        let content = text_content(&prompts::waste_user_prompt(&data_json));
        let text = self.generate(prompts::WASTE_SYSTEM_PROMPT, content, waste_schema(), 0.1)?;
        let mut result: CircularEconomyResponse = serde_json::from_str(&text)?;
        result.timestamp = clock::now_stamp();
        Ok(result)
    }

    fn suggest_incentives(
        &self,
        context: &IncentiveContext,
    ) -> Result<GeneratedPesInsights, AnalysisError> {
        let context_json = serde_json::to_string(context)?;
        let content = text_content(&prompts::incentives_user_prompt(&context_json));
        // Slightly higher temperature; policy suggestions benefit from variety.
        let text = self.generate(prompts::PES_SYSTEM_PROMPT, content, incentives_schema(), 0.3)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn query_knowledge(&self, question: &str) -> Result<KnowledgeQueryResult, AnalysisError> {
        let content = text_content(&prompts::knowledge_user_prompt(question));
        let text =
            self.generate(prompts::KNOWLEDGE_SYSTEM_PROMPT, content, knowledge_schema(), 0.4)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn identify_plant(
        &self,
        image_jpeg: &[u8],
        location: Option<GeoPoint>,
    ) -> Result<PlantAnalysisResult, AnalysisError> {
        let content = json!({
            "parts": [
                {
                    "inlineData": {
                        "mimeType": "image/jpeg",
                        "data": BASE64.encode(image_jpeg),
                    }
                },
                { "text": prompts::plant_user_prompt(location) },
            ]
        });
        let text = self.generate(prompts::BOTANIST_SYSTEM_PROMPT, content, botanist_schema(), 0.2)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn text_content(prompt: &str) -> Value {
    json!({ "parts": [{ "text": prompt }] })
}

fn forest_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "alerts": {
                "type": "ARRAY",
                "description": "A list of detected threats.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "description": "Type of threat." },
                        "severity": { "type": "STRING", "description": "Severity of the threat." },
                        "location": {
                            "type": "OBJECT",
                            "properties": {
                                "lat": { "type": "NUMBER" },
                                "lng": { "type": "NUMBER" },
                            },
                            "required": ["lat", "lng"],
                        },
                        "confidence": { "type": "NUMBER", "description": "Confidence score from 0 to 1." },
                        "threat_weight_score": { "type": "NUMBER", "description": "Calculated threat weight score from 0 to 1." },
                        "explanation": { "type": "STRING", "description": "Detailed explanation citing specific data points." },
                        "recommended_action": { "type": "STRING", "description": "Suggested response action." },
                        "supporting_evidence": {
                            "type": "OBJECT",
                            "properties": {
                                "satellite_ids": { "type": "ARRAY", "items": { "type": "STRING" } },
                                "sensor_ids": { "type": "ARRAY", "items": { "type": "STRING" } },
                                "report_ids": { "type": "ARRAY", "items": { "type": "STRING" } },
                            },
                        },
                    },
                    "required": ["type", "severity", "location", "confidence", "threat_weight_score", "explanation", "recommended_action", "supporting_evidence"],
                },
            },
            "summary": {
                "type": "OBJECT",
                "description": "An overall summary of forest health.",
                "properties": {
                    "overall_forest_risk": { "type": "STRING", "description": "Overall risk level." },
                    "key_hotspots": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "List of high-risk zones." },
                    "notable_patterns": { "type": "STRING", "description": "Observed trends or patterns." },
                    "recommended_priority_zones": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "Zones needing immediate attention." },
                },
                "required": ["overall_forest_risk", "key_hotspots", "notable_patterns", "recommended_priority_zones"],
            },
        },
        "required": ["alerts", "summary"],
    })
}

fn waste_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "OBJECT",
                "properties": {
                    "efficiency_score": { "type": "NUMBER" },
                    "fraud_risk_level": { "type": "STRING" },
                    "suggested_route_optimization": { "type": "STRING" },
                    "economic_value_generated": { "type": "NUMBER" },
                    "carbon_offset_tonnes": { "type": "NUMBER" },
                },
                "required": ["efficiency_score", "fraud_risk_level", "suggested_route_optimization", "economic_value_generated", "carbon_offset_tonnes"],
            },
            "actionable_insights": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
            },
        },
        "required": ["summary", "actionable_insights"],
    })
}

fn incentives_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestedPrograms": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "locationLabel": { "type": "STRING" },
                        "metrics": {
                            "type": "OBJECT",
                            "properties": {
                                "forestAlertsAvoided": { "type": "NUMBER" },
                                "haMonitored": { "type": "NUMBER" },
                                "wasteDiversionKg": { "type": "NUMBER" },
                                "co2eAvoidedTons": { "type": "NUMBER" },
                            },
                        },
                        "readinessScore": { "type": "NUMBER" },
                        "indicativePaymentPerPeriodKes": { "type": "NUMBER" },
                        "benefitSharing": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "stakeholder": { "type": "STRING" },
                                    "percentage": { "type": "NUMBER" },
                                },
                                "required": ["stakeholder", "percentage"],
                            },
                        },
                        "notes": { "type": "STRING" },
                    },
                    "required": ["id", "name", "type", "locationLabel", "metrics", "readinessScore", "indicativePaymentPerPeriodKes", "benefitSharing", "notes"],
                },
            },
            "narrativeSummary": { "type": "STRING" },
        },
        "required": ["suggestedPrograms", "narrativeSummary"],
    })
}

fn knowledge_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "answer": { "type": "STRING" },
            "relatedSpecies": { "type": "ARRAY", "items": { "type": "STRING" } },
            "suggestedActions": { "type": "ARRAY", "items": { "type": "STRING" } },
        },
        "required": ["answer", "relatedSpecies", "suggestedActions"],
    })
}

fn botanist_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "commonName": { "type": "STRING" },
            "scientificName": { "type": "STRING" },
            "status": { "type": "STRING" },
            "healthAssessment": { "type": "STRING" },
            "preservationActions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "funFact": { "type": "STRING" },
        },
        "required": ["commonName", "scientificName", "status", "healthAssessment", "preservationActions", "funFact"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_schema_requires_alerts_and_summary() {
        let schema = forest_schema();
        assert_eq!(schema["required"], json!(["alerts", "summary"]));
        let alert_required = &schema["properties"]["alerts"]["items"]["required"];
        assert!(alert_required
            .as_array()
            .is_some_and(|fields| fields.len() == 8));
    }

    #[test]
    fn test_incentive_schema_requires_notes_on_every_program() {
        let schema = incentives_schema();
        let required = schema["properties"]["suggestedPrograms"]["items"]["required"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert!(required.contains(&json!("notes")));
        assert!(required.contains(&json!("benefitSharing")));
    }

    #[test]
    fn test_schema_payloads_parse_into_session_types() {
        let forest_text = r#"{
            "alerts": [],
            "summary": {
                "overall_forest_risk": "Low",
                "key_hotspots": [],
                "notable_patterns": "No significant anomalies detected.",
                "recommended_priority_zones": []
            }
        }"#;
        let parsed: ForestAnalysis =
            serde_json::from_str(forest_text).expect("schema output should deserialize");
        assert!(parsed.alerts.is_empty());
        assert!(parsed.timestamp.is_empty());
    }
}
