//! The analysis service boundary: the operations the dashboard asks of its
//! AI backend and the errors that can come back.

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forest::{ForestAnalysis, ForestDataInput};
use crate::geo::GeoPoint;
use crate::incentives::{GeneratedPesInsights, PesProgram};
use crate::knowledge::{KnowledgeQueryResult, PlantAnalysisResult};
use crate::waste::{CircularEconomyResponse, WasteDataInput};

/// Everything the PES designer sees when asked for new opportunities.
/// Serialized verbatim into the suggestion prompt; analysis slots that have
/// not run yet go over the wire as nulls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveContext {
    pub forest_analysis: Option<ForestAnalysis>,
    pub waste_analysis: Option<CircularEconomyResponse>,
    pub forest_input: ForestDataInput,
    pub waste_input: WasteDataInput,
    pub existing_programs: Vec<PesProgram>,
}

/// Failures crossing the analysis boundary. Display strings surface verbatim
/// in the dashboard's error banner.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No usable configuration: missing API key, unreadable image file.
    #[error("{0}")]
    Config(String),
    /// The request never produced a response.
    #[error("Gemini API Error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A response arrived but was not the JSON that was asked for.
    #[error("Gemini API Error: malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The service answered with an error of its own.
    #[error("Gemini API Error: {0}")]
    Service(String),
}

/// The analysis operations the dashboard dispatches. Implementations run on
/// task pool threads and are free to block.
pub trait AnalysisService: Send + Sync {
    fn analyze_forest(&self, input: &ForestDataInput) -> Result<ForestAnalysis, AnalysisError>;

    fn analyze_waste(&self, input: &WasteDataInput)
        -> Result<CircularEconomyResponse, AnalysisError>;

    fn suggest_incentives(
        &self,
        context: &IncentiveContext,
    ) -> Result<GeneratedPesInsights, AnalysisError>;

    fn query_knowledge(&self, question: &str) -> Result<KnowledgeQueryResult, AnalysisError>;

    fn identify_plant(
        &self,
        image_jpeg: &[u8],
        location: Option<GeoPoint>,
    ) -> Result<PlantAnalysisResult, AnalysisError>;
}

/// The configured backend, if any. The dashboard starts with `None` when no
/// API key is present; dispatch then fails operations immediately with a
/// configuration error instead of spawning tasks.
#[derive(Resource, Default)]
pub struct AnalysisBackend(pub Option<Arc<dyn AnalysisService>>);
