//! AI-backed analysis operations. The UI raises [`AnalysisRequest`] events;
//! dispatch snapshots the relevant session data and spawns a blocking service
//! call on the compute pool; collection folds results back into
//! [`AnalysisSessions`] under a sequence fence.

mod gemini;
mod ops;
mod prompts;
mod service;
mod tasks;

pub use gemini::{GeminiService, API_KEY_ENV, MODEL_ENV};
pub use ops::{AnalysisRequest, AnalysisSessions, Operation, OperationPhase};
pub use service::{AnalysisBackend, AnalysisError, AnalysisService, IncentiveContext};
pub use tasks::{collect_analysis_results, dispatch_analysis_requests, AnalysisTask};

use bevy::prelude::*;

pub struct AnalysisPlugin;

impl Plugin for AnalysisPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnalysisSessions>()
            .init_resource::<AnalysisBackend>()
            .add_event::<AnalysisRequest>()
            .add_systems(
                Update,
                (
                    dispatch_analysis_requests,
                    bevy::ecs::schedule::apply_deferred,
                    collect_analysis_results,
                )
                    .chain(),
            );
    }
}
