//! Async plumbing between the UI and the analysis service. Requests spawn
//! blocking service calls on the compute task pool; a carrier entity holds
//! each in-flight task until its result is collected back into the session.

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
use futures_lite::future;

use crate::clock;
use crate::forest::{ForestAnalysis, ForestDataInput};
use crate::geo::UserLocation;
use crate::incentives::{GeneratedPesInsights, PesPrograms};
use crate::knowledge::{KnowledgeQueryResult, PlantAnalysisResult};
use crate::selection::Selection;
use crate::waste::{CircularEconomyResponse, WasteDataInput};

use super::gemini::API_KEY_ENV;
use super::ops::{assign_alert_identity, AnalysisRequest, AnalysisSessions};
use super::service::{AnalysisBackend, AnalysisError, IncentiveContext};

/// One in-flight analysis call, fenced by the sequence number its completion
/// must present to the owning slot.
#[derive(Component)]
pub struct AnalysisTask {
    task: Task<TaskOutput>,
    seq: u64,
}

enum TaskOutput {
    Forest(Result<ForestAnalysis, AnalysisError>),
    Waste(Result<CircularEconomyResponse, AnalysisError>),
    Incentives(Result<GeneratedPesInsights, AnalysisError>),
    Knowledge(Result<KnowledgeQueryResult, AnalysisError>),
    Plant(Result<PlantAnalysisResult, AnalysisError>),
}

fn unconfigured_message() -> String {
    AnalysisError::Config(format!(
        "analysis backend is not configured; set {API_KEY_ENV}"
    ))
    .to_string()
}

/// Turn each UI request into a spawned service call. A request for a slot
/// that is already pending is dropped; the UI disables those buttons, so a
/// duplicate here means a race worth logging.
pub fn dispatch_analysis_requests(
    mut commands: Commands,
    mut requests: EventReader<AnalysisRequest>,
    backend: Res<AnalysisBackend>,
    mut sessions: ResMut<AnalysisSessions>,
    mut selection: ResMut<Selection>,
    forest_input: Res<ForestDataInput>,
    waste_input: Res<WasteDataInput>,
    programs: Res<PesPrograms>,
    user_location: Res<UserLocation>,
) {
    let pool = AsyncComputeTaskPool::get();

    for request in requests.read() {
        match request {
            AnalysisRequest::Forest => {
                if sessions.forest.is_pending() {
                    warn!("forest analysis already running, ignoring request");
                    continue;
                }
                let Some(service) = backend.0.clone() else {
                    warn!("forest analysis requested without a configured backend");
                    sessions.forest.fail_now(unconfigured_message());
                    continue;
                };
                // A fresh sweep replaces every alert, so whatever alert was
                // selected stops existing the moment this request lands.
                selection.clear_alert();
                let seq = sessions.forest.begin();
                let input = (*forest_input).clone();
                let task = pool
                    .spawn(async move { TaskOutput::Forest(service.analyze_forest(&input)) });
                commands.spawn(AnalysisTask { task, seq });
                info!("forest analysis dispatched");
            }
            AnalysisRequest::Waste => {
                if sessions.waste.is_pending() {
                    warn!("waste analysis already running, ignoring request");
                    continue;
                }
                let Some(service) = backend.0.clone() else {
                    warn!("waste analysis requested without a configured backend");
                    sessions.waste.fail_now(unconfigured_message());
                    continue;
                };
                let seq = sessions.waste.begin();
                let input = (*waste_input).clone();
                let task =
                    pool.spawn(async move { TaskOutput::Waste(service.analyze_waste(&input)) });
                commands.spawn(AnalysisTask { task, seq });
                info!("waste analysis dispatched");
            }
            AnalysisRequest::Incentives => {
                if sessions.incentives.is_pending() {
                    warn!("incentive analysis already running, ignoring request");
                    continue;
                }
                let Some(service) = backend.0.clone() else {
                    warn!("incentive analysis requested without a configured backend");
                    sessions.incentives.fail_now(unconfigured_message());
                    continue;
                };
                let context = IncentiveContext {
                    forest_analysis: sessions.forest.latest.clone(),
                    waste_analysis: sessions.waste.latest.clone(),
                    forest_input: (*forest_input).clone(),
                    waste_input: (*waste_input).clone(),
                    existing_programs: programs.0.clone(),
                };
                let seq = sessions.incentives.begin();
                let task = pool.spawn(async move {
                    TaskOutput::Incentives(service.suggest_incentives(&context))
                });
                commands.spawn(AnalysisTask { task, seq });
                info!("incentive analysis dispatched");
            }
            AnalysisRequest::Knowledge { question } => {
                if sessions.knowledge.is_pending() {
                    warn!("knowledge query already running, ignoring request");
                    continue;
                }
                let Some(service) = backend.0.clone() else {
                    warn!("knowledge query requested without a configured backend");
                    sessions.knowledge.fail_now(unconfigured_message());
                    continue;
                };
                let seq = sessions.knowledge.begin();
                let question = question.clone();
                let task = pool
                    .spawn(async move { TaskOutput::Knowledge(service.query_knowledge(&question)) });
                commands.spawn(AnalysisTask { task, seq });
                info!("knowledge query dispatched");
            }
            AnalysisRequest::IdentifyPlant { image_path } => {
                if sessions.plant.is_pending() {
                    warn!("plant identification already running, ignoring request");
                    continue;
                }
                let Some(service) = backend.0.clone() else {
                    warn!("plant identification requested without a configured backend");
                    sessions.plant.fail_now(unconfigured_message());
                    continue;
                };
                let bytes = match std::fs::read(image_path) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        let message =
                            format!("could not read image {}: {err}", image_path.display());
                        warn!("{message}");
                        sessions.plant.fail_now(message);
                        continue;
                    }
                };
                let location = user_location.0;
                let seq = sessions.plant.begin();
                info!(bytes = bytes.len(), "plant identification dispatched");
                let task = pool.spawn(async move {
                    TaskOutput::Plant(service.identify_plant(&bytes, location))
                });
                commands.spawn(AnalysisTask { task, seq });
            }
        }
    }
}

/// Poll every carrier entity and fold finished results back into the
/// session. Stale completions (an older call finishing after a newer one was
/// issued) are logged and dropped.
pub fn collect_analysis_results(
    mut commands: Commands,
    mut carriers: Query<(Entity, &mut AnalysisTask)>,
    mut sessions: ResMut<AnalysisSessions>,
    mut programs: ResMut<PesPrograms>,
    mut selection: ResMut<Selection>,
) {
    for (entity, mut carrier) in &mut carriers {
        let Some(output) = block_on(future::poll_once(&mut carrier.task)) else {
            continue;
        };
        let seq = carrier.seq;
        commands.entity(entity).despawn();

        match output {
            TaskOutput::Forest(Ok(mut analysis)) => {
                assign_alert_identity(&mut analysis, clock::now_epoch_ms());
                let alert_count = analysis.alerts.len();
                if sessions.forest.complete_success(seq, analysis) {
                    drop_vanished_alert_selection(&sessions, &mut selection);
                    info!(alerts = alert_count, "forest analysis applied");
                } else {
                    warn!("discarding stale forest analysis result");
                }
            }
            TaskOutput::Forest(Err(err)) => {
                if sessions.forest.complete_failure(seq, err.to_string()) {
                    error!("forest analysis failed: {err}");
                }
            }
            TaskOutput::Waste(Ok(response)) => {
                if sessions.waste.complete_success(seq, response) {
                    info!("waste analysis applied");
                } else {
                    warn!("discarding stale waste analysis result");
                }
            }
            TaskOutput::Waste(Err(err)) => {
                if sessions.waste.complete_failure(seq, err.to_string()) {
                    error!("waste analysis failed: {err}");
                }
            }
            TaskOutput::Incentives(Ok(insights)) => {
                if sessions.incentives.complete_success(seq, insights.clone()) {
                    let added = programs.merge_suggestions(&insights.suggested_programs);
                    info!(
                        suggested = insights.suggested_programs.len(),
                        added, "incentive suggestions applied"
                    );
                } else {
                    warn!("discarding stale incentive suggestions");
                }
            }
            TaskOutput::Incentives(Err(err)) => {
                if sessions.incentives.complete_failure(seq, err.to_string()) {
                    error!("incentive analysis failed: {err}");
                }
            }
            TaskOutput::Knowledge(Ok(result)) => {
                if sessions.knowledge.complete_success(seq, result) {
                    info!("knowledge query answered");
                } else {
                    warn!("discarding stale knowledge answer");
                }
            }
            TaskOutput::Knowledge(Err(err)) => {
                if sessions.knowledge.complete_failure(seq, err.to_string()) {
                    error!("knowledge query failed: {err}");
                }
            }
            TaskOutput::Plant(Ok(result)) => {
                if sessions.plant.complete_success(seq, result) {
                    info!("plant identification applied");
                } else {
                    warn!("discarding stale plant identification");
                }
            }
            TaskOutput::Plant(Err(err)) => {
                if sessions.plant.complete_failure(seq, err.to_string()) {
                    error!("plant identification failed: {err}");
                }
            }
        }
    }
}

/// A selection made while the sweep was in flight can point at an alert the
/// new result no longer contains.
fn drop_vanished_alert_selection(sessions: &AnalysisSessions, selection: &mut Selection) {
    let Some(selected) = selection.selected_alert_id().map(str::to_owned) else {
        return;
    };
    let Some(latest) = sessions.forest.latest.as_ref() else {
        return;
    };
    if !latest.alerts.iter().any(|alert| alert.id == selected) {
        selection.clear_alert();
    }
}
