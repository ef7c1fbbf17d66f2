//! Headless integration harness for the dashboard session.
//!
//! Wraps `bevy::app::App` + `SessionPlugin` with a scripted analysis backend
//! so operation flows run without a window, renderer, or network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy::app::App;
use bevy::prelude::*;

use crate::analysis::{
    AnalysisBackend, AnalysisError, AnalysisRequest, AnalysisService, AnalysisSessions,
    AnalysisTask, IncentiveContext,
};
use crate::forest::{
    Alert, AlertKind, ForestAnalysis, ForestDataInput, RiskSummary, Severity, SupportingEvidence,
};
use crate::geo::GeoPoint;
use crate::incentives::{BenefitShare, GeneratedPesInsights, PesMetrics, PesProgram, PesProgramType};
use crate::knowledge::{KnowledgeQueryResult, PlantAnalysisResult, PlantStatus};
use crate::waste::{CircularEconomyResponse, FraudRiskLevel, WasteAnalysisSummary, WasteDataInput};
use crate::SessionPlugin;

type Scripted<T> = Mutex<VecDeque<Result<T, String>>>;

/// Analysis backend that replays scripted responses in order. Each call pops
/// the front of its operation's queue; an empty queue fails the call, so a
/// test that forgets to script a response fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedAnalysis {
    forest: Scripted<ForestAnalysis>,
    waste: Scripted<CircularEconomyResponse>,
    incentives: Scripted<GeneratedPesInsights>,
    knowledge: Scripted<KnowledgeQueryResult>,
    plant: Scripted<PlantAnalysisResult>,
}

impl ScriptedAnalysis {
    pub fn push_forest(&self, result: Result<ForestAnalysis, String>) {
        self.forest.lock().unwrap().push_back(result);
    }

    pub fn push_waste(&self, result: Result<CircularEconomyResponse, String>) {
        self.waste.lock().unwrap().push_back(result);
    }

    pub fn push_incentives(&self, result: Result<GeneratedPesInsights, String>) {
        self.incentives.lock().unwrap().push_back(result);
    }

    pub fn push_knowledge(&self, result: Result<KnowledgeQueryResult, String>) {
        self.knowledge.lock().unwrap().push_back(result);
    }

    pub fn push_plant(&self, result: Result<PlantAnalysisResult, String>) {
        self.plant.lock().unwrap().push_back(result);
    }

    /// Responses scripted but not yet consumed, across all operations.
    /// A dropped duplicate request leaves its response behind here.
    pub fn remaining(&self) -> usize {
        self.forest.lock().unwrap().len()
            + self.waste.lock().unwrap().len()
            + self.incentives.lock().unwrap().len()
            + self.knowledge.lock().unwrap().len()
            + self.plant.lock().unwrap().len()
    }
}

fn pop<T>(queue: &Scripted<T>, op: &str) -> Result<T, AnalysisError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(format!("no scripted {op} response")))
        .map_err(AnalysisError::Service)
}

impl AnalysisService for ScriptedAnalysis {
    fn analyze_forest(&self, _input: &ForestDataInput) -> Result<ForestAnalysis, AnalysisError> {
        pop(&self.forest, "forest")
    }

    fn analyze_waste(
        &self,
        _input: &WasteDataInput,
    ) -> Result<CircularEconomyResponse, AnalysisError> {
        pop(&self.waste, "waste")
    }

    fn suggest_incentives(
        &self,
        _context: &IncentiveContext,
    ) -> Result<GeneratedPesInsights, AnalysisError> {
        pop(&self.incentives, "incentives")
    }

    fn query_knowledge(&self, _question: &str) -> Result<KnowledgeQueryResult, AnalysisError> {
        pop(&self.knowledge, "knowledge")
    }

    fn identify_plant(
        &self,
        _image_jpeg: &[u8],
        _location: Option<GeoPoint>,
    ) -> Result<PlantAnalysisResult, AnalysisError> {
        pop(&self.plant, "plant")
    }
}

/// A headless Bevy App wrapping `SessionPlugin` for integration testing.
pub struct TestSession {
    app: App,
}

impl TestSession {
    /// Session backed by a scripted service. Keep the returned handle to push
    /// responses and check queue consumption.
    pub fn with_scripted() -> (Self, Arc<ScriptedAnalysis>) {
        let service = Arc::new(ScriptedAnalysis::default());
        let session = Self::with_backend(Some(service.clone()));
        (session, service)
    }

    /// Session with no backend configured, as when the API key is missing.
    pub fn without_backend() -> Self {
        Self::with_backend(None)
    }

    fn with_backend(backend: Option<Arc<dyn AnalysisService>>) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SessionPlugin);
        app.world_mut().resource_mut::<AnalysisBackend>().0 = backend;
        // Run one update so Startup systems execute.
        app.update();
        Self { app }
    }

    /// Run N frames. A `yield_now()` is inserted between frames so task pool
    /// threads get a chance to make progress even when the test drives the
    /// schedule in a tight loop on a low-core CI runner.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
            std::thread::yield_now();
        }
    }

    /// Tick until `done` holds, up to a frame budget. Panics when the budget
    /// runs out so a hung flow fails the test instead of stalling the suite.
    pub fn tick_until(&mut self, max_frames: u32, mut done: impl FnMut(&mut Self) -> bool) {
        for _ in 0..max_frames {
            self.tick(1);
            if done(self) {
                return;
            }
        }
        panic!("condition not reached within {max_frames} frames");
    }

    pub fn send(&mut self, request: AnalysisRequest) {
        self.app.world_mut().send_event(request);
    }

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    /// Get a mutable handle to any resource.
    pub fn resource_mut<T: Resource>(&mut self) -> Mut<'_, T> {
        self.app.world_mut().resource_mut::<T>()
    }

    pub fn sessions(&self) -> &AnalysisSessions {
        self.resource::<AnalysisSessions>()
    }

    /// Count in-flight analysis carrier entities.
    pub fn in_flight(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&AnalysisTask>().iter(world).count()
    }
}

// ---------------------------------------------------------------------------
// Canned payloads for scripting
// ---------------------------------------------------------------------------

/// A single-alert forest analysis whose severity matches its score.
pub fn forest_analysis_with_alert(kind: AlertKind, threat_weight_score: f64) -> ForestAnalysis {
    let severity = Severity::from_threat_weight(threat_weight_score);
    ForestAnalysis {
        alerts: vec![Alert {
            id: String::new(),
            kind,
            severity,
            location: GeoPoint::new(-1.25, 36.85),
            confidence: threat_weight_score,
            threat_weight_score,
            explanation: "Sensor sensor-fire-1 reported 85.5\u{b0}C with smoke level 0.9 while satellite tile tile-fire-A showed a fire-type change.".to_string(),
            recommended_action: "Dispatch firefighting unit, validate via drone, notify authorities immediately.".to_string(),
            supporting_evidence: SupportingEvidence {
                satellite_ids: vec!["tile-fire-A".to_string()],
                sensor_ids: vec!["sensor-fire-1".to_string()],
                report_ids: Vec::new(),
            },
        }],
        summary: RiskSummary {
            overall_forest_risk: severity,
            key_hotspots: vec!["Northern ridge".to_string()],
            notable_patterns: "Heat and smoke rising together across adjacent readings.".to_string(),
            recommended_priority_zones: vec!["tile-fire-A".to_string()],
        },
        timestamp: String::new(),
    }
}

/// The all-clear shape the service returns when nothing is detected.
pub fn quiet_forest_analysis() -> ForestAnalysis {
    ForestAnalysis {
        alerts: Vec::new(),
        summary: RiskSummary {
            overall_forest_risk: Severity::Low,
            key_hotspots: Vec::new(),
            notable_patterns: "No significant anomalies detected.".to_string(),
            recommended_priority_zones: Vec::new(),
        },
        timestamp: String::new(),
    }
}

pub fn waste_response(efficiency_score: f64) -> CircularEconomyResponse {
    CircularEconomyResponse {
        summary: WasteAnalysisSummary {
            efficiency_score,
            fraud_risk_level: FraudRiskLevel::Low,
            suggested_route_optimization: "Collect BIN-03 and BIN-01 on a single eastern loop."
                .to_string(),
            economic_value_generated: 412.5,
            carbon_offset_tonnes: 0.04,
        },
        actionable_insights: vec!["Schedule BIN-03 pickup before overflow.".to_string()],
        timestamp: String::new(),
    }
}

/// Insights carrying one suggested program under the given id.
pub fn insights_with_program(id: &str) -> GeneratedPesInsights {
    GeneratedPesInsights {
        suggested_programs: vec![suggested_program(id)],
        narrative_summary: "One new waste diversion opportunity identified.".to_string(),
    }
}

pub fn suggested_program(id: &str) -> PesProgram {
    PesProgram {
        id: id.to_string(),
        name: "Gikomba Plastics Buy-Back".to_string(),
        kind: PesProgramType::Waste,
        location: None,
        location_label: "Gikomba Market, Nairobi".to_string(),
        linked_forest_area_ids: None,
        linked_waste_zone_ids: None,
        metrics: PesMetrics {
            forest_alerts_avoided: None,
            ha_monitored: None,
            waste_diversion_kg: Some(1800.0),
            co2e_avoided_tons: Some(4.5),
        },
        readiness_score: 0.55,
        indicative_payment_per_period_kes: 20_250.0,
        benefit_sharing: vec![
            BenefitShare {
                stakeholder: "Waste Picker Cooperative".to_string(),
                percentage: 75.0,
            },
            BenefitShare {
                stakeholder: "Platform Admin Fee".to_string(),
                percentage: 25.0,
            },
        ],
        notes: Some("High bin density but weighing records are still manual.".to_string()),
    }
}

pub fn knowledge_answer() -> KnowledgeQueryResult {
    KnowledgeQueryResult {
        answer: "Mangroves buffer storm surge and shelter juvenile fish; replanting Rhizophora mucronata along tidal creeks restores both functions.".to_string(),
        related_species: vec!["Rhizophora mucronata".to_string(), "Dugong".to_string()],
        suggested_actions: vec!["Start a community nursery with locally collected propagules.".to_string()],
    }
}

pub fn plant_profile() -> PlantAnalysisResult {
    PlantAnalysisResult {
        common_name: "Mkoko".to_string(),
        scientific_name: "Rhizophora mucronata".to_string(),
        status: PlantStatus::Native,
        health_assessment: "Healthy foliage with active propagule growth.".to_string(),
        preservation_actions: vec!["Protect the stand from cutting during crab harvesting.".to_string()],
        fun_fact: "Its propagules germinate while still attached to the parent tree.".to_string(),
    }
}
