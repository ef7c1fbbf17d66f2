//! Per-operation session state. Each analysis kind owns one slot tracking
//! its lifecycle and the most recent successful payload, fenced by a
//! sequence number so a slow response can never clobber a newer one.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::forest::ForestAnalysis;
use crate::incentives::GeneratedPesInsights;
use crate::knowledge::{KnowledgeQueryResult, PlantAnalysisResult};
use crate::waste::CircularEconomyResponse;

/// Lifecycle of one analysis slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OperationPhase {
    #[default]
    Idle,
    Pending {
        seq: u64,
    },
    Succeeded,
    Failed {
        message: String,
    },
}

/// One analysis slot. `latest` survives failures: the dashboard keeps showing
/// the last good result alongside the error banner.
#[derive(Clone, Debug)]
pub struct Operation<T> {
    pub phase: OperationPhase,
    pub latest: Option<T>,
    next_seq: u64,
}

impl<T> Default for Operation<T> {
    fn default() -> Self {
        Self {
            phase: OperationPhase::Idle,
            latest: None,
            next_seq: 0,
        }
    }
}

impl<T> Operation<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, OperationPhase::Pending { .. })
    }

    /// Move to `Pending` and hand out the sequence number the completion
    /// must present. Beginning again invalidates any older in-flight call.
    pub fn begin(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.phase = OperationPhase::Pending { seq };
        seq
    }

    /// Fail without ever dispatching: missing backend, unreadable input.
    pub fn fail_now(&mut self, message: String) {
        self.phase = OperationPhase::Failed { message };
    }

    /// Store a completed payload. Returns false when the completion is stale,
    /// in which case the slot is left untouched.
    pub fn complete_success(&mut self, seq: u64, value: T) -> bool {
        if !self.accepts(seq) {
            return false;
        }
        self.latest = Some(value);
        self.phase = OperationPhase::Succeeded;
        true
    }

    /// Record a failure, keeping the previous payload on display.
    pub fn complete_failure(&mut self, seq: u64, message: String) -> bool {
        if !self.accepts(seq) {
            return false;
        }
        self.phase = OperationPhase::Failed { message };
        true
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            OperationPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    fn accepts(&self, seq: u64) -> bool {
        self.phase == OperationPhase::Pending { seq }
    }
}

/// All analysis slots for the running session.
#[derive(Resource, Default)]
pub struct AnalysisSessions {
    pub forest: Operation<ForestAnalysis>,
    pub waste: Operation<CircularEconomyResponse>,
    pub incentives: Operation<GeneratedPesInsights>,
    pub knowledge: Operation<KnowledgeQueryResult>,
    pub plant: Operation<PlantAnalysisResult>,
}

/// A request from the UI to run one analysis operation.
#[derive(Event, Clone, Debug)]
pub enum AnalysisRequest {
    Forest,
    Waste,
    Incentives,
    Knowledge { question: String },
    IdentifyPlant { image_path: PathBuf },
}

/// Stamp a freshly parsed forest analysis with its arrival time and give
/// every alert a unique id derived from it. The service never fills these in.
pub fn assign_alert_identity(analysis: &mut ForestAnalysis, epoch_ms: u128) {
    analysis.timestamp = epoch_ms.to_string();
    for (index, alert) in analysis.alerts.iter_mut().enumerate() {
        alert.id = format!("{epoch_ms}-{index}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{Alert, AlertKind, RiskSummary, Severity, SupportingEvidence};
    use crate::geo::GeoPoint;

    fn bare_analysis(alert_count: usize) -> ForestAnalysis {
        let alerts = (0..alert_count)
            .map(|_| Alert {
                id: String::new(),
                kind: AlertKind::Fire,
                severity: Severity::High,
                location: GeoPoint::new(-1.25, 36.85),
                confidence: 0.5,
                threat_weight_score: 0.5,
                explanation: String::new(),
                recommended_action: String::new(),
                supporting_evidence: SupportingEvidence::default(),
            })
            .collect();
        ForestAnalysis {
            alerts,
            summary: RiskSummary {
                overall_forest_risk: Severity::Low,
                key_hotspots: Vec::new(),
                notable_patterns: String::new(),
                recommended_priority_zones: Vec::new(),
            },
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_begin_moves_slot_to_pending() {
        let mut op: Operation<u32> = Operation::default();
        assert!(!op.is_pending());
        let seq = op.begin();
        assert!(op.is_pending());
        assert_eq!(op.phase, OperationPhase::Pending { seq });
    }

    #[test]
    fn test_success_stores_latest_payload() {
        let mut op: Operation<u32> = Operation::default();
        let seq = op.begin();
        assert!(op.complete_success(seq, 7));
        assert_eq!(op.phase, OperationPhase::Succeeded);
        assert_eq!(op.latest, Some(7));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut op: Operation<u32> = Operation::default();
        let old_seq = op.begin();
        let new_seq = op.begin();
        assert!(!op.complete_success(old_seq, 1));
        assert!(op.is_pending());
        assert_eq!(op.latest, None);
        assert!(op.complete_success(new_seq, 2));
        assert_eq!(op.latest, Some(2));
    }

    #[test]
    fn test_stale_failure_cannot_overwrite_newer_pending() {
        let mut op: Operation<u32> = Operation::default();
        let old_seq = op.begin();
        let _new_seq = op.begin();
        assert!(!op.complete_failure(old_seq, "late timeout".to_string()));
        assert!(op.is_pending());
    }

    #[test]
    fn test_failure_preserves_previous_payload() {
        let mut op: Operation<u32> = Operation::default();
        let seq = op.begin();
        assert!(op.complete_success(seq, 42));
        let seq = op.begin();
        assert!(op.complete_failure(seq, "quota exceeded".to_string()));
        assert_eq!(op.latest, Some(42));
        assert_eq!(op.error_message(), Some("quota exceeded"));
    }

    #[test]
    fn test_completion_after_settled_phase_is_ignored() {
        let mut op: Operation<u32> = Operation::default();
        let seq = op.begin();
        assert!(op.complete_success(seq, 1));
        assert!(!op.complete_success(seq, 2));
        assert_eq!(op.latest, Some(1));
    }

    #[test]
    fn test_slots_fail_and_succeed_independently() {
        let mut sessions = AnalysisSessions::default();
        let forest_seq = sessions.forest.begin();
        let waste_seq = sessions.waste.begin();
        let waste_result = crate::waste::CircularEconomyResponse {
            summary: crate::waste::WasteAnalysisSummary {
                efficiency_score: 72.0,
                fraud_risk_level: crate::waste::FraudRiskLevel::Low,
                suggested_route_optimization: String::new(),
                economic_value_generated: 412.5,
                carbon_offset_tonnes: 0.04,
            },
            actionable_insights: Vec::new(),
            timestamp: String::new(),
        };
        assert!(sessions
            .forest
            .complete_failure(forest_seq, "network unreachable".to_string()));
        assert!(sessions.waste.complete_success(waste_seq, waste_result));
        assert!(sessions.forest.error_message().is_some());
        assert_eq!(sessions.waste.phase, OperationPhase::Succeeded);
        assert!(!sessions.knowledge.is_pending());
    }

    #[test]
    fn test_alert_identity_uses_arrival_time_and_index() {
        let mut analysis = bare_analysis(3);
        assign_alert_identity(&mut analysis, 1_700_000_000_123);
        assert_eq!(analysis.timestamp, "1700000000123");
        assert_eq!(analysis.alerts[0].id, "1700000000123-0");
        assert_eq!(analysis.alerts[2].id, "1700000000123-2");
    }
}
