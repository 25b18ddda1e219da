use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use riskeval::workflows::dossier::evaluations::{
    AccessPolicy, Action, ActorContext, AuditError, AuditEvent, AuditSink, EvaluationId,
    EvaluationRepository, EvaluationSummary, RepositoryError, RiskEvaluation, Role,
    ScoringEngine, ScoringThresholds,
};
use riskeval::workflows::dossier::{
    DirectoryError, DossierDirectory, DossierId, DossierInfo, SubjectType,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, RiskEvaluation>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, evaluation: RiskEvaluation) -> Result<RiskEvaluation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&evaluation.evaluation_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.evaluation_id.clone(), evaluation.clone());
        Ok(evaluation)
    }

    fn update(&self, evaluation: RiskEvaluation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&evaluation.evaluation_id) {
            guard.insert(evaluation.evaluation_id.clone(), evaluation);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<RiskEvaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn history(&self, dossier_id: &DossierId) -> Result<Vec<EvaluationSummary>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut summaries: Vec<EvaluationSummary> = guard
            .values()
            .filter(|evaluation| &evaluation.dossier_id == dossier_id)
            .map(EvaluationSummary::of)
            .collect();
        summaries.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(summaries)
    }

    fn latest_version(&self, dossier_id: &DossierId) -> Result<Option<u32>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|evaluation| &evaluation.dossier_id == dossier_id)
            .map(|evaluation| evaluation.version)
            .max())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        let mut guard = self.events.lock().expect("audit mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

impl InMemoryAuditSink {
    pub(crate) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

/// Role mapping for the hosted deployment: analysts author evaluations,
/// compliance officers additionally adjudicate and override, auditors only
/// read.
pub(crate) struct RoleAccessPolicy;

impl AccessPolicy for RoleAccessPolicy {
    fn actor_can_perform(
        &self,
        actor: &ActorContext,
        action: Action,
        _evaluation: &RiskEvaluation,
    ) -> bool {
        match actor.role {
            Role::ComplianceOfficer => true,
            Role::Analyst => matches!(action, Action::Create | Action::Update | Action::Submit),
            Role::Auditor => false,
        }
    }
}

/// Reference-data stand-in for the external dossier service.
pub(crate) struct SeededDossierDirectory {
    entries: HashMap<String, DossierInfo>,
}

impl SeededDossierDirectory {
    pub(crate) fn with_sample_dossiers() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "DSR-0042".to_string(),
            DossierInfo {
                display_name: "Inversiones Canaima C.A.".to_string(),
                subject_type: SubjectType::Client,
            },
        );
        entries.insert(
            "DSR-0107".to_string(),
            DossierInfo {
                display_name: "Corretaje Andino S.A.".to_string(),
                subject_type: SubjectType::Intermediary,
            },
        );
        entries.insert(
            "DSR-0230".to_string(),
            DossierInfo {
                display_name: "Reaseguradora del Caribe".to_string(),
                subject_type: SubjectType::Reinsurer,
            },
        );
        Self { entries }
    }
}

impl DossierDirectory for SeededDossierDirectory {
    fn lookup(&self, dossier_id: &DossierId) -> Result<Option<DossierInfo>, DirectoryError> {
        Ok(self.entries.get(&dossier_id.0).cloned())
    }
}

pub(crate) fn default_scoring_engine() -> ScoringEngine {
    ScoringEngine::new(ScoringThresholds::default())
}
