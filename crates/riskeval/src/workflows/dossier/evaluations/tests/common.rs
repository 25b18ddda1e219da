use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::dossier::evaluations::authorization::{
    AccessPolicy, Action, ActorContext, Role,
};
use crate::workflows::dossier::evaluations::domain::{
    EvaluationId, EvaluationType, FactorId, RiskEvaluation, RiskFactor,
};
use crate::workflows::dossier::evaluations::repository::{
    AuditError, AuditEvent, AuditSink, EvaluationRepository, EvaluationSummary, RepositoryError,
};
use crate::workflows::dossier::evaluations::scoring::{ScoringEngine, ScoringThresholds};
use crate::workflows::dossier::evaluations::service::{
    DraftUpdate, EvaluationService, FactorUpdate,
};
use crate::workflows::dossier::DossierId;

pub(super) fn analyst() -> ActorContext {
    ActorContext {
        user_id: "maria.alvarez".to_string(),
        display_name: "María Álvarez".to_string(),
        role: Role::Analyst,
    }
}

pub(super) fn officer() -> ActorContext {
    ActorContext {
        user_id: "jorge.paredes".to_string(),
        display_name: "Jorge Paredes".to_string(),
        role: Role::ComplianceOfficer,
    }
}

pub(super) fn auditor() -> ActorContext {
    ActorContext {
        user_id: "lucia.fermin".to_string(),
        display_name: "Lucía Fermín".to_string(),
        role: Role::Auditor,
    }
}

pub(super) fn dossier() -> DossierId {
    DossierId("DSR-0042".to_string())
}

pub(super) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn scoring_engine() -> ScoringEngine {
    ScoringEngine::new(ScoringThresholds::default())
}

/// Full catalogue with the same weight and observation on every factor.
pub(super) fn factor_set(weight: u8, observation: &str) -> Vec<RiskFactor> {
    FactorId::ordered()
        .into_iter()
        .map(|factor_id| RiskFactor {
            factor_id,
            weight,
            observation: observation.to_string(),
        })
        .collect()
}

pub(super) fn draft_evaluation() -> RiskEvaluation {
    RiskEvaluation::draft(
        EvaluationId("ev-test-1".to_string()),
        dossier(),
        1,
        EvaluationType::Initial,
        analyst().user_id,
        analyst().display_name,
        fixed_time(),
    )
}

pub(super) fn uniform_update(weight: u8, observation: &str) -> DraftUpdate {
    DraftUpdate {
        factors: FactorId::ordered()
            .into_iter()
            .map(|factor_id| FactorUpdate {
                factor_id,
                weight,
                observation: observation.to_string(),
            })
            .collect(),
        comments: None,
    }
}

pub(super) fn build_service() -> (
    EvaluationService<MemoryRepository, MemoryAudit, RolePolicy>,
    Arc<MemoryRepository>,
    Arc<MemoryAudit>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = EvaluationService::new(
        repository.clone(),
        audit.clone(),
        Arc::new(RolePolicy),
        scoring_engine(),
    );
    (service, repository, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<EvaluationId, RiskEvaluation>>>,
}

impl EvaluationRepository for MemoryRepository {
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
        if !guard.contains_key(&evaluation.evaluation_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(evaluation.evaluation_id.clone(), evaluation);
        Ok(())
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
pub(super) struct MemoryAudit {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAudit {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Role mapping used by the host application: analysts author, compliance
/// officers adjudicate, auditors only read.
pub(super) struct RolePolicy;

impl AccessPolicy for RolePolicy {
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
