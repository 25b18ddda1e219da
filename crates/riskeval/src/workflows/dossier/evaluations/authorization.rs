use serde::{Deserialize, Serialize};

use super::domain::RiskEvaluation;

/// Capabilities a caller may exercise against an evaluation. A closed enum
/// rather than permission strings, so the policy surface stays exhaustive
/// and compiler-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Submit,
    Approve,
    Reject,
}

impl Action {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Roles recognized by the host application's access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Analyst,
    ComplianceOfficer,
    Auditor,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::ComplianceOfficer => "compliance_officer",
            Self::Auditor => "auditor",
        }
    }
}

/// Identity of the acting user. Passed explicitly into every lifecycle
/// call; the engine never reads ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
}

/// Capability query delegated to the external identity provider. The
/// evaluation is passed so policies can depend on record state, for
/// example to separate authorship from approval.
pub trait AccessPolicy: Send + Sync {
    fn actor_can_perform(
        &self,
        actor: &ActorContext,
        action: Action,
        evaluation: &RiskEvaluation,
    ) -> bool;
}

/// Raised when the policy denies an action. The message names only the
/// attempted action, not which permission grant was missing.
#[derive(Debug, thiserror::Error)]
#[error("actor {actor_id} may not {} this evaluation", .action.label())]
pub struct AuthorizationError {
    pub actor_id: String,
    pub action: Action,
}
