//! Dossier reference data and the risk-evaluation workflow built on it.
//!
//! Dossiers themselves are owned by an external reference service; this
//! module only defines the identifier, the read-only display lookup, and
//! the evaluation workflow that runs against a dossier.

pub mod evaluations;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for the subject under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DossierId(pub String);

/// Kind of subject a dossier covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Client,
    Employee,
    Intermediary,
    Provider,
    Reinsurer,
}

impl SubjectType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Cliente",
            Self::Employee => "Empleado",
            Self::Intermediary => "Intermediario",
            Self::Provider => "Proveedor",
            Self::Reinsurer => "Reasegurador",
        }
    }
}

/// Display snapshot returned by the reference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierInfo {
    pub display_name: String,
    pub subject_type: SubjectType,
}

/// Read-only lookup against the external dossier service. The evaluation
/// workflow never mutates dossier data.
pub trait DossierDirectory: Send + Sync {
    fn lookup(&self, dossier_id: &DossierId) -> Result<Option<DossierInfo>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("dossier directory unavailable: {0}")]
    Unavailable(String),
}
