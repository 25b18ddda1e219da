//! Risk-based evaluation engine for insurance compliance dossiers.
//!
//! The library exposes the dossier risk-evaluation workflow (factor scoring,
//! submission validation, and the approval lifecycle) together with the
//! configuration and telemetry plumbing shared by the service binaries.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
