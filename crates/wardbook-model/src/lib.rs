#![forbid(unsafe_code)]
//! Wardbook domain model SSOT.
//!
//! Every shape that crosses a crate boundary — the session, the patient
//! record, the closed role/status enums — is defined here once and consumed
//! by the query, service, and app crates.

mod account;
mod patient;

pub use account::{AccountProfile, Role, Session};
pub use patient::{
    Gender, NewPatientRecord, PatientRecord, PatientStatus, RecordedStatus, StatusFacet,
    ValidationError,
};

pub const CRATE_NAME: &str = "wardbook-model";
