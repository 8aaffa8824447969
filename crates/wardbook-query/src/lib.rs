#![forbid(unsafe_code)]
//! Pure in-memory narrowing of patient collections. No I/O, no clock, no
//! global state: every function here is a deterministic function of its
//! arguments.

mod filters;
mod stats;

pub use filters::{filter_patients, normalize_search, search_preview, PatientFilter};
pub use stats::{compute_stats, PatientStats};

pub const CRATE_NAME: &str = "wardbook-query";
