#![forbid(unsafe_code)]
//! Client for the external Account & Records Service.
//!
//! Authentication, credential storage, and row storage all live on the
//! remote side; this crate only speaks the call contract: sign-up, sign-in,
//! sign-out, live-session lookup, and CRUD over the `users` and `patients`
//! collections.

mod backend;
mod error;
mod events;
mod fake;
mod http_backend;
mod wire;

pub use backend::{NewAccount, RecordsService};
pub use error::{ServiceError, ServiceErrorCode};
pub use events::{SessionEvent, SessionEvents};
pub use fake::{FakeAccount, FakeRecordsService};
pub use http_backend::HttpRecordsService;

pub const CRATE_NAME: &str = "wardbook-service";
