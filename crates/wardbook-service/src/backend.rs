// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use tokio::sync::broadcast;
use wardbook_model::{AccountProfile, NewPatientRecord, PatientRecord, Role, Session};

use crate::error::ServiceError;
use crate::events::SessionEvent;

/// Sign-up input. The password passes through to the service; it is never
/// stored on this side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

/// The Account & Records Service call contract.
///
/// All calls are plain request/response with no retry and no per-call
/// timeout beyond whatever the concrete backend's client enforces; a hung
/// call suspends its caller.
#[async_trait]
pub trait RecordsService: Send + Sync {
    /// Creates the auth account and its `users` profile row. If the profile
    /// row cannot be written the auth account is deleted again and the
    /// profile error is returned.
    async fn sign_up(&self, account: NewAccount) -> Result<Session, ServiceError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServiceError>;

    /// Revokes the live remote session and broadcasts
    /// [`SessionEvent::SignedOut`].
    async fn sign_out(&self) -> Result<(), ServiceError>;

    /// The service's view of the live session, used by startup
    /// reconciliation. `None` means signed out.
    async fn current_session(&self) -> Result<Option<Session>, ServiceError>;

    async fn create_patient(
        &self,
        record: NewPatientRecord,
    ) -> Result<PatientRecord, ServiceError>;

    /// Whole-collection read; the service's row order is preserved.
    async fn list_patients(&self) -> Result<Vec<PatientRecord>, ServiceError>;

    async fn account_profile(&self, account_id: &str) -> Result<AccountProfile, ServiceError>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
