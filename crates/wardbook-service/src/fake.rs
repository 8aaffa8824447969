// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, Mutex};
use wardbook_model::{
    AccountProfile, NewPatientRecord, PatientRecord, RecordedStatus, Role, Session,
};

use crate::backend::{NewAccount, RecordsService};
use crate::error::{ServiceError, ServiceErrorCode};
use crate::events::{SessionEvent, SessionEvents};

#[derive(Debug, Clone)]
pub struct FakeAccount {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

/// In-memory stand-in for the hosted service: accounts and patients live in
/// mutex-guarded vectors, ids are assigned monotonically, and every failure
/// mode the app cares about can be injected per call.
pub struct FakeRecordsService {
    pub accounts: Mutex<Vec<FakeAccount>>,
    pub patients: Mutex<Vec<PatientRecord>>,
    pub live_session: Mutex<Option<Session>>,
    pub create_calls: AtomicU64,
    pub list_calls: AtomicU64,
    pub fail_sign_in: Mutex<Option<ServiceError>>,
    pub fail_profile_insert: Mutex<Option<ServiceError>>,
    pub fail_create: Mutex<Option<ServiceError>>,
    pub fail_list: Mutex<Option<ServiceError>>,
    next_account: AtomicU64,
    next_patient: AtomicU64,
    events: SessionEvents,
}

impl Default for FakeRecordsService {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            patients: Mutex::new(Vec::new()),
            live_session: Mutex::new(None),
            create_calls: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
            fail_sign_in: Mutex::new(None),
            fail_profile_insert: Mutex::new(None),
            fail_create: Mutex::new(None),
            fail_list: Mutex::new(None),
            next_account: AtomicU64::new(1),
            next_patient: AtomicU64::new(1),
            events: SessionEvents::new(),
        }
    }
}

impl FakeRecordsService {
    /// Simulates the remote side expiring the session without telling us:
    /// the live session disappears but no event is pushed.
    pub async fn expire_live_session(&self) {
        *self.live_session.lock().await = None;
    }

    pub fn emit(&self, event: SessionEvent) {
        self.events.emit(event);
    }
}

#[async_trait]
impl RecordsService for FakeRecordsService {
    async fn sign_up(&self, account: NewAccount) -> Result<Session, ServiceError> {
        {
            let accounts = self.accounts.lock().await;
            if accounts.iter().any(|a| a.email == account.email) {
                return Err(ServiceError::new(
                    ServiceErrorCode::Auth,
                    "User already registered",
                ));
            }
        }
        if let Some(err) = self.fail_profile_insert.lock().await.take() {
            // The auth account is rolled back; the email stays reusable.
            return Err(ServiceError::new(
                err.code,
                format!("Failed to create user profile. {}", err.message),
            ));
        }

        let id = format!("acc-{}", self.next_account.fetch_add(1, Ordering::Relaxed));
        self.accounts.lock().await.push(FakeAccount {
            id: id.clone(),
            email: account.email.clone(),
            password: account.password,
            full_name: account.full_name.clone(),
            role: account.role,
        });
        let session = Session {
            account_id: id,
            email: account.email,
            full_name: account.full_name,
            role: account.role,
        };
        *self.live_session.lock().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        if let Some(err) = self.fail_sign_in.lock().await.take() {
            return Err(err);
        }
        let accounts = self.accounts.lock().await;
        let Some(account) = accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
        else {
            return Err(ServiceError::new(
                ServiceErrorCode::Auth,
                "Invalid login credentials",
            ));
        };
        let session = Session {
            account_id: account.id.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
        };
        drop(accounts);
        *self.live_session.lock().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        *self.live_session.lock().await = None;
        self.events.emit(SessionEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, ServiceError> {
        Ok(self.live_session.lock().await.clone())
    }

    async fn create_patient(
        &self,
        record: NewPatientRecord,
    ) -> Result<PatientRecord, ServiceError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.fail_create.lock().await.take() {
            return Err(err);
        }
        let stored = PatientRecord {
            id: format!("p{}", self.next_patient.fetch_add(1, Ordering::Relaxed)),
            name: record.name,
            age: record.age,
            gender: record.gender,
            cnic: record.cnic,
            phone_number: record.phone_number,
            email: record.email,
            address: record.address,
            disease: record.disease,
            disease_description: record.disease_description,
            visit_date: record.visit_date,
            // column default on the service side
            visit_count: 0,
            doctor_notes: record.doctor_notes,
            status: RecordedStatus::from(record.status),
            doctor_id: record.doctor_id,
            created_at: Some(Utc::now()),
        };
        self.patients.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.fail_list.lock().await.take() {
            return Err(err);
        }
        Ok(self.patients.lock().await.clone())
    }

    async fn account_profile(&self, account_id: &str) -> Result<AccountProfile, ServiceError> {
        let accounts = self.accounts.lock().await;
        accounts
            .iter()
            .find(|a| a.id == account_id)
            .map(|a| AccountProfile {
                full_name: a.full_name.clone(),
                role: a.role,
            })
            .ok_or_else(|| {
                ServiceError::new(
                    ServiceErrorCode::NotFound,
                    format!("no profile row for account {account_id}"),
                )
            })
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
