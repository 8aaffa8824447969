// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use wardbook_model::{AccountProfile, NewPatientRecord, PatientRecord, Session};

use crate::backend::{NewAccount, RecordsService};
use crate::error::{ServiceError, ServiceErrorCode};
use crate::events::{SessionEvent, SessionEvents};
use crate::wire::{AuthUser, ErrorBody, PasswordGrant, SessionResponse, SignUpMetadata, SignUpRequest, UserRow};

/// HTTP client for a hosted Account & Records Service deployment.
///
/// One shared connection pool, one client-wide timeout, no retry. The access
/// token from the last successful sign-in/sign-up is held for subsequent
/// collection calls, mirroring how the hosted service's own SDK behaves.
pub struct HttpRecordsService {
    client: Client,
    base_url: String,
    service_key: String,
    access_token: RwLock<Option<String>>,
    events: SessionEvents,
}

impl HttpRecordsService {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ServiceError::new(ServiceErrorCode::Internal, format!("http client: {e}"))
        })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            access_token: RwLock::new(None),
            events: SessionEvents::new(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn keyed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.service_key)
    }

    async fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.access_token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport(err: reqwest::Error) -> ServiceError {
        ServiceError::new(ServiceErrorCode::Network, err.to_string())
    }

    fn protocol(context: &str, err: reqwest::Error) -> ServiceError {
        ServiceError::new(ServiceErrorCode::Protocol, format!("{context}: {err}"))
    }

    /// Maps a non-success response to an error, preferring the service's own
    /// message so it can be surfaced verbatim.
    async fn service_error(response: Response) -> ServiceError {
        let status = response.status();
        let code = match status.as_u16() {
            401 | 403 => ServiceErrorCode::Auth,
            400 | 422 => ServiceErrorCode::Validation,
            404 => ServiceErrorCode::NotFound,
            _ => ServiceErrorCode::Internal,
        };
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("service responded with {status}"));
        ServiceError::new(code, message)
    }

    async fn fetch_profile(&self, account_id: &str) -> Result<AccountProfile, ServiceError> {
        let request = self
            .client
            .get(self.endpoint("/rest/v1/users"))
            .query(&[("id", format!("eq.{account_id}")), ("select", "full_name,role".to_string())]);
        let response = self
            .authed(self.keyed(request))
            .await
            .send()
            .await
            .map_err(Self::transport)?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let mut rows: Vec<AccountProfile> = response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed profile rows", e))?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(ServiceError::new(
                ServiceErrorCode::NotFound,
                format!("no profile row for account {account_id}"),
            )),
            n => Err(ServiceError::new(
                ServiceErrorCode::Protocol,
                format!("{n} profile rows for account {account_id}"),
            )),
        }
    }

    async fn delete_auth_account(&self, account_id: &str) {
        let request = self
            .client
            .delete(self.endpoint(&format!("/auth/v1/admin/users/{account_id}")));
        if let Err(err) = self.keyed(request).send().await {
            tracing::warn!(account_id, error = %err, "sign-up rollback delete failed");
        }
    }
}

#[async_trait]
impl RecordsService for HttpRecordsService {
    async fn sign_up(&self, account: NewAccount) -> Result<Session, ServiceError> {
        let body = SignUpRequest {
            email: &account.email,
            password: &account.password,
            data: SignUpMetadata {
                full_name: &account.full_name,
                role: account.role,
            },
        };
        let response = self
            .keyed(self.client.post(self.endpoint("/auth/v1/signup")))
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let created: SessionResponse = response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed sign-up response", e))?;

        let row = UserRow {
            id: &created.user.id,
            full_name: &account.full_name,
            email: &account.email,
            role: account.role,
            password: "hashed",
        };
        let insert = self
            .keyed(self.client.post(self.endpoint("/rest/v1/users")))
            .bearer_auth(&created.access_token)
            .json(&row)
            .send()
            .await
            .map_err(Self::transport)?;
        if !insert.status().is_success() {
            let err = Self::service_error(insert).await;
            // A profile-less auth account would block this email forever.
            self.delete_auth_account(&created.user.id).await;
            return Err(ServiceError::new(
                err.code,
                format!("Failed to create user profile. {}", err.message),
            ));
        }

        *self.access_token.write().await = Some(created.access_token);
        Ok(Session {
            account_id: created.user.id,
            email: created.user.email,
            full_name: account.full_name,
            role: account.role,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let response = self
            .keyed(
                self.client
                    .post(self.endpoint("/auth/v1/token"))
                    .query(&[("grant_type", "password")]),
            )
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(Self::transport)?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let granted: SessionResponse = response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed token response", e))?;

        *self.access_token.write().await = Some(granted.access_token);
        let profile = self.fetch_profile(&granted.user.id).await?;
        Ok(Session {
            account_id: granted.user.id,
            email: granted.user.email,
            full_name: profile.full_name,
            role: profile.role,
        })
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        let token = self.access_token.read().await.clone();
        if let Some(token) = token {
            let response = self
                .keyed(self.client.post(self.endpoint("/auth/v1/logout")))
                .bearer_auth(&token)
                .send()
                .await
                .map_err(Self::transport)?;
            if !response.status().is_success() {
                return Err(Self::service_error(response).await);
            }
        }
        *self.access_token.write().await = None;
        self.events.emit(SessionEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, ServiceError> {
        let token = self.access_token.read().await.clone();
        let Some(token) = token else {
            return Ok(None);
        };
        let response = self
            .keyed(self.client.get(self.endpoint("/auth/v1/user")))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(Self::transport)?;
        if response.status().as_u16() == 401 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed user response", e))?;
        let profile = self.fetch_profile(&user.id).await?;
        Ok(Some(Session {
            account_id: user.id,
            email: user.email,
            full_name: profile.full_name,
            role: profile.role,
        }))
    }

    async fn create_patient(
        &self,
        record: NewPatientRecord,
    ) -> Result<PatientRecord, ServiceError> {
        let request = self
            .client
            .post(self.endpoint("/rest/v1/patients"))
            .header("Prefer", "return=representation")
            .json(&record);
        let response = self
            .authed(self.keyed(request))
            .await
            .send()
            .await
            .map_err(Self::transport)?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let mut rows: Vec<PatientRecord> = response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed insert representation", e))?;
        if rows.is_empty() {
            return Err(ServiceError::new(
                ServiceErrorCode::Protocol,
                "insert returned no representation",
            ));
        }
        Ok(rows.remove(0))
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>, ServiceError> {
        let request = self
            .client
            .get(self.endpoint("/rest/v1/patients"))
            .query(&[("select", "*")]);
        let response = self
            .authed(self.keyed(request))
            .await
            .send()
            .await
            .map_err(Self::transport)?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| Self::protocol("malformed patient rows", e))
    }

    async fn account_profile(&self, account_id: &str) -> Result<AccountProfile, ServiceError> {
        self.fetch_profile(account_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
