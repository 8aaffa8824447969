// SPDX-License-Identifier: Apache-2.0

//! Request/response shapes spoken to the remote service. Field names are the
//! service's own; the model crate's records already use them, so patient
//! payloads pass through untouched.

use serde::{Deserialize, Serialize};
use wardbook_model::Role;

#[derive(Debug, Serialize)]
pub(crate) struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpMetadata<'a> {
    pub full_name: &'a str,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub access_token: String,
    pub user: AuthUser,
}

/// The `users` collection insert. The service owns credential storage; the
/// password column carries the same placeholder the service's other clients
/// write.
#[derive(Debug, Serialize)]
pub(crate) struct UserRow<'a> {
    pub id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub role: Role,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description)
    }
}
