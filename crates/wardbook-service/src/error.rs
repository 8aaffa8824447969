// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceErrorCode {
    Auth,
    Validation,
    NotFound,
    Network,
    Protocol,
    Internal,
}

impl ServiceErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth_error",
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Network => "network_error",
            Self::Protocol => "protocol_error",
            Self::Internal => "internal_error",
        }
    }
}

/// A failed service call. The message is surfaced to the operator verbatim;
/// no call is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub message: String,
}

impl ServiceError {
    #[must_use]
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ServiceError {}
