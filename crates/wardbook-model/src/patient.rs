// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            other => Err(ValidationError(format!("unknown gender: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    #[serde(rename = "Follow-Up")]
    FollowUp,
    Discharged,
}

impl PatientStatus {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "Active" => Ok(Self::Active),
            "Follow-Up" => Ok(Self::FollowUp),
            "Discharged" => Ok(Self::Discharged),
            other => Err(ValidationError(format!("unknown status: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::FollowUp => "Follow-Up",
            Self::Discharged => "Discharged",
        }
    }
}

impl Display for PatientStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as it exists on a stored record. The remote collection is outside
/// our control; a row carrying a status string we do not recognize must still
/// load, display its raw value, and fall outside every specific facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedStatus {
    Known(PatientStatus),
    Unrecognized(String),
}

impl RecordedStatus {
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match PatientStatus::parse(&raw) {
            Ok(status) => Self::Known(status),
            Err(_) => Self::Unrecognized(raw),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    #[must_use]
    pub const fn known(&self) -> Option<PatientStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<PatientStatus> for RecordedStatus {
    fn from(status: PatientStatus) -> Self {
        Self::Known(status)
    }
}

impl Serialize for RecordedStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordedStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_raw(String::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFacet {
    All,
    Active,
    FollowUp,
    Discharged,
}

impl StatusFacet {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "follow-up" => Ok(Self::FollowUp),
            "discharged" => Ok(Self::Discharged),
            other => Err(ValidationError(format!("unknown status facet: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::FollowUp => "follow-up",
            Self::Discharged => "discharged",
        }
    }

    /// `All` matches every record regardless of status, including
    /// unrecognized ones; a specific facet matches only the exact known
    /// status.
    #[must_use]
    pub fn matches(self, status: &RecordedStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status.known() == Some(PatientStatus::Active),
            Self::FollowUp => status.known() == Some(PatientStatus::FollowUp),
            Self::Discharged => status.known() == Some(PatientStatus::Discharged),
        }
    }
}

impl Display for StatusFacet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored patient record as returned by the records collection. Field
/// names are the persistence layer's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub cnic: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub disease: String,
    #[serde(default)]
    pub disease_description: Option<String>,
    pub visit_date: NaiveDate,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    pub status: RecordedStatus,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The insert shape. Identity, visit count, and creation timestamp are
/// assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatientRecord {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub cnic: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub disease: String,
    pub disease_description: Option<String>,
    pub visit_date: NaiveDate,
    pub doctor_notes: Option<String>,
    pub status: PatientStatus,
    pub doctor_id: Option<String>,
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<PatientRecord>();
    assert_traits::<NewPatientRecord>();
};
