// SPDX-License-Identifier: Apache-2.0

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use wardbook_model::{Gender, NewPatientRecord, PatientStatus};

/// Everything the record form holds, exactly as typed. Parsing into the
/// insert shape happens in [`PatientForm::validate`]; until then every field
/// is text so a rejected submission can be echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub cnic: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub disease: String,
    pub disease_description: String,
    pub visit_date: String,
    pub status: String,
    pub doctor_notes: String,
}

const REQUIRED_MESSAGE: &str = "Please fill in all required fields";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub message: String,
    pub fields: Vec<&'static str>,
}

impl FormError {
    fn missing(fields: Vec<&'static str>) -> Self {
        Self {
            message: REQUIRED_MESSAGE.to_string(),
            fields,
        }
    }

    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: vec![field],
        }
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FormError {}

#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl PatientForm {
    /// The form as first presented: everything blank except the visit date,
    /// which defaults to the submission day.
    #[must_use]
    pub fn initial(visit_date: NaiveDate) -> Self {
        Self {
            visit_date: visit_date.to_string(),
            ..Self::default()
        }
    }

    /// Checks every required field and parses the typed ones. Either the
    /// whole form maps to an insert, or nothing is submitted: there is no
    /// partial success.
    pub fn validate(&self, doctor_id: &str) -> Result<NewPatientRecord, FormError> {
        let required: [(&'static str, &str); 8] = [
            ("name", &self.name),
            ("age", &self.age),
            ("gender", &self.gender),
            ("cnic", &self.cnic),
            ("phone_number", &self.phone_number),
            ("disease", &self.disease),
            ("status", &self.status),
            ("visit_date", &self.visit_date),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(FormError::missing(missing));
        }

        let age: u32 = self
            .age
            .parse()
            .map_err(|_| FormError::invalid("age", "Age must be a whole number"))?;
        let gender = Gender::parse(&self.gender)
            .map_err(|err| FormError::invalid("gender", err.0))?;
        let status = PatientStatus::parse(&self.status)
            .map_err(|err| FormError::invalid("status", err.0))?;
        let visit_date: NaiveDate = self
            .visit_date
            .parse()
            .map_err(|_| FormError::invalid("visit_date", "Visit date must be a calendar date"))?;

        Ok(NewPatientRecord {
            name: self.name.clone(),
            age,
            gender,
            cnic: self.cnic.clone(),
            phone_number: self.phone_number.clone(),
            email: none_if_empty(&self.email),
            address: none_if_empty(&self.address),
            disease: self.disease.clone(),
            disease_description: none_if_empty(&self.disease_description),
            visit_date,
            doctor_notes: none_if_empty(&self.doctor_notes),
            status,
            doctor_id: Some(doctor_id.to_string()),
        })
    }
}
