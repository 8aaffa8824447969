// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use wardbook_model::{PatientRecord, StatusFacet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFilter {
    pub search: String,
    pub facet: StatusFacet,
}

impl PatientFilter {
    #[must_use]
    pub fn new(search: impl Into<String>, facet: StatusFacet) -> Self {
        Self {
            search: search.into(),
            facet,
        }
    }
}

impl Default for PatientFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            facet: StatusFacet::All,
        }
    }
}

/// NFC-fold then lowercase, so composed and decomposed spellings of the same
/// name compare equal.
#[must_use]
pub fn normalize_search(input: &str) -> String {
    input.nfc().collect::<String>().to_lowercase()
}

fn matches_search(record: &PatientRecord, raw: &str, folded: &str) -> bool {
    if raw.is_empty() {
        return true;
    }
    // cnic stays case-sensitive: identifiers are not case-variant.
    normalize_search(&record.name).contains(folded)
        || normalize_search(&record.disease).contains(folded)
        || record.cnic.contains(raw)
}

/// Narrows `records` to those matching both the free-text search and the
/// status facet. Stable: survivors keep their input order.
#[must_use]
pub fn filter_patients(records: &[PatientRecord], filter: &PatientFilter) -> Vec<PatientRecord> {
    let folded = normalize_search(&filter.search);
    records
        .iter()
        .filter(|record| {
            matches_search(record, &filter.search, &folded) && filter.facet.matches(&record.status)
        })
        .cloned()
        .collect()
}

/// The dashboard's recent-patients search: name or diagnosis only, no
/// identifier match and no facet. Truncation to the preview count is the
/// caller's display policy, not part of the predicate.
#[must_use]
pub fn search_preview(records: &[PatientRecord], search: &str) -> Vec<PatientRecord> {
    let folded = normalize_search(search);
    records
        .iter()
        .filter(|record| {
            search.is_empty()
                || normalize_search(&record.name).contains(&folded)
                || normalize_search(&record.disease).contains(&folded)
        })
        .cloned()
        .collect()
}
