//! Session collection of radiometric ages.
//!
//! # Responsibility
//! - Hold the ordered age table shown by the geochronology suite.
//! - Validate manual form entries with the same rules as bulk ingestion.
//!
//! # Invariants
//! - Updates return a new collection; existing values are never mutated.
//! - Appends keep existing entries first and source order after them.
//! - Duplicates are allowed; identity is the generated `AgeId` only.

use crate::model::age::{AgeId, AgeRecord, AgeValidationError, DatingMethod};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Proterozoic/Phanerozoic cut-off used by the correlation preview, in Ma.
const BASEMENT_AGE_THRESHOLD_MA: f64 = 1000.0;

/// Ordered, cheaply cloneable age table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeCollection {
    records: Arc<[AgeRecord]>,
}

impl AgeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AgeRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Returns a collection with `records` appended after the existing ones.
    pub fn appended(&self, records: impl IntoIterator<Item = AgeRecord>) -> Self {
        let mut next = self.records.to_vec();
        next.extend(records);
        Self::from_records(next)
    }

    /// Returns a collection without the entry `id`; unknown ids are a no-op.
    pub fn without(&self, id: AgeId) -> Self {
        if !self.contains(id) {
            return self.clone();
        }
        Self::from_records(
            self.records
                .iter()
                .filter(|record| record.id != id)
                .cloned()
                .collect(),
        )
    }

    pub fn contains(&self, id: AgeId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgeRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[AgeRecord] {
        &self.records
    }

    /// Span and correlation hint; `None` for an empty table.
    pub fn summary(&self) -> Option<AgeSummary> {
        let first = self.records.first()?;
        let (min_age, max_age) = self
            .records
            .iter()
            .fold((first.age, first.age), |(min, max), record| {
                (min.min(record.age), max.max(record.age))
            });
        let correlation = if max_age > BASEMENT_AGE_THRESHOLD_MA {
            Correlation::ProterozoicBasement
        } else {
            Correlation::PhanerozoicOrogeny
        };
        Some(AgeSummary {
            count: self.records.len(),
            min_age,
            max_age,
            correlation,
        })
    }
}

/// Broad tectonic affinity suggested by the oldest age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correlation {
    ProterozoicBasement,
    PhanerozoicOrogeny,
}

impl Correlation {
    pub fn label(self) -> &'static str {
        match self {
            Self::ProterozoicBasement => "Proterozoic Basement",
            Self::PhanerozoicOrogeny => "Phanerozoic Orogeny",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub count: usize,
    pub min_age: f64,
    pub max_age: f64,
    pub correlation: Correlation,
}

impl AgeSummary {
    /// Correlation preview sentence shown under the table.
    pub fn preview(&self) -> String {
        format!(
            "{} data points spanning {:.1} to {:.1} Ma. Potential correlation with {}.",
            self.count,
            self.min_age,
            self.max_age,
            self.correlation.label()
        )
    }
}

/// Manual entry form contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDraft {
    pub mineral: String,
    pub method: DatingMethod,
    pub age: f64,
    pub error: f64,
}

impl Default for AgeDraft {
    fn default() -> Self {
        Self {
            mineral: "Zircon".to_string(),
            method: DatingMethod::UPb,
            age: 0.0,
            error: 0.0,
        }
    }
}

impl AgeDraft {
    /// Validates the draft and assigns a fresh id.
    pub fn to_record(&self) -> Result<AgeRecord, AgeValidationError> {
        AgeRecord::new(
            Some(self.mineral.clone()),
            Some(self.method),
            self.age,
            self.error,
        )
    }
}
