//! Radiometric age records.
//!
//! # Responsibility
//! - Define the canonical `AgeRecord` used by the geochronology table.
//! - Provide the typed field parsers shared by manual entry and ingestion.
//!
//! # Invariants
//! - `id` is generated here and never taken from input documents.
//! - `age` is finite and > 0 (Ma); `error` is finite and >= 0 (Ma).
//! - Numeric text must parse in full: `"500Ma"` is rejected, not read as 500.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identity of one age entry within a session.
pub type AgeId = Uuid;

/// Isotopic system used to obtain an age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatingMethod {
    #[serde(rename = "U-Pb")]
    UPb,
    #[serde(rename = "Ar-Ar")]
    ArAr,
    #[serde(rename = "K-Ar")]
    KAr,
    #[serde(rename = "FT")]
    FissionTrack,
}

impl DatingMethod {
    pub const ALL: [Self; 4] = [Self::UPb, Self::ArAr, Self::KAr, Self::FissionTrack];

    /// Parses a method label case-insensitively, accepting common spellings.
    ///
    /// Returns `None` for blank or unrecognized labels.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '/' | ' ' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "upb" => Some(Self::UPb),
            "arar" | "40ar39ar" => Some(Self::ArAr),
            "kar" => Some(Self::KAr),
            "ft" | "fissiontrack" => Some(Self::FissionTrack),
            _ => None,
        }
    }

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::UPb => "U-Pb",
            Self::ArAr => "Ar-Ar",
            Self::KAr => "K-Ar",
            Self::FissionTrack => "FT",
        }
    }
}

impl Display for DatingMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Minerals offered by the manual entry form. Ingested labels are free text.
pub const COMMON_MINERALS: &[&str] = &[
    "Zircon",
    "Muscovite",
    "Biotite",
    "Apatite",
    "Monazite",
    "Hornblende",
];

/// One radiometric date with its ± uncertainty, both in Ma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRecord {
    pub id: AgeId,
    pub mineral: Option<String>,
    pub method: Option<DatingMethod>,
    pub age: f64,
    pub error: f64,
}

impl AgeRecord {
    /// Validates age and error and assigns a fresh identifier.
    pub fn new(
        mineral: Option<String>,
        method: Option<DatingMethod>,
        age: f64,
        error: f64,
    ) -> Result<Self, AgeValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            mineral: normalize_label(mineral),
            method,
            age: validate_age(age)?,
            error: validate_error(error)?,
        })
    }

    /// Mineral label for display; blank when the source carried none.
    pub fn mineral_label(&self) -> &str {
        self.mineral.as_deref().unwrap_or("")
    }
}

/// Trims a free-text label and maps blank values to `None`.
pub fn normalize_label(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Numeric field of an age record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeField {
    Age,
    Error,
}

impl AgeField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Error => "error",
        }
    }
}

/// Per-field validation failure for one age entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AgeValidationError {
    Missing(AgeField),
    NotNumeric { field: AgeField, value: String },
    NonFinite(AgeField),
    NonPositiveAge(f64),
    NegativeError(f64),
}

impl Display for AgeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{} is missing", field.name()),
            Self::NotNumeric { field, value } => {
                write!(f, "{} is not numeric: `{value}`", field.name())
            }
            Self::NonFinite(field) => write!(f, "{} must be a finite number", field.name()),
            Self::NonPositiveAge(value) => write!(f, "age must be > 0, got {value}"),
            Self::NegativeError(value) => write!(f, "error must be >= 0, got {value}"),
        }
    }
}

impl Error for AgeValidationError {}

/// Parses an optional text cell into a number.
///
/// Absent and blank cells are `Missing`; the whole trimmed cell must parse.
pub fn parse_numeric_text(field: AgeField, raw: Option<&str>) -> Result<f64, AgeValidationError> {
    let trimmed = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AgeValidationError::Missing(field)),
    };
    trimmed
        .parse::<f64>()
        .map_err(|_| AgeValidationError::NotNumeric {
            field,
            value: trimmed.to_string(),
        })
}

pub fn validate_age(value: f64) -> Result<f64, AgeValidationError> {
    if !value.is_finite() {
        return Err(AgeValidationError::NonFinite(AgeField::Age));
    }
    if value <= 0.0 {
        return Err(AgeValidationError::NonPositiveAge(value));
    }
    Ok(value)
}

pub fn validate_error(value: f64) -> Result<f64, AgeValidationError> {
    if !value.is_finite() {
        return Err(AgeValidationError::NonFinite(AgeField::Error));
    }
    if value < 0.0 {
        return Err(AgeValidationError::NegativeError(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{parse_numeric_text, AgeField, AgeRecord, AgeValidationError, DatingMethod};

    #[test]
    fn method_parse_accepts_aliases() {
        assert_eq!(DatingMethod::parse("u-pb"), Some(DatingMethod::UPb));
        assert_eq!(DatingMethod::parse(" U/Pb "), Some(DatingMethod::UPb));
        assert_eq!(DatingMethod::parse("40Ar/39Ar"), Some(DatingMethod::ArAr));
        assert_eq!(DatingMethod::parse("K-Ar"), Some(DatingMethod::KAr));
        assert_eq!(
            DatingMethod::parse("Fission Track"),
            Some(DatingMethod::FissionTrack)
        );
        assert_eq!(DatingMethod::parse("Rb-Sr"), None);
        assert_eq!(DatingMethod::parse(""), None);
    }

    #[test]
    fn method_label_round_trips_through_parse() {
        for method in DatingMethod::ALL {
            assert_eq!(DatingMethod::parse(method.label()), Some(method));
        }
    }

    #[test]
    fn parse_numeric_text_distinguishes_missing_and_garbage() {
        assert_eq!(parse_numeric_text(AgeField::Age, Some(" 500 ")), Ok(500.0));
        assert_eq!(
            parse_numeric_text(AgeField::Age, Some("  ")),
            Err(AgeValidationError::Missing(AgeField::Age))
        );
        assert_eq!(
            parse_numeric_text(AgeField::Error, None),
            Err(AgeValidationError::Missing(AgeField::Error))
        );
        assert!(matches!(
            parse_numeric_text(AgeField::Age, Some("500Ma")),
            Err(AgeValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn new_rejects_non_positive_age_and_negative_error() {
        assert_eq!(
            AgeRecord::new(None, None, 0.0, 1.0).unwrap_err(),
            AgeValidationError::NonPositiveAge(0.0)
        );
        assert_eq!(
            AgeRecord::new(None, None, 10.0, -1.0).unwrap_err(),
            AgeValidationError::NegativeError(-1.0)
        );
        assert_eq!(
            AgeRecord::new(None, None, f64::NAN, 1.0).unwrap_err(),
            AgeValidationError::NonFinite(AgeField::Age)
        );
    }

    #[test]
    fn new_generates_distinct_ids_and_trims_mineral() {
        let first = AgeRecord::new(Some("  Zircon ".to_string()), Some(DatingMethod::UPb), 500.0, 5.0)
            .expect("valid record");
        let second = AgeRecord::new(Some("   ".to_string()), None, 500.0, 0.0).expect("valid record");
        assert_ne!(first.id, second.id);
        assert_eq!(first.mineral.as_deref(), Some("Zircon"));
        assert_eq!(second.mineral, None);
        assert_eq!(second.mineral_label(), "");
    }
}
