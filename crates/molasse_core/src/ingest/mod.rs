//! Bulk ingestion of geochronology tables.
//!
//! # Responsibility
//! - Turn a complete text document (JSON or comma-delimited) into validated
//!   `AgeRecord`s.
//! - Report skipped rows separately so callers decide whether to surface them.
//!
//! # Invariants
//! - Accepted records keep source order.
//! - A malformed document yields `IngestError` and no records at all.
//! - A malformed row never fails the document; it is listed in `skipped`.
//! - Identifiers are always freshly generated.

mod delimited;
mod json;

use crate::model::age::{AgeRecord, AgeValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Declared content format of an ingestion document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestFormat {
    Json,
    /// Comma-separated text with a header row.
    Delimited,
}

impl IngestFormat {
    /// Infers the format from a file name extension (`.json` / `.csv`).
    pub fn from_file_name(name: &str) -> Result<Self, IngestError> {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered.ends_with(".json") {
            Ok(Self::Json)
        } else if lowered.ends_with(".csv") {
            Ok(Self::Delimited)
        } else {
            Err(IngestError::UnsupportedFormat(name.trim().to_string()))
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Delimited => "csv",
        }
    }
}

impl Display for IngestFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why one row or element was left out.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// JSON array element is not an object.
    NotAnObject,
    Invalid(AgeValidationError),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "entry is not an object"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl From<AgeValidationError> for SkipReason {
    fn from(value: AgeValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// One excluded row.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number (delimited) or element number (JSON).
    pub position: usize,
    pub reason: SkipReason,
}

/// Outcome of one successful ingestion call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Accepted records in source order.
    pub records: Vec<AgeRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl IngestReport {
    pub fn accepted_count(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub(crate) fn push_row(&mut self, position: usize, row: Result<AgeRecord, SkipReason>) {
        match row {
            Ok(record) => self.records.push(record),
            Err(reason) => self.skipped.push(SkippedRow { position, reason }),
        }
    }
}

/// Document-level ingestion failure. Prior state must be kept as is.
#[derive(Debug)]
pub enum IngestError {
    MalformedDocument {
        format: IngestFormat,
        message: String,
    },
    UnsupportedFormat(String),
    Io(std::io::Error),
}

impl IngestError {
    pub(crate) fn malformed(format: IngestFormat, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            format,
            message: message.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => "malformed_document",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Io(_) => "io",
        }
    }
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDocument { format, message } => {
                write!(f, "malformed {format} document: {message}")
            }
            Self::UnsupportedFormat(name) => {
                write!(f, "unsupported age file `{name}`; expected .csv or .json")
            }
            Self::Io(err) => write!(f, "failed to read age file: {err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Parses a complete document into age records.
///
/// # Errors
/// - `MalformedDocument` when the text cannot be read as the declared format.
pub fn ingest(text: &str, format: IngestFormat) -> Result<IngestReport, IngestError> {
    let result = match format {
        IngestFormat::Json => json::parse(text),
        IngestFormat::Delimited => delimited::parse(text),
    };

    match &result {
        Ok(report) => info!(
            "event=ages_ingest module=ingest status=ok format={} accepted={} skipped={}",
            format,
            report.accepted_count(),
            report.skipped_count()
        ),
        Err(err) => warn!(
            "event=ages_ingest module=ingest status=error format={} error_kind={}",
            format,
            err.kind()
        ),
    }
    result
}

/// Ingests a named document, inferring the format from its extension.
pub fn ingest_named(file_name: &str, text: &str) -> Result<IngestReport, IngestError> {
    let format = IngestFormat::from_file_name(file_name)?;
    ingest(text, format)
}

/// Reads a whole file and ingests it by extension.
pub fn ingest_file(path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let format = IngestFormat::from_file_name(name)?;
    let text = std::fs::read_to_string(path)?;
    ingest(&text, format)
}

#[cfg(test)]
mod tests {
    use super::{IngestError, IngestFormat};

    #[test]
    fn format_is_inferred_case_insensitively() {
        assert_eq!(
            IngestFormat::from_file_name("ages.JSON").expect("json"),
            IngestFormat::Json
        );
        assert_eq!(
            IngestFormat::from_file_name("lab/run-3.csv").expect("csv"),
            IngestFormat::Delimited
        );
        assert!(matches!(
            IngestFormat::from_file_name("ages.xlsx"),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }
}
