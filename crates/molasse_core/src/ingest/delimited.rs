//! Comma-delimited mode with a mandatory header row.
//!
//! Header names are matched case-insensitively against `mineral`, `method`,
//! `age` and `error` (alias `uncertainty`). Unknown columns are ignored and a
//! repeated column takes the value of its last occurrence.

use super::{IngestError, IngestFormat, IngestReport, SkipReason};
use crate::model::age::{parse_numeric_text, AgeField, AgeRecord, DatingMethod};

const SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Mineral,
    Method,
    Age,
    Error,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mineral" => Some(Self::Mineral),
            "method" => Some(Self::Method),
            "age" => Some(Self::Age),
            "error" | "uncertainty" => Some(Self::Error),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Mineral => 0,
            Self::Method => 1,
            Self::Age => 2,
            Self::Error => 3,
        }
    }
}

/// Cell index of each recognized column.
#[derive(Debug, Default)]
struct HeaderMap {
    positions: [Option<usize>; 4],
}

impl HeaderMap {
    fn parse(header: &str) -> Self {
        let mut map = Self::default();
        for (index, name) in header.split(SEPARATOR).enumerate() {
            if let Some(column) = Column::from_header(name) {
                map.positions[column.slot()] = Some(index);
            }
        }
        map
    }

    fn cell<'a>(&self, cells: &[&'a str], column: Column) -> Option<&'a str> {
        self.positions[column.slot()]
            .and_then(|index| cells.get(index).copied())
            .map(str::trim)
    }
}

pub(super) fn parse(text: &str) -> Result<IngestReport, IngestError> {
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let header = match lines.next() {
        Some(line) if !line.trim().is_empty() => HeaderMap::parse(line),
        _ => {
            return Err(IngestError::malformed(
                IngestFormat::Delimited,
                "missing header row",
            ))
        }
    };

    let mut report = IngestReport::default();
    for (offset, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(SEPARATOR).collect();
        // Header is line 1.
        report.push_row(offset + 2, record_from_cells(&header, &cells));
    }
    Ok(report)
}

fn record_from_cells(header: &HeaderMap, cells: &[&str]) -> Result<AgeRecord, SkipReason> {
    let age = parse_numeric_text(AgeField::Age, header.cell(cells, Column::Age))?;
    let error = parse_numeric_text(AgeField::Error, header.cell(cells, Column::Error))?;
    let mineral = header.cell(cells, Column::Mineral).map(str::to_string);
    let method = header.cell(cells, Column::Method).and_then(DatingMethod::parse);
    Ok(AgeRecord::new(mineral, method, age, error)?)
}
