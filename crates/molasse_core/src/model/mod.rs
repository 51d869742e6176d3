//! Domain model for lab measurements.
//!
//! # Responsibility
//! - Define the canonical shapes for compositions and radiometric ages.
//! - Own the typed field validation shared by manual entry and ingestion.
//!
//! # Invariants
//! - Every `AgeRecord` carries a freshly generated `AgeId`.
//! - A retained `AgeRecord` always has a finite positive age and a finite
//!   non-negative error.

pub mod age;
pub mod composition;
