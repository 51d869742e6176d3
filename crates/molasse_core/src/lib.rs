//! Core domain logic for Molasse Mentor.
//! This crate is the single source of truth for lab-data invariants.

pub mod advisor;
pub mod config;
pub mod geochem;
pub mod geochron;
pub mod ingest;
pub mod library;
pub mod logging;
pub mod model;
pub mod session;
pub mod ternary;

pub use advisor::prompt::{lab_analysis_prompt, lab_trigger_message};
pub use advisor::{
    AdvisorError, AdvisorProvider, AdvisorReply, AdvisorRequest, ChatMessage, ChatRole,
    InlineImage, LabAnalysisKind, LabData, LabPayload,
};
pub use config::{AdvisorConfig, ConfigError, PlotLayout};
pub use geochem::{chemical_index_of_alteration, GeochemData, WeatheringPayload};
pub use geochron::{AgeCollection, AgeDraft, AgeSummary, Correlation};
pub use ingest::{
    ingest, ingest_file, ingest_named, IngestError, IngestFormat, IngestReport, SkipReason,
    SkippedRow,
};
pub use library::{find_regional_case, RegionalCase, REGIONAL_CASES, UNROOFING_PHASES};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::age::{AgeField, AgeId, AgeRecord, AgeValidationError, DatingMethod};
pub use model::composition::{
    CompositionError, CompositionSample, NormalizedComposition, PlotPoint,
};
pub use session::{drive, reduce, Action, Diagnostic, Effect, LabModule, SessionState, Transition};
pub use ternary::{normalize, TernaryPlot, TernaryVertices};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
