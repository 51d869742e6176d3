//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core results into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through `ok = false` plus a message, never by
//!   dropping data the caller already holds.

use log::warn;
use molasse_core::advisor::lab_request;
use molasse_core::{
    chemical_index_of_alteration, core_version as core_version_inner, ingest_named,
    init_logging as init_logging_inner, lab_analysis_prompt, lab_trigger_message as trigger_inner,
    ping as ping_inner, AdvisorConfig, AgeRecord, CompositionSample, GeochemData, LabAnalysisKind,
    PlotLayout, TernaryPlot,
};
use std::sync::OnceLock;

const ADVISOR_CONFIG_ENV: &str = "MOLASSE_ADVISOR_CONFIG";
static ADVISOR_CONFIG: OnceLock<AdvisorConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Normalized QFL shares and canvas position for the default plot layout.
#[derive(Debug, Clone, PartialEq)]
pub struct QflPlotResponse {
    pub q_pct: f64,
    pub f_pct: f64,
    pub l_pct: f64,
    /// `false` for the all-zero sample; `x`/`y` are then zero.
    pub has_point: bool,
    pub x: f64,
    pub y: f64,
    /// Display string such as `Q:45.0% F:15.0% L:40.0%`.
    pub summary: String,
}

/// Computes the ternary plot for one Q/F/L sample.
///
/// Negative or non-finite inputs are clamped to zero.
#[flutter_rust_bridge::frb(sync)]
pub fn qfl_plot(q: f64, f: f64, l: f64) -> QflPlotResponse {
    let plot = TernaryPlot::compute(&CompositionSample::new(q, f, l), &PlotLayout::default());
    let (x, y) = plot.point.map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
    QflPlotResponse {
        q_pct: plot.normalized.q_pct,
        f_pct: plot.normalized.f_pct,
        l_pct: plot.normalized.l_pct,
        has_point: plot.point.is_some(),
        x,
        y,
        summary: plot.normalized.summary(),
    }
}

/// Chemical Index of Alteration from the four major oxides (wt%).
#[flutter_rust_bridge::frb(sync)]
pub fn cia_calculate(al2o3: f64, cao: f64, na2o: f64, k2o: f64) -> f64 {
    chemical_index_of_alteration(&GeochemData::from_oxides(al2o3, cao, na2o, k2o))
}

/// One age measurement as shown in the geochronology table.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeEntryItem {
    /// Stable record ID in string form.
    pub id: String,
    /// Empty when the source row had no mineral.
    pub mineral: String,
    /// Method label (`U-Pb|Ar-Ar|K-Ar|FT`), empty when unknown.
    pub method: String,
    pub age: f64,
    pub error: f64,
}

impl From<&AgeRecord> for AgeEntryItem {
    fn from(record: &AgeRecord) -> Self {
        Self {
            id: record.id.to_string(),
            mineral: record.mineral_label().to_string(),
            method: record
                .method
                .map(|method| method.label().to_string())
                .unwrap_or_default(),
            age: record.age,
            error: record.error,
        }
    }
}

/// Ingestion response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeIngestResponse {
    /// Whether the document parsed.
    pub ok: bool,
    /// Existing entries followed by the accepted ones; unchanged on failure.
    pub items: Vec<AgeEntryItem>,
    pub accepted_count: u32,
    pub skipped_count: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Parses an uploaded `.json`/`.csv` document and appends its rows.
///
/// # FFI contract
/// - Sync call; cost is linear in `text`.
/// - Never panics; a malformed document leaves `existing` untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn ages_ingest(existing: Vec<AgeEntryItem>, text: String, file_name: String) -> AgeIngestResponse {
    match ingest_named(file_name.as_str(), text.as_str()) {
        Ok(report) => {
            let accepted_count = count_u32(report.accepted_count());
            let skipped_count = count_u32(report.skipped_count());
            let mut items = existing;
            items.extend(report.records.iter().map(AgeEntryItem::from));
            AgeIngestResponse {
                ok: true,
                items,
                accepted_count,
                skipped_count,
                message: format!("ingested {accepted_count} ages, skipped {skipped_count} rows"),
            }
        }
        Err(err) => AgeIngestResponse {
            ok: false,
            items: existing,
            accepted_count: 0,
            skipped_count: 0,
            message: format!("ages_ingest failed: {err}"),
        },
    }
}

/// Removes the entry with `id`; unknown ids leave the list unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn ages_remove(existing: Vec<AgeEntryItem>, id: String) -> Vec<AgeEntryItem> {
    let id = id.trim();
    existing.into_iter().filter(|item| item.id != id).collect()
}

/// Text response envelope for prompt builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabTextResponse {
    pub ok: bool,
    pub text: String,
    pub message: String,
}

impl LabTextResponse {
    fn success(text: String) -> Self {
        Self {
            ok: true,
            text,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: String::new(),
            message: message.into(),
        }
    }
}

/// Transcript line recorded when a lab panel triggers an analysis.
///
/// `kind` is the analysis label, e.g. `Dickinson QFL`.
#[flutter_rust_bridge::frb(sync)]
pub fn lab_trigger_message(kind: String, data_json: String) -> LabTextResponse {
    with_lab_kind(&kind, |kind| trigger_inner(kind, &data_json))
}

/// Prompt text the lab model receives for `kind`.
#[flutter_rust_bridge::frb(sync)]
pub fn lab_prompt(kind: String, data_json: String) -> LabTextResponse {
    with_lab_kind(&kind, |kind| lab_analysis_prompt(kind, &data_json))
}

/// Full advisor request body for a lab analysis, as JSON for the host
/// transport.
#[flutter_rust_bridge::frb(sync)]
pub fn lab_request_json(kind: String, data_json: String) -> LabTextResponse {
    let Some(kind) = LabAnalysisKind::from_label(&kind) else {
        return unknown_kind(&kind);
    };
    match serde_json::to_string(&lab_request(advisor_config(), kind, &data_json)) {
        Ok(json) => LabTextResponse::success(json),
        Err(err) => LabTextResponse::failure(format!("lab_request_json failed: {err}")),
    }
}

/// First transcript message of a fresh session.
#[flutter_rust_bridge::frb(sync)]
pub fn advisor_greeting() -> String {
    advisor_config().greeting.clone()
}

fn with_lab_kind(kind: &str, render: impl FnOnce(LabAnalysisKind) -> String) -> LabTextResponse {
    match LabAnalysisKind::from_label(kind) {
        Some(kind) => LabTextResponse::success(render(kind)),
        None => unknown_kind(kind),
    }
}

fn unknown_kind(kind: &str) -> LabTextResponse {
    LabTextResponse::failure(format!("unknown lab analysis kind: {}", kind.trim()))
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn advisor_config() -> &'static AdvisorConfig {
    ADVISOR_CONFIG.get_or_init(|| {
        let base = match std::env::var(ADVISOR_CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                AdvisorConfig::from_json_file(path.trim()).unwrap_or_else(|err| {
                    warn!(
                        "event=advisor_config module=ffi status=error reason={err}"
                    );
                    AdvisorConfig::default()
                })
            }
            _ => AdvisorConfig::default(),
        };
        base.with_env_overrides()
    })
}
