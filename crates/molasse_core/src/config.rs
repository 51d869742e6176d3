//! Runtime configuration for the plotter canvas and the advisor collaborator.
//!
//! # Responsibility
//! - Provide reference defaults matching the shipped UI.
//! - Load advisor overrides from JSON documents and environment variables.
//!
//! # Invariants
//! - Missing JSON keys fall back to defaults (`#[serde(default)]`).
//! - Environment overrides are applied after the document and win.

use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const ENV_ADVICE_MODEL: &str = "MOLASSE_ADVICE_MODEL";
pub const ENV_LAB_MODEL: &str = "MOLASSE_LAB_MODEL";
pub const ENV_THINKING_BUDGET: &str = "MOLASSE_THINKING_BUDGET";

const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are Molasse Mentor, an expert geological AI architect and senior sedimentary petrologist.
Analyze petrographic data, thin sections, geochemistry, and geochronology from foreland basins.
Tone: academic, precise, formal, publication-grade.
Always include Tectonic Setting, Basin Position, Unroofing Phase, Depositional Environment, and Provenance Type in your final interpretation.
For Geochronology, correlate U-Pb (crystallization/inheritance) and Ar-Ar (cooling) ages with specific tectonic cycles and orogenic unroofing sequences.";

/// Pixel-space geometry of the ternary canvas.
///
/// The triangle is equilateral with side `width - 2 * padding`, apex at the
/// top centre and base along `padding + height_of_triangle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 260.0,
            padding: 20.0,
        }
    }
}

impl PlotLayout {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Triangle side length.
    pub fn side(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Triangle height, `(√3 / 2) * side`.
    pub fn triangle_height(&self) -> f64 {
        (3.0_f64.sqrt() / 2.0) * self.side()
    }
}

/// Advisor collaborator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Model used for free-form conversation.
    pub advice_model: String,
    /// Model used for lab-analysis triggers.
    pub lab_model: String,
    /// Model used for grounded context search.
    pub search_model: String,
    pub thinking_budget: u32,
    pub system_instruction: String,
    /// First transcript message of a fresh session.
    pub greeting: String,
    /// Shown when the advisor returns no text.
    pub empty_advice_message: String,
    /// Shown when a conversation call fails.
    pub advice_failure_message: String,
    /// Shown when a lab-analysis call fails.
    pub lab_failure_message: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            advice_model: "gemini-3-pro-preview".to_string(),
            lab_model: "gemini-3-flash-preview".to_string(),
            search_model: "gemini-3-flash-preview".to_string(),
            thinking_budget: 32_768,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            greeting: "Greetings. I am Molasse Mentor. I have initialized my multimodal analysis suite. You may now upload thin-section screenshots, PDF reports, or geochemical datasets (CSV/JSON) for integrated petrological interpretation.".to_string(),
            empty_advice_message: "I was unable to synthesize an interpretation at this time."
                .to_string(),
            advice_failure_message:
                "An error occurred during interpretation. Please check your data inputs."
                    .to_string(),
            lab_failure_message:
                "Laboratory analysis failed. Ensure data formats are correct.".to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Parses a JSON document; absent keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    /// Applies `MOLASSE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(model) = non_blank(lookup(ENV_ADVICE_MODEL)) {
            self.advice_model = model;
        }
        if let Some(model) = non_blank(lookup(ENV_LAB_MODEL)) {
            self.lab_model = model;
        }
        if let Some(raw) = non_blank(lookup(ENV_THINKING_BUDGET)) {
            match raw.parse::<u32>() {
                Ok(budget) => self.thinking_budget = budget,
                Err(_) => warn!(
                    "event=config_override module=config status=error key={ENV_THINKING_BUDGET} reason=not_u32"
                ),
            }
        }
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read advisor config: {err}"),
            Self::Parse(err) => write!(f, "invalid advisor config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}
