//! Lab-analysis payloads and prompt text.

use super::AdvisorError;
use crate::geochem::{GeochemData, WeatheringPayload};
use crate::geochron::AgeCollection;
use crate::library::RegionalCase;
use crate::model::age::AgeRecord;
use crate::model::composition::CompositionSample;
use serde::Serialize;

/// Which lab panel triggered an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabAnalysisKind {
    #[serde(rename = "Dickinson QFL")]
    DickinsonQfl,
    #[serde(rename = "CIA and Weathering")]
    CiaWeathering,
    #[serde(rename = "Orogenic Unroofing")]
    OrogenicUnroofing,
    #[serde(rename = "Geochronology Interpretation")]
    GeochronologyInterpretation,
    #[serde(rename = "Regional Reference")]
    RegionalReference,
}

impl LabAnalysisKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::DickinsonQfl => "Dickinson QFL",
            Self::CiaWeathering => "CIA and Weathering",
            Self::OrogenicUnroofing => "Orogenic Unroofing",
            Self::GeochronologyInterpretation => "Geochronology Interpretation",
            Self::RegionalReference => "Regional Reference",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        [
            Self::DickinsonQfl,
            Self::CiaWeathering,
            Self::OrogenicUnroofing,
            Self::GeochronologyInterpretation,
            Self::RegionalReference,
        ]
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
    }
}

/// Data attached to one analysis trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LabData {
    Composition(CompositionSample),
    Weathering(WeatheringPayload),
    Unroofing { phase: String },
    Ages(Vec<AgeRecord>),
    Region(RegionalCase),
}

/// `{ type, data }` pair handed to the advisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabPayload {
    #[serde(rename = "type")]
    pub kind: LabAnalysisKind,
    pub data: LabData,
}

impl LabPayload {
    pub fn qfl(sample: CompositionSample) -> Self {
        Self {
            kind: LabAnalysisKind::DickinsonQfl,
            data: LabData::Composition(sample),
        }
    }

    /// Weathering payload; the CIA is computed from `data`.
    pub fn weathering(data: GeochemData) -> Self {
        Self {
            kind: LabAnalysisKind::CiaWeathering,
            data: LabData::Weathering(WeatheringPayload::new(data)),
        }
    }

    pub fn unroofing(phase: impl Into<String>) -> Self {
        Self {
            kind: LabAnalysisKind::OrogenicUnroofing,
            data: LabData::Unroofing {
                phase: phase.into(),
            },
        }
    }

    pub fn geochronology(ages: &AgeCollection) -> Self {
        Self {
            kind: LabAnalysisKind::GeochronologyInterpretation,
            data: LabData::Ages(ages.as_slice().to_vec()),
        }
    }

    pub fn regional(case: RegionalCase) -> Self {
        Self {
            kind: LabAnalysisKind::RegionalReference,
            data: LabData::Region(case),
        }
    }

    /// Compact JSON of the `data` part.
    pub fn data_json(&self) -> Result<String, AdvisorError> {
        serde_json::to_string(&self.data).map_err(|err| AdvisorError::Payload(err.to_string()))
    }
}

/// User-visible transcript line recorded when an analysis is triggered.
pub fn lab_trigger_message(kind: LabAnalysisKind, data_json: &str) -> String {
    format!(
        "[Auto-Analysis Trigger] Analyzing {} data: {data_json}",
        kind.label()
    )
}

/// Prompt sent to the lab model.
pub fn lab_analysis_prompt(kind: LabAnalysisKind, data_json: &str) -> String {
    match kind {
        LabAnalysisKind::GeochronologyInterpretation => format!(
            "As Molasse Mentor, interpret the following geochronology dataset: {data_json}.
Task:
1. Interpret U-Pb and Ar-Ar dating results (with provided uncertainties).
2. Correlate ages with orogenic unroofing phases (Sedimentary Cover, Metamorphic Veneer, Crystalline Core).
3. Provide precise temporal constraints for major tectonic events (e.g. onset of collision, peak metamorphism, rapid exhumation).
4. Discuss the lag-time if applicable between source cooling and deposition.
Output: Publication-style reasoning with a focus on temporal basin dynamics."
        ),
        other => format!(
            "Analyze this {} geological data and provide a concise petrological summary: {data_json}",
            other.label()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{lab_analysis_prompt, lab_trigger_message, LabAnalysisKind, LabPayload};
    use crate::model::composition::CompositionSample;

    #[test]
    fn payload_serializes_type_and_data() {
        let payload = LabPayload::qfl(CompositionSample::new(45.0, 15.0, 40.0));
        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert_eq!(json["type"], "Dickinson QFL");
        assert_eq!(json["data"]["q"], 45.0);
        assert_eq!(
            payload.data_json().expect("data serializes"),
            r#"{"q":45.0,"f":15.0,"l":40.0}"#
        );
    }

    #[test]
    fn unroofing_payload_carries_phase() {
        let payload = LabPayload::unroofing("Phase 3 – Crystalline Core");
        assert_eq!(
            payload.data_json().expect("data serializes"),
            r#"{"phase":"Phase 3 – Crystalline Core"}"#
        );
    }

    #[test]
    fn geochronology_uses_dedicated_prompt() {
        let prompt = lab_analysis_prompt(LabAnalysisKind::GeochronologyInterpretation, "[]");
        assert!(prompt.starts_with("As Molasse Mentor"));
        assert!(prompt.contains("lag-time"));

        let prompt = lab_analysis_prompt(LabAnalysisKind::DickinsonQfl, "{}");
        assert_eq!(
            prompt,
            "Analyze this Dickinson QFL geological data and provide a concise petrological summary: {}"
        );
    }

    #[test]
    fn trigger_message_and_label_lookup() {
        assert_eq!(
            lab_trigger_message(LabAnalysisKind::CiaWeathering, "{}"),
            "[Auto-Analysis Trigger] Analyzing CIA and Weathering data: {}"
        );
        assert_eq!(
            LabAnalysisKind::from_label("regional reference"),
            Some(LabAnalysisKind::RegionalReference)
        );
    }
}
