//! Whole-rock geochemistry inputs and the weathering index.

use serde::{Deserialize, Serialize};

/// Major oxides (wt%) and trace elements (ppm). Absent values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeochemData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub al2o3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cao: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub na2o: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k2o: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub th: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub la: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zr: Option<f64>,
}

impl GeochemData {
    /// Builds a record carrying only the four CIA oxides.
    pub fn from_oxides(al2o3: f64, cao: f64, na2o: f64, k2o: f64) -> Self {
        Self {
            al2o3: Some(al2o3),
            cao: Some(cao),
            na2o: Some(na2o),
            k2o: Some(k2o),
            ..Self::default()
        }
    }
}

/// Chemical Index of Alteration: `100 · Al2O3 / (Al2O3 + CaO + Na2O + K2O)`.
///
/// Missing, negative and non-finite oxides count as zero; returns 0 when the
/// oxide sum is zero.
pub fn chemical_index_of_alteration(data: &GeochemData) -> f64 {
    let al2o3 = oxide(data.al2o3);
    let sum = al2o3 + oxide(data.cao) + oxide(data.na2o) + oxide(data.k2o);
    if sum == 0.0 {
        return 0.0;
    }
    al2o3 / sum * 100.0
}

fn oxide(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Payload sent with a weathering interpretation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatheringPayload {
    #[serde(flatten)]
    pub data: GeochemData,
    pub cia: f64,
}

impl WeatheringPayload {
    pub fn new(data: GeochemData) -> Self {
        Self {
            cia: chemical_index_of_alteration(&data),
            data,
        }
    }
}
