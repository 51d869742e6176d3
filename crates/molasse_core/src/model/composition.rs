//! Modal composition samples (QFL) and their normalized projection.
//!
//! # Invariants
//! - `NormalizedComposition` shares sum to 100 whenever any clamped input
//!   component is positive, and are exactly 0/0/0 otherwise.
//! - Every share lies in `[0, 100]`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw quartz/feldspar/lithic quantities as entered (point counts or
/// modal percentages, unit-agnostic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionSample {
    pub q: f64,
    pub f: f64,
    pub l: f64,
}

impl CompositionSample {
    pub fn new(q: f64, f: f64, l: f64) -> Self {
        Self { q, f, l }
    }

    /// Rejects non-physical input for callers that prefer failing over the
    /// clamping applied by [`crate::ternary::normalize`].
    pub fn validate(&self) -> Result<(), CompositionError> {
        for (component, value) in self.components() {
            if !value.is_finite() {
                return Err(CompositionError::NonFinite { component });
            }
            if value < 0.0 {
                return Err(CompositionError::Negative { component, value });
            }
        }
        Ok(())
    }

    /// Copy with negative and non-finite components replaced by zero.
    pub fn clamped(&self) -> Self {
        Self {
            q: clamp_component(self.q),
            f: clamp_component(self.f),
            l: clamp_component(self.l),
        }
    }

    /// Sum of the raw components.
    pub fn total(&self) -> f64 {
        self.q + self.f + self.l
    }

    fn components(&self) -> [(Component, f64); 3] {
        [
            (Component::Quartz, self.q),
            (Component::Feldspar, self.f),
            (Component::Lithics, self.l),
        ]
    }
}

fn clamp_component(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Ternary end-member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Quartz,
    Feldspar,
    Lithics,
}

impl Component {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Quartz => "Q",
            Self::Feldspar => "F",
            Self::Lithics => "L",
        }
    }
}

/// Percentage shares derived from a `CompositionSample`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedComposition {
    pub q_pct: f64,
    pub f_pct: f64,
    pub l_pct: f64,
}

impl NormalizedComposition {
    /// The degenerate all-zero projection.
    pub const ZERO: Self = Self {
        q_pct: 0.0,
        f_pct: 0.0,
        l_pct: 0.0,
    };

    /// False for the degenerate all-zero case; the plot hides its marker.
    pub fn is_plottable(&self) -> bool {
        *self != Self::ZERO
    }

    pub fn total(&self) -> f64 {
        self.q_pct + self.f_pct + self.l_pct
    }

    /// One-decimal footer line, e.g. `Q:45.0% F:15.0% L:40.0%`.
    pub fn summary(&self) -> String {
        format!(
            "Q:{:.1}% F:{:.1}% L:{:.1}%",
            self.q_pct, self.f_pct, self.l_pct
        )
    }
}

/// Cartesian position inside the plot canvas (pixel space, y grows down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Non-physical composition input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositionError {
    Negative { component: Component, value: f64 },
    NonFinite { component: Component },
}

impl Display for CompositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative { component, value } => write!(
                f,
                "{} must not be negative, got {value}",
                component.symbol()
            ),
            Self::NonFinite { component } => {
                write!(f, "{} must be a finite number", component.symbol())
            }
        }
    }
}

impl Error for CompositionError {}

#[cfg(test)]
mod tests {
    use super::{Component, CompositionError, CompositionSample, NormalizedComposition};

    #[test]
    fn validate_reports_first_offending_component() {
        let err = CompositionSample::new(10.0, -2.0, f64::NAN)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            CompositionError::Negative {
                component: Component::Feldspar,
                value: -2.0
            }
        );
        assert_eq!(err.to_string(), "F must not be negative, got -2");
    }

    #[test]
    fn clamped_zeroes_non_physical_components() {
        let clamped = CompositionSample::new(-1.0, f64::INFINITY, 3.0).clamped();
        assert_eq!(clamped, CompositionSample::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn summary_uses_one_decimal() {
        let normalized = NormalizedComposition {
            q_pct: 45.0,
            f_pct: 15.04,
            l_pct: 39.96,
        };
        assert_eq!(normalized.summary(), "Q:45.0% F:15.0% L:40.0%");
        assert!(!NormalizedComposition::ZERO.is_plottable());
    }
}
