//! Ternary (QFL) normalization and barycentric-to-Cartesian placement.
//!
//! # Responsibility
//! - Convert raw Q/F/L quantities into percentage shares.
//! - Place the shares inside an equilateral triangle with Q at the apex,
//!   F at the bottom-left corner and L at the bottom-right corner.
//!
//! # Invariants
//! - Pure and infallible; every input yields a value.
//! - Negative and non-finite components are clamped to zero before
//!   normalization, so shares stay within `[0, 100]`.

use crate::config::PlotLayout;
use crate::model::composition::{CompositionSample, NormalizedComposition, PlotPoint};
use serde::{Deserialize, Serialize};

/// Normalizes a sample to percentage shares.
///
/// Returns [`NormalizedComposition::ZERO`] when the clamped sum is zero.
///
/// Components are scaled by the largest one before summing, so the sum stays
/// finite for any finite input.
pub fn normalize(sample: &CompositionSample) -> NormalizedComposition {
    let clamped = sample.clamped();
    let largest = clamped.q.max(clamped.f).max(clamped.l);
    if largest == 0.0 {
        return NormalizedComposition::ZERO;
    }
    let scaled = CompositionSample::new(
        clamped.q / largest,
        clamped.f / largest,
        clamped.l / largest,
    );
    let sum = scaled.total();
    NormalizedComposition {
        q_pct: scaled.q / sum * 100.0,
        f_pct: scaled.f / sum * 100.0,
        l_pct: scaled.l / sum * 100.0,
    }
}

/// Triangle corner positions for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TernaryVertices {
    pub q: PlotPoint,
    pub f: PlotPoint,
    pub l: PlotPoint,
}

impl PlotLayout {
    pub fn vertices(&self) -> TernaryVertices {
        let base_y = self.padding + self.triangle_height();
        TernaryVertices {
            q: PlotPoint {
                x: self.width / 2.0,
                y: self.padding,
            },
            f: PlotPoint {
                x: self.padding,
                y: base_y,
            },
            l: PlotPoint {
                x: self.width - self.padding,
                y: base_y,
            },
        }
    }

    /// Maps normalized shares to canvas coordinates.
    ///
    /// `x = p + l%·side + q%·side/2`, `y = p + h − q%·h` (shares as fractions).
    /// `y` is evaluated as `p + h·(1 − q%)` so the apex lands exactly on `p`.
    pub fn plot_point(&self, normalized: &NormalizedComposition) -> PlotPoint {
        let side = self.side();
        let height = self.triangle_height();
        PlotPoint {
            x: self.padding
                + (normalized.l_pct / 100.0) * side
                + (normalized.q_pct / 100.0) * (side / 2.0),
            y: self.padding + height * (1.0 - normalized.q_pct / 100.0),
        }
    }
}

/// Everything the plotter panel renders for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TernaryPlot {
    pub normalized: NormalizedComposition,
    /// `None` for the degenerate all-zero sample.
    pub point: Option<PlotPoint>,
}

impl TernaryPlot {
    pub fn compute(sample: &CompositionSample, layout: &PlotLayout) -> Self {
        let normalized = normalize(sample);
        let point = normalized
            .is_plottable()
            .then(|| layout.plot_point(&normalized));
        Self { normalized, point }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, TernaryPlot};
    use crate::config::PlotLayout;
    use crate::model::composition::{CompositionSample, NormalizedComposition};

    #[test]
    fn negative_components_are_clamped_before_normalizing() {
        let normalized = normalize(&CompositionSample::new(-5.0, 50.0, 50.0));
        assert_eq!(normalized.q_pct, 0.0);
        assert_eq!(normalized.f_pct, 50.0);
        assert_eq!(normalized.l_pct, 50.0);
    }

    #[test]
    fn nan_only_sample_is_degenerate() {
        let normalized = normalize(&CompositionSample::new(f64::NAN, 0.0, -1.0));
        assert_eq!(normalized, NormalizedComposition::ZERO);
    }

    #[test]
    fn huge_finite_components_do_not_overflow() {
        let normalized = normalize(&CompositionSample::new(f64::MAX, f64::MAX, 0.0));
        assert_eq!(normalized.q_pct, 50.0);
        assert_eq!(normalized.f_pct, 50.0);
        assert_eq!(normalized.l_pct, 0.0);
    }

    #[test]
    fn compute_hides_point_for_zero_sample() {
        let plot = TernaryPlot::compute(&CompositionSample::default(), &PlotLayout::default());
        assert_eq!(plot.point, None);

        let plot = TernaryPlot::compute(&CompositionSample::new(1.0, 1.0, 1.0), &PlotLayout::default());
        assert!(plot.point.is_some());
    }
}
