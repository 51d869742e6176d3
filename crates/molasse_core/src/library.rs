//! Built-in reference material: regional basin cases and unroofing phases.

use crate::model::composition::CompositionSample;
use serde::Serialize;

/// Classic foreland/forearc basin used as an interpretation reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionalCase {
    pub name: &'static str,
    pub region: &'static str,
    pub description: &'static str,
    pub qfl: CompositionSample,
}

pub const REGIONAL_CASES: &[RegionalCase] = &[
    RegionalCase {
        name: "Siwalik Molasse",
        region: "Himalayan Foreland",
        description: "Classic unroofing sequence from sedimentary cover to crystalline core during Himalayan orogeny.",
        qfl: CompositionSample { q: 45.0, f: 15.0, l: 40.0 },
    },
    RegionalCase {
        name: "Swiss Molasse",
        region: "Alpine Foreland",
        description: "Plateau and Subalpine Molasse demonstrating North Alpine Foreland Basin evolution.",
        qfl: CompositionSample { q: 35.0, f: 25.0, l: 40.0 },
    },
    RegionalCase {
        name: "Great Valley Group",
        region: "California",
        description: "Forearc basin deposits reflecting the unroofing of the Sierra Nevada magmatic arc.",
        qfl: CompositionSample { q: 20.0, f: 45.0, l: 35.0 },
    },
    RegionalCase {
        name: "Appalachian Foreland",
        region: "Eastern North America",
        description: "Paleozoic clastic wedges reflecting Taconic, Acadian, and Alleghanian orogenic events.",
        qfl: CompositionSample { q: 60.0, f: 10.0, l: 30.0 },
    },
];

/// Orogenic unroofing sequence, shallowest first.
pub const UNROOFING_PHASES: &[&str] = &[
    "Phase 1 – Sedimentary Cover",
    "Phase 2 – Metamorphic Veneer",
    "Phase 3 – Crystalline Core",
];

/// Looks up a regional case by name (case-insensitive, trimmed).
pub fn find_regional_case(name: &str) -> Option<&'static RegionalCase> {
    let wanted = name.trim();
    REGIONAL_CASES
        .iter()
        .find(|case| case.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::{find_regional_case, REGIONAL_CASES};
    use crate::ternary::normalize;

    #[test]
    fn reference_compositions_are_already_percentages() {
        for case in REGIONAL_CASES {
            assert!((case.qfl.total() - 100.0).abs() < 1e-12, "{}", case.name);
            assert!((normalize(&case.qfl).q_pct - case.qfl.q).abs() < 1e-9);
        }
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let case = find_regional_case("  swiss molasse ").expect("known case");
        assert_eq!(case.region, "Alpine Foreland");
        assert!(find_regional_case("Karoo").is_none());
    }
}
