//! Session state and its update cycle.
//!
//! # Responsibility
//! - Model everything the workspace UI shows as one immutable snapshot.
//! - Turn user actions into the next snapshot plus an optional advisor effect.
//!
//! # Invariants
//! - `reduce` never mutates its input snapshot.
//! - A failed ingestion leaves the age table untouched.
//! - At most one advisor request is in flight (`is_loading`).

mod state;

pub use state::{drive, reduce, Action, Diagnostic, Effect, SessionState, Transition};

use serde::{Deserialize, Serialize};

/// Sidebar group a lab module is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidebarSection {
    AnalysisLab,
    Petrography,
}

/// Selectable workspace panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabModule {
    #[serde(rename = "XRD")]
    Xrd,
    #[serde(rename = "XRF")]
    Xrf,
    #[serde(rename = "ICP-MS")]
    IcpMs,
    #[serde(rename = "DTA")]
    Dta,
    #[serde(rename = "CIA Calculator")]
    Cia,
    #[serde(rename = "Petrographic Plotter")]
    Qfl,
    #[serde(rename = "Orogenic Framework")]
    Orogenic,
    #[serde(rename = "Regional Cases")]
    Basins,
    #[serde(rename = "Geochronology")]
    Geochronology,
}

impl LabModule {
    pub const ALL: [Self; 9] = [
        Self::Xrd,
        Self::Xrf,
        Self::IcpMs,
        Self::Dta,
        Self::Cia,
        Self::Geochronology,
        Self::Qfl,
        Self::Orogenic,
        Self::Basins,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Xrd => "XRD",
            Self::Xrf => "XRF",
            Self::IcpMs => "ICP-MS",
            Self::Dta => "DTA",
            Self::Cia => "CIA Calculator",
            Self::Qfl => "Petrographic Plotter",
            Self::Orogenic => "Orogenic Framework",
            Self::Basins => "Regional Cases",
            Self::Geochronology => "Geochronology",
        }
    }

    pub fn section(self) -> SidebarSection {
        match self {
            Self::Qfl | Self::Orogenic | Self::Basins => SidebarSection::Petrography,
            _ => SidebarSection::AnalysisLab,
        }
    }

    /// Modules of one sidebar group in display order.
    pub fn in_section(section: SidebarSection) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|module| module.section() == section)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{LabModule, SidebarSection};

    #[test]
    fn sidebar_groups_match_workspace_layout() {
        assert_eq!(
            LabModule::in_section(SidebarSection::Petrography),
            vec![LabModule::Qfl, LabModule::Orogenic, LabModule::Basins]
        );
        assert_eq!(LabModule::in_section(SidebarSection::AnalysisLab).len(), 6);
        assert_eq!(
            serde_json::to_value(LabModule::IcpMs).expect("serializes"),
            "ICP-MS"
        );
    }
}
