use serde::{Deserialize, Serialize};

/// Coarse presentational banding of a mastery probability. Purely a lookup
/// over fixed boundaries; never feeds back into the recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLabel {
    NotMastered,
    WeaklyMastered,
    PartiallyMastered,
    WellMastered,
    FullyMastered,
}

impl MasteryLabel {
    /// Band boundaries, lowest first: [0, 0.2) not mastered, [0.2, 0.4)
    /// weakly, [0.4, 0.6) partially, [0.6, 0.8) well, [0.8, 1] fully.
    pub const BOUNDARIES: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

    pub fn from_level(mastery_level: f64) -> Self {
        if mastery_level < Self::BOUNDARIES[0] {
            Self::NotMastered
        } else if mastery_level < Self::BOUNDARIES[1] {
            Self::WeaklyMastered
        } else if mastery_level < Self::BOUNDARIES[2] {
            Self::PartiallyMastered
        } else if mastery_level < Self::BOUNDARIES[3] {
            Self::WellMastered
        } else {
            Self::FullyMastered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotMastered => "not mastered",
            Self::WeaklyMastered => "weakly mastered",
            Self::PartiallyMastered => "partially mastered",
            Self::WellMastered => "well mastered",
            Self::FullyMastered => "fully mastered",
        }
    }
}
