use serde::{Deserialize, Serialize};

/// Coarse bucket of an adjustment ratio.
///
/// Adjacent segments whose classes differ by more than one step are penalized
/// so that tight and loose lines do not alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessClass {
    VeryLoose,
    Loose,
    Decent,
    Tight,
}

impl FitnessClass {
    pub const ALL: [FitnessClass; 4] = [
        FitnessClass::VeryLoose,
        FitnessClass::Loose,
        FitnessClass::Decent,
        FitnessClass::Tight,
    ];

    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < -0.5 {
            FitnessClass::Tight
        } else if ratio < 0.5 {
            FitnessClass::Decent
        } else if ratio < 1.0 {
            FitnessClass::Loose
        } else {
            FitnessClass::VeryLoose
        }
    }

    /// Position on the loose-to-tight scale, used as an index.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Number of steps between two classes.
    pub fn distance(self, other: FitnessClass) -> usize {
        self.rank().abs_diff(other.rank())
    }
}
