//! Three-valued outcome lattice.

use serde::{Deserialize, Serialize};

/// Outcome of a decision that may not be known yet.
///
/// Resolution moves a value from `Uncertain` to one of the resolved values
/// and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    #[default]
    Uncertain,
    Success,
    Failure,
}

impl Tristate {
    pub fn is_resolved(self) -> bool {
        self != Tristate::Uncertain
    }

    /// Merges two pieces of evidence about the same decision.
    ///
    /// Failure dominates Uncertain, which dominates Success.
    pub fn combine(self, other: Tristate) -> Tristate {
        match (self, other) {
            (Tristate::Failure, _) | (_, Tristate::Failure) => Tristate::Failure,
            (Tristate::Uncertain, _) | (_, Tristate::Uncertain) => Tristate::Uncertain,
            _ => Tristate::Success,
        }
    }

    /// Swaps Success and Failure.
    pub fn invert(self) -> Tristate {
        match self {
            Tristate::Success => Tristate::Failure,
            Tristate::Failure => Tristate::Success,
            Tristate::Uncertain => Tristate::Uncertain,
        }
    }
}

impl std::fmt::Display for Tristate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Tristate::Uncertain => "uncertain",
            Tristate::Success => "success",
            Tristate::Failure => "failure",
        })
    }
}

impl FromIterator<Tristate> for Tristate {
    /// Combines all evidence; an empty iterator is Success.
    fn from_iter<I: IntoIterator<Item = Tristate>>(iter: I) -> Self {
        iter.into_iter().fold(Tristate::Success, Tristate::combine)
    }
}
