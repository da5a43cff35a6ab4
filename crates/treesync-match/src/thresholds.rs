//! Adaptive admission thresholds for proposed mappings.

use serde::{Deserialize, Serialize};
use treesync_core::Relation;

/// How admission thresholds respond to context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdStrategy {
    /// Use the configured base threshold verbatim for every relation.
    Fixed,
    /// Relation-dependent base with cardinality adjustment.
    #[default]
    Adaptive,
    /// Adaptive, loosened by 10 points.
    Aggressive,
    /// Adaptive, tightened by 15 points.
    Conservative,
}

impl std::fmt::Display for ThresholdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Adaptive => write!(f, "adaptive"),
            Self::Aggressive => write!(f, "aggressive"),
            Self::Conservative => write!(f, "conservative"),
        }
    }
}

const THRESHOLD_MIN: i32 = 30;
const THRESHOLD_MAX: i32 = 85;

/// Minimum personal score required to admit a proposed mapping.
///
/// Relation base (spouse 40, parent 45, child 50, sibling 55) plus a
/// cardinality adjustment that tightens as the candidate pool grows, plus
/// the strategy modifier; clamped to `[30, 85]`. The `Fixed` strategy
/// bypasses relation and cardinality and clamps the configured base.
pub fn admission_threshold(
    relation: Relation,
    candidate_count: usize,
    strategy: ThresholdStrategy,
    base_threshold: u8,
) -> u8 {
    if strategy == ThresholdStrategy::Fixed {
        return i32::from(base_threshold).clamp(THRESHOLD_MIN, THRESHOLD_MAX) as u8;
    }

    let base = match relation {
        Relation::Spouse => 40,
        Relation::Parent => 45,
        Relation::Child => 50,
        Relation::Sibling => 55,
    };
    let cardinality = match candidate_count {
        0 | 1 => -5,
        2 => 0,
        3..=4 => 5,
        5..=8 => 10,
        _ => 15,
    };
    let modifier = match strategy {
        ThresholdStrategy::Fixed => unreachable!("handled above"),
        ThresholdStrategy::Adaptive => 0,
        ThresholdStrategy::Aggressive => -10,
        ThresholdStrategy::Conservative => 15,
    };

    (base + cardinality + modifier).clamp(THRESHOLD_MIN, THRESHOLD_MAX) as u8
}
