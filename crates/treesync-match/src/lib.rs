//! TreeSync wave comparison core.
//!
//! Given two loaded genealogical trees and an anchor pair (one person known
//! to correspond between them), the wave engine propagates outward from the
//! anchor through family relationships, combining structural agreement with
//! fuzzy name/date/place similarity to build a one-to-one mapping set. A
//! validator rejects mappings violating biographical invariants; the report
//! builder derives high-confidence update and add proposals from the final
//! set.
//!
//! The core performs no I/O and is deterministic given identical inputs:
//! BFS is FIFO, candidate enumeration follows tree id order, and greedy
//! tie-breaks are fixed.

pub mod dates;
pub mod dict;
pub mod engine;
pub mod family;
pub mod member;
pub mod normalize;
pub mod places;
pub mod report;
pub mod result;
pub mod score;
pub mod thresholds;
pub mod validate;

pub use dict::MatchDictionaries;
pub use engine::{WaveEngine, compare};
pub use report::{
    ComparisonDocument, DEFAULT_HIGH_CONFIDENCE_THRESHOLD, Report, build_document,
    build_report,
};
pub use result::{CompareOptions, FoundVia, PersonMapping, WaveCompareResult};
pub use score::{PersonScore, PersonScorer};
pub use thresholds::ThresholdStrategy;
