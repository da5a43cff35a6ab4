//! Mapping records, the mapping set, and the comparison result model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use treesync_core::{Relation, ValidationIssue};

use crate::thresholds::ThresholdStrategy;

/// How a mapping was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoundVia {
    Anchor,
    Spouse,
    Parent,
    Child,
    Sibling,
}

impl From<Relation> for FoundVia {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Spouse => Self::Spouse,
            Relation::Parent => Self::Parent,
            Relation::Child => Self::Child,
            Relation::Sibling => Self::Sibling,
        }
    }
}

/// Engine options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOptions {
    /// Maximum BFS depth from the anchor.
    pub max_level: u32,
    pub threshold_strategy: ThresholdStrategy,
    /// Base threshold used verbatim by the `Fixed` strategy.
    pub base_threshold: u8,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            max_level: 5,
            threshold_strategy: ThresholdStrategy::Adaptive,
            base_threshold: 50,
        }
    }
}

/// An accepted correspondence between one source and one destination person.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonMapping {
    pub source_id: String,
    pub destination_id: String,
    /// Match score in `[0, 100]`; 100 for the anchor.
    pub match_score: u8,
    /// BFS depth; 0 for the anchor.
    pub level: u32,
    pub found_via: FoundVia,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_in_family_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_from_person_id: Option<String>,
    pub found_at: DateTime<Utc>,
}

/// The anchor pair as echoed in results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPair {
    pub source_id: String,
    pub destination_id: String,
}

/// Append-only one-to-one correspondence between source and destination
/// persons, plus the validation issues accumulated along the way.
///
/// Created empty by the engine, mutated only on validator-approved
/// additions, read-only once the engine returns.
#[derive(Debug, Default)]
pub struct MappingSet {
    mappings: Vec<PersonMapping>,
    by_source: HashMap<String, usize>,
    by_destination: HashMap<String, usize>,
    issues: Vec<ValidationIssue>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an accepted mapping. Both sides must be unmapped; the engine
    /// guarantees this by validating before insertion.
    pub fn insert(&mut self, mapping: PersonMapping) {
        debug_assert!(
            !self.contains_source(&mapping.source_id),
            "source {} already mapped",
            mapping.source_id
        );
        debug_assert!(
            !self.targets_destination(&mapping.destination_id),
            "destination {} already targeted",
            mapping.destination_id
        );
        let index = self.mappings.len();
        self.by_source.insert(mapping.source_id.clone(), index);
        self.by_destination
            .insert(mapping.destination_id.clone(), index);
        self.mappings.push(mapping);
    }

    pub fn contains_source(&self, source_id: &str) -> bool {
        self.by_source.contains_key(source_id)
    }

    pub fn targets_destination(&self, destination_id: &str) -> bool {
        self.by_destination.contains_key(destination_id)
    }

    /// Destination image of a source person, if mapped.
    pub fn destination_of(&self, source_id: &str) -> Option<&str> {
        self.by_source
            .get(source_id)
            .map(|&i| self.mappings[i].destination_id.as_str())
    }

    /// Source person targeting a destination, if any.
    pub fn source_of(&self, destination_id: &str) -> Option<&str> {
        self.by_destination
            .get(destination_id)
            .map(|&i| self.mappings[i].source_id.as_str())
    }

    pub fn get(&self, source_id: &str) -> Option<&PersonMapping> {
        self.by_source.get(source_id).map(|&i| &self.mappings[i])
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonMapping> {
        self.mappings.iter()
    }

    pub fn push_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend_issues(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Consume the set, yielding mappings in insertion order and issues.
    pub fn into_parts(self) -> (Vec<PersonMapping>, Vec<ValidationIssue>) {
        (self.mappings, self.issues)
    }
}

/// Statistics for one BFS level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub level: u32,
    pub persons_processed: u32,
    pub new_mappings: u32,
    pub families_processed: u32,
    /// Wall-clock time spent processing this level, in milliseconds.
    pub duration_ms: f64,
}

/// Aggregate statistics over the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub source_persons: u32,
    pub destination_persons: u32,
    pub persons_processed: u32,
    pub families_processed: u32,
    pub total_mappings: u32,
    pub max_level_reached: u32,
    pub duration_ms: f64,
}

/// Why a candidate destination family was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CandidateRejection {
    HusbandConflict,
    WifeConflict,
    ChildConflict,
    BelowFloor,
}

/// One candidate considered by the family matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyCandidateTrace {
    pub destination_family_id: String,
    pub structure_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub husband_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wife_score: Option<u8>,
    pub combined_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<CandidateRejection>,
}

/// Detailed-log entry for one family-matching decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMatchTrace {
    pub level: u32,
    pub source_person_id: String,
    pub source_family_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_destination_family_id: Option<String>,
    pub candidates: Vec<FamilyCandidateTrace>,
}

/// The complete outcome of one wave comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveCompareResult {
    pub source_file: String,
    pub destination_file: String,
    pub compared_at: DateTime<Utc>,
    pub anchors: Vec<AnchorPair>,
    pub options: CompareOptions,
    pub mappings: Vec<PersonMapping>,
    pub unmatched_source: Vec<String>,
    pub unmatched_destination: Vec<String>,
    pub validation_issues: Vec<ValidationIssue>,
    pub statistics_by_level: Vec<LevelStats>,
    pub statistics: AggregateStats,
    /// Per-decision matcher traces; can be cleared by callers that do not
    /// want them serialized.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub detailed_log: Vec<FamilyMatchTrace>,
}

impl WaveCompareResult {
    /// Attach the file names the trees were loaded from.
    pub fn set_files(
        &mut self,
        source_file: impl Into<String>,
        destination_file: impl Into<String>,
    ) {
        self.source_file = source_file.into();
        self.destination_file = destination_file.into();
    }

    /// Mapping for a source id, if present.
    pub fn mapping_for_source(&self, source_id: &str) -> Option<&PersonMapping> {
        self.mappings.iter().find(|m| m.source_id == source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(src: &str, dst: &str) -> PersonMapping {
        PersonMapping {
            source_id: src.to_string(),
            destination_id: dst.to_string(),
            match_score: 80,
            level: 1,
            found_via: FoundVia::Spouse,
            found_in_family_id: None,
            found_from_person_id: None,
            found_at: Utc::now(),
        }
    }

    #[test]
    fn test_mapping_set_lookup() {
        let mut set = MappingSet::new();
        set.insert(mapping("I1", "X1"));
        set.insert(mapping("I2", "X2"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.destination_of("I1"), Some("X1"));
        assert_eq!(set.source_of("X2"), Some("I2"));
        assert!(set.contains_source("I1"));
        assert!(set.targets_destination("X1"));
        assert!(!set.contains_source("I3"));
    }

    #[test]
    fn test_mapping_set_preserves_insertion_order() {
        let mut set = MappingSet::new();
        set.insert(mapping("I2", "X2"));
        set.insert(mapping("I1", "X1"));
        let (mappings, _) = set.into_parts();
        assert_eq!(mappings[0].source_id, "I2");
        assert_eq!(mappings[1].source_id, "I1");
    }

    #[test]
    fn test_person_mapping_serde_camel_case() {
        let json = serde_json::to_string(&mapping("I1", "X1")).unwrap();
        assert!(json.contains(r#""sourceId":"I1""#), "json: {json}");
        assert!(json.contains(r#""matchScore":80"#), "json: {json}");
        assert!(json.contains(r#""foundVia":"Spouse""#), "json: {json}");
        assert!(!json.contains("foundInFamilyId"), "json: {json}");
    }
}
