//! Report derivation: update proposals and add proposals.
//!
//! Consumes a finished [`WaveCompareResult`] together with both trees. High
//! confidence mappings drive field-level update proposals; unmatched source
//! persons with a high-confidence mapped relative become add proposals with
//! a relation breadcrumb.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use treesync_core::{DateInfo, DatePrecision, Person, Relation, Tree};

use crate::result::{AnchorPair, CompareOptions, PersonMapping, WaveCompareResult};

/// Default report-time cutoff above which a mapping qualifies to drive
/// update and add proposals.
pub const DEFAULT_HIGH_CONFIDENCE_THRESHOLD: u8 = 90;

/// What to do with one field of a matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldAction {
    /// Destination value is empty, source has one.
    Add,
    /// Both present, destination is lower-precision.
    Update,
    /// Source photo absent from the destination photo set.
    AddPhoto,
}

/// A single field difference between a mapped pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    pub field_name: String,
    pub source_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_value: Option<String>,
    pub action: FieldAction,
}

/// An update proposal for one high-confidence mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeToUpdate {
    pub source_id: String,
    pub destination_id: String,
    pub match_score: u8,
    pub field_diffs: Vec<FieldDiff>,
}

/// An add proposal for an unmatched source person with a high-confidence
/// mapped relative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeToAdd {
    pub source_id: String,
    pub person_data: Person,
    /// Destination id of the mapped relative to attach to.
    pub related_to_node_id: String,
    /// How the related node relates to the person being added.
    pub relation_type: Relation,
    /// BFS distance from the person to the nearest mapped source person.
    pub depth_from_existing: u32,
}

/// The public report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub nodes_to_update: Vec<NodeToUpdate>,
    pub nodes_to_add: Vec<NodeToAdd>,
}

/// Derive the report from a finished comparison.
pub fn build_report(
    result: &WaveCompareResult,
    source_tree: &Tree,
    destination_tree: &Tree,
    high_confidence_threshold: u8,
) -> Report {
    let by_source: HashMap<&str, &PersonMapping> = result
        .mappings
        .iter()
        .map(|m| (m.source_id.as_str(), m))
        .collect();

    // ── Updates ──────────────────────────────────────────────────────
    let mut nodes_to_update = Vec::new();
    for mapping in &result.mappings {
        if mapping.match_score < high_confidence_threshold {
            continue;
        }
        let (Some(source), Some(destination)) = (
            source_tree.person(&mapping.source_id),
            destination_tree.person(&mapping.destination_id),
        ) else {
            continue;
        };
        let field_diffs = compare_fields(source, destination);
        if field_diffs.is_empty() {
            continue;
        }
        nodes_to_update.push(NodeToUpdate {
            source_id: mapping.source_id.clone(),
            destination_id: mapping.destination_id.clone(),
            match_score: mapping.match_score,
            field_diffs,
        });
    }

    // ── Additions ────────────────────────────────────────────────────
    let mut nodes_to_add = Vec::new();
    for source_id in &result.unmatched_source {
        let Some(person) = source_tree.person(source_id) else {
            continue;
        };
        let Some((related_mapping, relation_type)) =
            best_related_mapping(person, &by_source, high_confidence_threshold)
        else {
            continue;
        };
        let Some(depth) = depth_to_nearest_mapped(source_tree, source_id, &by_source) else {
            continue;
        };
        nodes_to_add.push(NodeToAdd {
            source_id: source_id.clone(),
            person_data: person.clone(),
            related_to_node_id: related_mapping.destination_id.clone(),
            relation_type,
            depth_from_existing: depth,
        });
    }

    Report {
        nodes_to_update,
        nodes_to_add,
    }
}

/// Highest-priority related person mapped at or above the threshold,
/// searched in fixed order: spouses, father, mother, children, siblings.
fn best_related_mapping<'a>(
    person: &Person,
    by_source: &HashMap<&str, &'a PersonMapping>,
    threshold: u8,
) -> Option<(&'a PersonMapping, Relation)> {
    let candidates = person
        .spouse_ids
        .iter()
        .map(|id| (id.as_str(), Relation::Spouse))
        .chain(person.father_id.as_deref().map(|id| (id, Relation::Parent)))
        .chain(person.mother_id.as_deref().map(|id| (id, Relation::Parent)))
        .chain(
            person
                .children_ids
                .iter()
                .map(|id| (id.as_str(), Relation::Child)),
        )
        .chain(
            person
                .sibling_ids
                .iter()
                .map(|id| (id.as_str(), Relation::Sibling)),
        );

    for (relative_id, relation) in candidates {
        if let Some(mapping) = by_source.get(relative_id)
            && mapping.match_score >= threshold
        {
            return Some((mapping, relation));
        }
    }
    None
}

/// BFS distance over immediate-relative edges from `start` to the nearest
/// mapped source person. `None` when no mapped person is reachable.
fn depth_to_nearest_mapped(
    tree: &Tree,
    start: &str,
    by_source: &HashMap<&str, &PersonMapping>,
) -> Option<u32> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    visited.insert(start.to_string());
    queue.push_back((start.to_string(), 0));

    while let Some((person_id, depth)) = queue.pop_front() {
        if depth > 0 && by_source.contains_key(person_id.as_str()) {
            return Some(depth);
        }
        for (relative_id, _) in tree.immediate_relatives(&person_id) {
            if visited.insert(relative_id.clone()) {
                queue.push_back((relative_id, depth + 1));
            }
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════
// Field comparison
// ═══════════════════════════════════════════════════════════════════════

/// Field-by-field comparison of a mapped pair.
fn compare_fields(source: &Person, destination: &Person) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    let text_fields = [
        ("firstName", &source.first_name, &destination.first_name),
        ("middleName", &source.middle_name, &destination.middle_name),
        ("lastName", &source.last_name, &destination.last_name),
        ("maidenName", &source.maiden_name, &destination.maiden_name),
        ("nickname", &source.nickname, &destination.nickname),
        ("suffix", &source.suffix, &destination.suffix),
        ("birthPlace", &source.birth_place, &destination.birth_place),
        ("deathPlace", &source.death_place, &destination.death_place),
        ("burialPlace", &source.burial_place, &destination.burial_place),
    ];
    for (name, src, dst) in text_fields {
        if let Some(value) = src
            && !value.is_empty()
            && dst.as_deref().is_none_or(str::is_empty)
        {
            diffs.push(FieldDiff {
                field_name: name.to_string(),
                source_value: value.clone(),
                destination_value: None,
                action: FieldAction::Add,
            });
        }
    }

    let date_fields = [
        ("birthDate", &source.birth_date, &destination.birth_date),
        ("deathDate", &source.death_date, &destination.death_date),
        ("burialDate", &source.burial_date, &destination.burial_date),
    ];
    for (name, src, dst) in date_fields {
        match (src, dst) {
            (Some(src_date), None) => diffs.push(FieldDiff {
                field_name: name.to_string(),
                source_value: src_date.to_string(),
                destination_value: None,
                action: FieldAction::Add,
            }),
            (Some(src_date), Some(dst_date))
                if precision_rank(src_date) > precision_rank(dst_date)
                    && src_date.year == dst_date.year =>
            {
                diffs.push(FieldDiff {
                    field_name: name.to_string(),
                    source_value: src_date.to_string(),
                    destination_value: Some(dst_date.to_string()),
                    action: FieldAction::Update,
                });
            }
            _ => {}
        }
    }

    if destination.gender == treesync_core::Gender::Unknown
        && source.gender != treesync_core::Gender::Unknown
    {
        diffs.push(FieldDiff {
            field_name: "gender".to_string(),
            source_value: source.gender.to_string(),
            destination_value: None,
            action: FieldAction::Add,
        });
    }

    let destination_photos: HashSet<&str> =
        destination.photo_urls.iter().map(String::as_str).collect();
    for url in &source.photo_urls {
        if !destination_photos.contains(url.as_str()) {
            diffs.push(FieldDiff {
                field_name: "photoUrls".to_string(),
                source_value: url.clone(),
                destination_value: None,
                action: FieldAction::AddPhoto,
            });
        }
    }

    diffs
}

fn precision_rank(date: &DateInfo) -> u8 {
    match date.precision {
        DatePrecision::Year => 0,
        DatePrecision::Month => 1,
        DatePrecision::Day => 2,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Serialized comparison document
// ═══════════════════════════════════════════════════════════════════════

/// Top-level summary of a comparison document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub source: String,
    pub destination: String,
    pub high_confidence_threshold: u8,
}

/// The individuals section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualsSection {
    pub nodes_to_update: Vec<NodeToUpdate>,
    pub nodes_to_add: Vec<NodeToAdd>,
}

/// The report section with its provenance echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    pub source_file: String,
    pub destination_file: String,
    pub anchors: Vec<AnchorPair>,
    pub options: CompareOptions,
    pub individuals: IndividualsSection,
}

/// The complete serialized output consumed by downstream tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDocument {
    pub summary: Summary,
    pub report: ReportSection,
    pub wave_result: WaveCompareResult,
}

/// Assemble the serialized document from a result and its derived report.
pub fn build_document(
    result: WaveCompareResult,
    report: Report,
    high_confidence_threshold: u8,
) -> ComparisonDocument {
    ComparisonDocument {
        summary: Summary {
            source: result.source_file.clone(),
            destination: result.destination_file.clone(),
            high_confidence_threshold,
        },
        report: ReportSection {
            source_file: result.source_file.clone(),
            destination_file: result.destination_file.clone(),
            anchors: result.anchors.clone(),
            options: result.options,
            individuals: IndividualsSection {
                nodes_to_update: report.nodes_to_update,
                nodes_to_add: report.nodes_to_add,
            },
        },
        wave_result: result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treesync_core::Gender;

    #[test]
    fn test_compare_fields_add_and_update() {
        let mut source = Person::new("s1");
        source.first_name = Some("John".to_string());
        source.birth_date = Some(DateInfo::day(1950, 3, 14));
        source.birth_place = Some("London".to_string());
        source.photo_urls = vec!["http://p/1.jpg".to_string()];

        let mut destination = Person::new("d1");
        destination.first_name = Some("John".to_string());
        destination.birth_date = Some(DateInfo::year(1950));

        let diffs = compare_fields(&source, &destination);

        let birth = diffs.iter().find(|d| d.field_name == "birthDate").unwrap();
        assert_eq!(birth.action, FieldAction::Update);
        assert_eq!(birth.destination_value.as_deref(), Some("1950"));

        let place = diffs.iter().find(|d| d.field_name == "birthPlace").unwrap();
        assert_eq!(place.action, FieldAction::Add);

        let photo = diffs.iter().find(|d| d.field_name == "photoUrls").unwrap();
        assert_eq!(photo.action, FieldAction::AddPhoto);

        // Equal first names produce no diff.
        assert!(diffs.iter().all(|d| d.field_name != "firstName"));
    }

    #[test]
    fn test_compare_fields_no_update_on_different_years() {
        let mut source = Person::new("s1");
        source.birth_date = Some(DateInfo::day(1951, 3, 14));
        let mut destination = Person::new("d1");
        destination.birth_date = Some(DateInfo::year(1950));
        // Precision differs but the years disagree; not an update.
        assert!(compare_fields(&source, &destination).is_empty());
    }

    #[test]
    fn test_compare_fields_gender_add() {
        let mut source = Person::new("s1");
        source.gender = Gender::Female;
        let destination = Person::new("d1");
        let diffs = compare_fields(&source, &destination);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field_name, "gender");
        assert_eq!(diffs[0].action, FieldAction::Add);
    }

}
