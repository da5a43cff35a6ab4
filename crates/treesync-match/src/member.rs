//! Member matching inside a matched family pair.
//!
//! Once a source family and a destination family are paired, propose
//! mappings for their unmapped members: spouses (or parents, when the pair
//! was reached from a child) directly against the adaptive threshold, and
//! children (or siblings) through a greedy walk over a family-context score
//! matrix.

use treesync_core::{Family, Gender, Person, Relation, Tree};

use crate::result::{FoundVia, MappingSet};
use crate::score::PersonScorer;
use crate::thresholds::{ThresholdStrategy, admission_threshold};

/// A mapping proposed by the member matcher, not yet validated.
#[derive(Debug, Clone)]
pub struct ProposedMapping {
    pub source_id: String,
    pub destination_id: String,
    pub match_score: u8,
    pub found_via: FoundVia,
    pub found_in_family_id: String,
    pub found_from_person_id: String,
}

/// Relation context for a family pair: how the BFS person sits in the
/// source family decides what its co-members are to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyOrientation {
    /// The BFS person is a spouse: the other spouse is a `Spouse`, the
    /// children are `Child`ren.
    AsSpouse,
    /// The BFS person is a child: the spouses are `Parent`s, the other
    /// children are `Sibling`s.
    AsChild,
}

impl FamilyOrientation {
    fn spouse_relation(self) -> Relation {
        match self {
            Self::AsSpouse => Relation::Spouse,
            Self::AsChild => Relation::Parent,
        }
    }

    fn child_relation(self) -> Relation {
        match self {
            Self::AsSpouse => Relation::Child,
            Self::AsChild => Relation::Sibling,
        }
    }
}

/// Propose mappings for the unmapped members of a matched family pair.
#[allow(clippy::too_many_arguments)]
pub fn propose_members(
    source_family: &Family,
    destination_family: &Family,
    orientation: FamilyOrientation,
    mappings: &MappingSet,
    source_tree: &Tree,
    destination_tree: &Tree,
    scorer: &PersonScorer,
    strategy: ThresholdStrategy,
    base_threshold: u8,
    from_person_id: &str,
) -> Vec<ProposedMapping> {
    let mut proposals = Vec::new();

    // ── Spouse roles ─────────────────────────────────────────────────
    let spouse_relation = orientation.spouse_relation();
    let spouse_pairs = [
        (
            source_family.husband_id.as_deref(),
            destination_family.husband_id.as_deref(),
        ),
        (
            source_family.wife_id.as_deref(),
            destination_family.wife_id.as_deref(),
        ),
    ];
    for (source_id, destination_id) in spouse_pairs {
        let (Some(source_id), Some(destination_id)) = (source_id, destination_id) else {
            continue;
        };
        if mappings.contains_source(source_id) || mappings.targets_destination(destination_id) {
            continue;
        }
        let (Some(source), Some(destination)) = (
            source_tree.person(source_id),
            destination_tree.person(destination_id),
        ) else {
            continue;
        };
        let score = scorer.score(source, destination).score;
        let threshold =
            admission_threshold(spouse_relation, 1, strategy, base_threshold);
        if score >= threshold {
            proposals.push(ProposedMapping {
                source_id: source_id.to_string(),
                destination_id: destination_id.to_string(),
                match_score: score,
                found_via: spouse_relation.into(),
                found_in_family_id: destination_family.id.clone(),
                found_from_person_id: from_person_id.to_string(),
            });
        }
    }

    // ── Children: greedy over the family-context matrix ──────────────
    let child_relation = orientation.child_relation();
    let free_source: Vec<&str> = source_family
        .children_ids
        .iter()
        .map(String::as_str)
        .filter(|c| !mappings.contains_source(c))
        .collect();
    let free_destination: Vec<&str> = destination_family
        .children_ids
        .iter()
        .map(String::as_str)
        .filter(|c| !mappings.targets_destination(c))
        .collect();
    if free_source.is_empty() || free_destination.is_empty() {
        return proposals;
    }

    let candidate_count = free_source.len().min(free_destination.len());
    let threshold =
        admission_threshold(child_relation, candidate_count, strategy, base_threshold);

    let mut cells: Vec<(u8, usize, usize)> = Vec::new();
    for (si, source_id) in free_source.iter().enumerate() {
        let Some(source) = source_tree.person(source_id) else {
            continue;
        };
        let source_order = source_family.child_index(source_id);
        for (di, destination_id) in free_destination.iter().enumerate() {
            let Some(destination) = destination_tree.person(destination_id) else {
                continue;
            };
            let destination_order = destination_family.child_index(destination_id);
            let score =
                child_pair_score(source, destination, source_order, destination_order, scorer);
            if score > 0 {
                cells.push((score, si, di));
            }
        }
    }
    // Descending by score; ties resolved by (source index, destination
    // index) ascending for deterministic output.
    cells.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut source_taken = vec![false; free_source.len()];
    let mut destination_taken = vec![false; free_destination.len()];
    for (score, si, di) in cells {
        if source_taken[si] || destination_taken[di] || score < threshold {
            continue;
        }
        source_taken[si] = true;
        destination_taken[di] = true;
        proposals.push(ProposedMapping {
            source_id: free_source[si].to_string(),
            destination_id: free_destination[di].to_string(),
            match_score: score,
            found_via: child_relation.into(),
            found_in_family_id: destination_family.id.clone(),
            found_from_person_id: from_person_id.to_string(),
        });
    }

    proposals
}

const CHILD_BASE: f64 = 15.0;
const NAME_FACTOR: f64 = 0.6;

/// Family-context child score: a reduced scoring rule for pairing children
/// under a matched parent pair. Emphasizes names, birth-year proximity, and
/// birth order; a definitive gender disagreement zeroes the pair.
fn child_pair_score(
    source: &Person,
    destination: &Person,
    source_order: Option<usize>,
    destination_order: Option<usize>,
    scorer: &PersonScorer,
) -> u8 {
    if source.gender != Gender::Unknown
        && destination.gender != Gender::Unknown
        && source.gender != destination.gender
    {
        return 0;
    }

    let mut score = CHILD_BASE + NAME_FACTOR * scorer.name_score_percent(source, destination);

    if let (Some(sy), Some(dy)) = (source.birth_year(), destination.birth_year()) {
        score += match (sy - dy).unsigned_abs() {
            0 => 15.0,
            1 | 2 => 10.0,
            3..=5 => 5.0,
            _ => 0.0,
        };
    }
    if let (Some(so), Some(dor)) = (source_order, destination_order) {
        score += match so.abs_diff(dor) {
            0 => 10.0,
            1 => 5.0,
            _ => 0.0,
        };
    }

    score.min(100.0).round() as u8
}
