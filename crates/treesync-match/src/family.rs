//! Family-to-family matching.
//!
//! Given a source family and candidate destination families, pick the single
//! best-corresponding destination family, or none. Structural evidence (who
//! is already mapped) dominates; personal fuzzy scores of unmapped spouses
//! break in only when structure alone cannot decide.

use treesync_core::{Family, Tree};

use crate::result::{CandidateRejection, FamilyCandidateTrace, MappingSet};
use crate::score::PersonScorer;

const MAPPED_SPOUSE_AGREEMENT: f64 = 50.0;
const SPOUSE_PRESENT_BONUS: f64 = 10.0;
const MAPPED_CHILD_CONTAINED: f64 = 20.0;
/// Below this structural score, a candidate with no positive personal
/// evidence is not worth choosing.
const STRUCTURAL_FLOOR: f64 = 10.0;

/// The chosen destination family and its combined score.
#[derive(Debug, Clone)]
pub struct FamilyMatchOutcome<'t> {
    pub family: &'t Family,
    pub combined_score: f64,
}

/// Pick the best-corresponding destination family among `candidates`.
///
/// Candidates must be supplied in destination family id order; on a combined
/// score tie the first (lowest id) candidate wins. Returns the choice plus a
/// trace of every candidate considered.
pub fn best_family_match<'t>(
    source_family: &Family,
    candidates: &[&'t Family],
    mappings: &MappingSet,
    source_tree: &Tree,
    destination_tree: &Tree,
    scorer: &PersonScorer,
) -> (Option<FamilyMatchOutcome<'t>>, Vec<FamilyCandidateTrace>) {
    let mut traces = Vec::with_capacity(candidates.len());
    let mut best: Option<(usize, f64, Option<u8>, Option<u8>)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let eval = evaluate(
            source_family,
            candidate,
            mappings,
            source_tree,
            destination_tree,
            scorer,
        );
        traces.push(FamilyCandidateTrace {
            destination_family_id: candidate.id.clone(),
            structure_score: eval.structure,
            husband_score: eval.husband,
            wife_score: eval.wife,
            combined_score: eval.combined,
            rejection: eval.rejection.clone(),
        });
        if eval.rejection.is_some() {
            continue;
        }
        let better = match best {
            Some((_, best_combined, _, _)) => eval.combined > best_combined,
            None => true,
        };
        if better {
            best = Some((index, eval.combined, eval.husband, eval.wife));
        }
    }

    let Some((index, combined, husband, wife)) = best else {
        return (None, traces);
    };

    // Pure-structure matches need a minimum of structural agreement.
    let personal_positive =
        husband.is_some_and(|s| s > 0) || wife.is_some_and(|s| s > 0);
    if combined < STRUCTURAL_FLOOR && !personal_positive {
        if let Some(trace) = traces.iter_mut().find(|t| t.destination_family_id == candidates[index].id) {
            trace.rejection = Some(CandidateRejection::BelowFloor);
        }
        return (None, traces);
    }

    (
        Some(FamilyMatchOutcome {
            family: candidates[index],
            combined_score: combined,
        }),
        traces,
    )
}

struct CandidateEval {
    structure: f64,
    husband: Option<u8>,
    wife: Option<u8>,
    combined: f64,
    rejection: Option<CandidateRejection>,
}

fn evaluate(
    source_family: &Family,
    candidate: &Family,
    mappings: &MappingSet,
    source_tree: &Tree,
    destination_tree: &Tree,
    scorer: &PersonScorer,
) -> CandidateEval {
    let mut structure = 0.0;
    let mut husband_score: Option<u8> = None;
    let mut wife_score: Option<u8> = None;

    // ── Husband role ─────────────────────────────────────────────────
    if let Some(src_husband) = source_family.husband_id.as_deref() {
        if let Some(image) = mappings.destination_of(src_husband) {
            match candidate.husband_id.as_deref() {
                Some(dst_husband) if dst_husband == image => {
                    structure += MAPPED_SPOUSE_AGREEMENT;
                }
                Some(_) => {
                    return rejected(structure, CandidateRejection::HusbandConflict);
                }
                None => {}
            }
        } else if let Some(dst_husband) = candidate.husband_id.as_deref() {
            structure += SPOUSE_PRESENT_BONUS;
            husband_score = personal_score(
                src_husband,
                dst_husband,
                source_tree,
                destination_tree,
                scorer,
            );
        }
    }

    // ── Wife role ────────────────────────────────────────────────────
    if let Some(src_wife) = source_family.wife_id.as_deref() {
        if let Some(image) = mappings.destination_of(src_wife) {
            match candidate.wife_id.as_deref() {
                Some(dst_wife) if dst_wife == image => {
                    structure += MAPPED_SPOUSE_AGREEMENT;
                }
                Some(_) => {
                    return rejected(structure, CandidateRejection::WifeConflict);
                }
                None => {}
            }
        } else if let Some(dst_wife) = candidate.wife_id.as_deref() {
            structure += SPOUSE_PRESENT_BONUS;
            wife_score =
                personal_score(src_wife, dst_wife, source_tree, destination_tree, scorer);
        }
    }

    // ── Already-mapped children ──────────────────────────────────────
    for child in &source_family.children_ids {
        let Some(image) = mappings.destination_of(child) else {
            continue;
        };
        if candidate.has_child(image) {
            structure += MAPPED_CHILD_CONTAINED;
        } else if !destination_tree.families_as_child(image).is_empty() {
            // The image belongs to some other destination family.
            return rejected(structure, CandidateRejection::ChildConflict);
        }
    }

    let combined = match (husband_score, wife_score) {
        (Some(h), Some(w)) => 0.4 * structure + 0.3 * f64::from(h) + 0.3 * f64::from(w),
        (Some(s), None) | (None, Some(s)) => 0.4 * structure + 0.6 * f64::from(s),
        (None, None) => structure,
    };

    CandidateEval {
        structure,
        husband: husband_score,
        wife: wife_score,
        combined,
        rejection: None,
    }
}

fn rejected(structure: f64, rejection: CandidateRejection) -> CandidateEval {
    CandidateEval {
        structure,
        husband: None,
        wife: None,
        combined: 0.0,
        rejection: Some(rejection),
    }
}

fn personal_score(
    source_id: &str,
    destination_id: &str,
    source_tree: &Tree,
    destination_tree: &Tree,
    scorer: &PersonScorer,
) -> Option<u8> {
    let source = source_tree.person(source_id)?;
    let destination = destination_tree.person(destination_id)?;
    Some(scorer.score(source, destination).score)
}
