//! Mapping validation against biographical invariants.
//!
//! Never unwinds: every check produces an accept/reject verdict plus the
//! issues to attach. High-severity issues reject the proposed mapping;
//! medium and low issues travel with the result.

use treesync_core::{Gender, IssueKind, Severity, Tree, ValidationIssue};

use crate::member::ProposedMapping;
use crate::result::MappingSet;

/// Birth/death year difference beyond which a mapping is rejected.
const YEAR_DIFF_REJECT: u32 = 15;
/// Birth/death year difference beyond which a mapping is flagged.
const YEAR_DIFF_FLAG: u32 = 5;
/// Scores below this are accepted but flagged.
const LOW_SCORE_FLOOR: u8 = 40;

/// The validator's decision on a proposed mapping.
#[derive(Debug)]
pub struct Verdict {
    pub accepted: bool,
    pub issues: Vec<ValidationIssue>,
}

/// Check a proposed mapping against the invariants.
pub fn check(
    proposal: &ProposedMapping,
    mappings: &MappingSet,
    source_tree: &Tree,
    destination_tree: &Tree,
) -> Verdict {
    let mut issues = Vec::new();
    let mut accepted = true;

    let source = source_tree.person(&proposal.source_id);
    let destination = destination_tree.person(&proposal.destination_id);

    // ── Duplicate destination ────────────────────────────────────────
    if mappings.targets_destination(&proposal.destination_id) {
        issues.push(issue(
            proposal,
            Severity::High,
            IssueKind::DuplicateMapping,
            format!(
                "destination {} already targeted by {}",
                proposal.destination_id,
                mappings
                    .source_of(&proposal.destination_id)
                    .unwrap_or("another source"),
            ),
        ));
        accepted = false;
    }

    if let (Some(source), Some(destination)) = (source, destination) {
        // ── Gender ───────────────────────────────────────────────────
        if source.gender != Gender::Unknown
            && destination.gender != Gender::Unknown
            && source.gender != destination.gender
        {
            issues.push(issue(
                proposal,
                Severity::High,
                IssueKind::GenderMismatch,
                format!(
                    "gender {} does not match {}",
                    source.gender, destination.gender
                ),
            ));
            accepted = false;
        }

        // ── Birth / death years ──────────────────────────────────────
        for (kind, src_year, dst_year) in [
            (
                IssueKind::BirthYearMismatch,
                source.birth_year(),
                destination.birth_year(),
            ),
            (
                IssueKind::DeathYearMismatch,
                source.death_year(),
                destination.death_year(),
            ),
        ] {
            let (Some(sy), Some(dy)) = (src_year, dst_year) else {
                continue;
            };
            let delta = (sy - dy).unsigned_abs();
            if delta > YEAR_DIFF_REJECT {
                issues.push(issue(
                    proposal,
                    Severity::High,
                    kind,
                    format!("{kind}: {sy} vs {dy}"),
                ));
                accepted = false;
            } else if delta > YEAR_DIFF_FLAG {
                issues.push(issue(
                    proposal,
                    Severity::Medium,
                    kind,
                    format!("{kind}: {sy} vs {dy}"),
                ));
            }
        }

        // ── Family consistency ───────────────────────────────────────
        // A mapped father whose image disagrees with the destination's
        // recorded father is suspicious but not fatal; later waves can
        // repair the structure around it.
        if let (Some(src_father), Some(dst_father)) =
            (source.father_id.as_deref(), destination.father_id.as_deref())
            && let Some(father_image) = mappings.destination_of(src_father)
            && father_image != dst_father
        {
            issues.push(issue(
                proposal,
                Severity::Medium,
                IssueKind::FamilyInconsistency,
                format!(
                    "mapped father {src_father} corresponds to {father_image}, \
                     destination records father {dst_father}"
                ),
            ));
        }
    }

    // ── Score floor ──────────────────────────────────────────────────
    if proposal.match_score < LOW_SCORE_FLOOR {
        issues.push(issue(
            proposal,
            Severity::Medium,
            IssueKind::LowScore,
            format!("match score {} below {LOW_SCORE_FLOOR}", proposal.match_score),
        ));
    }

    Verdict { accepted, issues }
}

fn issue(
    proposal: &ProposedMapping,
    severity: Severity,
    kind: IssueKind,
    message: String,
) -> ValidationIssue {
    ValidationIssue::new(severity, kind, message)
        .with_pair(&proposal.source_id, &proposal.destination_id)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use treesync_core::{DateInfo, Person};

    use super::*;
    use crate::result::{FoundVia, PersonMapping};

    fn person(id: &str, gender: Gender, birth: Option<i32>) -> Person {
        let mut p = Person::new(id);
        p.gender = gender;
        p.birth_date = birth.map(DateInfo::year);
        p
    }

    fn tree(persons: Vec<Person>) -> Tree {
        Tree::build(
            persons.into_iter().map(|p| (p.id.clone(), p)).collect(),
            BTreeMap::new(),
        )
    }

    fn proposal(src: &str, dst: &str, score: u8) -> ProposedMapping {
        ProposedMapping {
            source_id: src.to_string(),
            destination_id: dst.to_string(),
            match_score: score,
            found_via: FoundVia::Spouse,
            found_in_family_id: "D1".to_string(),
            found_from_person_id: "sH".to_string(),
        }
    }

    #[test]
    fn test_gender_mismatch_rejects() {
        let src = tree(vec![person("s1", Gender::Male, None)]);
        let dst = tree(vec![person("d1", Gender::Female, None)]);
        let verdict = check(&proposal("s1", "d1", 80), &MappingSet::new(), &src, &dst);
        assert!(!verdict.accepted);
        assert_eq!(verdict.issues[0].kind, IssueKind::GenderMismatch);
        assert_eq!(verdict.issues[0].severity, Severity::High);
    }

    #[test]
    fn test_unknown_gender_accepted() {
        let src = tree(vec![person("s1", Gender::Male, None)]);
        let dst = tree(vec![person("d1", Gender::Unknown, None)]);
        let verdict = check(&proposal("s1", "d1", 80), &MappingSet::new(), &src, &dst);
        assert!(verdict.accepted);
        assert!(verdict.issues.is_empty());
    }

    #[test]
    fn test_birth_year_ladder() {
        let src = tree(vec![person("s1", Gender::Unknown, Some(1900))]);

        let dst = tree(vec![person("d1", Gender::Unknown, Some(1920))]);
        let verdict = check(&proposal("s1", "d1", 80), &MappingSet::new(), &src, &dst);
        assert!(!verdict.accepted, "delta 20 must reject");

        let dst = tree(vec![person("d1", Gender::Unknown, Some(1908))]);
        let verdict = check(&proposal("s1", "d1", 80), &MappingSet::new(), &src, &dst);
        assert!(verdict.accepted, "delta 8 is kept");
        assert_eq!(verdict.issues[0].kind, IssueKind::BirthYearMismatch);
        assert_eq!(verdict.issues[0].severity, Severity::Medium);

        let dst = tree(vec![person("d1", Gender::Unknown, Some(1903))]);
        let verdict = check(&proposal("s1", "d1", 80), &MappingSet::new(), &src, &dst);
        assert!(verdict.accepted);
        assert!(verdict.issues.is_empty(), "delta 3 is clean");
    }

    #[test]
    fn test_duplicate_destination_rejects() {
        let src = tree(vec![
            person("s1", Gender::Unknown, None),
            person("s2", Gender::Unknown, None),
        ]);
        let dst = tree(vec![person("d1", Gender::Unknown, None)]);
        let mut set = MappingSet::new();
        set.insert(PersonMapping {
            source_id: "s1".to_string(),
            destination_id: "d1".to_string(),
            match_score: 100,
            level: 0,
            found_via: FoundVia::Anchor,
            found_in_family_id: None,
            found_from_person_id: None,
            found_at: Utc::now(),
        });

        let verdict = check(&proposal("s2", "d1", 80), &set, &src, &dst);
        assert!(!verdict.accepted);
        assert_eq!(verdict.issues[0].kind, IssueKind::DuplicateMapping);
    }

    #[test]
    fn test_family_inconsistency_kept() {
        let mut s1 = person("s1", Gender::Unknown, None);
        s1.father_id = Some("sF".to_string());
        let mut d1 = person("d1", Gender::Unknown, None);
        d1.father_id = Some("dOther".to_string());
        let src = tree(vec![s1, person("sF", Gender::Male, None)]);
        let dst = tree(vec![
            d1,
            person("dF", Gender::Male, None),
            person("dOther", Gender::Male, None),
        ]);
        let mut set = MappingSet::new();
        set.insert(PersonMapping {
            source_id: "sF".to_string(),
            destination_id: "dF".to_string(),
            match_score: 100,
            level: 0,
            found_via: FoundVia::Anchor,
            found_in_family_id: None,
            found_from_person_id: None,
            found_at: Utc::now(),
        });

        let verdict = check(&proposal("s1", "d1", 80), &set, &src, &dst);
        assert!(verdict.accepted);
        assert_eq!(verdict.issues[0].kind, IssueKind::FamilyInconsistency);
        assert_eq!(verdict.issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_low_score_flagged_not_rejected() {
        let src = tree(vec![person("s1", Gender::Unknown, None)]);
        let dst = tree(vec![person("d1", Gender::Unknown, None)]);
        let verdict = check(&proposal("s1", "d1", 35), &MappingSet::new(), &src, &dst);
        assert!(verdict.accepted);
        assert_eq!(verdict.issues[0].kind, IssueKind::LowScore);
    }
}
