//! GEDCOM → TreeSync domain model import.
//!
//! Parses a GEDCOM string and converts it into a normalized [`Tree`].
//! Cross-references between records are resolved to person/family ids;
//! father/mother/spouse/sibling links are derived from HUSB/WIFE/CHIL
//! structure so that the comparison engine never has to walk raw GEDCOM
//! relations.

use std::collections::{BTreeMap, HashSet};

use ged_io::GedcomBuilder;
use ged_io::types::event::Event as GedEvent;
use tracing::info;

use treesync_core::{Family, Gender, Person, Tree, TreeSyncError};

use crate::dates::parse_date_phrase;
use crate::LoadedTree;

/// Import a GEDCOM string into a [`LoadedTree`].
///
/// # Errors
///
/// Returns [`TreeSyncError::Gedcom`] if the GEDCOM string cannot be parsed.
/// Structural anomalies (dangling references, role/gender disagreements)
/// are collected as warnings, not errors.
pub fn import_tree(gedcom_str: &str) -> Result<LoadedTree, TreeSyncError> {
    let data = GedcomBuilder::new()
        .build_from_str(gedcom_str)
        .map_err(|e| TreeSyncError::Gedcom(e.to_string()))?;

    let mut warnings = Vec::new();

    let person_ids: HashSet<&str> = data
        .individuals
        .iter()
        .filter_map(|indi| indi.xref.as_deref())
        .collect();

    // ── Families ────────────────────────────────────────────────────
    let mut families: BTreeMap<String, Family> = BTreeMap::new();
    for fam in &data.families {
        let Some(xref) = fam.xref.as_deref() else {
            warnings.push("Skipping family without xref".to_string());
            continue;
        };
        let mut family = Family::new(xref);

        if let Some(husb) = fam.individual1.as_deref() {
            if person_ids.contains(husb) {
                family.husband_id = Some(husb.to_string());
            } else {
                warnings.push(format!("Family {xref}: HUSB {husb} not found"));
            }
        }
        if let Some(wife) = fam.individual2.as_deref() {
            if person_ids.contains(wife) {
                family.wife_id = Some(wife.to_string());
            } else {
                warnings.push(format!("Family {xref}: WIFE {wife} not found"));
            }
        }
        for child in &fam.children {
            if person_ids.contains(child.as_str()) {
                family.children_ids.push(child.clone());
            } else {
                warnings.push(format!("Family {xref}: CHIL {child} not found"));
            }
        }

        // Some GEDCOM files put family events in the family_event field.
        for detail in fam.events.iter().chain(fam.family_event.iter()) {
            let date = detail
                .date
                .as_ref()
                .and_then(|d| d.value.as_deref())
                .and_then(parse_date_phrase);
            let place = detail.place.as_ref().and_then(|p| p.value.clone());
            match detail.event {
                GedEvent::Marriage => {
                    family.marriage_date = date;
                    family.marriage_place = place;
                }
                GedEvent::Divorce => {
                    family.divorce_date = date;
                }
                _ => {}
            }
        }

        families.insert(family.id.clone(), family);
    }

    // ── Individuals ─────────────────────────────────────────────────
    let mut persons: BTreeMap<String, Person> = BTreeMap::new();
    for indi in &data.individuals {
        let Some(xref) = indi.xref.as_deref() else {
            warnings.push("Skipping individual without xref".to_string());
            continue;
        };
        let mut person = Person::new(xref);

        if let Some(ref name) = indi.name {
            if let Some(given) = name.given.as_deref() {
                let mut tokens = given.split_whitespace();
                person.first_name = tokens.next().map(String::from);
                let middle = tokens.collect::<Vec<_>>().join(" ");
                if !middle.is_empty() {
                    person.middle_name = Some(middle);
                }
            }
            person.last_name = name.surname.clone();
            person.nickname = name.nickname.clone();
            person.suffix = name.suffix.clone();
        }

        person.gender = indi
            .sex
            .as_ref()
            .map(|g| convert_gender(&g.value))
            .unwrap_or(Gender::Unknown);

        for detail in &indi.events {
            let date = detail
                .date
                .as_ref()
                .and_then(|d| d.value.as_deref())
                .and_then(parse_date_phrase);
            let place = detail.place.as_ref().and_then(|p| p.value.clone());
            match detail.event {
                GedEvent::Birth => {
                    person.birth_date = date;
                    person.birth_place = place;
                }
                GedEvent::Death => {
                    person.death_date = date;
                    person.death_place = place;
                }
                GedEvent::Burial => {
                    person.burial_date = date;
                    person.burial_place = place;
                }
                _ => {}
            }
        }

        for mm in &indi.multimedia {
            if let Some(ref file) = mm.file
                && let Some(ref path) = file.value
                && !path.is_empty()
            {
                person.photo_urls.push(path.clone());
            }
        }

        persons.insert(person.id.clone(), person);
    }

    // ── Derived relationship links ──────────────────────────────────
    for family in families.values() {
        if let (Some(husband), Some(wife)) =
            (family.husband_id.as_deref(), family.wife_id.as_deref())
        {
            if let Some(p) = persons.get_mut(husband) {
                p.spouse_ids.insert(wife.to_string());
            }
            if let Some(p) = persons.get_mut(wife) {
                p.spouse_ids.insert(husband.to_string());
            }
        }

        for child in &family.children_ids {
            if let Some(p) = persons.get_mut(child) {
                p.father_id = family.husband_id.clone().or(p.father_id.take());
                p.mother_id = family.wife_id.clone().or(p.mother_id.take());
            }
            for parent in [family.husband_id.as_deref(), family.wife_id.as_deref()]
                .into_iter()
                .flatten()
            {
                if let Some(p) = persons.get_mut(parent) {
                    p.children_ids.insert(child.clone());
                }
            }
            for sibling in &family.children_ids {
                if sibling != child
                    && let Some(p) = persons.get_mut(child)
                {
                    p.sibling_ids.insert(sibling.clone());
                }
            }
        }
    }

    // ── Role/gender consistency ─────────────────────────────────────
    // The engine assumes a husband is male-or-unknown and a wife is
    // female-or-unknown; a contradicting SEX line is demoted to unknown.
    for family in families.values() {
        for (spouse, expected) in [
            (family.husband_id.as_deref(), Gender::Male),
            (family.wife_id.as_deref(), Gender::Female),
        ] {
            let Some(id) = spouse else { continue };
            if let Some(p) = persons.get_mut(id)
                && p.gender != Gender::Unknown
                && p.gender != expected
            {
                warnings.push(format!(
                    "Person {id}: recorded gender {} contradicts {} role in family {}",
                    p.gender,
                    expected,
                    family.id
                ));
                p.gender = Gender::Unknown;
            }
        }
    }

    let tree = Tree::build(persons, families);
    info!(
        persons = tree.person_count(),
        families = tree.family_count(),
        warnings = warnings.len(),
        "GEDCOM imported"
    );

    Ok(LoadedTree { tree, warnings })
}

fn convert_gender(g: &ged_io::types::individual::gender::GenderType) -> Gender {
    use ged_io::types::individual::gender::GenderType;
    match g {
        GenderType::Male => Gender::Male,
        GenderType::Female => Gender::Female,
        _ => Gender::Unknown,
    }
}
