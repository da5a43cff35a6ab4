use std::collections::{BTreeMap, HashMap};

use crate::enums::{IssueKind, Relation, Severity};
use crate::types::{Family, Person, ValidationIssue};

/// A fully loaded genealogical tree with reverse indexes.
///
/// Persons and families are keyed by their opaque ids in `BTreeMap`s so that
/// every iteration over them is in id order; the comparison engine relies on
/// this for deterministic candidate enumeration. The reverse indexes are
/// computed once at construction and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Tree {
    persons: BTreeMap<String, Person>,
    families: BTreeMap<String, Family>,
    /// person id → family ids where the person is husband or wife.
    spouse_families: HashMap<String, Vec<String>>,
    /// person id → family ids where the person is a child.
    child_families: HashMap<String, Vec<String>>,
    /// birth year → person ids born that year.
    by_birth_year: BTreeMap<i32, Vec<String>>,
    /// normalized last name → person ids.
    by_surname: BTreeMap<String, Vec<String>>,
    /// Structural anomalies found while indexing (dangling references).
    issues: Vec<ValidationIssue>,
}

impl Tree {
    /// Build a tree and its reverse indexes from loaded persons and families.
    ///
    /// Runs in linear time in the number of persons plus family-role
    /// references. A family referencing a person id absent from the person
    /// map contributes no index edge; a medium-severity
    /// `FamilyInconsistency` issue is recorded instead.
    pub fn build(
        persons: BTreeMap<String, Person>,
        families: BTreeMap<String, Family>,
    ) -> Self {
        let mut spouse_families: HashMap<String, Vec<String>> = HashMap::new();
        let mut child_families: HashMap<String, Vec<String>> = HashMap::new();
        let mut issues = Vec::new();

        // Families iterate in id order, so the per-person family lists come
        // out sorted without an extra pass.
        for (family_id, family) in &families {
            for spouse_id in [family.husband_id.as_deref(), family.wife_id.as_deref()]
                .into_iter()
                .flatten()
            {
                if persons.contains_key(spouse_id) {
                    spouse_families
                        .entry(spouse_id.to_string())
                        .or_default()
                        .push(family_id.clone());
                } else {
                    issues.push(dangling_ref_issue(family_id, spouse_id, "spouse"));
                }
            }
            for child_id in &family.children_ids {
                if persons.contains_key(child_id) {
                    child_families
                        .entry(child_id.clone())
                        .or_default()
                        .push(family_id.clone());
                } else {
                    issues.push(dangling_ref_issue(family_id, child_id, "child"));
                }
            }
        }

        let mut by_birth_year: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        let mut by_surname: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (id, person) in &persons {
            if let Some(year) = person.birth_year() {
                by_birth_year.entry(year).or_default().push(id.clone());
            }
            if let Some(ref surname) = person.last_name {
                let key = surname_key(surname);
                if !key.is_empty() {
                    by_surname.entry(key).or_default().push(id.clone());
                }
            }
        }

        Self {
            persons,
            families,
            spouse_families,
            child_families,
            by_birth_year,
            by_surname,
            issues,
        }
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.get(id)
    }

    /// All persons in id order.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// All families in id order.
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Structural anomalies recorded while indexing.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Families where the person appears as husband or wife, in family id
    /// order. Empty for unknown persons.
    pub fn families_as_spouse(&self, person_id: &str) -> Vec<&Family> {
        self.spouse_families
            .get(person_id)
            .map(|ids| ids.iter().filter_map(|id| self.families.get(id)).collect())
            .unwrap_or_default()
    }

    /// Families where the person appears as a child, in family id order.
    pub fn families_as_child(&self, person_id: &str) -> Vec<&Family> {
        self.child_families
            .get(person_id)
            .map(|ids| ids.iter().filter_map(|id| self.families.get(id)).collect())
            .unwrap_or_default()
    }

    /// Person ids born in the given year, in id order.
    pub fn persons_born_in(&self, year: i32) -> &[String] {
        self.by_birth_year.get(&year).map_or(&[], Vec::as_slice)
    }

    /// Person ids whose last name matches the given surname after key
    /// normalization, in id order.
    pub fn persons_by_surname(&self, surname: &str) -> &[String] {
        self.by_surname
            .get(&surname_key(surname))
            .map_or(&[], Vec::as_slice)
    }

    /// Every immediate relative of a person, de-duplicated, in stable order
    /// by `(relation rank, person id)`.
    pub fn immediate_relatives(&self, person_id: &str) -> Vec<(String, Relation)> {
        let mut relatives: Vec<(String, Relation)> = Vec::new();

        for family in self.families_as_spouse(person_id) {
            if let Some(other) = family.other_spouse(person_id) {
                relatives.push((other.to_string(), Relation::Spouse));
            }
            for child in &family.children_ids {
                relatives.push((child.clone(), Relation::Child));
            }
        }
        for family in self.families_as_child(person_id) {
            for parent in [family.husband_id.as_deref(), family.wife_id.as_deref()]
                .into_iter()
                .flatten()
            {
                relatives.push((parent.to_string(), Relation::Parent));
            }
            for sibling in &family.children_ids {
                if sibling != person_id {
                    relatives.push((sibling.clone(), Relation::Sibling));
                }
            }
        }

        relatives.sort_by(|a, b| (a.1.rank(), &a.0).cmp(&(b.1.rank(), &b.0)));
        relatives.dedup();
        relatives
    }
}

fn dangling_ref_issue(family_id: &str, person_id: &str, role: &str) -> ValidationIssue {
    ValidationIssue::new(
        Severity::Medium,
        IssueKind::FamilyInconsistency,
        format!("family {family_id} references missing {role} {person_id}"),
    )
}

/// Index key for the surname bucket map: lowercase, alphanumeric only.
fn surname_key(surname: &str) -> String {
    surname
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
