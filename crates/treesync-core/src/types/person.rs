use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::Gender;
use crate::types::DateInfo;

/// A person in a genealogical tree.
///
/// Immutable once loaded. Ids are opaque strings unique within their tree
/// (GEDCOM xrefs in practice). Relationship sets are ordered so that
/// iteration over them is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<DateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burial_date: Option<DateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burial_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub spouse_ids: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub children_ids: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub sibling_ids: BTreeSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub photo_urls: Vec<String>,
    /// Opaque id lifted from a source-specific tag, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_profile_id: Option<String>,
}

impl Person {
    /// Create an empty person with the given id and unknown gender.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gender: Gender::Unknown,
            ..Self::default()
        }
    }

    /// Returns a display-friendly full name.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref first) = self.first_name {
            parts.push(first.as_str());
        }
        if let Some(ref middle) = self.middle_name {
            parts.push(middle.as_str());
        }
        if let Some(ref last) = self.last_name {
            parts.push(last.as_str());
        }
        if let Some(ref suffix) = self.suffix {
            parts.push(suffix.as_str());
        }
        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(" ")
        }
    }

    /// Birth year, when a birth date is known.
    pub fn birth_year(&self) -> Option<i32> {
        self.birth_date.as_ref().map(|d| d.year)
    }

    /// Death year, when a death date is known.
    pub fn death_year(&self) -> Option<i32> {
        self.death_date.as_ref().map(|d| d.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_full() {
        let mut p = Person::new("I1");
        p.first_name = Some("Ivan".to_string());
        p.middle_name = Some("Petrovich".to_string());
        p.last_name = Some("Ivanov".to_string());
        p.suffix = Some("Jr.".to_string());
        assert_eq!(p.display_name(), "Ivan Petrovich Ivanov Jr.");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let p = Person::new("I7");
        assert_eq!(p.display_name(), "I7");
    }

    #[test]
    fn test_birth_year() {
        let mut p = Person::new("I1");
        assert_eq!(p.birth_year(), None);
        p.birth_date = Some(DateInfo::year(1901));
        assert_eq!(p.birth_year(), Some(1901));
    }

    #[test]
    fn test_serde_skips_empty_fields() {
        let p = Person::new("I1");
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("firstName"), "json: {json}");
        assert!(!json.contains("spouseIds"), "json: {json}");
        assert!(json.contains(r#""gender":"Unknown""#), "json: {json}");
    }
}
