use serde::{Deserialize, Serialize};

use crate::types::DateInfo;

/// A family unit linking spouses and children.
///
/// `children_ids` keeps the storage order of the source file, which carries
/// birth order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub husband_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wife_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<DateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divorce_date: Option<DateInfo>,
}

impl Family {
    /// Create an empty family with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if the given person is a spouse of this family.
    pub fn has_spouse(&self, person_id: &str) -> bool {
        self.husband_id.as_deref() == Some(person_id)
            || self.wife_id.as_deref() == Some(person_id)
    }

    /// Returns `true` if the given person is a child of this family.
    pub fn has_child(&self, person_id: &str) -> bool {
        self.children_ids.iter().any(|c| c == person_id)
    }

    /// Position of a child in storage order, if present.
    pub fn child_index(&self, person_id: &str) -> Option<usize> {
        self.children_ids.iter().position(|c| c == person_id)
    }

    /// The other spouse of the family, given one of them.
    pub fn other_spouse(&self, person_id: &str) -> Option<&str> {
        match (self.husband_id.as_deref(), self.wife_id.as_deref()) {
            (Some(h), w) if h == person_id => w,
            (h, Some(w)) if w == person_id => h,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_spouse_and_child() {
        let mut f = Family::new("F1");
        f.husband_id = Some("I1".to_string());
        f.children_ids = vec!["I3".to_string(), "I4".to_string()];
        assert!(f.has_spouse("I1"));
        assert!(!f.has_spouse("I2"));
        assert!(f.has_child("I4"));
        assert_eq!(f.child_index("I4"), Some(1));
        assert_eq!(f.child_index("I9"), None);
    }

    #[test]
    fn test_other_spouse() {
        let mut f = Family::new("F1");
        f.husband_id = Some("I1".to_string());
        f.wife_id = Some("I2".to_string());
        assert_eq!(f.other_spouse("I1"), Some("I2"));
        assert_eq!(f.other_spouse("I2"), Some("I1"));
        assert_eq!(f.other_spouse("I3"), None);
    }
}
