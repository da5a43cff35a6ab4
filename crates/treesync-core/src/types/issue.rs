use serde::{Deserialize, Serialize};

use crate::enums::{IssueKind, Severity};

/// A non-fatal problem found while indexing a tree or validating a proposed
/// mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            source_id: None,
            destination_id: None,
            message: message.into(),
        }
    }

    /// Attach the source/destination pair the issue refers to.
    pub fn with_pair(
        mut self,
        source_id: impl Into<String>,
        destination_id: impl Into<String>,
    ) -> Self {
        self.source_id = Some(source_id.into());
        self.destination_id = Some(destination_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_pair() {
        let issue = ValidationIssue::new(
            Severity::High,
            IssueKind::GenderMismatch,
            "genders disagree",
        )
        .with_pair("I1", "X1");
        assert_eq!(issue.source_id.as_deref(), Some("I1"));
        assert_eq!(issue.destination_id.as_deref(), Some("X1"));
    }

    #[test]
    fn test_serde_shape() {
        let issue =
            ValidationIssue::new(Severity::Medium, IssueKind::LowScore, "score below 40");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains(r#""severity":"Medium""#), "json: {json}");
        assert!(json.contains(r#""kind":"LowScore""#), "json: {json}");
        assert!(!json.contains("sourceId"), "json: {json}");
    }
}
