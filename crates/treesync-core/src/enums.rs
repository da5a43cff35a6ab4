//! Domain enums for TreeSync.
//!
//! All enums are closed sets matched exhaustively. Serialized forms use the
//! symbolic variant name (`"Male"`, `"Spouse"`) so that downstream tools can
//! consume comparison documents without a mapping table.

use serde::{Deserialize, Serialize};

/// Gender of a person as recorded in a genealogical source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Returns `true` when two genders do not contradict each other
    /// (either side unknown counts as compatible).
    pub fn compatible_with(self, other: Gender) -> bool {
        self == Gender::Unknown || other == Gender::Unknown || self == other
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Precision of a parsed genealogical date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// Qualifier attached to a genealogical date phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateQualifier {
    Exact,
    About,
    Before,
    After,
    Between,
}

/// How one person relates to another through immediate family structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    Spouse,
    Child,
    Parent,
    Sibling,
}

impl Relation {
    /// Stable ordering rank used when enumerating a person's relatives.
    pub fn rank(self) -> u8 {
        match self {
            Self::Spouse => 0,
            Self::Child => 1,
            Self::Parent => 2,
            Self::Sibling => 3,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spouse => write!(f, "spouse"),
            Self::Child => write!(f, "child"),
            Self::Parent => write!(f, "parent"),
            Self::Sibling => write!(f, "sibling"),
        }
    }
}

/// Severity of a validation issue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Kind of a validation issue raised while indexing a tree or checking a
/// proposed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    GenderMismatch,
    BirthYearMismatch,
    DeathYearMismatch,
    DuplicateMapping,
    FamilyInconsistency,
    LowScore,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GenderMismatch => write!(f, "gender_mismatch"),
            Self::BirthYearMismatch => write!(f, "birth_year_mismatch"),
            Self::DeathYearMismatch => write!(f, "death_year_mismatch"),
            Self::DuplicateMapping => write!(f, "duplicate_mapping"),
            Self::FamilyInconsistency => write!(f, "family_inconsistency"),
            Self::LowScore => write!(f, "low_score"),
        }
    }
}
