//! Core domain types: persons, families, dates, trees, validation issues.

mod date;
mod family;
mod issue;
mod person;
mod tree;

pub use date::DateInfo;
pub use family::Family;
pub use issue::ValidationIssue;
pub use person::Person;
pub use tree::Tree;
