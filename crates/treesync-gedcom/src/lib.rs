//! GEDCOM import for TreeSync.
//!
//! Wraps the [`ged_io`] crate to convert GEDCOM 5.5.1 text into the
//! normalized [`treesync_core::Tree`] the comparison engine consumes:
//! cross-references resolved, relationship sets derived from FAMS/FAMC
//! structure, date phrases parsed, genders normalized.

mod dates;
mod import;

pub use dates::parse_date_phrase;
pub use import::import_tree;

use treesync_core::Tree;

/// A tree loaded from a GEDCOM file, together with the non-fatal anomalies
/// collected on the way.
#[derive(Debug)]
pub struct LoadedTree {
    pub tree: Tree,
    /// Warnings collected during import (non-fatal issues).
    pub warnings: Vec<String>,
}
