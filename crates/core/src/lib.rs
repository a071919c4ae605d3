//! cellar_core - pure logic for the cellar project.
//!
//! Nothing in this crate performs I/O. Records come in as decoded JSON, and
//! everything handed back is a value: filter formulas, search predicates,
//! parsed locations and occupancy indices.

pub mod formula;
pub mod location;
pub mod occupancy;
pub mod record;
pub mod search;
pub mod text;
