//! Program catalog for Sahayak.
//!
//! Holds the immutable table of government assistance programs and their
//! eligibility rules, loaded atomically from JSON at startup. Read-only after
//! load; shared across all sessions without locking.

pub mod catalog;
pub mod program;

pub use catalog::{Catalog, CatalogError};
pub use program::{EligibilityRules, LocalizedText, ProgramCategory, ProgramDefinition};
