//! Core contracts for Fabula.
//!
//! This crate defines the locale data model, the reference-token grammar,
//! and static checks over locale stores shared by the generator and the CLI.

pub mod error;
pub mod graph;
pub mod locale;
pub mod reference;
pub mod validation;

pub use error::{Error, Result};
pub use graph::{ReferenceGraphReport, ReferenceGraphSummary, build_reference_graph_report};
pub use locale::{LocaleStore, LocaleValue};
pub use reference::{
    ReferenceToken, candidate_paths, find_reference, namespace_of, references, resolve_target,
};
pub use validation::{IssueSeverity, ValidationIssue, ValidationReport, validate_locale};

/// Separator between segments of a locale key path.
pub const PATH_SEPARATOR: char = '.';
