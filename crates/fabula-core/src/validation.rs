use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::build_reference_graph_report;
use crate::locale::{LocaleStore, LocaleValue};
use crate::reference::{references, resolve_target};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with location and hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
    pub hint: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            hint,
        }
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }
}

/// Check a locale store before it is used for resolution.
///
/// This checks:
/// - lists (and inner lists) are non-empty
/// - every `#{...}` reference resolves in `store` or `fallback`
/// - references within `store` do not form a cycle
///
/// Empty strings are reported as warnings.
pub fn validate_locale(
    store: &LocaleStore,
    fallback: Option<&LocaleStore>,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    let mut stores = vec![store];
    if let Some(fallback) = fallback {
        stores.push(fallback);
    }

    for (path, value) in store.leaves() {
        check_shape(&path, value, &mut report);

        for text in value.strings() {
            if text.is_empty() {
                report.push_warning(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "empty_value",
                    path.clone(),
                    "value resolves to an empty string",
                    None,
                ));
            }
            for token in references(text)? {
                if resolve_target(&token, &path, &stores).is_none() {
                    report.push_error(ValidationIssue::new(
                        IssueSeverity::Error,
                        "dangling_reference",
                        path.clone(),
                        format!("reference {} does not resolve", token.text),
                        Some("add the referenced key or fix the token".to_string()),
                    ));
                }
            }
        }
    }

    let graph = build_reference_graph_report(store)?;
    if let Some(cycle) = graph.cycle {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "reference_cycle",
            cycle.first().cloned().unwrap_or_default(),
            format!("references form a cycle through: {}", cycle.join(", ")),
            Some("break the loop so expansion terminates".to_string()),
        ));
    }

    Ok(report)
}

fn check_shape(path: &str, value: &LocaleValue, report: &mut ValidationReport) {
    let empty = match value {
        LocaleValue::List(values) => values.is_empty(),
        LocaleValue::ListOfLists(lists) => {
            lists.is_empty() || lists.iter().any(|values| values.is_empty())
        }
        LocaleValue::Scalar(_) | LocaleValue::Node(_) => false,
    };
    if empty {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "empty_list",
            path,
            format!("{} has nothing to choose from", value.kind()),
            None,
        ));
    }
}
