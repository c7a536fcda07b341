//! Case filter validation and normalization.
//!
//! The storage layer ignores `0` ids and blank strings (see
//! [`crate::presence`]); this module handles the parts of a filter that need
//! parsing or cross-field checks before a query is built.

use crate::case_status::CaseStatus;
use crate::error::CoreError;
use crate::presence::trim_blank;
use crate::types::{Date, DbId};

/// Separator for list-valued query parameters (`?status=a,b`).
pub const LIST_SEPARATOR: char = ',';

/// Split a list-valued query parameter, trimming items and dropping blanks.
pub fn split_list_param(raw: &str) -> Vec<&str> {
    raw.split(LIST_SEPARATOR)
        .map(trim_blank)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a list-valued id filter (`?supplier_id=3,7`).
///
/// `0` entries mean "unset" and are dropped, as are blanks and repeats. An
/// entry that is not an integer is a validation error naming `param`.
pub fn parse_id_list(param: &str, raw: &str) -> Result<Vec<DbId>, CoreError> {
    let mut ids = Vec::new();
    for item in split_list_param(raw) {
        let id: DbId = item.parse().map_err(|_| {
            CoreError::Validation(format!("{param}: '{item}' is not a valid id"))
        })?;
        if id != 0 && !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Parse a list-valued text filter, dropping blank entries and repeats.
pub fn parse_text_list(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for item in split_list_param(raw) {
        if !values.iter().any(|v| v == item) {
            values.push(item.to_string());
        }
    }
    values
}

/// Parse requested status labels into a de-duplicated list.
///
/// Blank entries are skipped. An unknown label is a validation error rather
/// than a silently empty result. Returns an empty list when nothing usable
/// was requested, which callers treat as "no status filter".
pub fn parse_status_filter<S: AsRef<str>>(labels: &[S]) -> Result<Vec<CaseStatus>, CoreError> {
    let mut statuses = Vec::with_capacity(labels.len());
    for label in labels {
        let label = trim_blank(label.as_ref());
        if label.is_empty() {
            continue;
        }
        let status = CaseStatus::from_label(label).map_err(CoreError::Validation)?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

/// Reject a fault-date range whose start is after its end.
pub fn validate_date_range(from: Option<Date>, to: Option<Date>) -> Result<(), CoreError> {
    match (from, to) {
        (Some(f), Some(t)) if f > t => Err(CoreError::Validation(format!(
            "date_from ({f}) must not be after date_to ({t})"
        ))),
        _ => Ok(()),
    }
}
