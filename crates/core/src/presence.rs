//! Presence conventions shared by the status engine and the filter builder.
//!
//! Across the system an id of `0` means "unset" exactly like `NULL`, and a
//! string that is empty after trimming [`BLANK_CHARS`] means "unset" exactly
//! like `NULL`. The in-process status engine, the SQL mirror, and every write
//! path rely on these rules, so they live in one place.

use crate::types::DbId;

/// Characters stripped from both ends of free text before it is judged blank.
///
/// The SQL mirror passes exactly this set to `BTRIM`. Other Unicode
/// whitespace (e.g. a no-break space) is content on both sides.
pub const BLANK_CHARS: &[char] = &[' ', '\t', '\n', '\r'];

/// Strip [`BLANK_CHARS`] from both ends.
pub fn trim_blank(text: &str) -> &str {
    text.trim_matches(BLANK_CHARS)
}

/// Whether a classification id carries a meaningful value.
pub fn id_present(id: Option<DbId>) -> bool {
    matches!(id, Some(v) if v != 0)
}

/// Whether a document number (or any free-text field) carries a meaningful value.
pub fn text_present(text: Option<&str>) -> bool {
    matches!(text, Some(s) if !trim_blank(s).is_empty())
}

/// Collapse the `0` sentinel into `None`.
pub fn normalize_id(id: Option<DbId>) -> Option<DbId> {
    id.filter(|v| *v != 0)
}

/// Trim free text for storage, collapsing blank strings into `None`.
pub fn normalize_text(text: Option<&str>) -> Option<&str> {
    text.map(trim_blank).filter(|s| !s.is_empty())
}
