//! SQL rendering of the case status decision table.
//!
//! The rendered `CASE` expression is a mechanical translation of
//! [`STATUS_RULES`]; nothing about the rules is restated here. Each atom
//! coalesces `NULL` away so the expression is two-valued, matching the
//! in-process evaluation exactly:
//!
//! | Condition              | SQL                                               |
//! |------------------------|---------------------------------------------------|
//! | `IdPresent(f)`         | `COALESCE(a.f, 0) <> 0`                           |
//! | `IdAbsent(f)`          | `COALESCE(a.f, 0) = 0`                            |
//! | `IdIn(f, set)`         | `COALESCE(a.f, 0) IN (..)`                        |
//! | `TextPresent(f)`       | `COALESCE(BTRIM(a.f, <blank>), '') <> ''`         |
//! | `TextAbsent(f)`        | `COALESCE(BTRIM(a.f, <blank>), '') = ''`          |
//! | `DaysSinceAtLeast(f,n)`| `(a.f IS NOT NULL AND (today - a.f) >= n)`        |
//! | `DaysSinceBelow(f,n)`  | `(a.f IS NOT NULL AND (today - a.f) < n)`         |
//!
//! `DATE - DATE` in PostgreSQL yields whole days as an integer, which is the
//! same arithmetic [`compute_status`](claimtrack_core::status_engine::compute_status)
//! performs. `<blank>` is [`blank_chars_sql`], the SQL spelling of
//! [`BLANK_CHARS`].

use std::sync::OnceLock;

use claimtrack_core::case_status::CaseStatus;
use claimtrack_core::presence::BLANK_CHARS;
use claimtrack_core::status_rules::{
    Condition, DateField, IdField, TextField, FALLBACK_STATUS, STATUS_RULES,
};

/// Table alias under which `warranty_work` columns are joined.
pub const WARRANTY_ALIAS: &str = "ww";

/// SQL for "today" in production queries.
pub const TODAY_CURRENT_DATE: &str = "CURRENT_DATE";

fn id_column(field: IdField) -> &'static str {
    match field {
        IdField::NotificationSummary => "notification_summary_id",
        IdField::ResponseSummary => "response_summary_id",
        IdField::DecisionSummary => "decision_summary_id",
    }
}

fn text_column(field: TextField) -> &'static str {
    match field {
        TextField::CompletionActNumber => "work_completion_act_number",
        TextField::ClaimActNumber => "claim_act_number",
        TextField::ReNotificationNumber => "re_notification_number",
    }
}

fn date_column(field: DateField) -> &'static str {
    match field {
        DateField::NotificationDate => "notification_date",
        DateField::ReNotificationDate => "re_notification_date",
    }
}

/// [`BLANK_CHARS`] as a PostgreSQL escape-string literal for `BTRIM`.
pub fn blank_chars_sql() -> &'static str {
    static SQL: OnceLock<String> = OnceLock::new();
    SQL.get_or_init(|| {
        let escaped: String = BLANK_CHARS
            .iter()
            .map(|c| match c {
                '\t' => "\\t".to_string(),
                '\n' => "\\n".to_string(),
                '\r' => "\\r".to_string(),
                '\\' => "\\\\".to_string(),
                '\'' => "\\'".to_string(),
                other => other.to_string(),
            })
            .collect();
        format!("E'{escaped}'")
    })
}

/// Quote a string as a SQL literal.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn join(parts: &[Condition], op: &str, alias: &str, today: &str) -> String {
    let rendered: Vec<String> = parts
        .iter()
        .map(|c| render_condition(c, alias, today))
        .collect();
    format!("({})", rendered.join(op))
}

/// Render one condition against columns of `alias`.
pub fn render_condition(condition: &Condition, alias: &str, today: &str) -> String {
    match *condition {
        Condition::IdPresent(f) => format!("COALESCE({alias}.{}, 0) <> 0", id_column(f)),
        Condition::IdAbsent(f) => format!("COALESCE({alias}.{}, 0) = 0", id_column(f)),
        Condition::IdIn(f, set) => {
            let values: Vec<String> = set.iter().map(ToString::to_string).collect();
            format!("COALESCE({alias}.{}, 0) IN ({})", id_column(f), values.join(", "))
        }
        Condition::TextPresent(f) => format!(
            "COALESCE(BTRIM({alias}.{}, {}), '') <> ''",
            text_column(f),
            blank_chars_sql()
        ),
        Condition::TextAbsent(f) => format!(
            "COALESCE(BTRIM({alias}.{}, {}), '') = ''",
            text_column(f),
            blank_chars_sql()
        ),
        Condition::DaysSinceAtLeast(f, n) => {
            let col = date_column(f);
            format!("({alias}.{col} IS NOT NULL AND ({today} - {alias}.{col}) >= {n})")
        }
        Condition::DaysSinceBelow(f, n) => {
            let col = date_column(f);
            format!("({alias}.{col} IS NOT NULL AND ({today} - {alias}.{col}) < {n})")
        }
        Condition::All(parts) => join(parts, " AND ", alias, today),
        Condition::Any(parts) => join(parts, " OR ", alias, today),
    }
}

/// Render the full status `CASE` expression.
///
/// `today` is spliced verbatim; pass [`TODAY_CURRENT_DATE`] or a bind
/// placeholder such as `$1::date`.
pub fn render_status_case(alias: &str, today: &str) -> String {
    let mut sql = String::from("CASE");
    for rule in STATUS_RULES {
        sql.push_str(" WHEN ");
        sql.push_str(&render_condition(&rule.condition, alias, today));
        sql.push_str(" THEN ");
        sql.push_str(&quote_literal(rule.status.as_label()));
    }
    sql.push_str(" ELSE ");
    sql.push_str(&quote_literal(FALLBACK_STATUS.as_label()));
    sql.push_str(" END");
    sql
}

/// The production status expression over [`WARRANTY_ALIAS`] as of
/// `CURRENT_DATE`, rendered once.
pub fn status_sql() -> &'static str {
    static SQL: OnceLock<String> = OnceLock::new();
    SQL.get_or_init(|| render_status_case(WARRANTY_ALIAS, TODAY_CURRENT_DATE))
}

/// Labels bound to a `text[]` parameter for `status = ANY(..)` filtering.
pub fn status_labels(statuses: &[CaseStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_label().to_string()).collect()
}
