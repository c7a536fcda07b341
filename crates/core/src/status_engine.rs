//! In-process evaluation of the status decision table.
//!
//! [`compute_status`] is a total, pure function: the same input and the same
//! `today` always give the same [`CaseStatus`]. The storage layer renders
//! [`STATUS_RULES`] into SQL for server-side filtering, so any change here
//! must go through the table rather than around it.
//!
//! Callers pass the database's `CURRENT_DATE` as `today`, the same date the
//! SQL rendering evaluates against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::case_status::CaseStatus;
use crate::presence::{id_present, text_present};
use crate::status_rules::{
    Condition, DateField, IdField, StatusRule, TextField, FALLBACK_STATUS, STATUS_RULES,
};
use crate::types::DbId;

/// Read-only projection of a warranty-work record: the eight fields the
/// status depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyStatusInput {
    pub notification_summary_id: Option<DbId>,
    pub response_summary_id: Option<DbId>,
    pub decision_summary_id: Option<DbId>,
    pub work_completion_act_number: Option<String>,
    pub claim_act_number: Option<String>,
    pub re_notification_number: Option<String>,
    pub re_notification_date: Option<NaiveDate>,
    pub notification_date: Option<NaiveDate>,
}

impl WarrantyStatusInput {
    fn id(&self, field: IdField) -> Option<DbId> {
        match field {
            IdField::NotificationSummary => self.notification_summary_id,
            IdField::ResponseSummary => self.response_summary_id,
            IdField::DecisionSummary => self.decision_summary_id,
        }
    }

    fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::CompletionActNumber => self.work_completion_act_number.as_deref(),
            TextField::ClaimActNumber => self.claim_act_number.as_deref(),
            TextField::ReNotificationNumber => self.re_notification_number.as_deref(),
        }
    }

    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::NotificationDate => self.notification_date,
            DateField::ReNotificationDate => self.re_notification_date,
        }
    }
}

/// Values derived once per evaluation.
struct Facts<'a> {
    input: &'a WarrantyStatusInput,
    days_since_notification: Option<i64>,
    days_since_re_notification: Option<i64>,
}

impl<'a> Facts<'a> {
    fn new(input: &'a WarrantyStatusInput, today: NaiveDate) -> Self {
        let days_since = |d: Option<NaiveDate>| d.map(|d| (today - d).num_days());
        Self {
            input,
            days_since_notification: days_since(input.date(DateField::NotificationDate)),
            days_since_re_notification: days_since(input.date(DateField::ReNotificationDate)),
        }
    }

    fn days_since(&self, field: DateField) -> Option<i64> {
        match field {
            DateField::NotificationDate => self.days_since_notification,
            DateField::ReNotificationDate => self.days_since_re_notification,
        }
    }

    fn holds(&self, condition: &Condition) -> bool {
        match *condition {
            Condition::IdPresent(f) => id_present(self.input.id(f)),
            Condition::IdAbsent(f) => !id_present(self.input.id(f)),
            Condition::IdIn(f, set) => self.input.id(f).is_some_and(|v| set.contains(&v)),
            Condition::TextPresent(f) => text_present(self.input.text(f)),
            Condition::TextAbsent(f) => !text_present(self.input.text(f)),
            Condition::DaysSinceAtLeast(f, n) => self.days_since(f).is_some_and(|d| d >= n),
            Condition::DaysSinceBelow(f, n) => self.days_since(f).is_some_and(|d| d < n),
            Condition::All(parts) => parts.iter().all(|c| self.holds(c)),
            Condition::Any(parts) => parts.iter().any(|c| self.holds(c)),
        }
    }
}

/// Return the first rule whose condition holds, or `None` when the input
/// falls through to [`FALLBACK_STATUS`].
pub fn matching_rule(input: &WarrantyStatusInput, today: NaiveDate) -> Option<&'static StatusRule> {
    let facts = Facts::new(input, today);
    STATUS_RULES.iter().find(|rule| facts.holds(&rule.condition))
}

/// Compute the lifecycle status of a warranty-work snapshot as of `today`.
pub fn compute_status(input: &WarrantyStatusInput, today: NaiveDate) -> CaseStatus {
    matching_rule(input, today).map_or(FALLBACK_STATUS, |rule| rule.status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
