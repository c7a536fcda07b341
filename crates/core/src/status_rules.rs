//! The ordered status decision table.
//!
//! Each [`StatusRule`] pairs a [`Condition`] with the [`CaseStatus`] it
//! yields. Rules are evaluated top to bottom and the first match wins; the
//! fallback is [`CaseStatus::Other`]. Rules deliberately overlap, so neither
//! reorder nor deduplicate them: precedence is the observable behavior.
//!
//! The table is plain data so it can be evaluated in-process (see
//! [`crate::status_engine`]) and rendered as a SQL expression by the storage
//! layer from the very same definition.

use self::Condition::{
    All, Any, DaysSinceAtLeast, DaysSinceBelow, IdAbsent, IdIn, IdPresent, TextAbsent, TextPresent,
};
use self::DateField::{NotificationDate, ReNotificationDate};
use self::IdField::{DecisionSummary, NotificationSummary, ResponseSummary};
use self::TextField::{ClaimActNumber, CompletionActNumber, ReNotificationNumber};
use crate::case_status::CaseStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Classification id fields of a warranty-work record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    NotificationSummary,
    ResponseSummary,
    DecisionSummary,
}

/// Document-number fields whose mere presence signals a stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CompletionActNumber,
    ClaimActNumber,
    ReNotificationNumber,
}

/// Document dates used for deadline arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    NotificationDate,
    ReNotificationDate,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A boolean predicate over a warranty-work snapshot.
///
/// There is no negation node: every rule is expressible with presence,
/// absence, set membership, and day thresholds. Keeping the algebra
/// monotone means SQL `NULL` handling cannot diverge from the in-process
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The id is set and non-zero.
    IdPresent(IdField),
    /// The id is `NULL` or zero.
    IdAbsent(IdField),
    /// The id is one of the listed values.
    IdIn(IdField, &'static [DbId]),
    /// The text is set and not blank.
    TextPresent(TextField),
    /// The text is `NULL` or blank.
    TextAbsent(TextField),
    /// The date is set and `today - date >= days`.
    DaysSinceAtLeast(DateField, i64),
    /// The date is set and `today - date < days`.
    DaysSinceBelow(DateField, i64),
    /// Every sub-condition holds.
    All(&'static [Condition]),
    /// At least one sub-condition holds.
    Any(&'static [Condition]),
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub status: CaseStatus,
    pub condition: Condition,
}

// ---------------------------------------------------------------------------
// Classification id sets
// ---------------------------------------------------------------------------

/// Days the supplier has to answer a notification before a claim act is due.
pub const RESPONSE_DEADLINE_DAYS: i64 = 4;

/// Notification outcomes that close the case once any decision exists.
pub const NOTIFICATION_CLOSED_BY_DECISION: &[DbId] = &[1, 2, 3, 5, 6, 9, 10, 11, 13, 14];

/// Notification outcomes that close the case on their own.
pub const NOTIFICATION_TERMINAL: &[DbId] = &[4, 8, 12, 13];

/// Responses that require a completion act.
pub const RESPONSE_NEEDS_COMPLETION_ACT: &[DbId] = &[6, 7, 11];

/// Decisions that require a completion act.
pub const DECISION_NEEDS_COMPLETION_ACT: &[DbId] = &[3, 4, 5];

/// Responses that require a claim act while no decision exists.
pub const RESPONSE_NEEDS_CLAIM_ACT: &[DbId] = &[1, 2, 3, 4, 8, 9, 10, 12];

/// Notification outcomes that wait on the supplier's answer.
pub const NOTIFICATION_AWAITS_RESPONSE: &[DbId] = &[2, 3, 5, 9, 11];

/// Notification outcomes that call for a second notification.
pub const NOTIFICATION_NEEDS_RE_NOTIFICATION: &[DbId] = &[1, 6, 10];

/// Decision id meaning the claim is settled.
pub const DECISION_SETTLED: &[DbId] = &[9];

/// Response id closing the case once any decision exists.
pub const RESPONSE_CLOSED_BY_DECISION: &[DbId] = &[14];

/// Response id closing the case together with a settled decision.
pub const RESPONSE_CLOSED_BY_SETTLEMENT: &[DbId] = &[13];

/// Notification id that, combined with response 2, waits for a claim act.
pub const NOTIFICATION_CLAIM_PENDING: &[DbId] = &[13];

/// Response id that, combined with notification 13, waits for a claim act.
pub const RESPONSE_CLAIM_PENDING: &[DbId] = &[2];

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The status decision table, in evaluation order.
pub static STATUS_RULES: &[StatusRule] = &[
    // Nothing has happened yet.
    StatusRule {
        status: CaseStatus::AwaitingNotification,
        condition: All(&[
            IdAbsent(NotificationSummary),
            IdAbsent(ResponseSummary),
            IdAbsent(DecisionSummary),
            TextAbsent(ReNotificationNumber),
        ]),
    },
    StatusRule {
        status: CaseStatus::Completed,
        condition: Any(&[
            IdIn(DecisionSummary, DECISION_SETTLED),
            All(&[
                IdIn(NotificationSummary, NOTIFICATION_CLOSED_BY_DECISION),
                IdPresent(DecisionSummary),
            ]),
            IdIn(NotificationSummary, NOTIFICATION_TERMINAL),
            All(&[
                IdIn(ResponseSummary, RESPONSE_CLOSED_BY_DECISION),
                IdPresent(DecisionSummary),
            ]),
            All(&[
                IdIn(ResponseSummary, RESPONSE_CLOSED_BY_SETTLEMENT),
                IdIn(DecisionSummary, DECISION_SETTLED),
            ]),
        ]),
    },
    StatusRule {
        status: CaseStatus::AwaitingCompletionAct,
        condition: Any(&[
            All(&[
                IdIn(ResponseSummary, RESPONSE_NEEDS_COMPLETION_ACT),
                TextAbsent(CompletionActNumber),
            ]),
            All(&[
                IdIn(DecisionSummary, DECISION_NEEDS_COMPLETION_ACT),
                TextAbsent(CompletionActNumber),
            ]),
        ]),
    },
    StatusRule {
        status: CaseStatus::AwaitingClaimAct,
        condition: Any(&[
            All(&[
                IdIn(ResponseSummary, RESPONSE_NEEDS_CLAIM_ACT),
                IdAbsent(DecisionSummary),
            ]),
            All(&[
                IdIn(NotificationSummary, NOTIFICATION_AWAITS_RESPONSE),
                IdAbsent(ResponseSummary),
                DaysSinceAtLeast(NotificationDate, RESPONSE_DEADLINE_DAYS),
                IdAbsent(DecisionSummary),
            ]),
            All(&[
                TextPresent(ReNotificationNumber),
                IdAbsent(ResponseSummary),
                DaysSinceAtLeast(ReNotificationDate, RESPONSE_DEADLINE_DAYS),
                IdAbsent(DecisionSummary),
            ]),
            All(&[
                IdIn(NotificationSummary, NOTIFICATION_CLAIM_PENDING),
                IdIn(ResponseSummary, RESPONSE_CLAIM_PENDING),
                TextAbsent(ClaimActNumber),
            ]),
        ]),
    },
    StatusRule {
        status: CaseStatus::AwaitingSupplierResponse,
        condition: Any(&[
            All(&[
                IdIn(NotificationSummary, NOTIFICATION_AWAITS_RESPONSE),
                IdAbsent(ResponseSummary),
                IdAbsent(DecisionSummary),
            ]),
            All(&[
                TextPresent(ReNotificationNumber),
                IdAbsent(ResponseSummary),
                DaysSinceBelow(ReNotificationDate, RESPONSE_DEADLINE_DAYS),
                IdAbsent(DecisionSummary),
            ]),
        ]),
    },
    StatusRule {
        status: CaseStatus::AwaitingReNotification,
        condition: All(&[
            IdIn(NotificationSummary, NOTIFICATION_NEEDS_RE_NOTIFICATION),
            TextAbsent(ReNotificationNumber),
            IdAbsent(ResponseSummary),
        ]),
    },
    StatusRule {
        status: CaseStatus::DecisionMade,
        condition: IdPresent(DecisionSummary),
    },
    StatusRule {
        status: CaseStatus::ResponseReceived,
        condition: IdPresent(ResponseSummary),
    },
    StatusRule {
        status: CaseStatus::NotificationSent,
        condition: IdPresent(NotificationSummary),
    },
];

/// Status returned when no rule matches.
pub const FALLBACK_STATUS: CaseStatus = CaseStatus::Other;
