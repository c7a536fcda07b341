//! Case lifecycle status labels.
//!
//! Status is never stored. It is computed on read from the warranty-work
//! record (see [`crate::status_engine`]). The labels below are returned
//! verbatim in API responses and are the domain of the status filter.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const LABEL_AWAITING_NOTIFICATION: &str = "Ожидает уведомление поставщика";
pub const LABEL_NOTIFICATION_SENT: &str = "Уведомление отправлено";
pub const LABEL_RESPONSE_RECEIVED: &str = "Ответ получен";
pub const LABEL_DECISION_MADE: &str = "Решение принято";
pub const LABEL_AWAITING_COMPLETION_ACT: &str = "Ожидает АВР";
pub const LABEL_AWAITING_CLAIM_ACT: &str = "Ожидает рекламационный акт";
pub const LABEL_AWAITING_SUPPLIER_RESPONSE: &str = "Ожидает ответа поставщика";
pub const LABEL_AWAITING_RE_NOTIFICATION: &str = "Ожидает повторного уведомления поставщика";
pub const LABEL_COMPLETED: &str = "Завершено";
pub const LABEL_OTHER: &str = "Другое";

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// The computed lifecycle state of a repair case's warranty work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "Ожидает уведомление поставщика")]
    AwaitingNotification,
    #[serde(rename = "Уведомление отправлено")]
    NotificationSent,
    #[serde(rename = "Ответ получен")]
    ResponseReceived,
    #[serde(rename = "Решение принято")]
    DecisionMade,
    #[serde(rename = "Ожидает АВР")]
    AwaitingCompletionAct,
    #[serde(rename = "Ожидает рекламационный акт")]
    AwaitingClaimAct,
    #[serde(rename = "Ожидает ответа поставщика")]
    AwaitingSupplierResponse,
    #[serde(rename = "Ожидает повторного уведомления поставщика")]
    AwaitingReNotification,
    #[serde(rename = "Завершено")]
    Completed,
    /// Catch-all for id combinations no rule anticipates.
    #[serde(rename = "Другое")]
    Other,
}

impl CaseStatus {
    /// The lifecycle statuses offered as filter options, in display order.
    ///
    /// [`CaseStatus::Other`] is deliberately absent: it is a safety net, not a
    /// state anyone files a case under.
    pub const FILTERABLE: [CaseStatus; 9] = [
        Self::AwaitingNotification,
        Self::NotificationSent,
        Self::ResponseReceived,
        Self::DecisionMade,
        Self::AwaitingCompletionAct,
        Self::AwaitingClaimAct,
        Self::AwaitingSupplierResponse,
        Self::AwaitingReNotification,
        Self::Completed,
    ];

    /// Every status the engine can produce.
    pub const ALL: [CaseStatus; 10] = [
        Self::AwaitingNotification,
        Self::NotificationSent,
        Self::ResponseReceived,
        Self::DecisionMade,
        Self::AwaitingCompletionAct,
        Self::AwaitingClaimAct,
        Self::AwaitingSupplierResponse,
        Self::AwaitingReNotification,
        Self::Completed,
        Self::Other,
    ];

    /// The human-readable label used in responses and filters.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::AwaitingNotification => LABEL_AWAITING_NOTIFICATION,
            Self::NotificationSent => LABEL_NOTIFICATION_SENT,
            Self::ResponseReceived => LABEL_RESPONSE_RECEIVED,
            Self::DecisionMade => LABEL_DECISION_MADE,
            Self::AwaitingCompletionAct => LABEL_AWAITING_COMPLETION_ACT,
            Self::AwaitingClaimAct => LABEL_AWAITING_CLAIM_ACT,
            Self::AwaitingSupplierResponse => LABEL_AWAITING_SUPPLIER_RESPONSE,
            Self::AwaitingReNotification => LABEL_AWAITING_RE_NOTIFICATION,
            Self::Completed => LABEL_COMPLETED,
            Self::Other => LABEL_OTHER,
        }
    }

    /// Parse a label back into a status.
    pub fn from_label(label: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_label() == label)
            .ok_or_else(|| {
                format!(
                    "Invalid status '{label}'. Must be one of: {}",
                    Self::ALL.map(|s| s.as_label()).join(", ")
                )
            })
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
