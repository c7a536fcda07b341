//! Warranty-work entity model and DTOs.

use claimtrack_core::status_engine::WarrantyStatusInput;
use claimtrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `warranty_work` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WarrantyWork {
    pub id: DbId,
    pub case_id: DbId,
    pub notification_number: Option<String>,
    pub notification_date: Option<Date>,
    pub re_notification_number: Option<String>,
    pub re_notification_date: Option<Date>,
    pub response_letter_number: Option<String>,
    pub response_letter_date: Option<Date>,
    pub claim_act_number: Option<String>,
    pub claim_act_date: Option<Date>,
    pub work_completion_act_number: Option<String>,
    pub work_completion_act_date: Option<Date>,
    pub notification_summary_id: Option<DbId>,
    pub response_summary_id: Option<DbId>,
    pub decision_summary_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WarrantyWork {
    /// Project the fields the status engine reads.
    pub fn status_input(&self) -> WarrantyStatusInput {
        WarrantyStatusInput {
            notification_summary_id: self.notification_summary_id,
            response_summary_id: self.response_summary_id,
            decision_summary_id: self.decision_summary_id,
            work_completion_act_number: self.work_completion_act_number.clone(),
            claim_act_number: self.claim_act_number.clone(),
            re_notification_number: self.re_notification_number.clone(),
            re_notification_date: self.re_notification_date,
            notification_date: self.notification_date,
        }
    }
}

/// Warranty-work fields accepted on create and patch.
///
/// On patch, `None` keeps the stored value. A `0` id or a blank document
/// number clears the stored value, following the system-wide "0 / blank
/// means unset" convention.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWarrantyWork {
    #[validate(length(max = 50))]
    pub notification_number: Option<String>,
    pub notification_date: Option<Date>,
    #[validate(length(max = 50))]
    pub re_notification_number: Option<String>,
    pub re_notification_date: Option<Date>,
    #[validate(length(max = 50))]
    pub response_letter_number: Option<String>,
    pub response_letter_date: Option<Date>,
    #[validate(length(max = 50))]
    pub claim_act_number: Option<String>,
    pub claim_act_date: Option<Date>,
    #[validate(length(max = 50))]
    pub work_completion_act_number: Option<String>,
    pub work_completion_act_date: Option<Date>,
    pub notification_summary_id: Option<DbId>,
    pub response_summary_id: Option<DbId>,
    pub decision_summary_id: Option<DbId>,
}
