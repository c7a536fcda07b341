//! Repository for the `warranty_work` table.

use claimtrack_core::presence::{normalize_id, normalize_text, trim_blank};
use claimtrack_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::warranty_work::{UpdateWarrantyWork, WarrantyWork};

/// Column list for `warranty_work` queries.
const COLUMNS: &str = "\
    id, case_id, \
    notification_number, notification_date, \
    re_notification_number, re_notification_date, \
    response_letter_number, response_letter_date, \
    claim_act_number, claim_act_date, \
    work_completion_act_number, work_completion_act_date, \
    notification_summary_id, response_summary_id, decision_summary_id, \
    created_at, updated_at";

/// Provides access to the warranty-work record of a repair case.
pub struct WarrantyWorkRepo;

impl WarrantyWorkRepo {
    /// Find the warranty work attached to a case.
    pub async fn find_by_case_id(
        pool: &PgPool,
        case_id: DbId,
    ) -> Result<Option<WarrantyWork>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_inner(&mut conn, case_id).await
    }

    /// Partially update the warranty work of a case.
    ///
    /// Returns `None` if the case has no warranty-work row.
    pub async fn update_by_case_id(
        pool: &PgPool,
        case_id: DbId,
        input: &UpdateWarrantyWork,
    ) -> Result<Option<WarrantyWork>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::update_inner(&mut conn, case_id, input).await
    }

    pub(crate) async fn find_inner(
        conn: &mut PgConnection,
        case_id: DbId,
    ) -> Result<Option<WarrantyWork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warranty_work WHERE case_id = $1");
        sqlx::query_as::<_, WarrantyWork>(&query)
            .bind(case_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Insert the warranty-work row for a freshly created case.
    ///
    /// Document numbers are stored trimmed. `0` ids and blank document
    /// numbers are stored as `NULL`.
    pub(crate) async fn create_inner(
        conn: &mut PgConnection,
        case_id: DbId,
        input: &UpdateWarrantyWork,
    ) -> Result<WarrantyWork, sqlx::Error> {
        let query = format!(
            "INSERT INTO warranty_work \
                (case_id, notification_number, notification_date, \
                 re_notification_number, re_notification_date, \
                 response_letter_number, response_letter_date, \
                 claim_act_number, claim_act_date, \
                 work_completion_act_number, work_completion_act_date, \
                 notification_summary_id, response_summary_id, decision_summary_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WarrantyWork>(&query)
            .bind(case_id)
            .bind(normalize_text(input.notification_number.as_deref()))
            .bind(input.notification_date)
            .bind(normalize_text(input.re_notification_number.as_deref()))
            .bind(input.re_notification_date)
            .bind(normalize_text(input.response_letter_number.as_deref()))
            .bind(input.response_letter_date)
            .bind(normalize_text(input.claim_act_number.as_deref()))
            .bind(input.claim_act_date)
            .bind(normalize_text(input.work_completion_act_number.as_deref()))
            .bind(input.work_completion_act_date)
            .bind(normalize_id(input.notification_summary_id))
            .bind(normalize_id(input.response_summary_id))
            .bind(normalize_id(input.decision_summary_id))
            .fetch_one(&mut *conn)
            .await
    }

    /// Apply a partial update on an existing connection or transaction.
    ///
    /// `None` keeps the stored value. `0` ids and blank document numbers
    /// clear it. Document numbers are trimmed the same way as on create.
    pub(crate) async fn update_inner(
        conn: &mut PgConnection,
        case_id: DbId,
        input: &UpdateWarrantyWork,
    ) -> Result<Option<WarrantyWork>, sqlx::Error> {
        let query = format!(
            "UPDATE warranty_work SET
                notification_number = CASE WHEN $2::text IS NULL THEN notification_number
                    ELSE NULLIF($2, '') END,
                notification_date = COALESCE($3, notification_date),
                re_notification_number = CASE WHEN $4::text IS NULL THEN re_notification_number
                    ELSE NULLIF($4, '') END,
                re_notification_date = COALESCE($5, re_notification_date),
                response_letter_number = CASE WHEN $6::text IS NULL THEN response_letter_number
                    ELSE NULLIF($6, '') END,
                response_letter_date = COALESCE($7, response_letter_date),
                claim_act_number = CASE WHEN $8::text IS NULL THEN claim_act_number
                    ELSE NULLIF($8, '') END,
                claim_act_date = COALESCE($9, claim_act_date),
                work_completion_act_number = CASE WHEN $10::text IS NULL THEN work_completion_act_number
                    ELSE NULLIF($10, '') END,
                work_completion_act_date = COALESCE($11, work_completion_act_date),
                notification_summary_id = CASE WHEN $12::bigint IS NULL THEN notification_summary_id
                    ELSE NULLIF($12, 0) END,
                response_summary_id = CASE WHEN $13::bigint IS NULL THEN response_summary_id
                    ELSE NULLIF($13, 0) END,
                decision_summary_id = CASE WHEN $14::bigint IS NULL THEN decision_summary_id
                    ELSE NULLIF($14, 0) END
             WHERE case_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WarrantyWork>(&query)
            .bind(case_id)
            .bind(input.notification_number.as_deref().map(trim_blank))
            .bind(input.notification_date)
            .bind(input.re_notification_number.as_deref().map(trim_blank))
            .bind(input.re_notification_date)
            .bind(input.response_letter_number.as_deref().map(trim_blank))
            .bind(input.response_letter_date)
            .bind(input.claim_act_number.as_deref().map(trim_blank))
            .bind(input.claim_act_date)
            .bind(input.work_completion_act_number.as_deref().map(trim_blank))
            .bind(input.work_completion_act_date)
            .bind(input.notification_summary_id)
            .bind(input.response_summary_id)
            .bind(input.decision_summary_id)
            .fetch_optional(&mut *conn)
            .await
    }
}
