//! Repository for the `repair_cases` table.
//!
//! Every read computes the case status through the SQL rendering of the
//! decision table; status is never stored.

use claimtrack_core::presence::{normalize_id, normalize_text};
use claimtrack_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::models::case::{CaseDetail, CaseFilter, CaseWithStatus, CreateCase, UpdateCase};
use crate::models::warranty_work::UpdateWarrantyWork;
use crate::repositories::{EquipmentRepo, WarrantyWorkRepo};
use crate::status_expr::{status_labels, status_sql};

/// Qualified column list for `repair_cases` selects.
const CASE_COLUMNS: &str = "\
    c.id, c.date_recorded, c.fault_date, c.section_mask, c.locomotive_number, c.mileage, \
    c.component_quantity, c.element_quantity, \
    c.component_serial_number_old, c.component_manufacture_date_old, \
    c.element_serial_number_old, c.element_manufacture_date_old, \
    c.component_serial_number_new, c.component_manufacture_date_new, \
    c.element_serial_number_new, c.element_manufacture_date_new, \
    c.notes, c.regional_center_id, c.locomotive_model_id, c.fault_discovery_place_id, \
    c.component_equipment_id, c.element_equipment_id, c.malfunction_id, c.repair_type_id, \
    c.repair_performer_id, c.equipment_owner_id, c.destination_type_id, c.supplier_id, \
    c.created_at, c.updated_at";

/// Joins shared by every status-bearing case query. `ww` is the alias the
/// status expression reads.
const CASE_JOINS: &str = "\
    FROM repair_cases c \
    LEFT JOIN warranty_work ww ON ww.case_id = c.id \
    LEFT JOIN regional_centers rc ON rc.id = c.regional_center_id \
    LEFT JOIN locomotive_models lm ON lm.id = c.locomotive_model_id \
    LEFT JOIN equipment ce ON ce.id = c.component_equipment_id \
    LEFT JOIN equipment ee ON ee.id = c.element_equipment_id \
    LEFT JOIN malfunctions m ON m.id = c.malfunction_id \
    LEFT JOIN repair_types rt ON rt.id = c.repair_type_id \
    LEFT JOIN suppliers s ON s.id = c.supplier_id";

/// `SELECT ... FROM ...` for [`CaseWithStatus`], without a `WHERE` clause.
fn select_with_status() -> String {
    format!(
        "SELECT {CASE_COLUMNS}, \
            {status} AS status, \
            rc.name AS regional_center_name, \
            lm.name AS locomotive_model_name, \
            ce.name AS component_equipment_name, \
            ee.name AS element_equipment_name, \
            m.name AS malfunction_name, \
            rt.name AS repair_type_name, \
            s.name AS supplier_name \
         {CASE_JOINS}",
        status = status_sql(),
    )
}

/// Provides CRUD and filtering for repair cases.
pub struct CaseRepo;

impl CaseRepo {
    /// Create a case and its warranty-work row in one transaction.
    ///
    /// The supplier is resolved from the component equipment's hierarchy.
    /// Text fields are stored trimmed, blank ones as `NULL`.
    pub async fn create(pool: &PgPool, input: &CreateCase) -> Result<CaseDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let supplier_id =
            EquipmentRepo::find_supplier_inner(&mut tx, input.component_equipment_id).await?;

        let case_id: DbId = sqlx::query_scalar(
            "INSERT INTO repair_cases \
                (fault_date, section_mask, locomotive_number, mileage, \
                 component_quantity, element_quantity, \
                 component_serial_number_old, component_manufacture_date_old, \
                 element_serial_number_old, element_manufacture_date_old, \
                 component_serial_number_new, component_manufacture_date_new, \
                 element_serial_number_new, element_manufacture_date_new, \
                 notes, regional_center_id, locomotive_model_id, fault_discovery_place_id, \
                 component_equipment_id, element_equipment_id, malfunction_id, repair_type_id, \
                 repair_performer_id, equipment_owner_id, destination_type_id, supplier_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                     $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26) \
             RETURNING id",
        )
        .bind(input.fault_date)
        .bind(input.section_mask)
        .bind(normalize_text(input.locomotive_number.as_deref()))
        .bind(input.mileage)
        .bind(input.component_quantity)
        .bind(input.element_quantity)
        .bind(normalize_text(input.component_serial_number_old.as_deref()))
        .bind(input.component_manufacture_date_old)
        .bind(normalize_text(input.element_serial_number_old.as_deref()))
        .bind(input.element_manufacture_date_old)
        .bind(normalize_text(input.component_serial_number_new.as_deref()))
        .bind(input.component_manufacture_date_new)
        .bind(normalize_text(input.element_serial_number_new.as_deref()))
        .bind(input.element_manufacture_date_new)
        .bind(normalize_text(input.notes.as_deref()))
        .bind(input.regional_center_id)
        .bind(input.locomotive_model_id)
        .bind(input.fault_discovery_place_id)
        .bind(input.component_equipment_id)
        .bind(normalize_id(input.element_equipment_id))
        .bind(input.malfunction_id)
        .bind(input.repair_type_id)
        .bind(normalize_id(input.repair_performer_id))
        .bind(normalize_id(input.equipment_owner_id))
        .bind(normalize_id(input.destination_type_id))
        .bind(supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        let empty = UpdateWarrantyWork::default();
        let warranty_input = input.warranty_work.as_ref().unwrap_or(&empty);
        let warranty_work = WarrantyWorkRepo::create_inner(&mut tx, case_id, warranty_input).await?;

        let case = Self::select_by_id(&mut *tx, case_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(CaseDetail {
            case,
            warranty_work: Some(warranty_work),
        })
    }

    /// Find a case with its computed status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CaseWithStatus>, sqlx::Error> {
        Self::select_by_id(pool, id).await
    }

    /// Find a case with its status and warranty work.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CaseDetail>, sqlx::Error> {
        let Some(case) = Self::select_by_id(pool, id).await? else {
            return Ok(None);
        };
        let warranty_work = WarrantyWorkRepo::find_by_case_id(pool, id).await?;
        Ok(Some(CaseDetail {
            case,
            warranty_work,
        }))
    }

    /// Partially update a case and, if given, its warranty work.
    ///
    /// Text fields are stored trimmed; a blank text field keeps the stored
    /// value.
    ///
    /// When the patch names component or element equipment, the supplier is
    /// re-resolved from it (component first) and replaced, even with `NULL`.
    /// Returns `None` if the case does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCase,
    ) -> Result<Option<CaseDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let supplier_id = match input.equipment_for_supplier() {
            Some(equipment_id) => {
                Some(EquipmentRepo::find_supplier_inner(&mut tx, equipment_id).await?)
            }
            None => None,
        };

        let updated = Self::update_row(&mut tx, id, input, supplier_id).await?;
        if !updated {
            return Ok(None);
        }

        if let Some(ref warranty) = input.warranty_work {
            WarrantyWorkRepo::update_inner(&mut tx, id, warranty).await?;
        }

        let case = Self::select_by_id(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let warranty_work = WarrantyWorkRepo::find_inner(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(CaseDetail {
            case,
            warranty_work,
        }))
    }

    /// Delete a case. Its warranty work goes with it by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM repair_cases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List cases matching a filter, newest first.
    ///
    /// Each list filter matches any of its values. Status filtering compares
    /// against the same computed status the rows carry.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &CaseFilter,
    ) -> Result<Vec<CaseWithStatus>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(select_with_status());
        qb.push(" WHERE TRUE");
        push_conditions(&mut qb, filter);
        qb.push(" ORDER BY c.date_recorded DESC, c.id DESC LIMIT ")
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.skip);

        qb.build_query_as::<CaseWithStatus>().fetch_all(pool).await
    }

    /// Count cases matching a filter, ignoring pagination.
    pub async fn count_filtered(pool: &PgPool, filter: &CaseFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {CASE_JOINS}"));
        qb.push(" WHERE TRUE");
        push_conditions(&mut qb, filter);

        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    async fn select_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<CaseWithStatus>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{} WHERE c.id = $1", select_with_status());
        sqlx::query_as::<_, CaseWithStatus>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Apply the case columns of a patch. `supplier_id` is `Some` when the
    /// supplier must be replaced.
    async fn update_row(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCase,
        supplier_id: Option<Option<DbId>>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE repair_cases SET
                fault_date = COALESCE($2, fault_date),
                section_mask = COALESCE($3, section_mask),
                locomotive_number = COALESCE($4, locomotive_number),
                mileage = COALESCE($5, mileage),
                component_quantity = COALESCE($6, component_quantity),
                element_quantity = COALESCE($7, element_quantity),
                component_serial_number_old = COALESCE($8, component_serial_number_old),
                component_manufacture_date_old = COALESCE($9, component_manufacture_date_old),
                element_serial_number_old = COALESCE($10, element_serial_number_old),
                element_manufacture_date_old = COALESCE($11, element_manufacture_date_old),
                component_serial_number_new = COALESCE($12, component_serial_number_new),
                component_manufacture_date_new = COALESCE($13, component_manufacture_date_new),
                element_serial_number_new = COALESCE($14, element_serial_number_new),
                element_manufacture_date_new = COALESCE($15, element_manufacture_date_new),
                notes = COALESCE($16, notes),
                regional_center_id = COALESCE(NULLIF($17, 0), regional_center_id),
                locomotive_model_id = COALESCE(NULLIF($18, 0), locomotive_model_id),
                fault_discovery_place_id = COALESCE(NULLIF($19, 0), fault_discovery_place_id),
                component_equipment_id = COALESCE(NULLIF($20, 0), component_equipment_id),
                element_equipment_id = CASE WHEN $21::bigint IS NULL THEN element_equipment_id
                    ELSE NULLIF($21, 0) END,
                malfunction_id = COALESCE(NULLIF($22, 0), malfunction_id),
                repair_type_id = COALESCE(NULLIF($23, 0), repair_type_id),
                repair_performer_id = CASE WHEN $24::bigint IS NULL THEN repair_performer_id
                    ELSE NULLIF($24, 0) END,
                equipment_owner_id = CASE WHEN $25::bigint IS NULL THEN equipment_owner_id
                    ELSE NULLIF($25, 0) END,
                destination_type_id = CASE WHEN $26::bigint IS NULL THEN destination_type_id
                    ELSE NULLIF($26, 0) END,
                supplier_id = CASE WHEN $27 THEN $28 ELSE supplier_id END
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.fault_date)
        .bind(input.section_mask)
        .bind(normalize_text(input.locomotive_number.as_deref()))
        .bind(input.mileage)
        .bind(input.component_quantity)
        .bind(input.element_quantity)
        .bind(normalize_text(input.component_serial_number_old.as_deref()))
        .bind(input.component_manufacture_date_old)
        .bind(normalize_text(input.element_serial_number_old.as_deref()))
        .bind(input.element_manufacture_date_old)
        .bind(normalize_text(input.component_serial_number_new.as_deref()))
        .bind(input.component_manufacture_date_new)
        .bind(normalize_text(input.element_serial_number_new.as_deref()))
        .bind(input.element_manufacture_date_new)
        .bind(normalize_text(input.notes.as_deref()))
        .bind(input.regional_center_id)
        .bind(input.locomotive_model_id)
        .bind(input.fault_discovery_place_id)
        .bind(input.component_equipment_id)
        .bind(input.element_equipment_id)
        .bind(input.malfunction_id)
        .bind(input.repair_type_id)
        .bind(input.repair_performer_id)
        .bind(input.equipment_owner_id)
        .bind(input.destination_type_id)
        .bind(supplier_id.is_some())
        .bind(supplier_id.flatten())
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &CaseFilter) {
    if let Some(from) = filter.date_from {
        qb.push(" AND c.fault_date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND c.fault_date <= ").push_bind(to);
    }

    for (column, ids) in &filter.ids {
        qb.push(format!(" AND {column} = ANY("))
            .push_bind(ids.clone())
            .push("::bigint[])");
    }
    for (column, values) in &filter.texts {
        qb.push(format!(" AND {column} = ANY("))
            .push_bind(values.clone())
            .push("::text[])");
    }
    for (column, date) in &filter.dates {
        qb.push(format!(" AND {column} = ")).push_bind(*date);
    }

    if !filter.statuses.is_empty() {
        qb.push(format!(" AND ({}) = ANY(", status_sql()))
            .push_bind(status_labels(&filter.statuses))
            .push("::text[])");
    }
}
