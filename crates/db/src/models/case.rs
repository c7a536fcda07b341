//! Repair case entity model and DTOs.

use claimtrack_core::case_status::CaseStatus;
use claimtrack_core::error::CoreError;
use claimtrack_core::filters::{
    parse_id_list, parse_status_filter, parse_text_list, split_list_param, validate_date_range,
};
use claimtrack_core::pagination::{Page, DEFAULT_LIMIT, MAX_LIMIT};
use claimtrack_core::presence::{normalize_id, normalize_text};
use claimtrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::warranty_work::{UpdateWarrantyWork, WarrantyWork};

/// A row from the `repair_cases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairCase {
    pub id: DbId,
    pub date_recorded: Timestamp,
    pub fault_date: Date,
    pub section_mask: i32,
    pub locomotive_number: Option<String>,
    pub mileage: Option<i32>,
    pub component_quantity: i32,
    pub element_quantity: Option<i32>,
    pub component_serial_number_old: Option<String>,
    pub component_manufacture_date_old: Option<Date>,
    pub element_serial_number_old: Option<String>,
    pub element_manufacture_date_old: Option<Date>,
    pub component_serial_number_new: Option<String>,
    pub component_manufacture_date_new: Option<Date>,
    pub element_serial_number_new: Option<String>,
    pub element_manufacture_date_new: Option<Date>,
    pub notes: Option<String>,
    pub regional_center_id: DbId,
    pub locomotive_model_id: DbId,
    pub fault_discovery_place_id: DbId,
    pub component_equipment_id: DbId,
    pub element_equipment_id: Option<DbId>,
    pub malfunction_id: DbId,
    pub repair_type_id: DbId,
    pub repair_performer_id: Option<DbId>,
    pub equipment_owner_id: Option<DbId>,
    pub destination_type_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A repair case enriched with its computed status and display names of
/// the most commonly shown references.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseWithStatus {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub case: RepairCase,
    /// Label produced by the SQL rendering of the status decision table.
    pub status: String,
    pub regional_center_name: Option<String>,
    pub locomotive_model_name: Option<String>,
    pub component_equipment_name: Option<String>,
    pub element_equipment_name: Option<String>,
    pub malfunction_name: Option<String>,
    pub repair_type_name: Option<String>,
    pub supplier_name: Option<String>,
}

/// Case detail: the case, its status, and its warranty work.
#[derive(Debug, Clone, Serialize)]
pub struct CaseDetail {
    #[serde(flatten)]
    pub case: CaseWithStatus,
    pub warranty_work: Option<WarrantyWork>,
}

/// DTO for creating a repair case.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCase {
    pub fault_date: Date,
    pub section_mask: i32,
    #[validate(length(max = 50))]
    pub locomotive_number: Option<String>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    #[validate(range(min = 1))]
    pub component_quantity: i32,
    #[validate(range(min = 1))]
    pub element_quantity: Option<i32>,
    #[validate(length(max = 100))]
    pub component_serial_number_old: Option<String>,
    pub component_manufacture_date_old: Option<Date>,
    #[validate(length(max = 100))]
    pub element_serial_number_old: Option<String>,
    pub element_manufacture_date_old: Option<Date>,
    #[validate(length(max = 100))]
    pub component_serial_number_new: Option<String>,
    pub component_manufacture_date_new: Option<Date>,
    #[validate(length(max = 100))]
    pub element_serial_number_new: Option<String>,
    pub element_manufacture_date_new: Option<Date>,
    pub notes: Option<String>,
    pub regional_center_id: DbId,
    pub locomotive_model_id: DbId,
    pub fault_discovery_place_id: DbId,
    pub component_equipment_id: DbId,
    pub element_equipment_id: Option<DbId>,
    pub malfunction_id: DbId,
    pub repair_type_id: DbId,
    pub repair_performer_id: Option<DbId>,
    pub equipment_owner_id: Option<DbId>,
    pub destination_type_id: Option<DbId>,
    #[validate(nested)]
    pub warranty_work: Option<UpdateWarrantyWork>,
}

/// DTO for patching a repair case. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCase {
    pub fault_date: Option<Date>,
    pub section_mask: Option<i32>,
    #[validate(length(max = 50))]
    pub locomotive_number: Option<String>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    #[validate(range(min = 1))]
    pub component_quantity: Option<i32>,
    #[validate(range(min = 1))]
    pub element_quantity: Option<i32>,
    #[validate(length(max = 100))]
    pub component_serial_number_old: Option<String>,
    pub component_manufacture_date_old: Option<Date>,
    #[validate(length(max = 100))]
    pub element_serial_number_old: Option<String>,
    pub element_manufacture_date_old: Option<Date>,
    #[validate(length(max = 100))]
    pub component_serial_number_new: Option<String>,
    pub component_manufacture_date_new: Option<Date>,
    #[validate(length(max = 100))]
    pub element_serial_number_new: Option<String>,
    pub element_manufacture_date_new: Option<Date>,
    pub notes: Option<String>,
    pub regional_center_id: Option<DbId>,
    pub locomotive_model_id: Option<DbId>,
    pub fault_discovery_place_id: Option<DbId>,
    pub component_equipment_id: Option<DbId>,
    pub element_equipment_id: Option<DbId>,
    pub malfunction_id: Option<DbId>,
    pub repair_type_id: Option<DbId>,
    pub repair_performer_id: Option<DbId>,
    pub equipment_owner_id: Option<DbId>,
    pub destination_type_id: Option<DbId>,
    #[validate(nested)]
    pub warranty_work: Option<UpdateWarrantyWork>,
}

impl UpdateCase {
    /// Equipment whose supplier should replace the stored one, if the patch
    /// touches equipment at all. Component equipment takes priority.
    pub fn equipment_for_supplier(&self) -> Option<DbId> {
        normalize_id(self.component_equipment_id).or(normalize_id(self.element_equipment_id))
    }
}

/// Query parameters for listing and filtering cases.
///
/// Id filters and document-number filters accept comma-separated lists
/// (`?supplier_id=3,7`); a row matches when its value is any of the listed
/// ones. `0` ids and blank entries are ignored. `notes` is free text and is
/// matched as a single value. `status` is a comma-separated list of labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseListParams {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,

    pub regional_center_id: Option<String>,
    pub locomotive_model_id: Option<String>,
    pub component_equipment_id: Option<String>,
    pub element_equipment_id: Option<String>,
    pub malfunction_id: Option<String>,
    pub repair_type_id: Option<String>,
    pub supplier_id: Option<String>,
    pub equipment_owner_id: Option<String>,
    pub repair_performer_id: Option<String>,
    pub destination_type_id: Option<String>,
    pub section_mask: Option<String>,

    pub locomotive_number: Option<String>,
    pub component_serial_number_old: Option<String>,
    pub element_serial_number_old: Option<String>,
    pub component_serial_number_new: Option<String>,
    pub element_serial_number_new: Option<String>,
    pub notes: Option<String>,

    pub status: Option<String>,

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
    pub notification_summary_id: Option<String>,
    pub response_summary_id: Option<String>,
    pub decision_summary_id: Option<String>,

    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated case filter ready for [`CaseRepo::list_filtered`].
///
/// Columns are qualified with the aliases of the case list query (`c` for
/// `repair_cases`, `ww` for `warranty_work`). Every list is non-empty.
///
/// [`CaseRepo::list_filtered`]: crate::repositories::CaseRepo::list_filtered
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub ids: Vec<(&'static str, Vec<DbId>)>,
    pub texts: Vec<(&'static str, Vec<String>)>,
    pub dates: Vec<(&'static str, Date)>,
    /// Requested statuses; empty means no status filter.
    pub statuses: Vec<CaseStatus>,
    pub page: Page,
}

impl TryFrom<CaseListParams> for CaseFilter {
    type Error = CoreError;

    fn try_from(p: CaseListParams) -> Result<Self, Self::Error> {
        validate_date_range(p.date_from, p.date_to)?;

        let mut ids = Vec::new();
        for (column, raw) in [
            ("c.regional_center_id", &p.regional_center_id),
            ("c.locomotive_model_id", &p.locomotive_model_id),
            ("c.component_equipment_id", &p.component_equipment_id),
            ("c.element_equipment_id", &p.element_equipment_id),
            ("c.malfunction_id", &p.malfunction_id),
            ("c.repair_type_id", &p.repair_type_id),
            ("c.supplier_id", &p.supplier_id),
            ("c.equipment_owner_id", &p.equipment_owner_id),
            ("c.repair_performer_id", &p.repair_performer_id),
            ("c.destination_type_id", &p.destination_type_id),
            ("c.section_mask", &p.section_mask),
            ("ww.notification_summary_id", &p.notification_summary_id),
            ("ww.response_summary_id", &p.response_summary_id),
            ("ww.decision_summary_id", &p.decision_summary_id),
        ] {
            if let Some(raw) = raw {
                let values = parse_id_list(param_name(column), raw)?;
                if !values.is_empty() {
                    ids.push((column, values));
                }
            }
        }

        let mut texts = Vec::new();
        for (column, raw) in [
            ("c.locomotive_number", &p.locomotive_number),
            ("c.component_serial_number_old", &p.component_serial_number_old),
            ("c.element_serial_number_old", &p.element_serial_number_old),
            ("c.component_serial_number_new", &p.component_serial_number_new),
            ("c.element_serial_number_new", &p.element_serial_number_new),
            ("ww.notification_number", &p.notification_number),
            ("ww.re_notification_number", &p.re_notification_number),
            ("ww.response_letter_number", &p.response_letter_number),
            ("ww.claim_act_number", &p.claim_act_number),
            ("ww.work_completion_act_number", &p.work_completion_act_number),
        ] {
            if let Some(raw) = raw {
                let values = parse_text_list(raw);
                if !values.is_empty() {
                    texts.push((column, values));
                }
            }
        }
        if let Some(notes) = normalize_text(p.notes.as_deref()) {
            texts.push(("c.notes", vec![notes.to_string()]));
        }

        let dates = [
            ("ww.notification_date", p.notification_date),
            ("ww.re_notification_date", p.re_notification_date),
            ("ww.response_letter_date", p.response_letter_date),
            ("ww.claim_act_date", p.claim_act_date),
            ("ww.work_completion_act_date", p.work_completion_act_date),
        ]
        .into_iter()
        .filter_map(|(column, date)| date.map(|d| (column, d)))
        .collect();

        let statuses = match p.status.as_deref() {
            Some(raw) => parse_status_filter(&split_list_param(raw))?,
            None => Vec::new(),
        };

        Ok(Self {
            date_from: p.date_from,
            date_to: p.date_to,
            ids,
            texts,
            dates,
            statuses,
            page: Page::new(p.skip, p.limit)?,
        })
    }
}

/// Query parameter named after a qualified column.
fn param_name(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}
