//! Handlers for the warranty work of a case (`/cases/{id}/warranty`).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use claimtrack_core::case_status::CaseStatus;
use claimtrack_core::error::CoreError;
use claimtrack_core::status_engine::compute_status;
use claimtrack_core::types::{Date, DbId};
use claimtrack_db::models::warranty_work::{UpdateWarrantyWork, WarrantyWork};
use claimtrack_db::repositories::WarrantyWorkRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "WarrantyWork";

/// Warranty work together with the status it implies today.
#[derive(Debug, Serialize)]
pub struct WarrantyWorkWithStatus {
    #[serde(flatten)]
    pub warranty_work: WarrantyWork,
    pub status: CaseStatus,
}

impl WarrantyWorkWithStatus {
    /// Evaluate the status as of `today`, which must be the database's
    /// `CURRENT_DATE` so this agrees with the status on the case itself.
    pub fn new(warranty_work: WarrantyWork, today: Date) -> Self {
        let status = compute_status(&warranty_work.status_input(), today);
        Self {
            warranty_work,
            status,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /cases/{id}/warranty
// ---------------------------------------------------------------------------

/// Get the warranty work of a case.
pub async fn get_warranty(
    State(state): State<AppState>,
    Path(case_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let warranty_work = WarrantyWorkRepo::find_by_case_id(&state.pool, case_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ENTITY,
            id: case_id,
        }))?;

    let today = claimtrack_db::current_date(&state.pool).await?;

    Ok(Json(DataResponse {
        data: WarrantyWorkWithStatus::new(warranty_work, today),
    }))
}

// ---------------------------------------------------------------------------
// PATCH /cases/{id}/warranty
// ---------------------------------------------------------------------------

/// Partially update the warranty work of a case.
///
/// Omitted fields keep their value; `0` ids and blank numbers clear them.
pub async fn update_warranty(
    State(state): State<AppState>,
    Path(case_id): Path<DbId>,
    Json(input): Json<UpdateWarrantyWork>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let warranty_work = WarrantyWorkRepo::update_by_case_id(&state.pool, case_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ENTITY,
            id: case_id,
        }))?;

    let today = claimtrack_db::current_date(&state.pool).await?;
    let data = WarrantyWorkWithStatus::new(warranty_work, today);
    tracing::info!(case_id, status = %data.status, "Warranty work updated");

    Ok(Json(DataResponse { data }))
}
