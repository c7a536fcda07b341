//! Handlers for the `/cases` resource.
//!
//! Every case returned here carries its computed status. Status is derived
//! in SQL from the shared decision table, so listing, filtering, and detail
//! views always agree.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use claimtrack_core::case_status::CaseStatus;
use claimtrack_core::error::CoreError;
use claimtrack_core::references::ReferenceKind;
use claimtrack_core::types::DbId;
use claimtrack_db::models::case::{CaseFilter, CaseListParams, CreateCase, UpdateCase};
use claimtrack_db::models::reference::ReferenceItem;
use claimtrack_db::repositories::{CaseRepo, EquipmentRepo, ReferenceRepo};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

const ENTITY: &str = "RepairCase";

// ---------------------------------------------------------------------------
// GET /cases
// ---------------------------------------------------------------------------

/// List cases matching the query filters, newest first.
pub async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<CaseListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = CaseFilter::try_from(params)?;

    let (cases, total) = tokio::try_join!(
        CaseRepo::list_filtered(&state.pool, &filter),
        CaseRepo::count_filtered(&state.pool, &filter),
    )?;

    Ok(Json(PageResponse::new(cases, total, filter.page)))
}

// ---------------------------------------------------------------------------
// POST /cases
// ---------------------------------------------------------------------------

/// Create a case together with its warranty-work record.
pub async fn create_case(
    State(state): State<AppState>,
    Json(input): Json<CreateCase>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let detail = CaseRepo::create(&state.pool, &input).await?;

    tracing::info!(
        case_id = detail.case.case.id,
        supplier_id = ?detail.case.case.supplier_id,
        status = %detail.case.status,
        "Repair case created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// GET /cases/{id}
// ---------------------------------------------------------------------------

/// Get a case with its status and warranty work.
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = CaseRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PATCH /cases/{id}
// ---------------------------------------------------------------------------

/// Partially update a case and, optionally, its warranty work.
pub async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCase>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let detail = CaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    tracing::info!(case_id = id, status = %detail.case.status, "Repair case updated");

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// DELETE /cases/{id}
// ---------------------------------------------------------------------------

/// Delete a case. Its warranty work is removed with it.
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CaseRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
    }

    tracing::info!(case_id = id, "Repair case deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /cases/filter-options
// ---------------------------------------------------------------------------

/// Options for the case list filter drop-downs.
///
/// `new_components` and `new_elements` feed the replacement-part pickers and
/// list the same equipment as `components` and `elements`.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub regional_centers: Vec<ReferenceItem>,
    pub locomotive_models: Vec<ReferenceItem>,
    pub components: Vec<ReferenceItem>,
    pub elements: Vec<ReferenceItem>,
    pub new_components: Vec<ReferenceItem>,
    pub new_elements: Vec<ReferenceItem>,
    pub malfunctions: Vec<ReferenceItem>,
    pub suppliers: Vec<ReferenceItem>,
    pub repair_types: Vec<ReferenceItem>,
    /// Selectable statuses, excluding the fallback label.
    pub statuses: Vec<CaseStatus>,
}

/// Return reference lists and the selectable status labels.
pub async fn filter_options(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let (
        regional_centers,
        locomotive_models,
        components,
        elements,
        malfunctions,
        suppliers,
        repair_types,
    ) = tokio::try_join!(
        ReferenceRepo::list(pool, ReferenceKind::RegionalCenters),
        ReferenceRepo::list(pool, ReferenceKind::LocomotiveModels),
        EquipmentRepo::list_components(pool),
        EquipmentRepo::list_elements(pool),
        ReferenceRepo::list(pool, ReferenceKind::Malfunctions),
        ReferenceRepo::list(pool, ReferenceKind::Suppliers),
        ReferenceRepo::list(pool, ReferenceKind::RepairTypes),
    )?;

    Ok(Json(DataResponse {
        data: FilterOptions {
            regional_centers,
            locomotive_models,
            new_components: components.clone(),
            new_elements: elements.clone(),
            components,
            elements,
            malfunctions,
            suppliers,
            repair_types,
            statuses: CaseStatus::FILTERABLE.to_vec(),
        },
    }))
}
