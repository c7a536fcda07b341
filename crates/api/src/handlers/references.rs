//! Handlers for reference (lookup) lists and the equipment pickers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use claimtrack_core::references::ReferenceKind;
use claimtrack_core::types::DbId;
use claimtrack_db::repositories::{EquipmentRepo, ReferenceRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Deepest level of the equipment hierarchy the pickers offer.
pub const MAX_EQUIPMENT_LEVEL: i32 = 4;

/// GET /references/{kind} -- list `{id, name}` rows of a reference table.
pub async fn list_references(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind = ReferenceKind::from_slug(&kind).map_err(AppError::BadRequest)?;
    let items = ReferenceRepo::list(&state.pool, kind).await?;
    Ok(Json(DataResponse { data: items }))
}

/// Query parameters for [`equipment_by_level`].
#[derive(Debug, Deserialize)]
pub struct EquipmentLevelParams {
    pub level: i32,
    pub parent_id: Option<DbId>,
    #[serde(default)]
    pub q: String,
}

/// GET /references/equipment-by-level -- equipment for one picker level.
///
/// Level 0 lists the roots. Deeper levels require `parent_id`.
pub async fn equipment_by_level(
    State(state): State<AppState>,
    Query(params): Query<EquipmentLevelParams>,
) -> AppResult<impl IntoResponse> {
    if !(0..=MAX_EQUIPMENT_LEVEL).contains(&params.level) {
        return Err(AppError::BadRequest(format!(
            "level must be between 0 and {MAX_EQUIPMENT_LEVEL}, got {}",
            params.level
        )));
    }
    if params.level > 0 && params.parent_id.unwrap_or(0) == 0 {
        return Err(AppError::BadRequest(
            "parent_id is required for levels above 0".into(),
        ));
    }

    let nodes =
        EquipmentRepo::list_by_level(&state.pool, params.level, params.parent_id, &params.q)
            .await?;
    Ok(Json(DataResponse { data: nodes }))
}

/// GET /references/equipment-chain/{id} -- the equipment path from the root
/// down to `id`, for pre-filling the pickers above a chosen node.
pub async fn equipment_chain(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let chain = EquipmentRepo::chain(&state.pool, id).await?;
    Ok(Json(DataResponse { data: chain }))
}
