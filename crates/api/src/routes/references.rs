//! Route definitions for the `/references` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::references;
use crate::state::AppState;

/// Routes mounted at `/references`.
///
/// ```text
/// GET    /equipment-by-level       -> equipment_by_level (level, parent_id, q)
/// GET    /equipment-chain/{id}     -> equipment_chain
/// GET    /{kind}                   -> list_references
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/equipment-by-level", get(references::equipment_by_level))
        .route("/equipment-chain/{id}", get(references::equipment_chain))
        .route("/{kind}", get(references::list_references))
}
