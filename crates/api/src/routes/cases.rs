//! Route definitions for the `/cases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{cases, warranty};
use crate::state::AppState;

/// Routes mounted at `/cases`.
///
/// ```text
/// GET    /                   -> list_cases (filters, skip/limit)
/// POST   /                   -> create_case
/// GET    /filter-options     -> filter_options
/// GET    /{id}               -> get_case
/// PATCH  /{id}               -> update_case
/// DELETE /{id}               -> delete_case
/// GET    /{id}/warranty      -> get_warranty
/// PATCH  /{id}/warranty      -> update_warranty
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cases::list_cases).post(cases::create_case))
        .route("/filter-options", get(cases::filter_options))
        .route(
            "/{id}",
            get(cases::get_case)
                .patch(cases::update_case)
                .delete(cases::delete_case),
        )
        .route(
            "/{id}/warranty",
            get(warranty::get_warranty).patch(warranty::update_warranty),
        )
}
