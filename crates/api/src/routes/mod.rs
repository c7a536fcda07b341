pub mod cases;
pub mod health;
pub mod references;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cases                                  list (filtered), create
/// /cases/filter-options                   drop-down options
/// /cases/{id}                             get, update, delete
/// /cases/{id}/warranty                    get, update
///
/// /references/equipment-by-level          equipment picker level
/// /references/equipment-chain/{id}        root-to-node equipment path
/// /references/{kind}                      list reference rows
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cases", cases::router())
        .nest("/references", references::router())
}
