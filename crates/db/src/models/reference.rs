//! Reference (lookup) table rows.

use claimtrack_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from any reference table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferenceItem {
    pub id: DbId,
    pub name: String,
}

/// DTO for inserting a reference row.
#[derive(Debug, Deserialize)]
pub struct CreateReferenceItem {
    pub name: String,
}
