//! Equipment hierarchy model and DTOs.

use claimtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `equipment` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting equipment.
#[derive(Debug, Deserialize)]
pub struct CreateEquipment {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
}

/// An equipment node as shown in the cascading equipment pickers.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct EquipmentNode {
    pub id: DbId,
    pub name: String,
    /// Depth below the root of the node's hierarchy (roots are level 0).
    pub level: i32,
    pub has_children: bool,
    pub parent_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
}
