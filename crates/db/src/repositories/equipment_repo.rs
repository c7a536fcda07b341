//! Repository for the `equipment` hierarchy.

use claimtrack_core::presence::{normalize_id, trim_blank};
use claimtrack_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::equipment::{CreateEquipment, Equipment, EquipmentNode};
use crate::models::reference::ReferenceItem;

/// Column list for `equipment` queries.
const COLUMNS: &str = "id, name, parent_id, supplier_id, created_at, updated_at";

/// Walk `parent_id` upward from `$1`, including the starting node, and pick
/// the nearest supplier. `path` stops the walk on a cycle.
const NEAREST_SUPPLIER_QUERY: &str = "\
    WITH RECURSIVE chain AS ( \
        SELECT id, parent_id, supplier_id, 0 AS depth, ARRAY[id] AS path \
        FROM equipment \
        WHERE id = $1 \
        UNION ALL \
        SELECT e.id, e.parent_id, e.supplier_id, c.depth + 1, c.path || e.id \
        FROM equipment e \
        INNER JOIN chain c ON e.id = c.parent_id \
        WHERE c.supplier_id IS NULL AND NOT e.id = ANY(c.path) \
    ) \
    SELECT supplier_id FROM chain \
    WHERE supplier_id IS NOT NULL \
    ORDER BY depth \
    LIMIT 1";

/// The node `$1` and its ancestors, root first. `level` counts down from the
/// root; `path` stops the walk on a cycle.
const CHAIN_QUERY: &str = "\
    WITH RECURSIVE chain AS ( \
        SELECT id, name, parent_id, supplier_id, 0 AS depth, ARRAY[id] AS path \
        FROM equipment \
        WHERE id = $1 \
        UNION ALL \
        SELECT e.id, e.name, e.parent_id, e.supplier_id, c.depth + 1, c.path || e.id \
        FROM equipment e \
        INNER JOIN chain c ON e.id = c.parent_id \
        WHERE NOT e.id = ANY(c.path) \
    ) \
    SELECT c.id, c.name, \
        (MAX(c.depth) OVER () - c.depth)::int4 AS level, \
        EXISTS (SELECT 1 FROM equipment k WHERE k.parent_id = c.id) AS has_children, \
        c.parent_id, c.supplier_id \
    FROM chain c \
    ORDER BY c.depth DESC";

/// Provides access to equipment nodes and supplier resolution.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Insert an equipment node, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateEquipment) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment (name, parent_id, supplier_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(&input.name)
            .bind(input.parent_id)
            .bind(input.supplier_id)
            .fetch_one(pool)
            .await
    }

    /// Find an equipment node by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Top-level equipment (components) as `{id, name}` options.
    pub async fn list_components(pool: &PgPool) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        sqlx::query_as::<_, ReferenceItem>(
            "SELECT id, name FROM equipment WHERE parent_id IS NULL ORDER BY name, id",
        )
        .fetch_all(pool)
        .await
    }

    /// Non-root equipment (elements) as `{id, name}` options.
    pub async fn list_elements(pool: &PgPool) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        sqlx::query_as::<_, ReferenceItem>(
            "SELECT id, name FROM equipment WHERE parent_id IS NOT NULL ORDER BY name, id",
        )
        .fetch_all(pool)
        .await
    }

    /// Equipment offered at one level of the cascading picker, by name.
    ///
    /// Level 0 lists the roots and ignores `parent_id`. Deeper levels list
    /// the children of `parent_id`, or nothing without one. A non-blank
    /// `search` keeps names containing it, case-insensitively.
    pub async fn list_by_level(
        pool: &PgPool,
        level: i32,
        parent_id: Option<DbId>,
        search: &str,
    ) -> Result<Vec<EquipmentNode>, sqlx::Error> {
        let parent_id = if level == 0 { None } else { normalize_id(parent_id) };
        if level > 0 && parent_id.is_none() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, EquipmentNode>(
            "SELECT e.id, e.name, $1::int4 AS level, \
                EXISTS (SELECT 1 FROM equipment k WHERE k.parent_id = e.id) AS has_children, \
                e.parent_id, e.supplier_id \
             FROM equipment e \
             WHERE e.parent_id IS NOT DISTINCT FROM $2 \
               AND ($3 = '' OR e.name ILIKE '%' || $3 || '%') \
             ORDER BY e.name, e.id",
        )
        .bind(level)
        .bind(parent_id)
        .bind(trim_blank(search))
        .fetch_all(pool)
        .await
    }

    /// The path from the root of `equipment_id`'s hierarchy down to it.
    ///
    /// Empty when the node does not exist.
    pub async fn chain(pool: &PgPool, equipment_id: DbId) -> Result<Vec<EquipmentNode>, sqlx::Error> {
        sqlx::query_as::<_, EquipmentNode>(CHAIN_QUERY)
            .bind(equipment_id)
            .fetch_all(pool)
            .await
    }

    /// Re-parent an equipment node. Returns `true` if the node exists.
    pub async fn set_parent(
        pool: &PgPool,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE equipment SET parent_id = $2 WHERE id = $1")
            .bind(id)
            .bind(parent_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Nearest supplier of `equipment_id` or any of its ancestors.
    ///
    /// Returns `None` when neither the node nor its ancestors name a
    /// supplier, or when the node does not exist.
    pub async fn find_supplier_in_parents(
        pool: &PgPool,
        equipment_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_supplier_inner(&mut conn, equipment_id).await
    }

    pub(crate) async fn find_supplier_inner(
        conn: &mut PgConnection,
        equipment_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(NEAREST_SUPPLIER_QUERY)
            .bind(equipment_id)
            .fetch_optional(&mut *conn)
            .await
    }
}
