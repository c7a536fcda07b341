//! Repository for the reference (lookup) tables.

use claimtrack_core::references::ReferenceKind;
use sqlx::PgPool;

use crate::models::reference::{CreateReferenceItem, ReferenceItem};

/// Table backing each reference kind.
///
/// Table names are interpolated into SQL, so they only ever come from this
/// closed mapping.
pub fn table_name(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::RegionalCenters => "regional_centers",
        ReferenceKind::LocomotiveModels => "locomotive_models",
        ReferenceKind::FaultDiscoveryPlaces => "fault_discovery_places",
        ReferenceKind::RepairTypes => "repair_types",
        ReferenceKind::RepairPerformers => "repair_performers",
        ReferenceKind::EquipmentOwners => "equipment_owners",
        ReferenceKind::DestinationTypes => "destination_types",
        ReferenceKind::Suppliers => "suppliers",
        ReferenceKind::Malfunctions => "malfunctions",
        ReferenceKind::NotificationSummaries => "notification_summaries",
        ReferenceKind::ResponseSummaries => "response_summaries",
        ReferenceKind::DecisionSummaries => "decision_summaries",
    }
}

/// Provides read access to reference tables.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// List all rows of a reference table, ordered by name.
    pub async fn list(pool: &PgPool, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        let query = format!(
            "SELECT id, name FROM {} ORDER BY name, id",
            table_name(kind)
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert a reference row, returning it.
    pub async fn create(
        pool: &PgPool,
        kind: ReferenceKind,
        input: &CreateReferenceItem,
    ) -> Result<ReferenceItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            table_name(kind)
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}
