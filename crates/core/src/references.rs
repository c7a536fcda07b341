//! Reference (lookup) tables used by repair cases and warranty work.

use serde::Serialize;

/// A whitelisted reference table. Only these can be listed through the
/// generic reference endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    RegionalCenters,
    LocomotiveModels,
    FaultDiscoveryPlaces,
    RepairTypes,
    RepairPerformers,
    EquipmentOwners,
    DestinationTypes,
    Suppliers,
    Malfunctions,
    NotificationSummaries,
    ResponseSummaries,
    DecisionSummaries,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 12] = [
        Self::RegionalCenters,
        Self::LocomotiveModels,
        Self::FaultDiscoveryPlaces,
        Self::RepairTypes,
        Self::RepairPerformers,
        Self::EquipmentOwners,
        Self::DestinationTypes,
        Self::Suppliers,
        Self::Malfunctions,
        Self::NotificationSummaries,
        Self::ResponseSummaries,
        Self::DecisionSummaries,
    ];

    /// URL slug, e.g. `regional-centers`.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::RegionalCenters => "regional-centers",
            Self::LocomotiveModels => "locomotive-models",
            Self::FaultDiscoveryPlaces => "fault-discovery-places",
            Self::RepairTypes => "repair-types",
            Self::RepairPerformers => "repair-performers",
            Self::EquipmentOwners => "equipment-owners",
            Self::DestinationTypes => "destination-types",
            Self::Suppliers => "suppliers",
            Self::Malfunctions => "malfunctions",
            Self::NotificationSummaries => "notification-summaries",
            Self::ResponseSummaries => "response-summaries",
            Self::DecisionSummaries => "decision-summaries",
        }
    }

    /// Parse a URL slug.
    pub fn from_slug(slug: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|k| k.slug() == slug)
            .ok_or_else(|| format!("Unknown reference kind '{slug}'"))
    }
}
