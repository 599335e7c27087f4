//! Milestone catalog.
//!
//! Every shipment follows an ordered checklist chosen by its transport type
//! and direction. The lists are compiled in and never change at runtime.

pub mod catalog;
pub mod model;

pub use catalog::CATALOG_VERSION;
pub use model::{CatalogKey, CatalogSelection, Direction, Group, MilestoneDef, Stage, TransportType};

/// Catalog used when the transport type is not recognized.
pub const DEFAULT_CATALOG: CatalogKey = CatalogKey::AirExport;

impl CatalogKey {
    /// The ordered milestone list for this key.
    pub fn milestones(&self) -> &'static [MilestoneDef] {
        match self {
            Self::AirExport => catalog::AIR_EXPORT,
            Self::AirImport => catalog::AIR_IMPORT,
            Self::SeaExport => catalog::SEA_EXPORT,
            Self::SeaImport => catalog::SEA_IMPORT,
            Self::Truck => catalog::TRUCK,
        }
    }
}

/// Resolve the catalog for raw `transport_type` / direction values.
///
/// Unknown transport types select [`DEFAULT_CATALOG`] and set `fallback`,
/// so callers can report the row without blocking.
pub fn select_catalog(transport_type: &str, direction: &str) -> CatalogSelection {
    match TransportType::parse(transport_type) {
        Some(transport) => CatalogSelection {
            key: CatalogKey::for_mode(transport, Direction::parse(direction)),
            fallback: false,
        },
        None => CatalogSelection {
            key: DEFAULT_CATALOG,
            fallback: true,
        },
    }
}

/// The ordered milestone list for a shipment's transport type and direction.
pub fn get_milestones(transport_type: &str, direction: &str) -> &'static [MilestoneDef] {
    select_catalog(transport_type, direction).key.milestones()
}

/// Milestones of one group, in catalog order.
pub fn group_members(
    milestones: &'static [MilestoneDef],
    group: Group,
) -> impl Iterator<Item = &'static MilestoneDef> {
    milestones.iter().filter(move |m| m.group == group)
}

/// Look up a milestone by id within a list.
pub fn find_milestone(milestones: &[MilestoneDef], id: u32) -> Option<&MilestoneDef> {
    milestones.iter().find(|m| m.id == id)
}
