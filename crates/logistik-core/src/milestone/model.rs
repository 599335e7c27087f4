//! Milestone domain models.

use serde::{Deserialize, Serialize};

/// One of the three coarse indicator groups a milestone rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Pickup leg (Vorlauf).
    Abholung,
    /// Main carriage (Hauptlauf).
    Carrier,
    /// Delivery leg (Nachlauf).
    Zustellung,
}

impl Group {
    /// All groups in workflow order.
    pub const ALL: [Group; 3] = [Group::Abholung, Group::Carrier, Group::Zustellung];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abholung => "abholung",
            Self::Carrier => "carrier",
            Self::Zustellung => "zustellung",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle tag of a milestone. Only used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Start,
    Planned,
    Progress,
    Completed,
}

/// A catalog entry. IDs are 1-based and only unique within their own list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneDef {
    pub id: u32,
    pub text: &'static str,
    pub group: Group,
    pub stage: Stage,
}

impl MilestoneDef {
    pub(crate) const fn new(id: u32, text: &'static str, group: Group, stage: Stage) -> Self {
        Self {
            id,
            text,
            group,
            stage,
        }
    }
}

/// Transport mode of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportType {
    Air,
    Sea,
    Truck,
}

impl TransportType {
    /// Parse a transport type, tolerating the German synonyms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AIR" | "LUFT" | "LUFTFRACHT" => Some(Self::Air),
            "SEA" | "SEE" | "SEEFRACHT" => Some(Self::Sea),
            "TRUCK" | "LKW" => Some(Self::Truck),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Sea => "SEA",
            Self::Truck => "TRUCK",
        }
    }
}

/// Import/export direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Export,
    Import,
}

impl Direction {
    /// `IMPORT` (any case) is an import; everything else is an export.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("IMPORT") {
            Self::Import
        } else {
            Self::Export
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Export => "EXPORT",
            Self::Import => "IMPORT",
        }
    }
}

/// Identifies one of the five catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKey {
    #[serde(rename = "airExport")]
    AirExport,
    #[serde(rename = "airImport")]
    AirImport,
    #[serde(rename = "seaExport")]
    SeaExport,
    #[serde(rename = "seaImport")]
    SeaImport,
    #[serde(rename = "truck")]
    Truck,
}

impl CatalogKey {
    /// Catalog for a parsed transport type. Trucks ignore the direction.
    pub fn for_mode(transport: TransportType, direction: Direction) -> Self {
        match (transport, direction) {
            (TransportType::Air, Direction::Export) => Self::AirExport,
            (TransportType::Air, Direction::Import) => Self::AirImport,
            (TransportType::Sea, Direction::Export) => Self::SeaExport,
            (TransportType::Sea, Direction::Import) => Self::SeaImport,
            (TransportType::Truck, _) => Self::Truck,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirExport => "airExport",
            Self::AirImport => "airImport",
            Self::SeaExport => "seaExport",
            Self::SeaImport => "seaImport",
            Self::Truck => "truck",
        }
    }
}

/// Result of resolving a catalog from raw shipment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSelection {
    pub key: CatalogKey,
    /// True when the transport type was not recognized and the default list was used.
    pub fallback: bool,
}
