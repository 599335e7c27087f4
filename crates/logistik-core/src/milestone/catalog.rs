//! Canonical milestone lists.
//!
//! Bump [`CATALOG_VERSION`] whenever an entry is added, removed or
//! renumbered: persisted milestone IDs are only valid against the version
//! they were written with.

use super::model::{Group::*, MilestoneDef as M, Stage::*};

/// Version of the catalog tables below.
pub const CATALOG_VERSION: u32 = 2;

pub(crate) const AIR_EXPORT: &[M] = &[
    M::new(1, "Abholauftrag erteilt", Abholung, Start),
    M::new(2, "Ware abgeholt", Abholung, Progress),
    M::new(3, "Anlieferung Lager", Abholung, Completed),
    M::new(4, "Buchung bei Airline bestätigt", Carrier, Planned),
    M::new(5, "Exportabfertigung erledigt", Carrier, Progress),
    M::new(6, "An Airline übergeben", Carrier, Progress),
    M::new(7, "Abflug", Carrier, Progress),
    M::new(8, "Ankunft Zielflughafen", Carrier, Completed),
    M::new(9, "Zustellung beauftragt", Zustellung, Planned),
    M::new(10, "Zugestellt", Zustellung, Completed),
];

pub(crate) const AIR_IMPORT: &[M] = &[
    M::new(1, "Vorabinformation erhalten", Abholung, Start),
    M::new(2, "Abholung beim Versender", Abholung, Progress),
    M::new(3, "Anlieferung Abflughafen", Abholung, Completed),
    M::new(4, "Abflug", Carrier, Progress),
    M::new(5, "Ankunft Zielflughafen", Carrier, Progress),
    M::new(6, "Importverzollung erledigt", Carrier, Progress),
    M::new(7, "Ware freigestellt", Carrier, Completed),
    M::new(8, "Zustellung beauftragt", Zustellung, Planned),
    M::new(9, "Ware in Zustellung", Zustellung, Progress),
    M::new(10, "Zugestellt", Zustellung, Completed),
];

pub(crate) const SEA_EXPORT: &[M] = &[
    M::new(1, "Abholauftrag erteilt", Abholung, Start),
    M::new(2, "Container gestellt und beladen", Abholung, Progress),
    M::new(3, "Anlieferung Terminal", Abholung, Completed),
    M::new(4, "Buchung bei Reederei bestätigt", Carrier, Planned),
    M::new(5, "Exportabfertigung erledigt", Carrier, Progress),
    M::new(6, "Schiff abgefahren", Carrier, Progress),
    M::new(7, "Ankunft Zielhafen", Carrier, Completed),
    M::new(8, "Zugestellt", Zustellung, Completed),
];

pub(crate) const SEA_IMPORT: &[M] = &[
    M::new(1, "Vorabinformation erhalten", Abholung, Start),
    M::new(2, "Abholung beim Versender", Abholung, Progress),
    M::new(3, "Anlieferung Terminal", Abholung, Progress),
    M::new(4, "Container verladen", Abholung, Completed),
    M::new(5, "Schiff abgefahren", Carrier, Progress),
    M::new(6, "Ankunft Zielhafen", Carrier, Progress),
    M::new(7, "Importverzollung erledigt", Carrier, Progress),
    M::new(8, "Container freigestellt", Carrier, Completed),
    M::new(9, "Zustellung beauftragt", Zustellung, Planned),
    M::new(10, "Container zugestellt", Zustellung, Progress),
    M::new(11, "Leercontainer retourniert", Zustellung, Completed),
];

pub(crate) const TRUCK: &[M] = &[
    M::new(1, "Abholauftrag erteilt", Abholung, Start),
    M::new(2, "Ware abgeholt", Abholung, Completed),
    M::new(3, "In Zustellung", Zustellung, Progress),
    M::new(4, "Zugestellt", Zustellung, Completed),
];
