//! Traffic-light ("Ampel") derivation.
//!
//! Collapses a shipment's milestone checklist into three indicators, one
//! per leg. Derivation is a pure function of the completed set, the planned
//! dates and the date passed in as "today". Nothing here is persisted; the
//! lights are recomputed on every read.

pub mod completed;
pub mod model;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::milestone::{group_members, Group, MilestoneDef};
pub use completed::{encode_completed, parse_completed, CompletedSet, MilestoneProgress};
pub use model::{AmpelReport, AmpelRule, GroupProgress, Indicator, TrafficLights};

/// Planned dates of the three legs, already truncated to calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedDates {
    pub pickup: Option<NaiveDate>,
    pub main: Option<NaiveDate>,
    pub delivery: Option<NaiveDate>,
}

impl PlannedDates {
    /// Build from the raw `pickup_date` / `flight_departure` / `delivery_date` columns.
    /// Values that do not parse are treated as missing.
    pub fn from_raw(pickup: Option<&str>, main: Option<&str>, delivery: Option<&str>) -> Self {
        Self {
            pickup: pickup.and_then(parse_planned_date),
            main: main.and_then(parse_planned_date),
            delivery: delivery.and_then(parse_planned_date),
        }
    }

    /// The date that governs a group.
    pub fn for_group(&self, group: Group) -> Option<NaiveDate> {
        match group {
            Group::Abholung => self.pickup,
            Group::Carrier => self.main,
            Group::Zustellung => self.delivery,
        }
    }
}

/// Parse a stored date, discarding any time-of-day part.
///
/// Accepts ISO dates (`2024-03-01`), ISO timestamps (`2024-03-01T08:30:00Z`,
/// `2024-03-01 08:30:00`) and German dates (`01.03.2024`).
pub fn parse_planned_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%d.%m.%Y") {
            return Some(date);
        }
    }

    None
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Completion rule: none done is grey, some done is yellow, all done is green.
/// A group without catalog entries stays grey.
pub fn completion_indicator(completed: usize, total: usize) -> Indicator {
    if completed == 0 || total == 0 {
        Indicator::Grey
    } else if completed < total {
        Indicator::Yellow
    } else {
        Indicator::Green
    }
}

/// Schedule rule. Evaluated in order: not started is grey, started without a
/// planned date is green, started and past the date is red, otherwise green.
pub fn schedule_indicator(
    has_completed: bool,
    planned: Option<NaiveDate>,
    today: NaiveDate,
) -> Indicator {
    match planned {
        _ if !has_completed => Indicator::Grey,
        None => Indicator::Green,
        Some(date) if today > date => Indicator::Red,
        Some(_) => Indicator::Green,
    }
}

/// Derive the three indicators for one shipment.
///
/// `milestones` must be the catalog selected for the shipment's own
/// transport type and direction; IDs in `completed` that are not in it are
/// ignored.
pub fn derive(
    milestones: &'static [MilestoneDef],
    completed: &CompletedSet,
    dates: &PlannedDates,
    rule: AmpelRule,
    today: NaiveDate,
) -> AmpelReport {
    let mut lights = TrafficLights::ALL_GREY;
    let mut progress = Group::ALL.map(|group| GroupProgress {
        group,
        completed: 0,
        total: 0,
    });

    for group in Group::ALL {
        let (done, total) = group_members(milestones, group)
            .fold((0usize, 0usize), |(done, total), m| {
                (done + usize::from(completed.contains(&m.id)), total + 1)
            });

        let planned = dates.for_group(group);
        let indicator = match (rule, planned) {
            (AmpelRule::Completion, _) | (AmpelRule::Auto, None) => {
                completion_indicator(done, total)
            }
            (AmpelRule::Schedule, _) | (AmpelRule::Auto, Some(_)) => {
                schedule_indicator(done > 0, planned, today)
            }
        };

        lights.set(group, indicator);
        progress[model::group_index(group)] = GroupProgress {
            group,
            completed: done,
            total,
        };
    }

    AmpelReport { lights, progress }
}
