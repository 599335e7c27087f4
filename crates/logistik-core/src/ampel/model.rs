//! Traffic-light models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::milestone::Group;

/// Colour of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// Not started.
    Grey,
    /// Partially done.
    Yellow,
    /// Complete or on schedule.
    Green,
    /// Late.
    Red,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Red => "red",
        }
    }
}

/// Which rule turns milestone progress into colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmpelRule {
    /// Completed/total per group. Never red.
    Completion,
    /// Started-and-late check against the group's planned date.
    Schedule,
    /// `Schedule` for groups with a planned date, `Completion` otherwise.
    #[default]
    Auto,
}

impl AmpelRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Schedule => "schedule",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for AmpelRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completion" | "count" => Ok(Self::Completion),
            "schedule" | "date" => Ok(Self::Schedule),
            "auto" => Ok(Self::Auto),
            other => Err(format!(
                "unknown ampel rule '{}' (expected completion, schedule or auto)",
                other
            )),
        }
    }
}

/// The three indicators of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLights {
    pub abholung: Indicator,
    pub carrier: Indicator,
    pub zustellung: Indicator,
}

impl TrafficLights {
    pub const ALL_GREY: Self = Self {
        abholung: Indicator::Grey,
        carrier: Indicator::Grey,
        zustellung: Indicator::Grey,
    };

    pub fn get(&self, group: Group) -> Indicator {
        match group {
            Group::Abholung => self.abholung,
            Group::Carrier => self.carrier,
            Group::Zustellung => self.zustellung,
        }
    }

    pub(crate) fn set(&mut self, group: Group, indicator: Indicator) {
        match group {
            Group::Abholung => self.abholung = indicator,
            Group::Carrier => self.carrier = indicator,
            Group::Zustellung => self.zustellung = indicator,
        }
    }

    /// True if any indicator is red.
    pub fn any_late(&self) -> bool {
        Group::ALL.iter().any(|g| self.get(*g) == Indicator::Red)
    }
}

/// Raw completion counts for one group.
///
/// Green alone cannot tell "complete" from "started and on schedule";
/// these counts can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProgress {
    pub group: Group,
    pub completed: usize,
    pub total: usize,
}

impl GroupProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Full result of a derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpelReport {
    pub lights: TrafficLights,
    pub progress: [GroupProgress; 3],
}

impl AmpelReport {
    pub fn progress_of(&self, group: Group) -> GroupProgress {
        self.progress[group_index(group)]
    }
}

pub(crate) fn group_index(group: Group) -> usize {
    match group {
        Group::Abholung => 0,
        Group::Carrier => 1,
        Group::Zustellung => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_parsing() {
        assert_eq!("completion".parse::<AmpelRule>().unwrap(), AmpelRule::Completion);
        assert_eq!(" Schedule ".parse::<AmpelRule>().unwrap(), AmpelRule::Schedule);
        assert_eq!("AUTO".parse::<AmpelRule>().unwrap(), AmpelRule::Auto);
        assert!("fastest".parse::<AmpelRule>().is_err());
        assert_eq!(AmpelRule::default(), AmpelRule::Auto);
    }

    #[test]
    fn test_indicator_serializes_lowercase() {
        let json = serde_json::to_string(&TrafficLights {
            abholung: Indicator::Green,
            carrier: Indicator::Red,
            zustellung: Indicator::Grey,
        })
        .unwrap();
        assert_eq!(json, r#"{"abholung":"green","carrier":"red","zustellung":"grey"}"#);
    }

    #[test]
    fn test_any_late() {
        let mut lights = TrafficLights::ALL_GREY;
        assert!(!lights.any_late());
        lights.set(Group::Zustellung, Indicator::Red);
        assert!(lights.any_late());
    }
}
