//! Completed-milestone sets and the persisted progress encodings.
//!
//! Rows carry progress in one of three shapes: a serialized ID set, three
//! per-group counters, or a single global index. All of them reduce to a
//! set of IDs scoped to the shipment's own catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::milestone::{group_members, Group, MilestoneDef};

/// Milestone IDs marked done, scoped to one catalog list.
pub type CompletedSet = BTreeSet<u32>;

/// Parse a serialized completed-milestone set.
///
/// Accepts `[1,2]`, `{1,2}`, `"1","2"` and similar. Brackets, braces and
/// quotes are stripped, the rest is split on commas, and tokens that are not
/// positive integers are dropped. Never fails.
pub fn parse_completed(raw: &str) -> CompletedSet {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '{' | '}' | '"' | '\''))
        .collect();

    cleaned
        .split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .filter(|id| *id > 0)
        .collect()
}

/// Canonical encoding written back to the database: `[1,2,3]`.
pub fn encode_completed(set: &CompletedSet) -> String {
    let ids: Vec<String> = set.iter().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(","))
}

/// Progress as it was found on the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MilestoneProgress {
    /// Explicit ID set (`completed_milestones`).
    Completed { ids: CompletedSet },
    /// First n milestones of each group are done.
    PerGroup {
        pickup: Option<i64>,
        carrier: Option<i64>,
        delivery: Option<i64>,
    },
    /// Every milestone up to and including this global index is done.
    Current { index: i64 },
    /// Nothing recorded.
    None,
}

impl MilestoneProgress {
    /// Pick the populated representation.
    ///
    /// Precedence: a non-blank `completed_milestones` string, then any
    /// per-group counter, then `current_milestone`. A present but malformed
    /// string still wins and yields an empty set.
    pub fn from_fields(
        completed_milestones: Option<&str>,
        per_group: (Option<i64>, Option<i64>, Option<i64>),
        current_milestone: Option<i64>,
    ) -> Self {
        if let Some(raw) = completed_milestones.filter(|s| !s.trim().is_empty()) {
            return Self::Completed {
                ids: parse_completed(raw),
            };
        }

        let (pickup, carrier, delivery) = per_group;
        if pickup.is_some() || carrier.is_some() || delivery.is_some() {
            return Self::PerGroup {
                pickup,
                carrier,
                delivery,
            };
        }

        match current_milestone {
            Some(index) => Self::Current { index },
            None => Self::None,
        }
    }

    /// Resolve to an ID set against the shipment's own catalog.
    pub fn completed_ids(&self, milestones: &'static [MilestoneDef]) -> CompletedSet {
        match self {
            Self::Completed { ids } => ids.clone(),
            Self::PerGroup {
                pickup,
                carrier,
                delivery,
            } => {
                let mut ids = CompletedSet::new();
                for (group, count) in [
                    (Group::Abholung, pickup),
                    (Group::Carrier, carrier),
                    (Group::Zustellung, delivery),
                ] {
                    let take = count.unwrap_or(0).max(0) as usize;
                    ids.extend(group_members(milestones, group).take(take).map(|m| m.id));
                }
                ids
            }
            Self::Current { index } => milestones
                .iter()
                .filter(|m| i64::from(m.id) <= *index)
                .map(|m| m.id)
                .collect(),
            Self::None => CompletedSet::new(),
        }
    }
}
