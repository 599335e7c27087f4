//! Shipment domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ampel::{
    self, AmpelReport, AmpelRule, CompletedSet, GroupProgress, MilestoneProgress, PlannedDates,
    TrafficLights,
};
use crate::fields::first_non_empty;
use crate::milestone::{self, CatalogKey, Direction, Group, MilestoneDef, Stage};
use logistik_db::queries::shipments::ShipmentRow;

/// Workflow status of a shipment.
///
/// The first five are the quote/booking workflow. Anything after booking is
/// operational free text and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentStatus {
    /// Customer request, not yet quoted.
    Anfrage,
    /// Quote sent.
    Angebot,
    /// Quote accepted, shipment created.
    Created,
    /// Booked with the carrier.
    Booked,
    /// Rejected by customer or forwarder.
    Abgelehnt,
    /// Free-form downstream state.
    Other(String),
}

impl ShipmentStatus {
    /// Parse from string.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "ANFRAGE" | "REQUEST" => Self::Anfrage,
            "ANGEBOT" | "OFFER" | "QUOTE" => Self::Angebot,
            "CREATED" => Self::Created,
            "BOOKED" | "GEBUCHT" => Self::Booked,
            "ABGELEHNT" | "REJECTED" => Self::Abgelehnt,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Convert to the stored string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anfrage => "ANFRAGE",
            Self::Angebot => "ANGEBOT",
            Self::Created => "created",
            Self::Booked => "booked",
            Self::Abgelehnt => "ABGELEHNT",
            Self::Other(s) => s,
        }
    }

    /// Check if transition to another status is valid.
    pub fn can_transition_to(&self, to: &Self) -> bool {
        match (self, to) {
            // Same state is always valid
            (a, b) if a == b => true,
            (Self::Anfrage, Self::Angebot) => true,
            (Self::Anfrage | Self::Angebot, Self::Abgelehnt) => true,
            (Self::Angebot, Self::Created) => true,
            (Self::Created, Self::Booked) => true,
            // Rejected requests can be reopened
            (Self::Abgelehnt, Self::Anfrage) => true,
            // Operational states follow once the shipment exists
            (Self::Created | Self::Booked | Self::Other(_), Self::Other(s)) => !s.is_empty(),
            _ => false,
        }
    }
}

impl From<String> for ShipmentStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ShipmentStatus> for String {
    fn from(status: ShipmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Costs of the three legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegCosts {
    pub pickup: Option<f64>,
    pub main: Option<f64>,
    pub delivery: Option<f64>,
}

impl LegCosts {
    pub fn total(&self) -> f64 {
        [self.pickup, self.main, self.delivery]
            .iter()
            .flatten()
            .sum()
    }
}

/// Partners assigned to the three legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegPartners {
    pub pickup: Option<i64>,
    pub main: Option<i64>,
    pub delivery: Option<i64>,
}

/// A shipment with legacy aliases resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Shipment {
    pub id: i64,
    pub position: String,
    pub customer_id: Option<i64>,
    pub transport_type: String,
    pub direction: Direction,
    pub catalog: CatalogKey,
    pub status: ShipmentStatus,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub partners: LegPartners,
    pub costs: LegCosts,
    pub offer_price: Option<f64>,
    pub rejection_reason: Option<String>,
    pub milestone_progress: MilestoneProgress,
    pub pickup_date: Option<String>,
    pub flight_departure: Option<String>,
    pub delivery_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Shipment {
    /// Create a Shipment from a database row.
    pub fn from_row(row: ShipmentRow) -> Self {
        let direction = Direction::parse(
            first_non_empty([row.shipment_type.as_deref(), row.import_export.as_deref()])
                .unwrap_or("EXPORT"),
        );

        let selection = milestone::select_catalog(&row.transport_type, direction.as_str());
        if selection.fallback {
            tracing::warn!(
                shipment_id = row.id,
                transport_type = %row.transport_type,
                fallback = selection.key.as_str(),
                "Unknown transport type, using default milestone catalog"
            );
        }

        let costs = LegCosts {
            pickup: first_non_empty([row.pickup_cost, row.cost_pickup]),
            main: first_non_empty([row.main_cost, row.cost_main]),
            delivery: first_non_empty([row.delivery_cost, row.cost_delivery]),
        };

        let milestone_progress = MilestoneProgress::from_fields(
            row.completed_milestones.as_deref(),
            (row.pickup_milestone, row.carrier_milestone, row.delivery_milestone),
            row.current_milestone,
        );

        let position = row
            .position
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| format!("#{}", row.id));

        Self {
            id: row.id,
            position,
            customer_id: row.customer_id,
            transport_type: row.transport_type,
            direction,
            catalog: selection.key,
            status: ShipmentStatus::parse(&row.status),
            origin: row.origin,
            destination: row.destination,
            partners: LegPartners {
                pickup: row.pickup_partner_id,
                main: row.main_partner_id,
                delivery: row.delivery_partner_id,
            },
            costs,
            offer_price: row.offer_price,
            rejection_reason: row.rejection_reason,
            milestone_progress,
            pickup_date: row.pickup_date,
            flight_departure: row.flight_departure,
            delivery_date: row.delivery_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// The milestone list this shipment's IDs refer to.
    pub fn milestones(&self) -> &'static [MilestoneDef] {
        self.catalog.milestones()
    }

    /// Completed milestone IDs, whatever representation the row used.
    pub fn completed_ids(&self) -> CompletedSet {
        self.milestone_progress.completed_ids(self.milestones())
    }

    /// Planned dates, truncated to days.
    pub fn planned_dates(&self) -> PlannedDates {
        PlannedDates::from_raw(
            self.pickup_date.as_deref(),
            self.flight_departure.as_deref(),
            self.delivery_date.as_deref(),
        )
    }

    /// Derive the traffic lights as of `today`.
    pub fn ampel(&self, rule: AmpelRule, today: NaiveDate) -> AmpelReport {
        ampel::derive(
            self.milestones(),
            &self.completed_ids(),
            &self.planned_dates(),
            rule,
            today,
        )
    }

    /// Sum of all leg costs.
    pub fn total_cost(&self) -> f64 {
        self.costs.total()
    }

    /// Offer price minus costs, once an offer exists.
    pub fn margin(&self) -> Option<f64> {
        self.offer_price.map(|price| price - self.total_cost())
    }
}

/// One checklist line of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneCheck {
    pub id: u32,
    pub text: &'static str,
    pub group: Group,
    pub stage: Stage,
    pub done: bool,
}

/// A shipment together with its derived state, as served to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub lights: TrafficLights,
    pub groups: [GroupProgress; 3],
    pub milestones: Vec<MilestoneCheck>,
    pub total_cost: f64,
    pub margin: Option<f64>,
}

impl ShipmentView {
    /// Compute the view. Nothing is cached; call again after every write.
    pub fn new(shipment: Shipment, rule: AmpelRule, today: NaiveDate) -> Self {
        let completed = shipment.completed_ids();
        let report = ampel::derive(
            shipment.milestones(),
            &completed,
            &shipment.planned_dates(),
            rule,
            today,
        );

        let milestones = shipment
            .milestones()
            .iter()
            .map(|m| MilestoneCheck {
                id: m.id,
                text: m.text,
                group: m.group,
                stage: m.stage,
                done: completed.contains(&m.id),
            })
            .collect();

        Self {
            total_cost: shipment.total_cost(),
            margin: shipment.margin(),
            lights: report.lights,
            groups: report.progress,
            milestones,
            shipment,
        }
    }
}

/// Number of shipments in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    /// Shipments with at least one red indicator.
    pub late: usize,
}
