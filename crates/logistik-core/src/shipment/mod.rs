//! Shipment workflow: requests, quotes, bookings, milestones and costs.

pub mod model;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ampel::{self, encode_completed, parse_planned_date, AmpelRule};
use crate::error::{LogistikError, LogistikResult};
use crate::milestone::{find_milestone, Direction, TransportType};
use logistik_db::queries::shipments::{self as queries, NewShipmentRow};
use logistik_db::queries::{customers, partners};
use logistik_db::{DbError, DbPool};
use model::{LegCosts, LegPartners, Overview, Shipment, ShipmentStatus, ShipmentView, StatusCount};

/// Input for a new shipment request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewShipment {
    pub customer_id: Option<i64>,
    pub transport_type: String,
    /// `IMPORT` or `EXPORT`; anything else is treated as export.
    #[serde(default, alias = "importExport", alias = "shipment_type")]
    pub direction: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub pickup_date: Option<String>,
    pub flight_departure: Option<String>,
    pub delivery_date: Option<String>,
}

/// Map a row-level not-found to the typed shipment error.
fn not_found(id: i64) -> impl Fn(DbError) -> LogistikError {
    move |e| match e {
        DbError::NotFound(_) => LogistikError::ShipmentNotFound(id),
        e => LogistikError::Database(e),
    }
}

fn validate_date(field: &str, value: Option<&str>) -> LogistikResult<()> {
    match value {
        Some(raw) if !raw.trim().is_empty() && parse_planned_date(raw).is_none() => Err(
            LogistikError::validation(format!("{} is not a date: '{}'", field, raw)),
        ),
        _ => Ok(()),
    }
}

/// Blank strings from forms are stored as NULL.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Position code shown to customers, e.g. `LP-2024-00042`.
pub fn position_code(year: i32, id: i64) -> String {
    format!("LP-{}-{:05}", year, id)
}

/// Create a new shipment request (status ANFRAGE).
pub fn create_request(pool: &DbPool, new: &NewShipment) -> LogistikResult<Shipment> {
    let transport = TransportType::parse(&new.transport_type).ok_or_else(|| {
        LogistikError::validation(format!(
            "Unknown transport type '{}'. Valid: AIR, SEA, TRUCK",
            new.transport_type
        ))
    })?;
    let direction = Direction::parse(new.direction.as_deref().unwrap_or("EXPORT"));

    if let Some(customer_id) = new.customer_id {
        customers::get_customer(pool, customer_id).map_err(|e| match e {
            DbError::NotFound(_) => LogistikError::CustomerNotFound(customer_id),
            e => LogistikError::Database(e),
        })?;
    }

    validate_date("pickup_date", new.pickup_date.as_deref())?;
    validate_date("flight_departure", new.flight_departure.as_deref())?;
    validate_date("delivery_date", new.delivery_date.as_deref())?;

    let id = queries::insert_shipment(
        pool,
        &NewShipmentRow {
            customer_id: new.customer_id,
            transport_type: transport.as_str(),
            shipment_type: direction.as_str(),
            status: ShipmentStatus::Anfrage.as_str(),
            origin: non_blank(new.origin.as_deref()),
            destination: non_blank(new.destination.as_deref()),
            pickup_date: non_blank(new.pickup_date.as_deref()),
            flight_departure: non_blank(new.flight_departure.as_deref()),
            delivery_date: non_blank(new.delivery_date.as_deref()),
        },
    )?;

    let position = position_code(ampel::today().year(), id);
    queries::update_position(pool, id, &position)?;

    info!(
        shipment_id = id,
        position = %position,
        transport = transport.as_str(),
        direction = direction.as_str(),
        "Created shipment request"
    );

    get_shipment(pool, id)
}

/// Get a shipment by ID.
pub fn get_shipment(pool: &DbPool, id: i64) -> LogistikResult<Shipment> {
    let row = queries::get_shipment(pool, id).map_err(not_found(id))?;
    Ok(Shipment::from_row(row))
}

/// List shipments, optionally restricted to one status.
pub fn list_shipments(pool: &DbPool, status: Option<&ShipmentStatus>) -> LogistikResult<Vec<Shipment>> {
    let rows = queries::list_shipments(pool, status.map(|s| s.as_str()))?;
    Ok(rows.into_iter().map(Shipment::from_row).collect())
}

/// List all shipments of one customer.
pub fn list_customer_shipments(pool: &DbPool, customer_id: i64) -> LogistikResult<Vec<Shipment>> {
    let rows = queries::list_shipments_by_customer(pool, customer_id)?;
    Ok(rows.into_iter().map(Shipment::from_row).collect())
}

/// A shipment with freshly derived traffic lights.
pub fn get_shipment_view(pool: &DbPool, id: i64, rule: AmpelRule) -> LogistikResult<ShipmentView> {
    let shipment = get_shipment(pool, id)?;
    Ok(ShipmentView::new(shipment, rule, ampel::today()))
}

/// All shipments with freshly derived traffic lights.
pub fn list_shipment_views(
    pool: &DbPool,
    status: Option<&ShipmentStatus>,
    rule: AmpelRule,
) -> LogistikResult<Vec<ShipmentView>> {
    let today = ampel::today();
    Ok(list_shipments(pool, status)?
        .into_iter()
        .map(|s| ShipmentView::new(s, rule, today))
        .collect())
}

/// Move a shipment to a new status after checking the transition.
pub fn move_shipment(pool: &DbPool, id: i64, target: &ShipmentStatus) -> LogistikResult<Shipment> {
    let shipment = get_shipment(pool, id)?;
    ensure_transition(&shipment, target)?;

    queries::update_status(pool, id, target.as_str()).map_err(not_found(id))?;
    info!(shipment_id = id, from = %shipment.status, to = %target, "Moved shipment");
    get_shipment(pool, id)
}

fn ensure_transition(shipment: &Shipment, target: &ShipmentStatus) -> LogistikResult<()> {
    if shipment.status.can_transition_to(target) {
        Ok(())
    } else {
        Err(LogistikError::InvalidStateTransition {
            from: shipment.status.to_string(),
            to: target.to_string(),
        })
    }
}

/// Quote a request: stores the price and moves it to ANGEBOT.
pub fn create_offer(pool: &DbPool, id: i64, price: f64) -> LogistikResult<Shipment> {
    if !price.is_finite() || price <= 0.0 {
        return Err(LogistikError::validation("Offer price must be a positive amount"));
    }

    let shipment = get_shipment(pool, id)?;
    ensure_transition(&shipment, &ShipmentStatus::Angebot)?;

    queries::update_offer(pool, id, price, ShipmentStatus::Angebot.as_str()).map_err(not_found(id))?;
    info!(shipment_id = id, price, "Offer created");
    get_shipment(pool, id)
}

/// Customer accepted the quote.
pub fn accept_offer(pool: &DbPool, id: i64) -> LogistikResult<Shipment> {
    move_shipment(pool, id, &ShipmentStatus::Created)
}

/// Quote or request rejected.
pub fn reject_offer(pool: &DbPool, id: i64, reason: Option<&str>) -> LogistikResult<Shipment> {
    let shipment = get_shipment(pool, id)?;
    ensure_transition(&shipment, &ShipmentStatus::Abgelehnt)?;

    queries::update_rejection(pool, id, non_blank(reason), ShipmentStatus::Abgelehnt.as_str())
        .map_err(not_found(id))?;
    info!(shipment_id = id, reason = reason.unwrap_or(""), "Offer rejected");
    get_shipment(pool, id)
}

/// Booked with the carrier.
pub fn book(pool: &DbPool, id: i64) -> LogistikResult<Shipment> {
    move_shipment(pool, id, &ShipmentStatus::Booked)
}

/// Replace the leg costs.
pub fn update_costs(pool: &DbPool, id: i64, costs: LegCosts) -> LogistikResult<Shipment> {
    for (leg, value) in [("pickup", costs.pickup), ("main", costs.main), ("delivery", costs.delivery)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(LogistikError::validation(format!(
                    "{} cost must be a non-negative amount",
                    leg
                )));
            }
        }
    }

    queries::update_costs(pool, id, costs.pickup, costs.main, costs.delivery).map_err(not_found(id))?;
    debug!(shipment_id = id, total = costs.total(), "Updated costs");
    get_shipment(pool, id)
}

/// Replace the planned dates of all three legs.
pub fn update_dates(
    pool: &DbPool,
    id: i64,
    pickup_date: Option<&str>,
    flight_departure: Option<&str>,
    delivery_date: Option<&str>,
) -> LogistikResult<Shipment> {
    validate_date("pickup_date", pickup_date)?;
    validate_date("flight_departure", flight_departure)?;
    validate_date("delivery_date", delivery_date)?;

    queries::update_dates(
        pool,
        id,
        non_blank(pickup_date),
        non_blank(flight_departure),
        non_blank(delivery_date),
    )
    .map_err(not_found(id))?;
    debug!(shipment_id = id, "Updated planned dates");
    get_shipment(pool, id)
}

/// Assign partners to the legs. Every referenced partner must exist.
pub fn assign_partners(pool: &DbPool, id: i64, legs: LegPartners) -> LogistikResult<Shipment> {
    for partner_id in [legs.pickup, legs.main, legs.delivery].into_iter().flatten() {
        partners::get_partner(pool, partner_id).map_err(|e| match e {
            DbError::NotFound(_) => LogistikError::PartnerNotFound(partner_id),
            e => LogistikError::Database(e),
        })?;
    }

    queries::update_partners(pool, id, legs.pickup, legs.main, legs.delivery).map_err(not_found(id))?;
    debug!(shipment_id = id, ?legs, "Assigned partners");
    get_shipment(pool, id)
}

/// Mark a milestone done.
///
/// The id is checked against the shipment's own catalog. Progress is always
/// written back as `completed_milestones`, which also migrates rows that
/// still carry the older counter columns.
pub fn complete_milestone(pool: &DbPool, id: i64, milestone_id: u32) -> LogistikResult<Shipment> {
    set_milestone(pool, id, milestone_id, true)
}

/// Undo a completed milestone.
pub fn reopen_milestone(pool: &DbPool, id: i64, milestone_id: u32) -> LogistikResult<Shipment> {
    set_milestone(pool, id, milestone_id, false)
}

fn set_milestone(pool: &DbPool, id: i64, milestone_id: u32, done: bool) -> LogistikResult<Shipment> {
    let shipment = get_shipment(pool, id)?;
    let milestone = find_milestone(shipment.milestones(), milestone_id).ok_or_else(|| {
        LogistikError::UnknownMilestone {
            milestone: milestone_id,
            catalog: shipment.catalog.as_str().to_string(),
        }
    })?;

    let mut completed = shipment.completed_ids();
    if done {
        completed.insert(milestone_id);
    } else {
        completed.remove(&milestone_id);
    }

    queries::update_completed_milestones(pool, id, &encode_completed(&completed))
        .map_err(not_found(id))?;
    info!(
        shipment_id = id,
        milestone = milestone_id,
        text = milestone.text,
        group = %milestone.group,
        done,
        "Milestone updated"
    );
    get_shipment(pool, id)
}

/// Delete a shipment.
pub fn delete_shipment(pool: &DbPool, id: i64) -> LogistikResult<()> {
    queries::delete_shipment(pool, id).map_err(not_found(id))?;
    info!(shipment_id = id, "Deleted shipment");
    Ok(())
}

/// Dashboard summary as of `today`.
pub fn overview_at(pool: &DbPool, rule: AmpelRule, today: NaiveDate) -> LogistikResult<Overview> {
    let by_status: Vec<StatusCount> = queries::count_by_status(pool)?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    let total = by_status.iter().map(|s| s.count).sum();

    let late = list_shipments(pool, None)?
        .iter()
        .filter(|s| s.ampel(rule, today).lights.any_late())
        .count();

    Ok(Overview {
        total,
        by_status,
        late,
    })
}

/// Dashboard summary as of today.
pub fn overview(pool: &DbPool, rule: AmpelRule) -> LogistikResult<Overview> {
    overview_at(pool, rule, ampel::today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ampel::Indicator;
    use crate::milestone::CatalogKey;
    use logistik_db::init_memory_pool;

    fn air_export() -> NewShipment {
        NewShipment {
            transport_type: "AIR".to_string(),
            direction: Some("EXPORT".to_string()),
            origin: Some("Frankfurt".to_string()),
            destination: Some("Shanghai".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_request() {
        let pool = init_memory_pool().unwrap();
        let shipment = create_request(&pool, &air_export()).unwrap();

        assert_eq!(shipment.status, ShipmentStatus::Anfrage);
        assert_eq!(shipment.catalog, CatalogKey::AirExport);
        assert!(shipment.position.starts_with("LP-"));
        assert!(shipment.position.ends_with(&format!("{:05}", shipment.id)));
    }

    #[test]
    fn test_create_request_normalizes_synonyms() {
        let pool = init_memory_pool().unwrap();
        let shipment = create_request(
            &pool,
            &NewShipment {
                transport_type: "seefracht".to_string(),
                direction: Some("import".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(shipment.transport_type, "SEA");
        assert_eq!(shipment.catalog, CatalogKey::SeaImport);
    }

    #[test]
    fn test_create_request_rejects_bad_input() {
        let pool = init_memory_pool().unwrap();

        let err = create_request(
            &pool,
            &NewShipment {
                transport_type: "RAIL".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogistikError::ValidationError(_)));

        let err = create_request(
            &pool,
            &NewShipment {
                customer_id: Some(99),
                ..air_export()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogistikError::CustomerNotFound(99)));

        let err = create_request(
            &pool,
            &NewShipment {
                pickup_date: Some("tomorrow".to_string()),
                ..air_export()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogistikError::ValidationError(_)));
    }

    #[test]
    fn test_quote_workflow() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;

        let err = accept_offer(&pool, id).unwrap_err();
        assert!(matches!(err, LogistikError::InvalidStateTransition { .. }));

        assert!(create_offer(&pool, id, 0.0).is_err());
        let quoted = create_offer(&pool, id, 2450.0).unwrap();
        assert_eq!(quoted.status, ShipmentStatus::Angebot);
        assert_eq!(quoted.offer_price, Some(2450.0));

        let created = accept_offer(&pool, id).unwrap();
        assert_eq!(created.status, ShipmentStatus::Created);

        let booked = book(&pool, id).unwrap();
        assert_eq!(booked.status, ShipmentStatus::Booked);

        let customs = move_shipment(&pool, id, &ShipmentStatus::parse("Zoll")).unwrap();
        assert_eq!(customs.status.as_str(), "Zoll");
    }

    #[test]
    fn test_reject_offer() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;
        create_offer(&pool, id, 900.0).unwrap();

        let rejected = reject_offer(&pool, id, Some("Preis zu hoch")).unwrap();
        assert_eq!(rejected.status, ShipmentStatus::Abgelehnt);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Preis zu hoch"));

        assert!(book(&pool, id).is_err());
    }

    #[test]
    fn test_missing_shipment() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(get_shipment(&pool, 5), Err(LogistikError::ShipmentNotFound(5))));
        assert!(matches!(
            update_costs(&pool, 5, LegCosts::default()),
            Err(LogistikError::ShipmentNotFound(5))
        ));
        assert!(matches!(delete_shipment(&pool, 5), Err(LogistikError::ShipmentNotFound(5))));
    }

    #[test]
    fn test_update_costs_and_margin() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;
        create_offer(&pool, id, 1000.0).unwrap();

        let shipment = update_costs(
            &pool,
            id,
            LegCosts {
                pickup: Some(120.0),
                main: Some(640.0),
                delivery: None,
            },
        )
        .unwrap();
        assert_eq!(shipment.total_cost(), 760.0);
        assert_eq!(shipment.margin(), Some(240.0));

        let err = update_costs(
            &pool,
            id,
            LegCosts {
                pickup: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogistikError::ValidationError(_)));
    }

    #[test]
    fn test_complete_and_reopen_milestone() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;

        complete_milestone(&pool, id, 1).unwrap();
        let shipment = complete_milestone(&pool, id, 4).unwrap();
        assert_eq!(shipment.completed_ids().into_iter().collect::<Vec<_>>(), vec![1, 4]);

        let shipment = reopen_milestone(&pool, id, 1).unwrap();
        assert_eq!(shipment.completed_ids().into_iter().collect::<Vec<_>>(), vec![4]);

        let err = complete_milestone(&pool, id, 11).unwrap_err();
        assert!(matches!(err, LogistikError::UnknownMilestone { milestone: 11, .. }));
    }

    #[test]
    fn test_milestone_write_migrates_legacy_progress() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;
        pool.with_conn(|conn| {
            conn.execute(
                "UPDATE shipments SET current_milestone = 3 WHERE id = ?1",
                [id],
            )?;
            Ok(())
        })
        .unwrap();

        let shipment = complete_milestone(&pool, id, 9).unwrap();
        assert_eq!(
            shipment.completed_ids().into_iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 9]
        );
    }

    #[test]
    fn test_truck_has_no_carrier_milestones() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(
            &pool,
            &NewShipment {
                transport_type: "LKW".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
        .id;

        assert!(complete_milestone(&pool, id, 4).is_ok());
        assert!(complete_milestone(&pool, id, 5).is_err());
    }

    #[test]
    fn test_view_recomputes_after_write() {
        let pool = init_memory_pool().unwrap();
        let id = create_request(&pool, &air_export()).unwrap().id;

        let view = get_shipment_view(&pool, id, AmpelRule::Completion).unwrap();
        assert_eq!(view.lights.abholung, Indicator::Grey);

        for m in 1..=3 {
            complete_milestone(&pool, id, m).unwrap();
        }
        let view = get_shipment_view(&pool, id, AmpelRule::Completion).unwrap();
        assert_eq!(view.lights.abholung, Indicator::Green);
        assert_eq!(view.lights.carrier, Indicator::Grey);
    }

    #[test]
    fn test_overview_counts_late_shipments() {
        let pool = init_memory_pool().unwrap();
        let late = create_request(
            &pool,
            &NewShipment {
                pickup_date: Some("2024-01-10".to_string()),
                ..air_export()
            },
        )
        .unwrap()
        .id;
        complete_milestone(&pool, late, 1).unwrap();

        let on_time = create_request(&pool, &air_export()).unwrap().id;
        complete_milestone(&pool, on_time, 1).unwrap();
        create_offer(&pool, on_time, 500.0).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let overview = overview_at(&pool, AmpelRule::Schedule, today).unwrap();
        assert_eq!(overview.total, 2);
        assert_eq!(overview.late, 1);
        assert_eq!(overview.by_status.len(), 2);

        let overview = overview_at(&pool, AmpelRule::Completion, today).unwrap();
        assert_eq!(overview.late, 0);
    }
}
