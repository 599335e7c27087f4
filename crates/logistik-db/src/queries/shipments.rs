//! Shipment database queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;
use rusqlite::types::ValueRef;

const SHIPMENT_COLUMNS: &str = "id, position, customer_id, transport_type, shipment_type, import_export,
    status, origin, destination,
    pickup_partner_id, main_partner_id, delivery_partner_id,
    pickup_cost, cost_pickup, main_cost, cost_main, delivery_cost, cost_delivery,
    offer_price, rejection_reason,
    current_milestone, pickup_milestone, carrier_milestone, delivery_milestone, completed_milestones,
    pickup_date, flight_departure, delivery_date,
    created_at, updated_at";

/// Shipment row from database.
///
/// Cost, direction and milestone columns are kept exactly as stored; alias
/// resolution happens in the domain layer.
#[derive(Debug, Clone, Default)]
pub struct ShipmentRow {
    pub id: i64,
    pub position: Option<String>,
    pub customer_id: Option<i64>,
    pub transport_type: String,
    pub shipment_type: Option<String>,
    pub import_export: Option<String>,
    pub status: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub pickup_partner_id: Option<i64>,
    pub main_partner_id: Option<i64>,
    pub delivery_partner_id: Option<i64>,
    pub pickup_cost: Option<f64>,
    pub cost_pickup: Option<f64>,
    pub main_cost: Option<f64>,
    pub cost_main: Option<f64>,
    pub delivery_cost: Option<f64>,
    pub cost_delivery: Option<f64>,
    pub offer_price: Option<f64>,
    pub rejection_reason: Option<String>,
    pub current_milestone: Option<i64>,
    pub pickup_milestone: Option<i64>,
    pub carrier_milestone: Option<i64>,
    pub delivery_milestone: Option<i64>,
    pub completed_milestones: Option<String>,
    pub pickup_date: Option<String>,
    pub flight_departure: Option<String>,
    pub delivery_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Values for a new shipment request.
#[derive(Debug, Clone, Default)]
pub struct NewShipmentRow<'a> {
    pub customer_id: Option<i64>,
    pub transport_type: &'a str,
    pub shipment_type: &'a str,
    pub status: &'a str,
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub pickup_date: Option<&'a str>,
    pub flight_departure: Option<&'a str>,
    pub delivery_date: Option<&'a str>,
}

/// Insert a shipment and return its new id.
pub fn insert_shipment(pool: &DbPool, new: &NewShipmentRow<'_>) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO shipments (customer_id, transport_type, shipment_type, status,
                                    origin, destination, pickup_date, flight_departure, delivery_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                new.customer_id,
                new.transport_type,
                new.shipment_type,
                new.status,
                new.origin,
                new.destination,
                new.pickup_date,
                new.flight_departure,
                new.delivery_date
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a shipment by ID.
pub fn get_shipment(pool: &DbPool, id: i64) -> DbResult<ShipmentRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM shipments WHERE id = ?1", SHIPMENT_COLUMNS),
            params![id],
            row_to_shipment,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Shipment: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List shipments, newest first, optionally restricted to one status.
pub fn list_shipments(pool: &DbPool, status: Option<&str>) -> DbResult<Vec<ShipmentRow>> {
    pool.with_conn(|conn| {
        let rows = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM shipments WHERE status = ?1 ORDER BY id DESC",
                    SHIPMENT_COLUMNS
                ))?;
                let rows = stmt.query_map(params![status], row_to_shipment)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM shipments ORDER BY id DESC",
                    SHIPMENT_COLUMNS
                ))?;
                let rows = stmt.query_map([], row_to_shipment)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    })
}

/// List all shipments of one customer.
pub fn list_shipments_by_customer(pool: &DbPool, customer_id: i64) -> DbResult<Vec<ShipmentRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM shipments WHERE customer_id = ?1 ORDER BY id DESC",
            SHIPMENT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![customer_id], row_to_shipment)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Set the human-readable position code.
pub fn update_position(pool: &DbPool, id: i64, position: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET position = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![position, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Update the workflow status.
pub fn update_status(pool: &DbPool, id: i64, status: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![status, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Store an offer price and move the shipment to `status`.
pub fn update_offer(pool: &DbPool, id: i64, price: f64, status: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET offer_price = ?1, status = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![price, status, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Record a rejection.
pub fn update_rejection(pool: &DbPool, id: i64, reason: Option<&str>, status: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET rejection_reason = ?1, status = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![reason, status, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Write leg costs to the canonical columns and clear the legacy aliases.
pub fn update_costs(
    pool: &DbPool,
    id: i64,
    pickup: Option<f64>,
    main: Option<f64>,
    delivery: Option<f64>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET
                pickup_cost = ?1, cost_pickup = NULL,
                main_cost = ?2, cost_main = NULL,
                delivery_cost = ?3, cost_delivery = NULL,
                updated_at = datetime('now')
             WHERE id = ?4",
            params![pickup, main, delivery, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Replace the serialized completed-milestone set.
pub fn update_completed_milestones(pool: &DbPool, id: i64, encoded: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET completed_milestones = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![encoded, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Update the planned dates of all three legs.
pub fn update_dates(
    pool: &DbPool,
    id: i64,
    pickup_date: Option<&str>,
    flight_departure: Option<&str>,
    delivery_date: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET pickup_date = ?1, flight_departure = ?2, delivery_date = ?3,
                updated_at = datetime('now')
             WHERE id = ?4",
            params![pickup_date, flight_departure, delivery_date, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Assign partners to the pickup, main and delivery legs.
pub fn update_partners(
    pool: &DbPool,
    id: i64,
    pickup_partner_id: Option<i64>,
    main_partner_id: Option<i64>,
    delivery_partner_id: Option<i64>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE shipments SET pickup_partner_id = ?1, main_partner_id = ?2, delivery_partner_id = ?3,
                updated_at = datetime('now')
             WHERE id = ?4",
            params![pickup_partner_id, main_partner_id, delivery_partner_id, id],
        )?;
        ensure_updated(changed, id)
    })
}

/// Delete a shipment.
pub fn delete_shipment(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM shipments WHERE id = ?1", params![id])?;
        ensure_updated(changed, id)
    })
}

/// Count shipments grouped by status.
pub fn count_by_status(pool: &DbPool) -> DbResult<Vec<(String, i64)>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*) FROM shipments GROUP BY status ORDER BY status",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

fn ensure_updated(changed: usize, id: i64) -> DbResult<()> {
    if changed == 0 {
        Err(DbError::NotFound(format!("Shipment: {}", id)))
    } else {
        Ok(())
    }
}

/// Read a numeric legacy column that may hold text from old imports.
/// Blank or non-numeric text reads as `None`.
fn lenient_f64(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(raw) => parse_legacy_number(row, idx, raw),
        ValueRef::Blob(_) => {
            warn_unreadable(row, idx, "blob");
            None
        }
    })
}

/// Integer counterpart of [`lenient_f64`]; fractional values are truncated.
fn lenient_i64(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(raw) => parse_legacy_number(row, idx, raw).map(|f| f as i64),
        ValueRef::Blob(_) => {
            warn_unreadable(row, idx, "blob");
            None
        }
    })
}

fn parse_legacy_number(row: &rusqlite::Row, idx: usize, raw: &[u8]) -> Option<f64> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // Legacy imports sometimes use a decimal comma.
    match text.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn_unreadable(row, idx, text);
            None
        }
    }
}

fn warn_unreadable(row: &rusqlite::Row, idx: usize, value: &str) {
    let column = row.as_ref().column_name(idx).unwrap_or("?");
    tracing::warn!(column, value, "Ignoring non-numeric value in shipment column");
}

/// Helper to map a rusqlite Row into a ShipmentRow.
fn row_to_shipment(row: &rusqlite::Row) -> rusqlite::Result<ShipmentRow> {
    Ok(ShipmentRow {
        id: row.get(0)?,
        position: row.get(1)?,
        customer_id: row.get(2)?,
        transport_type: row.get(3)?,
        shipment_type: row.get(4)?,
        import_export: row.get(5)?,
        status: row.get(6)?,
        origin: row.get(7)?,
        destination: row.get(8)?,
        pickup_partner_id: row.get(9)?,
        main_partner_id: row.get(10)?,
        delivery_partner_id: row.get(11)?,
        pickup_cost: lenient_f64(row, 12)?,
        cost_pickup: lenient_f64(row, 13)?,
        main_cost: lenient_f64(row, 14)?,
        cost_main: lenient_f64(row, 15)?,
        delivery_cost: lenient_f64(row, 16)?,
        cost_delivery: lenient_f64(row, 17)?,
        offer_price: row.get(18)?,
        rejection_reason: row.get(19)?,
        current_milestone: lenient_i64(row, 20)?,
        pickup_milestone: lenient_i64(row, 21)?,
        carrier_milestone: lenient_i64(row, 22)?,
        delivery_milestone: lenient_i64(row, 23)?,
        completed_milestones: row.get(24)?,
        pickup_date: row.get(25)?,
        flight_departure: row.get(26)?,
        delivery_date: row.get(27)?,
        created_at: row.get(28)?,
        updated_at: row.get(29)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_memory_pool;

    fn new_air_export() -> NewShipmentRow<'static> {
        NewShipmentRow {
            transport_type: "AIR",
            shipment_type: "EXPORT",
            status: "ANFRAGE",
            origin: Some("Stuttgart"),
            destination: Some("Chicago"),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let pool = init_memory_pool().unwrap();
        let id = insert_shipment(&pool, &new_air_export()).unwrap();

        let row = get_shipment(&pool, id).unwrap();
        assert_eq!(row.transport_type, "AIR");
        assert_eq!(row.shipment_type.as_deref(), Some("EXPORT"));
        assert_eq!(row.status, "ANFRAGE");
        assert!(row.completed_milestones.is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(get_shipment(&pool, 42), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(
            update_status(&pool, 7, "ANGEBOT"),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_filters_by_status() {
        let pool = init_memory_pool().unwrap();
        let a = insert_shipment(&pool, &new_air_export()).unwrap();
        insert_shipment(&pool, &new_air_export()).unwrap();
        update_status(&pool, a, "ANGEBOT").unwrap();

        assert_eq!(list_shipments(&pool, None).unwrap().len(), 2);
        let offers = list_shipments(&pool, Some("ANGEBOT")).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, a);
    }

    #[test]
    fn test_update_costs_clears_aliases() {
        let pool = init_memory_pool().unwrap();
        let id = insert_shipment(&pool, &new_air_export()).unwrap();
        pool.with_conn(|conn| {
            conn.execute(
                "UPDATE shipments SET cost_pickup = 80.0, cost_main = 900.0 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .unwrap();

        update_costs(&pool, id, Some(120.0), None, Some(60.0)).unwrap();
        let row = get_shipment(&pool, id).unwrap();
        assert_eq!(row.pickup_cost, Some(120.0));
        assert_eq!(row.cost_pickup, None);
        assert_eq!(row.cost_main, None);
        assert_eq!(row.delivery_cost, Some(60.0));
    }

    #[test]
    fn test_count_by_status() {
        let pool = init_memory_pool().unwrap();
        let a = insert_shipment(&pool, &new_air_export()).unwrap();
        insert_shipment(&pool, &new_air_export()).unwrap();
        insert_shipment(&pool, &new_air_export()).unwrap();
        update_status(&pool, a, "ABGELEHNT").unwrap();

        let counts = count_by_status(&pool).unwrap();
        assert_eq!(
            counts,
            vec![("ABGELEHNT".to_string(), 1), ("ANFRAGE".to_string(), 2)]
        );
    }

    #[test]
    fn test_blank_legacy_numbers_read_as_missing() {
        let pool = init_memory_pool().unwrap();
        let id = insert_shipment(&pool, &new_air_export()).unwrap();
        insert_shipment(&pool, &new_air_export()).unwrap();
        pool.with_conn(|conn| {
            conn.execute(
                "UPDATE shipments SET cost_pickup = '', current_milestone = '',
                    cost_main = '1250,50', pickup_milestone = 'n/a', carrier_milestone = '2'
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .unwrap();

        let row = get_shipment(&pool, id).unwrap();
        assert_eq!(row.cost_pickup, None);
        assert_eq!(row.current_milestone, None);
        assert_eq!(row.cost_main, Some(1250.5));
        assert_eq!(row.pickup_milestone, None);
        assert_eq!(row.carrier_milestone, Some(2));

        assert_eq!(list_shipments(&pool, None).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_shipment() {
        let pool = init_memory_pool().unwrap();
        let id = insert_shipment(&pool, &new_air_export()).unwrap();
        delete_shipment(&pool, id).unwrap();
        assert!(get_shipment(&pool, id).is_err());
    }
}
