//! Partner (carrier, agent, customs broker) database queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Partner row from database. List fields are JSON-encoded arrays.
#[derive(Debug, Clone)]
pub struct PartnerRow {
    pub id: i64,
    pub name: String,
    pub partner_type: String,
    pub address: Option<String>,
    pub contacts: Option<String>,
    pub phones: Option<String>,
    pub emails: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create a new partner and return its id.
pub fn create_partner(
    pool: &DbPool,
    name: &str,
    partner_type: &str,
    address: Option<&str>,
    contacts: Option<&str>,
    phones: Option<&str>,
    emails: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO partners (name, partner_type, address, contacts, phones, emails)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![name, partner_type, address, contacts, phones, emails],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a partner by ID.
pub fn get_partner(pool: &DbPool, id: i64) -> DbResult<PartnerRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT id, name, partner_type, address, contacts, phones, emails, created_at, updated_at
             FROM partners WHERE id = ?1",
            params![id],
            row_to_partner,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Partner: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List partners, optionally of one type.
pub fn list_partners(pool: &DbPool, partner_type: Option<&str>) -> DbResult<Vec<PartnerRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, name, partner_type, address, contacts, phones, emails, created_at, updated_at
             FROM partners
             WHERE ?1 IS NULL OR partner_type = ?1
             ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map(params![partner_type], row_to_partner)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Count shipments that use the partner on any leg.
pub fn count_shipment_references(pool: &DbPool, id: i64) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM shipments
             WHERE pickup_partner_id = ?1 OR main_partner_id = ?1 OR delivery_partner_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(DbError::from)
    })
}

/// Delete a partner.
pub fn delete_partner(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM partners WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Partner: {}", id)));
        }
        Ok(())
    })
}

fn row_to_partner(row: &rusqlite::Row) -> rusqlite::Result<PartnerRow> {
    Ok(PartnerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        partner_type: row.get(2)?,
        address: row.get(3)?,
        contacts: row.get(4)?,
        phones: row.get(5)?,
        emails: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_memory_pool;

    #[test]
    fn test_list_by_type() {
        let pool = init_memory_pool().unwrap();
        create_partner(&pool, "Lufthansa Cargo", "airline", None, None, None, None).unwrap();
        create_partner(&pool, "Spedition Maier", "carrier", None, None, None, None).unwrap();

        assert_eq!(list_partners(&pool, None).unwrap().len(), 2);
        let airlines = list_partners(&pool, Some("airline")).unwrap();
        assert_eq!(airlines.len(), 1);
        assert_eq!(airlines[0].name, "Lufthansa Cargo");
    }

    #[test]
    fn test_get_missing_partner() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(get_partner(&pool, 1), Err(DbError::NotFound(_))));
    }
}
