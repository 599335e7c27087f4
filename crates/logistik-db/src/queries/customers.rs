//! Customer database queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Customer row from database. List fields are JSON-encoded arrays.
#[derive(Debug, Clone)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub contacts: Option<String>,
    pub phones: Option<String>,
    pub emails: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create a new customer and return its id.
pub fn create_customer(
    pool: &DbPool,
    name: &str,
    address: Option<&str>,
    contacts: Option<&str>,
    phones: Option<&str>,
    emails: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO customers (name, address, contacts, phones, emails)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, address, contacts, phones, emails],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a customer by ID.
pub fn get_customer(pool: &DbPool, id: i64) -> DbResult<CustomerRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT id, name, address, contacts, phones, emails, created_at, updated_at
             FROM customers WHERE id = ?1",
            params![id],
            row_to_customer,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Customer: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List all customers by name.
pub fn list_customers(pool: &DbPool) -> DbResult<Vec<CustomerRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, name, address, contacts, phones, emails, created_at, updated_at
             FROM customers ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([], row_to_customer)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Delete a customer. Fails while shipments still reference it.
pub fn delete_customer(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Customer: {}", id)));
        }
        Ok(())
    })
}

fn row_to_customer(row: &rusqlite::Row) -> rusqlite::Result<CustomerRow> {
    Ok(CustomerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        contacts: row.get(3)?,
        phones: row.get(4)?,
        emails: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_memory_pool;

    #[test]
    fn test_create_and_list() {
        let pool = init_memory_pool().unwrap();
        create_customer(&pool, "Zeppelin GmbH", None, None, None, None).unwrap();
        let id = create_customer(
            &pool,
            "Bosch",
            Some("Robert-Bosch-Platz 1, Gerlingen"),
            Some(r#"["M. Weber"]"#),
            None,
            Some(r#"["logistik@example.com"]"#),
        )
        .unwrap();

        let row = get_customer(&pool, id).unwrap();
        assert_eq!(row.name, "Bosch");
        assert_eq!(row.emails.as_deref(), Some(r#"["logistik@example.com"]"#));

        let names: Vec<String> = list_customers(&pool).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Bosch", "Zeppelin GmbH"]);
    }

    #[test]
    fn test_delete_missing_customer() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(delete_customer(&pool, 3), Err(DbError::NotFound(_))));
    }
}
