//! Customer management.

pub mod model;

use tracing::info;

use crate::error::{LogistikError, LogistikResult};
use logistik_db::queries::customers as queries;
use logistik_db::{DbError, DbPool};
use model::{Customer, NewCustomer};

/// Create a customer.
pub fn create_customer(pool: &DbPool, new: &NewCustomer) -> LogistikResult<Customer> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(LogistikError::validation("Customer name must not be empty"));
    }

    let [contacts, phones, emails] = new.contact.encoded_lists()?;
    let id = queries::create_customer(
        pool,
        name,
        new.contact.address.as_deref(),
        contacts.as_deref(),
        phones.as_deref(),
        emails.as_deref(),
    )?;

    info!(customer_id = id, name, "Created customer");
    get_customer(pool, id)
}

/// Get a customer by ID.
pub fn get_customer(pool: &DbPool, id: i64) -> LogistikResult<Customer> {
    let row = queries::get_customer(pool, id).map_err(|e| match e {
        DbError::NotFound(_) => LogistikError::CustomerNotFound(id),
        e => LogistikError::Database(e),
    })?;
    Ok(Customer::from_row(row))
}

/// List all customers, sorted by name.
pub fn list_customers(pool: &DbPool) -> LogistikResult<Vec<Customer>> {
    let rows = queries::list_customers(pool)?;
    Ok(rows.into_iter().map(Customer::from_row).collect())
}

/// Delete a customer without shipments.
pub fn delete_customer(pool: &DbPool, id: i64) -> LogistikResult<()> {
    let shipments = logistik_db::queries::shipments::list_shipments_by_customer(pool, id)?;
    if !shipments.is_empty() {
        return Err(LogistikError::validation(format!(
            "Customer {} still has {} shipment(s)",
            id,
            shipments.len()
        )));
    }

    queries::delete_customer(pool, id).map_err(|e| match e {
        DbError::NotFound(_) => LogistikError::CustomerNotFound(id),
        e => LogistikError::Database(e),
    })?;
    info!(customer_id = id, "Deleted customer");
    Ok(())
}
