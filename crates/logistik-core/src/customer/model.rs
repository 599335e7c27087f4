//! Customer domain models.

use serde::{Deserialize, Serialize};

use crate::contact::ContactInfo;
use logistik_db::queries::customers::CustomerRow;

/// A customer placing shipment requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl Customer {
    /// Create from database row.
    pub fn from_row(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact: ContactInfo::from_columns(row.address, row.contacts, row.phones, row.emails),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for a new customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
}
