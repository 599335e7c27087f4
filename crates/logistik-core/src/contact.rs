//! Address book fields shared by customers and partners.

use serde::{Deserialize, Serialize};

use crate::error::LogistikResult;

/// Address plus contact lists. Lists are stored as JSON arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub address: Option<String>,
    pub contacts: Vec<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

impl ContactInfo {
    /// Build from stored columns. Unreadable lists come back empty.
    pub fn from_columns(
        address: Option<String>,
        contacts: Option<String>,
        phones: Option<String>,
        emails: Option<String>,
    ) -> Self {
        Self {
            address: address.filter(|a| !a.trim().is_empty()),
            contacts: decode_list(contacts.as_deref()),
            phones: decode_list(phones.as_deref()),
            emails: decode_list(emails.as_deref()),
        }
    }

    /// Encode the three lists for storage. Empty lists are stored as NULL.
    pub fn encoded_lists(&self) -> LogistikResult<[Option<String>; 3]> {
        Ok([
            encode_list(&self.contacts)?,
            encode_list(&self.phones)?,
            encode_list(&self.emails)?,
        ])
    }
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
            // Hand-entered rows sometimes hold a single plain value.
            vec![raw.to_string()]
        }),
    }
}

fn encode_list(values: &[String]) -> LogistikResult<Option<String>> {
    let cleaned: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(&cleaned)?))
}
