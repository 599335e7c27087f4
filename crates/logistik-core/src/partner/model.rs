//! Partner domain models.

use serde::{Deserialize, Serialize};

use crate::contact::ContactInfo;
use logistik_db::queries::partners::PartnerRow;

/// What a partner does for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerType {
    /// Airline, shipping line or trucking company.
    #[default]
    Carrier,
    /// Agent at origin or destination.
    Agent,
    /// Customs broker.
    Customs,
    /// Local pickup or delivery haulier.
    Haulier,
}

impl PartnerType {
    pub const ALL: [Self; 4] = [Self::Carrier, Self::Agent, Self::Customs, Self::Haulier];

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "carrier" | "reederei" | "airline" => Some(Self::Carrier),
            "agent" => Some(Self::Agent),
            "customs" | "zoll" => Some(Self::Customs),
            "haulier" | "trucker" | "spedition" => Some(Self::Haulier),
            _ => None,
        }
    }

    /// Convert to the stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Carrier => "carrier",
            Self::Agent => "agent",
            Self::Customs => "customs",
            Self::Haulier => "haulier",
        }
    }
}

impl std::fmt::Display for PartnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service partner that can be assigned to a shipment leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub partner_type: PartnerType,
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl Partner {
    /// Create from database row.
    pub fn from_row(row: PartnerRow) -> Self {
        let partner_type = PartnerType::parse(&row.partner_type).unwrap_or_else(|| {
            tracing::warn!(
                partner_id = row.id,
                partner_type = %row.partner_type,
                "Unknown partner type, treating as carrier"
            );
            PartnerType::Carrier
        });

        Self {
            id: row.id,
            name: row.name,
            partner_type,
            contact: ContactInfo::from_columns(row.address, row.contacts, row.phones, row.emails),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for a new partner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPartner {
    pub name: String,
    #[serde(default)]
    pub partner_type: PartnerType,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_type_parse() {
        for t in PartnerType::ALL {
            assert_eq!(PartnerType::parse(t.as_str()), Some(t));
        }
        assert_eq!(PartnerType::parse("Zoll"), Some(PartnerType::Customs));
        assert_eq!(PartnerType::parse("bank"), None);
    }

    #[test]
    fn test_unknown_stored_type_falls_back() {
        let partner = Partner::from_row(PartnerRow {
            id: 1,
            name: "Hapag".to_string(),
            partner_type: "shipping".to_string(),
            address: None,
            contacts: None,
            phones: None,
            emails: None,
            created_at: String::new(),
            updated_at: String::new(),
        });
        assert_eq!(partner.partner_type, PartnerType::Carrier);
    }
}
