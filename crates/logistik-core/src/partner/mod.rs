//! Partner management.

pub mod model;

use tracing::info;

use crate::error::{LogistikError, LogistikResult};
use logistik_db::queries::partners as queries;
use logistik_db::{DbError, DbPool};
use model::{NewPartner, Partner, PartnerType};

fn not_found(id: i64) -> impl Fn(DbError) -> LogistikError {
    move |e| match e {
        DbError::NotFound(_) => LogistikError::PartnerNotFound(id),
        e => LogistikError::Database(e),
    }
}

/// Create a partner.
pub fn create_partner(pool: &DbPool, new: &NewPartner) -> LogistikResult<Partner> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(LogistikError::validation("Partner name must not be empty"));
    }

    let [contacts, phones, emails] = new.contact.encoded_lists()?;
    let id = queries::create_partner(
        pool,
        name,
        new.partner_type.as_str(),
        new.contact.address.as_deref(),
        contacts.as_deref(),
        phones.as_deref(),
        emails.as_deref(),
    )?;

    info!(partner_id = id, name, partner_type = %new.partner_type, "Created partner");
    get_partner(pool, id)
}

/// Get a partner by ID.
pub fn get_partner(pool: &DbPool, id: i64) -> LogistikResult<Partner> {
    let row = queries::get_partner(pool, id).map_err(not_found(id))?;
    Ok(Partner::from_row(row))
}

/// List partners, optionally of one type.
pub fn list_partners(pool: &DbPool, partner_type: Option<PartnerType>) -> LogistikResult<Vec<Partner>> {
    let rows = queries::list_partners(pool, partner_type.map(|t| t.as_str()))?;
    Ok(rows.into_iter().map(Partner::from_row).collect())
}

/// Delete a partner no shipment is assigned to.
pub fn delete_partner(pool: &DbPool, id: i64) -> LogistikResult<()> {
    let references = queries::count_shipment_references(pool, id)?;
    if references > 0 {
        return Err(LogistikError::validation(format!(
            "Partner {} is still assigned to {} shipment(s)",
            id, references
        )));
    }

    queries::delete_partner(pool, id).map_err(not_found(id))?;
    info!(partner_id = id, "Deleted partner");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logistik_db::init_memory_pool;

    fn partner(name: &str, partner_type: PartnerType) -> NewPartner {
        NewPartner {
            name: name.to_string(),
            partner_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_filter() {
        let pool = init_memory_pool().unwrap();
        create_partner(&pool, &partner("Lufthansa Cargo", PartnerType::Carrier)).unwrap();
        create_partner(&pool, &partner("Zollagentur Nord", PartnerType::Customs)).unwrap();

        assert_eq!(list_partners(&pool, None).unwrap().len(), 2);
        let customs = list_partners(&pool, Some(PartnerType::Customs)).unwrap();
        assert_eq!(customs.len(), 1);
        assert_eq!(customs[0].name, "Zollagentur Nord");
    }

    #[test]
    fn test_missing_partner() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(get_partner(&pool, 3), Err(LogistikError::PartnerNotFound(3))));
        assert!(matches!(delete_partner(&pool, 3), Err(LogistikError::PartnerNotFound(3))));
        assert!(create_partner(&pool, &partner("", PartnerType::Agent)).is_err());
    }

    #[test]
    fn test_assign_to_shipment() {
        let pool = init_memory_pool().unwrap();
        let carrier = create_partner(&pool, &partner("Maersk", PartnerType::Carrier)).unwrap();
        let id = crate::shipment::create_request(
            &pool,
            &crate::shipment::NewShipment {
                transport_type: "SEA".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
        .id;

        let legs = crate::shipment::model::LegPartners {
            main: Some(carrier.id),
            ..Default::default()
        };
        let shipment = crate::shipment::assign_partners(&pool, id, legs).unwrap();
        assert_eq!(shipment.partners.main, Some(carrier.id));

        let bad = crate::shipment::model::LegPartners {
            pickup: Some(999),
            ..Default::default()
        };
        assert!(matches!(
            crate::shipment::assign_partners(&pool, id, bad),
            Err(LogistikError::PartnerNotFound(999))
        ));
    }

    #[test]
    fn test_delete_assigned_partner_rejected() {
        let pool = init_memory_pool().unwrap();
        let carrier = create_partner(&pool, &partner("Cargolux", PartnerType::Carrier)).unwrap();
        let id = crate::shipment::create_request(
            &pool,
            &crate::shipment::NewShipment {
                transport_type: "AIR".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
        .id;
        let legs = crate::shipment::model::LegPartners {
            main: Some(carrier.id),
            ..Default::default()
        };
        crate::shipment::assign_partners(&pool, id, legs).unwrap();

        let err = delete_partner(&pool, carrier.id).unwrap_err();
        assert!(matches!(err, LogistikError::ValidationError(_)));
        assert!(get_partner(&pool, carrier.id).is_ok());

        crate::shipment::assign_partners(&pool, id, Default::default()).unwrap();
        delete_partner(&pool, carrier.id).unwrap();
        assert!(matches!(
            get_partner(&pool, carrier.id),
            Err(LogistikError::PartnerNotFound(_))
        ));
    }
}
