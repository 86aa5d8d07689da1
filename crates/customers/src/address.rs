use serde::{Deserialize, Serialize};

use storefront_core::{AddressId, CustomerId, DomainError, DomainResult, Entity};

/// Invoicing details for company purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub company_name: String,
    pub tax_id: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
}

/// Postal address saved by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub business: bool,
    #[serde(default)]
    pub business_details: Option<BusinessDetails>,
}

impl Address {
    /// Business details, only when the address is flagged as a business one.
    pub fn business_details(&self) -> Option<&BusinessDetails> {
        if self.business {
            self.business_details.as_ref()
        } else {
            None
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("address {field} is required")));
            }
        }

        if self.business {
            let details = self
                .business_details
                .as_ref()
                .ok_or_else(|| DomainError::validation("business address without business details"))?;
            if details.tax_id.trim().is_empty() {
                return Err(DomainError::validation("business address requires a tax id"));
            }
        }

        Ok(())
    }
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            id: AddressId::new(),
            customer_id: CustomerId::new(),
            name: "Ana Silva".to_string(),
            street: "Rua Augusta 10".to_string(),
            city: "Lisboa".to_string(),
            postal_code: "1100-053".to_string(),
            country: "PT".to_string(),
            phone: None,
            business: false,
            business_details: None,
        }
    }

    fn details() -> BusinessDetails {
        BusinessDetails {
            company_name: "Silva Lda".to_string(),
            tax_id: "PT123456789".to_string(),
            registration_number: None,
            bank_name: None,
            bank_account: None,
        }
    }

    #[test]
    fn private_address_hides_leftover_business_details() {
        let mut a = address();
        a.business_details = Some(details());
        assert!(a.business_details().is_none());
        assert!(a.validate().is_ok());
    }

    #[test]
    fn business_address_requires_details() {
        let mut a = address();
        a.business = true;
        assert!(a.validate().is_err());

        a.business_details = Some(details());
        assert!(a.validate().is_ok());
        assert_eq!(a.business_details().unwrap().tax_id, "PT123456789");
    }

    #[test]
    fn blank_city_fails_validation() {
        let mut a = address();
        a.city = " ".to_string();
        assert!(a.validate().is_err());
    }
}
