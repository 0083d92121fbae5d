// Registrant contacts
//
// Field names follow the OpenSRS `contact_set` keys; camelCase aliases are
// accepted when reading request files.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::xml::{Assoc, OpsValue};

/// Postal/identity record used by registration, transfer and contact updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(default, alias = "orgName", skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(alias = "address")]
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address3: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(alias = "postalCode")]
    pub postal_code: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    pub email: String,
}

impl Contact {
    /// Check that every field the registry requires is present.
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address1", &self.address1),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("postal_code", &self.postal_code),
            ("phone", &self.phone),
            ("email", &self.email),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(Error::validation(field, "is required"));
        }
        if self.country.trim().len() != 2 {
            return Err(Error::validation(
                "country",
                "must be a two-letter ISO 3166 code",
            ));
        }
        if !self.email.contains('@') {
            return Err(Error::validation("email", "is not an email address"));
        }
        Ok(())
    }

    /// `org_name` is mandatory on the wire; individuals use their full name.
    fn org_or_full_name(&self) -> String {
        self.org_name
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", self.first_name, self.last_name))
    }

    pub fn to_ops(&self) -> OpsValue {
        Assoc::new()
            .item("first_name", self.first_name.as_str())
            .item("last_name", self.last_name.as_str())
            .item("org_name", self.org_or_full_name())
            .item("address1", self.address1.as_str())
            .opt_item("address2", self.address2.as_deref())
            .opt_item("address3", self.address3.as_deref())
            .item("city", self.city.as_str())
            .item("state", self.state.as_str())
            .item("country", self.country.as_str())
            .item("postal_code", self.postal_code.as_str())
            .item("phone", self.phone.as_str())
            .opt_item("fax", self.fax.as_deref())
            .item("email", self.email.as_str())
            .build()
    }

    pub(crate) fn from_ops(node: &OpsValue) -> Self {
        let field = |key: &str| node.get_str(key).unwrap_or_default().to_owned();
        let optional = |key: &str| node.get_str(key).map(str::to_owned);
        Self {
            first_name: field("first_name"),
            last_name: field("last_name"),
            org_name: optional("org_name"),
            address1: field("address1"),
            address2: optional("address2"),
            address3: optional("address3"),
            city: field("city"),
            state: field("state"),
            country: field("country"),
            postal_code: field("postal_code"),
            phone: field("phone"),
            fax: optional("fax"),
            email: field("email"),
        }
    }
}

/// Contacts keyed by registry role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSet {
    pub owner: Contact,
    pub admin: Contact,
    pub tech: Contact,
    pub billing: Contact,
}

impl ContactSet {
    /// Use one contact for every role.
    pub fn uniform(contact: &Contact) -> Self {
        Self {
            owner: contact.clone(),
            admin: contact.clone(),
            tech: contact.clone(),
            billing: contact.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (role, contact) in self.roles() {
            contact.validate().map_err(|e| match e {
                Error::Validation { field, reason } => Error::Validation {
                    field: format!("{role}.{field}"),
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn roles(&self) -> [(&'static str, &Contact); 4] {
        [
            ("owner", &self.owner),
            ("admin", &self.admin),
            ("tech", &self.tech),
            ("billing", &self.billing),
        ]
    }

    pub fn to_ops(&self) -> OpsValue {
        self.roles()
            .into_iter()
            .fold(Assoc::new(), |acc, (role, c)| acc.item(role, c.to_ops()))
            .build()
    }

    /// Parse a `contact_set`; roles missing on the wire fall back to the owner.
    pub(crate) fn from_ops(node: &OpsValue) -> Option<Self> {
        let owner = Contact::from_ops(node.get("owner")?);
        let role = |name: &str| node.get(name).map_or_else(|| owner.clone(), Contact::from_ops);
        Some(Self {
            admin: role("admin"),
            tech: role("tech"),
            billing: role("billing"),
            owner,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jane() -> Contact {
        Contact {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            org_name: None,
            address1: "1 Main St".into(),
            address2: None,
            address3: None,
            city: "Toronto".into(),
            state: "ON".into(),
            country: "CA".into(),
            postal_code: "M5V 1A1".into(),
            phone: "+1.4165550123".into(),
            fax: None,
            email: "jane@example.com".into(),
        }
    }

    #[test]
    fn org_name_defaults_to_full_name() {
        let ops = jane().to_ops();
        assert_eq!(ops.get_str("org_name"), Some("Jane Doe"));
        assert!(ops.get("address2").is_none());
    }

    #[test]
    fn missing_fields_are_reported_by_role() {
        let mut set = ContactSet::uniform(&jane());
        set.tech.city = String::new();
        match set.validate().unwrap_err() {
            Error::Validation { field, .. } => assert_eq!(field, "tech.city"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn accepts_camel_case_request_fields() {
        let c: Contact = serde_json::from_value(serde_json::json!({
            "firstName": "Jane", "lastName": "Doe", "address": "1 Main St",
            "city": "Toronto", "state": "ON", "country": "CA", "postalCode": "M5V 1A1",
            "phone": "+1.4165550123", "email": "jane@example.com"
        }))
        .unwrap();
        assert_eq!(c, jane());
    }

    #[test]
    fn contact_set_parses_with_owner_fallback() {
        let node = Assoc::new().item("owner", jane().to_ops()).build();
        let set = ContactSet::from_ops(&node).unwrap();
        assert_eq!(set.billing.first_name, "Jane");
    }
}
