// Domain-level command models
//
// Request structs are validated before any XML is built; reply structs
// are extracted from the `attributes` subtree of an `OpsResponse`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Error;
use crate::models::contact::ContactSet;
use crate::response::OpsResponse;
use crate::xml::OpsValue;

/// Response code OpenSRS uses for "domain available".
pub const CODE_AVAILABLE: u32 = 210;

/// Lowercase and sanity-check a fully qualified domain name.
pub fn validate_domain(domain: &str) -> Result<String, Error> {
    let name = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    if name.is_empty() {
        return Err(Error::validation("domain", "is required"));
    }
    if name.len() > 253 || !name.contains('.') {
        return Err(Error::validation(
            "domain",
            format!("'{domain}' is not a fully qualified domain name"),
        ));
    }
    let label_ok = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !name.split('.').all(label_ok) {
        return Err(Error::validation(
            "domain",
            format!("'{domain}' contains an invalid label"),
        ));
    }
    Ok(name)
}

/// Registration periods OpenSRS accepts, in years.
pub fn validate_period(period: u32) -> Result<u32, Error> {
    if (1..=10).contains(&period) {
        Ok(period)
    } else {
        Err(Error::validation("period", "must be between 1 and 10 years"))
    }
}

// ── Lookup ───────────────────────────────────────────────────────────

/// Reply of `LOOKUP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub domain: String,
    pub available: bool,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub response_code: u32,
    pub response_text: String,
}

impl LookupResult {
    /// `status` wins when it is decisive; otherwise code 210 means available.
    pub fn from_response(domain: &str, resp: &OpsResponse) -> Self {
        let status = resp.attributes.get_str("status").map(str::to_owned);
        let available = match status.as_deref() {
            Some("available") => true,
            Some("taken") => false,
            _ => resp.response_code == CODE_AVAILABLE,
        };
        Self {
            domain: domain.to_owned(),
            available,
            status,
            reason: resp.attributes.get_str("reason").map(str::to_owned),
            response_code: resp.response_code,
            response_text: resp.response_text.clone(),
        }
    }
}

// ── Price ────────────────────────────────────────────────────────────

/// Reply of `GET_PRICE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceResult {
    pub domain: String,
    pub price: Option<f64>,
    pub currency: String,
    pub period: u32,
    pub is_premium: bool,
}

impl PriceResult {
    pub fn from_attributes(domain: &str, period: u32, attributes: &OpsValue) -> Self {
        Self {
            domain: domain.to_owned(),
            price: ["price", "cost", "amount"]
                .iter()
                .find_map(|key| attributes.get_parsed::<f64>(key)),
            currency: attributes
                .get_str("currency")
                .unwrap_or("USD")
                .to_owned(),
            period,
            is_premium: attributes.get_flag("is_registry_premium").unwrap_or(false),
        }
    }
}

// ── Suggest ──────────────────────────────────────────────────────────

/// `NAME_SUGGEST` service sections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SuggestService {
    Lookup,
    Suggestion,
    Premium,
    PersonalNames,
}

impl SuggestService {
    pub const ALL: [Self; 4] = [
        Self::Lookup,
        Self::Suggestion,
        Self::Premium,
        Self::PersonalNames,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestItem {
    pub domain: String,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceSection {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u32>,
    pub items: Vec<SuggestItem>,
}

impl ServiceSection {
    fn from_ops(node: &OpsValue) -> Self {
        let items: Vec<SuggestItem> = node
            .items("items")
            .iter()
            .filter_map(|item| {
                Some(SuggestItem {
                    domain: item.get_str("domain")?.to_owned(),
                    status: item.get_str("status").map(str::to_owned),
                    price: item.get_parsed("price"),
                })
            })
            .collect();
        Self {
            count: node.get_parsed("count").unwrap_or(items.len()),
            response_code: node.get_parsed("response_code"),
            items,
        }
    }
}

/// Reply of `NAME_SUGGEST`; sections the registrar did not return are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestResult {
    pub searchstring: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<ServiceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<ServiceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<ServiceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_names: Option<ServiceSection>,
}

impl SuggestResult {
    pub fn from_attributes(searchstring: &str, attributes: &OpsValue) -> Self {
        let section = |service: SuggestService| {
            attributes
                .get(&service.to_string())
                .map(ServiceSection::from_ops)
        };
        Self {
            searchstring: searchstring.to_owned(),
            lookup: section(SuggestService::Lookup),
            suggestion: section(SuggestService::Suggestion),
            premium: section(SuggestService::Premium),
            personal_names: section(SuggestService::PersonalNames),
        }
    }
}

// ── Register / renew ─────────────────────────────────────────────────

/// Input for `SW_REGISTER` with `reg_type=new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub domain: String,
    #[serde(default = "default_period")]
    pub period: u32,
    pub contacts: ContactSet,
    /// Empty means "use the reseller's default nameservers".
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(alias = "regUsername")]
    pub reg_username: String,
    #[serde(alias = "regPassword")]
    pub reg_password: String,
    #[serde(default, alias = "autoRenew")]
    pub auto_renew: bool,
    #[serde(default)]
    pub lock: bool,
    #[serde(default, alias = "whoisPrivacy")]
    pub whois_privacy: bool,
}

const fn default_period() -> u32 {
    1
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_domain(&self.domain)?;
        validate_period(self.period)?;
        if self.reg_username.trim().is_empty() {
            return Err(Error::validation("reg_username", "is required"));
        }
        if self.reg_password.len() < 6 {
            return Err(Error::validation(
                "reg_password",
                "must be at least 6 characters",
            ));
        }
        for ns in &self.nameservers {
            validate_domain(ns).map_err(|_| {
                Error::validation("nameservers", format!("'{ns}' is not a hostname"))
            })?;
        }
        self.contacts.validate()
    }
}

/// Reply of `SW_REGISTER` (new or transfer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResult {
    pub domain: String,
    pub id: Option<String>,
    pub registration_code: Option<String>,
    pub registration_text: Option<String>,
    pub response_code: u32,
    pub response_text: String,
}

impl RegistrationResult {
    pub fn from_response(domain: &str, resp: &OpsResponse) -> Self {
        let attr = |key: &str| resp.attributes.get_str(key).map(str::to_owned);
        Self {
            domain: domain.to_owned(),
            id: attr("id"),
            registration_code: attr("registration_code"),
            registration_text: attr("registration_text"),
            response_code: resp.response_code,
            response_text: resp.response_text.clone(),
        }
    }
}

/// Input for `RENEW`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalRequest {
    pub domain: String,
    #[serde(default = "default_period")]
    pub period: u32,
    /// Current expiry year; the registrar refuses the renewal on mismatch.
    #[serde(alias = "currentExpirationYear")]
    pub current_expiration_year: u32,
    #[serde(default, alias = "autoRenew")]
    pub auto_renew: bool,
}

impl RenewalRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_domain(&self.domain)?;
        validate_period(self.period)?;
        if !(2000..=2200).contains(&self.current_expiration_year) {
            return Err(Error::validation(
                "current_expiration_year",
                "must be a four-digit year",
            ));
        }
        Ok(())
    }
}

/// Reply of `RENEW`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalResult {
    pub domain: String,
    pub order_id: Option<String>,
    pub new_expiration: Option<String>,
    pub response_code: u32,
    pub response_text: String,
}

impl RenewalResult {
    pub fn from_response(domain: &str, resp: &OpsResponse) -> Self {
        let attr = |key: &str| resp.attributes.get_str(key).map(str::to_owned);
        Self {
            domain: domain.to_owned(),
            order_id: attr("order_id").or_else(|| attr("id")),
            new_expiration: attr("registration expiration date"),
            response_code: resp.response_code,
            response_text: resp.response_text.clone(),
        }
    }
}

// ── Info ─────────────────────────────────────────────────────────────

/// Reply of `GET DOMAIN` with `type=all_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfo {
    pub domain: String,
    pub expiry_date: Option<String>,
    pub created: Option<String>,
    pub auto_renew: Option<bool>,
    pub let_expire: Option<bool>,
    pub sponsoring_rsp: Option<bool>,
    pub nameservers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactSet>,
}

impl DomainInfo {
    pub fn from_attributes(domain: &str, attributes: &OpsValue) -> Self {
        let attr = |key: &str| attributes.get_str(key).map(str::to_owned);
        let mut nameservers: Vec<(u32, String)> = attributes
            .items("nameserver_list")
            .iter()
            .filter_map(|ns| {
                Some((
                    ns.get_parsed("sortorder").unwrap_or(u32::MAX),
                    ns.get_str("name")?.to_owned(),
                ))
            })
            .collect();
        nameservers.sort_by_key(|(order, _)| *order);
        Self {
            domain: domain.to_owned(),
            expiry_date: attr("expiredate").or_else(|| attr("registry_expiredate")),
            created: attr("registry_createdate"),
            auto_renew: attributes.get_flag("auto_renew"),
            let_expire: attributes.get_flag("let_expire"),
            sponsoring_rsp: attributes.get_flag("sponsoring_rsp"),
            nameservers: nameservers.into_iter().map(|(_, name)| name).collect(),
            contacts: attributes.get("contact_set").and_then(ContactSet::from_ops),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::xml::Assoc;

    fn reply(code: u32, attributes: OpsValue) -> OpsResponse {
        OpsResponse {
            action: Some("REPLY".into()),
            object: Some("DOMAIN".into()),
            is_success: true,
            response_code: code,
            response_text: String::new(),
            attributes,
        }
    }

    #[test]
    fn domain_names_are_lowercased_and_checked() {
        assert_eq!(validate_domain(" Example.COM. ").unwrap(), "example.com");
        assert!(validate_domain("localhost").is_err());
        assert!(validate_domain("-bad.com").is_err());
        assert!(validate_domain("under_score.com").is_err());
        assert!(validate_domain("").is_err());
    }

    #[test]
    fn lookup_availability_from_code_or_status() {
        let by_code = LookupResult::from_response("example.com", &reply(210, OpsValue::assoc()));
        assert!(by_code.available);

        let taken = reply(211, Assoc::new().item("status", "taken").build());
        assert!(!LookupResult::from_response("example.com", &taken).available);

        let status_wins = reply(211, Assoc::new().item("status", "available").build());
        assert!(LookupResult::from_response("example.com", &status_wins).available);
    }

    #[test]
    fn price_falls_back_through_cost_and_amount() {
        let attrs = Assoc::new().item("amount", "12.50").build();
        let p = PriceResult::from_attributes("example.com", 1, &attrs);
        assert_eq!(p.price, Some(12.5));
        assert_eq!(p.currency, "USD");
        assert!(!p.is_premium);

        let attrs = Assoc::new()
            .item("price", "99")
            .item("cost", "1")
            .item("is_registry_premium", "1")
            .item("currency", "CAD")
            .build();
        let p = PriceResult::from_attributes("example.com", 2, &attrs);
        assert_eq!((p.price, p.currency.as_str(), p.is_premium), (Some(99.0), "CAD", true));
    }

    #[test]
    fn suggest_sections_are_optional() {
        let item = |d: &str| Assoc::new().item("domain", d).item("status", "available").build();
        let attrs = Assoc::new()
            .item(
                "suggestion",
                Assoc::new()
                    .item("count", "2")
                    .item("items", vec![item("shop.com"), item("shop.net")]),
            )
            .build();
        let s = SuggestResult::from_attributes("shop", &attrs);
        let section = s.suggestion.unwrap();
        assert_eq!(section.count, 2);
        assert_eq!(section.items[1].domain, "shop.net");
        assert!(s.lookup.is_none());
        assert!(s.premium.is_none());
    }

    #[test]
    fn domain_info_orders_nameservers() {
        let ns = |name: &str, order: &str| {
            Assoc::new().item("name", name).item("sortorder", order).build()
        };
        let attrs = Assoc::new()
            .item("expiredate", "2027-01-01 00:00:00")
            .item("auto_renew", "0")
            .item(
                "nameserver_list",
                vec![ns("ns2.example.net", "2"), ns("ns1.example.net", "1")],
            )
            .build();
        let info = DomainInfo::from_attributes("example.com", &attrs);
        assert_eq!(info.nameservers, vec!["ns1.example.net", "ns2.example.net"]);
        assert_eq!(info.auto_renew, Some(false));
        assert!(info.contacts.is_none());
    }

    #[test]
    fn renewal_rejects_bad_year() {
        let req = RenewalRequest {
            domain: "example.com".into(),
            period: 1,
            current_expiration_year: 27,
            auto_renew: false,
        };
        assert!(req.validate().is_err());
    }
}
