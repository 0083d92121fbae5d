// Per-command request templates
//
// One function per OpenSRS command. Each encodes the attribute shape the
// registrar expects; inputs are assumed validated by the caller.

use crate::models::contact::ContactSet;
use crate::models::dns::{DnsRecord, UnmappedRecords, records_to_ops_keeping};
use crate::models::domain::{RegistrationRequest, RenewalRequest, SuggestService};
use crate::models::transfer::TransferRequest;
use crate::request::OpsRequest;
use crate::xml::{Assoc, OpsValue};

const DOMAIN: &str = "DOMAIN";
const NAMESERVER: &str = "NAMESERVER";

// ── Domains ──────────────────────────────────────────────────────────

pub fn lookup(domain: &str, no_cache: bool) -> OpsRequest {
    OpsRequest::new("LOOKUP", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("no_cache", no_cache),
    )
}

pub fn get_price(domain: &str, period: u32, reg_type: Option<&str>) -> OpsRequest {
    OpsRequest::new("GET_PRICE", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("period", period)
            .opt_item("reg_type", reg_type),
    )
}

pub fn name_suggest(
    searchstring: &str,
    tlds: &[String],
    services: &[SuggestService],
    maximum: Option<u32>,
    max_wait_time: Option<u32>,
) -> OpsRequest {
    let tlds: Vec<OpsValue> = tlds.iter().map(OpsValue::from).collect();
    let services: Vec<OpsValue> = services
        .iter()
        .map(|s| OpsValue::from(s.to_string()))
        .collect();
    OpsRequest::new("NAME_SUGGEST", DOMAIN).attributes(
        Assoc::new()
            .item("searchstring", searchstring)
            .item("tlds", tlds)
            .item("services", services)
            .opt_item("maximum", maximum)
            .opt_item("max_wait_time", max_wait_time),
    )
}

/// `nameserver_list` entries are 1-based by `sortorder`.
fn nameserver_list(nameservers: &[String]) -> OpsValue {
    nameservers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Assoc::new()
                .item("name", name)
                .item("sortorder", i + 1)
                .build()
        })
        .collect::<Vec<_>>()
        .into()
}

fn sw_register(
    reg_type: &str,
    domain: &str,
    period: u32,
    contacts: &ContactSet,
    nameservers: &[String],
    credentials: (&str, &str),
) -> Assoc {
    let custom_ns = !nameservers.is_empty();
    let (reg_username, reg_password) = credentials;
    Assoc::new()
        .item("domain", domain)
        .item("period", period)
        .item("reg_type", reg_type)
        .item("reg_username", reg_username)
        .item("reg_password", reg_password)
        .item("handle", "process")
        .item("custom_tech_contact", false)
        .item("custom_nameservers", custom_ns)
        .opt_item("nameserver_list", custom_ns.then(|| nameserver_list(nameservers)))
        .item("contact_set", contacts.to_ops())
}

pub fn register(req: &RegistrationRequest) -> OpsRequest {
    let attrs = sw_register(
        "new",
        &req.domain,
        req.period,
        &req.contacts,
        &req.nameservers,
        (&req.reg_username, &req.reg_password),
    )
    .item("auto_renew", req.auto_renew)
    .item("f_lock_domain", req.lock)
    .item("f_whois_privacy", req.whois_privacy);
    OpsRequest::new("SW_REGISTER", DOMAIN).attributes(attrs)
}

pub fn renew(req: &RenewalRequest) -> OpsRequest {
    OpsRequest::new("RENEW", DOMAIN).attributes(
        Assoc::new()
            .item("domain", req.domain.as_str())
            .item("period", req.period)
            .item("currentexpirationyear", req.current_expiration_year)
            .item("handle", "process")
            .item("auto_renew", req.auto_renew),
    )
}

/// `GET DOMAIN` takes the domain next to `action`, not in `attributes`.
pub fn get_domain_info(domain: &str) -> OpsRequest {
    OpsRequest::new("GET", DOMAIN)
        .top_level("domain", domain)
        .attributes(Assoc::new().item("type", "all_info"))
}

pub fn modify_contacts(domain: &str, contacts: &ContactSet) -> OpsRequest {
    OpsRequest::new("MODIFY", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("data", "contact_info")
            .item("affect_domains", false)
            .item("contact_set", contacts.to_ops()),
    )
}

pub fn modify_lock(domain: &str, locked: bool) -> OpsRequest {
    OpsRequest::new("MODIFY", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("data", "status")
            .item("lock_state", locked),
    )
}

pub fn modify_auto_renew(domain: &str, auto_renew: bool) -> OpsRequest {
    OpsRequest::new("MODIFY", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("data", "expire_action")
            .item("auto_renew", auto_renew)
            .item("let_expire", false),
    )
}

// ── DNS ──────────────────────────────────────────────────────────────

pub fn get_dns_zone(domain: &str) -> OpsRequest {
    OpsRequest::new("GET_DNS_ZONE", DOMAIN).attributes(Assoc::new().item("domain", domain))
}

pub fn create_dns_zone(domain: &str, dns_template: Option<&str>) -> OpsRequest {
    OpsRequest::new("CREATE_DNS_ZONE", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .opt_item("dns_template", dns_template),
    )
}

pub fn delete_dns_zone(domain: &str) -> OpsRequest {
    OpsRequest::new("DELETE_DNS_ZONE", DOMAIN).attributes(Assoc::new().item("domain", domain))
}

/// Full replacement of the zone's record set. `preserved` entries are
/// written back verbatim alongside `records`.
pub fn set_dns_zone(
    domain: &str,
    records: &[DnsRecord],
    preserved: &UnmappedRecords,
) -> OpsRequest {
    OpsRequest::new("SET_DNS_ZONE", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("records", records_to_ops_keeping(records, preserved)),
    )
}

// ── Nameservers ──────────────────────────────────────────────────────

pub fn get_nameservers(domain: &str) -> OpsRequest {
    OpsRequest::new("GET", NAMESERVER).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("name", "all"),
    )
}

pub fn create_nameserver(domain: &str, name: &str, ipaddress: &str) -> OpsRequest {
    OpsRequest::new("CREATE", NAMESERVER).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("name", name)
            .item("ipaddress", ipaddress),
    )
}

pub fn delete_nameserver(domain: &str, name: &str, ipaddress: Option<&str>) -> OpsRequest {
    OpsRequest::new("DELETE", NAMESERVER).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("name", name)
            .opt_item("ipaddress", ipaddress),
    )
}

pub fn modify_nameserver(
    domain: &str,
    name: &str,
    ipaddress: &str,
    new_name: Option<&str>,
) -> OpsRequest {
    OpsRequest::new("MODIFY", NAMESERVER).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("name", name)
            .item("ipaddress", ipaddress)
            .opt_item("new_name", new_name),
    )
}

pub fn assign_nameservers(domain: &str, nameservers: &[String]) -> OpsRequest {
    let assign: Vec<OpsValue> = nameservers.iter().map(OpsValue::from).collect();
    OpsRequest::new("ADVANCED_UPDATE_NAMESERVERS", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("op_type", "assign")
            .item("assign_ns", assign),
    )
}

// ── Transfers / account ──────────────────────────────────────────────

pub fn check_transfer(domain: &str) -> OpsRequest {
    OpsRequest::new("CHECK_TRANSFER", DOMAIN).attributes(
        Assoc::new()
            .item("domain", domain)
            .item("check_status", true)
            .item("get_request_address", true),
    )
}

pub fn transfer(req: &TransferRequest) -> OpsRequest {
    let attrs = sw_register(
        "transfer",
        &req.domain,
        1,
        &req.contacts,
        &req.nameservers,
        (&req.reg_username, &req.reg_password),
    )
    .item("auth_info", req.auth_info.as_str());
    OpsRequest::new("SW_REGISTER", DOMAIN).attributes(attrs)
}

pub fn get_balance() -> OpsRequest {
    OpsRequest::new("GET_BALANCE", "BALANCE")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::dns::DnsRecordType;

    #[test]
    fn lookup_envelope() {
        let xml = lookup("example.com", false).to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(xml.contains("<item key=\"action\">LOOKUP</item><item key=\"object\">DOMAIN</item>"));
        assert!(xml.contains(
            "<item key=\"attributes\"><dt_assoc><item key=\"domain\">example.com</item>\
             <item key=\"no_cache\">0</item></dt_assoc></item>"
        ));
    }

    #[test]
    fn set_zone_with_mx_priority() {
        let records = [
            DnsRecord::new(DnsRecordType::A, "", "192.0.2.1"),
            DnsRecord::new(DnsRecordType::Mx, "", "mail.example.com").with_priority(10),
            DnsRecord::new(DnsRecordType::Cname, "www", "example.com"),
        ];
        let xml = set_dns_zone("example.com", &records, &Default::default()).to_xml().unwrap();
        let mx = xml.find("<item key=\"MX\"><dt_array>").unwrap();
        let priority = xml.find("<item key=\"priority\">10</item>").unwrap();
        assert!(priority > mx);
        assert!(xml.contains("<item key=\"CNAME\"><dt_array><item key=\"0\">"));
    }

    #[test]
    fn suggest_lists_are_zero_indexed() {
        let xml = name_suggest(
            "coffee",
            &[".com".into(), ".net".into()],
            &[SuggestService::Lookup, SuggestService::Suggestion],
            Some(20),
            None,
        )
        .to_xml()
        .unwrap();
        assert!(xml.contains(
            "<item key=\"tlds\"><dt_array><item key=\"0\">.com</item><item key=\"1\">.net</item></dt_array></item>"
        ));
        assert!(xml.contains("<item key=\"1\">suggestion</item>"));
        assert!(!xml.contains("max_wait_time"));
    }

    #[test]
    fn register_without_nameservers_uses_defaults() {
        let contact = crate::models::contact::Contact {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            address1: "1 Main St".into(),
            city: "Toronto".into(),
            state: "ON".into(),
            country: "CA".into(),
            postal_code: "M5V 1A1".into(),
            phone: "+1.4165550123".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        };
        let req = RegistrationRequest {
            domain: "example.com".into(),
            period: 2,
            contacts: ContactSet::uniform(&contact),
            nameservers: Vec::new(),
            reg_username: "jane".into(),
            reg_password: "s3cret!".into(),
            auto_renew: false,
            lock: true,
            whois_privacy: false,
        };
        let xml = register(&req).to_xml().unwrap();
        assert!(xml.contains("<item key=\"reg_type\">new</item>"));
        assert!(xml.contains("<item key=\"custom_nameservers\">0</item>"));
        assert!(!xml.contains("nameserver_list"));
        assert!(xml.contains("<item key=\"f_lock_domain\">1</item>"));
        assert!(xml.contains("<item key=\"billing\"><dt_assoc><item key=\"first_name\">Jane</item>"));
    }

    #[test]
    fn transfer_carries_auth_info() {
        let req = TransferRequest {
            domain: "example.com".into(),
            auth_info: "a&b<c".into(),
            contacts: ContactSet::uniform(&crate::models::contact::Contact::default()),
            nameservers: vec!["ns1.example.net".into()],
            reg_username: "jane".into(),
            reg_password: "s3cret!".into(),
        };
        let xml = transfer(&req).to_xml().unwrap();
        assert!(xml.contains("<item key=\"reg_type\">transfer</item>"));
        assert!(xml.contains("<item key=\"auth_info\">a&amp;b&lt;c</item>"));
        assert!(xml.contains(
            "<item key=\"nameserver_list\"><dt_array><item key=\"0\"><dt_assoc>\
             <item key=\"name\">ns1.example.net</item><item key=\"sortorder\">1</item>"
        ));
    }

    #[test]
    fn domain_info_uses_top_level_domain() {
        let xml = get_domain_info("example.com").to_xml().unwrap();
        assert!(xml.contains(
            "<item key=\"object\">DOMAIN</item><item key=\"domain\">example.com</item>"
        ));
    }
}
