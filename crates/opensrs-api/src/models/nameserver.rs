// Registry nameserver (host object) models

use std::net::IpAddr;

use serde::Serialize;

use crate::error::Error;
use crate::models::domain::validate_domain;
use crate::xml::OpsValue;

/// A host object registered under a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nameserver {
    pub name: String,
    pub ipaddress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortorder: Option<u32>,
}

impl Nameserver {
    fn from_ops(node: &OpsValue) -> Option<Self> {
        Some(Self {
            name: node.get_str("name")?.to_owned(),
            ipaddress: node.get_str("ipaddress").map(str::to_owned),
            ipv6: node.get_str("ipv6").map(str::to_owned),
            sortorder: node.get_parsed("sortorder"),
        })
    }

    /// Older replies use `nsarray` instead of `nameserver_list`.
    pub fn list_from_attributes(attributes: &OpsValue) -> Vec<Self> {
        let list = match attributes.items("nameserver_list") {
            [] => attributes.items("nsarray"),
            list => list,
        };
        list.iter().filter_map(Self::from_ops).collect()
    }
}

/// Hostname and glue address for `CREATE` / `MODIFY` on `NAMESERVER`.
pub fn validate_host(name: &str, ipaddress: &str) -> Result<(String, String), Error> {
    let name = validate_domain(name)
        .map_err(|_| Error::validation("name", format!("'{name}' is not a hostname")))?;
    let ip = ipaddress.trim();
    if ip.parse::<IpAddr>().is_err() {
        return Err(Error::validation(
            "ipaddress",
            format!("'{ip}' is not an IP address"),
        ));
    }
    Ok((name, ip.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Assoc;

    #[test]
    fn reads_either_list_key() {
        let ns = Assoc::new()
            .item("name", "ns1.example.com")
            .item("ipaddress", "192.0.2.53")
            .build();
        let modern = Assoc::new().item("nameserver_list", vec![ns.clone()]).build();
        let legacy = Assoc::new().item("nsarray", vec![ns]).build();
        assert_eq!(Nameserver::list_from_attributes(&modern).len(), 1);
        assert_eq!(
            Nameserver::list_from_attributes(&legacy)[0].ipaddress.as_deref(),
            Some("192.0.2.53")
        );
    }

    #[test]
    fn host_needs_an_ip() {
        assert!(validate_host("ns1.example.com", "nope").is_err());
        assert!(validate_host("ns1.example.com", "2001:db8::53").is_ok());
    }
}
