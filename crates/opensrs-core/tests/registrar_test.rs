// Integration tests for `Registrar` workflows against a wiremock registrar.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opensrs_api::OpenSrsClient;
use opensrs_api::models::records_from_ops;
use opensrs_api::xml::parse_data_block;
use opensrs_core::{
    CacheConfig, CoreError, DnsRecord, DnsRecordType, RecordSelector, Registrar, ZoneAction,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with_cache(cache: CacheConfig) -> (MockServer, Registrar) {
    let server = MockServer::start().await;
    let client = OpenSrsClient::from_reqwest(
        &server.uri(),
        "reseller",
        SecretString::from("key".to_owned()),
        reqwest::Client::new(),
    )
    .unwrap();
    (server, Registrar::with_client(client, cache))
}

async fn setup() -> (MockServer, Registrar) {
    setup_with_cache(CacheConfig::default()).await
}

fn reply(success: bool, code: u32, attributes: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\
         <OPS_envelope><header><version>0.9</version></header><body><data_block><dt_assoc>\
         <item key=\"is_success\">{}</item>\
         <item key=\"response_code\">{code}</item>\
         <item key=\"response_text\">ok</item>\
         <item key=\"attributes\"><dt_assoc>{attributes}</dt_assoc></item>\
         </dt_assoc></data_block></body></OPS_envelope>",
        u8::from(success)
    ))
}

/// A zone with an apex A, two `www` A records and an MX.
const ZONE: &str = "<item key=\"records\"><dt_assoc>\
    <item key=\"A\"><dt_array>\
      <item key=\"0\"><dt_assoc><item key=\"subdomain\"></item><item key=\"ip_address\">192.0.2.1</item></dt_assoc></item>\
      <item key=\"1\"><dt_assoc><item key=\"subdomain\">www</item><item key=\"ip_address\">192.0.2.10</item></dt_assoc></item>\
      <item key=\"2\"><dt_assoc><item key=\"subdomain\">www</item><item key=\"ip_address\">192.0.2.11</item></dt_assoc></item>\
    </dt_array></item>\
    <item key=\"MX\"><dt_array>\
      <item key=\"0\"><dt_assoc><item key=\"subdomain\"></item><item key=\"hostname\">mx.example.com</item><item key=\"priority\">10</item></dt_assoc></item>\
    </dt_array></item>\
    </dt_assoc></item>";

async fn mount_zone(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_string_contains("GET_DNS_ZONE"))
        .respond_with(reply(true, 200, ZONE))
        .mount(server)
        .await;
}

/// Records carried by every SET_DNS_ZONE request the server saw.
async fn set_zone_payloads(server: &MockServer) -> Vec<Vec<DnsRecord>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .filter(|body| body.contains("SET_DNS_ZONE"))
        .map(|body| {
            let block = parse_data_block(&body).unwrap();
            block
                .path(&["attributes", "records"])
                .map(records_from_ops)
                .unwrap_or_default()
        })
        .collect()
}

// ── DNS safe update ─────────────────────────────────────────────────

#[tokio::test]
async fn test_add_record_keeps_existing_and_sets_once() {
    let (server, registrar) = setup().await;
    mount_zone(&server).await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .respond_with(reply(true, 200, ""))
        .expect(1)
        .mount(&server)
        .await;

    let new = DnsRecord::new(DnsRecordType::Txt, "@", "v=spf1 -all");
    let change = registrar
        .add_record("example.com", new, false)
        .await
        .unwrap();

    assert_eq!(change.action, ZoneAction::Add);
    assert_eq!((change.records_before, change.records_after), (4, 5));

    let payloads = set_zone_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    let sent = &payloads[0];
    assert_eq!(sent.len(), 5);
    assert!(sent.contains(&DnsRecord::new(DnsRecordType::Txt, "", "v=spf1 -all")));
    assert!(sent.contains(&DnsRecord::new(DnsRecordType::A, "www", "192.0.2.11")));
    assert!(sent.contains(
        &DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com").with_priority(10)
    ));
}

#[tokio::test]
async fn test_add_record_writes_back_unsupported_types() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("GET_DNS_ZONE"))
        .respond_with(reply(
            true,
            200,
            "<item key=\"records\"><dt_assoc>\
             <item key=\"A\"><dt_array>\
               <item key=\"0\"><dt_assoc><item key=\"subdomain\">www</item><item key=\"ip_address\">192.0.2.10</item></dt_assoc></item>\
             </dt_array></item>\
             <item key=\"CAA\"><dt_array>\
               <item key=\"0\"><dt_assoc><item key=\"subdomain\"></item><item key=\"flag\">0</item>\
               <item key=\"tag\">issue</item><item key=\"value\">letsencrypt.org</item></dt_assoc></item>\
             </dt_array></item>\
             </dt_assoc></item>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .and(body_string_contains("<item key=\"CAA\">"))
        .and(body_string_contains("<item key=\"value\">letsencrypt.org</item>"))
        .respond_with(reply(true, 200, ""))
        .expect(1)
        .mount(&server)
        .await;

    let zone = registrar.get_zone("example.com").await.unwrap();
    assert_eq!(zone.records.len(), 1);
    assert_eq!(zone.unmapped["CAA"].len(), 1);

    let change = registrar
        .add_record(
            "example.com",
            DnsRecord::new(DnsRecordType::A, "api", "192.0.2.20"),
            false,
        )
        .await
        .unwrap();
    assert_eq!((change.records_before, change.records_after), (1, 2));

    let payloads = set_zone_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].contains(&DnsRecord::new(DnsRecordType::A, "api", "192.0.2.20")));
}

#[tokio::test]
async fn test_ambiguous_remove_sends_nothing() {
    let (server, registrar) = setup().await;
    mount_zone(&server).await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .respond_with(reply(true, 200, ""))
        .expect(0)
        .mount(&server)
        .await;

    let selector = RecordSelector::new(DnsRecordType::A, "www", None);
    let err = registrar
        .remove_record("example.com", &selector, false)
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::AmbiguousMatch { count: 2, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_failed_read_aborts_update() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("GET_DNS_ZONE"))
        .respond_with(reply(false, 465, ""))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .respond_with(reply(true, 200, ""))
        .expect(0)
        .mount(&server)
        .await;

    let err = registrar
        .add_record(
            "example.com",
            DnsRecord::new(DnsRecordType::A, "api", "192.0.2.50"),
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { code: 465, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_remove_with_address_and_verify() {
    let (server, registrar) = setup().await;
    mount_zone(&server).await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .respond_with(reply(true, 200, ""))
        .expect(1)
        .mount(&server)
        .await;

    let selector = RecordSelector::new(DnsRecordType::A, "www", Some("192.0.2.11"));
    let change = registrar
        .remove_record("example.com", &selector, true)
        .await
        .unwrap();

    assert_eq!(change.record.address, "192.0.2.11");
    assert_eq!(change.records_after, 3);
    // The mock zone never changes, so the removed record is still there.
    assert_eq!(change.verified, Some(false));
    assert_eq!(set_zone_payloads(&server).await[0].len(), 3);
}

#[tokio::test]
async fn test_update_mx_priority() {
    let (server, registrar) = setup().await;
    mount_zone(&server).await;
    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .and(body_string_contains("<item key=\"priority\">5</item>"))
        .respond_with(reply(true, 200, ""))
        .expect(1)
        .mount(&server)
        .await;

    let selector = RecordSelector::new(DnsRecordType::Mx, "", None);
    let replacement = DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com").with_priority(5);
    let change = registrar
        .update_record("example.com", &selector, replacement, false)
        .await
        .unwrap();
    assert_eq!(change.previous.and_then(|p| p.priority), Some(10));
}

// ── Cache ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_is_cached_until_ttl() {
    let (server, registrar) = setup_with_cache(CacheConfig {
        ttl: Duration::from_millis(300),
        sweep_interval: Duration::from_secs(600),
    })
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("LOOKUP"))
        .respond_with(reply(true, 210, "<item key=\"status\">available</item>"))
        .expect(2)
        .mount(&server)
        .await;

    assert!(registrar.lookup("example.com", false).await.unwrap().available);
    assert!(registrar.lookup("EXAMPLE.com", false).await.unwrap().available);
    let stats = registrar.cache_stats().lookup;
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));

    tokio::time::sleep(Duration::from_millis(400)).await;
    registrar.lookup("example.com", false).await.unwrap();
}

#[tokio::test]
async fn test_sweeper_drops_expired_entries_without_reads() {
    let (server, registrar) = setup_with_cache(CacheConfig {
        ttl: Duration::from_millis(100),
        sweep_interval: Duration::from_millis(150),
    })
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("LOOKUP"))
        .respond_with(reply(true, 210, "<item key=\"status\">available</item>"))
        .expect(1)
        .mount(&server)
        .await;

    registrar.start_cache_sweeper().await;
    registrar.lookup("example.com", false).await.unwrap();
    assert_eq!(registrar.cache_stats().lookup.entries, 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    let stats = registrar.cache_stats().lookup;
    assert_eq!((stats.entries, stats.hits, stats.misses), (0, 0, 1));

    registrar.shutdown().await;
}

#[tokio::test]
async fn test_dns_reads_bypass_cache() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("GET_DNS_ZONE"))
        .respond_with(reply(true, 200, ZONE))
        .expect(2)
        .mount(&server)
        .await;

    registrar.get_zone("example.com").await.unwrap();
    registrar.get_zone("example.com").await.unwrap();
}

// ── Bulk ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bulk_lookup_reports_each_domain() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<item key=\"domain\">taken.com</item>"))
        .respond_with(reply(true, 211, "<item key=\"status\">taken</item>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<item key=\"domain\">broken.com</item>"))
        .respond_with(reply(false, 465, ""))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("LOOKUP"))
        .respond_with(reply(true, 210, "<item key=\"status\">available</item>"))
        .mount(&server)
        .await;

    let domains: Vec<String> = ["a.com", "taken.com", "c.com", "d.com", "e.com", "broken.com", "g.com"]
        .iter()
        .map(|d| (*d).to_owned())
        .collect();
    let items = registrar.bulk_lookup(&domains).await.unwrap();

    assert_eq!(items.len(), 7);
    let names: Vec<&str> = items.iter().map(|i| i.domain.as_str()).collect();
    assert_eq!(names, domains.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(items[1].data.as_ref().map(|r| r.available), Some(false));
    assert_eq!(items[0].data.as_ref().map(|r| r.available), Some(true));
    assert!(!items[5].success);
    assert_eq!(items[5].response_code.as_deref(), Some("465"));
}

#[tokio::test]
async fn test_register_normalizes_contacts() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("SW_REGISTER"))
        .and(body_string_contains("<item key=\"phone\">+1.4165550123</item>"))
        .and(body_string_contains("<item key=\"country\">CA</item>"))
        .respond_with(reply(true, 200, "<item key=\"id\">3735281</item>"))
        .expect(1)
        .mount(&server)
        .await;

    let contact = opensrs_core::Contact {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        address1: "1 Main St".into(),
        city: "Toronto".into(),
        state: "on".into(),
        country: "ca".into(),
        postal_code: "M5V 1A1".into(),
        phone: "(416) 555-0123".into(),
        email: "jane@example.com".into(),
        ..Default::default()
    };
    let req = opensrs_core::RegistrationRequest {
        domain: "example.com".into(),
        period: 1,
        contacts: opensrs_core::ContactSet::uniform(&contact),
        nameservers: vec!["ns1.example.net".into(), "ns2.example.net".into()],
        reg_username: "jane".into(),
        reg_password: "s3cret!".into(),
        auto_renew: false,
        lock: true,
        whois_privacy: false,
    };
    let result = registrar.register(req).await.unwrap();
    assert_eq!(result.id.as_deref(), Some("3735281"));
}

#[tokio::test]
async fn test_register_keeps_international_calling_code() {
    let (server, registrar) = setup().await;
    Mock::given(method("POST"))
        .and(body_string_contains("SW_REGISTER"))
        .and(body_string_contains("<item key=\"phone\">+44.2071234567</item>"))
        .respond_with(reply(true, 200, "<item key=\"id\">3735282</item>"))
        .expect(1)
        .mount(&server)
        .await;

    let contact = opensrs_core::Contact {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        address1: "1 Main St".into(),
        city: "Toronto".into(),
        state: "ON".into(),
        country: "CA".into(),
        postal_code: "M5V 1A1".into(),
        phone: "+44 20 7123 4567".into(),
        email: "jane@example.com".into(),
        ..Default::default()
    };
    let mut req = registration("example.com", &contact);
    registrar.register(req.clone()).await.unwrap();

    req.contacts.admin.phone = "+289 555 0100".into();
    let err = registrar.register(req).await.unwrap_err();
    assert!(
        matches!(err, CoreError::ValidationFailed { ref field, .. } if field == "phone"),
        "got: {err:?}"
    );
}

fn registration(domain: &str, contact: &opensrs_core::Contact) -> opensrs_core::RegistrationRequest {
    opensrs_core::RegistrationRequest {
        domain: domain.into(),
        period: 1,
        contacts: opensrs_core::ContactSet::uniform(contact),
        nameservers: vec!["ns1.example.net".into(), "ns2.example.net".into()],
        reg_username: "jane".into(),
        reg_password: "s3cret!".into(),
        auto_renew: false,
        lock: true,
        whois_privacy: false,
    }
}
