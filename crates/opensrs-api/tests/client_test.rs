// Integration tests for `OpenSrsClient` against a wiremock registrar.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opensrs_api::models::{DnsRecord, DnsRecordType};
use opensrs_api::signature::sign;
use opensrs_api::{Error, OpenSrsClient, templates};

const USERNAME: &str = "reseller";
const API_KEY: &str = "0123456789abcdef";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, OpenSrsClient) {
    let server = MockServer::start().await;
    let client = OpenSrsClient::from_reqwest(
        &server.uri(),
        USERNAME,
        SecretString::from(API_KEY.to_owned()),
        reqwest::Client::new(),
    )
    .unwrap();
    (server, client)
}

fn reply(success: bool, code: u32, text: &str, attributes: &str) -> String {
    format!(
        "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\
         <!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>\
         <OPS_envelope><header><version>0.9</version></header><body><data_block><dt_assoc>\
         <item key=\"protocol\">XCP</item><item key=\"action\">REPLY</item>\
         <item key=\"object\">DOMAIN</item>\
         <item key=\"is_success\">{}</item>\
         <item key=\"response_code\">{code}</item>\
         <item key=\"response_text\">{text}</item>\
         <item key=\"attributes\"><dt_assoc>{attributes}</dt_assoc></item>\
         </dt_assoc></data_block></body></OPS_envelope>",
        u8::from(success)
    )
}

fn xml_ok(attributes: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(reply(true, 200, "Command successful", attributes))
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_available_with_signed_headers() {
    let (server, client) = setup().await;

    let xml = templates::lookup("example.com", false).to_xml().unwrap();
    let expected_signature = sign(&xml, API_KEY);

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Username", USERNAME))
        .and(header("X-Signature", expected_signature.as_str()))
        .and(header("Content-Type", "text/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply(
            true,
            210,
            "Domain available",
            "<item key=\"status\">available</item>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.lookup("Example.COM").await.unwrap();

    assert!(result.available);
    assert_eq!(result.domain, "example.com");
    assert_eq!(result.response_code, 210);
    assert_eq!(result.response_text, "Domain available");
}

#[tokio::test]
async fn test_lookup_taken() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<item key=\"action\">LOOKUP</item>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply(
            true,
            211,
            "Domain taken",
            "<item key=\"status\">taken</item>",
        )))
        .mount(&server)
        .await;

    let result = client.lookup("example.com").await.unwrap();
    assert!(!result.available);
    assert_eq!(result.status.as_deref(), Some("taken"));
}

#[tokio::test]
async fn test_price_reads_cost_fallback() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<item key=\"period\">2</item>"))
        .respond_with(xml_ok("<item key=\"cost\">24.00</item>"))
        .mount(&server)
        .await;

    let price = client.price("example.com", 2).await.unwrap();
    assert_eq!(price.price, Some(24.0));
    assert_eq!(price.currency, "USD");
    assert_eq!(price.period, 2);
}

#[tokio::test]
async fn test_get_dns_zone_flattens_groups() {
    let (server, client) = setup().await;

    let records = "<item key=\"records\"><dt_assoc>\
        <item key=\"A\"><dt_array>\
          <item key=\"0\"><dt_assoc><item key=\"subdomain\">www</item>\
            <item key=\"ip_address\">192.0.2.10</item></dt_assoc></item>\
        </dt_array></item>\
        <item key=\"MX\"><dt_array>\
          <item key=\"0\"><dt_assoc><item key=\"subdomain\"></item>\
            <item key=\"hostname\">mx.example.com</item>\
            <item key=\"priority\">10</item></dt_assoc></item>\
        </dt_array></item>\
        </dt_assoc></item>";

    Mock::given(method("POST"))
        .and(body_string_contains("GET_DNS_ZONE"))
        .respond_with(xml_ok(records))
        .mount(&server)
        .await;

    let zone = client.get_dns_zone("example.com").await.unwrap();
    assert_eq!(
        zone.records,
        vec![
            DnsRecord::new(DnsRecordType::A, "www", "192.0.2.10"),
            DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com").with_priority(10),
        ]
    );
}

#[tokio::test]
async fn test_set_dns_zone_sends_mx_priority() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_string_contains("SET_DNS_ZONE"))
        .and(body_string_contains(
            "<item key=\"MX\"><dt_array><item key=\"0\"><dt_assoc>\
             <item key=\"subdomain\"></item><item key=\"hostname\">mx.example.com</item>\
             <item key=\"priority\">10</item>",
        ))
        .respond_with(xml_ok(""))
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![
        DnsRecord::new(DnsRecordType::A, "", "192.0.2.1"),
        DnsRecord::new(DnsRecordType::A, "www", "192.0.2.1"),
        DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com").with_priority(10),
    ];
    let ack = client.set_dns_zone("example.com", &records).await.unwrap();
    assert_eq!(ack.response_code, 200);
}

#[tokio::test]
async fn test_balance() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<item key=\"action\">GET_BALANCE</item>"))
        .and(header_exists("X-Signature"))
        .respond_with(xml_ok(
            "<item key=\"balance\">1234.56</item><item key=\"hold_balance\">10.00</item>",
        ))
        .mount(&server)
        .await;

    let balance = client.balance().await.unwrap();
    assert_eq!(balance.balance, Some(1234.56));
    assert_eq!(balance.hold_balance, Some(10.0));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_registrar_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply(
            false,
            415,
            "Feature not authorized",
            "",
        )))
        .mount(&server)
        .await;

    let err = client.domain_info("example.com").await.unwrap_err();
    match err {
        Error::Registrar { code, ref text } => {
            assert_eq!(code, 415);
            assert_eq!(text, "Feature not authorized");
        }
        other => panic!("expected Registrar error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_401_is_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.balance().await.unwrap_err();
    assert!(err.is_auth_failure(), "got: {err:?}");
    assert_eq!(err.response_code(), "AUTH_ERROR");
}

#[tokio::test]
async fn test_signature_rejection_is_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply(
            false,
            400,
            "Authentication Error.",
            "",
        )))
        .mount(&server)
        .await;

    let err = client.balance().await.unwrap_err();
    assert!(err.is_auth_failure(), "got: {err:?}");
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    let client = OpenSrsClient::from_reqwest(
        &server.uri(),
        USERNAME,
        SecretString::from(API_KEY.to_owned()),
        reqwest::Client::new(),
    )
    .unwrap()
    .with_timeouts(Duration::from_millis(50), Duration::from_millis(50));

    Mock::given(method("POST"))
        .respond_with(xml_ok("").set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = client.lookup("example.com").await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout } if timeout == Duration::from_millis(50)),
        "got: {err:?}"
    );
    assert_eq!(err.response_code(), "ECONNABORTED");
    assert_eq!(err.to_string(), "Request timed out after 50ms");
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.lookup("example.com").await.unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "got: {err:?}");
    assert_eq!(err.response_code(), "PARSE_ERROR");
}

#[tokio::test]
async fn test_invalid_record_is_rejected_before_sending() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(xml_ok(""))
        .expect(0)
        .mount(&server)
        .await;

    let records = vec![DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com")];
    let err = client
        .set_dns_zone("example.com", &records)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}
