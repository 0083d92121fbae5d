// OpenSRS XML API client
//
// Owns the signed POST round trip: serialize the envelope, sign it, send
// it with the reseller headers and a per-call timeout, then parse the
// reply and turn `is_success = 0` into `Error::Registrar`. Command
// methods live in the sibling files as inherent impls.

mod account;
mod dns;
mod domains;
mod nameservers;
mod transfers;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::request::OpsRequest;
use crate::response::OpsResponse;
use crate::signature::sign;
use crate::transport::TransportConfig;

const HEADER_USERNAME: &str = "X-Username";
const HEADER_SIGNATURE: &str = "X-Signature";

/// Registrar code for a rejected reseller username/signature.
const CODE_AUTH_FAILED: u32 = 400;

/// Which timeout budget a command runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    Standard,
    /// Registrations and transfers are processed synchronously upstream.
    Registration,
}

/// Async client for one reseller account on one OpenSRS endpoint.
pub struct OpenSrsClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    api_key: SecretString,
    timeout: Duration,
    registration_timeout: Duration,
}

impl OpenSrsClient {
    /// Build a client with its own `reqwest::Client` from `transport`.
    pub fn new(
        endpoint: &str,
        username: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::from_reqwest(endpoint, username, api_key, http)?;
        client.timeout = transport.timeout;
        client.registration_timeout = transport.registration_timeout;
        Ok(client)
    }

    /// Wrap a pre-built `reqwest::Client` with default timeouts.
    pub fn from_reqwest(
        endpoint: &str,
        username: &str,
        api_key: SecretString,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let defaults = TransportConfig::default();
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
            username: username.to_owned(),
            api_key,
            timeout: defaults.timeout,
            registration_timeout: defaults.registration_timeout,
        })
    }

    /// Override both per-call timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeout: Duration, registration_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.registration_timeout = registration_timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    // ── Round trip ───────────────────────────────────────────────────

    /// Send any OPS request and return the successful reply.
    pub async fn execute(&self, request: &OpsRequest) -> Result<OpsResponse, Error> {
        self.send(request, CallKind::Standard).await
    }

    pub(crate) async fn send(
        &self,
        request: &OpsRequest,
        kind: CallKind,
    ) -> Result<OpsResponse, Error> {
        let timeout = match kind {
            CallKind::Standard => self.timeout,
            CallKind::Registration => self.registration_timeout,
        };
        let xml = request.to_xml()?;
        let signature = sign(&xml, self.api_key.expose_secret());

        debug!(
            action = %request.action,
            object = %request.object,
            timeout_ms = timeout.as_millis(),
            "POST {}",
            self.endpoint
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml")
            .header(HEADER_USERNAME, &self.username)
            .header(HEADER_SIGNATURE, signature)
            .timeout(timeout)
            .body(xml)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("endpoint rejected reseller credentials (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(|e| transport_error(e, timeout))?;

        let parsed = match OpsResponse::from_xml(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::Http {
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => return Err(e),
        };

        if !parsed.is_success {
            warn!(
                action = %request.action,
                object = %request.object,
                code = parsed.response_code,
                text = %parsed.response_text,
                "registrar rejected request"
            );
            if parsed.response_code == CODE_AUTH_FAILED
                && parsed.response_text.to_ascii_lowercase().contains("authentication")
            {
                return Err(Error::Authentication {
                    message: parsed.response_text,
                });
            }
        }
        parsed.into_success()
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::Timeout { timeout }
    } else {
        Error::Transport(e)
    }
}
