// opensrs-api: Async Rust client for the OpenSRS registrar XML API

pub mod client;
pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod signature;
pub mod templates;
pub mod transport;
pub mod xml;

pub use client::OpenSrsClient;
pub use error::Error;
pub use request::OpsRequest;
pub use response::{Ack, OpsResponse};
pub use transport::{Environment, LIVE_ENDPOINT, TEST_ENDPOINT, TlsMode, TransportConfig};
