// Request signing.
//
// OpenSRS authenticates every call with
// `md5(md5(xml + api_key) + api_key)`, both digests lowercase hex.

use md5::{Digest, Md5};

/// Compute the `X-Signature` header for an XML request body.
pub fn sign(xml: &str, api_key: &str) -> String {
    let inner = md5_hex(&[xml.as_bytes(), api_key.as_bytes()]);
    md5_hex(&[inner.as_bytes(), api_key.as_bytes()])
}

fn md5_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
