//! Shared Key request signing for the Blob service.
//!
//! The string-to-sign is the verb, eleven standard header slots (all empty
//! for a plain GET), the sorted `x-ms-*` headers and the canonicalized
//! resource `/{account}{path}` followed by sorted query parameters.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;
use std::collections::BTreeMap;

use crate::core::error::{Result, SheetdashError};

type HmacSha256 = Hmac<Sha256>;

/// Standard header slots between the verb and the canonicalized headers
const STANDARD_HEADER_SLOTS: usize = 11;

pub fn string_to_sign(method: &str, url: &Url, ms_headers: &[(&str, &str)], account: &str) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(method);
    out.push('\n');
    for _ in 0..STANDARD_HEADER_SLOTS {
        out.push('\n');
    }
    out.push_str(&canonicalized_headers(ms_headers));
    out.push_str(&canonicalized_resource(url, account));
    out
}

fn canonicalized_headers(ms_headers: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<String, &str> = ms_headers
        .iter()
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim()))
        .filter(|(name, _)| name.starts_with("x-ms-"))
        .collect();

    sorted
        .into_iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

fn canonicalized_resource(url: &Url, account: &str) -> String {
    let mut resource = format!("/{account}{}", url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into_owned());
    }
    for (name, mut values) in params {
        values.sort();
        resource.push('\n');
        resource.push_str(&name);
        resource.push(':');
        resource.push_str(&values.join(","));
    }

    resource
}

/// Base64 HMAC-SHA256 of the string-to-sign under the decoded account key
pub fn sign(key: &[u8], string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| SheetdashError::Credentials(format!("unusable account key: {e}")))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

pub fn authorization_header(account: &str, signature: &str) -> String {
    format!("SharedKey {account}:{signature}")
}
