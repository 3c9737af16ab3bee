//! AWS Signature Version 4 request signing.
//!
//! Only what the Query API needs: a single request with a fully buffered
//! payload, signed in the `Authorization` header.
//!
//! # Reference
//! AWS General Reference, "Signature Version 4 signing process".

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};

use crate::config::AwsCredentials;
use crate::ProviderError;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Characters that must be percent-encoded: everything except the RFC 3986
/// unreserved set.
pub(crate) const URI_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// The parts of an HTTP request that go into the signature.
#[derive(Debug)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    /// Absolute path, e.g. `/`.
    pub path: &'a str,
    /// Unencoded query parameters, in any order.
    pub query: &'a [(&'a str, &'a str)],
    /// Headers to sign. Must include `host`. `x-amz-date` and
    /// `x-amz-security-token` are added by [`sign`].
    pub headers: &'a [(&'a str, &'a str)],
    pub payload: &'a [u8],
}

/// Where and when the request is signed.
#[derive(Debug, Clone, Copy)]
pub struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
}

/// Result of signing: headers to attach to the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `(name, value)` pairs: `x-amz-date`, optionally `x-amz-security-token`,
    /// and `authorization`.
    pub headers: Vec<(&'static str, String)>,
    /// Hex signature, exposed for tests and debugging.
    pub signature: String,
}

/// Sign a request.
///
/// # Errors
/// Returns [`ProviderError::Credentials`] if the HMAC key cannot be built.
pub fn sign(
    request: &SignableRequest<'_>,
    scope: &SigningScope<'_>,
    credentials: &AwsCredentials,
) -> Result<SignedHeaders, ProviderError> {
    let amz_date = scope.time.format("%Y%m%dT%H%M%SZ").to_string();
    let date = scope.time.format("%Y%m%d").to_string();

    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), normalize_header_value(value)))
        .collect();
    headers.push(("x-amz-date".to_owned(), amz_date.clone()));
    if let Some(token) = &credentials.session_token {
        headers.push(("x-amz-security-token".to_owned(), token.clone()));
    }
    headers.sort();

    let canonical = canonical_request(request, &headers);
    let credential_scope = format!("{date}/{}/{}/aws4_request", scope.region, scope.service);
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
        hex::encode(Sha256::digest(canonical.as_bytes()))
    );

    let key = signing_key(&credentials.secret_access_key, &date, scope.region, scope.service)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    let signed_names = signed_header_names(&headers);
    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_names}, Signature={signature}",
        credentials.access_key_id
    );

    let mut out = vec![("x-amz-date", amz_date)];
    if let Some(token) = &credentials.session_token {
        out.push(("x-amz-security-token", token.clone()));
    }
    out.push(("authorization", authorization));

    Ok(SignedHeaders { headers: out, signature })
}

/// Percent-encode a string with the SigV4 rules.
pub(crate) fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, URI_ENCODE_SET).to_string()
}

fn canonical_request(request: &SignableRequest<'_>, headers: &[(String, String)]) -> String {
    let canonical_headers: String =
        headers.iter().map(|(name, value)| format!("{name}:{value}\n")).collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        canonical_uri(request.path),
        canonical_query(request.query),
        canonical_headers,
        signed_header_names(headers),
        hex::encode(Sha256::digest(request.payload)),
    )
}

fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn canonical_query(query: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> =
        query.iter().map(|(k, v)| (uri_encode(k), uri_encode(v))).collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn signed_header_names(headers: &[(String, String)]) -> String {
    headers.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(";")
}

/// Trim and collapse runs of spaces, as the canonical header form requires.
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, ProviderError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| ProviderError::Credentials(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
