//! AWS Signature Version 4 for bodiless GET requests.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::credentials::Credentials;
use crate::store::StoreError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// SHA-256 of an empty body; GET requests carry no payload.
pub(crate) const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// `yyyyMMddTHHmmssZ` as required by `x-amz-date`.
pub(crate) fn amz_date(now: OffsetDateTime) -> Result<String, StoreError> {
    let fmt = format_description!("[year][month][day]T[hour][minute][second]Z");
    now.format(&fmt)
        .map_err(|e| StoreError::Setup(format!("format request date: {}", e)))
}

/// Percent-encode a path per SigV4 rules: everything but unreserved characters
/// and `/` is escaped. The same string is sent on the wire so both sides agree.
pub(crate) fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for b in path.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Headers to add to a GET of `canonical_uri` on `host`: `x-amz-date`,
/// `x-amz-content-sha256` and `Authorization`.
pub(crate) fn signed_get_headers(
    creds: &Credentials,
    region: &str,
    host: &str,
    canonical_uri: &str,
    now: OffsetDateTime,
) -> Result<Vec<(String, String)>, StoreError> {
    let date = amz_date(now)?;
    let auth = authorization(creds, region, "GET", host, canonical_uri, &[], &date)?;
    Ok(vec![
        ("x-amz-date".to_string(), date),
        (
            "x-amz-content-sha256".to_string(),
            EMPTY_PAYLOAD_SHA256.to_string(),
        ),
        ("Authorization".to_string(), auth),
    ])
}

/// Build the `Authorization` header value.
///
/// `extra_headers` are signed in addition to `host`, `x-amz-content-sha256`
/// and `x-amz-date`; the caller must send them too.
pub(crate) fn authorization(
    creds: &Credentials,
    region: &str,
    method: &str,
    host: &str,
    canonical_uri: &str,
    extra_headers: &[(&str, &str)],
    amz_date: &str,
) -> Result<String, StoreError> {
    let day = amz_date
        .get(..8)
        .ok_or_else(|| StoreError::Setup(format!("bad request date {:?}", amz_date)))?;

    let mut headers: Vec<(String, String)> = vec![
        ("host".to_string(), host.to_string()),
        (
            "x-amz-content-sha256".to_string(),
            EMPTY_PAYLOAD_SHA256.to_string(),
        ),
        ("x-amz-date".to_string(), amz_date.to_string()),
    ];
    for (name, value) in extra_headers {
        headers.push((name.to_ascii_lowercase(), value.trim().to_string()));
    }
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(n, v)| format!("{}:{}\n", n, v))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(n, _)| n.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "{}\n{}\n\n{}\n{}\n{}",
        method, canonical_uri, canonical_headers, signed_headers, EMPTY_PAYLOAD_SHA256
    );
    let scope = format!("{}/{}/{}/aws4_request", day, region, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let k_date = hmac(format!("AWS4{}", creds.secret_key).as_bytes(), day.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, SERVICE.as_bytes())?;
    let k_signing = hmac(&k_service, b"aws4_request")?;
    let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{},SignedHeaders={},Signature={}",
        ALGORITHM, creds.access_key_id, scope, signed_headers, signature
    ))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StoreError::Setup(format!("hmac key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
