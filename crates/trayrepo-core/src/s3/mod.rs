//! S3 object GETs over libcurl.
//!
//! Objects are addressed path-style (`<endpoint>/<bucket>/<key>`) and every
//! request is signed with AWS Signature V4. Non-2xx responses become
//! [`StoreError::Service`] with the `<Code>`/`<Message>` of the S3 error body
//! when one is present.

mod sign;

use std::cell::Cell;
use std::io::Write;
use std::str;

use time::OffsetDateTime;

use crate::config::S3Config;
use crate::credentials::Credentials;
use crate::store::{ObjectStore, StoreError};

/// Error bodies beyond this size are truncated; they are only used for diagnostics.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Object-store client for one set of credentials.
pub struct S3Client {
    /// `scheme://host[:port]`
    base_url: String,
    /// Value of the `Host` header, as curl sends it.
    host: String,
    region: String,
    credentials: Credentials,
    settings: S3Config,
}

impl S3Client {
    pub fn new(settings: &S3Config, credentials: Credentials) -> Result<Self, StoreError> {
        let url = url::Url::parse(&settings.endpoint)
            .map_err(|e| StoreError::Setup(format!("endpoint {:?}: {}", settings.endpoint, e)))?;
        let host_name = url
            .host_str()
            .ok_or_else(|| StoreError::Setup(format!("endpoint {:?} has no host", settings.endpoint)))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host_name, port),
            None => host_name.to_string(),
        };
        Ok(Self {
            base_url: format!("{}://{}", url.scheme(), host),
            host,
            region: settings.region.clone(),
            credentials,
            settings: settings.clone(),
        })
    }

    /// Encoded request path for `key` in `bucket`.
    fn object_path(bucket: &str, key: &str) -> String {
        sign::encode_path(&format!("/{}/{}", bucket, key.trim_start_matches('/')))
    }
}

impl ObjectStore for S3Client {
    fn get_object(&self, bucket: &str, key: &str, sink: &mut dyn Write) -> Result<u64, StoreError> {
        let path = Self::object_path(bucket, key);
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET object");

        let signed = sign::signed_get_headers(
            &self.credentials,
            &self.region,
            &self.host,
            &path,
            OffsetDateTime::now_utc(),
        )?;

        let mut easy = curl::easy::Easy::new();
        easy.url(&url)?;
        easy.get(true)?;
        easy.connect_timeout(self.settings.connect_timeout())?;
        easy.timeout(self.settings.timeout())?;

        let mut list = curl::easy::List::new();
        for (k, v) in &signed {
            list.append(&format!("{}: {}", k, v))?;
        }
        easy.http_headers(list)?;

        // Status of the response currently being received; the body only goes
        // to `sink` once a 2xx status line has been seen.
        let status = Cell::new(0u32);
        let mut written: u64 = 0;
        let mut error_body: Vec<u8> = Vec::new();
        let mut sink_err: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Some(code) = str::from_utf8(data).ok().and_then(parse_status_line) {
                    status.set(code);
                }
                true
            })?;
            transfer.write_function(|data| {
                if !(200..300).contains(&status.get()) {
                    let room = MAX_ERROR_BODY.saturating_sub(error_body.len());
                    error_body.extend_from_slice(&data[..data.len().min(room)]);
                    return Ok(data.len());
                }
                match sink.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        sink_err = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_err {
            return Err(StoreError::Sink(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            let body = String::from_utf8_lossy(&error_body);
            return Err(StoreError::Service {
                status: code,
                code: tag_text(&body, "Code"),
                message: tag_text(&body, "Message"),
            });
        }
        sink.flush().map_err(StoreError::Sink)?;
        tracing::debug!(%url, bytes = written, "GET object complete");
        Ok(written)
    }
}

/// Status code from an `HTTP/x y reason` line; `None` for other header lines.
fn parse_status_line(line: &str) -> Option<u32> {
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Text of the first `<tag>...</tag>` in an S3 error document.
fn tag_text(body: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = body.find(&open)? + open.len();
    let len = body[start..].find(&close)?;
    Some(body[start..start + len].trim().to_string())
}
