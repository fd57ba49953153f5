use std::sync::Arc;

use hmac::{Hmac, Mac};
use reqwest::header::HeaderValue;
use sha2::Sha256;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

use crate::clock::{Clock, SystemClock};
use crate::{InventoryError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const CEA_ALGORITHM: &str = "HmacSHA256";
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

/// The `signed-date` value: UTC, two-digit year, second precision
/// (`YYMMDDTHHMMSSZ`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeaTimestamp {
    signed_date: String,
}

impl CeaTimestamp {
    pub fn from_datetime(datetime: OffsetDateTime) -> Result<Self> {
        const SIGNED_DATE_FORMAT: &[FormatItem<'_>] = format_description!(
            "[year repr:last_two][month][day]T[hour][minute][second]Z"
        );

        let signed_date = datetime
            .to_offset(UtcOffset::UTC)
            .format(SIGNED_DATE_FORMAT)
            .map_err(|err| {
                InventoryError::InvalidResponse(format!("failed to format signed-date: {err}"))
            })?;
        Ok(Self { signed_date })
    }

    pub fn from_signed_date(signed_date: &str) -> Result<Self> {
        let signed_date = signed_date.trim();
        let bytes = signed_date.as_bytes();
        let well_formed = bytes.len() == 14
            && bytes[6] == b'T'
            && bytes[13] == b'Z'
            && bytes[..6].iter().all(u8::is_ascii_digit)
            && bytes[7..13].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(InventoryError::InvalidResponse(format!(
                "signed-date must look like YYMMDDTHHMMSSZ, got {signed_date:?}"
            )));
        }
        Ok(Self {
            signed_date: signed_date.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.signed_date
    }
}

#[derive(Debug, Clone)]
pub struct SignedRequestHeaders {
    pub authorization: String,
    pub content_type: String,
}

impl SignedRequestHeaders {
    pub fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("authorization", &self.authorization)
            .header("content-type", &self.content_type)
    }
}

#[derive(Debug, Clone)]
pub struct CeaSigningResult {
    pub headers: SignedRequestHeaders,
    pub message: String,
    pub signature: String,
}

/// Signs seller API requests with the `CEA` HMAC scheme.
#[derive(Clone)]
pub struct CeaSigner {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CeaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CeaSigner")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl CeaSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// Signs with the current time. The result is single-use: it embeds the
    /// signing second and must not be cached.
    pub fn sign(&self, method: &str, path: &str, query: &str) -> Result<SignedRequestHeaders> {
        let timestamp = CeaTimestamp::from_datetime(self.clock.now_utc())?;
        Ok(self.sign_at(method, path, query, timestamp)?.headers)
    }

    pub fn sign_at(
        &self,
        method: &str,
        path: &str,
        query: &str,
        timestamp: CeaTimestamp,
    ) -> Result<CeaSigningResult> {
        let message = signing_message(&timestamp, method, path, query);
        let signature = hex_encode(&hmac_sha256(
            self.credentials.secret_key.as_bytes(),
            &message,
        )?);
        let authorization = format!(
            "CEA algorithm={}, access-key={}, signed-date={}, signature={}",
            CEA_ALGORITHM,
            self.credentials.access_key,
            timestamp.as_str(),
            signature
        );
        HeaderValue::from_str(&authorization).map_err(|err| {
            InventoryError::Config(format!("access key cannot be sent in a header: {err}"))
        })?;

        Ok(CeaSigningResult {
            headers: SignedRequestHeaders {
                authorization,
                content_type: JSON_CONTENT_TYPE.to_string(),
            },
            message,
            signature,
        })
    }
}

fn signing_message(timestamp: &CeaTimestamp, method: &str, path: &str, query: &str) -> String {
    let mut message = String::with_capacity(
        timestamp.as_str().len() + method.len() + path.len() + query.len() + 1,
    );
    message.push_str(timestamp.as_str());
    message.push_str(method);
    message.push_str(path);
    if !query.is_empty() {
        message.push('?');
        message.push_str(query);
    }
    message
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|err| InventoryError::Config(format!("invalid hmac key: {err}")))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}
