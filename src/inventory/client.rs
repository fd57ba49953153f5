use std::time::Duration;

use async_trait::async_trait;

use super::{ERROR_CODE, InventoryEnvelope, InventoryQueryResult};
use crate::auth::CeaSigner;
use crate::utils::http::{build_http_client, read_json_limited, send_expect_ok};
use crate::{InventoryError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api-gateway.coupang.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const VENDOR_ITEMS_PATH: &str = "/v2/providers/seller_api/apis/api/v1/marketplace/vendor-items";

/// One inventory lookup per vendor item id. Implementations never fail: every
/// problem is folded into [`InventoryQueryResult::Failure`].
#[async_trait]
pub trait InventoryLookup: Send + Sync {
    async fn fetch_inventory(&self, vendor_item_id: &str) -> InventoryQueryResult;
}

#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
    signer: CeaSigner,
}

impl InventoryClient {
    pub fn new(signer: CeaSigner) -> Self {
        let http = build_http_client(DEFAULT_TIMEOUT).unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            signer,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http_client(timeout)?;
        Ok(self)
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_inventory(&self, vendor_item_id: &str) -> Result<InventoryEnvelope> {
        let path = inventory_path(vendor_item_id);
        let headers = self.signer.sign("GET", &path, "")?;
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let response = send_expect_ok(headers.apply(self.http.get(url))).await?;
        read_json_limited::<InventoryEnvelope>(response).await
    }
}

#[async_trait]
impl InventoryLookup for InventoryClient {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_inventory(&self, vendor_item_id: &str) -> InventoryQueryResult {
        match self.request_inventory(vendor_item_id).await {
            Ok(envelope) => envelope.into_result(),
            Err(InventoryError::Api { status, body }) => {
                tracing::error!(
                    vendor_item_id,
                    status = status.as_u16(),
                    body = %body,
                    "inventory lookup rejected"
                );
                InventoryQueryResult::failure(
                    ERROR_CODE,
                    format!("HTTP error, status={}", status.as_u16()),
                )
            }
            Err(err) => {
                tracing::error!(vendor_item_id, error = %err, "inventory lookup failed");
                InventoryQueryResult::failure(ERROR_CODE, err.to_string())
            }
        }
    }
}

/// Request path for one vendor item. The id is inserted as a single path
/// segment; numeric ids pass through unchanged.
pub fn inventory_path(vendor_item_id: &str) -> String {
    format!(
        "{VENDOR_ITEMS_PATH}/{}/inventories",
        encode_path_segment(vendor_item_id)
    )
}

fn encode_path_segment(value: &str) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        let is_unreserved =
            matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~');
        if is_unreserved {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX_CHARS[(byte >> 4) as usize] as char);
            out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
    }
    out
}
