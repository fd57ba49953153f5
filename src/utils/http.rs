use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{InventoryError, Result};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;
const MAX_RESPONSE_BODY_BYTES: usize = 1024 * 1024;

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(InventoryError::Http)
}

/// Best-effort read of an error body for diagnostics. A stream error ends the
/// read early; whatever arrived is kept.
pub(crate) async fn response_text_truncated(
    response: reqwest::Response,
    max_bytes: usize,
) -> String {
    let max_bytes = max_bytes.max(1);
    let mut bytes = Vec::<u8>::new();
    let mut truncated = false;

    let mut stream = response.bytes_stream();
    while let Some(Ok(chunk)) = stream.next().await {
        let remaining = max_bytes.saturating_sub(bytes.len());
        if chunk.len() > remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            truncated = true;
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    let mut body = String::from_utf8_lossy(&bytes).to_string();
    if truncated {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("...(truncated)");
    }
    body
}

/// Reads the whole body, failing on stream errors (e.g. the connection closing
/// before `Content-Length` bytes arrived). Returns whether `max_bytes` cut it
/// short.
async fn response_bytes_limited(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<(Vec<u8>, bool)> {
    let max_bytes = max_bytes.max(1);
    let mut out = Vec::<u8>::new();

    let mut stream = response.bytes_stream();
    while let Some(next) = stream.next().await {
        let chunk = next?;
        let remaining = max_bytes.saturating_sub(out.len());
        if chunk.len() > remaining {
            out.extend_from_slice(&chunk[..remaining]);
            return Ok((out, true));
        }
        out.extend_from_slice(&chunk);
    }
    Ok((out, false))
}

/// Sends the request and rejects anything but `200 OK`.
///
/// Other 2xx codes are rejected as well: the seller API only answers
/// inventory lookups with 200.
pub(crate) async fn send_expect_ok(req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let response = req.send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        let body = response_text_truncated(response, MAX_ERROR_BODY_BYTES).await;
        return Err(InventoryError::Api { status, body });
    }
    Ok(response)
}

pub(crate) async fn read_json_limited<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let (bytes, truncated) = response_bytes_limited(response, MAX_RESPONSE_BODY_BYTES).await?;
    if truncated {
        return Err(InventoryError::InvalidResponse(format!(
            "response exceeded max bytes ({MAX_RESPONSE_BODY_BYTES})"
        )));
    }
    Ok(serde_json::from_slice::<T>(&bytes)?)
}
