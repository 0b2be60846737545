//! Shared request/response plumbing for both API clients.
//!
//! Both clients normalize backend answers identically: a non-2xx status
//! becomes [`ClientError::Api`] carrying the backend's `detail` field, and
//! a transport failure becomes [`ClientError::Connection`] (status 500).

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// The fallback message when an error body carries no `detail`.
pub const GENERIC_ERROR_DETAIL: &str = "An unexpected error occurred";

/// The error body shape used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Attaches the bearer token to a request when one is held.
pub(crate) fn with_bearer(req: RequestBuilder, token: Option<String>) -> RequestBuilder {
    match token {
        Some(token) => req.bearer_auth(token),
        None => req,
    }
}

/// Reads a JSON response, normalizing errors.
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status, &bytes));
    }

    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads a response whose body is irrelevant (deletes, 204s), normalizing
/// errors the same way as [`read_json`].
pub(crate) async fn read_unit(resp: Response) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = resp.bytes().await?;
    Err(api_error(status, &bytes))
}

/// Reads a binary response (report downloads), normalizing errors.
pub(crate) async fn read_bytes(resp: Response) -> Result<Vec<u8>> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status, &bytes));
    }

    Ok(bytes.to_vec())
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| GENERIC_ERROR_DETAIL.to_string());

    tracing::warn!("❌ API error {}: {}", status.as_u16(), detail);

    ClientError::Api {
        status: status.as_u16(),
        detail,
    }
}
