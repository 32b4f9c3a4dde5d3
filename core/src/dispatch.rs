//! Send a signed request and normalize whatever comes back.

use std::time::Duration;

use bytes::Bytes;
use http::header::LOCATION;
use http::StatusCode;
use log::{debug, warn};
use serde_json::{json, Value};

use crate::{Context, Error, ErrorKind, Result, SignedRequest};

/// Code reported for failures that never produced a usable answer.
pub const TRANSPORT_ERROR_CODE: u16 = 500;

/// Payload returned for `202 Accepted`.
pub fn accepted() -> Value {
    json!({ "response": "202 Accepted" })
}

/// Send `req` through `ctx` and turn the outcome into a payload or an [`Error`].
///
/// Every failure, whatever its origin, leaves this function as an [`Error`]
/// with:
///
/// - code `500` if the request got no usable answer (transport failure,
///   timeout, redirect) or an unexpected success status,
/// - the HTTP status as code for `4xx` and `5xx` answers,
/// - no code for anything that went wrong inside the client.
pub async fn dispatch(ctx: &Context, req: SignedRequest, timeout: Duration) -> Result<Value> {
    let description = req.description();

    let result = send(ctx, req, timeout, &description).await;
    if let Err(err) = &result {
        warn!(
            "{description} failed: code={:?} kind={} message={}",
            err.code(),
            err.kind(),
            err.message()
        );
    }
    result
}

async fn send(
    ctx: &Context,
    req: SignedRequest,
    timeout: Duration,
    description: &str,
) -> Result<Value> {
    let req = req.into_http()?;

    let resp = match tokio::time::timeout(timeout, ctx.http_send(req)).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(err)) if err.kind() == ErrorKind::Transport => {
            return Err(Error::transport(format!("{description} resulted in {err}"))
                .with_code(TRANSPORT_ERROR_CODE)
                .with_source(err))
        }
        Ok(Err(err)) => return Err(err),
        Err(_) => {
            return Err(Error::transport(format!(
                "{description} resulted in timeout after {timeout:?}"
            ))
            .with_code(TRANSPORT_ERROR_CODE))
        }
    };

    let (parts, body) = resp.into_parts();
    debug!("{description} got response: {}", parts.status);

    if parts.status.is_redirection() {
        let location = parts
            .headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| format!(" to {v}"))
            .unwrap_or_default();
        return Err(Error::transport(format!(
            "{description} resulted in redirect {}{location}",
            parts.status.as_u16()
        ))
        .with_code(TRANSPORT_ERROR_CODE));
    }

    normalize(parts.status, body)
}

/// Interpret a response that reached us, following the service contract.
pub fn normalize(status: StatusCode, body: Bytes) -> Result<Value> {
    if status.is_client_error() || status.is_server_error() {
        return Err(Error::service(
            status.as_u16(),
            String::from_utf8_lossy(&body),
        ));
    }

    match status {
        StatusCode::ACCEPTED => Ok(accepted()),
        StatusCode::OK | StatusCode::NO_CONTENT => {
            let text = String::from_utf8(body.to_vec())?;
            if status == StatusCode::OK && text.starts_with('{') {
                return Ok(serde_json::from_str(&text)?);
            }

            Ok(json!({
                "code": status.as_u16(),
                "response": text,
            }))
        }
        _ => Err(Error::service(
            TRANSPORT_ERROR_CODE,
            String::from_utf8_lossy(&body),
        )),
    }
}
