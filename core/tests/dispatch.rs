use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;
use chrono::Utc;
use http::StatusCode;
use pretty_assertions::assert_eq;
use rackspace_api_core::time::TimestampZone;
use rackspace_api_core::{
    accepted, Client, Context, Credential, Error, ErrorKind, HttpSend, ManualClock, ParameterMap,
    RateLimiter, RequestSpec, Result,
};
use serde_json::json;

/// Answers every request with a fixed response and records what was sent.
#[derive(Debug, Clone)]
struct ScriptedHttpSend {
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
    sent: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl ScriptedHttpSend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
            sent: Arc::default(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    fn sent(&self) -> Vec<http::Request<Bytes>> {
        self.sent.lock().unwrap().drain(..).collect()
    }
}

#[async_trait]
impl HttpSend for ScriptedHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.sent.lock().unwrap().push(req);

        let mut resp = http::Response::builder().status(self.status);
        for (k, v) in &self.headers {
            resp = resp.header(*k, *v);
        }
        Ok(resp.body(Bytes::from_static(self.body.as_bytes()))?)
    }
}

/// Fails every request like an unreachable host would.
#[derive(Debug)]
struct UnreachableHttpSend;

#[async_trait]
impl HttpSend for UnreachableHttpSend {
    async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::transport("error trying to connect: Connection refused"))
    }
}

/// Never answers.
#[derive(Debug)]
struct HangingHttpSend;

#[async_trait]
impl HttpSend for HangingHttpSend {
    async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(Error::unexpected("unreachable"))
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
}

fn client(send: impl HttpSend) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(send).with_clock(clock());
    Client::new(ctx, Credential::new("user", "secret"))
        .with_user_agent("Rust rackspace_api/0.1.0")
        .with_timestamp_zone(TimestampZone::Utc)
}

#[tokio::test]
async fn test_ok_json_is_parsed() -> Result<()> {
    let send = ScriptedHttpSend::new(StatusCode::OK, r#"{"domains": ["a.com"]}"#);
    let client = client(send.clone());

    let v = client.call(RequestSpec::get("customers/me/domains")).await?;
    assert_eq!(v, json!({ "domains": ["a.com"] }));

    let sent = send.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method(), http::Method::GET);
    assert_eq!(sent[0].uri(), "https://api.emailsrvr.com/v1/customers/me/domains");
    assert_eq!(
        sent[0].headers()["x-api-signature"],
        "user:20240102030405:nV5fXVhiiSjNLEIX0fWlWvVXD6U="
    );
    Ok(())
}

#[tokio::test]
async fn test_accepted_returns_placeholder() -> Result<()> {
    let client = client(ScriptedHttpSend::new(StatusCode::ACCEPTED, "whatever"));

    let v = client
        .call(RequestSpec::post("customers/me/domains/a.com/ex/mailboxes/bob"))
        .await?;
    assert_eq!(v, accepted());
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_service_error() {
    let client = client(ScriptedHttpSend::new(StatusCode::NOT_FOUND, "not found"));

    let err = client
        .call(RequestSpec::get("customers/me/domains/missing.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.code(), Some(404));
    assert_eq!(err.message(), "not found");
}

#[tokio::test]
async fn test_transport_failure_mentions_request() {
    let client = client(UnreachableHttpSend);

    let err = client
        .call(RequestSpec::get("customers/me/domains"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.code(), Some(500));
    assert_eq!(
        err.message(),
        "GET https://api.emailsrvr.com/v1/customers/me/domains resulted in error trying to connect: Connection refused"
    );
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let send = ScriptedHttpSend::new(StatusCode::FOUND, "")
        .with_header("location", "https://elsewhere.example/v1/steal");
    let client = client(send.clone());

    let err = client
        .call(RequestSpec::get("customers/me/domains"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(500));
    assert!(err.message().contains("https://api.emailsrvr.com/v1/customers/me/domains"));
    assert!(err.message().contains("redirect 302 to https://elsewhere.example/v1/steal"));
    assert_eq!(send.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_transport_error() {
    let client = client(HangingHttpSend).with_timeout(Duration::from_secs(5));

    let err = client
        .call(RequestSpec::get("customers/me/domains"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.code(), Some(500));
    assert!(err.message().contains("timeout"));
}

#[tokio::test]
async fn test_method_param_selects_put_and_is_stripped() -> Result<()> {
    let send = ScriptedHttpSend::new(StatusCode::OK, "{}");
    let client = client(send.clone());

    let params = ParameterMap::new()
        .with("method", "PUT")
        .with("displayName", "Bob");
    client
        .call_with_params("customers/me/domains/a.com/ex/mailboxes/bob", params)
        .await?;

    let sent = send.sent();
    assert_eq!(sent[0].method(), http::Method::PUT);
    assert_eq!(sent[0].body().as_ref(), b"displayName=Bob");
    assert_eq!(
        sent[0].headers()["content-type"],
        "application/x-www-form-urlencoded"
    );
    assert_eq!(sent[0].uri().query(), None);
    Ok(())
}

#[tokio::test]
async fn test_rate_limiter_paces_mutating_calls_only() -> Result<()> {
    let clock = clock();
    let ctx = Context::new()
        .with_http_send(ScriptedHttpSend::new(StatusCode::ACCEPTED, ""))
        .with_clock(clock.clone());
    let client = Client::new(ctx, Credential::new("user", "secret"))
        .with_rate_limiter(RateLimiter::new(Duration::from_secs(1)));

    client.call(RequestSpec::get("a")).await?;
    client.call(RequestSpec::get("a")).await?;
    client.call(RequestSpec::post("a")).await?;
    client.call(RequestSpec::put("a")).await?;

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
    Ok(())
}
