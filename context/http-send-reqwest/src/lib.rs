//! Reqwest based [`HttpSend`] for rackspace-api.
//!
//! ## Example
//!
//! ```no_run
//! use rackspace_api_core::{Client, Context, Credential};
//! use rackspace_api_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let client = Client::new(ctx, Credential::new("user_key", "secret_key"));
//! ```
//!
//! ## Redirects
//!
//! The default client never follows redirects, a 3xx comes back as is. When
//! passing a custom [`reqwest::Client`], build it from
//! [`ReqwestHttpSend::client_builder`] or disable redirects yourself.

use std::error::Error as StdError;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use rackspace_api_core::{Error, HttpSend, Result};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Request};

/// HttpSend on top of a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        // Same failure mode as `reqwest::Client::new`: only a broken TLS backend.
        let client = Self::client_builder()
            .build()
            .expect("reqwest client must build with default settings");
        Self { client }
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// A client builder with redirects disabled.
    pub fn client_builder() -> ClientBuilder {
        Client::builder().redirect(Policy::none())
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid(format!("invalid request: {}", error_chain(&e))).with_source(e)
        })?;
        debug!("sending {} {}", req.method(), req.url());

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(error_chain(&e)).with_source(e))?;
        let resp: http::Response<_> = resp.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport(error_chain(&e)).with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

/// Render an error with all its sources, reqwest keeps the useful part
/// (connection refused, certificate problems) in the chain.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut s = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        s.push_str(": ");
        s.push_str(&e.to_string());
        source = e.source();
    }
    s
}
