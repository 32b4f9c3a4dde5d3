//! Core components for calling the Rackspace Email & Apps API.
//!
//! This crate signs calls, builds the HTTP requests for them and turns the
//! service's answers into one result shape.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for HTTP sending, environment access and time
//! - **Params**: Logical call parameters and their text encoding
//! - **Sign**: The `X-Api-Signature` scheme
//! - **Request**: `RequestSpec` describes a call, `SignedRequest` is the wire request for it
//! - **Dispatch**: Sends a `SignedRequest` and normalizes the answer
//! - **Client**: Ties credential, identity and settings together
//!
//! ## Example
//!
//! ```no_run
//! use rackspace_api_core::{Client, Context, Credential, ParameterMap, RequestSpec, Result};
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let client = Client::new(ctx, Credential::new("user_key", "secret_key"));
//!
//! let spec = RequestSpec::get("customers/me/domains/example.com/ex/distributionlists")
//!     .with_params(ParameterMap::new().with("size", 50));
//! let lists = client.call(spec).await?;
//! println!("{lists}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`Error`] with an optional numeric [`Error::code`]:
//! the HTTP status for error answers, `500` when no usable answer arrived,
//! and `None` for failures inside the client.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod params;
pub mod sign;
pub mod time;
pub mod utils;

mod context;
pub use context::{
    Clock, Context, Env, HttpSend, ManualClock, NoopEnv, NoopHttpSend, OsEnv, StaticEnv,
    SystemClock,
};
mod error;
pub use error::{Error, ErrorKind, Result};
mod credential;
pub use credential::Credential;
mod config;
pub use config::{Config, RACKSPACE_DOMAIN, RACKSPACE_HOST, RACKSPACE_SECRET, RACKSPACE_USER_KEY};

pub use params::{ParamValue, ParameterMap};
mod request;
pub use request::{RequestSpec, SignedRequest, Verb, API_PREFIX, DEFAULT_HOST, METHOD_PARAM};
mod dispatch;
pub use dispatch::{accepted, dispatch, normalize, TRANSPORT_ERROR_CODE};
mod ratelimit;
pub use ratelimit::RateLimiter;
mod client;
pub use client::{Client, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
