use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::dispatch::dispatch;
use crate::params::ParameterMap;
use crate::ratelimit::RateLimiter;
use crate::time::{format_timestamp, TimestampZone};
use crate::{Config, Context, Credential, Error, RequestSpec, Result, SignedRequest, DEFAULT_HOST};

/// User agent sent by default; it is also part of the signature input.
pub const DEFAULT_USER_AGENT: &str = concat!("Rust rackspace_api/", env!("CARGO_PKG_VERSION"));

/// Default upper bound for a single call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client signs and sends calls to the Rackspace API.
///
/// A client holds only its identity and settings, never per-call state, so
/// it can be cloned and shared freely.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    cred: Credential,
    host: String,
    user_agent: String,
    timeout: Duration,
    timestamp_zone: TimestampZone,
    limiter: Option<Arc<RateLimiter>>,
}

impl Client {
    /// Create a client with default settings.
    pub fn new(ctx: Context, cred: Credential) -> Self {
        Self {
            ctx,
            cred,
            host: DEFAULT_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            timestamp_zone: TimestampZone::default(),
            limiter: None,
        }
    }

    /// Create a client from `config`.
    ///
    /// Missing keys are allowed, calls are then sent without signature.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let cred = Credential::new(
            config.user_key.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
        );

        let mut client = Self::new(ctx, cred).with_timestamp_zone(config.timestamp_zone);
        if let Some(host) = &config.host {
            if host.is_empty() {
                return Err(Error::config_invalid("host must not be empty"));
            }
            client = client.with_host(host);
        }
        if let Some(user_agent) = &config.user_agent {
            client = client.with_user_agent(user_agent);
        }
        if let Some(timeout) = config.timeout {
            if timeout.is_zero() {
                return Err(Error::config_invalid("timeout must not be zero"));
            }
            client = client.with_timeout(timeout);
        }
        if let Some(interval) = config.rate_limit {
            client = client.with_rate_limiter(RateLimiter::new(interval));
        }

        Ok(client)
    }

    /// Set the API host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the zone of the signing timestamp.
    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    /// Pace mutating calls through `limiter`.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(Arc::new(limiter));
        self
    }

    /// The credential in use.
    pub fn credential(&self) -> &Credential {
        &self.cred
    }

    /// The API host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sign and send one call.
    pub async fn call(&self, spec: RequestSpec) -> Result<Value> {
        if spec.verb.is_mutating() {
            if let Some(limiter) = &self.limiter {
                limiter.acquire(&self.ctx).await;
            }
        }

        let req = self.build(&spec)?;
        dispatch(&self.ctx, req, self.timeout).await
    }

    /// Sign and send one call whose verb is picked by a `method` parameter.
    ///
    /// See [`RequestSpec::from_params`].
    pub async fn call_with_params(
        &self,
        path: impl Into<String>,
        params: ParameterMap,
    ) -> Result<Value> {
        self.call(RequestSpec::from_params(path, params)?).await
    }

    /// Build the signed request for `spec` at the current time.
    pub fn build(&self, spec: &RequestSpec) -> Result<SignedRequest> {
        let timestamp = format_timestamp(self.ctx.now(), self.timestamp_zone);

        SignedRequest::build(&self.host, spec, &self.cred, &self.user_agent, &timestamp)
    }
}
