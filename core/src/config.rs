use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::time::TimestampZone;
use crate::utils::Redact;
use crate::Context;

/// Env name for the user key.
pub const RACKSPACE_USER_KEY: &str = "RACKSPACE_USER_KEY";
/// Env name for the secret key.
pub const RACKSPACE_SECRET: &str = "RACKSPACE_SECRET";
/// Env name for the domain calls are bound to.
pub const RACKSPACE_DOMAIN: &str = "RACKSPACE_DOMAIN";
/// Env name for overriding the API host.
pub const RACKSPACE_HOST: &str = "RACKSPACE_HOST";

/// Config carries all the configuration for a Rackspace API client.
#[derive(Clone, Default)]
pub struct Config {
    /// `user_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_USER_KEY`]
    pub user_key: Option<String>,
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_SECRET`]
    pub secret_key: Option<String>,
    /// `domain` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_DOMAIN`]
    pub domain: Option<String>,
    /// `host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_HOST`]
    /// - default: [`crate::DEFAULT_HOST`]
    pub host: Option<String>,
    /// User agent, also part of the signature input.
    ///
    /// Default: [`crate::DEFAULT_USER_AGENT`]
    pub user_agent: Option<String>,
    /// Upper bound for a single call.
    ///
    /// Default: [`crate::DEFAULT_TIMEOUT`]
    pub timeout: Option<Duration>,
    /// Zone of the signing timestamp.
    pub timestamp_zone: TimestampZone,
    /// Minimum spacing between mutating calls, no pacing if `None`.
    pub rate_limit: Option<Duration>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user_key
    pub fn with_user_key(mut self, user_key: impl Into<String>) -> Self {
        self.user_key = Some(user_key.into());
        self
    }

    /// Set secret_key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set user_agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timestamp_zone
    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    /// Set rate_limit
    pub fn with_rate_limit(mut self, interval: Duration) -> Self {
        self.rate_limit = Some(interval);
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set win over env values.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(RACKSPACE_USER_KEY) {
            self.user_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(RACKSPACE_SECRET) {
            self.secret_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(RACKSPACE_DOMAIN) {
            self.domain.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(RACKSPACE_HOST) {
            self.host.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("user_key", &self.user_key.as_ref().map(Redact::from))
            .field("secret_key", &self.secret_key.as_ref().map(Redact::from))
            .field("domain", &self.domain)
            .field("host", &self.host)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("timestamp_zone", &self.timestamp_zone)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
