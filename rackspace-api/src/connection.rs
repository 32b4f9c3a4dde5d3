use std::fmt::Write;

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rackspace_api_core::{Client, Config, Context, Error, ParameterMap, RequestSpec, Result};
use serde_json::Value;

/// Characters kept as is inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Connection is a [`Client`] bound to one domain, with a method per endpoint.
///
/// Every method takes extra query or form parameters (`size`, `offset`,
/// fields to update) as a [`ParameterMap`].
///
/// ```no_run
/// use rackspace_api::{Client, Connection, Context, Credential, ParameterMap, Result};
///
/// # async fn example(ctx: Context) -> Result<()> {
/// let client = Client::new(ctx, Credential::new("user_key", "secret_key"));
/// let conn = Connection::new(client, "example.com");
///
/// let members = conn.list_members("staff", ParameterMap::new()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    domain: String,
}

impl Connection {
    /// Bind `client` to `domain`.
    pub fn new(client: Client, domain: impl Into<String>) -> Self {
        Self {
            client,
            domain: domain.into(),
        }
    }

    /// Create a connection from `config`, which must name a domain.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let domain = match config.domain.as_deref() {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => return Err(Error::config_invalid("domain is required")),
        };

        Ok(Self::new(Client::from_config(ctx, config)?, domain))
    }

    /// Create a connection from the `RACKSPACE_*` env values of `ctx`.
    pub fn from_env(ctx: Context) -> Result<Self> {
        let config = Config::new().from_env(&ctx);
        Self::from_config(ctx, &config)
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The bound domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// List the domains of the account.
    pub async fn list_domains(&self, params: ParameterMap) -> Result<Value> {
        self.get("customers/me/domains".to_string(), params).await
    }

    /// List all Exchange distribution lists of the domain.
    pub async fn list_lists(&self, params: ParameterMap) -> Result<Value> {
        self.get(self.domain_path(&["ex", "distributionlists"]), params)
            .await
    }

    /// Show one distribution list.
    pub async fn list_read(&self, common_name: &str, params: ParameterMap) -> Result<Value> {
        self.get(self.list_path(common_name, None), params).await
    }

    /// List the members of a distribution list.
    pub async fn list_members(&self, common_name: &str, params: ParameterMap) -> Result<Value> {
        self.get(self.list_path(common_name, Some("members")), params)
            .await
    }

    /// List the approved senders of a distribution list.
    pub async fn list_senders(&self, common_name: &str, params: ParameterMap) -> Result<Value> {
        self.get(self.list_path(common_name, Some("senders")), params)
            .await
    }

    /// List the addresses of a distribution list.
    pub async fn list_addresses(&self, common_name: &str, params: ParameterMap) -> Result<Value> {
        self.get(self.list_path(common_name, Some("emailaddresses")), params)
            .await
    }

    /// Have a CSV export of every distribution list mailed to `email_address`.
    ///
    /// An `exportTo` entry in `params` is replaced.
    pub async fn list_export_all(
        &self,
        email_address: &str,
        params: ParameterMap,
    ) -> Result<Value> {
        let mut path = self.domain_path(&["ex", "distributionlists"]);
        path.push('/');

        self.get(path, params.with("exportTo", email_address)).await
    }

    /// Add `member` to a distribution list.
    pub async fn list_add_member(
        &self,
        common_name: &str,
        member: &str,
        params: ParameterMap,
    ) -> Result<Value> {
        let mut path = self.list_path(common_name, Some("members"));
        push_segment(&mut path, member);

        self.send(RequestSpec::post(path).with_params(params)).await
    }

    /// List the contacts of the domain.
    pub async fn contact_list(&self, params: ParameterMap) -> Result<Value> {
        self.get(self.domain_path(&["ex", "contacts"]), params).await
    }

    /// Show one contact.
    pub async fn contact_show(&self, name: &str, params: ParameterMap) -> Result<Value> {
        let mut path = self.domain_path(&["ex", "contacts"]);
        push_segment(&mut path, name);

        self.get(path, params).await
    }

    /// List the mailboxes of the domain.
    pub async fn mailbox_list(&self, params: ParameterMap) -> Result<Value> {
        self.get(self.domain_path(&["ex", "mailboxes"]), params).await
    }

    /// Show one mailbox.
    pub async fn mailbox_show(&self, name: &str, params: ParameterMap) -> Result<Value> {
        self.get(self.mailbox_path(name), params).await
    }

    /// Update the fields given in `params` on one mailbox.
    pub async fn mailbox_update(&self, name: &str, params: ParameterMap) -> Result<Value> {
        self.send(RequestSpec::put(self.mailbox_path(name)).with_params(params))
            .await
    }

    /// List the resources (rooms, equipment) of the domain.
    pub async fn resource_list(&self, params: ParameterMap) -> Result<Value> {
        self.get(self.domain_path(&["ex", "resources"]), params).await
    }

    async fn get(&self, path: String, params: ParameterMap) -> Result<Value> {
        self.send(RequestSpec::get(path).with_params(params)).await
    }

    async fn send(&self, spec: RequestSpec) -> Result<Value> {
        debug!("calling {:?} {}", spec.verb, spec.path);
        self.client.call(spec).await
    }

    /// `customers/me/domains/{domain}` followed by `rest`.
    fn domain_path(&self, rest: &[&str]) -> String {
        let mut path = "customers/me/domains".to_string();
        push_segment(&mut path, &self.domain);
        for s in rest {
            push_segment(&mut path, s);
        }
        path
    }

    fn list_path(&self, common_name: &str, sub: Option<&str>) -> String {
        let mut path = self.domain_path(&["ex", "distributionlists"]);
        push_segment(&mut path, common_name);
        if let Some(sub) = sub {
            push_segment(&mut path, sub);
        }
        path
    }

    fn mailbox_path(&self, name: &str) -> String {
        let mut path = self.domain_path(&["ex", "mailboxes"]);
        push_segment(&mut path, name);
        path
    }
}

fn push_segment(path: &mut String, segment: &str) {
    // Writing into a String never fails.
    let _ = write!(path, "/{}", utf8_percent_encode(segment, PATH_SEGMENT));
}
