use std::fmt::Write;

use bytes::Bytes;
use http::header::ACCEPT;
use http::header::ACCEPT_ENCODING;
use http::header::CONTENT_TYPE;
use http::header::USER_AGENT;
use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;
use http::Method;
use log::debug;

use crate::params::{encode, ParamValue, ParameterMap};
use crate::sign::{signature_header, X_API_SIGNATURE};
use crate::{Credential, Error, Result};

/// Host of the public API.
pub const DEFAULT_HOST: &str = "api.emailsrvr.com";

/// Versioned prefix every path lives under.
pub const API_PREFIX: &str = "/v1/";

/// Parameter name older callers use to pick the verb.
pub const METHOD_PARAM: &str = "method";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP verb of a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verb {
    /// Parameters travel in the query string.
    #[default]
    Get,
    /// Parameters travel in a form body.
    Post,
    /// Parameters travel in a form body.
    Put,
}

impl Verb {
    /// The matching [`Method`].
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
        }
    }

    /// Whether the call changes server-side state.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Verb::Get)
    }

    fn parse(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Verb::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Verb::Post)
        } else if s.eq_ignore_ascii_case("PUT") {
            Ok(Verb::Put)
        } else {
            Err(Error::request_invalid(format!(
                "unsupported value for `{METHOD_PARAM}` parameter: {s}"
            )))
        }
    }
}

/// A single call: where it goes, how, and with which parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// Path below the versioned prefix, e.g. `customers/me/domains`.
    pub path: String,
    /// HTTP verb.
    pub verb: Verb,
    /// Logical parameters.
    pub params: ParameterMap,
}

impl RequestSpec {
    /// Create a spec with the given verb and no parameters.
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb,
            params: ParameterMap::new(),
        }
    }

    /// Create a GET spec.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    /// Create a POST spec.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    /// Create a PUT spec.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    /// Replace the parameters.
    pub fn with_params(mut self, params: ParameterMap) -> Self {
        self.params = params;
        self
    }

    /// Create a spec whose verb is carried in the reserved `method` parameter.
    ///
    /// The `method` entry is removed from the parameters; when it is absent
    /// the verb is GET.
    pub fn from_params(path: impl Into<String>, mut params: ParameterMap) -> Result<Self> {
        let verb = match params.remove(METHOD_PARAM) {
            None | Some(ParamValue::Null) => Verb::Get,
            Some(ParamValue::Str(s)) => Verb::parse(&s)?,
            Some(v) => {
                return Err(Error::request_invalid(format!(
                    "`{METHOD_PARAM}` parameter must be text, got {v:?}"
                )))
            }
        };

        Ok(Self {
            path: path.into(),
            verb,
            params,
        })
    }
}

/// A fully formed request, ready for exactly one send.
#[derive(Debug)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query string included for GET.
    pub url: String,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Form body for POST and PUT.
    pub body: Option<Bytes>,
}

impl SignedRequest {
    /// Build the request for `spec` against `host`, signed with `cred` at
    /// `timestamp`.
    pub fn build(
        host: &str,
        spec: &RequestSpec,
        cred: &Credential,
        client_identity: &str,
        timestamp: &str,
    ) -> Result<Self> {
        let encoded = encode(&spec.params)?;
        let form = encoded.to_form_urlencoded();

        let mut url = String::with_capacity(
            "https://".len() + host.len() + API_PREFIX.len() + spec.path.len() + form.len() + 1,
        );
        write!(
            url,
            "https://{host}{API_PREFIX}{}",
            spec.path.trim_start_matches('/')
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(X_API_SIGNATURE), {
            let mut value: HeaderValue =
                signature_header(cred, client_identity, timestamp).parse()?;
            value.set_sensitive(true);

            value
        });
        headers.insert(USER_AGENT, client_identity.parse()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

        let body = match spec.verb {
            Verb::Get => {
                if !form.is_empty() {
                    url.push('?');
                    url.push_str(&form);
                }
                None
            }
            Verb::Post | Verb::Put => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                Some(Bytes::from(form))
            }
        };

        let req = SignedRequest {
            method: spec.verb.method(),
            url,
            headers,
            body,
        };
        debug!("built request: {}", req.description());

        Ok(req)
    }

    /// `METHOD url`, used in logs and error messages.
    pub fn description(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Convert into an [`http::Request`].
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.url)
            .body(self.body.unwrap_or_default())?;
        *req.headers_mut() = self.headers;

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const AGENT: &str = "Rust rackspace_api/0.1.0";
    const TIMESTAMP: &str = "20240102030405";

    fn cred() -> Credential {
        Credential::new("user", "secret")
    }

    fn header<'a>(req: &'a SignedRequest, name: &str) -> Option<&'a str> {
        req.headers.get(name).map(|v| v.to_str().unwrap())
    }

    #[test]
    fn test_build_get_puts_params_in_query() -> Result<()> {
        let spec = RequestSpec::get("customers/me/domains/example.com/ex/distributionlists")
            .with_params(ParameterMap::new().with("size", 50).with("search", "sales team"));

        let req = SignedRequest::build(DEFAULT_HOST, &spec, &cred(), AGENT, TIMESTAMP)?;

        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.url,
            "https://api.emailsrvr.com/v1/customers/me/domains/example.com/ex/distributionlists?search=sales+team&size=50"
        );
        assert!(req.body.is_none());
        assert_eq!(header(&req, "content-type"), None);
        Ok(())
    }

    #[test]
    fn test_build_get_without_params_has_no_query() -> Result<()> {
        let spec = RequestSpec::get("/customers/me/domains");

        let req = SignedRequest::build("api.example.test", &spec, &cred(), AGENT, TIMESTAMP)?;

        assert_eq!(req.url, "https://api.example.test/v1/customers/me/domains");
        Ok(())
    }

    #[test]
    fn test_build_put_puts_params_in_body() -> Result<()> {
        let spec = RequestSpec::put("customers/me/domains/example.com/ex/mailboxes/bob")
            .with_params(ParameterMap::new().with("displayName", "Bob B").with("size", 2048));

        let req = SignedRequest::build(DEFAULT_HOST, &spec, &cred(), AGENT, TIMESTAMP)?;

        assert_eq!(req.method, Method::PUT);
        assert_eq!(
            req.url,
            "https://api.emailsrvr.com/v1/customers/me/domains/example.com/ex/mailboxes/bob"
        );
        assert_eq!(
            req.body.as_deref(),
            Some(b"displayName=Bob+B&size=2048".as_slice())
        );
        assert_eq!(
            header(&req, "content-type"),
            Some("application/x-www-form-urlencoded")
        );
        Ok(())
    }

    #[test]
    fn test_build_sets_common_headers_for_every_verb() -> Result<()> {
        for spec in [
            RequestSpec::get("a"),
            RequestSpec::post("a"),
            RequestSpec::put("a"),
        ] {
            let req = SignedRequest::build(DEFAULT_HOST, &spec, &cred(), AGENT, TIMESTAMP)?;

            assert_eq!(
                header(&req, "x-api-signature"),
                Some("user:20240102030405:nV5fXVhiiSjNLEIX0fWlWvVXD6U=")
            );
            assert!(req.headers["x-api-signature"].is_sensitive());
            assert_eq!(header(&req, "user-agent"), Some(AGENT));
            assert_eq!(header(&req, "accept"), Some("application/json"));
            assert_eq!(header(&req, "accept-encoding"), Some("gzip, deflate"));
        }
        Ok(())
    }

    #[test]
    fn test_from_params_lifts_method() -> Result<()> {
        let params = ParameterMap::new()
            .with(METHOD_PARAM, "PUT")
            .with("displayName", "Bob");

        let spec = RequestSpec::from_params("customers/me/domains/example.com/ex/mailboxes/bob", params)?;
        assert_eq!(spec.verb, Verb::Put);
        assert!(spec.params.get(METHOD_PARAM).is_none());

        let req = SignedRequest::build(DEFAULT_HOST, &spec, &cred(), AGENT, TIMESTAMP)?;
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.body.as_deref(), Some(b"displayName=Bob".as_slice()));
        assert!(!req.url.contains("method"));
        Ok(())
    }

    #[test]
    fn test_from_params_defaults_to_get() -> Result<()> {
        let spec = RequestSpec::from_params("a", ParameterMap::new().with("x", 1))?;
        assert_eq!(spec.verb, Verb::Get);

        let spec = RequestSpec::from_params("a", ParameterMap::new().with("method", "post"))?;
        assert_eq!(spec.verb, Verb::Post);
        Ok(())
    }

    #[test]
    fn test_from_params_rejects_unknown_method() {
        let err = RequestSpec::from_params("a", ParameterMap::new().with("method", "DELETE"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_build_rejects_invalid_user_key() {
        let spec = RequestSpec::get("a");
        let cred = Credential::new("bad\nkey", "secret");

        let err = SignedRequest::build(DEFAULT_HOST, &spec, &cred, AGENT, TIMESTAMP).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_into_http() -> Result<()> {
        let spec = RequestSpec::post("a").with_params(ParameterMap::new().with("k", "v"));
        let req = SignedRequest::build(DEFAULT_HOST, &spec, &cred(), AGENT, TIMESTAMP)?;

        let req = req.into_http()?;
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri(), "https://api.emailsrvr.com/v1/a");
        assert_eq!(req.body().as_ref(), b"k=v");
        assert_eq!(req.headers()["user-agent"], AGENT);
        Ok(())
    }
}
