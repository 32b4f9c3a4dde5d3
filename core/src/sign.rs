//! Request signature for the `X-Api-Signature` header.
//!
//! ## Format
//!
//! ```text
//! token  = base64(sha1(user_key + user_agent + timestamp + secret_key))
//! header = user_key + ":" + timestamp + ":" + token
//! ```
//!
//! The service recomputes the same digest from the header and the keys it
//! stores, so every byte of the input must match.

use log::debug;

use crate::hash::base64_sha1;
use crate::utils::Redact;
use crate::Credential;

/// Name of the header carrying the signature.
pub const X_API_SIGNATURE: &str = "x-api-signature";

/// Compute the signature token.
///
/// Returns an empty string if either key is empty; such requests are sent
/// unsigned and left to the service to reject.
pub fn sign(user_key: &str, client_identity: &str, timestamp: &str, secret_key: &str) -> String {
    if user_key.is_empty() || secret_key.is_empty() {
        debug!("credential incomplete, sending request without signature");
        return String::new();
    }

    let mut s = String::with_capacity(
        user_key.len() + client_identity.len() + timestamp.len() + secret_key.len(),
    );
    s.push_str(user_key);
    s.push_str(client_identity);
    s.push_str(timestamp);
    s.push_str(secret_key);

    base64_sha1(s.as_bytes())
}

/// Build the `X-Api-Signature` header value for `cred` at `timestamp`.
///
/// The timestamp embedded in the header is the one that was signed.
pub fn signature_header(cred: &Credential, client_identity: &str, timestamp: &str) -> String {
    let token = sign(
        &cred.user_key,
        client_identity,
        timestamp,
        &cred.secret_key,
    );
    debug!(
        "signed request for user key {:?} at {timestamp}",
        Redact::from(&cred.user_key)
    );

    format!("{}:{timestamp}:{token}", cred.user_key)
}
