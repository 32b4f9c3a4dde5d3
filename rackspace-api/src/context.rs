use rackspace_api_core::{Context, OsEnv};
use rackspace_api_http_send_reqwest::ReqwestHttpSend;

/// A [`Context`] that sends through reqwest and reads the process env.
///
/// The reqwest client never follows redirects.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_reads_process_env() {
        let ctx = default_context();
        assert_eq!(
            ctx.env_var("PATH"),
            std::env::var("PATH").ok(),
            "OsEnv must be wired in"
        );
    }
}
