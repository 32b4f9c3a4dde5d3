use std::env;

use log::debug;
use rackspace_api::{default_context, Connection, ParameterMap};

fn init_connection() -> Option<Connection> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("RACKSPACE_API_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    for key in ["RACKSPACE_USER_KEY", "RACKSPACE_SECRET", "RACKSPACE_DOMAIN"] {
        assert!(env::var(key).is_ok(), "env {key} must set");
    }

    Some(Connection::from_env(default_context()).expect("connection must build from env"))
}

#[tokio::test]
async fn test_list_domains() -> anyhow::Result<()> {
    let Some(conn) = init_connection() else {
        return Ok(());
    };

    let data = conn.list_domains(ParameterMap::new()).await?;
    debug!("list_domains: {data}");

    assert!(!data["domains"].is_null(), "domains must be present");
    Ok(())
}

#[tokio::test]
async fn test_list_lists() -> anyhow::Result<()> {
    let Some(conn) = init_connection() else {
        return Ok(());
    };

    let data = conn.list_lists(ParameterMap::new().with("size", 10)).await?;
    debug!("list_lists: {data}");

    assert!(data.is_object());
    Ok(())
}
