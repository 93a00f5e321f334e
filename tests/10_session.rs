mod common;

use std::sync::Arc;

use anyhow::Result;
use awareness_client::error::ClientError;
use awareness_client::models::Role;
use awareness_client::policy;
use awareness_client::session::SessionStore;
use common::{MockBackend, PASSWORD};

#[tokio::test]
async fn login_caches_identity_with_normalized_role() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = tempfile::tempdir()?;
    let store = Arc::new(SessionStore::open(dir.path(), "admin-tab"));
    let client = backend.client_with(store.clone())?;

    let identity = client.login("admin@example.org", PASSWORD).await?;
    assert_eq!(identity.user_id(), 2);
    assert_eq!(identity.role(), &Role::Admin);

    let cached = store.get()?.expect("identity cached");
    assert_eq!(cached, identity);
    assert_eq!(store.role()?, Some(Role::Admin));
    assert_eq!(store.last_login_role()?, Some(Role::Admin));

    // Tab-scoped record and the shared fallback live in separate files
    let tab: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("sessions/admin-tab.json"))?)?;
    assert_eq!(tab["token"], "token-2");
    assert_eq!(tab["role"], "admin");
    let shared: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("shared.json"))?)?;
    assert_eq!(shared["lastLoginRole"], "admin");
    assert!(shared.get("token").is_none());
    Ok(())
}

#[tokio::test]
async fn named_sessions_do_not_share_identity() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = tempfile::tempdir()?;
    let staff_tab = Arc::new(SessionStore::open(dir.path(), "staff"));
    let root_tab = Arc::new(SessionStore::open(dir.path(), "root"));

    backend.client_with(staff_tab.clone())?.login("staff@example.org", PASSWORD).await?;
    backend.client_with(root_tab.clone())?.login("root@example.org", PASSWORD).await?;

    assert_eq!(staff_tab.role()?, Some(Role::Staff));
    assert_eq!(root_tab.role()?, Some(Role::SuperAdmin));
    assert!(policy::guard("/quiz", &staff_tab).is_ok());
    assert!(policy::guard("/quiz", &root_tab).is_err());
    Ok(())
}

#[tokio::test]
async fn rejected_credentials_leave_store_untouched() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client()?;
    client.login("staff@example.org", PASSWORD).await?;

    match client.login("staff@example.org", "wrong").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected: {other:?}"),
    }
    // The earlier session survives a failed login attempt
    assert!(client.store().get()?.is_some());
    Ok(())
}

#[tokio::test]
async fn empty_credentials_never_reach_the_network() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client()?;

    let err = client.login("  ", PASSWORD).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILURE");
    assert!(backend.state().auth_headers.is_empty());
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_attached_once_logged_in() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client()?;
    client.login("staff@example.org", PASSWORD).await?;

    let quizzes = client.list_quizzes(None).await?;
    assert_eq!(quizzes.len(), 3);

    let headers = backend.state().auth_headers.clone();
    assert_eq!(headers, vec![Some("Bearer token-7".to_string())]);
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_clears_the_session() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client()?;
    client.login("staff@example.org", PASSWORD).await?;
    backend.state().tokens_revoked = true;

    match client.list_reports().await {
        Err(ClientError::Unauthorized { redirect_to }) => assert_eq!(redirect_to, "/"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(client.store().get()?.is_none());
    assert!(client.store().token()?.is_none());

    // With the store empty the next request goes out without a token
    backend.state().tokens_revoked = false;
    assert!(client.list_reports().await.is_err());
    assert_eq!(backend.state().auth_headers.last().cloned(), Some(None));
    Ok(())
}

#[tokio::test]
async fn api_errors_carry_backend_detail() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client()?;
    client.login("staff@example.org", PASSWORD).await?;

    let topic = client.get_topic(1).await?;
    assert_eq!(topic.title, "Phishing");

    match client.get_topic(42).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Topic not found");
        }
        other => panic!("unexpected: {other:?}"),
    }
    // Only 401 clears the session
    assert!(client.store().get()?.is_some());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let config = awareness_client::config::AppConfig::for_base_url(format!("http://127.0.0.1:{port}/api"));
    let client = awareness_client::api::ApiClient::new(&config, Arc::new(SessionStore::in_memory()))?;

    let err = client.login("staff@example.org", PASSWORD).await.unwrap_err();
    assert_eq!(err.error_code(), "NETWORK_FAILURE");
    Ok(())
}
