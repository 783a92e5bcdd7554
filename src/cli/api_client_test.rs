use std::sync::Arc;

use serial_test::serial;

use crate::cli::api_client::*;
use crate::cli::error::CliError;
use crate::cli::test_server::MockApi;
use crate::endpoints;
use crate::models::{Page, Patient, Tokens, UserProfile};
use crate::session::{MemoryTokenStore, MockTokenStore, TokenStore};

fn store_with(tokens: Tokens) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(tokens))
}

#[test]
fn test_new_with_explicit_url() {
    let client = ApiClient::new(
        Some("http://custom:8080/".to_string()),
        Arc::new(MemoryTokenStore::new()),
    );
    assert_eq!(client.base_url(), "http://custom:8080");
}

#[test]
#[serial]
fn test_env_url_used_without_flag() {
    let previous = std::env::var("PCARE_API_URL").ok();
    // SAFETY: serialized with every other env test
    unsafe { std::env::set_var("PCARE_API_URL", "http://from-env:9000") };

    let client = ApiClient::new(None, Arc::new(MemoryTokenStore::new()));
    assert_eq!(client.base_url(), "http://from-env:9000");

    let client = ApiClient::new(
        Some("http://flag:1".to_string()),
        Arc::new(MemoryTokenStore::new()),
    );
    assert_eq!(client.base_url(), "http://flag:1");

    unsafe {
        match previous {
            Some(v) => std::env::set_var("PCARE_API_URL", v),
            None => std::env::remove_var("PCARE_API_URL"),
        }
    }
}

#[test]
#[serial]
fn test_default_url() {
    let previous = std::env::var("PCARE_API_URL").ok();
    unsafe { std::env::remove_var("PCARE_API_URL") };

    let client = ApiClient::new(None, Arc::new(MemoryTokenStore::new()));
    assert_eq!(client.base_url(), "http://localhost:8000");

    if let Some(v) = previous {
        unsafe { std::env::set_var("PCARE_API_URL", v) };
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_private_request_without_session() {
    let server = MockApi::spawn().await;
    let client = ApiClient::new(Some(server.url.clone()), Arc::new(MemoryTokenStore::new()));

    let result = client.send_private(|c| c.get(endpoints::ME)).await;

    assert!(matches!(result, Err(CliError::NotAuthenticated)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_private_request_with_valid_token() {
    let server = MockApi::spawn().await;
    let client = ApiClient::new(Some(server.url.clone()), store_with(server.sign_in()));

    let response = client.send_private(|c| c.get(endpoints::ME)).await.unwrap();
    let profile: UserProfile = ApiClient::handle_response(response).await.unwrap();

    assert_eq!(profile.email, "anna@example.com");
    assert_eq!(server.state().refresh_calls, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_401_refreshes_once_and_retries() {
    let server = MockApi::spawn().await;
    server.seed_patients(3);
    let store = store_with(server.sign_in());
    let client = ApiClient::new(Some(server.url.clone()), store.clone());
    let old_token = store.access_token().unwrap();
    server.expire_access_tokens();

    let response = client
        .send_private(|c| c.get(endpoints::PATIENTS))
        .await
        .unwrap();
    let page: Page<Patient> = ApiClient::handle_response(response).await.unwrap();

    assert_eq!(page.total_items, 3);
    assert_eq!(server.state().refresh_calls, 1);
    let new_token = store.access_token().unwrap();
    assert_ne!(new_token, old_token);
    assert!(store.refresh_token().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_clears_session() {
    let server = MockApi::spawn().await;
    let store = store_with(server.sign_in());
    let client = ApiClient::new(Some(server.url.clone()), store.clone());
    server.expire_access_tokens();
    server.state().refresh_fails = true;

    let result = client.send_private(|c| c.get(endpoints::ME)).await;

    assert!(matches!(result, Err(CliError::SessionExpired)));
    assert_eq!(server.state().refresh_calls, 1);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_stores_new_access_token_via_store() {
    let server = MockApi::spawn().await;
    let tokens = server.sign_in();
    server.expire_access_tokens();

    let mut store = MockTokenStore::new();
    let access = tokens.access_token.clone();
    let refresh = tokens.refresh_token.clone();
    store
        .expect_access_token()
        .times(1)
        .returning(move || Some(access.clone()));
    store
        .expect_refresh_token()
        .returning(move || Some(refresh.clone()));
    store
        .expect_store_access_token()
        .withf(|token| token.starts_with("access-"))
        .times(1)
        .returning(|_| Ok(()));
    store.expect_clear().never();

    let client = ApiClient::new(Some(server.url.clone()), Arc::new(store));
    let response = client.send_private(|c| c.get(endpoints::ME)).await.unwrap();

    assert!(response.status().is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_body_message_is_surfaced() {
    let server = MockApi::spawn().await;
    let client = ApiClient::new(Some(server.url.clone()), store_with(server.sign_in()));

    let response = client
        .send_private(|c| c.get(&endpoints::patient("missing")))
        .await
        .unwrap();
    let result: Result<serde_json::Value, _> = ApiClient::handle_response(response).await;

    match result {
        Err(CliError::ApiError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Patient not found");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_failure_maps_to_connection_failed() {
    let client = ApiClient::new(
        Some("http://127.0.0.1:1".to_string()),
        store_with(Tokens {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        }),
    );

    let result = client.send_private(|c| c.get(endpoints::ME)).await;

    assert!(matches!(result, Err(CliError::ConnectionFailed { .. })));
}
