use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeZone, Utc};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::auth::*;
use crate::cli::error::CliError;
use crate::cli::test_server::{EMAIL, MockApi, PASSWORD};
use crate::models::Tokens;
use crate::session::{MemoryTokenStore, TokenStore};
use crate::validation::{LoginForm, RegisterForm};

fn client(server: &MockApi, store: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::new(Some(server.url.clone()), store)
}

fn register_form(email: &str) -> RegisterForm {
    RegisterForm {
        name: "Jan".to_string(),
        surname: "Kowalski".to_string(),
        email: email.to_string(),
        password: "password1".to_string(),
        repeated_password: "password1".to_string(),
        terms: true,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_creates_account_without_signing_in() {
    let server = MockApi::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let api_client = client(&server, store.clone());

    let output = register(&api_client, &register_form("jan@example.com"))
        .await
        .unwrap();

    assert_eq!(output, "✓ User created");
    assert_eq!(server.user_count(), 2);
    assert!(store.access_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_duplicate_email_surfaces_server_message() {
    let server = MockApi::spawn().await;
    let api_client = client(&server, Arc::new(MemoryTokenStore::new()));

    let err = register(&api_client, &register_form(EMAIL))
        .await
        .unwrap_err();

    match err {
        CliError::ApiError { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "User already exists");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_rejects_invalid_form_before_sending() {
    let server = MockApi::spawn().await;
    let api_client = client(&server, Arc::new(MemoryTokenStore::new()));
    let form = RegisterForm {
        terms: false,
        ..register_form("jan@example.com")
    };

    let err = register(&api_client, &form).await.unwrap_err();

    assert!(matches!(err, CliError::Validation(_)));
    assert_eq!(server.user_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_tokens() {
    let server = MockApi::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let api_client = client(&server, store.clone());

    let output = login(
        &api_client,
        &LoginForm {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, format!("✓ Signed in as {}", EMAIL));
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_wrong_password() {
    let server = MockApi::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let api_client = client(&server, store.clone());

    let err = login(
        &api_client,
        &LoginForm {
            email: EMAIL.to_string(),
            password: "wrong-password".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::ApiError { status: 401, .. }));
    assert!(store.access_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let server = MockApi::spawn().await;
    let store = Arc::new(MemoryTokenStore::with_tokens(server.sign_in()));
    let api_client = client(&server, store.clone());

    let output = logout(&api_client).await.unwrap();

    assert_eq!(output, "✓ Signed out");
    assert!(store.access_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session_even_when_server_unreachable() {
    let store = Arc::new(MemoryTokenStore::with_tokens(Tokens {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
    }));
    let api_client = ApiClient::new(Some("http://127.0.0.1:1".to_string()), store.clone());

    let err = logout(&api_client).await.unwrap_err();

    assert!(matches!(err, CliError::ConnectionFailed { .. }));
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_without_session() {
    let server = MockApi::spawn().await;
    let api_client = client(&server, Arc::new(MemoryTokenStore::new()));

    assert!(matches!(
        logout(&api_client).await,
        Err(CliError::NotAuthenticated)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_command() {
    let server = MockApi::spawn().await;
    let store = Arc::new(MemoryTokenStore::with_tokens(server.sign_in()));
    let api_client = client(&server, store.clone());

    let output = refresh(&api_client).await.unwrap();

    assert_eq!(output, "✓ Access token refreshed");
    assert_eq!(store.access_token().as_deref(), Some("access-2"));
    assert_eq!(server.state().refresh_calls, 1);
}

fn jwt_expiring_at(exp: i64) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp))
    )
}

#[test]
fn test_status_reports_expiry() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let store = Arc::new(MemoryTokenStore::with_tokens(Tokens {
        access_token: jwt_expiring_at(now.timestamp() - 60),
        refresh_token: jwt_expiring_at(now.timestamp() + 3600),
    }));
    let api_client = ApiClient::new(Some("http://api.local".to_string()), store);

    let output = status(&api_client, now).unwrap();

    assert!(output.contains("Signed in"));
    assert!(output.contains("http://api.local"));
    assert!(output.contains("expired at 2024-05-01 11:59:00 UTC"));
    assert!(output.contains("valid until 2024-05-01 13:00:00 UTC"));
}

#[test]
fn test_status_signed_out() {
    let api_client = ApiClient::new(
        Some("http://api.local".to_string()),
        Arc::new(MemoryTokenStore::new()),
    );

    let output = status(&api_client, Utc::now()).unwrap();

    assert!(output.contains("Signed out"));
}
