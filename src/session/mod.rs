//! Authentication session: where tokens live and when to renew them.
//!
//! Both front ends keep the token pair behind [`TokenStore`]. The access token
//! is attached as a bearer credential to private requests; a 401 on such a
//! request triggers exactly one refresh and one retry.

mod jwt;

pub use jwt::{Claims, decode_claims, is_expired, token_expiry};

use std::sync::RwLock;

use thiserror::Error;

use crate::models::Tokens;

pub const ACCESS_TOKEN_KEY: &str = "patients-care-access-token";
pub const REFRESH_TOKEN_KEY: &str = "patients-care-refresh-token";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("token storage failed: {0}")]
    Storage(String),

    #[error("malformed token: {0}")]
    MalformedToken(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Persistent token pair.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store_tokens(&self, tokens: &Tokens) -> SessionResult<()>;
    fn store_access_token(&self, token: &str) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Whether a private request should be retried after renewing the access
/// token. Only the first 401 qualifies, and only with a refresh token at hand.
pub fn should_refresh(status: u16, already_retried: bool, store: &dyn TokenStore) -> bool {
    status == 401 && !already_retried && store.refresh_token().is_some()
}

/// Whether a stored session exists at all.
pub fn is_authenticated(store: &dyn TokenStore) -> bool {
    store.access_token().is_some()
}

/// Process-local store, used by tests and as a fallback when nothing persists.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<Tokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }

    fn poisoned() -> SessionError {
        SessionError::Storage("token lock poisoned".to_string())
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .ok()?
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .ok()?
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    fn store_tokens(&self, tokens: &Tokens) -> SessionResult<()> {
        *self.tokens.write().map_err(|_| Self::poisoned())? = Some(tokens.clone());
        Ok(())
    }

    fn store_access_token(&self, token: &str) -> SessionResult<()> {
        let mut guard = self.tokens.write().map_err(|_| Self::poisoned())?;
        match guard.as_mut() {
            Some(tokens) => {
                tokens.access_token = token.to_string();
                Ok(())
            }
            None => Err(SessionError::NotAuthenticated),
        }
    }

    fn clear(&self) -> SessionResult<()> {
        *self.tokens.write().map_err(|_| Self::poisoned())? = None;
        Ok(())
    }
}
