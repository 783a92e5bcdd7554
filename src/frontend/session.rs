use gloo_storage::{LocalStorage, Storage};
use patients_care::models::Tokens;
use patients_care::session::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionError, SessionResult, TokenStore,
};

/// Token pair kept in `localStorage`, one JSON string per key.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTokenStore;

fn storage_error(err: gloo_storage::errors::StorageError) -> SessionError {
    SessionError::Storage(err.to_string())
}

impl TokenStore for BrowserTokenStore {
    fn access_token(&self) -> Option<String> {
        LocalStorage::get::<String>(ACCESS_TOKEN_KEY).ok()
    }

    fn refresh_token(&self) -> Option<String> {
        LocalStorage::get::<String>(REFRESH_TOKEN_KEY).ok()
    }

    fn store_tokens(&self, tokens: &Tokens) -> SessionResult<()> {
        LocalStorage::set(ACCESS_TOKEN_KEY, &tokens.access_token).map_err(storage_error)?;
        LocalStorage::set(REFRESH_TOKEN_KEY, &tokens.refresh_token).map_err(storage_error)
    }

    fn store_access_token(&self, token: &str) -> SessionResult<()> {
        if self.refresh_token().is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        LocalStorage::set(ACCESS_TOKEN_KEY, token).map_err(storage_error)
    }

    fn clear(&self) -> SessionResult<()> {
        LocalStorage::delete(ACCESS_TOKEN_KEY);
        LocalStorage::delete(REFRESH_TOKEN_KEY);
        Ok(())
    }
}
