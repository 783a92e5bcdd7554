use std::env;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cli::error::{CliError, CliResult};
use crate::endpoints::{self, DEFAULT_API_URL};
use crate::models::{AccessTokenResponse, RefreshRequest};
use crate::notice::failure_message;
use crate::session::{TokenStore, should_refresh};

/// API client for communicating with the patients REST API
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. PCARE_API_URL environment variable
    /// 3. Default: http://localhost:8000
    pub fn new(api_url: Option<String>, session: Arc<dyn TokenStore>) -> Self {
        let _ = rustls::crypto::ring::default_provider().install_default();

        let base_url = api_url
            .or_else(|| env::var("PCARE_API_URL").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            client: Client::new(),
            session,
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &dyn TokenStore {
        self.session.as_ref()
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(endpoints::url(&self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(endpoints::url(&self.base_url, path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(endpoints::url(&self.base_url, path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(endpoints::url(&self.base_url, path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(endpoints::url(&self.base_url, path))
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the deserialized response body on success, or a
    /// `CliError::ApiError` carrying the server's `message` when it sent one.
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            let status = response.status();
            let fallback = status.canonical_reason().unwrap_or("Unknown error");
            let body = response.text().await.unwrap_or_default();
            Err(CliError::ApiError {
                status: status.as_u16(),
                message: failure_message(&body, fallback),
            })
        }
    }

    /// Send an authenticated request built by `build`.
    ///
    /// A 401 answered while a refresh token is stored renews the access token
    /// and replays the request once. The closure is called again for the
    /// replay, so bodies that cannot be cloned are rebuilt.
    pub async fn send_private<F>(&self, build: F) -> CliResult<Response>
    where
        F: Fn(&Self) -> RequestBuilder,
    {
        self.try_send_private(|client| Ok(build(client))).await
    }

    /// Like [`ApiClient::send_private`] for builders that can fail.
    pub async fn try_send_private<F>(&self, build: F) -> CliResult<Response>
    where
        F: Fn(&Self) -> CliResult<RequestBuilder>,
    {
        let token = self
            .session
            .access_token()
            .ok_or(CliError::NotAuthenticated)?;
        let response = build(self)?.bearer_auth(&token).send().await?;

        if !should_refresh(response.status().as_u16(), false, self.session()) {
            return Ok(response);
        }

        debug!("Access token rejected, refreshing");
        let token = self.refresh_access_token().await?;
        Ok(build(self)?.bearer_auth(&token).send().await?)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// A rejected refresh clears the stored session.
    pub async fn refresh_access_token(&self) -> CliResult<String> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(CliError::NotAuthenticated)?;

        let response = self
            .post(endpoints::REFRESH_TOKEN)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "Token refresh rejected, clearing session"
            );
            self.session.clear()?;
            return Err(CliError::SessionExpired);
        }

        let body: AccessTokenResponse = Self::handle_response(response).await?;
        self.session.store_access_token(&body.access_token)?;
        info!("Access token refreshed");
        Ok(body.access_token)
    }
}

#[cfg(test)]
#[path = "api_client_test.rs"]
mod api_client_test;
