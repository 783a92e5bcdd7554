use gloo_net::http::{Request, RequestBuilder, Response};
use patients_care::endpoints;
use patients_care::models::FailedReqMsg;
use patients_care::notice::failure_message;
use patients_care::session::{TokenStore, should_refresh};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::session::BrowserTokenStore;

/// Base URL of the remote API, fixed at build time.
pub const API_BASE: &str = match option_env!("PCARE_API_URL") {
    Some(url) => url,
    None => endpoints::DEFAULT_API_URL,
};

/// API client error type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiClientError {
    Network(String),
    Server(FailedReqMsg),
    Deserialization(String),
    /// No session, or the session could not be renewed.
    Unauthorized,
}

impl std::fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiClientError::Server(err) => write!(f, "{}", err.message),
            ApiClientError::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            ApiClientError::Unauthorized => write!(f, "Session expired, please sign in again"),
        }
    }
}

type Result<T> = std::result::Result<T, ApiClientError>;

fn network(err: gloo_net::Error) -> ApiClientError {
    ApiClientError::Network(err.to_string())
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    fn builder(self, path: &str) -> RequestBuilder {
        let url = endpoints::url(API_BASE, path);
        match self {
            Verb::Get => Request::get(&url),
            Verb::Post => Request::post(&url),
            Verb::Put => Request::put(&url),
            Verb::Patch => Request::patch(&url),
            Verb::Delete => Request::delete(&url),
        }
    }
}

/// Decodes a 2xx body, or turns the error body into `Server`.
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiClientError::Deserialization(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let error = serde_json::from_str::<FailedReqMsg>(&body).unwrap_or_else(|_| FailedReqMsg {
        message: failure_message(&body, &response.status_text()),
        error: None,
    });
    Err(ApiClientError::Server(error))
}

async fn send_public<T: DeserializeOwned>(request: Request) -> Result<T> {
    let response = request.send().await.map_err(network)?;
    handle_response(response).await
}

/// Sends an authenticated request. `body` finishes the builder and is called
/// again when the request is retried after a token refresh.
async fn send_private<T, F>(verb: Verb, path: &str, body: F) -> Result<T>
where
    T: DeserializeOwned,
    F: Fn(RequestBuilder) -> std::result::Result<Request, gloo_net::Error>,
{
    let store = BrowserTokenStore;
    let mut retried = false;

    loop {
        let token = store.access_token().ok_or(ApiClientError::Unauthorized)?;
        let builder = verb
            .builder(path)
            .header("Authorization", &format!("Bearer {}", token));
        let response = body(builder).map_err(network)?.send().await.map_err(network)?;

        if should_refresh(response.status(), retried, &store) {
            web_sys::console::log_1(&format!("{} {} returned 401, refreshing", verb_name(verb), path).into());
            refresh_access_token(&store).await?;
            retried = true;
            continue;
        }
        if response.status() == 401 {
            let _ = store.clear();
            return Err(ApiClientError::Unauthorized);
        }
        return handle_response(response).await;
    }
}

fn verb_name(verb: Verb) -> &'static str {
    match verb {
        Verb::Get => "GET",
        Verb::Post => "POST",
        Verb::Put => "PUT",
        Verb::Patch => "PATCH",
        Verb::Delete => "DELETE",
    }
}

/// Renews the access token. A rejected refresh ends the session.
async fn refresh_access_token(store: &BrowserTokenStore) -> Result<()> {
    use patients_care::models::{AccessTokenResponse, RefreshRequest};

    let refresh_token = store.refresh_token().ok_or(ApiClientError::Unauthorized)?;
    let request = Verb::Post
        .builder(endpoints::REFRESH_TOKEN)
        .json(&RefreshRequest { refresh_token })
        .map_err(network)?;

    match send_public::<AccessTokenResponse>(request).await {
        Ok(renewed) => store
            .store_access_token(&renewed.access_token)
            .map_err(|_| ApiClientError::Unauthorized),
        Err(err) => {
            web_sys::console::log_1(&format!("Token refresh failed: {}", err).into());
            let _ = store.clear();
            Err(ApiClientError::Unauthorized)
        }
    }
}

/// Authentication API
pub mod auth {
    use patients_care::models::{
        LoginRequest, LogoutRequest, MessageResponse, RegisterRequest, Tokens,
    };

    use super::*;

    pub async fn register(body: &RegisterRequest) -> Result<MessageResponse> {
        let request = Verb::Post.builder(endpoints::REGISTER).json(body).map_err(network)?;
        send_public(request).await
    }

    /// Signs in and stores the token pair.
    pub async fn login(body: &LoginRequest) -> Result<()> {
        let request = Verb::Post.builder(endpoints::LOGIN).json(body).map_err(network)?;
        let tokens: Tokens = send_public(request).await?;
        BrowserTokenStore
            .store_tokens(&tokens)
            .map_err(|e| ApiClientError::Network(e.to_string()))
    }

    /// Tells the server to revoke the session. Local tokens are cleared
    /// whatever the outcome.
    pub async fn logout() -> Result<()> {
        let store = BrowserTokenStore;
        let result = match (store.access_token(), store.refresh_token()) {
            (Some(access_token), Some(refresh_token)) => {
                let body = LogoutRequest {
                    access_token,
                    refresh_token,
                };
                send_private::<MessageResponse, _>(Verb::Post, endpoints::LOGOUT, |b| b.json(&body))
                    .await
                    .map(|_| ())
            }
            _ => Ok(()),
        };
        let _ = store.clear();
        result
    }
}

/// Patients API
pub mod patients {
    use patients_care::models::{MessageResponse, Page, Patient, RequestPatient, Single};
    use patients_care::query::ListQuery;

    use super::*;

    pub async fn list(query: &ListQuery) -> Result<Page<Patient>> {
        let path = format!("{}?{}", endpoints::PATIENTS, query.to_query_string());
        send_private(Verb::Get, &path, |b| b.build()).await
    }

    pub async fn get(id: &str) -> Result<Patient> {
        let single: Single<Patient> =
            send_private(Verb::Get, &endpoints::patient(id), |b| b.build()).await?;
        Ok(single.data)
    }

    pub async fn add(body: &RequestPatient) -> Result<MessageResponse> {
        send_private(Verb::Post, endpoints::PATIENTS, |b| b.json(body)).await
    }

    pub async fn edit(id: &str, body: &RequestPatient) -> Result<MessageResponse> {
        send_private(Verb::Patch, &endpoints::patient(id), |b| b.json(body)).await
    }

    pub async fn delete(id: &str) -> Result<MessageResponse> {
        send_private(Verb::Delete, &endpoints::patient(id), |b| b.build()).await
    }
}

/// Account API
pub mod users {
    use patients_care::models::{
        MessageResponse, RenewPasswordRequest, UpdateUserRequest, UserProfile,
    };
    use web_sys::{File, FormData};

    use super::*;

    pub async fn me() -> Result<UserProfile> {
        send_private(Verb::Get, endpoints::ME, |b| b.build()).await
    }

    pub async fn update(body: &UpdateUserRequest) -> Result<MessageResponse> {
        send_private(Verb::Put, endpoints::ME, |b| b.json(body)).await
    }

    pub async fn upload_avatar(file: &File) -> Result<MessageResponse> {
        let form = FormData::new().map_err(|_| ApiClientError::Network("FormData unavailable".to_string()))?;
        form.append_with_blob_and_filename(endpoints::AVATAR_FIELD, file, &file.name())
            .map_err(|_| ApiClientError::Network("could not attach file".to_string()))?;
        send_private(Verb::Put, endpoints::AVATAR, |b| b.body(form.clone())).await
    }

    pub async fn delete_avatar() -> Result<MessageResponse> {
        send_private(Verb::Delete, endpoints::AVATAR, |b| b.build()).await
    }

    pub async fn change_password(body: &RenewPasswordRequest) -> Result<MessageResponse> {
        send_private(Verb::Put, endpoints::UPDATE_PASSWORD, |b| b.json(body)).await
    }

    pub async fn delete_account() -> Result<MessageResponse> {
        send_private(Verb::Delete, endpoints::DELETE_ACCOUNT, |b| b.build()).await
    }
}
