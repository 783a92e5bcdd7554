use chrono::{DateTime, Utc};
use tabled::builder::Builder;
use tracing::{info, instrument, warn};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::done;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::apply_table_style;
use crate::endpoints;
use crate::models::{LogoutRequest, MessageResponse, Tokens};
use crate::session::token_expiry;
use crate::validation::{LoginForm, RegisterForm};

/// Create an account. Registration does not sign in.
#[instrument(skip(api_client, form), fields(email = %form.email))]
pub async fn register(api_client: &ApiClient, form: &RegisterForm) -> CliResult<String> {
    let request = form.validate()?;

    let response = api_client
        .post(endpoints::REGISTER)
        .json(&request)
        .send()
        .await?;
    let body: MessageResponse = ApiClient::handle_response(response).await?;

    info!("Account registered");
    Ok(done(&body.message))
}

/// Sign in and store the issued token pair.
#[instrument(skip(api_client, form), fields(email = %form.email))]
pub async fn login(api_client: &ApiClient, form: &LoginForm) -> CliResult<String> {
    let request = form.validate()?;

    let response = api_client
        .post(endpoints::LOGIN)
        .json(&request)
        .send()
        .await?;
    let tokens: Tokens = ApiClient::handle_response(response).await?;
    api_client.session().store_tokens(&tokens)?;

    info!("Signed in");
    Ok(done(&format!("Signed in as {}", request.email)))
}

/// Sign out. The local session is dropped even when the server call fails.
#[instrument(skip(api_client))]
pub async fn logout(api_client: &ApiClient) -> CliResult<String> {
    let session = api_client.session();
    let (Some(access_token), Some(refresh_token)) =
        (session.access_token(), session.refresh_token())
    else {
        return Err(CliError::NotAuthenticated);
    };

    let result = async {
        let response = api_client
            .post(endpoints::LOGOUT)
            .json(&LogoutRequest {
                access_token,
                refresh_token,
            })
            .send()
            .await?;
        ApiClient::handle_response::<MessageResponse>(response).await
    }
    .await;

    session.clear()?;

    match result {
        Ok(_) => Ok(done("Signed out")),
        Err(e) => {
            warn!(error = %e, "Server-side logout failed, local session cleared");
            Err(e)
        }
    }
}

#[instrument(skip(api_client))]
pub async fn refresh(api_client: &ApiClient) -> CliResult<String> {
    api_client.refresh_access_token().await?;
    Ok(done("Access token refreshed"))
}

/// Describe the stored session. Works offline.
pub fn status(api_client: &ApiClient, now: DateTime<Utc>) -> CliResult<String> {
    let session = api_client.session();

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["API URL", api_client.base_url()]);

    match session.access_token() {
        Some(token) => {
            builder.push_record(["Status", "Signed in"]);
            builder.push_record(["Access token", &describe_expiry(&token, now)]);
            let refresh = session
                .refresh_token()
                .map(|t| describe_expiry(&t, now))
                .unwrap_or_else(|| "-".to_string());
            builder.push_record(["Refresh token", &refresh]);
        }
        None => {
            builder.push_record(["Status", "Signed out"]);
        }
    }

    let mut table = builder.build();
    apply_table_style(&mut table);
    Ok(table.to_string())
}

fn describe_expiry(token: &str, now: DateTime<Utc>) -> String {
    let Some(expiry) = token_expiry(token).and_then(|exp| DateTime::from_timestamp(exp, 0)) else {
        return "no expiry".to_string();
    };
    let stamp = expiry.format("%Y-%m-%d %H:%M:%S UTC");
    if expiry <= now {
        format!("expired at {}", stamp)
    } else {
        format!("valid until {}", stamp)
    }
}
