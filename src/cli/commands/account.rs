use std::path::Path;

use reqwest::multipart::{Form, Part};
use tabled::builder::Builder;
use tracing::{info, instrument};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::done;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, require_force};
use crate::endpoints;
use crate::models::{MessageResponse, UserProfile};
use crate::validation::{PasswordForm, ProfileForm, validate_avatar};

/// Profile fields to change; unset fields keep their value.
#[derive(Debug, Default, Clone)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

async fn fetch_profile(api_client: &ApiClient) -> CliResult<UserProfile> {
    let response = api_client.send_private(|c| c.get(endpoints::ME)).await?;
    ApiClient::handle_response(response).await
}

async fn send_message(
    api_client: &ApiClient,
    build: impl Fn(&ApiClient) -> reqwest::RequestBuilder,
) -> CliResult<String> {
    let response = api_client.send_private(build).await?;
    let body: MessageResponse = ApiClient::handle_response(response).await?;
    Ok(done(&body.message))
}

/// Show the signed-in user
#[instrument(skip(api_client))]
pub async fn show(api_client: &ApiClient, format: &str) -> CliResult<String> {
    let profile = fetch_profile(api_client).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&profile)?),
        _ => {
            let avatar = profile
                .avatar_url(api_client.base_url())
                .unwrap_or_else(|| "-".to_string());

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["Name", &profile.full_name()]);
            builder.push_record(["Email", &profile.email]);
            builder.push_record(["Avatar", &avatar]);

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

#[instrument(skip(api_client, edit))]
pub async fn update(api_client: &ApiClient, edit: ProfileEdit) -> CliResult<String> {
    if edit.name.is_none() && edit.surname.is_none() && edit.email.is_none() {
        return Err(CliError::InvalidArgument(
            "nothing to change; pass --name, --surname or --email".to_string(),
        ));
    }

    let current = fetch_profile(api_client).await?;
    let form = ProfileForm {
        name: edit.name.unwrap_or(current.name),
        surname: edit.surname.unwrap_or(current.surname),
        email: edit.email.unwrap_or(current.email),
    };
    let request = form.validate()?;

    let output = send_message(api_client, |c| c.put(endpoints::ME).json(&request)).await?;
    info!("Profile updated");
    Ok(output)
}

#[instrument(skip(api_client, form))]
pub async fn change_password(api_client: &ApiClient, form: &PasswordForm) -> CliResult<String> {
    let request = form.validate()?;
    send_message(api_client, |c| c.put(endpoints::UPDATE_PASSWORD).json(&request)).await
}

/// Delete the account, then drop the local session.
#[instrument(skip(api_client))]
pub async fn delete_account(api_client: &ApiClient, force: bool) -> CliResult<String> {
    require_force(force, "delete your account")?;

    let output = send_message(api_client, |c| c.delete(endpoints::DELETE_ACCOUNT)).await?;
    api_client.session().clear()?;

    info!("Account deleted, session cleared");
    Ok(output)
}

/// Upload `path` as the avatar. The MIME type is guessed from the extension.
#[instrument(skip(api_client))]
pub async fn upload_avatar(api_client: &ApiClient, path: &Path) -> CliResult<String> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    validate_avatar(&[mime.essence_str()])?;

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());

    let response = api_client
        .try_send_private(|c| {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str(mime.essence_str())?;
            Ok(c.put(endpoints::AVATAR)
                .multipart(Form::new().part(endpoints::AVATAR_FIELD, part)))
        })
        .await?;
    let body: MessageResponse = ApiClient::handle_response(response).await?;

    info!(size = bytes.len(), "Avatar uploaded");
    Ok(done(&body.message))
}

#[instrument(skip(api_client))]
pub async fn delete_avatar(api_client: &ApiClient) -> CliResult<String> {
    send_message(api_client, |c| c.delete(endpoints::AVATAR)).await
}
