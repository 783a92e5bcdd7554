use miette::Diagnostic;
use thiserror::Error;

use crate::session::SessionError;
use crate::validation::ValidationErrors;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to connect to API server")]
    #[diagnostic(
        code(pcare::cli::connection_failed),
        help(
            "Is the patients API running? Pass --api-url or set PCARE_API_URL to point to the correct server."
        )
    )]
    ConnectionFailed {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from API server: {message}")]
    #[diagnostic(
        code(pcare::cli::invalid_response),
        help(
            "The server returned data in an unexpected format. This might indicate a version mismatch."
        )
    )]
    InvalidResponse { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(pcare::cli::api_error))]
    ApiError { status: u16, message: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(pcare::cli::not_authenticated),
        help("Sign in first: pcare auth login --email <EMAIL>")
    )]
    NotAuthenticated,

    #[error("Session expired")]
    #[diagnostic(
        code(pcare::cli::session_expired),
        help("The refresh token was rejected. Sign in again: pcare auth login --email <EMAIL>")
    )]
    SessionExpired,

    #[error("Refusing to {action} without confirmation")]
    #[diagnostic(
        code(pcare::cli::confirmation_required),
        help("Re-run with --force to confirm.")
    )]
    ConfirmationRequired { action: String },

    #[error("Invalid input: {0}")]
    #[diagnostic(code(pcare::cli::validation))]
    Validation(#[from] ValidationErrors),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(pcare::cli::invalid_argument))]
    InvalidArgument(String),

    #[error("Session storage error: {0}")]
    #[diagnostic(code(pcare::cli::session))]
    Session(SessionError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(pcare::cli::io))]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::ConnectionFailed { source: e }
        } else {
            CliError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotAuthenticated => CliError::NotAuthenticated,
            other => CliError::Session(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
