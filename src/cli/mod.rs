pub mod api_client;
mod commands;
pub mod error;
pub mod paths;
pub mod session_store;
mod utils;

#[cfg(test)]
pub(crate) mod test_server;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::account::ProfileEdit;
use crate::cli::commands::patient::{ListArgs, PatientEdit};
use crate::cli::error::CliResult;
use crate::cli::session_store::{FileTokenStore, QueryStore};
use crate::table::SortDirection;
use crate::validation::{LoginForm, PasswordForm, PatientForm, RegisterForm};

#[derive(Parser)]
#[command(name = "pcare")]
#[command(author, version, about = "Patients care dashboard CLI", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: PCARE_API_URL env or http://localhost:8000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in and manage the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Patient records
    Patient {
        #[command(subcommand)]
        command: PatientCommands,
    },
    /// The signed-in user's account
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PCARE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        repeated_password: Option<String>,
        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PCARE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Renew the access token
    Refresh,
    /// Show the stored session
    Status,
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List patients. Search, sort and page are remembered between runs.
    List {
        /// Search term; an empty string clears it
        #[arg(long)]
        search: Option<String>,
        /// Column key to sort by; repeating the active key flips the direction
        #[arg(long)]
        sort: Option<String>,
        /// Sort direction (asc or desc)
        #[arg(long)]
        direction: Option<SortDirection>,
        /// 1-indexed page
        #[arg(long)]
        page: Option<u32>,
        /// Rows per page (5, 10 or 25)
        #[arg(long)]
        page_size: Option<u32>,
        /// Go to the next page
        #[arg(long, conflicts_with_all = ["prev", "page"])]
        next: bool,
        /// Go to the previous page
        #[arg(long, conflicts_with = "page")]
        prev: bool,
        /// Start from the default query
        #[arg(long)]
        reset: bool,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one patient
    Get {
        id: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Add a patient
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        /// 8 to 14 digits, hyphens or spaces
        #[arg(long)]
        phone: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        avenue: String,
    },
    /// Change fields of a patient
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        avenue: Option<String>,
    },
    /// Delete one or more patients
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Show the profile
    Show {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Change name, surname or email
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the password
    Password {
        #[arg(long, env = "PCARE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        repeated_password: Option<String>,
    },
    /// Delete the account and sign out
    Delete {
        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },
    /// Manage the avatar image
    Avatar {
        #[command(subcommand)]
        command: AvatarCommands,
    },
}

#[derive(Subcommand)]
enum AvatarCommands {
    /// Upload an image file
    Upload { path: PathBuf },
    /// Remove the avatar
    Delete,
}

/// Initialize tracing subscriber with env filter, logging to stderr
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "patients_care=warn",
        1 => "patients_care=debug",
        _ => "patients_care=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // Show help when no command provided
        Cli::command().print_help().map_err(error::CliError::from)?;
        return Ok(());
    };

    let session = Arc::new(FileTokenStore::new(paths::get_session_path()?));
    let api_client = ApiClient::new(cli.api_url, session);
    let queries = QueryStore::new(paths::get_query_path()?);

    let output = execute(&api_client, &queries, command).await?;
    println!("{}", output);
    Ok(())
}

async fn execute(api_client: &ApiClient, queries: &QueryStore, command: Commands) -> CliResult<String> {
    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Register {
                name,
                surname,
                email,
                repeated_password,
                password,
                accept_terms,
            } => {
                let form = RegisterForm {
                    name,
                    surname,
                    email,
                    repeated_password: repeated_password.unwrap_or_else(|| password.clone()),
                    password,
                    terms: accept_terms,
                };
                commands::auth::register(api_client, &form).await
            }
            AuthCommands::Login { email, password } => {
                commands::auth::login(api_client, &LoginForm { email, password }).await
            }
            AuthCommands::Logout => commands::auth::logout(api_client).await,
            AuthCommands::Refresh => commands::auth::refresh(api_client).await,
            AuthCommands::Status => commands::auth::status(api_client, chrono::Utc::now()),
        },
        Commands::Patient { command } => match command {
            PatientCommands::List {
                search,
                sort,
                direction,
                page,
                page_size,
                next,
                prev,
                reset,
                format,
            } => {
                let args = ListArgs {
                    search,
                    sort,
                    direction,
                    page,
                    page_size,
                    next,
                    prev,
                    reset,
                };
                commands::patient::list_patients(api_client, queries, &args, &format).await
            }
            PatientCommands::Get { id, format } => {
                commands::patient::get_patient(api_client, &id, &format).await
            }
            PatientCommands::Add {
                name,
                surname,
                phone,
                state,
                city,
                avenue,
            } => {
                let form = PatientForm {
                    name,
                    surname,
                    phone_number: phone,
                    state,
                    city,
                    avenue,
                };
                commands::patient::add_patient(api_client, &form).await
            }
            PatientCommands::Edit {
                id,
                name,
                surname,
                phone,
                state,
                city,
                avenue,
            } => {
                let edit = PatientEdit {
                    name,
                    surname,
                    phone_number: phone,
                    state,
                    city,
                    avenue,
                };
                commands::patient::edit_patient(api_client, &id, edit).await
            }
            PatientCommands::Delete { ids, force } => {
                commands::patient::delete_patients(api_client, &ids, force).await
            }
        },
        Commands::Account { command } => match command {
            AccountCommands::Show { format } => commands::account::show(api_client, &format).await,
            AccountCommands::Update {
                name,
                surname,
                email,
            } => {
                let edit = ProfileEdit {
                    name,
                    surname,
                    email,
                };
                commands::account::update(api_client, edit).await
            }
            AccountCommands::Password {
                password,
                repeated_password,
            } => {
                let form = PasswordForm {
                    repeated_password: repeated_password.unwrap_or_else(|| password.clone()),
                    password,
                };
                commands::account::change_password(api_client, &form).await
            }
            AccountCommands::Delete { force } => {
                commands::account::delete_account(api_client, force).await
            }
            AccountCommands::Avatar { command } => match command {
                AvatarCommands::Upload { path } => {
                    commands::account::upload_avatar(api_client, &path).await
                }
                AvatarCommands::Delete => commands::account::delete_avatar(api_client).await,
            },
        },
    }
}
