//! Path resolution for pcare's data directory.

use std::env;
use std::path::PathBuf;

use crate::cli::error::{CliError, CliResult};

const APP_DIR: &str = "pcare";

/// Data directory holding the session and the saved list query.
///
/// Priority:
/// 1. `PCARE_DATA_DIR`
/// 2. `$XDG_DATA_HOME/pcare`
/// 3. `~/.local/share/pcare`
pub fn get_data_dir() -> CliResult<PathBuf> {
    if let Some(dir) = non_empty_var("PCARE_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let data_home = match non_empty_var("XDG_DATA_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let home = non_empty_var("HOME").ok_or_else(|| {
                CliError::InvalidArgument(
                    "HOME is not set; set PCARE_DATA_DIR to choose a data directory".to_string(),
                )
            })?;
            PathBuf::from(home).join(".local/share")
        }
    };

    Ok(data_home.join(APP_DIR))
}

pub fn get_session_path() -> CliResult<PathBuf> {
    Ok(get_data_dir()?.join("session.json"))
}

pub fn get_query_path() -> CliResult<PathBuf> {
    Ok(get_data_dir()?.join("patients-query.json"))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
