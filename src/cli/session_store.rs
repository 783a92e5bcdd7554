//! File-backed persistence for the command-line client: the token pair and
//! the last patients list query.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::error::CliResult;
use crate::models::Tokens;
use crate::query::ListQuery;
use crate::session::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionError, SessionResult, TokenStore,
};

/// Token pair kept in a JSON object keyed like the browser's localStorage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SessionResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| SessionError::Storage(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
        write_private(&self.path, &serde_json::to_string_pretty(entries).map_err(storage)?)
            .map_err(storage)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.read()
            .ok()?
            .remove(key)
            .filter(|token| !token.is_empty())
    }
}

fn storage(e: impl std::fmt::Display) -> SessionError {
    SessionError::Storage(e.to_string())
}

fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    fn store_tokens(&self, tokens: &Tokens) -> SessionResult<()> {
        let mut entries = self.read()?;
        entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
        self.write(&entries)
    }

    fn store_access_token(&self, token: &str) -> SessionResult<()> {
        let mut entries = self.read()?;
        if !entries.contains_key(REFRESH_TOKEN_KEY) {
            return Err(SessionError::NotAuthenticated);
        }
        entries.insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        self.write(&entries)
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage(e)),
        }
    }
}

/// The patients list query, remembered between invocations.
#[derive(Debug, Clone)]
pub struct QueryStore {
    path: PathBuf,
}

impl QueryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The saved query, or the default one. An unreadable file is ignored.
    pub fn load(&self) -> ListQuery {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(query) => Some(query),
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "Ignoring unreadable list query");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self, query: &ListQuery) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(query)?)?;
        Ok(())
    }

    pub fn reset(&self) -> CliResult<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
