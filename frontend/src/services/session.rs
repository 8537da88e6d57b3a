//! # Session Store
//!
//! Token persistence for the signed-in user. The view model only asks whether
//! a token is present and clears it on logout; redirecting an unauthenticated
//! user is the router's job.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Trait defining the session token operations
pub trait SessionStore: Send + Sync {
    /// The stored token, if any
    fn get_token(&self) -> Option<String>;

    /// Store a token after a successful sign-in or registration
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget the token (explicit logout)
    fn clear_token(&self) -> Result<()>;

    /// A session is authenticated when a non-empty token is stored
    fn is_authenticated(&self) -> bool {
        self.get_token().is_some_and(|token| !token.is_empty())
    }
}

/// Session store kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    token: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Session store persisting the token in a single file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    const APP_DIR: &'static str = "finance-dashboard";
    const TOKEN_FILE: &'static str = "session_token";

    /// Store the token at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token under the platform data directory
    pub fn in_data_dir() -> Result<Self> {
        let data_dir = dirs::data_dir().context("No data directory on this platform")?;
        Ok(Self::new(data_dir.join(Self::APP_DIR).join(Self::TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, token)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Stored session token at {:?}", self.path);
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {:?}", self.path))?;
            info!("Cleared session token");
        }
        Ok(())
    }
}
