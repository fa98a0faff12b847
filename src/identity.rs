//! Identity capability.
//!
//! The workflow only asks "who is signed in, if anyone". The local implementation keeps the
//! signed-in user id in `session.json` under the data directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub is_authenticated: bool,
}

impl CurrentUser {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            is_authenticated: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Id of an authenticated user, if any.
    pub fn authenticated_id(&self) -> Option<&str> {
        if self.is_authenticated {
            self.id.as_deref().filter(|id| !id.trim().is_empty())
        } else {
            None
        }
    }
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> CurrentUser;

    fn sign_in(&self, id: &str) -> Result<CurrentUser>;

    fn sign_out(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    user_id: String,
}

/// Identity backed by a session file, optionally pinned to a user given on the command line.
pub struct LocalIdentity {
    path: Option<PathBuf>,
    user: RwLock<Option<String>>,
}

impl LocalIdentity {
    /// Load the identity. An explicit `user` wins over the stored session.
    pub fn load(path: Option<PathBuf>, user: Option<String>) -> Self {
        let stored = path.as_deref().and_then(|p| {
            let raw = std::fs::read_to_string(p).ok()?;
            match serde_json::from_str::<SessionFile>(&raw) {
                Ok(s) => Some(s.user_id),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "ignoring unreadable session file");
                    None
                }
            }
        });
        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .or(stored);
        Self {
            path,
            user: RwLock::new(user),
        }
    }

    /// Identity that never touches disk.
    pub fn in_memory(user: Option<String>) -> Self {
        Self::load(None, user)
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> CurrentUser {
        match self.user.read() {
            Ok(guard) => match guard.as_deref() {
                Some(id) => CurrentUser::signed_in(id),
                None => CurrentUser::anonymous(),
            },
            Err(_) => CurrentUser::anonymous(),
        }
    }

    fn sign_in(&self, id: &str) -> Result<CurrentUser> {
        let id = id.trim();
        if id.is_empty() {
            anyhow::bail!("user id must not be empty");
        }
        if let Some(path) = self.path.as_deref() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            let body = serde_json::to_string_pretty(&SessionFile {
                user_id: id.to_string(),
            })?;
            std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
        }
        let mut guard = self
            .user
            .write()
            .map_err(|_| anyhow::anyhow!("identity lock poisoned"))?;
        *guard = Some(id.to_string());
        tracing::info!(user = id, "signed in");
        Ok(CurrentUser::signed_in(id))
    }

    fn sign_out(&self) -> Result<()> {
        if let Some(path) = self.path.as_deref() {
            if path.exists() {
                std::fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
            }
        }
        let mut guard = self
            .user
            .write()
            .map_err(|_| anyhow::anyhow!("identity lock poisoned"))?;
        *guard = None;
        tracing::info!("signed out");
        Ok(())
    }
}
