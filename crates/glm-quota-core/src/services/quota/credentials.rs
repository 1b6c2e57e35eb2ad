//! Credential discovery
//!
//! Resolves the API base URL and auth token with the following priority:
//!
//! 1. **Environment** - `ANTHROPIC_BASE_URL` / `ANTHROPIC_AUTH_TOKEN`
//! 2. **Settings file** - the `env` object of `~/.claude/settings.json`
//!
//! Each value is taken from the first source that has it. A missing base URL
//! falls back to the Zhipu production endpoint; a missing token means no
//! credentials at all.
//!
//! Reading the settings file is best effort: a missing, unreadable or
//! malformed file is treated the same as an absent one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Environment variable holding the auth token
pub const AUTH_TOKEN_ENV: &str = "ANTHROPIC_AUTH_TOKEN";

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/anthropic";

// ============================================================================
// Settings File Types
// ============================================================================

/// Settings file structure (~/.claude/settings.json)
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    env: Option<SettingsEnv>,
}

/// The `env` object inside the settings file
#[derive(Debug, Default, Deserialize)]
pub struct SettingsEnv {
    #[serde(rename = "ANTHROPIC_BASE_URL")]
    pub base_url: Option<String>,

    #[serde(rename = "ANTHROPIC_AUTH_TOKEN")]
    pub auth_token: Option<String>,
}

/// Read the `env` object of a settings file
pub fn read_settings(path: &Path) -> Result<SettingsEnv> {
    let content = std::fs::read_to_string(path)?;
    let settings: SettingsFile = serde_json::from_str(&content)?;
    Ok(settings.env.unwrap_or_default())
}

// ============================================================================
// Resolved Values
// ============================================================================

/// Credentials needed to call the usage monitor API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub auth_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("auth_token", &"****")
            .finish()
    }
}

/// Raw lookup result before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
}

impl ResolvedSettings {
    /// Both the base URL and the token are present
    pub fn is_complete(&self) -> bool {
        self.base_url.is_some() && self.auth_token.is_some()
    }
}

// ============================================================================
// CredentialResolver
// ============================================================================

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves credentials from the environment and the settings file
#[derive(Clone)]
pub struct CredentialResolver {
    /// Path to the settings file (fallback source)
    settings_path: PathBuf,

    /// Environment reader, replaceable for tests
    env_lookup: EnvLookup,
}

impl CredentialResolver {
    /// Create a resolver reading the process environment and the default settings file
    pub fn new() -> Self {
        Self::with_settings_path(Self::default_settings_path())
    }

    /// Create a resolver with a custom settings file path
    pub fn with_settings_path(settings_path: PathBuf) -> Self {
        Self {
            settings_path,
            env_lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replace the environment reader
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Arc::new(lookup);
        self
    }

    /// Get the default settings path
    pub fn default_settings_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude")
            .join("settings.json")
    }

    /// Path of the settings file consulted by this resolver
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn env_var(&self, name: &str) -> Option<String> {
        (self.env_lookup)(name).filter(|v| !v.is_empty())
    }

    /// Look up the base URL and token without applying defaults
    pub fn lookup(&self) -> ResolvedSettings {
        let mut resolved = ResolvedSettings {
            base_url: self.env_var(BASE_URL_ENV),
            auth_token: self.env_var(AUTH_TOKEN_ENV),
        };

        if resolved.is_complete() {
            return resolved;
        }

        match read_settings(&self.settings_path) {
            Ok(env) => {
                if resolved.auth_token.is_none() {
                    resolved.auth_token = env.auth_token.filter(|v| !v.is_empty());
                }
                if resolved.base_url.is_none() {
                    resolved.base_url = env.base_url.filter(|v| !v.is_empty());
                }
            }
            Err(e) => {
                log::debug!(
                    "[glm:credentials] Settings file {:?} not usable: {}",
                    self.settings_path,
                    e
                );
            }
        }

        resolved
    }

    /// Resolve credentials, or `None` when no token is configured
    pub fn resolve(&self) -> Option<Credentials> {
        let resolved = self.lookup();

        let auth_token = match resolved.auth_token {
            Some(token) => token,
            None => {
                log::debug!("[glm:credentials] No auth token found");
                return None;
            }
        };

        let base_url = resolved.base_url.unwrap_or_else(|| {
            log::debug!(
                "[glm:credentials] No base URL configured, using {}",
                DEFAULT_BASE_URL
            );
            DEFAULT_BASE_URL.to_string()
        });

        Some(Credentials {
            base_url,
            auth_token,
        })
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
