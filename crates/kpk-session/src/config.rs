//! Session configuration.
//!
//! Loaded from environment variables with defaults. The CLI overrides
//! individual fields from its flags after loading.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use kpk_codec::{CodecError, DuplicateSkuPolicy};

/// Default directory for packer state.
pub const DEFAULT_STATE_DIR: &str = ".kpk";

/// Which remote services a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// No remote backend: any email signs in and audit sync is a no-op.
    #[default]
    Offline,
}

impl Backend {
    /// Configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offline" => Ok(Self::Offline),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Configuration for a packing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory holding `completed_orders.json`.
    pub state_dir: PathBuf,
    /// How repeated SKUs on one invoice are combined.
    pub duplicate_skus: DuplicateSkuPolicy,
    /// Remote services to use.
    pub backend: Backend,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            duplicate_skus: DuplicateSkuPolicy::default(),
            backend: Backend::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KPK_STATE_DIR` (default: `.kpk`)
    /// - `KPK_DUPLICATE_SKUS`: `last-wins` or `reject` (default: `last-wins`)
    /// - `KPK_BACKEND`: `offline` (default: `offline`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let state_dir = lookup("KPK_STATE_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.state_dir);
        let duplicate_skus = match lookup("KPK_DUPLICATE_SKUS") {
            Some(raw) => raw.parse().map_err(ConfigError::DuplicateSkus)?,
            None => defaults.duplicate_skus,
        };
        let backend = match lookup("KPK_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.backend,
        };
        Ok(Self {
            state_dir,
            duplicate_skus,
            backend,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown backend {0:?} (expected \"offline\")")]
    UnknownBackend(String),
    #[error("invalid KPK_DUPLICATE_SKUS: {0}")]
    DuplicateSkus(#[source] CodecError),
}
