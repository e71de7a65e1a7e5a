//! Binding configuration.
//!
//! Looked up in order: `mybind.toml` in the working directory, then
//! `<config dir>/mybind/config.toml`. `MYBIND_WIDTH_POLICY` overrides the
//! width policy from either file.
//!
//! ```toml
//! width_policy = "native"
//! hex_uppercase = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::binder::{Binder, WidthPolicy};
use crate::error::{BindError, BindResult};

pub const CONFIG_FILE: &str = "mybind.toml";
pub const WIDTH_POLICY_ENV: &str = "MYBIND_WIDTH_POLICY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindConfig {
    /// Wire width for `isize`, `usize` and `Real`.
    pub width_policy: WidthPolicy,

    /// Print hex dumps in upper case (CLI only).
    pub hex_uppercase: bool,
}

impl BindConfig {
    pub fn from_toml_str(content: &str) -> BindResult<Self> {
        toml::from_str(content).map_err(|e| BindError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> BindResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from the first config file found, applying the environment override.
    pub fn load() -> BindResult<Self> {
        let mut config = match Self::locate() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        if let Ok(value) = std::env::var(WIDTH_POLICY_ENV) {
            config.width_policy = value
                .parse()
                .map_err(|e: String| BindError::Config(format!("{}: {}", WIDTH_POLICY_ENV, e)))?;
            tracing::debug!("Width policy overridden by {}", WIDTH_POLICY_ENV);
        }
        Ok(config)
    }

    fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("mybind").join("config.toml"))
            .filter(|path| path.exists())
    }

    pub fn binder(&self) -> Binder {
        Binder::new(self.width_policy)
    }
}
