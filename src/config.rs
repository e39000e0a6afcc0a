//! Configuration management for dracut-module.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::command::DEFAULT_DRACUT_BIN;
use crate::process;

/// Dotenv file read from the working directory only, never from its parents.
pub const DOTENV_FILE: &str = ".env";
/// Environment variable naming the dracut program.
pub const DRACUT_BIN_ENV: &str = "DRACUT_BIN";
/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DRACUT_MODULE_LOG";
/// Log filter used when nothing is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// dracut-module configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program to execute (default: dracut from PATH)
    pub dracut_bin: String,
    /// tracing filter directive (default: warn)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dracut_bin: DEFAULT_DRACUT_BIN.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from ./.env (if present) and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration from `base_dir/.env` and the process environment.
    ///
    /// The file is not exported into the environment; environment variables
    /// take precedence over it. A missing file is fine, an unreadable or
    /// malformed one is an error.
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let env_path = base_dir.join(DOTENV_FILE);
        let mut vars = Vec::new();

        match dotenvy::from_path_iter(&env_path) {
            Ok(entries) => {
                for entry in entries {
                    let entry =
                        entry.with_context(|| format!("Failed to parse {}", env_path.display()))?;
                    vars.push(entry);
                }
            }
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", env_path.display()))
            }
        }

        vars.extend(std::env::vars());
        Ok(Self::from_vars(vars))
    }

    /// Build configuration from key/value pairs. Empty values count as unset.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env_vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        let defaults = Self::default();

        let dracut_bin = env_vars
            .get(DRACUT_BIN_ENV)
            .cloned()
            .unwrap_or(defaults.dracut_bin);

        let log_filter = env_vars
            .get(LOG_ENV)
            .cloned()
            .unwrap_or(defaults.log_filter);

        Self {
            dracut_bin,
            log_filter,
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  {}: {}", DRACUT_BIN_ENV, self.dracut_bin);
        println!("  {}: {}", LOG_ENV, self.log_filter);
        match process::which(&self.dracut_bin) {
            Some(path) => println!("  dracut: FOUND ({})", path.display()),
            None => println!("  dracut: NOT FOUND (install dracut or set {})", DRACUT_BIN_ENV),
        }
    }
}
