//! Warden configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `WARDEN_*` environment variables.

use crate::errors::{Result, WardenError};
use crate::identity::DEFAULT_CONTROLLER_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default credential header.
pub const DEFAULT_AUTHORIZE_HEADER: &str = "Authorization";

const ENV_PREFIX: &str = "WARDEN_";

/// Order of nodes in a compiled catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrder {
    /// Registry declaration order
    Discovery,
    /// Sorted by permission identity
    #[default]
    Identity,
}

impl FromStr for CatalogOrder {
    type Err = WardenError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "discovery" => Ok(Self::Discovery),
            "identity" => Ok(Self::Identity),
            other => Err(WardenError::invalid(format!(
                "unknown catalog order '{other}', expected 'discovery' or 'identity'"
            ))),
        }
    }
}

/// Gate and catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Header carrying the credential; a query parameter of the same name takes precedence
    pub authorize_header: String,
    /// Initial value of the global service switch
    pub service_running: bool,
    /// Suffix stripped from owner type names when deriving identities
    pub controller_suffix: String,
    /// Order of nodes in compiled catalogs
    pub catalog_order: CatalogOrder,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            authorize_header: DEFAULT_AUTHORIZE_HEADER.to_string(),
            service_running: true,
            controller_suffix: DEFAULT_CONTROLLER_SUFFIX.to_string(),
            catalog_order: CatalogOrder::default(),
        }
    }
}

impl WardenConfig {
    /// Parse and validate TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WardenError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Override values from `WARDEN_*` environment variables
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Override values from `(name, value)` pairs using the `WARDEN_` prefix
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "AUTHORIZE_HEADER" => self.authorize_header = value,
                "SERVICE_RUNNING" => self.service_running = parse_bool(&key, &value)?,
                "CONTROLLER_SUFFIX" => self.controller_suffix = value,
                "CATALOG_ORDER" => self.catalog_order = value.parse()?,
                _ => {}
            }
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.authorize_header.is_empty() {
            return Err(WardenError::invalid("authorize_header must not be empty"));
        }
        if !self.authorize_header.bytes().all(is_header_token_byte) {
            return Err(WardenError::invalid(format!(
                "authorize_header '{}' is not a valid header name",
                self.authorize_header
            )));
        }
        if self.controller_suffix.trim().is_empty() {
            return Err(WardenError::invalid("controller_suffix must not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WardenError::invalid(format!(
            "{key} expects a boolean, got '{value}'"
        ))),
    }
}

// RFC 9110 token characters
fn is_header_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}
