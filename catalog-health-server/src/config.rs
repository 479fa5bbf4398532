//! Environment-driven server configuration.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use catalog_health_core::{CatalogHealthError, FieldSpecTable};
use log::info;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:3000,http://localhost:3000";

/// Configuration errors surfaced at startup.
#[derive(Debug)]
pub enum ConfigError {
    /// `CATALOG_HEALTH_PORT` was not a u16.
    InvalidPort(String),
    /// A field specification file could not be read.
    SpecRead {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A field specification file was not a valid table.
    SpecInvalid {
        /// File that failed.
        path: PathBuf,
        /// Parse or validation error.
        source: CatalogHealthError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort(value) => {
                write!(f, "CATALOG_HEALTH_PORT must be a u16 number, got {value:?}")
            }
            Self::SpecRead { path, source } => {
                write!(f, "failed to read field spec {}: {source}", path.display())
            }
            Self::SpecInvalid { path, source } => {
                write!(f, "invalid field spec {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPort(_) => None,
            Self::SpecRead { source, .. } => Some(source),
            Self::SpecInvalid { source, .. } => Some(source),
        }
    }
}

/// Server settings read from `CATALOG_HEALTH_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// Optional data model field table file.
    pub model_spec: Option<PathBuf>,
    /// Optional data product field table file.
    pub product_spec: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read("CATALOG_HEALTH_PORT") {
            Some(value) => u16::from_str(&value).map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };
        let origins = read("CATALOG_HEALTH_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.into());

        Ok(Self {
            host: read("CATALOG_HEALTH_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            ui_origins: origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            model_spec: read("CATALOG_HEALTH_MODEL_SPEC").map(PathBuf::from),
            product_spec: read("CATALOG_HEALTH_PRODUCT_SPEC").map(PathBuf::from),
        })
    }

    /// Load the model and product tables, falling back to the built-in ones.
    pub fn load_specs(&self) -> Result<(FieldSpecTable, FieldSpecTable), ConfigError> {
        let model = match &self.model_spec {
            Some(path) => load_spec(path)?,
            None => FieldSpecTable::data_model(),
        };
        let product = match &self.product_spec {
            Some(path) => load_spec(path)?,
            None => FieldSpecTable::data_product(),
        };
        Ok((model, product))
    }
}

fn load_spec(path: &Path) -> Result<FieldSpecTable, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::SpecRead {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = FieldSpecTable::from_json_str(&raw).map_err(|source| ConfigError::SpecInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "loaded {} field spec entries from {}",
        spec.len(),
        path.display()
    );
    Ok(spec)
}
