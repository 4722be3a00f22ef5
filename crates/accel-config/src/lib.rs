//! accel-config: vehicle configuration schema, validation and file format.

pub mod parameter;
pub mod schema;
pub mod validate;

pub use parameter::Parameter;
pub use schema::*;
pub use validate::validate_config;

use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Configuration errors: {}", violations.join(", "))]
    Validation { violations: Vec<String> },

    #[error("Unknown parameter: {path}")]
    UnknownParameter { path: String },

    #[error("Unsupported config file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> ConfigResult<Format> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Ok(Format::Yaml),
        "json" => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat { extension }),
    }
}

/// Parse a configuration from text and validate it.
pub fn parse_yaml(content: &str) -> ConfigResult<VehicleConfig> {
    let config: VehicleConfig = serde_yaml::from_str(content)?;
    ensure_valid(&config)?;
    Ok(config)
}

pub fn parse_json(content: &str) -> ConfigResult<VehicleConfig> {
    let config: VehicleConfig = serde_json::from_str(content)?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Load a configuration file, choosing the format by extension.
pub fn load_config(path: &Path) -> ConfigResult<VehicleConfig> {
    let format = format_for(path)?;
    let content = std::fs::read_to_string(path)?;
    match format {
        Format::Yaml => parse_yaml(&content),
        Format::Json => parse_json(&content),
    }
}

pub fn save_config(path: &Path, config: &VehicleConfig) -> ConfigResult<()> {
    ensure_valid(config)?;
    let content = match format_for(path)? {
        Format::Yaml => serde_yaml::to_string(config)?,
        Format::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

/// Turn a non-empty violation list into an error.
pub fn ensure_valid(config: &VehicleConfig) -> ConfigResult<()> {
    let violations = validate_config(config);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { violations })
    }
}
