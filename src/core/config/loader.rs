#![allow(clippy::result_large_err)]

use super::runtime::{EngineKind, RuntimeConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::logging::LogFormat;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the runtime config file.
pub const CONFIG_PATH_ENV: &str = "KPT_KCL_CONFIG";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the runtime config.
    ///
    /// Precedence: defaults, then the file given explicitly or through
    /// `KPT_KCL_CONFIG`, then environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<RuntimeConfig, AppError> {
        let path = explicit_path.map(Path::to_path_buf).or_else(|| {
            env::var(CONFIG_PATH_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        });

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => RuntimeConfig::default(),
        };

        Self::apply_env_overrides(&mut config)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load config from a specific file. A named file that is missing is an error.
    pub fn load_from_file(path: &Path) -> Result<RuntimeConfig, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
                e,
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })
    }

    /// Environment variables take precedence over config file values.
    fn apply_env_overrides(config: &mut RuntimeConfig) -> Result<(), AppError> {
        if let Ok(kind) = env::var("KPT_KCL_ENGINE") {
            config.engine.kind = kind.parse::<EngineKind>().map_err(invalid_override)?;
        }

        if let Ok(command) = env::var("KPT_KCL_ENGINE_COMMAND") {
            config.engine.command = command.split_whitespace().map(str::to_string).collect();
        }

        if let Ok(level) = env::var("KPT_KCL_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = env::var("KPT_KCL_LOG_FORMAT") {
            config.logging.format = format.parse::<LogFormat>().map_err(invalid_override)?;
        }

        Ok(())
    }

    pub fn validate(config: &RuntimeConfig) -> Result<(), AppError> {
        if config.engine.kind == EngineKind::Command && config.engine.command.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "engine.command is required when engine.kind is command",
            ));
        }

        config.logging.validate().map_err(|e| {
            AppError::new(ErrorCategory::ConfigurationError, e.to_string())
        })?;

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "KPT_KCL_CONFIG - Path to the runtime config file (TOML)",
            "KPT_KCL_ENGINE - Override engine kind (passthrough/command)",
            "KPT_KCL_ENGINE_COMMAND - Override engine command, split on whitespace",
            "KPT_KCL_LOG_LEVEL - Override log level (default: info)",
            "KPT_KCL_LOG_FORMAT - Override log format (text/json)",
            "RUST_LOG - Tracing filter, takes precedence over the log level",
        ]
    }
}

fn invalid_override(message: String) -> AppError {
    AppError::new(ErrorCategory::ConfigurationError, message)
}
