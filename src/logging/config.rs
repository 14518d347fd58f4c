use crate::logging::layers::console::{ConsoleOutput, LogFormat};
use crate::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

const DEFAULT_LEVEL: &str = "info";

/// The `[logging]` section of the runtime config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub console_output: ConsoleOutput,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            console_output: ConsoleOutput::default(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        Directive::from_str(&self.level)
            .map_err(|_| anyhow!("logging.level must be a valid tracing directive"))?;
        Ok(())
    }
}
