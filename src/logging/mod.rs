pub mod config;
pub mod layers;

pub use config::LoggingConfig;
pub use layers::console::{ConsoleOutput, LogFormat};

use crate::Result;
use anyhow::{anyhow, Context};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Console output
/// always goes to stderr because stdout carries the ResourceList. Errors when
/// invoked more than once per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    config.validate()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("failed to configure tracing level")?;

    let console = layers::console::console_layer::<Registry>(config.console_output, config.format);
    tracing_subscriber::registry()
        .with(console)
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
