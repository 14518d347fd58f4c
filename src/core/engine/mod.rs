#![allow(clippy::result_large_err)]

//! The boundary to the KCL evaluation engine.

use crate::core::config::{EngineConfig, EngineKind};
use crate::core::error::AppError;
use crate::core::resource::Node;
use serde::Serialize;

pub mod command;
pub mod passthrough;

pub use command::CommandEngine;
pub use passthrough::PassthroughEngine;

/// Everything the engine needs for one evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRequest {
    /// Logical run name.
    pub name: String,
    /// Program text; transported, never interpreted here.
    pub source: String,
    /// The parsed function config, passed alongside the resolved descriptor.
    pub function_config: Node,
    /// Parsed input items, in caller order.
    pub items: Vec<Node>,
}

/// Trait implemented by each engine driver.
///
/// A call is opaque and must not be retried; the returned forest replaces the
/// input items, so the engine decides count and ordering.
pub trait TransformEngine {
    /// Driver name, matches the `engine.kind` config value.
    fn name(&self) -> &'static str;

    fn transform(&self, request: EngineRequest) -> Result<Vec<Node>, AppError>;
}

/// Build the engine driver selected by the runtime config.
pub fn build(config: &EngineConfig) -> Result<Box<dyn TransformEngine>, AppError> {
    let engine: Box<dyn TransformEngine> = match config.kind {
        EngineKind::Passthrough => Box::new(PassthroughEngine),
        EngineKind::Command => Box::new(CommandEngine::from_config(config)?),
    };
    Ok(engine)
}
