#![allow(clippy::result_large_err)]

use super::{EngineRequest, TransformEngine};
use crate::core::error::AppError;
use crate::core::resource::Node;

pub struct PassthroughEngine;

impl TransformEngine for PassthroughEngine {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn transform(&self, request: EngineRequest) -> Result<Vec<Node>, AppError> {
        tracing::debug!(name = %request.name, "passthrough engine returns items unchanged");
        Ok(request.items)
    }
}
