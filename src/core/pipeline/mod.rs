#![allow(clippy::result_large_err)] // Pipeline returns AppError for structured diagnostics.

//! Parse, transform and re-emit: the orchestration around one engine call.

use crate::core::config::{self, KclRun};
use crate::core::engine::{EngineRequest, TransformEngine};
use crate::core::error::AppError;
use crate::core::resource::{CodecError, KubeObject, Node, ResourceList};
use crate::core::types::ErrorCategory;

/// Runs a resolved [`KclRun`] through an engine.
pub struct TransformPipeline<'a> {
    engine: &'a dyn TransformEngine,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(engine: &'a dyn TransformEngine) -> Self {
        TransformPipeline { engine }
    }

    /// Transform `items` with `run`.
    ///
    /// Every stage fails fast: the first unparsable input, the engine error or
    /// the first output that cannot be re-materialized ends the call with no
    /// partial result. The output follows the engine's count and order.
    pub fn run<S: AsRef<str>>(
        &self,
        run: &KclRun,
        function_config: &str,
        items: &[S],
    ) -> Result<Vec<KubeObject>, AppError> {
        let function_config = Node::parse(function_config).map_err(|e| {
            parse_error("functionConfig", e).with_context("document", "functionConfig")
        })?;

        let nodes = items
            .iter()
            .enumerate()
            .map(|(index, text)| {
                Node::parse(text.as_ref()).map_err(|e| {
                    parse_error(&format!("item {}", index), e)
                        .with_context("item", index.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            name = %run.name,
            engine = self.engine.name(),
            items = nodes.len(),
            "invoking engine"
        );
        let transformed = self.engine.transform(EngineRequest {
            name: run.name.clone(),
            source: run.source.clone(),
            function_config,
            items: nodes,
        })?;
        tracing::info!(name = %run.name, items = transformed.len(), "engine finished");

        transformed
            .iter()
            .enumerate()
            .map(|(index, node)| rematerialize(index, node))
            .collect()
    }
}

fn parse_error(what: &str, err: CodecError) -> AppError {
    AppError::with_source(
        ErrorCategory::DocumentParseFailure,
        format!("failed to parse {}: {}", what, err),
        err,
    )
}

fn rematerialize(index: usize, node: &Node) -> Result<KubeObject, AppError> {
    node.to_yaml_string()
        .and_then(|text| KubeObject::parse(&text))
        .map_err(|e| {
            AppError::with_source(
                ErrorCategory::ReserializeFailure,
                format!("failed to convert engine output {}: {}", index, e),
                e,
            )
            .with_context("output", index.to_string())
        })
}

/// Resolve the function config of `list` and transform its items in place.
///
/// `list.items` is only replaced when every stage succeeds.
pub fn process(list: &mut ResourceList, engine: &dyn TransformEngine) -> Result<(), AppError> {
    let run = config::resolve(list.function_config.as_ref())?;

    let function_config = match list.function_config.as_ref() {
        Some(object) => render(object)?,
        None => String::new(),
    };
    let items = list
        .items
        .iter()
        .map(render)
        .collect::<Result<Vec<_>, _>>()?;

    let transformed = TransformPipeline::new(engine).run(&run, &function_config, &items)?;
    list.items = transformed;
    Ok(())
}

fn render(object: &KubeObject) -> Result<String, AppError> {
    object.to_yaml_string().map_err(|e| {
        AppError::with_source(
            ErrorCategory::DocumentParseFailure,
            format!("failed to render {} {}: {}", object.kind(), object.name(), e),
            e,
        )
    })
}
