use crate::{
    cli::args::{ResolveArgs, RunArgs},
    cli::Outcome,
    core::{
        config::{self, EngineKind, RuntimeConfig},
        engine,
        error::AppError,
        pipeline,
        resource::{FnResult, ResourceList},
        types::ErrorCategory,
    },
    Result,
};
use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use uuid::Uuid;

const PASSTHROUGH_WARNING: &str = "no engine command configured; items passed through unchanged";

/// Transform the ResourceList. Function failures are written to `results`
/// and reported as [`Outcome::FunctionFailed`]; only I/O and envelope
/// errors return `Err`.
pub fn run(args: RunArgs, config: &RuntimeConfig) -> Result<Outcome> {
    let input = read_input(args.input.as_deref())?;
    let mut list = parse_list(&input)?;
    let engine = engine::build(&config.engine)?;

    let span = tracing::info_span!(
        "kcl_run",
        invocation = %Uuid::new_v4(),
        engine = engine.name()
    );
    let _entered = span.enter();

    let outcome = match pipeline::process(&mut list, engine.as_ref()) {
        Ok(()) => {
            tracing::info!(items = list.items.len(), "transformation succeeded");
            if config.engine.kind == EngineKind::Passthrough {
                tracing::warn!("{}", PASSTHROUGH_WARNING);
                list.results.push(FnResult::warning(PASSTHROUGH_WARNING));
            }
            Outcome::Success
        }
        Err(err) => {
            tracing::error!(code = %err.code, category = %err.category, "{}", err.message);
            list.results.push(err.to_result());
            Outcome::FunctionFailed
        }
    };

    let output = list
        .to_yaml_string()
        .context("failed to serialize ResourceList")?;
    write_output(args.output.as_deref(), &output)?;
    Ok(outcome)
}

/// Print the resolved descriptor as YAML.
pub fn resolve(args: ResolveArgs) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let list = parse_list(&input)?;
    let run = config::resolve(list.function_config.as_ref())?;
    let text = serde_yaml::to_string(&run).context("failed to serialize KCLRun")?;
    write_output(None, &text)
}

fn parse_list(input: &str) -> Result<ResourceList> {
    ResourceList::parse(input).map_err(|e| {
        AppError::with_source(
            ErrorCategory::DocumentParseFailure,
            format!("failed to parse ResourceList: {}", e),
            e,
        )
        .into()
    })
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read ResourceList from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write ResourceList to stdout")
        }
    }
}
