#![allow(clippy::result_large_err)]

use super::{EngineRequest, TransformEngine};
use crate::core::config::EngineConfig;
use crate::core::error::AppError;
use crate::core::resource::{render_yaml, Node};
use crate::core::types::ErrorCategory;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

/// Runs an external program as the engine.
///
/// The request is written to stdin as one YAML document with the keys
/// `name`, `source`, `functionConfig` and `items`. The program writes the
/// resulting objects to stdout as a YAML document stream.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CommandEngine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandEngine {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, AppError> {
        let (program, args) = config.command.split_first().ok_or_else(|| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                "engine.command must not be empty",
            )
        })?;
        let mut engine = CommandEngine::new(program.clone(), args.iter().cloned());
        engine.env = config.env.clone();
        Ok(engine)
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    fn failure(&self, message: impl Into<String>) -> AppError {
        AppError::new(ErrorCategory::EngineFailure, message).with_context("command", &self.program)
    }
}

impl TransformEngine for CommandEngine {
    fn name(&self) -> &'static str {
        "command"
    }

    fn transform(&self, request: EngineRequest) -> Result<Vec<Node>, AppError> {
        let input = render_yaml(&request).map_err(|e| {
            self.failure(format!("failed to encode engine request: {}", e))
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("engine stdin is not available"))?;

        // Feed stdin while the child's stdout is drained so large forests do
        // not fill both pipes.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = match output {
            (_, Err(e)) => {
                return Err(self.failure(format!("failed to wait for {}: {}", self.program, e)))
            }
            (Err(_), _) => return Err(self.failure("engine stdin writer panicked")),
            (Ok(write_result), Ok(output)) => {
                if let Err(e) = write_result {
                    // A program that exits early closes stdin; its status tells the story.
                    tracing::debug!(error = %e, "engine closed stdin before reading the request");
                }
                output
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                strip_final_newline(&stderr).to_string()
            };
            let mut error = self.failure(message);
            if let Some(code) = output.status.code() {
                error.add_context("exit_code", &code.to_string());
            }
            return Err(error);
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| self.failure(format!("engine output is not UTF-8: {}", e)))?;
        parse_stream(&stdout).map_err(|e| self.failure(format!("invalid engine output: {}", e)))
    }
}

fn strip_final_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Split a YAML document stream into trees, skipping empty documents.
fn parse_stream(text: &str) -> Result<Vec<Node>, serde_yaml::Error> {
    let mut nodes = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if !value.is_null() {
            nodes.push(Node::from_value(value));
        }
    }
    Ok(nodes)
}
