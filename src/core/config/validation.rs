#![allow(clippy::result_large_err)]

use super::{KclRun, DEFAULT_PROGRAM_NAME};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Fill in fields that have a fixed fallback.
    pub fn apply_defaults(run: &mut KclRun) {
        if run.name.is_empty() {
            tracing::debug!(default = DEFAULT_PROGRAM_NAME, "functionConfig has no name");
            run.name = DEFAULT_PROGRAM_NAME.to_string();
        }
    }

    /// Validate the descriptor. Runs after defaulting.
    pub fn validate(run: &KclRun) -> Result<(), AppError> {
        if run.source.is_empty() {
            return Err(AppError::new(
                ErrorCategory::SourceRequired,
                "`source` must not be empty",
            )
            .with_context("name", run.name.as_str()));
        }
        Ok(())
    }
}
