//! Build errors for definition and action builders.

use crate::validation::DefinitionError;
use thiserror::Error;

/// Errors that can occur when building definitions and actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Action '{action}' has no source state. Call .from(state) before .build()")]
    MissingSourceState { action: String },

    #[error("Action '{action}' has no target state. Call .to(state) before .build()")]
    MissingTargetState { action: String },

    #[error("Definition is invalid: {0}")]
    InvalidDefinition(#[from] DefinitionError),
}
