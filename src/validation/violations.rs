//! Structural violations of a workflow definition.

use thiserror::Error;

/// A definition failed one of the structural rules.
///
/// Variants are listed in the order the rules are checked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("must have at least two states (found {found})")]
    TooFewStates { found: usize },

    #[error("must have at least one action")]
    NoActions,

    #[error("must have exactly one initial state (found {found})")]
    InitialStateCount { found: usize },

    #[error("duplicate state ids: '{id}'")]
    DuplicateStateId { id: String },

    #[error("action refers to unknown state: action '{action}' references '{state}'")]
    UnknownStateReference { action: String, state: String },

    #[error("state id must not be empty")]
    EmptyStateId,

    #[error("duplicate action ids: '{id}'")]
    DuplicateActionId { id: String },

    #[error("action has no source states: '{action}'")]
    NoSourceStates { action: String },
}
