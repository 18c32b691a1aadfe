//! Engine error type and its classification.

use crate::engine::transition::TransitionError;
use crate::store::StoreError;
use crate::validation::DefinitionError;
use thiserror::Error;

/// Coarse classification of an [`EngineError`], for callers that map
/// failures onto transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced definition, instance or action does not exist
    NotFound,
    /// An id that must be unique is already taken
    Conflict,
    /// A definition breaks a structural rule
    InvalidDefinition,
    /// An action may not fire from the instance's current state
    InvalidTransition,
    /// An item handed to a store has no usable identifier
    InvalidItem,
}

/// Errors returned by [`WorkflowEngine`](crate::engine::WorkflowEngine)
/// operations. Every one is recoverable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("definition not found: '{0}'")]
    DefinitionNotFound(String),

    #[error("instance not found: '{0}'")]
    InstanceNotFound(String),

    #[error("action not found: '{action}' in definition '{definition}'")]
    ActionNotFound { definition: String, action: String },

    #[error("definition already exists: '{0}'")]
    DefinitionExists(String),

    #[error("state id already exists: '{0}'")]
    StateExists(String),

    #[error("action id already exists: '{0}'")]
    ActionExists(String),

    #[error("initial state already exists: '{existing}'")]
    InitialStateExists { existing: String },

    #[error("no initial state: definition '{0}'")]
    NoInitialState(String),

    #[error(transparent)]
    InvalidDefinition(#[from] DefinitionError),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DefinitionNotFound(_)
            | Self::InstanceNotFound(_)
            | Self::ActionNotFound { .. } => ErrorKind::NotFound,
            Self::DefinitionExists(_)
            | Self::StateExists(_)
            | Self::ActionExists(_)
            | Self::InitialStateExists { .. }
            | Self::Store(StoreError::Occupied { .. }) => ErrorKind::Conflict,
            Self::NoInitialState(_) | Self::InvalidDefinition(_) => ErrorKind::InvalidDefinition,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::Store(StoreError::InvalidItem { .. }) => ErrorKind::InvalidItem,
        }
    }
}
