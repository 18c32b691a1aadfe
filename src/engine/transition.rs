//! Transition guards: whether an action may fire from an instance's
//! current state.

use crate::core::{Action, WorkflowDefinition};
use crate::engine::error::EngineError;

/// Reasons an existing action may not fire.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("action disabled: '{action}'")]
    ActionDisabled { action: String },

    #[error("invalid transition: action '{action}' cannot fire from state '{current}'")]
    NotPermitted { action: String, current: String },

    #[error("final state: no action may fire from '{state}'")]
    FinalState { state: String },
}

/// Check an action against the instance's current state (pure).
///
/// Checks run in order: enabled, source membership, then finality of the
/// current state. A final state blocks every action, even one that lists it
/// as a source.
pub(crate) fn check_guard(
    definition: &WorkflowDefinition,
    current_state: &str,
    action: &Action,
) -> Result<(), TransitionError> {
    if !action.enabled {
        return Err(TransitionError::ActionDisabled {
            action: action.id.clone(),
        });
    }

    if !action.can_fire_from(current_state) {
        return Err(TransitionError::NotPermitted {
            action: action.id.clone(),
            current: current_state.to_string(),
        });
    }

    if definition
        .state(current_state)
        .is_some_and(|state| state.is_final)
    {
        return Err(TransitionError::FinalState {
            state: current_state.to_string(),
        });
    }

    Ok(())
}

/// Find `action_id` in the definition and check that it may fire.
pub(crate) fn resolve_action<'d>(
    definition: &'d WorkflowDefinition,
    current_state: &str,
    action_id: &str,
) -> Result<&'d Action, EngineError> {
    let action = definition
        .action(action_id)
        .ok_or_else(|| EngineError::ActionNotFound {
            definition: definition.id.clone(),
            action: action_id.to_string(),
        })?;

    check_guard(definition, current_state, action)?;
    Ok(action)
}
