//! The individual structural rules, in checking order.

use crate::core::WorkflowDefinition;
use crate::validation::violations::DefinitionError;
use std::collections::HashSet;

/// A single structural rule.
pub(crate) type Rule = fn(&WorkflowDefinition) -> Result<(), DefinitionError>;

/// Every rule, in the order failures are reported.
pub(crate) const RULES: [Rule; 8] = [
    at_least_two_states,
    at_least_one_action,
    exactly_one_initial_state,
    unique_state_ids,
    known_state_references,
    non_empty_state_ids,
    unique_action_ids,
    actions_have_sources,
];

fn at_least_two_states(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    if definition.states.len() < 2 {
        return Err(DefinitionError::TooFewStates {
            found: definition.states.len(),
        });
    }
    Ok(())
}

fn at_least_one_action(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    if definition.actions.is_empty() {
        return Err(DefinitionError::NoActions);
    }
    Ok(())
}

fn exactly_one_initial_state(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    let found = definition.states.iter().filter(|s| s.is_initial).count();
    if found != 1 {
        return Err(DefinitionError::InitialStateCount { found });
    }
    Ok(())
}

fn unique_state_ids(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for state in &definition.states {
        if !seen.insert(state.id.as_str()) {
            return Err(DefinitionError::DuplicateStateId {
                id: state.id.clone(),
            });
        }
    }
    Ok(())
}

fn known_state_references(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    let known: HashSet<&str> = definition.states.iter().map(|s| s.id.as_str()).collect();

    for action in &definition.actions {
        // target first, then sources in listed order
        let referenced = std::iter::once(&action.to_state).chain(action.from_states.iter());
        for state in referenced {
            if !known.contains(state.as_str()) {
                return Err(DefinitionError::UnknownStateReference {
                    action: action.id.clone(),
                    state: state.clone(),
                });
            }
        }
    }
    Ok(())
}

fn non_empty_state_ids(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    if definition.states.iter().any(|s| s.id.is_empty()) {
        return Err(DefinitionError::EmptyStateId);
    }
    Ok(())
}

fn unique_action_ids(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for action in &definition.actions {
        if !seen.insert(action.id.as_str()) {
            return Err(DefinitionError::DuplicateActionId {
                id: action.id.clone(),
            });
        }
    }
    Ok(())
}

fn actions_have_sources(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    if let Some(action) = definition.actions.iter().find(|a| a.from_states.is_empty()) {
        return Err(DefinitionError::NoSourceStates {
            action: action.id.clone(),
        });
    }
    Ok(())
}
