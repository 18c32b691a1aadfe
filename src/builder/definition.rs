//! Builder for constructing workflow definitions.

use crate::builder::action::ActionBuilder;
use crate::builder::error::BuildError;
use crate::core::{Action, State, WorkflowDefinition};
use crate::validation::validate;

/// Builder for definitions with a fluent API.
///
/// `build` runs the full validator, so a built definition is accepted by
/// the engine unless its id is already taken.
#[derive(Default)]
pub struct DefinitionBuilder {
    id: String,
    states: Vec<State>,
    actions: Vec<Action>,
}

impl DefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id. Left empty, the engine assigns one on create.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a pre-built action.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an action using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: ActionBuilder) -> Result<Self, BuildError> {
        self.actions.push(builder.build()?);
        Ok(self)
    }

    /// Build and validate the definition.
    pub fn build(self) -> Result<WorkflowDefinition, BuildError> {
        let definition = WorkflowDefinition::new(self.id, self.states, self.actions);
        validate(&definition)?;
        Ok(definition)
    }
}
