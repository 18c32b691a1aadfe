//! Builder for constructing actions.

use crate::builder::error::BuildError;
use crate::core::Action;

/// Builder for actions with a fluent API.
pub struct ActionBuilder {
    id: String,
    name: Option<String>,
    from: Vec<String>,
    to: Option<String>,
    description: String,
    enabled: bool,
}

impl ActionBuilder {
    /// Start an action with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            from: Vec::new(),
            to: None,
            description: String::new(),
            enabled: true,
        }
    }

    /// Add a source state (at least one required).
    pub fn from(mut self, state_id: impl Into<String>) -> Self {
        let state_id = state_id.into();
        if !self.from.contains(&state_id) {
            self.from.push(state_id);
        }
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state_id: impl Into<String>) -> Self {
        self.to = Some(state_id.into());
        self
    }

    /// Set the display name. Defaults to the id.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Build the action.
    pub fn build(self) -> Result<Action, BuildError> {
        if self.from.is_empty() {
            return Err(BuildError::MissingSourceState { action: self.id });
        }
        let Some(to) = self.to else {
            return Err(BuildError::MissingTargetState { action: self.id });
        };

        Ok(Action {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            enabled: self.enabled,
            from_states: self.from,
            to_state: to,
            description: self.description,
        })
    }
}
