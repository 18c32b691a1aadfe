//! States and actions: the nodes and edges of a workflow definition.
//!
//! Both are plain data. The rules that relate them to each other live in
//! the validator; the rules that fire them live in the engine.

use serde::{Deserialize, Serialize};

fn enabled_by_default() -> bool {
    true
}

/// A named node in a workflow.
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
///
/// let draft = State::new("draft", "Draft").initial();
/// let published = State::new("published", "Published").terminal();
///
/// assert!(draft.is_initial);
/// assert!(published.is_final);
/// assert!(draft.enabled);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Identifier, unique within its definition
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Entry point of the workflow; exactly one per definition
    #[serde(default)]
    pub is_initial: bool,
    /// Terminal state; no action may fire from here
    #[serde(default)]
    pub is_final: bool,
    /// Informational only
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl State {
    /// Create an enabled, non-initial, non-final state.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_initial: false,
            is_final: false,
            enabled: true,
        }
    }

    /// Mark this state as the workflow entry point.
    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Mark this state as final.
    pub fn terminal(mut self) -> Self {
        self.is_final = true;
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
}

/// A named, directed transition rule.
///
/// An action may be invoked from any of its `from_states` and always lands
/// on `to_state`.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Action;
///
/// let submit = Action::new("submit", "Submit for review", "review").from("draft");
///
/// assert!(submit.can_fire_from("draft"));
/// assert!(!submit.can_fire_from("review"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Identifier, unique within its definition
    pub id: String,
    pub name: String,
    /// Disabled actions are rejected by the engine
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Source state ids this action may be invoked from
    #[serde(default)]
    pub from_states: Vec<String>,
    /// Target state id
    pub to_state: String,
    #[serde(default)]
    pub description: String,
}

impl Action {
    /// Create an enabled action targeting `to_state` with no sources yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        to_state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            from_states: Vec::new(),
            to_state: to_state.into(),
            description: String::new(),
        }
    }

    /// Add a source state. Adding the same id twice has no effect.
    pub fn from(mut self, state_id: impl Into<String>) -> Self {
        let state_id = state_id.into();
        if !self.from_states.contains(&state_id) {
            self.from_states.push(state_id);
        }
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

    /// Whether `state_id` is one of this action's source states.
    ///
    /// Only checks membership; enablement and finality are judged by the
    /// engine.
    pub fn can_fire_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_defaults() {
        let state = State::new("s0", "Start");
        assert_eq!(state.id, "s0");
        assert_eq!(state.name, "Start");
        assert!(state.description.is_empty());
        assert!(!state.is_initial);
        assert!(!state.is_final);
        assert!(state.enabled);
    }

    #[test]
    fn state_modifiers_chain() {
        let state = State::new("s0", "Start")
            .initial()
            .describe("entry point")
            .disabled();
        assert!(state.is_initial);
        assert_eq!(state.description, "entry point");
        assert!(!state.enabled);
    }

    #[test]
    fn action_from_ignores_duplicates() {
        let action = Action::new("a1", "Advance", "s1").from("s0").from("s0");
        assert_eq!(action.from_states, vec!["s0".to_string()]);
    }

    #[test]
    fn can_fire_from_checks_membership() {
        let action = Action::new("a1", "Advance", "s2").from("s0").from("s1");
        assert!(action.can_fire_from("s0"));
        assert!(action.can_fire_from("s1"));
        assert!(!action.can_fire_from("s2"));
    }

    #[test]
    fn can_fire_from_ignores_enabled_flag() {
        let action = Action::new("a1", "Advance", "s1").from("s0").disabled();
        assert!(action.can_fire_from("s0"));
    }

    #[test]
    fn state_uses_camel_case_fields() {
        let json = serde_json::to_value(State::new("s0", "Start").initial()).unwrap();
        assert_eq!(json["isInitial"], true);
        assert_eq!(json["isFinal"], false);
    }

    #[test]
    fn enabled_defaults_to_true_when_omitted() {
        let state: State = serde_json::from_str(r#"{"id":"s0","name":"Start"}"#).unwrap();
        assert!(state.enabled);

        let action: Action =
            serde_json::from_str(r#"{"id":"a1","name":"Go","fromStates":["s0"],"toState":"s1"}"#)
                .unwrap();
        assert!(action.enabled);
        assert_eq!(action.from_states, vec!["s0".to_string()]);
    }
}
