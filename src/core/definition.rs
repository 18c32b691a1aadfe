//! Workflow definitions and the instances running them.

use super::history::History;
use super::state::{Action, State};
use crate::store::Keyed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The static description of a workflow: its states and the actions
/// connecting them.
///
/// Constructing a value performs no checks. A definition only becomes
/// authoritative once the engine has validated and stored it.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Action, State, WorkflowDefinition};
///
/// let definition = WorkflowDefinition::new(
///     "doc",
///     vec![
///         State::new("draft", "Draft").initial(),
///         State::new("done", "Done").terminal(),
///     ],
///     vec![Action::new("finish", "Finish", "done").from("draft")],
/// );
///
/// assert_eq!(definition.initial_state().map(|s| s.id.as_str()), Some("draft"));
/// assert!(definition.has_state("done"));
/// assert!(definition.action("finish").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Unique across definitions. Empty means "assign one on create".
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, states: Vec<State>, actions: Vec<Action>) -> Self {
        Self {
            id: id.into(),
            states,
            actions,
        }
    }

    /// Look up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up an action by id.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn has_state(&self, id: &str) -> bool {
        self.state(id).is_some()
    }

    pub fn has_action(&self, id: &str) -> bool {
        self.action(id).is_some()
    }

    /// The first state flagged initial.
    ///
    /// A validated definition has exactly one.
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    /// Actions listing `state_id` among their sources, in definition order.
    pub fn actions_from<'a>(&'a self, state_id: &'a str) -> impl Iterator<Item = &'a Action> {
        self.actions.iter().filter(move |a| a.can_fire_from(state_id))
    }
}

impl Keyed for WorkflowDefinition {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A live execution of one definition.
///
/// `current_state` always names a state of the referenced definition.
/// Only the engine moves it, and every move appends to `history`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: String,
    /// The definition this instance executes
    pub definition_id: String,
    pub current_state: String,
    #[serde(default)]
    pub history: History,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    /// Create an instance sitting in `initial_state` with empty history.
    pub fn new(
        id: impl Into<String>,
        definition_id: impl Into<String>,
        initial_state: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            definition_id: definition_id.into(),
            current_state: initial_state.into(),
            history: History::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the instance currently sits in `state_id`.
    pub fn is_in(&self, state_id: &str) -> bool {
        self.current_state == state_id
    }
}

impl Keyed for WorkflowInstance {
    fn key(&self) -> &str {
        &self.id
    }
}
