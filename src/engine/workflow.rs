//! The workflow engine: definition lifecycle and instance transitions.

use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::config::{ConfigError, EngineConfig, IdFormat};
use crate::core::{Action, HistoryEntry, State, WorkflowDefinition, WorkflowInstance};
use crate::engine::error::EngineError;
use crate::engine::transition::{check_guard, resolve_action};
use crate::store::{InMemoryStore, KeyedStore, StoreError};
use crate::validation::validate;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, trace};

/// Shared handle to the definition and instance stores.
///
/// Cloning is cheap and every clone operates on the same stores, so one
/// engine can be handed to any number of concurrent request handlers.
/// Mutations run inside [`KeyedStore::update`], which holds the key's lock
/// for the whole check-append-validate sequence.
pub struct WorkflowEngine<
    D = InMemoryStore<WorkflowDefinition>,
    I = InMemoryStore<WorkflowInstance>,
> {
    definitions: Arc<D>,
    instances: Arc<I>,
    id_format: IdFormat,
}

impl<D, I> Clone for WorkflowEngine<D, I> {
    fn clone(&self) -> Self {
        Self {
            definitions: Arc::clone(&self.definitions),
            instances: Arc::clone(&self.instances),
            id_format: self.id_format,
        }
    }
}

impl WorkflowEngine {
    /// An engine over fresh in-memory stores with default settings.
    pub fn new() -> Self {
        Self::from_stores(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        )
    }

    /// An engine over fresh in-memory stores sized by `config`.
    pub fn with_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_stores(
            Arc::new(config.build_store()),
            Arc::new(config.build_store()),
        )
        .with_id_format(config.id_format))
    }

    /// Rebuild an engine from a checkpoint.
    ///
    /// The checkpoint is validated in full before anything is loaded.
    pub fn restore(
        config: &EngineConfig,
        checkpoint: Checkpoint,
    ) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;
        let engine = Self::with_config(config)?;

        let loaded = |e: StoreError| CheckpointError::ValidationFailed(e.to_string());
        for definition in checkpoint.definitions {
            engine.definitions.put(definition).map_err(loaded)?;
        }
        for instance in checkpoint.instances {
            engine.instances.put(instance).map_err(loaded)?;
        }

        debug!(
            checkpoint_id = %checkpoint.id,
            definitions = engine.definitions.len(),
            instances = engine.instances.len(),
            "engine restored from checkpoint"
        );
        Ok(engine)
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, I> WorkflowEngine<D, I>
where
    D: KeyedStore<WorkflowDefinition>,
    I: KeyedStore<WorkflowInstance>,
{
    /// An engine over caller-supplied stores.
    pub fn from_stores(definitions: Arc<D>, instances: Arc<I>) -> Self {
        Self {
            definitions,
            instances,
            id_format: IdFormat::default(),
        }
    }

    /// Use `format` for ids the engine generates.
    pub fn with_id_format(mut self, format: IdFormat) -> Self {
        self.id_format = format;
        self
    }

    /// Validate and store a new definition.
    ///
    /// An empty id is replaced by a generated one. An id that is already
    /// taken fails with a conflict before the definition is validated.
    pub fn create_definition(
        &self,
        mut definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, EngineError> {
        if definition.id.is_empty() {
            definition.id = self.id_format.generate();
        }

        self.insert_definition(&definition)
            .inspect_err(|error| {
                trace!(definition_id = %definition.id, %error, "create_definition rejected")
            })?;

        debug!(
            definition_id = %definition.id,
            states = definition.states.len(),
            actions = definition.actions.len(),
            "definition created"
        );
        Ok(definition)
    }

    fn insert_definition(&self, definition: &WorkflowDefinition) -> Result<(), EngineError> {
        if self.definitions.contains(&definition.id) {
            return Err(EngineError::DefinitionExists(definition.id.clone()));
        }
        validate(definition)?;

        // a concurrent create may have claimed the id since the check above
        self.definitions
            .insert_new(definition.clone())
            .map_err(|error| match error {
                StoreError::Occupied { key } => EngineError::DefinitionExists(key),
                other => other.into(),
            })
    }

    pub fn get_definition(&self, definition_id: &str) -> Result<WorkflowDefinition, EngineError> {
        self.definitions
            .get(definition_id)
            .ok_or_else(|| EngineError::DefinitionNotFound(definition_id.to_string()))
    }

    /// Every definition, in no particular order.
    pub fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        self.definitions.get_all()
    }

    pub fn list_states(&self, definition_id: &str) -> Result<Vec<State>, EngineError> {
        self.get_definition(definition_id)
            .map(|definition| definition.states)
    }

    pub fn list_actions(&self, definition_id: &str) -> Result<Vec<Action>, EngineError> {
        self.get_definition(definition_id)
            .map(|definition| definition.actions)
    }

    /// Append a state to a stored definition.
    ///
    /// The state is appended and the whole definition revalidated while the
    /// definition is locked; on failure the append is undone and the
    /// definition is left exactly as it was.
    pub fn add_state(&self, definition_id: &str, state: State) -> Result<State, EngineError> {
        self.definitions
            .update(definition_id, |definition| -> Result<State, EngineError> {
                if definition.has_state(&state.id) {
                    return Err(EngineError::StateExists(state.id.clone()));
                }
                if state.is_initial {
                    if let Some(existing) = definition.initial_state() {
                        return Err(EngineError::InitialStateExists {
                            existing: existing.id.clone(),
                        });
                    }
                }

                let added = state.clone();
                definition.states.push(state);
                if let Err(error) = validate(definition) {
                    definition.states.pop();
                    return Err(error.into());
                }
                Ok(added)
            })
            .unwrap_or_else(|| Err(EngineError::DefinitionNotFound(definition_id.to_string())))
            .inspect(|state| debug!(definition_id, state_id = %state.id, "state added"))
            .inspect_err(|error| trace!(definition_id, %error, "add_state rejected"))
    }

    /// Append an action to a stored definition.
    ///
    /// Same append-validate-rollback sequence as [`Self::add_state`].
    pub fn add_action(&self, definition_id: &str, action: Action) -> Result<Action, EngineError> {
        self.definitions
            .update(definition_id, |definition| -> Result<Action, EngineError> {
                if definition.has_action(&action.id) {
                    return Err(EngineError::ActionExists(action.id.clone()));
                }

                let added = action.clone();
                definition.actions.push(action);
                if let Err(error) = validate(definition) {
                    definition.actions.pop();
                    return Err(error.into());
                }
                Ok(added)
            })
            .unwrap_or_else(|| Err(EngineError::DefinitionNotFound(definition_id.to_string())))
            .inspect(|action| debug!(definition_id, action_id = %action.id, "action added"))
            .inspect_err(|error| trace!(definition_id, %error, "add_action rejected"))
    }

    /// Create an instance of a definition, sitting in its initial state.
    pub fn start_instance(&self, definition_id: &str) -> Result<WorkflowInstance, EngineError> {
        let definition = self.get_definition(definition_id)?;
        let initial = definition
            .initial_state()
            .ok_or_else(|| EngineError::NoInitialState(definition.id.clone()))?;

        let instance = WorkflowInstance::new(self.id_format.generate(), &definition.id, &initial.id);
        self.instances.insert_new(instance.clone())?;

        debug!(
            definition_id,
            instance_id = %instance.id,
            state = %instance.current_state,
            "instance started"
        );
        Ok(instance)
    }

    /// Fire one action on an instance.
    ///
    /// Checks, in order: the instance exists, its definition exists, the
    /// action exists, the action is enabled, the current state is one of the
    /// action's sources, and the current state is not final. On success the
    /// instance moves to the action's target and gains one history entry.
    pub fn execute_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, EngineError> {
        let definitions = &self.definitions;

        self.instances
            .update(instance_id, |instance| -> Result<WorkflowInstance, EngineError> {
                let definition = definitions.get(&instance.definition_id).ok_or_else(|| {
                    EngineError::DefinitionNotFound(instance.definition_id.clone())
                })?;
                let action = resolve_action(&definition, &instance.current_state, action_id)?;

                let now = Utc::now();
                let entry = HistoryEntry {
                    action_id: action.id.clone(),
                    from_state: instance.current_state.clone(),
                    to_state: action.to_state.clone(),
                    timestamp: now,
                };
                instance.current_state = action.to_state.clone();
                instance.history.push(entry);
                instance.updated_at = now;

                Ok(instance.clone())
            })
            .unwrap_or_else(|| Err(EngineError::InstanceNotFound(instance_id.to_string())))
            .inspect(|instance| {
                debug!(
                    instance_id,
                    action_id,
                    state = %instance.current_state,
                    "action executed"
                )
            })
            .inspect_err(|error| trace!(instance_id, action_id, %error, "execute_action rejected"))
    }

    /// Actions [`Self::execute_action`] would currently accept for the
    /// instance, in definition order.
    pub fn available_actions(&self, instance_id: &str) -> Result<Vec<Action>, EngineError> {
        let instance = self.get_instance(instance_id)?;
        let definition = self.get_definition(&instance.definition_id)?;

        Ok(definition
            .actions_from(&instance.current_state)
            .filter(|action| check_guard(&definition, &instance.current_state, action).is_ok())
            .cloned()
            .collect())
    }

    pub fn get_instance(&self, instance_id: &str) -> Result<WorkflowInstance, EngineError> {
        self.instances
            .get(instance_id)
            .ok_or_else(|| EngineError::InstanceNotFound(instance_id.to_string()))
    }

    /// Every instance, in no particular order.
    pub fn list_instances(&self) -> Vec<WorkflowInstance> {
        self.instances.get_all()
    }

    /// Snapshot both stores.
    ///
    /// Each entry is captured whole; entries mutated while the snapshot is
    /// taken appear either before or after that mutation.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.definitions.get_all(), self.instances.get_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;
    use crate::engine::transition::TransitionError;
    use crate::validation::DefinitionError;

    fn definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition::new(
            id,
            vec![
                State::new("S0", "Start").initial(),
                State::new("S1", "Middle"),
                State::new("S2", "End").terminal(),
            ],
            vec![
                Action::new("a1", "Advance", "S1").from("S0"),
                Action::new("a2", "Finish", "S2").from("S1"),
            ],
        )
    }

    fn engine_with(id: &str) -> WorkflowEngine {
        let engine = WorkflowEngine::new();
        engine.create_definition(definition(id)).unwrap();
        engine
    }

    #[test]
    fn create_assigns_missing_id() {
        let engine = WorkflowEngine::new();
        let created = engine.create_definition(definition("")).unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(engine.get_definition(&created.id).unwrap(), created);
    }

    #[test]
    fn create_honours_id_format() {
        let engine = WorkflowEngine::new().with_id_format(IdFormat::Simple);
        let created = engine.create_definition(definition("")).unwrap();
        assert_eq!(created.id.len(), 32);
    }

    #[test]
    fn create_rejects_taken_id_before_validating() {
        let engine = engine_with("wf");
        let invalid = WorkflowDefinition::new("wf", vec![], vec![]);

        assert_eq!(
            engine.create_definition(invalid),
            Err(EngineError::DefinitionExists("wf".to_string()))
        );
    }

    #[test]
    fn create_propagates_validator_reason() {
        let engine = WorkflowEngine::new();
        let mut def = definition("wf");
        def.actions.clear();

        assert_eq!(
            engine.create_definition(def),
            Err(EngineError::InvalidDefinition(DefinitionError::NoActions))
        );
        assert!(engine.list_definitions().is_empty());
    }

    #[test]
    fn list_states_and_actions_follow_definition_order() {
        let engine = engine_with("wf");

        let states: Vec<String> = engine
            .list_states("wf")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(states, vec!["S0", "S1", "S2"]);

        let actions: Vec<String> = engine
            .list_actions("wf")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(actions, vec!["a1", "a2"]);

        assert_eq!(
            engine.list_states("nope").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn add_state_appends() {
        let engine = engine_with("wf");
        engine.add_state("wf", State::new("S3", "Archived")).unwrap();

        assert_eq!(engine.list_states("wf").unwrap().len(), 4);
    }

    #[test]
    fn add_state_rejects_unknown_definition() {
        let engine = WorkflowEngine::new();
        assert_eq!(
            engine.add_state("wf", State::new("S3", "Archived")),
            Err(EngineError::DefinitionNotFound("wf".to_string()))
        );
    }

    #[test]
    fn add_state_rejects_duplicate_id() {
        let engine = engine_with("wf");
        assert_eq!(
            engine.add_state("wf", State::new("S1", "Again")),
            Err(EngineError::StateExists("S1".to_string()))
        );
    }

    #[test]
    fn add_state_rejects_second_initial() {
        let engine = engine_with("wf");
        let before = engine.get_definition("wf").unwrap();

        assert_eq!(
            engine.add_state("wf", State::new("S3", "Other start").initial()),
            Err(EngineError::InitialStateExists {
                existing: "S0".to_string()
            })
        );
        assert_eq!(engine.get_definition("wf").unwrap(), before);
    }

    #[test]
    fn add_state_rolls_back_on_validation_failure() {
        let engine = engine_with("wf");
        let before = engine.get_definition("wf").unwrap();

        assert_eq!(
            engine.add_state("wf", State::new("", "Blank")),
            Err(EngineError::InvalidDefinition(DefinitionError::EmptyStateId))
        );
        assert_eq!(engine.get_definition("wf").unwrap(), before);
    }

    #[test]
    fn add_action_appends() {
        let engine = engine_with("wf");
        engine
            .add_action("wf", Action::new("skip", "Skip", "S2").from("S0"))
            .unwrap();

        assert!(engine.get_definition("wf").unwrap().has_action("skip"));
    }

    #[test]
    fn add_action_rejects_duplicate_id() {
        let engine = engine_with("wf");
        assert_eq!(
            engine.add_action("wf", Action::new("a1", "Again", "S2").from("S0")),
            Err(EngineError::ActionExists("a1".to_string()))
        );
    }

    #[test]
    fn add_action_rolls_back_unknown_reference() {
        let engine = engine_with("wf");
        let before = engine.get_definition("wf").unwrap();

        let result = engine.add_action("wf", Action::new("lost", "Lost", "ghost").from("S0"));
        assert_eq!(
            result,
            Err(EngineError::InvalidDefinition(
                DefinitionError::UnknownStateReference {
                    action: "lost".to_string(),
                    state: "ghost".to_string(),
                }
            ))
        );
        assert_eq!(engine.get_definition("wf").unwrap(), before);
    }

    #[test]
    fn start_instance_sits_in_initial_state() {
        let engine = engine_with("wf");
        let instance = engine.start_instance("wf").unwrap();

        assert_eq!(instance.definition_id, "wf");
        assert_eq!(instance.current_state, "S0");
        assert!(instance.history.is_empty());
        assert_eq!(engine.get_instance(&instance.id).unwrap(), instance);
    }

    #[test]
    fn start_instance_requires_definition() {
        let engine = WorkflowEngine::new();
        assert_eq!(
            engine.start_instance("wf"),
            Err(EngineError::DefinitionNotFound("wf".to_string()))
        );
    }

    #[test]
    fn start_instance_guards_missing_initial_state() {
        let definitions = Arc::new(InMemoryStore::new());
        let mut broken = definition("wf");
        broken.states[0].is_initial = false;
        definitions.put(broken).unwrap();

        let engine: WorkflowEngine =
            WorkflowEngine::from_stores(definitions, Arc::new(InMemoryStore::new()));
        assert_eq!(
            engine.start_instance("wf"),
            Err(EngineError::NoInitialState("wf".to_string()))
        );
    }

    #[test]
    fn execute_action_moves_and_records() {
        let engine = engine_with("wf");
        let instance = engine.start_instance("wf").unwrap();

        let moved = engine.execute_action(&instance.id, "a1").unwrap();
        assert_eq!(moved.current_state, "S1");
        assert_eq!(moved.history.action_ids(), vec!["a1"]);
        assert!(moved.updated_at >= instance.updated_at);
        assert_eq!(engine.get_instance(&instance.id).unwrap(), moved);
    }

    #[test]
    fn execute_action_on_unknown_instance() {
        let engine = engine_with("wf");
        assert_eq!(
            engine.execute_action("ghost", "a1"),
            Err(EngineError::InstanceNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn execute_action_with_vanished_definition() {
        let instances = Arc::new(InMemoryStore::new());
        instances
            .put(WorkflowInstance::new("i1", "gone", "S0"))
            .unwrap();
        let engine: WorkflowEngine =
            WorkflowEngine::from_stores(Arc::new(InMemoryStore::new()), instances);

        assert_eq!(
            engine.execute_action("i1", "a1"),
            Err(EngineError::DefinitionNotFound("gone".to_string()))
        );
    }

    #[test]
    fn execute_unknown_action() {
        let engine = engine_with("wf");
        let instance = engine.start_instance("wf").unwrap();

        assert_eq!(
            engine.execute_action(&instance.id, "nope").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn execute_disabled_action() {
        let engine = engine_with("wf");
        engine
            .add_action("wf", Action::new("off", "Off", "S2").from("S0").disabled())
            .unwrap();
        let instance = engine.start_instance("wf").unwrap();

        assert_eq!(
            engine.execute_action(&instance.id, "off"),
            Err(EngineError::InvalidTransition(
                TransitionError::ActionDisabled {
                    action: "off".to_string()
                }
            ))
        );
    }

    #[test]
    fn rejected_execution_leaves_instance_untouched() {
        let engine = engine_with("wf");
        let instance = engine.start_instance("wf").unwrap();

        assert!(engine.execute_action(&instance.id, "a2").is_err());
        assert_eq!(engine.get_instance(&instance.id).unwrap(), instance);
    }

    #[test]
    fn available_actions_reflect_current_state() {
        let engine = engine_with("wf");
        engine
            .add_action("wf", Action::new("reopen", "Reopen", "S0").from("S2"))
            .unwrap();
        let instance = engine.start_instance("wf").unwrap();

        let ids = |actions: Vec<Action>| actions.into_iter().map(|a| a.id).collect::<Vec<_>>();

        assert_eq!(ids(engine.available_actions(&instance.id).unwrap()), vec!["a1"]);
        engine.execute_action(&instance.id, "a1").unwrap();
        assert_eq!(ids(engine.available_actions(&instance.id).unwrap()), vec!["a2"]);
        engine.execute_action(&instance.id, "a2").unwrap();
        assert!(engine.available_actions(&instance.id).unwrap().is_empty());
    }

    #[test]
    fn available_actions_skip_disabled_and_keep_order() {
        let engine = engine_with("wf");
        engine
            .add_action("wf", Action::new("skip", "Skip", "S2").from("S0"))
            .unwrap();
        engine
            .add_action("wf", Action::new("held", "Held", "S1").from("S0").disabled())
            .unwrap();
        let instance = engine.start_instance("wf").unwrap();

        let ids: Vec<String> = engine
            .available_actions(&instance.id)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a1", "skip"]);
    }

    #[test]
    fn clones_share_stores() {
        let engine = WorkflowEngine::new();
        let handle = engine.clone();
        handle.create_definition(definition("wf")).unwrap();

        assert!(engine.get_definition("wf").is_ok());
    }

    #[test]
    fn with_config_rejects_bad_shards() {
        let config = EngineConfig {
            store_shards: Some(3),
            ..EngineConfig::default()
        };
        assert!(WorkflowEngine::with_config(&config).is_err());
    }

    #[test]
    fn checkpoint_restore_reproduces_engine() {
        let engine = engine_with("wf");
        let instance = engine.start_instance("wf").unwrap();
        engine.execute_action(&instance.id, "a1").unwrap();

        let checkpoint = engine.checkpoint();
        let restored = WorkflowEngine::restore(&EngineConfig::default(), checkpoint).unwrap();

        assert_eq!(
            restored.get_definition("wf").unwrap(),
            engine.get_definition("wf").unwrap()
        );
        assert_eq!(
            restored.get_instance(&instance.id).unwrap(),
            engine.get_instance(&instance.id).unwrap()
        );

        let done = restored.execute_action(&instance.id, "a2").unwrap();
        assert_eq!(done.current_state, "S2");
        assert_eq!(engine.get_instance(&instance.id).unwrap().current_state, "S1");
    }

    #[test]
    fn restore_rejects_inconsistent_checkpoint() {
        let checkpoint = Checkpoint::new(
            vec![definition("wf")],
            vec![WorkflowInstance::new("i1", "other", "S0")],
        );

        let result = WorkflowEngine::restore(&EngineConfig::default(), checkpoint);
        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }
}
