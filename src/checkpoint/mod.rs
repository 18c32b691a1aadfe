//! Snapshots of an engine's definitions and instances.
//!
//! A checkpoint is a plain value: the engine produces one with
//! [`WorkflowEngine::checkpoint`](crate::engine::WorkflowEngine::checkpoint)
//! and rebuilds from one with
//! [`WorkflowEngine::restore`](crate::engine::WorkflowEngine::restore).
//! Where the bytes go is the caller's business.

use crate::core::{WorkflowDefinition, WorkflowInstance};
use crate::validation::validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of every definition and instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Definitions, sorted by id
    pub definitions: Vec<WorkflowDefinition>,

    /// Instances, sorted by id
    pub instances: Vec<WorkflowInstance>,
}

impl Checkpoint {
    /// Build a checkpoint of the given contents at the current version.
    pub fn new(
        mut definitions: Vec<WorkflowDefinition>,
        mut instances: Vec<WorkflowInstance>,
    ) -> Self {
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        instances.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            definitions,
            instances,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }

    /// Check that the contents could have been produced by a live engine.
    ///
    /// Every definition must pass the validator, ids must be non-empty and
    /// unique, and every instance must sit in a state of an included
    /// definition.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        self.check_version()?;

        let mut definitions = HashMap::new();
        for definition in &self.definitions {
            if definition.id.is_empty() {
                return Err(CheckpointError::ValidationFailed(
                    "definition with empty id".to_string(),
                ));
            }
            validate(definition).map_err(|e| {
                CheckpointError::ValidationFailed(format!("definition '{}': {e}", definition.id))
            })?;
            if definitions
                .insert(definition.id.as_str(), definition)
                .is_some()
            {
                return Err(CheckpointError::ValidationFailed(format!(
                    "duplicate definition id '{}'",
                    definition.id
                )));
            }
        }

        let mut instance_ids = HashSet::new();
        for instance in &self.instances {
            if instance.id.is_empty() {
                return Err(CheckpointError::ValidationFailed(
                    "instance with empty id".to_string(),
                ));
            }
            if !instance_ids.insert(instance.id.as_str()) {
                return Err(CheckpointError::ValidationFailed(format!(
                    "duplicate instance id '{}'",
                    instance.id
                )));
            }
            let definition = definitions
                .get(instance.definition_id.as_str())
                .ok_or_else(|| {
                    CheckpointError::ValidationFailed(format!(
                        "instance '{}' references missing definition '{}'",
                        instance.id, instance.definition_id
                    ))
                })?;
            if !definition.has_state(&instance.current_state) {
                return Err(CheckpointError::ValidationFailed(format!(
                    "instance '{}' sits in unknown state '{}'",
                    instance.id, instance.current_state
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, State};

    fn definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition::new(
            id,
            vec![
                State::new("S0", "Start").initial(),
                State::new("S1", "End").terminal(),
            ],
            vec![Action::new("a1", "Go", "S1").from("S0")],
        )
    }

    fn checkpoint() -> Checkpoint {
        Checkpoint::new(
            vec![definition("b"), definition("a")],
            vec![WorkflowInstance::new("i1", "a", "S0")],
        )
    }

    #[test]
    fn new_sorts_by_id() {
        let checkpoint = checkpoint();
        let ids: Vec<&str> = checkpoint.definitions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
    }

    #[test]
    fn json_round_trip_preserves_contents() {
        let checkpoint = checkpoint();
        let restored = Checkpoint::from_json(&checkpoint.to_json().unwrap()).unwrap();
        assert_eq!(checkpoint, restored);
    }

    #[test]
    fn binary_round_trip_preserves_contents() {
        let checkpoint = checkpoint();
        let restored = Checkpoint::from_binary(&checkpoint.to_binary().unwrap()).unwrap();
        assert_eq!(checkpoint, restored);
    }

    #[test]
    fn rejects_future_version() {
        let mut checkpoint = checkpoint();
        checkpoint.version = CHECKPOINT_VERSION + 1;
        let json = checkpoint.to_json().unwrap();

        let result = Checkpoint::from_json(&json);
        assert!(matches!(
            result,
            Err(CheckpointError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let result = Checkpoint::from_binary(&[0xff, 0x00, 0x13]);
        assert!(matches!(
            result,
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn valid_checkpoint_passes() {
        assert!(checkpoint().validate().is_ok());
    }

    #[test]
    fn rejects_invalid_definition() {
        let mut checkpoint = checkpoint();
        checkpoint.definitions[0].actions.clear();
        assert!(matches!(
            checkpoint.validate(),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_duplicate_definition() {
        let checkpoint = Checkpoint::new(vec![definition("a"), definition("a")], vec![]);
        assert!(matches!(
            checkpoint.validate(),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_orphan_instance() {
        let checkpoint = Checkpoint::new(
            vec![definition("a")],
            vec![WorkflowInstance::new("i1", "missing", "S0")],
        );
        assert!(matches!(
            checkpoint.validate(),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_instance_in_unknown_state() {
        let checkpoint = Checkpoint::new(
            vec![definition("a")],
            vec![WorkflowInstance::new("i1", "a", "S7")],
        );
        assert!(matches!(
            checkpoint.validate(),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }
}
