//! Waypoint: a finite-state workflow engine
//!
//! Waypoint separates a pure core from a thin imperative shell. Workflow
//! definitions and instances are plain values; a pure validator decides
//! whether a definition is well-formed; the engine applies that validator
//! and the transition rules against shared, concurrently accessible stores.
//!
//! # Core Concepts
//!
//! - **Definition**: states plus the actions connecting them
//! - **Action**: a guarded transition from a set of source states to a target
//! - **Instance**: a live execution with a current state and append-only history
//! - **Validator**: structural rules every stored definition satisfies
//! - **Engine**: creates and grows definitions, starts and drives instances
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::{simple_action, DefinitionBuilder};
//! use waypoint::core::State;
//! use waypoint::WorkflowEngine;
//!
//! let definition = DefinitionBuilder::new()
//!     .id("review")
//!     .state(State::new("S0", "Draft").initial())
//!     .state(State::new("S1", "In review"))
//!     .state(State::new("S2", "Published").terminal())
//!     .action(simple_action("a1", "S0", "S1"))
//!     .action(simple_action("a2", "S1", "S2"))
//!     .build()
//!     .unwrap();
//!
//! let engine = WorkflowEngine::new();
//! engine.create_definition(definition).unwrap();
//!
//! let instance = engine.start_instance("review").unwrap();
//! engine.execute_action(&instance.id, "a1").unwrap();
//! let instance = engine.execute_action(&instance.id, "a2").unwrap();
//!
//! assert_eq!(instance.current_state, "S2");
//! assert_eq!(instance.history.path(), vec!["S0", "S1", "S2"]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod engine;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Action, History, HistoryEntry, State, WorkflowDefinition, WorkflowInstance};
pub use engine::{EngineError, ErrorKind, TransitionError, WorkflowEngine};
pub use store::{InMemoryStore, Keyed, KeyedStore, StoreError};
pub use validation::{validate, validate_all, DefinitionError};
