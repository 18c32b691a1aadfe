//! Workflow engine: the imperative shell around the data model.
//!
//! The engine owns nothing itself. It holds shared handles to a definition
//! store and an instance store, runs the validator on every definition
//! change and the transition guards on every action execution.
//!
//! # Example
//!
//! ```rust
//! use waypoint::core::{Action, State, WorkflowDefinition};
//! use waypoint::engine::{ErrorKind, WorkflowEngine};
//!
//! let engine = WorkflowEngine::new();
//! engine
//!     .create_definition(WorkflowDefinition::new(
//!         "ticket",
//!         vec![
//!             State::new("open", "Open").initial(),
//!             State::new("closed", "Closed").terminal(),
//!         ],
//!         vec![Action::new("close", "Close", "closed").from("open")],
//!     ))
//!     .unwrap();
//!
//! let instance = engine.start_instance("ticket").unwrap();
//! let instance = engine.execute_action(&instance.id, "close").unwrap();
//! assert_eq!(instance.current_state, "closed");
//!
//! let error = engine.execute_action(&instance.id, "close").unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::InvalidTransition);
//! ```

mod error;
mod transition;
mod workflow;

pub use error::{EngineError, ErrorKind};
pub use transition::TransitionError;
pub use workflow::WorkflowEngine;
