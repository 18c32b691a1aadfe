//! Core workflow data model.
//!
//! This module contains the plain values the engine operates on:
//! - States and actions, the nodes and edges of a workflow
//! - Definitions, which group them
//! - Instances and their append-only history
//!
//! Nothing here enforces invariants. Structural checks live in
//! [`crate::validation`] and transition rules in [`crate::engine`].

mod definition;
mod history;
mod state;

pub use definition::{WorkflowDefinition, WorkflowInstance};
pub use history::{History, HistoryEntry};
pub use state::{Action, State};
