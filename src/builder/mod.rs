//! Builder API for ergonomic definition construction.
//!
//! # Example
//!
//! ```
//! use waypoint::builder::{ActionBuilder, DefinitionBuilder};
//! use waypoint::core::State;
//!
//! let definition = DefinitionBuilder::new()
//!     .id("order")
//!     .state(State::new("placed", "Placed").initial())
//!     .state(State::new("shipped", "Shipped").terminal())
//!     .transition(ActionBuilder::new("ship").from("placed").to("shipped"))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(definition.actions.len(), 1);
//! ```

pub mod action;
pub mod definition;
pub mod error;

pub use action::ActionBuilder;
pub use definition::DefinitionBuilder;
pub use error::BuildError;

use crate::core::Action;

/// Create an enabled action with one source, named after its id.
///
/// # Example
///
/// ```
/// use waypoint::builder::simple_action;
///
/// let action = simple_action("submit", "draft", "review");
/// assert!(action.can_fire_from("draft"));
/// assert_eq!(action.to_state, "review");
/// ```
pub fn simple_action(
    id: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> Action {
    let id = id.into();
    Action::new(id.clone(), id, to).from(from)
}
