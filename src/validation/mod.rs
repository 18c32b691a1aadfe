//! Structural validation of workflow definitions.
//!
//! Validation is pure: it looks only at the definition it is handed and
//! never consults a store. Rules are checked in a fixed order:
//!
//! 1. at least two states
//! 2. at least one action
//! 3. exactly one initial state
//! 4. no duplicate state ids
//! 5. every action target and source names an existing state
//! 6. no empty state ids
//! 7. no duplicate action ids
//! 8. every action has at least one source state
//!
//! [`validate`] stops at the first failing rule. [`validate_all`] uses
//! Stillwater's `Validation` to report every failing rule at once, in the
//! same order.
//!
//! # Example
//!
//! ```rust
//! use waypoint::core::{Action, State, WorkflowDefinition};
//! use waypoint::validation::{validate, DefinitionError};
//!
//! let definition = WorkflowDefinition::new(
//!     "wf",
//!     vec![State::new("S0", "Start").initial()],
//!     vec![Action::new("a1", "Go", "S0").from("S0")],
//! );
//!
//! assert_eq!(
//!     validate(&definition),
//!     Err(DefinitionError::TooFewStates { found: 1 })
//! );
//! ```

pub(crate) mod rules;
pub mod violations;

pub use violations::DefinitionError;

use crate::core::WorkflowDefinition;
use rules::RULES;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check a definition, returning the first rule it breaks.
pub fn validate(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    RULES.iter().try_for_each(|rule| rule(definition))
}

/// Check a definition against every rule, accumulating all violations.
pub fn validate_all(
    definition: &WorkflowDefinition,
) -> Validation<(), NonEmptyVec<DefinitionError>> {
    let checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = RULES
        .iter()
        .map(|rule| match rule(definition) {
            Ok(()) => Validation::success(()),
            Err(error) => Validation::fail(error),
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
