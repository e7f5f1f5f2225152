//! Builder API for ergonomic machine definition construction.
//!
//! This module provides fluent builders for assembling the state-node tree
//! with minimal boilerplate. Builders only assemble; the structural rules
//! live in [`MachineDefinition::validate`](crate::core::MachineDefinition::validate),
//! which runs before any interpreter starts.

pub mod error;
pub mod machine;
pub mod node;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use node::StateNodeBuilder;

use crate::core::{Guard, StatePath, Transition};

/// Create a simple unguarded transition to a state in the declaring scope.
///
/// # Example
///
/// ```
/// use waypoint::builder::{transition_to, MachineBuilder, StateNodeBuilder};
///
/// let definition = MachineBuilder::new()
///     .initial("home")
///     .on("GoAbout", transition_to("about"))
///     .state(StateNodeBuilder::new("home").route("/"))
///     .state(StateNodeBuilder::new("about").route("/about"))
///     .build()
///     .unwrap();
/// # assert!(definition.validate().is_ok());
/// ```
pub fn transition_to(name: impl Into<String>) -> Transition {
    Transition::relative(name)
}

/// Create a transition with a guard predicate over the active leaf path.
///
/// # Example
///
/// ```
/// use waypoint::builder::guarded_transition_to;
/// use waypoint::core::StatePath;
///
/// let transition = guarded_transition_to("review", |leaf: &StatePath| {
///     leaf.starts_with(&StatePath::parse("draft"))
/// });
/// assert!(transition.guard().is_some());
/// ```
pub fn guarded_transition_to<F>(name: impl Into<String>, guard: F) -> Transition
where
    F: Fn(&StatePath) -> bool + 'static,
{
    Transition::relative(name).when(Guard::new(guard))
}
