//! Routing events: the synthetic events that jump the machine to an
//! arbitrary routable node.
//!
//! Ordinary events in a hierarchical machine are only handled by the
//! currently active branch, so navigating to an arbitrary URL needs a
//! different lever: one reserved root-level event per routable node,
//! mapped to an unconditional absolute-path transition. Registration
//! happens once, on the definition, before the interpreter starts.

use crate::core::{DefinitionError, MachineDefinition, RouteTable, StatePath, Transition};

/// Reserved prefix of all routing events. Applications must not declare
/// events in this namespace.
pub const ROUTING_EVENT_PREFIX: &str = "@route/";

/// The routing event name for a state path: the reserved prefix plus the
/// dot-joined path. Deterministic, so both the registrar and the
/// synchronizer derive the same name independently.
///
/// # Example
///
/// ```rust
/// use waypoint::machine::routing_event;
/// use waypoint::core::StatePath;
///
/// assert_eq!(routing_event(&StatePath::parse("substate.a")), "@route/substate.a");
/// ```
pub fn routing_event(state_path: &StatePath) -> String {
    format!("{ROUTING_EVENT_PREFIX}{state_path}")
}

/// Reject user-declared events inside the reserved namespace. Runs before
/// registration, while every handler in the definition is still
/// application-authored.
pub fn ensure_unreserved_events(definition: &MachineDefinition) -> Result<(), DefinitionError> {
    for event in definition.handlers().keys() {
        if event.starts_with(ROUTING_EVENT_PREFIX) {
            return Err(DefinitionError::ReservedEvent {
                state: "(root)".to_string(),
                event: event.clone(),
            });
        }
    }
    for (path, node) in definition.nodes() {
        for event in node.handlers().keys() {
            if event.starts_with(ROUTING_EVENT_PREFIX) {
                return Err(DefinitionError::ReservedEvent {
                    state: path.to_string(),
                    event: event.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Register one routing event per route entry on the definition's root:
/// an unguarded transition to the entry's absolute state path, so it
/// resolves regardless of which branch is active.
pub fn register_routing_events(definition: &mut MachineDefinition, routes: &RouteTable) {
    for entry in routes.entries() {
        let state_path = entry.state_path().clone();
        definition.insert_root_handler(
            routing_event(&state_path),
            Transition::absolute(state_path),
        );
    }
}
