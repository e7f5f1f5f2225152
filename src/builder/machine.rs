//! Builder for constructing machine definitions.

use crate::builder::error::BuildError;
use crate::core::{MachineDefinition, StateNode, Transition};
use std::collections::BTreeMap;

/// Builder for constructing machine definitions with a fluent API.
pub struct MachineBuilder {
    initial: Option<String>,
    on: BTreeMap<String, Transition>,
    states: Vec<StateNode>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            on: BTreeMap::new(),
            states: Vec::new(),
        }
    }

    /// Set the root's initial state (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a root-level event handler.
    pub fn on(mut self, event: impl Into<String>, transition: Transition) -> Self {
        self.on.insert(event.into(), transition);
        self
    }

    /// Add a top-level state.
    pub fn state(mut self, node: impl Into<StateNode>) -> Self {
        self.states.push(node.into());
        self
    }

    /// Add multiple top-level states at once.
    pub fn states(mut self, nodes: Vec<StateNode>) -> Self {
        self.states.extend(nodes);
        self
    }

    /// Build the definition.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<MachineDefinition, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        Ok(MachineDefinition {
            initial,
            on: self.on,
            states: self.states,
        })
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
