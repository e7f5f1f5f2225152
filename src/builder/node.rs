//! Builder for constructing state nodes.

use crate::core::{StateNode, Transition};
use std::collections::BTreeMap;

/// Builder for one node of the state tree, with a fluent API.
///
/// The builder only assembles; structural rules (name validity, duplicate
/// siblings, initial-child existence) are checked when the finished
/// definition is validated.
pub struct StateNodeBuilder {
    name: String,
    route: Option<String>,
    initial: Option<String>,
    on: BTreeMap<String, Transition>,
    children: Vec<StateNode>,
}

impl StateNodeBuilder {
    /// Create a builder for a node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route: None,
            initial: None,
            on: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Declare the node routable under a URL pattern.
    pub fn route(mut self, pattern: impl Into<String>) -> Self {
        self.route = Some(pattern.into());
        self
    }

    /// Declare the initial child entered when this node is entered.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add an event handler on this node.
    pub fn on(mut self, event: impl Into<String>, transition: Transition) -> Self {
        self.on.insert(event.into(), transition);
        self
    }

    /// Add a child node.
    pub fn child(mut self, child: impl Into<StateNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Finish the node.
    pub fn build(self) -> StateNode {
        StateNode {
            name: self.name,
            route: self.route,
            initial: self.initial,
            on: self.on,
            children: self.children,
        }
    }
}

impl From<StateNodeBuilder> for StateNode {
    fn from(builder: StateNodeBuilder) -> Self {
        builder.build()
    }
}
