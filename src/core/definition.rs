//! Machine definitions: the state-node tree and its transitions.
//!
//! A [`MachineDefinition`] is a tree of named [`StateNode`]s. Nodes may
//! carry a `route` pattern (which places them in the route table), an
//! `initial` child, event handlers, and nested children. Definitions are
//! validated once at construction and are read-only afterward; the only
//! sanctioned mutation is the routing-event registration that runs before
//! an interpreter starts.

use super::guard::Guard;
use super::path::{StatePath, PATH_SEPARATOR};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors detected when validating a machine definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Machine defines no states")]
    NoStates,

    #[error("State '{state}' has children but no initial child")]
    MissingInitial { state: String },

    #[error("Initial child '{initial}' of state '{state}' does not exist")]
    UnknownInitial { state: String, initial: String },

    #[error("State '{parent}' declares two children named '{name}'")]
    DuplicateState { parent: String, name: String },

    #[error("Event '{event}' on state '{state}' targets unknown state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("Invalid state name '{name}': names must be non-empty and contain no '.' or '/'")]
    InvalidName { name: String },

    #[error("Event '{event}' on state '{state}' collides with the reserved routing namespace")]
    ReservedEvent { state: String, event: String },
}

/// Where a transition goes.
#[derive(Clone, Debug)]
pub enum TransitionTarget {
    /// Resolved against the children of the declaring node's parent; the
    /// root's own handlers resolve against the root's children.
    Relative(String),
    /// Resolved from the machine root, regardless of the active branch.
    Absolute(StatePath),
}

/// An event handler: a target plus an optional guard.
#[derive(Clone, Debug)]
pub struct Transition {
    pub(crate) target: TransitionTarget,
    pub(crate) guard: Option<Guard>,
}

impl Transition {
    /// Transition to a state in the declaring node's scope.
    pub fn relative(name: impl Into<String>) -> Self {
        Self {
            target: TransitionTarget::Relative(name.into()),
            guard: None,
        }
    }

    /// Transition to an absolute state path.
    pub fn absolute(path: StatePath) -> Self {
        Self {
            target: TransitionTarget::Absolute(path),
            guard: None,
        }
    }

    /// Attach a guard predicate.
    pub fn when(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// The transition's target.
    pub fn target(&self) -> &TransitionTarget {
        &self.target
    }

    /// The transition's guard, if any.
    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }
}

/// One node in the state tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    pub(crate) name: String,
    pub(crate) route: Option<String>,
    pub(crate) initial: Option<String>,
    pub(crate) on: BTreeMap<String, Transition>,
    pub(crate) children: Vec<StateNode>,
}

impl StateNode {
    /// The node's name (one path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's URL pattern metadata, if it is routable.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// The declared initial child name, if any.
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// Event handlers declared on this node.
    pub fn handlers(&self) -> &BTreeMap<String, Transition> {
        &self.on
    }

    /// Child nodes in declaration order.
    pub fn children(&self) -> &[StateNode] {
        &self.children
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&StateNode> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// A complete machine definition: the root's initial child, root-level
/// event handlers, and the top-level states.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::{MachineBuilder, StateNodeBuilder};
/// use waypoint::core::Transition;
///
/// let definition = MachineBuilder::new()
///     .initial("home")
///     .on("GoAbout", Transition::relative("about"))
///     .state(StateNodeBuilder::new("home").route("/"))
///     .state(StateNodeBuilder::new("about").route("/about"))
///     .build()
///     .unwrap();
///
/// assert!(definition.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct MachineDefinition {
    pub(crate) initial: String,
    pub(crate) on: BTreeMap<String, Transition>,
    pub(crate) states: Vec<StateNode>,
}

impl MachineDefinition {
    /// The root's initial child name.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Root-level event handlers.
    pub fn handlers(&self) -> &BTreeMap<String, Transition> {
        &self.on
    }

    /// Top-level states in declaration order.
    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    /// Look up the node at an absolute path. The root itself has no node.
    pub fn node(&self, path: &StatePath) -> Option<&StateNode> {
        let mut segments = path.segments().iter();
        let first = segments.next()?;
        let mut node = self.states.iter().find(|s| s.name == *first)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Event handlers in scope at `path`: the root's own handlers for the
    /// root path, otherwise the named node's.
    pub fn handlers_at(&self, path: &StatePath) -> Option<&BTreeMap<String, Transition>> {
        if path.is_root() {
            return Some(&self.on);
        }
        self.node(path).map(|node| &node.on)
    }

    /// All nodes with their absolute paths, in pre-order.
    pub fn nodes(&self) -> Vec<(StatePath, &StateNode)> {
        let mut collected = Vec::new();
        let root = StatePath::root();
        for state in &self.states {
            collect_pre_order(&root, state, &mut collected);
        }
        collected
    }

    /// Resolve a transition target declared at `handler_path` into an
    /// absolute path.
    pub fn resolve_target(&self, handler_path: &StatePath, target: &TransitionTarget) -> StatePath {
        match target {
            TransitionTarget::Absolute(path) => path.clone(),
            TransitionTarget::Relative(name) => {
                let scope = handler_path.parent().unwrap_or_else(StatePath::root);
                scope.child(name)
            }
        }
    }

    /// Descend from `path` through declared initial children to a leaf.
    pub fn resolve_leaf(&self, path: StatePath) -> StatePath {
        let mut current = path;
        loop {
            let Some(node) = self.node(&current) else {
                return current;
            };
            match node.initial.as_deref() {
                Some(initial) if node.child(initial).is_some() => {
                    current = current.child(initial);
                }
                _ => return current,
            }
        }
    }

    /// The leaf the machine occupies when it starts: the root's initial
    /// child, resolved through nested initial children.
    pub fn initial_leaf(&self) -> StatePath {
        self.resolve_leaf(StatePath::root().child(&self.initial))
    }

    /// Validate the tree: names, duplicates, initial children, and the
    /// resolvability of every transition target. Runs once, before an
    /// interpreter is constructed.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.states.is_empty() {
            return Err(DefinitionError::NoStates);
        }
        let root = StatePath::root();
        check_scope(&root, &self.states, Some(self.initial.as_str()))?;
        check_handlers(self, &root, &self.on)?;
        for (path, node) in self.nodes() {
            if !node.children.is_empty() || node.initial.is_some() {
                check_scope(&path, &node.children, node.initial.as_deref())?;
            }
            check_handlers(self, &path, &node.on)?;
        }
        Ok(())
    }

    pub(crate) fn insert_root_handler(&mut self, event: String, transition: Transition) {
        self.on.insert(event, transition);
    }
}

fn collect_pre_order<'a>(
    parent: &StatePath,
    node: &'a StateNode,
    out: &mut Vec<(StatePath, &'a StateNode)>,
) {
    let path = parent.child(&node.name);
    out.push((path.clone(), node));
    for child in &node.children {
        collect_pre_order(&path, child, out);
    }
}

fn display_scope(path: &StatePath) -> String {
    if path.is_root() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(PATH_SEPARATOR) && !name.contains('/')
}

/// Check one node's (or the root's) immediate children and initial
/// declaration.
fn check_scope(
    scope: &StatePath,
    children: &[StateNode],
    initial: Option<&str>,
) -> Result<(), DefinitionError> {
    for (index, child) in children.iter().enumerate() {
        if !valid_name(&child.name) {
            return Err(DefinitionError::InvalidName {
                name: child.name.clone(),
            });
        }
        if children[..index].iter().any(|other| other.name == child.name) {
            return Err(DefinitionError::DuplicateState {
                parent: display_scope(scope),
                name: child.name.clone(),
            });
        }
    }
    match initial {
        None if !children.is_empty() => Err(DefinitionError::MissingInitial {
            state: display_scope(scope),
        }),
        None => Ok(()),
        Some(name) => {
            if children.iter().any(|child| child.name == name) {
                Ok(())
            } else {
                Err(DefinitionError::UnknownInitial {
                    state: display_scope(scope),
                    initial: name.to_string(),
                })
            }
        }
    }
}

/// Check that every handler declared at `path` resolves to a real node.
fn check_handlers(
    definition: &MachineDefinition,
    path: &StatePath,
    handlers: &BTreeMap<String, Transition>,
) -> Result<(), DefinitionError> {
    for (event, transition) in handlers {
        let target = definition.resolve_target(path, &transition.target);
        if target.is_root() || definition.node(&target).is_none() {
            return Err(DefinitionError::UnknownTarget {
                state: display_scope(path),
                event: event.clone(),
                target: target.to_string(),
            });
        }
    }
    Ok(())
}
