//! Reference in-memory interpreter for machine definitions.
//!
//! Single-threaded and fully synchronous: `send` resolves the transition,
//! updates the active leaf, and invokes every subscriber before it
//! returns. Internal borrows are dropped before subscribers run, so
//! callbacks may reenter the interpreter (send another event, read the
//! leaf, unsubscribe) on the same call stack.

use crate::core::{DefinitionError, MachineDefinition, StatePath, Transition};
use crate::machine::adapter::{MachineAdapter, MachineError, SubscriptionId, TransitionCallback};
use crate::machine::log::{TransitionLog, TransitionRecord};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Status {
    Idle,
    Running,
    Stopped,
}

/// Interpreter executing a validated machine definition.
///
/// Event dispatch searches the active branch from the leaf toward the
/// root (root-level handlers last); the first handler whose guard accepts
/// the current leaf wins. Entering a target descends through declared
/// initial children to a leaf.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::{MachineBuilder, StateNodeBuilder};
/// use waypoint::core::{StatePath, Transition};
/// use waypoint::machine::{Interpreter, MachineAdapter};
///
/// let definition = MachineBuilder::new()
///     .initial("home")
///     .on("GoAbout", Transition::relative("about"))
///     .state(StateNodeBuilder::new("home"))
///     .state(StateNodeBuilder::new("about"))
///     .build()
///     .unwrap();
///
/// let interpreter = Interpreter::new(definition).unwrap();
/// interpreter.start().unwrap();
/// assert!(interpreter.send("GoAbout"));
/// assert_eq!(interpreter.active_leaf(), StatePath::parse("about"));
/// ```
pub struct Interpreter {
    definition: MachineDefinition,
    current: RefCell<StatePath>,
    status: Cell<Status>,
    subscribers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(&StatePath)>)>>,
    log: RefCell<TransitionLog>,
}

impl Interpreter {
    /// Validate the definition and construct an interpreter positioned at
    /// the initial leaf. The definition is immutable from here on.
    pub fn new(definition: MachineDefinition) -> Result<Self, DefinitionError> {
        definition.validate()?;
        let initial = definition.initial_leaf();
        Ok(Self {
            definition,
            current: RefCell::new(initial),
            status: Cell::new(Status::Idle),
            subscribers: RefCell::new(Vec::new()),
            log: RefCell::new(TransitionLog::new()),
        })
    }

    /// The definition this interpreter executes.
    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    /// Whether the interpreter is currently running.
    pub fn is_running(&self) -> bool {
        self.status.get() == Status::Running
    }

    /// Snapshot of the transition log.
    pub fn log(&self) -> TransitionLog {
        self.log.borrow().clone()
    }

    /// Search the active branch, deepest node first, for a handler whose
    /// guard accepts the current leaf. A rejecting guard lets the search
    /// bubble toward the root.
    fn find_handler(&self, leaf: &StatePath, event: &str) -> Option<(StatePath, Transition)> {
        for path in leaf.ancestors_and_self() {
            let Some(handlers) = self.definition.handlers_at(&path) else {
                continue;
            };
            if let Some(transition) = handlers.get(event) {
                if transition.guard().is_none_or(|guard| guard.check(leaf)) {
                    return Some((path, transition.clone()));
                }
            }
        }
        None
    }

    fn notify(&self, leaf: &StatePath) {
        // Snapshot first: callbacks may subscribe or unsubscribe while we
        // are iterating.
        let callbacks: Vec<Rc<dyn Fn(&StatePath)>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(leaf);
        }
    }
}

impl MachineAdapter for Interpreter {
    fn start(&self) -> Result<(), MachineError> {
        match self.status.get() {
            Status::Idle => {
                self.status.set(Status::Running);
                Ok(())
            }
            Status::Running => Err(MachineError::AlreadyStarted),
            Status::Stopped => Err(MachineError::Stopped),
        }
    }

    fn send(&self, event: &str) -> bool {
        if self.status.get() != Status::Running {
            return false;
        }
        let from = self.current.borrow().clone();
        let Some((handler_path, transition)) = self.find_handler(&from, event) else {
            return false;
        };
        let target = self.definition.resolve_target(&handler_path, transition.target());
        let to = self.definition.resolve_leaf(target);
        *self.current.borrow_mut() = to.clone();
        {
            let mut log = self.log.borrow_mut();
            *log = log.record(TransitionRecord {
                from,
                to: to.clone(),
                event: event.to_string(),
                timestamp: Utc::now(),
            });
        }
        self.notify(&to);
        true
    }

    fn active_leaf(&self) -> StatePath {
        self.current.borrow().clone()
    }

    fn on_transition(&self, callback: TransitionCallback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscribers.borrow_mut().push((id, Rc::from(callback)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscription, _)| *subscription != id);
    }

    fn stop(&self) {
        self.status.set(Status::Stopped);
    }
}
