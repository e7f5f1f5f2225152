//! The synchronizer: bidirectional state ⇄ location reconciliation.
//!
//! [`RouterSync`] is the core control logic. It reacts to location
//! changes by forcing the machine to the matched state, and to machine
//! transitions by updating the location, while the suppression flags stop
//! either side's echo from being reprocessed as an external stimulus.
//! Everything runs synchronously inside the notifying adapter's call
//! stack.
//!
//! [`Router`] is the batteries-included entry point wiring the reference
//! interpreter to a history adapter.

mod error;
mod flags;

pub use error::RouterError;

use crate::core::{MachineDefinition, Params, RouteTable, StatePath};
use crate::history::{HistoryAdapter, Location};
use crate::machine::{
    ensure_unreserved_events, register_routing_events, routing_event, Interpreter, MachineAdapter,
    SubscriptionId,
};
use flags::SuppressionFlags;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct SyncCore<M, H> {
    machine: Rc<M>,
    history: Rc<H>,
    routes: RouteTable,
    flags: SuppressionFlags,
    params: RefCell<Params>,
    machine_subscription: Cell<Option<SubscriptionId>>,
    history_subscription: Cell<Option<SubscriptionId>>,
}

impl<M: MachineAdapter, H: HistoryAdapter> SyncCore<M, H> {
    /// One location-driven reconciliation step.
    ///
    /// `guard_echo` is true when the call came from the history
    /// subscription: a corrective `replace` will echo back through it and
    /// must be suppressed. The initial reconciliation passes false, since
    /// no subscription exists yet to echo through.
    fn on_location_changed(&self, location: &Location, guard_echo: bool) {
        if self.flags.consume_incoming() {
            return;
        }
        let Some(matched) = self.routes.find(&location.path) else {
            return;
        };
        let target = matched.entry.state_path().clone();
        *self.params.borrow_mut() = matched.params;
        let leaf = self.machine.active_leaf();
        if leaf.starts_with(&target) {
            // Already consistent; a redundant send would manufacture a
            // transition notification out of nothing.
            return;
        }
        // The send reenters on_machine_transitioned on this stack; arm
        // the outgoing flag first so the echo is not mistaken for a
        // state-driven navigation.
        self.flags.arm_outgoing();
        if !self.machine.send(&routing_event(&target)) {
            // A flag must not outlive the send that armed it.
            self.flags.disarm_outgoing();
            return;
        }
        let leaf = self.machine.active_leaf();
        if leaf == target {
            return;
        }
        // The machine settled deeper than the requested node (a nested
        // initial child). Correct the URL to the settled node's own
        // pattern: a settling correction, so replace, never push.
        let Some(entry) = self.routes.route_for(&leaf) else {
            return;
        };
        if entry.pattern().raw() == location.path {
            return;
        }
        if guard_echo {
            self.flags.arm_incoming();
        }
        self.history.replace(entry.pattern().raw());
    }

    /// One machine-driven reconciliation step.
    fn on_machine_transitioned(&self, leaf: &StatePath) {
        if self.flags.consume_outgoing() {
            return;
        }
        let Some(entry) = self.routes.route_for(leaf) else {
            // Non-routable state; the URL stays where it was.
            return;
        };
        if entry.pattern().raw() == self.history.location().path {
            return;
        }
        // A state-driven navigation is a genuine new entry: push, so it
        // is separately reachable via back.
        self.flags.arm_incoming();
        self.history.push(entry.pattern().raw());
    }
}

/// The synchronizer, attached to one machine adapter and one history
/// adapter for its lifetime.
///
/// Single-threaded by design: adapters notify reentrantly on the calling
/// stack, and the suppression flags assume exactly one stack.
pub struct RouterSync<M: MachineAdapter + 'static, H: HistoryAdapter + 'static> {
    core: Rc<SyncCore<M, H>>,
}

impl<M: MachineAdapter + 'static, H: HistoryAdapter + 'static> RouterSync<M, H> {
    /// Start the machine, reconcile the initial location, and subscribe
    /// to both adapters.
    ///
    /// Wiring order matters: the machine subscription is installed before
    /// the initial reconciliation (whose forced send must have its echo
    /// consumed), and the history subscription after it (so the initial
    /// corrective replace never echoes at all, and mounting can never
    /// create a history entry).
    pub fn attach(machine: Rc<M>, history: Rc<H>, routes: RouteTable) -> Result<Self, RouterError> {
        machine.start()?;
        let core = Rc::new(SyncCore {
            machine,
            history,
            routes,
            flags: SuppressionFlags::default(),
            params: RefCell::new(Params::new()),
            machine_subscription: Cell::new(None),
            history_subscription: Cell::new(None),
        });

        // Callbacks hold weak references: a notification that fires after
        // teardown upgrades to nothing and is ignored.
        let weak = Rc::downgrade(&core);
        let machine_subscription = core.machine.on_transition(Box::new(move |leaf| {
            if let Some(core) = weak.upgrade() {
                core.on_machine_transitioned(leaf);
            }
        }));
        core.machine_subscription.set(Some(machine_subscription));

        let initial = core.history.location();
        core.on_location_changed(&initial, false);

        let weak = Rc::downgrade(&core);
        let history_subscription = core.history.on_change(Box::new(move |location| {
            if let Some(core) = weak.upgrade() {
                core.on_location_changed(location, true);
            }
        }));
        core.history_subscription.set(Some(history_subscription));

        Ok(Self { core })
    }

    /// The machine adapter, for sending application events.
    pub fn machine(&self) -> &Rc<M> {
        &self.core.machine
    }

    /// The history adapter.
    pub fn history(&self) -> &Rc<H> {
        &self.core.history
    }

    /// The route table in use.
    pub fn routes(&self) -> &RouteTable {
        &self.core.routes
    }

    /// Snapshot of the machine's active leaf path.
    pub fn active_leaf(&self) -> StatePath {
        self.core.machine.active_leaf()
    }

    /// The current location.
    pub fn location(&self) -> Location {
        self.core.history.location()
    }

    /// Parameters extracted by the most recent location match. Available
    /// for downstream consumers; the synchronizer itself never reads
    /// them.
    pub fn params(&self) -> Params {
        self.core.params.borrow().clone()
    }

    /// Tear down: unsubscribe from both adapters, then stop the machine.
    /// Both unsubscriptions happen before either adapter is otherwise
    /// touched, so neither side can notify a half-torn-down synchronizer.
    /// Idempotent.
    pub fn close(&self) {
        let machine_subscription = self.core.machine_subscription.take();
        let history_subscription = self.core.history_subscription.take();
        if machine_subscription.is_none() && history_subscription.is_none() {
            return;
        }
        if let Some(id) = machine_subscription {
            self.core.machine.unsubscribe(id);
        }
        if let Some(id) = history_subscription {
            self.core.history.unsubscribe(id);
        }
        self.core.machine.stop();
    }
}

impl<M: MachineAdapter + 'static, H: HistoryAdapter + 'static> Drop for RouterSync<M, H> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Batteries-included router: a reference [`Interpreter`] synchronized
/// with a history adapter.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use waypoint::builder::{MachineBuilder, StateNodeBuilder};
/// use waypoint::core::{StatePath, Transition};
/// use waypoint::history::MemoryHistory;
/// use waypoint::sync::Router;
///
/// let definition = MachineBuilder::new()
///     .initial("home")
///     .on("GoAbout", Transition::relative("about"))
///     .state(StateNodeBuilder::new("home").route("/"))
///     .state(StateNodeBuilder::new("about").route("/about"))
///     .build()
///     .unwrap();
///
/// let history = Rc::new(MemoryHistory::new("/about"));
/// let router = Router::start(definition, history).unwrap();
///
/// // The startup location drove the machine.
/// assert_eq!(router.active_leaf(), StatePath::parse("about"));
///
/// // An application event drives the location.
/// router.send("GoAbout");
/// assert_eq!(router.location().path, "/about");
/// ```
pub struct Router<H: HistoryAdapter + 'static> {
    sync: RouterSync<Interpreter, H>,
}

impl<H: HistoryAdapter + 'static> Router<H> {
    /// Build the route table, register the routing events, start an
    /// interpreter, and attach the synchronizer.
    pub fn start(mut definition: MachineDefinition, history: Rc<H>) -> Result<Self, RouterError> {
        ensure_unreserved_events(&definition)?;
        let routes = RouteTable::from_definition(&definition)?;
        register_routing_events(&mut definition, &routes);
        let machine = Rc::new(Interpreter::new(definition)?);
        let sync = RouterSync::attach(machine, history, routes)?;
        Ok(Self { sync })
    }

    /// Dispatch an application event to the machine.
    pub fn send(&self, event: &str) -> bool {
        self.sync.machine().send(event)
    }

    /// The underlying synchronizer.
    pub fn sync(&self) -> &RouterSync<Interpreter, H> {
        &self.sync
    }

    /// The live interpreter handle.
    pub fn machine(&self) -> &Rc<Interpreter> {
        self.sync.machine()
    }

    /// Snapshot of the machine's active leaf path.
    pub fn active_leaf(&self) -> StatePath {
        self.sync.active_leaf()
    }

    /// The current location.
    pub fn location(&self) -> Location {
        self.sync.location()
    }

    /// Parameters extracted by the most recent location match.
    pub fn params(&self) -> Params {
        self.sync.params()
    }

    /// Tear the synchronizer down. Also happens on drop.
    pub fn close(&self) {
        self.sync.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{MachineBuilder, StateNodeBuilder};
    use crate::core::Transition;
    use crate::history::MemoryHistory;

    /// The demo machine: a routable home, a routable sibling, a
    /// composite with a routable initial child, and a wildcard.
    fn demo() -> MachineDefinition {
        MachineBuilder::new()
            .initial("home")
            .on("GoAbout", Transition::relative("about"))
            .on("GoHidden", Transition::relative("hidden"))
            .state(StateNodeBuilder::new("home").route("/"))
            .state(StateNodeBuilder::new("about").route("/about"))
            .state(
                StateNodeBuilder::new("substate")
                    .route("/substate")
                    .initial("a")
                    .child(StateNodeBuilder::new("a").route("/substate/a"))
                    .child(StateNodeBuilder::new("b")),
            )
            .state(StateNodeBuilder::new("hidden"))
            .state(StateNodeBuilder::new("noMatch").route("*"))
            .build()
            .unwrap()
    }

    fn mounted(path: &str) -> (Router<MemoryHistory>, Rc<MemoryHistory>) {
        let history = Rc::new(MemoryHistory::new(path));
        let router = Router::start(demo(), Rc::clone(&history)).unwrap();
        (router, history)
    }

    #[test]
    fn entering_a_route_updates_the_state() {
        let (router, _history) = mounted("/about");
        assert_eq!(router.active_leaf(), StatePath::parse("about"));
    }

    #[test]
    fn entering_a_parent_route_settles_and_corrects_the_url() {
        let (router, history) = mounted("/substate");

        assert_eq!(router.active_leaf(), StatePath::parse("substate.a"));
        assert_eq!(router.location().path, "/substate/a");
        // Corrected by replace: mounting never creates a history entry.
        assert_eq!(history.entries(), ["/substate/a"]);
    }

    #[test]
    fn entering_a_routable_state_pushes_the_route() {
        let (router, history) = mounted("/");

        assert!(router.send("GoAbout"));

        assert_eq!(router.active_leaf(), StatePath::parse("about"));
        assert_eq!(router.location().path, "/about");
        assert_eq!(history.entries(), ["/", "/about"]);
    }

    #[test]
    fn going_back_updates_the_state_without_a_new_push() {
        let (router, history) = mounted("/");
        router.send("GoAbout");

        history.back();

        assert_eq!(router.active_leaf(), StatePath::parse("home"));
        // Both entries retained; the cursor moved, nothing was pushed.
        assert_eq!(history.entries(), ["/", "/about"]);
        assert_eq!(history.position(), 0);
    }

    #[test]
    fn consistent_mount_touches_neither_side() {
        let (router, history) = mounted("/");

        assert_eq!(router.active_leaf(), StatePath::parse("home"));
        assert_eq!(history.entries(), ["/"]);
        // No send happened: the interpreter handled nothing.
        assert_eq!(router.machine().log().records().len(), 0);
    }

    #[test]
    fn one_navigation_causes_at_most_one_machine_call() {
        let (router, history) = mounted("/");
        router.send("GoAbout");
        let transitions_before = router.machine().log().records().len();
        let entries_before = history.entries().len();

        history.back();

        // Exactly one forced transition, no history mutation.
        assert_eq!(
            router.machine().log().records().len(),
            transitions_before + 1
        );
        assert_eq!(history.entries().len(), entries_before);
    }

    #[test]
    fn one_event_causes_at_most_one_history_call() {
        let (router, history) = mounted("/");
        let transitions_before = router.machine().log().records().len();

        router.send("GoAbout");

        // Exactly one push, and the push's echo forced nothing back.
        assert_eq!(history.entries(), ["/", "/about"]);
        assert_eq!(
            router.machine().log().records().len(),
            transitions_before + 1
        );
    }

    #[test]
    fn self_transition_to_current_route_does_not_push() {
        let (router, history) = mounted("/about");

        router.send("GoAbout");

        assert_eq!(history.entries(), ["/about"]);
        assert_eq!(router.location().path, "/about");
    }

    #[test]
    fn transition_to_non_routable_state_leaves_the_url() {
        let (router, history) = mounted("/");

        router.send("GoHidden");

        assert_eq!(router.active_leaf(), StatePath::parse("hidden"));
        assert_eq!(router.location().path, "/");
        assert_eq!(history.entries(), ["/"]);
    }

    #[test]
    fn wildcard_absorbs_unknown_paths_without_correction() {
        let (router, history) = mounted("/no/such/path");

        assert_eq!(router.active_leaf(), StatePath::parse("noMatch"));
        // Landed exactly on the wildcard node: nothing to correct.
        assert_eq!(router.location().path, "/no/such/path");
        assert_eq!(history.entries(), ["/no/such/path"]);
    }

    #[test]
    fn unmatched_path_without_wildcard_is_a_no_op() {
        let definition = MachineBuilder::new()
            .initial("home")
            .state(StateNodeBuilder::new("home").route("/"))
            .build()
            .unwrap();
        let history = Rc::new(MemoryHistory::new("/unknown"));
        let router = Router::start(definition, Rc::clone(&history)).unwrap();

        assert_eq!(router.active_leaf(), StatePath::parse("home"));
        assert_eq!(history.entries(), ["/unknown"]);
    }

    #[test]
    fn navigating_after_mount_settles_through_replace() {
        let (router, history) = mounted("/");

        history.push("/substate");

        assert_eq!(router.active_leaf(), StatePath::parse("substate.a"));
        assert_eq!(router.location().path, "/substate/a");
        // The pushed entry was corrected in place, not followed by
        // another push.
        assert_eq!(history.entries(), ["/", "/substate/a"]);
    }

    #[test]
    fn params_are_exposed_for_downstream_consumers() {
        let definition = MachineBuilder::new()
            .initial("user")
            .state(StateNodeBuilder::new("user").route("/users/:id"))
            .build()
            .unwrap();
        let history = Rc::new(MemoryHistory::new("/users/7"));
        let router = Router::start(definition, history).unwrap();

        assert_eq!(router.params()["id"], "7");
    }

    #[test]
    fn reserved_user_events_fail_construction() {
        let definition = MachineBuilder::new()
            .initial("home")
            .on("@route/home", Transition::relative("home"))
            .state(StateNodeBuilder::new("home").route("/"))
            .build()
            .unwrap();

        let result = Router::start(definition, Rc::new(MemoryHistory::new("/")));
        assert!(matches!(result, Err(RouterError::Definition(_))));
    }

    #[test]
    fn duplicate_routes_fail_construction() {
        let definition = MachineBuilder::new()
            .initial("a")
            .state(StateNodeBuilder::new("a").route("/same"))
            .state(StateNodeBuilder::new("b").route("/same"))
            .build()
            .unwrap();

        let result = Router::start(definition, Rc::new(MemoryHistory::new("/")));
        assert!(matches!(result, Err(RouterError::Route(_))));
    }

    #[test]
    fn close_detaches_both_directions() {
        let (router, history) = mounted("/");
        router.close();

        history.push("/about");
        assert_eq!(router.active_leaf(), StatePath::parse("home"));

        // The machine is stopped and the history subscription is gone.
        assert!(!router.send("GoAbout"));
        assert_eq!(history.entries(), ["/", "/about"]);
    }

    #[test]
    fn close_is_idempotent() {
        let (router, _history) = mounted("/");
        router.close();
        router.close();
    }

    #[test]
    fn dropping_the_router_detaches_the_history() {
        let history = Rc::new(MemoryHistory::new("/"));
        {
            let router = Router::start(demo(), Rc::clone(&history)).unwrap();
            router.send("GoAbout");
        }

        // No synchronizer left; navigating must not panic or resurrect it.
        history.back();
        assert_eq!(history.entries(), ["/", "/about"]);
    }
}
