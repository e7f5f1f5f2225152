//! The opaque-interpreter contract consumed by the synchronizer.
//!
//! The synchronizer depends on nothing beyond this trait: how transitions
//! are evaluated internally is the implementation's business. The one
//! behavioral requirement is synchrony: `send` must invoke every
//! subscribed transition callback before it returns, reentrantly, on the
//! calling stack.

use crate::core::StatePath;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by machine adapters.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Interpreter is already running")]
    AlreadyStarted,

    #[error("Interpreter has been stopped")]
    Stopped,
}

/// Opaque token identifying one subscription; pass it back to
/// `unsubscribe` to cancel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Mint a fresh unique token. Adapter implementations call this when
    /// registering a subscriber.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Callback invoked with the new active leaf path after each handled
/// event.
pub type TransitionCallback = Box<dyn Fn(&StatePath)>;

/// A running hierarchical state machine, seen from the outside.
pub trait MachineAdapter {
    /// Begin executing. Fails if the machine is already running or was
    /// stopped.
    fn start(&self) -> Result<(), MachineError>;

    /// Dispatch an event by name. Returns whether any active node handled
    /// it. All transition subscribers are invoked synchronously before
    /// this returns.
    fn send(&self, event: &str) -> bool;

    /// Snapshot of the deepest active state's full path.
    fn active_leaf(&self) -> StatePath;

    /// Subscribe to transitions. The callback fires on every handled
    /// event, including self-transitions.
    fn on_transition(&self, callback: TransitionCallback) -> SubscriptionId;

    /// Cancel a subscription. Unknown tokens are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Stop executing. Idempotent; a stopped machine ignores events.
    fn stop(&self);
}
