//! The navigation-provider contract consumed by the synchronizer.
//!
//! A history adapter owns the back/forward stack and the current
//! location; the synchronizer only pushes, replaces, and listens. Like
//! the machine side, notification is synchronous and reentrant: `push`
//! and `replace` invoke every subscriber before returning.

mod memory;

pub use memory::MemoryHistory;

use crate::machine::SubscriptionId;
use serde::{Deserialize, Serialize};

/// How a location was reached.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// A new entry was appended to the stack.
    Push,
    /// The current entry was overwritten in place.
    Replace,
    /// The cursor moved across existing entries (back/forward).
    Pop,
}

/// A navigable location: the path plus how it was reached.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub kind: NavigationKind,
}

impl Location {
    pub fn new(path: impl Into<String>, kind: NavigationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Callback invoked with the new location after each navigation.
pub type LocationCallback = Box<dyn Fn(&Location)>;

/// A navigable location provider, seen from the outside.
pub trait HistoryAdapter {
    /// The current location.
    fn location(&self) -> Location;

    /// Append a new entry and move to it. A genuine navigation: it is
    /// separately reachable via back.
    fn push(&self, path: &str);

    /// Overwrite the current entry in place, without adding one.
    fn replace(&self, path: &str);

    /// Subscribe to location changes. All subscribers are invoked
    /// synchronously by `push`/`replace` and by cursor movement.
    fn on_change(&self, callback: LocationCallback) -> SubscriptionId;

    /// Cancel a subscription. Unknown tokens are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_serializes_with_lowercase_kind() {
        let location = Location::new("/about", NavigationKind::Push);
        let json = serde_json::to_string(&location).unwrap();
        assert!(json.contains("\"push\""));

        let deserialized: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, location);
    }
}
