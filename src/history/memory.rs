//! In-memory history: an entry stack with a cursor.
//!
//! The reference [`HistoryAdapter`] implementation, suitable for tests
//! and for hosts without a real navigation bar. Back and forward move a
//! cursor over retained entries; pushing with forward entries present
//! discards them, the way browser history does.

use super::{HistoryAdapter, Location, LocationCallback, NavigationKind};
use crate::machine::SubscriptionId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// An in-memory back/forward stack.
///
/// # Example
///
/// ```rust
/// use waypoint::history::{HistoryAdapter, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/about");
/// assert_eq!(history.location().path, "/about");
///
/// history.back();
/// assert_eq!(history.location().path, "/");
/// ```
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    cursor: Cell<usize>,
    kind: Cell<NavigationKind>,
    subscribers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(&Location)>)>>,
}

impl MemoryHistory {
    /// Create a history whose single entry is `initial`. The initial
    /// location reads as a `Pop`, like a freshly opened document.
    pub fn new(initial: &str) -> Self {
        Self {
            entries: RefCell::new(vec![initial.to_string()]),
            cursor: Cell::new(0),
            kind: Cell::new(NavigationKind::Pop),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Index of the current entry.
    pub fn position(&self) -> usize {
        self.cursor.get()
    }

    /// Move one entry back, if any. No-op at the oldest entry.
    pub fn back(&self) {
        let cursor = self.cursor.get();
        if cursor == 0 {
            return;
        }
        self.cursor.set(cursor - 1);
        self.kind.set(NavigationKind::Pop);
        self.notify();
    }

    /// Move one entry forward, if any. No-op at the newest entry.
    pub fn forward(&self) {
        let cursor = self.cursor.get();
        if cursor + 1 >= self.entries.borrow().len() {
            return;
        }
        self.cursor.set(cursor + 1);
        self.kind.set(NavigationKind::Pop);
        self.notify();
    }

    fn notify(&self) {
        let location = self.location();
        // Snapshot first: callbacks may subscribe or unsubscribe while we
        // are iterating.
        let callbacks: Vec<Rc<dyn Fn(&Location)>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&location);
        }
    }
}

impl HistoryAdapter for MemoryHistory {
    fn location(&self) -> Location {
        let path = self.entries.borrow()[self.cursor.get()].clone();
        Location::new(path, self.kind.get())
    }

    fn push(&self, path: &str) {
        {
            let mut entries = self.entries.borrow_mut();
            let cursor = self.cursor.get();
            entries.truncate(cursor + 1);
            entries.push(path.to_string());
            self.cursor.set(cursor + 1);
        }
        self.kind.set(NavigationKind::Push);
        self.notify();
    }

    fn replace(&self, path: &str) {
        {
            let mut entries = self.entries.borrow_mut();
            let cursor = self.cursor.get();
            entries[cursor] = path.to_string();
        }
        self.kind.set(NavigationKind::Replace);
        self.notify();
    }

    fn on_change(&self, callback: LocationCallback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscribers.borrow_mut().push((id, Rc::from(callback)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscription, _)| *subscription != id);
    }
}
