//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the active leaf path. A guard
//! that rejects the current leaf lets handler lookup continue bubbling
//! toward the root instead of taking the transition.

use super::path::StatePath;
use std::fmt;
use std::rc::Rc;

/// Pure predicate that determines whether a transition may be taken.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Guard, StatePath};
///
/// // Only allow the transition while somewhere under `draft`.
/// let in_draft = Guard::new(|leaf: &StatePath| {
///     leaf.starts_with(&StatePath::parse("draft"))
/// });
///
/// assert!(in_draft.check(&StatePath::parse("draft.editing")));
/// assert!(!in_draft.check(&StatePath::parse("published")));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Rc<dyn Fn(&StatePath) -> bool>,
}

impl Guard {
    /// Create a guard from a pure predicate over the active leaf path.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&StatePath) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Evaluate the predicate against the active leaf path.
    pub fn check(&self, leaf: &StatePath) -> bool {
        (self.predicate)(leaf)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_allows_matching_leaves() {
        let guard = Guard::new(|leaf: &StatePath| leaf.leaf_name() == Some("a"));

        assert!(guard.check(&StatePath::parse("substate.a")));
        assert!(!guard.check(&StatePath::parse("substate.b")));
    }

    #[test]
    fn guard_is_deterministic() {
        let leaf = StatePath::parse("home");
        let guard = Guard::new(|l: &StatePath| l.depth() == 1);

        assert_eq!(guard.check(&leaf), guard.check(&leaf));
    }

    #[test]
    fn guard_clones_share_the_predicate() {
        let guard = Guard::new(|leaf: &StatePath| leaf.is_root());
        let cloned = guard.clone();

        assert_eq!(
            guard.check(&StatePath::root()),
            cloned.check(&StatePath::root())
        );
    }
}
