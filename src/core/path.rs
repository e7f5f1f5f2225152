//! Normalized state-path representation.
//!
//! A machine position is always handled as a [`StatePath`]: the ordered
//! sequence of node names from the root down to one node. Depth-polymorphic
//! shapes (a bare name for a top-level state, a nested value for a deep one)
//! are normalized into this single form at the adapter boundary, so nothing
//! past the boundary needs to branch on shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when rendering a path as a single string.
pub const PATH_SEPARATOR: char = '.';

/// Ordered node names from the machine root to one node.
///
/// The empty path denotes the root itself. Paths are plain values:
/// cloneable, comparable, serializable.
///
/// # Example
///
/// ```rust
/// use waypoint::core::StatePath;
///
/// let leaf = StatePath::parse("substate.a");
/// let parent = StatePath::parse("substate");
///
/// assert!(leaf.starts_with(&parent));
/// assert_eq!(leaf.parent(), Some(parent));
/// assert_eq!(leaf.to_string(), "substate.a");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct StatePath(Vec<String>);

impl StatePath {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from individual segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dot-separated path string. The empty string is the root.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(dotted.split(PATH_SEPARATOR).map(str::to_string).collect())
    }

    /// The path's segments in root-to-leaf order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments. The root has depth zero.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The last segment, if any.
    pub fn leaf_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Extend the path by one child name.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Whether this path equals `prefix` or descends from it.
    ///
    /// Every path starts with the root.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// Iterate this path and each of its ancestors, deepest first,
    /// ending with the root.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = StatePath> + '_ {
        (0..=self.0.len())
            .rev()
            .map(move |depth| Self(self.0[..depth].to_vec()))
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        let root = StatePath::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.to_string(), "");
        assert!(root.parent().is_none());
        assert!(root.leaf_name().is_none());
    }

    #[test]
    fn parse_round_trips_through_display() {
        let path = StatePath::parse("substate.a");
        assert_eq!(path.segments(), ["substate", "a"]);
        assert_eq!(path.to_string(), "substate.a");
        assert_eq!(StatePath::parse(&path.to_string()), path);
    }

    #[test]
    fn parse_empty_string_is_root() {
        assert_eq!(StatePath::parse(""), StatePath::root());
    }

    #[test]
    fn child_extends_path() {
        let path = StatePath::parse("substate").child("a");
        assert_eq!(path, StatePath::parse("substate.a"));
    }

    #[test]
    fn parent_drops_last_segment() {
        let path = StatePath::parse("substate.a");
        assert_eq!(path.parent(), Some(StatePath::parse("substate")));
        assert_eq!(StatePath::parse("substate").parent(), Some(StatePath::root()));
    }

    #[test]
    fn starts_with_accepts_self_and_ancestors() {
        let leaf = StatePath::parse("substate.a");
        assert!(leaf.starts_with(&leaf));
        assert!(leaf.starts_with(&StatePath::parse("substate")));
        assert!(leaf.starts_with(&StatePath::root()));
    }

    #[test]
    fn starts_with_rejects_siblings_and_descendants() {
        let path = StatePath::parse("substate");
        assert!(!path.starts_with(&StatePath::parse("about")));
        assert!(!path.starts_with(&StatePath::parse("substate.a")));
        // A shared prefix string is not a shared segment prefix.
        assert!(!StatePath::parse("subst").starts_with(&path));
    }

    #[test]
    fn ancestors_run_deepest_first() {
        let leaf = StatePath::parse("substate.a");
        let chain: Vec<String> = leaf.ancestors_and_self().map(|p| p.to_string()).collect();
        assert_eq!(chain, ["substate.a", "substate", ""]);
    }

    #[test]
    fn path_serializes_correctly() {
        let path = StatePath::parse("substate.a");
        let json = serde_json::to_string(&path).unwrap();
        let deserialized: StatePath = serde_json::from_str(&json).unwrap();
        assert_eq!(path, deserialized);
    }
}
