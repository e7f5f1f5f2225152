//! The route table: ordered associations between state paths and URL
//! patterns.
//!
//! The table is derived from a machine definition in one pre-order walk
//! and never changes afterward. Order is significant: it is the match
//! priority for incoming paths, so a wildcard catch-all must be declared
//! after the specific routes it would otherwise shadow.

use super::definition::MachineDefinition;
use super::path::StatePath;
use super::pattern::{Params, UrlPattern};
use thiserror::Error;

/// Errors detected while building the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("State '{state}' declares an empty route pattern")]
    EmptyPattern { state: String },

    #[error("Route pattern '{pattern}' is declared by both '{first}' and '{second}'")]
    DuplicatePattern {
        pattern: String,
        first: String,
        second: String,
    },
}

/// One routable state: an absolute state path and its compiled pattern.
#[derive(Clone, Debug)]
pub struct RouteEntry {
    state_path: StatePath,
    pattern: UrlPattern,
}

impl RouteEntry {
    /// The routable node's absolute path.
    pub fn state_path(&self) -> &StatePath {
        &self.state_path
    }

    /// The node's compiled URL pattern.
    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }
}

/// A successful URL-to-state lookup.
#[derive(Clone, Debug)]
pub struct RouteMatch<'a> {
    /// The first table entry whose pattern matched.
    pub entry: &'a RouteEntry,
    /// Parameters extracted by the pattern's `:name` segments.
    pub params: Params,
}

/// The ordered route table extracted from a machine definition.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::{MachineBuilder, StateNodeBuilder};
/// use waypoint::core::{RouteTable, StatePath};
///
/// let definition = MachineBuilder::new()
///     .initial("home")
///     .state(StateNodeBuilder::new("home").route("/"))
///     .state(StateNodeBuilder::new("about").route("/about"))
///     .build()
///     .unwrap();
///
/// let table = RouteTable::from_definition(&definition).unwrap();
/// let matched = table.find("/about").unwrap();
/// assert_eq!(matched.entry.state_path(), &StatePath::parse("about"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Walk the definition in pre-order and collect every node declaring
    /// a route. Duplicate pattern strings are a configuration error:
    /// priority between identical patterns would be meaningless.
    pub fn from_definition(definition: &MachineDefinition) -> Result<Self, RouteError> {
        let mut entries: Vec<RouteEntry> = Vec::new();
        for (path, node) in definition.nodes() {
            let Some(raw) = node.route() else {
                continue;
            };
            if raw.is_empty() {
                return Err(RouteError::EmptyPattern {
                    state: path.to_string(),
                });
            }
            if let Some(existing) = entries.iter().find(|entry| entry.pattern.raw() == raw) {
                return Err(RouteError::DuplicatePattern {
                    pattern: raw.to_string(),
                    first: existing.state_path.to_string(),
                    second: path.to_string(),
                });
            }
            entries.push(RouteEntry {
                state_path: path,
                pattern: UrlPattern::compile(raw),
            });
        }
        Ok(Self { entries })
    }

    /// All entries in priority order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Match an incoming path against the table, first match wins.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path)
                .map(|params| RouteMatch { entry, params })
        })
    }

    /// The entry for an exact state path, if that node is routable.
    pub fn entry_for(&self, state_path: &StatePath) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.state_path == state_path)
    }

    /// The nearest routable ancestor-or-self of a leaf path. This is the
    /// state-to-URL direction: a transition into a non-routable node maps
    /// to the closest enclosing routable node, or nothing.
    pub fn route_for(&self, leaf: &StatePath) -> Option<&RouteEntry> {
        leaf.ancestors_and_self()
            .find_map(|path| self.entry_for(&path))
    }
}
