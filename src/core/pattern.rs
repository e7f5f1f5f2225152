//! URL pattern compilation and matching.
//!
//! Patterns are segment-oriented: literal segments must match exactly,
//! `:name` segments capture one non-empty path segment as a named
//! parameter, and the `*` pattern is a catch-all that matches any path.
//! Each pattern is compiled once, when the route table is built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named parameters extracted from a matched path.
pub type Params = BTreeMap<String, String>;

#[derive(Clone, PartialEq, Eq, Debug)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A URL pattern compiled into matchable segments.
///
/// # Example
///
/// ```rust
/// use waypoint::core::UrlPattern;
///
/// let pattern = UrlPattern::compile("/users/:id");
/// let params = pattern.matches("/users/42").unwrap();
/// assert_eq!(params["id"], "42");
/// assert!(pattern.matches("/users").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct UrlPattern {
    raw: String,
    wildcard: bool,
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Compile a pattern string.
    ///
    /// `*` compiles to the catch-all. Anything else is split on `/`;
    /// segments beginning with `:` capture a parameter named by the rest
    /// of the segment.
    pub fn compile(raw: &str) -> Self {
        if raw == "*" {
            return Self {
                raw: raw.to_string(),
                wildcard: true,
                segments: Vec::new(),
            };
        }
        let segments = split_segments(raw)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: raw.to_string(),
            wildcard: false,
            segments,
        }
    }

    /// The pattern exactly as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this is the `*` catch-all.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Match a concrete path against this pattern.
    ///
    /// Returns the extracted parameters on a match (empty for patterns
    /// without `:name` segments), or `None` when the path does not match.
    pub fn matches(&self, path: &str) -> Option<Params> {
        if self.wildcard {
            return Some(Params::new());
        }
        let path_segments: Vec<&str> = split_segments(path).collect();
        if path_segments.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (pattern_segment, path_segment) in self.segments.iter().zip(&path_segments) {
            match pattern_segment {
                Segment::Literal(literal) if literal == path_segment => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*path_segment).to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Debug for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UrlPattern({:?})", self.raw)
    }
}

impl From<UrlPattern> for String {
    fn from(pattern: UrlPattern) -> Self {
        pattern.raw
    }
}

impl From<String> for UrlPattern {
    fn from(raw: String) -> Self {
        Self::compile(&raw)
    }
}

/// Split a path or pattern into its non-empty `/`-separated segments.
/// `/`, the empty string, and trailing slashes all normalize the same way.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
