//! Core routing types and logic.
//!
//! This module contains the pure core of the synchronization engine:
//! - Normalized state paths via [`StatePath`]
//! - Machine definitions and their validation
//! - Guard predicates for transition control
//! - URL pattern compilation and the ordered route table
//!
//! Everything here is pure and side-effect free; the imperative pieces
//! (interpreter, history, synchronizer) live in their own modules.

mod definition;
mod guard;
mod path;
mod pattern;
mod route;

pub use definition::{
    DefinitionError, MachineDefinition, StateNode, Transition, TransitionTarget,
};
pub use guard::Guard;
pub use path::{StatePath, PATH_SEPARATOR};
pub use pattern::{Params, UrlPattern};
pub use route::{RouteEntry, RouteError, RouteMatch, RouteTable};
