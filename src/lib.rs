//! Waypoint: bidirectional synchronization between hierarchical state
//! machines and navigable locations.
//!
//! A machine definition declares, per state node, an optional URL
//! pattern. Waypoint extracts the ordered route table from the tree,
//! registers one reserved routing event per routable node (so any nested
//! state can be reached regardless of the active branch), and then keeps
//! the two sides consistent for the synchronizer's lifetime: entering a
//! URL drives the machine to the matching state, and transitioning to a
//! routable state updates the URL.
//!
//! # Core Concepts
//!
//! - **Route table**: pre-order `(state path, URL pattern)` entries;
//!   declaration order is match priority
//! - **Routing events**: synthetic events with unconditional absolute
//!   targets, the lever that jumps a hierarchical machine anywhere
//! - **Suppression flags**: directional single-shot markers that keep the
//!   two synchronous, reentrant notification loops from feeding back
//!
//! The engine is single-threaded and fully synchronous; adapters invoke
//! their subscribers on the calling stack.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use waypoint::builder::{MachineBuilder, StateNodeBuilder};
//! use waypoint::core::{StatePath, Transition};
//! use waypoint::history::MemoryHistory;
//! use waypoint::sync::Router;
//!
//! let definition = MachineBuilder::new()
//!     .initial("home")
//!     .on("GoAbout", Transition::relative("about"))
//!     .state(StateNodeBuilder::new("home").route("/"))
//!     .state(StateNodeBuilder::new("about").route("/about"))
//!     .state(
//!         StateNodeBuilder::new("substate")
//!             .route("/substate")
//!             .initial("a")
//!             .child(StateNodeBuilder::new("a").route("/substate/a"))
//!             .child(StateNodeBuilder::new("b")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! // Deep link: mounting at a parent route settles on its initial child
//! // and corrects the URL in place.
//! let history = Rc::new(MemoryHistory::new("/substate"));
//! let router = Router::start(definition, Rc::clone(&history)).unwrap();
//!
//! assert_eq!(router.active_leaf(), StatePath::parse("substate.a"));
//! assert_eq!(router.location().path, "/substate/a");
//!
//! // A state-driven transition pushes; back drives the machine again.
//! router.send("GoAbout");
//! assert_eq!(router.location().path, "/about");
//! history.back();
//! assert_eq!(router.active_leaf(), StatePath::parse("substate.a"));
//! ```

pub mod builder;
pub mod core;
pub mod history;
pub mod machine;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{MachineDefinition, Params, RouteTable, StateNode, StatePath, Transition};
pub use history::{HistoryAdapter, Location, MemoryHistory, NavigationKind};
pub use machine::{Interpreter, MachineAdapter, SubscriptionId};
pub use sync::{Router, RouterError, RouterSync};
