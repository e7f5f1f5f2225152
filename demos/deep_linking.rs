//! Deep Linking Walkthrough
//!
//! This example demonstrates the full synchronization loop:
//! - Mounting at a deep link drives the machine to the matching state
//! - A parent route settles on its initial child and corrects the URL
//! - Machine transitions push history entries; back drives the machine
//!
//! Run with: cargo run --example deep_linking

use std::rc::Rc;
use waypoint::builder::{MachineBuilder, StateNodeBuilder};
use waypoint::core::Transition;
use waypoint::history::{HistoryAdapter, MemoryHistory};
use waypoint::sync::Router;

fn main() {
    println!("=== Deep Linking Walkthrough ===\n");

    let definition = MachineBuilder::new()
        .initial("home")
        .on("GoAbout", Transition::relative("about"))
        .state(StateNodeBuilder::new("home").route("/"))
        .state(StateNodeBuilder::new("about").route("/about"))
        .state(
            StateNodeBuilder::new("docs")
                .route("/docs")
                .initial("intro")
                .child(StateNodeBuilder::new("intro").route("/docs/intro"))
                .child(StateNodeBuilder::new("reference")),
        )
        .state(StateNodeBuilder::new("notFound").route("*"))
        .build()
        .unwrap();

    // Mount at a parent route: the machine settles on `docs.intro` and
    // the URL is corrected in place, without adding a history entry.
    let history = Rc::new(MemoryHistory::new("/docs"));
    let router = Router::start(definition, Rc::clone(&history)).unwrap();

    println!("Mounted at /docs:");
    println!("  active state: {}", router.active_leaf());
    println!("  location:     {}", router.location().path);
    println!("  entries:      {:?}\n", history.entries());

    // A machine-driven transition pushes a new entry.
    router.send("GoAbout");
    println!("After GoAbout:");
    println!("  active state: {}", router.active_leaf());
    println!("  entries:      {:?}\n", history.entries());

    // Back drives the machine without pushing anything further.
    history.back();
    println!("After back:");
    println!("  active state: {}", router.active_leaf());
    println!("  entries:      {:?}\n", history.entries());

    // Unknown paths fall through to the wildcard route.
    history.push("/no/such/page");
    println!("After navigating to /no/such/page:");
    println!("  active state: {}", router.active_leaf());
    println!("  location:     {}", router.location().path);

    println!("\n=== Example Complete ===");
}
