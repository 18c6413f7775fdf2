//! Simple standalone example of position id usage.
//!
//! Two users edit the same list concurrently; position keys decide the merged
//! order without any coordination.
//!
//! Run with: cargo run --example simple

use crdt_position::{IdGenerator, PositionedList};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Simple Position Id Example ===\n");

    // Create two replicas representing two users
    let alice = PositionedList::new(IdGenerator::new(1));
    let bob = PositionedList::new(IdGenerator::new(2));

    println!("Alice (store 1) and Bob (store 2) start editing a document\n");

    println!("Alice types 'Hello':");
    for ch in "Hello".chars() {
        alice.push(ch).unwrap();
    }
    println!("  Alice's document: '{}'", text(&alice));

    println!("\nBob concurrently types 'World!':");
    for ch in "World!".chars() {
        bob.push(ch).unwrap();
    }
    println!("  Bob's document: '{}'", text(&bob));

    println!("\n--- Synchronizing Changes ---");
    for element in bob.elements() {
        alice.apply_remote(element);
    }
    for element in alice.elements() {
        bob.apply_remote(element);
    }

    println!("  Alice sees: '{}'", text(&alice));
    println!("  Bob sees:   '{}'", text(&bob));

    if text(&alice) == text(&bob) {
        println!("\n✓ SUCCESS: Both users converged to the same document!");
    } else {
        println!("\n✗ ERROR: Documents did not converge!");
    }

    println!("\n--- Position Keys ---");
    for element in alice.elements() {
        let triplets: Vec<String> = element
            .id
            .triplets()
            .map(|t| format!("(path={}, version={}, store={})", t.path, t.version, t.store))
            .collect();
        println!("  '{}' -> {}", element.value, triplets.join(" "));
    }

    println!("\n=== Deletion Example ===");
    let removed = alice.delete_at(0).unwrap();
    println!("Alice deletes the first character");
    for element in alice.elements() {
        if element.id == removed {
            bob.apply_remote(element);
        }
    }
    println!("  Alice's document: '{}'", text(&alice));
    println!("  Bob's document:   '{}'", text(&bob));
}

fn text(list: &PositionedList<char>) -> String {
    list.values().into_iter().collect()
}
