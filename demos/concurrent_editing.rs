//! Concurrent editing example.
//!
//! Several replicas hammer the same spot of a shared list from their own
//! threads, then exchange elements over a JSON "wire" and converge.
//!
//! Run with: cargo run --example concurrent_editing

use crdt_position::{GeneratorConfig, IdGenerator, PositionedList};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Concurrent Position Id Example ===\n");

    prepend_storm_demo();
    println!();
    conflict_resolution_demo();
}

/// Every replica keeps inserting at the very front of its own copy.
fn prepend_storm_demo() {
    println!("--- Prepend Storm ---");

    let num_replicas = 4u32;
    let ops_per_replica = 250usize;
    let start = Instant::now();

    let replicas: Vec<Arc<PositionedList<u32>>> = (1..=num_replicas)
        .map(|store| Arc::new(PositionedList::new(IdGenerator::new(store))))
        .collect();

    let handles: Vec<_> = replicas
        .iter()
        .map(|replica| {
            let replica = Arc::clone(replica);
            thread::spawn(move || {
                for i in 0..ops_per_replica {
                    replica.insert_at(0, i as u32).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let deepest = replicas
        .iter()
        .flat_map(|r| r.ids())
        .map(|id| id.depth())
        .max()
        .unwrap_or(0);
    info!(
        replicas = num_replicas,
        ops = ops_per_replica,
        deepest,
        elapsed = ?start.elapsed(),
        "prepend storm finished"
    );
    println!("Deepest key after {ops_per_replica} prepends per replica: {deepest} triplets");

    sync_all(&replicas);
    report_convergence(&replicas);
}

/// All replicas insert into the same gap with identical random streams.
fn conflict_resolution_demo() {
    println!("--- Same Gap, Same Randomness ---");

    let replicas: Vec<Arc<PositionedList<char>>> = (1..=3)
        .map(|store| {
            let config = GeneratorConfig::new(store).with_seed(7);
            let generator = IdGenerator::from_config(&config).unwrap();
            Arc::new(PositionedList::new(generator))
        })
        .collect();

    for (replica, word) in replicas.iter().zip(["abc", "xyz", "123"]) {
        for ch in word.chars() {
            replica.push(ch).unwrap();
        }
    }

    sync_all(&replicas);
    report_convergence(&replicas);

    let merged: String = replicas[0].values().into_iter().collect();
    println!("Merged document: '{merged}'");
    println!("Identical paths are separated by store id, so no two keys collide.");
}

/// Ships every element of every replica to every other replica as JSON.
fn sync_all<T>(replicas: &[Arc<PositionedList<T>>])
where
    T: Clone + Send + Sync + serde::Serialize + serde::de::DeserializeOwned + 'static,
{
    let payloads: Vec<String> = replicas
        .iter()
        .flat_map(|r| r.elements())
        .map(|element| serde_json::to_string(&element).unwrap())
        .collect();

    for replica in replicas {
        for payload in &payloads {
            replica.apply_remote_json(payload).unwrap();
        }
    }
}

fn report_convergence<T>(replicas: &[Arc<PositionedList<T>>])
where
    T: Clone + Send + Sync + PartialEq + 'static,
{
    let reference = replicas[0].values();
    if replicas.iter().all(|r| r.values() == reference) {
        println!("✓ All {} replicas converged on {} elements", replicas.len(), reference.len());
    } else {
        println!("✗ Replicas did not converge");
    }
}
