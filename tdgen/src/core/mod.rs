//! Deterministic, pure logic of the classification engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod collection;
pub mod invariants;
pub mod notifier;
pub mod ordered_map;
pub mod store;
pub mod synthesizer;
pub mod types;
