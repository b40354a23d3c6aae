//! Affordance classification and WoT Thing Description synthesis.
//!
//! A device exposes a flat list of request/response affordances. This crate
//! holds them in a store where each one can be reclassified as a property
//! direction, an action or an event, then synthesizes a Thing Description
//! from the result.
//!
//! - **[`core`]**: Pure, deterministic logic (store, moves, synthesis,
//!   document invariants). No I/O.
//! - **[`io`]**: Filesystem effects (ingestion, plans, config, output files).
//!
//! [`session`] ties the two together for the CLI.

pub mod affordance;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod thing;
