//! I/O helpers for tdgen commands.

pub mod config;
pub mod ingest;
pub mod output;
pub mod plan;
