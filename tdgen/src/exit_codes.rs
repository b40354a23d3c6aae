//! Stable exit codes for tdgen CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid input document, plan or config, or any other failure.
pub const INVALID: i32 = 1;
/// A plan step selected a missing affordance or moved without a selection.
pub const SELECTION: i32 = 2;
