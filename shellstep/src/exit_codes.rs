//! Stable exit codes for shellstep CLI commands.

/// Command succeeded, or the run was intentionally skipped by the OS gate.
pub const OK: i32 = 0;
/// Invalid configuration, or a script failed to prepare, execute, or exit
/// with an accepted code.
pub const INVALID: i32 = 1;
