//! Stable exit codes for press CLI commands.

/// Command succeeded, or a handled soft failure (validator FAIL verdicts are
/// communicated through the verdict `status`, not the exit code).
pub const OK: i32 = 0;
/// Missing required input, or rendering failed outright.
pub const INVALID: i32 = 1;
