//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the software installation.
///
/// Parameter files are expected under `$CUBESORT_SW_ROOT/params` and session
/// outputs are written under `$CUBESORT_SW_ROOT/sessions`.
pub const SW_ROOT_ENV_VAR: &str = "CUBESORT_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software installation.
///
/// Returns `Err` if the `CUBESORT_SW_ROOT` environment variable is not set.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    Ok(PathBuf::from(env::var(SW_ROOT_ENV_VAR)?))
}
