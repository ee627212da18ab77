//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Retrieve the software root directory.
///
/// The root is read from the `SUSF_DEIMOS_SW_ROOT` environment variable,
/// which shall point at the checkout of `deimos_sw` on the host.
pub fn get_deimos_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var("SUSF_DEIMOS_SW_ROOT").map(PathBuf::from)
}
