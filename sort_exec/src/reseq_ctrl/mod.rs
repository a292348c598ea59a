//! Resequencing control module
//!
//! Drives the tray from an arbitrary commanded arrangement to the identity
//! arrangement (cube `k` in cell `k`) through the single buffer slot, one
//! relocation at a time. Each displacement cycle of the arrangement is
//! resolved by parking its first cube in the buffer, pulling the correct
//! cube into every hole along the chain, and finally closing the cycle from
//! the buffer.
//!
//! Exactly one relocation is ever in flight: the mover is called, the call
//! blocks until the arm confirms or fails, and only a confirmed move is
//! applied to the placement model. A mover failure aborts the run with the
//! model left in its last-confirmed state.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use arm_if::reloc::{MoverError, RelocRequest};

// Internal
use crate::placement::InconsistentMove;

pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ReseqCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ReseqCtrlError {
    #[error("The commanded tray has {0} cells but at most {1} are supported")]
    TooManyCells(usize, usize),

    #[error("The arm failed to relocate {request}: {cause}")]
    RelocationFailed {
        request: RelocRequest,
        cause: MoverError,
    },

    #[error("Relocation ({request}) contradicts the placement model: {cause}")]
    Inconsistent {
        request: RelocRequest,
        cause: InconsistentMove,
    },
}

/// Possible errors that can occur while initialising ReseqCtrl.
#[derive(Debug, thiserror::Error)]
pub enum ReseqInitError {
    #[error("Could not load the ReseqCtrl parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Could not create the relocation archive: {0}")]
    ArchiveInitError(String),
}
