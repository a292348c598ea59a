//! Command structure accepted by ReseqCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use arm_if::order::Arrangement;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command to resequence the tray.
///
/// Carries the validated current arrangement, the target is always the
/// identity arrangement. The physical tray must actually be in this
/// arrangement when the command is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortCmd {
    /// The current arrangement of the tray.
    pub arrangement: Arrangement,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl From<Arrangement> for SortCmd {
    fn from(arrangement: Arrangement) -> Self {
        Self { arrangement }
    }
}
