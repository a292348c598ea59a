//! Parameters structure for ReseqCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for resequencing control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Maximum number of cells the physical tray can hold. Commands naming a
    /// larger tray are rejected before anything moves.
    pub max_num_cells: usize,

    /// Whether executed relocations are archived to CSV in the session.
    pub archive_relocations: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            max_num_cells: 16,
            archive_relocations: true,
        }
    }
}
