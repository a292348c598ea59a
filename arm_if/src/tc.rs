//! # Resequencing telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by the resequencing executable.
#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
pub enum SortTc {
    /// Resequence the tray so that every cube ends up in its own cell.
    ///
    /// The arrangement gives the cube currently sitting in each cell,
    /// for example "2 3 4 1" or "2,3,4,1".
    #[structopt(name = "resequence")]
    Resequence {
        /// The current arrangement of the tray, one cube label per cell.
        arrangement: Vec<String>,
    },

    /// Compute and display the relocation plan for an arrangement without
    /// driving the arm.
    #[structopt(name = "plan")]
    Plan {
        /// The current arrangement of the tray, one cube label per cell.
        arrangement: Vec<String>,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SortTc {
    /// Get the raw arrangement tokens joined into a single parseable string.
    pub fn arrangement_str(&self) -> String {
        match self {
            SortTc::Resequence { arrangement } | SortTc::Plan { arrangement } => {
                arrangement.join(" ")
            }
        }
    }
}
