//! # Relocation interface
//!
//! Types describing a single cube relocation, and the [`Mover`] trait which
//! abstracts over whatever actually performs it. The resequencer issues one
//! relocation at a time and blocks until the mover confirms or fails, so a
//! mover implementation is free to take as long as a real arm needs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Label of a tray cell, `1..=n`.
pub type CellId = usize;

/// Label of a cube, `1..=n`. Cube `k` belongs in cell `k`.
pub type CubeId = usize;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A location the arm can pick from or place into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Loc {
    /// One of the tray's labelled cells.
    Cell(CellId),

    /// The single auxiliary holding slot next to the tray.
    Buffer,
}

/// Errors which a [`Mover`] implementation may report.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum MoverError {
    #[error("The arm reported a device error: {0}")]
    Device(String),

    #[error("The move did not complete within {timeout_s} s")]
    Timeout { timeout_s: f64 },

    #[error("The arm rejected the request: {0}")]
    Rejected(String),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A request for the arm to relocate one cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocRequest {
    /// The cube to be moved.
    pub cube: CubeId,

    /// Where the cube currently sits.
    pub from: Loc,

    /// Where the cube shall be placed. Must be empty.
    pub to: Loc,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for whatever performs physical relocations.
///
/// A call shall block until the relocation has physically completed or
/// failed. Implementations must not retry internally, the caller assumes a
/// request is executed at most once.
pub trait Mover {
    /// Relocate one cube.
    ///
    /// ## Arguments
    /// - `request` - The relocation to perform. The source must hold the
    ///   named cube and the destination must be empty.
    fn relocate(&mut self, request: &RelocRequest) -> Result<(), MoverError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Loc {
    /// Get the cell label if this location is a cell.
    pub fn cell(&self) -> Option<CellId> {
        match self {
            Loc::Cell(c) => Some(*c),
            Loc::Buffer => None,
        }
    }
}

impl fmt::Display for Loc {
    /// Format using the names of the taught arm positions (`CELL_3`,
    /// `BUFFER`).
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Loc::Cell(c) => write!(f, "CELL_{}", c),
            Loc::Buffer => write!(f, "BUFFER"),
        }
    }
}

impl fmt::Display for RelocRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cube {}: {} -> {}", self.cube, self.from, self.to)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_loc_display() {
        assert_eq!(format!("{}", Loc::Cell(3)), "CELL_3");
        assert_eq!(format!("{}", Loc::Buffer), "BUFFER");
    }

    #[test]
    fn test_loc_cell() {
        assert_eq!(Loc::Cell(7).cell(), Some(7));
        assert_eq!(Loc::Buffer.cell(), None);
    }
}
