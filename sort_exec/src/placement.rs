//! # Placement model
//!
//! Tracks where every cube currently sits: a forward map (cell, or the
//! buffer, to its occupant) and an inverse map (cube to its location), kept
//! exact inverses of one another. The model performs no physical action, it
//! shall only be mutated once the arm has confirmed the corresponding
//! relocation.
//!
//! Between relocations the model is in exactly one of two shapes:
//! - stable: all `n` cells filled, buffer empty
//! - mid-cycle: exactly one cell empty (the hole), buffer holding one cube

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use arm_if::{
    order::Arrangement,
    reloc::{CellId, CubeId, Loc, RelocRequest},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The cell/cube bijection for one resequencing run.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementModel {
    /// Occupant of each cell, indexed by `cell - 1`.
    cells: Vec<Option<CubeId>>,

    /// Occupant of the buffer slot.
    buffer: Option<CubeId>,

    /// Location of each cube, indexed by `cube - 1`. Exact inverse of the
    /// forward maps above.
    locs: Vec<Loc>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A relocation which contradicts the model's view of the tray.
///
/// These indicate a defect in whatever built the request, not a runtime
/// fault, a run which produces one must be aborted rather than patched up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InconsistentMove {
    #[error("{loc} is not a location on this tray ({num_cells} cells)")]
    UnknownLoc { loc: Loc, num_cells: usize },

    #[error("{loc} does not hold cube {expected} (found {found:?})")]
    SourceMismatch {
        loc: Loc,
        expected: CubeId,
        found: Option<CubeId>,
    },

    #[error("{loc} is already occupied by cube {occupant}")]
    DestinationOccupied { loc: Loc, occupant: CubeId },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlacementModel {
    /// Build the model for a validated arrangement. The buffer starts empty.
    pub fn from_arrangement(arrangement: &Arrangement) -> Self {
        let n = arrangement.num_cells();

        let mut cells = vec![None; n];
        let mut locs = vec![Loc::Buffer; n];

        for cell in 1..=n {
            let cube = arrangement.cube_in_cell(cell);
            cells[cell - 1] = Some(cube);
            locs[cube - 1] = Loc::Cell(cell);
        }

        Self {
            cells,
            buffer: None,
            locs,
        }
    }

    /// The number of cells in the tray (excluding the buffer).
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The cube currently at the given location, or `None` if it is empty.
    ///
    /// # Panics
    /// - Panics if the location is a cell outside `1..=n`.
    pub fn cube_at(&self, loc: Loc) -> Option<CubeId> {
        match loc {
            Loc::Cell(c) => self.cells[c - 1],
            Loc::Buffer => self.buffer,
        }
    }

    /// Where the given cube currently sits.
    ///
    /// # Panics
    /// - Panics if the cube label is outside `1..=n`.
    pub fn loc_of(&self, cube: CubeId) -> Loc {
        self.locs[cube - 1]
    }

    /// The currently empty cell, if the model is mid-cycle.
    pub fn hole(&self) -> Option<CellId> {
        self.cells
            .iter()
            .position(|c| c.is_none())
            .map(|i| i + 1)
    }

    /// The cube parked in the buffer, if any.
    pub fn buffered_cube(&self) -> Option<CubeId> {
        self.buffer
    }

    /// True if every cube sits in its own cell and the buffer is empty.
    pub fn is_identity(&self) -> bool {
        self.buffer.is_none()
            && self
                .cells
                .iter()
                .enumerate()
                .all(|(i, &c)| c == Some(i + 1))
    }

    /// Check the preconditions of a relocation without mutating anything.
    ///
    /// The source must hold exactly the requested cube and the destination
    /// must be empty.
    pub fn verify_relocation(
        &self,
        request: &RelocRequest,
    ) -> Result<(), InconsistentMove> {
        let found = self.checked_occupant(request.from)?;
        if found != Some(request.cube) {
            return Err(InconsistentMove::SourceMismatch {
                loc: request.from,
                expected: request.cube,
                found,
            });
        }

        if let Some(occupant) = self.checked_occupant(request.to)? {
            return Err(InconsistentMove::DestinationOccupied {
                loc: request.to,
                occupant,
            });
        }

        Ok(())
    }

    /// Apply a confirmed relocation.
    ///
    /// Verifies the preconditions first, so either both the forward and
    /// inverse maps are updated or neither is. No partially-updated state is
    /// observable.
    pub fn relocate(&mut self, request: &RelocRequest) -> Result<(), InconsistentMove> {
        self.verify_relocation(request)?;

        match request.from {
            Loc::Cell(c) => self.cells[c - 1] = None,
            Loc::Buffer => self.buffer = None,
        }
        match request.to {
            Loc::Cell(c) => self.cells[c - 1] = Some(request.cube),
            Loc::Buffer => self.buffer = Some(request.cube),
        }
        self.locs[request.cube - 1] = request.to;

        Ok(())
    }

    /// Occupant lookup which reports out-of-range cells as errors.
    fn checked_occupant(&self, loc: Loc) -> Result<Option<CubeId>, InconsistentMove> {
        match loc {
            Loc::Cell(c) if c < 1 || c > self.num_cells() => {
                Err(InconsistentMove::UnknownLoc {
                    loc,
                    num_cells: self.num_cells(),
                })
            }
            Loc::Cell(c) => Ok(self.cells[c - 1]),
            Loc::Buffer => Ok(self.buffer),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn model(s: &str) -> PlacementModel {
        PlacementModel::from_arrangement(&Arrangement::parse(s).unwrap())
    }

    #[test]
    fn test_from_arrangement() {
        let p = model("2 3 4 1");

        assert_eq!(p.num_cells(), 4);
        assert_eq!(p.cube_at(Loc::Cell(1)), Some(2));
        assert_eq!(p.cube_at(Loc::Cell(4)), Some(1));
        assert_eq!(p.cube_at(Loc::Buffer), None);
        assert_eq!(p.loc_of(2), Loc::Cell(1));
        assert_eq!(p.loc_of(1), Loc::Cell(4));
        assert_eq!(p.hole(), None);
        assert!(!p.is_identity());
    }

    #[test]
    fn test_identity() {
        assert!(model("1 2 3").is_identity());
    }

    #[test]
    fn test_relocate_updates_both_maps() {
        let mut p = model("2 3 4 1");

        p.relocate(&RelocRequest {
            cube: 2,
            from: Loc::Cell(1),
            to: Loc::Buffer,
        })
        .unwrap();

        assert_eq!(p.cube_at(Loc::Cell(1)), None);
        assert_eq!(p.cube_at(Loc::Buffer), Some(2));
        assert_eq!(p.loc_of(2), Loc::Buffer);
        assert_eq!(p.hole(), Some(1));
        assert_eq!(p.buffered_cube(), Some(2));
    }

    #[test]
    fn test_relocate_wrong_source_rejected() {
        let mut p = model("2 3 4 1");
        let before = p.clone();

        // Cell 1 holds cube 2, not cube 3
        let err = p
            .relocate(&RelocRequest {
                cube: 3,
                from: Loc::Cell(1),
                to: Loc::Buffer,
            })
            .unwrap_err();

        assert_eq!(
            err,
            InconsistentMove::SourceMismatch {
                loc: Loc::Cell(1),
                expected: 3,
                found: Some(2),
            }
        );

        // Nothing moved
        assert_eq!(p.cube_at(Loc::Cell(1)), before.cube_at(Loc::Cell(1)));
        assert_eq!(p.cube_at(Loc::Buffer), None);
    }

    #[test]
    fn test_relocate_empty_source_rejected() {
        let mut p = model("2 1");
        p.relocate(&RelocRequest {
            cube: 2,
            from: Loc::Cell(1),
            to: Loc::Buffer,
        })
        .unwrap();

        let err = p
            .relocate(&RelocRequest {
                cube: 2,
                from: Loc::Cell(1),
                to: Loc::Cell(2),
            })
            .unwrap_err();

        assert_eq!(
            err,
            InconsistentMove::SourceMismatch {
                loc: Loc::Cell(1),
                expected: 2,
                found: None,
            }
        );
    }

    #[test]
    fn test_relocate_occupied_destination_rejected() {
        let mut p = model("2 3 4 1");

        let err = p
            .relocate(&RelocRequest {
                cube: 2,
                from: Loc::Cell(1),
                to: Loc::Cell(3),
            })
            .unwrap_err();

        assert_eq!(
            err,
            InconsistentMove::DestinationOccupied {
                loc: Loc::Cell(3),
                occupant: 4,
            }
        );
    }

    #[test]
    fn test_unknown_cell_rejected() {
        let p = model("2 1");

        let err = p
            .verify_relocation(&RelocRequest {
                cube: 2,
                from: Loc::Cell(5),
                to: Loc::Buffer,
            })
            .unwrap_err();

        assert_eq!(
            err,
            InconsistentMove::UnknownLoc {
                loc: Loc::Cell(5),
                num_cells: 2,
            }
        );
    }

    #[test]
    fn test_mid_cycle_shape() {
        let mut p = model("3 1 2");

        p.relocate(&RelocRequest {
            cube: 3,
            from: Loc::Cell(1),
            to: Loc::Buffer,
        })
        .unwrap();

        // Exactly one hole, exactly one buffered cube
        assert_eq!(p.hole(), Some(1));
        assert_eq!(p.buffered_cube(), Some(3));

        p.relocate(&RelocRequest {
            cube: 1,
            from: Loc::Cell(2),
            to: Loc::Cell(1),
        })
        .unwrap();

        assert_eq!(p.hole(), Some(2));
        assert_eq!(p.buffered_cube(), Some(3));
    }
}
