//! # Cycle decomposition
//!
//! An arrangement is a permutation of the cells, and the cubes that are out
//! of place form disjoint displacement cycles. Sorting the tray means
//! rotating each cycle into place through the buffer, so the resequencer
//! repeatedly asks this module for the next cell that opens an unresolved
//! cycle.
//!
//! The scan runs over cells in ascending label order. Any fixed order would
//! be correct, but a deterministic one makes the emitted relocation sequence
//! reproducible.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::placement::PlacementModel;
use arm_if::reloc::{CellId, Loc};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the first cell, in ascending label order, whose occupant does not
/// match its own label.
///
/// Returns `None` when every cell is a fixed point, which is the termination
/// condition for the whole resequencing run. The query is stateless, it can
/// be re-issued at any time against the current model.
pub fn next_open_cycle_start(placement: &PlacementModel) -> Option<CellId> {
    (1..=placement.num_cells()).find(|&cell| {
        match placement.cube_at(Loc::Cell(cell)) {
            Some(cube) => cube != cell,
            None => false,
        }
    })
}

/// Enumerate all non-trivial cycles of the arrangement, each starting from
/// its lowest-labelled cell, in ascending order of those starts.
///
/// A cycle is the chain of cells visited by repeatedly following "the cell
/// this occupant belongs in". Fixed points are omitted. Cells that are
/// currently empty are skipped, so on a stable model this is the full
/// decomposition of the remaining displacement.
pub fn open_cycles(placement: &PlacementModel) -> Vec<Vec<CellId>> {
    let n = placement.num_cells();
    let mut visited = vec![false; n];
    let mut cycles = Vec::new();

    for start in 1..=n {
        if visited[start - 1] {
            continue;
        }

        let mut cube = match placement.cube_at(Loc::Cell(start)) {
            Some(c) if c != start => c,
            _ => continue,
        };

        let mut cycle = vec![start];
        visited[start - 1] = true;

        // Follow occupants to their home cells until the chain returns to
        // the start
        while cube != start {
            cycle.push(cube);
            visited[cube - 1] = true;
            cube = match placement.cube_at(Loc::Cell(cube)) {
                Some(c) => c,
                None => break,
            };
        }

        cycles.push(cycle);
    }

    cycles
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use arm_if::order::Arrangement;

    fn model(s: &str) -> PlacementModel {
        PlacementModel::from_arrangement(&Arrangement::parse(s).unwrap())
    }

    #[test]
    fn test_identity_has_no_open_cycles() {
        let p = model("1 2 3 4");
        assert_eq!(next_open_cycle_start(&p), None);
        assert!(open_cycles(&p).is_empty());
    }

    #[test]
    fn test_scan_skips_fixed_points() {
        // Cell 1 is a fixed point, cells 2 and 3 are swapped
        let p = model("1 3 2");
        assert_eq!(next_open_cycle_start(&p), Some(2));
    }

    #[test]
    fn test_single_cycle() {
        let p = model("2 3 4 1");
        assert_eq!(next_open_cycle_start(&p), Some(1));
        assert_eq!(open_cycles(&p), vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_two_cycles() {
        // (1 2) and (3 4 5)
        let p = model("2 1 4 5 3");
        assert_eq!(open_cycles(&p), vec![vec![1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_mixed_fixed_and_displaced() {
        // 2 and 4 are fixed, (1 3) swapped, 5 fixed
        let p = model("3 2 1 4 5");
        assert_eq!(next_open_cycle_start(&p), Some(1));
        assert_eq!(open_cycles(&p), vec![vec![1, 3]]);
    }
}
