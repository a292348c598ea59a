//! # Simulated arm
//!
//! A [`Mover`] implementation backed by an in-memory tray. The sim keeps its
//! own record of where every cube physically sits, completely independent of
//! the resequencer's placement model, so a disagreement between the two
//! shows up as a rejected request rather than passing silently.
//!
//! Faults can be scripted with [`SimArm::fail_on`], which makes a chosen
//! request fail the way a real arm would on a dropped cube or a lost
//! connection.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// Internal
use arm_if::{
    order::Arrangement,
    reloc::{CubeId, Loc, Mover, MoverError, RelocRequest},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated arm and tray.
#[derive(Debug, Clone)]
pub struct SimArm {
    /// Physical occupant of each cell, indexed by `cell - 1`.
    cells: Vec<Option<CubeId>>,

    /// Physical occupant of the buffer slot.
    buffer: Option<CubeId>,

    /// Requests received so far, including any failed one.
    num_requests: usize,

    /// Relocations physically completed.
    num_relocations: usize,

    /// If set, the request with this (1-based) index fails with a device
    /// error instead of moving anything.
    fail_on: Option<usize>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimArm {
    /// Create a sim whose tray physically starts in the given arrangement.
    pub fn from_arrangement(arrangement: &Arrangement) -> Self {
        Self {
            cells: arrangement.cubes().iter().map(|&c| Some(c)).collect(),
            buffer: None,
            num_requests: 0,
            num_relocations: 0,
            fail_on: None,
        }
    }

    /// Script the `request_idx`th (1-based) request to fail with a device
    /// error.
    pub fn fail_on(mut self, request_idx: usize) -> Self {
        self.fail_on = Some(request_idx);
        self
    }

    /// The cube physically at the given location.
    pub fn cube_at(&self, loc: Loc) -> Option<CubeId> {
        match loc {
            Loc::Cell(c) => c
                .checked_sub(1)
                .and_then(|i| self.cells.get(i))
                .copied()
                .flatten(),
            Loc::Buffer => self.buffer,
        }
    }

    /// True if every cube physically sits in its own cell and the buffer is
    /// empty.
    pub fn is_sorted(&self) -> bool {
        self.buffer.is_none()
            && self
                .cells
                .iter()
                .enumerate()
                .all(|(i, &c)| c == Some(i + 1))
    }

    /// Number of relocations physically completed.
    pub fn num_relocations(&self) -> usize {
        self.num_relocations
    }

    /// Number of requests received, including any failed one.
    pub fn num_requests(&self) -> usize {
        self.num_requests
    }
}

impl Mover for SimArm {
    fn relocate(&mut self, request: &RelocRequest) -> Result<(), MoverError> {
        self.num_requests += 1;

        if self.fail_on == Some(self.num_requests) {
            return Err(MoverError::Device(format!(
                "injected failure on request {}",
                self.num_requests
            )));
        }

        // Bounds check on any cell named by the request
        for loc in [request.from, request.to].iter() {
            if let Loc::Cell(c) = loc {
                if *c < 1 || *c > self.cells.len() {
                    return Err(MoverError::Rejected(format!(
                        "{} is not a tray location",
                        loc
                    )));
                }
            }
        }

        // The gripper can only pick the named cube from the named source
        if self.cube_at(request.from) != Some(request.cube) {
            return Err(MoverError::Rejected(format!(
                "{} does not hold cube {}",
                request.from, request.cube
            )));
        }

        // And can only place into an empty slot
        if let Some(occupant) = self.cube_at(request.to) {
            return Err(MoverError::Rejected(format!(
                "{} is occupied by cube {}",
                request.to, occupant
            )));
        }

        match request.from {
            Loc::Cell(c) => self.cells[c - 1] = None,
            Loc::Buffer => self.buffer = None,
        }
        match request.to {
            Loc::Cell(c) => self.cells[c - 1] = Some(request.cube),
            Loc::Buffer => self.buffer = Some(request.cube),
        }

        self.num_relocations += 1;

        // Physical invariant of a single-gripper, single-buffer tray: at most
        // one cell can ever be empty, and only while the buffer is full
        let num_holes = self.cells.iter().filter(|c| c.is_none()).count();
        match self.buffer {
            Some(_) => assert!(
                num_holes == 1,
                "sim tray corrupt: buffer full with {} holes",
                num_holes
            ),
            None => assert!(
                num_holes == 0,
                "sim tray corrupt: buffer empty with {} holes",
                num_holes
            ),
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
