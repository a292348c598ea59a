//! Implementations for the ReseqCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{Params, ReseqCtrlError, ReseqInitError, SortCmd};
use crate::{cycle, placement::PlacementModel};
use arm_if::{
    order::Arrangement,
    reloc::{CellId, CubeId, Loc, Mover, RelocRequest},
};
use util::{
    archive::Archiver,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Resequencing control module state.
///
/// Generic over the [`Mover`] which physically executes relocations, so the
/// same controller drives a real arm or the sim.
pub struct ReseqCtrl<M: Mover> {
    pub(crate) params: Params,

    /// The mover which physically performs each relocation.
    mover: M,

    /// The placement model of the current (or last) run. Retained after a
    /// failed run so the last-confirmed state can be inspected.
    placement: Option<PlacementModel>,

    /// Relocations confirmed during the current run, in execution order.
    executed: Vec<RelocRequest>,

    report: StatusReport,
    arch_relocs: Archiver,
}

/// Summary of one completed resequencing run.
#[derive(Clone, Serialize, Debug)]
pub struct SequenceReport {
    /// The commanded arrangement, one cube label per cell.
    pub initial_arrangement: Vec<CubeId>,

    /// Number of cubes that were out of place.
    pub num_displaced: usize,

    /// Number of displacement cycles that were resolved.
    pub num_cycles: usize,

    /// Every relocation executed, in order.
    pub relocations: Vec<RelocRequest>,

    /// True if the tray finished in identity order with the buffer empty.
    pub sorted: bool,
}

/// Status report for ReseqCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Relocations confirmed by the mover this run.
    pub num_relocations: usize,

    /// Cycles fully resolved this run.
    pub num_cycles_closed: usize,

    /// Where in the per-cycle state machine the controller currently is.
    pub phase: CyclePhase,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Phase of the per-cycle state machine.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug)]
pub enum CyclePhase {
    /// Between cycles, nothing parked in the buffer.
    Idle,

    /// The cycle's first cube has been sent to the buffer.
    Opened,

    /// Cubes are being pulled into the hole along the cycle's chain.
    Chaining,

    /// The buffered cube is being placed into its own cell.
    Closed,
}

impl Default for CyclePhase {
    fn default() -> Self {
        CyclePhase::Idle
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<M: Mover> State for ReseqCtrl<M> {
    type InitData = &'static str;
    type InitError = ReseqInitError;

    type InputData = Option<SortCmd>;
    type OutputData = Option<SequenceReport>;
    type StatusReport = StatusReport;
    type ProcError = ReseqCtrlError;

    /// Initialise the ReseqCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        if self.params.archive_relocations {
            self.arch_relocs = Archiver::from_path(
                session, "reseq_ctrl/relocations.csv"
            ).map_err(|e| ReseqInitError::ArchiveInitError(e.to_string()))?;
        }

        Ok(())
    }

    /// Perform resequencing processing.
    ///
    /// With no command this is a no-op. With a [`SortCmd`] the whole
    /// resequencing run is executed: the function returns once every cube
    /// sits in its own cell, or on the first error.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let cmd = match input_data {
            Some(c) => c,
            None => return Ok((None, self.report)),
        };

        let num_cells = cmd.arrangement.num_cells();
        if num_cells > self.params.max_num_cells {
            return Err(ReseqCtrlError::TooManyCells(
                num_cells,
                self.params.max_num_cells,
            ));
        }

        // Fresh run state
        self.report = StatusReport::default();
        self.executed.clear();

        let mut placement = PlacementModel::from_arrangement(&cmd.arrangement);
        let result = self.sequence(&mut placement, &cmd.arrangement);

        // Keep the model whether or not the run completed, after a failure
        // it holds the last-confirmed state for inspection
        self.placement = Some(placement);

        let report = result?;

        Ok((Some(report), self.report))
    }
}

impl<M: Mover> ReseqCtrl<M> {

    /// Create a new controller around the given mover, with default
    /// parameters and no archiving.
    ///
    /// Use [`State::init`] to load parameters and attach the archive to a
    /// session.
    pub fn new(mover: M) -> Self {
        Self {
            params: Params::default(),
            mover,
            placement: None,
            executed: Vec::new(),
            report: StatusReport::default(),
            arch_relocs: Archiver::default(),
        }
    }

    /// Replace the controller's parameters.
    ///
    /// Useful where no parameter file is available, such as the benches.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// The placement model of the current or last run.
    ///
    /// After a [`ReseqCtrlError::RelocationFailed`] this holds the
    /// last-confirmed state: one hole, one cube in the buffer.
    pub fn placement(&self) -> Option<&PlacementModel> {
        self.placement.as_ref()
    }

    /// Relocations confirmed during the current or last run, in order.
    pub fn executed(&self) -> &[RelocRequest] {
        &self.executed
    }

    /// The mover this controller drives.
    pub fn mover(&self) -> &M {
        &self.mover
    }

    /// Mutable access to the mover this controller drives.
    pub fn mover_mut(&mut self) -> &mut M {
        &mut self.mover
    }

    /// Resolve every open cycle of the given placement.
    fn sequence(
        &mut self,
        placement: &mut PlacementModel,
        arrangement: &Arrangement,
    ) -> Result<SequenceReport, ReseqCtrlError> {

        let cycles = cycle::open_cycles(placement);
        let num_displaced: usize = cycles.iter().map(|c| c.len()).sum();
        let num_cycles = cycles.len();

        info!(
            "{} of {} cubes out of place in {} cycles, expecting {} relocations",
            num_displaced,
            placement.num_cells(),
            num_cycles,
            num_displaced + num_cycles
        );

        while let Some(start) = cycle::next_open_cycle_start(placement) {
            // The scan never yields an empty cell
            let displaced = match placement.cube_at(Loc::Cell(start)) {
                Some(c) => c,
                None => break,
            };

            self.close_cycle(placement, start, displaced)?;
        }

        let sorted = placement.is_identity();

        if sorted {
            info!(
                "Resequencing complete after {} relocations",
                self.report.num_relocations
            );
        }

        Ok(SequenceReport {
            initial_arrangement: arrangement.cubes().to_vec(),
            num_displaced,
            num_cycles,
            relocations: self.executed.clone(),
            sorted,
        })
    }

    /// Resolve one cycle: park the start cell's cube in the buffer, pull
    /// each needed cube into the hole along the chain, then close from the
    /// buffer.
    fn close_cycle(
        &mut self,
        placement: &mut PlacementModel,
        start: CellId,
        displaced: CubeId,
    ) -> Result<(), ReseqCtrlError> {

        info!(
            "Opening cycle at cell {}: cube {} is out of place",
            start, displaced
        );

        self.report.phase = CyclePhase::Opened;
        self.do_reloc(placement, RelocRequest {
            cube: displaced,
            from: Loc::Cell(start),
            to: Loc::Buffer,
        })?;

        let mut hole = start;

        self.report.phase = CyclePhase::Chaining;

        // Pull the cube that belongs in the hole until the buffered cube's
        // own cell opens up
        loop {
            let need = hole;
            if need == displaced {
                break;
            }

            let from_cell = match placement.loc_of(need) {
                Loc::Cell(c) => c,
                // The buffered cube is only ever placed by the close step
                Loc::Buffer => break,
            };

            self.do_reloc(placement, RelocRequest {
                cube: need,
                from: Loc::Cell(from_cell),
                to: Loc::Cell(hole),
            })?;

            hole = from_cell;
        }

        self.report.phase = CyclePhase::Closed;
        self.do_reloc(placement, RelocRequest {
            cube: displaced,
            from: Loc::Buffer,
            to: Loc::Cell(hole),
        })?;

        self.report.num_cycles_closed += 1;
        self.report.phase = CyclePhase::Idle;

        info!("Cycle opened at cell {} is closed", start);

        Ok(())
    }

    /// Execute a single relocation: verify it against the model, command the
    /// mover, and apply it to the model once confirmed.
    ///
    /// The model is untouched unless the mover confirms, so after any error
    /// it reflects exactly the physical moves that completed.
    fn do_reloc(
        &mut self,
        placement: &mut PlacementModel,
        request: RelocRequest,
    ) -> Result<(), ReseqCtrlError> {

        // A request the model disagrees with must be caught before the arm
        // moves, not after
        if let Err(cause) = placement.verify_relocation(&request) {
            return Err(ReseqCtrlError::Inconsistent { request, cause });
        }

        debug!("Requesting relocation: {}", request);

        if let Err(cause) = self.mover.relocate(&request) {
            return Err(ReseqCtrlError::RelocationFailed { request, cause });
        }

        // The arm confirmed, apply to the model
        if let Err(cause) = placement.relocate(&request) {
            return Err(ReseqCtrlError::Inconsistent { request, cause });
        }

        if let Err(e) = self.arch_relocs.serialise(&request) {
            warn!("Couldn't archive relocation ({}): {}", request, e);
        }

        self.executed.push(request);
        self.report.num_relocations += 1;

        info!("Relocated {}", request);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim_arm::SimArm;
    use proptest::prelude::*;

    /// Run a full resequencing of the given arrangement against the sim.
    fn run(s: &str) -> (ReseqCtrl<SimArm>, SequenceReport) {
        let arrangement = Arrangement::parse(s).unwrap();
        let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(&arrangement));

        let (output, _) = ctrl.proc(&Some(SortCmd { arrangement })).unwrap();
        let report = output.unwrap();

        (ctrl, report)
    }

    /// Expected total relocations for an arrangement: one per displaced cube
    /// plus one per non-trivial cycle.
    fn expected_relocations(cubes: &[usize]) -> usize {
        let mut visited = vec![false; cubes.len()];
        let mut total = 0;

        for start in 0..cubes.len() {
            if visited[start] || cubes[start] == start + 1 {
                continue;
            }

            let mut len = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                len += 1;
                i = cubes[i] - 1;
            }

            total += len + 1;
        }

        total
    }

    /// All permutations of `1..=n`, by Heap's algorithm.
    fn permutations(n: usize) -> Vec<Vec<usize>> {
        fn heap(k: usize, items: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            for i in 0..k {
                heap(k - 1, items, out);
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
            }
        }

        let mut items: Vec<usize> = (1..=n).collect();
        let mut out = Vec::new();
        heap(n, &mut items, &mut out);
        out
    }

    #[test]
    fn test_single_four_cycle() {
        let (ctrl, report) = run("2 3 4 1");

        // A 4-cycle costs 4 + 1 relocations
        assert_eq!(report.relocations.len(), 5);
        assert_eq!(report.num_cycles, 1);
        assert_eq!(report.num_displaced, 4);
        assert!(report.sorted);
        assert!(ctrl.mover().is_sorted());

        // The exact sequence is deterministic: open at cell 1, chain the
        // hole back around the cycle, close from the buffer
        assert_eq!(report.relocations, vec![
            RelocRequest { cube: 2, from: Loc::Cell(1), to: Loc::Buffer },
            RelocRequest { cube: 1, from: Loc::Cell(4), to: Loc::Cell(1) },
            RelocRequest { cube: 4, from: Loc::Cell(3), to: Loc::Cell(4) },
            RelocRequest { cube: 3, from: Loc::Cell(2), to: Loc::Cell(3) },
            RelocRequest { cube: 2, from: Loc::Buffer, to: Loc::Cell(2) },
        ]);
    }

    #[test]
    fn test_identity_is_a_no_op() {
        let (ctrl, report) = run("1 2 3 4");

        assert!(report.relocations.is_empty());
        assert_eq!(report.num_cycles, 0);
        assert_eq!(report.num_displaced, 0);
        assert!(report.sorted);
        assert_eq!(ctrl.mover().num_requests(), 0);
    }

    #[test]
    fn test_two_cycles() {
        // (1 2) costs 3 relocations, (3 4 5) costs 4
        let (ctrl, report) = run("2 1 4 5 3");

        assert_eq!(report.relocations.len(), 7);
        assert_eq!(report.num_cycles, 2);
        assert_eq!(report.num_displaced, 5);
        assert!(ctrl.mover().is_sorted());
    }

    #[test]
    fn test_fixed_points_are_never_touched() {
        let (_, report) = run("1 3 2 4");

        // Cells 1 and 4 never appear in any relocation
        for reloc in &report.relocations {
            assert_ne!(reloc.from, Loc::Cell(1));
            assert_ne!(reloc.to, Loc::Cell(1));
            assert_ne!(reloc.from, Loc::Cell(4));
            assert_ne!(reloc.to, Loc::Cell(4));
        }
    }

    #[test]
    fn test_no_command_is_a_no_op() {
        let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(
            &Arrangement::parse("2 1").unwrap(),
        ));

        let (output, status) = ctrl.proc(&None).unwrap();

        assert!(output.is_none());
        assert_eq!(status.num_relocations, 0);
        assert_eq!(ctrl.mover().num_requests(), 0);
    }

    #[test]
    fn test_oversize_tray_rejected() {
        let cubes: Vec<usize> = (1..=17).collect();
        let arrangement = Arrangement::from_cubes(cubes).unwrap();
        let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(&arrangement));

        let err = ctrl.proc(&Some(SortCmd { arrangement })).unwrap_err();

        assert!(matches!(err, ReseqCtrlError::TooManyCells(17, 16)));
        assert_eq!(ctrl.mover().num_requests(), 0);
    }

    #[test]
    fn test_mover_failure_aborts_run() {
        let arrangement = Arrangement::parse("2 3 4 1").unwrap();
        let mut ctrl = ReseqCtrl::new(
            SimArm::from_arrangement(&arrangement).fail_on(2),
        );

        let err = ctrl.proc(&Some(SortCmd { arrangement })).unwrap_err();

        assert!(matches!(err, ReseqCtrlError::RelocationFailed { .. }));

        // Exactly one relocation was confirmed before the failure and no
        // further requests were issued after it
        assert_eq!(ctrl.executed().len(), 1);
        assert_eq!(ctrl.mover().num_requests(), 2);
        assert_eq!(ctrl.mover().num_relocations(), 1);

        // The model reflects the last-confirmed state: cube 2 parked in the
        // buffer, cell 1 open
        let placement = ctrl.placement().unwrap();
        assert_eq!(placement.buffered_cube(), Some(2));
        assert_eq!(placement.hole(), Some(1));
    }

    #[test]
    fn test_all_arrangements_up_to_six_cells() {
        for n in 2..=6 {
            for cubes in permutations(n) {
                let arrangement = Arrangement::from_cubes(cubes.clone()).unwrap();
                let mut ctrl =
                    ReseqCtrl::new(SimArm::from_arrangement(&arrangement));

                let (output, status) = ctrl
                    .proc(&Some(SortCmd { arrangement }))
                    .unwrap();
                let report = output.unwrap();

                assert!(
                    ctrl.mover().is_sorted(),
                    "tray not sorted for {:?}",
                    cubes
                );
                assert!(report.sorted);
                assert_eq!(
                    report.relocations.len(),
                    expected_relocations(&cubes),
                    "wrong relocation count for {:?}",
                    cubes
                );
                assert_eq!(status.num_relocations, report.relocations.len());
            }
        }
    }

    proptest! {
        #[test]
        fn test_any_arrangement_gets_sorted(
            cubes in (2usize..=8)
                .prop_flat_map(|n| Just((1..=n).collect::<Vec<usize>>()).prop_shuffle())
        ) {
            let arrangement = Arrangement::from_cubes(cubes.clone()).unwrap();
            let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(&arrangement));

            let (output, _) = ctrl.proc(&Some(SortCmd { arrangement })).unwrap();
            let report = output.unwrap();

            prop_assert!(ctrl.mover().is_sorted());
            prop_assert!(report.sorted);
            prop_assert_eq!(
                report.relocations.len(),
                expected_relocations(&cubes)
            );
        }
    }
}
