//! # Resequencing executable entry point.
//!
//! Accepts a telecommand describing the current arrangement of the tray and
//! either plans or executes the relocations that sort every cube into its
//! own cell.
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session and logging
//!     - Load parameters
//!     - Parse and validate the commanded arrangement
//!     - Plan: enumerate the displacement cycles and report the cost
//!     - Resequence: drive each cycle through the buffer via the mover,
//!       archiving each confirmed relocation
//!
//! The mover used here is the simulated arm, a physical arm implementation
//! plugs in through the same [`arm_if::reloc::Mover`] trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use sort_lib::{
    cycle,
    placement::PlacementModel,
    reseq_ctrl::{ReseqCtrl, SortCmd},
    sim_arm::SimArm,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::{error, info};
use structopt::StructOpt;

// Internal
use arm_if::{order::Arrangement, tc::SortTc};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    // Parse the telecommand off the command line
    let tc = SortTc::from_args();

    // Initialise session
    let session = Session::new(
        "sort_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Cube Resequencing Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- VALIDATE THE COMMANDED ARRANGEMENT ----

    // Nothing physical may happen until the arrangement has passed
    // validation, a bad command is rejected here.
    let arrangement = Arrangement::parse(&tc.arrangement_str())
        .wrap_err("Invalid arrangement")?;

    info!("Commanded arrangement: {:?}", arrangement.cubes());

    match tc {
        SortTc::Plan { .. } => plan(&arrangement),
        SortTc::Resequence { .. } => resequence(arrangement, &session),
    }
}

/// Enumerate the displacement cycles of the arrangement and report the cost
/// of resequencing it, without driving anything.
fn plan(arrangement: &Arrangement) -> Result<()> {

    let placement = PlacementModel::from_arrangement(arrangement);
    let cycles = cycle::open_cycles(&placement);

    if cycles.is_empty() {
        info!("The tray is already in identity order, nothing to do");
        return Ok(());
    }

    let num_displaced: usize = cycles.iter().map(|c| c.len()).sum();

    info!(
        "{} of {} cubes are out of place, in {} cycles:",
        num_displaced,
        arrangement.num_cells(),
        cycles.len()
    );

    for (i, cyc) in cycles.iter().enumerate() {
        info!("    Cycle {}: cells {:?}", i + 1, cyc);
    }

    info!(
        "Resequencing would take {} relocations",
        num_displaced + cycles.len()
    );

    Ok(())
}

/// Execute a full resequencing run against the simulated arm.
fn resequence(arrangement: Arrangement, session: &Session) -> Result<()> {

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    // The physical tray starts in the commanded arrangement
    let mover = SimArm::from_arrangement(&arrangement);

    let mut reseq_ctrl = ReseqCtrl::new(mover);
    reseq_ctrl.init("sort_exec.toml", session)
        .wrap_err("Failed to initialise ReseqCtrl")?;

    info!("ReseqCtrl init complete\n");

    // ---- RESEQUENCE ----

    let cmd = SortCmd { arrangement };

    let (output, status) = match reseq_ctrl.proc(&Some(cmd)) {
        Ok(os) => os,
        Err(e) => {
            // The model holds the last-confirmed state, log it so the run
            // can be picked up again
            error!(
                "Resequencing aborted after {} confirmed relocations",
                reseq_ctrl.executed().len()
            );
            if let Some(placement) = reseq_ctrl.placement() {
                error!(
                    "Last-confirmed state: hole at {:?}, buffered cube {:?}",
                    placement.hole(),
                    placement.buffered_cube()
                );
            }
            return Err(e).wrap_err("Resequencing failed");
        }
    };

    // ---- REPORT ----

    if let Some(report) = output {
        info!(
            "Resequencing complete: {} relocations over {} cycles, sorted: {}",
            report.relocations.len(),
            status.num_cycles_closed,
            report.sorted
        );

        session.save("sequence_report.json", &report);
    }

    Ok(())
}
