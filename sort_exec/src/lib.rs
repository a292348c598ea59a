//! # Resequencing library.
//!
//! This library allows other crates in the workspace (and the benches) to
//! access items defined inside the resequencing executable's crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Placement model - the cell/cube bijection tracking where every cube sits
pub mod placement;

/// Cycle decomposition - finds the displacement cycles of an arrangement
pub mod cycle;

/// Resequencing control module - drives each cycle through the buffer slot
pub mod reseq_ctrl;

/// Simulated arm - a [`arm_if::reloc::Mover`] backed by an in-memory tray
pub mod sim_arm;
