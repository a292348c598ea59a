//! # Arm interface library
//!
//! This library defines the interface between the cube resequencing software
//! and the robotic arm which physically moves cubes around the tray. The arm
//! itself (connection, trajectories, gripper control) lives behind the
//! [`reloc::Mover`] trait, implementations may drive real hardware or a
//! simulation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod order;
pub mod reloc;
pub mod tc;
