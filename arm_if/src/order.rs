//! # Cube order parsing
//!
//! The current arrangement of the tray is commanded as a list of cube labels,
//! one per cell: the `i`th value is the cube currently sitting in cell `i`.
//! This module validates that input and turns it into an [`Arrangement`],
//! i.e. a genuine permutation of `1..=n`. Nothing physical may happen until
//! the arrangement has passed validation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Internal
use crate::reloc::{CellId, CubeId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated arrangement of the tray.
///
/// Holds one cube label per cell, forming a permutation of `1..=n`. The
/// target arrangement is always the identity, cube `k` in cell `k`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    cubes: Vec<CubeId>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible validation errors for a commanded arrangement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidArrangement {
    #[error("The arrangement is empty")]
    Empty,

    #[error("Expected {expected} cube labels, found {found}")]
    WrongCount { found: usize, expected: usize },

    #[error("\"{0}\" is not a cube label (expected an integer)")]
    NotANumber(String),

    #[error("Cube label {value} is outside the tray (expected 1 to {num_cells})")]
    ValueOutOfRange { value: CubeId, num_cells: usize },

    #[error("Cube label {0} appears more than once")]
    DuplicateValue(CubeId),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Arrangement {
    /// Build an arrangement from a list of cube labels.
    ///
    /// The list length sets the tray size `n`, each value must lie in
    /// `1..=n` and appear exactly once.
    pub fn from_cubes(cubes: Vec<CubeId>) -> Result<Self, InvalidArrangement> {
        if cubes.is_empty() {
            return Err(InvalidArrangement::Empty);
        }

        let num_cells = cubes.len();

        // A value both in range and never seen before implies a permutation,
        // out-of-range values are reported before duplicates.
        let mut seen = vec![false; num_cells];

        for &cube in &cubes {
            if cube < 1 || cube > num_cells {
                return Err(InvalidArrangement::ValueOutOfRange {
                    value: cube,
                    num_cells,
                });
            }
            if seen[cube - 1] {
                return Err(InvalidArrangement::DuplicateValue(cube));
            }
            seen[cube - 1] = true;
        }

        Ok(Self { cubes })
    }

    /// Parse an arrangement from a string of space- or comma-delimited cube
    /// labels, for example `"2 3 4 1"` or `"2,3,4,1"`.
    pub fn parse(s: &str) -> Result<Self, InvalidArrangement> {
        let mut cubes: Vec<CubeId> = Vec::new();

        for token in s.replace(',', " ").split_whitespace() {
            match token.parse::<CubeId>() {
                Ok(v) => cubes.push(v),
                Err(_) => {
                    return Err(InvalidArrangement::NotANumber(token.to_string()))
                }
            }
        }

        Self::from_cubes(cubes)
    }

    /// Parse an arrangement which must describe a tray of exactly
    /// `expected_len` cells.
    pub fn parse_with_len(
        s: &str,
        expected_len: usize,
    ) -> Result<Self, InvalidArrangement> {
        let arr = Self::parse(s)?;

        if arr.num_cells() != expected_len {
            return Err(InvalidArrangement::WrongCount {
                found: arr.num_cells(),
                expected: expected_len,
            });
        }

        Ok(arr)
    }

    /// The number of cells in the tray.
    pub fn num_cells(&self) -> usize {
        self.cubes.len()
    }

    /// The cube currently sitting in the given cell.
    ///
    /// # Panics
    /// - Panics if `cell` is outside `1..=n`.
    pub fn cube_in_cell(&self, cell: CellId) -> CubeId {
        self.cubes[cell - 1]
    }

    /// The cube labels in cell order.
    pub fn cubes(&self) -> &[CubeId] {
        &self.cubes
    }

    /// True if every cube already sits in its own cell.
    pub fn is_identity(&self) -> bool {
        self.cubes.iter().enumerate().all(|(i, &c)| c == i + 1)
    }
}

impl FromStr for Arrangement {
    type Err = InvalidArrangement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_space_delimited() {
        let arr = Arrangement::parse("2 3 4 1").unwrap();
        assert_eq!(arr.cubes(), &[2, 3, 4, 1]);
        assert_eq!(arr.num_cells(), 4);
        assert!(!arr.is_identity());
    }

    #[test]
    fn test_parse_comma_delimited() {
        let arr = Arrangement::parse("2,3,4,1").unwrap();
        assert_eq!(arr.cubes(), &[2, 3, 4, 1]);

        // Mixed separators are accepted too
        let arr = Arrangement::parse("2, 3, 4, 1").unwrap();
        assert_eq!(arr.cubes(), &[2, 3, 4, 1]);
    }

    #[test]
    fn test_parse_identity() {
        let arr = Arrangement::parse("1 2 3 4").unwrap();
        assert!(arr.is_identity());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Arrangement::parse(""), Err(InvalidArrangement::Empty));
        assert_eq!(Arrangement::parse("  ,  "), Err(InvalidArrangement::Empty));
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(
            Arrangement::parse("1 2 x 4"),
            Err(InvalidArrangement::NotANumber("x".to_string()))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        // Duplicate 2 (and missing 3)
        assert_eq!(
            Arrangement::parse("1 2 2 4"),
            Err(InvalidArrangement::DuplicateValue(2))
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            Arrangement::parse("1 2 5 4"),
            Err(InvalidArrangement::ValueOutOfRange {
                value: 5,
                num_cells: 4
            })
        );
        assert_eq!(
            Arrangement::parse("0 1 2"),
            Err(InvalidArrangement::ValueOutOfRange {
                value: 0,
                num_cells: 3
            })
        );
    }

    #[test]
    fn test_wrong_count_rejected() {
        assert_eq!(
            Arrangement::parse_with_len("2 1 3", 4),
            Err(InvalidArrangement::WrongCount {
                found: 3,
                expected: 4
            })
        );
        assert!(Arrangement::parse_with_len("2 1 3 4", 4).is_ok());
    }

    #[test]
    fn test_cube_in_cell() {
        let arr = Arrangement::parse("2 1 4 5 3").unwrap();
        assert_eq!(arr.cube_in_cell(1), 2);
        assert_eq!(arr.cube_in_cell(5), 3);
    }
}
