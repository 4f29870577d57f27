//! Physical geometry of the DasBob split keyboard.

use crate::models::Position;
use serde::{Deserialize, Serialize};

/// Fixed shape of a split keyboard half-grid plus thumb cluster.
///
/// The DasBob is a split 3×5+3: three main rows of five columns per half
/// and a six-key thumb row shared between the halves. Visual columns run
/// 0-4 on the left half and 5-9 on the right; the thumb row sits at
/// visual row 3, columns 2-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitGeometry {
    /// Main grid rows per half
    pub main_rows: u8,
    /// Main grid columns per half
    pub cols_per_half: u8,
    /// Total thumb keys across both halves
    pub thumb_keys: u8,
}

impl SplitGeometry {
    /// The DasBob layout: `LAYOUT_split_3x5_3`.
    pub const DASBOB: Self = Self {
        main_rows: 3,
        cols_per_half: 5,
        thumb_keys: 6,
    };

    /// Total number of keys.
    #[must_use]
    pub const fn key_count(&self) -> usize {
        (self.main_rows as usize) * (self.cols_per_half as usize) * 2 + self.thumb_keys as usize
    }

    /// Visual row index of the thumb cluster.
    #[must_use]
    pub const fn thumb_row(&self) -> u8 {
        self.main_rows
    }

    /// First visual column of the thumb cluster (centered under the grid).
    #[must_use]
    pub const fn thumb_start_col(&self) -> u8 {
        self.cols_per_half - self.thumb_keys / 2
    }

    /// Whether the given visual position exists on this keyboard.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        if position.row < self.main_rows {
            return position.col < self.cols_per_half * 2;
        }
        if position.row == self.thumb_row() {
            let start = self.thumb_start_col();
            return position.col >= start && position.col < start + self.thumb_keys;
        }
        false
    }

    /// All positions in layout macro argument order: main rows
    /// left-to-right across both halves, then the thumb row.
    ///
    /// This is the order keys appear inside `LAYOUT_split_3x5_3(...)` and
    /// the canonical iteration order for generation and validation.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.key_count());
        for row in 0..self.main_rows {
            for col in 0..self.cols_per_half * 2 {
                positions.push(Position::new(row, col));
            }
        }
        let start = self.thumb_start_col();
        for offset in 0..self.thumb_keys {
            positions.push(Position::new(self.thumb_row(), start + offset));
        }
        positions
    }
}
