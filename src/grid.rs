// SPDX-License-Identifier: Apache-2.0

//! The per-frame polar spatial index.
//!
//! [`PolarGrid`] is a dense `segments × bins` table of [`PolarCell`]
//! aggregates, reset at the start of every frame; nothing carries over
//! between frames. Field ownership across the pipeline stages:
//!
//! - `count`, `x_min`, `y_min`, `z_min`, `z_max` — written once by the
//!   point binner.
//! - `ground`, `height`, `label` — written once by the occupancy
//!   classifier sweep.

use crate::config::GridConfig;

/// Classification of a polar cell after the occlusion sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellLabel {
    /// Observed and clear of obstacles
    Free,
    /// Contains points rising above the ground plane
    Occupied,
    /// Shadowed by a closer obstacle, or not yet swept
    #[default]
    Unknown,
}

/// Per-frame aggregate statistics for one (segment, bin) cell.
///
/// `(x_min, y_min, z_min)` is always the point with the smallest z among
/// those binned into the cell, not the smallest radius. `height` is only
/// meaningful when `count > 0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolarCell {
    pub count: u32,
    pub x_min: f32,
    pub y_min: f32,
    pub z_min: f32,
    pub z_max: f32,
    /// Ground elevation from the fitted plane at this cell's
    /// representative position; defined even for empty cells.
    pub ground: f32,
    /// `z_max - ground`, set during the classification sweep
    pub height: f32,
    pub label: CellLabel,
}

/// Dense 2-D table of [`PolarCell`] keyed by (segment, bin).
pub struct PolarGrid {
    segments: usize,
    bins: usize,
    cells: Vec<PolarCell>,
}

impl PolarGrid {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            segments: config.grid_segments,
            bins: config.bins(),
            cells: vec![PolarCell::default(); config.grid_segments * config.bins()],
        }
    }

    /// Reset every cell for a new frame, retaining the allocation.
    pub fn reset(&mut self) {
        self.cells.fill(PolarCell::default());
    }

    #[inline]
    pub fn segments(&self) -> usize {
        self.segments
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn cell(&self, seg: usize, bin: usize) -> &PolarCell {
        assert!(
            seg < self.segments && bin < self.bins,
            "polar cell ({}, {}) out of range ({} x {})",
            seg,
            bin,
            self.segments,
            self.bins
        );
        &self.cells[seg * self.bins + bin]
    }

    #[inline]
    pub fn cell_mut(&mut self, seg: usize, bin: usize) -> &mut PolarCell {
        assert!(
            seg < self.segments && bin < self.bins,
            "polar cell ({}, {}) out of range ({} x {})",
            seg,
            bin,
            self.segments,
            self.bins
        );
        &mut self.cells[seg * self.bins + bin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridParams;

    fn test_config() -> GridConfig {
        GridConfig::new(GridParams {
            grid_max_range: 10.0,
            grid_cell_size: 0.5,
            grid_segments: 4,
            ..GridParams::default()
        })
    }

    #[test]
    fn test_reset_clears_cells() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);

        let cell = grid.cell_mut(1, 2);
        cell.count = 5;
        cell.z_max = 1.0;
        cell.label = CellLabel::Occupied;

        grid.reset();
        let cell = grid.cell(1, 2);
        assert_eq!(cell.count, 0);
        assert_eq!(cell.z_max, 0.0);
        assert_eq!(cell.label, CellLabel::Unknown);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_segment_panics() {
        let config = test_config();
        let grid = PolarGrid::new(&config);
        grid.cell(4, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_bin_panics() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        grid.cell_mut(0, grid.bins());
    }
}
