// SPDX-License-Identifier: Apache-2.0

//! Cartesian occupancy raster and polar-to-cartesian voxelization.
//!
//! The raster is a dense `height × width` table of occupancy values.
//! Cells outside the triangular field-of-view footprint can never be
//! observed; they are fixed at [`UNOBSERVABLE`] when the raster is
//! built and are never touched again. Rasterization walks only the
//! footprint, reads each raster cell's backing polar cell, and emits
//! the ground / elevated voxel clouds alongside the occupancy values.

use crate::{cloud::Points, config::GridConfig, geometry, grid::{CellLabel, PolarGrid}};
use ndarray::Array2;

/// Raster value for cells outside the field-of-view footprint.
pub const UNOBSERVABLE: i8 = -1;
/// Raster value for observed free cells.
pub const FREE: i8 = 0;
/// Raster value for occluded cells.
pub const UNKNOWN: i8 = 50;
/// Raster value for occupied cells.
pub const OCCUPIED: i8 = 100;

/// Cartesian occupancy raster, reused across frames.
///
/// Row 0 is the far edge of the grid; the sensor sits at the apex of
/// the triangular footprint on the near edge. Only footprint cells are
/// rewritten each frame.
pub struct OccupancyRaster {
    data: Array2<i8>,
}

impl OccupancyRaster {
    pub fn new(config: &GridConfig) -> Self {
        let height = config.grid_height();
        let width = config.grid_width();
        let mut data = Array2::from_elem((height, width), FREE);

        // Cells outside the opening angle are never observable.
        for j in 0..height {
            for i in 0..width {
                if i < j || i >= width - j {
                    data[[j, i]] = UNOBSERVABLE;
                }
            }
        }

        Self { data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Raster values, row-major, row 0 at the far edge.
    #[inline]
    pub fn data(&self) -> &Array2<i8> {
        &self.data
    }

    /// Map the classified polar grid onto the raster and synthesize the
    /// voxel clouds.
    ///
    /// Every footprint cell is visited exactly once: its ground voxel
    /// point is appended, its occupancy value written, and occupied
    /// cells additionally emit a vertical column of elevated voxel
    /// points from the ground estimate up to the cell's highest return.
    pub fn rasterize(&mut self, config: &GridConfig, grid: &PolarGrid) -> (Points, Points) {
        let mut voxel_ground = Points::empty();
        let mut voxel_elevated = Points::empty();

        let cell_size = config.grid_cell_size;
        let mut x = config.grid_max_range - cell_size / 2.0;

        for j in 0..self.height() {
            let mut y = x;
            for i in j..self.width() - j {
                let (seg, bin) = geometry::cell_index(config, x, y);
                let cell = grid.cell(seg, bin);

                voxel_ground.push(x, y, cell.ground, 0);

                self.data[[j, i]] = match cell.label {
                    CellLabel::Free => FREE,
                    CellLabel::Unknown => UNKNOWN,
                    CellLabel::Occupied => {
                        // Column from ground to the highest return,
                        // stepped by cell size; always at least one
                        // point even when the span is shorter.
                        let mut v = cell.ground;
                        while v < cell.z_max {
                            voxel_elevated.push(x, y, v, 0);
                            v += cell_size;
                        }
                        OCCUPIED
                    }
                };

                y -= cell_size;
            }
            x -= cell_size;
        }

        (voxel_ground, voxel_elevated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classifier, config::GridParams, plane::PlaneModel};

    fn test_config() -> GridConfig {
        GridConfig::new(GridParams {
            grid_max_range: 5.0,
            grid_cell_size: 0.5,
            grid_min_height: 0.2,
            grid_segments: 8,
            ..GridParams::default()
        })
    }

    fn horizontal_plane(ground: f32) -> PlaneModel {
        PlaneModel {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: -ground,
            inliers: 1,
            points: 1,
        }
    }

    fn boundary(raster: &OccupancyRaster, j: usize, i: usize) -> bool {
        i < j || i >= raster.width() - j
    }

    #[test]
    fn test_boundary_cells_fixed() {
        let config = test_config();
        let raster = OccupancyRaster::new(&config);
        assert_eq!(raster.height(), 10);
        assert_eq!(raster.width(), 20);

        for j in 0..raster.height() {
            for i in 0..raster.width() {
                let expected = if boundary(&raster, j, i) { UNOBSERVABLE } else { FREE };
                assert_eq!(raster.data()[[j, i]], expected, "cell ({}, {})", j, i);
            }
        }
    }

    #[test]
    fn test_empty_frame_rasterizes_free() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        classifier::classify(&config, &mut grid, &horizontal_plane(-1.6));

        let mut raster = OccupancyRaster::new(&config);
        let (voxel_ground, voxel_elevated) = raster.rasterize(&config, &grid);

        assert!(voxel_elevated.is_empty());
        let mut visited = 0;
        for j in 0..raster.height() {
            for i in 0..raster.width() {
                if boundary(&raster, j, i) {
                    assert_eq!(raster.data()[[j, i]], UNOBSERVABLE);
                } else {
                    assert_eq!(raster.data()[[j, i]], FREE);
                    visited += 1;
                }
            }
        }
        // One ground voxel per visited footprint cell, all at the
        // plane's elevation.
        assert_eq!(voxel_ground.len(), visited);
        assert!(voxel_ground.z.iter().all(|&z| z == -1.6));
    }

    #[test]
    fn test_occupied_cell_and_voxel_column() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);

        // Obstacle straight ahead at ~3m, one meter tall.
        let (seg, bin) = geometry::cell_index(&config, 3.1, -0.05);
        {
            let cell = grid.cell_mut(seg, bin);
            cell.count = 4;
            cell.z_min = -1.5;
            cell.z_max = -0.6;
        }
        classifier::classify(&config, &mut grid, &horizontal_plane(-1.6));
        assert_eq!(grid.cell(seg, bin).label, CellLabel::Occupied);

        let mut raster = OccupancyRaster::new(&config);
        let (_voxel_ground, voxel_elevated) = raster.rasterize(&config, &grid);

        // The raster contains occupied cells backed by the obstacle,
        // and unknown cells in its shadow.
        let values: Vec<i8> = raster.data().iter().copied().collect();
        assert!(values.contains(&OCCUPIED));
        assert!(values.contains(&UNKNOWN));

        // Voxel column stepped by cell size from ground to z_max:
        // -1.6, -1.1, -0.6 exclusive end -> two points per raster cell
        // backed by this polar cell.
        assert!(!voxel_elevated.is_empty());
        assert!(voxel_elevated.len() % 2 == 0);
        assert!(voxel_elevated
            .z
            .iter()
            .all(|&z| (z + 1.6).abs() < 1e-5 || (z + 1.1).abs() < 1e-5));
    }
}
