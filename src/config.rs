// SPDX-License-Identifier: Apache-2.0

//! Grid configuration and derived sizing.
//!
//! [`GridParams`] is the raw option surface; [`GridConfig`] freezes it
//! together with the quantities derived from it (bin counts, raster
//! dimensions, inverse resolutions). Derived values are private and only
//! computed in [`GridConfig::new`] so they can never drift from their
//! source fields.

use std::f32::consts::{FRAC_PI_4, PI, SQRT_2};

/// Raw configuration options, all numeric, all with defaults.
///
/// The angular half-opening of the field of view is fixed at π/4 and is
/// not part of the option surface.
#[derive(Clone, Debug)]
pub struct GridParams {
    /// Lidar mount height above ground (meters)
    pub lidar_height: f32,
    /// Minimum accepted point height (meters, sensor frame)
    pub lidar_min_height: f32,
    /// Minimum radial range (meters)
    pub grid_min_range: f32,
    /// Maximum radial range (meters)
    pub grid_max_range: f32,
    /// Cell size for both polar bins and the cartesian raster (meters)
    pub grid_cell_size: f32,
    /// Minimum obstacle height; doubles as the cell flatness threshold
    pub grid_min_height: f32,
    /// Number of angular segments across the field of view
    pub grid_segments: usize,
    /// Perpendicular distance tolerance for the robust plane fit (meters)
    pub ransac_tolerance: f32,
    /// Iteration cap for the robust plane fit
    pub ransac_iterations: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            lidar_height: 1.73,
            lidar_min_height: -1.9,
            grid_min_range: 3.0,
            grid_max_range: 50.0,
            grid_cell_size: 0.25,
            grid_min_height: 0.2,
            grid_segments: 180,
            ransac_tolerance: 0.2,
            ransac_iterations: 50,
        }
    }
}

/// Immutable per-run configuration: raw options plus derived sizing.
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub lidar_height: f32,
    pub lidar_min_height: f32,
    pub grid_min_range: f32,
    pub grid_max_range: f32,
    pub grid_cell_size: f32,
    pub grid_min_height: f32,
    pub grid_segments: usize,
    pub ransac_tolerance: f32,
    pub ransac_iterations: usize,

    opening_angle: f32,
    bins: usize,
    grid_width: usize,
    grid_height: usize,
    inv_angular_res: f32,
    inv_radial_res: f32,
}

impl GridConfig {
    pub fn new(params: GridParams) -> Self {
        let grid_height = (params.grid_max_range / params.grid_cell_size) as usize;
        Self {
            opening_angle: FRAC_PI_4,
            bins: (params.grid_max_range * SQRT_2 / params.grid_cell_size) as usize + 1,
            grid_width: grid_height * 2,
            grid_height,
            inv_angular_res: 2.0 * params.grid_segments as f32 / PI,
            inv_radial_res: 1.0 / params.grid_cell_size,
            lidar_height: params.lidar_height,
            lidar_min_height: params.lidar_min_height,
            grid_min_range: params.grid_min_range,
            grid_max_range: params.grid_max_range,
            grid_cell_size: params.grid_cell_size,
            grid_min_height: params.grid_min_height,
            grid_segments: params.grid_segments,
            ransac_tolerance: params.ransac_tolerance,
            ransac_iterations: params.ransac_iterations,
        }
    }

    /// Angular half-opening of the field of view (fixed at π/4)
    #[inline]
    pub fn opening_angle(&self) -> f32 {
        self.opening_angle
    }

    /// Number of radial bins per segment
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Cartesian raster width in cells
    #[inline]
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Cartesian raster height in cells
    #[inline]
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Segments per radian across the field of view
    #[inline]
    pub fn inv_angular_res(&self) -> f32 {
        self.inv_angular_res
    }

    /// Bins per meter of radial range
    #[inline]
    pub fn inv_radial_res(&self) -> f32 {
        self.inv_radial_res
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(GridParams::default())
    }
}
