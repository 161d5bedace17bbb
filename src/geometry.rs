// SPDX-License-Identifier: Apache-2.0

//! Pure coordinate math between the cartesian sensor frame and polar
//! grid cells.
//!
//! A polar cell is addressed by (segment, bin): segment counts angular
//! slices from the leading (+y) edge of the field of view, bin counts
//! radial slices outward from the sensor. [`to_cartesian`] is a
//! representative-point inverse (the bin's inner edge), not a true
//! round-trip of an arbitrary point.

use crate::config::GridConfig;

/// Map a sensor-frame coordinate to its raw polar cell index.
///
/// Results can fall outside `[0, segments) × [0, bins)` for points
/// outside the field-of-view gate; callers must validate before
/// indexing, or use [`cell_index`] for coordinates known to lie within
/// the footprint.
#[inline]
pub fn to_polar_cell(config: &GridConfig, x: f32, y: f32) -> (i32, i32) {
    let range = (x * x + y * y).sqrt();
    let angle = -y.atan2(x);
    let mut seg = ((angle + config.opening_angle()) * config.inv_angular_res()).floor() as i32;
    let bin = (range * config.inv_radial_res()).floor() as i32;

    // The trailing diagonal lands exactly on the boundary of the last
    // segment and would otherwise round out of range.
    if x == -y {
        seg = config.grid_segments as i32 - 1;
    }

    (seg, bin)
}

/// Representative cartesian position of a polar cell (inner bin edge).
#[inline]
pub fn to_cartesian(config: &GridConfig, seg: usize, bin: usize) -> (f32, f32) {
    let range = bin as f32 / config.inv_radial_res();
    let angle = seg as f32 / config.inv_angular_res() - config.opening_angle();
    (angle.cos() * range, -angle.sin() * range)
}

/// Validated polar cell index for a coordinate inside the footprint.
///
/// Float rounding can push coordinates that sit exactly on the FOV
/// diagonals one segment out of range; those are clamped back. A bin
/// outside the table cannot come from in-footprint coordinates and
/// indicates a filter-gate/grid-sizing mismatch, so it fails loudly.
#[inline]
pub fn cell_index(config: &GridConfig, x: f32, y: f32) -> (usize, usize) {
    let (seg, bin) = to_polar_cell(config, x, y);
    let seg = seg.clamp(0, config.grid_segments as i32 - 1) as usize;
    assert!(
        bin >= 0 && (bin as usize) < config.bins(),
        "radial bin {} out of range for ({}, {})",
        bin,
        x,
        y
    );
    (seg, bin as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridParams;
    use std::f32::consts::FRAC_PI_4;

    fn test_config() -> GridConfig {
        GridConfig::new(GridParams {
            grid_max_range: 10.0,
            grid_cell_size: 0.25,
            grid_segments: 8,
            ..GridParams::default()
        })
    }

    /// Build a point at polar angle `angle` (as measured by the grid,
    /// i.e. -atan2(y, x)) and planar range `range`.
    fn point_at(angle: f32, range: f32) -> (f32, f32) {
        (angle.cos() * range, -angle.sin() * range)
    }

    #[test]
    fn test_mid_cell_indices() {
        let config = test_config();
        let seg_width = FRAC_PI_4 * 2.0 / 8.0;

        for seg in 0..8 {
            for bin in [0usize, 3, 17] {
                let angle = (seg as f32 + 0.5) * seg_width - FRAC_PI_4;
                let range = bin as f32 * 0.25 + 0.125;
                let (x, y) = point_at(angle, range);
                assert_eq!(to_polar_cell(&config, x, y), (seg as i32, bin as i32));
            }
        }
    }

    #[test]
    fn test_trailing_diagonal_forced_to_last_segment() {
        let config = test_config();
        // x == -y sits exactly on the trailing FOV boundary.
        let (seg, bin) = to_polar_cell(&config, 2.0, -2.0);
        assert_eq!(seg, 7);
        assert_eq!(bin, (8.0f32.sqrt() * 4.0) as i32);
    }

    #[test]
    fn test_to_cartesian_representative_point() {
        let config = test_config();

        // Segment 4 of 8 starts exactly at angle 0: straight ahead.
        let (x, y) = to_cartesian(&config, 4, 8);
        assert!((x - 2.0).abs() < 1e-4, "x = {}", x);
        assert!(y.abs() < 1e-4, "y = {}", y);

        // Bin 0 collapses to the sensor origin regardless of segment.
        let (x, y) = to_cartesian(&config, 2, 0);
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn test_cell_index_clamps_fov_edges() {
        let config = test_config();
        // Leading diagonal (y = +x) floors to -1 under rounding; must
        // clamp into the first segment instead of panicking.
        let (seg, _bin) = cell_index(&config, 3.0, 3.0);
        assert_eq!(seg, 0);
    }

    #[test]
    #[should_panic]
    fn test_cell_index_rejects_out_of_range_bin() {
        let config = test_config();
        // Far outside the radial table: contract violation.
        cell_index(&config, 100.0, 0.0);
    }
}
