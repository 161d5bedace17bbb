// SPDX-License-Identifier: Apache-2.0

//! Point filtering and polar binning.
//!
//! First pipeline stage: gates the raw cloud down to the forward
//! field of view and the configured range/height window, then bins every
//! surviving point into the polar grid while accumulating per-cell
//! statistics. Points failing a gate are dropped silently; dropping is
//! the intended filter behavior, not a failure.

use crate::{cloud::Points, config::GridConfig, geometry, grid::PolarGrid};
use itertools::izip;

/// Filter the raw cloud and populate per-cell statistics.
///
/// Returns the filtered point subsequence (order preserving). A point
/// survives iff `|atan2(y, x)| < opening_angle`, `min_range < range <
/// max_range` (planar range) and `z > lidar_min_height`.
pub fn bin_cloud(config: &GridConfig, cloud: &Points, grid: &mut PolarGrid) -> Points {
    let mut filtered = Points::with_capacity(cloud.len());

    for (&x, &y, &z, &intensity) in izip!(&cloud.x, &cloud.y, &cloud.z, &cloud.intensity) {
        let angle = y.atan2(x).abs();
        if angle >= config.opening_angle() {
            continue;
        }

        let range = (x * x + y * y).sqrt();
        if range <= config.grid_min_range || range >= config.grid_max_range {
            continue;
        }

        if z <= config.lidar_min_height {
            continue;
        }

        let (seg, bin) = geometry::cell_index(config, x, y);
        let cell = grid.cell_mut(seg, bin);

        if cell.count == 0 {
            cell.x_min = x;
            cell.y_min = y;
            cell.z_min = z;
            cell.z_max = z;
        } else {
            if z < cell.z_min {
                cell.x_min = x;
                cell.y_min = y;
                cell.z_min = z;
            }
            if z > cell.z_max {
                cell.z_max = z;
            }
        }
        cell.count += 1;

        filtered.push(x, y, z, intensity);
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridParams;

    fn test_config() -> GridConfig {
        GridConfig::new(GridParams {
            lidar_min_height: -2.0,
            grid_min_range: 1.0,
            grid_max_range: 10.0,
            grid_cell_size: 0.5,
            grid_segments: 8,
            ..GridParams::default()
        })
    }

    #[test]
    fn test_filter_gates() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        let mut cloud = Points::empty();

        cloud.push(5.0, 0.0, 0.0, 1); // passes
        cloud.push(0.0, 5.0, 0.0, 2); // 90 degrees off axis: outside FOV
        cloud.push(0.5, 0.0, 0.0, 3); // below min range
        cloud.push(12.0, 0.0, 0.0, 4); // beyond max range
        cloud.push(5.0, 0.0, -2.5, 5); // below min height
        cloud.push(10.0, 0.0, 0.0, 6); // range == max: rejected, gate is strict
        cloud.push(4.0, -1.0, -1.5, 7); // passes

        let filtered = bin_cloud(&config, &cloud, &mut grid);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.intensity, vec![1, 7]);
        // Order preserving
        assert_eq!(filtered.x, vec![5.0, 4.0]);
    }

    #[test]
    fn test_cell_statistics() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        let mut cloud = Points::empty();

        // Three points in the same cell, lowest z arrives in the middle.
        cloud.push(5.0, -0.1, 0.5, 0);
        cloud.push(5.1, -0.15, -1.0, 0);
        cloud.push(5.2, -0.12, 1.5, 0);

        let filtered = bin_cloud(&config, &cloud, &mut grid);
        assert_eq!(filtered.len(), 3);

        let (seg, bin) = geometry::cell_index(&config, 5.0, -0.1);
        let cell = grid.cell(seg, bin);
        assert_eq!(cell.count, 3);
        assert_eq!(cell.z_min, -1.0);
        assert_eq!(cell.z_max, 1.5);
        // (x_min, y_min) follow the lowest-z point, not the nearest one.
        assert_eq!((cell.x_min, cell.y_min), (5.1, -0.15));
    }

    #[test]
    fn test_empty_cloud() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        let filtered = bin_cloud(&config, &Points::empty(), &mut grid);
        assert!(filtered.is_empty());
        for seg in 0..grid.segments() {
            for bin in 0..grid.bins() {
                assert_eq!(grid.cell(seg, bin).count, 0);
            }
        }
    }
}
