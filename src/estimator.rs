// SPDX-License-Identifier: Apache-2.0

//! Ground-plane estimation from flat polar cells.
//!
//! Every populated cell whose point height spread stays below the
//! obstacle threshold contributes its lowest point as a ground
//! candidate. The candidate set goes to the robust plane fit; a
//! plausibility check warns (and only warns) when the fit is empty or
//! lands outside the window expected from the configured mount height.
//! The pipeline never aborts a frame on a bad fit; downstream stages
//! inherit the degraded estimate for that frame.

use crate::{
    cloud::Points,
    config::GridConfig,
    grid::PolarGrid,
    plane::{PlaneFitter, PlaneModel},
};
use tracing::warn;

/// Half-width of the plausible window around `-lidar_height` for the
/// fitted center ground height.
const GROUND_HEIGHT_WINDOW: f32 = 0.25;

/// Collect ground candidates, fit the plane, and sanity-check it.
///
/// Returns the candidate cloud (published for diagnostics) and the
/// fitted model, degraded or not.
pub fn estimate_ground_plane<F: PlaneFitter>(
    config: &GridConfig,
    grid: &PolarGrid,
    fitter: &mut F,
) -> (Points, PlaneModel) {
    let mut candidates = Points::empty();

    for seg in 0..grid.segments() {
        for bin in 0..grid.bins() {
            let cell = grid.cell(seg, bin);
            if cell.count > 0 && cell.z_max - cell.z_min < config.grid_min_height {
                candidates.push(cell.x_min, cell.y_min, cell.z_min, 0);
            }
        }
    }

    let model = fitter.fit_plane(&candidates, config.ransac_tolerance, config.ransac_iterations);

    let center = model.center_height();
    let low = -(config.lidar_height + GROUND_HEIGHT_WINDOW);
    let high = -(config.lidar_height - GROUND_HEIGHT_WINDOW);
    if model.inliers == 0 || !(low..=high).contains(&center) {
        warn!(
            inliers = model.inliers,
            candidates = candidates.len(),
            ground_height = center as f64,
            "bad ground plane estimation"
        );
    }

    (candidates, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binner,
        config::GridParams,
        plane::{FixedPlaneFitter, RansacPlaneFitter},
    };

    fn test_config() -> GridConfig {
        GridConfig::new(GridParams {
            lidar_height: 1.7,
            lidar_min_height: -3.0,
            grid_min_range: 1.0,
            grid_max_range: 10.0,
            grid_cell_size: 0.5,
            grid_min_height: 0.2,
            grid_segments: 8,
            ransac_tolerance: 0.1,
            ransac_iterations: 100,
        })
    }

    #[test]
    fn test_flat_cell_selection() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        let mut cloud = Points::empty();

        // Flat cell: two points with small spread
        cloud.push(5.0, -0.1, -1.7, 0);
        cloud.push(5.1, -0.15, -1.65, 0);
        // Obstacle cell: spread above the threshold
        cloud.push(3.0, 1.0, -1.7, 0);
        cloud.push(3.05, 1.0, -0.5, 0);

        binner::bin_cloud(&config, &cloud, &mut grid);

        let mut fitter = FixedPlaneFitter::horizontal(-1.7, 1);
        let (candidates, _model) = estimate_ground_plane(&config, &grid, &mut fitter);

        // Only the flat cell contributes, via its lowest point.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.x[0], 5.0);
        assert_eq!(candidates.z[0], -1.7);
    }

    #[test]
    fn test_fit_over_synthetic_ground() {
        let config = test_config();
        let mut grid = PolarGrid::new(&config);
        let mut cloud = Points::empty();

        // Flat ground fan at z = -1.7 across many cells
        for i in 0..14 {
            for j in 0..9 {
                let x = 2.0 + i as f32 * 0.5;
                let y = (j as f32 - 4.0) * 0.2 * (x / 4.0);
                cloud.push(x, y, -1.7, 0);
            }
        }

        binner::bin_cloud(&config, &cloud, &mut grid);

        let mut fitter = RansacPlaneFitter::seeded(11);
        let (candidates, model) = estimate_ground_plane(&config, &grid, &mut fitter);

        assert!(candidates.len() >= 10);
        assert!(model.inliers == candidates.len());
        assert!(
            (model.center_height() + 1.7).abs() < 1e-3,
            "center height = {}",
            model.center_height()
        );
    }

    #[test]
    fn test_empty_grid_degrades() {
        let config = test_config();
        let grid = PolarGrid::new(&config);

        let mut fitter = RansacPlaneFitter::seeded(5);
        let (candidates, model) = estimate_ground_plane(&config, &grid, &mut fitter);

        assert!(candidates.is_empty());
        assert_eq!(model.inliers, 0);
        // Identity up-plane keeps downstream math finite.
        assert_eq!(model.center_height(), 0.0);
    }
}
