// SPDX-License-Identifier: Apache-2.0

//! The per-frame processing pipeline.
//!
//! One [`Pipeline::process`] call runs a complete frame to the end:
//! binning, ground-plane estimation, classification, rasterization.
//! All per-frame state is reset at frame start; only the configuration,
//! the reused grid/raster allocations, and the plane fitter live across
//! frames, so independent frames carry no data dependency on each
//! other. The frame sequence number is owned by the caller and passed
//! in per call.

use crate::{
    binner, classifier,
    cloud::Points,
    config::GridConfig,
    estimator,
    grid::PolarGrid,
    plane::{PlaneFitter, PlaneModel, RansacPlaneFitter},
    raster::OccupancyRaster,
};
use tracing::{info, info_span};

/// All outputs of one processed frame.
///
/// Every set is rebuilt from scratch each frame. The occupancy raster
/// itself stays owned by the [`Pipeline`] (its buffer is reused) and is
/// read through [`Pipeline::raster`] after processing.
pub struct FrameOutput {
    /// Points passing the range/angle/height gate
    pub filtered: Points,
    /// Ground-plane fit candidates (one lowest point per flat cell)
    pub ground_plane: Points,
    /// Filtered points at ground level
    pub ground: Points,
    /// Filtered points rising above occupied cells
    pub elevated: Points,
    /// One point per footprint raster cell at the ground estimate
    pub voxel_ground: Points,
    /// Vertical columns over occupied raster cells
    pub voxel_elevated: Points,
    /// The fitted (possibly degraded) plane model
    pub plane: PlaneModel,
}

/// Frame pipeline: configuration plus reusable grid, raster, and fitter.
pub struct Pipeline<F = RansacPlaneFitter> {
    config: GridConfig,
    grid: PolarGrid,
    raster: OccupancyRaster,
    fitter: F,
}

impl Pipeline<RansacPlaneFitter> {
    pub fn new(config: GridConfig) -> Self {
        Self::with_fitter(config, RansacPlaneFitter::new())
    }
}

impl<F: PlaneFitter> Pipeline<F> {
    /// Build a pipeline around a caller-provided plane fitter, e.g. a
    /// deterministic one for tests.
    pub fn with_fitter(config: GridConfig, fitter: F) -> Self {
        Self {
            grid: PolarGrid::new(&config),
            raster: OccupancyRaster::new(&config),
            config,
            fitter,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The occupancy raster as of the most recent frame.
    pub fn raster(&self) -> &OccupancyRaster {
        &self.raster
    }

    /// Process one frame to completion.
    pub fn process(&mut self, frame: u32, cloud: &Points) -> FrameOutput {
        self.grid.reset();

        let filtered = info_span!("binning")
            .in_scope(|| binner::bin_cloud(&self.config, cloud, &mut self.grid));

        let (ground_plane, plane) = info_span!("ground_plane").in_scope(|| {
            estimator::estimate_ground_plane(&self.config, &self.grid, &mut self.fitter)
        });
        info!(
            frame,
            candidates = ground_plane.len(),
            inliers = plane.inliers,
            ground_height = plane.center_height() as f64,
            a = plane.a as f64,
            b = plane.b as f64,
            c = plane.c as f64,
            d = plane.d as f64,
            "ground plane estimation"
        );

        info_span!("classify")
            .in_scope(|| classifier::classify(&self.config, &mut self.grid, &plane));
        let (ground, elevated) = classifier::partition(&self.config, &self.grid, &filtered);

        let (voxel_ground, voxel_elevated) =
            info_span!("rasterize").in_scope(|| self.raster.rasterize(&self.config, &self.grid));

        info!(
            frame,
            points = filtered.len(),
            elevated = elevated.len(),
            ground = ground.len(),
            "processed frame"
        );

        FrameOutput {
            filtered,
            ground_plane,
            ground,
            elevated,
            voxel_ground,
            voxel_elevated,
            plane,
        }
    }
}
