// SPDX-License-Identifier: Apache-2.0

//! Occlusion-aware cell classification and point partition.
//!
//! Each angular segment is swept independently from the nearest bin
//! outward while tracking whether an obstacle has been hit. Empty cells
//! behind an obstacle are unobservable (UNKNOWN), not provably free:
//! a beam that hit something cannot report on cells behind it.
//! Ground-hugging clutter never sets the hit flag.

use crate::{
    cloud::Points,
    config::GridConfig,
    geometry,
    grid::{CellLabel, PolarGrid},
    plane::PlaneModel,
};
use itertools::izip;

/// Label every cell FREE / OCCUPIED / UNKNOWN.
///
/// Also writes each cell's `ground` (from the plane model at the cell's
/// representative position, computed for every cell since rasterization
/// needs a ground estimate everywhere) and, for populated cells,
/// `height = z_max - ground`.
pub fn classify(config: &GridConfig, grid: &mut PolarGrid, plane: &PlaneModel) {
    for seg in 0..grid.segments() {
        let mut hit = false;

        for bin in 0..grid.bins() {
            let (x, y) = geometry::to_cartesian(config, seg, bin);
            let ground = plane.height_at(x, y);

            let cell = grid.cell_mut(seg, bin);
            cell.ground = ground;

            if cell.count == 0 {
                cell.label = if hit { CellLabel::Unknown } else { CellLabel::Free };
                continue;
            }

            cell.height = cell.z_max - ground;
            if cell.height > config.grid_min_height {
                cell.label = CellLabel::Occupied;
                hit = true;
            } else {
                cell.label = if hit { CellLabel::Unknown } else { CellLabel::Free };
            }
        }
    }
}

/// Partition the filtered cloud into ground and elevated point sets.
///
/// A point is elevated only if it rises above its cell's ground estimate
/// *and* the cell itself was found occupied; a point poking above the
/// plane inside a below-threshold cell stays in the ground set.
pub fn partition(config: &GridConfig, grid: &PolarGrid, filtered: &Points) -> (Points, Points) {
    let mut ground = Points::with_capacity(filtered.len());
    let mut elevated = Points::with_capacity(filtered.len());

    for (&x, &y, &z, &intensity) in izip!(&filtered.x, &filtered.y, &filtered.z, &filtered.intensity)
    {
        let (seg, bin) = geometry::cell_index(config, x, y);
        let cell = grid.cell(seg, bin);

        if z > cell.ground && cell.height > config.grid_min_height {
            elevated.push(x, y, z, intensity);
        } else {
            ground.push(x, y, z, intensity);
        }
    }

    (ground, elevated)
}
