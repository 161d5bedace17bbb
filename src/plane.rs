// SPDX-License-Identifier: Apache-2.0

//! Robust ground-plane fitting.
//!
//! The pipeline only depends on the [`PlaneFitter`] contract: maximize
//! the inlier count under a perpendicular-distance tolerance. The
//! default implementation is a minimal-sample RANSAC; tests substitute
//! [`FixedPlaneFitter`] to pin deterministic coefficients.

use crate::cloud::Points;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Plane coefficients `a·x + b·y + c·z + d = 0` with fit statistics.
///
/// The normal is unit length and oriented upward (`c >= 0`). The default
/// model is the identity up-plane with zero inliers, which is what a fit
/// over an empty or degenerate candidate set returns.
#[derive(Clone, Copy, Debug)]
pub struct PlaneModel {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    /// Points within tolerance of the fitted plane
    pub inliers: usize,
    /// Points the fit was run over
    pub points: usize,
}

impl Default for PlaneModel {
    fn default() -> Self {
        Self {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: 0.0,
            inliers: 0,
            points: 0,
        }
    }
}

impl PlaneModel {
    /// Ground elevation at the center of the grid (`-d / c`).
    #[inline]
    pub fn center_height(&self) -> f32 {
        -self.d / self.c
    }

    /// Ground elevation at a planar position.
    #[inline]
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        (-self.a * x - self.b * y - self.d) / self.c
    }
}

/// Robust plane-fitting contract.
///
/// Implementations must optimize for maximum inlier count under the
/// given perpendicular-distance tolerance. The pipeline does not depend
/// on fit determinism, only on plausibility bounds checked downstream.
pub trait PlaneFitter {
    fn fit_plane(&mut self, points: &Points, tolerance: f32, max_iterations: usize) -> PlaneModel;
}

/// Randomized minimal-sample RANSAC plane fit.
pub struct RansacPlaneFitter {
    rng: StdRng,
}

impl RansacPlaneFitter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded variant for reproducible fits.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RansacPlaneFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneFitter for RansacPlaneFitter {
    fn fit_plane(&mut self, points: &Points, tolerance: f32, max_iterations: usize) -> PlaneModel {
        let n = points.len();
        let mut best = PlaneModel {
            points: n,
            ..PlaneModel::default()
        };
        if n < 3 {
            return best;
        }

        for _ in 0..max_iterations {
            let i0 = self.rng.random_range(0..n);
            let mut i1 = self.rng.random_range(0..n);
            while i1 == i0 {
                i1 = self.rng.random_range(0..n);
            }
            let mut i2 = self.rng.random_range(0..n);
            while i2 == i0 || i2 == i1 {
                i2 = self.rng.random_range(0..n);
            }

            // Plane through the three sampled points.
            let (ux, uy, uz) = (
                points.x[i1] - points.x[i0],
                points.y[i1] - points.y[i0],
                points.z[i1] - points.z[i0],
            );
            let (vx, vy, vz) = (
                points.x[i2] - points.x[i0],
                points.y[i2] - points.y[i0],
                points.z[i2] - points.z[i0],
            );
            let a = uy * vz - uz * vy;
            let b = uz * vx - ux * vz;
            let c = ux * vy - uy * vx;
            let norm = (a * a + b * b + c * c).sqrt();
            if norm < 1e-9 {
                // Degenerate (collinear) sample
                continue;
            }
            let (a, b, c) = (a / norm, b / norm, c / norm);
            // A vertical plane has no height function; `height_at`
            // would divide by zero.
            if c.abs() < 1e-6 {
                continue;
            }
            let d = -(a * points.x[i0] + b * points.y[i0] + c * points.z[i0]);

            let inliers = count_inliers(points, a, b, c, d, tolerance);
            if inliers > best.inliers {
                best = PlaneModel {
                    a,
                    b,
                    c,
                    d,
                    inliers,
                    points: n,
                };
                if inliers == n {
                    break;
                }
            }
        }

        // Keep the normal pointing up so -d/c reads as ground height.
        if best.inliers > 0 && best.c < 0.0 {
            best.a = -best.a;
            best.b = -best.b;
            best.c = -best.c;
            best.d = -best.d;
        }
        best
    }
}

#[inline]
fn count_inliers(points: &Points, a: f32, b: f32, c: f32, d: f32, tolerance: f32) -> usize {
    itertools::izip!(&points.x, &points.y, &points.z)
        .filter(|&(x, y, z)| (a * x + b * y + c * z + d).abs() < tolerance)
        .count()
}

/// Deterministic [`PlaneFitter`] returning preset coefficients.
///
/// Substitutes for the randomized fit in classifier and rasterizer
/// tests, mirroring how packet sources are substituted for live sockets
/// elsewhere in the stack.
pub struct FixedPlaneFitter {
    pub model: PlaneModel,
}

impl FixedPlaneFitter {
    pub fn new(model: PlaneModel) -> Self {
        Self { model }
    }

    /// Horizontal plane at the given ground elevation.
    pub fn horizontal(ground_height: f32, inliers: usize) -> Self {
        Self::new(PlaneModel {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: -ground_height,
            inliers,
            points: inliers,
        })
    }
}

impl PlaneFitter for FixedPlaneFitter {
    fn fit_plane(&mut self, points: &Points, _tolerance: f32, _max_iterations: usize) -> PlaneModel {
        PlaneModel {
            points: points.len(),
            ..self.model
        }
    }
}
