// SPDX-License-Identifier: Apache-2.0

//! Lidar ground-surface classification and occupancy grid library.
//!
//! Turns a single lidar frame into a classification of the surrounding
//! ground surface as FREE / OCCUPIED / UNKNOWN space, published both as
//! a cartesian occupancy raster and as segmented point clouds.
//!
//! # Architecture
//!
//! Each frame flows through four stages over a frame-local polar grid:
//!
//! ```text
//! ┌───────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │PointBinner│ ─► │ GroundPlane │ ─► │ Occupancy   │ ─► │ Grid        │
//! │ (filter + │    │ Estimator   │    │ Classifier  │    │ Rasterizer  │
//! │  binning) │    │ (RANSAC)    │    │ (sweep)     │    │ (voxelize)  │
//! └───────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!       │                 │                  │                  │
//!       ▼                 ▼                  ▼                  ▼
//!   filtered        plane model +      labeled cells,     occupancy
//!   cloud           candidate cloud    ground/elevated    raster +
//!                                      clouds             voxel clouds
//! ```
//!
//! The classification sweep models sensor occlusion: within each
//! angular segment, empty cells behind a detected obstacle are UNKNOWN
//! rather than FREE, because a beam that hit something cannot report on
//! cells behind it.
//!
//! All per-frame state is reset at frame start; only configuration and
//! reusable buffers persist. See [`pipeline::Pipeline`] for the frame
//! entry point.
//!
//! # Modules
//!
//! - [`config`]: option surface and derived grid sizing
//! - [`geometry`]: cartesian ↔ polar cell coordinate math
//! - [`grid`]: the per-frame polar cell table
//! - [`binner`]: point filtering and statistics accumulation
//! - [`plane`]: robust plane fitting behind the [`plane::PlaneFitter`] trait
//! - [`estimator`]: ground candidate selection and plausibility checks
//! - [`classifier`]: occlusion-aware labeling and point partition
//! - [`raster`]: cartesian occupancy raster and voxel cloud synthesis
//! - [`msg`]: ROS 2 compatible message types and CDR helpers

pub mod args;
pub mod binner;
pub mod classifier;
pub mod cloud;
pub mod config;
pub mod estimator;
pub mod geometry;
pub mod grid;
pub mod msg;
pub mod pipeline;
pub mod plane;
pub mod raster;

// Re-exports for convenience
pub use cloud::{Error, Points};
pub use config::{GridConfig, GridParams};
pub use grid::{CellLabel, PolarCell, PolarGrid};
pub use pipeline::{FrameOutput, Pipeline};
pub use plane::{FixedPlaneFitter, PlaneFitter, PlaneModel, RansacPlaneFitter};
pub use raster::OccupancyRaster;
