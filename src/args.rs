// SPDX-License-Identifier: Apache-2.0

use crate::config::GridParams;
use clap::Parser;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use zenoh::config::WhatAmI;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// lidar point cloud input topic
    #[arg(long, env, default_value = "rt/lidar/points")]
    pub cloud_topic: String,

    /// camera image topic, consumed only for diagnostics
    #[arg(long, env, default_value = "rt/camera/image")]
    pub camera_topic: String,

    /// base topic for published outputs
    #[arg(long, env, default_value = "rt/sensor")]
    pub output_topic: String,

    /// Lidar mount height above ground, in meters
    #[arg(long, env, default_value = "1.73")]
    pub lidar_height: f32,

    /// Minimum accepted point height in the sensor frame, in meters
    #[arg(long, env, default_value = "-1.9", allow_hyphen_values = true)]
    pub lidar_min_height: f32,

    /// Minimum radial range, in meters
    #[arg(long, env, default_value = "3.0")]
    pub grid_min_range: f32,

    /// Maximum radial range, in meters
    #[arg(long, env, default_value = "50.0")]
    pub grid_max_range: f32,

    /// Grid cell size, in meters
    #[arg(long, env, default_value = "0.25")]
    pub grid_cell_size: f32,

    /// Minimum obstacle height, in meters
    #[arg(long, env, default_value = "0.2")]
    pub grid_min_height: f32,

    /// Number of angular segments across the field of view
    #[arg(long, env, default_value = "180")]
    pub grid_segments: usize,

    /// Distance tolerance for the ground plane fit, in meters
    #[arg(long, env, default_value = "0.2")]
    pub ransac_tolerance: f32,

    /// Iteration cap for the ground plane fit
    #[arg(long, env, default_value = "50")]
    pub ransac_iterations: usize,

    /// Application log level
    #[arg(long, env, default_value = "info")]
    pub rust_log: LevelFilter,

    /// zenoh connection mode
    #[arg(long, env, default_value = "peer")]
    mode: WhatAmI,

    /// connect to zenoh endpoints
    #[arg(long, env)]
    connect: Vec<String>,

    /// listen to zenoh endpoints
    #[arg(long, env)]
    listen: Vec<String>,

    /// disable zenoh multicast scouting
    #[arg(long, env)]
    no_multicast_scouting: bool,
}

impl From<&Args> for GridParams {
    fn from(args: &Args) -> Self {
        Self {
            lidar_height: args.lidar_height,
            lidar_min_height: args.lidar_min_height,
            grid_min_range: args.grid_min_range,
            grid_max_range: args.grid_max_range,
            grid_cell_size: args.grid_cell_size,
            grid_min_height: args.grid_min_height,
            grid_segments: args.grid_segments,
            ransac_tolerance: args.ransac_tolerance,
            ransac_iterations: args.ransac_iterations,
        }
    }
}

impl From<Args> for zenoh::Config {
    fn from(args: Args) -> Self {
        let mut config = zenoh::Config::default();

        config
            .insert_json5("mode", &json!(args.mode).to_string())
            .unwrap();

        if !args.connect.is_empty() {
            config
                .insert_json5("connect/endpoints", &json!(args.connect).to_string())
                .unwrap();
        }

        if !args.listen.is_empty() {
            config
                .insert_json5("listen/endpoints", &json!(args.listen).to_string())
                .unwrap();
        }

        if args.no_multicast_scouting {
            config
                .insert_json5("scouting/multicast/enabled", &json!(false).to_string())
                .unwrap();
        }

        config
    }
}
