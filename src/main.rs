// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use lidargrid::{
    args::Args,
    config::{GridConfig, GridParams},
    msg::{self, Image, PointCloud2},
    pipeline::Pipeline,
    Points,
};
use tracing::{debug, error, info};
use zenoh::{
    bytes::{Encoding, ZBytes},
    pubsub::Publisher,
    qos::{CongestionControl, Priority},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.rust_log)
        .init();

    let config = GridConfig::new(GridParams::from(&args));
    info!(
        grid_width = config.grid_width(),
        grid_height = config.grid_height(),
        grid_bins = config.bins(),
        grid_segments = config.grid_segments,
        cell_size = config.grid_cell_size as f64,
        "grid sizing"
    );

    let session = zenoh::open(zenoh::Config::from(args.clone())).await?;
    debug!("opened zenoh session");

    let cloud_sub = session.declare_subscriber(args.cloud_topic.clone()).await?;
    let camera_sub = session
        .declare_subscriber(args.camera_topic.clone())
        .await?;

    let pub_filtered = declare_publisher(&session, &args.output_topic, "cloud_filtered").await?;
    let pub_ground_plane =
        declare_publisher(&session, &args.output_topic, "cloud_groundplane").await?;
    let pub_ground = declare_publisher(&session, &args.output_topic, "cloud_ground").await?;
    let pub_elevated = declare_publisher(&session, &args.output_topic, "cloud_elevated").await?;
    let pub_voxel_ground = declare_publisher(&session, &args.output_topic, "voxel_ground").await?;
    let pub_voxel_elevated =
        declare_publisher(&session, &args.output_topic, "voxel_elevated").await?;
    let pub_occupancy = declare_publisher(&session, &args.output_topic, "grid_occupancy").await?;

    let mut pipeline = Pipeline::new(config);
    let mut frame: u32 = 0;

    loop {
        tokio::select! {
            sample = cloud_sub.recv_async() => {
                let sample = sample?;
                let payload = sample.payload().to_bytes();
                let cloud_msg: PointCloud2 = match cdr::deserialize(&payload) {
                    Ok(msg) => msg,
                    Err(e) => {
                        error!("could not decode point cloud: {}", e);
                        continue;
                    }
                };
                let cloud = match msg::cloud_points(&cloud_msg) {
                    Ok(points) => points,
                    Err(e) => {
                        error!("could not read point cloud fields: {}", e);
                        continue;
                    }
                };

                let output = pipeline.process(frame, &cloud);

                // Some bridges forward clouds with a zeroed stamp;
                // fall back to wall-clock time for those.
                let stamp = if cloud_msg.header.stamp == msg::Time::default() {
                    msg::timestamp().unwrap_or_default()
                } else {
                    cloud_msg.header.stamp.clone()
                };
                let frame_id = cloud_msg.header.frame_id.as_str();
                publish_cloud(&pub_filtered, &output.filtered, &stamp, frame_id).await;
                publish_cloud(&pub_ground_plane, &output.ground_plane, &stamp, frame_id).await;
                publish_cloud(&pub_ground, &output.ground, &stamp, frame_id).await;
                publish_cloud(&pub_elevated, &output.elevated, &stamp, frame_id).await;
                publish_cloud(&pub_voxel_ground, &output.voxel_ground, &stamp, frame_id).await;
                publish_cloud(&pub_voxel_elevated, &output.voxel_elevated, &stamp, frame_id).await;

                let grid_msg = msg::occupancy_grid(
                    pipeline.raster(),
                    pipeline.config(),
                    stamp,
                    frame_id,
                );
                publish(
                    &pub_occupancy,
                    &grid_msg,
                    "nav_msgs/msg/OccupancyGrid",
                )
                .await;

                frame = frame.wrapping_add(1);
            }
            sample = camera_sub.recv_async() => {
                if let Ok(sample) = sample {
                    match cdr::deserialize::<Image>(&sample.payload().to_bytes()) {
                        Ok(image) => debug!(width = image.width, height = image.height, "camera frame"),
                        Err(e) => debug!("could not decode camera image: {}", e),
                    }
                }
            }
        }
    }
}

async fn declare_publisher<'a>(
    session: &'a zenoh::Session,
    base: &str,
    name: &str,
) -> Result<Publisher<'a>, Box<dyn std::error::Error + Send + Sync>> {
    let topic = format!("{}/{}", base, name);
    match session
        .declare_publisher(topic.clone())
        .priority(Priority::DataHigh)
        .congestion_control(CongestionControl::Drop)
        .await
    {
        Ok(publisher) => Ok(publisher),
        Err(e) => {
            error!("failed to create publisher {}: {:?}", topic, e);
            Err(e.into())
        }
    }
}

async fn publish_cloud(
    publisher: &Publisher<'_>,
    points: &Points,
    stamp: &msg::Time,
    frame_id: &str,
) {
    let message = msg::pointcloud2(points, stamp.clone(), frame_id);
    publish(publisher, &message, "sensor_msgs/msg/PointCloud2").await;
}

async fn publish<T: serde::Serialize>(publisher: &Publisher<'_>, message: &T, schema: &str) {
    let encoded = match cdr::serialize::<_, _, cdr::CdrLe>(message, cdr::Infinite) {
        Ok(encoded) => encoded,
        Err(e) => {
            error!("{} encode error: {:?}", publisher.key_expr(), e);
            return;
        }
    };

    let encoding = Encoding::APPLICATION_CDR.with_schema(schema);
    match publisher
        .put(ZBytes::from(encoded))
        .encoding(encoding)
        .await
    {
        Ok(_) => {}
        Err(e) => error!("{} publish error: {:?}", publisher.key_expr(), e),
    }
}
