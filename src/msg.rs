// SPDX-License-Identifier: Apache-2.0

//! ROS 2 compatible message types and CDR payload helpers.
//!
//! The wire surface speaks `sensor_msgs/msg/PointCloud2`,
//! `sensor_msgs/msg/Image` and `nav_msgs/msg/OccupancyGrid` encoded
//! with CDR, interoperable with zenoh ROS bridges. The message structs
//! are mirrored here with serde derives; field order matches the ROS
//! IDL, which is what CDR serialization keys on.
//!
//! Published clouds use the 13-byte xyz + intensity packing:
//!
//! ```text
//! ┌───────┬───────┬───────┬───────────┐
//! │ x:f32 │ y:f32 │ z:f32 │ intensity │
//! │ 4B    │ 4B    │ 4B    │ 1B        │
//! └───────┴───────┴───────┴───────────┘
//! ```

use crate::{
    cloud::{Error, Points},
    config::GridConfig,
    raster::OccupancyRaster,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointField {
    pub name: String,
    pub offset: u32,
    pub datatype: u8,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointCloud2 {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub fields: Vec<PointField>,
    pub is_bigendian: bool,
    pub point_step: u32,
    pub row_step: u32,
    pub data: Vec<u8>,
    pub is_dense: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub encoding: String,
    pub is_bigendian: u8,
    pub step: u32,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapMetaData {
    pub map_load_time: Time,
    pub resolution: f32,
    pub width: u32,
    pub height: u32,
    pub origin: Pose,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OccupancyGrid {
    pub header: Header,
    pub info: MapMetaData,
    pub data: Vec<i8>,
}

/// Point field data types for PointCloud2 messages.
///
/// These values correspond to the ROS sensor_msgs/PointField datatype
/// field. All variants are defined for completeness, even if not all
/// are currently used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(dead_code)]
pub enum PointFieldType {
    INT8 = 1,
    UINT8 = 2,
    INT16 = 3,
    UINT16 = 4,
    INT32 = 5,
    UINT32 = 6,
    FLOAT32 = 7,
    FLOAT64 = 8,
}

/// Current wall-clock time as a ROS stamp.
pub fn timestamp() -> Result<Time, Error> {
    let duration = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(Time {
        sec: duration.as_secs() as i32,
        nanosec: duration.subsec_nanos(),
    })
}

/// Build the standard XYZ + intensity point fields (13-byte stride).
pub fn xyz_intensity_fields() -> Vec<PointField> {
    vec![
        PointField {
            name: String::from("x"),
            offset: 0,
            datatype: PointFieldType::FLOAT32 as u8,
            count: 1,
        },
        PointField {
            name: String::from("y"),
            offset: 4,
            datatype: PointFieldType::FLOAT32 as u8,
            count: 1,
        },
        PointField {
            name: String::from("z"),
            offset: 8,
            datatype: PointFieldType::FLOAT32 as u8,
            count: 1,
        },
        PointField {
            name: String::from("intensity"),
            offset: 12,
            datatype: PointFieldType::UINT8 as u8,
            count: 1,
        },
    ]
}

/// Pack a point cloud into the 13-byte wire layout.
fn format_points_13byte(points: &Points) -> Vec<u8> {
    let n = points.len();
    let mut data = Vec::with_capacity(n * 13);
    for i in 0..n {
        data.extend_from_slice(&points.x[i].to_le_bytes());
        data.extend_from_slice(&points.y[i].to_le_bytes());
        data.extend_from_slice(&points.z[i].to_le_bytes());
        data.push(points.intensity[i]);
    }
    data
}

/// Build a PointCloud2 message from a point set.
pub fn pointcloud2(points: &Points, stamp: Time, frame_id: &str) -> PointCloud2 {
    let n_points = points.len();
    PointCloud2 {
        header: Header {
            stamp,
            frame_id: frame_id.to_string(),
        },
        height: 1,
        width: n_points as u32,
        fields: xyz_intensity_fields(),
        is_bigendian: false,
        point_step: 13,
        row_step: 13 * n_points as u32,
        data: format_points_13byte(points),
        is_dense: true,
    }
}

/// Build the occupancy grid message for the current raster state.
///
/// The origin places the sensor at the grid's near-center apex and the
/// orientation rotates the raster so "up" is forward from the sensor.
pub fn occupancy_grid(
    raster: &OccupancyRaster,
    config: &GridConfig,
    stamp: Time,
    frame_id: &str,
) -> OccupancyGrid {
    OccupancyGrid {
        header: Header {
            stamp: stamp.clone(),
            frame_id: frame_id.to_string(),
        },
        info: MapMetaData {
            map_load_time: stamp,
            resolution: config.grid_cell_size,
            width: raster.width() as u32,
            height: raster.height() as u32,
            origin: Pose {
                position: Point {
                    x: config.grid_max_range as f64,
                    y: config.grid_max_range as f64,
                    z: config.lidar_height as f64,
                },
                orientation: Quaternion {
                    x: 0.707,
                    y: -0.707,
                    z: 0.0,
                    w: 0.0,
                },
            },
        },
        data: raster.data().iter().copied().collect(),
    }
}

fn find_field<'a>(
    msg: &'a PointCloud2,
    name: &'static str,
) -> Result<&'a PointField, Error> {
    msg.fields
        .iter()
        .find(|f| f.name == name)
        .ok_or(Error::MissingField(name))
}

fn read_f32(data: &[u8], offset: usize) -> Result<f32, Error> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(Error::UnexpectedEnd(data.len()))?;
    Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
}

/// Extract xyz (+ optional intensity) from a PointCloud2 message.
///
/// Field offsets are located by name, so any point step and field
/// arrangement works as long as x/y/z are little-endian FLOAT32.
pub fn cloud_points(msg: &PointCloud2) -> Result<Points, Error> {
    if msg.is_bigendian {
        return Err(Error::UnsupportedFormat("big-endian point data".into()));
    }

    let fx = find_field(msg, "x")?;
    let fy = find_field(msg, "y")?;
    let fz = find_field(msg, "z")?;
    for field in [fx, fy, fz] {
        if field.datatype != PointFieldType::FLOAT32 as u8 {
            return Err(Error::UnsupportedFormat(format!(
                "field {} datatype {}",
                field.name, field.datatype
            )));
        }
    }
    let (ox, oy, oz) = (fx.offset as usize, fy.offset as usize, fz.offset as usize);

    // Intensity under either common name; absent is fine.
    let intensity = msg
        .fields
        .iter()
        .find(|f| f.name == "intensity" || f.name == "reflect")
        .map(|f| (f.offset as usize, f.datatype));

    let step = msg.point_step as usize;
    let n = (msg.width * msg.height) as usize;
    if step == 0 || msg.data.len() < n * step {
        return Err(Error::UnexpectedEnd(msg.data.len()));
    }

    let mut points = Points::with_capacity(n);
    for p in (0..n * step).step_by(step) {
        let x = read_f32(&msg.data, p + ox)?;
        let y = read_f32(&msg.data, p + oy)?;
        let z = read_f32(&msg.data, p + oz)?;
        let i = match intensity {
            Some((off, dt)) if dt == PointFieldType::UINT8 as u8 => {
                *msg.data.get(p + off).ok_or(Error::UnexpectedEnd(msg.data.len()))?
            }
            Some((off, dt)) if dt == PointFieldType::FLOAT32 as u8 => {
                read_f32(&msg.data, p + off)?.clamp(0.0, 255.0) as u8
            }
            _ => 0,
        };
        points.push(x, y, z, i);
    }

    Ok(points)
}
