// SPDX-License-Identifier: Apache-2.0

//! Common point cloud container and crate error type.

use std::fmt;

/// Point cloud storage in structure-of-arrays (SoA) layout.
///
/// Coordinates follow the lidar sensor frame: x forward, y left, z up.
/// The intensity channel rides along through filtering so published
/// clouds keep the sensor's reflectivity values; synthesized clouds
/// (voxel outputs) carry zero intensity.
#[derive(Clone, Debug, Default)]
pub struct Points {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub intensity: Vec<u8>,
}

impl Points {
    /// Create an empty Points structure
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an empty Points structure with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            intensity: Vec::with_capacity(capacity),
        }
    }

    /// Append a single point
    #[inline]
    pub fn push(&mut self, x: f32, y: f32, z: f32, intensity: u8) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.intensity.push(intensity);
    }

    /// Clear all points while retaining capacity
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.intensity.clear();
    }

    /// Get the current number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Common error type for message decode and I/O operations.
///
/// The frame pipeline itself is infallible: filtering drops are silent,
/// a degraded plane fit only warns, and grid indexing faults are
/// programming errors surfaced as panics. Everything recoverable lives
/// at the transport boundary and is captured here.
#[derive(Debug)]
pub enum Error {
    /// I/O error (socket, file operations)
    Io(std::io::Error),
    /// CDR encode/decode error
    Encode(cdr::Error),
    /// Required point field missing from a PointCloud2 message
    MissingField(&'static str),
    /// Unexpected end of data at given byte position
    UnexpectedEnd(usize),
    /// Unsupported data format
    UnsupportedFormat(String),
    /// System time error
    SystemTime(std::time::SystemTimeError),
    /// Configuration error
    Config(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Encode(err) => write!(f, "CDR error: {}", err),
            Error::MissingField(name) => write!(f, "missing point field: {}", name),
            Error::UnexpectedEnd(len) => write!(f, "unexpected end of data at {} bytes", len),
            Error::UnsupportedFormat(format) => write!(f, "unsupported format: {}", format),
            Error::SystemTime(err) => write!(f, "system time error: {}", err),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<cdr::Error> for Error {
    fn from(err: cdr::Error) -> Self {
        Error::Encode(err)
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(err: std::time::SystemTimeError) -> Self {
        Error::SystemTime(err)
    }
}
