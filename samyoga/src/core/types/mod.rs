//! Core data types for scan registration.
//!
//! - [`PointXyzRgb`]: colored 3D point in meters
//! - [`PointCloud3D`]: collection of colored points in a sensor or map frame

mod point;

pub use point::{PointCloud3D, PointXyzRgb};
