//! Colored 3D point and point cloud types.

use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

/// Colored 3D point (meters, 8-bit RGB).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointXyzRgb {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
    /// Z coordinate in meters
    pub z: f32,
    /// Color as (r, g, b)
    pub rgb: [u8; 3],
}

impl PointXyzRgb {
    /// Create an uncolored (black) point.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            rgb: [0, 0, 0],
        }
    }

    /// Create a colored point.
    #[inline]
    pub fn with_rgb(x: f32, y: f32, z: f32, rgb: [u8; 3]) -> Self {
        Self { x, y, z, rgb }
    }

    /// Position as a nalgebra point.
    #[inline]
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Check that all coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Point cloud handed to registration engines.
///
/// Stored array-of-structs so points and colors stay together when
/// backends reorder or subsample them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointCloud3D {
    /// Points in the cloud's frame
    pub points: Vec<PointXyzRgb>,
}

impl PointCloud3D {
    /// Create an empty point cloud.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create from a vector of points.
    pub fn from_points(points: Vec<PointXyzRgb>) -> Self {
        Self { points }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point.
    #[inline]
    pub fn push(&mut self, point: PointXyzRgb) {
        self.points.push(point);
    }

    /// Iterate over points.
    pub fn iter(&self) -> std::slice::Iter<'_, PointXyzRgb> {
        self.points.iter()
    }

    /// Centroid of all points, or `None` for an empty cloud.
    pub fn centroid(&self) -> Option<Point3<f32>> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.position().coords);
        Some(Point3::from(sum / self.len() as f32))
    }

    /// Apply a homogeneous rigid transform, keeping colors.
    pub fn transform(&self, transform: &Matrix4<f32>) -> Self {
        self.iter()
            .map(|p| {
                let q = transform.transform_point(&p.position());
                PointXyzRgb::with_rgb(q.x, q.y, q.z, p.rgb)
            })
            .collect()
    }
}

impl FromIterator<PointXyzRgb> for PointCloud3D {
    fn from_iter<I: IntoIterator<Item = PointXyzRgb>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
