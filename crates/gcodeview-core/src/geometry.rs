//! Geometry primitives shared by the reconstructor and its consumers.

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A point in machine coordinates (millimeters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the XY projection, ignoring Z
    pub fn planar_length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance between two points in the XY plane
    pub fn planar_distance(&self, other: &Vec3) -> f32 {
        (*other - *self).planar_length()
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Axis-aligned bounding box accumulated while walking a toolpath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds3 {
    /// An empty box; the first `update` defines both corners.
    pub fn new() -> Self {
        Self {
            min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    pub fn update(&mut self, p: Vec3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Extent along each axis, zero for an empty box
    pub fn size(&self) -> Vec3 {
        if !self.is_valid() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }
}

/// Inclusive min/max pair for a reported statistic.
///
/// Statistics with no contributing samples are carried as `Option<ValueRange>`
/// so "no data" never reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Widen an optional range to include `value`
    pub fn include(range: Option<ValueRange>, value: f32) -> Option<ValueRange> {
        Some(match range {
            Some(r) => ValueRange::new(r.min.min(value), r.max.max(value)),
            None => ValueRange::new(value, value),
        })
    }

    /// Range over an iterator of values, `None` if it yields nothing
    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Option<ValueRange> {
        values.into_iter().fold(None, ValueRange::include)
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_z() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 12.0);
        assert_eq!(a.planar_distance(&b), 5.0);
        assert_eq!((b - a).length(), 13.0);
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds3::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.size(), Vec3::ZERO);
    }

    #[test]
    fn test_bounds_update() {
        let mut bounds = Bounds3::new();
        bounds.update(Vec3::new(10.0, -5.0, 0.2));
        bounds.update(Vec3::new(-2.0, 7.0, 1.0));
        assert!(bounds.is_valid());
        assert_eq!(bounds.min, Vec3::new(-2.0, -5.0, 0.2));
        assert_eq!(bounds.max, Vec3::new(10.0, 7.0, 1.0));
    }

    #[test]
    fn test_value_range_from_values() {
        assert_eq!(ValueRange::from_values(Vec::<f32>::new()), None);
        let range = ValueRange::from_values([3.0, -1.0, 2.5]).unwrap();
        assert_eq!(range, ValueRange::new(-1.0, 3.0));
        assert_eq!(range.span(), 4.0);
    }
}
