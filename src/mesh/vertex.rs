//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`]. The normal is copied verbatim.
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`),
    /// normals included.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let pos = self.pos + (other.pos - self.pos) * t;
        let normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(pos, normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_halfway() {
        let a = Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::x());
        let b = Vertex::new(Point3::new(2.0, 4.0, 0.0), Vector3::y());
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.pos, Point3::new(1.0, 2.0, 0.0));
        assert_eq!(mid.normal, Vector3::new(0.5, 0.5, 0.0));
    }
}
