//! Convex planar polygons.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Polygon {
    /// Build a polygon, fitting its plane to the vertices and stamping the
    /// plane normal on each vertex. Degenerate rings give `None`.
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        let plane = Plane::from_vertices(&vertices)?;
        let vertices = vertices
            .into_iter()
            .map(|v| Vertex::new(v.pos, plane.normal))
            .collect();
        Some(Self::with_plane(vertices, plane))
    }

    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane, bounding_box: OnceLock::new() }
    }

    /// Triangle from three positions, `None` when they are collinear.
    pub fn triangle(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let plane = Plane::from_points(a, b, c)?;
        let n = plane.normal;
        Some(Self::with_plane(
            vec![Vertex::new(a, n), Vertex::new(b, n), Vertex::new(c, n)],
            plane,
        ))
    }

    pub fn normal(&self) -> Vector3<Real> {
        self.plane.normal
    }

    /// Reverse winding and normals.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan triangulation; exact for the convex polygons this crate builds.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let Some((first, rest)) = self.vertices.split_first() else {
            return Vec::new();
        };
        rest.windows(2).map(|w| [*first, w[0], w[1]]).collect()
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }
}
