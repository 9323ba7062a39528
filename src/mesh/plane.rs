//! Oriented planes and polygon splitting.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Plane classification bits
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `n · p = w` with unit normal `n`; "front" is the side `n` points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Plane with the given normal passing at signed distance `w` from the
    /// origin. The normal is normalized.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane { normal: normal.normalize(), w }
    }

    /// Plane through three points, normal following the right-hand rule
    /// `(b - a) × (c - a)`. Degenerate triangles give `None`.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() < EPSILON * EPSILON * EPSILON {
            return None;
        }
        let normal = normal.normalize();
        Some(Plane { normal, w: normal.dot(&a.coords) })
    }

    /// Plane of a polygon from Newell's method, robust to slightly non-planar
    /// and nearly collinear rings.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let normal = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + curr.pos.coords.cross(&next.pos.coords)
            });
        if normal.norm_squared() < EPSILON * EPSILON * EPSILON * EPSILON {
            return None;
        }
        let normal = normal.normalize();
        let centroid = vertices.iter().fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
            / vertices.len() as Real;
        Some(Plane { normal, w: normal.dot(&centroid) })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        if distance > EPSILON {
            FRONT
        } else if distance < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Split a polygon by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon.vertices.iter().map(|v| self.orient_point(&v.pos)).collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut split_front = Vec::<Vertex>::new();
                let mut split_back = Vec::<Vertex>::new();
                let n = polygon.vertices.len();

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vertex_i, vertex_j) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        if let Some(vertex_new) = self.split_edge(vertex_i, vertex_j) {
                            split_front.push(vertex_new);
                            split_back.push(vertex_new);
                        }
                    }
                }

                // Keep the parent's plane rather than refitting the pieces.
                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }

    /// Vertex where the edge `a`-`b` meets this plane.
    ///
    /// The endpoints are ordered before interpolating so that the two
    /// polygons sharing an edge produce bit-identical crossings.
    fn split_edge(&self, a: &Vertex, b: &Vertex) -> Option<Vertex> {
        let (a, b) = if (a.pos.x, a.pos.y, a.pos.z) <= (b.pos.x, b.pos.y, b.pos.z) {
            (a, b)
        } else {
            (b, a)
        };
        let denom = self.normal.dot(&(b.pos - a.pos));
        if denom.abs() <= EPSILON * EPSILON {
            return None;
        }
        let t = (self.w - self.normal.dot(&a.pos.coords)) / denom;
        Some(a.interpolate(b, t))
    }
}
