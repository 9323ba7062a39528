//! `Mesh` struct: the polygon soup the scene backend builds, cuts and welds.

use crate::float_types::{
    EPSILON, Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::triangulated::Triangulated3D;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

pub mod plane;
pub mod polygon;
pub mod slice;
pub mod sweep;
pub mod vertex;
pub mod weld;

use plane::Plane;
use polygon::Polygon;
use vertex::Vertex;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

/// One face of an axis-aligned box, its plane pointing out of the box.
#[derive(Debug, Clone, Copy)]
struct BoxFace {
    plane: Plane,
    axis: usize,
    value: Real,
}

fn box_faces(bb: &Aabb) -> [BoxFace; 6] {
    let face = |axis: usize, outward: Real, value: Real| {
        let mut normal = Vector3::zeros();
        normal[axis] = outward;
        BoxFace { plane: Plane { normal, w: outward * value }, axis, value }
    };
    [
        face(0, -1.0, bb.mins.x),
        face(0, 1.0, bb.maxs.x),
        face(1, -1.0, bb.mins.y),
        face(1, 1.0, bb.maxs.y),
        face(2, -1.0, bb.mins.z),
        face(2, 1.0, bb.maxs.z),
    ]
}

impl Mesh {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh { polygons, bounding_box: OnceLock::new() }
    }

    /// Axis-aligned box between two corners, faces wound outwards.
    pub fn cuboid(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        let corner = |i: usize| {
            Point3::new(
                if i & 1 == 0 { mins.x } else { maxs.x },
                if i & 2 == 0 { mins.y } else { maxs.y },
                if i & 4 == 0 { mins.z } else { maxs.z },
            )
        };
        let faces: [[usize; 4]; 6] = [
            [0, 4, 6, 2],
            [1, 3, 7, 5],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 2, 3, 1],
            [4, 5, 7, 6],
        ];
        let polygons = faces
            .iter()
            .filter_map(|face| {
                Polygon::new(face.iter().map(|&i| Vertex::new(corner(i), Vector3::zeros())).collect())
            })
            .collect();
        Mesh::from_polygons(polygons)
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len().saturating_sub(2)).sum()
    }

    /// Ear-cut a simple ring given in 2D, returning index triples into
    /// `ring`.
    pub fn triangulate_ring(ring: &[[Real; 2]]) -> Vec<[usize; 3]> {
        if ring.len() < 3 {
            return Vec::new();
        }
        let outline = LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect());
        let triangulation = GeoPolygon::new(outline, vec![]).earcut_triangles_raw();
        // the closing coordinate, when present, aliases the first one
        triangulation
            .triangle_indices
            .chunks_exact(3)
            .map(|tri| [tri[0] % ring.len(), tri[1] % ring.len(), tri[2] % ring.len()])
            .collect()
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for poly in &self.polygons {
                let bb = poly.bounding_box();
                mins = mins.inf(&bb.mins);
                maxs = maxs.sup(&bb.maxs);
            }
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Volume enclosed by a closed, outward-wound surface; negative when the
    /// winding points inwards.
    pub fn signed_volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
            .sum()
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding-box tests.
    fn partition_polys(polys: &[Polygon], other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        polys.iter().cloned().partition(|p| p.bounding_box().intersects(other_bb))
    }

    /// Remove the part of this closed surface inside an axis-aligned box.
    ///
    /// Polygons are clipped against the six box planes, keeping what lies
    /// outside any of them. Each opening the clipping leaves on a box face
    /// is closed by ear-cutting its rim, wound to face into the box. The cap
    /// reuses the rim vertices, so the result stays watertight.
    pub fn difference_box(&self, bb: &Aabb) -> Mesh {
        let faces = box_faces(bb);
        let (near, mut polygons) = Self::partition_polys(&self.polygons, bb);

        let mut clipped = Vec::new();
        for polygon in &near {
            let mut inside = vec![polygon.clone()];
            for face in &faces {
                let mut next = Vec::new();
                for piece in &inside {
                    let (coplanar_front, coplanar_back, front, back) = face.plane.split_polygon(piece);
                    polygons.extend(coplanar_front);
                    polygons.extend(coplanar_back);
                    clipped.extend(front);
                    next.extend(back);
                }
                inside = next;
                if inside.is_empty() {
                    break;
                }
            }
        }

        let caps: Vec<Polygon> = faces
            .iter()
            .flat_map(|face| Self::face_cap(&clipped, face, bb))
            .collect();
        log::debug!(
            "box difference kept {} polygons, {} touched the box, {} cap triangles",
            polygons.len() + clipped.len(),
            near.len(),
            caps.len()
        );
        polygons.extend(clipped);
        polygons.extend(caps);
        Mesh::from_polygons(polygons)
    }

    /// Triangles closing the openings `clipped` leaves within a box face.
    fn face_cap(clipped: &[Polygon], face: &BoxFace, bb: &Aabb) -> Vec<Polygon> {
        let (u, v) = ((face.axis + 1) % 3, (face.axis + 2) % 3);
        let within = |p: &Point3<Real>| {
            [u, v]
                .iter()
                .all(|&a| p[a] >= bb.mins[a] - EPSILON && p[a] <= bb.maxs[a] + EPSILON)
        };
        let mut plane = face.plane;
        plane.flip();

        let mut cap = Vec::new();
        for ring in slice::chain_loops(&slice::rim_edges(clipped, &face.plane, within)) {
            let outline: Vec<[Real; 2]> = ring.iter().map(|p| [p[u], p[v]]).collect();
            for [i, j, k] in Self::triangulate_ring(&outline) {
                let (a, b, c) = (ring[i], ring[j], ring[k]);
                let corners = if (b - a).cross(&(c - a)).dot(&plane.normal) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                };
                let vertices = corners.iter().map(|&p| Vertex::new(p, plane.normal)).collect();
                cap.push(Polygon::with_plane(vertices, plane));
            }
        }
        cap
    }
}

impl Triangulated3D for Mesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for poly in &self.polygons {
            let normal = poly.normal();
            for tri in poly.triangulate() {
                f(tri.map(|v| Vertex::new(v.pos, normal)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Mesh {
        Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn cuboid_faces_point_outwards() {
        let cube = unit_cube();
        assert_eq!(cube.polygons.len(), 6);
        assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
        for poly in &cube.polygons {
            let centre = poly.vertices.iter().fold(Vector3::zeros(), |acc, v| acc + v.pos.coords) / 4.0;
            let out = centre - Vector3::new(0.5, 0.5, 0.5);
            assert!(poly.normal().dot(&out) > 0.0);
        }
    }

    #[test]
    fn ear_cut_square() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let triangles = Mesh::triangulate_ring(&square);
        assert_eq!(triangles.len(), 2);
        assert!(triangles.iter().flatten().all(|&i| i < square.len()));
        assert!(Mesh::triangulate_ring(&square[..2]).is_empty());
    }

    #[test]
    fn box_difference_removes_the_top_half() {
        let cube = unit_cube();
        let cutter = Aabb::new(Point3::new(-1.0, -1.0, 0.5), Point3::new(2.0, 2.0, 2.0));
        let cut = cube.difference_box(&cutter);
        let bb = cut.bounding_box();
        assert!((bb.maxs.z - 0.5).abs() < 1e-12);
        // the cut face closes the remaining half
        assert!((cut.signed_volume() - 0.5).abs() < 1e-9);
        assert_eq!(weld::weld(&cut, 1e-9).open_edges(), 0);
    }

    #[test]
    fn disjoint_box_changes_nothing() {
        let cube = unit_cube();
        let far = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        let cut = cube.difference_box(&far);
        assert_eq!(cut.polygons.len(), 6);
        assert_eq!(cut.triangle_count(), 12);
    }
}
