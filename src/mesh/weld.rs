//! Merging coincident vertices into an indexed triangle mesh.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::vertex::Vertex;
use crate::triangulated::Triangulated3D;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

type Cell = (i64, i64, i64);

/// Triangles over a shared vertex table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<Point3<Real>>,
    pub triangles: Vec<[usize; 3]>,
}

impl IndexedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal of a triangle, zero for slivers.
    pub fn face_normal(&self, triangle: &[usize; 3]) -> Vector3<Real> {
        let [a, b, c] = triangle.map(|i| self.vertices[i]);
        (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Undirected edges used by a number of triangles other than two.
    pub fn open_edges(&self) -> usize {
        let mut uses: HashMap<(usize, usize), usize> = HashMap::with_capacity(self.triangles.len() * 3);
        for t in &self.triangles {
            for i in 0..3 {
                let (a, b) = (t[i], t[(i + 1) % 3]);
                *uses.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        uses.values().filter(|&&n| n != 2).count()
    }
}

impl Triangulated3D for IndexedMesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for t in &self.triangles {
            let normal = self.face_normal(t);
            f(t.map(|i| Vertex::new(self.vertices[i], normal)));
        }
    }
}

fn cell(p: &Point3<Real>, size: Real) -> Cell {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

/// Merge every vertex lying within `tolerance` of an earlier kept vertex
/// into it. Triangles collapsed by the merge are dropped.
///
/// Kept vertices are therefore pairwise farther apart than `tolerance`.
pub fn weld(mesh: &Mesh, tolerance: Real) -> IndexedMesh {
    let size = tolerance.max(Real::MIN_POSITIVE);
    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    let mut out = IndexedMesh::default();

    let mut index_of = |p: Point3<Real>, out: &mut IndexedMesh| -> usize {
        let (cx, cy, cz) = cell(&p, size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(ids) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        if let Some(&id) = ids.iter().find(|&&id| (out.vertices[id] - p).norm() <= tolerance) {
                            return id;
                        }
                    }
                }
            }
        }
        let id = out.vertices.len();
        out.vertices.push(p);
        grid.entry((cx, cy, cz)).or_default().push(id);
        id
    };

    let mut collapsed = 0usize;
    for polygon in &mesh.polygons {
        for tri in polygon.triangulate() {
            let t = tri.map(|v| index_of(v.pos, &mut out));
            if t[0] == t[1] || t[1] == t[2] || t[0] == t[2] {
                collapsed += 1;
            } else {
                out.triangles.push(t);
            }
        }
    }

    log::debug!(
        "welded {} vertices into {}, dropped {collapsed} collapsed triangles",
        mesh.vertex_count(),
        out.vertices.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_welds_to_eight_corners() {
        let cube = Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let welded = weld(&cube, 1e-5);
        assert_eq!(welded.vertex_count(), 8);
        assert_eq!(welded.triangle_count(), 12);
        assert_eq!(welded.open_edges(), 0);
    }

    #[test]
    fn welded_vertices_are_separated() {
        let cube = Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1e-5, 1.0, 1.0));
        let welded = weld(&cube, 2e-5);
        for (i, a) in welded.vertices.iter().enumerate() {
            for b in &welded.vertices[i + 1..] {
                assert!((a - b).norm() > 2e-5);
            }
        }
        // the thin sides collapse
        assert!(welded.triangle_count() < 12);
    }
}
