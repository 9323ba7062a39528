//! Openings that clipping leaves on a plane, chained into loops.

use crate::float_types::{EPSILON, Real};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use hashbrown::HashMap;
use nalgebra::Point3;

/// Grid used to recognize points shared by neighbouring polygons.
const KEY_QUANTUM: Real = 1e-10;

type PointKey = (i64, i64, i64);

fn key(p: &Point3<Real>) -> PointKey {
    (
        (p.x / KEY_QUANTUM).round() as i64,
        (p.y / KEY_QUANTUM).round() as i64,
        (p.z / KEY_QUANTUM).round() as i64,
    )
}

/// Boundary edges that `polygons` leave on `plane`, restricted to points
/// accepted by `keep`.
///
/// Edges are returned reversed, so a cap chained from them is wound against
/// the polygons it closes. An edge walked in both directions is interior and
/// cancels out.
pub fn rim_edges<F>(polygons: &[Polygon], plane: &Plane, keep: F) -> Vec<[Point3<Real>; 2]>
where
    F: Fn(&Point3<Real>) -> bool,
{
    let on_rim = |p: &Point3<Real>| plane.signed_distance(p).abs() <= EPSILON && keep(p);
    let mut edges: Vec<Option<[Point3<Real>; 2]>> = Vec::new();
    let mut index: HashMap<(PointKey, PointKey), usize> = HashMap::new();
    for polygon in polygons {
        let n = polygon.vertices.len();
        for i in 0..n {
            let (a, b) = (polygon.vertices[i].pos, polygon.vertices[(i + 1) % n].pos);
            let (ka, kb) = (key(&a), key(&b));
            if ka == kb || !on_rim(&a) || !on_rim(&b) {
                continue;
            }
            if let Some(twin) = index.remove(&(kb, ka)) {
                edges[twin] = None;
            } else {
                index.insert((ka, kb), edges.len());
                edges.push(Some([b, a]));
            }
        }
    }
    edges.into_iter().flatten().collect()
}

/// Join segments sharing endpoints into closed loops. Open chains, which
/// only occur when the surface has holes, are dropped.
pub fn chain_loops(segments: &[[Point3<Real>; 2]]) -> Vec<Vec<Point3<Real>>> {
    let mut by_key: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, [a, b]) in segments.iter().enumerate() {
        by_key.entry(key(a)).or_default().push(i);
        by_key.entry(key(b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [first, second] = segments[start];
        let start_key = key(&first);
        let mut ring = vec![first, second];
        let mut current = key(&second);
        let mut closed = false;

        while let Some(&next) = by_key
            .get(&current)
            .and_then(|ids| ids.iter().find(|&&id| !used[id]))
        {
            used[next] = true;
            let [a, b] = segments[next];
            let far = if key(&a) == current { b } else { a };
            current = key(&far);
            if current == start_key {
                closed = true;
                break;
            }
            ring.push(far);
        }

        if closed && ring.len() >= 3 {
            loops.push(ring);
        }
    }
    loops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::mesh::vertex::Vertex;
    use nalgebra::Vector3;

    #[test]
    fn clipped_cube_leaves_one_square_rim() {
        let cube = Mesh::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let plane = Plane::from_normal(Vector3::z(), 0.25);
        let below: Vec<Polygon> = cube
            .polygons
            .iter()
            .flat_map(|p| plane.split_polygon(p).3)
            .collect();
        let rim = rim_edges(&below, &plane, |_| true);
        assert_eq!(rim.len(), 4);
        let loops = chain_loops(&rim);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
        assert!(loops[0].iter().all(|p| (p.z - 0.25).abs() < 1e-12));
    }

    #[test]
    fn shared_rim_edges_cancel() {
        let p = |x, y| Vertex::new(Point3::new(x, y, 0.0), Vector3::z());
        let plane = Plane::from_normal(Vector3::y(), 0.0);
        // two quads meeting along y = 0, both with an edge on the plane
        let quads = [
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap(),
            Polygon::new(vec![p(0.0, -1.0), p(1.0, -1.0), p(1.0, 0.0), p(0.0, 0.0)]).unwrap(),
        ];
        assert!(rim_edges(&quads, &plane, |_| true).is_empty());
        assert_eq!(rim_edges(&quads[..1], &plane, |_| true).len(), 1);
        assert!(rim_edges(&quads[..1], &plane, |q| q.x > 5.0).is_empty());
    }

    #[test]
    fn open_chains_are_dropped() {
        let segments = [
            [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            [Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)],
        ];
        assert!(chain_loops(&segments).is_empty());
    }
}
