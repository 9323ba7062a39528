//! Sweeping a circular wire profile along a centerline.
//!
//! Rings are placed with rotation-minimizing frames so the profile does not
//! twist around the coil. Each end is closed by an [`EndCap`].

use crate::errors::SpringError;
use crate::float_types::{EPSILON, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scale of the last cap ring about the cap centre before it is closed.
pub const CAP_INNER_SCALE: Real = 0.7;

/// How one end of the swept wire is closed.
///
/// The end ring is optionally flattened onto the horizontal plane through
/// its centre, then extruded by each vector in turn, then a ring scaled by
/// `inner_scale` is added and everything is closed to a centre apex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndCap {
    pub flatten: bool,
    pub extrusions: Vec<Vector3<Real>>,
    pub inner_scale: Real,
}

impl EndCap {
    pub fn new(flatten: bool, extrusions: Vec<Vector3<Real>>) -> Self {
        Self { flatten, extrusions, inner_scale: CAP_INNER_SCALE }
    }
}

/// Everything needed to turn a centerline into a closed tube.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRequest {
    pub points: Vec<Point3<Real>>,
    pub radius: Real,
    pub radial_segments: usize,
    pub start_cap: EndCap,
    pub end_cap: EndCap,
}

/// An orthonormal frame riding along the rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: Vector3<Real>,
    pub normal: Vector3<Real>,
    pub binormal: Vector3<Real>,
}

impl Frame {
    /// Frame around `tangent` with an arbitrary normal.
    fn from_tangent(tangent: Vector3<Real>) -> Option<Self> {
        let tangent = tangent.try_normalize(EPSILON * EPSILON)?;
        let axis = if tangent.x.abs() <= tangent.y.abs() && tangent.x.abs() <= tangent.z.abs() {
            Vector3::x()
        } else if tangent.y.abs() <= tangent.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let normal = tangent.cross(&axis).normalize();
        Some(Self { tangent, normal, binormal: tangent.cross(&normal) })
    }

    /// Carry this frame onto a new tangent with the smallest rotation.
    fn transport(&self, tangent: Vector3<Real>) -> Self {
        let cross = self.tangent.cross(&tangent);
        let normal = match Unit::try_new(cross, EPSILON * EPSILON) {
            Some(axis) => {
                let angle = self.tangent.dot(&tangent).clamp(-1.0, 1.0).acos();
                Rotation3::from_axis_angle(&axis, angle) * self.normal
            },
            None if self.tangent.dot(&tangent) < 0.0 => -self.normal,
            None => self.normal,
        };
        // re-orthogonalize against drift
        let normal = (normal - tangent * tangent.dot(&normal))
            .try_normalize(EPSILON * EPSILON)
            .unwrap_or(self.normal);
        Self { tangent, normal, binormal: tangent.cross(&normal) }
    }
}

/// Rotation-minimizing frames, one per rail point. Interior tangents are
/// the sum of the adjacent segment directions.
pub fn rail_frames(rail: &[Point3<Real>]) -> Result<Vec<Frame>, SpringError> {
    if rail.len() < 2 {
        return Err(SpringError::Degenerate(format!(
            "a sweep rail needs at least two points, got {}",
            rail.len()
        )));
    }
    let first = Frame::from_tangent(rail[1] - rail[0])
        .ok_or_else(|| SpringError::Degenerate("sweep rail starts with a zero-length segment".into()))?;

    let mut frames = Vec::with_capacity(rail.len());
    frames.push(first);
    for i in 1..rail.len() {
        let backward = (rail[i] - rail[i - 1]).try_normalize(EPSILON * EPSILON);
        let forward = rail.get(i + 1).and_then(|next| (next - rail[i]).try_normalize(EPSILON * EPSILON));
        let prev = frames[i - 1];
        let tangent = match (backward, forward) {
            (Some(b), Some(f)) => (b + f).try_normalize(EPSILON * EPSILON).unwrap_or(f),
            (Some(t), None) | (None, Some(t)) => t,
            (None, None) => prev.tangent,
        };
        frames.push(prev.transport(tangent));
    }
    Ok(frames)
}

/// Profile ring of `segments` points around `origin` in the frame's normal
/// plane.
pub fn ring(origin: &Point3<Real>, frame: &Frame, radius: Real, segments: usize) -> Vec<Point3<Real>> {
    (0..segments)
        .map(|seg| {
            let angle = TAU * seg as Real / segments as Real;
            origin + frame.normal * (radius * angle.cos()) + frame.binormal * (radius * angle.sin())
        })
        .collect()
}

/// One profile ring per rail point, before the caps reshape the end rings.
pub fn rings(request: &SweepRequest) -> Result<Vec<Vec<Point3<Real>>>, SpringError> {
    let frames = rail_frames(&request.points)?;

    #[cfg(not(feature = "parallel"))]
    let iter = request.points.iter().zip(frames.iter());
    #[cfg(feature = "parallel")]
    let iter = request.points.par_iter().zip(frames.par_iter());

    Ok(iter
        .map(|(origin, frame)| ring(origin, frame, request.radius, request.radial_segments))
        .collect())
}

fn centroid(points: &[Point3<Real>]) -> Point3<Real> {
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len().max(1) as Real)
}

/// Triangles joining two rings of equal size, wound outwards for a ring
/// sequence running along the rail.
fn strip(a: &[Point3<Real>], b: &[Point3<Real>], out: &mut Vec<Polygon>) {
    let n = a.len();
    for j in 0..n {
        let k = (j + 1) % n;
        out.extend(Polygon::triangle(a[j], a[k], b[k]));
        out.extend(Polygon::triangle(a[j], b[k], b[j]));
    }
}

fn fan(ring: &[Point3<Real>], apex: Point3<Real>, out: &mut Vec<Polygon>) {
    let n = ring.len();
    for j in 0..n {
        out.extend(Polygon::triangle(ring[j], ring[(j + 1) % n], apex));
    }
}

/// Flatten an end ring onto the horizontal plane through its centre.
fn flatten(ring: &mut [Point3<Real>]) {
    let z = centroid(ring).z;
    for p in ring.iter_mut() {
        p.z = z;
    }
}

/// Close one end ring. `outward` is the direction leaving the tube, used to
/// orient the cap when it has no extrusion to go by.
fn cap(ring: &[Point3<Real>], cap: &EndCap, outward: Vector3<Real>) -> Vec<Polygon> {
    let mut polygons = Vec::new();
    let mut current = ring.to_vec();
    for extrusion in &cap.extrusions {
        let next: Vec<_> = current.iter().map(|p| p + extrusion).collect();
        strip(&current, &next, &mut polygons);
        current = next;
    }

    let centre = centroid(&current);
    let inner: Vec<_> = current.iter().map(|p| centre + (p - centre) * cap.inner_scale).collect();
    strip(&current, &inner, &mut polygons);
    fan(&inner, centre, &mut polygons);

    let pushed = cap.extrusions.iter().fold(Vector3::zeros(), |acc, e| acc + e);
    let outward = if pushed.norm_squared() > EPSILON * EPSILON { pushed } else { outward };
    let facing: Real = polygons
        .iter()
        .rev()
        .take(ring.len())
        .map(|p| p.normal().dot(&outward))
        .sum();
    if facing < 0.0 {
        polygons.iter_mut().for_each(Polygon::flip);
    }
    polygons
}

/// Sweep the profile along the rail and close both ends.
pub fn sweep(request: &SweepRequest) -> Result<Mesh, SpringError> {
    if request.radial_segments < 3 {
        return Err(SpringError::Degenerate(format!(
            "a wire profile needs at least three segments, got {}",
            request.radial_segments
        )));
    }
    if !request.radius.is_finite() || request.radius <= 0.0 {
        return Err(SpringError::Degenerate(format!("wire radius {} is not positive", request.radius)));
    }

    let frames = rail_frames(&request.points)?;
    let mut rings = rings(request)?;
    let last = rings.len() - 1;
    if request.start_cap.flatten {
        flatten(&mut rings[0]);
    }
    if request.end_cap.flatten {
        flatten(&mut rings[last]);
    }

    let mut polygons = Vec::with_capacity(2 * request.radial_segments * (rings.len() + 8));
    for pair in rings.windows(2) {
        strip(&pair[0], &pair[1], &mut polygons);
    }
    polygons.extend(cap(&rings[0], &request.start_cap, -frames[0].tangent));
    polygons.extend(cap(&rings[last], &request.end_cap, frames[last].tangent));

    log::debug!(
        "swept {} rings of {} segments into {} triangles",
        rings.len(),
        request.radial_segments,
        polygons.len()
    );
    Ok(Mesh::from_polygons(polygons))
}
