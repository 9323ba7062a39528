//! Post-processing of a synthesized centerline: near-duplicate removal,
//! arclength and the size-based display name.

use crate::float_types::{DEDUP_TOLERANCE, Real, round_to, to_display};
use crate::params::NormalizedParameters;
use nalgebra::Point3;

/// A centerline ready for sweeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPath {
    pub points: Vec<Point3<Real>>,
    /// Points dropped by [`remove_doubles`].
    pub removed: usize,
    /// Total arclength in working units.
    pub length: Real,
}

impl ProcessedPath {
    pub fn new(points: &[Point3<Real>]) -> Self {
        let (points, removed) = remove_doubles(points, DEDUP_TOLERANCE);
        log::debug!("removed {removed} vertices");
        let length = arc_length(&points);
        Self { points, removed, length }
    }
}

/// Indices of the points that survive duplicate removal.
///
/// Of every run of consecutive points closer than `tolerance` only the last
/// one is kept, so no two consecutive survivors are within `tolerance` of
/// each other.
pub fn dedup_indices(points: &[Point3<Real>], tolerance: Real) -> Vec<usize> {
    let mut keep: Vec<usize> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate().rev() {
        match keep.last() {
            Some(&next) if (points[next] - p).norm() <= tolerance => {},
            _ => keep.push(i),
        }
    }
    keep.reverse();
    keep
}

/// Drop near-coincident consecutive points, returning the survivors and how
/// many were removed.
pub fn remove_doubles(points: &[Point3<Real>], tolerance: Real) -> (Vec<Point3<Real>>, usize) {
    let keep = dedup_indices(points, tolerance);
    let removed = points.len() - keep.len();
    (keep.into_iter().map(|i| points[i]).collect(), removed)
}

/// Sum of consecutive point distances.
pub fn arc_length(points: &[Point3<Real>]) -> Real {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Print a dimension as an integer unless its fractional part exceeds
/// `tolerance`, in which case it is rounded to `decimals` places.
fn format_dimension(value: Real, decimals: i32, tolerance: Real) -> String {
    let value = round_to(value, 3);
    if value.fract() > tolerance {
        let text = format!("{:.*}", decimals as usize, round_to(value, decimals));
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{}", value.trunc() as i64)
    }
}

/// Human readable size tag: wire x outside diameter [x hook inside
/// diameter] x reach, in millimetres.
///
/// The reach `H + D2' + 2h + 3d` is the distance between the inner edges of
/// the two hooks, with `D2' = D2 - d` the hook's inside diameter.
pub fn display_name(params: &NormalizedParameters) -> String {
    let wire = to_display(params.wire_diameter);
    let outside = to_display(params.coil_diameter + params.wire_diameter);
    let hook_inside = to_display(params.hook_diameter - params.wire_diameter);
    let reach = to_display(params.height) + hook_inside + 2.0 * to_display(params.neck) + 3.0 * wire;

    let mut parts = vec![format_dimension(wire, 2, 0.1), format_dimension(outside, 1, 0.1)];
    if params.hook_type.has_hooks() {
        parts.push(format_dimension(hook_inside, 1, 0.01));
    }
    parts.push(format_dimension(reach, 1, 0.01));
    parts.join(" x ")
}
