//! The helical coil body and its start angle.

use crate::errors::SpringError;
use crate::float_types::{FRAC_PI_2, PI, Real, TAU, linspace, round_to};
use crate::params::{HookType, NormalizedParameters};
use nalgebra::Point3;

/// Below this the first coil sample is treated as lying on the y axis.
const VERTICAL_TANGENT_EPSILON: Real = 1e-12;

/// Quadrant IV starts this far below the x axis.
const QUADRANT_IV_EPSILON: Real = 1e-5;

/// Clearance left at each end of a hookless coil for the ground flat face,
/// as a fraction of the wire diameter.
pub(crate) const FLAT_END_INSET: Real = 0.3 / 2.0;

/// Sample a helix of the given radius from the top of the coil (`z = H`) to
/// the bottom (`z = 0`) with the synthesis pitch. Hookless coils are inset by
/// [`FLAT_END_INSET`] wire diameters at each end.
pub fn helix(params: &NormalizedParameters, radius: Real, samples: usize) -> Vec<Point3<Real>> {
    let pitch = params.synthesis_pitch();
    let u = linspace(params.height, 0.0, samples);
    let z = match params.hook_type {
        HookType::None => {
            let inset = FLAT_END_INSET * params.wire_diameter;
            linspace(params.height - inset, inset, samples)
        },
        HookType::Open | HookType::Closed => u.clone(),
    };

    u.iter()
        .zip(z)
        .map(|(&u, z)| {
            let theta = TAU * pitch * u;
            Point3::new(radius * theta.cos(), radius * theta.sin(), z)
        })
        .collect()
}

/// The coil body at the centerline radius `D/2` with `N` samples.
pub fn coil(params: &NormalizedParameters) -> Vec<Point3<Real>> {
    helix(params, params.coil_radius(), params.coil_samples())
}

/// Phase of the first (topmost) coil sample, computed analytically so it
/// does not depend on the sampled coil.
pub fn coil_start(params: &NormalizedParameters) -> Point3<Real> {
    let theta = TAU * params.synthesis_pitch() * params.height;
    let r = params.coil_radius();
    Point3::new(r * theta.cos(), r * theta.sin(), params.height)
}

/// Angle of `(x, y)` in `[0, 2π)`, rounded to two decimals before the
/// quadrant correction. Hook planes are rotated by this angle to meet the
/// coil tangentially.
pub fn start_angle(x: Real, y: Real) -> Result<Real, SpringError> {
    if x.abs() < VERTICAL_TANGENT_EPSILON {
        if y.abs() < VERTICAL_TANGENT_EPSILON {
            return Err(SpringError::DegenerateAngle { x, y });
        }
        let angle = if y > 0.0 { FRAC_PI_2 } else { PI + FRAC_PI_2 };
        return Ok(round_to(angle, 2));
    }

    let mut angle = round_to((y / x).atan(), 2);
    if x < 0.0 {
        angle += PI;
    } else if y < -QUADRANT_IV_EPSILON {
        angle += TAU;
    }
    Ok(angle)
}
