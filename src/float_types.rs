// Re-export parry for the bounding volumes used across the crate
pub use parry3d_f64 as parry3d;

// Our Real scalar type:
pub type Real = f64;

/// Tolerance used for plane classification and degenerate-vector checks
/// inside the mesh backend.
pub const EPSILON: Real = 1e-9;

/// Two consecutive centerline points closer than this (in working units)
/// are the same point.
pub const DEDUP_TOLERANCE: Real = 1e-5;

/// Vertices closer than this are merged by the weld pass.
pub const WELD_TOLERANCE: Real = 1e-5;

// Pi
/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Unit conversion
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// Display units are millimetres, working units are metres.
pub const MM: Real = 1.0 / 1000.0;

/// Convert a display-unit length (mm) to working units (m).
#[inline]
pub const fn to_working(display: Real) -> Real {
    display * MM
}

/// Convert a working-unit length (m) back to display units (mm).
#[inline]
pub const fn to_display(working: Real) -> Real {
    working / MM
}

/// `numpy.linspace` semantics: `count` evenly spaced samples from `start` to
/// `end` inclusive. A count of one yields `[start]`, zero yields nothing.
pub fn linspace(start: Real, end: Real, count: usize) -> Vec<Real> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as Real;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        },
    }
}

/// Round to a fixed number of decimals, half away from zero.
#[inline]
pub fn round_to(value: Real, decimals: i32) -> Real {
    let scale = (10.0 as Real).powi(decimals);
    (value * scale).round() / scale
}
