//! Hooks and the "s" transitions joining them to the coil.
//!
//! Every segment is built in its own frame: the lower pieces hang below
//! `z = 0`, the upper pieces sit above `z = H`, and the upper transition is
//! rotated by the coil start angle so it meets the coil tangentially.

use super::coil::FLAT_END_INSET;
use crate::float_types::{FRAC_PI_2, PI, Real, TAU, linspace};
use crate::params::{HookAngle, HookType, NormalizedParameters};
use nalgebra::Point3;

/// Longest sweep of a hookless end arc.
const MAX_FLAT_ARC: Real = 4.0 * PI / 3.0;

/// Inward offset of the closed-hook transitions, in wire diameters.
const CLOSED_LOWER_OFFSET: Real = 1.025;
const CLOSED_UPPER_OFFSET: Real = 1.01;

/// Lateral drift of the closed-hook loops over two turns, in wire diameters.
const CLOSED_LOWER_DRIFT: Real = 2.05;
const CLOSED_UPPER_DRIFT: Real = 2.0;

/// Loops in a closed hook.
const CLOSED_LOOPS: usize = 4;

/// Angular schedule of the transitions.
///
/// For hooked springs this is `n + 1` angles falling from 2π to 3π/2 with
/// linearly shrinking steps, so samples crowd where the transition bends
/// hardest near the hook throat. Hookless springs get `n` evenly spaced
/// angles over a flat arc limited by [`MAX_FLAT_ARC`] and by the pitch.
pub fn transition_angles(params: &NormalizedParameters) -> Vec<Real> {
    let n = params.hook_resolution;
    match params.hook_type {
        HookType::Open | HookType::Closed => {
            let rate = 6.0 / (n - 1) as Real;
            let weights: Vec<Real> = (0..n).map(|i| 6.0 - i as Real * rate).collect();
            let total: Real = weights.iter().sum();

            let mut angles = Vec::with_capacity(n + 1);
            angles.push(TAU);
            let mut swept = 0.0;
            for w in weights {
                swept += FRAC_PI_2 * w / total;
                angles.push(TAU - swept);
            }
            angles
        },
        HookType::None => {
            let arc = (4.0 * PI / 5.0) * 0.5 / (params.wire_diameter * params.synthesis_pitch());
            linspace(0.0, arc.min(MAX_FLAT_ARC), n)
        },
    }
}

/// Height profile shared by the hooked transitions: a quarter of the hook
/// circle seen edge-on.
fn hook_rise(hook_radius: Real, angle: Real) -> Real {
    let lateral = hook_radius * angle.cos().abs();
    (hook_radius * hook_radius - lateral * lateral).abs().sqrt()
}

/// Transition from the bottom of the coil into the lower hook.
pub fn lower_transition(params: &NormalizedParameters, angles: &[Real]) -> Vec<Point3<Real>> {
    let r = params.coil_radius();
    let r2 = params.hook_radius();
    let d = params.wire_diameter;

    match params.hook_type {
        HookType::None => angles
            .iter()
            .map(|&u| Point3::new(r * u.cos(), -r * u.sin(), FLAT_END_INSET * d))
            .collect(),
        HookType::Open | HookType::Closed => {
            let mut z: Vec<Real> = angles.iter().map(|&u| hook_rise(r2, u) - r2).collect();
            z.reverse();

            angles
                .iter()
                .zip(z)
                .map(|(&u, z)| {
                    let x = match params.hook_type {
                        HookType::Closed => {
                            let offset = CLOSED_LOWER_OFFSET * d;
                            (r - offset) * u.cos().abs() + offset
                        },
                        _ => r * u.cos().abs(),
                    };
                    Point3::new(x, r2 * u.sin(), z)
                })
                .collect()
        },
    }
}

/// Transition from the upper hook into the top of the coil, rotated by the
/// coil start angle `alpha`.
pub fn upper_transition(
    params: &NormalizedParameters,
    angles: &[Real],
    alpha: Real,
) -> Vec<Point3<Real>> {
    let r = params.coil_radius();
    let r2 = params.hook_radius();
    let d = params.wire_diameter;
    let h_top = params.height;

    if params.hook_type == HookType::None {
        return angles
            .iter()
            .rev()
            .map(|&u| {
                let v = u + alpha;
                Point3::new(r * v.cos(), r * v.sin(), h_top - FLAT_END_INSET * d)
            })
            .collect();
    }

    let reversed: Vec<Real> = angles.iter().rev().copied().collect();
    let mut z: Vec<Real> = reversed
        .iter()
        .map(|&u| -hook_rise(r2, u) + r2 + h_top)
        .collect();
    z.reverse();

    let offset = CLOSED_UPPER_OFFSET * d;
    reversed
        .iter()
        .zip(z)
        .map(|(&u, z)| {
            let (x, y) = match (params.hook_type, params.hook_angle) {
                (HookType::Open, HookAngle::Deg180) => {
                    (r * (u + alpha).cos(), -r2 * (u + alpha).sin())
                },
                (HookType::Open, HookAngle::Deg90) => {
                    (-r2 * (u + alpha).cos(), r * (u + alpha).sin())
                },
                (HookType::Closed, HookAngle::Deg180) => {
                    ((r - offset) * u.cos().abs() + offset, -r2 * u.sin())
                },
                (HookType::Closed, HookAngle::Deg90) => {
                    (-r2 * (u + alpha).cos(), (r - offset) * (u + alpha).sin() + offset)
                },
                (HookType::None, _) => unreachable!("handled above"),
            };
            Point3::new(x, y, z)
        })
        .collect()
}

/// The lower hook, hanging below the coil. Empty for hookless springs.
pub fn lower_hook(params: &NormalizedParameters) -> Vec<Point3<Real>> {
    let n = params.hook_resolution;
    let r2 = params.hook_radius();
    let d = params.wire_diameter;

    match params.hook_type {
        HookType::None => Vec::new(),
        HookType::Open => {
            let drop = r2 + params.neck + d;
            linspace(PI, TAU, n)
                .into_iter()
                .map(|v| Point3::new(0.0, r2 * v.cos(), r2 * v.sin() - drop))
                .collect()
        },
        HookType::Closed => {
            let v = linspace(2.0 * TAU, 0.0, CLOSED_LOOPS * n);
            let mut z: Vec<Real> = v.iter().map(|&v| r2 * (-v.sin() - 1.0)).collect();
            z.reverse();
            v.iter()
                .zip(z)
                .map(|(&v, z)| {
                    let x = (v - TAU) / (2.0 * TAU) * CLOSED_LOWER_DRIFT * d;
                    Point3::new(x, -r2 * v.cos(), z)
                })
                .collect()
        },
    }
}

/// The upper hook, above the coil. Empty for hookless springs.
pub fn upper_hook(params: &NormalizedParameters) -> Vec<Point3<Real>> {
    let n = params.hook_resolution;
    let r2 = params.hook_radius();
    let d = params.wire_diameter;
    let h_top = params.height;

    match params.hook_type {
        HookType::None => Vec::new(),
        HookType::Open => {
            let v = linspace(PI, 0.0, n);
            let lift = r2 + h_top + params.neck + d;
            v.iter()
                .zip(v.iter().rev())
                .map(|(&v, &v_rev)| {
                    let (x, y) = match params.hook_angle {
                        HookAngle::Deg180 => (0.0, r2 * v.cos()),
                        HookAngle::Deg90 => (r2 * v_rev.cos(), 0.0),
                    };
                    Point3::new(x, y, r2 * v.sin() + lift)
                })
                .collect()
        },
        HookType::Closed => linspace(2.0 * TAU, 0.0, CLOSED_LOOPS * n)
            .into_iter()
            .map(|v| {
                let drift = (TAU - v) / (2.0 * TAU) * CLOSED_UPPER_DRIFT * d;
                let (x, y) = match params.hook_angle {
                    HookAngle::Deg180 => (drift, r2 * v.cos()),
                    HookAngle::Deg90 => (-r2 * v.cos(), drift),
                };
                Point3::new(x, y, r2 * v.sin() + r2 + h_top)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SpringParameters, normalize};

    fn normalized(hook_type: HookType) -> NormalizedParameters {
        let raw = SpringParameters { hook_type, ..Default::default() };
        normalize(&raw).unwrap().parameters
    }

    #[test]
    fn hooked_schedule_spans_a_quarter_turn() {
        let angles = transition_angles(&normalized(HookType::Open));
        assert_eq!(angles.len(), 11);
        assert_eq!(angles[0], TAU);
        assert!((angles[10] - 1.5 * PI).abs() < 1e-12);
        // steps shrink towards the hook
        let steps: Vec<Real> = angles.windows(2).map(|w| w[0] - w[1]).collect();
        assert!(steps.windows(2).all(|s| s[0] >= s[1] - 1e-15));
    }

    #[test]
    fn flat_arc_is_capped() {
        let angles = transition_angles(&normalized(HookType::None));
        assert_eq!(angles.len(), 10);
        assert!(*angles.last().unwrap() <= MAX_FLAT_ARC + 1e-12);
    }

    #[test]
    fn closed_hook_makes_two_loops() {
        let p = normalized(HookType::Closed);
        assert_eq!(lower_hook(&p).len(), 40);
        assert_eq!(upper_hook(&p).len(), 40);
    }

    #[test]
    fn lower_transition_leaves_the_coil_bottom() {
        let p = normalized(HookType::Open);
        let s = lower_transition(&p, &transition_angles(&p));
        let first = s[0];
        assert!((first.x - p.coil_radius()).abs() < 1e-12);
        assert!(first.y.abs() < 1e-12);
        assert!(first.z.abs() < 1e-12);
    }
}
