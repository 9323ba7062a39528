//! Test support library
//! Fixtures and tolerance helpers shared by the integration tests.
#![allow(dead_code)]

use nalgebra::Point3;
use springforge::float_types::Real;
use springforge::{HookAngle, HookType, RigOptions, SpringModel, SpringParameters, generate};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Default tension spring with a different hook style.
pub fn params(hook_type: HookType, hook_angle: HookAngle) -> SpringParameters {
    SpringParameters { hook_type, hook_angle, ..Default::default() }
}

/// Generate with default rig options, panicking on failure.
pub fn model(raw: &SpringParameters) -> SpringModel {
    generate(raw, &RigOptions::default()).expect("generation failed")
}

/// Every hook style and angle combination.
pub fn all_styles() -> Vec<SpringParameters> {
    let mut out = Vec::new();
    for hook_type in [HookType::Open, HookType::Closed, HookType::None] {
        for hook_angle in [HookAngle::Deg180, HookAngle::Deg90] {
            out.push(params(hook_type, hook_angle));
        }
    }
    out
}

/// Smallest distance between any two points.
pub fn min_pairwise_distance(points: &[Point3<Real>]) -> Real {
    let mut best = Real::MAX;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            best = best.min((a - b).norm());
        }
    }
    best
}
