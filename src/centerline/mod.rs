//! The wire centerline: five polyline segments traced top to bottom.

use crate::errors::SpringError;
use crate::float_types::Real;
use crate::params::NormalizedParameters;
use nalgebra::Point3;

pub mod coil;
pub mod hook;

/// Ordered points of the spring wire's geometric center.
///
/// Adjacent segments meet end to end; the upper hook's last point is dropped
/// on concatenation because the upper transition starts where it ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    pub upper_hook: Vec<Point3<Real>>,
    pub upper_transition: Vec<Point3<Real>>,
    pub coil: Vec<Point3<Real>>,
    pub lower_transition: Vec<Point3<Real>>,
    pub lower_hook: Vec<Point3<Real>>,
    /// Phase of the first coil sample, used to rotate the upper hook.
    pub start_angle: Real,
}

impl Centerline {
    /// Synthesize every segment for already normalized parameters.
    pub fn synthesize(params: &NormalizedParameters) -> Result<Self, SpringError> {
        if params.coil_samples() < 2 {
            return Err(SpringError::Degenerate(format!(
                "a coil needs at least two samples, got {}",
                params.coil_samples()
            )));
        }

        let start = coil::coil_start(params);
        let start_angle = coil::start_angle(start.x, start.y)?;
        let angles = hook::transition_angles(params);

        #[cfg(not(feature = "parallel"))]
        let ((upper_hook, upper_transition), (coil, (lower_transition, lower_hook))) = (
            (
                hook::upper_hook(params),
                hook::upper_transition(params, &angles, start_angle),
            ),
            (
                coil::coil(params),
                (hook::lower_transition(params, &angles), hook::lower_hook(params)),
            ),
        );

        #[cfg(feature = "parallel")]
        let ((upper_hook, upper_transition), (coil, (lower_transition, lower_hook))) = rayon::join(
            || {
                rayon::join(
                    || hook::upper_hook(params),
                    || hook::upper_transition(params, &angles, start_angle),
                )
            },
            || {
                rayon::join(
                    || coil::coil(params),
                    || {
                        rayon::join(
                            || hook::lower_transition(params, &angles),
                            || hook::lower_hook(params),
                        )
                    },
                )
            },
        );

        log::debug!(
            "centerline: hooks {}+{}, transitions {}+{}, coil {}, start angle {:.2}",
            upper_hook.len(),
            lower_hook.len(),
            upper_transition.len(),
            lower_transition.len(),
            coil.len(),
            start_angle
        );

        Ok(Self {
            upper_hook,
            upper_transition,
            coil,
            lower_transition,
            lower_hook,
            start_angle,
        })
    }

    /// All segments concatenated in emission order.
    pub fn points(&self) -> Vec<Point3<Real>> {
        let upper_hook = match self.upper_hook.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        };
        let mut points = Vec::with_capacity(self.len());
        points.extend_from_slice(upper_hook);
        points.extend_from_slice(&self.upper_transition);
        points.extend_from_slice(&self.coil);
        points.extend_from_slice(&self.lower_transition);
        points.extend_from_slice(&self.lower_hook);
        points
    }

    /// Point count of [`Centerline::points`].
    pub fn len(&self) -> usize {
        self.upper_hook.len().saturating_sub(1)
            + self.upper_transition.len()
            + self.coil.len()
            + self.lower_transition.len()
            + self.lower_hook.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
