//! The whole pipeline: parameters in, [`SpringModel`] out.

use crate::centerline::Centerline;
use crate::errors::SpringError;
use crate::mesh::sweep::SweepRequest;
use crate::params::{SpringParameters, normalize};
use crate::path::{ProcessedPath, display_name};
use crate::rig::{self, RigOptions};
use crate::scene::{SpringModel, end_caps, subtraction_volumes};

/// Generate the geometry and rig of one spring.
///
/// Either every stage succeeds and a complete model is returned, or the
/// first failure is.
pub fn generate(raw: &SpringParameters, options: &RigOptions) -> Result<SpringModel, SpringError> {
    let normalization = normalize(raw)?;
    let params = normalization.parameters;

    let centerline = Centerline::synthesize(&params)?;
    let path = ProcessedPath::new(&centerline.points());
    if path.points.len() < 2 {
        return Err(SpringError::Degenerate(format!(
            "centerline collapsed to {} points",
            path.points.len()
        )));
    }
    let name = display_name(&params);
    log::debug!(
        "{name}: {} centerline points, wire length {:.4} m",
        path.points.len(),
        path.length
    );

    let (start_cap, end_cap) = end_caps(&params, &path)?;
    let sweep = SweepRequest {
        points: path.points.clone(),
        radius: params.wire_diameter / 2.0,
        radial_segments: params.profile_segments(),
        start_cap,
        end_cap,
    };
    let subtractions = subtraction_volumes(&params);
    let rig = rig::build(&params, &centerline, options)?;

    Ok(SpringModel {
        name,
        parameters: params,
        adjustments: normalization.adjustments,
        centerline,
        path,
        sweep,
        subtractions,
        rig,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HookType;

    #[test]
    fn default_spring_is_named_by_size() {
        let model = generate(&SpringParameters::default(), &RigOptions::default()).unwrap();
        assert_eq!(model.name, "2 x 17 x 13 x 54");
        assert!(model.adjustments.is_empty());
        assert_eq!(model.sweep.radial_segments, 10);
        assert!(model.subtractions.is_empty());
    }

    #[test]
    fn invalid_input_produces_no_model() {
        let raw = SpringParameters { height: -1.0, ..Default::default() };
        assert!(matches!(
            generate(&raw, &RigOptions::default()),
            Err(SpringError::Precondition { parameter: "height", .. })
        ));
    }

    #[test]
    fn hookless_spring_is_trimmed_twice() {
        let raw = SpringParameters { hook_type: HookType::None, ..Default::default() };
        let model = generate(&raw, &RigOptions::default()).unwrap();
        assert_eq!(model.subtractions.len(), 2);
        assert_eq!(model.name, "2 x 17 x 54");
    }
}
