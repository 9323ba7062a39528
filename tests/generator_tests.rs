mod support;

use springforge::float_types::{DEDUP_TOLERANCE, Real, to_working};
use springforge::params::{ClampRule, normalize};
use springforge::path::remove_doubles;
use springforge::{HookAngle, HookType, SpringError, SpringParameters};
use support::{all_styles, approx_eq, model, params};

#[test]
fn tension_spring_with_default_dimensions() {
    let raw = SpringParameters::default();
    let normalization = normalize(&raw).unwrap();
    let p = &normalization.parameters;

    assert!(normalization.adjustments.is_empty());
    assert_eq!(p.turns, 15);
    assert!(approx_eq(p.pitch * p.height, 15.0, 1e-9));
    assert_eq!(p.coil_samples(), 225);

    let model = model(&raw);
    assert_eq!(model.centerline.coil.len(), 225);
    assert_eq!(model.name, "2 x 17 x 13 x 54");
}

#[test]
fn thick_wire_is_clamped_in_a_single_pass() {
    let raw = SpringParameters { wire_diameter: 6.0, ..Default::default() };
    let normalization = normalize(&raw).unwrap();
    let p = &normalization.parameters;

    // 7.5 mm still fails 3d <= D; it is not clamped again
    assert!(approx_eq(p.wire_diameter, to_working(7.5), 1e-12));
    assert!(3.0 * p.wire_diameter > p.coil_diameter);
    assert_eq!(normalization.adjustments.len(), 1);
    assert_eq!(normalization.adjustments[0].rule, ClampRule::WireThickerThanCoil);
    assert_eq!(p.turns, 4);

    assert!(springforge::generate(&raw, &Default::default()).is_ok());
}

#[test]
fn hookless_spring_is_coil_plus_flat_transitions() {
    let raw = params(HookType::None, HookAngle::Deg180);
    let model = model(&raw);
    let p = &model.parameters;
    let centerline = &model.centerline;

    assert!(centerline.upper_hook.is_empty());
    assert!(centerline.lower_hook.is_empty());
    assert_eq!(centerline.upper_transition.len(), p.hook_resolution);
    assert_eq!(centerline.lower_transition.len(), p.hook_resolution);
    assert_eq!(
        centerline.len(),
        p.coil_samples() + 2 * p.hook_resolution
    );

    let offset = 1.1 * (p.coil_diameter + p.wire_diameter) / 2.0;
    let centers: Vec<Real> = model.subtractions.iter().map(|v| v.center.z).collect();
    assert_eq!(centers.len(), 2);
    assert!(approx_eq(centers[0], -offset, 1e-12));
    assert!(approx_eq(centers[1], p.height + offset, 1e-12));
}

#[test]
fn hooked_centerlines_concatenate_every_segment() {
    for hook_angle in [HookAngle::Deg180, HookAngle::Deg90] {
        for (hook_type, loops) in [(HookType::Open, 1), (HookType::Closed, 4)] {
            let model = model(&params(hook_type, hook_angle));
            let (n, coil) = (model.parameters.hook_resolution, model.parameters.coil_samples());
            let centerline = &model.centerline;

            assert_eq!(centerline.upper_hook.len(), loops * n);
            assert_eq!(centerline.upper_transition.len(), n + 1);
            assert_eq!(centerline.coil.len(), coil);
            assert_eq!(centerline.lower_transition.len(), n + 1);
            assert_eq!(centerline.lower_hook.len(), loops * n);

            // the upper hook's last point is dropped where it meets the transition
            let expected = (loops * n - 1) + (n + 1) + coil + (n + 1) + loops * n;
            assert_eq!(centerline.len(), expected, "{hook_type:?} {hook_angle:?}");
            assert_eq!(centerline.points().len(), expected);
        }
    }
}

#[test]
fn fewest_hook_samples_still_build_a_mesh() {
    use springforge::params::MIN_HOOK_RESOLUTION;
    use springforge::scene::MeshScene;

    for raw in all_styles() {
        let coarse = SpringParameters { hook_resolution: MIN_HOOK_RESOLUTION, ..raw.clone() };
        let scene = MeshScene::from_model(&model(&coarse)).unwrap();
        assert!(scene.welded.unwrap().triangle_count() > 0);

        let too_coarse = SpringParameters { hook_resolution: MIN_HOOK_RESOLUTION - 1, ..raw };
        assert!(matches!(
            springforge::generate(&too_coarse, &Default::default()),
            Err(SpringError::Precondition { parameter: "hook_resolution", .. })
        ));
    }
}

#[test]
fn quarter_turn_bias_never_reaches_the_stored_pitch() {
    let straight = model(&params(HookType::Open, HookAngle::Deg180)).parameters;
    let square = model(&params(HookType::Open, HookAngle::Deg90)).parameters;

    assert_eq!(square.pitch, straight.pitch);
    assert_eq!(square.turns, straight.turns);
    assert!(approx_eq(square.synthesis_pitch() - square.pitch, 0.25 / square.height, 1e-12));

    let again = normalize(&square.to_display()).unwrap().parameters;
    assert!(approx_eq(again.pitch, square.pitch, 1e-9));
}

#[test]
fn normalizing_twice_changes_nothing() {
    let inputs = [
        SpringParameters::default(),
        SpringParameters { wire_diameter: 6.0, ..Default::default() },
        SpringParameters { hook_diameter: 40.0, ..Default::default() },
        SpringParameters { hook_diameter: 4.0, wire_diameter: 1.0, ..Default::default() },
    ];
    for raw in inputs {
        let once = normalize(&raw).unwrap().parameters;
        let twice = once.normalized().unwrap();
        assert_eq!(twice.parameters, once);
        assert!(twice.adjustments.is_empty());
    }
}

#[test]
fn wire_gets_longer_with_height() {
    let lengths: Vec<Real> = [20.0, 35.0, 50.0, 120.0]
        .into_iter()
        .map(|height| model(&SpringParameters { height, ..Default::default() }).path.length)
        .collect();
    for pair in lengths.windows(2) {
        assert!(pair[0].is_finite() && pair[0] > 0.0);
        assert!(pair[1] > pair[0], "{lengths:?}");
    }
}

#[test]
fn open_hooks_mirror_about_mid_height() {
    let model = model(&params(HookType::Open, HookAngle::Deg180));
    let h = model.parameters.height;
    let upper = &model.centerline.upper_hook;
    let lower = &model.centerline.lower_hook;

    assert_eq!(upper.len(), lower.len());
    for (u, l) in upper.iter().zip(lower) {
        assert!(approx_eq(h - u.z, l.z, 1e-9), "{u} vs {l}");
        assert!(approx_eq(u.y, l.y, 1e-9));
        assert!(approx_eq(u.x, l.x, 1e-9));
    }
}

#[test]
fn closed_hooks_span_mirrored_heights() {
    let model = model(&params(HookType::Closed, HookAngle::Deg180));
    let h = model.parameters.height;
    let z_range = |points: &[nalgebra::Point3<Real>]| {
        points.iter().fold((Real::MAX, Real::MIN), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)))
    };
    let (upper_lo, upper_hi) = z_range(&model.centerline.upper_hook);
    let (lower_lo, lower_hi) = z_range(&model.centerline.lower_hook);

    assert!(approx_eq(h - upper_hi, lower_lo, 1e-9));
    assert!(approx_eq(h - upper_lo, lower_hi, 1e-9));
}

#[test]
fn dedup_is_idempotent_for_every_style() {
    for raw in all_styles() {
        let model = model(&raw);
        let (again, removed) = remove_doubles(&model.path.points, DEDUP_TOLERANCE);
        assert_eq!(removed, 0);
        assert_eq!(again.len(), model.path.points.len());
        assert_eq!(model.path.points.len() + model.path.removed, model.centerline.len());
    }
}

#[test]
fn out_of_range_height_is_rejected() {
    for height in [0.0, -5.0, 400.0, Real::NAN] {
        let raw = SpringParameters { height, ..Default::default() };
        assert!(matches!(
            springforge::generate(&raw, &Default::default()),
            Err(SpringError::Precondition { parameter: "height", .. })
        ));
    }
}
