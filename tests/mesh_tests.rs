mod support;

use springforge::float_types::WELD_TOLERANCE;
use springforge::mesh::sweep::{rings, sweep};
use springforge::mesh::weld::weld;
use springforge::scene::MeshScene;
use springforge::{HookAngle, HookType};
use support::{all_styles, min_pairwise_distance, model, params};

#[test]
fn one_ring_per_centerline_point() {
    for raw in all_styles() {
        let model = model(&raw);
        let rings = rings(&model.sweep).unwrap();
        assert_eq!(rings.len(), model.path.points.len());
        assert!(rings.iter().all(|r| r.len() == model.parameters.profile_segments()));
    }
}

#[test]
fn swept_wire_encloses_positive_volume() {
    for raw in all_styles() {
        let model = model(&raw);
        let mesh = sweep(&model.sweep).unwrap();
        let r = model.sweep.radius;
        let tube = std::f64::consts::PI * r * r * model.path.length;
        let volume = mesh.signed_volume();
        // polygonal profile and end caps keep it near the ideal tube
        assert!(volume > 0.5 * tube && volume < 1.5 * tube, "{volume} vs {tube}");
    }
}

#[test]
fn welded_vertices_are_kept_apart() {
    let scene = MeshScene::from_model(&model(&params(HookType::Open, HookAngle::Deg180))).unwrap();
    let welded = scene.welded.unwrap();
    assert!(min_pairwise_distance(&welded.vertices) > WELD_TOLERANCE);
    assert!(welded.triangle_count() > 0);
}

#[test]
fn welded_wire_is_closed() {
    let model = model(&params(HookType::Open, HookAngle::Deg90));
    let mesh = sweep(&model.sweep).unwrap();
    let once = weld(&mesh, WELD_TOLERANCE);
    assert!(once.vertex_count() < mesh.vertex_count());
    assert!(once.open_edges() == 0, "{} open edges", once.open_edges());
}

#[test]
fn ground_ends_are_flat() {
    let model = model(&params(HookType::None, HookAngle::Deg180));
    let scene = MeshScene::from_model(&model).unwrap();
    let bb = scene.mesh.unwrap().bounding_box();
    let h = model.parameters.height;
    assert!(bb.mins.z >= -1e-9, "{}", bb.mins.z);
    assert!(bb.maxs.z <= h + 1e-9, "{}", bb.maxs.z);
}

#[test]
fn ground_ends_are_sealed() {
    for hook_angle in [HookAngle::Deg180, HookAngle::Deg90] {
        let model = model(&params(HookType::None, hook_angle));
        let scene = MeshScene::from_model(&model).unwrap();
        let welded = scene.welded.unwrap();
        assert_eq!(welded.open_edges(), 0, "{hook_angle:?}");

        // the cut faces are closed by triangles lying in the ground planes
        let h = model.parameters.height;
        let on_ground = welded
            .vertices
            .iter()
            .filter(|p| p.z.abs() < 1e-9 || (p.z - h).abs() < 1e-9)
            .count();
        assert!(on_ground > 0);
    }
}
