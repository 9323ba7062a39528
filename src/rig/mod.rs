//! Skeletal rig for posing a spring by its two hooks.
//!
//! The main chain follows a decimated copy of the centerline. Each end gets
//! a driver object carrying a two-bone auxiliary chain: a short guide bone
//! that tracks the opposite driver and an anchor bone that the main chain
//! hangs from (top) or reaches for with IK (bottom).

use crate::centerline::{Centerline, coil};
use crate::errors::SpringError;
use crate::float_types::{DEDUP_TOLERANCE, Real};
use crate::params::{HookType, NormalizedParameters};
use crate::path::dedup_indices;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub mod bone;
pub mod constraint;

pub use bone::{Bone, BoneChain};
pub use constraint::{BoneRef, Constraint, ParentLink, ParentTarget, RigObject, TrackAxis};

/// Every third centerline point goes into the main chain.
const DECIMATION: usize = 3;

/// Guide bone length as a fraction of the coil diameter.
const GUIDE_FRACTION: Real = 1.0 / 25.0;

/// Anchor bones are this fraction of the main bone they shadow.
const ANCHOR_FRACTION: Real = 1.0 / 100.0;

/// Driver display size as a fraction of the coil diameter.
const DRIVER_SIZE_FRACTION: Real = 0.55;

/// Bones that receive the signature label.
const SIGNATURE_BONE: usize = 8;
const SIGNATURE_BONE_LONG: usize = 17;
const SIGNATURE_BONE_SHORT: usize = 7;

/// Position of the guide and anchor bones in an [`AuxChain`].
pub const GUIDE: usize = 0;
pub const ANCHOR: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RigOptions {
    /// Label placed on two bones of the main chain.
    pub signature: Option<String>,
}

/// An empty object the user grabs to move one end of the spring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub name: String,
    pub location: Point3<Real>,
    pub display_size: Real,
}

/// A guide bone and an anchor bone parented to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuxChain {
    pub chain: BoneChain,
    /// Main bone whose roll the anchor copies.
    pub roll_from: Option<usize>,
}

impl AuxChain {
    fn new(
        name: &str,
        guide: (Point3<Real>, Point3<Real>),
        anchor: (Point3<Real>, Point3<Real>),
        roll_from: Option<usize>,
    ) -> Result<Self, SpringError> {
        let mut anchor = Bone::new("Anchor", anchor.0, anchor.1);
        anchor.parent = Some(GUIDE);
        let chain = BoneChain::from_bones(name, vec![Bone::new("Guide", guide.0, guide.1), anchor])?;
        Ok(Self { chain, roll_from })
    }

    pub fn guide(&self) -> &Bone {
        &self.chain.bones[GUIDE]
    }

    pub fn anchor(&self) -> &Bone {
        &self.chain.bones[ANCHOR]
    }
}

/// The complete rig of one spring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rig {
    pub main: BoneChain,
    pub upper: AuxChain,
    pub lower: AuxChain,
    pub upper_driver: Driver,
    pub lower_driver: Driver,
    pub constraints: Vec<Constraint>,
    pub hierarchy: Vec<ParentLink>,
    /// Surviving main chain points from the upper hook and transition.
    pub up_len: usize,
    /// Surviving main chain points from the resampled coil.
    pub coil_len: usize,
    /// Surviving main chain points from the lower transition and hook.
    pub lo_len: usize,
}

impl Rig {
    /// Point count of the main chain.
    pub fn size(&self) -> usize {
        self.main.len() + 1
    }
}

fn every_third(points: &[Point3<Real>]) -> impl Iterator<Item = Point3<Real>> + '_ {
    points.iter().step_by(DECIMATION).copied()
}

/// Main chain points and how many of them come from each region.
fn main_chain_points(
    params: &NormalizedParameters,
    centerline: &Centerline,
) -> (Vec<Point3<Real>>, usize, usize, usize) {
    let upper: Vec<_> = every_third(&centerline.upper_hook)
        .chain(every_third(&centerline.upper_transition))
        .collect();
    let coil_samples = params.coil_samples().div_ceil(DECIMATION);
    let coil = coil::helix(params, params.coil_radius() + params.wire_diameter, coil_samples);
    let lower: Vec<_> = every_third(&centerline.lower_transition)
        .chain(every_third(&centerline.lower_hook))
        .collect();

    let (upper_end, coil_end) = (upper.len(), upper.len() + coil.len());
    let raw: Vec<_> = upper.into_iter().chain(coil).chain(lower).collect();
    let keep = dedup_indices(&raw, DEDUP_TOLERANCE);

    let up_len = keep.iter().filter(|&&i| i < upper_end).count();
    let lo_len = keep.iter().filter(|&&i| i >= coil_end).count();
    let coil_len = keep.len() - up_len - lo_len;
    (keep.into_iter().map(|i| raw[i]).collect(), up_len, coil_len, lo_len)
}

/// Where the two drivers sit for each hook style.
pub fn driver_locations(params: &NormalizedParameters) -> (Point3<Real>, Point3<Real>) {
    let r2 = params.hook_radius();
    let h_top = params.height;
    match params.hook_type {
        HookType::Open => {
            let reach = r2 + params.neck + params.wire_diameter;
            (Point3::new(0.0, 0.0, h_top + reach), Point3::new(0.0, 0.0, -reach))
        },
        HookType::Closed => (Point3::new(0.0, 0.0, h_top + r2), Point3::new(0.0, 0.0, -r2)),
        HookType::None => (Point3::new(0.0, 0.0, h_top), Point3::origin()),
    }
}

/// Build the rig for a synthesized centerline.
pub fn build(
    params: &NormalizedParameters,
    centerline: &Centerline,
    options: &RigOptions,
) -> Result<Rig, SpringError> {
    let (x, up_len, coil_len, lo_len) = main_chain_points(params, centerline);
    let size = x.len();
    if up_len < 2 || lo_len < 1 || size < up_len + lo_len + 1 {
        return Err(SpringError::Degenerate(format!(
            "main chain of {size} points leaves {up_len} upper and {lo_len} lower points, too few to rig"
        )));
    }
    let ik_bone = size - lo_len - 1;
    let chain_count = size - lo_len - up_len;

    let mut main = BoneChain::from_points("Spring armature", &x)?;
    if let Some(signature) = &options.signature {
        let second = if main.len() >= SIGNATURE_BONE_LONG + 1 {
            SIGNATURE_BONE_LONG
        } else {
            SIGNATURE_BONE_SHORT
        };
        for index in [SIGNATURE_BONE, second] {
            if let Some(bone) = main.bones.get_mut(index) {
                bone.label = Some(signature.clone());
            }
        }
    }

    let (up_location, lo_location) = driver_locations(params);
    let guide = Vector3::z() * (params.coil_diameter * GUIDE_FRACTION);
    let display_size = DRIVER_SIZE_FRACTION * params.coil_diameter;

    let upper_head = x[up_len - 2];
    let upper = AuxChain::new(
        "Upper armature",
        (up_location, up_location - guide),
        (upper_head, upper_head + (x[up_len - 1] - upper_head) * ANCHOR_FRACTION),
        None,
    )?;
    let lower_head = x[size - lo_len];
    let lower = AuxChain::new(
        "Lower armature",
        (lo_location, lo_location + guide),
        (lower_head, lower_head + (lower_head - x[size - lo_len - 1]) * ANCHOR_FRACTION),
        Some(ik_bone),
    )?;

    let constraints = vec![
        Constraint::inverse_kinematics(
            BoneRef::new(RigObject::MainArmature, ik_bone),
            BoneRef::new(RigObject::LowerArmature, ANCHOR),
            chain_count,
        ),
        Constraint::damped_track(BoneRef::new(RigObject::UpperArmature, GUIDE), RigObject::LowerDriver),
        Constraint::damped_track(BoneRef::new(RigObject::LowerArmature, GUIDE), RigObject::UpperDriver),
        Constraint::copy_rotation(RigObject::LowerDriver, RigObject::UpperDriver),
    ];

    let hierarchy = vec![
        ParentLink {
            child: RigObject::UpperArmature,
            parent: ParentTarget::Object(RigObject::UpperDriver),
        },
        ParentLink {
            child: RigObject::LowerArmature,
            parent: ParentTarget::Object(RigObject::LowerDriver),
        },
        ParentLink {
            child: RigObject::MainArmature,
            parent: ParentTarget::Bone(BoneRef::new(RigObject::UpperArmature, ANCHOR)),
        },
        ParentLink {
            child: RigObject::Mesh,
            parent: ParentTarget::ArmatureAutoWeights(RigObject::MainArmature),
        },
    ];

    log::debug!(
        "rig: {} main bones, regions {up_len}/{coil_len}/{lo_len}, IK on bone {ik_bone} over {chain_count}",
        main.len()
    );

    Ok(Rig {
        main,
        upper,
        lower,
        upper_driver: Driver { name: "Upper driver".into(), location: up_location, display_size },
        lower_driver: Driver { name: "Lower driver".into(), location: lo_location, display_size },
        constraints,
        hierarchy,
        up_len,
        coil_len,
        lo_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SpringParameters, normalize};

    fn rig_for(hook_type: HookType, options: &RigOptions) -> (NormalizedParameters, Rig) {
        let raw = SpringParameters { hook_type, ..Default::default() };
        let params = normalize(&raw).unwrap().parameters;
        let centerline = Centerline::synthesize(&params).unwrap();
        let rig = build(&params, &centerline, options).unwrap();
        (params, rig)
    }

    #[test]
    fn coil_region_is_resampled_by_three() {
        for hook_type in [HookType::Open, HookType::Closed, HookType::None] {
            let (params, rig) = rig_for(hook_type, &RigOptions::default());
            assert_eq!(rig.coil_len, params.coil_samples().div_ceil(3));
        }
    }

    #[test]
    fn ik_spans_from_the_upper_region_to_the_lower_anchor() {
        let (_, rig) = rig_for(HookType::Open, &RigOptions::default());
        let Constraint::InverseKinematics { owner, target, chain_count, .. } = rig.constraints[0] else {
            panic!("first constraint should be IK");
        };
        // the last main bone before the lower region
        let ik_bone = rig.size() - rig.lo_len - 1;
        assert_eq!(owner.bone, ik_bone);
        assert_eq!(target, BoneRef::new(RigObject::LowerArmature, ANCHOR));
        assert_eq!(owner.bone + 1 - chain_count, rig.up_len);
        assert_eq!(rig.lower.roll_from, Some(ik_bone));
    }

    #[test]
    fn anchors_shadow_the_boundary_bones() {
        let (params, rig) = rig_for(HookType::Closed, &RigOptions::default());
        let upper_bone = &rig.main.bones[rig.up_len - 2];
        assert_eq!(rig.upper.anchor().head, upper_bone.head);
        assert!((rig.upper.anchor().length() - upper_bone.length() / 100.0).abs() < 1e-12);
        assert!((rig.upper.guide().length() - params.coil_diameter / 25.0).abs() < 1e-12);
        assert!(rig.upper.guide().vector().z < 0.0);
        assert!(rig.lower.guide().vector().z > 0.0);
    }

    #[test]
    fn signature_lands_on_two_distinct_bones() {
        let options = RigOptions { signature: Some("sig".into()) };
        let (_, rig) = rig_for(HookType::Open, &options);
        let labelled = |rig: &Rig| -> Vec<usize> {
            rig.main
                .bones
                .iter()
                .enumerate()
                .filter_map(|(i, b)| b.label.as_ref().map(|_| i))
                .collect()
        };
        assert_eq!(labelled(&rig), vec![8, 17]);

        let (_, plain) = rig_for(HookType::Open, &RigOptions::default());
        assert!(labelled(&plain).is_empty());
    }

    #[test]
    fn drivers_sit_at_the_hook_tips() {
        let (params, rig) = rig_for(HookType::None, &RigOptions::default());
        assert_eq!(rig.upper_driver.location, Point3::new(0.0, 0.0, params.height));
        assert_eq!(rig.lower_driver.location, Point3::origin());
        assert!((rig.upper_driver.display_size - 0.55 * params.coil_diameter).abs() < 1e-15);
    }
}
