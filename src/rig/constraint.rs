//! The constraint graph and object hierarchy tying the rig together.

use crate::float_types::Real;
use serde::Serialize;

/// Objects a spring scene is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RigObject {
    /// The swept wire mesh.
    Mesh,
    /// Armature deforming the mesh.
    MainArmature,
    UpperArmature,
    LowerArmature,
    UpperDriver,
    LowerDriver,
}

/// A bone inside one of the armatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoneRef {
    pub armature: RigObject,
    pub bone: usize,
}

impl BoneRef {
    pub const fn new(armature: RigObject, bone: usize) -> Self {
        Self { armature, bone }
    }
}

/// Local axis a damped track points at its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackAxis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Bends `chain_count` bones ending at `owner` so its tail reaches
    /// `target`.
    InverseKinematics {
        owner: BoneRef,
        target: BoneRef,
        chain_count: usize,
        use_tail: bool,
        use_stretch: bool,
        use_location: bool,
        use_rotation: bool,
        weight: Real,
        orient_weight: Real,
        influence: Real,
    },
    /// Turns `owner` so `track_axis` points at `target`.
    DampedTrack {
        owner: BoneRef,
        target: RigObject,
        track_axis: TrackAxis,
        influence: Real,
    },
    /// `owner` takes over the world rotation of `target`.
    CopyRotation {
        owner: RigObject,
        target: RigObject,
        influence: Real,
    },
}

impl Constraint {
    /// Full-strength IK reaching both position and orientation of the target.
    pub const fn inverse_kinematics(owner: BoneRef, target: BoneRef, chain_count: usize) -> Self {
        Self::InverseKinematics {
            owner,
            target,
            chain_count,
            use_tail: true,
            use_stretch: true,
            use_location: true,
            use_rotation: true,
            weight: 1.0,
            orient_weight: 1.0,
            influence: 1.0,
        }
    }

    pub const fn damped_track(owner: BoneRef, target: RigObject) -> Self {
        Self::DampedTrack { owner, target, track_axis: TrackAxis::Y, influence: 1.0 }
    }

    pub const fn copy_rotation(owner: RigObject, target: RigObject) -> Self {
        Self::CopyRotation { owner, target, influence: 1.0 }
    }

    /// The object this constraint is evaluated on.
    pub const fn owner_object(&self) -> RigObject {
        match self {
            Self::InverseKinematics { owner, .. } | Self::DampedTrack { owner, .. } => owner.armature,
            Self::CopyRotation { owner, .. } => *owner,
        }
    }
}

/// What an object hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum ParentTarget {
    Object(RigObject),
    /// Rigid parenting to a bone, without deformation.
    Bone(BoneRef),
    /// Skinning to an armature with automatically computed weights.
    ArmatureAutoWeights(RigObject),
}

impl ParentTarget {
    pub const fn object(&self) -> RigObject {
        match self {
            Self::Object(object) | Self::ArmatureAutoWeights(object) => *object,
            Self::Bone(bone) => bone.armature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentLink {
    pub child: RigObject,
    pub parent: ParentTarget,
}

/// Walk parent links from every object and report whether any walk comes
/// back to where it started.
pub fn has_cycle(links: &[ParentLink]) -> bool {
    links.iter().any(|start| {
        let mut current = start.parent.object();
        for _ in 0..=links.len() {
            if current == start.child {
                return true;
            }
            match links.iter().find(|l| l.child == current) {
                Some(link) => current = link.parent.object(),
                None => return false,
            }
        }
        true
    })
}
