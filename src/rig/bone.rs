//! Bones and bone chains.

use crate::errors::SpringError;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// A single bone of an armature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    pub name: String,
    pub head: Point3<Real>,
    pub tail: Point3<Real>,
    /// Index of the parent bone in the same chain.
    pub parent: Option<usize>,
    /// Whether the head is glued to the parent's tail.
    pub connected: bool,
    /// Optional text shown on the bone.
    pub label: Option<String>,
}

impl Bone {
    pub fn new(name: impl Into<String>, head: Point3<Real>, tail: Point3<Real>) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            parent: None,
            connected: false,
            label: None,
        }
    }

    pub fn vector(&self) -> Vector3<Real> {
        self.tail - self.head
    }

    pub fn length(&self) -> Real {
        self.vector().norm()
    }
}

/// An armature's bones, parents always preceding their children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneChain {
    pub name: String,
    pub bones: Vec<Bone>,
}

impl BoneChain {
    /// Link consecutive points into connected bones: bone `i` runs from
    /// `points[i]` to `points[i + 1]` and is parented to bone `i - 1`.
    pub fn from_points(name: impl Into<String>, points: &[Point3<Real>]) -> Result<Self, SpringError> {
        let name = name.into();
        if points.len() < 2 {
            return Err(SpringError::Degenerate(format!(
                "{name} needs at least two points, got {}",
                points.len()
            )));
        }

        let mut bones = Vec::with_capacity(points.len() - 1);
        for (i, w) in points.windows(2).enumerate() {
            if (w[1] - w[0]).norm() < EPSILON {
                return Err(SpringError::Degenerate(format!("{name}: bone {i} has zero length")));
            }
            let mut bone = Bone::new(format!("Bone.{i:03}"), w[0], w[1]);
            if i > 0 {
                bone.parent = Some(i - 1);
                bone.connected = true;
            }
            bones.push(bone);
        }
        Ok(Self { name, bones })
    }

    /// Build a chain from explicit bones, checking that every parent index
    /// points backwards.
    pub fn from_bones(name: impl Into<String>, bones: Vec<Bone>) -> Result<Self, SpringError> {
        let name = name.into();
        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= i {
                    return Err(SpringError::Degenerate(format!(
                        "{name}: bone {i} is parented to later bone {parent}"
                    )));
                }
            }
        }
        Ok(Self { name, bones })
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// True when every parent index precedes its child, so walking parents
    /// always terminates at a root.
    pub fn is_acyclic(&self) -> bool {
        self.bones
            .iter()
            .enumerate()
            .all(|(i, b)| b.parent.is_none_or(|p| p < i))
    }

    /// True when every connected bone starts exactly where its parent ends.
    pub fn is_linked(&self) -> bool {
        self.bones.iter().all(|b| match (b.connected, b.parent) {
            (true, Some(p)) => self.bones[p].tail == b.head,
            (true, None) => false,
            (false, _) => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_from_points_links_heads_to_tails() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let chain = BoneChain::from_points("chain", &points).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.bones[0].parent, None);
        assert_eq!(chain.bones[1].parent, Some(0));
        assert_eq!(chain.bones[1].name, "Bone.001");
        assert!(chain.is_linked());
        assert!(chain.is_acyclic());
    }

    #[test]
    fn zero_length_bone_is_rejected() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(matches!(
            BoneChain::from_points("chain", &[p, p]),
            Err(SpringError::Degenerate(_))
        ));
        assert!(BoneChain::from_points("chain", &[p]).is_err());
    }

    #[test]
    fn forward_parent_is_rejected() {
        let mut bone = Bone::new("a", Point3::origin(), Point3::new(0.0, 0.0, 1.0));
        bone.parent = Some(1);
        let other = Bone::new("b", Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        assert!(BoneChain::from_bones("aux", vec![bone, other]).is_err());
    }
}
