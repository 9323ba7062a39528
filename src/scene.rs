//! The generated spring as data, and the seam through which it is handed to
//! a 3D scene.
//!
//! [`SpringModel`] is a pure description. A [`SceneHost`] turns it into
//! something concrete; [`MeshScene`] is the host shipped with the crate and
//! realizes it as a welded triangle mesh.

use crate::centerline::Centerline;
use crate::errors::SpringError;
use crate::float_types::{EPSILON, Real, WELD_TOLERANCE, parry3d::bounding_volume::Aabb};
use crate::mesh::Mesh;
use crate::mesh::sweep::{self, EndCap, SweepRequest};
use crate::mesh::weld::{self, IndexedMesh};
use crate::params::{Adjustment, HookType, NormalizedParameters, SpringParameters};
use crate::path::ProcessedPath;
use crate::rig::Rig;
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Edge of the cubes trimming a hookless spring, in outside diameters.
const TRIM_CUBE_SCALE: Real = 1.1;

/// Cap extrusions of a hookless spring, as fractions of the mean sample
/// spacing.
const FLAT_START_EXTRUSION: Real = 0.1;
const FLAT_END_EXTRUSION: Real = 0.15;

/// An axis-aligned cube removed from the swept wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubtractionVolume {
    pub center: Point3<Real>,
    pub size: Real,
}

impl SubtractionVolume {
    pub fn aabb(&self) -> Aabb {
        let half = Vector3::repeat(self.size / 2.0);
        Aabb::new(self.center - half, self.center + half)
    }
}

/// The cubes grinding the ends of a hookless spring flat at `z = 0` and
/// `z = H`. Hooked springs get none.
pub fn subtraction_volumes(params: &NormalizedParameters) -> Vec<SubtractionVolume> {
    if params.hook_type != HookType::None {
        return Vec::new();
    }
    let size = TRIM_CUBE_SCALE * (params.coil_diameter + params.wire_diameter);
    vec![
        SubtractionVolume { center: Point3::new(0.0, 0.0, -size / 2.0), size },
        SubtractionVolume { center: Point3::new(0.0, 0.0, params.height + size / 2.0), size },
    ]
}

/// Unit direction from `from` to `to`.
fn direction(from: &Point3<Real>, to: &Point3<Real>) -> Result<Vector3<Real>, SpringError> {
    (to - from)
        .try_normalize(EPSILON * EPSILON)
        .ok_or_else(|| SpringError::Degenerate("centerline ends in a zero-length segment".into()))
}

/// How the wire is closed at the upper (start) and lower (end) hook tips.
pub fn end_caps(
    params: &NormalizedParameters,
    path: &ProcessedPath,
) -> Result<(EndCap, EndCap), SpringError> {
    let d = params.wire_diameter;
    let lift = |dz: Real| Vector3::new(0.0, 0.0, dz);
    Ok(match params.hook_type {
        HookType::Open => {
            let d2 = params.hook_diameter;
            (
                EndCap::new(true, vec![lift(-0.2 * d2), lift(-0.1 * d)]),
                EndCap::new(true, vec![lift(0.2 * d2), lift(0.1 * d)]),
            )
        },
        HookType::Closed => (
            EndCap::new(true, vec![lift(0.1 * d)]),
            EndCap::new(true, vec![lift(-0.1 * d)]),
        ),
        HookType::None => {
            let [first, second] = match path.points.first_chunk::<2>() {
                Some(pair) => *pair,
                None => return Err(SpringError::Degenerate("centerline has fewer than two points".into())),
            };
            let [before, last] = match path.points.last_chunk::<2>() {
                Some(pair) => *pair,
                None => return Err(SpringError::Degenerate("centerline has fewer than two points".into())),
            };
            let spacing = path.length
                / (params.coil_samples() + 4 * params.hook_resolution + 1) as Real;
            (
                EndCap::new(false, vec![direction(&second, &first)? * (FLAT_START_EXTRUSION * spacing)]),
                EndCap::new(false, vec![direction(&before, &last)? * (FLAT_END_EXTRUSION * spacing)]),
            )
        },
    })
}

/// Everything generated for one spring.
#[derive(Debug, Clone)]
pub struct SpringModel {
    /// Size tag, also used as the collection name.
    pub name: String,
    pub parameters: NormalizedParameters,
    pub adjustments: Vec<Adjustment>,
    pub centerline: Centerline,
    pub path: ProcessedPath,
    pub sweep: SweepRequest,
    pub subtractions: Vec<SubtractionVolume>,
    pub rig: Rig,
}

/// Serializable digest of a [`SpringModel`].
#[derive(Debug, Clone, Serialize)]
pub struct SceneDescription<'a> {
    pub name: &'a str,
    /// Effective parameters in millimetres.
    pub parameters: SpringParameters,
    pub adjustments: Vec<String>,
    pub centerline_points: usize,
    pub removed_points: usize,
    pub wire_length: Real,
    pub subtractions: &'a [SubtractionVolume],
    pub rig: &'a Rig,
}

impl SpringModel {
    pub fn describe(&self) -> SceneDescription<'_> {
        SceneDescription {
            name: &self.name,
            parameters: self.parameters.to_display(),
            adjustments: self.adjustments.iter().map(ToString::to_string).collect(),
            centerline_points: self.path.points.len(),
            removed_points: self.path.removed,
            wire_length: self.path.length,
            subtractions: &self.subtractions,
            rig: &self.rig,
        }
    }
}

/// A 3D scene able to receive a spring.
///
/// [`emit`] calls these once each in declaration order, `subtract` once per
/// volume.
pub trait SceneHost {
    type Error;

    fn begin_collection(&mut self, name: &str) -> Result<(), Self::Error>;
    fn sweep(&mut self, request: &SweepRequest) -> Result<(), Self::Error>;
    fn subtract(&mut self, volume: &SubtractionVolume) -> Result<(), Self::Error>;
    fn weld(&mut self, threshold: Real) -> Result<(), Self::Error>;
    fn attach_rig(&mut self, rig: &Rig) -> Result<(), Self::Error>;
}

/// Drive a host through the whole model. The first host error aborts.
pub fn emit<H: SceneHost>(model: &SpringModel, host: &mut H) -> Result<(), H::Error> {
    host.begin_collection(&model.name)?;
    host.sweep(&model.sweep)?;
    for volume in &model.subtractions {
        host.subtract(volume)?;
    }
    host.weld(WELD_TOLERANCE)?;
    host.attach_rig(&model.rig)
}

/// Host that builds the spring as an in-memory mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshScene {
    pub collection: Option<String>,
    pub mesh: Option<Mesh>,
    pub welded: Option<IndexedMesh>,
    pub rig: Option<Rig>,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a model into a fresh scene.
    pub fn from_model(model: &SpringModel) -> Result<Self, SpringError> {
        let mut scene = Self::new();
        emit(model, &mut scene)?;
        Ok(scene)
    }

    fn mesh_mut(&mut self, step: &str) -> Result<&mut Mesh, SpringError> {
        self.mesh
            .as_mut()
            .ok_or_else(|| SpringError::Host(format!("{step} before the wire was swept")))
    }
}

impl SceneHost for MeshScene {
    type Error = SpringError;

    fn begin_collection(&mut self, name: &str) -> Result<(), SpringError> {
        log::info!("building {name}");
        self.collection = Some(name.to_string());
        Ok(())
    }

    fn sweep(&mut self, request: &SweepRequest) -> Result<(), SpringError> {
        if self.collection.is_none() {
            return Err(SpringError::Host("sweep outside a collection".into()));
        }
        self.mesh = Some(sweep::sweep(request)?);
        Ok(())
    }

    fn subtract(&mut self, volume: &SubtractionVolume) -> Result<(), SpringError> {
        let mesh = self.mesh_mut("subtract")?;
        *mesh = mesh.difference_box(&volume.aabb());
        Ok(())
    }

    fn weld(&mut self, threshold: Real) -> Result<(), SpringError> {
        let welded = weld::weld(self.mesh_mut("weld")?, threshold);
        self.welded = Some(welded);
        Ok(())
    }

    fn attach_rig(&mut self, rig: &Rig) -> Result<(), SpringError> {
        if self.welded.is_none() {
            return Err(SpringError::Host("rig attached before the mesh was welded".into()));
        }
        self.rig = Some(rig.clone());
        Ok(())
    }
}
