//! Writing generated springs out: STL for the mesh, JSON for the rig and
//! scene description.

#[cfg(feature = "stl-io")]
pub mod stl;

use crate::errors::SpringError;
use crate::scene::SpringModel;

/// Pretty-printed JSON of the model's scene description, rig included.
pub fn scene_json(model: &SpringModel) -> Result<String, SpringError> {
    Ok(serde_json::to_string_pretty(&model.describe())?)
}
