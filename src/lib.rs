//! Procedural **spring** geometry: tension springs with open or closed
//! hooks and ground-flat compression springs, each with a rig for posing it
//! by its ends.
//!
//! The pipeline runs in pure functions over points:
//! [parameters](params) are clamped into something manufacturable, a
//! [centerline](centerline) is traced top to bottom, [cleaned up](path),
//! and a [rig](rig) is laid along a decimated copy of it. The result is a
//! [`SpringModel`] that a [`SceneHost`](scene::SceneHost) turns into
//! objects; [`MeshScene`](scene::MeshScene) does so as a welded triangle
//! mesh ready for [STL export](io).
//!
//! ```rust
//! use springforge::{RigOptions, SpringParameters, generate, scene::MeshScene};
//!
//! let model = generate(&SpringParameters::default(), &RigOptions::default())?;
//! assert_eq!(model.name, "2 x 17 x 13 x 54");
//! let scene = MeshScene::from_model(&model)?;
//! assert!(scene.welded.is_some());
//! # Ok::<(), springforge::errors::SpringError>(())
//! ```
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export and the `springforge` binary
//!
//! #### Optional
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod centerline;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod generator;
pub mod io;
pub mod mesh;
pub mod params;
pub mod path;
pub mod rig;
pub mod scene;
pub mod triangulated;

pub use errors::SpringError;
pub use generator::generate;
pub use params::{HookAngle, HookType, Material, SpringParameters};
pub use rig::RigOptions;
pub use scene::SpringModel;
