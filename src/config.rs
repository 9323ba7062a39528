//! Configuration loader: spring parameters, rig options and output settings
//! from a TOML file.
//!
//! ```toml
//! [spring]
//! coil_diameter = 15.0
//! wire_diameter = 2.0
//! hook_type = "closed"
//!
//! [rig]
//! signature = "ACME"
//!
//! [output]
//! directory = "out"
//! ascii = false
//! ```
//!
//! Every table and key is optional; missing ones take their defaults.

use crate::errors::SpringError;
use crate::params::SpringParameters;
use crate::rig::RigOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when no path is given.
pub const CONFIG_ENV: &str = "SPRINGFORGE_CONFIG";

/// File looked for in the working directory as a last resort.
pub const DEFAULT_CONFIG_FILE: &str = "springforge.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where files are written.
    pub directory: PathBuf,
    /// Write ASCII instead of binary STL.
    pub ascii: bool,
    /// Also write the scene description as JSON next to the mesh.
    pub scene_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("."), ascii: false, scene_json: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub spring: SpringParameters,
    pub rig: RigOptions,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, SpringError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, SpringError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SpringError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SpringError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)
            .map_err(|e| SpringError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Resolve the config file to read.
///
/// Tries in order:
/// 1. the explicit path
/// 2. the `SPRINGFORGE_CONFIG` environment variable
/// 3. `springforge.toml` in the working directory, if it exists
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

/// Load the resolved config, or the defaults when there is none.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, SpringError> {
    match resolve_config_path(explicit) {
        Some(path) => Config::load(&path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HookAngle, HookType};

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [spring]
            wire_diameter = 1.5
            hook_type = "none"
            hook_angle = "90"

            [rig]
            signature = "ACME"
            "#,
        )
        .unwrap();
        assert_eq!(config.spring.wire_diameter, 1.5);
        assert_eq!(config.spring.coil_diameter, 15.0);
        assert_eq!(config.spring.hook_type, HookType::None);
        assert_eq!(config.spring.hook_angle, HookAngle::Deg90);
        assert_eq!(config.rig.signature.as_deref(), Some("ACME"));
        assert!(!config.output.ascii);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("[spring]\ncoil = 3.0\n").unwrap_err();
        assert!(matches!(err, SpringError::Config(_)));
    }

    #[test]
    fn defaults_round_trip() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("custom.toml");
        assert_eq!(resolve_config_path(Some(path)), Some(path.to_path_buf()));
    }
}
