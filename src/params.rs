//! Spring parameters in display units, and the normalizer that turns them into
//! manufacturable working-unit parameters.

use crate::errors::SpringError;
use crate::float_types::{Real, to_display, to_working};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed coil height, display units.
pub const HEIGHT_RANGE: (Real, Real) = (0.001, 350.0);
/// Allowed pitch input, turns per display unit.
pub const PITCH_RANGE: (Real, Real) = (0.0, 40000.0);
/// Coil samples per turn.
pub const COIL_SAMPLES_PER_TURN: usize = 15;
/// Fewest hook and transition samples. Below this a hookless end decimates
/// to a single rig point and an open hook tip degenerates to a flat chord.
pub const MIN_HOOK_RESOLUTION: usize = 4;

/// How the wire ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    /// Half-circle hook with a gap (tension spring).
    #[default]
    Open,
    /// Hook that wraps twice and closes on itself.
    Closed,
    /// No hook, ends ground flat (compression spring).
    None,
}

impl HookType {
    pub const fn has_hooks(self) -> bool {
        !matches!(self, HookType::None)
    }
}

impl TryFrom<u8> for HookType {
    type Error = SpringError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HookType::Open),
            2 => Ok(HookType::Closed),
            3 => Ok(HookType::None),
            _ => Err(SpringError::precondition(
                "hook_type",
                code as Real,
                "expected 1 (open), 2 (closed) or 3 (none)",
            )),
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookType::Open => write!(f, "open"),
            HookType::Closed => write!(f, "closed"),
            HookType::None => write!(f, "none"),
        }
    }
}

/// Angle between the planes of the upper and lower hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HookAngle {
    #[default]
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "90")]
    Deg90,
}

impl TryFrom<u8> for HookAngle {
    type Error = SpringError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HookAngle::Deg180),
            2 => Ok(HookAngle::Deg90),
            _ => Err(SpringError::precondition(
                "hook_angle",
                code as Real,
                "expected 1 (180°) or 2 (90°)",
            )),
        }
    }
}

/// Surface finish tag. Carried through to the output, never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Chromium,
    BlackOxide,
    StainlessSteel,
    Zinc,
}

impl TryFrom<u8> for Material {
    type Error = SpringError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Material::Chromium),
            1 => Ok(Material::BlackOxide),
            2 => Ok(Material::StainlessSteel),
            3 => Ok(Material::Zinc),
            _ => Err(SpringError::precondition("material", code as Real, "expected 0..=3")),
        }
    }
}

/// User-facing spring description, lengths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringParameters {
    /// Coil diameter `D`, measured on the wire centerline.
    pub coil_diameter: Real,
    /// Wire diameter `d`.
    pub wire_diameter: Real,
    /// Hook inside diameter `D2`.
    pub hook_diameter: Real,
    /// Coil height `H`.
    pub height: Real,
    /// Turns per unit of height `p`. Always re-derived, kept for the record.
    pub pitch: Real,
    /// Height of the hook neck `h`.
    pub neck: Real,
    pub hook_type: HookType,
    pub hook_angle: HookAngle,
    pub material: Material,
    /// Radial resolution `k` of the wire profile.
    pub radial_resolution: usize,
    /// Longitudinal resolution `n` of hooks and transitions.
    pub hook_resolution: usize,
}

impl Default for SpringParameters {
    fn default() -> Self {
        Self {
            coil_diameter: 15.0,
            wire_diameter: 2.0,
            hook_diameter: 15.0,
            height: 35.0,
            pitch: 0.0008,
            neck: 0.0,
            hook_type: HookType::Open,
            hook_angle: HookAngle::Deg180,
            material: Material::Chromium,
            radial_resolution: 3,
            hook_resolution: 10,
        }
    }
}

impl SpringParameters {
    /// Check the documented input ranges. Anything outside is a caller error.
    pub fn validate(&self) -> Result<(), SpringError> {
        let lengths = [
            ("coil_diameter", self.coil_diameter),
            ("wire_diameter", self.wire_diameter),
            ("hook_diameter", self.hook_diameter),
            ("height", self.height),
            ("pitch", self.pitch),
            ("neck", self.neck),
        ];
        for (name, value) in lengths {
            if !value.is_finite() {
                return Err(SpringError::precondition(name, value, "must be finite"));
            }
        }
        for (name, value) in &lengths[..3] {
            if *value <= 0.0 {
                return Err(SpringError::precondition(name, *value, "must be positive"));
            }
        }
        if self.height < HEIGHT_RANGE.0 || self.height > HEIGHT_RANGE.1 {
            return Err(SpringError::precondition(
                "height",
                self.height,
                "must lie in [0.001, 350]",
            ));
        }
        if self.pitch < PITCH_RANGE.0 || self.pitch > PITCH_RANGE.1 {
            return Err(SpringError::precondition(
                "pitch",
                self.pitch,
                "must lie in [0, 40000]",
            ));
        }
        if self.neck < 0.0 {
            return Err(SpringError::precondition("neck", self.neck, "must not be negative"));
        }
        if self.radial_resolution == 0 {
            return Err(SpringError::precondition(
                "radial_resolution",
                0.0,
                "must be at least 1",
            ));
        }
        if self.hook_resolution < MIN_HOOK_RESOLUTION {
            return Err(SpringError::precondition(
                "hook_resolution",
                self.hook_resolution as Real,
                "must be at least 4",
            ));
        }
        Ok(())
    }
}

/// Which clamping rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampRule {
    /// `3d > D`: wire shrunk to `D/2`.
    WireThickerThanCoil,
    /// `2d > D2`: wire shrunk to `D2/2`.
    WireThickerThanHook,
    /// `D2 > 1.5D`: hook shrunk to `1.5D`.
    HookTooLarge,
    /// `D2 < D/1.5`: hook grown to `D/1.5`.
    HookTooSmall,
}

/// A silent correction made by the normalizer, in working units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub rule: ClampRule,
    pub parameter: &'static str,
    pub from: Real,
    pub to: Real,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} {} mm -> {} mm",
            self.rule,
            self.parameter,
            to_display(self.from),
            to_display(self.to)
        )
    }
}

/// Spring parameters in working units (metres) after clamping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedParameters {
    pub coil_diameter: Real,
    pub wire_diameter: Real,
    pub hook_diameter: Real,
    pub height: Real,
    pub neck: Real,
    /// Turns per working unit of height, without the 90° bias.
    pub pitch: Real,
    pub turns: usize,
    pub hook_type: HookType,
    pub hook_angle: HookAngle,
    pub material: Material,
    pub radial_resolution: usize,
    pub hook_resolution: usize,
}

/// Result of [`normalize`]: the effective parameters and what was changed to
/// get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub parameters: NormalizedParameters,
    pub adjustments: Vec<Adjustment>,
}

/// Validate display-unit parameters, convert to working units and apply the
/// clamping rules.
pub fn normalize(raw: &SpringParameters) -> Result<Normalization, SpringError> {
    raw.validate()?;
    let scaled = NormalizedParameters {
        coil_diameter: to_working(raw.coil_diameter),
        wire_diameter: to_working(raw.wire_diameter),
        hook_diameter: to_working(raw.hook_diameter),
        height: to_working(raw.height),
        neck: to_working(raw.neck),
        pitch: raw.pitch / to_working(1.0),
        turns: 0,
        hook_type: raw.hook_type,
        hook_angle: raw.hook_angle,
        material: raw.material,
        radial_resolution: raw.radial_resolution,
        hook_resolution: raw.hook_resolution,
    };
    scaled.normalized()
}

impl NormalizedParameters {
    /// Apply the clamping rules once, in fixed order, then derive the turn
    /// count and pitch from the clamped wire. Applying this to its own output
    /// changes nothing.
    ///
    /// Turns are counted with the clamped wire diameter, not the requested
    /// one, so a clamped wire can give fewer turns than the raw input implies.
    pub fn normalized(&self) -> Result<Normalization, SpringError> {
        if self.height <= 0.0 || !self.height.is_finite() {
            return Err(SpringError::precondition("height", self.height, "must be positive"));
        }
        if self.coil_diameter <= 0.0 || self.wire_diameter <= 0.0 || self.hook_diameter <= 0.0 {
            return Err(SpringError::precondition(
                "coil_diameter",
                self.coil_diameter,
                "diameters must be positive",
            ));
        }

        let mut out = self.clone();
        let mut adjustments = Vec::new();
        let mut record = |rule, parameter, from: Real, to: Real| {
            if from != to {
                adjustments.push(Adjustment { rule, parameter, from, to });
            }
        };

        let (d_coil, d_hook) = (out.coil_diameter, out.hook_diameter);
        if 3.0 * out.wire_diameter > d_coil {
            let to = d_coil / 2.0;
            record(ClampRule::WireThickerThanCoil, "wire_diameter", out.wire_diameter, to);
            out.wire_diameter = to;
        }
        if 2.0 * out.wire_diameter > d_hook {
            let to = d_hook / 2.0;
            record(ClampRule::WireThickerThanHook, "wire_diameter", out.wire_diameter, to);
            out.wire_diameter = to;
        }
        if out.hook_diameter > 1.5 * d_coil {
            let to = 1.5 * d_coil;
            record(ClampRule::HookTooLarge, "hook_diameter", out.hook_diameter, to);
            out.hook_diameter = to;
        }
        if out.hook_diameter < d_coil / 1.5 {
            let to = d_coil / 1.5;
            record(ClampRule::HookTooSmall, "hook_diameter", out.hook_diameter, to);
            out.hook_diameter = to;
        }

        // An integer number of turns keeps the wire end from landing flush
        // with a hook.
        let d = out.wire_diameter;
        let turns = ((out.height - 0.1 * d) / (1.1 * d)).floor();
        if turns < 1.0 {
            return Err(SpringError::precondition(
                "height",
                to_display(out.height),
                "too short to hold a single turn of this wire",
            ));
        }
        out.turns = turns as usize;
        out.pitch = turns / out.height;

        for adjustment in &adjustments {
            log::warn!("clamped {adjustment}");
        }
        log::debug!(
            "normalized: {} turns, pitch {:.4} turns/m over {:.4} m",
            out.turns,
            out.pitch,
            out.height
        );

        Ok(Normalization { parameters: out, adjustments })
    }

    /// Pitch used to sample the geometry. A 90° hook starts a quarter turn
    /// later; the stored pitch never sees that bias.
    pub fn synthesis_pitch(&self) -> Real {
        match self.hook_angle {
            HookAngle::Deg180 => self.pitch,
            HookAngle::Deg90 => self.pitch + 0.25 / self.height,
        }
    }

    /// Coil sample count `N`, equal to `floor(15 p H)`.
    pub const fn coil_samples(&self) -> usize {
        COIL_SAMPLES_PER_TURN * self.turns
    }

    /// Segment count of the swept wire profile.
    pub const fn profile_segments(&self) -> usize {
        2 * self.radial_resolution + 4
    }

    pub fn coil_radius(&self) -> Real {
        self.coil_diameter / 2.0
    }

    pub fn hook_radius(&self) -> Real {
        self.hook_diameter / 2.0
    }

    /// The effective parameters back in display units.
    pub fn to_display(&self) -> SpringParameters {
        SpringParameters {
            coil_diameter: to_display(self.coil_diameter),
            wire_diameter: to_display(self.wire_diameter),
            hook_diameter: to_display(self.hook_diameter),
            height: to_display(self.height),
            pitch: self.pitch * to_working(1.0),
            neck: to_display(self.neck),
            hook_type: self.hook_type,
            hook_angle: self.hook_angle,
            material: self.material,
            radial_resolution: self.radial_resolution,
            hook_resolution: self.hook_resolution,
        }
    }
}
