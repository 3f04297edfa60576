// Game configuration - loaded from RON and validated before the simulation starts

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::physics::DEFAULT_GRAVITY;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Horizontal kick and vertical launch applied by a wall-jump
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WallJumpImpulse {
    /// Horizontal speed away from the wall
    pub x: f32,
    /// Vertical launch speed
    pub y: f32,
}

/// Movement tuning for the locomotion state machine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Horizontal speed while running (units/second)
    pub max_speed: f32,
    /// Horizontal speed while walking
    pub walk_speed: f32,
    /// Horizontal speed while sliding on ice
    pub slide_speed: f32,
    /// Base vertical launch speed of a jump
    pub jump_launch_speed: f32,
    /// Multiplier applied to the launch speed
    pub jump_modifier: f32,
    /// Vertical velocity multiplier when a jump is cut short (0 < f < 1)
    pub jump_cut_factor: f32,
    /// Maximum downward speed while sliding down a wall
    pub wall_slide_max_fall_speed: f32,
    pub wall_jump_impulse: WallJumpImpulse,
    /// Vertical launch granted by a voluntary release at the top snow stage
    pub release_launch_speed: f32,
    /// Maximum time between two taps to start running
    pub double_tap_window: f32,
    /// Fraction of retained horizontal velocity lost per airborne tick
    pub air_drag: f32,
    /// Minimum horizontal target speed that changes facing
    pub facing_deadzone: f32,
}

pub const DEFAULT_LOCOMOTION: LocomotionConfig = LocomotionConfig {
    max_speed: 7.0,
    walk_speed: 3.0,
    slide_speed: 8.0,
    jump_launch_speed: 7.0,
    jump_modifier: 1.5,
    jump_cut_factor: 0.5,
    wall_slide_max_fall_speed: 1.0,
    wall_jump_impulse: WallJumpImpulse { x: 4.0, y: 7.0 },
    release_launch_speed: 7.0,
    double_tap_window: 0.3,
    air_drag: 0.05,
    facing_deadzone: 0.01,
};

impl Default for LocomotionConfig {
    fn default() -> Self {
        DEFAULT_LOCOMOTION
    }
}

/// Which triggers may advance the snow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AdvancementPolicy {
    /// Touching a snow pickup advances one stage immediately
    Pickup,
    /// Staying inside a snow area for the exposure duration advances one stage
    Exposure,
    /// Both triggers are active
    Combined,
}

impl AdvancementPolicy {
    pub fn allows_pickup(self) -> bool {
        matches!(self, Self::Pickup | Self::Combined)
    }

    pub fn allows_exposure(self) -> bool {
        matches!(self, Self::Exposure | Self::Combined)
    }
}

/// How hazard contact interacts with the top snow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum HazardPolicy {
    /// The top stage shields the character from hazard resets
    ProtectAtMax,
    /// Hazards always reset the character
    AlwaysReset,
}

/// Snow progression tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Number of snow stages, must be 3
    pub stage_count: u8,
    /// Time inside a snow area needed to advance one stage
    pub exposure_duration: f32,
    pub advancement: AdvancementPolicy,
    pub hazard_policy: HazardPolicy,
}

pub const DEFAULT_PROGRESSION: ProgressionConfig = ProgressionConfig {
    stage_count: 3,
    exposure_duration: 3.0,
    advancement: AdvancementPolicy::Pickup,
    hazard_policy: HazardPolicy::ProtectAtMax,
};

impl Default for ProgressionConfig {
    fn default() -> Self {
        DEFAULT_PROGRESSION
    }
}

/// Damage and knockback dealt by hazard objects to damageable entities
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    pub damage_amount: i32,
    pub knockback_magnitude: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            damage_amount: 1,
            knockback_magnitude: 5.0,
        }
    }
}

/// How walls next to an airborne character are detected
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum WallDetection {
    /// Walls count only while actually touched
    ContactNormal,
    /// Side probes report walls up to `distance` away
    Raycast { distance: f32 },
}

/// Kinematic integration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical gravity acceleration (negative is down)
    pub gravity: f32,
    pub gravity_scale: f32,
    /// Gap kept between the body and the surfaces it rests against
    pub skin_width: f32,
    /// Minimum normal y component for a surface to count as ground
    pub min_ground_normal_y: f32,
    /// Minimum |normal x| for a surface to count as a wall
    pub wall_normal_threshold: f32,
    pub wall_detection: WallDetection,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            gravity_scale: 1.0,
            skin_width: 0.02,
            min_ground_normal_y: 0.65,
            wall_normal_threshold: 0.9,
            wall_detection: WallDetection::ContactNormal,
        }
    }
}

/// Character collision box dimensions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 0.8,
            height: 1.0,
        }
    }
}

/// Input adapter settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Analog axis values below this magnitude read as zero
    pub axis_deadzone: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { axis_deadzone: 0.1 }
    }
}

/// Complete configuration for one game session
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub locomotion: LocomotionConfig,
    pub progression: ProgressionConfig,
    pub hazard: HazardConfig,
    pub physics: PhysicsConfig,
    pub body: BodyConfig,
    pub input: InputSettings,
}

impl GameConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        non_negative("locomotion.max_speed", loco.max_speed)?;
        non_negative("locomotion.walk_speed", loco.walk_speed)?;
        non_negative("locomotion.slide_speed", loco.slide_speed)?;
        non_negative("locomotion.jump_launch_speed", loco.jump_launch_speed)?;
        non_negative("locomotion.jump_modifier", loco.jump_modifier)?;
        open_unit("locomotion.jump_cut_factor", loco.jump_cut_factor)?;
        non_negative(
            "locomotion.wall_slide_max_fall_speed",
            loco.wall_slide_max_fall_speed,
        )?;
        non_negative("locomotion.wall_jump_impulse.x", loco.wall_jump_impulse.x)?;
        non_negative("locomotion.wall_jump_impulse.y", loco.wall_jump_impulse.y)?;
        non_negative("locomotion.release_launch_speed", loco.release_launch_speed)?;
        positive("locomotion.double_tap_window", loco.double_tap_window)?;
        if !(0.0..=1.0).contains(&loco.air_drag) {
            return Err(invalid("locomotion.air_drag", "must lie in [0, 1]"));
        }
        non_negative("locomotion.facing_deadzone", loco.facing_deadzone)?;

        let progression = &self.progression;
        if progression.stage_count != 3 {
            return Err(invalid(
                "progression.stage_count",
                format!("must be 3, got {}", progression.stage_count),
            ));
        }
        positive("progression.exposure_duration", progression.exposure_duration)?;

        if self.hazard.damage_amount < 0 {
            return Err(invalid("hazard.damage_amount", "must not be negative"));
        }
        non_negative("hazard.knockback_magnitude", self.hazard.knockback_magnitude)?;

        let physics = &self.physics;
        if !physics.gravity.is_finite() || physics.gravity > 0.0 {
            return Err(invalid("physics.gravity", "must be finite and not point up"));
        }
        non_negative("physics.gravity_scale", physics.gravity_scale)?;
        positive("physics.skin_width", physics.skin_width)?;
        unit("physics.min_ground_normal_y", physics.min_ground_normal_y)?;
        unit("physics.wall_normal_threshold", physics.wall_normal_threshold)?;
        if let WallDetection::Raycast { distance } = physics.wall_detection {
            positive("physics.wall_detection.distance", distance)?;
        }

        positive("body.width", self.body.width)?;
        positive("body.height", self.body.height)?;
        if self.physics.skin_width * 2.0 >= self.body.width.min(self.body.height) {
            return Err(invalid("physics.skin_width", "too large for the body size"));
        }

        if !(0.0..1.0).contains(&self.input.axis_deadzone) {
            return Err(invalid("input.axis_deadzone", "must lie in [0, 1)"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and >= 0, got {value}")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and > 0, got {value}")))
    }
}

fn open_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in (0, 1), got {value}")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in (0, 1], got {value}")))
    }
}
