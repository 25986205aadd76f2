//! Game balance and tuning values
//!
//! Every number the simulation uses lives here so that the different
//! builds of the game (web, mobile, the early browser prototype) are just
//! presets of one configuration value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("unknown tuning preset `{0}`")]
    UnknownPreset(String),
}

/// Named tuning presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    /// Latest browser build (canonical)
    #[default]
    Web,
    /// Phone build: narrower lane, higher ship row, no opening wave
    Mobile,
    /// First browser prototype: slower bullets, tighter hitboxes
    Classic,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Web => "web",
            TuningPreset::Mobile => "mobile",
            TuningPreset::Classic => "classic",
        }
    }
}

impl fmt::Display for TuningPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TuningPreset {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(TuningPreset::Web),
            "mobile" | "ios" => Ok(TuningPreset::Mobile),
            "classic" => Ok(TuningPreset::Classic),
            _ => Err(TuningError::UnknownPreset(s.to_string())),
        }
    }
}

/// Simulation tuning
///
/// Per-tick distances (`*_step`) are expressed for a nominal frame of
/// [`crate::consts::NOMINAL_DT`] seconds and scaled by the actual frame delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player x is clamped to [-player_bound, player_bound]
    pub player_bound: f32,
    /// Fixed row the player ship flies on
    pub player_y: f32,
    /// Horizontal distance per nominal tick while a direction is held
    pub player_step: f32,
    /// Half-width that a normalized pointer position maps onto
    pub pointer_span: f32,

    // === Bullets ===
    /// Rise per nominal tick
    pub bullet_step: f32,
    /// Bullets spawn this far above the ship
    pub bullet_spawn_offset: f32,
    /// Muzzle jitter half-width
    pub bullet_jitter: f32,
    /// Bullets above this y are removed
    pub bullet_ceiling: f32,
    /// Fail-safe lifetime in seconds
    pub bullet_max_age: f32,

    // === Enemies ===
    /// Fall per nominal tick
    pub enemy_step: f32,
    /// Row that waves spawn on
    pub enemy_spawn_y: f32,
    /// Enemies below this y have escaped and are removed
    pub enemy_floor: f32,

    // === Waves ===
    /// Spawn x is drawn from [-spawn_half_width, spawn_half_width)
    pub spawn_half_width: f32,
    /// Preferred minimum x distance between enemies of one wave
    pub min_spacing: f32,
    /// Rejection sampling gives up after this many draws
    pub max_spacing_attempts: u32,
    pub wave_min: u32,
    pub wave_max: u32,
    /// Seconds between waves
    pub wave_period: f32,
    /// Spawn one wave as soon as a run starts
    pub spawn_on_start: bool,

    // === Collision ===
    pub hit_radius: f32,
    pub player_hit_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_bound: 9.0,
            player_y: -10.0,
            player_step: 0.15,
            pointer_span: 10.0,

            bullet_step: 0.35,
            bullet_spawn_offset: 1.0,
            bullet_jitter: 0.1,
            bullet_ceiling: 20.0,
            bullet_max_age: 3.0,

            enemy_step: 0.03,
            enemy_spawn_y: 12.0,
            enemy_floor: -12.0,

            spawn_half_width: 10.0,
            min_spacing: 2.0,
            max_spacing_attempts: 25,
            wave_min: 1,
            wave_max: 3,
            wave_period: 5.0,
            spawn_on_start: true,

            hit_radius: 0.6,
            player_hit_radius: 0.8,
        }
    }
}

impl Tuning {
    /// Build tuning for a named preset
    pub fn from_preset(preset: TuningPreset) -> Self {
        match preset {
            TuningPreset::Web => Self::default(),
            TuningPreset::Mobile => Self {
                player_bound: 5.0,
                player_y: -8.0,
                enemy_floor: -10.0,
                spawn_on_start: false,
                ..Self::default()
            },
            TuningPreset::Classic => Self {
                player_step: 0.2,
                bullet_step: 0.2,
                bullet_ceiling: 15.0,
                enemy_step: 0.01,
                hit_radius: 0.5,
                ..Self::default()
            },
        }
    }

    /// Parse tuning from JSON. Missing fields keep their canonical value.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("player_bound", self.player_bound)?;
        positive("player_step", self.player_step)?;
        positive("pointer_span", self.pointer_span)?;
        positive("bullet_step", self.bullet_step)?;
        positive("bullet_max_age", self.bullet_max_age)?;
        positive("enemy_step", self.enemy_step)?;
        positive("spawn_half_width", self.spawn_half_width)?;
        positive("min_spacing", self.min_spacing)?;
        positive("wave_period", self.wave_period)?;
        positive("hit_radius", self.hit_radius)?;
        positive("player_hit_radius", self.player_hit_radius)?;

        if !self.bullet_jitter.is_finite() || self.bullet_jitter < 0.0 {
            return Err(TuningError::Invalid {
                field: "bullet_jitter",
                reason: "must be zero or positive",
            });
        }
        if self.wave_min == 0 {
            return Err(TuningError::Invalid {
                field: "wave_min",
                reason: "a wave needs at least one enemy",
            });
        }
        if self.wave_min > self.wave_max {
            return Err(TuningError::Invalid {
                field: "wave_max",
                reason: "must not be below wave_min",
            });
        }
        if self.max_spacing_attempts == 0 {
            return Err(TuningError::Invalid {
                field: "max_spacing_attempts",
                reason: "must allow at least one draw",
            });
        }
        if !(self.bullet_ceiling > self.player_y + self.bullet_spawn_offset) {
            return Err(TuningError::Invalid {
                field: "bullet_ceiling",
                reason: "must be above the bullet spawn row",
            });
        }
        if !(self.enemy_floor < self.enemy_spawn_y) {
            return Err(TuningError::Invalid {
                field: "enemy_floor",
                reason: "must be below the enemy spawn row",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in [TuningPreset::Web, TuningPreset::Mobile, TuningPreset::Classic] {
            assert!(Tuning::from_preset(preset).validate().is_ok(), "{preset}");
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Web".parse::<TuningPreset>().unwrap(), TuningPreset::Web);
        assert_eq!("ios".parse::<TuningPreset>().unwrap(), TuningPreset::Mobile);
        assert_eq!(" classic ".parse::<TuningPreset>().unwrap(), TuningPreset::Classic);
        assert!(matches!(
            "arcade".parse::<TuningPreset>(),
            Err(TuningError::UnknownPreset(name)) if name == "arcade"
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_step": 0.05, "wave_max": 4 }"#).unwrap();
        assert_eq!(tuning.enemy_step, 0.05);
        assert_eq!(tuning.wave_max, 4);
        assert_eq!(tuning.player_bound, Tuning::default().player_bound);
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        let err = Tuning::from_json(r#"{ "wave_min": 4, "wave_max": 2 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "wave_max", .. }));

        let err = Tuning::from_json(r#"{ "hit_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "hit_radius", .. }));

        let err = Tuning::from_json(r#"{ "enemy_floor": 30.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "enemy_floor", .. }));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_mobile_preset_differences() {
        let mobile = Tuning::from_preset(TuningPreset::Mobile);
        assert_eq!(mobile.player_bound, 5.0);
        assert_eq!(mobile.player_y, -8.0);
        assert_eq!(mobile.enemy_floor, -10.0);
        assert!(!mobile.spawn_on_start);
        assert_eq!(mobile.bullet_step, Tuning::default().bullet_step);
    }
}
