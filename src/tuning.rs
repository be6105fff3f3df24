//! Movement tuning
//!
//! Data-driven feel constants. Missing JSON fields fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or unreadable tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Movement constants shared by every actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Downward acceleration (pixels/s²); fall speed is not capped
    pub gravity: f64,
    /// Player horizontal speed (pixels/s)
    pub move_speed: f64,
    /// Initial upward speed of a jump (pixels/s)
    pub jump_velocity: f64,
    /// Multiplier applied to upward speed when jump is released early
    pub jump_cut_factor: f64,
    /// Grace window after leaving a ledge during which a jump still works (s)
    pub coyote_time: f64,
    /// Default ground-patrol walking speed (pixels/s)
    pub patrol_speed: f64,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            move_speed: 220.0,
            jump_velocity: 560.0,
            jump_cut_factor: 0.5,
            coyote_time: 0.1,
            patrol_speed: 80.0,
        }
    }
}

impl MovementTuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_velocity", self.jump_velocity),
            ("patrol_speed", self.patrol_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid { field, value });
            }
        }

        if !self.coyote_time.is_finite() || self.coyote_time < 0.0 {
            return Err(TuningError::Invalid {
                field: "coyote_time",
                value: self.coyote_time,
            });
        }
        if !(self.jump_cut_factor > 0.0 && self.jump_cut_factor <= 1.0) {
            return Err(TuningError::Invalid {
                field: "jump_cut_factor",
                value: self.jump_cut_factor,
            });
        }
        Ok(())
    }
}
