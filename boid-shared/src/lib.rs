#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Positions of every agent after one tick, ordered by agent id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub positions: Vec<Position>,
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    /// One line of JSON, suitable for newline-delimited output
    pub fn to_json(&self) -> serde_json::Result<alloc::string::String> {
        serde_json::to_string(self)
    }
}

/// Moves or clears the shared goal point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPositionUpdate {
    /// Optional target position (None means no target/free flying)
    pub position: Option<Position>,
}

/// Tunable rule parameters.
///
/// Every field is optional; only the ones present are applied, so a partial
/// update leaves the rest of the active rule set alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohesion_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separation_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perception_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_strength: Option<f64>,
    /// Ignored unless the rules clamp velocity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
}

/// Settings update applied to a running simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub settings: RuleSettings,
}

/// Simulation status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub tick: u64,
    pub boid_count: usize,
    pub goal_active: bool,
}
