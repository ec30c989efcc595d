//! World parameters and the live rule configuration shared by all workers.

use std::sync::Arc;

use boid_core::{Boid, CombinationPolicy, RuleConfig, Vector2D};
use boid_shared::{RuleSettings, SettingsUpdate, TargetPositionUpdate};
use parking_lot::RwLock;

use crate::error::{Result, WorldError};

/// What happens when an agent crosses the world edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Leaving one edge re-enters from the opposite one
    #[default]
    Toroidal,
    /// No boundary at all
    Unbounded,
}

/// Fixed at construction, never changed afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldParams {
    pub width: f64,
    pub height: f64,
    pub boundary: Boundary,
}

impl WorldParams {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            boundary: Boundary::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(WorldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Position update under this world's boundary policy.
    pub fn integrate(&self, boid: &mut Boid) {
        match self.boundary {
            Boundary::Toroidal => boid.integrate_wrapped(self.width, self.height),
            Boundary::Unbounded => boid.integrate_free(),
        }
    }
}

/// Copies the settings that are present onto a rule config. Absent fields,
/// the goal point and the combination policy are kept; `max_speed` only
/// matters under clamping.
pub fn merge_settings(config: &mut RuleConfig, settings: &RuleSettings) {
    let fields = [
        (&mut config.cohesion_weight, settings.cohesion_weight),
        (&mut config.separation_weight, settings.separation_weight),
        (&mut config.alignment_weight, settings.alignment_weight),
        (&mut config.perception_radius, settings.perception_radius),
        (&mut config.goal_strength, settings.goal_strength),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }
    if let (CombinationPolicy::Clamp { max_speed }, Some(value)) =
        (&mut config.combination, settings.max_speed)
    {
        *max_speed = value;
    }
}

/// Handle to the rule configuration every worker reads.
///
/// Workers take one copy at the start of each tick, so a change made between
/// two `advance` calls is seen by the next tick and a change made during a
/// tick is seen at the latest one tick later.
#[derive(Debug, Clone, Default)]
pub struct SharedRuleConfig {
    inner: Arc<RwLock<RuleConfig>>,
}

impl SharedRuleConfig {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> RuleConfig {
        *self.inner.read()
    }

    pub fn replace(&self, config: RuleConfig) -> Result<()> {
        config.validate()?;
        *self.inner.write() = config;
        Ok(())
    }

    /// Edits the config in place; the edit is dropped if the result is invalid.
    pub fn update<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut RuleConfig),
    {
        let mut guard = self.inner.write();
        let mut next = *guard;
        edit(&mut next);
        next.validate()?;
        *guard = next;
        Ok(())
    }

    pub fn goal(&self) -> Option<Vector2D> {
        self.inner.read().desire
    }

    pub fn set_goal(&self, goal: Option<Vector2D>) {
        self.inner.write().desire = goal;
    }

    pub fn apply_settings(&self, update: &SettingsUpdate) -> Result<()> {
        self.update(|config| merge_settings(config, &update.settings))
    }

    pub fn apply_target(&self, update: &TargetPositionUpdate) {
        self.set_goal(update.position.map(|p| Vector2D::new(p.x, p.y)));
    }
}
