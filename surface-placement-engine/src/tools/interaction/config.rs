use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::interaction::{
    DEFAULT_AUTO_PLACE, DEFAULT_SCALE, GESTURE_ANGLE_THRESHOLD_RAD, GESTURE_DISTANCE_THRESHOLD_PX,
    MAX_SCALE, MIN_SCALE, PINCH_DISTANCE_EPSILON, SCALE_DOMINANCE_FACTOR, TAP_DISTANCE_PX,
};
use serde::{Deserialize, Serialize};

use super::engine::InteractionEngine;

/// Tuning for tap, drag and two-finger gesture handling.
///
/// Loaded from `interaction.config.json`; missing fields fall back to the shared constants.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Place automatically on the first surface hit of a session.
    pub auto_place: bool,
    pub default_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Single-finger travel (px) before a touch becomes a drag.
    pub tap_distance_px: f32,
    /// Finger separation change (px) that resolves an undecided two-finger gesture.
    pub mode_distance_threshold_px: f32,
    /// Finger angle change (rad) that resolves an undecided two-finger gesture.
    pub mode_angle_threshold_rad: f32,
    /// Pixels of separation change weighed against one radian of twist.
    pub scale_dominance_factor: f32,
    /// Floor for the initial pinch separation used as a ratio denominator.
    pub pinch_distance_epsilon: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            auto_place: DEFAULT_AUTO_PLACE,
            default_scale: DEFAULT_SCALE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            tap_distance_px: TAP_DISTANCE_PX,
            mode_distance_threshold_px: GESTURE_DISTANCE_THRESHOLD_PX,
            mode_angle_threshold_rad: GESTURE_ANGLE_THRESHOLD_RAD,
            scale_dominance_factor: SCALE_DOMINANCE_FACTOR,
            pinch_distance_epsilon: PINCH_DISTANCE_EPSILON,
        }
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("default_scale", self.default_scale),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("tap_distance_px", self.tap_distance_px),
            ("mode_distance_threshold_px", self.mode_distance_threshold_px),
            ("mode_angle_threshold_rad", self.mode_angle_threshold_rad),
            ("scale_dominance_factor", self.scale_dominance_factor),
            ("pinch_distance_epsilon", self.pinch_distance_epsilon),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive(field));
            }
        }

        if self.min_scale > self.max_scale {
            return Err(ConfigError::InvertedScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !(self.min_scale..=self.max_scale).contains(&self.default_scale) {
            return Err(ConfigError::DefaultScaleOutOfBounds {
                scale: self.default_scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        Ok(())
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Reasons a loaded configuration is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonFinite(&'static str),
    NonPositive(&'static str),
    InvertedScaleBounds { min: f32, max: f32 },
    DefaultScaleOutOfBounds { scale: f32, min: f32, max: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonFinite(field) => write!(f, "{} must be a finite number", field),
            ConfigError::NonPositive(field) => write!(f, "{} must be greater than zero", field),
            ConfigError::InvertedScaleBounds { min, max } => {
                write!(f, "min_scale {} is greater than max_scale {}", min, max)
            }
            ConfigError::DefaultScaleOutOfBounds { scale, min, max } => {
                write!(f, "default_scale {} is outside [{}, {}]", scale, min, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Asset path of the interaction tuning file, relative to the asset root.
pub const INTERACTION_CONFIG_PATH: &str = "interaction.config.json";

#[derive(Resource, Default)]
pub struct InteractionConfigLoader {
    handle: Option<Handle<InteractionConfig>>,
    applied: bool,
}

/// Loads the tuning file once and hands it to the engine if it validates.
pub fn load_interaction_config(
    mut loader: ResMut<InteractionConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<InteractionConfig>>,
    mut engine: ResMut<InteractionEngine>,
) {
    let Some(handle) = loader.handle.clone() else {
        info!("Loading interaction config from: {}", INTERACTION_CONFIG_PATH);
        loader.handle = Some(asset_server.load(INTERACTION_CONFIG_PATH));
        return;
    };
    if loader.applied {
        return;
    }
    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle.id()) {
        loader.applied = true;
        warn!("Interaction config unavailable, keeping defaults: {}", error);
        return;
    }
    let Some(config) = configs.get(&handle) else {
        return;
    };

    loader.applied = true;
    match engine.configure(config.clone()) {
        Ok(()) => info!("Interaction config applied (auto_place: {})", config.auto_place),
        Err(e) => warn!("Ignoring interaction config, keeping defaults: {}", e),
    }
}
