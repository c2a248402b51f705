/// Reticle ring inner radius (metres).
pub const RETICLE_INNER_RADIUS: f32 = 0.04;

/// Reticle ring outer radius (metres).
pub const RETICLE_OUTER_RADIUS: f32 = 0.06;

/// Reticle opacity.
pub const RETICLE_ALPHA: f32 = 0.8;

/// Edge length of the placeholder cube standing in for the placed model at scale 1.
pub const PLACED_MODEL_SIZE: f32 = 0.5;

/// Height of the simulated floor the viewer hit test casts against.
pub const SIMULATED_FLOOR_HEIGHT: f32 = 0.0;

/// Simulated hits further than this from the viewer count as no surface found.
pub const HIT_TEST_MAX_DISTANCE: f32 = 8.0;

/// Eye height of the viewer camera above the simulated floor.
pub const VIEWER_EYE_HEIGHT: f32 = 1.4;
