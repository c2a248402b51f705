/// Scale applied to a freshly placed object.
pub const DEFAULT_SCALE: f32 = 0.3;

/// Lower bound for pinch scaling.
pub const MIN_SCALE: f32 = 0.05;

/// Upper bound for pinch scaling.
pub const MAX_SCALE: f32 = 2.0;

/// Single-finger movement (pixels) before a touch becomes a drag.
pub const TAP_DISTANCE_PX: f32 = 10.0;

/// Change in finger separation (pixels) that resolves a two-finger gesture.
pub const GESTURE_DISTANCE_THRESHOLD_PX: f32 = 10.0;

/// Change in finger angle (radians, ~5.7deg) that resolves a two-finger gesture.
pub const GESTURE_ANGLE_THRESHOLD_RAD: f32 = 0.1;

/// Pixels of separation change weighed against one radian of twist when picking a mode.
/// `distance_delta > angle_delta * SCALE_DOMINANCE_FACTOR` resolves to scale.
pub const SCALE_DOMINANCE_FACTOR: f32 = 100.0;

/// Smallest initial finger separation used as a pinch ratio denominator.
pub const PINCH_DISTANCE_EPSILON: f32 = 1.0;

/// Selects swallowed after a committed single-finger drag.
pub const DRAG_RELEASE_SELECTS: u32 = 1;

/// Selects swallowed after a two-finger gesture (each lifted finger can emit one).
pub const GESTURE_RELEASE_SELECTS: u32 = 2;

/// Auto-place on the first surface hit of a session.
pub const DEFAULT_AUTO_PLACE: bool = false;
