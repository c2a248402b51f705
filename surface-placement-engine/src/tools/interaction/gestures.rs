use bevy::prelude::*;
use constants::interaction::{DRAG_RELEASE_SELECTS, GESTURE_RELEASE_SELECTS};

use super::config::InteractionConfig;
use super::placement::Placement;
use super::projector::{ViewSnapshot, project_to_ground};

/// One active contact, in client pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Vec2,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Vec2::new(x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureMode {
    Undecided,
    Scale,
    Rotate,
}

/// Two-finger contact, alive from the second finger landing until all fingers lift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub mode: GestureMode,
    pub initial_distance: f32,
    pub initial_scale: f32,
    pub initial_angle: f32,
    pub initial_rotation_y: f32,
}

impl GestureSession {
    fn scale_for(&self, distance: f32, config: &InteractionConfig) -> f32 {
        // Nearly coincident fingers at the start would blow the ratio up.
        let ratio = distance / self.initial_distance.max(config.pinch_distance_epsilon);
        config.clamp_scale(self.initial_scale * ratio)
    }

    fn rotation_for(&self, angle: f32) -> f32 {
        // Inverted so a clockwise twist on screen yaws the object the same way visually.
        self.initial_rotation_y - (angle - self.initial_angle)
    }
}

/// Single-finger contact on a placed object; becomes active past the tap distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub active: bool,
    pub started_at_ms: f64,
    pub start: Vec2,
    /// Height of the plane the finger is projected onto (the object's current height).
    pub anchor_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClassifierState {
    #[default]
    Idle,
    Dragging(DragSession),
    Gesturing(GestureSession),
}

/// Placement mutations requested by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    DragTo { x: f32, z: f32 },
    CommitDrag,
    Scale(f32),
    Rotate(f32),
    SuppressSelects(u32),
}

pub fn pinch_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

pub fn twist_angle(a: Vec2, b: Vec2) -> f32 {
    let delta = b - a;
    delta.y.atan2(delta.x)
}

/// Picks scale or rotate once either threshold is crossed.
///
/// Scale wins unless the twist dominates: `distance_delta > angle_delta * factor`.
pub fn resolve_mode(distance_delta: f32, angle_delta: f32, config: &InteractionConfig) -> GestureMode {
    if distance_delta <= config.mode_distance_threshold_px
        && angle_delta <= config.mode_angle_threshold_rad
    {
        return GestureMode::Undecided;
    }
    if distance_delta > angle_delta * config.scale_dominance_factor {
        GestureMode::Scale
    } else {
        GestureMode::Rotate
    }
}

/// Tells drags, pinches and twists apart from the raw touch stream.
#[derive(Debug, Clone, Default)]
pub struct TouchGestureClassifier {
    state: ClassifierState,
}

impl TouchGestureClassifier {
    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn gesture_mode(&self) -> Option<GestureMode> {
        match self.state {
            ClassifierState::Gesturing(gesture) => Some(gesture.mode),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ClassifierState::Dragging(DragSession { active: true, .. }))
    }

    /// `touches` is every contact currently down, including the new one.
    pub fn touch_start(
        &mut self,
        touches: &[TouchPoint],
        now_ms: f64,
        placement: Option<&Placement>,
        config: &InteractionConfig,
    ) {
        match touches {
            [only] => {
                if self.state != ClassifierState::Idle {
                    return;
                }
                let Some(placement) = placement else {
                    return;
                };
                self.state = ClassifierState::Dragging(DragSession {
                    active: false,
                    started_at_ms: now_ms,
                    start: only.position,
                    anchor_height: placement.position.y,
                });
            }
            [first, second] => {
                if matches!(self.state, ClassifierState::Dragging(_)) {
                    debug!("Second finger landed, drag cancelled");
                }
                let (initial_scale, initial_rotation_y) = placement
                    .map_or((config.default_scale, 0.0), |p| (p.scale, p.rotation_y));
                self.state = ClassifierState::Gesturing(GestureSession {
                    mode: GestureMode::Undecided,
                    initial_distance: pinch_distance(first.position, second.position),
                    initial_scale,
                    initial_angle: twist_angle(first.position, second.position),
                    initial_rotation_y,
                });
            }
            _ => {}
        }
    }

    pub fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        view: Option<&ViewSnapshot>,
        config: &InteractionConfig,
    ) -> Option<GestureAction> {
        match (&mut self.state, touches) {
            (ClassifierState::Dragging(drag), [only]) => {
                if !drag.active && only.position.distance(drag.start) > config.tap_distance_px {
                    drag.active = true;
                    debug!("Drag started");
                }
                if !drag.active {
                    return None;
                }
                let hit = project_to_ground(view?, only.position, drag.anchor_height)?;
                Some(GestureAction::DragTo { x: hit.x, z: hit.z })
            }
            (ClassifierState::Gesturing(gesture), [first, second]) => {
                let distance = pinch_distance(first.position, second.position);
                let angle = twist_angle(first.position, second.position);

                if gesture.mode == GestureMode::Undecided {
                    let distance_delta = (distance - gesture.initial_distance).abs();
                    // Raw difference: a finger pair straddling the ±π seam reads as a ~2π twist.
                    let angle_delta = (angle - gesture.initial_angle).abs();
                    gesture.mode = resolve_mode(distance_delta, angle_delta, config);
                    if gesture.mode != GestureMode::Undecided {
                        info!("Two-finger gesture locked to {:?}", gesture.mode);
                    }
                }

                match gesture.mode {
                    GestureMode::Scale => Some(GestureAction::Scale(gesture.scale_for(distance, config))),
                    GestureMode::Rotate => Some(GestureAction::Rotate(gesture.rotation_for(angle))),
                    GestureMode::Undecided => None,
                }
            }
            _ => None,
        }
    }

    /// `remaining` is the contacts still down after the lift.
    pub fn touch_end(&mut self, remaining: &[TouchPoint], now_ms: f64) -> Vec<GestureAction> {
        if !remaining.is_empty() {
            return Vec::new();
        }

        match std::mem::take(&mut self.state) {
            ClassifierState::Dragging(drag) if drag.active => {
                debug!("Drag released after {:.0}ms", now_ms - drag.started_at_ms);
                vec![
                    GestureAction::CommitDrag,
                    GestureAction::SuppressSelects(DRAG_RELEASE_SELECTS),
                ]
            }
            ClassifierState::Gesturing(_) => {
                vec![GestureAction::SuppressSelects(GESTURE_RELEASE_SELECTS)]
            }
            _ => Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = ClassifierState::Idle;
    }
}
