use bevy::prelude::*;

use super::config::{ConfigError, InteractionConfig};
use super::gestures::{GestureAction, GestureMode, TouchGestureClassifier, TouchPoint};
use super::hit_tracker::{HitSample, HitSampleTracker, SurfacePose, TrackingEvent};
use super::placement::{Placement, PlacementCause, PlacementStateMachine};
use super::projector::ViewSnapshot;
use super::select_gate::SelectGate;

/// Everything the host feeds into the engine.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// First hit-test result of this render tick, if any.
    HitTest(Option<HitSample>),
    TouchStart { touches: Vec<TouchPoint>, timestamp_ms: f64 },
    TouchMove { touches: Vec<TouchPoint> },
    /// `touches` holds the contacts still down.
    TouchEnd { touches: Vec<TouchPoint>, timestamp_ms: f64 },
    /// Platform "user confirmed" signal; a tap or a gesture-release artifact.
    Select,
    SessionEnded,
}

/// What changed as a result of a dispatched event.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum InteractionSignal {
    TrackingChanged(bool),
    PlacementChanged {
        placement: Placement,
        cause: PlacementCause,
    },
    PlacementCleared,
    SessionReset,
}

/// Single owned record of all interaction state.
///
/// Every event source calls `dispatch`, and each call leaves the record consistent
/// before it returns, so the order render ticks and touch callbacks arrive in
/// does not matter.
#[derive(Resource, Debug, Clone, Default)]
pub struct InteractionEngine {
    config: InteractionConfig,
    tracker: HitSampleTracker,
    gate: SelectGate,
    classifier: TouchGestureClassifier,
    placement: PlacementStateMachine,
    view: Option<ViewSnapshot>,
    /// Auto-place set at runtime; survives later config reloads.
    auto_place_override: Option<bool>,
}

impl InteractionEngine {
    pub fn new(config: InteractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..default()
        })
    }

    pub fn dispatch(&mut self, event: InteractionEvent) -> Vec<InteractionSignal> {
        let mut signals = Vec::new();
        match event {
            InteractionEvent::HitTest(sample) => self.on_hit_test(sample, &mut signals),
            InteractionEvent::TouchStart {
                touches,
                timestamp_ms,
            } => {
                self.classifier.touch_start(
                    &touches,
                    timestamp_ms,
                    self.placement.placement(),
                    &self.config,
                );
            }
            InteractionEvent::TouchMove { touches } => {
                if let Some(action) =
                    self.classifier
                        .touch_move(&touches, self.view.as_ref(), &self.config)
                {
                    self.apply(action, &mut signals);
                }
            }
            InteractionEvent::TouchEnd {
                touches,
                timestamp_ms,
            } => {
                for action in self.classifier.touch_end(&touches, timestamp_ms) {
                    self.apply(action, &mut signals);
                }
            }
            InteractionEvent::Select => {
                if let Some(command) = self.gate.on_select(self.tracker.current_surface()) {
                    let placement = self.placement.place(command, self.config.default_scale);
                    signals.push(InteractionSignal::PlacementChanged {
                        placement,
                        cause: PlacementCause::Tap,
                    });
                }
            }
            InteractionEvent::SessionEnded => self.reset_session(&mut signals),
        }
        signals
    }

    fn on_hit_test(&mut self, sample: Option<HitSample>, signals: &mut Vec<InteractionSignal>) {
        let placed = self.placement.is_placed();
        match self.tracker.ingest(sample, self.config.auto_place, placed) {
            Some(TrackingEvent::Started { auto_place }) => {
                info!("Surface tracking started");
                signals.push(InteractionSignal::TrackingChanged(true));
                if let Some(pose) = auto_place {
                    let placement = self.placement.auto_place(pose, self.config.default_scale);
                    signals.push(InteractionSignal::PlacementChanged {
                        placement,
                        cause: PlacementCause::AutoPlace,
                    });
                }
            }
            Some(TrackingEvent::Lost) => {
                info!("Surface tracking lost");
                signals.push(InteractionSignal::TrackingChanged(false));
            }
            None => {}
        }
    }

    fn apply(&mut self, action: GestureAction, signals: &mut Vec<InteractionSignal>) {
        let (changed, cause) = match action {
            GestureAction::DragTo { x, z } => (self.placement.drag_to(x, z), PlacementCause::Drag),
            GestureAction::CommitDrag => (self.placement.commit_drag(), PlacementCause::DragCommit),
            GestureAction::Scale(scale) => (
                self.placement
                    .set_scale(scale, self.config.min_scale, self.config.max_scale),
                PlacementCause::Scale,
            ),
            GestureAction::Rotate(rotation_y) => {
                (self.placement.set_rotation_y(rotation_y), PlacementCause::Rotate)
            }
            GestureAction::SuppressSelects(count) => {
                self.gate.suppress_next(count);
                debug!("Suppressing next {} select(s)", self.gate.pending());
                return;
            }
        };

        if let Some(placement) = changed {
            signals.push(InteractionSignal::PlacementChanged { placement, cause });
        }
    }

    /// Discards everything mid-flight; nothing is drained.
    fn reset_session(&mut self, signals: &mut Vec<InteractionSignal>) {
        let was_tracking = self.tracker.is_tracking();
        let was_placed = self.placement.is_placed();

        self.placement.reset();
        self.tracker.reset();
        self.gate.reset();
        self.classifier.reset();

        if was_tracking {
            signals.push(InteractionSignal::TrackingChanged(false));
        }
        if was_placed {
            signals.push(InteractionSignal::PlacementCleared);
        }
        signals.push(InteractionSignal::SessionReset);
        info!("Interaction session reset");
    }

    /// Replaces the tuning; in-flight gesture sessions keep their captured start values.
    ///
    /// A runtime `set_auto_place` wins over the file's `auto_place`.
    pub fn configure(&mut self, mut config: InteractionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(enabled) = self.auto_place_override {
            config.auto_place = enabled;
        }
        self.config = config;
        Ok(())
    }

    pub fn set_auto_place(&mut self, enabled: bool) {
        self.auto_place_override = Some(enabled);
        self.config.auto_place = enabled;
    }

    pub fn set_view(&mut self, view: Option<ViewSnapshot>) {
        self.view = view;
    }

    pub fn view(&self) -> Option<&ViewSnapshot> {
        self.view.as_ref()
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.placement()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    pub fn reticle_visible(&self) -> bool {
        self.tracker.reticle_visible(self.placement.is_placed())
    }

    /// Pose for the reticle while it is visible.
    pub fn reticle_pose(&self) -> Option<SurfacePose> {
        if self.reticle_visible() {
            self.tracker.current_surface()
        } else {
            None
        }
    }

    pub fn pending_suppressions(&self) -> u32 {
        self.gate.pending()
    }

    pub fn gesture_mode(&self) -> Option<GestureMode> {
        self.classifier.gesture_mode()
    }

    pub fn is_dragging(&self) -> bool {
        self.classifier.is_dragging()
    }
}
