//! Touch and hit-test interaction for placing one object on a detected surface.
//!
//! Turns the per-frame hit-test stream, raw multi-touch contacts and the platform
//! select signal into a single placement transform (position, orientation, uniform
//! scale, yaw).
//!
//! ## Architecture
//!
//! All state lives in one [`InteractionEngine`] resource with a single
//! [`InteractionEngine::dispatch`] entry point. Bevy systems translate host input into
//! [`InteractionEvent`]s and forward the returned [`InteractionSignal`]s as events.
//!
//! ```text
//! hit test ──> HitSampleTracker ──┐
//!                                 ├──> PlacementStateMachine ──> Placement
//! select ────> SelectGate ────────┤
//!                                 │
//! touches ───> TouchGestureClassifier (drag / pinch / twist)
//!                    └─> GroundProjector (drag only)
//! ```
//!
//! ### Placement states
//! - `Searching`: no placement, reticle shown while a surface is tracked
//! - `Placed`: placement exists, reticle hidden
//!
//! A session end resets everything back to `Searching`, including the auto-place
//! one-shot and any pending select suppression.
//!
//! ### Touch disambiguation
//! - One finger on a placed object drags it once it travels past the tap distance
//! - Two fingers start undecided and lock to scale or rotate on the first decisive motion
//! - Releasing a drag swallows the next select, releasing two fingers the next two

/// Tuning values, validation and the JSON config loader.
pub mod config;

/// The owned interaction record and its `dispatch` entry point.
pub mod engine;

/// Drag, pinch and twist classification over raw touch contact lists.
pub mod gestures;

/// Hit-sample tracking, surface pose cache and auto-place one-shot.
pub mod hit_tracker;

/// Bevy systems feeding touch, select and camera input into the engine.
pub mod input;

/// Searching/Placed state machine and the placement transform.
pub mod placement;

/// Screen-to-ground ray projection.
pub mod projector;

/// Select suppression after gesture releases.
pub mod select_gate;

use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

pub use config::{ConfigError, InteractionConfig};
pub use engine::{InteractionEngine, InteractionEvent, InteractionSignal};
pub use gestures::{GestureMode, TouchPoint};
pub use hit_tracker::{HitSample, SurfacePose};
pub use placement::{Placement, PlacementCause, PlacementState};
pub use projector::ViewSnapshot;

use config::{InteractionConfigLoader, load_interaction_config};
use input::{
    ActiveTouches, PlatformSelect, TouchExclusionZones, collect_touch_input,
    route_select_signals, sync_view_snapshot,
};

use crate::engine::core::app_state::ArSessionState;

/// System ordering inside a frame: camera first, then touches, then selects.
///
/// Session requests are handled after `Select`, so a frame's input always lands in the
/// session it arrived in.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    View,
    Input,
    Select,
}

// Registers the interaction engine, its input systems and the config loader.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<InteractionConfig>::new(&["config.json"]))
            .init_resource::<InteractionEngine>()
            .init_resource::<InteractionConfigLoader>()
            .init_resource::<ActiveTouches>()
            .init_resource::<TouchExclusionZones>()
            .add_event::<PlatformSelect>()
            .add_event::<InteractionSignal>()
            .configure_sets(
                Update,
                (InteractionSet::View, InteractionSet::Input, InteractionSet::Select)
                    .chain()
                    .run_if(in_state(ArSessionState::Active)),
            )
            .add_systems(Update, load_interaction_config)
            .add_systems(Update, sync_view_snapshot.in_set(InteractionSet::View))
            .add_systems(
                Update,
                collect_touch_input
                    .after(InteractionSet::View)
                    .before(InteractionSet::Select),
            )
            .add_systems(Update, route_select_signals.in_set(InteractionSet::Select));

        // Desktop builds have no screen input; a left click stands in for a tap.
        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Update, input::emit_mouse_select.in_set(InteractionSet::Input));
    }
}
