//! Scene entities mirroring interaction state.
//!
//! Nothing here owns state. Each frame the reticle, placed model stand-in and guide
//! overlay read the [`InteractionEngine`](crate::tools::interaction::InteractionEngine)
//! and update their transforms and visibility to match.

/// Guidance text and the exit control.
pub mod overlay;

/// Stand-in mesh following the current placement transform.
pub mod placed_model;

/// Flat ring marking the tracked surface while nothing is placed.
pub mod reticle;

use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub struct SceneSyncPlugin;

impl Plugin for SceneSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                reticle::spawn_reticle,
                placed_model::spawn_placed_model,
                overlay::spawn_overlay,
            ),
        )
        .add_systems(
            PostUpdate,
            (
                reticle::update_reticle,
                placed_model::update_placed_model,
                overlay::update_overlay,
            )
                .before(TransformSystem::TransformPropagate),
        )
        .add_systems(
            PostUpdate,
            overlay::update_touch_exclusions.after(TransformSystem::TransformPropagate),
        )
        .add_systems(Update, overlay::handle_end_session_button);
    }
}
