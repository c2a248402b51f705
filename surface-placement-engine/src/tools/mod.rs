//! Interaction tools driving the placed object.
//!
//! A single tool is active for the whole AR session: touch and select input resolve
//! into tap-to-place, one-finger drag, pinch-to-scale and twist-to-rotate on one
//! object. See [`interaction`] for the state machine and its input systems.
//!
//! ## Platform Considerations
//!
//! ### WASM Builds
//! - Screen touches arrive as Bevy touch events; each lifted finger also emits a select
//! - The parent page controls the session over JSON-RPC 2.0
//!
//! ### Native Builds
//! - Left click stands in for a tap select
//! - Enter starts a session, Escape ends it

/// Surface placement with tap, drag, pinch and twist handling.
///
/// One owned engine record fed by hit-test, touch and select events.
pub mod interaction;
