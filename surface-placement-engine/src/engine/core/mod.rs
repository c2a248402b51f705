//! Core application setup and session state.
//!
//! Handles application lifecycle, window configuration, AR session transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the interaction engine, scene sync, hit testing and RPC.
pub mod app_setup;

/// AR session state machine and session request handling.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
