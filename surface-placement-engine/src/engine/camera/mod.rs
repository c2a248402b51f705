//! Viewer camera standing in for the handheld device pose.
//!
//! Provides keyboard/mouse walking on desktop so the viewer-centre hit test can sweep
//! the simulated floor.

/// Viewer rig resource, camera spawning and desktop controller system.
pub mod viewer_camera;
