//! JSON-RPC 2.0 bridge to the embedding web page.
//!
//! The engine runs in an iframe; the parent page drives the session and listens for
//! placement updates over `postMessage`.
//!
//! ```text
//! Parent page  <──postMessage──>  Bevy (iframe)
//!      │                               │
//!      ├─ Request (with ID) ─────────> │ handle_rpc_request
//!      │ <──────── Response (with ID) ─┤
//!      │ <──── Notification (no ID) ───┤ InteractionSignal
//! ```
//!
//! ## Methods
//! - `start_session`, `end_session`: enter or leave the AR session
//! - `set_auto_place { enabled }`: place on the first tracked surface of a session
//! - `get_placement`: current placement transform or `null`
//! - `get_tracking`: tracking flag and reticle visibility
//! - `get_config`: active interaction tuning values
//!
//! ## Notifications
//! - `tracking_changed { tracking }`
//! - `placement_changed { position, orientation, scale, rotation_y, cause }`
//! - `placement_cleared`
//! - `session_ended`
//!
//! Errors use the standard codes: `-32600` invalid request, `-32601` method not found,
//! `-32602` invalid params, `-32603` internal error. Outside wasm, sending is a no-op.

pub mod web_rpc;
