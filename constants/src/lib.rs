/// Touch, gesture and placement tuning values shared by the engine and its config defaults.
pub mod interaction;

/// Visual sizes for the reticle and placement stand-in.
pub mod render_settings;
