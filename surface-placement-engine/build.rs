// build.rs
use std::{env, fs, path::PathBuf};

/// Seeds `assets/interaction.config.json` with the shipped tuning when none exists.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=assets/interaction.config.json");

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let assets_dir = PathBuf::from(manifest_dir).join("assets");
    let config_path = assets_dir.join("interaction.config.json");
    if config_path.exists() {
        return;
    }

    let default_config = serde_json::json!({
        "auto_place": false,
        "default_scale": 0.3,
        "min_scale": 0.05,
        "max_scale": 2.0,
        "tap_distance_px": 10.0,
        "mode_distance_threshold_px": 10.0,
        "mode_angle_threshold_rad": 0.1,
        "scale_dominance_factor": 100.0,
        "pinch_distance_epsilon": 1.0
    });

    let written = fs::create_dir_all(&assets_dir)
        .and_then(|_| {
            serde_json::to_string_pretty(&default_config)
                .map_err(std::io::Error::other)
        })
        .and_then(|json| fs::write(&config_path, json));

    match written {
        Ok(()) => println!("cargo:warning=Generated default assets/interaction.config.json"),
        Err(e) => println!("cargo:warning=Could not write interaction config: {}", e),
    }
}
