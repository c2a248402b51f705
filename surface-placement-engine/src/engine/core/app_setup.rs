use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;

use crate::engine::camera::viewer_camera::{spawn_viewer_camera, viewer_camera_controller};
use crate::engine::core::app_state::SessionPlugin;
use crate::engine::core::window_config::create_window_config;
use crate::engine::hit_test::HitTestPlugin;
use crate::engine::scene::SceneSyncPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::interaction::InteractionPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(SessionPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(HitTestPlugin)
        .add_plugins(SceneSyncPlugin)
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.11)))
        .add_systems(Startup, setup)
        .add_systems(Update, viewer_camera_controller);

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_viewer_camera(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
