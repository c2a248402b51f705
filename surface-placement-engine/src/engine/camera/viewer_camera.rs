use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;
use constants::render_settings::VIEWER_EYE_HEIGHT;

/// Pose of the handheld viewer.
///
/// On a phone the platform drives this from device tracking; on desktop the keyboard and
/// right mouse button walk it around so the hit test has something to sweep.
#[derive(Resource)]
pub struct ViewerRig {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub walk_speed: f32,
}

impl Default for ViewerRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, VIEWER_EYE_HEIGHT, 0.0),
            pitch: -0.6,
            yaw: 0.0,
            walk_speed: 1.5,
        }
    }
}

impl ViewerRig {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.rotation(),
            ..default()
        }
    }
}

pub fn spawn_viewer_camera(commands: &mut Commands) {
    let rig = ViewerRig::default();
    commands.spawn((Camera3d::default(), rig.transform()));
    commands.insert_resource(rig);
}

pub fn viewer_camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut rig: ResMut<ViewerRig>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Right drag looks around
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        rig.yaw += -mouse_delta.x * yaw_sens;
        rig.pitch += -mouse_delta.y * pitch_sens;
        rig.pitch = rig.pitch.clamp(-1.55, 1.55);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; } // Up
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; } // Down

    if move_input != Vec3::ZERO {
        // Walk on the horizontal plane regardless of pitch
        let heading = Quat::from_rotation_y(rig.yaw);
        let back = heading * Vec3::Z;
        let right = heading * Vec3::X;

        let mut speed = rig.walk_speed;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) { speed *= 3.0; }

        let world_delta = right * move_input.x + Vec3::Y * move_input.y + back * move_input.z;
        rig.position += world_delta.normalize() * speed * time.delta_secs();
    }

    *camera_transform = rig.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rig_looks_down_at_the_floor() {
        let rig = ViewerRig::default();
        let forward = rig.rotation() * Vec3::NEG_Z;
        assert!(forward.y < 0.0);
        assert_eq!(rig.transform().translation.y, VIEWER_EYE_HEIGHT);
    }
}
