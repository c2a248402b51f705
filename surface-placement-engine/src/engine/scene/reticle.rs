use bevy::prelude::*;
use constants::render_settings::{RETICLE_ALPHA, RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS};
use std::f32::consts::FRAC_PI_2;

use crate::tools::interaction::{InteractionEngine, SurfacePose};

#[derive(Component)]
pub struct Reticle;

pub fn spawn_reticle(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, RETICLE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Reticle,
        Mesh3d(meshes.add(Annulus::new(RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS))),
        MeshMaterial3d(material),
        Transform::default(),
        Visibility::Hidden,
    ));
}

/// The annulus mesh lies in XY; lay it onto the surface plane.
pub fn reticle_transform(pose: SurfacePose) -> Transform {
    Transform {
        translation: pose.position,
        rotation: pose.orientation * Quat::from_rotation_x(-FRAC_PI_2),
        ..default()
    }
}

pub fn update_reticle(
    engine: Res<InteractionEngine>,
    mut reticles: Query<(&mut Transform, &mut Visibility), With<Reticle>>,
) {
    let pose = engine.reticle_pose();
    for (mut transform, mut visibility) in &mut reticles {
        match pose {
            Some(pose) => {
                *transform = reticle_transform(pose);
                visibility.set_if_neq(Visibility::Visible);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reticle_lies_flat_on_an_upright_surface() {
        let transform = reticle_transform(SurfacePose {
            position: Vec3::new(0.5, 0.0, -1.0),
            orientation: Quat::IDENTITY,
        });
        assert_eq!(transform.translation, Vec3::new(0.5, 0.0, -1.0));
        // Ring normal (+Z in mesh space) must point up.
        let normal = transform.rotation * Vec3::Z;
        assert!(normal.distance(Vec3::Y) < 1e-5);
    }
}
