use bevy::prelude::*;
use constants::render_settings::PLACED_MODEL_SIZE;

use crate::tools::interaction::InteractionEngine;

/// Root of the placed object; its transform is the placement transform.
#[derive(Component)]
pub struct PlacedModel;

pub fn spawn_placed_model(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.55, 0.25),
        perceptual_roughness: 0.6,
        ..default()
    });

    commands
        .spawn((PlacedModel, Transform::default(), Visibility::Hidden))
        .with_children(|parent| {
            // Sit the cube on the surface rather than straddling it.
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::from_length(PLACED_MODEL_SIZE))),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, PLACED_MODEL_SIZE * 0.5, 0.0),
            ));
        });
}

pub fn update_placed_model(
    engine: Res<InteractionEngine>,
    mut models: Query<(&mut Transform, &mut Visibility), With<PlacedModel>>,
) {
    let placement = engine.placement();
    for (mut transform, mut visibility) in &mut models {
        match placement {
            Some(placement) => {
                *transform = placement.transform();
                visibility.set_if_neq(Visibility::Visible);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
