use bevy::prelude::*;

use crate::engine::core::app_state::{ArSessionState, SessionRequest};
use crate::tools::interaction::InteractionEngine;
use crate::tools::interaction::input::TouchExclusionZones;

#[derive(Component)]
pub struct StartPrompt;

#[derive(Component)]
pub struct TrackingGuide;

/// On-screen control leaving the session, shown while it is active.
#[derive(Component)]
pub struct EndSessionButton;

#[cfg(target_arch = "wasm32")]
const START_TEXT: &str = "Tap to start AR";
#[cfg(not(target_arch = "wasm32"))]
const START_TEXT: &str = "Click or press Enter to start AR";

const GUIDE_TEXT: &str = "Move your device to find a surface";

pub fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::End,
            padding: UiRect::bottom(Val::Px(48.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((overlay_text(START_TEXT), StartPrompt, Visibility::Visible));
            parent.spawn((overlay_text(GUIDE_TEXT), TrackingGuide, Visibility::Hidden));
            parent
                .spawn((
                    Button,
                    EndSessionButton,
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(16.0),
                        right: Val::Px(16.0),
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    Visibility::Hidden,
                ))
                .with_child((
                    Text::new("Exit AR"),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
        });
}

pub fn handle_end_session_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<EndSessionButton>)>,
    mut requests: EventWriter<SessionRequest>,
) {
    if buttons.iter().any(|interaction| *interaction == Interaction::Pressed) {
        requests.write(SessionRequest::End);
    }
}

/// Publishes the screen rects of visible controls so their touches skip the engine.
pub fn update_touch_exclusions(
    buttons: Query<(&ComputedNode, &GlobalTransform, &Visibility), With<EndSessionButton>>,
    mut exclusions: ResMut<TouchExclusionZones>,
) {
    exclusions.zones = buttons
        .iter()
        .filter(|(_, _, visibility)| **visibility != Visibility::Hidden)
        .map(|(node, transform, _)| control_rect(node, transform))
        .collect();
}

// UI layout is in physical pixels; touches arrive in logical ones.
fn control_rect(node: &ComputedNode, transform: &GlobalTransform) -> Rect {
    let scale = node.inverse_scale_factor();
    Rect::from_center_size(
        transform.translation().truncate() * scale,
        node.size() * scale,
    )
}

fn overlay_text(text: &'static str) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
            ..default()
        },
    )
}

pub fn update_overlay(
    state: Res<State<ArSessionState>>,
    engine: Res<InteractionEngine>,
    mut prompts: Query<&mut Visibility, (With<StartPrompt>, Without<TrackingGuide>)>,
    mut guides: Query<&mut Visibility, (With<TrackingGuide>, Without<StartPrompt>)>,
    mut end_buttons: Query<
        &mut Visibility,
        (With<EndSessionButton>, Without<StartPrompt>, Without<TrackingGuide>),
    >,
) {
    let active = *state.get() == ArSessionState::Active;
    let visible = |show: bool| {
        if show {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        }
    };

    for mut visibility in &mut prompts {
        visibility.set_if_neq(visible(!active));
    }
    for mut visibility in &mut guides {
        visibility.set_if_neq(visible(active && !engine.is_tracking()));
    }
    for mut visibility in &mut end_buttons {
        visibility.set_if_neq(visible(active));
    }
}
