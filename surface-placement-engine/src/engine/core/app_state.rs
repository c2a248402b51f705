use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use crate::tools::interaction::input::ActiveTouches;
use crate::tools::interaction::{
    InteractionEngine, InteractionEvent, InteractionSet, InteractionSignal,
};

/// Lifecycle of the AR session hosting the interaction engine.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ArSessionState {
    #[default]
    Inactive,
    Active,
}

/// Host request to enter or leave the AR session (RPC, keyboard or tap-to-start).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    Start,
    End,
}

/// Registers the session state, its requests and the reset on leaving a session.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ArSessionState>()
            .add_event::<SessionRequest>()
            .add_systems(OnExit(ArSessionState::Active), reset_interaction_session)
            .add_systems(
                Update,
                (start_session_on_tap, handle_session_requests)
                    .chain()
                    .after(InteractionSet::Select),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            session_keyboard_shortcuts.before(handle_session_requests),
        );
    }
}

pub fn handle_session_requests(
    mut requests: EventReader<SessionRequest>,
    state: Res<State<ArSessionState>>,
    mut next_state: ResMut<NextState<ArSessionState>>,
) {
    let mut current = *state.get();
    for request in requests.read() {
        match (request, current) {
            (SessionRequest::Start, ArSessionState::Inactive) => {
                info!("→ Starting AR session");
                current = ArSessionState::Active;
                next_state.set(current);
            }
            (SessionRequest::End, ArSessionState::Active) => {
                info!("→ Ending AR session");
                current = ArSessionState::Inactive;
                next_state.set(current);
            }
            _ => {}
        }
    }
}

// Runs on the state transition, before any Inactive-frame system, so nothing dispatched
// in the session's last frame can outlive the reset.
pub fn reset_interaction_session(
    mut engine: ResMut<InteractionEngine>,
    mut active_touches: ResMut<ActiveTouches>,
    mut signals: EventWriter<InteractionSignal>,
) {
    active_touches.clear();
    signals.write_batch(engine.dispatch(InteractionEvent::SessionEnded));
}

// A tap or click while inactive enters the session. Touches count on lift, and only
// when they also landed while inactive, so lifting the finger that ended a session does
// not start the next one.
pub fn start_session_on_tap(
    mut touches: EventReader<TouchInput>,
    mut pending: Local<Vec<u64>>,
    state: Res<State<ArSessionState>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut requests: EventWriter<SessionRequest>,
) {
    if *state.get() != ArSessionState::Inactive {
        touches.clear();
        pending.clear();
        return;
    }

    let mut tapped = buttons.just_pressed(MouseButton::Left);
    for touch in touches.read() {
        match touch.phase {
            TouchPhase::Started => pending.push(touch.id),
            TouchPhase::Ended | TouchPhase::Canceled => {
                let before = pending.len();
                pending.retain(|id| *id != touch.id);
                tapped |= touch.phase == TouchPhase::Ended && pending.len() != before;
            }
            TouchPhase::Moved => {}
        }
    }
    if tapped {
        requests.write(SessionRequest::Start);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn session_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<SessionRequest>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        requests.write(SessionRequest::Start);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        requests.write(SessionRequest::End);
    }
}
