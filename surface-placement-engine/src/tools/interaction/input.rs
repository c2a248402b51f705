use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use crate::engine::core::app_state::ArSessionState;

use super::engine::{InteractionEngine, InteractionEvent, InteractionSignal};
use super::gestures::TouchPoint;
use super::projector::ViewSnapshot;

/// Platform select signal, one per released transient input.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSelect;

/// Contacts currently down, in landing order.
///
/// Bevy reports touches per finger; the engine wants the whole contact list with every
/// start, move and end, the way DOM touch events deliver it.
#[derive(Resource, Debug, Default)]
pub struct ActiveTouches {
    touches: Vec<TouchPoint>,
}

impl ActiveTouches {
    pub fn apply(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
        timestamp_ms: f64,
    ) -> Option<InteractionEvent> {
        match phase {
            TouchPhase::Started => {
                self.touches.retain(|t| t.id != id);
                self.touches.push(TouchPoint { id, position });
                Some(InteractionEvent::TouchStart {
                    touches: self.touches.clone(),
                    timestamp_ms,
                })
            }
            TouchPhase::Moved => {
                let touch = self.touches.iter_mut().find(|t| t.id == id)?;
                if touch.position == position {
                    return None;
                }
                touch.position = position;
                Some(InteractionEvent::TouchMove {
                    touches: self.touches.clone(),
                })
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                let before = self.touches.len();
                self.touches.retain(|t| t.id != id);
                if self.touches.len() == before {
                    return None;
                }
                Some(InteractionEvent::TouchEnd {
                    touches: self.touches.clone(),
                    timestamp_ms,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}

/// Screen areas owned by on-screen controls, in logical pixels.
///
/// Contacts that land inside one never reach the engine, so pressing a button is not a
/// tap on the surface.
#[derive(Resource, Debug, Default)]
pub struct TouchExclusionZones {
    pub zones: Vec<Rect>,
}

impl TouchExclusionZones {
    pub fn contains(&self, point: Vec2) -> bool {
        self.zones.iter().any(|zone| zone.contains(point))
    }
}

/// Runs in every session state so the reader never holds touches from before the
/// session started.
pub fn collect_touch_input(
    mut touch_events: EventReader<TouchInput>,
    state: Res<State<ArSessionState>>,
    exclusions: Res<TouchExclusionZones>,
    mut active: ResMut<ActiveTouches>,
    mut engine: ResMut<InteractionEngine>,
    mut selects: EventWriter<PlatformSelect>,
    mut signals: EventWriter<InteractionSignal>,
    time: Res<Time>,
) {
    if *state.get() != ArSessionState::Active {
        touch_events.clear();
        return;
    }

    let now_ms = time.elapsed_secs_f64() * 1000.0;
    for touch in touch_events.read() {
        // Unknown ids are dropped on move and end, so skipping the start is enough.
        if touch.phase == TouchPhase::Started && exclusions.contains(touch.position) {
            continue;
        }
        let Some(event) = active.apply(touch.id, touch.phase, touch.position, now_ms) else {
            continue;
        };
        let released = touch.phase == TouchPhase::Ended;
        signals.write_batch(engine.dispatch(event));

        // Screen input releases surface as selects after the touch end, gesture or not.
        if released {
            selects.write(PlatformSelect);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit_mouse_select(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<bevy::window::PrimaryWindow>>,
    exclusions: Res<TouchExclusionZones>,
    mut selects: EventWriter<PlatformSelect>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let on_control = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .is_some_and(|cursor| exclusions.contains(cursor));
    if !on_control {
        selects.write(PlatformSelect);
    }
}

pub fn route_select_signals(
    mut selects: EventReader<PlatformSelect>,
    mut engine: ResMut<InteractionEngine>,
    mut signals: EventWriter<InteractionSignal>,
) {
    for _ in selects.read() {
        signals.write_batch(engine.dispatch(InteractionEvent::Select));
    }
}

// Drag projection reads the camera from the latest snapshot.
pub fn sync_view_snapshot(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut engine: ResMut<InteractionEngine>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    engine.set_view(ViewSnapshot::from_camera(camera, camera_transform));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_fingers_into_contact_lists() {
        let mut active = ActiveTouches::default();
        let start = active.apply(7, TouchPhase::Started, Vec2::new(1.0, 2.0), 0.0);
        assert_eq!(
            start,
            Some(InteractionEvent::TouchStart {
                touches: vec![TouchPoint::new(7, 1.0, 2.0)],
                timestamp_ms: 0.0,
            })
        );

        let second = active.apply(9, TouchPhase::Started, Vec2::new(5.0, 5.0), 1.0);
        let Some(InteractionEvent::TouchStart { touches, .. }) = second else {
            panic!("expected touch start");
        };
        assert_eq!(touches.iter().map(|t| t.id).collect::<Vec<_>>(), vec![7, 9]);

        let moved = active.apply(7, TouchPhase::Moved, Vec2::new(3.0, 2.0), 2.0);
        assert_eq!(
            moved,
            Some(InteractionEvent::TouchMove {
                touches: vec![TouchPoint::new(7, 3.0, 2.0), TouchPoint::new(9, 5.0, 5.0)],
            })
        );

        let lifted = active.apply(7, TouchPhase::Ended, Vec2::new(3.0, 2.0), 3.0);
        assert_eq!(
            lifted,
            Some(InteractionEvent::TouchEnd {
                touches: vec![TouchPoint::new(9, 5.0, 5.0)],
                timestamp_ms: 3.0,
            })
        );
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn ignores_unknown_and_stationary_contacts() {
        let mut active = ActiveTouches::default();
        assert_eq!(active.apply(1, TouchPhase::Moved, Vec2::ZERO, 0.0), None);
        assert_eq!(active.apply(1, TouchPhase::Ended, Vec2::ZERO, 0.0), None);

        active.apply(1, TouchPhase::Started, Vec2::ONE, 0.0);
        assert_eq!(active.apply(1, TouchPhase::Moved, Vec2::ONE, 1.0), None);
    }

    #[test]
    fn exclusion_zones_cover_their_rects() {
        let zones = TouchExclusionZones {
            zones: vec![Rect::new(300.0, 10.0, 340.0, 50.0)],
        };
        assert!(zones.contains(Vec2::new(320.0, 30.0)));
        assert!(!zones.contains(Vec2::new(100.0, 30.0)));
        assert!(!TouchExclusionZones::default().contains(Vec2::ZERO));
    }

    #[test]
    fn cancel_ends_the_contact() {
        let mut active = ActiveTouches::default();
        active.apply(1, TouchPhase::Started, Vec2::ONE, 0.0);
        let cancelled = active.apply(1, TouchPhase::Canceled, Vec2::ONE, 1.0);
        assert!(matches!(cancelled, Some(InteractionEvent::TouchEnd { ref touches, .. }) if touches.is_empty()));
        assert!(active.is_empty());
    }
}
