use bevy::input::InputPlugin;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::f32::consts::FRAC_PI_2;
use surface_placement_engine::engine::core::app_state::{
    ArSessionState, SessionPlugin, SessionRequest,
};
use surface_placement_engine::engine::hit_test::{HitTestPlugin, HitTestProvider, HitTestSource};
use surface_placement_engine::tools::interaction::input::TouchExclusionZones;
use surface_placement_engine::tools::interaction::{
    InteractionEngine, InteractionPlugin, ViewSnapshot,
};

const EPS: f32 = 1e-3;

/// Always reports one surface at a fixed point.
struct FixedHit(Vec3);

impl HitTestSource for FixedHit {
    fn hit_test(&mut self, _viewer: &ViewSnapshot) -> Vec<Mat4> {
        vec![Mat4::from_translation(self.0)]
    }
}

// Camera 3m above the floor looking straight down; at y = 0 one pixel spans 0.03m.
fn top_down_view() -> ViewSnapshot {
    let camera = Transform::from_xyz(0.0, 3.0, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z);
    ViewSnapshot::new(
        Vec2::splat(200.0),
        camera.compute_matrix(),
        Mat4::perspective_infinite_reverse_rh(FRAC_PI_2, 1.0, 0.1),
    )
}

fn host_app(auto_place: bool) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default(), InputPlugin))
        .add_plugins((SessionPlugin, InteractionPlugin, HitTestPlugin))
        .insert_resource(HitTestProvider(Box::new(FixedHit(Vec3::ZERO))));

    let mut engine = app.world_mut().resource_mut::<InteractionEngine>();
    engine.set_view(Some(top_down_view()));
    if auto_place {
        engine.set_auto_place(true);
    }
    app
}

fn move_surface(app: &mut App, position: Vec3) {
    app.insert_resource(HitTestProvider(Box::new(FixedHit(position))));
}

fn request(app: &mut App, request: SessionRequest) {
    app.world_mut().send_event(request);
    app.update();
    app.update();
}

fn touch(app: &mut App, id: u64, phase: TouchPhase, x: f32, y: f32) {
    app.world_mut().send_event(TouchInput {
        phase,
        position: Vec2::new(x, y),
        window: Entity::PLACEHOLDER,
        force: None,
        id,
    });
}

fn tap(app: &mut App, id: u64, x: f32, y: f32) {
    touch(app, id, TouchPhase::Started, x, y);
    touch(app, id, TouchPhase::Ended, x, y);
    app.update();
}

fn engine(app: &App) -> &InteractionEngine {
    app.world().resource::<InteractionEngine>()
}

fn session_state(app: &App) -> ArSessionState {
    *app.world().resource::<State<ArSessionState>>().get()
}

/// Active session with the object tapped onto the origin.
fn placed_app() -> App {
    let mut app = host_app(false);
    request(&mut app, SessionRequest::Start);
    tap(&mut app, 1, 100.0, 100.0);
    let placement = engine(&app).placement().expect("placed by tap");
    assert_eq!(placement.position, Vec3::ZERO);
    app
}

#[test]
fn session_end_leaves_nothing_behind() {
    let mut app = host_app(true);
    request(&mut app, SessionRequest::Start);
    assert_eq!(session_state(&app), ArSessionState::Active);
    assert!(engine(&app).is_tracking());
    assert!(engine(&app).placement().is_some(), "auto placed");

    // The surface is still reported in the session's last frame.
    request(&mut app, SessionRequest::End);
    assert_eq!(session_state(&app), ArSessionState::Inactive);
    assert!(engine(&app).placement().is_none());
    assert!(!engine(&app).is_tracking());

    app.update();
    assert!(engine(&app).placement().is_none());

    // The next session sees tracking start again and auto-places afresh.
    move_surface(&mut app, Vec3::new(1.0, 0.0, 1.0));
    request(&mut app, SessionRequest::Start);
    assert!(engine(&app).is_tracking());
    assert_eq!(
        engine(&app).placement().map(|p| p.position),
        Some(Vec3::new(1.0, 0.0, 1.0))
    );
}

#[test]
fn drag_release_select_does_not_move_the_object() {
    let mut app = placed_app();
    move_surface(&mut app, Vec3::new(2.0, 0.0, 2.0));

    touch(&mut app, 2, TouchPhase::Started, 100.0, 100.0);
    app.update();
    touch(&mut app, 2, TouchPhase::Moved, 150.0, 100.0);
    app.update();
    touch(&mut app, 2, TouchPhase::Ended, 150.0, 100.0);
    app.update();

    let position = engine(&app).placement().expect("placed").position;
    assert!((position.x - 1.5).abs() < EPS, "x = {}", position.x);
    assert!(position.z.abs() < EPS);
    assert_eq!(engine(&app).pending_suppressions(), 0);

    // A later genuine tap still places at the surface.
    tap(&mut app, 3, 60.0, 60.0);
    assert_eq!(
        engine(&app).placement().map(|p| p.position),
        Some(Vec3::new(2.0, 0.0, 2.0))
    );
}

#[test]
fn simultaneous_two_finger_release_swallows_both_selects() {
    let mut app = placed_app();
    move_surface(&mut app, Vec3::new(2.0, 0.0, 2.0));

    touch(&mut app, 2, TouchPhase::Started, 100.0, 100.0);
    touch(&mut app, 3, TouchPhase::Started, 200.0, 100.0);
    app.update();
    touch(&mut app, 3, TouchPhase::Moved, 300.0, 100.0);
    app.update();
    touch(&mut app, 2, TouchPhase::Ended, 100.0, 100.0);
    touch(&mut app, 3, TouchPhase::Ended, 300.0, 100.0);
    app.update();

    let placement = engine(&app).placement().expect("placed");
    assert_eq!(placement.position, Vec3::ZERO);
    assert!((placement.scale - 0.6).abs() < EPS);
    assert_eq!(engine(&app).pending_suppressions(), 0);
}

#[test]
fn starting_tap_never_places() {
    let mut app = host_app(false);
    tap(&mut app, 1, 100.0, 100.0);
    app.update();
    app.update();

    assert_eq!(session_state(&app), ArSessionState::Active);
    assert!(engine(&app).is_tracking());
    assert!(engine(&app).placement().is_none());
}

#[test]
fn lifting_the_finger_that_ended_a_session_does_not_restart_it() {
    let mut app = placed_app();
    touch(&mut app, 5, TouchPhase::Started, 180.0, 20.0);
    app.world_mut().send_event(SessionRequest::End);
    app.update();
    app.update();
    assert_eq!(session_state(&app), ArSessionState::Inactive);

    touch(&mut app, 5, TouchPhase::Ended, 180.0, 20.0);
    app.update();
    app.update();
    assert_eq!(session_state(&app), ArSessionState::Inactive);
}

#[test]
fn touches_on_controls_are_not_taps() {
    let mut app = host_app(false);
    request(&mut app, SessionRequest::Start);
    app.insert_resource(TouchExclusionZones {
        zones: vec![Rect::new(150.0, 0.0, 200.0, 50.0)],
    });

    tap(&mut app, 1, 180.0, 20.0);
    assert!(engine(&app).placement().is_none());

    tap(&mut app, 2, 100.0, 100.0);
    assert!(engine(&app).placement().is_some());
}
