// Headless frame-loop runs.

use gasup::entity::GameObject;
use gasup::error::{GameError, Result};
use gasup::input::{InputState, Key};
use gasup::storage::{MemoryStore, ScoreStore};
use gasup::surface::{HeadlessSurface, Layer, Named, Transform};
use gasup::{Tuning, Viewport, World};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn view() -> Viewport {
    Viewport::new(800.0, 600.0)
}

struct Unavailable;

impl ScoreStore for Unavailable {
    fn load(&mut self) -> Result<Option<f64>> {
        Err(GameError::Storage("blocked".into()))
    }

    fn save(&mut self, _best: f64) -> Result<()> {
        Err(GameError::Storage("blocked".into()))
    }
}

// Shapes on the surface always match the live entities, frame after frame.
#[test]
fn surface_tracks_live_entities() {
    let tuning = Tuning {
        turret_chance: 1.0,
        turret_lead_in: 0,
        ..Tuning::default()
    };
    let mut world = World::new(21, tuning, 0);
    let mut surface = HeadlessSurface::new();
    let mut store = MemoryStore::default();
    world.start(&mut surface).unwrap();

    let mut input = InputState::new();
    input.set_key(Key::Throttle, true);
    for _ in 0..300 {
        world.tick(DT, &input, view(), &mut surface, &mut store).unwrap();
        assert_eq!(surface.live_in(Layer::Effects), world.entities().particle_count());
        assert_eq!(
            surface.live_in(Layer::Effects) + surface.live_in(Layer::World),
            world.entities().shape_count()
        );
    }

    assert!(world.title_done());
    assert!(world.revealed_groups() >= 1);
    assert!(world.entities().objects().any(GameObject::is_turret));
    assert!(world.plane().pos.y < 0.0, "full throttle straight up should climb");
}

// At most one terrain group is revealed per frame, however far ahead the plane is.
#[test]
fn one_group_revealed_per_frame() {
    let mut world = World::new(4, Tuning::default(), 0);
    let mut surface = HeadlessSurface::new();
    let mut store = MemoryStore::default();
    world.plane_mut().pos = Vec2::new(0.0, -5000.0);
    world.plane_mut().vel = Vec2::ZERO;

    for frame in 1..=3 {
        world
            .tick(DT, &InputState::new(), view(), &mut surface, &mut store)
            .unwrap();
        assert_eq!(world.revealed_groups(), frame);
        assert_eq!(surface.live_in(Layer::Background), frame);
    }
}

// Without rumble the camera centers the plane on the viewport.
#[test]
fn camera_centers_the_plane() {
    let mut world = World::new(8, Tuning::default(), 0);
    let mut surface = HeadlessSurface::new();
    let mut store = MemoryStore::default();
    world
        .tick(DT, &InputState::new(), view(), &mut surface, &mut store)
        .unwrap();
    assert_eq!(world.rumble(), 0.0);

    let expected = Transform::new().translate(-world.plane().pos + Vec2::new(400.0, 300.0));
    let camera = surface.named(Named::Camera).unwrap();
    assert_eq!(camera.transform.as_ref(), Some(&expected));
}

// The intro title finishes after its two seconds and is then left alone.
#[test]
fn title_intro_runs_once() {
    let mut world = World::new(2, Tuning::default(), 0);
    let mut surface = HeadlessSurface::new();
    let mut store = MemoryStore::default();
    for _ in 0..125 {
        world
            .tick(DT, &InputState::new(), view(), &mut surface, &mut store)
            .unwrap();
    }
    assert!(world.title_done());
    assert_eq!(surface.named(Named::TitleText).unwrap().opacity, Some(0.0));
}

// A broken score store never stops the game.
#[test]
fn storage_failures_are_not_fatal() {
    let mut world = World::new(6, Tuning::default(), 0);
    let mut surface = HeadlessSurface::new();
    world.plane_mut().pos = Vec2::new(0.0, -999.0);
    world.plane_mut().vel = Vec2::ZERO;
    world
        .tick(DT, &InputState::new(), view(), &mut surface, &mut Unavailable)
        .unwrap();
    // A new milestone was reached even though it could not be stored.
    assert_eq!(world.best_altitude(), 3);
    assert_eq!(
        surface.named(Named::AltitudeText).unwrap().text.as_deref(),
        Some("3")
    );
}

// Falling through the floor puts the plane back at the origin in endless mode.
#[test]
fn falling_out_of_bounds_resets() {
    let mut world = World::new(6, Tuning::default(), 0);
    let mut surface = HeadlessSurface::new();
    let mut store = MemoryStore::default();
    world.plane_mut().pos = Vec2::new(0.0, 1200.0);
    world
        .tick(DT, &InputState::new(), view(), &mut surface, &mut store)
        .unwrap();
    assert_eq!(world.plane().pos, Vec2::ZERO);
    assert_eq!(world.plane().vel, Vec2::ZERO);
}
