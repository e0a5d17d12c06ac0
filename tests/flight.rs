// Flight model scenarios.

use std::f32::consts::{PI, TAU};

use gasup::Tuning;
use gasup::flight::{Controls, Plane, SPAWN_POSITION, SPAWN_VELOCITY};
use glam::Vec2;

// One simulated second of free fall from the spawn point.
#[test]
fn gliding_from_spawn_falls_under_gravity() {
    let tuning = Tuning::default();
    let mut plane = Plane::new();
    assert_eq!(plane.pos, SPAWN_POSITION);
    assert_eq!(plane.vel, SPAWN_VELOCITY);
    assert_eq!(plane.angle, PI / 2.0);

    for _ in 0..60 {
        plane.step(Controls::default(), 1.0 / 60.0, &tuning);
    }

    assert!(plane.pos.y > 0.0, "plane should have descended, y = {}", plane.pos.y);
    assert!(plane.vel.x.abs() < 1e-3);
    // Velocity is along the wings, so blending leaves it alone: vy grows by g * 1s.
    let expected_vy = SPAWN_VELOCITY.y + tuning.gravity;
    assert!((plane.vel.y - expected_vy).abs() < 1.0, "vy = {}", plane.vel.y);
    assert!((plane.pos.x - SPAWN_POSITION.x).abs() < 1e-3);
}

// From the cap at any heading, a full-throttle step never ends above the cap.
#[test]
fn full_throttle_never_passes_the_speed_cap() {
    let tuning = Tuning::default();
    let full = Controls {
        turn: 0.0,
        throttle: 1.0,
    };
    for i in 0..32 {
        let angle = i as f32 * TAU / 32.0;
        for dt in [1.0 / 60.0, 1.0 / 30.0, 0.1] {
            let mut plane = Plane {
                angle,
                ..Plane::new()
            };
            plane.vel = plane.thrust_dir() * tuning.max_speed;
            assert!((plane.projected_speed() - tuning.max_speed).abs() < 1e-2);

            plane.step(full, dt, &tuning);
            assert!(
                plane.projected_speed() <= tuning.max_speed + 1e-2,
                "projected {} at heading {angle} after dt {dt}",
                plane.projected_speed()
            );
        }
    }
}

// Without gravity, thrust alone fills the gap to the cap and stops there.
#[test]
fn thrust_tops_out_at_the_cap() {
    let tuning = Tuning {
        gravity: 0.0,
        ..Tuning::default()
    };
    let full = Controls {
        turn: 0.0,
        throttle: 1.0,
    };
    for i in 0..16 {
        let mut plane = Plane {
            angle: i as f32 * TAU / 16.0,
            ..Plane::new()
        };
        plane.vel = plane.thrust_dir() * (tuning.max_speed - 5.0);
        plane.step(full, 0.1, &tuning);
        assert!((plane.projected_speed() - tuning.max_speed).abs() < 1e-2);
    }
}

// With the engine off, gravity along the nose still speeds up a dive past the cap.
#[test]
fn gliding_dive_is_not_capped() {
    let tuning = Tuning::default();
    let mut plane = Plane {
        angle: -PI / 2.0,
        vel: Vec2::new(0.0, tuning.max_speed),
        ..Plane::new()
    };
    plane.step(Controls::default(), 1.0 / 60.0, &tuning);
    let gained = tuning.gravity / 60.0;
    assert!((plane.projected_speed() - (tuning.max_speed + gained)).abs() < 1e-2);
}

// Below the cap, throttle accelerates along the nose.
#[test]
fn throttle_accelerates_toward_the_nose() {
    let tuning = Tuning {
        gravity: 0.0,
        ..Tuning::default()
    };
    let mut plane = Plane {
        angle: PI,
        vel: Vec2::ZERO,
        ..Plane::new()
    };
    plane.step(
        Controls {
            turn: 0.0,
            throttle: 1.0,
        },
        0.1,
        &tuning,
    );
    assert!(plane.vel.x > 0.0);
    assert!(plane.projected_speed() > 0.0);
    assert!(plane.fuel < 1.0);
}
