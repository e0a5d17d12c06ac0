//! Arcade flight model for the player's plane.
//!
//! Screen coordinates: `y` grows downward, so climbing means decreasing `y`.
//! The plane's `angle` points along its wings' axis; thrust pushes the opposite
//! way (toward the nose), and each step velocity is pulled onto the wing axis
//! before gravity is added.

use std::f32::consts::PI;

use glam::Vec2;

use crate::config::Tuning;
use crate::math::from_polar;

pub const SPAWN_POSITION: Vec2 = Vec2::new(450.0, 0.0);
pub const SPAWN_VELOCITY: Vec2 = Vec2::new(0.0, -200.0);

/// Steering and throttle requested for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    /// Heading change rate in rad/s.
    pub turn: f32,
    /// Throttle in `[0, 1]`.
    pub throttle: f32,
}

/// What happened during a step besides moving.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Velocity component along the nose, in px/s (negative of the wing-axis projection).
    pub airspeed: f32,
    pub refueled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub pos: Vec2,
    pub angle: f32,
    pub vel: Vec2,
    pub throttle: f32,
    /// Fuel in `[0, 1]`.
    pub fuel: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            pos: SPAWN_POSITION,
            angle: PI / 2.0,
            vel: SPAWN_VELOCITY,
            throttle: 0.0,
            fuel: 1.0,
        }
    }
}

impl Plane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit vector along the wing axis.
    pub fn wing_dir(&self) -> Vec2 {
        from_polar(self.angle, 1.0)
    }

    /// Unit vector thrust pushes along (toward the nose).
    pub fn thrust_dir(&self) -> Vec2 {
        -self.wing_dir()
    }

    /// Speed along the thrust direction.
    pub fn projected_speed(&self) -> f32 {
        self.vel.dot(self.thrust_dir())
    }

    pub fn step(&mut self, controls: Controls, dt: f32, tuning: &Tuning) -> StepReport {
        debug_assert!(dt >= 0.0, "negative frame delta {dt}");
        let dt = dt.max(0.0);
        let throttle = controls.throttle.clamp(0.0, 1.0);
        self.throttle = throttle;
        self.angle += controls.turn * dt;

        let mut refueled = false;
        self.fuel -= dt * throttle * tuning.fuel_burn;
        if self.fuel < 0.0 {
            if tuning.refuel_when_empty {
                log::debug!("fuel empty, refilling (endless mode)");
                self.fuel = 1.0;
                refueled = true;
            } else {
                self.fuel = 0.0;
            }
        }
        // A dry tank produces no thrust.
        let throttle = if self.fuel > 0.0 { throttle } else { 0.0 };

        // Thrust, limited so the speed along the nose never passes the cap.
        let thrust_dir = self.thrust_dir();
        let projected = self.vel.dot(thrust_dir);
        let mut accel = throttle * tuning.thrust * throttle * tuning.thrust * dt;
        if projected + accel > tuning.max_speed {
            accel = (tuning.max_speed - projected).max(0.0);
        }
        let mut vel = self.vel + thrust_dir * accel;

        // Wings pull velocity onto their axis.
        let wing = self.wing_dir();
        let blend = (dt * tuning.wing_blend_rate).min(1.0);
        vel = vel * (1.0 - blend) + wing * (vel.dot(wing) * blend);

        let airspeed = -vel.dot(wing);

        vel.y += tuning.gravity * dt;
        // Under power the step may not push the nose speed past the cap, gravity
        // included. Gliding dives are not limited.
        if throttle > 0.0 {
            let limit = tuning.max_speed.max(projected);
            let along = vel.dot(thrust_dir);
            if along > limit {
                vel -= thrust_dir * (along - limit);
            }
        }
        self.vel = vel;
        self.pos += self.vel * dt;

        StepReport { airspeed, refueled }
    }

    /// Put the plane back at the origin if it fell past the floor. Returns `true` on reset.
    pub fn enforce_bounds(&mut self, tuning: &Tuning) -> bool {
        if tuning.reset_out_of_bounds && self.pos.y > tuning.out_of_bounds_y {
            log::debug!("plane fell out of bounds at {:?}, resetting", self.pos);
            self.pos = Vec2::ZERO;
            self.vel = Vec2::ZERO;
            return true;
        }
        false
    }
}
