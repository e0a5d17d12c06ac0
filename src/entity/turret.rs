//! Stationary ground turrets. Turrets never expire; they watch the plane and
//! spawn projectiles into the tick context.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::TickContext;
use super::projectile::{Bullet, Rocket};
use crate::math::to_degrees;
use crate::surface::{Props, Transform};

/// Launch elevation of anti-air rockets above the facing direction.
const ANTI_AIR_ELEVATION: f32 = PI / 9.0;
const ANTI_AIR_MUZZLE_HEIGHT: f32 = 20.0;
const SPRITE_SCALE: f32 = 0.4;

/// Rapid-fire gun that tracks the plane inside a narrow arc and fires bursts.
#[derive(Clone, Debug, PartialEq)]
pub struct Gatling {
    pub pos: Vec2,
    pub facing_right: bool,
    range: f32,
    /// Time until the next shot may fire.
    reload: f32,
    /// Shots left in the current burst.
    burst_left: u32,
    /// Barrel angle relative to the facing direction, eased toward the target.
    aim: f32,
}

impl Gatling {
    pub fn new(pos: Vec2, facing_right: bool, range: f32, burst: u32) -> Self {
        Self {
            pos,
            facing_right,
            range,
            reload: 0.0,
            burst_left: burst.max(1),
            aim: 0.0,
        }
    }

    fn dir(&self) -> f32 {
        if self.facing_right { -1.0 } else { 1.0 }
    }

    pub fn aim(&self) -> f32 {
        self.aim
    }

    /// Bearing of the plane relative to the facing direction, in (-π, π].
    fn bearing(&self, player: Vec2) -> f32 {
        let away = self.pos - player;
        let base = if self.facing_right { PI } else { 0.0 };
        let mut bearing = base + away.y.atan2(away.x) * self.dir();
        if bearing > PI {
            bearing -= TAU;
        }
        bearing
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> bool {
        let t = ctx.tuning;
        let arc = t.gatling_arc;
        let bearing = self.bearing(ctx.player);
        let in_range = self.pos.distance(ctx.player) < self.range;

        let target = if in_range && bearing.abs() < arc {
            self.reload -= ctx.dt;
            if self.reload < 0.0 {
                self.reload = t.gatling_shot_gap;
                self.burst_left = self.burst_left.saturating_sub(1);
                if self.burst_left == 0 {
                    self.reload = t.gatling_cooldown;
                    self.burst_left = t.gatling_burst.max(1);
                }
                let spread = (ctx.rng.r#gen::<f32>() - 0.5) * 0.1;
                let base = if self.facing_right { 0.0 } else { PI };
                let bullet = Bullet::fire(self.pos, base - self.aim * self.dir() + spread, ctx);
                ctx.spawn(bullet.into());
            }
            bearing.clamp(-arc, arc)
        } else {
            // Idle sweep, de-synchronised between turrets by position.
            (ctx.clock + self.pos.x * 3.0 + self.pos.y * 2.0).sin() * arc
        };

        self.aim += (target - self.aim) * ctx.dt * t.gatling_aim_rate;
        false
    }

    pub fn base_props(&self) -> Props {
        Props {
            transform: Some(
                Transform::new()
                    .translate(self.pos)
                    .scale(SPRITE_SCALE, SPRITE_SCALE),
            ),
            ..Props::default()
        }
    }

    pub fn gun_props(&self) -> Props {
        Props {
            transform: Some(
                Transform::new()
                    .translate(self.pos)
                    .scale(self.dir() * SPRITE_SCALE, SPRITE_SCALE)
                    .rotate(to_degrees(self.aim)),
            ),
            ..Props::default()
        }
    }
}

/// Launcher that lobs a homing rocket at regular intervals while the plane is in range.
#[derive(Clone, Debug, PartialEq)]
pub struct AntiAir {
    pub pos: Vec2,
    pub facing_right: bool,
    range: f32,
    reload: f32,
}

impl AntiAir {
    pub fn new(pos: Vec2, facing_right: bool, range: f32) -> Self {
        Self {
            pos,
            facing_right,
            range,
            reload: 0.0,
        }
    }

    fn dir(&self) -> f32 {
        if self.facing_right { -1.0 } else { 1.0 }
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> bool {
        if self.pos.distance(ctx.player) < self.range {
            self.reload -= ctx.dt;
            if self.reload < 0.0 {
                self.reload = ctx.tuning.anti_air_period;
                let spread = (ctx.rng.r#gen::<f32>() - 0.5) * 0.2;
                let base = if self.facing_right { 0.0 } else { PI };
                let heading = base + ANTI_AIR_ELEVATION * self.dir() + spread;
                let muzzle = self.pos - Vec2::new(0.0, ANTI_AIR_MUZZLE_HEIGHT);
                let rocket = Rocket::launch(muzzle, heading, ctx);
                ctx.spawn(rocket.into());
            }
        }
        false
    }

    pub fn props(&self) -> Props {
        Props {
            transform: Some(
                Transform::new()
                    .translate(self.pos)
                    .scale(self.dir() * SPRITE_SCALE, SPRITE_SCALE),
            ),
            ..Props::default()
        }
    }
}
