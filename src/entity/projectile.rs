//! Turret ammunition: straight gatling bullets and weaving, homing anti-air rockets.
//!
//! Neither projectile damages the plane; a bullet passing close to it burns out
//! and a rocket detonates near it, shaking the camera.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::TickContext;
use super::particle::ParticleKind;
use crate::math::{from_polar, radial_line_path, to_degrees};
use crate::surface::{Props, Transform};

/// Distance from the barrel pivot at which a bullet appears.
const BULLET_START: f32 = 63.0;
const BULLET_LENGTH: f32 = 20.0;
const MUZZLE_OFFSET: f32 = 80.0;
const ROCKET_LAUNCH_OFFSET: f32 = 40.0;
const ROCKET_TRAIL_OFFSET: f32 = 50.0;
const ROCKET_TRAIL_INTERVAL: f32 = 0.1;
/// Weave phase at which a rocket runs out of fuel and self-destructs.
const ROCKET_MAX_PHASE: f32 = 40.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    origin: Vec2,
    /// Direction in screen-line convention: counter-clockwise with y pointing up.
    angle: f32,
    dist: f32,
    max_dist: f32,
}

impl Bullet {
    /// Fire from `origin` toward `angle`, leaving a muzzle flash at the barrel.
    pub fn fire(origin: Vec2, angle: f32, ctx: &mut TickContext<'_>) -> Self {
        let max_dist = 1000.0 - ctx.rng.r#gen::<f32>() * 200.0;
        let bullet = Self {
            origin,
            angle,
            dist: BULLET_START,
            max_dist,
        };
        ctx.emit(bullet.point_at(MUZZLE_OFFSET), ParticleKind::MuzzleFlash);
        bullet
    }

    pub fn point_at(&self, dist: f32) -> Vec2 {
        self.origin + Vec2::new(self.angle.cos(), -self.angle.sin()) * dist
    }

    pub fn tip(&self) -> Vec2 {
        self.point_at(self.dist + BULLET_LENGTH)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> bool {
        self.dist += ctx.dt * ctx.tuning.bullet_speed;
        let near_miss = self.tip().distance(ctx.player) < ctx.tuning.bullet_hit_radius;
        if self.dist > self.max_dist || near_miss {
            ctx.emit(self.tip(), ParticleKind::BulletSpark);
            return true;
        }
        false
    }

    pub fn initial_props(&self) -> Props {
        Props {
            stroke: Some("#ffff00".to_string()),
            stroke_width: Some(3.0),
            ..self.appearance()
        }
    }

    pub fn appearance(&self) -> Props {
        Props {
            path: Some(radial_line_path(
                self.origin,
                self.dist,
                self.dist + BULLET_LENGTH,
                self.angle,
            )),
            ..Props::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rocket {
    pub pos: Vec2,
    /// Course the rocket weaves around; bends toward the plane when close.
    heading: f32,
    /// Weave phase; also the fuel clock.
    phase: f32,
    smoke_timer: f32,
    /// Heading actually flown this frame.
    current: f32,
}

impl Rocket {
    pub fn launch(origin: Vec2, heading: f32, ctx: &mut TickContext<'_>) -> Self {
        let pos = origin + from_polar(heading, ROCKET_LAUNCH_OFFSET);
        ctx.emit(pos, ParticleKind::LauncherSmoke);
        Self {
            pos,
            heading,
            phase: ctx.rng.r#gen::<f32>() * 3.0,
            smoke_timer: 0.0,
            current: heading,
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> bool {
        let dt = ctx.dt;
        self.phase += dt * 5.0;
        let current = self.heading + self.phase.cos() * PI / 6.0;

        let away = self.pos - ctx.player;
        let player_dist = away.length();
        let bearing = away.y.atan2(away.x);

        if player_dist < ctx.tuning.rocket_homing_radius {
            self.phase -= dt * 2.0;
            self.heading = (self.heading.sin() - bearing.sin() * dt * 2.0)
                .atan2(self.heading.cos() - bearing.cos() * dt * 2.0);
        }

        self.pos += from_polar(current, ctx.tuning.rocket_speed * dt);
        self.current = current;

        self.smoke_timer -= dt;
        if self.smoke_timer < 0.0 {
            self.smoke_timer = ROCKET_TRAIL_INTERVAL;
            ctx.emit(
                self.pos - from_polar(current, ROCKET_TRAIL_OFFSET),
                ParticleKind::RocketTrail { heading: current },
            );
        }

        if self.phase > ROCKET_MAX_PHASE || player_dist < ctx.tuning.rocket_detonate_radius {
            if player_dist < ctx.tuning.rumble_radius {
                ctx.rumble(ctx.tuning.rumble_duration);
            }
            ctx.emit(self.pos, ParticleKind::Explosion);
            return true;
        }
        false
    }

    pub fn appearance(&self) -> Props {
        Props {
            transform: Some(
                Transform::new()
                    .translate(self.pos)
                    .scale(0.4, 0.4)
                    .rotate(to_degrees(self.current) + 90.0),
            ),
            ..Props::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bullet_travels_then_burns_out() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(4);
        let far = Vec2::new(0.0, 10_000.0);
        let mut ctx = TickContext::new(0.0, 0.0, far, &mut rng, &tuning);
        let mut bullet = Bullet::fire(Vec2::ZERO, 0.0, &mut ctx);
        assert_eq!(ctx.particles.len(), 1);
        assert!((ctx.particles[0].pos - Vec2::new(80.0, 0.0)).length() < 1e-3);

        ctx.dt = 0.1;
        let mut ticks = 0;
        while !bullet.tick(&mut ctx) {
            ticks += 1;
            assert!(ticks < 100, "bullet never expired");
        }
        // 63 + 40/tick must pass at least 800 and at most 1000.
        assert!((18..=24).contains(&ticks), "{ticks}");
        assert!(matches!(ctx.particles.last().unwrap().kind, ParticleKind::BulletSpark));
    }

    #[test]
    fn test_bullet_burns_out_next_to_plane() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut ctx = TickContext::new(0.1, 0.0, Vec2::new(123.0, 0.0), &mut rng, &tuning);
        let mut bullet = Bullet::fire(Vec2::ZERO, 0.0, &mut ctx);
        assert!(bullet.tick(&mut ctx));
    }

    #[test]
    fn test_rocket_detonates_near_plane_and_rumbles() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut ctx = TickContext::new(0.0, 0.0, Vec2::new(60.0, 0.0), &mut rng, &tuning);
        let mut rocket = Rocket::launch(Vec2::ZERO, 0.0, &mut ctx);
        ctx.dt = 1.0 / 60.0;
        assert!(rocket.tick(&mut ctx));
        assert_eq!(ctx.rumble, Some(tuning.rumble_duration));
        assert!(matches!(ctx.particles.last().unwrap().kind, ParticleKind::Explosion));
    }

    #[test]
    fn test_rocket_runs_out_of_fuel() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(9);
        let far = Vec2::new(100_000.0, 100_000.0);
        let mut ctx = TickContext::new(0.1, 0.0, far, &mut rng, &tuning);
        let mut rocket = Rocket::launch(Vec2::ZERO, 0.0, &mut ctx);
        let mut ticks = 0;
        while !rocket.tick(&mut ctx) {
            ticks += 1;
            assert!(ticks < 200);
        }
        // Phase starts in [0, 3) and grows 0.5 per tick until it passes 40.
        assert!((74..=81).contains(&ticks), "{ticks}");
        assert_eq!(ctx.rumble, None);
    }

    #[test]
    fn test_rocket_bends_toward_plane() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(1);
        // Plane straight below the rocket's course.
        let mut ctx = TickContext::new(0.0, 0.0, Vec2::new(40.0, 200.0), &mut rng, &tuning);
        let mut rocket = Rocket::launch(Vec2::ZERO, 0.0, &mut ctx);
        ctx.dt = 0.05;
        rocket.tick(&mut ctx);
        assert!(rocket.heading() > 0.0, "heading {}", rocket.heading());
    }
}
