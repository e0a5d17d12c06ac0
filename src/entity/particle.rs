//! Cosmetic particles. Each particle owns its position and a [`ParticleKind`]
//! deciding how it drifts and how it looks at a given point of its life.

use std::f32::consts::PI;

use glam::Vec2;

use crate::math::{Rgb, lerp_color};
use crate::surface::{Props, Transform};

const YELLOW: Rgb = Rgb::from_u32(0xffff00);
const DARK_YELLOW: Rgb = Rgb::from_u32(0xaaaa00);
const MUZZLE_YELLOW: Rgb = Rgb::from_u32(0xcccc00);
const SMOKE: Rgb = Rgb::from_u32(0xaaaaaa);
const SMOKE_DARK: Rgb = Rgb::from_u32(0x999999);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleKind {
    /// Flash at a gatling barrel; rises.
    MuzzleFlash,
    /// Bullet burning out at the end of its travel.
    BulletSpark,
    /// Smoke puff at an anti-air launcher; rises.
    LauncherSmoke,
    /// Puff left behind a rocket, drifting against its `heading`.
    RocketTrail { heading: f32 },
    /// Rocket detonation.
    Explosion,
    /// Plane exhaust drifting along `heading` at `speed` (multiplier of 80 px/s).
    Exhaust { heading: f32, size: f32, speed: f32 },
}

impl ParticleKind {
    pub fn lifetime(&self) -> f32 {
        match self {
            ParticleKind::MuzzleFlash => 0.5,
            ParticleKind::Exhaust { .. } => 0.7,
            _ => 1.0,
        }
    }

    /// Side length when freshly spawned.
    pub fn base_size(&self) -> f32 {
        match self {
            ParticleKind::MuzzleFlash => 20.0,
            ParticleKind::BulletSpark => 10.0,
            ParticleKind::LauncherSmoke => 40.0,
            ParticleKind::RocketTrail { .. } => 15.0,
            ParticleKind::Explosion => 50.0,
            ParticleKind::Exhaust { size, .. } => *size,
        }
    }

    fn initial_fill(&self) -> String {
        match self {
            ParticleKind::MuzzleFlash | ParticleKind::BulletSpark | ParticleKind::Explosion => {
                YELLOW.to_string()
            }
            ParticleKind::LauncherSmoke => SMOKE.to_string(),
            ParticleKind::RocketTrail { .. } => "transparent".to_string(),
            ParticleKind::Exhaust { .. } => "#ccc".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub kind: ParticleKind,
    lifetime: f32,
    age: f32,
}

impl Particle {
    pub fn new(pos: Vec2, kind: ParticleKind) -> Self {
        Self {
            pos,
            kind,
            lifetime: kind.lifetime(),
            age: 0.0,
        }
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn remaining(&self) -> f32 {
        (self.lifetime - self.age).max(0.0)
    }

    /// Elapsed fraction of the lifetime, 0 at spawn and 1 at expiry.
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Properties for the shape when it is first attached: the freshly spawned look,
    /// full size and full colour. Ticking takes it from there toward the expired look.
    pub fn initial_props(&self) -> Props {
        let mut props = Props::square(self.pos, self.kind.base_size());
        props.fill = Some(self.kind.initial_fill());
        props.merge(&self.appearance());
        props
    }

    /// Age by `dt`, apply drift and return the new appearance.
    pub fn tick(&mut self, dt: f32) -> Props {
        debug_assert!(dt >= 0.0, "negative frame delta {dt}");
        self.age += dt.max(0.0);
        self.drift(dt.max(0.0));
        self.appearance()
    }

    fn drift(&mut self, dt: f32) {
        match self.kind {
            ParticleKind::MuzzleFlash | ParticleKind::LauncherSmoke => self.pos.y -= dt * 50.0,
            ParticleKind::RocketTrail { heading } => {
                self.pos -= Vec2::new(heading.cos(), heading.sin()) * dt * 100.0;
            }
            ParticleKind::Exhaust { heading, speed, .. } => {
                self.pos += Vec2::new(heading.cos(), heading.sin()) * dt * 80.0 * speed;
            }
            ParticleKind::BulletSpark | ParticleKind::Explosion => {}
        }
    }

    /// Appearance for the current age.
    pub fn appearance(&self) -> Props {
        // Fraction of life left: 1 when spawned, 0 when expired.
        let life = 1.0 - self.progress();
        let base = self.kind.base_size();
        let (size, fill, spin, opacity) = match self.kind {
            ParticleKind::MuzzleFlash => flare(life, base, 16.0, YELLOW, MUZZLE_YELLOW, 100.0),
            ParticleKind::BulletSpark => flare(life, base, 8.0, YELLOW, DARK_YELLOW, 100.0),
            ParticleKind::LauncherSmoke => flare(life, base, 30.0, SMOKE, SMOKE_DARK, 50.0),
            ParticleKind::Explosion => flare(life, base, 30.0, YELLOW, DARK_YELLOW, 50.0),
            ParticleKind::RocketTrail { .. } => {
                let (size, fill, spin, opacity) = flare(life, base, 10.0, YELLOW, SMOKE_DARK, 200.0);
                let fill = if life > 0.9 { Some("transparent".to_string()) } else { fill };
                (size, fill, spin, opacity)
            }
            ParticleKind::Exhaust { size, .. } => {
                let s = life * 0.6 * size + size * 0.4;
                (s, None, life * PI * 20.0, Some(life * 0.3 + 0.1))
            }
        };
        let mut props = Props::square(self.pos, size);
        props.fill = fill;
        props.opacity = opacity;
        props.transform = Some(Transform::new().rotate_about(spin, self.pos));
        props
    }
}

/// Full-size `hot` colour for the first tenth of life, then shrinking from
/// `shrink_to` and fading `cool` toward black.
fn flare(
    life: f32,
    base: f32,
    shrink_to: f32,
    hot: Rgb,
    cool: Rgb,
    spin_rate: f32,
) -> (f32, Option<String>, f32, Option<f32>) {
    let second = life / 0.9;
    if life > 0.9 {
        (base, Some(hot.to_string()), life * PI * spin_rate, None)
    } else {
        let fill = lerp_color(cool, Rgb::BLACK, 1.0 - second);
        (second * shrink_to, Some(fill.to_string()), life * PI * spin_rate, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_only_once_lifetime_elapsed() {
        let mut p = Particle::new(Vec2::ZERO, ParticleKind::Explosion);
        for _ in 0..3 {
            p.tick(0.25);
            assert!(!p.expired());
        }
        p.tick(0.25);
        assert!(p.expired());
        assert_eq!(p.remaining(), 0.0);
    }

    #[test]
    fn test_muzzle_flash_rises_and_shrinks() {
        let mut p = Particle::new(Vec2::new(10.0, 10.0), ParticleKind::MuzzleFlash);
        let first = p.initial_props();
        assert_eq!(first.width, Some(20.0));
        let later = p.tick(0.25);
        assert!(p.pos.y < 10.0);
        assert!(later.width.unwrap() < 20.0);
    }

    #[test]
    fn test_exhaust_fades_but_stays_visible() {
        let kind = ParticleKind::Exhaust {
            heading: 0.0,
            size: 20.0,
            speed: 1.0,
        };
        let mut p = Particle::new(Vec2::ZERO, kind);
        let props = p.tick(0.7);
        assert!((props.opacity.unwrap() - 0.1).abs() < 1e-5);
        assert!((props.width.unwrap() - 8.0).abs() < 1e-4);
        assert!(p.pos.x > 0.0);
    }

    #[test]
    fn test_spawn_shape_shows_full_life() {
        let kind = ParticleKind::Exhaust {
            heading: 0.0,
            size: 20.0,
            speed: 1.0,
        };
        let props = Particle::new(Vec2::ZERO, kind).initial_props();
        assert!((props.width.unwrap() - 20.0).abs() < 1e-4);
        assert!((props.opacity.unwrap() - 0.4).abs() < 1e-5);
        assert_eq!(props.fill.as_deref(), Some("#ccc"));

        let spark = Particle::new(Vec2::ZERO, ParticleKind::BulletSpark);
        let props = spark.initial_props();
        assert_eq!(props.width, Some(10.0));
        assert_eq!(props.fill, Some(YELLOW.to_string()));
        assert_eq!(props, {
            let mut expected = spark.appearance();
            expected.fill = Some(YELLOW.to_string());
            expected
        });
    }
}
