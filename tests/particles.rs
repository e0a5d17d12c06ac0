// Particle lifetimes.

use gasup::entity::{Particle, ParticleKind};
use glam::Vec2;

fn kinds() -> Vec<ParticleKind> {
    vec![
        ParticleKind::MuzzleFlash,
        ParticleKind::BulletSpark,
        ParticleKind::LauncherSmoke,
        ParticleKind::RocketTrail { heading: 1.0 },
        ParticleKind::Explosion,
        ParticleKind::Exhaust {
            heading: 0.3,
            size: 12.0,
            speed: 1.5,
        },
    ]
}

// Expired exactly once the summed deltas reach the lifetime, never before.
#[test]
fn expires_when_elapsed_reaches_lifetime() {
    for kind in kinds() {
        for dt in [0.016_f32, 0.05, 0.1, 0.125, 0.3] {
            let mut p = Particle::new(Vec2::ZERO, kind);
            let lifetime = p.lifetime();
            let mut elapsed = 0.0_f32;
            for _ in 0..200 {
                p.tick(dt);
                elapsed += dt;
                assert_eq!(p.expired(), elapsed >= lifetime, "{kind:?} at {elapsed}");
                if p.expired() {
                    break;
                }
            }
            assert!(p.expired(), "{kind:?} never expired with dt {dt}");
        }
    }
}

// Opacity never goes negative and progress ends at 1.
#[test]
fn appearance_stays_in_range() {
    for kind in kinds() {
        let mut p = Particle::new(Vec2::new(10.0, 10.0), kind);
        while !p.expired() {
            let props = p.tick(0.05);
            if let Some(opacity) = props.opacity {
                assert!((0.0..=1.0).contains(&opacity), "{kind:?} opacity {opacity}");
            }
            assert!(props.width.unwrap_or(0.0) >= 0.0);
        }
        assert_eq!(p.progress(), 1.0);
        assert_eq!(p.remaining(), 0.0);
    }
}
