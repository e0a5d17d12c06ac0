//! Transient game entities.
//!
//! Two homogeneous collections are ticked once per frame: game objects (turrets
//! and their projectiles) and cosmetic particles. An entity and the shapes that
//! draw it live and die together: [`Entities`] attaches the shapes when an entity
//! is added and detaches them in the same step that drops the entity.

use glam::Vec2;
use rand::rngs::StdRng;

use crate::config::Tuning;
use crate::error::Result;
use crate::surface::{Layer, Props, Shape, ShapeId, Surface};

pub mod particle;
pub mod projectile;
pub mod turret;

pub use particle::{Particle, ParticleKind};
pub use projectile::{Bullet, Rocket};
pub use turret::{AntiAir, Gatling};

/// Everything an entity may read or produce during one tick.
pub struct TickContext<'a> {
    pub dt: f32,
    /// Seconds since the game started.
    pub clock: f32,
    pub player: Vec2,
    pub rng: &'a mut StdRng,
    pub tuning: &'a Tuning,
    /// Objects created this tick; they start ticking next frame.
    pub spawned: Vec<GameObject>,
    pub particles: Vec<Particle>,
    /// Longest camera rumble requested this tick.
    pub rumble: Option<f32>,
}

impl<'a> TickContext<'a> {
    pub fn new(dt: f32, clock: f32, player: Vec2, rng: &'a mut StdRng, tuning: &'a Tuning) -> Self {
        Self {
            dt,
            clock,
            player,
            rng,
            tuning,
            spawned: Vec::new(),
            particles: Vec::new(),
            rumble: None,
        }
    }

    pub fn spawn(&mut self, object: GameObject) {
        self.spawned.push(object);
    }

    pub fn emit(&mut self, pos: Vec2, kind: ParticleKind) {
        self.particles.push(Particle::new(pos, kind));
    }

    pub fn rumble(&mut self, seconds: f32) {
        self.rumble = Some(self.rumble.map_or(seconds, |r| r.max(seconds)));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameObject {
    Gatling(Gatling),
    AntiAir(AntiAir),
    Bullet(Bullet),
    Rocket(Rocket),
}

impl From<Gatling> for GameObject {
    fn from(g: Gatling) -> Self {
        GameObject::Gatling(g)
    }
}

impl From<AntiAir> for GameObject {
    fn from(a: AntiAir) -> Self {
        GameObject::AntiAir(a)
    }
}

impl From<Bullet> for GameObject {
    fn from(b: Bullet) -> Self {
        GameObject::Bullet(b)
    }
}

impl From<Rocket> for GameObject {
    fn from(r: Rocket) -> Self {
        GameObject::Rocket(r)
    }
}

impl GameObject {
    /// Advance one frame; `true` means the object is done and must be removed.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> bool {
        match self {
            GameObject::Gatling(g) => g.tick(ctx),
            GameObject::AntiAir(a) => a.tick(ctx),
            GameObject::Bullet(b) => b.tick(ctx),
            GameObject::Rocket(r) => r.tick(ctx),
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            GameObject::Gatling(g) => g.pos,
            GameObject::AntiAir(a) => a.pos,
            GameObject::Bullet(b) => b.tip(),
            GameObject::Rocket(r) => r.pos,
        }
    }

    pub fn is_turret(&self) -> bool {
        matches!(self, GameObject::Gatling(_) | GameObject::AntiAir(_))
    }

    /// Shapes drawing this object with their initial properties.
    fn shapes(&self) -> Vec<(Shape, Props)> {
        match self {
            GameObject::Gatling(g) => vec![
                (Shape::Sprite("#gatling-base"), g.base_props()),
                (Shape::Sprite("#gatling-gun"), g.gun_props()),
            ],
            GameObject::AntiAir(a) => vec![(Shape::Sprite("#anti-air-base"), a.props())],
            GameObject::Bullet(b) => vec![(Shape::Path, b.initial_props())],
            GameObject::Rocket(r) => vec![(Shape::Sprite("#rocket"), r.appearance())],
        }
    }

    /// Per-frame updates, one entry per shape from [`GameObject::shapes`]; `None`
    /// leaves a static shape alone.
    fn appearance(&self) -> Vec<Option<Props>> {
        match self {
            GameObject::Gatling(g) => vec![None, Some(g.gun_props())],
            GameObject::AntiAir(_) => vec![None],
            GameObject::Bullet(b) => vec![Some(b.appearance())],
            GameObject::Rocket(r) => vec![Some(r.appearance())],
        }
    }
}

struct Tracked<T> {
    entity: T,
    shapes: Vec<ShapeId>,
}

/// Owner of all live game objects and particles.
#[derive(Default)]
pub struct Entities {
    objects: Vec<Tracked<GameObject>>,
    particles: Vec<Tracked<Particle>>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: GameObject, surface: &mut dyn Surface) -> Result<()> {
        let mut shapes = Vec::new();
        for (shape, props) in object.shapes() {
            shapes.push(surface.create(Layer::World, shape, &props)?);
        }
        self.objects.push(Tracked {
            entity: object,
            shapes,
        });
        Ok(())
    }

    pub fn add_particle(&mut self, particle: Particle, surface: &mut dyn Surface) -> Result<()> {
        let id = surface.create(Layer::Effects, Shape::Rect, &particle.initial_props())?;
        self.particles.push(Tracked {
            entity: particle,
            shapes: vec![id],
        });
        Ok(())
    }

    /// Tick every game object, drop the expired ones and attach whatever they
    /// spawned. Returns the camera rumble requested this frame, if any.
    pub fn tick_objects(
        &mut self,
        ctx: &mut TickContext<'_>,
        surface: &mut dyn Surface,
    ) -> Result<Option<f32>> {
        let mut i = 0;
        while i < self.objects.len() {
            let tracked = &mut self.objects[i];
            if tracked.entity.tick(ctx) {
                let gone = self.objects.remove(i);
                detach(&gone.shapes, surface)?;
                continue;
            }
            for (id, props) in tracked.shapes.iter().zip(tracked.entity.appearance()) {
                if let Some(props) = props {
                    surface.update(*id, &props)?;
                }
            }
            i += 1;
        }

        for object in std::mem::take(&mut ctx.spawned) {
            self.add_object(object, surface)?;
        }
        for particle in std::mem::take(&mut ctx.particles) {
            self.add_particle(particle, surface)?;
        }
        Ok(ctx.rumble.take())
    }

    /// Age every particle by `dt`, redraw it and drop the ones whose life ran out.
    pub fn tick_particles(&mut self, dt: f32, surface: &mut dyn Surface) -> Result<()> {
        let mut i = 0;
        while i < self.particles.len() {
            let tracked = &mut self.particles[i];
            let props = tracked.entity.tick(dt);
            if tracked.entity.expired() {
                let gone = self.particles.remove(i);
                detach(&gone.shapes, surface)?;
                continue;
            }
            for id in &tracked.shapes {
                surface.update(*id, &props)?;
            }
            i += 1;
        }
        Ok(())
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter().map(|t| &t.entity)
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().map(|t| &t.entity)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Shapes currently attached on behalf of entities.
    pub fn shape_count(&self) -> usize {
        self.objects.iter().map(|t| t.shapes.len()).sum::<usize>()
            + self.particles.iter().map(|t| t.shapes.len()).sum::<usize>()
    }
}

fn detach(shapes: &[ShapeId], surface: &mut dyn Surface) -> Result<()> {
    for id in shapes {
        surface.remove(*id)?;
    }
    Ok(())
}
