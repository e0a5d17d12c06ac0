//! Frame loop state.
//!
//! [`World`] owns everything the game mutates between frames. The browser driver
//! calls [`World::tick`] once per animation frame with the clamped delta from
//! [`FrameClock`]; nothing else touches the state.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Tuning;
use crate::entity::{AntiAir, Entities, GameObject, Gatling, Particle, ParticleKind, TickContext};
use crate::error::Result;
use crate::flight::{Controls, Plane};
use crate::hud::{self, AltitudeReadout, SpringFilter, TitleIntro};
use crate::input::InputState;
use crate::math::{clamp, from_polar, gray, to_degrees};
use crate::storage::{ScoreStore, save_best};
use crate::surface::{Layer, Named, Props, Shape, Surface, Transform};
use crate::terrain::{Rock, Terrain, to_screen};

const PLANE_COLORS: [&str; 7] = ["red", "orange", "yellow", "green", "blue", "indigo", "violet"];
const PLANE_SCALE: f32 = 0.2;
const EXHAUST_OFFSET: f32 = 15.0;
const SHAKE: f32 = 50.0;
const ROCK_FILL: u8 = 85;
const ROCK_GLOW: u8 = 105;

/// Turns animation-frame timestamps into clamped per-frame deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_ms: None,
            max_delta,
        }
    }

    /// Seconds since the previous call, at most `max_delta`. The first call returns 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp(dt, 0.0, self.max_delta)
    }
}

/// Counts frames per wall-clock second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FpsCounter {
    window_start_ms: Option<f64>,
    frames: u32,
}

impl FpsCounter {
    /// Record a frame; returns the finished second's count once a second has passed.
    pub fn frame(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        if now_ms - start > 1000.0 {
            let frames = self.frames;
            self.frames = 0;
            self.window_start_ms = Some(now_ms);
            return Some(frames);
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixels per terrain unit.
    pub fn scale(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

pub struct World {
    tuning: Tuning,
    rng: StdRng,
    plane: Plane,
    entities: Entities,
    terrain: Terrain,
    /// Terrain groups already drawn.
    revealed: usize,
    /// Altitude of the top of the last drawn group, terrain units.
    highest: f32,
    gas: SpringFilter,
    rpm: SpringFilter,
    title: TitleIntro,
    altitude: AltitudeReadout,
    rumble: f32,
    exhaust_timer: f32,
    /// Seconds of simulated time.
    clock: f32,
    body_color: &'static str,
}

impl World {
    pub fn new(seed: u64, tuning: Tuning, best: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let body_color = PLANE_COLORS[rng.gen_range(0..PLANE_COLORS.len())];
        Self {
            terrain: Terrain::new(seed, &tuning.terrain),
            title: TitleIntro::new(tuning.title_duration),
            altitude: AltitudeReadout::new(best, tuning.altitude_milestone),
            tuning,
            rng,
            plane: Plane::new(),
            entities: Entities::new(),
            revealed: 0,
            highest: -1.0,
            gas: SpringFilter::gas(),
            rpm: SpringFilter::rpm(),
            rumble: 0.0,
            exhaust_timer: 0.0,
            clock: 0.0,
            body_color,
        }
    }

    /// Paint the elements that only change once per game.
    pub fn start(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.set_named(
            Named::PlaneBody,
            &Props {
                fill: Some(self.body_color.to_string()),
                ..Props::default()
            },
        )?;
        surface.set_named(
            Named::AltitudeText,
            &Props {
                text: Some(self.altitude.best().to_string()),
                ..self.altitude.props()
            },
        )
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn plane_mut(&mut self) -> &mut Plane {
        &mut self.plane
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn revealed_groups(&self) -> usize {
        self.revealed
    }

    pub fn best_altitude(&self) -> u32 {
        self.altitude.best()
    }

    pub fn title_done(&self) -> bool {
        self.title.is_done()
    }

    pub fn rumble(&self) -> f32 {
        self.rumble
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn body_color(&self) -> &'static str {
        self.body_color
    }

    /// Add an object (turret or projectile) to the world.
    pub fn spawn(&mut self, object: GameObject, surface: &mut dyn Surface) -> Result<()> {
        self.entities.add_object(object, surface)
    }

    /// Run one frame.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &InputState,
        view: Viewport,
        surface: &mut dyn Surface,
        store: &mut dyn ScoreStore,
    ) -> Result<()> {
        debug_assert!(dt >= 0.0, "negative frame delta {dt}");
        let dt = clamp(dt, 0.0, self.tuning.max_frame_delta);
        self.clock += dt;

        if let Some(props) = self.title.advance(dt, view.size()) {
            surface.set_named(Named::TitleText, &props)?;
        }

        let mut ctx = TickContext::new(dt, self.clock, self.plane.pos, &mut self.rng, &self.tuning);
        if let Some(rumble) = self.entities.tick_objects(&mut ctx, surface)? {
            self.rumble = self.rumble.max(rumble);
        }
        self.entities.tick_particles(dt, surface)?;

        let gas = self.gas.update(self.plane.fuel, dt);
        surface.set_named(Named::GasGauge, &hud::gas_gauge(gas, self.clock))?;

        let controls = input.controls(&self.tuning);
        self.propeller(controls, surface)?;
        self.exhaust(controls, dt, surface)?;

        let report = self.plane.step(controls, dt, &self.tuning);
        let rpm_target = clamp(report.airspeed / self.tuning.max_speed, 0.0, 1.0);
        let rpm = self.rpm.update(rpm_target, dt);
        surface.set_named(Named::RpmGauge, &hud::rpm_gauge(clamp(rpm, 0.0, 1.1)))?;

        surface.set_named(
            Named::Plane,
            &Props {
                transform: Some(
                    Transform::new()
                        .translate(self.plane.pos)
                        .rotate(to_degrees(self.plane.angle))
                        .scale(PLANE_SCALE, PLANE_SCALE),
                ),
                ..Props::default()
            },
        )?;

        let scale = view.scale();
        if scale > 0.0 && 2.0 - self.plane.pos.y / scale > self.highest {
            self.reveal_next(scale, surface)?;
        }

        self.follow_plane(dt, view, surface)?;
        self.plane.enforce_bounds(&self.tuning);

        if let Some(best) = self.altitude.update(self.plane.pos.y, dt) {
            log::info!("new altitude record: {best}");
            save_best(store, best);
            surface.set_named(
                Named::AltitudeText,
                &Props {
                    text: Some(best.to_string()),
                    ..Props::default()
                },
            )?;
        }
        surface.set_named(Named::AltitudeText, &self.altitude.props())
    }

    fn propeller(&self, controls: Controls, surface: &mut dyn Surface) -> Result<()> {
        let t_ms = self.clock * 1000.0;
        let ry = (t_ms * (0.02 + 0.8 * controls.throttle)).sin() * 60.0 + 60.0;
        surface.set_named(
            Named::PlaneProp,
            &Props {
                ry: Some(ry),
                ..Props::default()
            },
        )
    }

    /// Exhaust puffs come faster with throttle.
    fn exhaust(&mut self, controls: Controls, dt: f32, surface: &mut dyn Surface) -> Result<()> {
        self.exhaust_timer -= dt * controls.throttle + dt;
        if self.exhaust_timer >= 0.0 {
            return Ok(());
        }
        self.exhaust_timer = self.tuning.exhaust_interval;
        let heading = self.plane.angle + std::f32::consts::PI / 5.0 + self.rng.r#gen::<f32>() * 0.2 - 0.1;
        let kind = ParticleKind::Exhaust {
            heading,
            size: self.rng.r#gen::<f32>() * 20.0 + 10.0,
            speed: controls.throttle + 1.0,
        };
        let pos = self.plane.pos + from_polar(heading, EXHAUST_OFFSET);
        self.entities.add_particle(Particle::new(pos, kind), surface)
    }

    /// Draw the next terrain group: its ground polygon behind, its rocks in front.
    fn reveal_next(&mut self, scale: f32, surface: &mut dyn Surface) -> Result<()> {
        let index = self.revealed;
        let outline = self
            .terrain
            .ground_polygon(index)
            .into_iter()
            .map(|p| to_screen(p, scale))
            .collect();
        surface.create(
            Layer::Background,
            Shape::Polygon,
            &Props {
                points: Some(outline),
                ..Props::default()
            },
        )?;

        let sections = self.terrain.group(index).to_vec();
        for section in &sections {
            for rock in [section.left, section.right] {
                surface.create(Layer::Foreground, Shape::Rect, &rock_props(rock, scale))?;
            }
        }

        self.highest = self.terrain.top(index);
        self.revealed += 1;
        log::debug!("revealed terrain group {index}, top at {}", self.highest);

        if index >= self.tuning.turret_lead_in && self.rng.r#gen::<f32>() < self.tuning.turret_chance {
            let section = sections[self.rng.gen_range(0..sections.len())];
            let on_left = self.rng.r#gen::<bool>();
            let rock = if on_left { section.left } else { section.right };
            let pos = to_screen(rock.position(), scale);
            let range = self.tuning.turret_range * scale;
            let turret: GameObject = if self.rng.r#gen::<bool>() {
                Gatling::new(pos, on_left, range, self.tuning.gatling_burst).into()
            } else {
                AntiAir::new(pos, on_left, range).into()
            };
            log::debug!("placed turret {turret:?} in group {index}");
            self.entities.add_object(turret, surface)?;
        }
        Ok(())
    }

    /// Center the camera on the plane, shaking while rumble lasts.
    fn follow_plane(&mut self, dt: f32, view: Viewport, surface: &mut dyn Surface) -> Result<()> {
        let mut shake = Vec2::ZERO;
        if self.rumble > 0.0 {
            self.rumble -= dt;
            shake.x = (self.rng.r#gen::<f32>() - 0.5) * self.rumble * SHAKE;
            shake.y = (self.rng.r#gen::<f32>() - 0.5) * self.rumble * SHAKE;
        }
        let offset = -self.plane.pos + view.size() / 2.0 + shake;
        surface.set_named(
            Named::Camera,
            &Props {
                transform: Some(Transform::new().translate(offset)),
                ..Props::default()
            },
        )
    }
}

fn rock_props(rock: Rock, scale: f32) -> Props {
    let side = scale * rock.size;
    let center = to_screen(rock.position(), scale);
    let perimeter = side * 2.0;
    Props {
        fill: Some(gray(ROCK_FILL)),
        stroke: Some(gray(ROCK_GLOW)),
        stroke_width: Some(5.0),
        stroke_dasharray: Some(format!("0 {perimeter} {perimeter}")),
        transform: Some(Transform::new().rotate_about(rock.rot, center)),
        ..Props::square(center, side)
    }
}
