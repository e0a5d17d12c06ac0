//! Cockpit overlay: gas and rpm gauges, the intro title and the altitude readout.

use std::f32::consts::PI;

use glam::Vec2;

use crate::math::{Rgb, lerp_color, radial_line_path};
use crate::surface::{Props, Transform};

const GAUGE_CENTER: Vec2 = Vec2::new(150.0, 150.0);
const NEEDLE_INNER: f32 = 15.0;
const NEEDLE_OUTER: f32 = 75.0;
const LOW_FUEL: f32 = 0.2;

/// Second-order smoothing for gauge needles: the needle accelerates toward its
/// target and the velocity bleeds off, which gives a slight, settling overshoot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringFilter {
    value: f32,
    velocity: f32,
    stiffness: f32,
    damping: f32,
    gain: f32,
}

impl SpringFilter {
    pub fn new(value: f32, stiffness: f32, damping: f32, gain: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            stiffness,
            damping,
            gain,
        }
    }

    pub fn gas() -> Self {
        Self::new(1.0, 0.8, 3.0, 20.0)
    }

    pub fn rpm() -> Self {
        Self::new(0.0, 0.8, 6.0, 40.0)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        self.velocity += (target - self.value) * self.stiffness * dt;
        self.velocity -= self.damping * self.velocity * dt;
        self.value += self.velocity * dt * self.gain;
        self.value
    }
}

fn needle(rad: f32) -> String {
    radial_line_path(GAUGE_CENTER, NEEDLE_INNER, NEEDLE_OUTER, rad)
}

/// Gas needle for `amount` in `[0, 1]`; blinks orange/yellow when low. `clock` in seconds.
pub fn gas_gauge(amount: f32, clock: f32) -> Props {
    let stroke = if amount < LOW_FUEL {
        let blink = (clock * 10.0).sin() * 0.5 + 0.5;
        lerp_color(Rgb::from_u32(0xff7722), Rgb::from_u32(0xffff22), blink)
    } else {
        Rgb::from_u32(0x77ff22)
    };
    Props {
        path: Some(needle(PI * ((1.0 - amount) * 1.28 + 0.22))),
        stroke: Some(stroke.to_string()),
        ..Props::default()
    }
}

pub fn rpm_gauge(amount: f32) -> Props {
    Props {
        path: Some(needle(PI * ((1.0 - amount) * 1.67 + 1.67))),
        ..Props::default()
    }
}

/// Title card animation played once at startup: rise in, wobble, fly out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleIntro {
    remaining: f32,
    duration: f32,
}

impl TitleIntro {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            remaining: duration,
            duration,
        }
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance by `dt` and return the title's properties, or `None` once finished.
    /// The frame on which the intro ends still yields a fully faded title.
    pub fn advance(&mut self, dt: f32, view: Vec2) -> Option<Props> {
        if self.is_done() {
            return None;
        }
        self.remaining = (self.remaining - dt).max(0.0);

        let center = view / 2.0;
        let rise = self.duration * 0.375;
        let wobble = self.duration * 0.25;
        let r = self.remaining;

        let props = if r > self.duration - rise {
            let grad = (self.duration - r) / rise;
            Props {
                x: Some(center.x),
                y: Some(center.y + 200.0 - grad.powi(3) * 200.0),
                font_size: Some(grad.powi(3) * 100.0 + 20.0),
                opacity: Some(grad * 0.6),
                ..Props::default()
            }
        } else if r < rise {
            let grad = r / rise;
            Props {
                x: Some(center.x),
                y: Some(center.y - (1.0 - grad) * 500.0),
                font_size: Some(grad.powi(2) * 20.0 + 100.0),
                opacity: Some(grad * 0.6),
                fill: Some("white".to_string()),
                transform: Some(Transform::new().rotate(0.0)),
                ..Props::default()
            }
        } else {
            let grad = (r - rise) / wobble;
            Props {
                x: Some(center.x),
                y: Some(center.y),
                font_size: Some((grad * PI).sin() * 15.0 + 120.0),
                fill: Some("#9999ff".to_string()),
                transform: Some(
                    Transform::new().rotate_about((grad * PI * 2.0).sin() * 4.0, center),
                ),
                opacity: Some(0.9),
                ..Props::default()
            }
        };
        Some(props)
    }
}

/// Best altitude milestone with a glow pulse whenever a new one is reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AltitudeReadout {
    best: u32,
    glow: f32,
    milestone: f32,
}

impl AltitudeReadout {
    pub fn new(best: u32, milestone: f32) -> Self {
        Self {
            best,
            glow: 0.0,
            milestone: milestone.max(f32::EPSILON),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn glow(&self) -> f32 {
        self.glow
    }

    /// Decay the glow and check the plane's screen `y`. Returns the new best
    /// milestone the first time it is reached.
    pub fn update(&mut self, y: f32, dt: f32) -> Option<u32> {
        self.glow -= self.glow * dt * 5.0;
        let level = (-y / self.milestone).floor();
        if level > self.best as f32 {
            self.best = level as u32;
            self.glow = 1.0;
            return Some(self.best);
        }
        None
    }

    pub fn props(&self) -> Props {
        Props {
            opacity: Some(self.glow * 0.6 + 0.4),
            font_size: Some(self.glow * 5.0 + 30.0),
            y: Some(80.0 + self.glow * 2.5),
            ..Props::default()
        }
    }
}
