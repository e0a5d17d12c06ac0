//! Small vector / interpolation helpers shared by terrain, flight and effects.
//!
//! Vectors are `glam::Vec2`; only the operations glam does not already spell the
//! way the game uses them live here (polar construction, screen-space line paths,
//! the jittered random helpers and the terrain smoothing curve).

use std::fmt;

use glam::Vec2;
use rand::Rng;

/// Random number around `number` within `number ± bounds` (uniform).
pub fn fuzz<R: Rng + ?Sized>(rng: &mut R, number: f32, bounds: f32) -> f32 {
    number + 2.0 * bounds * (rng.r#gen::<f32>() - 0.5)
}

/// Clamp without the `min <= max` panic of `f32::clamp`; `min` wins on inverted bounds.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

/// Approximate gaussian around `mu`: sum of 20 uniforms, centered, clamped to ±2σ.
pub fn gauss<R: Rng + ?Sized>(rng: &mut R, mu: f32, sigma: f32) -> f32 {
    let sum: f32 = (0..20).map(|_| rng.r#gen::<f32>()).sum();
    mu + sigma * clamp(sum - 10.0, -2.0, 2.0)
}

/// Angle of the segment `p0 -> p1`.
pub fn angle(p0: Vec2, p1: Vec2) -> f32 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

pub fn from_polar(theta: f32, mag: f32) -> Vec2 {
    Vec2::new(theta.cos() * mag, theta.sin() * mag)
}

/// Rotate `v` counter-clockwise by `rad` radians.
pub fn rotate(v: Vec2, rad: f32) -> Vec2 {
    Vec2::from_angle(rad).rotate(v)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn to_degrees(rad: f32) -> f32 {
    rad.to_degrees()
}

/// Cubic in the normalized distance `d ∈ [0, 1]` between two control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cubic {
    a0: f32,
    a1: f32,
    a2: f32,
    a3: f32,
}

impl Cubic {
    pub fn at(&self, d: f32) -> f32 {
        ((self.a0 * d + self.a1) * d + self.a2) * d + self.a3
    }

    /// Derivative with respect to `d`.
    pub fn slope_at(&self, d: f32) -> f32 {
        (3.0 * self.a0 * d + 2.0 * self.a1) * d + self.a2
    }
}

/// Smooth curve from `start.x` to `stop.x` using `lead` and `trail` to pick the
/// slopes at both ends. The end slopes only depend on the three points around
/// each joint, so consecutive segments of a point chain meet with equal slope.
pub fn smoothstep(lead: Vec2, start: Vec2, stop: Vec2, trail: Vec2) -> Cubic {
    let s1 = ((angle(stop, start) + angle(lead, start)) / 2.0).tan();
    let s2 = ((angle(trail, stop) + angle(start, stop)) / 2.0).tan();
    let span = stop.x - start.x;
    Cubic {
        a0: s2 + s1 - 2.0 * span,
        a1: 3.0 * span - (s2 + 2.0 * s1),
        a2: s1,
        a3: start.x,
    }
}

/// 24-bit colour used for fills and strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    pub const fn from_u32(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    /// Channel-wise blend, `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| clamp(lerp(a as f32, b as f32, t), 0.0, 255.0) as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    a.lerp(b, t)
}

/// CSS grey of the given shade.
pub fn gray(shade: u8) -> String {
    format!("rgb({shade},{shade},{shade})")
}

/// SVG path for the radial line from `start` to `stop` around `center`, pointing
/// at `rad` measured counter-clockwise on screen (screen y grows downward).
pub fn radial_line_path(center: Vec2, start: f32, stop: f32, rad: f32) -> String {
    let a = center + Vec2::new((-rad).cos(), (-rad).sin()) * start;
    let b = center + Vec2::new((-rad).cos(), (-rad).sin()) * stop;
    format!("M {} {} L {} {}", a.x, a.y, b.x, b.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f32::consts::PI;

    #[test]
    fn test_gauss_stays_within_two_sigma() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = gauss(&mut rng, 3.0, 0.5);
            assert!((2.0..=4.0).contains(&v), "{v} outside ±2σ");
        }
    }

    #[test]
    fn test_fuzz_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = fuzz(&mut rng, 0.8, 0.2);
            assert!((0.6..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_smoothstep_hits_endpoints() {
        let configs = [
            [(0.0, -0.5), (0.1, 0.0), (-0.2, 0.5), (0.3, 1.0)],
            [(1.0, 0.0), (0.0, 1.0), (2.0, 2.0), (-3.0, 3.0)],
            [(0.0, 0.0), (0.0, 0.5), (0.0, 1.0), (0.0, 1.5)],
        ];
        for cfg in configs {
            let [l, a, b, t] = cfg.map(|(x, y)| Vec2::new(x, y));
            let c = smoothstep(l, a, b, t);
            assert!((c.at(0.0) - a.x).abs() < 1e-5);
            assert!((c.at(1.0) - b.x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_smoothstep_joins_with_equal_slope() {
        let pts: Vec<Vec2> = [(0.0, 0.0), (0.1, 0.5), (-0.1, 1.0), (0.2, 1.5), (0.0, 2.0)]
            .iter()
            .map(|&(x, y)| Vec2::new(x, y))
            .collect();
        let first = smoothstep(pts[0], pts[1], pts[2], pts[3]);
        let second = smoothstep(pts[1], pts[2], pts[3], pts[4]);
        assert!((first.slope_at(1.0) - second.slope_at(0.0)).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_color_endpoints_and_midpoint() {
        let a = Rgb::parse("#cccc00").unwrap();
        assert_eq!(lerp_color(a, Rgb::BLACK, 0.0), a);
        assert_eq!(lerp_color(a, Rgb::BLACK, 1.0), Rgb::BLACK);
        assert_eq!(lerp_color(a, Rgb::BLACK, 0.5).to_string(), "#666600");
        assert_eq!(Rgb::parse("nope"), None);
    }

    #[test]
    fn test_rotate_and_polar() {
        let v = rotate(Vec2::X, PI / 2.0);
        assert!((v - Vec2::Y).length() < 1e-6);
        let p = from_polar(PI, 2.0);
        assert!((p - Vec2::new(-2.0, 0.0)).length() < 1e-5);
        assert!((angle(Vec2::ZERO, Vec2::new(0.0, 1.0)) - PI / 2.0).abs() < 1e-6);
    }
}
