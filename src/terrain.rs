//! Endless canyon terrain.
//!
//! A centerline random walk climbs in fixed altitude steps; each step between two
//! centerline points becomes a segment whose left and right walls are smooth
//! cubics through the neighbouring points. Walls are sampled into cross-sections
//! of decorative rocks, and cross-sections are batched into groups that the frame
//! loop reveals one at a time as the plane climbs.
//!
//! Terrain coordinates: `x` is the horizontal offset and `y` the altitude, both in
//! viewport units (see [`to_screen`]).

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::TerrainParams;
use crate::lazy::{Generator, Grouped, LazyList};
use crate::math::{Cubic, fuzz, gauss, smoothstep};

/// One point of the centerline random walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPoint {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

impl TerrainPoint {
    fn left(&self) -> Vec2 {
        Vec2::new(self.x - self.width / 2.0, self.y)
    }

    fn right(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y)
    }
}

/// Decorative square on a canyon wall. `rot` is in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rock {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub size: f32,
}

impl Rock {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossSection {
    pub left: Rock,
    pub right: Rock,
}

pub type TerrainGroup = Vec<CrossSection>;

/// Terrain units to screen pixels for a viewport whose smaller side is `scale`.
pub fn to_screen(p: Vec2, scale: f32) -> Vec2 {
    Vec2::new(scale * p.x, scale * (1.0 - p.y))
}

/// Mixes a seed with a stream offset so independent generators never share a sequence.
fn derive_seed(seed: u64, offset: u64) -> u64 {
    seed.wrapping_add(offset)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .rotate_left(31)
        ^ offset.wrapping_mul(0x6c07_8965)
}

struct Centerline {
    rng: StdRng,
    last_x: f32,
    y: f32,
    params: TerrainParams,
}

impl Generator for Centerline {
    type Item = TerrainPoint;

    fn generate(&mut self) -> TerrainPoint {
        self.last_x = gauss(&mut self.rng, self.last_x, self.params.drift_sigma);
        let point = TerrainPoint {
            x: self.last_x,
            y: self.y,
            width: fuzz(&mut self.rng, self.params.width_mean, self.params.width_jitter),
        };
        self.y += self.params.point_step;
        point
    }
}

/// Wall curves of the segment currently being sampled.
#[derive(Clone, Copy)]
struct Segment {
    left: Cubic,
    right: Cubic,
    y0: f32,
    y1: f32,
}

struct CrossSections {
    path: LazyList<Centerline>,
    rng: StdRng,
    params: TerrainParams,
    index: usize,
    sample: usize,
    segment: Option<Segment>,
}

impl CrossSections {
    fn build_segment(&mut self) -> Segment {
        let i = self.index;
        let lead = if i >= 1 {
            *self.path.get(i - 1)
        } else {
            TerrainPoint {
                x: 0.0,
                y: -self.params.point_step,
                width: 0.5,
            }
        };
        let start = *self.path.get(i);
        let stop = *self.path.get(i + 1);
        let trail = *self.path.get(i + 2);
        Segment {
            left: smoothstep(lead.left(), start.left(), stop.left(), trail.left()),
            right: smoothstep(lead.right(), start.right(), stop.right(), trail.right()),
            y0: start.y,
            y1: stop.y,
        }
    }

    fn rock(&mut self, x: f32, y: f32, base_rot: f32) -> Rock {
        Rock {
            x,
            y,
            rot: fuzz(&mut self.rng, base_rot + 45.0, 45.0),
            size: gauss(&mut self.rng, self.params.rock_size_mean, self.params.rock_size_sigma),
        }
    }
}

impl Generator for CrossSections {
    type Item = CrossSection;

    fn generate(&mut self) -> CrossSection {
        let segment = match self.segment.take() {
            Some(segment) => segment,
            None => self.build_segment(),
        };
        let d = self.sample as f32 / self.params.samples_per_segment as f32;
        let y = segment.y0 + d * (segment.y1 - segment.y0);
        let section = CrossSection {
            left: self.rock(segment.left.at(d), y, 180.0),
            right: self.rock(segment.right.at(d), y, 0.0),
        };
        self.sample += 1;
        if self.sample >= self.params.samples_per_segment {
            self.sample = 0;
            self.index += 1;
        } else {
            self.segment = Some(segment);
        }
        section
    }
}

/// Lazily generated, cached terrain groups. Group `i` requires groups `0..i`, so
/// the same seed always yields the same terrain regardless of access pattern.
pub struct Terrain {
    groups: LazyList<Grouped<CrossSections>>,
    group_size: usize,
}

impl Terrain {
    pub fn new(seed: u64, params: &TerrainParams) -> Self {
        debug_assert!(params.samples_per_segment > 0 && params.group_size > 0);
        let mut params = params.clone();
        params.samples_per_segment = params.samples_per_segment.max(1);
        params.group_size = params.group_size.max(1);

        let path = LazyList::new(Centerline {
            rng: StdRng::seed_from_u64(derive_seed(seed, 1)),
            last_x: 0.0,
            y: 0.0,
            params: params.clone(),
        });
        let sections = CrossSections {
            path,
            rng: StdRng::seed_from_u64(derive_seed(seed, 2)),
            params: params.clone(),
            index: 0,
            sample: 0,
            segment: None,
        };
        Self {
            groups: LazyList::new(sections.grouped(params.group_size)),
            group_size: params.group_size,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group(&mut self, index: usize) -> &[CrossSection] {
        self.groups.get(index)
    }

    /// Groups generated so far.
    pub fn generated(&self) -> usize {
        self.groups.len()
    }

    /// Altitude of the last cross-section of group `index`.
    pub fn top(&mut self, index: usize) -> f32 {
        self.last_section(index).left.y
    }

    fn last_section(&mut self, index: usize) -> CrossSection {
        let group = self.groups.get(index);
        group[group.len() - 1]
    }

    /// Last left/right wall points of the previous group, which the ground polygon of
    /// `index` starts and ends on so adjacent polygons share an edge.
    pub fn stitch(&mut self, index: usize) -> Option<(Vec2, Vec2)> {
        if index == 0 {
            return None;
        }
        let last = self.last_section(index - 1);
        Some((last.left.position(), last.right.position()))
    }

    /// Closed ground outline of group `index` in terrain units: previous group's last
    /// left point, this group's left wall upward, its right wall downward, previous
    /// group's last right point.
    pub fn ground_polygon(&mut self, index: usize) -> Vec<Vec2> {
        let stitch = self.stitch(index);
        let group = self.groups.get(index);
        let mut points = Vec::with_capacity(group.len() * 2 + 2);
        if let Some((left, _)) = stitch {
            points.push(left);
        }
        points.extend(group.iter().map(|s| s.left.position()));
        points.extend(group.iter().rev().map(|s| s.right.position()));
        if let Some((_, right)) = stitch {
            points.push(right);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centerline_climbs_in_fixed_steps() {
        let params = TerrainParams::default();
        let mut path = LazyList::new(Centerline {
            rng: StdRng::seed_from_u64(3),
            last_x: 0.0,
            y: 0.0,
            params: params.clone(),
        });
        for i in 0..50 {
            let p = *path.get(i);
            assert!((p.y - i as f32 * params.point_step).abs() < 1e-4);
            assert!((0.6..=1.0).contains(&p.width));
        }
        for i in 1..50 {
            let dx = path.get(i).x - path.get(i - 1).x;
            assert!(dx.abs() <= 2.0 * params.drift_sigma + 1e-6);
        }
    }

    #[test]
    fn test_group_altitudes_are_monotonic() {
        let mut terrain = Terrain::new(11, &TerrainParams::default());
        let mut last = f32::MIN;
        for g in 0..5 {
            for s in terrain.group(g).to_vec() {
                assert!(s.left.y > last);
                assert_eq!(s.left.y, s.right.y);
                assert!(s.left.x < s.right.x);
                last = s.left.y;
            }
        }
        assert_eq!(terrain.generated(), 5);
    }

    #[test]
    fn test_rocks_are_jittered_within_range() {
        let mut terrain = Terrain::new(5, &TerrainParams::default());
        for s in terrain.group(0) {
            assert!((180.0..=270.0).contains(&s.left.rot));
            assert!((0.0..=90.0).contains(&s.right.rot));
            assert!((0.029..=0.111).contains(&s.left.size));
        }
    }

    #[test]
    fn test_wall_curves_meet_at_segment_joints() {
        let params = TerrainParams::default();
        let mut sections = CrossSections {
            path: LazyList::new(Centerline {
                rng: StdRng::seed_from_u64(8),
                last_x: 0.0,
                y: 0.0,
                params: params.clone(),
            }),
            rng: StdRng::seed_from_u64(9),
            params,
            index: 0,
            sample: 0,
            segment: None,
        };
        let segments: Vec<Segment> = (0..30)
            .map(|i| {
                sections.index = i;
                sections.build_segment()
            })
            .collect();
        for pair in segments.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.left.at(1.0) - b.left.at(0.0)).abs() < 1e-4);
            assert!((a.right.at(1.0) - b.right.at(0.0)).abs() < 1e-4);
            assert!((a.left.slope_at(1.0) - b.left.slope_at(0.0)).abs() < 1e-3);
            assert!((a.right.slope_at(1.0) - b.right.slope_at(0.0)).abs() < 1e-3);
            assert_eq!(a.y1, b.y0);
        }
    }

    #[test]
    fn test_first_polygon_has_no_stitch() {
        let mut terrain = Terrain::new(2, &TerrainParams::default());
        assert_eq!(terrain.ground_polygon(0).len(), 40);
        assert_eq!(terrain.ground_polygon(1).len(), 42);
    }

    #[test]
    fn test_to_screen_flips_altitude() {
        let p = to_screen(Vec2::new(0.5, 0.25), 800.0);
        assert_eq!(p, Vec2::new(400.0, 600.0));
    }
}
