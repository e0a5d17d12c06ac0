//! Rendering surface abstraction.
//!
//! The simulation only creates shapes on a layer, updates their properties and
//! removes them again, plus updates a handful of pre-existing named elements
//! (plane, gauges, readouts, camera group). The browser implementation lives in
//! `web`; [`HeadlessSurface`] records everything in memory for tests and native runs.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::error::Result;

/// Layers the game draws into, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Ground polygons.
    Background,
    /// Wall rocks.
    Foreground,
    /// Particles.
    Effects,
    /// Turrets and projectiles.
    World,
}

impl Layer {
    pub fn element_id(self) -> &'static str {
        match self {
            Layer::Background => "bg",
            Layer::Foreground => "fg",
            Layer::Effects => "particles",
            Layer::World => "elems",
        }
    }
}

/// Elements that exist in the page before the game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Named {
    Plane,
    PlaneProp,
    /// Every element painted with the plane's body colour.
    PlaneBody,
    /// Group holding all world-space layers; moved to follow the plane.
    Camera,
    GasGauge,
    RpmGauge,
    AltitudeText,
    TitleText,
}

impl Named {
    /// CSS selector of the element(s).
    pub fn selector(self) -> &'static str {
        match self {
            Named::Plane => "#plane",
            Named::PlaneProp => "#plane-prop",
            Named::PlaneBody => ".plane-body",
            Named::Camera => "#world",
            Named::GasGauge => "#gas-gauge",
            Named::RpmGauge => "#rpm-gauge",
            Named::AltitudeText => "#alt-text",
            Named::TitleText => "#title-text",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect,
    Path,
    Polygon,
    /// Instance of a reusable symbol, e.g. `#rocket`.
    Sprite(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Vec2),
    /// Degrees, optionally about a pivot.
    Rotate(f32, Option<Vec2>),
    Scale(Vec2),
}

/// Ordered list of transform operations, applied left to right like SVG.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform(pub Vec<TransformOp>);

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(mut self, by: Vec2) -> Self {
        self.0.push(TransformOp::Translate(by));
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.0.push(TransformOp::Rotate(degrees, None));
        self
    }

    pub fn rotate_about(mut self, degrees: f32, pivot: Vec2) -> Self {
        self.0.push(TransformOp::Rotate(degrees, Some(pivot)));
        self
    }

    pub fn scale(mut self, x: f32, y: f32) -> Self {
        self.0.push(TransformOp::Scale(Vec2::new(x, y)));
        self
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                TransformOp::Translate(v) => write!(f, "translate({} {})", v.x, v.y)?,
                TransformOp::Rotate(d, None) => write!(f, "rotate({d})")?,
                TransformOp::Rotate(d, Some(p)) => write!(f, "rotate({d} {} {})", p.x, p.y)?,
                TransformOp::Scale(s) => write!(f, "scale({} {})", s.x, s.y)?,
            }
        }
        Ok(())
    }
}

/// Visual properties; `None` leaves the current value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub ry: Option<f32>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f32>,
    pub stroke_dasharray: Option<String>,
    pub opacity: Option<f32>,
    pub font_size: Option<f32>,
    pub transform: Option<Transform>,
    /// Path data (`d`).
    pub path: Option<String>,
    /// Polygon outline.
    pub points: Option<Vec<Vec2>>,
    pub text: Option<String>,
}

impl Props {
    /// Square of side `size` centered on `center`.
    pub fn square(center: Vec2, size: f32) -> Self {
        Props {
            x: Some(center.x - size / 2.0),
            y: Some(center.y - size / 2.0),
            width: Some(size),
            height: Some(size),
            ..Props::default()
        }
    }

    /// Non-`None` fields of `other` replace ours.
    pub fn merge(&mut self, other: &Props) {
        macro_rules! take {
            ($($field:ident),*) => {
                $( if other.$field.is_some() { self.$field = other.$field.clone(); } )*
            };
        }
        take!(
            x, y, width, height, ry, fill, stroke, stroke_width, stroke_dasharray, opacity,
            font_size, transform, path, points, text
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

pub trait Surface {
    fn create(&mut self, layer: Layer, shape: Shape, props: &Props) -> Result<ShapeId>;
    fn update(&mut self, id: ShapeId, props: &Props) -> Result<()>;
    fn remove(&mut self, id: ShapeId) -> Result<()>;
    fn set_named(&mut self, name: Named, props: &Props) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub layer: Layer,
    pub shape: Shape,
    pub props: Props,
}

/// In-memory surface: keeps the merged properties of every live shape and named element.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    shapes: HashMap<ShapeId, Recorded>,
    named: HashMap<Named, Props>,
    next_id: u32,
    removed: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Recorded> {
        self.shapes.get(&id)
    }

    pub fn named(&self, name: Named) -> Option<&Props> {
        self.named.get(&name)
    }

    pub fn live(&self) -> usize {
        self.shapes.len()
    }

    pub fn live_in(&self, layer: Layer) -> usize {
        self.shapes.values().filter(|r| r.layer == layer).count()
    }

    pub fn shapes_in(&self, layer: Layer) -> impl Iterator<Item = &Recorded> {
        self.shapes.values().filter(move |r| r.layer == layer)
    }

    /// Total shapes removed so far.
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl Surface for HeadlessSurface {
    fn create(&mut self, layer: Layer, shape: Shape, props: &Props) -> Result<ShapeId> {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(
            id,
            Recorded {
                layer,
                shape,
                props: props.clone(),
            },
        );
        Ok(id)
    }

    fn update(&mut self, id: ShapeId, props: &Props) -> Result<()> {
        debug_assert!(self.shapes.contains_key(&id), "update of detached shape {id:?}");
        if let Some(rec) = self.shapes.get_mut(&id) {
            rec.props.merge(props);
        }
        Ok(())
    }

    fn remove(&mut self, id: ShapeId) -> Result<()> {
        if self.shapes.remove(&id).is_some() {
            self.removed += 1;
        }
        Ok(())
    }

    fn set_named(&mut self, name: Named, props: &Props) -> Result<()> {
        self.named.entry(name).or_default().merge(props);
        Ok(())
    }
}
