//! Browser glue: SVG rendering surface, localStorage score store, input listeners
//! and the `requestAnimationFrame` driver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Storage, TouchList, Window, window};

use crate::config::Tuning;
use crate::error::{GameError, Result};
use crate::input::{InputState, Key};
use crate::storage::{ScoreStore, load_best};
use crate::surface::{Layer, Named, Props, Shape, ShapeId, Surface};
use crate::world::{FpsCounter, FrameClock, Viewport, World};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const BEST_ALTITUDE_KEY: &str = "maxAlt";

const LAYERS: [Layer; 4] = [Layer::Background, Layer::Foreground, Layer::Effects, Layer::World];

/// Draws into the page's SVG scene. Layers and named elements must already exist.
pub struct SvgSurface {
    document: Document,
    layers: HashMap<Layer, Element>,
    shapes: HashMap<ShapeId, Element>,
    named: HashMap<Named, Vec<Element>>,
    next_id: u32,
}

impl SvgSurface {
    pub fn new(document: Document) -> Result<Self> {
        let mut layers = HashMap::new();
        for layer in LAYERS {
            let el = document
                .get_element_by_id(layer.element_id())
                .ok_or_else(|| GameError::MissingElement(format!("#{}", layer.element_id())))?;
            layers.insert(layer, el);
        }
        // The camera group is required; without it nothing would follow the plane.
        if document.query_selector(Named::Camera.selector())?.is_none() {
            return Err(GameError::MissingElement(Named::Camera.selector().to_string()));
        }
        Ok(Self {
            document,
            layers,
            shapes: HashMap::new(),
            named: HashMap::new(),
            next_id: 0,
        })
    }

    fn named_elements(&mut self, name: Named) -> Result<&[Element]> {
        if !self.named.contains_key(&name) {
            let list = self.document.query_selector_all(name.selector())?;
            let mut found = Vec::with_capacity(list.length() as usize);
            for i in 0..list.length() {
                if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    found.push(el);
                }
            }
            if found.is_empty() {
                log::warn!("no element matches {}", name.selector());
            }
            self.named.insert(name, found);
        }
        Ok(self.named.get(&name).map(Vec::as_slice).unwrap_or_default())
    }
}

fn set(el: &Element, name: &str, value: Option<impl ToString>) -> Result<()> {
    if let Some(value) = value {
        el.set_attribute(name, &value.to_string())?;
    }
    Ok(())
}

fn apply(el: &Element, props: &Props) -> Result<()> {
    set(el, "x", props.x)?;
    set(el, "y", props.y)?;
    set(el, "width", props.width)?;
    set(el, "height", props.height)?;
    set(el, "ry", props.ry)?;
    set(el, "fill", props.fill.as_ref())?;
    set(el, "stroke", props.stroke.as_ref())?;
    set(el, "stroke-width", props.stroke_width)?;
    set(el, "stroke-dasharray", props.stroke_dasharray.as_ref())?;
    set(el, "opacity", props.opacity)?;
    set(el, "font-size", props.font_size)?;
    set(el, "transform", props.transform.as_ref())?;
    set(el, "d", props.path.as_ref())?;
    if let Some(points) = &props.points {
        let points: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        el.set_attribute("points", &points.join(" "))?;
    }
    if let Some(text) = &props.text {
        el.set_text_content(Some(text));
    }
    Ok(())
}

impl Surface for SvgSurface {
    fn create(&mut self, layer: Layer, shape: Shape, props: &Props) -> Result<ShapeId> {
        let tag = match shape {
            Shape::Rect => "rect",
            Shape::Path => "path",
            Shape::Polygon => "polygon",
            Shape::Sprite(_) => "use",
        };
        let el = self.document.create_element_ns(Some(SVG_NS), tag)?;
        if let Shape::Sprite(href) = shape {
            el.set_attribute_ns(Some(XLINK_NS), "xlink:href", href)?;
            el.set_attribute("href", href)?;
        }
        apply(&el, props)?;
        let parent = self
            .layers
            .get(&layer)
            .ok_or_else(|| GameError::MissingElement(format!("#{}", layer.element_id())))?;
        parent.append_child(&el)?;

        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(id, el);
        Ok(id)
    }

    fn update(&mut self, id: ShapeId, props: &Props) -> Result<()> {
        match self.shapes.get(&id) {
            Some(el) => apply(el, props),
            None => {
                debug_assert!(false, "update of detached shape {id:?}");
                Ok(())
            }
        }
    }

    fn remove(&mut self, id: ShapeId) -> Result<()> {
        if let Some(el) = self.shapes.remove(&id) {
            el.remove();
        }
        Ok(())
    }

    fn set_named(&mut self, name: Named, props: &Props) -> Result<()> {
        for el in self.named_elements(name)? {
            apply(el, props)?;
        }
        Ok(())
    }
}

/// Best altitude in `localStorage`.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new(win: &Window) -> Self {
        let storage = match win.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("localStorage unavailable: {err:?}");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| GameError::Storage("localStorage unavailable".into()))
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<Option<f64>> {
        let raw = self
            .storage()?
            .get_item(BEST_ALTITUDE_KEY)
            .map_err(|e| GameError::Storage(format!("{e:?}")))?;
        match raw {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| GameError::Storage(format!("bad {BEST_ALTITUDE_KEY} {raw:?}: {e}"))),
            None => Ok(None),
        }
    }

    fn save(&mut self, best: f64) -> Result<()> {
        self.storage()?
            .set_item(BEST_ALTITUDE_KEY, &best.to_string())
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }
}

struct Game {
    world: World,
    surface: SvgSurface,
    store: LocalStorageStore,
    clock: FrameClock,
    fps: FpsCounter,
}

thread_local! {
    static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
    static INPUT: RefCell<InputState> = RefCell::new(InputState::new());
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn viewport(document: &Document) -> Viewport {
    match document.body() {
        Some(body) => Viewport::new(body.client_width() as f32, body.client_height() as f32),
        None => Viewport::new(0.0, 0.0),
    }
}

/// Average finger position normalized to the page, `None` when no finger is down.
fn average_touch(touches: &TouchList, view: Viewport) -> Option<Vec2> {
    let count = touches.length();
    if count == 0 || view.width <= 0.0 || view.height <= 0.0 {
        return None;
    }
    let mut sum = Vec2::ZERO;
    for i in 0..count {
        if let Some(t) = touches.get(i) {
            sum += Vec2::new(t.client_x() as f32, t.client_y() as f32);
        }
    }
    Some(sum / count as f32 / view.size())
}

/// Build the game against the current page and start the frame loop.
pub fn start(seed: u64, tuning: Tuning) -> Result<()> {
    let win = window().ok_or(GameError::NoWindow)?;
    let document = win.document().ok_or(GameError::NoDocument)?;

    let mut surface = SvgSurface::new(document.clone())?;
    let mut store = LocalStorageStore::new(&win);
    let best = load_best(&mut store);
    log::info!("starting game: seed {seed}, best altitude {best}");

    let clock = FrameClock::new(tuning.max_frame_delta);
    let world = World::new(seed, tuning, best);
    world.start(&mut surface)?;
    GAME.with(|g| {
        *g.borrow_mut() = Some(Game {
            world,
            surface,
            store,
            clock,
            fps: FpsCounter::default(),
        })
    });

    add_listeners(&document)?;
    start_loop();
    Ok(())
}

fn add_listeners(document: &Document) -> Result<()> {
    for (event, down) in [("keydown", true), ("keyup", false)] {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if let Some(key) = Key::from_code(&evt.code()) {
                INPUT.with(|input| input.borrow_mut().set_key(key, down));
            }
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for event in ["touchstart", "touchmove", "touchend", "touchcancel"] {
        let doc = document.clone();
        // Must not cancel: the click that follows a tap requests fullscreen.
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            let touch = average_touch(&evt.touches(), viewport(&doc));
            INPUT.with(|input| input.borrow_mut().set_touch(touch));
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let doc = document.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            evt.prevent_default();
            if let Some(root) = doc.document_element() {
                if let Err(err) = root.request_fullscreen() {
                    log::debug!("fullscreen refused: {err:?}");
                }
            }
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// One animation frame. Returns `false` once the loop should stop.
fn frame(now_ms: f64) -> bool {
    let input = INPUT.with(|input| input.borrow().clone());
    GAME.with(|cell| {
        let mut cell = cell.borrow_mut();
        let Some(game) = cell.as_mut() else {
            return false;
        };
        if let Some(fps) = game.fps.frame(now_ms) {
            log::trace!("{fps} fps");
        }
        let dt = game.clock.delta(now_ms);
        let view = viewport(&game.surface.document);
        match game
            .world
            .tick(dt, &input, view, &mut game.surface, &mut game.store)
        {
            Ok(()) => true,
            Err(err) => {
                log::error!("frame failed, stopping: {err}");
                false
            }
        }
    })
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        if let Err(err) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {err:?}");
        }
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if frame(ts) {
            request_frame(&f);
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}
