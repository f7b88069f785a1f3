// Browser side of the particle background: owns the canvas and the field,
// drives one frame per requestAnimationFrame and rebuilds on window resize.
// The loop keeps going until the token is cancelled through stop().

use crate::field::{FieldConfig, ParticleField};
use crate::surface::{CanvasSurface, Surface};
use crate::timer::Timer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, Event, HtmlCanvasElement, Window};

/// Shared stop flag checked by a loop before it reschedules itself.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Scene {
    field: ParticleField,
    surface: CanvasSurface,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen]
pub struct ParticleBackground {
    scene: Rc<RefCell<Scene>>,
    token: CancellationToken,
    frame_request: Rc<Cell<Option<i32>>>,
    frames_drawn: Rc<Cell<u32>>,
    frame_callback: FrameCallback,
    resize_callback: Option<Closure<dyn FnMut(Event)>>,
}

impl ParticleBackground {
    pub fn start(canvas_id: &str) -> Result<ParticleBackground, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{}' is not a canvas", canvas_id)))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let surface = CanvasSurface::new(canvas, context);
        let (width, height) = viewport_size(&window)?;
        surface.set_size(width, height);

        let field = ParticleField::new(
            FieldConfig::default(),
            surface.width(),
            surface.height(),
            &mut rand::thread_rng(),
        );
        console::log_1(
            &format!(
                "particle field started: {} particles on {}x{}",
                field.len(),
                width,
                height
            )
            .into(),
        );

        let scene = Rc::new(RefCell::new(Scene { field, surface }));
        let token = CancellationToken::new();
        let frame_request = Rc::new(Cell::new(None));
        let frames_drawn = Rc::new(Cell::new(0u32));

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let next_frame = frame_callback.clone();
        {
            let scene = scene.clone();
            let token = token.clone();
            let frame_request = frame_request.clone();
            let frames_drawn = frames_drawn.clone();
            let window = window.clone();
            *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
                if token.is_cancelled() {
                    frame_request.set(None);
                    return;
                }
                {
                    #[cfg(feature = "frame-timing")]
                    let _timer = Timer::new("ParticleField::frame");
                    let mut scene = scene.borrow_mut();
                    let Scene { field, surface } = &mut *scene;
                    field.frame(surface);
                }
                frames_drawn.set(frames_drawn.get().wrapping_add(1));
                if let Some(callback) = next_frame.borrow().as_ref() {
                    frame_request.set(
                        window
                            .request_animation_frame(callback.as_ref().unchecked_ref())
                            .ok(),
                    );
                }
            }) as Box<dyn FnMut(f64)>));
        }
        if let Some(callback) = frame_callback.borrow().as_ref() {
            frame_request.set(Some(
                window.request_animation_frame(callback.as_ref().unchecked_ref())?,
            ));
        }

        let resize_callback = {
            let scene = scene.clone();
            Closure::wrap(Box::new(move |_event: Event| {
                let window = match web_sys::window() {
                    Some(window) => window,
                    None => return,
                };
                let (width, height) = match viewport_size(&window) {
                    Ok(size) => size,
                    Err(_) => return,
                };
                let _timer = Timer::new("ParticleField::resize");
                let mut scene = scene.borrow_mut();
                scene.surface.set_size(width, height);
                let (width, height) = (scene.surface.width(), scene.surface.height());
                scene.field.resize(width, height, &mut rand::thread_rng());
            }) as Box<dyn FnMut(Event)>)
        };
        window.add_event_listener_with_callback("resize", resize_callback.as_ref().unchecked_ref())?;

        Ok(ParticleBackground {
            scene,
            token,
            frame_request,
            frames_drawn,
            frame_callback,
            resize_callback: Some(resize_callback),
        })
    }
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Stops the frame loop and detaches the resize listener. Safe to call
    /// more than once.
    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        if let Some(window) = web_sys::window() {
            if let Some(request) = self.frame_request.take() {
                let _ = window.cancel_animation_frame(request);
            }
            if let Some(callback) = self.resize_callback.as_ref() {
                let _ = window
                    .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
            }
        }
        self.resize_callback = None;
        // breaks the callback's reference to itself
        self.frame_callback.borrow_mut().take();
        console::log_1(&"particle field stopped".into());
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Frames drawn since start, stops advancing once stopped.
    pub fn frames_drawn(&self) -> u32 {
        self.frames_drawn.get()
    }

    pub fn particle_count(&self) -> usize {
        self.scene.borrow().field.len()
    }

    pub fn width(&self) -> f64 {
        self.scene.borrow().field.width()
    }

    pub fn height(&self) -> f64 {
        self.scene.borrow().field.height()
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

fn viewport_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window
        .inner_width()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("innerWidth is not a number"))?;
    let height = window
        .inner_height()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("innerHeight is not a number"))?;
    Ok((width as u32, height as u32))
}
