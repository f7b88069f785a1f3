// Scroll-driven effects: skill bars that fill once when they come into view,
// and hero content that drifts down at half the scroll speed.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Event, HtmlElement, Window};

/// How far above the bottom of the viewport a bar has to be before it fills.
pub const REVEAL_MARGIN: f64 = 100.0;
pub const FILL_DELAY_MS: i32 = 100;
pub const FILL_TRANSITION: &str = "width 1.5s ease";
pub const ANIMATED_CLASS: &str = "animated";
pub const PARALLAX_SPEED: f64 = 0.5;

/// A bar fills the first time its top is more than `REVEAL_MARGIN` above the
/// bottom of the viewport, and never again after that.
pub fn should_fill(bar_top: f64, window_height: f64, already_animated: bool) -> bool {
    !already_animated && bar_top < window_height - REVEAL_MARGIN
}

/// CSS width for a bar's `data-progress` value. A missing value fills nothing.
pub fn fill_width(progress: Option<&str>) -> String {
    format!("{}%", progress.map(str::trim).unwrap_or("0"))
}

pub fn parallax_transform(scroll_y: f64) -> String {
    format!("translateY({}px)", scroll_y * PARALLAX_SPEED)
}

/// A window `scroll` listener that stays attached until stopped or dropped.
#[wasm_bindgen]
pub struct ScrollListener {
    callback: Option<Closure<dyn FnMut(Event)>>,
}

impl ScrollListener {
    fn attach(window: &Window, mut on_scroll: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback =
            Closure::wrap(Box::new(move |_event: Event| on_scroll()) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())?;
        Ok(ScrollListener {
            callback: Some(callback),
        })
    }

    /// Skill bars matching `selector` fill on scroll. Bars already in view
    /// fill straight away.
    pub fn skill_bars(selector: &str) -> Result<ScrollListener, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let bars = select_all(&window, selector)?;
        console::log_1(&format!("{} skill bars waiting to fill", bars.len()).into());

        let viewport = window.clone();
        let mut check = move || {
            let window_height = match viewport.inner_height().ok().and_then(|h| h.as_f64()) {
                Some(height) => height,
                None => return,
            };
            for bar in &bars {
                fill_if_visible(&viewport, bar, window_height);
            }
        };
        check();
        ScrollListener::attach(&window, check)
    }

    pub fn parallax(selector: &str) -> Result<ScrollListener, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let elements = select_all(&window, selector)?;

        let viewport = window.clone();
        ScrollListener::attach(&window, move || {
            let transform = parallax_transform(viewport.page_y_offset().unwrap_or(0.0));
            for element in &elements {
                let _ = element.style().set_property("transform", &transform);
            }
        })
    }
}

#[wasm_bindgen]
impl ScrollListener {
    pub fn stop(&mut self) {
        if let Some(callback) = self.callback.take() {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.callback.is_some()
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn select_all(window: &Window, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn fill_if_visible(window: &Window, bar: &HtmlElement, window_height: f64) {
    let top = bar.get_bounding_client_rect().top();
    let classes = bar.class_list();
    if !should_fill(top, window_height, classes.contains(ANIMATED_CLASS)) {
        return;
    }
    let _ = classes.add_1(ANIMATED_CLASS);
    let target = fill_width(bar.get_attribute("data-progress").as_deref());
    let _ = bar.style().set_property("width", "0%");

    // the transition only kicks in once the 0% width has been applied
    let bar = bar.clone();
    let fill = Closure::once_into_js(move || {
        let style = bar.style();
        let _ = style.set_property("transition", FILL_TRANSITION);
        let _ = style.set_property("width", &target);
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        fill.unchecked_ref(),
        FILL_DELAY_MS,
    );
}
