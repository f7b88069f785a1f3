// Occasionally restarts the CSS glitch animation on the page title so the
// effect doesn't run on a visibly fixed beat.

use rand::Rng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub const GLITCH_INTERVAL_MS: i32 = 3000;
pub const GLITCH_RESET_MS: i32 = 10;
/// Rolls above this restart the animation, roughly 3 ticks in 10.
pub const GLITCH_THRESHOLD: f64 = 0.7;

pub fn should_glitch(roll: f64) -> bool {
    roll > GLITCH_THRESHOLD
}

#[wasm_bindgen]
pub struct GlitchTrigger {
    interval: Option<i32>,
    callback: Option<Closure<dyn FnMut()>>,
}

impl GlitchTrigger {
    /// Every few seconds, maybe restarts the animation on the first element
    /// matching `selector`. The element is looked up on each tick so it may
    /// appear later, a missing element just skips the tick.
    pub fn start(selector: &str) -> Result<GlitchTrigger, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let selector = selector.to_owned();
        let timer_window = window.clone();
        let callback = Closure::wrap(Box::new(move || {
            if !should_glitch(rand::thread_rng().gen::<f64>()) {
                return;
            }
            let element = timer_window
                .document()
                .and_then(|document| document.query_selector(&selector).ok().flatten())
                .and_then(|element| element.dyn_into::<HtmlElement>().ok());
            if let Some(element) = element {
                restart_animation(&timer_window, element);
            }
        }) as Box<dyn FnMut()>);
        let interval = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            GLITCH_INTERVAL_MS,
        )?;
        Ok(GlitchTrigger {
            interval: Some(interval),
            callback: Some(callback),
        })
    }
}

#[wasm_bindgen]
impl GlitchTrigger {
    pub fn stop(&mut self) {
        if let (Some(window), Some(interval)) = (web_sys::window(), self.interval.take()) {
            window.clear_interval_with_handle(interval);
        }
        self.callback = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

impl Drop for GlitchTrigger {
    fn drop(&mut self) {
        self.stop();
    }
}

fn restart_animation(window: &web_sys::Window, element: HtmlElement) {
    let _ = element.style().set_property("animation", "none");
    let reset = Closure::once_into_js(move || {
        let _ = element.style().set_property("animation", "");
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        reset.unchecked_ref(),
        GLITCH_RESET_MS,
    );
}
