// Decorative effects for the portfolio page: the drifting particle background
// behind the hero section, the typing headline, skill bars and parallax on
// scroll, and the occasional title glitch.

extern crate nalgebra_glm as glm;

pub mod animation;
pub mod color;
pub mod field;
pub mod glitch;
pub mod particle;
pub mod scroll;
pub mod surface;
mod timer;
pub mod typewriter;

use wasm_bindgen::prelude::*;

pub use animation::{CancellationToken, ParticleBackground};
pub use color::Color;
pub use field::{connection_alpha, FieldConfig, ParticleField};
pub use glitch::GlitchTrigger;
pub use particle::Particle;
pub use scroll::ScrollListener;
pub use surface::{CanvasSurface, Surface};
pub use typewriter::{Typewriter, TypewriterHandle, TypewriterStep};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn initialize() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Sizes the canvas with id `canvas_id` to the viewport and starts the
/// particle animation on it.
#[wasm_bindgen]
pub fn start_particles(canvas_id: &str) -> Result<ParticleBackground, JsValue> {
    ParticleBackground::start(canvas_id)
}

/// Starts the typing effect on the first element matching `selector`, cycling
/// through `words` or the built-in list when none are given.
#[wasm_bindgen]
pub fn start_typewriter(
    selector: &str,
    words: Option<js_sys::Array>,
) -> Result<TypewriterHandle, JsValue> {
    let words = match words {
        Some(words) => words.iter().filter_map(|w| w.as_string()).collect(),
        None => typewriter::DEFAULT_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect(),
    };
    TypewriterHandle::start(selector, words)
}

/// Fills each bar matching `selector` to its `data-progress` percentage the
/// first time it scrolls into view.
#[wasm_bindgen]
pub fn start_skill_bars(selector: &str) -> Result<ScrollListener, JsValue> {
    ScrollListener::skill_bars(selector)
}

/// Moves elements matching `selector` down at half the scroll speed.
#[wasm_bindgen]
pub fn start_parallax(selector: &str) -> Result<ScrollListener, JsValue> {
    ScrollListener::parallax(selector)
}

#[wasm_bindgen]
pub fn start_glitch(selector: &str) -> Result<GlitchTrigger, JsValue> {
    GlitchTrigger::start(selector)
}
