// Typing effect for the hero headline: types a word out, holds it, deletes it
// again and moves on to the next, forever.

use crate::animation::CancellationToken;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element};

pub const DEFAULT_WORDS: [&str; 4] = [
    "Frontend Developer",
    "Web Designer",
    "Creative Coder",
    "UI/UX Enthusiast",
];

pub const START_DELAY_MS: i32 = 1000;
pub const TYPING_DELAY_MS: i32 = 100;
pub const DELETING_DELAY_MS: i32 = 50;
pub const PAUSE_MS: i32 = 1500;

/// Text to show and how long to wait before the next tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TypewriterStep {
    pub text: String,
    pub delay_ms: i32,
}

#[derive(Clone, Debug)]
pub struct Typewriter {
    words: Vec<String>,
    word_index: usize,
    char_index: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new(words: Vec<String>) -> Self {
        Typewriter {
            words,
            word_index: 0,
            char_index: 0,
            deleting: false,
        }
    }

    pub fn with_default_words() -> Self {
        Self::new(DEFAULT_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// Advances one tick. `None` only when there are no words to type.
    pub fn tick(&mut self) -> Option<TypewriterStep> {
        let word = self.words.get(self.word_index)?;
        let word_len = word.chars().count();
        // char_index runs one past the word length at the turn, so take() clamps
        let text: String = word.chars().take(self.char_index).collect();

        if !self.deleting {
            self.char_index += 1;
            if self.char_index > word_len {
                self.deleting = true;
                return Some(TypewriterStep {
                    text,
                    delay_ms: PAUSE_MS,
                });
            }
        } else {
            self.char_index = self.char_index.saturating_sub(1);
            if self.char_index == 0 {
                self.deleting = false;
                self.word_index = (self.word_index + 1) % self.words.len();
            }
        }

        let delay_ms = if self.deleting {
            DELETING_DELAY_MS
        } else {
            TYPING_DELAY_MS
        };
        Some(TypewriterStep { text, delay_ms })
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }
}

type TickCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[wasm_bindgen]
pub struct TypewriterHandle {
    token: CancellationToken,
    timeout: Rc<Cell<Option<i32>>>,
    callback: TickCallback,
}

impl TypewriterHandle {
    /// Starts typing into the first element matching `selector`. Without a
    /// matching element the returned handle is already stopped.
    pub fn start(selector: &str, words: Vec<String>) -> Result<TypewriterHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let handle = TypewriterHandle {
            token: CancellationToken::new(),
            timeout: Rc::new(Cell::new(None)),
            callback: Rc::new(RefCell::new(None)),
        };
        let element: Element = match document.query_selector(selector)? {
            Some(element) => element,
            None => {
                handle.token.cancel();
                return Ok(handle);
            }
        };

        let mut machine = Typewriter::new(words);
        let next_tick = handle.callback.clone();
        {
            let token = handle.token.clone();
            let timeout = handle.timeout.clone();
            let window = window.clone();
            *handle.callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                timeout.set(None);
                if token.is_cancelled() {
                    return;
                }
                let step = match machine.tick() {
                    Some(step) => step,
                    None => return,
                };
                element.set_text_content(Some(&step.text));
                if let Some(callback) = next_tick.borrow().as_ref() {
                    timeout.set(
                        window
                            .set_timeout_with_callback_and_timeout_and_arguments_0(
                                callback.as_ref().unchecked_ref(),
                                step.delay_ms,
                            )
                            .ok(),
                    );
                }
            }) as Box<dyn FnMut()>));
        }
        if let Some(callback) = handle.callback.borrow().as_ref() {
            handle.timeout.set(Some(
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    START_DELAY_MS,
                )?,
            ));
        }
        Ok(handle)
    }
}

#[wasm_bindgen]
impl TypewriterHandle {
    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        if let (Some(window), Some(timeout)) = (web_sys::window(), self.timeout.take()) {
            window.clear_timeout_with_handle(timeout);
        }
        self.callback.borrow_mut().take();
        console::log_1(&"typewriter stopped".into());
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for TypewriterHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
