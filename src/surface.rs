// Drawing surface abstraction. The particle field only ever talks to a Surface,
// CanvasSurface backs it with a 2d canvas context on the DOM.

use crate::color::Color;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64);
    fn stroke_line(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        line_width: f64,
        color: Color,
        alpha: f64,
    );
}

pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, context: CanvasRenderingContext2d) -> Self {
        CanvasSurface { canvas, context }
    }

    // Resizes the backing canvas, which also wipes whatever was drawn on it
    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
        #[allow(deprecated)]
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css_rgba(alpha)));
        self.context.begin_path();
        // arc only fails on a negative radius, which particles never have
        let _ = self
            .context
            .arc(x, y, radius, 0.0, std::f64::consts::PI * 2.0);
        self.context.close_path();
        self.context.fill();
    }

    fn stroke_line(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        line_width: f64,
        color: Color,
        alpha: f64,
    ) {
        #[allow(deprecated)]
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css_rgba(alpha)));
        self.context.set_line_width(line_width);
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}
