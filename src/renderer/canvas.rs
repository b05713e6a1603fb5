//! Canvas 2D backend
//!
//! Paints a `Scene` scaled to fit the canvas, letterboxed.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{Color, DrawCmd, Scene, TextAlign};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the element's CSS size
    pub fn resize(&self, dpr: f64) {
        let width = (f64::from(self.canvas.client_width()) * dpr) as u32;
        let height = (f64::from(self.canvas.client_height()) * dpr) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    pub fn render(&self, scene: &Scene) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(0.0, 0.0, width, height);

        let scale = (width / f64::from(scene.size.x)).min(height / f64::from(scene.size.y));
        let offset_x = (width - f64::from(scene.size.x) * scale) / 2.0;
        let offset_y = (height - f64::from(scene.size.y) * scale) / 2.0;
        ctx.set_transform(scale, 0.0, 0.0, scale, offset_x, offset_y)?;

        set_fill(ctx, scene.background);
        ctx.fill_rect(0.0, 0.0, f64::from(scene.size.x), f64::from(scene.size.y));

        for cmd in scene.commands() {
            match cmd {
                DrawCmd::Rect { rect, color } => {
                    set_fill(ctx, *color);
                    ctx.fill_rect(
                        f64::from(rect.min.x),
                        f64::from(rect.min.y),
                        f64::from(rect.size.x),
                        f64::from(rect.size.y),
                    );
                }
                DrawCmd::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    ctx.set_stroke_style_str(&css(*color));
                    ctx.set_line_width(f64::from(*width));
                    ctx.begin_path();
                    ctx.move_to(f64::from(from.x), f64::from(from.y));
                    ctx.line_to(f64::from(to.x), f64::from(to.y));
                    ctx.stroke();
                }
                DrawCmd::Text {
                    pos,
                    text,
                    size,
                    align,
                    color,
                } => {
                    set_fill(ctx, *color);
                    ctx.set_font(&format!("bold {}px sans-serif", size.round()));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y))?;
                }
            }
        }
        Ok(())
    }
}

fn set_fill(ctx: &CanvasRenderingContext2d, color: Color) {
    ctx.set_fill_style_str(&css(color));
}

fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}
