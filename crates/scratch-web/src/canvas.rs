//! `OverlaySurface` on top of a `<canvas>` 2D context.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use scratch_card::options::{DEFAULT_BACKGROUND, DEFAULT_COLOR};
use scratch_card::{Brush, Composite, OverlaySurface, PixelRect, Result, ScratchError, Size};

use crate::host_error;

/// Opacity written by the repaint shim; close enough to 1 to be invisible.
const NUDGE_OPACITY: &str = "0.999";

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Size,
    hidden: bool,
}

impl CanvasSurface {
    /// Open the 2D context of an already inserted canvas.
    pub fn open(canvas: HtmlCanvasElement, size: Size, unsupported: &str) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| ScratchError::UnsupportedRenderer(unsupported.to_string()))?;
        Ok(Self {
            canvas,
            ctx,
            size,
            hidden: false,
        })
    }
}

/// Style a canvas without a 2D context as a plain box showing the fallback
/// text. The box always uses the built-in colours, whatever the caller set.
pub fn fall_back(canvas: &HtmlCanvasElement, not_support_text: &str) {
    let style = canvas.style();
    let _ = style.set_property("background", DEFAULT_BACKGROUND);
    let _ = style.set_property("color", DEFAULT_COLOR);
    canvas.set_text_content(Some(not_support_text));
}

impl OverlaySurface for CanvasSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_background(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(0.0, 0.0, self.size.width as f64, self.size.height as f64);
    }

    fn fill_text(&mut self, text: &str, font: &str, color: &str, center: Vec2) -> Result<()> {
        self.ctx.set_font(font);
        self.ctx.set_text_baseline("middle");
        self.ctx.set_text_align("center");
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_text(text, center.x as f64, center.y as f64)
            .map_err(host_error)
    }

    fn set_brush(&mut self, brush: &Brush) {
        self.ctx.set_stroke_style_str(&brush.color);
        self.ctx.set_line_join(Brush::JOIN);
        self.ctx.set_line_cap(Brush::CAP);
        self.ctx.set_line_width(brush.width);
    }

    fn set_composite(&mut self, mode: Composite) -> Result<()> {
        self.ctx
            .set_global_composite_operation(mode.as_css())
            .map_err(host_error)
    }

    fn begin_path(&mut self, at: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(at.x as f64, at.y as f64);
    }

    fn line_to(&mut self, to: Vec2) {
        self.ctx.line_to(to.x as f64, to.y as f64);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn read_pixels(&self, rect: PixelRect) -> Result<Vec<u8>> {
        let data = self
            .ctx
            .get_image_data(
                rect.x as f64,
                rect.y as f64,
                rect.width as f64,
                rect.height as f64,
            )
            .map_err(host_error)?;
        Ok(data.data().0)
    }

    fn hide(&mut self) {
        self.hidden = true;
        let _ = self.canvas.style().set_property("display", "none");
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn nudge_repaint(&mut self) {
        let style = self.canvas.style();
        let opacity = style.get_property_value("opacity").unwrap_or_default();
        if opacity.is_empty() {
            let _ = style.set_property("opacity", NUDGE_OPACITY);
        } else {
            let _ = style.remove_property("opacity");
        }
    }
}
