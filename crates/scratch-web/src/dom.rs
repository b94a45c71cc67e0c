//! DOM side of the layout: container, `<img>`, `<canvas>`.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, Window};

use scratch_card::layout::IMAGE_CSS;
use scratch_card::{Host, Layout, Result, ScratchOptions, Size};

use crate::canvas::{fall_back, CanvasSurface};
use crate::host_error;

/// The caller's container plus the two elements the card inserts into it.
#[derive(Clone)]
pub struct DomHost {
    document: Document,
    container: HtmlElement,
    image: HtmlImageElement,
    canvas: Option<HtmlCanvasElement>,
}

impl DomHost {
    pub fn new(document: Document, container: HtmlElement, image: HtmlImageElement) -> Self {
        Self {
            document,
            container,
            image,
            canvas: None,
        }
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
        self.canvas.as_ref()
    }

    /// Decoded size of the loaded image.
    pub fn natural_size(&self) -> Size {
        Size::new(self.image.natural_width(), self.image.natural_height())
    }
}

impl Host for DomHost {
    type Surface = CanvasSurface;

    fn prepare_container(&mut self, layout: &Layout) -> Result<()> {
        self.container.style().set_css_text(&layout.container_css());
        Ok(())
    }

    fn insert_image(&mut self, layout: &Layout) -> Result<()> {
        self.image.set_width(layout.display.width);
        self.image.set_height(layout.display.height);
        self.image.style().set_css_text(IMAGE_CSS);
        self.container.append_child(&self.image).map_err(host_error)?;
        Ok(())
    }

    fn insert_overlay(&mut self, layout: &Layout, options: &ScratchOptions) -> Result<CanvasSurface> {
        let canvas = self
            .document
            .create_element("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from))
            .map_err(host_error)?;
        // Only visible in engines that do not render <canvas>.
        canvas.set_text_content(Some(&options.not_support_text));
        canvas.style().set_css_text(&layout.overlay_css());
        canvas.set_width(layout.display.width);
        canvas.set_height(layout.display.height);
        self.container.append_child(&canvas).map_err(host_error)?;
        self.canvas = Some(canvas.clone());

        CanvasSurface::open(canvas.clone(), layout.display, &options.not_support_text).map_err(|err| {
            fall_back(&canvas, &options.not_support_text);
            err
        })
    }

    fn overlay_offset(&self) -> Vec2 {
        self.canvas.as_ref().map_or(Vec2::ZERO, |canvas| page_offset(canvas))
    }
}

/// Page position of `element`: offsets summed up the `offsetParent` chain.
pub fn page_offset(element: &HtmlElement) -> Vec2 {
    let mut offset = Vec2::new(element.offset_left() as f32, element.offset_top() as f32);
    let mut parent = element.offset_parent();
    while let Some(node) = parent {
        let Ok(el) = node.dyn_into::<HtmlElement>() else {
            break;
        };
        offset += Vec2::new(el.offset_left() as f32, el.offset_top() as f32);
        parent = el.offset_parent();
    }
    offset
}

/// `'ontouchstart' in window`. Checked once per card.
pub fn touch_capable(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
}
