//! Layout of the container, background image and overlay.
//!
//! The pure part (sizes and inline styles) lives in [`Layout`]. Whatever owns
//! the real elements implements [`Host`]; the browser bridge does it with
//! `web-sys`, tests do it with an in-memory mock.

use glam::Vec2;

use crate::error::Result;
use crate::geometry::Size;
use crate::options::ScratchOptions;
use crate::surface::OverlaySurface;

/// Base inline style for the container; width/height are appended.
pub const CONTAINER_CSS: &str = "display: inline-block; position: relative;";
/// Inline style for the background image.
pub const IMAGE_CSS: &str = "position: relative; z-index: 1; vertical-align: middle;";
/// Inline style for the overlay, stacked over the image at the container origin.
pub const OVERLAY_CSS: &str = "position: absolute; z-index: 2; top: 0; left: 0;";

/// Sizes and styles resolved once the image's natural size is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Size the image was decoded at.
    pub natural: Size,
    /// Size the container, image and overlay are all rendered at.
    pub display: Size,
}

impl Layout {
    /// Configured size wins; otherwise keep the image's natural size.
    pub fn resolve(options: &ScratchOptions, natural: Size) -> Self {
        Self {
            natural,
            display: options.size.unwrap_or(natural),
        }
    }

    /// Full inline style for the container.
    pub fn container_css(&self) -> String {
        format!(
            "{CONTAINER_CSS} width: {}px; height: {}px;",
            self.display.width, self.display.height
        )
    }

    /// Inline style for the overlay element.
    pub fn overlay_css(&self) -> String {
        format!(
            "{OVERLAY_CSS} width: {}px; height: {}px;",
            self.display.width, self.display.height
        )
    }
}

/// The environment a card is mounted into.
///
/// `mount` calls these in order: container, image, overlay, offset. The
/// overlay is the only step allowed to fail after elements were inserted.
pub trait Host {
    type Surface: OverlaySurface;

    /// Apply the container's inline style.
    fn prepare_container(&mut self, layout: &Layout) -> Result<()>;

    /// Resize the loaded image to the display size and append it.
    fn insert_image(&mut self, layout: &Layout) -> Result<()>;

    /// Create, style and append the overlay and open its 2D context.
    ///
    /// Without a 2D context the element stays in place, styled as a plain
    /// box showing `options.not_support_text`, and
    /// `ScratchError::UnsupportedRenderer` is returned.
    fn insert_overlay(&mut self, layout: &Layout, options: &ScratchOptions) -> Result<Self::Surface>;

    /// Page offset of the overlay's top-left corner.
    fn overlay_offset(&self) -> Vec2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: serde_json::Value) -> ScratchOptions {
        ScratchOptions::from_value(&value).unwrap()
    }

    #[test]
    fn natural_size_is_the_fallback() {
        let layout = Layout::resolve(&options(json!({ "imgSrc": "a.png" })), Size::new(320, 200));
        assert_eq!(layout.display, Size::new(320, 200));
    }

    #[test]
    fn configured_size_wins() {
        let opts = options(json!({ "imgSrc": "a.png", "size": [100, 50] }));
        let layout = Layout::resolve(&opts, Size::new(320, 200));
        assert_eq!(layout.natural, Size::new(320, 200));
        assert_eq!(layout.display, Size::new(100, 50));
        assert_eq!(
            layout.container_css(),
            "display: inline-block; position: relative; width: 100px; height: 50px;"
        );
        assert!(layout.overlay_css().starts_with(OVERLAY_CSS));
    }
}
