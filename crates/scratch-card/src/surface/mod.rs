//! Overlay drawing surface.
//!
//! The trait mirrors the slice of `CanvasRenderingContext2D` the card needs,
//! so the browser implementation is a thin forwarder and [`PixelSurface`]
//! can stand in for it natively.

pub mod pixels;

pub use pixels::PixelSurface;

use glam::Vec2;

use crate::error::Result;
use crate::geometry::{PixelRect, Size};

/// How new paint combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Normal painting.
    #[default]
    SourceOver,
    /// New strokes remove alpha instead of adding colour.
    DestinationOut,
}

impl Composite {
    /// Value for `globalCompositeOperation`.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::DestinationOut => "destination-out",
        }
    }
}

/// Stroke settings for the erase path. Caps and joins are always round.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub width: f64,
    pub color: String,
}

impl Brush {
    pub const CAP: &'static str = "round";
    pub const JOIN: &'static str = "round";

    pub fn new(width: f64) -> Self {
        Self {
            width,
            color: "rgba(255, 255, 255, 1)".to_string(),
        }
    }
}

/// A pixel-addressable layer drawn above the image.
pub trait OverlaySurface {
    /// Pixel size of the drawing buffer.
    fn size(&self) -> Size;

    /// Fill the whole surface with a CSS colour.
    fn fill_background(&mut self, color: &str);

    /// Draw `text` centred on `center`.
    fn fill_text(&mut self, text: &str, font: &str, color: &str, center: Vec2) -> Result<()>;

    fn set_brush(&mut self, brush: &Brush);

    fn set_composite(&mut self, mode: Composite) -> Result<()>;

    /// Start a new path at `at`, discarding the previous one.
    fn begin_path(&mut self, at: Vec2);

    fn line_to(&mut self, to: Vec2);

    /// Stroke the current path with the brush and composite mode.
    fn stroke(&mut self);

    fn close_path(&mut self);

    /// RGBA bytes of `rect`, row-major, four bytes per pixel.
    fn read_pixels(&self, rect: PixelRect) -> Result<Vec<u8>>;

    /// Take the overlay out of the layout for good.
    fn hide(&mut self);

    fn is_hidden(&self) -> bool;

    /// Compatibility shim for engines that skip repainting after a stroke.
    fn nudge_repaint(&mut self) {}
}
