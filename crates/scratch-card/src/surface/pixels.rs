//! Software overlay surface backed by an RGBA buffer.
//!
//! Rasterises strokes as hard-edged capsules (no anti-aliasing), which is
//! enough to measure coverage the same way a canvas would. Text is recorded
//! but not rasterised.

use glam::Vec2;

use super::{Brush, Composite, OverlaySurface};
use crate::error::Result;
use crate::geometry::{PixelRect, Size};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
const FALLBACK_COLOR: [u8; 4] = [128, 128, 128, 255];

#[derive(Debug, Clone)]
pub struct PixelSurface {
    size: Size,
    pixels: Vec<[u8; 4]>,
    brush: Brush,
    composite: Composite,
    path: Vec<Vec2>,
    /// Path segments already rasterised by a previous `stroke`.
    stroked_segments: usize,
    hidden: bool,
    texts: Vec<String>,
    repaints: u32,
}

impl PixelSurface {
    /// A fully transparent surface.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![TRANSPARENT; size.area() as usize],
            brush: Brush::new(1.0),
            composite: Composite::SourceOver,
            path: Vec::new(),
            stroked_segments: 0,
            hidden: false,
            texts: Vec::new(),
            repaints: 0,
        }
    }

    /// RGBA of the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.size.width && y < self.size.height,
            "pixel ({x}, {y}) outside {}x{} surface",
            self.size.width,
            self.size.height
        );
        self.pixels[self.index(x, y)]
    }

    /// Clear a rectangle to transparent, like `clearRect`.
    pub fn clear_rect(&mut self, rect: PixelRect) {
        for y in rect.y..(rect.y + rect.height).min(self.size.height) {
            for x in rect.x..(rect.x + rect.width).min(self.size.width) {
                let i = self.index(x, y);
                self.pixels[i] = TRANSPARENT;
            }
        }
    }

    /// Prompts drawn so far, in order.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    /// How many times `nudge_repaint` ran.
    pub fn repaints(&self) -> u32 {
        self.repaints
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.size.width + x) as usize
    }

    fn paint(&self) -> [u8; 4] {
        match self.composite {
            Composite::SourceOver => parse_color(&self.brush.color),
            Composite::DestinationOut => TRANSPARENT,
        }
    }

    /// Paint every pixel whose centre lies within `radius` of segment `a`-`b`.
    fn rasterize_segment(&mut self, a: Vec2, b: Vec2, radius: f32, paint: [u8; 4]) {
        let min = a.min(b) - Vec2::splat(radius);
        let max = a.max(b) + Vec2::splat(radius);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.size.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.size.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(p, a, b) <= radius {
                    let i = self.index(x, y);
                    self.pixels[i] = paint;
                }
            }
        }
    }
}

impl OverlaySurface for PixelSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_background(&mut self, color: &str) {
        let paint = match self.composite {
            Composite::SourceOver => parse_color(color),
            Composite::DestinationOut => TRANSPARENT,
        };
        self.pixels.fill(paint);
    }

    fn fill_text(&mut self, text: &str, _font: &str, _color: &str, _center: Vec2) -> Result<()> {
        self.texts.push(text.to_string());
        Ok(())
    }

    fn set_brush(&mut self, brush: &Brush) {
        self.brush = brush.clone();
    }

    fn set_composite(&mut self, mode: Composite) -> Result<()> {
        self.composite = mode;
        Ok(())
    }

    fn begin_path(&mut self, at: Vec2) {
        self.path.clear();
        self.path.push(at);
        self.stroked_segments = 0;
    }

    fn line_to(&mut self, to: Vec2) {
        // On an empty path this acts as a moveTo, as on a canvas.
        self.path.push(to);
    }

    fn stroke(&mut self) {
        let radius = (self.brush.width / 2.0) as f32;
        let paint = self.paint();
        let segments = self.path.len().saturating_sub(1);
        // Re-stroking already painted segments changes nothing with either
        // composite mode, so only new segments are rasterised.
        for i in self.stroked_segments..segments {
            let (a, b) = (self.path[i], self.path[i + 1]);
            self.rasterize_segment(a, b, radius, paint);
        }
        self.stroked_segments = segments;
    }

    fn close_path(&mut self) {
        if let Some(&start) = self.path.first() {
            if self.path.len() > 1 {
                self.path.push(start);
            }
        }
    }

    fn read_pixels(&self, rect: PixelRect) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(rect.area() as usize * 4);
        let x_end = (rect.x + rect.width).min(self.size.width);
        let inside = x_end.saturating_sub(rect.x) as usize;
        for y in rect.y..rect.y + rect.height {
            if y < self.size.height && inside > 0 {
                let start = self.index(rect.x, y);
                out.extend_from_slice(bytemuck::cast_slice(&self.pixels[start..start + inside]));
            }
            // Outside the buffer reads as transparent black, as getImageData does.
            let missing = rect.width as usize - if y < self.size.height { inside } else { 0 };
            out.resize(out.len() + missing * 4, 0);
        }
        Ok(out)
    }

    fn hide(&mut self) {
        self.hidden = true;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn nudge_repaint(&mut self) {
        self.repaints += 1;
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Parse the CSS colour forms the card uses: `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(...)`, `rgba(...)` and a few keywords. Anything else paints grey.
pub fn parse_color(css: &str) -> [u8; 4] {
    let css = css.trim();
    match css {
        "white" => return [255, 255, 255, 255],
        "black" => return [0, 0, 0, 255],
        "transparent" => return TRANSPARENT,
        _ => {}
    }
    if let Some(hex) = css.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(FALLBACK_COLOR);
    }
    let args = css
        .strip_prefix("rgba(")
        .or_else(|| css.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    match args {
        Some(args) => parse_rgb_args(args).unwrap_or(FALLBACK_COLOR),
        None => FALLBACK_COLOR,
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<[u8; 4]> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let (r, g, b) = match parts.as_slice() {
        [r, g, b] | [r, g, b, _] => (parse_channel(r)?, parse_channel(g)?, parse_channel(b)?),
        _ => return None,
    };
    let a = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some([r, g, b, a])
}

fn parse_channel(s: &str) -> Option<u8> {
    s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8)
}
