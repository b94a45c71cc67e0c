use glam::Vec2;

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Centre point, used to place the prompt text.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Sampling rectangle for coverage, in overlay coordinates.
/// Kept as floats because callers pass whatever their layout produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ValidArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// The whole overlay.
    pub fn full(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    /// Snap to whole pixels and clip to the overlay bounds.
    ///
    /// Pixels outside the overlay are not part of it, so they never count
    /// toward coverage. A rectangle entirely outside yields an empty rect.
    pub fn clamp_to(&self, bounds: Size) -> PixelRect {
        let snap = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
        let x0 = snap(self.left, bounds.width);
        let y0 = snap(self.top, bounds.height);
        let x1 = snap(self.left + self.width, bounds.width);
        let y1 = snap(self.top + self.height, bounds.height);
        PixelRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// Integer pixel rectangle inside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Translate a page coordinate into overlay-local space.
pub fn page_to_local(page: Vec2, overlay_offset: Vec2) -> Vec2 {
    page - overlay_offset
}
