//! Coverage measurement: how much of the valid area has been scratched off.

use crate::error::{Result, ScratchError};
use crate::geometry::ValidArea;
use crate::surface::OverlaySurface;

/// Byte index of alpha in an RGBA pixel. Erased canvas pixels read back as
/// `[0, 0, 0, 0]`; only alpha distinguishes them from a dark but opaque fill.
pub const ALPHA_CHANNEL: usize = 3;

/// Fraction of pixels in an RGBA buffer whose alpha is exactly zero.
///
/// An empty buffer yields `0.0` rather than NaN.
pub fn erased_fraction(rgba: &[u8]) -> Result<f64> {
    let pixels: &[[u8; 4]] =
        bytemuck::try_cast_slice(rgba).map_err(|_| ScratchError::MalformedPixels(rgba.len()))?;
    if pixels.is_empty() {
        return Ok(0.0);
    }
    let erased = pixels.iter().filter(|px| px[ALPHA_CHANNEL] == 0).count();
    Ok(erased as f64 / pixels.len() as f64)
}

/// Coverage of `area` (default: the whole surface), clipped to the surface.
pub fn measure<S: OverlaySurface>(surface: &S, area: Option<ValidArea>) -> Result<f64> {
    let size = surface.size();
    let rect = area.unwrap_or_else(|| ValidArea::full(size)).clamp_to(size);
    if rect.is_empty() {
        return Ok(0.0);
    }
    erased_fraction(&surface.read_pixels(rect)?)
}
