use crate::error::Result;
use crate::options::ScratchOptions;
use crate::surface::{Brush, Composite, OverlaySurface};

/// Paint a fresh overlay: background, centred prompt, erase brush.
///
/// Strokes only start erasing once the gesture switches the composite mode,
/// so the surface is left in `source-over` here.
pub fn paint_overlay<S: OverlaySurface>(surface: &mut S, options: &ScratchOptions) -> Result<()> {
    surface.set_composite(Composite::SourceOver)?;
    surface.fill_background(&options.background);

    if !options.text.is_empty() {
        let center = surface.size().center();
        surface.fill_text(&options.text, &options.font, &options.color, center)?;
    }

    surface.set_brush(&Brush::new(options.brush_width));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::surface::PixelSurface;
    use serde_json::json;

    #[test]
    fn paints_background_text_and_brush() {
        let opts = ScratchOptions::from_value(&json!({
            "imgSrc": "a.png",
            "background": "#123456",
            "text": "Try me"
        }))
        .unwrap();
        let mut s = PixelSurface::new(Size::new(8, 8));
        paint_overlay(&mut s, &opts).unwrap();

        assert_eq!(s.pixel(3, 3), [0x12, 0x34, 0x56, 255]);
        assert_eq!(s.texts(), ["Try me".to_string()]);
        assert_eq!(s.brush().width, 30.0);
        assert_eq!(s.composite(), Composite::SourceOver);
    }

    #[test]
    fn empty_text_is_skipped() {
        let opts = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "text": "" })).unwrap();
        let mut s = PixelSurface::new(Size::new(8, 8));
        paint_overlay(&mut s, &opts).unwrap();
        assert!(s.texts().is_empty());
    }
}
