use glam::Vec2;

use crate::coverage;
use crate::error::Result;
use crate::geometry::Size;
use crate::gesture::Gesture;
use crate::input::PointerEvent;
use crate::layout::{Host, Layout};
use crate::options::ScratchOptions;
use crate::painter::paint_overlay;
use crate::surface::OverlaySurface;

/// Runtime facts learned once the image has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Size the image decoded at.
    pub natural: Size,
    /// Size everything is rendered at.
    pub display: Size,
    /// Page offset of the overlay, cached at mount.
    pub offset: Vec2,
}

/// What the caller should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    /// Suppress the browser's default scroll/selection for this event.
    pub prevent_default: bool,
    /// Coverage measured when a stroke ended.
    pub coverage: Option<f64>,
    /// This event crossed the threshold. Set at most once per card.
    pub revealed: bool,
}

/// A mounted scratch card: overlay surface, gesture state, reveal logic.
///
/// Created by [`ScratchCard::mount`] in the image-load continuation. Once
/// revealed, the overlay stays hidden and every further event is ignored.
pub struct ScratchCard<S: OverlaySurface> {
    options: ScratchOptions,
    state: RenderState,
    surface: S,
    gesture: Gesture,
    revealed: bool,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<S: OverlaySurface> ScratchCard<S> {
    /// Lay out the container, insert image and overlay, paint the overlay.
    pub fn mount<H>(host: &mut H, options: ScratchOptions, natural: Size) -> Result<Self>
    where
        H: Host<Surface = S>,
    {
        let layout = Layout::resolve(&options, natural);
        host.prepare_container(&layout)?;
        host.insert_image(&layout)?;
        let mut surface = host.insert_overlay(&layout, &options)?;
        let offset = host.overlay_offset();

        paint_overlay(&mut surface, &options)?;
        log::debug!(
            "scratch card mounted: {}x{} (natural {}x{}) at {:?}",
            layout.display.width,
            layout.display.height,
            natural.width,
            natural.height,
            offset
        );

        Ok(Self {
            gesture: Gesture::new(offset, options.force_repaint),
            state: RenderState {
                natural,
                display: layout.display,
                offset,
            },
            options,
            surface,
            revealed: false,
            on_complete: None,
        })
    }

    /// Register the zero-argument completion callback.
    pub fn with_on_complete(mut self, on_complete: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    pub fn options(&self) -> &ScratchOptions {
        &self.options
    }

    pub fn render_state(&self) -> RenderState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_scratching(&self) -> bool {
        self.gesture.is_scratching()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Feed one pointer event through the gesture and completion logic.
    pub fn handle(&mut self, event: PointerEvent) -> Result<Response> {
        if self.revealed {
            return Ok(Response::default());
        }
        match event {
            PointerEvent::Down { page } => {
                self.gesture.press(&mut self.surface, page);
                Ok(Response::default())
            }
            PointerEvent::Move { page } => {
                let drew = self.gesture.drag(&mut self.surface, page)?;
                Ok(Response {
                    prevent_default: drew,
                    ..Default::default()
                })
            }
            PointerEvent::Up | PointerEvent::Leave => {
                // Coverage only changes while a stroke is open.
                let was_scratching = self.gesture.is_scratching();
                self.gesture.release(&mut self.surface);
                if !was_scratching {
                    return Ok(Response::default());
                }
                let fraction = self.scratched_percentage()?;
                log::debug!("stroke ended, coverage {:.3}", fraction);
                Ok(Response {
                    coverage: Some(fraction),
                    revealed: self.check_reveal(fraction),
                    ..Default::default()
                })
            }
        }
    }

    /// Erased fraction of the valid area, in [0, 1].
    pub fn scratched_percentage(&self) -> Result<f64> {
        coverage::measure(&self.surface, self.options.valid_area)
    }

    /// Reveal if `fraction` reaches the threshold. True only on the crossing.
    pub fn check_reveal(&mut self, fraction: f64) -> bool {
        if self.revealed || fraction < self.options.percentage {
            return false;
        }
        self.reveal();
        true
    }

    /// Hide the overlay and fire the completion callback, once.
    pub fn reveal(&mut self) {
        if self.revealed {
            return;
        }
        self.revealed = true;
        self.gesture.release(&mut self.surface);
        self.surface.hide();
        log::info!("scratch card revealed");
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScratchError;
    use crate::surface::PixelSurface;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    /// In-memory stand-in for a DOM container.
    #[derive(Default)]
    struct MockHost {
        children: Vec<(&'static str, Size)>,
        container_css: Option<String>,
        no_canvas: bool,
        offset: Vec2,
    }

    impl Host for MockHost {
        type Surface = PixelSurface;

        fn prepare_container(&mut self, layout: &Layout) -> Result<()> {
            self.container_css = Some(layout.container_css());
            Ok(())
        }

        fn insert_image(&mut self, layout: &Layout) -> Result<()> {
            self.children.push(("img", layout.display));
            Ok(())
        }

        fn insert_overlay(&mut self, layout: &Layout, options: &ScratchOptions) -> Result<PixelSurface> {
            self.children.push(("canvas", layout.display));
            if self.no_canvas {
                return Err(ScratchError::UnsupportedRenderer(options.not_support_text.clone()));
            }
            Ok(PixelSurface::new(layout.display))
        }

        fn overlay_offset(&self) -> Vec2 {
            self.offset
        }
    }

    fn build(host: &mut MockHost, value: serde_json::Value) -> Result<ScratchCard<PixelSurface>> {
        let options = ScratchOptions::from_value(&value)?;
        ScratchCard::mount(host, options, Size::new(300, 200))
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, move || inner.set(inner.get() + 1))
    }

    /// Erase a full-width horizontal band 30px tall centred on `y`.
    fn scratch_band(card: &mut ScratchCard<PixelSurface>, y: f32) -> Response {
        card.handle(PointerEvent::Down { page: Vec2::new(-20.0, y) }).unwrap();
        card.handle(PointerEvent::Move { page: Vec2::new(50.0, y) }).unwrap();
        card.handle(PointerEvent::Move { page: Vec2::new(120.0, y) }).unwrap();
        card.handle(PointerEvent::Up).unwrap()
    }

    #[test]
    fn mount_inserts_exactly_two_matching_elements() {
        let mut host = MockHost::default();
        let card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100] })).unwrap();

        assert_eq!(host.children, vec![("img", Size::new(100, 100)), ("canvas", Size::new(100, 100))]);
        assert_eq!(card.surface().size(), Size::new(100, 100));
        assert_eq!(card.render_state().natural, Size::new(300, 200));
        assert_eq!(card.options().img_src, "a.png");
        assert_eq!(
            host.container_css.as_deref(),
            Some("display: inline-block; position: relative; width: 100px; height: 100px;")
        );
    }

    #[test]
    fn natural_size_used_without_size_option() {
        let mut host = MockHost::default();
        let card = build(&mut host, json!({ "imgSrc": "a.png" })).unwrap();
        assert_eq!(card.render_state().display, Size::new(300, 200));
        assert_eq!(card.surface().size(), Size::new(300, 200));
    }

    #[test]
    fn invalid_options_create_no_children() {
        let mut host = MockHost::default();
        let result = build(&mut host, json!({ "size": [100, 100] }));
        assert!(matches!(result, Err(ScratchError::InvalidConfiguration(_))));
        assert!(host.children.is_empty());
        assert!(host.container_css.is_none());
    }

    #[test]
    fn missing_canvas_degrades_after_layout() {
        let mut host = MockHost { no_canvas: true, ..Default::default() };
        let result = build(&mut host, json!({ "imgSrc": "a.png", "notSupportText": "no canvas" }));
        assert_eq!(result.err(), Some(ScratchError::UnsupportedRenderer("no canvas".into())));
        assert_eq!(host.children.len(), 2);
    }

    #[test]
    fn untouched_card_has_zero_coverage() {
        let mut host = MockHost::default();
        let card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100] })).unwrap();
        assert_eq!(card.scratched_percentage().unwrap(), 0.0);
    }

    #[test]
    fn sixty_percent_crosses_half_threshold() {
        let mut host = MockHost::default();
        let (count, on_complete) = counter();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100], "percentage": 0.5 }))
            .unwrap()
            .with_on_complete(on_complete);

        let first = scratch_band(&mut card, 15.0);
        assert_eq!(first.coverage, Some(0.3));
        assert!(!first.revealed);
        let second = scratch_band(&mut card, 45.0);
        assert_eq!(second.coverage, Some(0.6));
        assert!(second.revealed);

        assert_eq!(count.get(), 1);
        assert!(card.is_revealed());
        assert!(card.surface().is_hidden());
    }

    #[test]
    fn thirty_percent_stays_covered() {
        let mut host = MockHost::default();
        let (count, on_complete) = counter();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100], "percentage": 0.5 }))
            .unwrap()
            .with_on_complete(on_complete);

        let response = scratch_band(&mut card, 15.0);
        assert_eq!(response.coverage, Some(0.3));
        assert_eq!(count.get(), 0);
        assert!(!card.surface().is_hidden());
        assert!(!card.is_scratching());
    }

    #[test]
    fn callback_fires_once_despite_more_scratching() {
        let mut host = MockHost::default();
        let (count, on_complete) = counter();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100], "percentage": 0.3 }))
            .unwrap()
            .with_on_complete(on_complete);

        assert!(scratch_band(&mut card, 15.0).revealed);
        let later = scratch_band(&mut card, 45.0);
        assert_eq!(later, Response::default());
        card.reveal();
        assert!(!card.check_reveal(1.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn coverage_never_decreases() {
        let mut host = MockHost::default();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100], "percentage": 1 })).unwrap();

        let mut last = 0.0;
        for y in [15.0, 15.0, 30.0, 80.0, 95.0, 50.0] {
            let coverage = scratch_band(&mut card, y).coverage.unwrap();
            assert!(coverage >= last, "coverage dropped from {last} to {coverage}");
            last = coverage;
        }
    }

    #[test]
    fn fully_erased_valid_area_is_one() {
        let mut host = MockHost::default();
        let (count, on_complete) = counter();
        let mut card = build(
            &mut host,
            json!({ "imgSrc": "a.png", "size": [100, 100], "validArea": [0, 0, 100, 30], "percentage": 1 }),
        )
        .unwrap()
        .with_on_complete(on_complete);

        let response = scratch_band(&mut card, 15.0);
        assert_eq!(response.coverage, Some(1.0));
        assert!(response.revealed);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn erasing_outside_valid_area_counts_nothing() {
        let mut host = MockHost::default();
        let mut card = build(
            &mut host,
            json!({ "imgSrc": "a.png", "size": [100, 100], "validArea": [0, 0, 50, 50] }),
        )
        .unwrap();

        let response = scratch_band(&mut card, 85.0);
        assert_eq!(response.coverage, Some(0.0));
        assert!(card.surface().pixel(10, 85)[3] == 0);
    }

    #[test]
    fn leave_ends_the_stroke_and_measures() {
        let mut host = MockHost::default();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100], "percentage": 0.25 })).unwrap();

        card.handle(PointerEvent::Down { page: Vec2::new(-20.0, 15.0) }).unwrap();
        card.handle(PointerEvent::Move { page: Vec2::new(120.0, 15.0) }).unwrap();
        let response = card.handle(PointerEvent::Leave).unwrap();
        assert!(!card.is_scratching());
        assert_eq!(response.coverage, Some(0.3));
        assert!(response.revealed);
    }

    #[test]
    fn release_without_stroke_skips_measurement() {
        let mut host = MockHost::default();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png" })).unwrap();
        assert_eq!(card.handle(PointerEvent::Up).unwrap(), Response::default());
        assert_eq!(card.handle(PointerEvent::Leave).unwrap().coverage, None);
    }

    #[test]
    fn moves_prevent_default_only_while_scratching() {
        let mut host = MockHost::default();
        let mut card = build(&mut host, json!({ "imgSrc": "a.png" })).unwrap();
        let idle = card.handle(PointerEvent::Move { page: Vec2::new(5.0, 5.0) }).unwrap();
        assert!(!idle.prevent_default);

        card.handle(PointerEvent::Down { page: Vec2::new(5.0, 5.0) }).unwrap();
        let active = card.handle(PointerEvent::Move { page: Vec2::new(9.0, 5.0) }).unwrap();
        assert!(active.prevent_default);
    }

    #[test]
    fn page_offset_is_subtracted() {
        let mut host = MockHost { offset: Vec2::new(400.0, 1000.0), ..Default::default() };
        let mut card = build(&mut host, json!({ "imgSrc": "a.png", "size": [100, 100] })).unwrap();

        card.handle(PointerEvent::Down { page: Vec2::new(380.0, 1015.0) }).unwrap();
        card.handle(PointerEvent::Move { page: Vec2::new(520.0, 1015.0) }).unwrap();
        let response = card.handle(PointerEvent::Up).unwrap();
        assert_eq!(response.coverage, Some(0.3));
        assert_eq!(card.surface().pixel(50, 10)[3], 0);
        assert_eq!(card.surface().pixel(50, 60)[3], 255);
    }
}
