use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use js_sys::Function;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlImageElement, MouseEvent, TouchEvent};

use scratch_card::{
    EventNames, PointerEvent, PointerFamily, Response, ScratchCard, ScratchError, ScratchOptions,
};

use crate::canvas::CanvasSurface;
use crate::dom::{touch_capable, DomHost};
use crate::host_error;
use crate::listeners::{Listeners, Slot};
use crate::options::JsOptions;

/// Where a card is in its life.
pub enum Phase {
    /// Waiting for the background image.
    Loading,
    /// Mounted and interactive (or revealed).
    Ready(ScratchCard<CanvasSurface>),
    /// Laid out, but no 2D context: static box only.
    Degraded,
    /// The image never loaded.
    Failed(String),
}

struct Shared {
    phase: Phase,
    listeners: Listeners,
    destroyed: bool,
    family: PointerFamily,
    on_complete: Option<Function>,
    on_error: Option<Function>,
}

/// Drives one card in the browser: waits for the image, mounts, then feeds
/// DOM events to the headless [`ScratchCard`].
///
/// DOM closures only hold weak references to the shared state, so dropping
/// the runner frees everything.
pub struct CardRunner {
    shared: Rc<RefCell<Shared>>,
}

impl CardRunner {
    /// Start loading the image. Layout and listeners follow once it loads.
    pub fn start(js: JsOptions) -> Result<Self, ScratchError> {
        let window = web_sys::window().ok_or_else(|| ScratchError::host("no window"))?;
        Self::start_with_family(js, PointerFamily::detect(touch_capable(&window)))
    }

    /// Like [`CardRunner::start`], with the input family given instead of
    /// probed from the window.
    pub fn start_with_family(js: JsOptions, family: PointerFamily) -> Result<Self, ScratchError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ScratchError::host("no document"))?;

        let JsOptions {
            container,
            options,
            on_complete,
            on_error,
        } = js;

        let shared = Rc::new(RefCell::new(Shared {
            phase: Phase::Loading,
            listeners: Listeners::new(),
            destroyed: false,
            family,
            on_complete,
            on_error,
        }));

        let image = HtmlImageElement::new().map_err(host_error)?;
        let host = DomHost::new(document, container, image.clone());
        let src = options.img_src.clone();

        let on_load = {
            let weak = Rc::downgrade(&shared);
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(shared) = weak.upgrade() {
                    finish_mount(&shared, host, options);
                }
            })
        };
        let on_load_error = {
            let weak = Rc::downgrade(&shared);
            let src = src.clone();
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(shared) = weak.upgrade() {
                    fail(&shared, ScratchError::LoadFailed(src));
                }
            })
        };
        image.set_onload(Some(on_load.unchecked_ref()));
        image.set_onerror(Some(on_load_error.unchecked_ref()));
        image.set_src(&src);

        log::debug!("scratch card loading {} ({:?} input)", src, family);
        Ok(Self { shared })
    }

    /// Remove every listener this card registered. The inserted elements
    /// stay, and a pending image load is not cancelled.
    pub fn destroy(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.destroyed = true;
        shared.listeners.detach_all();
    }

    /// Current coverage of the valid area; 0 until the card is mounted.
    pub fn percentage(&self) -> f64 {
        match &self.shared.borrow().phase {
            Phase::Ready(card) => card.scratched_percentage().unwrap_or_else(|err| {
                log::warn!("coverage read failed: {err}");
                0.0
            }),
            _ => 0.0,
        }
    }

    /// Whether the handler for `slot` is currently attached.
    pub fn is_listening(&self, slot: Slot) -> bool {
        self.shared.borrow().listeners.is_attached(slot)
    }

    pub fn is_revealed(&self) -> bool {
        matches!(&self.shared.borrow().phase, Phase::Ready(card) if card.is_revealed())
    }

    /// Message of the load or render failure, if any.
    pub fn error(&self) -> Option<String> {
        match &self.shared.borrow().phase {
            Phase::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn state(&self) -> &'static str {
        let shared = self.shared.borrow();
        if shared.destroyed {
            return "destroyed";
        }
        match &shared.phase {
            Phase::Loading => "loading",
            Phase::Ready(card) if card.is_revealed() => "revealed",
            Phase::Ready(_) => "ready",
            Phase::Degraded => "degraded",
            Phase::Failed(_) => "failed",
        }
    }
}

/// Image-load continuation: layout, paint, then listeners.
fn finish_mount(shared: &Rc<RefCell<Shared>>, mut host: DomHost, options: ScratchOptions) {
    let natural = host.natural_size();
    let card = match ScratchCard::mount(&mut host, options, natural) {
        Ok(card) => card,
        Err(err) => return fail(shared, err),
    };
    let display = card.render_state().display;
    shared.borrow_mut().phase = Phase::Ready(card);

    if shared.borrow().destroyed {
        log::debug!("scratch card destroyed before load; not binding events");
        return;
    }
    if let Err(err) = bind_events(shared, &host) {
        return fail(shared, err);
    }
    log::info!("scratch card ready ({}x{})", display.width, display.height);
}

fn bind_events(shared: &Rc<RefCell<Shared>>, host: &DomHost) -> Result<(), ScratchError> {
    let canvas = host
        .canvas()
        .ok_or_else(|| ScratchError::host("overlay was not inserted"))?;
    let container = host.container();
    let (family, names): (PointerFamily, EventNames) = {
        let family = shared.borrow().family;
        (family, family.event_names())
    };

    let mut listeners = Listeners::new();
    let weak = Rc::downgrade(shared);

    listeners.add(Slot::OverlayDown, canvas.as_ref(), names.down, {
        let weak = weak.clone();
        move |event: Event| {
            if let Some(page) = page_point(family, &event) {
                dispatch(&weak, PointerEvent::Down { page });
            }
        }
    })?;
    // Overlay moves bubble to the container, which also owns scroll suppression.
    listeners.add(Slot::ContainerMove, container.as_ref(), names.moves, {
        let weak = weak.clone();
        move |event: Event| {
            let Some(page) = page_point(family, &event) else {
                return;
            };
            if let Some(response) = dispatch(&weak, PointerEvent::Move { page }) {
                if response.prevent_default {
                    event.prevent_default();
                }
            }
        }
    })?;
    listeners.add(Slot::OverlayUp, canvas.as_ref(), names.up, {
        let weak = weak.clone();
        move |_event: Event| {
            dispatch(&weak, PointerEvent::Up);
        }
    })?;
    listeners.add(Slot::OverlayLeave, canvas.as_ref(), names.leave, {
        let weak = weak.clone();
        move |_event: Event| {
            dispatch(&weak, PointerEvent::Leave);
        }
    })?;

    shared.borrow_mut().listeners = listeners;
    Ok(())
}

/// Page coordinates of a mouse event, or of the first touch on the target.
fn page_point(family: PointerFamily, event: &Event) -> Option<Vec2> {
    match family {
        PointerFamily::Mouse => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(Vec2::new(mouse.page_x() as f32, mouse.page_y() as f32))
        }
        PointerFamily::Touch => {
            let touch = event.dyn_ref::<TouchEvent>()?.target_touches().get(0)?;
            Some(Vec2::new(touch.page_x() as f32, touch.page_y() as f32))
        }
    }
}

/// Hand one event to the card. Callbacks run after the state borrow ends,
/// so they may call back into the widget.
fn dispatch(weak: &Weak<RefCell<Shared>>, event: PointerEvent) -> Option<Response> {
    let shared = weak.upgrade()?;
    let result = {
        let mut state = shared.borrow_mut();
        let Phase::Ready(card) = &mut state.phase else {
            return None;
        };
        card.handle(event)
    };
    match result {
        Ok(response) => {
            if response.revealed {
                on_revealed(&shared);
            }
            Some(response)
        }
        Err(err) => {
            log::warn!("scratch event failed: {err}");
            None
        }
    }
}

fn on_revealed(shared: &Rc<RefCell<Shared>>) {
    let on_complete = {
        let mut state = shared.borrow_mut();
        state.listeners.detach(&[Slot::OverlayUp, Slot::OverlayLeave]);
        state.on_complete.clone()
    };
    if let Some(on_complete) = on_complete {
        if let Err(err) = on_complete.call0(&JsValue::NULL) {
            log::error!("onComplete threw: {err:?}");
        }
    }
}

fn fail(shared: &Rc<RefCell<Shared>>, err: ScratchError) {
    log::error!("{err}");
    let on_error = {
        let mut state = shared.borrow_mut();
        state.phase = match &err {
            ScratchError::UnsupportedRenderer(_) => Phase::Degraded,
            other => Phase::Failed(other.to_string()),
        };
        state.on_error.clone()
    };
    if let Some(on_error) = on_error {
        if let Err(thrown) = on_error.call1(&JsValue::NULL, &JsValue::from_str(&err.to_string())) {
            log::error!("onError threw: {thrown:?}");
        }
    }
}
