//! Owned DOM listener registrations.
//!
//! Every listener the card adds goes through [`Listeners`], so teardown is a
//! single `detach_all` instead of remembering each callback by hand.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use scratch_card::{Result, ScratchError};

/// Which handler a registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    OverlayDown,
    OverlayUp,
    OverlayLeave,
    ContainerMove,
}

struct Listener {
    slot: Slot,
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Default)]
pub struct Listeners {
    active: Vec<Listener>,
    /// Detached callbacks are kept alive until the registry is dropped, so a
    /// handler may detach itself while it is running.
    retired: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event` on `target`.
    pub fn add(
        &mut self,
        slot: Slot,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<()> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| ScratchError::host(format!("addEventListener({event}) failed: {e:?}")))?;
        self.active.push(Listener {
            slot,
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    /// Detach every registration in `slots`.
    pub fn detach(&mut self, slots: &[Slot]) {
        let (gone, kept): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|listener| slots.contains(&listener.slot));
        for listener in &gone {
            listener.detach();
        }
        self.active = kept;
        self.retired.extend(gone);
    }

    /// Whether a registration for `slot` is still live.
    pub fn is_attached(&self, slot: Slot) -> bool {
        self.active.iter().any(|listener| listener.slot == slot)
    }

    /// Detach everything this card registered.
    pub fn detach_all(&mut self) {
        for listener in &self.active {
            listener.detach();
        }
        self.retired.append(&mut self.active);
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach_all();
    }
}
