use glam::Vec2;

/// Pointer input the card understands, in page coordinates.
/// The bridge translates DOM mouse/touch events into these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A press began on the overlay.
    Down { page: Vec2 },
    /// The pointer moved over the overlay.
    Move { page: Vec2 },
    /// The press ended.
    Up,
    /// The pointer left the overlay.
    Leave,
}

/// Which DOM event family drives the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerFamily {
    Mouse,
    Touch,
}

impl PointerFamily {
    /// Pick the family from a touch-capability check done once per card.
    pub fn detect(touch_capable: bool) -> Self {
        if touch_capable {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    pub fn event_names(self) -> EventNames {
        match self {
            Self::Mouse => EventNames {
                down: "mousedown",
                moves: "mousemove",
                up: "mouseup",
                leave: "mouseout",
            },
            Self::Touch => EventNames {
                down: "touchstart",
                moves: "touchmove",
                up: "touchend",
                leave: "touchcancel",
            },
        }
    }
}

/// DOM event names a card listens for, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNames {
    pub down: &'static str,
    pub moves: &'static str,
    pub up: &'static str,
    pub leave: &'static str,
}
