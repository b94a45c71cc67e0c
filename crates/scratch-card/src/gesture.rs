//! Erase gesture state machine.
//!
//! `Idle --press--> Scratching --release/leave--> Idle`. Moves only draw
//! while scratching.

use glam::Vec2;

use crate::error::Result;
use crate::geometry::page_to_local;
use crate::surface::{Composite, OverlaySurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Scratching,
}

/// Turns page-space pointer input into erase strokes on a surface.
#[derive(Debug, Clone)]
pub struct Gesture {
    state: GestureState,
    /// Cached page offset of the overlay.
    offset: Vec2,
    force_repaint: bool,
}

impl Gesture {
    pub fn new(offset: Vec2, force_repaint: bool) -> Self {
        Self {
            state: GestureState::Idle,
            offset,
            force_repaint,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_scratching(&self) -> bool {
        self.state == GestureState::Scratching
    }

    /// Start a new erase path under the pointer.
    pub fn press<S: OverlaySurface>(&mut self, surface: &mut S, page: Vec2) {
        self.state = GestureState::Scratching;
        surface.begin_path(page_to_local(page, self.offset));
    }

    /// Extend the path and erase along it. Returns `false` when idle.
    pub fn drag<S: OverlaySurface>(&mut self, surface: &mut S, page: Vec2) -> Result<bool> {
        if !self.is_scratching() {
            return Ok(false);
        }
        surface.line_to(page_to_local(page, self.offset));
        surface.set_composite(Composite::DestinationOut)?;
        surface.stroke();
        if self.force_repaint {
            surface.nudge_repaint();
        }
        Ok(true)
    }

    /// End the current stroke.
    pub fn release<S: OverlaySurface>(&mut self, surface: &mut S) {
        self.state = GestureState::Idle;
        surface.close_path();
    }
}
