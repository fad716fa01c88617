//! Gallery event system for decoupled communication between the frame
//! driver, the focus controller and the debug overlay.
//!
//! The controller and tile systems push events during a frame, the driver
//! drains them at the end of it.

use crate::focus::FocusState;

/// Which animated tile property a tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenParam {
    Opacity,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// The focus state machine moved between states
    FocusStateChanged { from: FocusState, to: FocusState },
    /// A tile was picked and started moving to the center
    TileFocused { tile: u32 },
    /// A focused tile finished returning to its grid slot
    TileReleased { tile: u32 },
    /// A tile tween reached its end value
    TweenFinished { tile: u32, param: TweenParam },
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Default)]
pub struct EventQueue {
    events: Vec<GalleryEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GalleryEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GalleryEvent> + '_ {
        self.events.drain(..)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
