//! Pointer tracking and click detection.
//!
//! Knows nothing about focus or navigation; the gallery decides what each
//! gesture does in the current focus state.

use crate::constants::*;
use glam::Vec2;

/// How a pointer-up resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    /// Released where it was pressed: a pick gesture at this screen position
    Click(Vec2),
    /// Released after moving away from the press position
    DragEnd,
    /// No matching pointer-down was seen
    Unpaired,
}

/// Input state tracking
#[derive(Debug, Default)]
pub struct InputState {
    /// Last known pointer position in physical pixels
    pub pointer: Vec2,
    pressed_at: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Record a pointer-down at the current position.
    /// Returns false if the pointer was already down.
    pub fn pointer_pressed(&mut self) -> bool {
        if self.pressed_at.is_some() {
            return false;
        }
        self.pressed_at = Some(self.pointer);
        true
    }

    pub fn pointer_released(&mut self) -> PointerRelease {
        let Some(start) = self.pressed_at.take() else {
            return PointerRelease::Unpaired;
        };
        let moved = (self.pointer - start).abs();
        if moved.x > CLICK_DRAG_THRESHOLD || moved.y > CLICK_DRAG_THRESHOLD {
            PointerRelease::DragEnd
        } else {
            PointerRelease::Click(self.pointer)
        }
    }

    /// Forget a pending press, e.g. when the pointer leaves the window
    pub fn cancel(&mut self) {
        self.pressed_at = None;
    }
}
