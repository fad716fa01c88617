//! Inertial navigation: pointer drag and wheel input feed a target offset,
//! and a damped follower chases it once per frame.

use glam::Vec2;

use crate::config::NavigationConfig;
use crate::constants::*;

/// Wheel input as reported by the platform.
///
/// Uses the wheel-delta sign convention: positive `y` means the wheel was
/// rolled away from the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    Lines(Vec2),
    Pixels(Vec2),
}

/// Scroll offsets shared between input handlers and the frame tick.
///
/// Input writes `target` only; `current` is written by [`InertialNavigator::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigatorState {
    pub target: Vec2,
    pub current: Vec2,
    pub velocity_magnitude: f32,
}

pub struct InertialNavigator {
    state: NavigatorState,
    settings: NavigationConfig,
    /// Target minus scaled pointer position at pointer-down
    drag_anchor: Option<Vec2>,
}

impl InertialNavigator {
    pub fn new(settings: NavigationConfig) -> Self {
        Self {
            state: NavigatorState::default(),
            settings,
            drag_anchor: None,
        }
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    /// Smoothed offset as of the last `advance`
    pub fn offset(&self) -> Vec2 {
        self.state.current
    }

    /// Start a drag session at `pointer` (screen pixels).
    ///
    /// Returns false if a session is already running.
    pub fn begin_drag(&mut self, pointer: Vec2) -> bool {
        if self.drag_anchor.is_some() {
            return false;
        }
        self.drag_anchor = Some(self.state.target - self.pointer_to_world(pointer));
        true
    }

    /// Move the drag target so the grid follows the pointer.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(anchor) = self.drag_anchor {
            self.state.target = anchor + self.pointer_to_world(pointer);
        }
    }

    /// End the drag session. Returns false if none was running.
    pub fn end_drag(&mut self) -> bool {
        self.drag_anchor.take().is_some()
    }

    /// Nudge the target by a pointer delta (screen pixels) outside a session.
    pub fn apply_drag(&mut self, delta: Vec2) {
        self.state.target += self.pointer_to_world(delta);
    }

    pub fn apply_wheel(&mut self, delta: WheelDelta) {
        let wheel = &self.settings.wheel;
        let raw = match delta {
            WheelDelta::Lines(lines) => lines * wheel.line_multiplier,
            WheelDelta::Pixels(pixels) => pixels,
        };
        let scaled = raw * wheel.pixel_multiplier * wheel.platform_scale;
        self.state.target.x += scaled.x;
        self.state.target.y -= scaled.y;
    }

    /// Move `target`, `current` and any drag anchor back by `shift`.
    ///
    /// Their differences are unchanged, so an in-flight approach or drag
    /// carries on as before.
    pub fn rebase(&mut self, shift: Vec2) {
        self.state.target -= shift;
        self.state.current -= shift;
        if let Some(anchor) = self.drag_anchor.as_mut() {
            *anchor -= shift;
        }
    }

    /// Integrate one frame and return the new smoothed offset.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        let diff = self.state.target - self.state.current;
        self.state.velocity_magnitude = (diff.x.abs().max(diff.y.abs())
            * self.settings.deformation_scale)
            .min(NAV_MAX_DEFORMATION);

        if dt > 0.0 {
            let k = 1.0 - (1.0 - self.settings.damping).powf(dt * NAV_REFERENCE_FPS);
            let current = self.state.current;
            let target = self.state.target;
            self.state.current = Vec2::new(
                step_axis(current.x, target.x, k),
                step_axis(current.y, target.y, k),
            );
        }

        self.state.current
    }

    fn pointer_to_world(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(pointer.x, -pointer.y) * self.settings.drag_scale
    }
}

/// Round to the navigation quantum (two decimals)
fn quantize(value: f32) -> f32 {
    (value * NAV_ROUNDING_STEPS).round() / NAV_ROUNDING_STEPS
}

/// One damped step along a single axis.
fn step_axis(current: f32, target: f32, k: f32) -> f32 {
    let diff = target - current;
    let step = diff * k;

    // Once a step is smaller than half a rounding quantum it would be rounded
    // away every frame, so finish the approach instead of stalling
    if step.abs() < 0.5 / NAV_ROUNDING_STEPS {
        return target;
    }

    let next = quantize(current + step);
    if (target - next) * diff < 0.0 {
        target
    } else {
        next
    }
}
