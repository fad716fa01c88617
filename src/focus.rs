//! Focus state machine: opens a picked tile at the view center and closes it
//! again, gating navigation input while a tile is open or moving.

use hecs::World;

use crate::config::FocusConfig;
use crate::events::{EventQueue, GalleryEvent};
use crate::systems;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Grid,
    TransitioningToFocus,
    Focused,
    TransitioningToGrid,
}

/// What input the current focus state lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputGate {
    /// Drag, wheel and pick
    Navigate,
    /// Only the pick gesture
    PickOnly,
    /// Nothing
    Blocked,
}

impl FocusState {
    pub fn input_gate(self) -> InputGate {
        match self {
            FocusState::Grid => InputGate::Navigate,
            FocusState::Focused => InputGate::PickOnly,
            FocusState::TransitioningToFocus | FocusState::TransitioningToGrid => {
                InputGate::Blocked
            }
        }
    }

    /// True while the scroll offset must stay frozen
    pub fn freezes_navigation(self) -> bool {
        matches!(self, FocusState::Focused | FocusState::TransitioningToGrid)
    }

    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            FocusState::TransitioningToFocus | FocusState::TransitioningToGrid
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FocusState::Grid => "grid",
            FocusState::TransitioningToFocus => "opening",
            FocusState::Focused => "focused",
            FocusState::TransitioningToGrid => "closing",
        }
    }
}

pub struct FocusController {
    state: FocusState,
    /// Id of the open tile; the tile entity owns its own visual state
    focused: Option<u32>,
    /// Seconds left in the current transition
    busy_remaining: f32,
    settings: FocusConfig,
}

impl FocusController {
    pub fn new(settings: FocusConfig) -> Self {
        Self {
            state: FocusState::Grid,
            focused: None,
            busy_remaining: 0.0,
            settings,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn focused(&self) -> Option<u32> {
        self.focused
    }

    pub fn input_gate(&self) -> InputGate {
        self.state.input_gate()
    }

    /// Seconds until the running transition settles, 0.0 when idle
    pub fn busy_remaining(&self) -> f32 {
        self.busy_remaining
    }

    /// Handle a resolved pick gesture. `hit` is the tile under the pointer.
    ///
    /// Returns true if a transition started. Picks arriving mid-transition
    /// are rejected.
    pub fn pick(&mut self, world: &mut World, hit: Option<u32>, events: &mut EventQueue) -> bool {
        match self.state {
            FocusState::Grid => {
                let Some(id) = hit else {
                    tracing::debug!("pick hit no tile");
                    return false;
                };
                if !systems::focus_tile(world, id, &self.settings) {
                    tracing::warn!(tile = id, "pick resolved to a tile that no longer exists");
                    return false;
                }
                self.focused = Some(id);
                events.push(GalleryEvent::TileFocused { tile: id });
                self.begin(FocusState::TransitioningToFocus, events);
                true
            }
            FocusState::Focused => {
                systems::reveal_all(world, &self.settings);
                self.begin(FocusState::TransitioningToGrid, events);
                true
            }
            FocusState::TransitioningToFocus | FocusState::TransitioningToGrid => {
                tracing::debug!(state = ?self.state, "pick ignored during transition");
                false
            }
        }
    }

    /// Advance the transition timer.
    pub fn update(&mut self, dt: f32, events: &mut EventQueue) {
        if !self.state.is_transitioning() {
            return;
        }
        self.busy_remaining -= dt;
        if self.busy_remaining > 0.0 {
            return;
        }
        self.busy_remaining = 0.0;
        match self.state {
            FocusState::TransitioningToFocus => self.set_state(FocusState::Focused, events),
            FocusState::TransitioningToGrid => {
                self.focused = None;
                self.set_state(FocusState::Grid, events);
            }
            FocusState::Grid | FocusState::Focused => {}
        }
    }

    /// Drop any open tile and return to the grid immediately
    pub fn reset(&mut self, events: &mut EventQueue) {
        self.focused = None;
        self.busy_remaining = 0.0;
        self.set_state(FocusState::Grid, events);
    }

    fn begin(&mut self, state: FocusState, events: &mut EventQueue) {
        self.busy_remaining = self.settings.transition_duration;
        self.set_state(state, events);
    }

    fn set_state(&mut self, to: FocusState, events: &mut EventQueue) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::debug!(from = from.label(), to = to.label(), "focus state changed");
        events.push(GalleryEvent::FocusStateChanged { from, to });
    }
}
