//! UI rendering using egui.

mod debug_overlay;

pub use debug_overlay::{draw_debug_overlay, DebugOverlay, OverlayData, UiActions};
