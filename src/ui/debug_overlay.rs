//! Debug overlay: live navigation and focus state, plus a few toggles.

use std::collections::VecDeque;

use glam::Vec2;

use crate::events::GalleryEvent;
use crate::gallery::Gallery;

/// Number of recent events kept for display
const EVENT_HISTORY: usize = 12;

/// State for the debug overlay
pub struct DebugOverlay {
    pub visible: bool,
    recent_events: VecDeque<String>,
}

impl DebugOverlay {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            recent_events: VecDeque::with_capacity(EVENT_HISTORY),
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn record(&mut self, frame: u64, event: &GalleryEvent) {
        if self.recent_events.len() == EVENT_HISTORY {
            self.recent_events.pop_front();
        }
        self.recent_events.push_back(format!("#{frame} {}", describe(event)));
    }
}

fn describe(event: &GalleryEvent) -> String {
    match event {
        GalleryEvent::FocusStateChanged { from, to } => {
            format!("{} -> {}", from.label(), to.label())
        }
        GalleryEvent::TileFocused { tile } => format!("tile {tile} focused"),
        GalleryEvent::TileReleased { tile } => format!("tile {tile} released"),
        GalleryEvent::TweenFinished { tile, param } => format!("tile {tile} {param:?} settled"),
    }
}

/// Snapshot of gallery state shown by the overlay
pub struct OverlayData {
    pub focus: &'static str,
    pub focused_tile: Option<u32>,
    pub transition_remaining: f32,
    pub target: Vec2,
    pub current: Vec2,
    pub deformation: f32,
    pub tiles: usize,
    pub visible_tiles: usize,
    pub focused_tiles: usize,
    pub columns: usize,
    pub rows: usize,
    pub pixel_ratio: f32,
    pub fps: f32,
    pub parallax: bool,
}

impl OverlayData {
    pub fn from_gallery(gallery: &Gallery) -> Self {
        let nav = gallery.navigator_state();
        let stats = gallery.stats();
        let bounds = gallery.layout().bounds;
        Self {
            focus: gallery.focus_state().label(),
            focused_tile: gallery.focused_tile(),
            transition_remaining: gallery.transition_remaining(),
            target: nav.target,
            current: nav.current,
            deformation: stats.deformation,
            tiles: gallery.layout().tiles.len(),
            visible_tiles: stats.visible_tiles,
            focused_tiles: stats.focused_tiles,
            columns: bounds.columns,
            rows: bounds.rows,
            pixel_ratio: gallery.camera().pixel_ratio(),
            fps: if stats.dt > 0.0 { 1.0 / stats.dt } else { 0.0 },
            parallax: gallery.config().layout.parallax,
        }
    }
}

/// Actions requested through the overlay this frame
#[derive(Default)]
pub struct UiActions {
    pub set_parallax: Option<bool>,
    pub reload_layout: bool,
}

/// Draw the debug overlay
pub fn draw_debug_overlay(
    ctx: &egui::Context,
    overlay: &mut DebugOverlay,
    data: &OverlayData,
    actions: &mut UiActions,
) {
    if !overlay.visible {
        return;
    }

    egui::Window::new("Gallery")
        .fixed_pos([10.0, 10.0])
        .min_width(220.0)
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            egui::Grid::new("gallery_stats")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    let mut row = |label: &str, value: String| {
                        ui.label(label);
                        ui.monospace(value);
                        ui.end_row();
                    };
                    row("fps", format!("{:.0}", data.fps));
                    row("focus", data.focus.to_string());
                    row(
                        "focused tile",
                        data.focused_tile
                            .map_or_else(|| "-".to_string(), |id| id.to_string()),
                    );
                    row("transition", format!("{:.2}s", data.transition_remaining));
                    row("target", format!("{:.2}, {:.2}", data.target.x, data.target.y));
                    row("current", format!("{:.2}, {:.2}", data.current.x, data.current.y));
                    row("deformation", format!("{:.4}", data.deformation));
                    row(
                        "tiles",
                        format!(
                            "{} ({} on screen, {} focused)",
                            data.tiles, data.visible_tiles, data.focused_tiles
                        ),
                    );
                    row("grid", format!("{} x {}", data.columns, data.rows));
                    row("pixel ratio", format!("{:.2}", data.pixel_ratio));
                });

            ui.separator();
            let mut parallax = data.parallax;
            if ui.checkbox(&mut parallax, "Parallax").changed() {
                actions.set_parallax = Some(parallax);
            }
            if ui.button("Reload layout").clicked() {
                actions.reload_layout = true;
            }

            if !overlay.recent_events.is_empty() {
                ui.separator();
                ui.label("Events");
                for line in overlay.recent_events.iter().rev() {
                    ui.small(line.as_str());
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusState;

    #[test]
    fn test_event_history_is_bounded() {
        let mut overlay = DebugOverlay::new(true);
        for tile in 0..(EVENT_HISTORY as u32 + 5) {
            overlay.record(1, &GalleryEvent::TileFocused { tile });
        }
        assert_eq!(overlay.recent_events.len(), EVENT_HISTORY);
        assert_eq!(overlay.recent_events.back().unwrap(), "#1 tile 16 focused");
    }

    #[test]
    fn test_overlay_shows_applied_deformation() {
        use crate::config::GalleryConfig;
        use crate::navigator::WheelDelta;

        let mut gallery = Gallery::new(GalleryConfig::default(), 800.0, 600.0).unwrap();
        gallery.wheel(WheelDelta::Pixels(Vec2::new(0.0, 300.0)));
        gallery.frame(1.0 / 60.0);
        let data = OverlayData::from_gallery(&gallery);
        assert!(data.deformation > 0.0);
        assert_eq!(data.deformation, gallery.stats().deformation);
    }

    #[test]
    fn test_state_change_description() {
        let event = GalleryEvent::FocusStateChanged {
            from: FocusState::Grid,
            to: FocusState::TransitioningToFocus,
        };
        assert_eq!(describe(&event), "grid -> opening");
    }
}
