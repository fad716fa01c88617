//! The frame driver: owns the tile world and every controller, routes input
//! through the focus gate and runs the per-frame update in a fixed order.

use glam::Vec2;
use hecs::World;

use crate::camera::Camera;
use crate::components::{TileVisual, Transform};
use crate::config::{GalleryConfig, LayoutConfig};
use crate::error::{ConfigError, GalleryError};
use crate::events::{EventQueue, GalleryEvent};
use crate::focus::{FocusController, FocusState, InputGate};
use crate::input::{InputState, PointerRelease};
use crate::layout::{build_layout, Layout};
use crate::navigator::{InertialNavigator, NavigatorState, WheelDelta};
use crate::spawning;
use crate::systems::{self, Placement, RenderTile};
use crate::wrap::WrapRegion;

/// Summary of the last frame, read by the debug overlay
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub dt: f32,
    pub visible_tiles: usize,
    pub focused_tiles: usize,
    pub deformation: f32,
}

pub struct Gallery {
    world: World,
    layout: Layout,
    region: WrapRegion,
    navigator: InertialNavigator,
    focus: FocusController,
    input: InputState,
    camera: Camera,
    events: EventQueue,
    config: GalleryConfig,
    stats: FrameStats,
}

impl Gallery {
    pub fn new(config: GalleryConfig, viewport_width: f32, viewport_height: f32) -> Result<Self, GalleryError> {
        let layout = config.build_layout()?;
        let region = WrapRegion::new(&layout.bounds, config.layout.wrap_bias);
        let mut world = World::new();
        let spawned = spawning::spawn_tiles(&mut world, &layout);
        tracing::info!(
            tiles = spawned.len(),
            columns = layout.bounds.columns,
            rows = layout.bounds.rows,
            "gallery layout built"
        );

        let mut gallery = Self {
            world,
            region,
            layout,
            navigator: InertialNavigator::new(config.navigation),
            focus: FocusController::new(config.focus),
            input: InputState::new(),
            camera: Camera::new(viewport_width, viewport_height, config.view.world_height),
            events: EventQueue::new(),
            config,
            stats: FrameStats::default(),
        };
        gallery.place();
        Ok(gallery)
    }

    /// Swap in a whole layout section: matrix or items, tile size, spacing,
    /// wrap bias and parallax. On error the current layout stays.
    pub fn set_layout_config(&mut self, settings: LayoutConfig) -> Result<(), ConfigError> {
        if !settings.wrap_bias.is_finite() {
            return Err(ConfigError::invalid("layout.wrap_bias", "must be finite"));
        }
        let matrix = settings.occupancy()?;
        let layout = build_layout(&matrix, settings.small_size, settings.spacing)?;

        spawning::despawn_tiles(&mut self.world);
        spawning::spawn_tiles(&mut self.world, &layout);
        self.region = WrapRegion::new(&layout.bounds, settings.wrap_bias);
        self.layout = layout;
        self.config.layout = settings;
        self.focus.reset(&mut self.events);
        self.input.cancel();
        self.navigator.end_drag();
        tracing::info!(tiles = self.layout.tiles.len(), "layout replaced");
        tracing::debug!(items = ?matrix.to_items(), "layout items");
        self.place();
        Ok(())
    }

    #[cfg(test)]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn navigator_state(&self) -> &NavigatorState {
        self.navigator.state()
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn focused_tile(&self) -> Option<u32> {
        self.focus.focused()
    }

    pub fn transition_remaining(&self) -> f32 {
        self.focus.busy_remaining()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn set_parallax(&mut self, enabled: bool) {
        self.config.layout.parallax = enabled;
    }

    pub fn resize(&mut self, width: f32, height: f32, scale_factor: f32) {
        self.camera.resize(width, height);
        self.camera.set_scale_factor(scale_factor);
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.input.pointer_moved(position);
        if self.focus.input_gate() == InputGate::Navigate {
            self.navigator.drag_to(position);
        }
    }

    pub fn pointer_pressed(&mut self) {
        if self.focus.input_gate() == InputGate::Blocked {
            return;
        }
        if !self.input.pointer_pressed() {
            return;
        }
        if self.focus.input_gate() == InputGate::Navigate {
            self.navigator.begin_drag(self.input.pointer);
        }
    }

    pub fn pointer_released(&mut self) {
        self.navigator.end_drag();
        let gate = self.focus.input_gate();
        match self.input.pointer_released() {
            PointerRelease::Unpaired => {
                tracing::debug!("pointer-up without pointer-down ignored");
            }
            PointerRelease::DragEnd => {}
            PointerRelease::Click(_) if gate == InputGate::Blocked => {}
            PointerRelease::Click(position) => self.pick_at(position),
        }
    }

    /// Pan by a pointer-sized step, as if dragged by `delta` pixels
    pub fn nudge(&mut self, delta: Vec2) {
        if self.focus.input_gate() == InputGate::Navigate {
            self.navigator.apply_drag(delta);
        }
    }

    pub fn wheel(&mut self, delta: WheelDelta) {
        if self.focus.input_gate() == InputGate::Navigate {
            self.navigator.apply_wheel(delta);
        }
    }

    /// Close the open tile. Returns false if nothing was open to close.
    pub fn close_focused(&mut self) -> bool {
        match self.focus.input_gate() {
            InputGate::PickOnly => self.focus.pick(&mut self.world, None, &mut self.events),
            InputGate::Navigate | InputGate::Blocked => false,
        }
    }

    /// Pointer left the window: drop any half-finished gesture
    pub fn pointer_left(&mut self) {
        self.input.cancel();
        self.navigator.end_drag();
    }

    fn pick_at(&mut self, screen: Vec2) {
        let point = self.camera.screen_to_world(screen.x, screen.y);
        let hit = systems::hit_test(&self.world, point);
        self.focus.pick(&mut self.world, hit, &mut self.events);
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Run one frame and return the events it produced.
    pub fn frame(&mut self, dt: f32) -> Vec<GalleryEvent> {
        puffin::profile_function!();

        let frozen = self.focus.state().freezes_navigation();
        if !frozen {
            puffin::profile_scope!("navigate");
            self.navigator.advance(dt);
            let shift = self
                .region
                .rebase_shift(self.navigator.offset(), self.config.layout.parallax);
            if shift != Vec2::ZERO {
                tracing::debug!(?shift, "rebased scroll offset");
                self.navigator.rebase(shift);
            }
        }

        {
            puffin::profile_scope!("tweens");
            systems::update_tweens(&mut self.world, dt, &mut self.events);
            self.focus.update(dt, &mut self.events);
        }

        self.place();

        let deformation = if frozen {
            0.0
        } else {
            self.navigator.state().velocity_magnitude
        };
        systems::write_effect_params(
            &mut self.world,
            deformation,
            self.camera.shading_pixels_per_unit(),
            self.config.view.platform_flag,
        );

        self.stats = FrameStats {
            frame: self.stats.frame + 1,
            dt,
            visible_tiles: self.visible_tile_count(),
            focused_tiles: systems::focused_count(&self.world),
            deformation,
        };

        let events: Vec<GalleryEvent> = self.events.drain().collect();
        for event in &events {
            tracing::trace!(?event, "gallery event");
        }
        events
    }

    /// Tiles in draw order
    pub fn renderables(&self) -> Vec<RenderTile> {
        systems::collect_renderables(&self.world)
    }

    fn place(&mut self) {
        puffin::profile_function!();
        let placement = Placement {
            offset: self.navigator.offset(),
            region: self.region,
            parallax: self.config.layout.parallax,
            focus_extent: self.config.focus.focus_fill * self.camera.world_height,
        };
        systems::place_tiles(&mut self.world, &placement);
    }

    fn visible_tile_count(&self) -> usize {
        let half = self.camera.half_extents();
        self.world
            .query::<(&TileVisual, &Transform)>()
            .iter()
            .filter(|(_, (visual, transform))| {
                let reach = half + Vec2::splat(transform.extent() * 0.5);
                let d = transform.position.abs();
                visual.opacity > 0.0 && d.x <= reach.x && d.y <= reach.y
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FRAME_DT, WRAP_REBASE_PERIODS};
    use crate::layout::OccupancyMatrix;
    use crate::spawning::find_tile;

    fn gallery(json: &str) -> Gallery {
        let config = GalleryConfig::from_json_str(json).unwrap();
        Gallery::new(config, 800.0, 600.0).unwrap()
    }

    fn run(gallery: &mut Gallery, seconds: f32) -> Vec<GalleryEvent> {
        let mut events = Vec::new();
        for _ in 0..(seconds / FRAME_DT).round() as usize {
            events.extend(gallery.frame(FRAME_DT));
        }
        events
    }

    /// Screen position of a tile's center
    fn screen_of(gallery: &Gallery, id: u32) -> Vec2 {
        let entity = find_tile(gallery.world(), id).unwrap();
        let transform = *gallery
            .world()
            .get::<&Transform>(entity)
            .unwrap();
        let camera = gallery.camera();
        let half = camera.half_extents();
        Vec2::new(
            (transform.position.x / half.x + 1.0) * 0.5 * camera.viewport_width,
            (1.0 - transform.position.y / half.y) * 0.5 * camera.viewport_height,
        )
    }

    fn click(gallery: &mut Gallery, at: Vec2) {
        gallery.pointer_moved(at);
        gallery.pointer_pressed();
        gallery.pointer_released();
    }

    const SMALL_GRID: &str = r#"{ "layout": { "matrix": [[1, 1, 1], [1, 1, 1]], "wrap_bias": 0.0 } }"#;

    #[test]
    fn test_click_on_tile_opens_it() {
        let mut g = gallery(SMALL_GRID);
        let at = screen_of(&g, 3);
        click(&mut g, at);
        assert_eq!(g.focus_state(), FocusState::TransitioningToFocus);
        assert_eq!(g.focused_tile(), Some(3));

        let events = run(&mut g, 1.6);
        assert_eq!(g.focus_state(), FocusState::Focused);
        assert!(events.contains(&GalleryEvent::FocusStateChanged {
            from: FocusState::TransitioningToFocus,
            to: FocusState::Focused,
        }));

        let renderables = g.renderables();
        assert_eq!(renderables.len(), 1);
        let open = renderables[0];
        assert_eq!(open.id, 3);
        assert_eq!(open.position, Vec2::ZERO);
        assert_eq!(open.params.center_progress, 1.0);
    }

    #[test]
    fn test_click_anywhere_closes_focused_tile() {
        let mut g = gallery(SMALL_GRID);
        let at = screen_of(&g, 1);
        click(&mut g, at);
        run(&mut g, 1.6);

        click(&mut g, Vec2::new(5.0, 5.0));
        assert_eq!(g.focus_state(), FocusState::TransitioningToGrid);
        let events = run(&mut g, 1.6);
        assert_eq!(g.focus_state(), FocusState::Grid);
        assert!(events.contains(&GalleryEvent::TileReleased { tile: 1 }));
        assert_eq!(g.renderables().len(), 6);
    }

    #[test]
    fn test_navigation_blocked_while_transitioning() {
        let mut g = gallery(SMALL_GRID);
        let at = screen_of(&g, 2);
        click(&mut g, at);

        g.wheel(WheelDelta::Pixels(Vec2::new(500.0, 0.0)));
        g.pointer_pressed();
        g.pointer_moved(Vec2::new(0.0, 0.0));
        g.pointer_released();
        assert_eq!(g.navigator_state().target, Vec2::ZERO);
        assert_eq!(g.focus_state(), FocusState::TransitioningToFocus);
    }

    #[test]
    fn test_offset_frozen_while_focused() {
        let mut g = gallery(SMALL_GRID);
        g.wheel(WheelDelta::Pixels(Vec2::new(400.0, 0.0)));
        run(&mut g, 0.1);
        let at = screen_of(&g, 5);
        click(&mut g, at);
        run(&mut g, 1.6);
        assert_eq!(g.focus_state(), FocusState::Focused);

        let frozen = g.navigator_state().current;
        run(&mut g, 0.5);
        assert_eq!(g.navigator_state().current, frozen);
        assert_eq!(g.stats().deformation, 0.0);
    }

    #[test]
    fn test_drag_pans_and_is_not_a_click() {
        let mut g = gallery(SMALL_GRID);
        g.pointer_moved(Vec2::new(400.0, 300.0));
        g.pointer_pressed();
        g.pointer_moved(Vec2::new(480.0, 300.0));
        g.pointer_released();
        assert_eq!(g.focus_state(), FocusState::Grid);

        let target = g.navigator_state().target;
        assert!(target.x > 0.0);
        run(&mut g, 2.0);
        assert!((g.navigator_state().current - target).length() < 0.01);
    }

    #[test]
    fn test_long_scroll_stays_near_origin() {
        let mut g = gallery(SMALL_GRID);
        let period = g.region.period();
        for _ in 0..20 {
            g.wheel(WheelDelta::Pixels(Vec2::new(2000.0, -2000.0)));
            run(&mut g, 0.5);
        }
        run(&mut g, 3.0);

        let nav = *g.navigator_state();
        assert!(nav.current.x.abs() <= WRAP_REBASE_PERIODS * period.x + 1.0);
        assert!(nav.current.y.abs() <= WRAP_REBASE_PERIODS * period.y + 1.0);
        assert!((nav.current - nav.target).length() < 0.01);
        assert_eq!(g.renderables().len(), 6);
    }

    #[test]
    fn test_click_on_gap_does_nothing() {
        let mut g = gallery(SMALL_GRID);
        // Midway between tiles 1 and 2 lies in the spacing gap
        let a = screen_of(&g, 1);
        let b = screen_of(&g, 2);
        click(&mut g, (a + b) * 0.5);
        assert_eq!(g.focus_state(), FocusState::Grid);
    }

    #[test]
    fn test_close_focused_via_keyboard() {
        let mut g = gallery(SMALL_GRID);
        assert!(!g.close_focused());
        let at = screen_of(&g, 4);
        click(&mut g, at);
        assert!(!g.close_focused());
        run(&mut g, 1.6);
        assert!(g.close_focused());
        assert_eq!(g.focus_state(), FocusState::TransitioningToGrid);
    }

    #[test]
    fn test_pointer_up_without_down_is_ignored() {
        let mut g = gallery(SMALL_GRID);
        g.pointer_released();
        assert_eq!(g.focus_state(), FocusState::Grid);
        assert_eq!(g.navigator_state().target, Vec2::ZERO);
    }

    fn layout_with(matrix: &[&[u8]]) -> LayoutConfig {
        LayoutConfig {
            matrix: Some(OccupancyMatrix::from_codes(matrix).unwrap()),
            wrap_bias: 0.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_set_layout_config_replaces_tiles() {
        let mut g = gallery(SMALL_GRID);
        g.set_layout_config(layout_with(&[&[2, 0, 1], &[0, 0, 1]])).unwrap();
        assert_eq!(g.layout().tiles.len(), 3);
        assert_eq!(g.world().len(), 3);

        assert!(g.set_layout_config(layout_with(&[&[2, 1], &[1, 1]])).is_err());
        assert_eq!(g.world().len(), 3);
    }

    #[test]
    fn test_set_layout_config_applies_sizes_and_bias() {
        let mut g = gallery(SMALL_GRID);
        let settings = LayoutConfig {
            small_size: 0.5,
            spacing: 0.2,
            wrap_bias: 0.3,
            parallax: true,
            ..layout_with(&[&[1, 1], &[1, 1]])
        };
        g.set_layout_config(settings).unwrap();

        let bounds = g.layout().bounds;
        assert_eq!(bounds.small_size, 0.5);
        assert_eq!(bounds.spacing, 0.2);
        assert_eq!(g.region.bias, 0.3);
        assert!(g.config().layout.parallax);
        for tile in g.renderables() {
            assert!((tile.extent - 0.5).abs() < 1e-5);
        }

        let mut bad = g.config().layout.clone();
        bad.spacing = -1.0;
        assert!(g.set_layout_config(bad).is_err());
        assert_eq!(g.layout().bounds.spacing, 0.2);
    }

    #[test]
    fn test_effect_params_written_each_frame() {
        let mut g = gallery(SMALL_GRID);
        g.wheel(WheelDelta::Pixels(Vec2::new(0.0, 300.0)));
        g.frame(FRAME_DT);
        assert!(g.stats().deformation > 0.0);
        for tile in g.renderables() {
            assert_eq!(tile.params.deformation, g.stats().deformation);
            assert_eq!(tile.params.opacity, 1.0);
            assert!(tile.params.size_in_pixels > 0.0);
        }
    }

    #[test]
    fn test_focus_grows_tile_to_fill() {
        let mut g = gallery(SMALL_GRID);
        let at = screen_of(&g, 6);
        click(&mut g, at);
        run(&mut g, 1.6);
        let entity = find_tile(g.world(), 6).unwrap();
        let visual = *g.world().get::<&TileVisual>(entity).unwrap();
        assert_eq!(visual.center_factor, 0.0);
        let open = g.renderables()[0];
        let expected = g.config().focus.focus_fill * g.camera().world_height;
        assert!((open.extent - expected).abs() < 1e-5);
    }
}
