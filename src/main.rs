mod app;
mod camera;
mod components;
mod config;
mod constants;
mod error;
mod events;
mod focus;
mod gallery;
mod input;
mod layout;
mod navigator;
mod renderer;
mod spawning;
mod systems;
mod tween;
mod ui;
mod wrap;

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec2;
use glutin::prelude::*;
use glutin::surface::WindowSurface;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

use egui_glow::EguiGlow;

use config::GalleryConfig;
use constants::*;
use error::GalleryError;
use focus::FocusState;
use gallery::Gallery;
use navigator::WheelDelta;
use renderer::Renderer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wrapgrid=info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GalleryConfig::load(config_path.as_deref())?;

    let profiler = if config.debug.profiler {
        puffin::set_scopes_on(true);
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        match puffin_http::Server::new(&addr) {
            Ok(server) => {
                tracing::info!("puffin server listening on {addr}");
                Some(server)
            }
            Err(err) => {
                tracing::warn!("failed to start puffin server: {err}");
                None
            }
        }
    } else {
        None
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, config_path);
    event_loop.run_app(&mut app)?;
    drop(profiler);

    match app.fatal.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

struct App {
    state: Option<AppState>,
    config: GalleryConfig,
    config_path: Option<PathBuf>,
    /// Startup failure raised inside the event loop
    fatal: Option<GalleryError>,
}

struct AppState {
    // Window and GL
    window: Window,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    egui_glow: EguiGlow,

    // Rendering
    renderer: Renderer,

    // Gallery
    gallery: Gallery,
    config_path: Option<PathBuf>,

    // UI state
    overlay: ui::DebugOverlay,

    // Timing
    last_frame_time: Instant,
}

impl App {
    fn new(config: GalleryConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            state: None,
            config,
            config_path,
            fatal: None,
        }
    }

    fn init_state(&self, event_loop: &ActiveEventLoop) -> Result<AppState, GalleryError> {
        let app::WindowContext {
            window,
            gl_surface,
            gl_context,
            gl,
            egui_glow,
        } = app::create_window(event_loop)?;

        let size = window.inner_size();
        let renderer = Renderer::new(gl).map_err(GalleryError::Renderer)?;
        renderer.resize(size.width as i32, size.height as i32);

        let mut gallery = Gallery::new(self.config.clone(), size.width as f32, size.height as f32)?;
        gallery.resize(size.width as f32, size.height as f32, window.scale_factor() as f32);

        Ok(AppState {
            window,
            gl_surface,
            gl_context,
            egui_glow,
            renderer,
            gallery,
            config_path: self.config_path.clone(),
            overlay: ui::DebugOverlay::new(self.config.debug.overlay),
            last_frame_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.init_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                tracing::error!("startup failed: {err}");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        // Let egui handle the event first
        let egui_consumed = state.egui_glow.on_window_event(&state.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app::resize_surface(&state.gl_surface, &state.gl_context, size.width, size.height);
                state.renderer.resize(size.width as i32, size.height as i32);
                let scale_factor = state.window.scale_factor() as f32;
                state
                    .gallery
                    .resize(size.width as f32, size.height as f32, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.window.inner_size();
                state
                    .gallery
                    .resize(size.width as f32, size.height as f32, scale_factor as f32);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if egui_consumed || event.state != ElementState::Pressed {
                    return;
                }
                let repeat = event.repeat;
                if let PhysicalKey::Code(key) = event.physical_key {
                    match key {
                        KeyCode::Escape if !repeat => {
                            if !state.gallery.close_focused()
                                && state.gallery.focus_state() == FocusState::Grid
                            {
                                event_loop.exit();
                            }
                        }
                        KeyCode::Backquote if !repeat => state.overlay.toggle(),
                        KeyCode::ArrowLeft => state.gallery.nudge(Vec2::new(-KEY_PAN_PIXELS, 0.0)),
                        KeyCode::ArrowRight => state.gallery.nudge(Vec2::new(KEY_PAN_PIXELS, 0.0)),
                        KeyCode::ArrowUp => state.gallery.nudge(Vec2::new(0.0, -KEY_PAN_PIXELS)),
                        KeyCode::ArrowDown => state.gallery.nudge(Vec2::new(0.0, KEY_PAN_PIXELS)),
                        KeyCode::F11 if !repeat => {
                            let fullscreen = if state.window.fullscreen().is_some() {
                                None
                            } else {
                                Some(Fullscreen::Borderless(None))
                            };
                            state.window.set_fullscreen(fullscreen);
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state
                    .gallery
                    .pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                state.gallery.pointer_left();
            }
            WindowEvent::MouseInput {
                state: btn_state,
                button: MouseButton::Left,
                ..
            } => match btn_state {
                ElementState::Pressed if !egui_consumed => state.gallery.pointer_pressed(),
                ElementState::Pressed => {}
                // Releases always pass through so a press never stays stuck
                ElementState::Released => state.gallery.pointer_released(),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                if !egui_consumed {
                    let delta = match delta {
                        MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines(Vec2::new(x, y)),
                        MouseScrollDelta::PixelDelta(pos) => {
                            WheelDelta::Pixels(Vec2::new(pos.x as f32, pos.y as f32))
                        }
                    };
                    state.gallery.wheel(delta);
                }
            }
            WindowEvent::RedrawRequested => {
                state.update_and_render();
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

impl AppState {
    fn update_and_render(&mut self) {
        puffin::GlobalProfiler::lock().new_frame();
        puffin::profile_function!();

        let current_time = Instant::now();
        let raw_dt = (current_time - self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;

        // Cap dt so a stalled frame cannot skip most of a transition
        let dt = raw_dt.min(MAX_FRAME_DT);

        let events = self.gallery.frame(dt);
        let frame = self.gallery.stats().frame;
        for event in &events {
            self.overlay.record(frame, event);
        }

        let actions = self.run_ui();
        self.process_ui_actions(actions);

        {
            puffin::profile_scope!("render_tiles");
            self.renderer.clear();
            let tiles = self.gallery.renderables();
            self.renderer.render_tiles(self.gallery.camera(), &tiles);
        }

        self.egui_glow.paint(&self.window);

        if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
            tracing::warn!("swap_buffers failed: {err}");
        }
    }

    fn run_ui(&mut self) -> ui::UiActions {
        let mut actions = ui::UiActions::default();
        let data = ui::OverlayData::from_gallery(&self.gallery);
        let overlay = &mut self.overlay;

        self.egui_glow.run(&self.window, |ctx| {
            ui::draw_debug_overlay(ctx, overlay, &data, &mut actions);
        });

        actions
    }

    fn process_ui_actions(&mut self, actions: ui::UiActions) {
        if let Some(enabled) = actions.set_parallax {
            self.gallery.set_parallax(enabled);
        }

        if actions.reload_layout {
            let result = GalleryConfig::load(self.config_path.as_deref())
                .and_then(|config| self.gallery.set_layout_config(config.layout));
            if let Err(err) = result {
                tracing::warn!("layout reload failed: {err}");
            }
        }
    }
}
