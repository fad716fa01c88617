//! Gallery constants organized by category.
//!
//! These are the defaults behind every tunable in `GalleryConfig`.

// =============================================================================
// LAYOUT
// =============================================================================

/// Edge length of a single-cell tile (world units)
pub const LAYOUT_SMALL_SIZE: f32 = 1.0;
/// Gap between neighbouring cells (world units)
pub const LAYOUT_SPACING: f32 = 0.075;
/// Vertical nudge applied before wrapping so seams never sit on a tile edge
pub const LAYOUT_WRAP_BIAS: f32 = 0.55;
/// Parallax factor step per tile id (factor = 1 - (id % 5) * step)
pub const LAYOUT_PARALLAX_STEP: f32 = 0.1;
/// Offsets further than this many wrap periods from the origin are rebased
pub const WRAP_REBASE_PERIODS: f32 = 4.0;
/// Number of distinct parallax layers
pub const LAYOUT_PARALLAX_LAYERS: u32 = 5;

// =============================================================================
// NAVIGATION
// =============================================================================

/// Fraction of the remaining distance covered per 60 Hz frame
pub const NAV_DAMPING: f32 = 0.085;
/// Frame rate the damping constant is tuned for
pub const NAV_REFERENCE_FPS: f32 = 60.0;
/// Offsets are rounded to this many steps per world unit (two decimals)
pub const NAV_ROUNDING_STEPS: f32 = 100.0;
/// World units moved per pixel of pointer drag
pub const NAV_DRAG_SCALE: f32 = 2.5 / 400.0;
/// World units per wheel pixel
pub const NAV_WHEEL_PIXEL_MULTIPLIER: f32 = 0.002;
/// Magnification applied to line-mode wheel deltas
pub const NAV_WHEEL_LINE_MULTIPLIER: f32 = 20.0;
/// Deformation per world unit of remaining scroll distance
pub const NAV_DEFORMATION_SCALE: f32 = 0.016;
/// Upper bound on deformation; the squash axis collapses at 1.0
pub const NAV_MAX_DEFORMATION: f32 = 0.5;

// =============================================================================
// FOCUS
// =============================================================================

/// Duration of hide/reveal/center tweens (seconds)
pub const FOCUS_TWEEN_DURATION: f32 = 1.0;
/// Busy window of a focus or defocus transition (seconds)
pub const FOCUS_TRANSITION_DURATION: f32 = 1.5;
/// Fraction of the visible height a focused tile grows to
pub const FOCUS_FILL: f32 = 0.7;

// =============================================================================
// VIEW / WINDOW
// =============================================================================

/// World units visible from the bottom to the top of the window
pub const VIEW_WORLD_HEIGHT: f32 = 2.84;
/// Lower clamp of the renderer pixel ratio
pub const VIEW_MIN_PIXEL_RATIO: f32 = 1.0;
/// Upper clamp of the renderer pixel ratio
pub const VIEW_MAX_PIXEL_RATIO: f32 = 1.5;
/// Corner radius of a tile as a fraction of its edge
pub const TILE_CORNER_RADIUS: f32 = 1.0 / 8.0;
/// Window clear color
pub const BACKGROUND_COLOR: [f32; 3] = [0.737, 0.843, 0.871];
/// Tile fill in the grid
pub const TILE_COLOR: [f32; 3] = [0.08, 0.08, 0.08];
/// Tile fill once fully centered
pub const TILE_FOCUS_COLOR: [f32; 3] = [0.96, 0.96, 0.94];

/// Default window width
pub const WINDOW_DEFAULT_WIDTH: u32 = 1280;
/// Default window height
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;

/// Pointer pixels one arrow key press pans by
pub const KEY_PAN_PIXELS: f32 = 40.0;

/// Click drag threshold (pixels) to distinguish click from drag
pub const CLICK_DRAG_THRESHOLD: f32 = 0.5;

/// Frame time cap so a stalled frame cannot skip a whole tween
pub const MAX_FRAME_DT: f32 = 0.1;
/// Nominal 60 Hz frame time
#[cfg(test)]
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Default location of the gallery configuration file
pub const DEFAULT_CONFIG_PATH: &str = "assets/gallery.json";
