//! Tile systems organized by concern:
//! - `animation`: hide / center / reveal tweens and their per-frame update
//! - `placement`: wrapping tiles into view and filling shader parameters
//! - `rendering`: render data collection and hit testing

pub mod animation;
pub mod placement;
pub mod rendering;

pub use animation::{focus_tile, focused_count, reveal_all, update_tweens};
pub use placement::{place_tiles, write_effect_params, Placement};
pub use rendering::{collect_renderables, hit_test, RenderTile};
