//! Render data collection and pointer hit testing.

use glam::Vec2;
use hecs::World;

use crate::components::{EffectParams, TileVisual, Transform};
use crate::layout::TileDescriptor;

/// Tiles at or below this opacity are neither drawn nor pickable
const MIN_VISIBLE_OPACITY: f32 = 0.01;

/// Tile ready for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTile {
    pub id: u32,
    pub position: Vec2,
    /// Edge length in world units, scale applied
    pub extent: f32,
    pub params: EffectParams,
}

/// Collect visible tiles in draw order: the focused tile goes last so it
/// renders on top.
pub fn collect_renderables(world: &World) -> Vec<RenderTile> {
    let mut tiles: Vec<(bool, RenderTile)> = world
        .query::<(&TileDescriptor, &TileVisual, &Transform, &EffectParams)>()
        .iter()
        .filter(|(_, (_, visual, _, _))| visual.opacity > MIN_VISIBLE_OPACITY)
        .map(|(_, (tile, visual, transform, params))| {
            (
                visual.is_focused,
                RenderTile {
                    id: tile.id,
                    position: transform.position,
                    extent: transform.extent(),
                    params: *params,
                },
            )
        })
        .collect();
    tiles.sort_by_key(|(focused, tile)| (*focused, tile.id));
    tiles.into_iter().map(|(_, tile)| tile).collect()
}

/// Id of the tile under `point` (world units), if any.
///
/// The focused tile wins over others; among the rest the tile whose center is
/// closest to the point wins.
pub fn hit_test(world: &World, point: Vec2) -> Option<u32> {
    world
        .query::<(&TileDescriptor, &TileVisual, &Transform)>()
        .iter()
        .filter(|(_, (_, visual, transform))| {
            visual.opacity > MIN_VISIBLE_OPACITY && transform.contains(point)
        })
        .min_by(|(_, (_, va, ta)), (_, (_, vb, tb))| {
            vb.is_focused.cmp(&va.is_focused).then_with(|| {
                ta.position
                    .distance_squared(point)
                    .total_cmp(&tb.position.distance_squared(point))
            })
        })
        .map(|(_, (tile, _, _))| tile.id)
}
