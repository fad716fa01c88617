//! Tile entity spawning.
//!
//! One entity per layout tile, carrying its descriptor plus the visual,
//! transform, shader and tween components the systems operate on.

use hecs::{Entity, World};

use crate::components::{EffectParams, TileTweens, TileVisual, Transform};
use crate::layout::{Layout, TileDescriptor};

/// Spawn an entity for every tile in `layout`, in layout order.
pub fn spawn_tiles(world: &mut World, layout: &Layout) -> Vec<Entity> {
    layout
        .tiles
        .iter()
        .map(|tile| {
            let size = layout.bounds.size_of(tile.size_class);
            let visual = TileVisual {
                visible_position: tile.anchor,
                ..TileVisual::default()
            };
            let mut transform = Transform::new(size);
            transform.position = tile.anchor;
            world.spawn((
                *tile,
                visual,
                transform,
                EffectParams {
                    opacity: 1.0,
                    ..EffectParams::default()
                },
                TileTweens::default(),
            ))
        })
        .collect()
}

/// Remove every tile entity, returns how many were despawned.
pub fn despawn_tiles(world: &mut World) -> usize {
    let entities: Vec<Entity> = world
        .query::<&TileDescriptor>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    let count = entities.len();
    for entity in entities {
        let _ = world.despawn(entity);
    }
    count
}

/// Find the entity for tile `id`
#[cfg(test)]
pub fn find_tile(world: &World, id: u32) -> Option<Entity> {
    world
        .query::<&TileDescriptor>()
        .iter()
        .find(|(_, tile)| tile.id == id)
        .map(|(entity, _)| entity)
}
