//! Per-frame tile placement and shader parameter updates.

use glam::Vec2;
use hecs::World;

use crate::components::{EffectParams, TileVisual, Transform};
use crate::layout::TileDescriptor;
use crate::wrap::WrapRegion;

/// Inputs to [`place_tiles`] that stay fixed for a frame
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub offset: Vec2,
    pub region: WrapRegion,
    pub parallax: bool,
    /// Edge length a fully centered tile grows to, in world units
    pub focus_extent: f32,
}

/// Wrap every tile into the region and derive its rendering transform.
pub fn place_tiles(world: &mut World, placement: &Placement) {
    for (_entity, (tile, visual, transform)) in
        world.query_mut::<(&TileDescriptor, &mut TileVisual, &mut Transform)>()
    {
        let mut scroll = placement.offset;
        if placement.parallax {
            scroll.y *= tile.parallax;
        }
        visual.visible_position = placement.region.map(tile.anchor, scroll);
        transform.position = visual.visible_position * visual.center_factor;

        let focus_scale = placement.focus_extent / transform.size;
        transform.scale = focus_scale + (1.0 - focus_scale) * visual.center_factor;
    }
}

/// Copy the frame's deformation and each tile's visual state into its
/// shader parameters.
pub fn write_effect_params(
    world: &mut World,
    deformation: f32,
    pixels_per_unit: f32,
    platform_flag: bool,
) {
    for (_entity, (visual, transform, params)) in
        world.query_mut::<(&TileVisual, &Transform, &mut EffectParams)>()
    {
        *params = EffectParams {
            size_in_pixels: transform.extent() * pixels_per_unit,
            deformation,
            opacity: visual.opacity,
            center_progress: 1.0 - visual.center_factor,
            platform_flag,
        };
    }
}
