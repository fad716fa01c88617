//! Tile tween systems: fading tiles out and back in, moving a tile to the
//! view center and returning it.

use hecs::World;

use crate::components::{TileTweens, TileVisual};
use crate::config::FocusConfig;
use crate::events::{EventQueue, GalleryEvent, TweenParam};
use crate::layout::TileDescriptor;
use crate::tween::{retarget, Ease};

/// Fade a tile out. A focused tile is never hidden.
///
/// Returns true if a fade was started; a tile already fading out is left
/// alone.
pub fn hide(visual: &TileVisual, tweens: &mut TileTweens, settings: &FocusConfig) -> bool {
    if visual.is_focused {
        return false;
    }
    retarget(
        &mut tweens.opacity,
        visual.opacity,
        0.0,
        settings.tween_duration,
        Ease::ExpoOut,
    )
}

/// Mark a tile focused and move it toward the view center.
pub fn in_center(visual: &mut TileVisual, tweens: &mut TileTweens, settings: &FocusConfig) {
    visual.is_focused = true;
    // A tile faded mid-way by an earlier transition comes back fully opaque
    retarget(
        &mut tweens.opacity,
        visual.opacity,
        1.0,
        settings.tween_duration,
        Ease::ExpoInOut,
    );
    retarget(
        &mut tweens.center,
        visual.center_factor,
        0.0,
        settings.tween_duration,
        Ease::ExpoInOut,
    );
}

/// Undo `hide` or `in_center`.
///
/// A focused tile travels back to its grid slot and stays focused until the
/// move completes; any other tile fades back in.
pub fn reveal(visual: &TileVisual, tweens: &mut TileTweens, settings: &FocusConfig) {
    if visual.is_focused {
        retarget(
            &mut tweens.center,
            visual.center_factor,
            1.0,
            settings.tween_duration,
            Ease::ExpoInOut,
        );
    } else {
        retarget(
            &mut tweens.opacity,
            visual.opacity,
            1.0,
            settings.tween_duration,
            Ease::ExpoInOut,
        );
    }
}

/// Focus tile `id` and hide every other tile. Returns false if no such tile.
pub fn focus_tile(world: &mut World, id: u32, settings: &FocusConfig) -> bool {
    let mut found = false;
    for (_entity, (tile, visual, tweens)) in
        world.query_mut::<(&TileDescriptor, &mut TileVisual, &mut TileTweens)>()
    {
        if tile.id == id {
            in_center(visual, tweens, settings);
            found = true;
        }
    }
    if !found {
        return false;
    }
    for (_entity, (tile, visual, tweens)) in
        world.query_mut::<(&TileDescriptor, &TileVisual, &mut TileTweens)>()
    {
        if tile.id != id {
            hide(visual, tweens, settings);
        }
    }
    true
}

/// Reveal every tile
pub fn reveal_all(world: &mut World, settings: &FocusConfig) {
    for (_entity, (visual, tweens)) in world.query_mut::<(&TileVisual, &mut TileTweens)>() {
        reveal(visual, tweens, settings);
    }
}

/// Advance every tile tween and write the values back into `TileVisual`.
///
/// A focused tile whose center tween lands back at 1.0 loses its focus flag.
pub fn update_tweens(world: &mut World, dt: f32, events: &mut EventQueue) {
    for (_entity, (tile, visual, tweens)) in
        world.query_mut::<(&TileDescriptor, &mut TileVisual, &mut TileTweens)>()
    {
        if tweens.is_idle() {
            continue;
        }

        if let Some(tween) = tweens.opacity.as_mut() {
            let running = tween.update(dt);
            visual.opacity = tween.value();
            if !running {
                tweens.opacity = None;
                events.push(GalleryEvent::TweenFinished {
                    tile: tile.id,
                    param: TweenParam::Opacity,
                });
            }
        }

        if let Some(tween) = tweens.center.as_mut() {
            let running = tween.update(dt);
            visual.center_factor = tween.value();
            if !running {
                let to = tween.to;
                tweens.center = None;
                events.push(GalleryEvent::TweenFinished {
                    tile: tile.id,
                    param: TweenParam::Center,
                });
                if to >= 1.0 && visual.is_focused {
                    visual.is_focused = false;
                    events.push(GalleryEvent::TileReleased { tile: tile.id });
                }
            }
        }
    }
}

/// Number of tiles currently flagged as focused
pub fn focused_count(world: &World) -> usize {
    world
        .query::<&TileVisual>()
        .iter()
        .filter(|(_, visual)| visual.is_focused)
        .count()
}
