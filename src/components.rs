use glam::Vec2;

use crate::tween::Tween;

/// Per-frame visual state of a tile, written by placement and the tweens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisual {
    /// Wrapped position before the center factor is applied
    pub visible_position: Vec2,
    pub opacity: f32,
    /// 1.0 at the grid slot, 0.0 at the view center
    pub center_factor: f32,
    pub is_focused: bool,
}

impl Default for TileVisual {
    fn default() -> Self {
        Self {
            visible_position: Vec2::ZERO,
            opacity: 1.0,
            center_factor: 1.0,
            is_focused: false,
        }
    }
}

/// Rendering transform in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Edge length at scale 1.0
    pub size: f32,
    pub scale: f32,
}

impl Transform {
    pub fn new(size: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            scale: 1.0,
        }
    }

    /// Edge length as drawn
    pub fn extent(&self) -> f32 {
        self.size * self.scale
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.extent() * 0.5;
        let d = (point - self.position).abs();
        d.x <= half && d.y <= half
    }
}

/// Values handed to the tile shader each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectParams {
    pub size_in_pixels: f32,
    pub deformation: f32,
    pub opacity: f32,
    pub center_progress: f32,
    pub platform_flag: bool,
}

/// In-flight tweens, at most one per animated property
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileTweens {
    pub opacity: Option<Tween>,
    pub center: Option<Tween>,
}

impl TileTweens {
    pub fn is_idle(&self) -> bool {
        self.opacity.is_none() && self.center.is_none()
    }
}
