//! Periodic coordinate mapping for the endless grid.

use glam::Vec2;

use crate::constants::WRAP_REBASE_PERIODS;
use crate::layout::Bounds;

/// Reduce `value` into `[low, high)` by periodic repetition.
///
/// The interval is closed at `low` and open at `high`: a value landing exactly
/// on `high` maps to `low`, so a tile is never drawn at both seams.
pub fn wrap(low: f32, high: f32, value: f32) -> f32 {
    let range = high - low;
    if !(range > 0.0) {
        return low;
    }
    let wrapped = (value - low).rem_euclid(range) + low;
    // rem_euclid can round up to `range` for tiny negative inputs
    if wrapped >= high {
        low
    } else {
        wrapped
    }
}

/// The region tiles wrap within, derived from the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapRegion {
    pub half_extents: Vec2,
    pub spacing: f32,
    pub bias: f32,
}

impl WrapRegion {
    pub fn new(bounds: &Bounds, bias: f32) -> Self {
        Self {
            half_extents: bounds.half_extents(),
            spacing: bounds.spacing,
            bias,
        }
    }

    /// Lower corner of the wrap interval
    pub fn low(&self) -> Vec2 {
        -self.half_extents - Vec2::splat(self.spacing)
    }

    /// Upper corner of the wrap interval
    pub fn high(&self) -> Vec2 {
        self.half_extents
    }

    /// Repeat distance per axis: one grid plus one gap
    pub fn period(&self) -> Vec2 {
        self.high() - self.low()
    }

    /// Whole-period shift that pulls a far-away `offset` back toward the
    /// origin without moving any mapped position. Zero on axes still within
    /// [`WRAP_REBASE_PERIODS`] periods.
    ///
    /// With `parallax` each tile scales vertical scroll by its own factor, so a
    /// whole period no longer maps every tile onto itself and `y` is kept.
    pub fn rebase_shift(&self, offset: Vec2, parallax: bool) -> Vec2 {
        let period = self.period();
        let axis = |value: f32, period: f32| {
            if period > 0.0 && value.abs() > WRAP_REBASE_PERIODS * period {
                (value / period).trunc() * period
            } else {
                0.0
            }
        };
        Vec2::new(
            axis(offset.x, period.x),
            if parallax { 0.0 } else { axis(offset.y, period.y) },
        )
    }

    /// Visible position of a tile anchored at `anchor` for scroll `offset`.
    pub fn map(&self, anchor: Vec2, offset: Vec2) -> Vec2 {
        let low = self.low();
        let high = self.high();
        Vec2::new(
            wrap(low.x, high.x, anchor.x + offset.x),
            wrap(low.y, high.y, anchor.y + offset.y + self.bias),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{build_layout, OccupancyMatrix};
    use proptest::prelude::*;

    /// Distance between two points on a circle of circumference `period`
    fn circular_distance(a: f32, b: f32, period: f32) -> f32 {
        let d = (a - b).abs() % period;
        d.min(period - d)
    }

    #[test]
    fn test_wrap_inside_interval_is_identity() {
        assert_eq!(wrap(-2.0, 3.0, 1.5), 1.5);
        assert_eq!(wrap(-2.0, 3.0, -2.0), -2.0);
    }

    #[test]
    fn test_wrap_high_maps_to_low() {
        assert_eq!(wrap(-2.0, 3.0, 3.0), -2.0);
        assert_eq!(wrap(-2.0, 3.0, 8.0), -2.0);
    }

    #[test]
    fn test_wrap_negative_values() {
        assert!((wrap(0.0, 4.0, -1.0) - 3.0).abs() < 1e-6);
        assert!((wrap(0.0, 4.0, -9.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_tiny_negative_stays_below_high() {
        let v = wrap(0.0, 5.0, -1e-9);
        assert!(v < 5.0);
        assert!(v >= 0.0);
    }

    #[test]
    fn test_wrap_degenerate_interval() {
        assert_eq!(wrap(1.0, 1.0, 7.0), 1.0);
    }

    #[test]
    fn test_period_is_one_grid_pitch() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 1, 1], &[1, 1, 1]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let region = WrapRegion::new(&layout.bounds, 0.55);
        let period = region.period();
        assert!((period.x - 3.0 * 1.075).abs() < 1e-5);
        assert!((period.y - 2.0 * 1.075).abs() < 1e-5);
    }

    #[test]
    fn test_offset_by_period_lands_on_same_position() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 2, 0], &[1, 0, 0]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let region = WrapRegion::new(&layout.bounds, 0.55);
        let offset = Vec2::new(0.3, -1.2);
        for tile in &layout.tiles {
            let a = region.map(tile.anchor, offset);
            let b = region.map(tile.anchor, offset + region.period());
            assert!(circular_distance(a.x, b.x, region.period().x) < 1e-4);
            assert!(circular_distance(a.y, b.y, region.period().y) < 1e-4);
        }
    }

    #[test]
    fn test_rebase_shift_preserves_positions() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 2, 0], &[1, 0, 0]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let region = WrapRegion::new(&layout.bounds, 0.55);
        let period = region.period();

        assert_eq!(region.rebase_shift(Vec2::new(1.0, -2.0), false), Vec2::ZERO);

        let offset = Vec2::new(57.31, -41.06);
        let shift = region.rebase_shift(offset, false);
        let rebased = offset - shift;
        assert!(rebased.x.abs() < period.x);
        assert!(rebased.y.abs() < period.y);
        assert!(((shift.x / period.x).round() * period.x - shift.x).abs() < 1e-4);
        for tile in &layout.tiles {
            let a = region.map(tile.anchor, offset);
            let b = region.map(tile.anchor, rebased);
            assert!(circular_distance(a.x, b.x, period.x) < 1e-3);
            assert!(circular_distance(a.y, b.y, period.y) < 1e-3);
        }

        let shift = region.rebase_shift(offset, true);
        assert!(shift.x != 0.0);
        assert_eq!(shift.y, 0.0);
    }

    #[test]
    fn test_wrapped_tiles_keep_distinct_positions() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 1, 1, 1], &[1, 1, 1, 1]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let region = WrapRegion::new(&layout.bounds, 0.55);
        let offset = Vec2::new(12.34, -7.89);
        let positions: Vec<Vec2> = layout
            .tiles
            .iter()
            .map(|t| region.map(t.anchor, offset))
            .collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > 0.5);
            }
        }
    }

    proptest! {
        #[test]
        fn wrap_is_periodic(
            low in -50.0f32..50.0,
            width in 0.5f32..40.0,
            value in -1000.0f32..1000.0,
        ) {
            let high = low + width;
            let a = wrap(low, high, value);
            let b = wrap(low, high, value + width);
            prop_assert!(a >= low && a < high);
            prop_assert!(b >= low && b < high);
            prop_assert!(circular_distance(a, b, width) < 1e-3);
        }

        #[test]
        fn mapped_positions_stay_in_region(
            ox in -500.0f32..500.0,
            oy in -500.0f32..500.0,
        ) {
            let matrix = OccupancyMatrix::from_codes(&[&[1, 1, 2], &[1, 0, 0]]).unwrap();
            let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
            let region = WrapRegion::new(&layout.bounds, 0.55);
            for tile in &layout.tiles {
                let p = region.map(tile.anchor, Vec2::new(ox, oy));
                prop_assert!(p.x >= region.low().x && p.x < region.high().x);
                prop_assert!(p.y >= region.low().y && p.y < region.high().y);
            }
        }
    }
}
