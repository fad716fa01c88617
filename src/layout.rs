//! Grid layout generation.
//!
//! Turns an occupancy matrix of small (1x1) and large (2x2) markers into tile
//! descriptors with world-space anchors centered on the origin.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::LayoutError;

/// One cell of the occupancy matrix.
///
/// Serialized the way layouts are authored by hand: `null` or `0` for an empty
/// cell, `1` for a small tile and `2` for a large tile anchored at this cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<u8>", into = "Option<u8>")]
pub enum CellMarker {
    #[default]
    Empty,
    Small,
    Large,
}

impl CellMarker {
    pub fn size_class(self) -> Option<SizeClass> {
        match self {
            CellMarker::Empty => None,
            CellMarker::Small => Some(SizeClass::Small),
            CellMarker::Large => Some(SizeClass::Large),
        }
    }
}

impl TryFrom<Option<u8>> for CellMarker {
    type Error = LayoutError;

    fn try_from(code: Option<u8>) -> Result<Self, Self::Error> {
        match code {
            None | Some(0) => Ok(CellMarker::Empty),
            Some(1) => Ok(CellMarker::Small),
            Some(2) => Ok(CellMarker::Large),
            Some(other) => Err(LayoutError::UnknownMarker(other)),
        }
    }
}

impl From<CellMarker> for Option<u8> {
    fn from(marker: CellMarker) -> Self {
        match marker {
            CellMarker::Empty => None,
            CellMarker::Small => Some(1),
            CellMarker::Large => Some(2),
        }
    }
}

/// Tile size class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    /// Number of cells covered along each axis
    pub fn span(self) -> usize {
        match self {
            SizeClass::Small => 1,
            SizeClass::Large => 2,
        }
    }
}

/// A tile as placed by a grid editor: cell coordinates plus extent in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub x: usize,
    pub y: usize,
    pub w: u8,
    pub h: u8,
}

/// Row-major grid of cell markers. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupancyMatrix {
    rows: Vec<Vec<CellMarker>>,
}

impl OccupancyMatrix {
    pub fn new(rows: Vec<Vec<CellMarker>>) -> Self {
        Self { rows }
    }

    /// Build from numeric codes (0 = empty, 1 = small, 2 = large).
    #[cfg(test)]
    pub fn from_codes(rows: &[&[u8]]) -> Result<Self, LayoutError> {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| CellMarker::try_from(Some(code)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// Build from editor items. Only 1x1 and 2x2 items are representable.
    pub fn from_items(items: &[LayoutItem]) -> Result<Self, LayoutError> {
        let mut rows: Vec<Vec<CellMarker>> = Vec::new();
        for item in items {
            let marker = match (item.w, item.h) {
                (1, 1) => CellMarker::Small,
                (2, 2) => CellMarker::Large,
                (w, h) => {
                    return Err(LayoutError::UnsupportedItem {
                        x: item.x,
                        y: item.y,
                        w,
                        h,
                    })
                }
            };
            if rows.len() <= item.y {
                rows.resize_with(item.y + 1, Vec::new);
            }
            let row = &mut rows[item.y];
            if row.len() <= item.x {
                row.resize(item.x + 1, CellMarker::Empty);
            }
            if row[item.x] != CellMarker::Empty {
                return Err(LayoutError::DuplicateItem {
                    x: item.x,
                    y: item.y,
                });
            }
            row[item.x] = marker;
        }
        Ok(Self { rows })
    }

    /// Editor items for every non-empty cell, in scan order.
    pub fn to_items(&self) -> Vec<LayoutItem> {
        self.tiles()
            .map(|(row, col, class)| {
                let span = class.span() as u8;
                LayoutItem {
                    x: col,
                    y: row,
                    w: span,
                    h: span,
                }
            })
            .collect()
    }

    #[cfg(test)]
    pub fn get(&self, row: usize, col: usize) -> CellMarker {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// Non-empty cells as (row, col, size class) in row-major scan order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, SizeClass)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, marker)| marker.size_class().map(|class| (row, col, class)))
        })
    }

    /// Grid extent in cells as (columns, rows).
    ///
    /// Covers the longest row and every footprint, so a large tile in the
    /// last row or column widens the grid instead of overlapping its wrap copy.
    pub fn extent(&self) -> (usize, usize) {
        let mut columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = self.rows.len();
        for (row, col, class) in self.tiles() {
            columns = columns.max(col + class.span());
            rows = rows.max(row + class.span());
        }
        (columns, rows)
    }

    /// Check that no two tiles claim the same cell.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut owners: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        let mut any = false;
        for (row, col, class) in self.tiles() {
            any = true;
            for r in row..row + class.span() {
                for c in col..col + class.span() {
                    if let Some(&owner) = owners.get(&(r, c)) {
                        return Err(LayoutError::OverlappingFootprint {
                            cell: (r, c),
                            tile: (row, col),
                            owner,
                        });
                    }
                    owners.insert((r, c), (row, col));
                }
            }
        }
        if any {
            Ok(())
        } else {
            Err(LayoutError::Empty)
        }
    }
}

/// Derived grid dimensions. Immutable for a given matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub small_size: f32,
    pub large_size: f32,
    pub spacing: f32,
    pub columns: usize,
    pub rows: usize,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(
        small_size: f32,
        spacing: f32,
        columns: usize,
        rows: usize,
    ) -> Result<Self, LayoutError> {
        if !small_size.is_finite() || small_size <= 0.0 {
            return Err(LayoutError::InvalidTileSize(small_size));
        }
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(LayoutError::InvalidSpacing(spacing));
        }
        if columns == 0 || rows == 0 {
            return Err(LayoutError::Empty);
        }

        let span = |n: usize| n as f32 * small_size + (n - 1) as f32 * spacing;
        Ok(Self {
            small_size,
            large_size: 2.0 * small_size + spacing,
            spacing,
            columns,
            rows,
            width: span(columns),
            height: span(rows),
        })
    }

    /// Distance between the origins of neighbouring cells
    pub fn pitch(&self) -> f32 {
        self.small_size + self.spacing
    }

    /// Half the grid's width and height: the wrap period is twice this
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size_of(&self, class: SizeClass) -> f32 {
        match class {
            SizeClass::Small => self.small_size,
            SizeClass::Large => self.large_size,
        }
    }
}

/// Immutable description of one tile, created once per layout build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDescriptor {
    pub id: u32,
    pub size_class: SizeClass,
    /// Resting position, centered so the grid's middle sits at the origin
    pub anchor: Vec2,
    pub parallax: f32,
}

/// Vertical parallax multiplier for a tile id
pub fn parallax_factor(id: u32) -> f32 {
    1.0 - (id % LAYOUT_PARALLAX_LAYERS) as f32 * LAYOUT_PARALLAX_STEP
}

/// Output of a layout build
#[derive(Debug, Clone)]
pub struct Layout {
    pub bounds: Bounds,
    pub tiles: Vec<TileDescriptor>,
}

impl Layout {
    #[cfg(test)]
    pub fn tile(&self, id: u32) -> Option<&TileDescriptor> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

/// Generate tile descriptors for `matrix`.
///
/// Fails before producing any tile when the matrix or sizes break the layout
/// contract.
pub fn build_layout(
    matrix: &OccupancyMatrix,
    small_size: f32,
    spacing: f32,
) -> Result<Layout, LayoutError> {
    matrix.validate()?;
    let (columns, rows) = matrix.extent();
    let bounds = Bounds::new(small_size, spacing, columns, rows)?;

    let pitch = bounds.pitch();
    let center_shift = bounds.half_extents();

    let tiles = matrix
        .tiles()
        .zip(1u32..)
        .map(|((row, col, size_class), id)| {
            let half = bounds.size_of(size_class) / 2.0;
            let corner = Vec2::new(col as f32 * pitch, row as f32 * pitch);
            TileDescriptor {
                id,
                size_class,
                anchor: corner + Vec2::splat(half) - center_shift,
                parallax: parallax_factor(id),
            }
        })
        .collect();

    Ok(Layout { bounds, tiles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GalleryConfig, LayoutConfig};
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_mixed_matrix_descriptors() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 1], &[1, 2]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();

        assert_eq!(layout.tiles.len(), 4);
        let small = layout
            .tiles
            .iter()
            .filter(|t| t.size_class == SizeClass::Small)
            .count();
        assert_eq!(small, 3);

        let large = layout.tile(4).unwrap();
        assert_eq!(large.size_class, SizeClass::Large);

        let b = layout.bounds;
        let expected = b.large_size / 2.0 + b.small_size + b.spacing;
        let uncentered = large.anchor + b.half_extents();
        assert!((uncentered.x - expected).abs() < EPS);
        assert!((uncentered.y - expected).abs() < EPS);
    }

    #[test]
    fn test_ids_follow_scan_order() {
        let matrix = OccupancyMatrix::from_codes(&[&[1, 0, 1], &[0, 1]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.1).unwrap();
        let ids: Vec<u32> = layout.tiles.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(layout.tiles[1].anchor.x > layout.tiles[0].anchor.x);
        assert!(layout.tiles[2].anchor.y > layout.tiles[0].anchor.y);
    }

    #[test]
    fn test_bounds_match_reference_grid() {
        let matrix = OccupancyMatrix::new(vec![vec![CellMarker::Small; 8]; 5]);
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        assert!((layout.bounds.width - (8.0 + 7.0 * 0.075)).abs() < EPS);
        assert!((layout.bounds.height - (5.0 + 4.0 * 0.075)).abs() < EPS);
        assert!((layout.bounds.large_size - 2.075).abs() < EPS);
    }

    #[test]
    fn test_layout_is_centered() {
        let matrix = OccupancyMatrix::new(vec![vec![CellMarker::Small; 4]; 3]);
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let sum: Vec2 = layout.tiles.iter().map(|t| t.anchor).sum();
        let mean = sum / layout.tiles.len() as f32;
        assert!(mean.length() < EPS);
    }

    #[test]
    fn test_large_tile_flush_with_small_neighbours() {
        // Large tile covering columns 0-1 next to a small tile in column 2
        let matrix = OccupancyMatrix::from_codes(&[&[2, 0, 1], &[0, 0, 1]]).unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        let b = layout.bounds;
        let large = layout.tile(1).unwrap();
        let small = layout.tile(2).unwrap();

        let large_right = large.anchor.x + b.large_size / 2.0;
        let small_left = small.anchor.x - b.small_size / 2.0;
        assert!((small_left - large_right - b.spacing).abs() < EPS);

        let large_top = large.anchor.y - b.large_size / 2.0;
        let small_top = small.anchor.y - b.small_size / 2.0;
        assert!((large_top - small_top).abs() < EPS);
    }

    #[test]
    fn test_overlapping_footprints_rejected() {
        let matrix = OccupancyMatrix::from_codes(&[&[2, 1], &[1, 1]]).unwrap();
        let err = build_layout(&matrix, 1.0, 0.075).unwrap_err();
        assert!(matches!(err, LayoutError::OverlappingFootprint { .. }));
    }

    #[test]
    fn test_reference_matrix_is_valid() {
        let matrix = OccupancyMatrix::from_codes(&[
            &[1, 1, 1, 2, 0, 1, 2],
            &[1, 2, 0, 0, 0, 1],
            &[1, 0, 0, 1, 1, 2, 0, 1],
            &[1, 1, 1, 1, 1, 0, 0, 1],
            &[1, 1, 1, 1, 1, 1, 1, 1],
        ])
        .unwrap();
        let layout = build_layout(&matrix, 1.0, 0.075).unwrap();
        assert_eq!(layout.tiles.len(), 28);
        assert_eq!((layout.bounds.columns, layout.bounds.rows), (8, 5));
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let matrix = OccupancyMatrix::from_codes(&[&[1]]).unwrap();
        assert_eq!(
            build_layout(&matrix, 0.0, 0.1).unwrap_err(),
            LayoutError::InvalidTileSize(0.0)
        );
        assert_eq!(
            build_layout(&matrix, 1.0, -0.1).unwrap_err(),
            LayoutError::InvalidSpacing(-0.1)
        );
        let empty = OccupancyMatrix::from_codes(&[&[0, 0]]).unwrap();
        assert_eq!(build_layout(&empty, 1.0, 0.1).unwrap_err(), LayoutError::Empty);
    }

    #[test]
    fn test_unknown_marker_rejected() {
        assert_eq!(
            OccupancyMatrix::from_codes(&[&[3]]).unwrap_err(),
            LayoutError::UnknownMarker(3)
        );
    }

    #[test]
    fn test_matrix_json_uses_null_for_empty() {
        let matrix: OccupancyMatrix = serde_json::from_str("[[1, null, 2], [0, 1]]").unwrap();
        assert_eq!(matrix.get(0, 1), CellMarker::Empty);
        assert_eq!(matrix.get(0, 2), CellMarker::Large);
        assert_eq!(matrix.get(1, 0), CellMarker::Empty);
        assert_eq!(matrix.get(5, 5), CellMarker::Empty);
        assert_eq!(serde_json::to_string(&matrix).unwrap(), "[[1,null,2],[null,1]]");
    }

    #[test]
    fn test_items_convert_to_matrix() {
        let items = [
            LayoutItem { x: 0, y: 0, w: 1, h: 1 },
            LayoutItem { x: 1, y: 0, w: 2, h: 2 },
            LayoutItem { x: 0, y: 1, w: 1, h: 1 },
        ];
        let matrix = OccupancyMatrix::from_items(&items).unwrap();
        assert_eq!(matrix.get(0, 1), CellMarker::Large);
        assert_eq!(matrix.to_items(), items.to_vec());

        let bad = [LayoutItem { x: 0, y: 0, w: 2, h: 1 }];
        assert!(matches!(
            OccupancyMatrix::from_items(&bad),
            Err(LayoutError::UnsupportedItem { w: 2, h: 1, .. })
        ));
    }

    #[test]
    fn test_items_sharing_an_anchor_are_rejected() {
        let items = [
            LayoutItem { x: 0, y: 0, w: 1, h: 1 },
            LayoutItem { x: 0, y: 0, w: 2, h: 2 },
        ];
        assert!(matches!(
            OccupancyMatrix::from_items(&items),
            Err(LayoutError::DuplicateItem { x: 0, y: 0 })
        ));

        let config = GalleryConfig {
            layout: LayoutConfig {
                items: Some(items.to_vec()),
                ..LayoutConfig::default()
            },
            ..GalleryConfig::default()
        };
        assert!(config.build_layout().is_err());
    }

    #[test]
    fn test_parallax_factor_cycles() {
        assert!((parallax_factor(5) - 1.0).abs() < EPS);
        assert!((parallax_factor(1) - 0.9).abs() < EPS);
        assert!((parallax_factor(4) - 0.6).abs() < EPS);
        assert!((parallax_factor(9) - 0.6).abs() < EPS);
    }

    proptest! {
        #[test]
        fn small_grid_neighbours_are_one_pitch_apart(
            cols in 1usize..10,
            rows in 1usize..8,
            small in 0.1f32..4.0,
            spacing in 0.0f32..0.5,
        ) {
            let matrix = OccupancyMatrix::new(vec![vec![CellMarker::Small; cols]; rows]);
            let layout = build_layout(&matrix, small, spacing).unwrap();
            let pitch = small + spacing;
            let tol = 1e-4 * (1.0 + pitch * cols.max(rows) as f32);

            for (i, tile) in layout.tiles.iter().enumerate() {
                let (row, col) = (i / cols, i % cols);
                if col + 1 < cols {
                    let right = layout.tiles[i + 1].anchor;
                    prop_assert!((right.x - tile.anchor.x - pitch).abs() < tol);
                    prop_assert!((right.y - tile.anchor.y).abs() < tol);
                }
                if row + 1 < rows {
                    let below = layout.tiles[i + cols].anchor;
                    prop_assert!((below.y - tile.anchor.y - pitch).abs() < tol);
                    prop_assert!((below.x - tile.anchor.x).abs() < tol);
                }
            }
        }
    }
}
