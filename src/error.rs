//! Error types for layout building, configuration loading and startup.

use std::path::PathBuf;

use thiserror::Error;

/// A layout contract violation. Raised before any tile is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("occupancy matrix has no tiles")]
    Empty,

    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),

    #[error("spacing must be non-negative and finite, got {0}")]
    InvalidSpacing(f32),

    #[error("cell {cell:?} is claimed by the tile at {tile:?} and by the tile at {owner:?}")]
    OverlappingFootprint {
        cell: (usize, usize),
        tile: (usize, usize),
        owner: (usize, usize),
    },

    #[error("two layout items are anchored at ({x}, {y})")]
    DuplicateItem { x: usize, y: usize },

    #[error("layout item at ({x}, {y}) has unsupported extent {w}x{h}")]
    UnsupportedItem { x: usize, y: usize, w: u8, h: u8 },

    #[error("unknown cell marker {0} (expected null, 0, 1 or 2)")]
    UnknownMarker(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Top-level startup error.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("window: {0}")]
    Window(String),

    #[error("renderer: {0}")]
    Renderer(String),
}
