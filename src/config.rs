//! Gallery configuration.
//!
//! Loaded from JSON at startup. Every field has a default matching the
//! constants in [`crate::constants`], so a partial file only overrides what it
//! names:
//!
//! ```json
//! {
//!   "layout": { "matrix": [[1, 1, 2], [1, null, null]], "spacing": 0.1 },
//!   "navigation": { "wheel": { "platform_scale": 2.0 } }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::layout::{build_layout, Layout, LayoutItem, OccupancyMatrix};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub layout: LayoutConfig,
    pub navigation: NavigationConfig,
    pub focus: FocusConfig,
    pub view: ViewConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Occupancy matrix; takes precedence over `items`
    pub matrix: Option<OccupancyMatrix>,
    /// Editor-style item list, used when no matrix is given
    pub items: Option<Vec<LayoutItem>>,
    pub small_size: f32,
    pub spacing: f32,
    pub wrap_bias: f32,
    /// Scale each tile's vertical scroll by its parallax factor
    pub parallax: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            matrix: None,
            items: None,
            small_size: LAYOUT_SMALL_SIZE,
            spacing: LAYOUT_SPACING,
            wrap_bias: LAYOUT_WRAP_BIAS,
            parallax: false,
        }
    }
}

impl LayoutConfig {
    /// The occupancy matrix this config describes.
    pub fn occupancy(&self) -> Result<OccupancyMatrix, ConfigError> {
        match (&self.matrix, &self.items) {
            (Some(_), Some(_)) => Err(ConfigError::invalid(
                "layout",
                "set either `matrix` or `items`, not both",
            )),
            (Some(matrix), None) => Ok(matrix.clone()),
            (None, Some(items)) => Ok(OccupancyMatrix::from_items(items)?),
            (None, None) => Ok(reference_matrix()),
        }
    }
}

/// Mixed layout used when the configuration names none
pub fn reference_matrix() -> OccupancyMatrix {
    use crate::layout::CellMarker::{Empty as E, Large as L, Small as S};
    OccupancyMatrix::new(vec![
        vec![S, S, S, L, E, S, L],
        vec![S, L, E, E, E, S],
        vec![S, E, E, S, S, L, E, S],
        vec![S, S, S, S, S, E, E, S],
        vec![S, S, S, S, S, S, S, S],
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub damping: f32,
    /// World units per pixel of pointer drag
    pub drag_scale: f32,
    pub wheel: WheelConfig,
    pub deformation_scale: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            damping: NAV_DAMPING,
            drag_scale: NAV_DRAG_SCALE,
            wheel: WheelConfig::default(),
            deformation_scale: NAV_DEFORMATION_SCALE,
        }
    }
}

/// Wheel normalization. `platform_scale` is environment policy supplied by the
/// host, never detected by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub pixel_multiplier: f32,
    pub line_multiplier: f32,
    pub platform_scale: f32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            pixel_multiplier: NAV_WHEEL_PIXEL_MULTIPLIER,
            line_multiplier: NAV_WHEEL_LINE_MULTIPLIER,
            // Windows reports wheel deltas at half the physical scale
            platform_scale: if cfg!(target_os = "windows") { 2.0 } else { 1.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Seconds for hide/reveal/center tweens
    pub tween_duration: f32,
    /// Seconds input stays blocked after a pick
    pub transition_duration: f32,
    /// Fraction of the view height a focused tile fills
    pub focus_fill: f32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            tween_duration: FOCUS_TWEEN_DURATION,
            transition_duration: FOCUS_TRANSITION_DURATION,
            focus_fill: FOCUS_FILL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// World units visible from bottom to top of the window
    pub world_height: f32,
    /// Passed through to the tile color program untouched
    pub platform_flag: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            world_height: VIEW_WORLD_HEIGHT,
            platform_flag: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the egui overlay at startup
    pub overlay: bool,
    /// Serve puffin profiling data on the default port
    pub profiler: bool,
}

impl GalleryConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Load the file at `path`, or the default location if it exists, or
    /// fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_json_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Self::from_json_file(default_path)
        } else {
            tracing::info!("no config at {}, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Reject values that would make the gallery misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        }

        let nav = &self.navigation;
        if !(nav.damping > 0.0 && nav.damping <= 1.0) {
            return Err(ConfigError::invalid(
                "navigation.damping",
                format!("must be in (0, 1], got {}", nav.damping),
            ));
        }
        positive("navigation.drag_scale", nav.drag_scale)?;
        positive("navigation.wheel.pixel_multiplier", nav.wheel.pixel_multiplier)?;
        positive("navigation.wheel.line_multiplier", nav.wheel.line_multiplier)?;
        positive("navigation.wheel.platform_scale", nav.wheel.platform_scale)?;
        if !(nav.deformation_scale.is_finite() && nav.deformation_scale >= 0.0) {
            return Err(ConfigError::invalid(
                "navigation.deformation_scale",
                format!("must be non-negative, got {}", nav.deformation_scale),
            ));
        }

        positive("focus.tween_duration", self.focus.tween_duration)?;
        positive("focus.transition_duration", self.focus.transition_duration)?;
        positive("focus.focus_fill", self.focus.focus_fill)?;
        if self.focus.transition_duration < self.focus.tween_duration {
            return Err(ConfigError::invalid(
                "focus.transition_duration",
                "must not be shorter than focus.tween_duration",
            ));
        }

        positive("view.world_height", self.view.world_height)?;
        if !self.layout.wrap_bias.is_finite() {
            return Err(ConfigError::invalid("layout.wrap_bias", "must be finite"));
        }
        Ok(())
    }

    /// Build the tile layout this config describes.
    pub fn build_layout(&self) -> Result<Layout, ConfigError> {
        let matrix = self.layout.occupancy()?;
        Ok(build_layout(&matrix, self.layout.small_size, self.layout.spacing)?)
    }
}
