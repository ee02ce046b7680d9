#![forbid(unsafe_code)]

//! Resolved grid configuration snapshot.

use std::fmt;
use std::time::Duration;

use gridflow_core::geometry::SideOverrides;
use serde::{Deserialize, Serialize};

/// Text direction of the grid; right-to-left mirrors all horizontal
/// pointer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Resolved configuration snapshot consumed by the controllers.
///
/// Every field already has its default applied, so controllers read it
/// without fallback chains. Construct with [`GridOptions::default`] and
/// override fields, then let [`Grid::new`](crate::Grid::new) validate the
/// result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Gap between cells in pixels.
    pub margin: f64,
    /// Per-side outer margins; unset sides fall back to `margin`.
    pub outer_margins: SideOverrides,
    /// Grid text direction.
    pub dir: TextDirection,
    /// Keep items inside the grid's outer margins during drag/resize.
    pub enable_boundary_control: bool,
    /// Allow displacing neighbors to make room.
    pub push_items: bool,
    /// Allow resize gestures to shrink/displace facing neighbors.
    pub push_resize_items: bool,
    /// Keep push bookkeeping active but suppress pushes during drag.
    pub disable_push_on_drag: bool,
    /// Keep push bookkeeping active but suppress pushes during resize.
    pub disable_push_on_resize: bool,
    /// Allow exchanging positions with an equal-footprint item.
    pub swap_items: bool,
    /// Report drops onto occupied cells instead of blocking them.
    pub drop_over_items: bool,
    /// Zoom factor applied by the host to the grid surface.
    pub scale: Option<f64>,
    /// Default minimum item width in columns.
    pub min_item_cols: i32,
    /// Default minimum item height in rows.
    pub min_item_rows: i32,
    /// Grid-level aspect ratio enforced on corner resizes.
    pub item_aspect_ratio: Option<f64>,
    /// Whether items are draggable unless they override it.
    pub drag_enabled: bool,
    /// Whether items are resizable unless they override it.
    pub resize_enabled: bool,
    /// Press-and-hold delay before a drag may start.
    pub drag_delay: Duration,
    /// Press-and-hold delay before a resize may start.
    pub resize_delay: Duration,
    /// Distance from a scrollable edge that triggers autoscroll.
    pub scroll_sensitivity_px: f64,
    /// Pixels scrolled per autoscroll step.
    pub scroll_speed_px: f64,
    /// Grid width bound in columns.
    pub max_cols: i32,
    /// Grid height bound in rows.
    pub max_rows: i32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            margin: 10.0,
            outer_margins: SideOverrides::NONE,
            dir: TextDirection::Ltr,
            enable_boundary_control: false,
            push_items: false,
            push_resize_items: false,
            disable_push_on_drag: false,
            disable_push_on_resize: false,
            swap_items: true,
            drop_over_items: false,
            scale: None,
            min_item_cols: 1,
            min_item_rows: 1,
            item_aspect_ratio: None,
            drag_enabled: false,
            resize_enabled: false,
            drag_delay: Duration::ZERO,
            resize_delay: Duration::ZERO,
            scroll_sensitivity_px: 10.0,
            scroll_speed_px: 20.0,
            max_cols: 100,
            max_rows: 100,
        }
    }
}

impl GridOptions {
    /// Validate the snapshot.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(OptionsError::InvalidMargin {
                margin: self.margin,
            });
        }
        for side in [
            self.outer_margins.top,
            self.outer_margins.right,
            self.outer_margins.bottom,
            self.outer_margins.left,
        ]
        .into_iter()
        .flatten()
        {
            if !(side.is_finite() && side >= 0.0) {
                return Err(OptionsError::InvalidOuterMargin { side });
            }
        }
        if let Some(scale) = self.scale
            && !(scale.is_finite() && scale > 0.0)
        {
            return Err(OptionsError::InvalidScale { scale });
        }
        if let Some(ratio) = self.item_aspect_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(OptionsError::InvalidAspectRatio { ratio });
        }
        if self.min_item_cols < 1 || self.min_item_rows < 1 {
            return Err(OptionsError::InvalidMinimums {
                min_cols: self.min_item_cols,
                min_rows: self.min_item_rows,
            });
        }
        if self.max_cols < self.min_item_cols || self.max_rows < self.min_item_rows {
            return Err(OptionsError::BoundsBelowMinimums {
                max_cols: self.max_cols,
                max_rows: self.max_rows,
            });
        }
        if !(self.scroll_sensitivity_px.is_finite() && self.scroll_sensitivity_px > 0.0)
            || !(self.scroll_speed_px.is_finite() && self.scroll_speed_px > 0.0)
        {
            return Err(OptionsError::InvalidScrollTuning {
                sensitivity: self.scroll_sensitivity_px,
                speed: self.scroll_speed_px,
            });
        }
        Ok(())
    }

    /// Effective scale factor.
    #[inline]
    #[must_use]
    pub fn scale_or_identity(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionsError {
    InvalidMargin { margin: f64 },
    InvalidOuterMargin { side: f64 },
    InvalidScale { scale: f64 },
    InvalidAspectRatio { ratio: f64 },
    InvalidMinimums { min_cols: i32, min_rows: i32 },
    BoundsBelowMinimums { max_cols: i32, max_rows: i32 },
    InvalidScrollTuning { sensitivity: f64, speed: f64 },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMargin { margin } => {
                write!(f, "margin must be finite and non-negative (got {margin})")
            }
            Self::InvalidOuterMargin { side } => {
                write!(f, "outer margin must be finite and non-negative (got {side})")
            }
            Self::InvalidScale { scale } => {
                write!(f, "scale must be finite and positive (got {scale})")
            }
            Self::InvalidAspectRatio { ratio } => {
                write!(f, "aspect ratio must be finite and positive (got {ratio})")
            }
            Self::InvalidMinimums { min_cols, min_rows } => write!(
                f,
                "minimum item size must be at least 1×1 (got {min_cols}×{min_rows})"
            ),
            Self::BoundsBelowMinimums { max_cols, max_rows } => write!(
                f,
                "grid bounds {max_cols}×{max_rows} cannot fit the minimum item size"
            ),
            Self::InvalidScrollTuning { sensitivity, speed } => write!(
                f,
                "scroll sensitivity/speed must be finite and positive (got {sensitivity}/{speed})"
            ),
        }
    }
}

impl std::error::Error for OptionsError {}
