#![forbid(unsafe_code)]

//! Grid items: placements, committed/working pairs, capabilities.

use std::fmt;

use gridflow_core::event::HandleSet;
use serde::{Deserialize, Serialize};

/// Stable identifier for grid items.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// The first ID handed out by a fresh grid.
    pub(crate) const FIRST: ItemId = ItemId(1);

    /// Construct an ID, rejecting the reserved zero value.
    pub fn new(raw: u64) -> Result<Self, ItemError> {
        if raw == 0 {
            return Err(ItemError::ZeroId);
        }
        Ok(Self(raw))
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The next ID in allocation order.
    pub fn checked_next(self) -> Result<Self, ItemError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(ItemError::IdSpaceExhausted)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// One placement on the grid: cell position of the top-left corner plus
/// size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRect {
    pub x: i32,
    pub y: i32,
    pub cols: i32,
    pub rows: i32,
}

impl ItemRect {
    /// Create a placement.
    #[must_use]
    pub const fn new(x: i32, y: i32, cols: i32, rows: i32) -> Self {
        Self { x, y, cols, rows }
    }

    /// Exclusive right edge in cells.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.cols
    }

    /// Exclusive bottom edge in cells.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.rows
    }

    /// Whether two placements overlap in at least one cell.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &ItemRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// The placement shifted by whole cells.
    #[inline]
    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> ItemRect {
        ItemRect::new(self.x + dx, self.y + dy, self.cols, self.rows)
    }

    /// Cell position only.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Persisted per-item state as supplied by the host.
///
/// `None` capability fields fall back to the grid-level defaults at query
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub rect: ItemRect,
    /// Minimum size in columns; falls back to the grid default.
    #[serde(default)]
    pub min_item_cols: Option<i32>,
    /// Minimum size in rows; falls back to the grid default.
    #[serde(default)]
    pub min_item_rows: Option<i32>,
    /// Width/height pixel ratio enforced on corner resizes.
    #[serde(default)]
    pub item_aspect_ratio: Option<f64>,
    /// Per-item drag override.
    #[serde(default)]
    pub drag_enabled: Option<bool>,
    /// Per-item resize override.
    #[serde(default)]
    pub resize_enabled: Option<bool>,
    /// Per-item enabled resize handles.
    #[serde(default)]
    pub handles: Option<HandleSet>,
}

impl ItemSpec {
    /// A plain item with default capabilities.
    #[must_use]
    pub const fn new(rect: ItemRect) -> Self {
        Self {
            rect,
            min_item_cols: None,
            min_item_rows: None,
            item_aspect_ratio: None,
            drag_enabled: None,
            resize_enabled: None,
            handles: None,
        }
    }

    /// Validate internal consistency against the grid-wide minimums.
    pub fn validate(&self, default_min_cols: i32, default_min_rows: i32) -> Result<(), ItemError> {
        let min_cols = self.min_item_cols.unwrap_or(default_min_cols);
        let min_rows = self.min_item_rows.unwrap_or(default_min_rows);
        if min_cols < 1 || min_rows < 1 {
            return Err(ItemError::MinimumBelowOne {
                min_cols,
                min_rows,
            });
        }
        if self.rect.cols < min_cols || self.rect.rows < min_rows {
            return Err(ItemError::SizeBelowMinimum {
                cols: self.rect.cols,
                rows: self.rect.rows,
                min_cols,
                min_rows,
            });
        }
        if self.rect.x < 0 || self.rect.y < 0 {
            return Err(ItemError::NegativePosition {
                x: self.rect.x,
                y: self.rect.y,
            });
        }
        if let Some(ratio) = self.item_aspect_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(ItemError::InvalidAspectRatio { ratio });
        }
        Ok(())
    }
}

/// A committed placement mutation reported after a gesture commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    pub id: ItemId,
    pub from: ItemRect,
    pub to: ItemRect,
}

impl ItemChange {
    /// Whether the cell position changed.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.from.x != self.to.x || self.from.y != self.to.y
    }

    /// Whether the cell size changed.
    #[must_use]
    pub const fn resized(&self) -> bool {
        self.from.cols != self.to.cols || self.from.rows != self.to.rows
    }
}

/// Owned item state: the committed placement used for rollback and change
/// notification, plus the working placement mutated during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub(crate) spec: ItemSpec,
    pub(crate) committed: ItemRect,
    pub(crate) working: ItemRect,
}

impl ItemState {
    pub(crate) fn new(spec: ItemSpec) -> Self {
        Self {
            spec,
            committed: spec.rect,
            working: spec.rect,
        }
    }

    /// The committed placement.
    #[must_use]
    pub const fn committed(&self) -> ItemRect {
        self.committed
    }

    /// The working placement.
    #[must_use]
    pub const fn working(&self) -> ItemRect {
        self.working
    }

    /// The host-supplied spec.
    #[must_use]
    pub const fn spec(&self) -> &ItemSpec {
        &self.spec
    }
}

/// Item model errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemError {
    ZeroId,
    IdSpaceExhausted,
    MinimumBelowOne { min_cols: i32, min_rows: i32 },
    SizeBelowMinimum {
        cols: i32,
        rows: i32,
        min_cols: i32,
        min_rows: i32,
    },
    NegativePosition { x: i32, y: i32 },
    InvalidAspectRatio { ratio: f64 },
    UnknownItem(ItemId),
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId => write!(f, "item ID 0 is reserved"),
            Self::IdSpaceExhausted => write!(f, "item ID space exhausted"),
            Self::MinimumBelowOne { min_cols, min_rows } => write!(
                f,
                "minimum item size must be at least 1×1 (got {min_cols}×{min_rows})"
            ),
            Self::SizeBelowMinimum {
                cols,
                rows,
                min_cols,
                min_rows,
            } => write!(
                f,
                "item size {cols}×{rows} is below the minimum {min_cols}×{min_rows}"
            ),
            Self::NegativePosition { x, y } => {
                write!(f, "item position ({x}, {y}) is out of the grid")
            }
            Self::InvalidAspectRatio { ratio } => {
                write!(f, "aspect ratio must be finite and positive (got {ratio})")
            }
            Self::UnknownItem(id) => write!(f, "unknown {id}"),
        }
    }
}

impl std::error::Error for ItemError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_is_rejected() {
        assert_eq!(ItemId::new(0), Err(ItemError::ZeroId));
        assert!(ItemId::new(1).is_ok());
    }

    #[test]
    fn rect_overlap_is_exclusive_at_edges() {
        let a = ItemRect::new(0, 0, 2, 2);
        let b = ItemRect::new(2, 0, 2, 2);
        let c = ItemRect::new(1, 1, 2, 2);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn spec_validation_enforces_minimums() {
        let spec = ItemSpec::new(ItemRect::new(0, 0, 1, 1));
        assert!(spec.validate(1, 1).is_ok());
        assert_eq!(
            spec.validate(2, 1),
            Err(ItemError::SizeBelowMinimum {
                cols: 1,
                rows: 1,
                min_cols: 2,
                min_rows: 1
            })
        );
    }

    #[test]
    fn spec_validation_rejects_bad_ratio() {
        let spec = ItemSpec {
            item_aspect_ratio: Some(0.0),
            ..ItemSpec::new(ItemRect::new(0, 0, 2, 2))
        };
        assert!(matches!(
            spec.validate(1, 1),
            Err(ItemError::InvalidAspectRatio { .. })
        ));
    }

    #[test]
    fn change_classification() {
        let id = ItemId::new(7).expect("non-zero");
        let change = ItemChange {
            id,
            from: ItemRect::new(0, 0, 2, 2),
            to: ItemRect::new(1, 0, 2, 3),
        };
        assert!(change.moved());
        assert!(change.resized());
    }
}
