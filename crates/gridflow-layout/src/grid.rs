#![forbid(unsafe_code)]

//! The grid: item store, cell sizing, coordinate mapping, collisions.

use std::collections::BTreeMap;

use gridflow_core::event::HandleSet;
use gridflow_core::geometry::PixelRect;
use serde::{Deserialize, Serialize};

use crate::item::{ItemChange, ItemError, ItemId, ItemRect, ItemSpec, ItemState};
use crate::options::{GridOptions, OptionsError};

/// Rounding mode for pixel→cell conversion.
///
/// Drag centers on the nearest cell; resize floors the leading edge and
/// ceils the trailing edge so a partially covered cell counts as covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    Round,
    Floor,
    Ceil,
}

impl Rounding {
    #[inline]
    fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Round => value.round(),
            Rounding::Floor => value.floor(),
            Rounding::Ceil => value.ceil(),
        }
    }
}

/// Result of a collision query.
///
/// `Unknown` reports a collision that has no blamable item: the placement
/// violates the grid bounds or the item's own size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collision {
    /// The placement is free.
    #[default]
    None,
    /// Collision without a specific colliding item.
    Unknown,
    /// Collision with a specific item.
    With(ItemId),
}

impl Collision {
    /// Whether any collision was detected.
    #[inline]
    #[must_use]
    pub const fn is_colliding(self) -> bool {
        !matches!(self, Collision::None)
    }

    /// The colliding item, when known.
    #[inline]
    #[must_use]
    pub const fn target(self) -> Option<ItemId> {
        match self {
            Collision::With(id) => Some(id),
            _ => None,
        }
    }
}

/// Authoritative grid state.
///
/// Items live in a `BTreeMap` so every scan (collision, push cascades,
/// alignment) observes a deterministic order. Cell sizing is pushed in by
/// the host whenever it re-lays-out the grid surface; all pixel↔cell
/// conversion in the engine goes through it.
#[derive(Debug, Clone)]
pub struct Grid {
    options: GridOptions,
    items: BTreeMap<ItemId, ItemState>,
    next_id: ItemId,
    moving_item: Option<ItemId>,
    drag_in_progress: bool,
    col_width: f64,
    row_height: f64,
}

impl Grid {
    /// Create an empty grid with a validated options snapshot.
    pub fn new(options: GridOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            options,
            items: BTreeMap::new(),
            next_id: ItemId::FIRST,
            moving_item: None,
            drag_in_progress: false,
            col_width: 0.0,
            row_height: 0.0,
        })
    }

    /// Configuration snapshot.
    #[must_use]
    pub const fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Update the current cell sizing. Called by the host on relayout.
    pub fn set_cell_size(&mut self, col_width: f64, row_height: f64) {
        self.col_width = col_width;
        self.row_height = row_height;
    }

    /// Current column width in pixels.
    #[must_use]
    pub const fn col_width(&self) -> f64 {
        self.col_width
    }

    /// Current row height in pixels.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Add an item, assigning the next free ID.
    pub fn insert(&mut self, spec: ItemSpec) -> Result<ItemId, ItemError> {
        spec.validate(self.options.min_item_cols, self.options.min_item_rows)?;
        let id = self.next_id;
        self.next_id = id.checked_next()?;
        self.items.insert(id, ItemState::new(spec));
        Ok(id)
    }

    /// Remove an item. Clears the moving slot if it pointed at it.
    pub fn remove(&mut self, id: ItemId) -> Option<ItemSpec> {
        if self.moving_item == Some(id) {
            self.moving_item = None;
        }
        self.items.remove(&id).map(|state| state.spec)
    }

    /// Look up an item.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemState> {
        self.items.get(&id)
    }

    /// Iterate all items in ID order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &ItemState)> {
        self.items.iter().map(|(id, state)| (*id, state))
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the grid holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Working placement of an item.
    #[must_use]
    pub fn working(&self, id: ItemId) -> Option<ItemRect> {
        self.items.get(&id).map(|state| state.working)
    }

    /// Committed placement of an item.
    #[must_use]
    pub fn committed(&self, id: ItemId) -> Option<ItemRect> {
        self.items.get(&id).map(|state| state.committed)
    }

    /// Replace an item's working placement. Returns `false` for unknown
    /// items.
    pub fn set_working(&mut self, id: ItemId, rect: ItemRect) -> bool {
        match self.items.get_mut(&id) {
            Some(state) => {
                state.working = rect;
                true
            }
            None => false,
        }
    }

    /// Commit an item's working placement, reporting the diff when it
    /// changed.
    pub fn commit_item(&mut self, id: ItemId) -> Option<ItemChange> {
        let state = self.items.get_mut(&id)?;
        if state.working == state.committed {
            return None;
        }
        let change = ItemChange {
            id,
            from: state.committed,
            to: state.working,
        };
        state.committed = state.working;
        Some(change)
    }

    /// Restore an item's working placement from the committed copy.
    pub fn rollback_item(&mut self, id: ItemId) {
        if let Some(state) = self.items.get_mut(&id) {
            state.working = state.committed;
        }
    }

    /// Restore only the working position, keeping the working size. Drag
    /// rollback never touches the size.
    pub fn rollback_position(&mut self, id: ItemId) {
        if let Some(state) = self.items.get_mut(&id) {
            state.working.x = state.committed.x;
            state.working.y = state.committed.y;
        }
    }

    // ------------------------------------------------------------------
    // Capabilities
    // ------------------------------------------------------------------

    /// Whether the item may start a drag gesture.
    #[must_use]
    pub fn can_be_dragged(&self, id: ItemId) -> bool {
        self.items
            .get(&id)
            .is_some_and(|state| state.spec.drag_enabled.unwrap_or(self.options.drag_enabled))
    }

    /// Whether the item may start a resize gesture.
    #[must_use]
    pub fn can_be_resized(&self, id: ItemId) -> bool {
        self.items.get(&id).is_some_and(|state| {
            state
                .spec
                .resize_enabled
                .unwrap_or(self.options.resize_enabled)
        })
    }

    /// Enabled resize handles for the item.
    #[must_use]
    pub fn resizable_handles(&self, id: ItemId) -> HandleSet {
        self.items
            .get(&id)
            .and_then(|state| state.spec.handles)
            .unwrap_or_default()
    }

    /// Resolved minimum width in columns.
    #[must_use]
    pub fn min_cols_for(&self, id: ItemId) -> i32 {
        self.items
            .get(&id)
            .and_then(|state| state.spec.min_item_cols)
            .unwrap_or(self.options.min_item_cols)
    }

    /// Resolved minimum height in rows.
    #[must_use]
    pub fn min_rows_for(&self, id: ItemId) -> i32 {
        self.items
            .get(&id)
            .and_then(|state| state.spec.min_item_rows)
            .unwrap_or(self.options.min_item_rows)
    }

    /// Item-level aspect ratio falling back to the grid-level one.
    #[must_use]
    pub fn aspect_ratio_for(&self, id: ItemId) -> Option<f64> {
        self.items
            .get(&id)
            .and_then(|state| state.spec.item_aspect_ratio)
            .or(self.options.item_aspect_ratio)
    }

    // ------------------------------------------------------------------
    // Moving-item slot
    // ------------------------------------------------------------------

    /// The item currently owning the grid-wide moving slot.
    #[must_use]
    pub const fn moving_item(&self) -> Option<ItemId> {
        self.moving_item
    }

    /// Claim the moving slot. Single-writer: only the active session calls
    /// this.
    pub fn set_moving(&mut self, id: ItemId) {
        self.moving_item = Some(id);
    }

    /// Release the moving slot.
    pub fn clear_moving(&mut self) {
        self.moving_item = None;
    }

    /// Whether a drag/resize gesture is in progress.
    #[must_use]
    pub const fn drag_in_progress(&self) -> bool {
        self.drag_in_progress
    }

    /// Mark a gesture as running.
    pub fn set_drag_in_progress(&mut self, value: bool) {
        self.drag_in_progress = value;
    }

    // ------------------------------------------------------------------
    // Coordinate mapping
    // ------------------------------------------------------------------

    /// Convert a horizontal content-pixel offset to a column index.
    #[must_use]
    pub fn pixels_to_position_x(&self, pixels: f64, rounding: Rounding) -> i32 {
        if self.col_width <= 0.0 {
            return 0;
        }
        (rounding.apply(pixels / self.col_width) as i32).max(0)
    }

    /// Convert a vertical content-pixel offset to a row index.
    #[must_use]
    pub fn pixels_to_position_y(&self, pixels: f64, rounding: Rounding) -> i32 {
        if self.row_height <= 0.0 {
            return 0;
        }
        (rounding.apply(pixels / self.row_height) as i32).max(0)
    }

    /// Convert a column index to a content-pixel offset.
    #[must_use]
    pub fn position_x_to_pixels(&self, x: i32) -> f64 {
        f64::from(x) * self.col_width
    }

    /// Convert a row index to a content-pixel offset.
    #[must_use]
    pub fn position_y_to_pixels(&self, y: i32) -> f64 {
        f64::from(y) * self.row_height
    }

    /// Content-pixel box the renderer would produce for the item's working
    /// placement.
    ///
    /// Always computed in logical (left-to-right) coordinates; RTL grids
    /// mirror at the rendering and pointer-math layers, not here.
    #[must_use]
    pub fn item_layout_rect(&self, id: ItemId) -> Option<PixelRect> {
        let rect = self.working(id)?;
        let margin = self.options.margin;
        Some(PixelRect::new(
            self.position_x_to_pixels(rect.x),
            self.position_y_to_pixels(rect.y),
            self.position_x_to_pixels(rect.cols) - margin,
            self.position_y_to_pixels(rect.rows) - margin,
        ))
    }

    // ------------------------------------------------------------------
    // Collision oracle
    // ------------------------------------------------------------------

    /// Whether a placement violates the grid bounds.
    #[must_use]
    pub fn out_of_bounds(&self, rect: &ItemRect) -> bool {
        rect.x < 0
            || rect.y < 0
            || rect.right() > self.options.max_cols
            || rect.bottom() > self.options.max_rows
    }

    /// Bounds and size-limit check for an item's working placement.
    #[must_use]
    pub fn check_grid_collision(&self, id: ItemId) -> bool {
        let Some(rect) = self.working(id) else {
            return true;
        };
        self.out_of_bounds(&rect)
            || rect.cols < self.min_cols_for(id)
            || rect.rows < self.min_rows_for(id)
    }

    /// Full collision check for an item's working placement: grid bounds
    /// first (`Unknown`), then the first overlapping item in ID order.
    #[must_use]
    pub fn check_collision(&self, id: ItemId) -> Collision {
        if self.check_grid_collision(id) {
            return Collision::Unknown;
        }
        let Some(rect) = self.working(id) else {
            return Collision::Unknown;
        };
        match self.first_overlap(&rect, id) {
            Some(other) => Collision::With(other),
            None => Collision::None,
        }
    }

    /// First item (in ID order) whose working placement overlaps `rect`,
    /// excluding `exclude`.
    #[must_use]
    pub fn first_overlap(&self, rect: &ItemRect, exclude: ItemId) -> Option<ItemId> {
        self.items
            .iter()
            .find(|(id, state)| **id != exclude && state.working.overlaps(rect))
            .map(|(id, _)| *id)
    }

    /// All items (in ID order) whose working placements overlap `rect`,
    /// excluding `exclude`.
    #[must_use]
    pub fn find_overlaps(&self, rect: &ItemRect, exclude: ItemId) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|(id, state)| **id != exclude && state.working.overlaps(rect))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether any item other than `exclude` overlaps `rect`.
    #[must_use]
    pub fn collides_any(&self, rect: &ItemRect, exclude: ItemId) -> bool {
        self.first_overlap(rect, exclude).is_some()
    }
}
