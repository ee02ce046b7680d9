#![forbid(unsafe_code)]

//! Resize-push: yielding a facing neighbor to a growing edge.
//!
//! Unlike the drag-time [`PushEngine`](crate::push::PushEngine), which
//! translates neighbors whole, this engine first shrinks the facing
//! neighbor toward its minimum size (far edge fixed) and only translates
//! it once it cannot shrink further, cascading into items it then meets.
//! The strategy sits behind the same commit/revert/push-back contract, so
//! it stays swappable.

use gridflow_layout::{Grid, ItemId, ItemRect};
use tracing::{debug, trace};

use crate::port::GridHooks;
use crate::push::PushDirection;

#[derive(Debug, Clone, Copy)]
struct DisplacedItem {
    id: ItemId,
    original: ItemRect,
}

/// Resize displacement engine scoped to one moving item for one session.
#[derive(Debug)]
pub struct ResizePushEngine {
    moving: ItemId,
    displaced: Vec<DisplacedItem>,
}

impl ResizePushEngine {
    /// Create an engine for the session's moving item.
    #[must_use]
    pub fn new(moving: ItemId) -> Self {
        Self {
            moving,
            displaced: Vec::new(),
        }
    }

    /// Items currently shrunk or shifted away from their original
    /// placement.
    #[must_use]
    pub fn displaced_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.displaced.iter().map(|entry| entry.id)
    }

    /// Try to clear the moving item's working placement by yielding every
    /// overlapping neighbor away from the growing edge.
    ///
    /// No-op unless the grid enables resize pushing. Returns whether every
    /// conflict was resolved; on failure the grid is left untouched.
    pub fn push_items(&mut self, grid: &mut Grid, direction: PushDirection) -> bool {
        if !grid.options().push_resize_items {
            return false;
        }
        let Some(moving_rect) = grid.working(self.moving) else {
            return false;
        };

        let mut undo: Vec<(ItemId, ItemRect)> = Vec::new();

        let mut resolved = true;
        for other in grid.find_overlaps(&moving_rect, self.moving) {
            if !self.try_yield(grid, other, direction, &moving_rect, &mut undo) {
                resolved = false;
                break;
            }
        }

        if !resolved {
            for (id, rect) in undo.into_iter().rev() {
                grid.set_working(id, rect);
            }
            return false;
        }

        for (id, before) in undo {
            let Some(now) = grid.working(id) else {
                continue;
            };
            if now != before {
                self.record(grid, id);
            }
        }
        true
    }

    /// Yield one item away from `pressure`, then recurse into whatever it
    /// now overlaps. Displacement is monotone along the push axis, so the
    /// cascade terminates or fails at the grid bounds.
    fn try_yield(
        &mut self,
        grid: &mut Grid,
        id: ItemId,
        direction: PushDirection,
        pressure: &ItemRect,
        undo: &mut Vec<(ItemId, ItemRect)>,
    ) -> bool {
        let Some(start) = grid.working(id) else {
            return false;
        };
        undo.push((id, start));

        let Some(rect) = yielded_rect(
            start,
            pressure,
            direction,
            grid.min_cols_for(id),
            grid.min_rows_for(id),
        ) else {
            return true;
        };
        if grid.out_of_bounds(&rect) {
            trace!(item = %id, "resize push blocked by grid bounds");
            return false;
        }
        grid.set_working(id, rect);

        for other in grid.find_overlaps(&rect, id) {
            if other == self.moving {
                return false;
            }
            if !self.try_yield(grid, other, direction, &rect, undo) {
                return false;
            }
        }
        true
    }

    fn record(&mut self, grid: &Grid, id: ItemId) {
        if self.displaced.iter().any(|entry| entry.id == id) {
            return;
        }
        let Some(original) = grid.committed(id) else {
            return;
        };
        self.displaced.push(DisplacedItem { id, original });
    }

    /// Let displaced items regrow and retreat toward their original
    /// placement as far as the grid allows.
    pub fn check_push_back(&mut self, grid: &mut Grid) {
        let mut index = 0;
        while index < self.displaced.len() {
            let entry = self.displaced[index];
            loop {
                let Some(current) = grid.working(entry.id) else {
                    break;
                };
                if current == entry.original {
                    break;
                }
                let candidate = step_toward(current, entry.original);
                if grid.out_of_bounds(&candidate) || grid.collides_any(&candidate, entry.id) {
                    break;
                }
                grid.set_working(entry.id, candidate);
            }
            if grid.working(entry.id) == Some(entry.original) {
                self.displaced.remove(index);
            } else {
                index += 1;
            }
        }
    }

    /// Finalize every remaining displacement and report the changes.
    pub fn commit(&mut self, grid: &mut Grid, hooks: &mut dyn GridHooks) {
        for entry in self.displaced.drain(..) {
            if let Some(change) = grid.commit_item(entry.id) {
                debug!(item = %entry.id, "resize push committed");
                hooks.on_item_changed(&change);
            }
        }
    }

    /// Restore every displaced item's working placement wholesale.
    pub fn revert(&mut self, grid: &mut Grid) {
        for entry in self.displaced.drain(..) {
            debug!(item = %entry.id, "resize push reverted");
            grid.rollback_item(entry.id);
        }
    }
}

/// The placement `rect` must take to clear `pressure` along `direction`:
/// shrink toward the minimum first, then translate the remainder. `None`
/// when the rectangles do not conflict on the push axis.
fn yielded_rect(
    rect: ItemRect,
    pressure: &ItemRect,
    direction: PushDirection,
    min_cols: i32,
    min_rows: i32,
) -> Option<ItemRect> {
    if !rect.overlaps(pressure) {
        return None;
    }
    let mut out = rect;
    match direction {
        PushDirection::FromNorth => {
            let overlap = pressure.bottom() - rect.y;
            let shrink = overlap.min(rect.rows - min_rows).max(0);
            out.y += shrink;
            out.rows -= shrink;
            out.y += overlap - shrink;
        }
        PushDirection::FromSouth => {
            let overlap = rect.bottom() - pressure.y;
            let shrink = overlap.min(rect.rows - min_rows).max(0);
            out.rows -= shrink;
            out.y -= overlap - shrink;
        }
        PushDirection::FromWest => {
            let overlap = pressure.right() - rect.x;
            let shrink = overlap.min(rect.cols - min_cols).max(0);
            out.x += shrink;
            out.cols -= shrink;
            out.x += overlap - shrink;
        }
        PushDirection::FromEast => {
            let overlap = rect.right() - pressure.x;
            let shrink = overlap.min(rect.cols - min_cols).max(0);
            out.cols -= shrink;
            out.x -= overlap - shrink;
        }
    }
    Some(out)
}

/// One cell of recovery toward the original placement: un-translate on an
/// axis whose size already matches, otherwise regrow.
fn step_toward(current: ItemRect, original: ItemRect) -> ItemRect {
    let mut out = current;
    if current.x != original.x && current.cols == original.cols {
        out.x += (original.x - current.x).signum();
    } else if current.cols < original.cols {
        if current.x > original.x {
            out.x -= 1;
        }
        out.cols += 1;
    } else if current.y != original.y && current.rows == original.rows {
        out.y += (original.y - current.y).signum();
    } else if current.rows < original.rows {
        if current.y > original.y {
            out.y -= 1;
        }
        out.rows += 1;
    }
    out
}
