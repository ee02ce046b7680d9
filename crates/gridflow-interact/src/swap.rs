#![forbid(unsafe_code)]

//! Swap: exchanging places with an item the mover lands exactly on.

use gridflow_layout::{Grid, ItemId, ItemRect};
use tracing::debug;

use crate::port::GridHooks;

#[derive(Debug, Clone, Copy)]
struct SwappedPair {
    other: ItemId,
    other_original: ItemRect,
}

/// Swap engine scoped to one moving item for one session.
///
/// At most one swap is active at a time; a new overlap while a swap is
/// pending first gives the swapped partner a chance to return home.
#[derive(Debug)]
pub struct SwapEngine {
    moving: ItemId,
    swapped: Option<SwappedPair>,
}

impl SwapEngine {
    /// Create an engine for the session's moving item.
    #[must_use]
    pub fn new(moving: ItemId) -> Self {
        Self {
            moving,
            swapped: None,
        }
    }

    /// The currently displaced partner, if a swap is pending.
    #[must_use]
    pub fn swapped_item(&self) -> Option<ItemId> {
        self.swapped.map(|pair| pair.other)
    }

    /// Attempt a swap: if the mover's working placement covers exactly one
    /// other item's footprint cell-for-cell, that item takes the mover's
    /// last committed cell (`vacated`).
    ///
    /// No-op unless the grid enables swapping.
    pub fn swap_items(&mut self, grid: &mut Grid, vacated: (i32, i32)) {
        if !grid.options().swap_items {
            return;
        }
        self.check_swap_back(grid);
        if self.swapped.is_some() {
            return;
        }
        let Some(mover_rect) = grid.working(self.moving) else {
            return;
        };
        let overlaps = grid.find_overlaps(&mover_rect, self.moving);
        let [other] = overlaps.as_slice() else {
            return;
        };
        let other = *other;
        let Some(other_rect) = grid.working(other) else {
            return;
        };
        if other_rect != mover_rect {
            return;
        }

        let target = ItemRect::new(vacated.0, vacated.1, other_rect.cols, other_rect.rows);
        if grid.out_of_bounds(&target) || grid.collides_any(&target, other) {
            return;
        }
        debug!(mover = %self.moving, partner = %other, "swap applied");
        grid.set_working(other, target);
        self.swapped = Some(SwappedPair {
            other,
            other_original: other_rect,
        });
    }

    /// Undo the pending swap once the mover no longer occupies the
    /// partner's original footprint.
    pub fn check_swap_back(&mut self, grid: &mut Grid) {
        let Some(pair) = self.swapped else {
            return;
        };
        let Some(mover_rect) = grid.working(self.moving) else {
            return;
        };
        if mover_rect.overlaps(&pair.other_original) {
            return;
        }
        if grid.collides_any(&pair.other_original, pair.other) {
            return;
        }
        debug!(partner = %pair.other, "swap returned");
        grid.set_working(pair.other, pair.other_original);
        self.swapped = None;
    }

    /// Finalize the pending swap and report the partner's change.
    pub fn commit(&mut self, grid: &mut Grid, hooks: &mut dyn GridHooks) {
        if let Some(pair) = self.swapped.take()
            && let Some(change) = grid.commit_item(pair.other)
        {
            debug!(partner = %pair.other, "swap committed");
            hooks.on_item_changed(&change);
        }
    }

    /// Restore the partner's working placement wholesale.
    pub fn revert(&mut self, grid: &mut Grid) {
        if let Some(pair) = self.swapped.take() {
            debug!(partner = %pair.other, "swap reverted");
            grid.rollback_item(pair.other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridflow_layout::{GridOptions, ItemSpec};

    fn swapping_grid() -> Grid {
        let mut grid = Grid::new(GridOptions {
            swap_items: true,
            ..GridOptions::default()
        })
        .expect("valid options");
        grid.set_cell_size(100.0, 100.0);
        grid
    }

    fn insert(grid: &mut Grid, x: i32, y: i32, cols: i32, rows: i32) -> ItemId {
        grid.insert(ItemSpec::new(ItemRect::new(x, y, cols, rows)))
            .expect("valid spec")
    }

    #[test]
    fn equal_footprint_overlap_swaps() {
        let mut grid = swapping_grid();
        let a = insert(&mut grid, 0, 0, 1, 1);
        let b = insert(&mut grid, 1, 0, 1, 1);

        grid.set_working(a, ItemRect::new(1, 0, 1, 1));
        let mut swap = SwapEngine::new(a);
        swap.swap_items(&mut grid, (0, 0));
        assert_eq!(grid.working(b), Some(ItemRect::new(0, 0, 1, 1)));
        assert_eq!(swap.swapped_item(), Some(b));
    }

    #[test]
    fn partial_overlap_does_not_swap() {
        let mut grid = swapping_grid();
        let a = insert(&mut grid, 0, 0, 2, 1);
        let b = insert(&mut grid, 2, 0, 1, 1);

        grid.set_working(a, ItemRect::new(1, 0, 2, 1));
        let mut swap = SwapEngine::new(a);
        swap.swap_items(&mut grid, (0, 0));
        assert_eq!(grid.working(b), Some(ItemRect::new(2, 0, 1, 1)));
        assert_eq!(swap.swapped_item(), None);
    }

    #[test]
    fn disabled_swap_is_a_no_op() {
        let mut grid = Grid::new(GridOptions {
            swap_items: false,
            ..GridOptions::default()
        })
        .expect("valid options");
        let a = insert(&mut grid, 0, 0, 1, 1);
        let b = insert(&mut grid, 1, 0, 1, 1);

        grid.set_working(a, ItemRect::new(1, 0, 1, 1));
        let mut swap = SwapEngine::new(a);
        swap.swap_items(&mut grid, (0, 0));
        assert_eq!(grid.working(b), Some(ItemRect::new(1, 0, 1, 1)));
    }

    #[test]
    fn swap_back_on_retreat() {
        let mut grid = swapping_grid();
        let a = insert(&mut grid, 0, 0, 1, 1);
        let b = insert(&mut grid, 1, 0, 1, 1);

        grid.set_working(a, ItemRect::new(1, 0, 1, 1));
        let mut swap = SwapEngine::new(a);
        swap.swap_items(&mut grid, (0, 0));
        assert_eq!(grid.working(b), Some(ItemRect::new(0, 0, 1, 1)));

        // Mover retreats past the partner's original cell; partner cannot
        // return while the mover sits on its own original cell, so move it
        // elsewhere first.
        grid.set_working(a, ItemRect::new(2, 0, 1, 1));
        swap.check_swap_back(&mut grid);
        assert_eq!(grid.working(b), Some(ItemRect::new(1, 0, 1, 1)));
        assert_eq!(swap.swapped_item(), None);
    }

    #[test]
    fn commit_and_revert() {
        let mut grid = swapping_grid();
        let a = insert(&mut grid, 0, 0, 1, 1);
        let b = insert(&mut grid, 1, 0, 1, 1);

        grid.set_working(a, ItemRect::new(1, 0, 1, 1));
        let mut swap = SwapEngine::new(a);
        swap.swap_items(&mut grid, (0, 0));
        swap.revert(&mut grid);
        assert_eq!(grid.working(b), Some(ItemRect::new(1, 0, 1, 1)));

        grid.set_working(a, ItemRect::new(1, 0, 1, 1));
        swap.swap_items(&mut grid, (0, 0));
        struct Recorder(Option<ItemId>);
        impl GridHooks for Recorder {
            fn on_item_changed(&mut self, change: &gridflow_layout::ItemChange) {
                self.0 = Some(change.id);
            }
        }
        let mut recorder = Recorder(None);
        swap.commit(&mut grid, &mut recorder);
        assert_eq!(recorder.0, Some(b));
        assert_eq!(grid.committed(b), Some(ItemRect::new(0, 0, 1, 1)));
    }
}
