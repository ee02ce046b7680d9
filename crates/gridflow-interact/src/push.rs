#![forbid(unsafe_code)]

//! Cascade push: displacing neighbors to make room for the moving item.
//!
//! The engine is a conflict-resolution strategy behind a narrow contract:
//! propose shifts ([`PushEngine::push_items`]), let displaced items creep
//! home when pressure is relieved ([`PushEngine::check_push_back`]), and
//! finally [`PushEngine::commit`] or [`PushEngine::revert`] the whole set.
//! A different strategy can replace this one without touching the
//! controllers.
//!
//! # Invariants
//!
//! 1. A failed push attempt leaves the grid exactly as it found it; shifts
//!    are never half-applied.
//! 2. Displaced items only ever move along the push axis, one cell at a
//!    time, and their full visit path is recorded so push-back can retrace
//!    it.
//! 3. Committed placements are untouched until `commit`; `revert` is
//!    always total.

use gridflow_layout::{Grid, ItemId, ItemRect};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::port::GridHooks;

/// Compass direction a push travels, named for the side the pressure comes
/// from: `FromWest` pushes items east.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    FromNorth,
    FromSouth,
    FromEast,
    FromWest,
}

impl PushDirection {
    /// Cell delta of one push step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            PushDirection::FromNorth => (0, 1),
            PushDirection::FromSouth => (0, -1),
            PushDirection::FromEast => (-1, 0),
            PushDirection::FromWest => (1, 0),
        }
    }

    /// Direction inferred from the mover's last committed cell to its new
    /// cell. First matching axis wins; horizontal is checked before
    /// vertical.
    #[must_use]
    pub fn from_step(from: (i32, i32), to: (i32, i32)) -> Option<PushDirection> {
        if from.0 < to.0 {
            Some(PushDirection::FromWest)
        } else if from.0 > to.0 {
            Some(PushDirection::FromEast)
        } else if from.1 < to.1 {
            Some(PushDirection::FromNorth)
        } else if from.1 > to.1 {
            Some(PushDirection::FromSouth)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
struct PushedItem {
    id: ItemId,
    original: ItemRect,
    /// Cell positions visited, starting at the original position.
    path: Vec<(i32, i32)>,
}

/// Cascade push engine scoped to one moving item for one session.
#[derive(Debug)]
pub struct PushEngine {
    moving: ItemId,
    pushed: Vec<PushedItem>,
}

impl PushEngine {
    /// Create an engine for the session's moving item.
    #[must_use]
    pub fn new(moving: ItemId) -> Self {
        Self {
            moving,
            pushed: Vec::new(),
        }
    }

    /// Items currently displaced from their original placement.
    #[must_use]
    pub fn pushed_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.pushed.iter().map(|entry| entry.id)
    }

    /// Try to clear the moving item's working placement by pushing every
    /// overlapping neighbor in `direction`, cascading as needed.
    ///
    /// Pushing is a no-op unless the grid enables it and the caller has
    /// not suppressed it for this gesture. Returns whether every conflict
    /// was resolved; on failure the grid is left untouched.
    pub fn push_items(
        &mut self,
        grid: &mut Grid,
        direction: Option<PushDirection>,
        disabled: bool,
    ) -> bool {
        if !grid.options().push_items || disabled {
            return false;
        }
        let Some(direction) = direction else {
            return false;
        };
        let Some(moving_rect) = grid.working(self.moving) else {
            return false;
        };

        let mut undo: Vec<(ItemId, ItemRect)> = Vec::new();

        let mut resolved = true;
        for other in grid.find_overlaps(&moving_rect, self.moving) {
            if !self.try_push(grid, other, direction, &moving_rect, &mut undo) {
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

        // Merge this call's successful shifts into the session bookkeeping.
        // An item can appear several times in the undo log when cascades
        // revisit it; the first entry holds its pre-call placement.
        let mut seen = FxHashSet::default();
        for (id, before) in undo {
            if !seen.insert(id) {
                continue;
            }
            let Some(now) = grid.working(id) else {
                continue;
            };
            if now == before {
                continue;
            }
            self.record(grid, id, now);
        }
        true
    }

    /// Shift one item clear of `pressure`, then recurse into whatever it
    /// now overlaps. Motion is monotone along the push axis, so the
    /// cascade terminates: every call advances its item at least one cell
    /// or fails at the grid bounds.
    fn try_push(
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

        let (dx, dy) = direction.delta();
        let mut rect = start;
        while rect.overlaps(pressure) {
            let candidate = rect.shifted(dx, dy);
            if grid.out_of_bounds(&candidate) {
                trace!(item = %id, "push blocked by grid bounds");
                return false;
            }
            rect = candidate;
        }
        grid.set_working(id, rect);

        for other in grid.find_overlaps(&rect, id) {
            if other == self.moving {
                return false;
            }
            if !self.try_push(grid, other, direction, &rect, undo) {
                return false;
            }
        }
        true
    }

    fn record(&mut self, grid: &Grid, id: ItemId, now: ItemRect) {
        if let Some(entry) = self.pushed.iter_mut().find(|entry| entry.id == id) {
            entry.path.push(now.position());
            return;
        }
        // Committed placement is the pre-session original: the engine is
        // the only writer to pushed items during its session.
        let Some(original) = grid.committed(id) else {
            return;
        };
        self.pushed.push(PushedItem {
            id,
            original,
            path: vec![original.position(), now.position()],
        });
    }

    /// Let displaced items retrace their paths toward their original slots
    /// as far as the grid allows.
    pub fn check_push_back(&mut self, grid: &mut Grid) {
        let mut index = 0;
        while index < self.pushed.len() {
            let entry = &mut self.pushed[index];
            loop {
                if entry.path.len() < 2 {
                    break;
                }
                let Some(current) = grid.working(entry.id) else {
                    break;
                };
                let (bx, by) = entry.path[entry.path.len() - 2];
                let candidate = ItemRect::new(bx, by, current.cols, current.rows);
                if grid.out_of_bounds(&candidate) || grid.collides_any(&candidate, entry.id) {
                    break;
                }
                grid.set_working(entry.id, candidate);
                entry.path.pop();
            }
            if grid.working(entry.id) == Some(entry.original) {
                self.pushed.remove(index);
            } else {
                index += 1;
            }
        }
    }

    /// Finalize every remaining shift into committed state and report the
    /// changes.
    pub fn commit(&mut self, grid: &mut Grid, hooks: &mut dyn GridHooks) {
        for entry in self.pushed.drain(..) {
            if let Some(change) = grid.commit_item(entry.id) {
                debug!(item = %entry.id, "push committed");
                hooks.on_item_changed(&change);
            }
        }
    }

    /// Restore every displaced item's working placement wholesale.
    pub fn revert(&mut self, grid: &mut Grid) {
        for entry in self.pushed.drain(..) {
            debug!(item = %entry.id, "push reverted");
            grid.rollback_item(entry.id);
        }
    }
}
