#![forbid(unsafe_code)]

//! Alignment-guide matching.
//!
//! While a gesture is active, every pointer move recomputes which other
//! items' edges the session item currently lines up with, within a small
//! pixel tolerance. This is a triggering contract only: the host draws
//! (and removes) the guide lines; the engine just says which edges match
//! and against whom. Matches are not persisted across moves.

use gridflow_layout::{Grid, ItemId};

use crate::port::RenderPort;

/// Edge alignment tolerance in viewport pixels.
pub const ALIGN_TOLERANCE_PX: f64 = 2.0;

/// Per-edge matches against other items, recomputed every pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentMatches {
    pub top: Option<ItemId>,
    pub bottom: Option<ItemId>,
    pub left: Option<ItemId>,
    pub right: Option<ItemId>,
}

impl AlignmentMatches {
    /// Whether any edge matched.
    #[must_use]
    pub fn any(&self) -> bool {
        self.top.is_some() || self.bottom.is_some() || self.left.is_some() || self.right.is_some()
    }

    /// Compare the session item's viewport box against every other item.
    ///
    /// Horizontal edges match like edges only; vertical edges also match
    /// the opposite edge of an adjacent item (a neighbor's bottom touching
    /// this item's top counts as a top match).
    #[must_use]
    pub fn compute(grid: &Grid, port: &dyn RenderPort, id: ItemId) -> AlignmentMatches {
        let rect = port.item_view_rect(id);
        let mut matches = AlignmentMatches::default();

        for (other_id, _) in grid.items() {
            if other_id == id {
                continue;
            }
            let other = port.item_view_rect(other_id);
            if near(other.bottom(), rect.top) || near(other.top, rect.top) {
                matches.top = Some(other_id);
            }
            if near(other.top, rect.bottom()) || near(other.bottom(), rect.bottom()) {
                matches.bottom = Some(other_id);
            }
            if near(other.left, rect.left) {
                matches.left = Some(other_id);
            }
            if near(other.right(), rect.right()) {
                matches.right = Some(other_id);
            }
        }
        matches
    }
}

#[inline]
fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < ALIGN_TOLERANCE_PX
}
