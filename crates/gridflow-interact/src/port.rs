#![forbid(unsafe_code)]

//! Host-side seams: rendering, geometry queries, and user hooks.
//!
//! The engine is framework-agnostic: everything it needs from the host
//! (element geometry, style application, scrolling, re-layout scheduling)
//! goes through [`RenderPort`], and every optional user callback goes
//! through [`GridHooks`]. Both are passed into controller calls by
//! reference, so the host decides ownership and lifetime.

use gridflow_core::geometry::PixelRect;
use gridflow_layout::{ItemChange, ItemId};

/// Scroll and offset metrics of the grid surface, queried fresh from the
/// host whenever the controllers recompute positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Current horizontal scroll offset of the grid surface.
    pub scroll_left: f64,
    /// Current vertical scroll offset of the grid surface.
    pub scroll_top: f64,
    /// Offset of the grid element from its offset parent.
    pub offset_left: f64,
    /// Offset of the grid element from its offset parent.
    pub offset_top: f64,
    /// Total scrollable width of the grid surface.
    pub scroll_width: f64,
    /// Total scrollable height of the grid surface.
    pub scroll_height: f64,
    /// The grid element's bounding box in viewport pixels.
    pub grid_rect: PixelRect,
}

/// State class applied to an item while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionClass {
    Moving,
    Resizing,
}

/// Everything the engine asks of the host's rendering substrate.
pub trait RenderPort {
    /// Current scroll/offset metrics of the grid surface.
    fn viewport(&self) -> ViewportMetrics;

    /// An item's bounding box in viewport pixels.
    fn item_view_rect(&self, id: ItemId) -> PixelRect;

    /// Apply an absolute pixel box to an item's visual representation.
    fn set_item_box(&mut self, id: ItemId, rect: PixelRect);

    /// Add or remove a gesture state class on the item.
    fn set_interaction_class(&mut self, id: ItemId, class: InteractionClass, active: bool);

    /// Schedule a full grid re-layout.
    fn request_layout(&mut self);

    /// Refresh the drop-preview overlay from the moving item's placement.
    fn refresh_preview(&mut self);

    /// Scroll the grid surface by the given deltas. Autoscroll steps go
    /// through here.
    fn scroll_by(&mut self, dx: f64, dy: f64);
}

/// How a stop hook settles a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settlement {
    /// Apply the gesture now.
    #[default]
    Commit,
    /// Discard the gesture now. A rejected hook is a cancel, not an error.
    Cancel,
    /// The host will decide later via `settle`; the session stays parked
    /// and no new gesture may start on this item until then.
    Deferred,
}

/// The host's eventual answer to a [`Settlement::Deferred`] stop hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Commit,
    Cancel,
}

/// Optional user hooks observed by both controllers.
///
/// All methods default to no-ops; `on_drag_stop`/`on_resize_stop` default
/// to an immediate commit, so hosts without a stop hook settle
/// synchronously.
pub trait GridHooks {
    /// A drag session is starting. May read or mutate application state.
    fn on_drag_start(&mut self, id: ItemId) {
        let _ = id;
    }

    /// A drag session ended; decide its fate.
    fn on_drag_stop(&mut self, id: ItemId) -> Settlement {
        let _ = id;
        Settlement::Commit
    }

    /// A resize session is starting.
    fn on_resize_start(&mut self, id: ItemId) {
        let _ = id;
    }

    /// A resize session ended; decide its fate.
    fn on_resize_stop(&mut self, id: ItemId) -> Settlement {
        let _ = id;
        Settlement::Commit
    }

    /// A committed gesture changed an item's placement.
    fn on_item_changed(&mut self, change: &ItemChange) {
        let _ = change;
    }

    /// A drag committed on top of another item while drop-over is enabled.
    fn on_drop_over_item(&mut self, source: ItemId, target: ItemId) {
        let _ = (source, target);
    }
}

/// Hook implementation with all defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl GridHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_hooks_commits_synchronously() {
        let mut hooks = NoHooks;
        let id = probe_id();
        assert_eq!(hooks.on_drag_stop(id), Settlement::Commit);
        assert_eq!(hooks.on_resize_stop(id), Settlement::Commit);
    }

    fn probe_id() -> ItemId {
        ItemId::new(1).expect("non-zero")
    }
}
