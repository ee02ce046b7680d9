#![forbid(unsafe_code)]

//! Edge-proximity autoscroll coordination.
//!
//! While a drag or resize holds the pointer near a scrollable edge of the
//! grid surface, the coordinator produces rate-limited scroll steps. The
//! timer itself belongs to the host: it calls the controller's autoscroll
//! poll from its own loop, the controller applies the returned step
//! through the render port and re-runs its position computation so the
//! item follows the scrolled surface. `cancel` is unconditional on every
//! session exit path so no scroll outlives its gesture.

use std::time::{Duration, Instant};

use gridflow_core::event::PointerEvent;

use crate::port::ViewportMetrics;

/// Minimum spacing between scroll steps.
pub const SCROLL_TICK: Duration = Duration::from_millis(50);

/// Which edges of the session may trigger scrolling.
///
/// For a drag this mirrors the current motion directions; for a resize it
/// is fixed at gesture start from the grabbed handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollEdges {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ScrollEdges {
    /// All edges armed.
    pub const ALL: ScrollEdges = ScrollEdges {
        north: true,
        south: true,
        east: true,
        west: true,
    };
}

/// One scroll step to apply to the grid surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub dx: f64,
    pub dy: f64,
}

/// Edge-triggered scroll intent with rate-limited stepping.
#[derive(Debug, Clone)]
pub struct AutoscrollCoordinator {
    sensitivity: f64,
    speed: f64,
    horizontal: i8,
    vertical: i8,
    last_step: Option<Instant>,
}

impl AutoscrollCoordinator {
    /// Create a coordinator with the grid's scroll tuning.
    #[must_use]
    pub fn new(sensitivity: f64, speed: f64) -> Self {
        Self {
            sensitivity,
            speed,
            horizontal: 0,
            vertical: 0,
            last_step: None,
        }
    }

    /// Whether any axis currently wants to scroll.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.horizontal != 0 || self.vertical != 0
    }

    /// Recompute scroll intent from the current pointer position.
    ///
    /// An axis scrolls only when its edge is armed, the pointer is within
    /// the sensitivity band of that edge of the grid's viewport box, and
    /// there is scroll room left in that direction.
    pub fn update(&mut self, view: &ViewportMetrics, pointer: &PointerEvent, edges: ScrollEdges) {
        let rect = view.grid_rect;

        self.vertical = 0;
        if edges.south
            && pointer.client_y > rect.bottom() - self.sensitivity
            && view.scroll_top + rect.height < view.scroll_height
        {
            self.vertical = 1;
        } else if edges.north && pointer.client_y < rect.top + self.sensitivity && view.scroll_top > 0.0 {
            self.vertical = -1;
        }

        self.horizontal = 0;
        if edges.east
            && pointer.client_x > rect.right() - self.sensitivity
            && view.scroll_left + rect.width < view.scroll_width
        {
            self.horizontal = 1;
        } else if edges.west
            && pointer.client_x < rect.left + self.sensitivity
            && view.scroll_left > 0.0
        {
            self.horizontal = -1;
        }
    }

    /// Produce the next scroll step, rate-limited to [`SCROLL_TICK`].
    pub fn poll(&mut self, now: Instant) -> Option<ScrollStep> {
        if !self.is_active() {
            return None;
        }
        if let Some(last) = self.last_step
            && now.duration_since(last) < SCROLL_TICK
        {
            return None;
        }
        self.last_step = Some(now);
        Some(ScrollStep {
            dx: f64::from(self.horizontal) * self.speed,
            dy: f64::from(self.vertical) * self.speed,
        })
    }

    /// Stop scrolling. Unconditional on session end.
    pub fn cancel(&mut self) {
        self.horizontal = 0;
        self.vertical = 0;
        self.last_step = None;
    }
}
