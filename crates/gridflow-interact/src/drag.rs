#![forbid(unsafe_code)]

//! The drag controller: one item's move gesture from press to release.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --pointer_down (gate fires)--> Dragging
//! Dragging --pointer_move-----------> Dragging   (speculative working moves)
//! Dragging --pointer_up/interrupt---> Idle       (stop hook commits/cancels)
//!                                  \-> Settling  (stop hook deferred)
//! Settling --settle-----------------> Idle
//! ```
//!
//! Every move recomputes a candidate pixel position from the pointer,
//! converts it to a cell, trial-places each axis independently against the
//! grid bounds, and hands overlaps to the push and swap engines. A
//! collision that survives both engines rolls the whole step back; the
//! grid is never left overlapping.
//!
//! # Invariants
//!
//! 1. Only one session exists per controller, and the session owns its
//!    push/swap engines; no engine outlives the session.
//! 2. The grid-wide moving slot is claimed at start and released when the
//!    gesture settles, on every exit path.
//! 3. Cancellation restores the committed position exactly and reverts
//!    every engine shift wholesale.

use std::time::Instant;

use gridflow_core::event::{InterruptKind, PointerEvent, PointerTarget};
use gridflow_core::geometry::PixelRect;
use gridflow_core::gesture::{GateEffect, StartGate};
use gridflow_layout::{Collision, Grid, ItemId, Rounding, TextDirection};
use tracing::debug;

use crate::align::AlignmentMatches;
use crate::autoscroll::{AutoscrollCoordinator, ScrollEdges};
use crate::port::{GridHooks, InteractionClass, RenderPort, SettleOutcome, Settlement};
use crate::push::{PushDirection, PushEngine};
use crate::swap::SwapEngine;

/// Motion directions derived from successive pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Directions {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Directions {
    fn any(self) -> bool {
        self.up || self.down || self.left || self.right
    }

    fn as_edges(self) -> ScrollEdges {
        ScrollEdges {
            north: self.up,
            south: self.down,
            east: self.right,
            west: self.left,
        }
    }
}

/// Transient per-gesture state. Created on drag start, destroyed when the
/// gesture settles.
#[derive(Debug)]
struct DragSession {
    last_pointer: (f64, f64),
    last_event: PointerEvent,
    original_client_x: f64,
    original_client_y: f64,
    offset_left: f64,
    offset_top: f64,
    margin: f64,
    outer_top: f64,
    outer_right: f64,
    outer_bottom: f64,
    outer_left: f64,
    diff_left: f64,
    diff_top: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    path: Vec<(i32, i32)>,
    push: PushEngine,
    swap: SwapEngine,
    collision: Collision,
    alignment: AlignmentMatches,
    autoscroll: AutoscrollCoordinator,
}

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging(Box<DragSession>),
    Settling(Box<DragSession>),
}

/// Orchestrates one item's full move gesture.
#[derive(Debug)]
pub struct DragController {
    item: ItemId,
    enabled: bool,
    gate: StartGate,
    state: DragState,
}

impl DragController {
    /// Create a controller for one item. Call
    /// [`sync_enabled`](Self::sync_enabled) before feeding events.
    #[must_use]
    pub fn new(item: ItemId) -> Self {
        Self {
            item,
            enabled: false,
            gate: StartGate::new(),
            state: DragState::Idle,
        }
    }

    /// The controlled item.
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// Whether the gesture gate is attached.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a drag session is active.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Whether a finished gesture awaits its deferred settlement.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        matches!(self.state, DragState::Settling(_))
    }

    /// Latest collision observed by the session.
    #[must_use]
    pub fn collision(&self) -> Collision {
        match &self.state {
            DragState::Dragging(session) | DragState::Settling(session) => session.collision,
            DragState::Idle => Collision::None,
        }
    }

    /// Latest alignment-guide matches, for the host's overlay.
    #[must_use]
    pub fn alignment(&self) -> AlignmentMatches {
        match &self.state {
            DragState::Dragging(session) => session.alignment,
            _ => AlignmentMatches::default(),
        }
    }

    /// Cells visited by the session so far.
    #[must_use]
    pub fn path(&self) -> &[(i32, i32)] {
        match &self.state {
            DragState::Dragging(session) | DragState::Settling(session) => &session.path,
            DragState::Idle => &[],
        }
    }

    /// Re-read the item's drag capability. Returns the new enabled state
    /// so the host can attach or detach its press listeners.
    pub fn sync_enabled(&mut self, grid: &Grid) -> bool {
        self.enabled = grid.can_be_dragged(self.item);
        if !self.enabled {
            self.gate.reset();
        }
        self.enabled
    }

    /// Feed a pointer press. Returns whether the press was accepted
    /// (started or armed a gesture).
    pub fn pointer_down(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        event: PointerEvent,
        now: Instant,
    ) -> bool {
        if !self.enabled || !matches!(self.state, DragState::Idle) {
            return false;
        }
        // Presses on resize handles and opted-out content never drag.
        if !matches!(event.target, PointerTarget::Item) {
            return false;
        }
        if !event.button.is_primary() {
            return false;
        }
        match self
            .gate
            .pointer_down(event, grid.options().drag_delay, now)
        {
            GateEffect::Fired(press) => {
                self.drag_start(grid, port, hooks, press);
                true
            }
            GateEffect::Pending => true,
            _ => false,
        }
    }

    /// Feed a pointer move: threshold-checks an armed press, or advances
    /// an active session.
    pub fn pointer_move(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        match &mut self.state {
            DragState::Idle => {
                let _ = self.gate.pointer_move(event.client_x, event.client_y);
            }
            DragState::Dragging(session) => {
                session.drag_move(self.item, grid, port, event);
            }
            DragState::Settling(_) => {}
        }
    }

    /// Feed a pointer release. Ends the session (or the armed press).
    pub fn pointer_up(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
    ) {
        self.interrupt(grid, port, hooks, InterruptKind::PointerUp);
    }

    /// Feed a gesture-ending host signal (release, blur, touch end).
    ///
    /// An active session resolves through the normal stop path: loss of
    /// focus ends the gesture, it does not discard it; the stop hook still
    /// decides the outcome.
    pub fn interrupt(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        kind: InterruptKind,
    ) {
        let _ = self.gate.interrupt(kind);
        if matches!(self.state, DragState::Dragging(_)) {
            self.drag_stop(grid, port, hooks);
        }
    }

    /// Drive time-based work: the delay gate's deadline and autoscroll
    /// stepping. Call from the host loop.
    pub fn poll(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        now: Instant,
    ) {
        if let GateEffect::Fired(press) = self.gate.poll(now) {
            self.drag_start(grid, port, hooks, press);
        }
        if let DragState::Dragging(session) = &mut self.state
            && let Some(step) = session.autoscroll.poll(now)
        {
            port.scroll_by(step.dx, step.dy);
            // Re-issue the position computation so the item follows the
            // scrolled surface under the unchanged pointer.
            let event = session.last_event;
            session.calculate_position_from_pointer(self.item, grid, port, event);
        }
    }

    /// Resolve a deferred stop-hook settlement. No-op unless a gesture is
    /// actually parked.
    pub fn settle(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        outcome: SettleOutcome,
    ) {
        if !matches!(self.state, DragState::Settling(_)) {
            return;
        }
        let DragState::Settling(mut session) = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return;
        };
        match outcome {
            SettleOutcome::Commit => session.make_drag(self.item, grid, port, hooks),
            SettleOutcome::Cancel => session.cancel_drag(self.item, grid, port),
        }
        grid.clear_moving();
        port.refresh_preview();
    }

    /// Unconditional teardown: reset the gate and discard any session,
    /// reverting its speculative state. Safe on every exit path.
    pub fn destroy(&mut self, grid: &mut Grid, port: &mut dyn RenderPort) {
        self.gate.reset();
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        if let DragState::Dragging(mut session) | DragState::Settling(mut session) = state {
            session.autoscroll.cancel();
            port.set_interaction_class(self.item, InteractionClass::Moving, false);
            grid.set_drag_in_progress(false);
            session.cancel_drag(self.item, grid, port);
            grid.clear_moving();
            port.refresh_preview();
        }
    }

    fn drag_start(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        press: PointerEvent,
    ) {
        if !press.button.is_primary() {
            return;
        }
        hooks.on_drag_start(self.item);
        port.set_interaction_class(self.item, InteractionClass::Moving, true);

        let options = grid.options().clone();
        let view = port.viewport();
        let Some(layout) = grid.item_layout_rect(self.item) else {
            return;
        };
        let Some(committed) = grid.committed(self.item) else {
            return;
        };

        let margin = options.margin;
        let offset_left = view.scroll_left - view.offset_left;
        let offset_top = view.scroll_top - view.offset_top;
        let left = layout.left - margin;
        let top = layout.top - margin;
        let diff_left = if options.dir == TextDirection::Rtl {
            press.client_x - view.scroll_width + layout.left
        } else {
            press.client_x + offset_left - margin - left
        };
        let diff_top = press.client_y + offset_top - margin - top;

        grid.set_moving(self.item);
        port.refresh_preview();
        grid.set_drag_in_progress(true);
        port.request_layout();

        debug!(item = %self.item, "drag started");
        self.state = DragState::Dragging(Box::new(DragSession {
            last_pointer: (0.0, 0.0),
            last_event: press,
            original_client_x: press.client_x,
            original_client_y: press.client_y,
            offset_left,
            offset_top,
            margin,
            outer_top: options.outer_margins.top_or(margin),
            outer_right: options.outer_margins.right_or(margin),
            outer_bottom: options.outer_margins.bottom_or(margin),
            outer_left: options.outer_margins.left_or(margin),
            diff_left,
            diff_top,
            left,
            top,
            width: layout.width,
            height: layout.height,
            path: vec![committed.position()],
            push: PushEngine::new(self.item),
            swap: SwapEngine::new(self.item),
            collision: Collision::None,
            alignment: AlignmentMatches::default(),
            autoscroll: AutoscrollCoordinator::new(
                options.scroll_sensitivity_px,
                options.scroll_speed_px,
            ),
        }));
    }

    fn drag_stop(&mut self, grid: &mut Grid, port: &mut dyn RenderPort, hooks: &mut dyn GridHooks) {
        let DragState::Dragging(mut session) = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return;
        };
        session.autoscroll.cancel();
        port.set_interaction_class(self.item, InteractionClass::Moving, false);
        grid.set_drag_in_progress(false);
        port.request_layout();
        session.path.clear();

        match hooks.on_drag_stop(self.item) {
            Settlement::Commit => {
                session.make_drag(self.item, grid, port, hooks);
                grid.clear_moving();
                port.refresh_preview();
            }
            Settlement::Cancel => {
                session.cancel_drag(self.item, grid, port);
                grid.clear_moving();
                port.refresh_preview();
            }
            Settlement::Deferred => {
                self.state = DragState::Settling(session);
            }
        }
    }
}

impl DragSession {
    fn drag_move(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        let mut event = event;
        let mut directions = self.directions_for(&event);

        if grid.options().enable_boundary_control {
            let item_rect = port.item_view_rect(item);
            let grid_rect = port.viewport().grid_rect;
            if directions.up && item_rect.top < grid_rect.top + self.outer_top {
                directions.up = false;
                event = event.with_client_y(self.last_pointer.1);
            }
            if directions.left && item_rect.left < grid_rect.left + self.outer_left {
                directions.left = false;
                event = event.with_client_x(self.last_pointer.0);
            }
            if directions.right && item_rect.right() > grid_rect.right() - self.outer_right {
                directions.right = false;
                event = event.with_client_x(self.last_pointer.0);
            }
            if directions.down && item_rect.bottom() > grid_rect.bottom() - self.outer_bottom {
                directions.down = false;
                event = event.with_client_y(self.last_pointer.1);
            }
        }

        if directions.any() {
            let view = port.viewport();
            self.offset_left = view.scroll_left - view.offset_left;
            self.offset_top = view.scroll_top - view.offset_top;
            self.autoscroll.update(&view, &event, directions.as_edges());
            self.calculate_position_from_pointer(item, grid, port, event);
        }

        self.alignment = AlignmentMatches::compute(grid, port, item);
    }

    /// Directions from the last observed pointer position. The first event
    /// of a session sees a zeroed last position and produces no direction.
    fn directions_for(&mut self, event: &PointerEvent) -> Directions {
        if self.last_pointer == (0.0, 0.0) {
            self.last_pointer = (event.client_x, event.client_y);
        }
        Directions {
            up: self.last_pointer.1 > event.client_y,
            down: self.last_pointer.1 < event.client_y,
            right: self.last_pointer.0 < event.client_x,
            left: self.last_pointer.0 > event.client_x,
        }
    }

    fn calculate_position_from_pointer(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        let rtl = grid.options().dir == TextDirection::Rtl;
        if let Some(scale) = grid.options().scale {
            let view = port.viewport();
            if rtl {
                self.left = view.scroll_width - self.original_client_x
                    + (event.client_x - self.original_client_x) / scale
                    + self.diff_left;
            } else {
                self.left = self.original_client_x
                    + (event.client_x - self.original_client_x) / scale
                    + self.offset_left
                    - self.diff_left;
            }
            self.top = self.original_client_y
                + (event.client_y - self.original_client_y) / scale
                + self.offset_top
                - self.diff_top;
        } else {
            if rtl {
                let view = port.viewport();
                self.left = view.scroll_width - event.client_x + self.diff_left;
            } else {
                self.left = event.client_x + self.offset_left - self.diff_left;
            }
            self.top = event.client_y + self.offset_top - self.diff_top;
        }

        self.calculate_item_position(item, grid, port);
        self.last_pointer = (event.client_x, event.client_y);
        self.last_event = event;
        port.request_layout();
    }

    fn calculate_item_position(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort) {
        grid.set_moving(item);
        let position_x = grid.pixels_to_position_x(self.left, Rounding::Round);
        let position_y = grid.pixels_to_position_y(self.top, Rounding::Round);
        let Some(working) = grid.working(item) else {
            return;
        };
        let (backup_x, backup_y) = (working.x, working.y);

        // Trial each axis independently; a bounds violation on one axis
        // must not block the other (and must not let the item slide
        // through a diagonal gap).
        let mut rect = working;
        rect.x = position_x;
        grid.set_working(item, rect);
        if grid.check_grid_collision(item) {
            rect.x = backup_x;
            grid.set_working(item, rect);
        }
        rect.y = position_y;
        grid.set_working(item, rect);
        if grid.check_grid_collision(item) {
            rect.y = backup_y;
            grid.set_working(item, rect);
        }

        port.set_item_box(
            item,
            PixelRect::new(self.left, self.top, self.width, self.height),
        );

        if backup_x != rect.x || backup_y != rect.y {
            let Some(&last) = self.path.last() else {
                return;
            };
            let direction = PushDirection::from_step(last, (rect.x, rect.y));
            let disable_push = grid.options().disable_push_on_drag;
            self.push.push_items(grid, direction, disable_push);
            self.swap.swap_items(grid, last);

            self.collision = grid.check_collision(item);
            if self.collision.is_colliding() {
                if let Some(mut current) = grid.working(item) {
                    current.x = backup_x;
                    current.y = backup_y;
                    grid.set_working(item, current);
                }
                if grid.options().drop_over_items && self.collision.target().is_some() {
                    // Occupied-cell drop: no placement update will follow.
                    grid.clear_moving();
                }
            } else if let Some(current) = grid.working(item) {
                self.path.push(current.position());
                self.push.check_push_back(grid);
                self.swap.check_swap_back(grid);
            }
        } else {
            // No net move: clear any stale collision so a same-cell
            // re-entry cannot re-trigger the drop-over callback.
            self.collision = Collision::None;
        }
        port.refresh_preview();
    }

    fn make_drag(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
    ) {
        if grid.options().drop_over_items
            && let Some(target) = self.collision.target()
        {
            hooks.on_drop_over_item(item, target);
        }
        self.collision = Collision::None;
        apply_final_box(item, grid, port);
        if let Some(change) = grid.commit_item(item) {
            hooks.on_item_changed(&change);
        }
        self.push.commit(grid, hooks);
        self.swap.commit(grid, hooks);
        debug!(item = %item, "drag committed");
    }

    fn cancel_drag(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort) {
        grid.rollback_position(item);
        apply_final_box(item, grid, port);
        self.push.revert(grid);
        self.swap.revert(grid);
        debug!(item = %item, "drag cancelled");
    }
}

fn apply_final_box(item: ItemId, grid: &Grid, port: &mut dyn RenderPort) {
    if let Some(layout) = grid.item_layout_rect(item) {
        port.set_item_box(item, layout);
    }
}
