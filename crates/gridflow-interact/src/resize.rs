#![forbid(unsafe_code)]

//! The resize controller: one item's resize gesture across 8 handles.
//!
//! Mirrors the drag controller's lifecycle but parameterizes on the
//! grabbed handle. Each single-edge handler independently computes its new
//! edge from the pointer, clamps to the minimum pixel size and (when
//! boundary control is on) the grid bounds, converts the edge to a cell
//! (floor for leading edges, ceil for trailing edges), and resolves
//! conflicts through the resize-push and push engines with a per-edge
//! rollback. Corner handles compose the two adjacent edge handlers in
//! no-checks mode and run one shared collision check, so an aspect-ratio
//! constraint is enforced atomically across both axes rather than
//! per-edge.
//!
//! On right-to-left grids the east/west semantics mirror: the visual east
//! handle edits the logical west edge, and the pointer math flips around
//! the press anchor.

use std::time::Instant;

use gridflow_core::event::{HandleKind, HandleSet, InterruptKind, PointerEvent, PointerTarget};
use gridflow_core::geometry::PixelRect;
use gridflow_core::gesture::{GateEffect, StartGate};
use gridflow_layout::{Grid, ItemId, Rounding, TextDirection};
use tracing::debug;

use crate::align::AlignmentMatches;
use crate::autoscroll::{AutoscrollCoordinator, ScrollEdges};
use crate::port::{GridHooks, InteractionClass, RenderPort, SettleOutcome, Settlement};
use crate::push::{PushDirection, PushEngine};
use crate::push_resize::ResizePushEngine;

/// Transient per-gesture state. Created on resize start, destroyed when
/// the gesture settles.
#[derive(Debug)]
struct ResizeSession {
    /// The bound direction function. `None` only when the press did not
    /// land on a handle; motion then is a programming-contract violation.
    direction: Option<HandleKind>,
    edges: ScrollEdges,
    last_pointer: (f64, f64),
    last_event: PointerEvent,
    original_client_x: f64,
    original_client_y: f64,
    offset_left: f64,
    offset_top: f64,
    margin: f64,
    outer_right: f64,
    outer_bottom: f64,
    diff_left: f64,
    diff_right: f64,
    diff_top: f64,
    diff_bottom: f64,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    width: f64,
    height: f64,
    min_width: f64,
    min_height: f64,
    /// Pre-move backup of `[x, y, cols, rows]` for the reset functions,
    /// seeded from the pre-resize placement.
    item_backup: [i32; 4],
    push: PushEngine,
    push_resize: ResizePushEngine,
    alignment: AlignmentMatches,
    autoscroll: AutoscrollCoordinator,
}

#[derive(Debug)]
enum ResizeState {
    Idle,
    Resizing(Box<ResizeSession>),
    Settling(Box<ResizeSession>),
}

/// Orchestrates one item's full resize gesture.
#[derive(Debug)]
pub struct ResizeController {
    item: ItemId,
    enabled: bool,
    handles: HandleSet,
    gate: StartGate,
    state: ResizeState,
}

impl ResizeController {
    /// Create a controller for one item. Call
    /// [`sync_enabled`](Self::sync_enabled) before feeding events.
    #[must_use]
    pub fn new(item: ItemId) -> Self {
        Self {
            item,
            enabled: false,
            handles: HandleSet::empty(),
            gate: StartGate::new(),
            state: ResizeState::Idle,
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

    /// Currently enabled handles.
    #[must_use]
    pub const fn handles(&self) -> HandleSet {
        self.handles
    }

    /// Whether a resize session is active.
    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    /// Whether a finished gesture awaits its deferred settlement.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        matches!(self.state, ResizeState::Settling(_))
    }

    /// Latest alignment-guide matches, for the host's overlay.
    #[must_use]
    pub fn alignment(&self) -> AlignmentMatches {
        match &self.state {
            ResizeState::Resizing(session) => session.alignment,
            _ => AlignmentMatches::default(),
        }
    }

    /// Re-read the item's resize capability and handle set. Returns the
    /// new enabled state so the host can show or hide its handles.
    pub fn sync_enabled(&mut self, grid: &Grid) -> bool {
        self.enabled = grid.can_be_resized(self.item);
        self.handles = grid.resizable_handles(self.item);
        if !self.enabled {
            self.gate.reset();
        }
        self.enabled
    }

    /// Feed a pointer press on a resize handle. Returns whether the press
    /// was accepted (started or armed a gesture).
    pub fn pointer_down(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        event: PointerEvent,
        now: Instant,
    ) -> bool {
        if !self.enabled || !matches!(self.state, ResizeState::Idle) {
            return false;
        }
        let PointerTarget::Handle(handle) = event.target else {
            return false;
        };
        if !self.handles.allows(handle) {
            return false;
        }
        if !event.button.is_primary() {
            return false;
        }
        match self
            .gate
            .pointer_down(event, grid.options().resize_delay, now)
        {
            GateEffect::Fired(press) => {
                self.resize_start(grid, port, hooks, press);
                true
            }
            GateEffect::Pending => true,
            _ => false,
        }
    }

    /// Feed a pointer move: threshold-checks an armed press, or advances
    /// an active session.
    ///
    /// # Panics
    ///
    /// Panics if a session is active without a bound direction function;
    /// that press never classified a handle and motion on it is a
    /// programming-contract violation.
    pub fn pointer_move(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        match &mut self.state {
            ResizeState::Idle => {
                let _ = self.gate.pointer_move(event.client_x, event.client_y);
            }
            ResizeState::Resizing(session) => {
                session.resize_move(self.item, grid, port, event);
            }
            ResizeState::Settling(_) => {}
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

    /// Feed a gesture-ending host signal.
    pub fn interrupt(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        kind: InterruptKind,
    ) {
        let _ = self.gate.interrupt(kind);
        if matches!(self.state, ResizeState::Resizing(_)) {
            self.resize_stop(grid, port, hooks);
        }
    }

    /// Drive time-based work: the delay gate's deadline and autoscroll
    /// stepping.
    pub fn poll(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        now: Instant,
    ) {
        if let GateEffect::Fired(press) = self.gate.poll(now) {
            self.resize_start(grid, port, hooks, press);
        }
        if let ResizeState::Resizing(session) = &mut self.state
            && let Some(step) = session.autoscroll.poll(now)
        {
            port.scroll_by(step.dx, step.dy);
            let event = session.last_event;
            session.resize_move(self.item, grid, port, event);
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
        if !matches!(self.state, ResizeState::Settling(_)) {
            return;
        }
        let ResizeState::Settling(mut session) =
            std::mem::replace(&mut self.state, ResizeState::Idle)
        else {
            return;
        };
        match outcome {
            SettleOutcome::Commit => session.make_resize(self.item, grid, port, hooks),
            SettleOutcome::Cancel => session.cancel_resize(self.item, grid, port),
        }
        grid.clear_moving();
        port.refresh_preview();
    }

    /// Unconditional teardown: reset the gate and discard any session,
    /// reverting its speculative state.
    pub fn destroy(&mut self, grid: &mut Grid, port: &mut dyn RenderPort) {
        self.gate.reset();
        let state = std::mem::replace(&mut self.state, ResizeState::Idle);
        if let ResizeState::Resizing(mut session) | ResizeState::Settling(mut session) = state {
            session.autoscroll.cancel();
            port.set_interaction_class(self.item, InteractionClass::Resizing, false);
            grid.set_drag_in_progress(false);
            session.cancel_resize(self.item, grid, port);
            grid.clear_moving();
            port.refresh_preview();
        }
    }

    fn resize_start(
        &mut self,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
        press: PointerEvent,
    ) {
        if !press.button.is_primary() {
            return;
        }
        hooks.on_resize_start(self.item);
        port.set_interaction_class(self.item, InteractionClass::Resizing, true);

        let options = grid.options().clone();
        let view = port.viewport();
        let Some(layout) = grid.item_layout_rect(self.item) else {
            return;
        };
        let Some(working) = grid.working(self.item) else {
            return;
        };

        let margin = options.margin;
        let offset_left = view.scroll_left - view.offset_left;
        let offset_top = view.scroll_top - view.offset_top;
        let (left, top) = (layout.left, layout.top);
        let (width, height) = (layout.width, layout.height);
        let (right, bottom) = (left + width, top + height);

        let direction = match press.target {
            PointerTarget::Handle(handle) if options.dir == TextDirection::Rtl => {
                Some(handle.mirrored_rtl())
            }
            PointerTarget::Handle(handle) => Some(handle),
            _ => None,
        };
        let edges = direction.map(edges_for).unwrap_or_default();

        grid.set_moving(self.item);
        port.refresh_preview();
        grid.set_drag_in_progress(true);
        port.request_layout();

        debug!(item = %self.item, ?direction, "resize started");
        self.state = ResizeState::Resizing(Box::new(ResizeSession {
            direction,
            edges,
            last_pointer: (press.client_x, press.client_y),
            last_event: press,
            original_client_x: press.client_x,
            original_client_y: press.client_y,
            offset_left,
            offset_top,
            margin,
            outer_right: options.outer_margins.right_or(margin),
            outer_bottom: options.outer_margins.bottom_or(margin),
            diff_left: press.client_x + offset_left - left,
            diff_right: press.client_x + offset_left - right,
            diff_top: press.client_y + offset_top - top,
            diff_bottom: press.client_y + offset_top - bottom,
            left,
            top,
            right,
            bottom,
            width,
            height,
            min_width: grid.position_x_to_pixels(grid.min_cols_for(self.item)) - margin,
            min_height: grid.position_y_to_pixels(grid.min_rows_for(self.item)) - margin,
            item_backup: [working.x, working.y, working.cols, working.rows],
            push: PushEngine::new(self.item),
            push_resize: ResizePushEngine::new(self.item),
            alignment: AlignmentMatches::default(),
            autoscroll: AutoscrollCoordinator::new(
                options.scroll_sensitivity_px,
                options.scroll_speed_px,
            ),
        }));
    }

    fn resize_stop(&mut self, grid: &mut Grid, port: &mut dyn RenderPort, hooks: &mut dyn GridHooks) {
        let ResizeState::Resizing(mut session) =
            std::mem::replace(&mut self.state, ResizeState::Idle)
        else {
            return;
        };
        session.autoscroll.cancel();
        port.set_interaction_class(self.item, InteractionClass::Resizing, false);
        grid.set_drag_in_progress(false);
        port.request_layout();

        match hooks.on_resize_stop(self.item) {
            Settlement::Commit => {
                session.make_resize(self.item, grid, port, hooks);
                grid.clear_moving();
                port.refresh_preview();
            }
            Settlement::Cancel => {
                session.cancel_resize(self.item, grid, port);
                grid.clear_moving();
                port.refresh_preview();
            }
            Settlement::Deferred => {
                self.state = ResizeState::Settling(session);
            }
        }
    }
}

/// Scroll edges armed for a bound direction.
fn edges_for(direction: HandleKind) -> ScrollEdges {
    let mut edges = ScrollEdges::default();
    match direction {
        HandleKind::North => edges.north = true,
        HandleKind::South => edges.south = true,
        HandleKind::East => edges.east = true,
        HandleKind::West => edges.west = true,
        HandleKind::NorthEast => {
            edges.north = true;
            edges.east = true;
        }
        HandleKind::NorthWest => {
            edges.north = true;
            edges.west = true;
        }
        HandleKind::SouthEast => {
            edges.south = true;
            edges.east = true;
        }
        HandleKind::SouthWest => {
            edges.south = true;
            edges.west = true;
        }
    }
    edges
}

impl ResizeSession {
    fn resize_move(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        let Some(direction) = self.direction else {
            panic!("resize motion before a direction function was bound");
        };

        let view = port.viewport();
        self.offset_top = view.scroll_top - view.offset_top;
        self.offset_left = view.scroll_left - view.offset_left;
        self.autoscroll.update(&view, &event, self.edges);

        let scale = grid.options().scale_or_identity();
        let synthetic = event
            .with_client_x(self.original_client_x + (event.client_x - self.original_client_x) / scale)
            .with_client_y(
                self.original_client_y + (event.client_y - self.original_client_y) / scale,
            );
        self.dispatch(direction, item, grid, port, synthetic);

        self.last_pointer = (event.client_x, event.client_y);
        self.last_event = event;
        port.request_layout();
        self.alignment = AlignmentMatches::compute(grid, port, item);
    }

    fn dispatch(
        &mut self,
        direction: HandleKind,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
    ) {
        match direction {
            HandleKind::North => self.handle_north(item, grid, port, event, true),
            HandleKind::South => self.handle_south(item, grid, port, event, true),
            HandleKind::East => self.handle_east(item, grid, port, event, true),
            HandleKind::West => self.handle_west(item, grid, port, event, true),
            HandleKind::NorthWest => self.handle_corner(
                item,
                grid,
                port,
                event,
                HandleKind::NorthWest,
            ),
            HandleKind::NorthEast => self.handle_corner(
                item,
                grid,
                port,
                event,
                HandleKind::NorthEast,
            ),
            HandleKind::SouthWest => self.handle_corner(
                item,
                grid,
                port,
                event,
                HandleKind::SouthWest,
            ),
            HandleKind::SouthEast => self.handle_corner(
                item,
                grid,
                port,
                event,
                HandleKind::SouthEast,
            ),
        }
    }

    /// Horizontal pointer coordinate with right-to-left mirroring around
    /// the press anchor.
    fn mirrored_client_x(&self, grid: &Grid, event: &PointerEvent) -> f64 {
        if grid.options().dir == TextDirection::Rtl {
            self.original_client_x + (self.original_client_x - event.client_x)
        } else {
            event.client_x
        }
    }

    fn handle_north(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
        do_checks: bool,
    ) {
        self.top = event.client_y + self.offset_top - self.diff_top;
        self.height = self.bottom - self.top;
        if self.min_height > self.height {
            self.height = self.min_height;
            self.top = self.bottom - self.min_height;
        } else if grid.options().enable_boundary_control {
            self.top = self.top.max(0.0);
            self.height = self.bottom - self.top;
        }
        let margin_top = if grid.options().push_items {
            self.margin
        } else {
            0.0
        };
        let new_position = grid.pixels_to_position_y(self.top + margin_top, Rounding::Floor);
        let Some(mut working) = grid.working(item) else {
            return;
        };
        if working.y != new_position {
            self.item_backup[1] = working.y;
            self.item_backup[3] = working.rows;
            working.rows += working.y - new_position;
            working.y = new_position;
            grid.set_working(item, working);
            self.push_resize.push_items(grid, PushDirection::FromSouth);
            let disable = grid.options().disable_push_on_resize;
            self.push
                .push_items(grid, Some(PushDirection::FromSouth), disable);
            if !do_checks {
                return;
            }
            if grid.check_collision(item).is_colliding() {
                self.reset_north(item, grid, port, false);
                return;
            }
            port.refresh_preview();
            self.push_resize.check_push_back(grid);
            self.push.check_push_back(grid);
        }
        self.apply_pixel_box(item, port);
    }

    fn handle_west(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
        do_checks: bool,
    ) {
        let client_x = self.mirrored_client_x(grid, &event);
        self.left = client_x + self.offset_left - self.diff_left;
        self.width = self.right - self.left;
        if self.min_width > self.width {
            self.width = self.min_width;
            self.left = self.right - self.min_width;
        } else if grid.options().enable_boundary_control {
            self.left = self.left.max(0.0);
            self.width = self.right - self.left;
        }
        let margin_left = if grid.options().push_items {
            self.margin
        } else {
            0.0
        };
        let new_position = grid.pixels_to_position_x(self.left + margin_left, Rounding::Floor);
        let Some(mut working) = grid.working(item) else {
            return;
        };
        if working.x != new_position {
            self.item_backup[0] = working.x;
            self.item_backup[2] = working.cols;
            working.cols += working.x - new_position;
            working.x = new_position;
            grid.set_working(item, working);
            self.push_resize.push_items(grid, PushDirection::FromEast);
            let disable = grid.options().disable_push_on_resize;
            self.push
                .push_items(grid, Some(PushDirection::FromEast), disable);
            if !do_checks {
                return;
            }
            if grid.check_collision(item).is_colliding() {
                self.reset_west(item, grid, port, false);
                return;
            }
            port.refresh_preview();
            self.push_resize.check_push_back(grid);
            self.push.check_push_back(grid);
        }
        self.apply_pixel_box(item, port);
    }

    fn handle_south(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
        do_checks: bool,
    ) {
        self.height = event.client_y + self.offset_top - self.diff_bottom - self.top;
        if self.min_height > self.height {
            self.height = self.min_height;
        }
        self.bottom = self.top + self.height;
        if grid.options().enable_boundary_control {
            let grid_rect = port.viewport().grid_rect;
            self.bottom = self
                .bottom
                .min(grid_rect.height - 2.0 * self.outer_bottom);
            self.height = self.bottom - self.top;
        }
        let margin_bottom = if grid.options().push_items {
            0.0
        } else {
            self.margin
        };
        let new_position = grid.pixels_to_position_y(self.bottom + margin_bottom, Rounding::Ceil);
        let Some(mut working) = grid.working(item) else {
            return;
        };
        if working.y + working.rows != new_position {
            self.item_backup[3] = working.rows;
            working.rows = new_position - working.y;
            grid.set_working(item, working);
            self.push_resize.push_items(grid, PushDirection::FromNorth);
            let disable = grid.options().disable_push_on_resize;
            self.push
                .push_items(grid, Some(PushDirection::FromNorth), disable);
            if !do_checks {
                return;
            }
            if grid.check_collision(item).is_colliding() {
                self.reset_south(item, grid, port, false);
                return;
            }
            port.refresh_preview();
            self.push_resize.check_push_back(grid);
            self.push.check_push_back(grid);
        }
        self.apply_pixel_box(item, port);
    }

    fn handle_east(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
        do_checks: bool,
    ) {
        let client_x = self.mirrored_client_x(grid, &event);
        self.width = client_x + self.offset_left - self.diff_right - self.left;
        if self.min_width > self.width {
            self.width = self.min_width;
        }
        self.right = self.left + self.width;
        if grid.options().enable_boundary_control {
            let grid_rect = port.viewport().grid_rect;
            self.right = self.right.min(grid_rect.width - 2.0 * self.outer_right);
            self.width = self.right - self.left;
        }
        let margin_right = if grid.options().push_items {
            0.0
        } else {
            self.margin
        };
        let new_position = grid.pixels_to_position_x(self.right + margin_right, Rounding::Ceil);
        let Some(mut working) = grid.working(item) else {
            return;
        };
        if working.x + working.cols != new_position {
            self.item_backup[2] = working.cols;
            working.cols = new_position - working.x;
            grid.set_working(item, working);
            self.push_resize.push_items(grid, PushDirection::FromWest);
            let disable = grid.options().disable_push_on_resize;
            self.push
                .push_items(grid, Some(PushDirection::FromWest), disable);
            if !do_checks {
                return;
            }
            if grid.check_collision(item).is_colliding() {
                self.reset_east(item, grid, port, false);
                return;
            }
            port.refresh_preview();
            self.push_resize.check_push_back(grid);
            self.push.check_push_back(grid);
        }
        self.apply_pixel_box(item, port);
    }

    /// Corner path: compose the two adjacent edge handlers without their
    /// individual checks, enforce the aspect ratio across both axes when
    /// one is configured, then run the shared collision check with soft
    /// resets (the composed path already re-applied pixel styles).
    fn handle_corner(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        event: PointerEvent,
        corner: HandleKind,
    ) {
        match corner {
            HandleKind::NorthWest => {
                self.handle_north(item, grid, port, event, false);
                self.handle_west(item, grid, port, event, false);
            }
            HandleKind::NorthEast => {
                self.handle_north(item, grid, port, event, false);
                self.handle_east(item, grid, port, event, false);
            }
            HandleKind::SouthWest => {
                self.handle_south(item, grid, port, event, false);
                self.handle_west(item, grid, port, event, false);
            }
            HandleKind::SouthEast => {
                self.handle_south(item, grid, port, event, false);
                self.handle_east(item, grid, port, event, false);
            }
            _ => return,
        }

        let has_ratio = grid.aspect_ratio_for(item).is_some();
        if has_ratio {
            self.apply_aspect_constraint(item, grid, corner, &event);
            self.apply_pixel_box(item, port);
        }

        if grid.check_collision(item).is_colliding() {
            match corner {
                HandleKind::NorthWest => {
                    self.reset_north(item, grid, port, has_ratio);
                    self.reset_west(item, grid, port, has_ratio);
                }
                HandleKind::NorthEast => {
                    self.reset_north(item, grid, port, has_ratio);
                    self.reset_east(item, grid, port, has_ratio);
                }
                HandleKind::SouthWest => {
                    self.reset_south(item, grid, port, has_ratio);
                    self.reset_west(item, grid, port, has_ratio);
                }
                HandleKind::SouthEast => {
                    self.reset_south(item, grid, port, has_ratio);
                    self.reset_east(item, grid, port, has_ratio);
                }
                _ => {}
            }
            return;
        }
        port.refresh_preview();
        self.push_resize.check_push_back(grid);
        self.push.check_push_back(grid);
    }

    /// Re-derive the constrained pixel box and grid placement atomically
    /// for a corner resize with an aspect ratio. The dominant pointer axis
    /// is the master; the grabbed corner's opposite edges stay anchored.
    fn apply_aspect_constraint(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        corner: HandleKind,
        event: &PointerEvent,
    ) {
        let Some(ratio) = grid.aspect_ratio_for(item) else {
            return;
        };
        let dx = (event.client_x - self.original_client_x).abs();
        let dy = (event.client_y - self.original_client_y).abs();
        if dx >= dy {
            self.width = self.width.max(self.min_width);
            self.height = (self.width / ratio).max(self.min_height);
        } else {
            self.height = self.height.max(self.min_height);
            self.width = (self.height * ratio).max(self.min_width);
        }

        match corner {
            HandleKind::NorthWest => {
                self.top = self.bottom - self.height;
                self.left = self.right - self.width;
            }
            HandleKind::NorthEast => {
                self.top = self.bottom - self.height;
                self.right = self.left + self.width;
            }
            HandleKind::SouthWest => {
                self.bottom = self.top + self.height;
                self.left = self.right - self.width;
            }
            HandleKind::SouthEast => {
                self.bottom = self.top + self.height;
                self.right = self.left + self.width;
            }
            _ => return,
        }

        let push = grid.options().push_items;
        let leading = if push { self.margin } else { 0.0 };
        let trailing = if push { 0.0 } else { self.margin };
        let Some(mut working) = grid.working(item) else {
            return;
        };
        match corner {
            HandleKind::NorthWest | HandleKind::NorthEast => {
                let new_y = grid.pixels_to_position_y(self.top + leading, Rounding::Floor);
                working.rows += working.y - new_y;
                working.y = new_y;
            }
            HandleKind::SouthWest | HandleKind::SouthEast => {
                let new_bottom =
                    grid.pixels_to_position_y(self.bottom + trailing, Rounding::Ceil);
                working.rows = new_bottom - working.y;
            }
            _ => {}
        }
        match corner {
            HandleKind::NorthWest | HandleKind::SouthWest => {
                let new_x = grid.pixels_to_position_x(self.left + leading, Rounding::Floor);
                working.cols += working.x - new_x;
                working.x = new_x;
            }
            HandleKind::NorthEast | HandleKind::SouthEast => {
                let new_right = grid.pixels_to_position_x(self.right + trailing, Rounding::Ceil);
                working.cols = new_right - working.x;
            }
            _ => {}
        }
        grid.set_working(item, working);
    }

    fn reset_north(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort, soft: bool) {
        let Some(mut working) = grid.working(item) else {
            return;
        };
        working.y = self.item_backup[1];
        working.rows = self.item_backup[3];
        grid.set_working(item, working);
        if !soft {
            self.top = grid.position_y_to_pixels(working.y);
            self.bottom = self.top + grid.position_y_to_pixels(working.rows);
            self.height = grid.position_y_to_pixels(working.rows) - self.margin;
            self.apply_pixel_box(item, port);
        }
    }

    fn reset_west(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort, soft: bool) {
        let Some(mut working) = grid.working(item) else {
            return;
        };
        working.x = self.item_backup[0];
        working.cols = self.item_backup[2];
        grid.set_working(item, working);
        if !soft {
            self.left = grid.position_x_to_pixels(working.x);
            self.right = self.left + grid.position_x_to_pixels(working.cols);
            self.width = grid.position_x_to_pixels(working.cols) - self.margin;
            self.apply_pixel_box(item, port);
        }
    }

    fn reset_south(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort, soft: bool) {
        let Some(mut working) = grid.working(item) else {
            return;
        };
        working.rows = self.item_backup[3];
        grid.set_working(item, working);
        if !soft {
            self.height = grid.position_y_to_pixels(working.rows) - self.margin;
            self.bottom = self.top + self.height;
            self.apply_pixel_box(item, port);
        }
    }

    fn reset_east(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort, soft: bool) {
        let Some(mut working) = grid.working(item) else {
            return;
        };
        working.cols = self.item_backup[2];
        grid.set_working(item, working);
        if !soft {
            self.width = grid.position_x_to_pixels(working.cols) - self.margin;
            self.right = self.left + self.width;
            self.apply_pixel_box(item, port);
        }
    }

    fn apply_pixel_box(&self, item: ItemId, port: &mut dyn RenderPort) {
        port.set_item_box(
            item,
            PixelRect::new(self.left, self.top, self.width, self.height),
        );
    }

    fn make_resize(
        &mut self,
        item: ItemId,
        grid: &mut Grid,
        port: &mut dyn RenderPort,
        hooks: &mut dyn GridHooks,
    ) {
        if let Some(layout) = grid.item_layout_rect(item) {
            port.set_item_box(item, layout);
        }
        if let Some(change) = grid.commit_item(item) {
            hooks.on_item_changed(&change);
        }
        self.push.commit(grid, hooks);
        self.push_resize.commit(grid, hooks);
        debug!(item = %item, "resize committed");
    }

    fn cancel_resize(&mut self, item: ItemId, grid: &mut Grid, port: &mut dyn RenderPort) {
        grid.rollback_item(item);
        if let Some(layout) = grid.item_layout_rect(item) {
            port.set_item_box(item, layout);
        }
        self.push.revert(grid);
        self.push_resize.revert(grid);
        debug!(item = %item, "resize cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_the_bound_direction() {
        let edges = edges_for(HandleKind::SouthEast);
        assert!(edges.south && edges.east);
        assert!(!edges.north && !edges.west);

        let edges = edges_for(HandleKind::North);
        assert!(edges.north);
        assert!(!edges.south && !edges.east && !edges.west);
    }
}
