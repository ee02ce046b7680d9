//! End-to-end drag gestures against the in-memory host double.

mod common;

use std::time::{Duration, Instant};

use common::{RecordingHooks, TestPort, grid_with};
use gridflow_core::event::{InterruptKind, PointerButton, PointerEvent};
use gridflow_core::geometry::PixelRect;
use gridflow_interact::port::{SettleOutcome, Settlement};
use gridflow_interact::DragController;
use gridflow_layout::{Collision, GridOptions, ItemRect};
use proptest::prelude::*;

fn draggable_options() -> GridOptions {
    GridOptions {
        drag_enabled: true,
        ..GridOptions::default()
    }
}

/// Press and swallow the origin move so subsequent moves produce
/// directions, the way a live pointer stream does.
fn start_drag(
    controller: &mut DragController,
    grid: &mut gridflow_layout::Grid,
    port: &mut TestPort,
    hooks: &mut RecordingHooks,
    x: f64,
    y: f64,
) {
    common::init_tracing();
    assert!(controller.pointer_down(grid, port, hooks, PointerEvent::primary(x, y), Instant::now()));
    assert!(controller.is_dragging());
    controller.pointer_move(grid, port, PointerEvent::primary(x, y));
}

#[test]
fn drag_to_empty_cell_updates_working_position() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    assert!(controller.sync_enabled(&grid));

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(250.0, 50.0));

    assert_eq!(grid.working(item), Some(ItemRect::new(2, 0, 1, 1)));
    assert_eq!(controller.collision(), Collision::None);
    assert!(controller.path().contains(&(2, 0)));
    assert_eq!(port.item_box(item), PixelRect::new(200.0, 0.0, 90.0, 90.0));
    assert_eq!(grid.moving_item(), Some(item));
}

#[test]
fn drag_commit_reports_the_change_and_releases_state() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(250.0, 50.0));
    controller.pointer_up(&mut grid, &mut port, &mut hooks);

    assert!(!controller.is_dragging());
    assert_eq!(hooks.drag_starts, 1);
    assert_eq!(hooks.drag_stops, 1);
    let change = hooks.change_for(item).expect("change reported");
    assert_eq!(change.from, ItemRect::new(0, 0, 1, 1));
    assert_eq!(change.to, ItemRect::new(2, 0, 1, 1));
    assert_eq!(grid.committed(item), Some(ItemRect::new(2, 0, 1, 1)));
    assert_eq!(grid.moving_item(), None);
    assert!(!grid.drag_in_progress());
    // Final placement re-rendered from the grid.
    assert_eq!(port.item_box(item), PixelRect::new(200.0, 0.0, 90.0, 90.0));
}

#[test]
fn west_to_east_drag_pushes_the_neighbor() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            push_items: true,
            ..draggable_options()
        },
        &[(0, 0, 1, 1), (1, 0, 1, 1)],
    );
    let (a, b) = (ids[0], ids[1]);
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(a);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(150.0, 50.0));

    assert_eq!(grid.working(a), Some(ItemRect::new(1, 0, 1, 1)));
    assert_eq!(grid.working(b), Some(ItemRect::new(2, 0, 1, 1)));
    assert_eq!(controller.collision(), Collision::None);

    controller.pointer_up(&mut grid, &mut port, &mut hooks);
    assert_eq!(grid.committed(a), Some(ItemRect::new(1, 0, 1, 1)));
    assert_eq!(grid.committed(b), Some(ItemRect::new(2, 0, 1, 1)));
    assert_eq!(hooks.changes.len(), 2);
}

#[test]
fn equal_footprint_drag_swaps_positions() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            swap_items: true,
            ..draggable_options()
        },
        &[(0, 0, 1, 1), (1, 0, 1, 1)],
    );
    let (a, b) = (ids[0], ids[1]);
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(a);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(150.0, 50.0));

    assert_eq!(grid.working(a), Some(ItemRect::new(1, 0, 1, 1)));
    assert_eq!(grid.working(b), Some(ItemRect::new(0, 0, 1, 1)));
    assert_eq!(controller.collision(), Collision::None);
}

#[test]
fn cancelled_drag_restores_every_item() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            push_items: true,
            ..draggable_options()
        },
        &[(0, 0, 1, 1), (1, 0, 1, 1)],
    );
    let (a, b) = (ids[0], ids[1]);
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::settling_with(Settlement::Cancel);
    let mut controller = DragController::new(a);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(150.0, 50.0));
    controller.pointer_up(&mut grid, &mut port, &mut hooks);

    assert_eq!(grid.working(a), Some(ItemRect::new(0, 0, 1, 1)));
    assert_eq!(grid.working(b), Some(ItemRect::new(1, 0, 1, 1)));
    assert!(hooks.changes.is_empty());
    assert_eq!(grid.moving_item(), None);
}

#[test]
fn deferred_settlement_parks_the_session() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::settling_with(Settlement::Deferred);
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(250.0, 50.0));
    controller.pointer_up(&mut grid, &mut port, &mut hooks);

    assert!(controller.is_settling());
    // The parked session still owns the moving slot; no new press starts.
    assert_eq!(grid.moving_item(), Some(item));
    assert!(!controller.pointer_down(
        &mut grid,
        &mut port,
        &mut hooks,
        PointerEvent::primary(50.0, 50.0),
        Instant::now()
    ));

    controller.settle(&mut grid, &mut port, &mut hooks, SettleOutcome::Cancel);
    assert!(!controller.is_settling());
    assert_eq!(grid.working(item), Some(ItemRect::new(0, 0, 1, 1)));
    assert_eq!(grid.moving_item(), None);
}

#[test]
fn delayed_press_fires_only_after_the_delay() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            drag_delay: Duration::from_millis(120),
            ..draggable_options()
        },
        &[(0, 0, 1, 1)],
    );
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    let t0 = Instant::now();
    assert!(controller.pointer_down(
        &mut grid,
        &mut port,
        &mut hooks,
        PointerEvent::primary(50.0, 50.0),
        t0
    ));
    assert!(!controller.is_dragging());

    // Small movement keeps the press armed.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(55.0, 50.0));
    controller.poll(&mut grid, &mut port, &mut hooks, t0 + Duration::from_millis(60));
    assert!(!controller.is_dragging());

    controller.poll(&mut grid, &mut port, &mut hooks, t0 + Duration::from_millis(120));
    assert!(controller.is_dragging());
}

#[test]
fn early_release_or_movement_cancels_a_delayed_press() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            drag_delay: Duration::from_millis(120),
            ..draggable_options()
        },
        &[(0, 0, 1, 1)],
    );
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    // Released before the deadline.
    let t0 = Instant::now();
    controller.pointer_down(&mut grid, &mut port, &mut hooks, PointerEvent::primary(50.0, 50.0), t0);
    controller.interrupt(&mut grid, &mut port, &mut hooks, InterruptKind::PointerUp);
    controller.poll(&mut grid, &mut port, &mut hooks, t0 + Duration::from_millis(200));
    assert!(!controller.is_dragging());

    // Moved past the 9px tolerance before the deadline.
    let t1 = Instant::now();
    controller.pointer_down(&mut grid, &mut port, &mut hooks, PointerEvent::primary(50.0, 50.0), t1);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(60.0, 50.0));
    controller.poll(&mut grid, &mut port, &mut hooks, t1 + Duration::from_millis(200));
    assert!(!controller.is_dragging());
    assert_eq!(hooks.drag_starts, 0);
}

#[test]
fn boundary_control_freezes_the_constrained_axis() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            enable_boundary_control: true,
            ..draggable_options()
        },
        &[(0, 0, 1, 1)],
    );
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);

    // Straight up at the top edge: fully suppressed, nothing moves.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(50.0, 40.0));
    assert_eq!(port.item_box(item), PixelRect::new(0.0, 0.0, 90.0, 90.0));
    assert_eq!(grid.working(item), Some(ItemRect::new(0, 0, 1, 1)));

    // Diagonal up-right: the vertical axis stays frozen, horizontal moves.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(80.0, 40.0));
    let rect = port.item_box(item);
    assert_eq!(rect.top, 0.0);
    assert_eq!(rect.left, 30.0);
    assert_eq!(grid.working(item), Some(ItemRect::new(0, 0, 1, 1)));
}

#[test]
fn same_cell_reentry_suppresses_the_drop_over_callback() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            drop_over_items: true,
            swap_items: false,
            ..draggable_options()
        },
        &[(0, 0, 1, 1), (1, 0, 1, 1)],
    );
    let (a, b) = (ids[0], ids[1]);
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(a);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);

    // Onto B: collision recorded, placement rolled back, moving slot
    // cleared for the occupied-cell drop.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(150.0, 50.0));
    assert_eq!(controller.collision(), Collision::With(b));
    assert_eq!(grid.working(a), Some(ItemRect::new(0, 0, 1, 1)));
    assert_eq!(grid.moving_item(), None);

    // Back onto the starting cell: the stale collision is cleared, so the
    // drop-over callback must not fire on release.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(51.0, 50.0));
    assert_eq!(controller.collision(), Collision::None);
    controller.pointer_up(&mut grid, &mut port, &mut hooks);
    assert!(hooks.drops.is_empty());
}

#[test]
fn dropping_on_an_occupied_cell_reports_the_target() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            drop_over_items: true,
            swap_items: false,
            ..draggable_options()
        },
        &[(0, 0, 1, 1), (1, 0, 1, 1)],
    );
    let (a, b) = (ids[0], ids[1]);
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(a);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(150.0, 50.0));
    controller.pointer_up(&mut grid, &mut port, &mut hooks);

    assert_eq!(hooks.drops, vec![(a, b)]);
    // The blocked placement itself never committed.
    assert_eq!(grid.committed(a), Some(ItemRect::new(0, 0, 1, 1)));
}

#[test]
fn autoscroll_steps_near_the_bottom_edge() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.view.grid_rect = PixelRect::new(0.0, 0.0, 1020.0, 600.0);
    port.view.scroll_height = 2000.0;
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(50.0, 595.0));
    controller.poll(&mut grid, &mut port, &mut hooks, Instant::now());

    assert_eq!(port.scrolled, vec![(0.0, 20.0)]);

    // Teardown cancels the scroll: no further steps.
    controller.pointer_up(&mut grid, &mut port, &mut hooks);
    controller.poll(&mut grid, &mut port, &mut hooks, Instant::now() + Duration::from_millis(100));
    assert_eq!(port.scrolled.len(), 1);
}

#[test]
fn rtl_drag_mirrors_the_horizontal_formula() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            dir: gridflow_layout::TextDirection::Rtl,
            ..draggable_options()
        },
        &[(2, 0, 2, 2)],
    );
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 500.0, 50.0);
    // Pointer moves left; on a right-to-left grid the item's logical
    // column increases.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(400.0, 50.0));

    assert_eq!(grid.working(item), Some(ItemRect::new(3, 0, 2, 2)));
}

#[test]
fn scale_factor_divides_the_pointer_delta() {
    let (mut grid, ids) = grid_with(
        GridOptions {
            scale: Some(2.0),
            ..draggable_options()
        },
        &[(0, 0, 1, 1)],
    );
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    // A 200px pointer delta on a 2× surface is a 100px item delta.
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(250.0, 50.0));

    assert_eq!(grid.working(item), Some(ItemRect::new(1, 0, 1, 1)));
}

#[test]
fn disabled_capability_rejects_presses() {
    let (mut grid, ids) = grid_with(GridOptions::default(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    assert!(!controller.sync_enabled(&grid));
    assert!(!controller.pointer_down(
        &mut grid,
        &mut port,
        &mut hooks,
        PointerEvent::primary(50.0, 50.0),
        Instant::now()
    ));
}

#[test]
fn secondary_button_presses_are_ignored() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    let press = PointerEvent::primary(50.0, 50.0).with_button(PointerButton::Secondary);
    assert!(!controller.pointer_down(&mut grid, &mut port, &mut hooks, press, Instant::now()));
    assert!(!controller.is_dragging());
    assert_eq!(hooks.drag_starts, 0);
}

#[test]
fn window_blur_ends_the_gesture_through_the_stop_path() {
    let (mut grid, ids) = grid_with(draggable_options(), &[(0, 0, 1, 1)]);
    let item = ids[0];
    let mut port = TestPort::new();
    port.seed(&grid);
    let mut hooks = RecordingHooks::new();
    let mut controller = DragController::new(item);
    controller.sync_enabled(&grid);

    start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
    controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(250.0, 50.0));
    controller.interrupt(&mut grid, &mut port, &mut hooks, InterruptKind::WindowBlur);

    assert!(!controller.is_dragging());
    assert_eq!(hooks.drag_stops, 1);
    assert_eq!(grid.committed(item), Some(ItemRect::new(2, 0, 1, 1)));
}

proptest! {
    /// Any move sequence keeps the working grid overlap-free, and a
    /// cancelled session restores every placement exactly.
    #[test]
    fn drag_never_leaves_overlaps_and_cancel_round_trips(
        moves in prop::collection::vec((20.0f64..900.0, 20.0f64..900.0), 1..24)
    ) {
        let (mut grid, ids) = grid_with(
            GridOptions {
                push_items: true,
                ..draggable_options()
            },
            &[(0, 0, 1, 1), (1, 0, 1, 1), (2, 1, 2, 1)],
        );
        let originals: Vec<_> = ids.iter().map(|&id| grid.committed(id)).collect();
        let mut port = TestPort::new();
        port.seed(&grid);
        let mut hooks = RecordingHooks::settling_with(Settlement::Cancel);
        let mut controller = DragController::new(ids[0]);
        controller.sync_enabled(&grid);

        start_drag(&mut controller, &mut grid, &mut port, &mut hooks, 50.0, 50.0);
        for &(x, y) in &moves {
            controller.pointer_move(&mut grid, &mut port, PointerEvent::primary(x, y));
            let rects: Vec<_> = ids.iter().filter_map(|&id| grid.working(id)).collect();
            for i in 0..rects.len() {
                for j in (i + 1)..rects.len() {
                    prop_assert!(
                        !rects[i].overlaps(&rects[j]),
                        "overlap after move to ({x}, {y}): {:?} vs {:?}",
                        rects[i],
                        rects[j]
                    );
                }
            }
        }
        controller.pointer_up(&mut grid, &mut port, &mut hooks);
        for (&id, &original) in ids.iter().zip(&originals) {
            prop_assert_eq!(grid.working(id), original);
            prop_assert_eq!(grid.committed(id), original);
        }
    }
}
