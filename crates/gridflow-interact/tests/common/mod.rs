//! Shared host double for controller scenario tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use gridflow_core::geometry::PixelRect;
use gridflow_interact::port::{GridHooks, InteractionClass, RenderPort, Settlement, ViewportMetrics};
use gridflow_layout::{Grid, GridOptions, ItemChange, ItemId, ItemRect, ItemSpec};

/// Route engine tracing into test output when `RUST_LOG` asks for it.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory render substrate: records style applications and exposes a
/// scrollable viewport.
pub struct TestPort {
    pub view: ViewportMetrics,
    pub boxes: BTreeMap<ItemId, PixelRect>,
    pub layout_requests: usize,
    pub preview_refreshes: usize,
    pub class_log: Vec<(ItemId, InteractionClass, bool)>,
    pub scrolled: Vec<(f64, f64)>,
}

impl TestPort {
    pub fn new() -> Self {
        Self {
            view: default_view(),
            boxes: BTreeMap::new(),
            layout_requests: 0,
            preview_refreshes: 0,
            class_log: Vec::new(),
            scrolled: Vec::new(),
        }
    }

    /// Seed every item's box from its current layout placement.
    pub fn seed(&mut self, grid: &Grid) {
        for (id, _) in grid.items() {
            if let Some(rect) = grid.item_layout_rect(id) {
                self.boxes.insert(id, rect);
            }
        }
    }

    pub fn item_box(&self, id: ItemId) -> PixelRect {
        self.boxes.get(&id).copied().unwrap_or_default()
    }
}

impl RenderPort for TestPort {
    fn viewport(&self) -> ViewportMetrics {
        self.view
    }

    fn item_view_rect(&self, id: ItemId) -> PixelRect {
        let rect = self.item_box(id);
        PixelRect::new(
            self.view.grid_rect.left + rect.left - self.view.scroll_left,
            self.view.grid_rect.top + rect.top - self.view.scroll_top,
            rect.width,
            rect.height,
        )
    }

    fn set_item_box(&mut self, id: ItemId, rect: PixelRect) {
        self.boxes.insert(id, rect);
    }

    fn set_interaction_class(&mut self, id: ItemId, class: InteractionClass, active: bool) {
        self.class_log.push((id, class, active));
    }

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }

    fn refresh_preview(&mut self) {
        self.preview_refreshes += 1;
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.view.scroll_left += dx;
        self.view.scroll_top += dy;
        self.scrolled.push((dx, dy));
    }
}

/// Hook recorder with a configurable stop settlement.
pub struct RecordingHooks {
    pub settlement: Settlement,
    pub drag_starts: usize,
    pub drag_stops: usize,
    pub resize_starts: usize,
    pub resize_stops: usize,
    pub changes: Vec<ItemChange>,
    pub drops: Vec<(ItemId, ItemId)>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self {
            settlement: Settlement::Commit,
            drag_starts: 0,
            drag_stops: 0,
            resize_starts: 0,
            resize_stops: 0,
            changes: Vec::new(),
            drops: Vec::new(),
        }
    }

    pub fn settling_with(settlement: Settlement) -> Self {
        Self {
            settlement,
            ..Self::new()
        }
    }

    pub fn change_for(&self, id: ItemId) -> Option<&ItemChange> {
        self.changes.iter().find(|change| change.id == id)
    }
}

impl GridHooks for RecordingHooks {
    fn on_drag_start(&mut self, _: ItemId) {
        self.drag_starts += 1;
    }

    fn on_drag_stop(&mut self, _: ItemId) -> Settlement {
        self.drag_stops += 1;
        self.settlement
    }

    fn on_resize_start(&mut self, _: ItemId) {
        self.resize_starts += 1;
    }

    fn on_resize_stop(&mut self, _: ItemId) -> Settlement {
        self.resize_stops += 1;
        self.settlement
    }

    fn on_item_changed(&mut self, change: &ItemChange) {
        self.changes.push(*change);
    }

    fn on_drop_over_item(&mut self, source: ItemId, target: ItemId) {
        self.drops.push((source, target));
    }
}

/// 100×100 cells, margin 10, a roomy scrollable surface.
pub fn default_view() -> ViewportMetrics {
    ViewportMetrics {
        scroll_left: 0.0,
        scroll_top: 0.0,
        offset_left: 0.0,
        offset_top: 0.0,
        scroll_width: 1020.0,
        scroll_height: 1020.0,
        grid_rect: PixelRect::new(0.0, 0.0, 1020.0, 1020.0),
    }
}

/// Build a sized grid with the given item placements.
pub fn grid_with(options: GridOptions, items: &[(i32, i32, i32, i32)]) -> (Grid, Vec<ItemId>) {
    let mut grid = Grid::new(options).expect("valid options");
    grid.set_cell_size(100.0, 100.0);
    let ids = items
        .iter()
        .map(|&(x, y, cols, rows)| {
            grid.insert(ItemSpec::new(ItemRect::new(x, y, cols, rows)))
                .expect("valid spec")
        })
        .collect();
    (grid, ids)
}
