#![forbid(unsafe_code)]

//! Interaction layer: the drag and resize controllers and their engines.
//!
//! # Role in GridFlow
//! `gridflow-interact` turns pointer events into grid mutations. A
//! [`DragController`](drag::DragController) or
//! [`ResizeController`](resize::ResizeController) owns one item's gesture
//! lifecycle: gating the press, speculatively mutating the item's working
//! placement on every move, resolving conflicts through the push/swap
//! engines, and committing or rolling back on release.
//!
//! # Primary responsibilities
//! - **DragController / ResizeController**: full press→move→release
//!   orchestration, including delay-start gating, boundary control,
//!   autoscroll coordination, and hook settlement.
//! - **PushEngine / SwapEngine / ResizePushEngine**: conflict resolution
//!   strategies behind a commit/revert contract.
//! - **AutoscrollCoordinator**: edge-proximity scroll intent.
//! - **AlignmentMatches**: per-edge guide-line triggering.
//!
//! # How it fits in the system
//! Controllers hold no host resources. The host owns event listeners and
//! timers, projects events into `gridflow-core` types, and passes its
//! [`RenderPort`](port::RenderPort) and [`GridHooks`](port::GridHooks)
//! implementations into every call. Every exit path of a session
//! (commit, cancel, interrupt) tears the session down wholesale; no engine
//! instance survives its owning session.

pub mod align;
pub mod autoscroll;
pub mod drag;
pub mod port;
pub mod push;
pub mod push_resize;
pub mod resize;
pub mod swap;

pub use align::AlignmentMatches;
pub use autoscroll::{AutoscrollCoordinator, ScrollEdges, ScrollStep};
pub use drag::DragController;
pub use port::{
    GridHooks, InteractionClass, NoHooks, RenderPort, SettleOutcome, Settlement, ViewportMetrics,
};
pub use push::{PushDirection, PushEngine};
pub use push_resize::ResizePushEngine;
pub use resize::ResizeController;
pub use swap::SwapEngine;
