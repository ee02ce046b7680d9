#![forbid(unsafe_code)]

//! Core: pointer event vocabulary, pixel geometry, and gesture gating.
//!
//! # Role in GridFlow
//! `gridflow-core` is the input layer. It owns the narrow projection of host
//! pointer/touch events the engine consumes, the pixel-space geometry
//! primitives shared by every crate, and the delay-start gate that decides
//! whether a press becomes a gesture at all.
//!
//! # Primary responsibilities
//! - **PointerEvent**: canonical pointer input (position, button, target).
//! - **PixelRect**: viewport/content pixel boxes for hit tests and clamping.
//! - **StartGate**: the `{Idle → Armed → Fired}` state machine implementing
//!   delay + movement-threshold gesture disambiguation.
//!
//! # How it fits in the system
//! The grid model (`gridflow-layout`) and the interaction controllers
//! (`gridflow-interact`) consume these types; nothing here touches the host
//! DOM or event loop. Time is always passed in explicitly (`Instant`), so
//! every state machine in this crate is deterministic under test.

pub mod event;
pub mod geometry;
pub mod gesture;
