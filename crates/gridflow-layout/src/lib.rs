#![forbid(unsafe_code)]

//! Grid model: items, resolved options, coordinate mapping, collisions.
//!
//! # Role in GridFlow
//! `gridflow-layout` owns the authoritative grid state the interaction
//! controllers manipulate: the set of items with their committed and
//! working placements, the resolved configuration snapshot, pixel↔cell
//! coordinate conversion, and the collision oracle.
//!
//! # Primary responsibilities
//! - **Item**: committed/working placement pairs with capability flags.
//! - **GridOptions**: validated configuration snapshot.
//! - **Grid**: item store, moving-item slot, cell sizing, collision checks.
//!
//! # How it fits in the system
//! The controllers in `gridflow-interact` mutate working placements
//! speculatively during a gesture and either commit them (diffing against
//! the committed copy) or roll them back wholesale. Nothing here renders;
//! the host applies computed placements through its own render port.

pub mod grid;
pub mod item;
pub mod options;

pub use grid::{Collision, Grid, Rounding};
pub use item::{ItemChange, ItemError, ItemId, ItemRect, ItemSpec};
pub use options::{GridOptions, OptionsError, TextDirection};
