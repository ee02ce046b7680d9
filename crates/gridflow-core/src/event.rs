#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! The engine never reads host event objects directly; the host projects
//! each mouse or touch event into a [`PointerEvent`] before handing it to a
//! controller. Touch events are expected to be collapsed to their primary
//! touch point by the host.
//!
//! # Design Notes
//!
//! - Coordinates are viewport pixels (`client_x`/`client_y`).
//! - The press target is classified by the host at hit-test time; the
//!   engine only distinguishes "item body", "resize handle", and "inner
//!   content that must not start a drag".
//! - All types derive `Clone`, `Copy`, and `PartialEq` for use in tests.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Pointer button reported with a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left mouse button, or any touch contact.
    #[default]
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
    /// Anything else the host reports.
    Other(u8),
}

impl PointerButton {
    /// Whether this press may begin a gesture.
    #[inline]
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, PointerButton::Primary)
    }
}

/// What was under the pointer when the press happened.
///
/// The host performs the hit test; the drag controller ignores presses on
/// resize handles and ignored content, the resize controller only reacts to
/// handle presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The item body.
    #[default]
    Item,
    /// One of the eight resize handles.
    Handle(HandleKind),
    /// Interactive content inside the item that opts out of dragging.
    Content,
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Horizontal position in viewport pixels.
    pub client_x: f64,
    /// Vertical position in viewport pixels.
    pub client_y: f64,
    /// Button for press events; `Primary` for moves and touch.
    pub button: PointerButton,
    /// Hit-test classification of the press target.
    pub target: PointerTarget,
}

impl PointerEvent {
    /// A primary-button event on the item body.
    #[must_use]
    pub const fn primary(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            button: PointerButton::Primary,
            target: PointerTarget::Item,
        }
    }

    /// Replace the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Replace the target classification.
    #[must_use]
    pub const fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    /// The same event with a different horizontal coordinate.
    ///
    /// Boundary control rewrites one axis of an event while keeping the
    /// other live.
    #[must_use]
    pub const fn with_client_x(mut self, client_x: f64) -> Self {
        self.client_x = client_x;
        self
    }

    /// The same event with a different vertical coordinate.
    #[must_use]
    pub const fn with_client_y(mut self, client_y: f64) -> Self {
        self.client_y = client_y;
        self
    }
}

/// The eight resize handle classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl HandleKind {
    /// Whether this handle drives both axes.
    #[inline]
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::NorthEast
                | HandleKind::NorthWest
                | HandleKind::SouthEast
                | HandleKind::SouthWest
        )
    }

    /// The handle that plays this handle's role on a right-to-left grid.
    ///
    /// Horizontal semantics mirror: a press on the visual east handle edits
    /// the west grid edge, and corner handles follow their horizontal
    /// component. North/south are unaffected.
    #[must_use]
    pub const fn mirrored_rtl(self) -> HandleKind {
        match self {
            HandleKind::East => HandleKind::West,
            HandleKind::West => HandleKind::East,
            HandleKind::NorthEast => HandleKind::NorthWest,
            HandleKind::NorthWest => HandleKind::NorthEast,
            HandleKind::SouthEast => HandleKind::SouthWest,
            HandleKind::SouthWest => HandleKind::SouthEast,
            other => other,
        }
    }

    /// The corresponding flag in a [`HandleSet`].
    #[must_use]
    pub const fn as_set(self) -> HandleSet {
        match self {
            HandleKind::North => HandleSet::N,
            HandleKind::South => HandleSet::S,
            HandleKind::East => HandleSet::E,
            HandleKind::West => HandleSet::W,
            HandleKind::NorthEast => HandleSet::NE,
            HandleKind::NorthWest => HandleSet::NW,
            HandleKind::SouthEast => HandleSet::SE,
            HandleKind::SouthWest => HandleSet::SW,
        }
    }
}

bitflags! {
    /// Set of enabled resize handles for an item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HandleSet: u8 {
        const N  = 1 << 0;
        const S  = 1 << 1;
        const E  = 1 << 2;
        const W  = 1 << 3;
        const NE = 1 << 4;
        const NW = 1 << 5;
        const SE = 1 << 6;
        const SW = 1 << 7;
    }
}

impl Serialize for HandleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HandleSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(HandleSet::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

impl HandleSet {
    /// Whether the given handle is enabled.
    #[inline]
    #[must_use]
    pub const fn allows(self, handle: HandleKind) -> bool {
        self.contains(handle.as_set())
    }
}

impl Default for HandleSet {
    fn default() -> Self {
        HandleSet::all()
    }
}

/// Host signals that end or cancel a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    /// Pointer released.
    PointerUp,
    /// Pointer left the document.
    PointerLeave,
    /// The window lost focus.
    WindowBlur,
    /// Touch sequence ended.
    TouchEnd,
    /// Touch sequence was cancelled by the platform.
    TouchCancel,
}
