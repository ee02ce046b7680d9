#![forbid(unsafe_code)]

//! Delay-start gesture gating.
//!
//! [`StartGate`] decides whether a pointer press becomes a drag/resize
//! gesture at all. With no configured delay a press fires immediately; with
//! a delay the gate arms and the press only fires once the delay elapses
//! with the pointer still down and within the movement tolerance.
//!
//! # State Machine
//!
//! ```text
//! Idle --press(delay=0)--------------------> Idle   (effect: Fired)
//! Idle --press(delay>0)--------------------> Armed
//! Armed --interrupt------------------------> Idle   (effect: Cancelled)
//! Armed --move beyond tolerance------------> Idle   (effect: Cancelled)
//! Armed --poll at/after deadline-----------> Idle   (effect: Fired)
//! ```
//!
//! # Invariants
//!
//! 1. A press released or interrupted before the deadline never fires.
//! 2. Movement beyond [`START_MOVE_TOLERANCE_PX`] on either axis cancels;
//!    the press is treated as scroll intent, not drag intent.
//! 3. After any `Fired` or `Cancelled` effect the gate is `Idle` again.
//!
//! The gate owns no timers: the host calls [`StartGate::poll`] from its own
//! loop with an explicit `now`, which keeps every transition deterministic
//! under test.

use std::time::{Duration, Instant};

use crate::event::{InterruptKind, PointerEvent};

/// Movement tolerance while armed, in pixels, per axis.
pub const START_MOVE_TOLERANCE_PX: f64 = 9.0;

/// Why an armed press was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCancelReason {
    /// The press ended before the delay elapsed.
    Interrupted(InterruptKind),
    /// The pointer moved beyond the tolerance; scroll intent.
    MovedBeyondTolerance,
}

/// Effect of feeding one input into the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateEffect {
    /// The gesture starts now, with the original press event.
    Fired(PointerEvent),
    /// The pending gesture was abandoned.
    Cancelled(GateCancelReason),
    /// The press is armed and waiting for its deadline.
    Pending,
    /// The input had no effect in the current state.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
enum GateState {
    Idle,
    Armed { press: PointerEvent, deadline: Instant },
}

/// Delay + movement-threshold gesture gate.
#[derive(Debug, Clone)]
pub struct StartGate {
    state: GateState,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    /// Create an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    /// Whether a press is armed and waiting.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, GateState::Armed { .. })
    }

    /// Feed a pointer press.
    ///
    /// A zero delay fires immediately. A press while already armed is
    /// ignored (the host should not deliver one, but a stray secondary
    /// touch must not corrupt the pending press).
    pub fn pointer_down(
        &mut self,
        press: PointerEvent,
        delay: Duration,
        now: Instant,
    ) -> GateEffect {
        match self.state {
            GateState::Idle => {
                if delay.is_zero() {
                    GateEffect::Fired(press)
                } else {
                    self.state = GateState::Armed {
                        press,
                        deadline: now + delay,
                    };
                    GateEffect::Pending
                }
            }
            GateState::Armed { .. } => GateEffect::Ignored,
        }
    }

    /// Feed a pointer move while the press may be armed.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> GateEffect {
        match self.state {
            GateState::Armed { press, .. } => {
                if (client_x - press.client_x).abs() > START_MOVE_TOLERANCE_PX
                    || (client_y - press.client_y).abs() > START_MOVE_TOLERANCE_PX
                {
                    self.state = GateState::Idle;
                    GateEffect::Cancelled(GateCancelReason::MovedBeyondTolerance)
                } else {
                    GateEffect::Pending
                }
            }
            GateState::Idle => GateEffect::Ignored,
        }
    }

    /// Feed a gesture-ending host signal.
    pub fn interrupt(&mut self, kind: InterruptKind) -> GateEffect {
        match self.state {
            GateState::Armed { .. } => {
                self.state = GateState::Idle;
                GateEffect::Cancelled(GateCancelReason::Interrupted(kind))
            }
            GateState::Idle => GateEffect::Ignored,
        }
    }

    /// Check the deadline. Call from the host loop while armed.
    pub fn poll(&mut self, now: Instant) -> GateEffect {
        match self.state {
            GateState::Armed { press, deadline } if now >= deadline => {
                self.state = GateState::Idle;
                GateEffect::Fired(press)
            }
            GateState::Armed { .. } => GateEffect::Pending,
            GateState::Idle => GateEffect::Ignored,
        }
    }

    /// Drop any pending press without an effect. Teardown path.
    pub fn reset(&mut self) {
        self.state = GateState::Idle;
    }
}
