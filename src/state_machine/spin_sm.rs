//! Spin lifecycle state machine.
//!
//! ```text
//! Idle { result } ──Start──► Spinning { chosen, started_at, duration }
//!        ▲                              │
//!        └──────Tick (elapsed ≥ duration)┘  result = Some(chosen)
//! ```
//!
//! The chosen item travels inside the `Spinning` state, so whatever happens
//! to the wheel while the animation plays, the reveal announces the item
//! that was drawn when the spin started.

use std::time::{Duration, Instant};

use statig::prelude::*;
use tracing::info;

use crate::wheel::WheelItem;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events dispatched to the spin state machine.
#[derive(Debug, Clone)]
pub enum SpinEvent {
    /// A draw has been made; start the animation window.
    Start {
        chosen: WheelItem,
        now: Instant,
        duration: Duration,
    },
    /// Clock advanced. Completes the spin once the duration has elapsed.
    Tick { now: Instant },
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

/// Shared storage for the spin state machine.
#[derive(Debug, Default)]
pub struct SpinMachine {
    /// Number of spins that ran to completion.
    pub completed: u64,
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::idle(None)",
    state(derive(Debug, Clone, PartialEq))
)]
impl SpinMachine {
    /// At rest. `result` holds the last revealed item, if any.
    #[state]
    fn idle(&mut self, event: &SpinEvent, result: &Option<WheelItem>) -> Outcome<State> {
        let _ = result;
        match event {
            SpinEvent::Start {
                chosen,
                now,
                duration,
            } => Transition(State::spinning(chosen.clone(), *now, *duration)),
            SpinEvent::Tick { .. } => Handled,
        }
    }

    /// Animation in flight. Further starts are ignored.
    #[state]
    fn spinning(
        &mut self,
        event: &SpinEvent,
        chosen: &WheelItem,
        started_at: &Instant,
        duration: &Duration,
    ) -> Outcome<State> {
        match event {
            SpinEvent::Tick { now } if now.saturating_duration_since(*started_at) >= *duration => {
                self.completed += 1;
                info!(target: "spin", recipe = %chosen.recipe_name, completed = self.completed, "Spin finished");
                Transition(State::idle(Some(chosen.clone())))
            }
            _ => Handled,
        }
    }
}
