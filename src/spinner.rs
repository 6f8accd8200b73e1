//! Per-wheel spin driver.
//!
//! Owns everything one rendered wheel needs between spins: the cumulative
//! rotation, the random source, and the [`SpinMachine`] that gates re-entry
//! and delays the reveal. Each wheel gets its own `Spinner`, so separate
//! wheels (or tests) never share rotation state.

use std::time::{Duration, Instant};

use statig::blocking::StateMachine;
use statig::prelude::*;

use crate::error::WheelError;
use crate::selection::{self, RandomSource, RngSource, SpinOutcome};
use crate::state_machine::spin_sm::{SpinEvent, SpinMachine, State};
use crate::wheel::WheelItem;

/// Visual length of one spin.
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_secs(4);

pub struct Spinner {
    machine: StateMachine<SpinMachine>,
    /// Cumulative rotation the wheel rests at (or is heading to), in degrees.
    rotation: f64,
    /// Rotation at the start of the current animation.
    previous_rotation: f64,
    rng: Box<dyn RandomSource + Send>,
    duration: Duration,
}

impl Spinner {
    pub fn new(rng: Box<dyn RandomSource + Send>, duration: Duration) -> Self {
        Self {
            machine: SpinMachine::default().state_machine(),
            rotation: 0.0,
            previous_rotation: 0.0,
            rng,
            duration,
        }
    }

    /// OS-seeded spinner with the given animation length.
    pub fn with_duration(duration: Duration) -> Self {
        Self::new(Box::new(RngSource::from_os()), duration)
    }

    /// Draw an item and start the animation.
    ///
    /// The outcome is available immediately; [`Spinner::tick`] reveals it
    /// once the animation window has passed.
    pub fn spin(&mut self, items: &[WheelItem], now: Instant) -> Result<SpinOutcome, WheelError> {
        // Settle a finished spin nobody ticked yet.
        self.machine.handle(&SpinEvent::Tick { now });
        if self.is_spinning() {
            return Err(WheelError::AlreadySpinning);
        }

        let outcome = selection::spin(items, self.rotation, self.rng.as_mut())?;
        self.previous_rotation = self.rotation;
        self.rotation = outcome.target_rotation;
        self.machine.handle(&SpinEvent::Start {
            chosen: outcome.chosen.clone(),
            now,
            duration: self.duration,
        });
        Ok(outcome)
    }

    /// Advance the clock. Returns the chosen item exactly once, on the tick
    /// that completes the spin.
    pub fn tick(&mut self, now: Instant) -> Option<WheelItem> {
        if !self.is_spinning() {
            return None;
        }
        self.machine.handle(&SpinEvent::Tick { now });
        self.result().cloned()
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.machine.state(), State::Spinning { .. })
    }

    /// Last revealed item. `None` while spinning or before the first spin.
    pub fn result(&self) -> Option<&WheelItem> {
        match self.machine.state() {
            State::Idle { result } => result.as_ref(),
            State::Spinning { .. } => None,
        }
    }

    /// Resting (or target) cumulative rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation to draw at `now`, eased toward the target while spinning.
    pub fn rotation_at(&self, now: Instant) -> f64 {
        match self.machine.state() {
            State::Spinning {
                started_at,
                duration,
                ..
            } => {
                let progress = if duration.is_zero() {
                    1.0
                } else {
                    (now.saturating_duration_since(*started_at).as_secs_f64()
                        / duration.as_secs_f64())
                    .clamp(0.0, 1.0)
                };
                self.previous_rotation
                    + (self.rotation - self.previous_rotation) * ease_out(progress)
            }
            State::Idle { .. } => self.rotation,
        }
    }
}

/// Cubic ease-out: fast start, long slow landing.
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::{Scripted, wheel_of};

    fn scripted(indices: &[usize]) -> Spinner {
        Spinner::new(Box::new(Scripted::new(indices)), DEFAULT_SPIN_DURATION)
    }

    #[test]
    fn chosen_known_immediately_revealed_after_duration() {
        let wheel = wheel_of(4);
        let mut spinner = scripted(&[2]);
        let t0 = Instant::now();

        let outcome = spinner.spin(wheel.list(), t0).unwrap();
        assert_eq!(outcome.chosen, wheel.list()[2]);
        assert!(spinner.is_spinning());
        assert_eq!(spinner.result(), None);

        assert_eq!(spinner.tick(t0 + Duration::from_secs(2)), None);
        assert_eq!(
            spinner.tick(t0 + DEFAULT_SPIN_DURATION),
            Some(wheel.list()[2].clone())
        );
        // Revealed once only.
        assert_eq!(spinner.tick(t0 + Duration::from_secs(10)), None);
        assert_eq!(spinner.result(), Some(&wheel.list()[2]));
    }

    #[test]
    fn reentry_rejected_while_spinning() {
        let wheel = wheel_of(3);
        let mut spinner = scripted(&[0, 1]);
        let t0 = Instant::now();
        spinner.spin(wheel.list(), t0).unwrap();
        let err = spinner
            .spin(wheel.list(), t0 + Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, WheelError::AlreadySpinning));

        // Once the window has passed a new spin is accepted without a tick.
        assert!(spinner.spin(wheel.list(), t0 + DEFAULT_SPIN_DURATION).is_ok());
    }

    #[test]
    fn empty_wheel_does_not_start() {
        let mut spinner = scripted(&[0]);
        let err = spinner.spin(&[], Instant::now()).unwrap_err();
        assert!(matches!(err, WheelError::EmptyWheel));
        assert!(!spinner.is_spinning());
        assert_eq!(spinner.rotation(), 0.0);
    }

    #[test]
    fn removal_during_spin_keeps_announced_item() {
        let mut wheel = wheel_of(3);
        let mut spinner = scripted(&[1]);
        let t0 = Instant::now();
        let outcome = spinner.spin(wheel.list(), t0).unwrap();
        wheel.remove(&outcome.chosen.recipe_name);
        wheel.remove("Dish 0");
        let revealed = spinner.tick(t0 + DEFAULT_SPIN_DURATION).unwrap();
        assert_eq!(revealed.recipe_name, "Dish 1");
    }

    #[test]
    fn rotation_strictly_increases_on_repeat() {
        let wheel = wheel_of(5);
        let mut spinner = scripted(&[4, 4, 4]);
        let mut t = Instant::now();
        let mut last = spinner.rotation();
        for _ in 0..3 {
            let outcome = spinner.spin(wheel.list(), t).unwrap();
            assert!(outcome.target_rotation >= last + 1800.0);
            last = outcome.target_rotation;
            t += DEFAULT_SPIN_DURATION;
            spinner.tick(t);
        }
    }

    #[test]
    fn animation_eases_between_rotations() {
        let wheel = wheel_of(2);
        let mut spinner = scripted(&[0]);
        let t0 = Instant::now();
        let outcome = spinner.spin(wheel.list(), t0).unwrap();

        assert!(spinner.rotation_at(t0).abs() < 1e-9);
        let mid = spinner.rotation_at(t0 + DEFAULT_SPIN_DURATION / 2);
        // Ease-out covers 7/8 of the distance by the halfway point.
        assert!((mid - outcome.target_rotation * 0.875).abs() < 1e-6);
        let end = spinner.rotation_at(t0 + DEFAULT_SPIN_DURATION);
        assert!((end - outcome.target_rotation).abs() < 1e-9);

        spinner.tick(t0 + DEFAULT_SPIN_DURATION);
        assert_eq!(spinner.rotation_at(t0), outcome.target_rotation);
    }

    #[test]
    fn separate_spinners_do_not_share_rotation() {
        let wheel = wheel_of(3);
        let mut a = scripted(&[0]);
        let b = scripted(&[0]);
        a.spin(wheel.list(), Instant::now()).unwrap();
        assert!(a.rotation() > 0.0);
        assert_eq!(b.rotation(), 0.0);
    }
}
