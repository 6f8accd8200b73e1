//! Selection engine: uniform pick plus the rotation that lands on it.
//!
//! Segments are laid out clockwise from 12 o'clock, segment `i` covering
//! `[step*i, step*(i+1))` degrees with `step = 360 / n`. A clockwise wheel
//! rotation of `r` degrees moves a point at angle `a` to `a + r`, so the
//! chosen segment's center `c` sits under the fixed pointer when
//! `r mod 360 == (360 - c) mod 360`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::WheelError;
use crate::wheel::WheelItem;

/// Full turns added to every spin before the landing offset.
pub const FULL_TURNS: u32 = 5;

/// Uniform index provider. Injected so tests can script or seed the draw.
pub trait RandomSource {
    /// Return an index uniformly distributed over `0..len`. `len` is never 0.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Adapter from any `rand` generator.
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// OS-seeded generator for production use.
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Result of a single spin. `chosen` is fixed at call time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub chosen: WheelItem,
    pub index: usize,
    pub target_rotation: f64,
}

/// Angular width of one segment, in degrees.
pub fn segment_angle(total: usize) -> f64 {
    360.0 / total as f64
}

/// Clockwise angle of segment `index`'s center, measured from 12 o'clock.
pub fn segment_center(index: usize, total: usize) -> f64 {
    let step = segment_angle(total);
    step * index as f64 + step / 2.0
}

/// Cumulative rotation that puts segment `index` under the pointer.
///
/// The result is at least `FULL_TURNS` full turns past `current`, so a
/// repeated index still produces visible motion.
pub fn target_rotation(current: f64, index: usize, total: usize) -> f64 {
    let landing = (360.0 - segment_center(index, total)).rem_euclid(360.0);
    let offset = (landing - current.rem_euclid(360.0)).rem_euclid(360.0);
    current + 360.0 * FULL_TURNS as f64 + offset
}

/// Pick one item uniformly and compute where the wheel must stop.
pub fn spin(
    items: &[WheelItem],
    current_rotation: f64,
    rng: &mut dyn RandomSource,
) -> Result<SpinOutcome, WheelError> {
    if items.is_empty() {
        return Err(WheelError::EmptyWheel);
    }

    let index = rng.next_index(items.len()).min(items.len() - 1);
    Ok(SpinOutcome {
        chosen: items[index].clone(),
        index,
        target_rotation: target_rotation(current_rotation, index, items.len()),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wheel::{SourceType, Wheel};

    /// Replays a fixed list of indices, cycling.
    pub(crate) struct Scripted {
        pub indices: Vec<usize>,
        pub cursor: usize,
    }

    impl Scripted {
        pub(crate) fn new(indices: &[usize]) -> Self {
            Self { indices: indices.to_vec(), cursor: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn next_index(&mut self, _len: usize) -> usize {
            let i = self.indices[self.cursor % self.indices.len()];
            self.cursor += 1;
            i
        }
    }

    pub(crate) fn wheel_of(n: usize) -> Wheel {
        let mut wheel = Wheel::new();
        for i in 0..n {
            wheel.add(&format!("Dish {i}"), SourceType::Popular).unwrap();
        }
        wheel
    }

    fn pointer_offset(rotation: f64, index: usize, total: usize) -> f64 {
        // Where the chosen center ends up, in [0, 360).
        (segment_center(index, total) + rotation).rem_euclid(360.0)
    }

    fn near_zero_mod_360(angle: f64) -> bool {
        angle < 1e-6 || (360.0 - angle) < 1e-6
    }

    #[test]
    fn empty_wheel_fails() {
        let mut rng = RngSource::seeded(1);
        assert!(matches!(spin(&[], 0.0, &mut rng), Err(WheelError::EmptyWheel)));
    }

    #[test]
    fn target_lands_center_under_pointer() {
        for total in 1..=12 {
            for index in 0..total {
                for current in [0.0, 17.5, 359.9, 1845.0, 12345.678] {
                    let target = target_rotation(current, index, total);
                    assert!(target - current >= 1800.0);
                    assert!(target - current < 1800.0 + 360.0);
                    assert!(
                        near_zero_mod_360(pointer_offset(target, index, total)),
                        "total={total} index={index} current={current} target={target}"
                    );
                }
            }
        }
    }

    #[test]
    fn repeated_index_still_moves() {
        let wheel = wheel_of(4);
        let mut rng = Scripted::new(&[2, 2, 2]);
        let mut rotation = 0.0;
        for _ in 0..3 {
            let outcome = spin(wheel.list(), rotation, &mut rng).unwrap();
            assert_eq!(outcome.index, 2);
            assert!(outcome.target_rotation >= rotation + 1800.0);
            rotation = outcome.target_rotation;
        }
    }

    #[test]
    fn chosen_matches_index() {
        let wheel = wheel_of(5);
        let mut rng = Scripted::new(&[3]);
        let outcome = spin(wheel.list(), 0.0, &mut rng).unwrap();
        assert_eq!(outcome.chosen, wheel.list()[3]);
    }

    #[test]
    fn out_of_range_source_is_clamped() {
        let wheel = wheel_of(3);
        let mut rng = Scripted::new(&[99]);
        let outcome = spin(wheel.list(), 0.0, &mut rng).unwrap();
        assert_eq!(outcome.index, 2);
    }

    #[test]
    fn selection_is_fair() {
        let n = 6;
        let wheel = wheel_of(n);
        let mut rng = RngSource::seeded(0x5eed);
        let draws = 60_000;
        let mut counts = vec![0usize; n];
        let mut rotation = 0.0;
        for _ in 0..draws {
            let outcome = spin(wheel.list(), rotation, &mut rng).unwrap();
            counts[outcome.index] += 1;
            rotation = outcome.target_rotation;
        }
        let expected = draws as f64 / n as f64;
        for (i, &c) in counts.iter().enumerate() {
            let deviation = (c as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "item {i} drawn {c} times, expected ~{expected}");
        }
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let wheel = wheel_of(2);
        let outcome = spin(wheel.list(), 0.0, &mut Scripted::new(&[0])).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("targetRotation").is_some());
        assert_eq!(json["chosen"]["recipe_name"], "Dish 0");
    }
}
