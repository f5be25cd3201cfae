//! Host time to simulation steps
//!
//! The host reports wall-clock time; [`Clock`] turns it into elapsed
//! intervals and [`FixedStepper`] slices each interval into sub-steps no
//! longer than `max_step`, followed by the remainder when there is one. A
//! zero interval still yields a single empty step so the host's input is
//! processed every frame.

use super::game::Simulation;

/// Slack absorbing float error when an interval is an exact multiple of the step
const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepper {
    max_step: f64,
}

impl FixedStepper {
    /// `max_step` must be positive
    pub fn new(max_step: f64) -> Self {
        debug_assert!(max_step > 0.0, "step must be positive, got {max_step}");
        Self { max_step }
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Sub-step durations for `elapsed` seconds: full steps, then the remainder
    pub fn steps(&self, elapsed: f64) -> impl Iterator<Item = f64> + use<> {
        let max_step = self.max_step;
        let mut remaining = elapsed.max(0.0);
        let mut stepped = false;
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            if remaining + STEP_EPSILON >= max_step {
                remaining = (remaining - max_step).max(0.0);
                stepped = true;
                return Some(max_step);
            }
            done = true;
            if stepped && remaining <= STEP_EPSILON {
                return None;
            }
            Some(remaining)
        })
    }

    /// Feed `elapsed` seconds to the simulation; returns the number of updates
    pub fn run(&self, simulation: &mut Simulation, elapsed: f64) -> usize {
        let mut updates = 0;
        for dt in self.steps(elapsed) {
            simulation.update(dt);
            updates += 1;
        }
        updates
    }
}

/// Tracks monotonic host time in seconds
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last: Option<f64>,
}

impl Clock {
    /// Seconds since the previous call; zero on the first call or if time went backwards
    pub fn tick(&mut self, now: f64) -> f64 {
        let elapsed = self.last.map_or(0.0, |last| (now - last).max(0.0));
        self.last = Some(now);
        elapsed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
