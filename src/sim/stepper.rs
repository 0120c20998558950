//! Fixed-timestep accumulator
//!
//! Host frames credit wall-clock time; the stepper hands out whole simulation
//! steps so the tick rate never depends on the frame rate.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DELTA_MS;

/// Step interval for a rate, in milliseconds
pub fn step_interval_ms(steps_per_second: u32) -> f32 {
    1000.0 / steps_per_second.max(1) as f32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stepper {
    /// Unspent time (ms)
    accumulator_ms: f32,
    /// Timestamp of the previous frame, if the clock is running
    last_timestamp_ms: Option<f64>,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn an absolute frame timestamp into a clamped delta.
    ///
    /// The first frame after construction or `reset_clock` yields zero.
    pub fn frame_delta(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_timestamp_ms {
            Some(last) => (timestamp_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        clamp_delta(delta)
    }

    /// Credit a frame delta, clamped to `MAX_FRAME_DELTA_MS`. Returns the credited amount.
    pub fn accumulate(&mut self, delta_ms: f32) -> f32 {
        let credited = clamp_delta(delta_ms);
        self.accumulator_ms += credited;
        credited
    }

    /// Take one step out of the accumulator if a whole step is available
    pub fn try_consume(&mut self, step_ms: f32) -> bool {
        if self.accumulator_ms >= step_ms {
            self.accumulator_ms -= step_ms;
            true
        } else {
            false
        }
    }

    /// Forget the previous timestamp so a resume does not credit the pause
    pub fn reset_clock(&mut self) {
        self.last_timestamp_ms = None;
    }

    /// Drop unspent time and the clock (new run)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn accumulated_ms(&self) -> f32 {
        self.accumulator_ms
    }
}

fn clamp_delta(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() {
        delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
    } else {
        0.0
    }
}
