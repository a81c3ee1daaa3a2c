//! Frame clock, fixed-timestep accumulator and one-shot/repeating timers.
//!
//! `draw_web()` calls at ~60fps with variable delta. `FrameClock` turns the
//! wall-clock timestamps into clamped deltas; games feed those deltas into
//! their own `FixedStep` and `Timer` values. Nothing is scheduled behind the
//! game's back: dropping a timer cancels it.

/// Longest delta a single frame may report (tab backgrounded, debugger pause).
pub const MAX_FRAME_MS: f64 = 500.0;

pub struct FrameClock {
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()`).
    /// Returns the elapsed milliseconds since the previous call.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        delta
    }
}

/// Accumulator that releases elapsed time in fixed-size steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    step_ms: f64,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            accumulator: 0.0,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn feed(&mut self, elapsed_ms: f64) {
        self.accumulator += elapsed_ms.max(0.0);
    }

    /// Consume one step if enough time has accumulated.
    pub fn next_step(&mut self) -> bool {
        if self.accumulator >= self.step_ms {
            self.accumulator -= self.step_ms;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Countdown that fires once, or repeatedly with a fixed period.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    remaining: f64,
    period: Option<f64>,
}

impl Timer {
    pub fn once(delay_ms: f64) -> Self {
        Self {
            remaining: delay_ms,
            period: None,
        }
    }

    pub fn every(period_ms: f64) -> Self {
        Self {
            remaining: period_ms,
            period: Some(period_ms),
        }
    }

    /// Advance the timer; returns how many times it fired.
    /// A one-shot timer fires at most once and stays expired afterwards.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if self.is_expired() {
            return 0;
        }
        self.remaining -= elapsed_ms.max(0.0);
        match self.period {
            None => {
                if self.remaining <= 0.0 {
                    self.remaining = f64::NEG_INFINITY;
                    1
                } else {
                    0
                }
            }
            Some(period) => {
                let mut fired = 0;
                while self.remaining <= 0.0 {
                    self.remaining += period.max(1.0);
                    fired += 1;
                }
                fired
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.period.is_none() && self.remaining == f64::NEG_INFINITY
    }
}
