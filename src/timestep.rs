//! Fixed-timestep accumulator: real elapsed time in, whole simulation ticks out.

use std::time::Duration;

/// Upper bound on ticks owed after a stall (terminal suspended, slow draw).
pub const MAX_CATCH_UP_TICKS: u32 = 10;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    /// `tick_rate` is in ticks per second and must be positive.
    pub fn new(tick_rate: f64) -> Self {
        Self {
            tick: Duration::from_secs_f64(1.0 / tick_rate),
            accumulator: Duration::ZERO,
        }
    }

    /// Add `elapsed` and return how many ticks to run now. A tick is taken while the
    /// accumulator exceeds one tick duration.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let cap = self.tick * (MAX_CATCH_UP_TICKS + 1);
        self.accumulator = (self.accumulator + elapsed).min(cap);
        let mut ticks = 0;
        while self.accumulator > self.tick {
            self.accumulator -= self.tick;
            ticks += 1;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut ts = FixedTimestep::new(100.0);
        assert_eq!(ts.advance(Duration::from_millis(6)), 0);
        assert_eq!(ts.advance(Duration::from_millis(6)), 1);
        assert_eq!(ts.advance(Duration::from_millis(25)), 2);
    }

    #[test]
    fn test_exact_tick_waits_for_more_time() {
        let mut ts = FixedTimestep::new(100.0);
        assert_eq!(ts.advance(Duration::from_millis(10)), 0);
        assert_eq!(ts.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut ts = FixedTimestep::new(60.0);
        assert_eq!(ts.advance(Duration::from_secs(30)), MAX_CATCH_UP_TICKS);
    }

    #[test]
    fn test_reset_drops_owed_time() {
        let mut ts = FixedTimestep::new(60.0);
        ts.advance(Duration::from_millis(16));
        ts.reset();
        assert_eq!(ts.advance(Duration::from_millis(10)), 0);
    }
}
