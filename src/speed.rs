//! Converts accumulated encoder pulses into RPM over a fixed sampling
//! interval.

use fugit::{MicrosDurationU32, TimerInstantU32};

use sweeprig_hardware::encoder::PulseCounter;

pub type Instant = TimerInstantU32<1_000_000>;

/// Latest speed reading for both motors. Stale between samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedSample {
    pub motor_a_rpm: f32,
    pub motor_b_rpm: f32,
}

pub struct SpeedEstimator {
    pulses_per_rev: f32,
    interval: MicrosDurationU32,
    interval_seconds: f32,
    last_sample: Option<Instant>,
    current: SpeedSample,
}

impl SpeedEstimator {
    pub fn new(pulses_per_rev: u32, interval_ms: u32) -> Self {
        Self {
            pulses_per_rev: pulses_per_rev as f32,
            interval: MicrosDurationU32::millis(interval_ms),
            interval_seconds: interval_ms as f32 / 1000.0,
            last_sample: None,
            current: SpeedSample::default(),
        }
    }

    /// Drains both pulse counters and recomputes speeds once a full interval
    /// has elapsed since the last sample. Called more often than that, it
    /// leaves the counters alone and returns the previous sample unchanged.
    ///
    /// The first call is always due, so pulses accumulated since boot drain
    /// into the first window.
    pub fn update(
        &mut self,
        now: Instant,
        pulses_a: &PulseCounter,
        pulses_b: &PulseCounter,
    ) -> SpeedSample {
        let due = match self.last_sample {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                // counter wrap reads as "long elapsed"
                .map_or(true, |elapsed| elapsed >= self.interval),
        };

        if due {
            let a = pulses_a.take();
            let b = pulses_b.take();
            self.current = SpeedSample {
                motor_a_rpm: self.rpm(a),
                motor_b_rpm: self.rpm(b),
            };
            self.last_sample = Some(now);
        }

        self.current
    }

    fn rpm(&self, pulses: u32) -> f32 {
        (pulses as f32 / self.pulses_per_rev) * 60.0 / self.interval_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_ms(ms: u32) -> Instant {
        Instant::from_ticks(ms * 1000)
    }

    fn record(counter: &PulseCounter, pulses: u32) {
        for _ in 0..pulses {
            counter.record();
        }
    }

    #[test]
    fn twenty_pulses_per_window_is_300_rpm() {
        let (a, b) = (PulseCounter::new(), PulseCounter::new());
        let mut estimator = SpeedEstimator::new(20, 200);

        record(&a, 20);
        record(&b, 40);
        let sample = estimator.update(at_ms(200), &a, &b);

        // ppr=20 over 200ms means rpm = pulses * 15
        assert_eq!(sample.motor_a_rpm, 300.0);
        assert_eq!(sample.motor_b_rpm, 600.0);
    }

    #[test]
    fn zero_pulses_reads_as_stationary() {
        let (a, b) = (PulseCounter::new(), PulseCounter::new());
        let mut estimator = SpeedEstimator::new(20, 200);

        let sample = estimator.update(at_ms(200), &a, &b);
        assert_eq!(sample.motor_a_rpm, 0.0);
        assert_eq!(sample.motor_b_rpm, 0.0);
    }

    #[test]
    fn sampling_leaves_counters_at_zero() {
        let (a, b) = (PulseCounter::new(), PulseCounter::new());
        let mut estimator = SpeedEstimator::new(20, 200);

        record(&a, 7);
        record(&b, 3);
        estimator.update(at_ms(200), &a, &b);

        assert_eq!(a.count(), 0);
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn early_update_is_a_no_op() {
        let (a, b) = (PulseCounter::new(), PulseCounter::new());
        let mut estimator = SpeedEstimator::new(20, 200);

        record(&a, 20);
        let first = estimator.update(at_ms(200), &a, &b);

        // 50ms later: interval not elapsed, counters untouched, stale sample
        record(&a, 5);
        let second = estimator.update(at_ms(250), &a, &b);
        assert_eq!(second, first);
        assert_eq!(a.count(), 5);

        // pulses held back above are counted in the next full window
        let third = estimator.update(at_ms(400), &a, &b);
        assert_eq!(third.motor_a_rpm, 5.0 * 15.0);
        assert_eq!(a.count(), 0);
    }

    #[test]
    fn first_update_drains_boot_counts() {
        let (a, b) = (PulseCounter::new(), PulseCounter::new());
        let mut estimator = SpeedEstimator::new(20, 200);

        record(&a, 1);
        let sample = estimator.update(at_ms(0), &a, &b);
        assert_eq!(sample.motor_a_rpm, 15.0);
    }
}
